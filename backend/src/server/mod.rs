//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::PullSettings;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use notification_pull::Trace;
#[cfg(debug_assertions)]
use notification_pull::doc::ApiDoc;
use notification_pull::domain::PullServiceSettings;
use notification_pull::inbound::http::function_key::FunctionKey;
use notification_pull::inbound::http::health::{HealthState, live, ready};
use notification_pull::inbound::http::notifications;
use notification_pull::inbound::http::state::HttpState;
use notification_pull::outbound::persistence::{DbPool, PoolConfig};
use notification_pull::outbound::validation::BearerSecretValidator;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Translate loaded settings into a [`ServerConfig`], connecting to the
/// database when a URL is configured.
///
/// # Errors
/// Returns [`std::io::Error`] for invalid settings or when the pool cannot
/// be built.
pub async fn server_config_from_settings(settings: &PullSettings) -> std::io::Result<ServerConfig> {
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let pull = PullServiceSettings {
        upstream_timeout: settings.upstream_timeout(),
        max_messages: settings.max_messages().map_err(std::io::Error::other)?,
    };
    let mut config = ServerConfig::new(bind_addr)
        .with_pull_settings(pull)
        .with_deny_list_ttl(settings.deny_list_ttl());

    if let Some(url) = &settings.database_url {
        let pool_config = PoolConfig::new(url.clone())
            .with_max_size(settings.db_max_connections())
            .with_connection_timeout(settings.upstream_timeout());
        let pool = DbPool::new(pool_config)
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }
    if let Some(key) = &settings.function_key {
        config = config.with_function_key(FunctionKey::new(key.clone()).map_err(std::io::Error::other)?);
    }
    if let Some(signing_key) = &settings.validation_signing_key {
        config = config.with_validator(
            BearerSecretValidator::new(signing_key.clone()).map_err(std::io::Error::other)?,
        );
    }
    Ok(config)
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(web::scope("/api").configure(notifications::configure))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "notification pull server listening");
    health_state.mark_ready();
    Ok(server)
}
