//! Builders turning a [`ServerConfig`] into the pull service and HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use notification_pull::domain::ports::{
    FixtureRequestValidator, NotificationSource, RequestValidator, UserRepository,
};
use notification_pull::domain::{NotificationPullService, PullPorts};
use notification_pull::inbound::http::state::HttpState;
use notification_pull::outbound::deny_list::InMemoryDenyList;
use notification_pull::outbound::memory::{InMemoryNotificationSource, InMemoryUserRepository};
use notification_pull::outbound::persistence::{DieselNotificationSource, DieselUserRepository};

use super::ServerConfig;

/// Select adapters for every port: PostgreSQL when a pool is configured,
/// in-memory otherwise; bearer-secret validation when a signing key is
/// configured, accept-all otherwise.
pub(crate) fn build_pull_ports(config: &ServerConfig) -> PullPorts {
    let (users, notifications): (Arc<dyn UserRepository>, Arc<dyn NotificationSource>) =
        match &config.db_pool {
            Some(pool) => (
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselNotificationSource::new(pool.clone())),
            ),
            None => {
                info!("no database configured; using in-memory stores");
                (
                    Arc::new(InMemoryUserRepository::default()),
                    Arc::new(InMemoryNotificationSource::default()),
                )
            }
        };

    let validator: Arc<dyn RequestValidator> = match &config.validator {
        Some(validator) => Arc::new(validator.clone()),
        None => {
            info!("no signing key configured; accepting every caller");
            Arc::new(FixtureRequestValidator)
        }
    };

    PullPorts {
        users,
        validator,
        notifications,
        deny_list: Arc::new(InMemoryDenyList::new(
            Arc::new(DefaultClock),
            config.deny_list_ttl,
        )),
    }
}

/// Build the shared HTTP state for the pull handlers.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let service = NotificationPullService::new(build_pull_ports(config), config.pull);
    let state = HttpState::new(Arc::new(service));
    let state = match &config.function_key {
        Some(key) => state.with_function_key(key.clone()),
        None => state,
    };
    web::Data::new(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use notification_pull::inbound::http::function_key::FunctionKey;
    use notification_pull::inbound::http::notifications;
    use notification_pull::outbound::validation::BearerSecretValidator;
    use rstest::rstest;

    const GET_URI: &str = "/api/Notification/Pull/u1/1/2/2024-01-01T00:00:00Z";

    fn config() -> ServerConfig {
        ServerConfig::new("127.0.0.1:0".parse().expect("socket address"))
    }

    async fn status_for(config: &ServerConfig, req: test::TestRequest) -> StatusCode {
        let app = test::init_service(
            App::new()
                .app_data(build_http_state(config))
                .service(web::scope("/api").configure(notifications::configure)),
        )
        .await;
        test::call_service(&app, req.to_request()).await.status()
    }

    #[rstest]
    #[actix_web::test]
    async fn in_memory_defaults_answer_pulls() {
        let status = status_for(&config(), test::TestRequest::get().uri(GET_URI)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn configured_validator_rejects_unsigned_callers() {
        let config =
            config().with_validator(BearerSecretValidator::new("signing").expect("valid key"));
        let status = status_for(&config, test::TestRequest::get().uri(GET_URI)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn configured_function_key_is_required() {
        let config = config().with_function_key(FunctionKey::new("k3y").expect("valid key"));
        let status = status_for(&config, test::TestRequest::get().uri(GET_URI)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
