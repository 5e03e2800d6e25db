//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the pull routes, the health checks and the payload
//! schemas. The function key scheme is attached as an API key header; the
//! `code` query parameter is accepted too but not advertised.

use crate::domain::{Error, ErrorCode, NotificationMessage, PullResult};
use crate::inbound::http::function_key::FUNCTION_KEY_HEADER;
use crate::inbound::http::notifications::PullRequestBody;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the function key security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "FunctionKey",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                FUNCTION_KEY_HEADER,
                "Shared function key; required only when one is configured.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Notification pull API",
        description = "Lets unregistered mobile clients pull notification messages published since a watermark."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("FunctionKey" = [])),
    paths(
        crate::inbound::http::notifications::pull_by_path,
        crate::inbound::http::notifications::pull_by_body,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(PullResult, NotificationMessage, PullRequestBody, Error, ErrorCode)),
    tags(
        (name = "notifications", description = "Pull published notification messages"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
