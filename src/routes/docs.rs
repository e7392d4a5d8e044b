use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

/// Location of the generated OpenAPI document.
const OPENAPI_URL: &str = "/api-doc/openapi.json";

/// Serve the Swagger UI at `/docs` backed by the generated OpenAPI document.
pub fn router(state: SharedState) -> Router<SharedState> {
    let ui: Router<SharedState> = SwaggerUi::new("/docs").url(OPENAPI_URL, ApiDoc::openapi()).into();

    ui.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_covers_every_area() {
        let doc = ApiDoc::openapi();
        for path in [
            "/healthcheck",
            "/palettes",
            "/colors/blend",
            "/export/ramp",
            "/sessions/{id}/points/{point_id}",
            "/sessions/{id}/preview.png",
            "/sessions/{id}/animation/frames",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let schemas = doc.components.expect("components").schemas;
        assert!(schemas.contains_key("ExportPayload"));
        assert!(schemas.contains_key("SessionResponse"));
    }
}
