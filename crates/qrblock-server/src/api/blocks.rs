//! Block rendering API endpoints.
//!
//! The host plays the role of the course page: each request carries a stored
//! block configuration plus the page context, and the handlers resolve it the
//! way a page render would. A configuration that cannot be shown is not an
//! error; it yields `available: false` and empty text.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use qrblock_core::{BlockConfiguration, BlockView, JsonRenderer, RequestContext, TemplateData};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiResult;
use crate::state::SharedState;

/// Creates the blocks router with all endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/content", post(block_content))
        .route("/render", post(render_block))
        .route("/validate", post(validate_config))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// A block instance rendered on a page.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(example = json!({
    "config": { "options": "internalcontent", "internal": "cmid=5" },
    "context": {
        "course_id": 7,
        "page_url": "https://lms.example.org/course/view.php?id=7",
        "can_edit": false,
        "editing": false
    },
    "panel_id": 42
}))]
pub struct BlockRequest {
    /// Stored block configuration.
    pub config: BlockConfiguration,

    /// Page the block is rendered on.
    #[serde(default)]
    pub context: RequestContext,

    /// Identifier of the block panel on the page.
    #[serde(default)]
    #[schema(example = 42)]
    pub panel_id: i64,
}

impl BlockRequest {
    fn view(&self) -> BlockView {
        BlockView::new(self.panel_id)
    }
}

/// Assembled template data for a block.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(example = json!({
    "available": true,
    "data": {
        "description": "Forum",
        "qrurl": true,
        "qrcodecontent": "https://lms.example.org/mod/forum/view.php?id=5",
        "qrcodelink": "https://lms.example.org/mod/forum/view.php?id=5",
        "fullview": false,
        "configshortlink": null,
        "urlshort": null,
        "qrcodecontent_json": "\"https://lms.example.org/mod/forum/view.php?id=5\"",
        "size": null,
        "id": 42,
        "javascript": "https://lms.example.org/blocks/qr/js/qrcode.min.js"
    }
}))]
pub struct BlockContentResponse {
    /// Whether the block has anything to show.
    #[schema(example = true)]
    pub available: bool,

    /// Template record; absent when the block renders nothing.
    #[schema(value_type = Option<Object>)]
    pub data: Option<TemplateData>,
}

/// Rendered block text.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RenderResponse {
    /// Whether the block has anything to show.
    #[schema(example = true)]
    pub available: bool,

    /// Rendered text, empty when the block renders nothing.
    pub text: String,
}

/// A single failed field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidationIssue {
    /// Stored field name.
    #[schema(example = "wifissid")]
    pub field: String,

    /// What is wrong with it.
    #[schema(example = "network name is required")]
    pub message: String,
}

/// Result of validating a block configuration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "valid": false,
    "errors": [{ "field": "wifissid", "message": "network name is required" }]
}))]
pub struct ValidateResponse {
    /// Whether the configuration passes validation.
    pub valid: bool,

    /// Every failing field.
    pub errors: Vec<ValidationIssue>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Resolve a block and return its template data.
#[utoipa::path(
    post,
    path = "/api/blocks/content",
    tag = "blocks",
    operation_id = "blockContent",
    summary = "Resolve block content",
    description = "Resolves the block configuration against the page context and \
        returns the assembled template record. Unknown modes, malformed internal \
        references and course modes outside a course answer `available: false`.",
    request_body = BlockRequest,
    responses(
        (status = 200, description = "Block resolved", body = BlockContentResponse)
    )
)]
pub async fn block_content(
    State(state): State<SharedState>,
    Json(request): Json<BlockRequest>,
) -> Json<BlockContentResponse> {
    let state_guard = state.read().await;
    let data = state_guard
        .block()
        .content(&request.config, &request.context, request.view());

    Json(BlockContentResponse {
        available: data.is_some(),
        data,
    })
}

/// Resolve a block and render it.
#[utoipa::path(
    post,
    path = "/api/blocks/render",
    tag = "blocks",
    operation_id = "renderBlock",
    summary = "Render block",
    description = "Resolves the block and renders the template record as JSON text. \
        A block with nothing to show renders the empty string.",
    request_body = BlockRequest,
    responses(
        (status = 200, description = "Block rendered", body = RenderResponse),
        (status = 500, description = "Rendering failed", body = crate::api::error::ErrorResponse)
    )
)]
pub async fn render_block(
    State(state): State<SharedState>,
    Json(request): Json<BlockRequest>,
) -> ApiResult<Json<RenderResponse>> {
    let state_guard = state.read().await;
    let text = state_guard.block().render(
        &request.config,
        &request.context,
        request.view(),
        &JsonRenderer,
    )?;

    Ok(Json(RenderResponse {
        available: !text.is_empty(),
        text,
    }))
}

/// Validate a block configuration.
#[utoipa::path(
    post,
    path = "/api/blocks/validate",
    tag = "blocks",
    operation_id = "validateBlockConfig",
    summary = "Validate block configuration",
    description = "Checks a configuration the way the block settings form does. \
        Resolution never requires a configuration to be valid.",
    request_body = BlockConfiguration,
    responses(
        (status = 200, description = "Validation result", body = ValidateResponse)
    )
)]
pub async fn validate_config(Json(config): Json<BlockConfiguration>) -> Json<ValidateResponse> {
    let errors: Vec<ValidationIssue> = config
        .validate()
        .err()
        .map(|err| err.violations())
        .unwrap_or_default()
        .into_iter()
        .map(|(field, message)| ValidationIssue { field, message })
        .collect();

    Json(ValidateResponse {
        valid: errors.is_empty(),
        errors,
    })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::api::create_router;
    use crate::state::testing;

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let app = create_router(testing::state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn course_context() -> Value {
        json!({
            "course_id": 7,
            "page_url": "https://lms.example.org/course/view.php?id=7&sesskey=abc"
        })
    }

    #[tokio::test]
    async fn test_content_for_module() {
        let (status, body) = post_json(
            "/api/blocks/content",
            json!({
                "config": { "options": "internalcontent", "internal": "cmid=5" },
                "context": course_context(),
                "panel_id": 42
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["available"], true);
        let data = &body["data"];
        assert_eq!(data["description"], "Forum");
        assert_eq!(data["qrcodelink"], "https://lms.example.org/mod/forum/view.php?id=5");
        assert_eq!(
            data["urlshort"],
            "https://sho.rt/?u=https%3A%2F%2Flms.example.org%2Fmod%2Fforum%2Fview.php%3Fid%3D5"
        );
        assert_eq!(data["id"], 42);
    }

    #[tokio::test]
    async fn test_content_for_hidden_module_is_message() {
        let (_, body) = post_json(
            "/api/blocks/content",
            json!({
                "config": { "options": "internalcontent", "internal": "cmid=6" },
                "context": course_context()
            }),
        )
        .await;

        assert_eq!(body["available"], true);
        assert_eq!(body["data"]["qrurl"], false);
        assert_eq!(body["data"]["qrcodecontent"], "");
        assert_eq!(body["data"]["description"], "This activity is not available.");
    }

    #[tokio::test]
    async fn test_content_strips_session_key() {
        let (_, body) = post_json(
            "/api/blocks/content",
            json!({ "config": { "options": "currenturl" }, "context": course_context() }),
        )
        .await;

        assert_eq!(
            body["data"]["qrcodecontent"],
            "https://lms.example.org/course/view.php?id=7"
        );
    }

    #[tokio::test]
    async fn test_content_accepts_form_string_numbers() {
        let (status, body) = post_json(
            "/api/blocks/content",
            json!({
                "config": { "options": "currenturl", "size": "200", "allday": "1" },
                "context": course_context()
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["available"], true);
        assert_eq!(body["data"]["size"], 200);
    }

    #[tokio::test]
    async fn test_unknown_mode_is_unavailable() {
        let (status, body) = post_json(
            "/api/blocks/content",
            json!({ "config": { "options": "hologram" }, "context": course_context() }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["available"], false);
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_render_wifi() {
        let (status, body) = post_json(
            "/api/blocks/render",
            json!({
                "config": {
                    "options": "wifi",
                    "wifiauthentication": "WPA",
                    "wifissid": "SchoolNet",
                    "wifipasskey": "secret",
                    "wifissidoptions": "false"
                }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["available"], true);
        let text: Value = serde_json::from_str(body["text"].as_str().unwrap()).unwrap();
        assert_eq!(text["qrcodecontent"], "WIFI:T:WPA;S:SchoolNet;P:secret;H:false;");
        assert_eq!(text["wifissid"], "SchoolNet");
    }

    #[tokio::test]
    async fn test_render_outside_course_is_empty() {
        let (status, body) = post_json(
            "/api/blocks/render",
            json!({ "config": { "options": "courseurl" }, "context": { "page_url": "/my/" } }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["available"], false);
        assert_eq!(body["text"], "");
    }

    #[tokio::test]
    async fn test_validate_reports_fields() {
        let (status, body) = post_json(
            "/api/blocks/validate",
            json!({ "options": "wifi", "wifiauthentication": "WPA" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
        assert_eq!(body["errors"][0]["field"], "wifissid");
    }

    #[tokio::test]
    async fn test_validate_accepts_valid_config() {
        let (_, body) = post_json("/api/blocks/validate", json!({ "options": "currenturl" })).await;
        assert_eq!(body["valid"], true);
        assert_eq!(body["errors"], json!([]));
    }
}
