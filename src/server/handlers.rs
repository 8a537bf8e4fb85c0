use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use rust_embed::RustEmbed;

use super::state::AppState;
use crate::error::FetchError;
use crate::map::{MapComposer, MapComposition};

#[derive(RustEmbed)]
#[folder = "frontend/"]
struct Asset;

fn embedded(name: &str, content_type: &'static str) -> Response {
    match Asset::get(name) {
        Some(file) => (
            [(header::CONTENT_TYPE, content_type)],
            file.data.into_owned(),
        )
            .into_response(),
        None => {
            tracing::error!(asset = name, "Embedded asset missing");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

pub async fn index_html() -> Response {
    embedded("index.html", "text/html; charset=utf-8")
}

pub async fn style_css() -> Response {
    embedded("style.css", "text/css")
}

pub async fn script_js() -> Response {
    embedded("script.js", "application/javascript")
}

/// Feed failure reported to the page, which shows it instead of a map.
#[derive(Debug)]
pub struct ApiError(pub FetchError);

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_timeout() {
            StatusCode::GATEWAY_TIMEOUT
        } else {
            StatusCode::BAD_GATEWAY
        };
        let body = serde_json::json!({
            "status": "error",
            "kind": self.0.kind(),
            "message": format!("Earthquake data could not be loaded: {}", self.0),
        });
        (status, Json(body)).into_response()
    }
}

// Runs the whole pipeline once per page load
pub async fn get_map(State(state): State<AppState>) -> Result<Json<MapComposition>, ApiError> {
    let composer = MapComposer::new(&state.settings, &state.client);
    match composer.compose().await {
        Ok(map) => Ok(Json(map)),
        Err(err) => {
            tracing::error!(error = %err, "Map composition failed");
            Err(err.into())
        }
    }
}
