use axum::http::header;
use axum::response::IntoResponse;

const DOWNLOAD_BUTTON_JS: &str = include_str!("../../assets/download-button.js");

/// Client script driving the download button.
pub async fn download_button_script() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        DOWNLOAD_BUTTON_JS,
    )
}
