use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, header};
use axum::response::Html;
use common::widget::DownloadWidget;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::shortcode::ShortcodeAttributes;
use crate::render::{self, ButtonLabels, Shortcode};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{name}",
    tag = "Shortcodes",
    operation_id = "renderShortcode",
    summary = "Render a shortcode as an HTML fragment",
    description = "Renders one of `eula-version`, `eula-text`, `release-version`, `download-url`, `shasum` or `download-button`. `release-version`, `download-url` and `shasum` need a `platform` attribute. `eula-text` is returned as stored HTML; everything else is escaped. The download button pre-selects a platform from the request `User-Agent`.",
    params(
        ("name" = String, Path, description = "Shortcode name"),
        ShortcodeAttributes,
    ),
    responses(
        (status = 200, description = "Rendered fragment", body = String, content_type = "text/html"),
        (status = 404, description = "Unknown shortcode (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, attrs, headers))]
pub async fn render_shortcode(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(attrs): Query<ShortcodeAttributes>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    let shortcode: Shortcode = name.parse().map_err(AppError::NotFound)?;
    let records = &state.records;

    let platform = match (shortcode.needs_platform(), attrs.platform.as_deref()) {
        (true, None) => return Ok(Html(render::missing_platform())),
        (_, platform) => platform.unwrap_or_default(),
    };

    let html = match shortcode {
        Shortcode::EulaVersion => render::escape_html(&records.eula_version().await?),
        Shortcode::EulaText => records.eula_text().await?,
        Shortcode::ReleaseVersion => render::escape_html(&records.platform_version(platform).await?),
        Shortcode::DownloadUrl => render::escape_html(&records.download_url(platform).await?),
        Shortcode::Shasum => render::escape_html(&records.shasum(platform).await?),
        Shortcode::DownloadButton => {
            let table = records.platform_table().await?;
            let mut widget = DownloadWidget::from_table(&table);
            if let Some(agent) = headers
                .get(header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
            {
                widget.auto_select(agent);
            }
            render::download_button(&widget, &ButtonLabels::from_attributes(&attrs))
        }
    };

    Ok(Html(html))
}
