use serde::Deserialize;
use utoipa::IntoParams;

/// Shortcode attributes, passed as query parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShortcodeAttributes {
    /// Platform id for `release-version`, `download-url` and `shasum`.
    pub platform: Option<String>,
    /// Download button caption.
    pub button_text: Option<String>,
    /// Caption shown before the checksum.
    pub shasum_caption: Option<String>,
    /// Placeholder entry of the platform selector.
    pub select_prompt: Option<String>,
}
