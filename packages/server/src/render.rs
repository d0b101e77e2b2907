use std::str::FromStr;

use common::widget::{DownloadWidget, PLACEHOLDER_VALUE};
use serde::Serialize;

use crate::models::shortcode::ShortcodeAttributes;

pub const DEFAULT_BUTTON_TEXT: &str = "Download";
pub const DEFAULT_SHASUM_CAPTION: &str = "SHA-256 checksum:";
pub const DEFAULT_SELECT_PROMPT: &str = "Select your platform";

/// Path the widget script is served from.
pub const WIDGET_SCRIPT_PATH: &str = "/assets/download-button.js";

/// Shortcodes that can be rendered into a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcode {
    EulaVersion,
    EulaText,
    ReleaseVersion,
    DownloadUrl,
    Shasum,
    DownloadButton,
}

impl Shortcode {
    /// Whether the shortcode needs a `platform` attribute.
    pub fn needs_platform(self) -> bool {
        matches!(
            self,
            Shortcode::ReleaseVersion | Shortcode::DownloadUrl | Shortcode::Shasum
        )
    }
}

impl FromStr for Shortcode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eula-version" => Ok(Shortcode::EulaVersion),
            "eula-text" => Ok(Shortcode::EulaText),
            "release-version" => Ok(Shortcode::ReleaseVersion),
            "download-url" => Ok(Shortcode::DownloadUrl),
            "shasum" => Ok(Shortcode::Shasum),
            "download-button" => Ok(Shortcode::DownloadButton),
            other => Err(format!("Unknown shortcode '{other}'")),
        }
    }
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn missing_platform() -> String {
    "<strong>Missing platform</strong>".to_owned()
}

/// Captions of the download button, with defaults for absent attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonLabels {
    pub button_text: String,
    pub shasum_caption: String,
    pub select_prompt: String,
}

impl Default for ButtonLabels {
    fn default() -> Self {
        Self {
            button_text: DEFAULT_BUTTON_TEXT.into(),
            shasum_caption: DEFAULT_SHASUM_CAPTION.into(),
            select_prompt: DEFAULT_SELECT_PROMPT.into(),
        }
    }
}

impl ButtonLabels {
    pub fn from_attributes(attrs: &ShortcodeAttributes) -> Self {
        let defaults = Self::default();
        Self {
            button_text: attrs.button_text.clone().unwrap_or(defaults.button_text),
            shasum_caption: attrs
                .shasum_caption
                .clone()
                .unwrap_or(defaults.shasum_caption),
            select_prompt: attrs
                .select_prompt
                .clone()
                .unwrap_or(defaults.select_prompt),
        }
    }
}

#[derive(Serialize)]
struct PlatformLookup<'a> {
    download_url: &'a str,
    shasum: &'a str,
}

/// JSON lookup table `platform_id -> {download_url, shasum}`, safe to embed
/// in a `<script>` element.
fn platform_data(widget: &DownloadWidget) -> String {
    let table: serde_json::Map<String, serde_json::Value> = widget
        .options()
        .iter()
        .map(|opt| {
            let lookup = PlatformLookup {
                download_url: &opt.download_url,
                shasum: &opt.shasum,
            };
            (
                opt.platform_id.clone(),
                serde_json::to_value(lookup).unwrap_or_default(),
            )
        })
        .collect();
    serde_json::Value::Object(table)
        .to_string()
        .replace('<', "\\u003c")
}

/// Markup for the download button in the widget's current state.
pub fn download_button(widget: &DownloadWidget, labels: &ButtonLabels) -> String {
    let selected = widget.selected().map(|opt| opt.platform_id.as_str());

    let mut html = String::from("<div class=\"release-tracker-download\">\n");
    html.push_str(
        "<select id=\"release-tracker-platform-select\" class=\"release-tracker-platform-select\">\n",
    );
    html.push_str(&format!(
        "<option value=\"{}\"{}>{}</option>\n",
        PLACEHOLDER_VALUE,
        if selected.is_none() { " selected" } else { "" },
        escape_html(&labels.select_prompt)
    ));
    for opt in widget.options() {
        html.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            escape_html(&opt.platform_id),
            if selected == Some(opt.platform_id.as_str()) {
                " selected"
            } else {
                ""
            },
            escape_html(&opt.label)
        ));
    }
    html.push_str("</select>\n");
    html.push_str(&format!(
        "<button type=\"button\" id=\"release-tracker-download-button\" class=\"release-tracker-download-button\">{}</button>\n",
        escape_html(&labels.button_text)
    ));
    html.push_str(&format!(
        "<p class=\"release-tracker-shasum\"><span class=\"release-tracker-shasum-caption\">{}</span> <code id=\"release-tracker-shasum\">{}</code></p>\n",
        escape_html(&labels.shasum_caption),
        escape_html(widget.displayed_checksum().unwrap_or_default())
    ));
    html.push_str(&format!(
        "<script type=\"application/json\" id=\"release-tracker-platform-data\">{}</script>\n",
        platform_data(widget)
    ));
    html.push_str(&format!(
        "<script src=\"{WIDGET_SCRIPT_PATH}\" defer></script>\n"
    ));
    html.push_str("</div>");
    html
}
