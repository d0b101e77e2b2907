//! Download-button behaviour, independent of any rendering layer.
//!
//! The server uses this to pre-select a platform from the request's user
//! agent; the bundled browser script implements the same rules.

use crate::platform::{PlatformTable, normalize_platform_id};

/// Value of the "no platform selected" option.
pub const PLACEHOLDER_VALUE: &str = "-";

/// Operating systems recognized from a user agent or platform string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Windows,
    MacOs,
    Linux,
    Unix,
}

impl Os {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::Linux => "linux",
            Self::Unix => "unix",
        }
    }

    /// Substrings of a normalized platform id that indicate this OS, most
    /// specific first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Windows => &["windows", "win32", "win64"],
            Self::MacOs => &["macos", "mac", "darwin", "osx"],
            Self::Linux => &["linux"],
            Self::Unix => &["unix", "x11"],
        }
    }
}

/// Detect the visitor's OS. Checked in priority order: `Win`, `Mac`,
/// `Linux`, `X11`.
pub fn detect_os(agent: &str) -> Option<Os> {
    [
        ("Win", Os::Windows),
        ("Mac", Os::MacOs),
        ("Linux", Os::Linux),
        ("X11", Os::Unix),
    ]
    .into_iter()
    .find(|(needle, _)| agent.contains(needle))
    .map(|(_, os)| os)
}

/// One selectable platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetOption {
    pub platform_id: String,
    pub label: String,
    pub download_url: String,
    pub shasum: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    NoSelection,
    /// Index into the widget's options.
    PlatformSelected(usize),
}

/// State of a download button: the offered platforms and the current pick.
#[derive(Debug, Clone)]
pub struct DownloadWidget {
    options: Vec<WidgetOption>,
    selection: Selection,
}

impl DownloadWidget {
    pub fn new(options: Vec<WidgetOption>) -> Self {
        Self {
            options,
            selection: Selection::NoSelection,
        }
    }

    /// One option per platform, labelled by display name (the id when the
    /// name is empty).
    pub fn from_table(table: &PlatformTable) -> Self {
        let options = table
            .iter()
            .filter(|(id, _)| *id != PLACEHOLDER_VALUE)
            .map(|(id, record)| WidgetOption {
                platform_id: id.to_owned(),
                label: if record.name.is_empty() {
                    id.to_owned()
                } else {
                    record.name.clone()
                },
                download_url: record.download_url.clone(),
                shasum: record.shasum.clone(),
            })
            .collect();
        Self::new(options)
    }

    pub fn options(&self) -> &[WidgetOption] {
        &self.options
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected(&self) -> Option<&WidgetOption> {
        match self.selection {
            Selection::NoSelection => None,
            Selection::PlatformSelected(index) => self.options.get(index),
        }
    }

    /// Select the first option whose normalized id contains an alias of
    /// `os`; falls back to no selection.
    pub fn select_for_os(&mut self, os: Option<Os>) {
        self.selection = os
            .and_then(|os| {
                os.aliases().iter().find_map(|alias| {
                    self.options
                        .iter()
                        .position(|opt| normalize_platform_id(&opt.platform_id).contains(alias))
                })
            })
            .map_or(Selection::NoSelection, Selection::PlatformSelected);
    }

    /// Detect the OS from `agent` and select accordingly.
    pub fn auto_select(&mut self, agent: &str) {
        self.select_for_os(detect_os(agent));
    }

    /// Apply a value picked in the dropdown. The placeholder or an unknown
    /// value clears the selection.
    pub fn on_change(&mut self, value: &str) {
        if value == PLACEHOLDER_VALUE {
            self.selection = Selection::NoSelection;
            return;
        }
        self.selection = self
            .options
            .iter()
            .position(|opt| opt.platform_id == value)
            .map_or(Selection::NoSelection, Selection::PlatformSelected);
    }

    /// Checksum to display, if a platform is selected.
    pub fn displayed_checksum(&self) -> Option<&str> {
        self.selected().map(|opt| opt.shasum.as_str())
    }

    /// URL to navigate to on click; `None` means the click does nothing.
    pub fn on_click(&self) -> Option<&str> {
        self.selected().map(|opt| opt.download_url.as_str())
    }
}
