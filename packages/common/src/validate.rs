use std::sync::LazyLock;

use regex::Regex;

use crate::platform::PlatformRow;

/// Web URL pattern: `http`, `https`, `ftp` or scheme-relative, optional
/// credentials, a dotted IPv4 host or a domain with an alphabetic TLD,
/// optional port and an optional whitespace-free path/query/fragment.
static WEB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:(?:(?:https?|ftp):)?//)",
        r"(?:\S+(?::\S*)?@)?",
        r"(?P<host>",
        r"(?:[1-9][0-9]?|1[0-9][0-9]|2[01][0-9]|22[0-3])",
        r"(?:\.(?:1?[0-9]{1,2}|2[0-4][0-9]|25[0-5])){2}",
        r"\.(?:[1-9][0-9]?|1[0-9][0-9]|2[0-4][0-9]|25[0-4])",
        r"|",
        r"(?:(?:[a-z0-9\x{a1}-\x{ffff}][a-z0-9\x{a1}-\x{ffff}_-]{0,62})?[a-z0-9\x{a1}-\x{ffff}]\.)+",
        r"[a-z\x{a1}-\x{ffff}]{2,}\.?",
        r")",
        r"(?::[0-9]{2,5})?",
        r"(?:[/?#]\S*)?$",
    ))
    .expect("web URL pattern is valid")
});

/// Private, loopback and link-local IPv4 prefixes rejected at the host position.
static NON_PUBLIC_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:",
        r"(?:10|127)(?:\.[0-9]{1,3}){3}",
        r"|(?:169\.254|192\.168)(?:\.[0-9]{1,3}){2}",
        r"|172\.(?:1[6-9]|2[0-9]|3[01])(?:\.[0-9]{1,3}){2}",
        r")",
    ))
    .expect("host exclusion pattern is valid")
});

/// Unanchored: a 64-character alphanumeric run anywhere in the input passes.
static SHA256_CHECKSUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9]{64}").expect("checksum pattern is valid"));

/// Returns `true` if `url` is a well-formed public web URL.
pub fn is_valid_url(url: &str) -> bool {
    let Some(caps) = WEB_URL.captures(url) else {
        return false;
    };
    !NON_PUBLIC_HOST.is_match(&caps["host"])
}

/// Returns `true` if `value` contains a 64-character alphanumeric run.
///
/// This accepts more than strict SHA-256 hex (any alphanumerics, and extra
/// surrounding characters) to stay compatible with tables already stored.
pub fn is_valid_checksum(value: &str) -> bool {
    SHA256_CHECKSUM.is_match(value)
}

/// A field of a platform row that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    PlatformId,
    Version,
    DownloadUrl,
    Shasum,
    PayloadUrl,
}

impl RowField {
    pub fn label(self) -> &'static str {
        match self {
            Self::PlatformId => "platform id",
            Self::Version => "version",
            Self::DownloadUrl => "download URL",
            Self::Shasum => "SHA-256 checksum",
            Self::PayloadUrl => "payload URL",
        }
    }
}

/// A row is active when any editable field has content. The display name
/// does not count.
pub fn is_row_active(row: &PlatformRow) -> bool {
    [
        &row.platform_id,
        &row.version,
        &row.download_url,
        &row.shasum,
        &row.payload_url,
    ]
    .iter()
    .any(|field| !field.trim().is_empty())
}

/// Fields of an active row that fail validation; empty for inactive rows.
pub fn row_problems(row: &PlatformRow) -> Vec<RowField> {
    if !is_row_active(row) {
        return Vec::new();
    }

    let mut problems = Vec::new();
    if row.platform_id.trim().is_empty() {
        problems.push(RowField::PlatformId);
    }
    if row.version.trim().is_empty() {
        problems.push(RowField::Version);
    }
    if !is_valid_url(row.download_url.trim()) {
        problems.push(RowField::DownloadUrl);
    }
    if !is_valid_checksum(row.shasum.trim()) {
        problems.push(RowField::Shasum);
    }
    let payload_url = row.payload_url.trim();
    if !payload_url.is_empty() && !is_valid_url(payload_url) {
        problems.push(RowField::PayloadUrl);
    }
    problems
}

/// Inactive rows are trivially valid.
pub fn is_row_valid(row: &PlatformRow) -> bool {
    row_problems(row).is_empty()
}

pub fn is_table_valid(rows: &[PlatformRow]) -> bool {
    rows.iter().all(is_row_valid)
}

/// Client-side gate for submitting a platform table. A table with no active
/// rows may be submitted; it clears every platform.
pub fn can_submit_table(rows: &[PlatformRow]) -> bool {
    is_table_valid(rows)
}

/// Client-side gate for submitting a EULA update.
pub fn is_eula_update_allowed(version: &str, text: &str) -> bool {
    !version.trim().is_empty() && !text.trim().is_empty()
}
