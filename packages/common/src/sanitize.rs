use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style)[^>]*?>.*?</(?:script|style)>")
        .expect("script pattern is valid")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[a-zA-Z/!?][^>]*>").expect("tag pattern is valid"));

static PERCENT_OCTET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[a-fA-F0-9]{2}").expect("octet pattern is valid"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n\t ]+").expect("whitespace pattern is valid"));

/// Reduce user input to a single line of plain text.
///
/// Removes `<script>`/`<style>` blocks and all markup tags, escapes a stray
/// `<`, drops percent-encoded octets, folds line breaks and tabs into single
/// spaces, and trims.
pub fn sanitize_text_field(input: &str) -> String {
    let without_scripts = SCRIPT_OR_STYLE.replace_all(input, "");
    let without_tags = TAG.replace_all(&without_scripts, "");
    let escaped = without_tags.replace('<', "&lt;");
    let mut filtered = WHITESPACE_RUN.replace_all(&escaped, " ").into_owned();

    // Removing one octet can splice together another ("%%4141").
    while PERCENT_OCTET.is_match(&filtered) {
        filtered = PERCENT_OCTET.replace_all(&filtered, "").into_owned();
    }

    WHITESPACE_RUN.replace_all(&filtered, " ").trim().to_owned()
}
