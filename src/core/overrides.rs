use crate::domain::model::OverrideRecord;
use regex::Regex;
use std::sync::LazyLock;

static OVERRIDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_.\-]+)(.*)$").expect("override pattern is valid"));

/// Splits `requests>=2.0` into `("requests", ">=2.0")`.
///
/// Strings that do not start with a package name are kept whole as the name
/// with an empty specifier.
pub fn parse_override(raw: &str) -> (String, String) {
    match OVERRIDE_RE.captures(raw) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string()),
        None => {
            tracing::debug!("Override '{}' has no package name prefix, using it verbatim", raw);
            (raw.to_string(), String::new())
        }
    }
}

pub fn parse_overrides<I, S>(raw: I) -> OverrideRecord
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|entry| parse_override(entry.as_ref()))
        .collect()
}
