//! Text-level read-only policy
//!
//! These checks run before any parsing, so they also catch destructive
//! statements that are too broken to parse. They are heuristics over the raw
//! text: a keyword inside a string literal still counts.

use crate::verdict::{ERROR_PREFIX, INFO_PREFIX};
use regex::Regex;
use std::sync::OnceLock;

/// Statement keywords that are never allowed in a candidate query
pub const DESTRUCTIVE_KEYWORDS: [&str; 9] = [
    "INSERT", "UPDATE", "DELETE", "DROP", "ALTER", "TRUNCATE", "CREATE", "GRANT", "REVOKE",
];

fn opening_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^```(?:[a-z0-9_+.\-]*[ \t]*\r?\n|sql\b)?").expect("valid regex")
    })
}

fn closing_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```\s*$").expect("valid regex"))
}

fn destructive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let alternation = DESTRUCTIVE_KEYWORDS.join("|");
        Regex::new(&format!(r"(?i)^({alternation})|\b({alternation})\s"))
            .expect("valid regex")
    })
}

/// Strip markdown code-fence wrapping and surrounding whitespace
///
/// Handles an opening fence with or without a language tag (```` ```sql ````,
/// ```` ```postgresql ````) and a closing fence.
pub fn sanitize(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_open = opening_fence_re().replace(trimmed, "");
    let without_close = closing_fence_re().replace(&without_open, "");
    without_close.trim().to_string()
}

/// Return the first destructive keyword found, uppercased
///
/// A keyword matches when it begins the text or when it appears as a word
/// followed by whitespace anywhere in it.
pub fn find_destructive_keyword(sql: &str) -> Option<String> {
    let caps = destructive_re().captures(sql)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_uppercase())
}

/// True when the text starts like a sentinel comment (`-- ERROR`/`-- INFO`)
pub fn has_sentinel_prefix(sql: &str) -> bool {
    let upper = sql.to_uppercase();
    [ERROR_PREFIX, INFO_PREFIX]
        .iter()
        .any(|prefix| upper.starts_with(prefix.trim_end_matches(':')))
}

/// True when every non-blank line is a `--` comment
///
/// A lone `\r` ends a line comment in PostgreSQL, so it splits lines here too.
pub fn is_comment_only(sql: &str) -> bool {
    sql.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .all(|line| line.starts_with("--"))
}

/// True when the text starts with SELECT (case-insensitive)
pub fn starts_with_select(sql: &str) -> bool {
    sql.get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("SELECT"))
}

#[cfg(test)]
#[path = "policy_test.rs"]
mod tests;
