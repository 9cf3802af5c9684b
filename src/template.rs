//! Variable resolver for expansion templates
//!
//! Expansion templates may embed placeholder tokens that are rendered at the
//! moment of expansion:
//!
//! - `{date}`, `{time}`, `{datetime}` — formatted from the expansion instant
//! - `{year}`, `{month}`, `{day}` — 4-digit year, zero-padded month/day
//! - `{timestamp}` — epoch milliseconds as a decimal string
//! - `{cursor}` — NOT rendered; left in place as a literal marker for the
//!   rewrite engine to locate the caret target and strip
//!
//! Replacement is total over any string: unknown `{...}` sequences are left
//! alone, and resolving an already-resolved string is a no-op (no rendering
//! ever produces a placeholder token).

use chrono::{DateTime, Datelike, Local};

/// Literal marker the rewrite engine strips after computing the caret target
pub const CURSOR_MARKER: &str = "{cursor}";

/// Render every recognized placeholder in `template` from `now`.
///
/// `{cursor}` survives untouched. Resolution happens exactly once per
/// expansion; callers must not re-resolve the spliced result.
pub fn resolve(template: &str, now: DateTime<Local>) -> String {
    if !template.contains('{') {
        return template.to_string();
    }

    let date = now.format("%m/%d/%Y").to_string();
    let time = now.format("%H:%M:%S").to_string();

    template
        .replace("{datetime}", &format!("{} {}", date, time))
        .replace("{date}", &date)
        .replace("{time}", &time)
        .replace("{year}", &format!("{:04}", now.year()))
        .replace("{month}", &format!("{:02}", now.month()))
        .replace("{day}", &format!("{:02}", now.day()))
        .replace("{timestamp}", &now.timestamp_millis().to_string())
}
