//! SQL identifier normalization utilities
//!
//! Schema extraction and query validation compare identifiers that were
//! written by different authors (a DDL dump on one side, a generated query on
//! the other). Both sides go through the helpers here so quoting and case
//! never cause a spurious mismatch.

/// Characters treated as identifier quoting across the supported dialects.
const QUOTE_CHARS: [char; 5] = ['"', '\'', '`', '[', ']'];

/// Remove every quoting character from an identifier and trim whitespace.
///
/// Case is preserved.
///
/// # Examples
/// ```
/// use qg_core::ident::strip_quotes;
/// assert_eq!(strip_quotes(r#""users""#), "users");
/// assert_eq!(strip_quotes("`order items`"), "order items");
/// assert_eq!(strip_quotes(r#" "public"."Users" "#), "public.Users");
/// ```
pub fn strip_quotes(ident: &str) -> String {
    ident
        .chars()
        .filter(|c| !QUOTE_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Normalize an identifier for lookup: quotes stripped, trimmed, lowercased.
///
/// # Examples
/// ```
/// use qg_core::ident::normalize_ident;
/// assert_eq!(normalize_ident(r#""UnitPrice""#), "unitprice");
/// assert_eq!(normalize_ident("[Invoice]"), "invoice");
/// ```
pub fn normalize_ident(ident: &str) -> String {
    strip_quotes(ident).to_lowercase()
}

/// Strip quotes and drop any schema/catalog qualification, keeping only the
/// last dot-separated component.
///
/// `public.users` and `users` both become `users`.
///
/// # Examples
/// ```
/// use qg_core::ident::bare_name;
/// assert_eq!(bare_name("users"), "users");
/// assert_eq!(bare_name(r#""public"."users""#), "users");
/// assert_eq!(bare_name("catalog.schema.Orders"), "Orders");
/// ```
pub fn bare_name(ident: &str) -> String {
    let stripped = strip_quotes(ident);
    match stripped.rsplit_once('.') {
        Some((_, table)) => table.trim().to_string(),
        None => stripped,
    }
}

#[cfg(test)]
#[path = "ident_test.rs"]
mod tests;
