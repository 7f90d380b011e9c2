use super::*;

#[test]
fn test_strip_quotes_mixed_styles() {
    assert_eq!(strip_quotes("'users'"), "users");
    assert_eq!(strip_quotes("`users`"), "users");
    assert_eq!(strip_quotes("[dbo].[Users]"), "dbo.Users");
}

#[test]
fn test_strip_quotes_preserves_case() {
    assert_eq!(strip_quotes("\"CustomerId\""), "CustomerId");
}

#[test]
fn test_normalize_ident_case_folds() {
    assert_eq!(normalize_ident("Users"), normalize_ident("\"users\""));
}

#[test]
fn test_bare_name_unqualified() {
    assert_eq!(bare_name("orders"), "orders");
}

#[test]
fn test_bare_name_drops_schema() {
    assert_eq!(bare_name("public.users"), "users");
    assert_eq!(bare_name("`shop`.`products`"), "products");
}

#[test]
fn test_bare_name_empty() {
    assert_eq!(bare_name(""), "");
    assert_eq!(bare_name("\"\""), "");
}
