use super::*;

#[test]
fn test_sanitize_sql_fence() {
    assert_eq!(sanitize("```sql\nSELECT 1\n```"), "SELECT 1");
    assert_eq!(sanitize("  ```SQL\nSELECT 1\n```  \n"), "SELECT 1");
}

#[test]
fn test_sanitize_bare_and_other_tags() {
    assert_eq!(sanitize("```\nSELECT 1\n```"), "SELECT 1");
    assert_eq!(sanitize("```postgresql\nSELECT 1\n```"), "SELECT 1");
    assert_eq!(sanitize("```sql SELECT 1```"), "SELECT 1");
}

#[test]
fn test_sanitize_does_not_eat_query_text() {
    assert_eq!(sanitize("```SELECT 1```"), "SELECT 1");
    assert_eq!(sanitize("SELECT 1"), "SELECT 1");
}

#[test]
fn test_sanitize_is_stable() {
    let once = sanitize("```sql\nSELECT id FROM users\n```");
    assert_eq!(sanitize(&once), once);
}

#[test]
fn test_destructive_keywords_at_start() {
    for kw in DESTRUCTIVE_KEYWORDS {
        let sql = format!("{} something", kw.to_lowercase());
        assert_eq!(find_destructive_keyword(&sql), Some(kw.to_string()), "{}", sql);
        assert_eq!(find_destructive_keyword(kw), Some(kw.to_string()));
    }
}

#[test]
fn test_destructive_keyword_inside_query() {
    assert_eq!(
        find_destructive_keyword("SELECT 1; DROP TABLE users"),
        Some("DROP".to_string())
    );
    assert_eq!(
        find_destructive_keyword("SELECT id FROM t;\ndelete\nFROM t"),
        Some("DELETE".to_string())
    );
}

#[test]
fn test_identifier_suffix_is_not_destructive() {
    assert_eq!(
        find_destructive_keyword("SELECT last_update FROM film ORDER BY last_update DESC"),
        None
    );
    assert_eq!(find_destructive_keyword("SELECT created_at FROM users"), None);
}

#[test]
fn test_keyword_inside_identifier_is_not_destructive() {
    assert_eq!(find_destructive_keyword("SELECT soft_delete FROM users"), None);
    assert_eq!(find_destructive_keyword("SELECT is_insert, updated_by FROM audit"), None);
    assert_eq!(
        find_destructive_keyword("SELECT soft_delete FROM users; delete FROM users"),
        Some("DELETE".to_string())
    );
}

#[test]
fn test_plain_select_is_clean() {
    assert_eq!(
        find_destructive_keyword("SELECT u.id, COUNT(*) FROM users u GROUP BY u.id"),
        None
    );
}

#[test]
fn test_sentinel_prefix() {
    assert!(has_sentinel_prefix("-- ERROR: Empty query."));
    assert!(has_sentinel_prefix("-- INFO: There is no department table."));
    assert!(has_sentinel_prefix("-- info: lowercase"));
    assert!(!has_sentinel_prefix("-- just a comment"));
    assert!(!has_sentinel_prefix("SELECT 1"));
}

#[test]
fn test_comment_only() {
    assert!(is_comment_only("-- INFO: a\n\n-- b"));
    assert!(is_comment_only("-- INFO: a\r\n-- b\r\n"));
    assert!(!is_comment_only("-- INFO: a\nSELECT 1"));
}

#[test]
fn test_carriage_return_ends_comment() {
    assert!(!is_comment_only("-- ERROR: x\rDROP TABLE users"));
    assert!(!is_comment_only("-- INFO: note\r  DELETE FROM users"));
}

#[test]
fn test_starts_with_select() {
    assert!(starts_with_select("SELECT 1"));
    assert!(starts_with_select("select\n1"));
    assert!(!starts_with_select("WITH x AS (SELECT 1) SELECT * FROM x"));
    assert!(!starts_with_select("SEL"));
    assert!(!starts_with_select("ÉSELECT"));
}
