//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use regex::Regex;
use std::sync::OnceLock;

/// Default page size for list endpoints
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Hard cap on page size for list endpoints
pub const MAX_PAGE_SIZE: i64 = 100;

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap()
    });
    re.is_match(email)
}

/// Clamp a requested page size into the allowed range
pub fn clamp_page_size(requested: Option<i64>) -> i64 {
    requested.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Calculate pagination offset from a 1-based page number
pub fn calculate_offset(page: Option<i64>, page_size: i64) -> i64 {
    (page.unwrap_or(1).max(1) - 1) * page_size
}

/// Normalize a set of event tags: trimmed, lowercased, deduplicated, empty dropped
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = tags
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

/// Truncate text to a maximum length with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Sanitize filename for safe storage
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Extract the lowercase extension of a file name, if any
pub fn file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("bob.smith+tag@sub.domain.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_clamp_page_size() {
        assert_eq!(clamp_page_size(None), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_page_size(Some(50)), 50);
        assert_eq!(clamp_page_size(Some(0)), 1);
        assert_eq!(clamp_page_size(Some(-3)), 1);
        assert_eq!(clamp_page_size(Some(10_000)), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_calculate_offset() {
        assert_eq!(calculate_offset(None, 20), 0);
        assert_eq!(calculate_offset(Some(1), 20), 0);
        assert_eq!(calculate_offset(Some(3), 20), 40);
        assert_eq!(calculate_offset(Some(0), 20), 0);
        assert_eq!(calculate_offset(Some(-5), 20), 0);
    }

    #[test]
    fn test_normalize_tags() {
        let tags = vec![
            " Music ".to_string(),
            "music".to_string(),
            "FOOD".to_string(),
            "".to_string(),
            "  ".to_string(),
        ];
        assert_eq!(normalize_tags(&tags), vec!["food", "music"]);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a longer piece of text", 10), "a longe...");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("photo.JPG"), Some("jpg".to_string()));
        assert_eq!(file_extension("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(file_extension("noext"), None);
        assert_eq!(file_extension("trailing."), None);
    }

    proptest! {
        #[test]
        fn normalize_tags_is_idempotent(tags in proptest::collection::vec(".{0,16}", 0..8)) {
            let once = normalize_tags(&tags);
            let twice = normalize_tags(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn sanitized_filenames_contain_no_separators(name in ".{0,64}") {
            let sanitized = sanitize_filename(&name);
            prop_assert!(!sanitized.contains('/'));
            prop_assert!(!sanitized.contains('\\'));
        }
    }
}
