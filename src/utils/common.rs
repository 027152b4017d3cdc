//! Common utility functions used across the application

use std::path::Path;

/// Make a directory or file name safe for all operating systems: keep
/// letters, digits, `_`, `-` and `.`, collapse every other run of
/// characters into a single underscore.
pub fn sanitize_filename(input: &str) -> String {
    let mut cleaned = String::with_capacity(input.len());
    let mut last_was_replacement = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
            cleaned.push(c);
            last_was_replacement = false;
        } else if !last_was_replacement {
            cleaned.push('_');
            last_was_replacement = true;
        }
    }
    let cleaned = cleaned.trim_matches('_');
    if cleaned.is_empty() {
        "video".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Check if a file exists and has valid content (non-zero size)
pub async fn check_file_exists_and_valid(path: &Path) -> bool {
    if let Ok(metadata) = tokio::fs::metadata(path).await {
        if metadata.is_file() && metadata.len() > 0 {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Hello World"), "Hello_World");
        assert_eq!(sanitize_filename("clip: part 2?"), "clip_part_2");
        assert_eq!(sanitize_filename("path/to/file"), "path_to_file");
        assert_eq!(sanitize_filename("trim---this.mp4"), "trim---this.mp4");
        assert_eq!(sanitize_filename("  spaced  out  "), "spaced_out");
    }

    #[test]
    fn test_sanitize_filename_empty_falls_back() {
        assert_eq!(sanitize_filename(""), "video");
        assert_eq!(sanitize_filename("???"), "video");
    }

    #[tokio::test]
    async fn test_check_file_exists_and_valid() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.mp4");
        assert!(!check_file_exists_and_valid(&missing).await);

        let empty = dir.path().join("empty.mp4");
        tokio::fs::write(&empty, b"").await.unwrap();
        assert!(!check_file_exists_and_valid(&empty).await);

        let valid = dir.path().join("valid.mp4");
        tokio::fs::write(&valid, b"data").await.unwrap();
        assert!(check_file_exists_and_valid(&valid).await);

        assert!(!check_file_exists_and_valid(dir.path()).await);
    }
}
