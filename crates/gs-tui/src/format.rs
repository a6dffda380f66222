//! Cell formatting for the repository table.

use chrono::{DateTime, Local, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Shown in place of a zero count.
pub const ZERO_COUNT: &str = "—";

/// Shown when a repository has no commits.
pub const NO_COMMIT: &str = "N/A";

const ELLIPSIS: char = '…';

/// Formats a change count, rendering zero as [`ZERO_COUNT`].
#[must_use]
pub fn count(n: u32) -> String {
    if n == 0 {
        ZERO_COUNT.to_owned()
    } else {
        n.to_string()
    }
}

/// Formats a commit time as `Jan 02 15:04` in local time.
#[must_use]
pub fn last_commit(time: Option<DateTime<Utc>>) -> String {
    time.map_or_else(
        || NO_COMMIT.to_owned(),
        |t| t.with_timezone(&Local).format("%b %d %H:%M").to_string(),
    )
}

/// Keeps the end of `text`, replacing the start with `…` when it is wider
/// than `max_width` columns.
#[must_use]
pub fn truncate_start(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_owned();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut width = 0;
    let mut start = text.len();
    for (i, c) in text.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        start = i;
    }
    format!("{ELLIPSIS}{}", &text[start..])
}

/// Keeps the start of `text`, replacing the end with `…` when it is wider
/// than `max_width` columns.
#[must_use]
pub fn truncate_end(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_owned();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut width = 0;
    let mut end = 0;
    for (i, c) in text.char_indices() {
        let w = c.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        end = i + c.len_utf8();
    }
    format!("{}{ELLIPSIS}", &text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count() {
        assert_eq!(count(0), "—");
        assert_eq!(count(1), "1");
        assert_eq!(count(42), "42");
    }

    #[test]
    fn test_last_commit_missing() {
        assert_eq!(last_commit(None), "N/A");
    }

    #[test]
    fn test_last_commit_format() {
        let time = DateTime::from_timestamp(1_704_207_845, 0);
        let expected = time
            .map(|t| t.with_timezone(&Local).format("%b %d %H:%M").to_string())
            .unwrap();
        let rendered = last_commit(time);
        assert_eq!(rendered, expected);
        // "Jan 02 15:04" shape regardless of the local offset.
        assert_eq!(rendered.len(), 12);
        assert!(rendered.starts_with("Jan ") || rendered.starts_with("Dec "));
    }

    #[test]
    fn test_truncate_start_short() {
        assert_eq!(truncate_start("/code/api", 20), "/code/api");
    }

    #[test]
    fn test_truncate_start_long() {
        let path = "/home/me/code/very/long/path/to/repository";
        let truncated = truncate_start(path, 20);
        assert!(truncated.starts_with('…'));
        assert!(truncated.ends_with("to/repository"));
        assert_eq!(truncated.width(), 20);
    }

    #[test]
    fn test_truncate_start_wide_chars() {
        let truncated = truncate_start("/projets/日本語のリポジトリ", 9);
        assert!(truncated.starts_with('…'));
        assert!(truncated.width() <= 9);
    }

    #[test]
    fn test_truncate_end() {
        assert_eq!(truncate_end("feature/login", 20), "feature/login");
        assert_eq!(truncate_end("feature/very-long-branch", 10), "feature/v…");
        assert_eq!(truncate_end("abc", 0), "");
    }
}
