//! Filename sanitizing for export artifacts.

/// Maximum number of characters kept in a sanitized token.
const MAX_LEN: usize = 30;

/// Token returned when nothing usable survives sanitizing.
pub const FALLBACK: &str = "export";

/// Turns an arbitrary string into a filesystem-safe filename token.
///
/// Leading and trailing whitespace is trimmed, every character outside
/// `[A-Za-z0-9_-]` becomes `_`, and the result is cut to 30 characters.
/// An empty result yields [`FALLBACK`].
pub fn sanitize_filename(raw: &str) -> String {
    let token: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_LEN)
        .collect();

    if token.is_empty() {
        FALLBACK.to_string()
    } else {
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_safe(token: &str) -> bool {
        (1..=MAX_LEN).contains(&token.chars().count())
            && token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }

    #[test]
    fn keeps_plain_tokens() {
        assert_eq!(sanitize_filename("AAPL"), "AAPL");
        assert_eq!(sanitize_filename("yahoo"), "yahoo");
        assert_eq!(sanitize_filename("BRK-B_x"), "BRK-B_x");
    }

    #[test]
    fn trims_then_replaces() {
        assert_eq!(sanitize_filename("  BRK.B  "), "BRK_B");
        assert_eq!(sanitize_filename("../etc/passwd"), "___etc_passwd");
        assert_eq!(sanitize_filename("a b\tc"), "a_b_c");
    }

    #[test]
    fn replaces_non_ascii_per_character() {
        assert_eq!(sanitize_filename("é€"), "__");
        assert_eq!(sanitize_filename("a\u{0}b"), "a_b");
    }

    #[test]
    fn truncates_to_thirty() {
        let long = "X".repeat(45);
        assert_eq!(sanitize_filename(&long), "X".repeat(30));
    }

    #[test]
    fn empty_input_falls_back() {
        assert_eq!(sanitize_filename(""), "export");
        assert_eq!(sanitize_filename("   \n "), "export");
    }

    #[test]
    fn all_invalid_input_is_underscores_not_fallback() {
        // Invalid characters are replaced, not dropped.
        assert_eq!(sanitize_filename("///"), "___");
    }

    #[test]
    fn output_is_always_safe_and_idempotent() {
        let samples = [
            "",
            " ",
            "AAPL",
            "^GSPC",
            "中文",
            "tab\there",
            "a/b\\c:d*e?f\"g<h>i|j",
            "0123456789012345678901234567890123456789",
            "-_-",
        ];
        for raw in samples {
            let once = sanitize_filename(raw);
            assert!(is_safe(&once), "unsafe token {once:?} from {raw:?}");
            assert_eq!(sanitize_filename(&once), once);
        }
    }
}
