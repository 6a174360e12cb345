//! Java-style `.properties` file parsing
//!
//! Supports the subset of `java.util.Properties` syntax that build
//! configuration files actually use: `#`/`!` comments, blank lines, `=` or
//! `:` separators, whitespace trimming around keys and values, backslash
//! line continuation, and single-character escapes. Unicode escapes are not
//! supported.
//!
//! A line with no separator is a parse error here. Java silently treats it
//! as a key with an empty value, which hides typos in credentials files.

use crate::error::{ConfigError, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Load and parse a properties file.
///
/// A missing file is reported as [`ConfigError::FileNotFound`] so callers
/// can treat absence as a supported state.
pub fn load(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::UnreadableFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse(&content, path)
}

/// Parse properties content. `source` is used in diagnostics only.
///
/// Later occurrences of a key overwrite earlier ones, matching Java.
pub fn parse(content: &str, source: &Path) -> Result<BTreeMap<String, String>> {
    let mut entries = BTreeMap::new();

    for (line_number, logical) in logical_lines(content) {
        let line = logical.trim_start();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let sep = find_separator(line).ok_or_else(|| ConfigError::Malformed {
            path: source.to_path_buf(),
            line: line_number,
            reason: format!("expected 'key=value', found '{}'", line.trim_end()),
        })?;

        let key = unescape(line[..sep].trim());
        let value = unescape(line[sep + 1..].trim());

        if key.is_empty() {
            return Err(ConfigError::Malformed {
                path: source.to_path_buf(),
                line: line_number,
                reason: "empty key".to_string(),
            });
        }

        entries.insert(key, value);
    }

    Ok(entries)
}

/// Join physical lines into logical lines, honoring trailing-backslash
/// continuation. Returns each logical line with the 1-based number of its
/// first physical line.
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut start_line = 0;

    for (idx, line) in content.lines().enumerate() {
        if current.is_empty() {
            start_line = idx + 1;
            current.push_str(line);
        } else {
            // Continuation lines have their leading whitespace stripped
            current.push_str(line.trim_start());
        }

        if ends_with_continuation(&current) {
            current.pop();
        } else {
            result.push((start_line, std::mem::take(&mut current)));
        }
    }

    if !current.is_empty() {
        result.push((start_line, current));
    }

    result
}

/// A line continues onto the next when it ends with an odd number of
/// backslashes (an even count is escaped backslashes).
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Find the first unescaped `=` or `:`
fn find_separator(line: &str) -> Option<usize> {
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return Some(idx),
            _ => {}
        }
    }
    None
}

/// Resolve single-character escapes. Unknown escapes drop the backslash,
/// matching Java.
fn unescape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => result.push('\t'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('f') => result.push('\u{000C}'),
            Some(other) => result.push(other),
            None => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn parse_str(content: &str) -> Result<BTreeMap<String, String>> {
        parse(content, &PathBuf::from("test.properties"))
    }

    #[test]
    fn test_parse_basic_pairs() {
        let map = parse_str("keyAlias=app\nstorePassword=pw2\n").unwrap();
        assert_eq!(map.get("keyAlias").unwrap(), "app");
        assert_eq!(map.get("storePassword").unwrap(), "pw2");
    }

    #[test]
    fn test_parse_colon_separator() {
        let map = parse_str("keyAlias: app\n").unwrap();
        assert_eq!(map.get("keyAlias").unwrap(), "app");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let map = parse_str("  keyAlias  =  app  \n").unwrap();
        assert_eq!(map.get("keyAlias").unwrap(), "app");
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let map = parse_str("# comment\n! also a comment\n\nkeyAlias=app\n").unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_parse_empty_value() {
        let map = parse_str("keyAlias=\n").unwrap();
        assert_eq!(map.get("keyAlias").unwrap(), "");
    }

    #[test]
    fn test_parse_line_continuation() {
        let map = parse_str("storeFile=upload-\\\n    keystore.jks\n").unwrap();
        assert_eq!(map.get("storeFile").unwrap(), "upload-keystore.jks");
    }

    #[test]
    fn test_parse_escaped_separator_in_key() {
        let map = parse_str("key\\=alias=app\n").unwrap();
        assert_eq!(map.get("key=alias").unwrap(), "app");
    }

    #[test]
    fn test_parse_value_keeps_later_separators() {
        let map = parse_str("storePassword=a=b:c\n").unwrap();
        assert_eq!(map.get("storePassword").unwrap(), "a=b:c");
    }

    #[test]
    fn test_parse_duplicate_key_last_wins() {
        let map = parse_str("keyAlias=old\nkeyAlias=new\n").unwrap();
        assert_eq!(map.get("keyAlias").unwrap(), "new");
    }

    #[test]
    fn test_parse_missing_separator_is_error() {
        let err = parse_str("keyAlias=app\njust some text\n").unwrap_err();
        match err {
            ConfigError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(&PathBuf::from("/nonexistent/key.properties")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.properties");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "keyAlias=app").unwrap();
        writeln!(file, "keyPassword=pw1").unwrap();

        let map = load(&path).unwrap();
        assert_eq!(map.get("keyAlias").unwrap(), "app");
        assert_eq!(map.get("keyPassword").unwrap(), "pw1");
    }
}
