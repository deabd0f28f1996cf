//! Request path resolution
//!
//! Turns the path of a request URI into a path relative to the root
//! directory. `..` can never climb above the root: it only pops segments
//! that were pushed before it.

use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};

/// The decoded path is not usable (invalid UTF-8 or an embedded NUL)
#[derive(Debug, PartialEq, Eq)]
pub struct BadPath;

/// Decode `%XX` escapes. Malformed escapes are kept literally.
pub fn percent_decode(input: &str) -> Result<String, BadPath> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8(out).map_err(|_| BadPath)
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Percent-encode a single path segment for use in an `href`
pub fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for b in segment.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(b));
        } else {
            let _ = write!(out, "%{b:02X}");
        }
    }
    out
}

/// Escape text for HTML element content and quoted attributes
pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Map a URI path (query already stripped) to a root-relative path.
///
/// Empty and `.` segments are dropped, `..` removes the previous segment and
/// is ignored at the top. Segments the platform would read as anything but a
/// plain file name (drive prefixes, embedded separators) are dropped too.
pub fn relative_path(uri_path: &str) -> Result<PathBuf, BadPath> {
    let decoded = percent_decode(uri_path)?;
    if decoded.contains('\0') {
        return Err(BadPath);
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if is_plain_name(s) => segments.push(s),
            _ => {}
        }
    }

    Ok(segments.into_iter().collect())
}

fn is_plain_name(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("/a%20b").unwrap(), "/a b");
        assert_eq!(percent_decode("/caf%C3%A9").unwrap(), "/café");
        assert_eq!(percent_decode("/100%").unwrap(), "/100%");
        assert_eq!(percent_decode("/%zz%4").unwrap(), "/%zz%4");
        assert_eq!(percent_decode("/%ff"), Err(BadPath));
    }

    #[test]
    fn test_relative_path_normalizes() {
        assert_eq!(relative_path("/").unwrap(), PathBuf::new());
        assert_eq!(
            relative_path("/assets/./img//logo.png").unwrap(),
            PathBuf::from("assets/img/logo.png")
        );
        assert_eq!(
            relative_path("/a/b/../c").unwrap(),
            PathBuf::from("a/c")
        );
    }

    #[test]
    fn test_traversal_stays_below_root() {
        assert_eq!(
            relative_path("/../../etc/passwd").unwrap(),
            PathBuf::from("etc/passwd")
        );
        assert_eq!(
            relative_path("/%2e%2e/%2E%2E/etc/passwd").unwrap(),
            PathBuf::from("etc/passwd")
        );
        assert_eq!(
            relative_path("/a/..%2f..%2f..%2fsecret").unwrap(),
            PathBuf::from("secret")
        );
    }

    #[test]
    fn test_nul_is_rejected() {
        assert_eq!(relative_path("/index.html%00.png"), Err(BadPath));
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("my file.txt"), "my%20file.txt");
        assert_eq!(encode_segment("a&b#c"), "a%26b%23c");
        assert_eq!(encode_segment("café"), "caf%C3%A9");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape("<script>\"x\" & 'y'</script>"),
            "&lt;script&gt;&quot;x&quot; &amp; &#x27;y&#x27;&lt;/script&gt;"
        );
    }
}
