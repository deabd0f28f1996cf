//! HTTP cache validation module
//!
//! `Last-Modified` generation and `If-Modified-Since` handling.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format a file timestamp as an HTTP date
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE).to_string()
}

/// Check whether the client's cached copy is still current
///
/// HTTP dates have one-second resolution, so the modification time is
/// truncated before comparing. Unparseable header values never match.
pub fn is_not_modified(if_modified_since: Option<&str>, modified: SystemTime) -> bool {
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    let modified = DateTime::<Utc>::from(modified).timestamp();
    modified <= since.timestamp()
}

fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_http_date_format() {
        assert_eq!(http_date(at(784_111_777)), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_not_modified_when_same_or_newer() {
        let modified = at(784_111_777) + Duration::from_millis(400);
        assert!(is_not_modified(Some("Sun, 06 Nov 1994 08:49:37 GMT"), modified));
        assert!(is_not_modified(Some("Mon, 07 Nov 1994 00:00:00 GMT"), modified));
    }

    #[test]
    fn test_modified_when_client_copy_is_older() {
        assert!(!is_not_modified(
            Some("Sun, 06 Nov 1994 08:49:36 GMT"),
            at(784_111_777)
        ));
    }

    #[test]
    fn test_missing_or_garbage_header() {
        assert!(!is_not_modified(None, at(0)));
        assert!(!is_not_modified(Some("yesterday"), at(0)));
    }
}
