//! URL list parsing and target normalization.

use std::io;
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::{COMMENT_PREFIXES, DEFAULT_URL_SCHEME};
use crate::detection::DetectionRequest;

/// Returns the URL handed to a backend for `url`.
///
/// URLs that already parse with a host are kept as-is; anything else gets
/// `http://` prepended, so `example.com` and `example.com:8080/x` both work.
pub fn normalize_target_url(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) if parsed.has_host() => url.to_string(),
        _ => format!("{DEFAULT_URL_SCHEME}{url}"),
    }
}

fn is_skipped(line: &str) -> bool {
    line.is_empty() || line.starts_with(COMMENT_PREFIXES)
}

/// One request per non-blank, non-comment line, in file order.
pub fn parse_url_lines(text: &str) -> Vec<DetectionRequest> {
    text.lines()
        .map(str::trim)
        .filter(|line| !is_skipped(line))
        .map(DetectionRequest::new)
        .collect()
}

/// Reads `path` and parses it with the same rules as [`parse_url_lines`].
pub async fn read_url_file(path: &Path) -> io::Result<Vec<DetectionRequest>> {
    let file = File::open(path).await?;
    let mut lines = BufReader::new(file).lines();
    let mut requests = Vec::new();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if !is_skipped(line) {
            requests.push(DetectionRequest::new(line));
        }
    }
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_http() {
        assert_eq!(normalize_target_url("example.com"), "http://example.com");
        assert_eq!(
            normalize_target_url("example.com:8080/path"),
            "http://example.com:8080/path"
        );
    }

    #[test]
    fn test_normalize_keeps_scheme() {
        assert_eq!(normalize_target_url("https://example.com"), "https://example.com");
        assert_eq!(normalize_target_url("http://a.com/x?y=1"), "http://a.com/x?y=1");
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        let text = "a.com\n\n  # heading\n; note\n  b.com  \r\na.com\n";
        let urls: Vec<String> = parse_url_lines(text).into_iter().map(|r| r.url).collect();
        assert_eq!(urls, ["a.com", "b.com", "a.com"]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_url_lines("").is_empty());
        assert!(parse_url_lines("\n# only comments\n").is_empty());
    }

    #[tokio::test]
    async fn test_read_url_file_missing() {
        let err = read_url_file(Path::new("/nonexistent/urls.txt"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
