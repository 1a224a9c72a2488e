// src/input.rs
// =============================================================================
// Reads the URLs to scan, one per line.
//
// Blank lines are skipped and surrounding whitespace is trimmed. Duplicates
// collapse to their first occurrence, so the batch behaves like a set while
// keeping a stable order: the first URL read is the one whose origin is
// used to normalize relative links later on.
// =============================================================================

use std::collections::HashSet;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub async fn read_urls<R>(reader: R) -> std::io::Result<Vec<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    while let Some(line) = lines.next_line().await? {
        let url = line.trim();
        if url.is_empty() {
            continue;
        }
        if seen.insert(url.to_string()) {
            urls.push(url.to_string());
        }
    }

    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_one_url_per_line() {
        let input = "https://x.com/a\nhttps://x.com/b\r\n".as_bytes();
        let urls = read_urls(input).await.unwrap();
        assert_eq!(urls, vec!["https://x.com/a", "https://x.com/b"]);
    }

    #[tokio::test]
    async fn test_skips_blank_lines_and_duplicates() {
        let input = "\n  https://x.com/a  \n\nhttps://x.com/b\nhttps://x.com/a\n".as_bytes();
        let urls = read_urls(input).await.unwrap();
        assert_eq!(urls, vec!["https://x.com/a", "https://x.com/b"]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let urls = read_urls("".as_bytes()).await.unwrap();
        assert!(urls.is_empty());
    }
}
