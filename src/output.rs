// src/output.rs
// =============================================================================
// Turns scan results into the JSON artifacts written to disk.
//
// Two shapes:
// - FetchRecord: one per fetched URL, with status code, error and the script
//   links found (raw stage, input order)
// - ReconciledRecord: one per reconciled entry (reversed, so "root" comes
//   first)
//
// Page bodies are never written out.
// =============================================================================

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::links::PageLinks;
use crate::pipeline::FetchedPage;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FetchRecord {
    pub url: String,
    pub links: Vec<String>,
    pub status_code: u16,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReconciledRecord {
    pub url: String,
    pub js_links: Vec<String>,
}

impl From<&FetchedPage> for FetchRecord {
    fn from(page: &FetchedPage) -> Self {
        Self {
            url: page.result.url.clone(),
            links: page.links.iter().cloned().collect(),
            status_code: page.result.status_code,
            error: page.result.error.clone(),
        }
    }
}

impl From<PageLinks> for ReconciledRecord {
    fn from(page: PageLinks) -> Self {
        Self {
            url: page.url,
            js_links: page.links.into_iter().collect(),
        }
    }
}

pub fn fetch_records(fetched: &[FetchedPage]) -> Vec<FetchRecord> {
    fetched.iter().map(FetchRecord::from).collect()
}

/// Reconciled entries in presentation order: the reverse of processing
/// order, which puts the root entry first.
pub fn reconciled_records(reconciled: Vec<PageLinks>) -> Vec<ReconciledRecord> {
    reconciled
        .into_iter()
        .rev()
        .map(ReconciledRecord::from)
        .collect()
}

// Writes `records` as a pretty-printed JSON array, replacing the file
pub fn write_json<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, records)
        .with_context(|| format!("Failed to serialize results to {}", path.display()))?;
    writer.write_all(b"\n")?;
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    log::debug!("Wrote {} record(s) to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchResult;
    use crate::links::ROOT_URL;
    use serde_json::{json, Value};

    #[test]
    fn test_root_entry_comes_first() {
        let reconciled = vec![
            PageLinks::new("https://x.com/a", ["https://x.com/a.js"]),
            PageLinks::new(ROOT_URL, ["https://x.com/common.js"]),
        ];
        let records = reconciled_records(reconciled);

        assert_eq!(records[0].url, ROOT_URL);
        assert_eq!(records[1].url, "https://x.com/a");
    }

    #[test]
    fn test_fetch_record_drops_body() {
        let page = FetchedPage {
            result: FetchResult {
                url: "https://x.com/".to_string(),
                status_code: 200,
                body: "<html>secret</html>".to_string(),
                error: String::new(),
            },
            links: ["/a.js".to_string()].into_iter().collect(),
        };
        let value = serde_json::to_value(FetchRecord::from(&page)).unwrap();

        assert_eq!(
            value,
            json!({
                "url": "https://x.com/",
                "links": ["/a.js"],
                "status_code": 200,
                "error": "",
            })
        );
    }

    #[test]
    fn test_write_json_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        let records = reconciled_records(vec![PageLinks::new(ROOT_URL, ["https://x.com/c.js"])]);

        write_json(&path, &records).unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written,
            json!([{ "url": "root", "js_links": ["https://x.com/c.js"] }])
        );
    }

    #[test]
    fn test_write_json_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("result.json");
        let records: Vec<ReconciledRecord> = Vec::new();

        let error = write_json(&path, &records).unwrap_err();
        assert!(error.to_string().contains("Failed to create output file"));
    }
}
