// src/pipeline.rs
// =============================================================================
// Wires the stages together:
//
//   URLs -> drop asset URLs -> fetch -> extract hrefs -> keep .js links
//        -> reconcile
//
// Each stage is its own function taking and returning plain values, so every
// stage can be tested in isolation and `scan` is only the composition.
// =============================================================================

use std::collections::BTreeSet;

use crate::fetch::{EngineError, FetchEngine, FetchResult};
use crate::links::{self, PageLinks};

/// A fetched URL together with the target links found in its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub result: FetchResult,
    pub links: BTreeSet<String>,
}

/// Everything a scan produces.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// One entry per URL that survived the pre-filter, in input order
    pub fetched: Vec<FetchedPage>,
    /// Reconciled links, root entry last
    pub reconciled: Vec<PageLinks>,
}

impl ScanOutcome {
    pub fn failed(&self) -> usize {
        self.fetched.iter().filter(|page| !page.result.is_ok()).count()
    }
}

/// Runs the whole pipeline over HTTP.
pub async fn scan(engine: &FetchEngine, urls: Vec<String>) -> Result<ScanOutcome, EngineError> {
    let targets = prefilter(urls);
    let results = engine.fetch(&targets).await?;
    Ok(assemble(results))
}

fn prefilter(urls: Vec<String>) -> Vec<String> {
    let total = urls.len();
    let targets = links::drop_denied_extensions(urls);
    log::debug!("{} of {} URL(s) left after asset filtering", targets.len(), total);
    targets
}

fn assemble(results: Vec<FetchResult>) -> ScanOutcome {
    let fetched: Vec<FetchedPage> = results.into_iter().map(extract_links).collect();
    let reconciled = links::reconcile(page_links(&fetched));
    ScanOutcome {
        fetched,
        reconciled,
    }
}

/// Extracts script links from a fetched body.
pub fn extract_links(result: FetchResult) -> FetchedPage {
    let links = links::keep_allowed_extensions(links::extract_hrefs(&result.body))
        .into_iter()
        .collect();
    FetchedPage { result, links }
}

// One PageLinks per page that yielded at least one target link
fn page_links(fetched: &[FetchedPage]) -> Vec<PageLinks> {
    fetched
        .iter()
        .filter(|page| !page.links.is_empty())
        .map(|page| PageLinks::new(page.result.url.as_str(), page.links.iter().cloned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;
    use crate::fetch::transport::{Page, Transport, TransportError};
    use crate::links::ROOT_URL;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use url::Url;

    // Serves fixed bodies and remembers which URLs were requested
    struct FixedSite {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl FixedSite {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for FixedSite {
        async fn get(&self, url: &Url) -> Result<Page, TransportError> {
            self.requested.lock().unwrap().push(url.to_string());
            match self.pages.get(url.as_str()) {
                Some(body) => Ok(Page {
                    status: 200,
                    body: body.clone(),
                }),
                None => Err(TransportError::Retryable("connection reset".to_string())),
            }
        }
    }

    // Same stages as `scan`, with the HTTP transport swapped out
    async fn scan_with<T: Transport>(
        engine: &FetchEngine,
        transport: &T,
        urls: Vec<String>,
    ) -> ScanOutcome {
        let targets = prefilter(urls);
        assemble(engine.fetch_with(transport, &targets).await)
    }

    fn engine() -> FetchEngine {
        FetchEngine::new(FetchConfig::new(2, 2, Duration::from_secs(1), "test").unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_scan_splits_common_and_unique_scripts() {
        let site = FixedSite::new(&[
            (
                "https://x.com/a",
                r#"<link href="/common.js"><a href="/a.js">a</a><link href="/s.css">"#,
            ),
            (
                "https://x.com/b",
                r#"<link href="https://x.com/common.js"><a href="b.js">b</a>"#,
            ),
        ]);
        let urls = vec!["https://x.com/a".to_string(), "https://x.com/b".to_string()];

        let outcome = scan_with(&engine(), &site, urls).await;

        assert_eq!(outcome.fetched.len(), 2);
        assert_eq!(
            outcome.reconciled,
            vec![
                PageLinks::new("https://x.com/a", ["https://x.com/a.js"]),
                PageLinks::new("https://x.com/b", ["https://x.com/b.js"]),
                PageLinks::new(ROOT_URL, ["https://x.com/common.js"]),
            ]
        );
    }

    #[tokio::test]
    async fn test_assets_are_never_requested() {
        let site = FixedSite::new(&[("https://x.com/", r#"<a href="/app.js">x</a>"#)]);
        let urls = vec![
            "https://x.com/".to_string(),
            "https://x.com/logo.png".to_string(),
            "https://x.com/site.css".to_string(),
        ];

        let outcome = scan_with(&engine(), &site, urls).await;

        assert_eq!(*site.requested.lock().unwrap(), vec!["https://x.com/"]);
        assert_eq!(outcome.fetched.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_pages_are_reported_but_not_reconciled() {
        let site = FixedSite::new(&[("https://x.com/up", r#"<a href="/up.js">x</a>"#)]);
        let urls = vec!["https://x.com/down".to_string(), "https://x.com/up".to_string()];

        let outcome = scan_with(&engine(), &site, urls).await;

        assert_eq!(outcome.failed(), 1);
        assert_eq!(outcome.fetched[0].result.error, "connection reset");
        assert!(outcome.fetched[0].links.is_empty());
        assert_eq!(
            outcome.reconciled,
            vec![PageLinks::new(ROOT_URL, ["https://x.com/up.js"])]
        );
    }

    #[test]
    fn test_extract_links_keeps_only_scripts() {
        let result = FetchResult {
            url: "https://x.com/".to_string(),
            status_code: 200,
            body: r#"<a href="/a.js">a</a><a href="/b.html">b</a><link href="/c.css">"#.to_string(),
            error: String::new(),
        };
        let page = extract_links(result);
        assert_eq!(page.links.into_iter().collect::<Vec<_>>(), vec!["/a.js"]);
    }
}
