// src/links/reconcile.rs
// =============================================================================
// Separates site-wide links from page-specific ones.
//
// Given the script links of every fetched page, the reconciler:
// 1. drops pages without links
// 2. makes every link absolute using the site origin of the first page
// 3. computes the links shared by ALL pages and appends them as a
//    synthetic "root" entry
// 4. subtracts the shared links from every page
// 5. drops pages that became empty (their links all live in "root" now)
//
// The order matters: the intersection is taken over normalized links, so
// "/app.js" on one page and "https://x.com/app.js" on another are the same
// link by the time we compare them.
//
// Every step consumes its input and returns a new Vec. Nothing is updated
// in place behind a caller's back, and the origin / intersection are
// computed once per call and never cached between calls.
// =============================================================================

use std::collections::BTreeSet;
use url::Url;

/// Tag of the synthetic entry holding the links common to every page.
pub const ROOT_URL: &str = "root";

/// The target links found on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLinks {
    pub url: String,
    pub links: BTreeSet<String>,
}

impl PageLinks {
    pub fn new<I, S>(url: impl Into<String>, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            url: url.into(),
            links: links.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.url == ROOT_URL
    }

    fn normalized(self, origin: &str) -> Self {
        let links = self
            .links
            .into_iter()
            .map(|link| absolutize(&link, origin))
            .collect();
        Self { url: self.url, links }
    }

    fn without(self, common: &BTreeSet<String>) -> Self {
        let links = self.links.difference(common).cloned().collect();
        Self { url: self.url, links }
    }
}

/// Runs the full reconciliation over a batch of pages.
///
/// Reconciliation is single-pass: a batch that already contains a root
/// entry is treated as reconciled and only has empty entries removed, so
/// `reconcile(reconcile(x)) == reconcile(x)`.
pub fn reconcile(pages: Vec<PageLinks>) -> Vec<PageLinks> {
    if pages.iter().any(PageLinks::is_root) {
        log::debug!("Batch already holds a root entry, skipping reconciliation");
        return drop_empty(pages);
    }

    let pages = drop_empty(pages);

    // An intersection over zero sets is undefined: no pages, no root.
    let Some(first_url) = pages.first().map(|page| page.url.clone()) else {
        return Vec::new();
    };

    let pages = match site_origin(&first_url) {
        Some(origin) => normalize(pages, &origin),
        None => {
            log::warn!("Cannot derive an origin from {first_url}, links left as-is");
            pages
        }
    };

    let common = common_links(&pages);
    log::debug!(
        "{} link(s) shared by all {} page(s)",
        common.len(),
        pages.len()
    );

    let mut reconciled: Vec<PageLinks> = pages
        .into_iter()
        .map(|page| page.without(&common))
        .collect();
    reconciled.push(PageLinks {
        url: ROOT_URL.to_string(),
        links: common,
    });

    drop_empty(reconciled)
}

/// Removes entries whose link set is empty.
pub fn drop_empty(pages: Vec<PageLinks>) -> Vec<PageLinks> {
    pages.into_iter().filter(|page| !page.links.is_empty()).collect()
}

/// Rewrites relative links of every page against `origin`.
pub fn normalize(pages: Vec<PageLinks>, origin: &str) -> Vec<PageLinks> {
    pages
        .into_iter()
        .map(|page| page.normalized(origin))
        .collect()
}

/// Scheme + host (+ non-default port) of a page URL, e.g. "https://x.com".
pub fn site_origin(page_url: &str) -> Option<String> {
    let parsed = Url::parse(page_url).ok()?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(origin.ascii_serialization())
}

/// Makes a single link absolute.
///
/// A link counts as absolute when it starts with the origin or carries its
/// own scheme ("https://cdn.net/a.js"). Protocol-relative links
/// ("//cdn.net/a.js") keep their host and borrow the origin's scheme.
/// Anything else is joined onto the origin with its leading slashes
/// removed, so "/a.js" and "a.js" both become "https://x.com/a.js".
pub fn absolutize(link: &str, origin: &str) -> String {
    if is_absolute(link, origin) {
        return link.to_string();
    }
    if let Some(authority) = link.strip_prefix("//") {
        let scheme = origin.split("://").next().unwrap_or("https");
        return format!("{scheme}://{authority}");
    }
    format!("{}/{}", origin, link.trim_start_matches('/'))
}

fn is_absolute(link: &str, origin: &str) -> bool {
    link.starts_with(origin) || Url::parse(link).is_ok()
}

// Links present on every page. Callers guarantee at least one page.
fn common_links(pages: &[PageLinks]) -> BTreeSet<String> {
    let mut sets = pages.iter().map(|page| &page.links);
    let Some(first) = sets.next() else {
        return BTreeSet::new();
    };

    sets.fold(first.clone(), |common, links| {
        common.intersection(links).cloned().collect()
    })
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why BTreeSet instead of HashSet?
//    - Link order is irrelevant to the algorithm, but a sorted set makes the
//      JSON artifact stable between runs, which keeps diffs readable
//
// 2. Why is the root entry appended last?
//    - The output writer reverses the list, so "root" ends up first in the
//      file, ahead of the pages it was computed from
//
// 3. Why `let ... else`?
//    - It binds the happy path and returns early otherwise, without an
//      extra level of nesting
// -----------------------------------------------------------------------------
