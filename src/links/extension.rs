// src/links/extension.rs
// =============================================================================
// Filters URLs by the file extension of their path.
//
// Two passes use this module:
// - before fetching, to skip obvious non-page assets (stylesheets, images,
//   fonts, executables) so we never spend a request on them
// - after link extraction, to keep only the script links we are after
//
// The extension is taken from the last path segment only, so query strings
// and fragments never influence the decision:
//   "https://x.com/app.js?v=3#top" -> ".js"
//   "https://x.com/docs/"          -> ""
// =============================================================================

use url::Url;

/// Extensions kept after extraction.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".js"];

/// Extensions dropped before fetching.
pub const DENIED_EXTENSIONS: &[&str] = &[
    ".css", ".png", ".jpeg", ".jpg", ".svg", ".gif", ".wolf", ".woff", ".woff2", ".eot", ".ttf",
    ".ico", ".tn", ".swf", ".exe",
];

// Base used only to parse relative hrefs far enough to read their path.
// Nothing is ever requested from it.
const PLACEHOLDER_BASE: &str = "http://relative.invalid/";

/// Removes every URL whose extension is on the deny-list.
///
/// URLs without an extension pass through, and so do strings that cannot be
/// parsed at all: the fetch engine reports those as errors instead of
/// letting them vanish here.
pub fn drop_denied_extensions<I, S>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    urls.into_iter()
        .map(Into::into)
        .filter(|url| !has_denied_extension(url))
        .collect()
}

/// Keeps only URLs whose extension is exactly on the allow-list.
pub fn keep_allowed_extensions<I, S>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    urls.into_iter()
        .map(Into::into)
        .filter(|url| has_extension_in(url, ALLOWED_EXTENSIONS))
        .collect()
}

/// Returns the extension of the URL's path, including the leading dot.
///
/// Works for absolute URLs and for relative references such as "/a.js" or
/// "../lib/b.js". Dot-files ("/.htaccess") have no extension, matching the
/// usual filename convention.
pub fn path_extension(url: &str) -> String {
    let path = match parse_reference(url) {
        Some(parsed) => parsed.path().to_string(),
        None => strip_query_and_fragment(url).to_string(),
    };

    let file_name = path.rsplit('/').next().unwrap_or_default();
    let stem_start = file_name.len() - file_name.trim_start_matches('.').len();
    let name = &file_name[stem_start..];

    match name.rfind('.') {
        Some(dot) => name[dot..].to_string(),
        None => String::new(),
    }
}

fn has_extension_in(url: &str, extensions: &[&str]) -> bool {
    let extension = path_extension(url);
    !extension.is_empty() && extensions.contains(&extension.as_str())
}

// Asset URLs often come with upper-case suffixes ("LOGO.PNG"), so the
// deny-list ignores case. The allow-list does not.
fn has_denied_extension(url: &str) -> bool {
    let extension = path_extension(url);
    !extension.is_empty()
        && DENIED_EXTENSIONS
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(&extension))
}

fn parse_reference(url: &str) -> Option<Url> {
    match Url::parse(url) {
        Ok(parsed) => Some(parsed),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(PLACEHOLDER_BASE)
            .ok()
            .and_then(|base| base.join(url).ok()),
        Err(_) => None,
    }
}

fn strip_query_and_fragment(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}
