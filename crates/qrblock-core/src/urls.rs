//! Site URL construction.

use url::Url;

use crate::error::{QrBlockError, Result};

/// Query parameter carrying the session key; never encoded into a code.
const SESSION_PARAM: &str = "sesskey";

/// Builds absolute URLs below the site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    root: Url,
}

impl UrlBuilder {
    /// Creates a builder for the given site root.
    ///
    /// # Errors
    ///
    /// Returns [`QrBlockError::InvalidBaseUrl`] unless `wwwroot` is an absolute
    /// http(s) URL.
    pub fn new(wwwroot: &str) -> Result<Self> {
        let mut root =
            Url::parse(wwwroot).map_err(|_| QrBlockError::InvalidBaseUrl(wwwroot.to_string()))?;
        if !root.has_host() || !matches!(root.scheme(), "http" | "https") {
            return Err(QrBlockError::InvalidBaseUrl(wwwroot.to_string()));
        }
        root.set_query(None);
        root.set_fragment(None);
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        Ok(Self { root })
    }

    /// The site root, always ending in `/`.
    #[must_use]
    pub const fn root(&self) -> &Url {
        &self.root
    }

    /// Absolute URL for a site-relative path.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Url {
        let mut url = self.root.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|segment| !segment.is_empty()));
        }
        url
    }

    /// The course view page.
    #[must_use]
    pub fn course_view(&self, course_id: i64) -> Url {
        let mut url = self.resolve("course/view.php");
        url.query_pairs_mut()
            .append_pair("id", &course_id.to_string());
        url
    }

    /// The single-section page.
    #[must_use]
    pub fn section_page(&self, section_id: i64) -> Url {
        let mut url = self.resolve("course/section.php");
        url.query_pairs_mut()
            .append_pair("id", &section_id.to_string());
        url
    }

    /// Makes a URL absolute against the site root. `None` if it cannot be parsed.
    #[must_use]
    pub fn absolute(&self, url: &str) -> Option<Url> {
        Url::parse(url)
            .or_else(|_| self.root.join(url.trim_start_matches('/')))
            .ok()
    }

    /// Absolute page URL without session-identifying parameters.
    ///
    /// Unparseable input is returned unchanged.
    #[must_use]
    pub fn clean_page_url(&self, page_url: &str) -> String {
        let Some(mut url) = self.absolute(page_url) else {
            return page_url.to_string();
        };

        let rewritten = url.query().and_then(|query| {
            let pairs: Vec<&str> = query.split('&').collect();
            let kept: Vec<&str> = pairs
                .iter()
                .copied()
                .filter(|pair| !is_session_pair(pair))
                .collect();
            (kept.len() != pairs.len()).then(|| kept.join("&"))
        });
        if let Some(query) = rewritten {
            url.set_query((!query.is_empty()).then_some(query.as_str()));
        }

        url.to_string()
    }
}

fn is_session_pair(pair: &str) -> bool {
    url::form_urlencoded::parse(pair.as_bytes())
        .next()
        .is_some_and(|(key, _)| key == SESSION_PARAM)
}

/// Whether `text` is a well-formed absolute URL (scheme and host present).
#[must_use]
pub fn is_absolute_url(text: &str) -> bool {
    if text.is_empty() || text.chars().any(char::is_whitespace) {
        return false;
    }
    Url::parse(text).is_ok_and(|url| url.has_host())
}
