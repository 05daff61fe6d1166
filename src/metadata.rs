//! Fetching page metadata for bookmarks.
//!
//! The board never performs network I/O itself. A [`MetadataResolver`] is
//! supplied by the host application; [`resolve_metadata`] turns its outcome
//! into a [`NodePatch`] for [`crate::Board::apply_metadata`], degrading to a
//! title derived from the URL when the resolver fails.

use crate::error::MetadataError;
use crate::types::NodePatch;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use url::Url;

/// Metadata describing a web page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMetadata {
    /// Page title
    pub title: Option<String>,
    /// Page description
    pub description: Option<String>,
    /// Favicon or logo URL
    pub favicon: Option<String>,
    /// Screenshot or preview image URL
    pub screenshot: Option<String>,
}

/// Source of page metadata, e.g. an HTTP preview service.
pub trait MetadataResolver: Send + Sync {
    /// Fetches metadata for `url`.
    fn fetch_metadata<'a>(&'a self, url: &'a str)
        -> BoxFuture<'a, Result<PageMetadata, MetadataError>>;
}

/// Resolves metadata for `url` into a patch. Never fails.
pub async fn resolve_metadata(resolver: &dyn MetadataResolver, url: &str) -> NodePatch {
    match resolver.fetch_metadata(url).await {
        Ok(metadata) => metadata_patch(metadata),
        Err(err) => {
            log::warn!("Metadata fetch for `{url}` failed, using fallback: {err}");
            fallback_patch(url)
        }
    }
}

/// Converts fetched metadata into a patch, skipping empty fields.
pub fn metadata_patch(metadata: PageMetadata) -> NodePatch {
    let non_empty = |field: Option<String>| field.filter(|v| !v.trim().is_empty());
    NodePatch {
        title: non_empty(metadata.title),
        description: non_empty(metadata.description),
        favicon: non_empty(metadata.favicon),
        screenshot: non_empty(metadata.screenshot),
        ..Default::default()
    }
}

/// Patch used when no metadata could be fetched.
///
/// The title is the host without `www.` and with its first letter
/// capitalized, or "New Bookmark" if `url` does not parse.
pub fn fallback_patch(url: &str) -> NodePatch {
    let title = Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(capitalized_host))
        .unwrap_or_else(|| "New Bookmark".to_string());
    NodePatch {
        title: Some(title),
        url: Some(url.to_string()),
        ..Default::default()
    }
}

fn capitalized_host(host: &str) -> String {
    let host = host.strip_prefix("www.").unwrap_or(host);
    let mut chars = host.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::FutureExt;

    /// Resolver answering every URL with the same outcome.
    struct FixedResolver(Result<PageMetadata, String>);

    impl MetadataResolver for FixedResolver {
        fn fetch_metadata<'a>(
            &'a self,
            _url: &'a str,
        ) -> BoxFuture<'a, Result<PageMetadata, MetadataError>> {
            let outcome = self.0.clone().map_err(MetadataError::Request);
            async move { outcome }.boxed()
        }
    }

    #[test]
    fn successful_fetch_fills_non_empty_fields() {
        let resolver = FixedResolver(Ok(PageMetadata {
            title: Some("Rust".into()),
            description: Some("".into()),
            favicon: None,
            screenshot: Some("https://img/shot.png".into()),
        }));
        let patch = block_on(resolve_metadata(&resolver, "https://rust-lang.org"));

        assert_eq!(patch.title.as_deref(), Some("Rust"));
        assert_eq!(patch.description, None);
        assert_eq!(patch.favicon, None);
        assert_eq!(patch.screenshot.as_deref(), Some("https://img/shot.png"));
        assert_eq!(patch.url, None);
    }

    #[test]
    fn failed_fetch_falls_back_to_host() {
        let resolver = FixedResolver(Err("503".into()));
        let patch = block_on(resolve_metadata(&resolver, "https://www.github.com/rust-lang"));

        assert_eq!(patch.title.as_deref(), Some("Github.com"));
        assert_eq!(patch.url.as_deref(), Some("https://www.github.com/rust-lang"));
    }

    #[test]
    fn unparsable_url_falls_back_to_generic_title() {
        let patch = fallback_patch("not a url");
        assert_eq!(patch.title.as_deref(), Some("New Bookmark"));
        assert_eq!(patch.url.as_deref(), Some("not a url"));
    }
}
