//! Capability discovery through the catalog's HAL root document

use log::{debug, warn};
use std::sync::Arc;

use super::client::CatalogClient;
use super::hal::RootDocument;
use super::template::UriTemplate;
use super::traits::CapabilityResolver;

/// Resolves the event feed by following a relation from the catalog root
///
/// The root is fetched on every call so a feed that disappears or moves is
/// noticed on the next tick.
pub struct HalCapabilityResolver {
    client: Arc<CatalogClient>,
    root_url: String,
    rel: String,
}

impl HalCapabilityResolver {
    pub fn new(
        client: Arc<CatalogClient>,
        root_url: impl Into<String>,
        rel: impl Into<String>,
    ) -> Self {
        Self {
            client,
            root_url: root_url.into(),
            rel: rel.into(),
        }
    }
}

impl CapabilityResolver for HalCapabilityResolver {
    fn resolve(&self) -> Option<UriTemplate> {
        match self.client.get_root(&self.root_url) {
            Ok(root) => {
                let template = select_capability(&root, &self.rel, &self.root_url);
                if template.is_none() {
                    debug!("Catalog at {} does not advertise '{}'", self.root_url, self.rel);
                }
                template
            }
            Err(e) => {
                warn!("Catalog discovery failed at {}: {:#}", self.root_url, e);
                None
            }
        }
    }
}

/// Pick the link for `rel` from a root document
///
/// Relative hrefs are resolved against `root_url` by plain string joining,
/// since URL parsers would percent-encode template braces.
fn select_capability(root: &RootDocument, rel: &str, root_url: &str) -> Option<UriTemplate> {
    let href = &root.links.get(rel)?.href;
    Some(UriTemplate::new(absolutize(href, root_url)))
}

fn absolutize(href: &str, root_url: &str) -> String {
    if href.contains("://") {
        return href.to_string();
    }

    if let Some(path) = href.strip_prefix('/') {
        // Keep only scheme://authority of the root
        let authority_end = root_url
            .find("://")
            .map(|i| i + 3)
            .and_then(|start| root_url[start..].find('/').map(|i| start + i))
            .unwrap_or(root_url.len());
        return format!("{}/{}", &root_url[..authority_end], path);
    }

    format!("{}/{}", root_url.trim_end_matches('/'), href)
}
