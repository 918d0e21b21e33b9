//! The page node shared by the store, the hierarchy resolver and the CLI.

use crate::naming;
use crate::translation::TranslatedField;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Page identifier. `0` marks a page that has never been saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub u64);

impl PageId {
    pub const UNSAVED: PageId = PageId(0);

    pub fn is_unsaved(self) -> bool {
        self == Self::UNSAVED
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Partition key: slugs are unique within a site, never across sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub u64);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node in a site's page tree.
///
/// `slug` is the full path: `parent.slug + "/" + leaf` for children, just
/// the leaf for roots. Pages may carry a custom slug that breaks this rule;
/// ancestor resolution still works, only slower.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub site_id: SiteId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<PageId>,
    #[serde(default)]
    pub slug: String,
    /// Per-language title.
    #[serde(default)]
    pub title: TranslatedField,
    /// Per-language breadcrumb title: `parent.titles + " / " + title`.
    #[serde(default, skip_serializing_if = "TranslatedField::is_empty")]
    pub titles: TranslatedField,
    /// Ancestors from the parent up to the root, once resolved.
    #[serde(skip)]
    pub(crate) ascendants: Option<Vec<Page>>,
}

impl Page {
    /// An unsaved root page with no slug yet.
    pub fn new(site_id: SiteId, title: TranslatedField) -> Self {
        Self {
            id: PageId::UNSAVED,
            site_id,
            parent_id: None,
            slug: String::new(),
            title,
            titles: TranslatedField::new(),
            ascendants: None,
        }
    }

    /// Builder: set an explicit slug.
    pub fn with_slug(mut self, slug: &str) -> Self {
        self.slug = slug.to_string();
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Last segment of the slug.
    pub fn leaf(&self) -> &str {
        naming::leaf_segment(&self.slug)
    }

    /// Ancestors resolved earlier on this instance, if any.
    pub fn cached_ascendants(&self) -> Option<&[Page]> {
        self.ascendants.as_deref()
    }

    /// Drop the resolved ancestors; the next lookup resolves again.
    pub fn forget_ascendants(&mut self) {
        self.ascendants = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_page_is_unsaved_root() {
        let page = Page::new(SiteId(1), TranslatedField::new().with("en", "About"));
        assert!(page.id.is_unsaved());
        assert!(page.is_root());
        assert!(page.slug.is_empty());
        assert!(page.cached_ascendants().is_none());
    }

    #[test]
    fn leaf_is_last_segment() {
        let page = Page::new(SiteId(1), TranslatedField::new()).with_slug("about/team/mike");
        assert_eq!(page.leaf(), "mike");
    }

    #[test]
    fn cache_is_not_serialized() {
        let mut page = Page::new(SiteId(1), TranslatedField::new()).with_slug("a");
        page.ascendants = Some(Vec::new());
        let json = serde_json::to_string(&page).unwrap();
        assert!(!json.contains("ascendants"));
        let back: Page = serde_json::from_str(&json).unwrap();
        assert!(back.cached_ascendants().is_none());
    }

    #[test]
    fn ids_serialize_as_numbers() {
        let mut page = Page::new(SiteId(3), TranslatedField::new()).with_slug("a");
        page.id = PageId(7);
        page.parent_id = Some(PageId(2));
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["site_id"], 3);
        assert_eq!(value["parent_id"], 2);
    }
}
