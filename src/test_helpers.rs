//! Shared test utilities for the simple-cms test suite.
//!
//! Builds small page trees directly in a [`MemoryStore`] and provides lookup
//! helpers that panic with the available slugs on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut store = MemoryStore::new();
//! let pages = chain(&mut store, &["root", "a", "b", "c"]);
//! // slugs: root, root/a, root/a/b, root/a/b/c
//! let c = reload(&store, &pages[3]);
//! assert_eq!(slugs(&[c]), ["root/a/b/c"]);
//! ```

use crate::page::{Page, PageId, SiteId};
use crate::store::{MemoryStore, PageStore};
use crate::translation::{FallbackTable, LanguageContext, TranslatedField};

pub const SITE: SiteId = SiteId(1);

// =========================================================================
// Fixture setup
// =========================================================================

/// Save an English-titled page under `parent` with slug `parent.slug/leaf`.
pub fn add_page(store: &mut MemoryStore, parent: Option<&Page>, leaf: &str) -> Page {
    let slug = match parent {
        Some(p) => format!("{}/{leaf}", p.slug),
        None => leaf.to_string(),
    };
    let mut page = Page::new(SITE, TranslatedField::new().with("en", leaf)).with_slug(&slug);
    page.parent_id = parent.map(|p| p.id);
    store.save(&mut page).unwrap();
    page
}

/// Save a linear chain `leaves[0] → leaves[1] → …`, root first.
pub fn chain(store: &mut MemoryStore, leaves: &[&str]) -> Vec<Page> {
    let mut pages: Vec<Page> = Vec::with_capacity(leaves.len());
    for leaf in leaves {
        let page = add_page(store, pages.last(), leaf);
        pages.push(page);
    }
    pages
}

/// English, French and German; English falls back to French.
pub fn en_fr_de() -> LanguageContext {
    LanguageContext::new(
        vec!["en".into(), "fr".into(), "de".into()],
        "en",
        FallbackTable::default().with_chain("en", &["fr"]),
    )
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Fresh copy of `page` from the store, as a new instance with no cache.
pub fn reload(store: &MemoryStore, page: &Page) -> Page {
    store
        .get(page.id)
        .unwrap()
        .unwrap_or_else(|| panic!("page {} not in store", page.id))
}

// =========================================================================
// Bulk extractors
// =========================================================================

pub fn ids(pages: &[Page]) -> Vec<PageId> {
    pages.iter().map(|p| p.id).collect()
}

pub fn slugs(pages: &[Page]) -> Vec<&str> {
    pages.iter().map(|p| p.slug.as_str()).collect()
}
