//! Page storage.
//!
//! The hierarchy resolver only ever reads through [`PageStore`]; writes are
//! the caller's job. Each trait method is one query against the backing
//! storage, which is what the resolver's batch/recursive strategies are
//! measured in.
//!
//! [`MemoryStore`] is an arena of pages keyed by id that persists as a JSON
//! document:
//!
//! ```json
//! {
//!   "next_id": 4,
//!   "pages": [
//!     { "id": 1, "site_id": 1, "slug": "about", "title": { "en": "About" } },
//!     { "id": 2, "site_id": 1, "parent_id": 1, "slug": "about/team", ... }
//!   ]
//! }
//! ```

use crate::page::{Page, PageId, SiteId};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Page {0} not found")]
    NotFound(PageId),
    #[error("Page {0} still has children")]
    HasChildren(PageId),
    #[error("Slug '{slug}' already used by page {owner} in site {site}")]
    DuplicateSlug {
        slug: String,
        site: SiteId,
        owner: PageId,
    },
}

/// Read queries the resolver needs, plus the writes the CLI performs.
pub trait PageStore {
    /// All pages of `site` whose slug is one of `slugs`.
    fn find_by_slugs(&self, site: SiteId, slugs: &[String]) -> Result<Vec<Page>, StoreError>;

    /// A single page by id.
    fn get(&self, id: PageId) -> Result<Option<Page>, StoreError>;

    /// Direct children of `id`, ordered by slug.
    fn children(&self, id: PageId) -> Result<Vec<Page>, StoreError>;

    /// Every page of `site`, ordered by id.
    fn pages(&self, site: SiteId) -> Result<Vec<Page>, StoreError>;

    /// Insert or update a batch as one write. Slug uniqueness is checked
    /// against the state after the whole batch is applied, and nothing is
    /// written if it fails. Unsaved pages get their id assigned in place.
    fn save_all(&mut self, pages: &mut [Page]) -> Result<(), StoreError>;

    /// Insert or update a single page.
    fn save(&mut self, page: &mut Page) -> Result<PageId, StoreError> {
        self.save_all(std::slice::from_mut(page))?;
        Ok(page.id)
    }

    /// Remove a leaf page.
    fn delete(&mut self, id: PageId) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    next_id: u64,
    pages: Vec<Page>,
}

/// In-memory arena of pages with a read-query counter.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pages: BTreeMap<PageId, Page>,
    next_id: u64,
    queries: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store document. A missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)?;
        let file: StoreFile = serde_json::from_str(&content)?;
        let pages: BTreeMap<PageId, Page> = file.pages.into_iter().map(|p| (p.id, p)).collect();
        let highest = pages.keys().next_back().map(|id| id.0).unwrap_or(0);
        Ok(Self {
            pages,
            next_id: file.next_id.max(highest),
            queries: Cell::new(0),
        })
    }

    /// Write the store document, creating parent directories as needed.
    pub fn write(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = StoreFile {
            next_id: self.next_id,
            pages: self.pages.values().cloned().collect(),
        };
        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    /// Read queries issued since creation or the last reset.
    pub fn queries(&self) -> usize {
        self.queries.get()
    }

    pub fn reset_queries(&self) {
        self.queries.set(0);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    fn count_query(&self) {
        self.queries.set(self.queries.get() + 1);
    }
}

impl PageStore for MemoryStore {
    fn find_by_slugs(&self, site: SiteId, slugs: &[String]) -> Result<Vec<Page>, StoreError> {
        self.count_query();
        Ok(self
            .pages
            .values()
            .filter(|p| p.site_id == site && slugs.contains(&p.slug))
            .cloned()
            .collect())
    }

    fn get(&self, id: PageId) -> Result<Option<Page>, StoreError> {
        self.count_query();
        Ok(self.pages.get(&id).cloned())
    }

    fn children(&self, id: PageId) -> Result<Vec<Page>, StoreError> {
        self.count_query();
        let mut children: Vec<Page> = self
            .pages
            .values()
            .filter(|p| p.parent_id == Some(id))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(children)
    }

    fn pages(&self, site: SiteId) -> Result<Vec<Page>, StoreError> {
        self.count_query();
        Ok(self
            .pages
            .values()
            .filter(|p| p.site_id == site)
            .cloned()
            .collect())
    }

    fn save_all(&mut self, pages: &mut [Page]) -> Result<(), StoreError> {
        {
            let replaced: HashSet<PageId> = pages
                .iter()
                .map(|p| p.id)
                .filter(|id| !id.is_unsaved())
                .collect();
            let mut owners: HashMap<(SiteId, &str), PageId> = self
                .pages
                .values()
                .filter(|p| !replaced.contains(&p.id))
                .map(|p| ((p.site_id, p.slug.as_str()), p.id))
                .collect();
            for page in pages.iter() {
                if let Some(owner) = owners.insert((page.site_id, page.slug.as_str()), page.id) {
                    return Err(StoreError::DuplicateSlug {
                        slug: page.slug.clone(),
                        site: page.site_id,
                        owner,
                    });
                }
            }
        }
        for page in pages.iter_mut() {
            if page.id.is_unsaved() {
                self.next_id += 1;
                page.id = PageId(self.next_id);
            } else {
                self.next_id = self.next_id.max(page.id.0);
            }
            let mut stored = page.clone();
            stored.forget_ascendants();
            self.pages.insert(stored.id, stored);
        }
        Ok(())
    }

    fn delete(&mut self, id: PageId) -> Result<(), StoreError> {
        if !self.pages.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        if self.pages.values().any(|p| p.parent_id == Some(id)) {
            return Err(StoreError::HasChildren(id));
        }
        self.pages.remove(&id);
        Ok(())
    }
}
