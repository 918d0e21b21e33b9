//! Site-level page operations: the unit of work the CLI drives.
//!
//! [`Site`] ties a [`PageStore`], a [`LanguageContext`] and a site id
//! together and does what saving a page involves:
//!
//! - a missing slug is generated from the title (unique within the site,
//!   prefixed by the parent's slug)
//! - the per-language breadcrumb `titles` field is rebuilt from the ancestor
//!   chain for every available language
//! - after a move or a slug change, the page and its whole subtree are
//!   prepared and saved, parents before children
//!
//! Conflicting slugs are detected before anything is written.

use crate::hierarchy::{self, HierarchyError};
use crate::naming::{self, join_slug, slugify};
use crate::page::{Page, PageId, SiteId};
use crate::store::{PageStore, StoreError};
use crate::translation::{LanguageContext, TranslatedField};
use std::collections::{HashMap, HashSet};
use std::convert::Infallible;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Leaf used when a title slugifies to nothing.
const FALLBACK_LEAF: &str = "page";

#[derive(Error, Debug)]
pub enum SiteError {
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Page {0} not found in this site")]
    NotFound(PageId),
    #[error("Slug '{slug}' is already used by page {owner}")]
    SlugTaken { slug: String, owner: PageId },
    #[error("Slug must not be empty")]
    EmptySlug,
}

pub struct Site<S: PageStore> {
    store: S,
    ctx: LanguageContext,
    site: SiteId,
}

impl<S: PageStore> Site<S> {
    pub fn new(store: S, ctx: LanguageContext, site: SiteId) -> Self {
        Self { store, ctx, site }
    }

    pub fn id(&self) -> SiteId {
        self.site
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn language(&self) -> &LanguageContext {
        &self.ctx
    }

    pub fn language_mut(&mut self) -> &mut LanguageContext {
        &mut self.ctx
    }

    /// Load a page of this site.
    pub fn page(&self, id: PageId) -> Result<Page, SiteError> {
        self.store
            .get(id)?
            .filter(|p| p.site_id == self.site)
            .ok_or(SiteError::NotFound(id))
    }

    /// Page whose slug is exactly `slug`, with its ancestors already
    /// resolved when the slug path allows it.
    pub fn page_by_slug(&self, slug: &str) -> Result<Option<Page>, SiteError> {
        let slug = slug.trim_matches('/');
        let found = hierarchy::with_ascendants_for_slug(&self.store, self.site, slug)?;
        Ok(found.into_iter().next().filter(|p| p.slug == slug))
    }

    /// Page named by a command-line argument: a numeric id first, then an
    /// exact slug, so all-digit slugs stay reachable.
    pub fn find_page(&self, arg: &str) -> Result<Option<Page>, SiteError> {
        if let Ok(id) = arg.parse::<u64>() {
            match self.page(PageId(id)) {
                Ok(page) => return Ok(Some(page)),
                Err(SiteError::NotFound(_)) => {}
                Err(err) => return Err(err),
            }
        }
        self.page_by_slug(arg)
    }

    /// Every page of the site, ordered by id.
    pub fn pages(&self) -> Result<Vec<Page>, SiteError> {
        Ok(self.store.pages(self.site)?)
    }

    /// Ancestors of a page, closest first.
    pub fn ascendants(&self, id: PageId) -> Result<Vec<Page>, SiteError> {
        let mut page = self.page(id)?;
        Ok(hierarchy::get_ascendants(&self.store, &mut page)?.to_vec())
    }

    /// Create a page titled `title` in the active language.
    ///
    /// `slug` may be a leaf (joined under the parent's slug) or a full path
    /// containing `/`, which is kept as a custom slug. Without one, the slug
    /// is generated from the title.
    pub fn create_page(
        &mut self,
        title: &str,
        parent: Option<PageId>,
        slug: Option<&str>,
    ) -> Result<Page, SiteError> {
        let parent = parent.map(|id| self.page(id)).transpose()?;
        let mut page = Page::new(self.site, TranslatedField::new());
        page.title.set(&self.ctx, title);
        page.parent_id = parent.as_ref().map(|p| p.id);
        if let Some(slug) = slug {
            page.slug = self.expand_slug(slug, parent.as_ref())?;
        }
        self.prepare(&mut page)?;
        self.ensure_slugs_free(&[&page])?;
        self.store.save(&mut page)?;
        info!(page = %page.id, slug = %page.slug, "created page");
        Ok(page)
    }

    /// Fill in what a save derives: a missing slug and the per-language
    /// breadcrumb titles.
    pub fn prepare(&mut self, page: &mut Page) -> Result<(), SiteError> {
        let ancestors = hierarchy::get_ascendants(&self.store, page)?.to_vec();
        if page.slug.is_empty() {
            page.slug = self.generate_slug(page, ancestors.first())?;
        }
        refresh_titles(&mut self.ctx, page, &ancestors);
        Ok(())
    }

    /// Move a page under `parent`, or to the root with `None`.
    pub fn move_page(&mut self, id: PageId, parent: Option<PageId>) -> Result<Page, SiteError> {
        let mut page = self.page(id)?;
        let parent = parent.map(|pid| self.page(pid)).transpose()?;
        let rewritten = hierarchy::set_parent(&self.store, &mut page, parent.as_ref())?;
        self.save_subtree(page, rewritten)
    }

    /// Change a page's slug.
    ///
    /// A value without `/` replaces the leaf under the current parent; a
    /// value with `/` is taken as the full slug.
    pub fn rename_slug(&mut self, id: PageId, slug: &str) -> Result<Page, SiteError> {
        let mut page = self.page(id)?;
        let parent = page.parent_id.map(|pid| self.page(pid)).transpose()?;
        let new_slug = self.expand_slug(slug, parent.as_ref())?;
        let rewritten = hierarchy::set_slug(&self.store, &mut page, &new_slug)?;
        self.save_subtree(page, rewritten)
    }

    /// Store a title translation and rebuild breadcrumbs below the page.
    pub fn set_title(&mut self, id: PageId, language: &str, title: &str) -> Result<Page, SiteError> {
        let mut page = self.page(id)?;
        page.title.set_raw(language, title);
        self.save_subtree(page, Vec::new())
    }

    /// Delete a page without children.
    pub fn remove_page(&mut self, id: PageId) -> Result<(), SiteError> {
        self.page(id)?;
        self.store.delete(id)?;
        info!(page = %id, "removed page");
        Ok(())
    }

    /// Re-prepare and save every page, parents before children.
    ///
    /// Fills slugs and breadcrumb titles that are missing, e.g. after a
    /// language was added to the configuration. Pages whose parent chain
    /// never reaches a root of the site (a stored loop, a missing parent)
    /// are left as they are and listed in the summary.
    pub fn resave_all(&mut self) -> Result<ResaveSummary, SiteError> {
        let pages = self.store.pages(self.site)?;
        let (ordered, stranded) = parents_first(&pages);
        let mut saved = 0;
        for id in ordered {
            let mut page = self.page(id)?;
            self.prepare(&mut page)?;
            self.ensure_slugs_free(&[&page])?;
            self.store.save(&mut page)?;
            saved += 1;
        }
        if !stranded.is_empty() {
            warn!(site = %self.site, pages = ?stranded, "skipped pages without a path to a root");
        }
        info!(site = %self.site, pages = saved, "resaved pages");
        Ok(ResaveSummary { saved, stranded })
    }

    fn expand_slug(&self, slug: &str, parent: Option<&Page>) -> Result<String, SiteError> {
        let slug = slug.trim_matches('/');
        if slug.is_empty() {
            return Err(SiteError::EmptySlug);
        }
        if slug.contains('/') {
            Ok(slug.to_string())
        } else {
            Ok(join_slug(parent.map(|p| p.slug.as_str()), slug))
        }
    }

    fn generate_slug(&self, page: &Page, parent: Option<&Page>) -> Result<String, SiteError> {
        let mut leaf = slugify(page.title.get(&self.ctx));
        if leaf.is_empty() {
            leaf = FALLBACK_LEAF.to_string();
        }
        let base = join_slug(parent.map(|p| p.slug.as_str()), &leaf);
        let taken: HashSet<String> = self
            .store
            .pages(self.site)?
            .into_iter()
            .filter(|p| p.id != page.id)
            .map(|p| p.slug)
            .collect();
        let slug = naming::unique_slug(&base, |candidate| taken.contains(candidate));
        debug!(slug = %slug, "generated slug");
        Ok(slug)
    }

    /// Fail if any of `pages` would take a slug owned by a page outside the
    /// set.
    fn ensure_slugs_free(&self, pages: &[&Page]) -> Result<(), SiteError> {
        let moving: HashSet<PageId> = pages
            .iter()
            .map(|p| p.id)
            .filter(|id| !id.is_unsaved())
            .collect();
        let wanted: Vec<String> = pages.iter().map(|p| p.slug.clone()).collect();
        let clash = self
            .store
            .find_by_slugs(self.site, &wanted)?
            .into_iter()
            .find(|owner| !moving.contains(&owner.id));
        match clash {
            Some(owner) => Err(SiteError::SlugTaken {
                slug: owner.slug,
                owner: owner.id,
            }),
            None => Ok(()),
        }
    }

    /// Prepare `page` and every descendant, parents first, using the
    /// rewritten copies where the hierarchy produced them, then write them
    /// all in one batch.
    fn save_subtree(&mut self, mut page: Page, rewritten: Vec<Page>) -> Result<Page, SiteError> {
        let mut subtree = vec![&page];
        subtree.extend(rewritten.iter());
        self.ensure_slugs_free(&subtree)?;

        let mut rewritten: HashMap<PageId, Page> =
            rewritten.into_iter().map(|p| (p.id, p)).collect();
        let below = hierarchy::descendants(&self.store, &page)?;

        self.prepare(&mut page)?;
        let mut chains: HashMap<PageId, Vec<Page>> = HashMap::new();
        chains.insert(page.id, chain_through(&page));
        let mut batch = vec![page];
        for stored in below {
            let mut descendant = rewritten.remove(&stored.id).unwrap_or(stored);
            // The store still holds the subtree's old slugs and titles.
            descendant.ascendants = descendant
                .parent_id
                .and_then(|id| chains.get(&id))
                .cloned();
            self.prepare(&mut descendant)?;
            chains.insert(descendant.id, chain_through(&descendant));
            batch.push(descendant);
        }
        self.store.save_all(&mut batch)?;
        let saved = batch.len();
        let page = batch.swap_remove(0);
        debug!(page = %page.id, slug = %page.slug, pages = saved, "saved page subtree");
        Ok(page)
    }
}

/// Outcome of [`Site::resave_all`].
#[derive(Debug, Default, PartialEq)]
pub struct ResaveSummary {
    pub saved: usize,
    /// Pages skipped because their parent chain never reaches a root.
    pub stranded: Vec<PageId>,
}

/// `page` followed by its cached ancestors: the ancestor chain of its
/// children.
fn chain_through(page: &Page) -> Vec<Page> {
    let mut head = page.clone();
    let above = head.ascendants.take().unwrap_or_default();
    let mut chain = Vec::with_capacity(above.len() + 1);
    chain.push(head);
    chain.extend(above);
    chain
}

/// Title segment for a breadcrumb: the resolved value, or the default
/// language's stored value when resolution finds nothing.
fn breadcrumb_part<'a>(title: &'a TranslatedField, ctx: &LanguageContext) -> &'a str {
    match title.get(ctx) {
        "" => title.raw(ctx.default_language()),
        resolved => resolved,
    }
}

/// Rebuild `titles` for every language: ancestor titles root-first, then
/// the page's own, joined by `" / "`. Segments empty even in the default
/// language are skipped rather than leaving `" /  / "` gaps.
fn refresh_titles(ctx: &mut LanguageContext, page: &mut Page, ancestors: &[Page]) {
    let (title, titles) = (&page.title, &mut page.titles);
    let result = ctx.for_all_languages(|c| {
        let parts: Vec<&str> = ancestors
            .iter()
            .rev()
            .map(|p| breadcrumb_part(&p.title, c))
            .chain(std::iter::once(breadcrumb_part(title, c)))
            .filter(|t| !t.is_empty())
            .collect();
        titles.set(c, parts.join(" / "));
        Ok::<_, Infallible>(())
    });
    if let Err(never) = result {
        match never {}
    }
}

/// Page ids ordered so every parent precedes its children, plus, in id
/// order, the pages no root reaches: parent loops, parents missing from the
/// site, and everything below them.
fn parents_first(pages: &[Page]) -> (Vec<PageId>, Vec<PageId>) {
    let mut children: HashMap<Option<PageId>, Vec<PageId>> = HashMap::new();
    for page in pages {
        children.entry(page.parent_id).or_default().push(page.id);
    }
    let mut ordered = Vec::with_capacity(pages.len());
    let mut frontier = children.remove(&None).unwrap_or_default();
    while !frontier.is_empty() {
        let mut next = Vec::new();
        for id in frontier {
            ordered.push(id);
            next.extend(children.remove(&Some(id)).unwrap_or_default());
        }
        frontier = next;
    }
    let mut stranded: Vec<PageId> = children.into_values().flatten().collect();
    stranded.sort();
    (ordered, stranded)
}
