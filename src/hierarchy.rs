//! Page hierarchy: slug paths, cycle rejection and ancestor resolution.
//!
//! Every operation here works on in-memory [`Page`] values and reads through
//! a [`PageStore`]. Nothing is saved; callers decide what to persist and
//! when.
//!
//! ## Reparenting
//!
//! [`set_parent`] first walks the new parent's ancestor chain up to the root.
//! Meeting the page itself on the way means the move would create a cycle,
//! and the call fails before touching anything. Otherwise the page's leaf
//! segment is re-rooted under the new parent and the prefix change is
//! pushed down to every descendant whose slug still follows the tree.
//!
//! ## Ancestor Resolution
//!
//! [`get_ascendants`] returns parent, grandparent, …, root. Two strategies:
//!
//! ```text
//! slug "a/b/c"
//!   batch:     find_by_slugs(["a", "a/b", "a/b/c"])     1 query
//!              → accepted only if parent ids link up to a root
//!   recursive: get(parent) → get(grandparent) → …        1 query per level
//! ```
//!
//! The batch strategy assumes slug prefixes mirror the parent chain. Any
//! page with a custom slug on the way breaks that, and any mismatch at all
//! sends the whole resolution down the recursive path. The result is cached
//! on the page instance.

use crate::naming::{self, join_slug, strip_parent_prefix};
use crate::page::{Page, PageId, SiteId};
use crate::store::{PageStore, StoreError};
use std::collections::{HashSet, VecDeque};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("Page {parent} cannot become the parent of page {page}: it is the page itself or one of its descendants")]
    Cycle { page: PageId, parent: PageId },
    #[error("Parent page {0} does not exist")]
    MissingParent(PageId),
    #[error("Stored parent links of page {0} loop back on themselves")]
    ParentLoop(PageId),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Fail with [`HierarchyError::Cycle`] if `new_parent` is `page` or one of
/// its descendants.
pub fn check_parent<S: PageStore + ?Sized>(
    store: &S,
    page: &Page,
    new_parent: &Page,
) -> Result<(), HierarchyError> {
    let cycle = || HierarchyError::Cycle {
        page: page.id,
        parent: new_parent.id,
    };
    // An unsaved page has no descendants, and id 0 would match other
    // unsaved pages.
    if page.id.is_unsaved() {
        return Ok(());
    }
    if new_parent.id == page.id {
        return Err(cycle());
    }
    let mut seen = HashSet::from([new_parent.id]);
    let mut next = new_parent.parent_id;
    while let Some(id) = next {
        // A loop that doesn't pass through `page` is already corrupt data.
        if id == page.id || !seen.insert(id) {
            return Err(cycle());
        }
        let ancestor = store.get(id)?.ok_or(HierarchyError::MissingParent(id))?;
        next = ancestor.parent_id;
    }
    Ok(())
}

/// Move `page` under `new_parent` (or make it a root with `None`).
///
/// Returns the descendants whose slugs were rewritten, parents before
/// children, for the caller to save along with `page`. On error nothing has
/// been modified. A page without a slug only has its parent changed; its
/// slug is generated when it is prepared for saving.
pub fn set_parent<S: PageStore + ?Sized>(
    store: &S,
    page: &mut Page,
    new_parent: Option<&Page>,
) -> Result<Vec<Page>, HierarchyError> {
    if let Some(parent) = new_parent {
        if let Err(err) = check_parent(store, page, parent) {
            debug!(page = %page.id, parent = %parent.id, "rejected reparenting: {err}");
            return Err(err);
        }
    }

    let old_parent_slug = match page.parent_id {
        Some(id) => match store.get(id)? {
            Some(old) => Some(old.slug),
            None => {
                warn!(page = %page.id, parent = %id, "previous parent is missing; keeping slug as leaf");
                None
            }
        },
        None => None,
    };
    let leaf = match &old_parent_slug {
        Some(prefix) => strip_parent_prefix(&page.slug, prefix),
        None => page.slug.as_str(),
    }
    .to_string();

    let rewritten = if leaf.is_empty() {
        Vec::new()
    } else {
        let new_slug = join_slug(new_parent.map(|p| p.slug.as_str()), &leaf);
        set_slug(store, page, &new_slug)?
    };
    page.parent_id = new_parent.map(|p| p.id);
    page.forget_ascendants();
    Ok(rewritten)
}

/// Give `page` a new full slug and carry the prefix change to descendants.
///
/// Descendants whose slug starts with `old_slug/` get that prefix replaced
/// by `new_slug/`. Descendants with custom slugs keep them. Parentage is
/// untouched. Returns the rewritten descendants, parents before children.
pub fn set_slug<S: PageStore + ?Sized>(
    store: &S,
    page: &mut Page,
    new_slug: &str,
) -> Result<Vec<Page>, HierarchyError> {
    if page.slug == new_slug {
        return Ok(Vec::new());
    }
    let mut rewritten = Vec::new();
    if !page.id.is_unsaved() && !page.slug.is_empty() {
        let old_prefix = format!("{}/", page.slug);
        for mut descendant in descendants(store, page)? {
            match descendant.slug.strip_prefix(&old_prefix) {
                Some(rest) => {
                    descendant.slug = format!("{new_slug}/{rest}");
                    rewritten.push(descendant);
                }
                None => {
                    debug!(page = %descendant.id, slug = %descendant.slug, "custom slug left unchanged");
                }
            }
        }
    }
    page.slug = new_slug.to_string();
    Ok(rewritten)
}

/// All descendants of `page`, breadth-first.
pub fn descendants<S: PageStore + ?Sized>(
    store: &S,
    page: &Page,
) -> Result<Vec<Page>, HierarchyError> {
    let mut found = Vec::new();
    let mut seen = HashSet::from([page.id]);
    let mut queue = VecDeque::from([page.id]);
    while let Some(id) = queue.pop_front() {
        for child in store.children(id)? {
            if seen.insert(child.id) {
                queue.push_back(child.id);
                found.push(child);
            }
        }
    }
    Ok(found)
}

/// Ancestors of `page`, closest first, cached on the instance.
///
/// A root page resolves to an empty list without any query. Otherwise the
/// batch strategy runs unless an earlier lookup already left a result on
/// the page; an empty result for a page that has a parent means the batch
/// strategy failed, and the chain is walked one parent at a time.
pub fn get_ascendants<'p, S: PageStore + ?Sized>(
    store: &S,
    page: &'p mut Page,
) -> Result<&'p [Page], HierarchyError> {
    if page.parent_id.is_none() {
        let empty = page.ascendants.get_or_insert_with(Vec::new);
        return Ok(empty.as_slice());
    }
    let resolved = match page.ascendants.take() {
        Some(cached) if !cached.is_empty() => cached,
        Some(_) => recursive_ascendants(store, page)?,
        None => {
            let batch = batch_ascendants(store, page)?;
            if batch.is_empty() {
                debug!(page = %page.id, slug = %page.slug, "slug prefixes don't match the parent chain; resolving recursively");
                recursive_ascendants(store, page)?
            } else {
                batch
            }
        }
    };
    Ok(page.ascendants.insert(resolved).as_slice())
}

/// The deepest page matching `slug` or one of its prefixes, followed by
/// the other matches, longest slug first. One query.
///
/// The first page has its ancestor cache set: the full chain when the
/// matches link up through parent ids to a root, an empty list otherwise
/// (so [`get_ascendants`] on it walks the chain instead).
pub fn with_ascendants_for_slug<S: PageStore + ?Sized>(
    store: &S,
    site: SiteId,
    slug: &str,
) -> Result<Vec<Page>, HierarchyError> {
    let prefixes = naming::slug_prefixes(slug);
    if prefixes.is_empty() {
        return Ok(Vec::new());
    }
    let mut pages = store.find_by_slugs(site, &prefixes)?;
    pages.sort_by(|a, b| b.slug.len().cmp(&a.slug.len()));
    if let Some((deepest, rest)) = pages.split_first_mut() {
        let expected = naming::slug_prefixes(&deepest.slug).len().saturating_sub(1);
        let chain = contiguous_chain(deepest.parent_id, rest, expected);
        deepest.ascendants = Some(chain.unwrap_or_default());
    }
    Ok(pages)
}

fn batch_ascendants<S: PageStore + ?Sized>(
    store: &S,
    page: &Page,
) -> Result<Vec<Page>, HierarchyError> {
    if page.slug.is_empty() {
        return Ok(Vec::new());
    }
    let pages = with_ascendants_for_slug(store, page.site_id, &page.slug)?;
    Ok(pages
        .into_iter()
        .next()
        .filter(|deepest| deepest.id == page.id && deepest.slug == page.slug)
        .and_then(|deepest| deepest.ascendants)
        .unwrap_or_default())
}

/// `candidates` (longest slug first) as an ancestor chain starting at
/// `parent`, or `None` if any link is missing or the level count is off.
fn contiguous_chain(parent: Option<PageId>, candidates: &[Page], expected: usize) -> Option<Vec<Page>> {
    if candidates.len() != expected {
        return None;
    }
    let mut next = parent;
    for candidate in candidates {
        if next != Some(candidate.id) {
            return None;
        }
        next = candidate.parent_id;
    }
    next.is_none().then(|| candidates.to_vec())
}

fn recursive_ascendants<S: PageStore + ?Sized>(
    store: &S,
    page: &Page,
) -> Result<Vec<Page>, HierarchyError> {
    let mut chain = Vec::new();
    let mut seen = HashSet::from([page.id]);
    let mut next = page.parent_id;
    while let Some(id) = next {
        if !seen.insert(id) {
            return Err(HierarchyError::ParentLoop(page.id));
        }
        let parent = store.get(id)?.ok_or(HierarchyError::MissingParent(id))?;
        next = parent.parent_id;
        chain.push(parent);
    }
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_helpers::*;
    use crate::translation::TranslatedField;

    // =========================================================================
    // set_parent
    // =========================================================================

    #[test]
    fn set_parent_moves_between_parents_and_back_to_root() {
        let mut store = MemoryStore::new();
        let old_parent = add_page(&mut store, None, "old-parent");
        let new_parent = add_page(&mut store, None, "new-parent");
        let mut child = add_page(&mut store, None, "kid");

        set_parent(&store, &mut child, Some(&old_parent)).unwrap();
        store.save(&mut child).unwrap();
        assert_eq!(child.parent_id, Some(old_parent.id));
        assert_eq!(child.slug, "old-parent/kid");

        set_parent(&store, &mut child, Some(&new_parent)).unwrap();
        store.save(&mut child).unwrap();
        assert_eq!(reload(&store, &child).slug, "new-parent/kid");

        set_parent(&store, &mut child, None).unwrap();
        store.save(&mut child).unwrap();
        let child = reload(&store, &child);
        assert!(child.is_root());
        assert_eq!(child.slug, "kid");
    }

    #[test]
    fn set_parent_rewrites_every_descendant() {
        let mut store = MemoryStore::new();
        let pages = chain(&mut store, &["a", "b", "c", "d"]);
        let target = add_page(&mut store, None, "t");
        let mut b = reload(&store, &pages[1]);

        let rewritten = set_parent(&store, &mut b, Some(&target)).unwrap();
        assert_eq!(b.slug, "t/b");
        assert_eq!(slugs(&rewritten), vec!["t/b/c", "t/b/c/d"]);
        assert_eq!(ids(&rewritten), vec![pages[2].id, pages[3].id]);
    }

    #[test]
    fn set_parent_does_not_save() {
        let mut store = MemoryStore::new();
        let parent = add_page(&mut store, None, "p");
        let mut kid = add_page(&mut store, None, "kid");
        let grandkid = add_page(&mut store, Some(&kid), "g");

        set_parent(&store, &mut kid, Some(&parent)).unwrap();
        assert_eq!(reload(&store, &kid).slug, "kid");
        assert_eq!(reload(&store, &grandkid).slug, "kid/g");
    }

    #[test]
    fn set_parent_keeps_custom_descendant_slug() {
        let mut store = MemoryStore::new();
        let a = add_page(&mut store, None, "a");
        let mut custom = add_page(&mut store, Some(&a), "b");
        custom.slug = "somewhere-else".into();
        store.save(&mut custom).unwrap();
        let below = add_page(&mut store, Some(&custom), "c");
        let target = add_page(&mut store, None, "t");

        let mut a = reload(&store, &a);
        let rewritten = set_parent(&store, &mut a, Some(&target)).unwrap();
        assert_eq!(a.slug, "t/a");
        // The custom slug is untouched, and so is its subtree: its prefix
        // never contained "a/".
        assert!(rewritten.is_empty());
        assert_eq!(reload(&store, &below).slug, "somewhere-else/c");
    }

    #[test]
    fn set_parent_on_unsaved_page_without_slug() {
        let mut store = MemoryStore::new();
        let parent = add_page(&mut store, None, "new-parent");
        let mut page = Page::new(SITE, TranslatedField::new().with("en", "child2"));
        let rewritten = set_parent(&store, &mut page, Some(&parent)).unwrap();
        assert!(rewritten.is_empty());
        assert_eq!(page.parent_id, Some(parent.id));
        assert!(page.slug.is_empty());
    }

    #[test]
    fn set_parent_to_self_is_cycle() {
        let mut store = MemoryStore::new();
        let mut p1 = add_page(&mut store, None, "p1");
        let same = reload(&store, &p1);
        let err = set_parent(&store, &mut p1, Some(&same)).unwrap_err();
        assert!(matches!(err, HierarchyError::Cycle { .. }));
        assert!(p1.is_root());
        assert_eq!(p1.slug, "p1");
    }

    #[test]
    fn set_parent_to_descendant_is_cycle() {
        let mut store = MemoryStore::new();
        let pages = chain(&mut store, &["p1", "p2", "p3"]);
        let mut p1 = reload(&store, &pages[0]);
        for descendant in &pages[1..] {
            let err = set_parent(&store, &mut p1, Some(descendant)).unwrap_err();
            match err {
                HierarchyError::Cycle { page, parent } => {
                    assert_eq!(page, p1.id);
                    assert_eq!(parent, descendant.id);
                }
                other => panic!("expected cycle, got {other}"),
            }
        }
        assert!(p1.is_root());
        assert_eq!(p1.slug, "p1");
    }

    /// Serves everything from a [`MemoryStore`] except `children`, which fails.
    struct ChildrenUnavailable(MemoryStore);

    impl PageStore for ChildrenUnavailable {
        fn find_by_slugs(&self, site: SiteId, slugs: &[String]) -> Result<Vec<Page>, StoreError> {
            self.0.find_by_slugs(site, slugs)
        }
        fn get(&self, id: PageId) -> Result<Option<Page>, StoreError> {
            self.0.get(id)
        }
        fn children(&self, _id: PageId) -> Result<Vec<Page>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("children unavailable")))
        }
        fn pages(&self, site: SiteId) -> Result<Vec<Page>, StoreError> {
            self.0.pages(site)
        }
        fn save_all(&mut self, pages: &mut [Page]) -> Result<(), StoreError> {
            self.0.save_all(pages)
        }
        fn delete(&mut self, id: PageId) -> Result<(), StoreError> {
            self.0.delete(id)
        }
    }

    #[test]
    fn set_parent_store_failure_leaves_page_untouched() {
        let mut store = MemoryStore::new();
        let old = add_page(&mut store, None, "old");
        let target = add_page(&mut store, None, "target");
        let page = add_page(&mut store, Some(&old), "kid");
        let store = ChildrenUnavailable(store);

        let mut moving = reload(&store.0, &page);
        let err = set_parent(&store, &mut moving, Some(&target)).unwrap_err();
        assert!(matches!(err, HierarchyError::Store(StoreError::Io(_))));
        assert_eq!(moving.parent_id, Some(old.id));
        assert_eq!(moving.slug, "old/kid");
    }

    #[test]
    fn cycle_check_detects_corrupt_loop() {
        let mut store = MemoryStore::new();
        let mut x = add_page(&mut store, None, "x");
        let mut y = add_page(&mut store, Some(&x), "y");
        x.parent_id = Some(y.id);
        store.save(&mut x).unwrap();
        y = reload(&store, &y);
        let mut other = add_page(&mut store, None, "other");
        assert!(matches!(
            set_parent(&store, &mut other, Some(&y)),
            Err(HierarchyError::Cycle { .. })
        ));
    }

    #[test]
    fn cycle_check_reports_missing_ancestor() {
        let mut store = MemoryStore::new();
        let mut orphan = add_page(&mut store, None, "orphan");
        orphan.parent_id = Some(PageId(99));
        store.save(&mut orphan).unwrap();
        let mut page = add_page(&mut store, None, "page");
        assert!(matches!(
            set_parent(&store, &mut page, Some(&orphan)),
            Err(HierarchyError::MissingParent(PageId(99)))
        ));
    }

    // =========================================================================
    // set_slug
    // =========================================================================

    #[test]
    fn set_slug_propagates_to_children() {
        let mut store = MemoryStore::new();
        let mut parent = add_page(&mut store, None, "parent");
        let child = add_page(&mut store, Some(&parent), "child");

        let rewritten = set_slug(&store, &mut parent, "new-parent-slug").unwrap();
        assert_eq!(parent.slug, "new-parent-slug");
        assert_eq!(slugs(&rewritten), vec!["new-parent-slug/child"]);
        assert_eq!(rewritten[0].id, child.id);
        assert_eq!(rewritten[0].parent_id, Some(parent.id));
    }

    #[test]
    fn set_slug_same_value_is_noop() {
        let mut store = MemoryStore::new();
        let pages = chain(&mut store, &["a", "b"]);
        let mut a = reload(&store, &pages[0]);
        store.reset_queries();
        assert!(set_slug(&store, &mut a, "a").unwrap().is_empty());
        assert_eq!(store.queries(), 0);
    }

    // =========================================================================
    // get_ascendants
    // =========================================================================

    #[test]
    fn ascendants_of_root_is_empty_without_queries() {
        let mut store = MemoryStore::new();
        let root = add_page(&mut store, None, "root");
        let mut root = reload(&store, &root);
        store.reset_queries();
        assert!(get_ascendants(&store, &mut root).unwrap().is_empty());
        assert_eq!(store.queries(), 0);
    }

    #[test]
    fn ascendants_use_single_batch_query() {
        let mut store = MemoryStore::new();
        let pages = chain(&mut store, &["root", "a", "b", "c"]);
        let mut c = reload(&store, &pages[3]);

        store.reset_queries();
        let found = get_ascendants(&store, &mut c).unwrap();
        assert_eq!(
            ids(found),
            vec![pages[2].id, pages[1].id, pages[0].id]
        );
        assert_eq!(store.queries(), 1);
    }

    #[test]
    fn ascendants_are_cached_on_the_instance() {
        let mut store = MemoryStore::new();
        let pages = chain(&mut store, &["root", "a", "b"]);
        let mut b = reload(&store, &pages[2]);
        get_ascendants(&store, &mut b).unwrap();

        store.reset_queries();
        let again = get_ascendants(&store, &mut b).unwrap();
        assert_eq!(ids(again), vec![pages[1].id, pages[0].id]);
        assert_eq!(store.queries(), 0);
    }

    #[test]
    fn custom_slug_falls_back_to_recursive_walk() {
        let mut store = MemoryStore::new();
        let pages = chain(&mut store, &["root", "a", "b", "c"]);
        let mut b = reload(&store, &pages[2]);
        b.slug.push_str("custom");
        store.save(&mut b).unwrap();

        let mut c = reload(&store, &pages[3]);
        store.reset_queries();
        let found = get_ascendants(&store, &mut c).unwrap();
        assert_eq!(
            ids(found),
            vec![pages[2].id, pages[1].id, pages[0].id]
        );
        // One batch query, then one query per level.
        assert_eq!(store.queries(), 4);
    }

    #[test]
    fn divergence_higher_up_also_falls_back() {
        let mut store = MemoryStore::new();
        let pages = chain(&mut store, &["root", "a", "b", "c"]);
        let mut a = reload(&store, &pages[1]);
        a.slug = "elsewhere".into();
        store.save(&mut a).unwrap();

        let mut c = reload(&store, &pages[3]);
        let found = get_ascendants(&store, &mut c).unwrap();
        assert_eq!(
            ids(found),
            vec![pages[2].id, pages[1].id, pages[0].id]
        );
    }

    #[test]
    fn set_parent_invalidates_cached_ascendants() {
        let mut store = MemoryStore::new();
        let pages = chain(&mut store, &["root", "a"]);
        let other = add_page(&mut store, None, "other");
        let mut a = reload(&store, &pages[1]);
        get_ascendants(&store, &mut a).unwrap();
        assert!(a.cached_ascendants().is_some());

        set_parent(&store, &mut a, Some(&other)).unwrap();
        assert!(a.cached_ascendants().is_none());
        store.save(&mut a).unwrap();
        assert_eq!(ids(get_ascendants(&store, &mut a).unwrap()), vec![other.id]);
    }

    #[test]
    fn recursive_walk_reports_missing_parent() {
        let mut store = MemoryStore::new();
        let mut orphan = add_page(&mut store, None, "orphan");
        orphan.parent_id = Some(PageId(42));
        store.save(&mut orphan).unwrap();
        let mut orphan = reload(&store, &orphan);
        assert!(matches!(
            get_ascendants(&store, &mut orphan),
            Err(HierarchyError::MissingParent(PageId(42)))
        ));
    }

    // =========================================================================
    // with_ascendants_for_slug
    // =========================================================================

    #[test]
    fn with_ascendants_for_slug_orders_deepest_first() {
        let mut store = MemoryStore::new();
        let pages = chain(&mut store, &["primary", "secondary", "tertiary"]);

        store.reset_queries();
        let mut found = with_ascendants_for_slug(&store, SITE, &pages[2].slug).unwrap();
        assert_eq!(store.queries(), 1);
        assert_eq!(ids(&found), vec![pages[2].id, pages[1].id, pages[0].id]);

        store.reset_queries();
        let ascendants = get_ascendants(&store, &mut found[0]).unwrap();
        assert_eq!(ids(ascendants), vec![pages[1].id, pages[0].id]);
        assert_eq!(store.queries(), 0);
    }

    #[test]
    fn with_ascendants_for_slug_leaves_empty_cache_on_mismatch() {
        let mut store = MemoryStore::new();
        let pages = chain(&mut store, &["primary", "secondary", "tertiary"]);
        let mut secondary = reload(&store, &pages[1]);
        secondary.slug.push_str("custom");
        store.save(&mut secondary).unwrap();

        let mut found = with_ascendants_for_slug(&store, SITE, &pages[2].slug).unwrap();
        assert_eq!(found[0].id, pages[2].id);
        assert_eq!(found[0].cached_ascendants().map(<[Page]>::len), Some(0));

        store.reset_queries();
        let ascendants = get_ascendants(&store, &mut found[0]).unwrap();
        assert_eq!(ids(ascendants), vec![pages[1].id, pages[0].id]);
        assert_eq!(store.queries(), 2);
    }

    #[test]
    fn with_ascendants_for_slug_matches_deepest_existing_prefix() {
        let mut store = MemoryStore::new();
        let pages = chain(&mut store, &["about", "team"]);
        let found = with_ascendants_for_slug(&store, SITE, "about/team/nobody").unwrap();
        assert_eq!(ids(&found), vec![pages[1].id, pages[0].id]);
        assert_eq!(
            found[0].cached_ascendants().map(ids),
            Some(vec![pages[0].id])
        );
    }

    #[test]
    fn with_ascendants_for_slug_unknown_is_empty() {
        let store = MemoryStore::new();
        assert!(with_ascendants_for_slug(&store, SITE, "nope").unwrap().is_empty());
        assert!(with_ascendants_for_slug(&store, SITE, "").unwrap().is_empty());
    }

    #[test]
    fn recursive_walk_reports_parent_loop() {
        let mut store = MemoryStore::new();
        let mut x = add_page(&mut store, None, "x");
        let y = add_page(&mut store, Some(&x), "y");
        x.parent_id = Some(y.id);
        store.save(&mut x).unwrap();
        let mut y = reload(&store, &y);
        let err = get_ascendants(&store, &mut y).unwrap_err();
        assert!(matches!(err, HierarchyError::ParentLoop(id) if id == y.id));
        assert_eq!(
            err.to_string(),
            format!("Stored parent links of page {} loop back on themselves", y.id)
        );
    }

    // =========================================================================
    // descendants
    // =========================================================================

    #[test]
    fn descendants_are_breadth_first() {
        let mut store = MemoryStore::new();
        let root = add_page(&mut store, None, "r");
        let a = add_page(&mut store, Some(&root), "a");
        let b = add_page(&mut store, Some(&root), "b");
        add_page(&mut store, Some(&a), "a1");
        add_page(&mut store, Some(&b), "b1");
        let found = descendants(&store, &root).unwrap();
        assert_eq!(slugs(&found), vec!["r/a", "r/b", "r/a/a1", "r/b/b1"]);
    }
}
