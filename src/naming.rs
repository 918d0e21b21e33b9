//! Slug conventions shared by every page operation.
//!
//! A page's slug is its full path: the parent's slug, a `/`, then the page's
//! own leaf segment. Root pages have a single segment.
//!
//! ```text
//! about              ← root
//! about/team         ← child of "about"
//! about/team/mike    ← grandchild
//! ```
//!
//! Everything here is a pure string function; nothing touches storage.

/// Turn arbitrary text into a single slug segment.
///
/// - `"Old Parent"` → `"old-parent"`
/// - `"  Hello,  World! "` → `"hello-world"`
/// - `"Über uns"` → `"über-uns"`
///
/// Every run of non-alphanumeric characters collapses into one dash, and
/// dashes never lead or trail. Slashes are separators too, so the result is
/// always a single segment.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Join a parent slug and a leaf segment. An empty parent means root.
pub fn join_slug(parent: Option<&str>, leaf: &str) -> String {
    match parent {
        Some(p) if !p.is_empty() => format!("{p}/{leaf}"),
        _ => leaf.to_string(),
    }
}

/// Last segment of a slug (`"a/b/c"` → `"c"`).
pub fn leaf_segment(slug: &str) -> &str {
    slug.rsplit('/').next().unwrap_or(slug)
}

/// Remove `parent_slug/` from the front of `slug` if present.
///
/// A slug that doesn't carry the prefix (a custom slug) is returned whole,
/// so it survives reparenting as the new leaf.
pub fn strip_parent_prefix<'a>(slug: &'a str, parent_slug: &str) -> &'a str {
    if parent_slug.is_empty() {
        return slug;
    }
    slug.strip_prefix(parent_slug)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(slug)
}

/// Cumulative path prefixes, shortest first.
///
/// `"about/team/mike"` → `["about", "about/team", "about/team/mike"]`.
/// Empty segments from doubled or stray slashes are skipped.
pub fn slug_prefixes(slug: &str) -> Vec<String> {
    let mut prefixes = Vec::new();
    let mut current = String::new();
    for segment in slug.split('/').filter(|s| !s.is_empty()) {
        if !current.is_empty() {
            current.push('/');
        }
        current.push_str(segment);
        prefixes.push(current.clone());
    }
    prefixes
}

/// First of `base`, `base-1`, `base-2`, … for which `taken` is false.
pub fn unique_slug(base: &str, mut taken: impl FnMut(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    let mut n = 1u32;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
