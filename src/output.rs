//! CLI output formatting for page commands.
//!
//! # Information-First Display
//!
//! Every page is shown by its title in the active language first, with the
//! slug as secondary context after an arrow. Titles are resolved through the
//! [`LanguageContext`], so `--lang fr` prints French titles (or their
//! fallbacks) and `--no-fallbacks` shows exactly what is stored.
//!
//! # Output Format
//!
//! ## Tree
//!
//! ```text
//! 001 About → about
//!     001 Team → about/team
//!     002 History → about/history
//! 002 Blog → blog
//! ```
//!
//! ## Page
//!
//! ```text
//! Page 2: Team
//!     Slug: about/team
//!     Parent: 1
//!     Breadcrumb: About / Team
//!     Title [en]: Team
//!     Title [fr]: Équipe
//! ```
//!
//! ## Ascendants
//!
//! ```text
//! Team → about/team
//!     1 About → about
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::page::{Page, PageId};
use crate::translation::LanguageContext;
use std::collections::{HashMap, HashSet};

const UNTITLED: &str = "(untitled)";

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn display_title<'a>(page: &'a Page, ctx: &'a LanguageContext) -> &'a str {
    match page.title.get(ctx) {
        "" => UNTITLED,
        title => title,
    }
}

/// `Title → slug`
fn page_line(page: &Page, ctx: &LanguageContext) -> String {
    format!("{} → {}", display_title(page, ctx), page.slug)
}

// ============================================================================
// Tree walker
// ============================================================================

/// A flattened node from walking the page tree.
struct TreeNode<'a> {
    depth: usize,
    position: usize,
    page: &'a Page,
}

/// Walk the parent links from the roots down, siblings ordered by slug.
/// Pages a root can't reach (a parent loop) are returned separately.
fn walk_page_tree(pages: &[Page]) -> (Vec<TreeNode<'_>>, Vec<&Page>) {
    let known: HashSet<PageId> = pages.iter().map(|p| p.id).collect();
    let mut children: HashMap<Option<PageId>, Vec<&Page>> = HashMap::new();
    for page in pages {
        let parent = page.parent_id.filter(|id| known.contains(id));
        children.entry(parent).or_default().push(page);
    }
    for siblings in children.values_mut() {
        siblings.sort_by(|a, b| a.slug.cmp(&b.slug));
    }

    let mut nodes = Vec::new();
    walk_page_tree_recursive(None, 0, &mut children, &mut nodes);

    let mut unreachable: Vec<&Page> = children.into_values().flatten().collect();
    unreachable.sort_by_key(|p| p.id);
    (nodes, unreachable)
}

fn walk_page_tree_recursive<'a>(
    parent: Option<PageId>,
    depth: usize,
    children: &mut HashMap<Option<PageId>, Vec<&'a Page>>,
    nodes: &mut Vec<TreeNode<'a>>,
) {
    let Some(siblings) = children.remove(&parent) else {
        return;
    };
    for (i, page) in siblings.into_iter().enumerate() {
        nodes.push(TreeNode {
            depth,
            position: i + 1,
            page,
        });
        walk_page_tree_recursive(Some(page.id), depth + 1, children, nodes);
    }
}

// ============================================================================
// Views
// ============================================================================

/// Format every page of a site as an indented tree.
pub fn format_tree(pages: &[Page], ctx: &LanguageContext) -> Vec<String> {
    if pages.is_empty() {
        return vec!["No pages".to_string()];
    }
    let (nodes, unreachable) = walk_page_tree(pages);
    let mut lines: Vec<String> = nodes
        .iter()
        .map(|node| {
            format!(
                "{}{} {}",
                indent(node.depth),
                format_index(node.position),
                page_line(node.page, ctx)
            )
        })
        .collect();
    if !unreachable.is_empty() {
        lines.push(String::new());
        lines.push("Unreachable (parent loop)".to_string());
        for page in unreachable {
            lines.push(format!("    {} {}", page.id, page_line(page, ctx)));
        }
    }
    lines
}

pub fn print_tree(pages: &[Page], ctx: &LanguageContext) {
    for line in format_tree(pages, ctx) {
        println!("{}", line);
    }
}

/// Format a single page with every stored title translation.
pub fn format_page(page: &Page, ctx: &LanguageContext) -> Vec<String> {
    let mut lines = vec![format!("Page {}: {}", page.id, display_title(page, ctx))];
    lines.push(format!("    Slug: {}", page.slug));
    match page.parent_id {
        Some(parent) => lines.push(format!("    Parent: {}", parent)),
        None => lines.push("    Parent: (root)".to_string()),
    }
    let breadcrumb = page.titles.get(ctx);
    if !breadcrumb.is_empty() {
        lines.push(format!("    Breadcrumb: {}", breadcrumb));
    }
    for language in ctx.languages() {
        if page.title.has_value(language) {
            lines.push(format!("    Title [{}]: {}", language, page.title.raw(language)));
        }
    }
    lines
}

pub fn print_page(page: &Page, ctx: &LanguageContext) {
    for line in format_page(page, ctx) {
        println!("{}", line);
    }
}

/// Format a page followed by its ancestors, closest first.
pub fn format_ascendants(page: &Page, ascendants: &[Page], ctx: &LanguageContext) -> Vec<String> {
    let mut lines = vec![page_line(page, ctx)];
    if ascendants.is_empty() {
        lines.push("    (root page)".to_string());
    }
    for (i, ancestor) in ascendants.iter().enumerate() {
        lines.push(format!("    {} {}", i + 1, page_line(ancestor, ctx)));
    }
    lines
}

pub fn print_ascendants(page: &Page, ascendants: &[Page], ctx: &LanguageContext) {
    for line in format_ascendants(page, ascendants, ctx) {
        println!("{}", line);
    }
}
