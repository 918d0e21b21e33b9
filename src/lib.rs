//! # Simple CMS
//!
//! Page trees addressed by path-like slugs, with per-language content that
//! falls back through configurable language chains.
//!
//! A page's slug is its full path: `about/team/history` is the slug of a page
//! whose parent is `about/team`. That convention is what makes ancestor
//! lookup cheap: every prefix of a slug is a candidate ancestor, so the whole
//! chain can usually be fetched in one store query instead of one query per
//! level.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`page`] | The page node: ids, parent link, slug, translatable titles |
//! | [`naming`] | Slug helpers: slugify, prefixes, parent-prefix stripping, uniqueness |
//! | [`store`] | `PageStore` trait and the JSON-backed in-memory store |
//! | [`hierarchy`] | Parent changes with cycle checks, slug rewriting, ancestor resolution |
//! | [`translation`] | Fallback resolution and the scoped language context |
//! | [`site`] | Site-level operations: create, move, rename, retitle, resave |
//! | [`config`] | `config.toml` loading, validation, and merging over stock defaults |
//! | [`output`] | CLI output formatting: tree, page and ancestor views |
//!
//! # Design Decisions
//!
//! ## Batch First, Walk Second
//!
//! Ancestors are first resolved from slug prefixes in a single query. The
//! result is only trusted when it forms an unbroken parent chain whose
//! length matches the number of slug prefixes; anything else (custom slugs,
//! stale data) falls back to following `parent_id` one query at a time. The
//! resolved chain is cached on the page instance and dropped whenever the
//! parent changes.
//!
//! ## Explicit Language Context
//!
//! There is no process-wide "current language". Every read of a translated
//! field takes a [`translation::LanguageContext`], and the scoped helpers
//! (`for_all_languages`, `disable_fallbacks`) hand out guards that restore
//! the previous state when dropped, including on early return and unwind.

pub mod config;
pub mod hierarchy;
pub mod naming;
pub mod output;
pub mod page;
pub mod site;
pub mod store;
pub mod translation;

#[cfg(test)]
pub(crate) mod test_helpers;
