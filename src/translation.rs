//! Per-language field values and fallback resolution.
//!
//! A translatable field stores one value per language code. Reading it
//! resolves against the *active* language of an explicit [`LanguageContext`]:
//!
//! 1. The active language has a non-empty value → use it.
//! 2. Otherwise, if fallbacks are enabled, walk the configured fallback order
//!    for that language; the first non-empty value wins.
//! 3. Otherwise the result is the empty string. Missing content is never an
//!    error; rendering stays non-fatal.
//!
//! The context is passed around instead of living in a global. Temporary
//! changes to it (switching the active language for every configured
//! language, switching fallbacks off) are made through drop guards, so the
//! previous state comes back on every exit path: normal return, `?`, and
//! panic unwinding alike. Guards nest with stack discipline.
//!
//! ```text
//! values   = { en: "", fr: "bonjour" }
//! fallback = { en: [fr] }
//!
//! get(en)                      → "bonjour"
//! get(en) inside disable_fallbacks → ""
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::mem;
use std::ops::{Deref, DerefMut};

/// Ordered fallback languages per language code.
///
/// A language without its own entry uses the `default` chain, which is empty
/// unless configured, so by default a missing entry yields no candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackTable {
    chains: BTreeMap<String, Vec<String>>,
    default: Vec<String>,
}

impl FallbackTable {
    pub fn new(chains: BTreeMap<String, Vec<String>>, default: Vec<String>) -> Self {
        Self { chains, default }
    }

    /// Builder-style helper used mostly by tests: `en → [fr, de]`.
    pub fn with_chain(mut self, language: &str, order: &[&str]) -> Self {
        self.chains.insert(
            language.to_string(),
            order.iter().map(|l| l.to_string()).collect(),
        );
        self
    }

    /// Languages to consult for `language`, in order, without duplicates and
    /// never including `language` itself.
    pub fn order<'a>(&'a self, language: &'a str) -> Vec<&'a str> {
        let own = self.chains.get(language).map(Vec::as_slice).unwrap_or(&[]);
        let mut order: Vec<&str> = Vec::with_capacity(own.len() + self.default.len());
        for candidate in own.iter().chain(self.default.iter()) {
            let candidate = candidate.as_str();
            if candidate != language && !order.contains(&candidate) {
                order.push(candidate);
            }
        }
        order
    }
}

/// Resolve the effective value of a per-language mapping.
///
/// Pure: no context, no side effects. Returns `""` when neither the active
/// language nor any fallback candidate has a non-empty value.
pub fn resolve<'a>(
    values: &'a BTreeMap<String, String>,
    active: &str,
    table: &FallbackTable,
    fallbacks_enabled: bool,
) -> &'a str {
    if let Some(value) = non_empty(values, active) {
        return value;
    }
    if !fallbacks_enabled {
        return values.get(active).map(String::as_str).unwrap_or("");
    }
    table
        .order(active)
        .into_iter()
        .find_map(|language| non_empty(values, language))
        .unwrap_or("")
}

fn non_empty<'a>(values: &'a BTreeMap<String, String>, language: &str) -> Option<&'a str> {
    values
        .get(language)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

/// A logical field with one stored value per language code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslatedField {
    values: BTreeMap<String, String>,
}

impl TranslatedField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: store `value` for `language`.
    pub fn with(mut self, language: &str, value: &str) -> Self {
        self.values.insert(language.to_string(), value.to_string());
        self
    }

    /// Effective value for the context's active language.
    pub fn get(&self, ctx: &LanguageContext) -> &str {
        resolve(
            &self.values,
            ctx.storage_language(),
            &ctx.fallbacks,
            ctx.fallbacks_enabled(),
        )
    }

    /// Store `value` for the context's active language.
    pub fn set(&mut self, ctx: &LanguageContext, value: impl Into<String>) {
        self.values
            .insert(ctx.storage_language().to_string(), value.into());
    }

    /// Stored value for exactly `language`, no fallback.
    pub fn raw(&self, language: &str) -> &str {
        self.values.get(language).map(String::as_str).unwrap_or("")
    }

    pub fn set_raw(&mut self, language: &str, value: impl Into<String>) {
        self.values.insert(language.to_string(), value.into());
    }

    pub fn has_value(&self, language: &str) -> bool {
        !self.raw(language).is_empty()
    }

    /// True when no language has a non-empty value.
    pub fn is_empty(&self) -> bool {
        self.values.values().all(String::is_empty)
    }
}

/// Ambient language state for one logical operation.
///
/// Holds the available languages, the active one, the fallback table, and
/// whether fallbacks are currently enabled. When content translation is
/// turned off, every field has a single value stored under the default
/// language and the scoped helpers run their bodies without switching
/// anything.
#[derive(Debug, Clone)]
pub struct LanguageContext {
    languages: Vec<String>,
    default_language: String,
    active: String,
    translation_enabled: bool,
    fallbacks_enabled: bool,
    fallbacks: FallbackTable,
}

impl LanguageContext {
    /// Translation enabled, default language active, fallbacks on.
    pub fn new(languages: Vec<String>, default_language: &str, fallbacks: FallbackTable) -> Self {
        Self {
            languages,
            default_language: default_language.to_string(),
            active: default_language.to_string(),
            translation_enabled: true,
            fallbacks_enabled: true,
            fallbacks,
        }
    }

    /// Content translation turned off: one language, no fallbacks to walk.
    pub fn untranslated(default_language: &str) -> Self {
        Self {
            languages: vec![default_language.to_string()],
            default_language: default_language.to_string(),
            active: default_language.to_string(),
            translation_enabled: false,
            fallbacks_enabled: true,
            fallbacks: FallbackTable::default(),
        }
    }

    /// Start with fallbacks switched on or off (the configured default).
    pub fn with_fallbacks_enabled(mut self, enabled: bool) -> Self {
        self.fallbacks_enabled = enabled;
        self
    }

    /// Switch the active language. Unknown codes are accepted as-is.
    pub fn activate(&mut self, language: &str) {
        if self.active != language {
            self.active = language.to_string();
        }
    }

    /// The active language.
    pub fn language(&self) -> &str {
        &self.active
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn translation_enabled(&self) -> bool {
        self.translation_enabled
    }

    pub fn fallbacks_enabled(&self) -> bool {
        self.fallbacks_enabled
    }

    pub fn fallback_table(&self) -> &FallbackTable {
        &self.fallbacks
    }

    /// Language under which field values are read and written.
    fn storage_language(&self) -> &str {
        if self.translation_enabled {
            &self.active
        } else {
            &self.default_language
        }
    }

    /// Guard restoring the current active language when dropped.
    pub fn preserve_language(&mut self) -> LanguageGuard<'_> {
        let saved = self.active.clone();
        LanguageGuard { ctx: self, saved }
    }

    /// Run `action` once per available language with that language active.
    ///
    /// With translation disabled, `action` runs exactly once and nothing is
    /// switched. The previously active language is restored however this
    /// returns; the first error from `action` stops the loop and comes back
    /// unchanged. Values returned by `action` are discarded.
    pub fn for_all_languages<T, E>(
        &mut self,
        mut action: impl FnMut(&mut LanguageContext) -> Result<T, E>,
    ) -> Result<(), E> {
        if !self.translation_enabled {
            action(self)?;
            return Ok(());
        }
        let languages = self.languages.clone();
        let mut guard = self.preserve_language();
        for language in &languages {
            guard.activate(language);
            action(&mut *guard)?;
        }
        Ok(())
    }

    /// Switch fallbacks off until the returned guard is dropped.
    ///
    /// While the guard lives, reading a field yields the raw value of the
    /// active language, empty or not. A no-op scope when translation is
    /// disabled.
    pub fn disable_fallbacks(&mut self) -> FallbackGuard<'_> {
        let saved = self.fallbacks_enabled;
        if self.translation_enabled {
            self.fallbacks_enabled = false;
        }
        FallbackGuard { ctx: self, saved }
    }

    /// Closure form of [`disable_fallbacks`](Self::disable_fallbacks).
    pub fn without_fallbacks<T>(&mut self, body: impl FnOnce(&mut LanguageContext) -> T) -> T {
        let mut guard = self.disable_fallbacks();
        body(&mut *guard)
    }
}

/// Restores the active language on drop.
pub struct LanguageGuard<'a> {
    ctx: &'a mut LanguageContext,
    saved: String,
}

impl Deref for LanguageGuard<'_> {
    type Target = LanguageContext;

    fn deref(&self) -> &LanguageContext {
        self.ctx
    }
}

impl DerefMut for LanguageGuard<'_> {
    fn deref_mut(&mut self) -> &mut LanguageContext {
        self.ctx
    }
}

impl Drop for LanguageGuard<'_> {
    fn drop(&mut self) {
        self.ctx.active = mem::take(&mut self.saved);
    }
}

/// Restores the previous fallback flag on drop.
pub struct FallbackGuard<'a> {
    ctx: &'a mut LanguageContext,
    saved: bool,
}

impl Deref for FallbackGuard<'_> {
    type Target = LanguageContext;

    fn deref(&self) -> &LanguageContext {
        self.ctx
    }
}

impl DerefMut for FallbackGuard<'_> {
    fn deref_mut(&mut self) -> &mut LanguageContext {
        self.ctx
    }
}

impl Drop for FallbackGuard<'_> {
    fn drop(&mut self) {
        self.ctx.fallbacks_enabled = self.saved;
    }
}
