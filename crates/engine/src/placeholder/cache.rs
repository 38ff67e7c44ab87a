//! Memoization of placeholder lookups

use super::parse::Placeholder;
use std::collections::HashMap;

/// Filters that change *what* data a placeholder produces
///
/// Everything else (`separated-by`, `replace`, `with`) only changes how the
/// data is printed and never splits the cache.
pub const DATA_FILTERS: &[&str] = &[
    "of-type",
    "in-dir",
    "diff-filter",
    "compare-to",
    "value-of",
    "default",
];

/// Cache key: placeholder name plus its sorted data filters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a placeholder as written
    #[must_use]
    pub fn for_placeholder(placeholder: &Placeholder) -> Self {
        let mut filters: Vec<String> = placeholder
            .filters
            .iter()
            .filter(|f| DATA_FILTERS.contains(&f.name.as_str()))
            .map(|f| format!("{}:{}", f.name, f.argument.as_deref().unwrap_or_default()))
            .collect();
        filters.sort();
        filters.dedup();
        Self::with_filters(&placeholder.name, &filters)
    }

    /// Key from a name and already-normalized filters
    #[must_use]
    pub fn with_filters(name: &str, filters: &[String]) -> Self {
        let mut key = name.to_string();
        for filter in filters {
            key.push('|');
            key.push_str(filter);
        }
        Self(key)
    }

    /// Key without any filter
    #[must_use]
    pub fn bare(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Resolved values keyed by [`CacheKey`]
#[derive(Debug, Default)]
pub struct PlaceholderCache {
    entries: HashMap<CacheKey, Vec<String>>,
}

impl PlaceholderCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached value or compute and store it
    ///
    /// # Errors
    ///
    /// Returns the error of `compute`; nothing is cached in that case
    pub fn get_or_try_insert<E>(
        &mut self,
        key: CacheKey,
        compute: impl FnOnce() -> Result<Vec<String>, E>,
    ) -> Result<Vec<String>, E> {
        if let Some(values) = self.entries.get(&key) {
            tracing::trace!(key = %key.0, "Placeholder cache hit");
            return Ok(values.clone());
        }
        let values = compute()?;
        self.entries.insert(key, values.clone());
        Ok(values)
    }

    /// Number of cached entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
