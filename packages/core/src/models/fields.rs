//! Requested-Field Sets
//!
//! Reads reconstruct relationship-derived fields on demand. Callers name the
//! fields they are willing to pay for; anything else stays unloaded (`None`)
//! so "not loaded" and "empty" remain distinguishable.

use std::collections::HashSet;

/// Field names accepted by `Fields`
pub mod field {
    pub const GLOSSARY: &str = "glossary";
    pub const PARENT: &str = "parent";
    pub const CHILDREN: &str = "children";
    pub const RELATED_TERMS: &str = "relatedTerms";
    pub const REVIEWERS: &str = "reviewers";
    pub const TAGS: &str = "tags";
    pub const USAGE_COUNT: &str = "usageCount";
}

/// A set of requested field names for a read operation
///
/// # Examples
///
/// ```rust
/// use glossarium_core::models::Fields;
///
/// let fields = Fields::from_names(["children", "reviewers"]);
/// assert!(fields.contains("children"));
/// assert!(!fields.contains("usageCount"));
/// assert!(Fields::all().contains("usageCount"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Fields(HashSet<String>);

impl Fields {
    /// No derived fields requested; only the stored body is loaded
    pub fn none() -> Self {
        Self::default()
    }

    /// Every derived field, including the usage count
    pub fn all() -> Self {
        Self::from_names([
            field::GLOSSARY,
            field::PARENT,
            field::CHILDREN,
            field::RELATED_TERMS,
            field::REVIEWERS,
            field::TAGS,
            field::USAGE_COUNT,
        ])
    }

    /// Build from an explicit list of field names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Whether the caller asked for this field
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_contains_nothing() {
        let fields = Fields::none();
        assert!(!fields.contains(field::GLOSSARY));
        assert!(!fields.contains(field::CHILDREN));
    }

    #[test]
    fn test_all_contains_every_field() {
        let fields = Fields::all();
        for name in [
            field::GLOSSARY,
            field::PARENT,
            field::CHILDREN,
            field::RELATED_TERMS,
            field::REVIEWERS,
            field::TAGS,
            field::USAGE_COUNT,
        ] {
            assert!(fields.contains(name), "missing {}", name);
        }
    }
}
