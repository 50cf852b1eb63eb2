//! Fully-Qualified Name Engine
//!
//! FQNs are dotted paths from the glossary root to a term:
//! `Glossary.Parent.Child`. They are derived data, recomputed from the
//! resolved glossary and parent references, and double as the name-keyed
//! lookup and bulk-rename key in storage.

use crate::models::GlossaryTerm;
use crate::services::error::TermServiceError;

/// Path segment separator. Term names must not contain it.
pub const SEPARATOR: char = '.';

/// Join a parent FQN and a local name
pub fn build(parent_fqn: &str, name: &str) -> String {
    format!("{}{}{}", parent_fqn, SEPARATOR, name)
}

/// Whether `fqn` is `prefix` itself or a dotted descendant of it.
///
/// Segment-aware: `Finance.RevenueTax` is not under `Finance.Revenue`.
pub fn has_prefix(fqn: &str, prefix: &str) -> bool {
    fqn == prefix
        || (fqn.len() > prefix.len()
            && fqn.starts_with(prefix)
            && fqn[prefix.len()..].starts_with(SEPARATOR))
}

/// Rewrite the leading `old_prefix` of `fqn` to `new_prefix`.
///
/// Callers check `has_prefix` first; a non-matching FQN is returned unchanged.
pub fn rename_prefix(fqn: &str, old_prefix: &str, new_prefix: &str) -> String {
    if has_prefix(fqn, old_prefix) {
        format!("{}{}", new_prefix, &fqn[old_prefix.len()..])
    } else {
        fqn.to_string()
    }
}

/// Compute a term's FQN from its resolved glossary and parent references.
///
/// With a parent set, the FQN extends the parent's; otherwise it extends the
/// glossary's. Both references must carry their cached FQN (resolution fills
/// it in).
pub fn compute(term: &GlossaryTerm) -> Result<String, TermServiceError> {
    if let Some(parent) = &term.parent {
        let parent_fqn = parent.fully_qualified_name.as_deref().ok_or_else(|| {
            TermServiceError::invalid_update("parent reference is missing its FQN")
        })?;
        return Ok(build(parent_fqn, &term.name));
    }

    let glossary = term
        .glossary
        .as_ref()
        .ok_or_else(|| TermServiceError::invalid_update("term has no glossary reference"))?;
    let glossary_fqn = glossary.fully_qualified_name.as_deref().ok_or_else(|| {
        TermServiceError::invalid_update("glossary reference is missing its FQN")
    })?;
    Ok(build(glossary_fqn, &term.name))
}

/// Reject a parent that lives outside the declared glossary.
///
/// The parent's FQN must start with the glossary's FQN as a whole segment
/// prefix. No-op when the term has no parent.
pub fn validate_hierarchy(term: &GlossaryTerm) -> Result<(), TermServiceError> {
    let parent = match &term.parent {
        Some(parent) => parent,
        None => return Ok(()),
    };
    let glossary = term
        .glossary
        .as_ref()
        .ok_or_else(|| TermServiceError::invalid_update("term has no glossary reference"))?;

    let parent_fqn = parent
        .fully_qualified_name
        .as_deref()
        .ok_or_else(|| TermServiceError::invalid_update("parent reference is missing its FQN"))?;
    let glossary_fqn = glossary.fully_qualified_name.as_deref().ok_or_else(|| {
        TermServiceError::invalid_update("glossary reference is missing its FQN")
    })?;

    if !has_prefix(parent_fqn, glossary_fqn) {
        return Err(TermServiceError::hierarchy_mismatch(
            parent_fqn,
            glossary_fqn,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityReference, EntityType};
    use uuid::Uuid;

    fn glossary_ref(fqn: &str) -> EntityReference {
        EntityReference::new(Uuid::new_v4(), EntityType::Glossary)
            .with_name(fqn)
            .with_fqn(fqn)
    }

    fn term_ref(fqn: &str) -> EntityReference {
        EntityReference::new(Uuid::new_v4(), EntityType::GlossaryTerm).with_fqn(fqn)
    }

    #[test]
    fn test_has_prefix_is_segment_aware() {
        assert!(has_prefix("Finance.Revenue", "Finance.Revenue"));
        assert!(has_prefix("Finance.Revenue.Gross", "Finance.Revenue"));
        assert!(!has_prefix("Finance.RevenueTax", "Finance.Revenue"));
        assert!(!has_prefix("Finance", "Finance.Revenue"));
    }

    #[test]
    fn test_rename_prefix() {
        assert_eq!(
            rename_prefix("Finance.Revenue.Gross", "Finance.Revenue", "Finance.Income"),
            "Finance.Income.Gross"
        );
        assert_eq!(
            rename_prefix("Finance.Revenue", "Finance.Revenue", "Finance.Income"),
            "Finance.Income"
        );
        assert_eq!(
            rename_prefix("Finance.RevenueTax", "Finance.Revenue", "Finance.Income"),
            "Finance.RevenueTax"
        );
    }

    #[test]
    fn test_compute_root_term() {
        let term = GlossaryTerm::new("Revenue", glossary_ref("Finance"));
        assert_eq!(compute(&term).unwrap(), "Finance.Revenue");
    }

    #[test]
    fn test_compute_nested_term() {
        let term = GlossaryTerm::new("Gross", glossary_ref("Finance"))
            .with_parent(term_ref("Finance.Revenue"));
        assert_eq!(compute(&term).unwrap(), "Finance.Revenue.Gross");
    }

    #[test]
    fn test_validate_hierarchy_accepts_parent_inside_glossary() {
        let term = GlossaryTerm::new("Gross", glossary_ref("Finance"))
            .with_parent(term_ref("Finance.Revenue"));
        assert!(validate_hierarchy(&term).is_ok());
    }

    #[test]
    fn test_validate_hierarchy_rejects_foreign_parent() {
        let term = GlossaryTerm::new("Gross", glossary_ref("Finance"))
            .with_parent(term_ref("Sales.Pipeline"));
        assert!(matches!(
            validate_hierarchy(&term),
            Err(TermServiceError::HierarchyMismatch { .. })
        ));
    }
}
