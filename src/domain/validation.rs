//! Field-level and structural checks run before any mutation is committed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::entities::{CategoryId, CategoryUpdate, NewCategory};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::query::TreeQuery;
use crate::domain::store::NodeStore;

/// Maximum field lengths, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLimits {
    pub name_max: usize,
    pub code_max: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            name_max: 50,
            code_max: 20,
        }
    }
}

/// Rejects invalid requests against the current state of a store.
#[derive(Debug, Clone, Copy)]
pub struct ValidationGate<'a> {
    store: &'a NodeStore,
    limits: FieldLimits,
}

impl<'a> ValidationGate<'a> {
    pub fn new(store: &'a NodeStore, limits: FieldLimits) -> Self {
        Self { store, limits }
    }

    /// Presence and length checks on name and code, without touching the
    /// store. Returns the trimmed `(name, code)` pair.
    pub fn validate_fields(
        &self,
        name: Option<&str>,
        code: Option<&str>,
    ) -> DomainResult<(String, String)> {
        let name = required("name", name)?;
        let code = required("code", code)?;
        check_length("name", name, self.limits.name_max)?;
        check_length("code", code, self.limits.code_max)?;
        Ok((name.to_string(), code.to_string()))
    }

    /// Returns the validated `(name, code)` pair.
    pub fn validate_create(&self, data: &NewCategory) -> DomainResult<(String, String)> {
        let (name, code) = self.validate_fields(data.name.as_deref(), data.code.as_deref())?;

        if self.store.find_by_code(&code).is_some() {
            return Err(DomainError::DuplicateCode(code.to_string()));
        }
        if let Some(parent_id) = data.parent_id {
            if !self.store.contains(parent_id) {
                return Err(DomainError::ParentNotFound(parent_id));
            }
        }
        Ok((name, code))
    }

    pub fn validate_update(&self, id: CategoryId, data: &CategoryUpdate) -> DomainResult<()> {
        if !self.store.contains(id) {
            return Err(DomainError::NotFound(id));
        }
        if let Some(name) = data.name.as_deref() {
            let name = required("name", Some(name))?;
            check_length("name", name, self.limits.name_max)?;
        }
        Ok(())
    }

    /// Refuses a move whose destination is the node itself or lies inside
    /// the subtree being moved.
    pub fn validate_move(&self, id: CategoryId, new_parent: Option<CategoryId>) -> DomainResult<()> {
        if !self.store.contains(id) {
            return Err(DomainError::NotFound(id));
        }
        let Some(target) = new_parent else {
            return Ok(());
        };
        if !self.store.contains(target) {
            return Err(DomainError::ParentNotFound(target));
        }
        if target == id || TreeQuery::new(self.store).descendant_ids(id).contains(&target) {
            debug!("move of {} under {} rejected: cycle", id, target);
            return Err(DomainError::CycleDetected { node: id, target });
        }
        Ok(())
    }

    pub fn validate_delete(&self, id: CategoryId) -> DomainResult<()> {
        if !self.store.contains(id) {
            return Err(DomainError::NotFound(id));
        }
        let children = self.store.child_ids(Some(id)).len();
        if children > 0 {
            return Err(DomainError::HasChildren { id, children });
        }
        Ok(())
    }
}

fn required<'v>(field: &'static str, value: Option<&'v str>) -> DomainResult<&'v str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DomainError::MissingField(field)),
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> DomainResult<()> {
    let actual = value.chars().count();
    if actual > max {
        return Err(DomainError::FieldTooLong { field, max, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_multibyte_name_when_checking_length_then_counts_characters() {
        // 50 Hangul syllables are 150 bytes but 50 characters
        let name = "가".repeat(50);
        assert!(check_length("name", &name, 50).is_ok());
        assert_eq!(
            check_length("name", &"가".repeat(51), 50),
            Err(DomainError::FieldTooLong {
                field: "name",
                max: 50,
                actual: 51
            })
        );
    }

    #[test]
    fn given_blank_value_when_requiring_then_missing_field() {
        assert_eq!(required("code", Some("   ")), Err(DomainError::MissingField("code")));
        assert_eq!(required("code", None), Err(DomainError::MissingField("code")));
        assert_eq!(required("code", Some(" PC ")), Ok("PC"));
    }
}
