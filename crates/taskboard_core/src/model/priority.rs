//! Priority definitions attached to tasks by id.

use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Stable priority identifier, e.g. `critical`.
pub type PriorityId = String;

/// Labeled, colored, ordered task classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    pub id: PriorityId,
    pub label: String,
    /// Display color, usually a CSS hex value.
    pub color: String,
    /// Sort position; lower sorts first.
    pub order: i32,
}

impl Priority {
    pub fn new(
        id: impl Into<PriorityId>,
        label: impl Into<String>,
        color: impl Into<String>,
        order: i32,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: color.into(),
            order,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyPriorityId);
        }
        if self.label.trim().is_empty() {
            return Err(ValidationError::EmptyPriorityLabel);
        }
        Ok(())
    }

    /// Merges the set fields of `patch`. Returns `true` when anything changed.
    pub fn apply_patch(&mut self, patch: &PriorityPatch) -> bool {
        let before = self.clone();
        if let Some(label) = &patch.label {
            self.label = label.clone();
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        *self != before
    }
}

/// Partial priority update. The id is not editable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityPatch {
    pub label: Option<String>,
    pub color: Option<String>,
    pub order: Option<i32>,
}

/// Priorities seeded on first start and used when stored data has none.
pub fn default_priorities() -> Vec<Priority> {
    vec![
        Priority::new("critical", "Critical", "#ef4444", 1),
        Priority::new("high", "High", "#f97316", 2),
        Priority::new("medium", "Medium", "#8b5cf6", 3),
    ]
}

/// Derives a priority id from a display label.
///
/// Lowercases, collapses every run of non-alphanumerics into `-`, and trims
/// leading/trailing dashes. Returns `None` when nothing usable remains.
pub fn slugify_priority_id(label: &str) -> Option<PriorityId> {
    let lowered = label.trim().to_lowercase();
    let slug = NON_SLUG_RE.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        None
    } else {
        Some(slug.to_string())
    }
}

/// Stable sort by `order` ascending; ties keep their prior relative order.
pub fn sort_priorities(priorities: &mut [Priority]) {
    priorities.sort_by_key(|priority| priority.order);
}

#[cfg(test)]
mod tests {
    use super::{default_priorities, slugify_priority_id, sort_priorities, Priority};

    #[test]
    fn defaults_are_sorted_by_order() {
        let ids = default_priorities()
            .into_iter()
            .map(|p| p.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["critical", "high", "medium"]);
    }

    #[test]
    fn slugify_normalizes_labels() {
        let slug = |label: &str| slugify_priority_id(label);
        assert_eq!(slug("  Very High! ").as_deref(), Some("very-high"));
        assert_eq!(slug("P0/urgent").as_deref(), Some("p0-urgent"));
        assert_eq!(slug("***"), None);
    }

    #[test]
    fn sort_is_stable_on_equal_order() {
        let mut priorities = vec![
            Priority::new("b", "B", "#000", 2),
            Priority::new("a1", "A1", "#000", 1),
            Priority::new("a2", "A2", "#000", 1),
        ];
        sort_priorities(&mut priorities);
        let ids: Vec<_> = priorities.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "b"]);
    }
}
