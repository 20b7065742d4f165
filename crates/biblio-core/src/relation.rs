//! Relation references: labels of the form `Jane Doe (ID: student-7)` that embed a navigable id.

use serde::Serialize;

const ID_MARKER: &str = "(ID:";

/// A parsed relation value. `target_id` is `None` for terminal (non-navigable) references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationRef {
    pub label: String,
    pub target_id: Option<String>,
}

impl RelationRef {
    #[inline]
    pub fn is_navigable(&self) -> bool {
        self.target_id.is_some()
    }
}

/// Splits a trailing `(ID: <value>)` off `text`. Never fails: anything without a
/// well-formed suffix comes back unchanged with no target.
pub fn parse_reference(text: &str) -> RelationRef {
    let Some((head, id)) = split_suffix(text) else {
        return RelationRef {
            label: text.to_string(),
            target_id: None,
        };
    };

    // Stacked suffixes ("A (ID: x) (ID: y)") are all stripped so the label never parses again.
    let mut label = head;
    while let Some((rest, _)) = split_suffix(label) {
        label = rest;
    }

    RelationRef {
        label: label.to_string(),
        target_id: Some(id.to_string()),
    }
}

/// Returns `(label, id)` when `text` ends with a well-formed suffix. The label has the
/// whitespace before the suffix removed.
fn split_suffix(text: &str) -> Option<(&str, &str)> {
    let body = text.trim_end().strip_suffix(')')?;
    let start = body.rfind(ID_MARKER)?;
    let value = &body[start + ID_MARKER.len()..];
    if value.contains(')') {
        return None;
    }
    let id = value.trim();
    if id.is_empty() {
        return None;
    }
    Some((text[..start].trim_end(), id))
}
