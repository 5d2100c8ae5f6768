#![forbid(unsafe_code)]

use super::content::{DuplicateGuard, TagContent, TagDraft, TagField, TagSetError, draft_content};

/// One entry of a PATCH tag list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagPatch {
    pub id: Option<i64>,
    pub namespace: Option<String>,
    pub predicate: Option<String>,
    pub value: Option<String>,
}

impl TagPatch {
    pub fn insert(
        namespace: impl Into<String>,
        predicate: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            namespace: Some(namespace.into()),
            predicate: Some(predicate.into()),
            value: Some(value.into()),
        }
    }

    pub fn remove(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn field(&self, field: TagField) -> Option<&str> {
        match field {
            TagField::Namespace => self.namespace.as_deref(),
            TagField::Predicate => self.predicate.as_deref(),
            TagField::Value => self.value.as_deref(),
        }
    }

    fn as_draft(&self) -> TagDraft {
        TagDraft {
            namespace: self.namespace.clone(),
            predicate: self.predicate.clone(),
            value: self.value.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagChange {
    /// Overwrite only the listed columns of an existing tag.
    Update {
        id: i64,
        fields: Vec<(TagField, String)>,
    },
    Delete {
        id: i64,
    },
    Insert(TagContent),
}

/// Turns a PATCH tag list into per-tag changes.
///
/// A tag with an id updates its present, non-empty fields, or is deleted when
/// it names none. A tag without an id is a new tag and must be complete;
/// new tags must not repeat each other.
pub fn plan_tag_patch(patches: &[TagPatch]) -> Result<Vec<TagChange>, TagSetError> {
    let mut seen = DuplicateGuard::default();
    let mut out = Vec::with_capacity(patches.len());
    for (index, patch) in patches.iter().enumerate() {
        match patch.id {
            Some(id) => {
                let fields = TagField::ALL
                    .into_iter()
                    .filter_map(|field| match patch.field(field) {
                        Some(value) if !value.is_empty() => Some((field, value.to_string())),
                        _ => None,
                    })
                    .collect::<Vec<_>>();
                if fields.is_empty() {
                    out.push(TagChange::Delete { id });
                } else {
                    out.push(TagChange::Update { id, fields });
                }
            }
            None => {
                let content = draft_content(index, &patch.as_draft())?;
                seen.check(index, &content)?;
                out.push(TagChange::Insert(content));
            }
        }
    }
    Ok(out)
}
