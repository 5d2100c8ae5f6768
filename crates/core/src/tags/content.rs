#![forbid(unsafe_code)]

use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagField {
    Namespace,
    Predicate,
    Value,
}

impl TagField {
    pub const ALL: [TagField; 3] = [TagField::Namespace, TagField::Predicate, TagField::Value];

    /// Column name in the `tag` table. Partial updates only ever interpolate
    /// these constants into SQL.
    pub fn as_str(self) -> &'static str {
        match self {
            TagField::Namespace => "namespace",
            TagField::Predicate => "predicate",
            TagField::Value => "value",
        }
    }
}

/// Incoming tag fields for create/replace. Any field may be absent; the store
/// decides whether the draft is acceptable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagDraft {
    pub namespace: Option<String>,
    pub predicate: Option<String>,
    pub value: Option<String>,
}

impl TagDraft {
    pub fn new(
        namespace: impl Into<String>,
        predicate: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            namespace: Some(namespace.into()),
            predicate: Some(predicate.into()),
            value: Some(value.into()),
        }
    }

    pub fn field(&self, field: TagField) -> Option<&str> {
        match field {
            TagField::Namespace => self.namespace.as_deref(),
            TagField::Predicate => self.predicate.as_deref(),
            TagField::Value => self.value.as_deref(),
        }
    }
}

/// A validated namespace/predicate/value triple.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TagContent {
    namespace: String,
    predicate: String,
    value: String,
}

impl TagContent {
    pub fn try_new(
        namespace: impl Into<String>,
        predicate: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, TagField> {
        let content = Self {
            namespace: namespace.into(),
            predicate: predicate.into(),
            value: value.into(),
        };
        for field in TagField::ALL {
            if content.field(field).is_empty() {
                return Err(field);
            }
        }
        Ok(content)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn field(&self, field: TagField) -> &str {
        match field {
            TagField::Namespace => &self.namespace,
            TagField::Predicate => &self.predicate,
            TagField::Value => &self.value,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagSetError {
    MissingField { index: usize, field: TagField },
    EmptyField { index: usize, field: TagField },
    Duplicate { first: usize, second: usize },
}

impl std::fmt::Display for TagSetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { index, field } => {
                write!(f, "tags[{index}]: {} is required", field.as_str())
            }
            Self::EmptyField { index, field } => {
                write!(f, "tags[{index}]: {} must not be empty", field.as_str())
            }
            Self::Duplicate { first, second } => {
                write!(f, "tags[{second}]: duplicate of tags[{first}]")
            }
        }
    }
}

impl std::error::Error for TagSetError {}

pub fn draft_content(index: usize, draft: &TagDraft) -> Result<TagContent, TagSetError> {
    let checked = |field: TagField| match draft.field(field) {
        None => Err(TagSetError::MissingField { index, field }),
        Some("") => Err(TagSetError::EmptyField { index, field }),
        Some(text) => Ok(text.to_string()),
    };
    Ok(TagContent {
        namespace: checked(TagField::Namespace)?,
        predicate: checked(TagField::Predicate)?,
        value: checked(TagField::Value)?,
    })
}

/// Validates a full tag list for one issue: every draft complete and
/// non-empty, no two drafts identical. Output keeps input order.
pub fn validate_tag_set(drafts: &[TagDraft]) -> Result<Vec<TagContent>, TagSetError> {
    let mut seen = DuplicateGuard::default();
    let mut out = Vec::with_capacity(drafts.len());
    for (index, draft) in drafts.iter().enumerate() {
        let content = draft_content(index, draft)?;
        seen.check(index, &content)?;
        out.push(content);
    }
    Ok(out)
}

#[derive(Default)]
pub(crate) struct DuplicateGuard {
    first_seen: HashMap<TagContent, usize>,
}

impl DuplicateGuard {
    pub(crate) fn check(&mut self, index: usize, content: &TagContent) -> Result<(), TagSetError> {
        if let Some(first) = self.first_seen.get(content) {
            return Err(TagSetError::Duplicate {
                first: *first,
                second: index,
            });
        }
        self.first_seen.insert(content.clone(), index);
        Ok(())
    }
}
