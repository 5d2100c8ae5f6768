#![forbid(unsafe_code)]

pub use tissue_core::tags::{TagDraft, TagPatch};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateIssueRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<TagDraft>,
}

/// Full replacement. Callers fill omitted wire fields with defaults before
/// building this; replace never merges with stored data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplaceIssueRequest {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub tags: Vec<TagDraft>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatchIssueRequest {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<TagPatch>,
}
