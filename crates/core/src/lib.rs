#![forbid(unsafe_code)]

pub mod tags;

pub mod model {
    /// A tag as persisted: always carries the store-assigned id and three
    /// non-empty text fields.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Tag {
        pub id: i64,
        pub namespace: String,
        pub predicate: String,
        pub value: String,
    }

    impl Tag {
        pub fn same_content(&self, other: &Tag) -> bool {
            self.namespace == other.namespace
                && self.predicate == other.predicate
                && self.value == other.value
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Issue {
        pub id: i64,
        pub title: String,
        pub description: String,
        pub tags: Vec<Tag>,
    }

    impl Issue {
        pub fn new(id: i64, title: impl Into<String>, description: impl Into<String>) -> Self {
            Self {
                id,
                title: title.into(),
                description: description.into(),
                tags: Vec::new(),
            }
        }
    }
}
