//! Row models for the `drafts` and `published_versions` tables.

pub mod draft;
pub mod published_version;
