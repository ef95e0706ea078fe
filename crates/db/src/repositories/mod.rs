//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument.

pub mod draft_repo;
pub mod version_repo;

pub use draft_repo::DraftRepo;
pub use version_repo::VersionRepo;
