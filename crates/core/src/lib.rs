//! Draft and published-version domain for wiki-style project pages.
//!
//! Everything in this crate is storage- and transport-agnostic: the DB crate
//! implements [`store::DraftStore`] / [`store::VersionLog`] over PostgreSQL and
//! the API crate drives the coordinators over HTTP.

pub mod content;
pub mod coordinator;
pub mod draft;
pub mod error;
pub mod generator;
pub mod memory;
pub mod store;
pub mod types;
pub mod version;
