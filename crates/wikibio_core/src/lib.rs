//! Core domain logic for wikibio.
//! Turns a genealogy tree into WikiTree-style biography wikitext.

pub mod db;
pub mod logging;
pub mod model;
pub mod narrative;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::handle::{Handle, RecordClass};
pub use narrative::error::{BioError, BioResult};
pub use narrative::options::BiographyOptions;
pub use repo::memory_tree::MemoryTree;
pub use repo::snapshot::{ImportSummary, TreeSnapshot};
pub use repo::sqlite_tree::SqliteTree;
pub use repo::tree_db::{RepoError, RepoResult, TreeDatabase};
pub use service::biography_service::{
    generate_biography, Biography, BiographyService, DEFAULT_TEMPLATE,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
