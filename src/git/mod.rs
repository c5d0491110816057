//! Git operations abstraction layer
//!
//! The release pipeline never talks to git directly. It asks a [Repository]
//! for the textual inputs it needs (origin URL, branch, tags, the
//! delimiter-encoded commit log) and requests mutations through the same
//! trait once every pure step has succeeded.
//!
//! # Implementations
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory implementation that records mutations
//!
//! Code should depend on the trait so the workflow can be exercised without a
//! repository on disk.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Common git operation trait for abstraction
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync`.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]; implementations map their
/// underlying failures to [crate::error::BumpError] variants. Nothing is retried.
pub trait Repository: Send + Sync {
    /// URL of the `origin` remote
    ///
    /// # Returns
    /// * `Ok(String)` - The configured URL
    /// * `Err` - If there is no origin remote
    fn origin_url(&self) -> Result<String>;

    /// Name of the checked-out branch, `None` on a detached or unborn HEAD
    fn current_branch(&self) -> Result<Option<String>>;

    /// All tag names, highest semantic version first
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Full hash of the commit a tag points at (annotated tags are peeled)
    fn resolve_tag_commit(&self, tag: &str) -> Result<String>;

    /// Delimiter-encoded log of `HEAD`, newest first
    ///
    /// Commits reachable from `since_commit` are excluded, giving the
    /// `<since_commit>..HEAD` range. `None` exports the whole history. Each
    /// record is rendered with [crate::domain::commit::LOG_FORMAT].
    fn export_log(&self, since_commit: Option<&str>) -> Result<String>;

    /// Set the local committer identity; either part may be omitted
    fn set_committer(&self, name: Option<&str>, email: Option<&str>) -> Result<()>;

    /// Rewrite the `origin` URL
    fn set_origin_url(&self, url: &str) -> Result<()>;

    /// Stage every change in the working tree, deletions included
    fn stage_all(&self) -> Result<()>;

    /// Commit the index on top of `HEAD`
    fn commit(&self, message: &str) -> Result<()>;

    /// Create an annotated tag on `HEAD`
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Push `HEAD` to `refs/heads/<branch>` on origin together with `tag`
    fn push(&self, branch: &str, tag: &str) -> Result<()>;
}
