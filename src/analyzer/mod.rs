//! Analysis engine: from commit records to a release decision

pub mod classifier;
pub mod resolver;

pub use classifier::{ChangeClassifier, SemanticChange};
pub use resolver::{ReleaseResolver, Resolution, ResolvedRelease, DEFAULT_INITIAL_VERSION};
