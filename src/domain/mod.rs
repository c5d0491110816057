//! Domain logic - pure release rules independent of git and the filesystem

pub mod commit;
pub mod rule;
pub mod tag;
pub mod version;

pub use commit::{decode_log, CommitRecord, DelimitedLogDecoder, LogDecoder};
pub use rule::{default_rules, default_severity_order, ClassificationRule, RuleMatcher};
pub use tag::{last_semantic_tag, sort_tags_descending};
pub use version::{ReleaseType, Version};
