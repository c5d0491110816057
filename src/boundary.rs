use std::fmt;

/// Non-fatal conditions met while preparing a release.
/// These never stop the run but should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No semantic tag exists, so the root manifest version is released as is
    NoSemanticTag { fallback_version: String },
    /// Tags exist but none of them is a `v<major>.<minor>.<patch>` tag
    IgnoredTags { tags: Vec<String> },
    /// Pushing with whatever credentials the remote URL already carries
    NoGitHubToken,
    /// The current branch could not be determined
    BranchUnavailable { fallback: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoSemanticTag { fallback_version } => {
                write!(
                    f,
                    "No semantic version tag found, releasing {} from the root manifest",
                    fallback_version
                )
            }
            BoundaryWarning::IgnoredTags { tags } => {
                write!(f, "Ignoring non-semantic tags: {}", tags.join(", "))
            }
            BoundaryWarning::NoGitHubToken => {
                write!(
                    f,
                    "No GitHub token provided, pushing with the existing origin credentials"
                )
            }
            BoundaryWarning::BranchUnavailable { fallback } => {
                write!(
                    f,
                    "Cannot determine the current branch, pushing to '{}'",
                    fallback
                )
            }
        }
    }
}
