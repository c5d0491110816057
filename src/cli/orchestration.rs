//! Main workflow orchestration logic
//!
//! This module holds the bump workflow independent of argument parsing, so it
//! can be driven from the binary or programmatically with any [Repository].
//! Every step runs to completion before the next one starts and the first
//! failure ends the run. Nothing is written until all manifest targets have
//! been validated.

use chrono::{NaiveDate, Utc};
use std::path::PathBuf;

use crate::analyzer::{ChangeClassifier, ReleaseResolver, Resolution, ResolvedRelease};
use crate::boundary::BoundaryWarning;
use crate::changelog::render_release_notes;
use crate::config::{load_config, BumpFlags, BumpSettings, Environment, DEFAULT_BRANCH};
use crate::domain::{decode_log, last_semantic_tag};
use crate::error::Result;
use crate::git::Repository;
use crate::manifest::{
    apply_write, read_declared_version, FieldPath, ManifestPlanner, PackageTarget,
    WriteInstruction,
};
use crate::remote::RemoteInfo;

/// Arguments for the bump workflow
///
/// Mirrors the CLI flags but in a format suitable for orchestration logic,
/// without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct BumpWorkflowArgs {
    /// Directory that relative config and manifest paths resolve against
    pub working_dir: PathBuf,

    /// Options given on the command line
    pub flags: BumpFlags,

    /// Options read from environment variables
    pub env: Environment,

    /// Date printed in the release notes header, today (UTC) when unset
    pub release_date: Option<NaiveDate>,
}

impl BumpWorkflowArgs {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        BumpWorkflowArgs {
            working_dir: working_dir.into(),
            flags: BumpFlags::default(),
            env: Environment::default(),
            release_date: None,
        }
    }
}

/// What a bump run did
#[derive(Debug, Clone, PartialEq)]
pub enum BumpOutcome {
    /// No commit since the last tag qualifies for a release; nothing was written
    NoRelease,

    /// The release was computed and validated but nothing was written
    DryRun {
        release: ResolvedRelease,
        notes: String,
        plan: Vec<WriteInstruction>,
    },

    /// Manifests were rewritten; `pushed` is false when git writes are disabled
    Released {
        release: ResolvedRelease,
        notes: String,
        plan: Vec<WriteInstruction>,
        pushed: bool,
    },
}

/// Result of a successful bump workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub outcome: BumpOutcome,

    /// Non-fatal conditions met along the way, in order
    pub warnings: Vec<BoundaryWarning>,
}

/// Commit and tag message of a release
pub fn release_message(version: &str) -> String {
    format!("chore(release): {} [skip ci]", version)
}

fn note(warnings: &mut Vec<BoundaryWarning>, warning: BoundaryWarning) {
    tracing::warn!(%warning, "boundary");
    warnings.push(warning);
}

/// Main bump workflow
///
/// Orchestrates the entire release:
/// 1. Load configuration and merge flags, config file and environment
/// 2. Derive the repository URL from the origin remote
/// 3. Determine the branch to push to
/// 4. Read the commits since the last semantic tag
/// 5. Classify them and resolve the next version
/// 6. Render release notes and validate every manifest target
/// 7. Write manifests, then commit, tag and push
///
/// Dry runs stop after step 6, `disableGitWrites` after the manifest writes.
pub fn run_bump_workflow(
    args: &BumpWorkflowArgs,
    repo: &dyn Repository,
) -> Result<WorkflowResult> {
    let mut warnings = Vec::new();

    let config = load_config(args.flags.config_file(&args.env), &args.working_dir)?;
    let settings = BumpSettings::resolve(&args.flags, &config, &args.env, &args.working_dir)?;

    let remote = RemoteInfo::parse(&repo.origin_url()?)?;
    let repo_url = remote.public_url();
    tracing::info!(host = %remote.host, name = %remote.name, "derived repository");

    let current_branch = match settings.branch {
        Some(_) => None,
        None => repo.current_branch()?,
    };
    if settings.branch.is_none() && current_branch.is_none() {
        let fallback = DEFAULT_BRANCH.to_string();
        note(&mut warnings, BoundaryWarning::BranchUnavailable { fallback });
    }
    let branch = settings.branch_or(current_branch);

    let fallback_version = read_declared_version(&settings.root_manifest, &FieldPath::default());

    let tags = repo.list_tags()?;
    tracing::debug!(?tags, "listed tags");
    let last_tag = last_semantic_tag(&tags);
    if last_tag.is_none() && !tags.is_empty() {
        note(&mut warnings, BoundaryWarning::IgnoredTags { tags: tags.clone() });
    }

    let since_commit = match &last_tag {
        Some(tag) => Some(repo.resolve_tag_commit(tag)?),
        None => None,
    };
    let commits = decode_log(&repo.export_log(since_commit.as_deref())?);
    tracing::debug!(count = commits.len(), ?last_tag, "decoded commits");

    let changes = ChangeClassifier::with_default_rules()?.classify(&commits);
    tracing::debug!(?changes, "classified changes");

    let resolution = ReleaseResolver::default().resolve(
        &changes,
        last_tag.as_deref(),
        fallback_version.as_deref(),
    )?;
    let release = match resolution {
        Resolution::NoRelease => {
            tracing::info!("no semantic changes, nothing to release");
            return Ok(WorkflowResult {
                outcome: BumpOutcome::NoRelease,
                warnings,
            });
        }
        Resolution::Release(release) => release,
    };

    if release.last_tag.is_none() {
        let fallback_version = release.next_version.to_string();
        note(&mut warnings, BoundaryWarning::NoSemanticTag { fallback_version });
    }
    tracing::info!(
        release_type = %release.release_type,
        next_version = %release.next_version,
        "resolved release"
    );

    let date = args.release_date.unwrap_or_else(|| Utc::now().date_naive());
    let notes = render_release_notes(&release, &changes, &repo_url, date);

    let planner = ManifestPlanner::new(
        PackageTarget::from_manifest_path(&settings.root_manifest),
        settings.packages.clone(),
    );
    let version = release.next_version.to_string();
    let plan = planner.plan(&version)?;
    tracing::debug!(?plan, "planned manifest writes");

    if settings.dry_run {
        return Ok(WorkflowResult {
            outcome: BumpOutcome::DryRun {
                release,
                notes,
                plan,
            },
            warnings,
        });
    }

    for write in &plan {
        apply_write(write)?;
    }

    if settings.disable_git_writes {
        return Ok(WorkflowResult {
            outcome: BumpOutcome::Released {
                release,
                notes,
                plan,
                pushed: false,
            },
            warnings,
        });
    }

    if settings.committer_name.is_some() || settings.committer_email.is_some() {
        repo.set_committer(
            settings.committer_name.as_deref(),
            settings.committer_email.as_deref(),
        )?;
    }

    match &settings.token {
        Some(token) => repo.set_origin_url(&remote.authenticated_url(token))?,
        None => note(&mut warnings, BoundaryWarning::NoGitHubToken),
    }

    let message = release_message(&version);
    let tag = release.next_tag();

    repo.stage_all()?;
    repo.commit(&message)?;
    repo.create_annotated_tag(&tag, &message)?;
    repo.push(&branch, &tag)?;
    tracing::info!(%tag, %branch, "pushed release");

    Ok(WorkflowResult {
        outcome: BumpOutcome::Released {
            release,
            notes,
            plan,
            pushed: true,
        },
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_message() {
        assert_eq!(release_message("1.2.0"), "chore(release): 1.2.0 [skip ci]");
    }

    #[test]
    fn test_args_defaults() {
        let args = BumpWorkflowArgs::new("/repo");
        assert_eq!(args.working_dir, PathBuf::from("/repo"));
        assert_eq!(args.flags, BumpFlags::default());
        assert!(args.release_date.is_none());
    }
}
