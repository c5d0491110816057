// End-to-end runs against real git repositories and the built binary
use bump_please::cli::{run_bump_workflow, BumpOutcome, BumpWorkflowArgs};
use bump_please::config::BumpFlags;
use bump_please::domain::Version;
use bump_please::git::Git2Repository;
use chrono::NaiveDate;
use git2::{Repository, Signature};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

struct Fixture {
    _root: TempDir,
    work: PathBuf,
    bare: PathBuf,
}

fn commit_all(repo: &Repository, message: &str) -> git2::Oid {
    let mut index = repo.index().unwrap();
    index
        .add_all(["."], git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::now("Test User", "test@example.com").unwrap();

    let parent = repo.head().ok().map(|h| h.peel_to_commit().unwrap());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

/// Working repository at v1.0.0 plus one feature commit, with a bare origin
fn fixture() -> Fixture {
    let root = TempDir::new().unwrap();
    let work = root.path().join("work");
    let bare = root.path().join("remote.git");

    Repository::init_bare(&bare).unwrap();
    let repo = Repository::init(&work).unwrap();
    {
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
    }
    repo.remote("origin", &format!("file://{}", bare.display()))
        .unwrap();

    fs::write(
        work.join("package.json"),
        "{\n  \"name\": \"demo\",\n  \"version\": \"1.0.0\"\n}\n",
    )
    .unwrap();
    let initial = commit_all(&repo, "chore: initial commit");
    let sig = Signature::now("Test User", "test@example.com").unwrap();
    repo.tag(
        "v1.0.0",
        &repo.find_object(initial, None).unwrap(),
        &sig,
        "v1.0.0",
        false,
    )
    .unwrap();

    fs::write(work.join("search.txt"), "search").unwrap();
    commit_all(&repo, "feat(search): add search\n\nsupports prefixes");

    Fixture {
        _root: root,
        work,
        bare,
    }
}

fn workflow_args(work: &Path) -> BumpWorkflowArgs {
    BumpWorkflowArgs {
        flags: BumpFlags {
            git_branch: Some("main".to_string()),
            ..Default::default()
        },
        release_date: NaiveDate::from_ymd_opt(2024, 5, 1),
        ..BumpWorkflowArgs::new(work)
    }
}

#[test]
fn test_release_is_committed_tagged_and_pushed() {
    let fixture = fixture();
    let repo = Git2Repository::open(&fixture.work).unwrap();

    let result = run_bump_workflow(&workflow_args(&fixture.work), &repo).unwrap();

    let BumpOutcome::Released {
        release,
        notes,
        pushed,
        ..
    } = &result.outcome
    else {
        panic!("expected a release, got {:?}", result.outcome);
    };
    assert!(*pushed);
    assert_eq!(release.next_version, Version::new(1, 1, 0));
    assert!(notes.contains("/compare/v1.0.0...v1.1.0) (2024-05-01)"));
    assert!(notes.contains("* feat(search): add search"));

    let manifest = fs::read_to_string(fixture.work.join("package.json")).unwrap();
    assert!(manifest.contains("\"version\": \"1.1.0\""));

    let bare = Repository::open_bare(&fixture.bare).unwrap();
    let head = bare
        .find_reference("refs/heads/main")
        .unwrap()
        .peel_to_commit()
        .unwrap();
    assert_eq!(head.message(), Some("chore(release): 1.1.0 [skip ci]"));

    let tag = bare
        .find_reference("refs/tags/v1.1.0")
        .unwrap()
        .peel_to_tag()
        .unwrap();
    assert_eq!(tag.message(), Some("chore(release): 1.1.0 [skip ci]"));
    assert_eq!(tag.target_id(), head.id());

    // the release commit carries the manifest change
    let released_manifest = head
        .tree()
        .unwrap()
        .get_path(Path::new("package.json"))
        .unwrap()
        .to_object(&bare)
        .unwrap()
        .peel_to_blob()
        .unwrap();
    assert!(String::from_utf8_lossy(released_manifest.content()).contains("1.1.0"));

    // nothing left to release afterwards
    let again = run_bump_workflow(&workflow_args(&fixture.work), &repo).unwrap();
    assert_eq!(again.outcome, BumpOutcome::NoRelease);
}

#[test]
fn test_dry_run_leaves_repository_untouched() {
    let fixture = fixture();
    let repo = Git2Repository::open(&fixture.work).unwrap();
    let before = fs::read_to_string(fixture.work.join("package.json")).unwrap();

    let mut args = workflow_args(&fixture.work);
    args.flags.dry_run = Some(true);
    let result = run_bump_workflow(&args, &repo).unwrap();

    assert!(matches!(result.outcome, BumpOutcome::DryRun { .. }));
    assert_eq!(
        fs::read_to_string(fixture.work.join("package.json")).unwrap(),
        before
    );

    let work = Repository::open(&fixture.work).unwrap();
    assert!(work.find_reference("refs/tags/v1.1.0").is_err());
    let bare = Repository::open_bare(&fixture.bare).unwrap();
    assert!(bare.find_reference("refs/heads/main").is_err());
}

fn binary() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_bump-please"));
    for var in [
        "DRY_RUN",
        "CONFIG_FILE",
        "DISABLE_GIT_WRITES",
        "GITHUB_TOKEN",
        "GH_TOKEN",
        "GIT_BRANCH",
        "ROOT_PACKAGE_JSON",
    ] {
        command.env_remove(var);
    }
    command
}

#[test]
fn test_cli_help_lists_bump_flags() {
    let output = binary().args(["bump", "--help"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in [
        "--dry-run",
        "--config-file",
        "--disable-git-writes",
        "--github-token",
        "--gh-token",
        "--git-branch",
        "--git-committer-name",
        "--git-committer-email",
        "--root-package-json",
    ] {
        assert!(stdout.contains(flag), "missing {} in:\n{}", flag, stdout);
    }
}

#[test]
fn test_cli_rejects_invalid_boolean() {
    let output = binary()
        .args(["bump", "--dry-run=maybe"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_cli_dry_run_prints_release() {
    let fixture = fixture();
    let output = binary()
        .current_dir(&fixture.work)
        .args(["bump", "--dry-run", "--git-branch", "main"])
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("v1.1.0"), "{}", stdout);
    assert!(stdout.contains("### Features"), "{}", stdout);
}
