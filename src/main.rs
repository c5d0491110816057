use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use bump_please::cli::{run_bump_workflow, BumpWorkflowArgs};
use bump_please::config::{parse_bool, BumpFlags, Environment};
use bump_please::git::Git2Repository;
use bump_please::{logging, ui};

#[derive(Parser)]
#[command(
    name = "bump-please",
    version,
    about = "Bump versions from conventional commits, update manifests and push a release tag"
)]
struct Cli {
    /// Increase diagnostic output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the next release, rewrite manifests, commit, tag and push
    Bump(BumpArgs),
}

#[derive(clap::Args)]
struct BumpArgs {
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true",
          value_parser = flag_value, help = "Compute and validate the release without writing anything")]
    dry_run: Option<bool>,

    #[arg(long, help = "Configuration file (JSON, or TOML by extension)")]
    config_file: Option<PathBuf>,

    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true",
          value_parser = flag_value, help = "Update manifests but skip commit, tag and push")]
    disable_git_writes: Option<bool>,

    #[arg(long, help = "Token embedded in the origin url before pushing")]
    github_token: Option<String>,

    #[arg(long, help = "Alternative to --github-token")]
    gh_token: Option<String>,

    #[arg(long, help = "Branch to push to (defaults to the current branch)")]
    git_branch: Option<String>,

    #[arg(long, help = "Committer name set in the local git config")]
    git_committer_name: Option<String>,

    #[arg(long, help = "Committer email set in the local git config")]
    git_committer_email: Option<String>,

    #[arg(long, help = "Root manifest path (defaults to ./package.json)")]
    root_package_json: Option<PathBuf>,
}

impl From<BumpArgs> for BumpFlags {
    fn from(args: BumpArgs) -> Self {
        BumpFlags {
            dry_run: args.dry_run,
            config_file: args.config_file,
            disable_git_writes: args.disable_git_writes,
            github_token: args.github_token,
            gh_token: args.gh_token,
            git_branch: args.git_branch,
            git_committer_name: args.git_committer_name,
            git_committer_email: args.git_committer_email,
            root_package_json: args.root_package_json,
        }
    }
}

fn flag_value(value: &str) -> std::result::Result<bool, String> {
    parse_bool("flag", value).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match cli.command {
        Command::Bump(args) => bump(args),
    }
}

fn bump(args: BumpArgs) -> Result<()> {
    let working_dir = std::env::current_dir().context("Cannot determine working directory")?;
    let env = Environment::from_process().context("Invalid environment variable")?;

    let repo = match Git2Repository::open(&working_dir) {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!(
                "No origin url found, are you in a git repository? ({})",
                e
            ));
            std::process::exit(1);
        }
    };

    let workflow_args = BumpWorkflowArgs {
        flags: args.into(),
        env,
        ..BumpWorkflowArgs::new(working_dir)
    };

    match run_bump_workflow(&workflow_args, &repo) {
        Ok(result) => {
            for warning in &result.warnings {
                ui::display_boundary_warning(warning);
            }
            ui::display_outcome(&result.outcome);
            Ok(())
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }
}
