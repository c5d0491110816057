use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BumpError, Result};
use crate::manifest::{FieldPath, PackageTarget, DEFAULT_MANIFEST_FILE};

/// Config file looked up in the working directory when none is named
pub const DEFAULT_CONFIG_FILE: &str = "bump-please-config.json";

/// Branch pushed to when neither settings nor the repository name one
pub const DEFAULT_BRANCH: &str = "main";

/// Represents the contents of a bump-please configuration file.
///
/// Every option is optional so that an absent key falls through to the
/// environment and then to the built-in default.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub dry_run: Option<bool>,

    #[serde(default)]
    pub disable_git_writes: Option<bool>,

    #[serde(default)]
    pub github_token: Option<String>,

    #[serde(default)]
    pub gh_token: Option<String>,

    #[serde(default)]
    pub git_branch: Option<String>,

    #[serde(default)]
    pub git_committer_name: Option<String>,

    #[serde(default)]
    pub git_committer_email: Option<String>,

    #[serde(default)]
    pub root_package_json: Option<PathBuf>,

    #[serde(default)]
    pub packages: Vec<PackageConfig>,
}

/// One additional package whose manifest receives the new version.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackageConfig {
    pub path: PathBuf,

    #[serde(default, alias = "jsonFileName")]
    pub manifest_file_name: Option<String>,

    #[serde(default, alias = "jsonPropertyPath")]
    pub version_field_path: Option<FieldPathConfig>,
}

/// A version field path, written as `"custom.v"` or `["custom", "v"]`
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum FieldPathConfig {
    Dotted(String),
    Keys(Vec<String>),
}

impl FieldPathConfig {
    pub fn to_field_path(&self) -> Result<FieldPath> {
        match self {
            FieldPathConfig::Dotted(path) => FieldPath::parse_dotted(path),
            FieldPathConfig::Keys(keys) => FieldPath::new(keys.iter().cloned()),
        }
    }
}

impl PackageConfig {
    /// Manifest target for this package, relative paths resolved against `base_dir`
    pub fn target(&self, base_dir: &Path) -> Result<PackageTarget> {
        let mut target = PackageTarget::new(base_dir.join(&self.path));

        if let Some(name) = &self.manifest_file_name {
            target = target.with_manifest_file_name(name.clone());
        }
        if let Some(field_path) = &self.version_field_path {
            target = target.with_field_path(field_path.to_field_path()?);
        }

        Ok(target)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. `config_path`, resolved against `base_dir` when relative
/// 2. `bump-please-config.json` in `base_dir`
/// 3. `bump-please/config.json` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a named file is missing, or a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, base_dir: &Path) -> Result<Config> {
    if let Some(path) = config_path {
        let path = base_dir.join(path);
        if !path.exists() {
            return Err(BumpError::config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return parse_config_file(&path);
    }

    let local = base_dir.join(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return parse_config_file(&local);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user_config = config_dir.join("bump-please").join("config.json");
        if user_config.exists() {
            return parse_config_file(&user_config);
        }
    }

    Ok(Config::default())
}

/// Parse a config file, TOML when the extension says so and JSON otherwise
pub fn parse_config_file(path: &Path) -> Result<Config> {
    tracing::debug!(path = %path.display(), "loading config file");
    let content = fs::read_to_string(path)?;

    let is_toml = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    if is_toml {
        Ok(toml::from_str(&content)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}

/// Parse a boolean option value.
///
/// Accepts `true/false`, `1/0`, `yes/no`, `on/off` and `t/f`, ignoring case.
pub fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" => Ok(true),
        "false" | "0" | "no" | "off" | "f" => Ok(false),
        other => Err(BumpError::config(format!(
            "Invalid boolean for {}: '{}'",
            name, other
        ))),
    }
}

/// Options read from environment variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    pub dry_run: Option<bool>,
    pub config_file: Option<PathBuf>,
    pub disable_git_writes: Option<bool>,
    pub github_token: Option<String>,
    pub gh_token: Option<String>,
    pub git_branch: Option<String>,
    pub git_committer_name: Option<String>,
    pub git_committer_email: Option<String>,
    pub root_package_json: Option<PathBuf>,
}

impl Environment {
    pub fn from_process() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let flag = |name: &str| var(name).map(|value| parse_bool(name, &value)).transpose();

        Ok(Environment {
            dry_run: flag("DRY_RUN")?,
            config_file: var("CONFIG_FILE").map(PathBuf::from),
            disable_git_writes: flag("DISABLE_GIT_WRITES")?,
            github_token: var("GITHUB_TOKEN"),
            gh_token: var("GH_TOKEN"),
            git_branch: var("GIT_BRANCH"),
            git_committer_name: var("GIT_COMMITTER_NAME"),
            git_committer_email: var("GIT_COMMITTER_EMAIL"),
            root_package_json: var("ROOT_PACKAGE_JSON").map(PathBuf::from),
        })
    }
}

/// Options given on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BumpFlags {
    pub dry_run: Option<bool>,
    pub config_file: Option<PathBuf>,
    pub disable_git_writes: Option<bool>,
    pub github_token: Option<String>,
    pub gh_token: Option<String>,
    pub git_branch: Option<String>,
    pub git_committer_name: Option<String>,
    pub git_committer_email: Option<String>,
    pub root_package_json: Option<PathBuf>,
}

impl BumpFlags {
    /// Config file named by the flag, else by `CONFIG_FILE`
    pub fn config_file<'a>(&'a self, env: &'a Environment) -> Option<&'a Path> {
        self.config_file
            .as_deref()
            .or(env.config_file.as_deref())
    }
}

/// Effective options for one run
#[derive(Debug, Clone, PartialEq)]
pub struct BumpSettings {
    pub dry_run: bool,
    pub disable_git_writes: bool,
    pub token: Option<String>,
    /// Explicit branch; the repository's current branch applies when `None`
    pub branch: Option<String>,
    pub committer_name: Option<String>,
    pub committer_email: Option<String>,
    pub root_manifest: PathBuf,
    pub packages: Vec<PackageTarget>,
}

impl BumpSettings {
    /// Merge every source: flag > config file > environment > default
    pub fn resolve(
        flags: &BumpFlags,
        config: &Config,
        env: &Environment,
        base_dir: &Path,
    ) -> Result<Self> {
        let token = first_of([
            &flags.github_token,
            &flags.gh_token,
            &config.github_token,
            &config.gh_token,
            &env.github_token,
            &env.gh_token,
        ]);

        let root_manifest = flags
            .root_package_json
            .clone()
            .or_else(|| config.root_package_json.clone())
            .or_else(|| env.root_package_json.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST_FILE));

        let packages = config
            .packages
            .iter()
            .map(|package| package.target(base_dir))
            .collect::<Result<Vec<_>>>()?;

        Ok(BumpSettings {
            dry_run: flags
                .dry_run
                .or(config.dry_run)
                .or(env.dry_run)
                .unwrap_or(false),
            disable_git_writes: flags
                .disable_git_writes
                .or(config.disable_git_writes)
                .or(env.disable_git_writes)
                .unwrap_or(false),
            token,
            branch: first_of([&flags.git_branch, &config.git_branch, &env.git_branch]),
            committer_name: first_of([
                &flags.git_committer_name,
                &config.git_committer_name,
                &env.git_committer_name,
            ]),
            committer_email: first_of([
                &flags.git_committer_email,
                &config.git_committer_email,
                &env.git_committer_email,
            ]),
            root_manifest: base_dir.join(root_manifest),
            packages,
        })
    }

    /// Branch to push to: the explicit one, else `current`, else `main`
    pub fn branch_or(&self, current: Option<String>) -> String {
        self.branch
            .clone()
            .or(current)
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string())
    }
}

fn first_of<const N: usize>(candidates: [&Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
        .cloned()
}
