//! Manifest targets, pre-write validation and the JSON version writer.
//!
//! Every target is checked before anything is written. Failures are collected
//! across all targets and reported together as one [`BumpError::Validation`].

use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BumpError, Result};

/// Manifest file name used when a package does not name one
pub const DEFAULT_MANIFEST_FILE: &str = "package.json";

/// Key path of a version field inside a JSON manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn new<I, S>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() || keys.iter().any(|k| k.is_empty()) {
            return Err(BumpError::config(format!(
                "Invalid version field path: {:?}",
                keys
            )));
        }
        Ok(FieldPath(keys))
    }

    /// Parse a dotted path such as `custom.v`
    pub fn parse_dotted(path: &str) -> Result<Self> {
        Self::new(path.split('.'))
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0.len() == 1 && self.0[0] == "version"
    }

    /// String value at this path, if the path resolves to one
    pub fn lookup<'a>(&self, document: &'a Value) -> Option<&'a str> {
        self.0
            .iter()
            .try_fold(document, |node, key| node.get(key.as_str()))
            .and_then(Value::as_str)
    }

    /// Overwrite the value at this path; every parent must already be an object
    pub fn assign(&self, document: &mut Value, value: &str) -> std::result::Result<(), String> {
        let (last, parents) = self
            .0
            .split_last()
            .ok_or_else(|| "empty field path".to_string())?;

        let mut node = document;
        for key in parents {
            node = node
                .get_mut(key.as_str())
                .ok_or_else(|| format!("missing key '{}' in field path '{}'", key, self))?;
        }

        let object = node
            .as_object_mut()
            .ok_or_else(|| format!("parent of '{}' is not an object", self))?;
        object.insert(last.clone(), Value::String(value.to_string()));
        Ok(())
    }
}

impl Default for FieldPath {
    fn default() -> Self {
        FieldPath(vec!["version".to_string()])
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// One manifest to update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageTarget {
    pub directory: PathBuf,
    pub manifest_file_name: String,
    pub field_path: FieldPath,
}

impl PackageTarget {
    /// Package directory with the default manifest name and field path
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        PackageTarget {
            directory: directory.into(),
            manifest_file_name: DEFAULT_MANIFEST_FILE.to_string(),
            field_path: FieldPath::default(),
        }
    }

    /// Target for a manifest given by its file path (the root manifest)
    pub fn from_manifest_path(path: &Path) -> Self {
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let manifest_file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_MANIFEST_FILE.to_string());

        PackageTarget {
            directory,
            manifest_file_name,
            field_path: FieldPath::default(),
        }
    }

    pub fn with_manifest_file_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_file_name = name.into();
        self
    }

    pub fn with_field_path(mut self, field_path: FieldPath) -> Self {
        self.field_path = field_path;
        self
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.directory.join(&self.manifest_file_name)
    }

    /// Describe why this target cannot be updated, if it cannot
    fn validate(&self) -> Option<String> {
        let path = self.manifest_path();

        if !path.is_file() {
            return Some(format!("{}: file not found", path.display()));
        }

        let document = match read_manifest(&path) {
            Ok(document) => document,
            Err(e) => return Some(format!("{}: unreadable manifest ({})", path.display(), e)),
        };

        match self.field_path.lookup(&document) {
            Some(version) if !version.is_empty() => None,
            _ if self.field_path.is_default() => {
                Some(format!("{}: missing version field", path.display()))
            }
            _ => Some(format!(
                "{}: missing version field '{}'",
                path.display(),
                self.field_path
            )),
        }
    }
}

/// A validated manifest write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteInstruction {
    pub path: PathBuf,
    pub field_path: FieldPath,
    pub new_version: String,
}

/// Decides which manifests a release rewrites
#[derive(Debug, Clone)]
pub struct ManifestPlanner {
    root: PackageTarget,
    packages: Vec<PackageTarget>,
}

impl ManifestPlanner {
    pub fn new(root: PackageTarget, packages: Vec<PackageTarget>) -> Self {
        ManifestPlanner { root, packages }
    }

    /// Root first, then packages in declaration order
    pub fn targets(&self) -> impl Iterator<Item = &PackageTarget> {
        std::iter::once(&self.root).chain(self.packages.iter())
    }

    /// One message per target that cannot be updated
    pub fn validate(&self) -> Vec<String> {
        self.targets().filter_map(PackageTarget::validate).collect()
    }

    /// Validate every target, then emit the writes for `new_version`.
    ///
    /// Read-only; fails with every collected problem if any target is invalid.
    pub fn plan(&self, new_version: &str) -> Result<Vec<WriteInstruction>> {
        let failures = self.validate();
        if !failures.is_empty() {
            return Err(BumpError::Validation(failures));
        }

        Ok(self
            .targets()
            .map(|target| WriteInstruction {
                path: target.manifest_path(),
                field_path: target.field_path.clone(),
                new_version: new_version.to_string(),
            })
            .collect())
    }
}

/// Read and parse a JSON manifest
pub fn read_manifest(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| BumpError::manifest(path, format!("cannot read: {}", e)))?;
    serde_json::from_str(&content)
        .map_err(|e| BumpError::manifest(path, format!("invalid JSON: {}", e)))
}

/// Version declared in a manifest, if the file exists and the field is a string
pub fn read_declared_version(path: &Path, field_path: &FieldPath) -> Option<String> {
    let document = read_manifest(path).ok()?;
    field_path.lookup(&document).map(str::to_string)
}

/// Apply one write: pretty-printed JSON, key order kept, trailing newline
pub fn apply_write(instruction: &WriteInstruction) -> Result<()> {
    let path = &instruction.path;
    let mut document = read_manifest(path)?;

    instruction
        .field_path
        .assign(&mut document, &instruction.new_version)
        .map_err(|message| BumpError::manifest(path, message))?;

    let mut serialized = serde_json::to_string_pretty(&document)?;
    serialized.push('\n');
    fs::write(path, serialized)
        .map_err(|e| BumpError::manifest(path, format!("cannot write: {}", e)))?;

    tracing::debug!(path = %path.display(), field = %instruction.field_path, version = %instruction.new_version, "manifest updated");
    Ok(())
}
