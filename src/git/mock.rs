use crate::domain::{sort_tags_descending, CommitRecord};
use crate::error::{BumpError, Result};
use crate::git::Repository;
use std::collections::HashMap;
use std::sync::Mutex;

/// Mock repository for testing without actual git operations
///
/// Read methods answer from the configured state. Mutations are appended to
/// an operation log that tests inspect through [MockRepository::operations].
pub struct MockRepository {
    origin_url: Option<String>,
    branch: Option<String>,
    tags: HashMap<String, String>,
    commits: Vec<CommitRecord>,
    fail_log: bool,
    operations: Mutex<Vec<String>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            origin_url: None,
            branch: None,
            tags: HashMap::new(),
            commits: Vec::new(),
            fail_log: false,
            operations: Mutex::new(Vec::new()),
        }
    }

    pub fn with_origin(mut self, url: impl Into<String>) -> Self {
        self.origin_url = Some(url.into());
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Add a tag pointing at the commit with `full_hash`
    pub fn with_tag(mut self, name: impl Into<String>, full_hash: impl Into<String>) -> Self {
        self.tags.insert(name.into(), full_hash.into());
        self
    }

    /// Add a commit on top of the existing history
    pub fn with_commit(mut self, commit: CommitRecord) -> Self {
        self.commits.insert(0, commit);
        self
    }

    /// Make [Repository::export_log] fail
    pub fn failing_log(mut self) -> Self {
        self.fail_log = true;
        self
    }

    /// Mutations performed so far, in call order
    pub fn operations(&self) -> Vec<String> {
        self.operations
            .lock()
            .map(|ops| ops.clone())
            .unwrap_or_default()
    }

    fn record(&self, operation: String) -> Result<()> {
        self.operations
            .lock()
            .map_err(|_| BumpError::log("mock operation log poisoned"))?
            .push(operation);
        Ok(())
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn origin_url(&self) -> Result<String> {
        self.origin_url.clone().ok_or_else(|| {
            BumpError::remote("No origin url found, are you in a git repository?")
        })
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.branch.clone())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let mut tags: Vec<String> = self.tags.keys().cloned().collect();
        sort_tags_descending(&mut tags);
        Ok(tags)
    }

    fn resolve_tag_commit(&self, tag: &str) -> Result<String> {
        self.tags
            .get(tag)
            .cloned()
            .ok_or_else(|| BumpError::log(format!("Cannot resolve tag '{}'", tag)))
    }

    fn export_log(&self, since_commit: Option<&str>) -> Result<String> {
        if self.fail_log {
            return Err(BumpError::log(
                "Error getting commits, are you in a working tree?",
            ));
        }

        Ok(self
            .commits
            .iter()
            .take_while(|commit| Some(commit.full_hash.as_str()) != since_commit)
            .map(CommitRecord::encode)
            .collect())
    }

    fn set_committer(&self, name: Option<&str>, email: Option<&str>) -> Result<()> {
        if let Some(name) = name {
            self.record(format!("config user.name {}", name))?;
        }
        if let Some(email) = email {
            self.record(format!("config user.email {}", email))?;
        }
        Ok(())
    }

    fn set_origin_url(&self, url: &str) -> Result<()> {
        self.record(format!("remote set-url origin {}", url))
    }

    fn stage_all(&self) -> Result<()> {
        self.record("add -A".to_string())
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.record(format!("commit {}", message))
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        self.record(format!("tag {} {}", name, message))
    }

    fn push(&self, branch: &str, tag: &str) -> Result<()> {
        self.record(format!("push HEAD:refs/heads/{} {}", branch, tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decode_log;

    fn commit(subject: &str, hash: &str) -> CommitRecord {
        CommitRecord::new(subject, "", &hash[..7], hash)
    }

    #[test]
    fn test_export_log_stops_at_since_commit() {
        let repo = MockRepository::new()
            .with_commit(commit("feat: one", "1111111aaaa"))
            .with_commit(commit("fix: two", "2222222bbbb"))
            .with_commit(commit("fix: three", "3333333cccc"));

        let commits = decode_log(&repo.export_log(Some("1111111aaaa")).unwrap());
        let subjects: Vec<&str> = commits.iter().map(|c| c.subject.as_str()).collect();
        assert_eq!(subjects, vec!["fix: three", "fix: two"]);

        assert_eq!(decode_log(&repo.export_log(None).unwrap()).len(), 3);
    }

    #[test]
    fn test_mutations_are_recorded_in_order() {
        let repo = MockRepository::new();
        repo.set_committer(Some("Bot"), None).unwrap();
        repo.stage_all().unwrap();
        repo.commit("msg").unwrap();

        assert_eq!(
            repo.operations(),
            vec!["config user.name Bot", "add -A", "commit msg"]
        );
    }

    #[test]
    fn test_missing_origin_and_failing_log() {
        let repo = MockRepository::new().failing_log();
        assert!(repo.origin_url().is_err());
        assert!(repo.export_log(None).is_err());
    }

    #[test]
    fn test_list_tags_sorted() {
        let repo = MockRepository::new()
            .with_tag("v0.9.0", "a")
            .with_tag("v0.10.0", "b");
        assert_eq!(repo.list_tags().unwrap(), vec!["v0.10.0", "v0.9.0"]);
    }
}
