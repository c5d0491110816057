use crate::domain::{sort_tags_descending, CommitRecord};
use crate::error::{BumpError, Result};
use git2::{
    ConfigLevel, Cred, CredentialType, IndexAddOption, ObjectType, Oid, PushOptions,
    RemoteCallbacks, Repository as Git2Repo, Sort,
};
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::sync::Mutex;

const ORIGIN: &str = "origin";
const MAX_CREDENTIAL_ATTEMPTS: u32 = 3;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Mutex<Git2Repo>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository {
            repo: Mutex::new(repo),
        })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo: Mutex::new(repo),
        }
    }

    fn with_repo<T>(&self, f: impl FnOnce(&Git2Repo) -> Result<T>) -> Result<T> {
        let repo = self
            .repo
            .lock()
            .map_err(|_| BumpError::log("git repository lock poisoned"))?;
        f(&repo)
    }
}

fn encode_commit(commit: &git2::Commit<'_>) -> Result<String> {
    let short_id = commit.as_object().short_id()?;
    let record = CommitRecord::new(
        commit.summary().unwrap_or_default(),
        commit.body().unwrap_or_default(),
        short_id.as_str().unwrap_or_default(),
        commit.id().to_string(),
    );
    Ok(record.encode())
}

/// Credentials for pushing: userinfo embedded in the URL, then SSH keys from
/// `~/.ssh`, then the SSH agent, then whatever libgit2 finds by default.
fn push_credentials(
    username_from_url: Option<&str>,
    allowed_types: CredentialType,
) -> std::result::Result<Cred, git2::Error> {
    if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
        if let Some(token) = username_from_url {
            return Cred::userpass_plaintext(token, "x-oauth-basic");
        }
    }

    if allowed_types.contains(CredentialType::SSH_KEY) {
        let user = username_from_url.unwrap_or("git");
        if let Some(home) = dirs::home_dir() {
            for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                let path = home.join(".ssh").join(key);
                if path.exists() {
                    if let Ok(cred) = Cred::ssh_key(user, None, &path, None) {
                        return Ok(cred);
                    }
                }
            }
        }

        if let Ok(cred) = Cred::ssh_key_from_agent(user) {
            return Ok(cred);
        }
    }

    Cred::default()
}

impl super::Repository for Git2Repository {
    fn origin_url(&self) -> Result<String> {
        self.with_repo(|repo| {
            let remote = repo.find_remote(ORIGIN).map_err(|e| {
                BumpError::remote(format!(
                    "No origin url found, are you in a git repository? ({})",
                    e
                ))
            })?;

            remote
                .url()
                .map(str::to_string)
                .ok_or_else(|| BumpError::remote("Origin url is not valid UTF-8"))
        })
    }

    fn current_branch(&self) -> Result<Option<String>> {
        self.with_repo(|repo| {
            let head = match repo.head() {
                Ok(head) => head,
                Err(_) => return Ok(None),
            };

            if !head.is_branch() {
                return Ok(None);
            }

            Ok(head.shorthand().map(str::to_string))
        })
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        self.with_repo(|repo| {
            let names = repo.tag_names(None)?;
            let mut tags: Vec<String> = names.iter().flatten().map(str::to_string).collect();
            sort_tags_descending(&mut tags);
            Ok(tags)
        })
    }

    fn resolve_tag_commit(&self, tag: &str) -> Result<String> {
        self.with_repo(|repo| {
            let object = repo
                .revparse_single(&format!("refs/tags/{}", tag))
                .and_then(|object| object.peel(ObjectType::Commit))
                .map_err(|e| BumpError::log(format!("Cannot resolve tag '{}': {}", tag, e)))?;
            Ok(object.id().to_string())
        })
    }

    fn export_log(&self, since_commit: Option<&str>) -> Result<String> {
        self.with_repo(|repo| {
            let not_a_work_tree = |e: git2::Error| {
                BumpError::log(format!(
                    "Error getting commits, are you in a working tree? ({})",
                    e
                ))
            };

            let mut revwalk = repo.revwalk().map_err(not_a_work_tree)?;
            revwalk
                .set_sorting(Sort::TOPOLOGICAL | Sort::TIME)
                .map_err(not_a_work_tree)?;
            revwalk.push_head().map_err(not_a_work_tree)?;

            if let Some(since) = since_commit {
                let oid = Oid::from_str(since).map_err(not_a_work_tree)?;
                revwalk.hide(oid).map_err(not_a_work_tree)?;
            }

            let mut log = String::new();
            for oid in revwalk {
                let commit = repo.find_commit(oid.map_err(not_a_work_tree)?)?;
                log.push_str(&encode_commit(&commit)?);
            }

            Ok(log)
        })
    }

    fn set_committer(&self, name: Option<&str>, email: Option<&str>) -> Result<()> {
        self.with_repo(|repo| {
            let mut config = repo.config()?.open_level(ConfigLevel::Local)?;
            if let Some(name) = name {
                config.set_str("user.name", name)?;
            }
            if let Some(email) = email {
                config.set_str("user.email", email)?;
            }
            Ok(())
        })
    }

    fn set_origin_url(&self, url: &str) -> Result<()> {
        self.with_repo(|repo| {
            repo.remote_set_url(ORIGIN, url)
                .map_err(|e| BumpError::remote(format!("Cannot set origin url: {}", e)))
        })
    }

    fn stage_all(&self) -> Result<()> {
        self.with_repo(|repo| {
            let mut index = repo.index()?;
            index.add_all(["."], IndexAddOption::DEFAULT, None)?;
            index.update_all(["."], None)?;
            index.write()?;
            Ok(())
        })
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.with_repo(|repo| {
            let signature = repo.signature()?;
            let mut index = repo.index()?;
            let tree = repo.find_tree(index.write_tree()?)?;

            let parent = match repo.head() {
                Ok(head) => Some(head.peel_to_commit()?),
                Err(_) => None,
            };
            let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

            repo.commit(
                Some("HEAD"),
                &signature,
                &signature,
                message,
                &tree,
                &parents,
            )?;
            Ok(())
        })
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        self.with_repo(|repo| {
            let signature = repo.signature()?;
            let target = repo.head()?.peel(ObjectType::Commit)?;
            repo.tag(name, &target, &signature, message, false)?;
            Ok(())
        })
    }

    fn push(&self, branch: &str, tag: &str) -> Result<()> {
        self.with_repo(|repo| {
            let mut remote = repo
                .find_remote(ORIGIN)
                .map_err(|e| BumpError::remote(format!("Cannot find remote: {}", e)))?;

            let rejected: RefCell<Vec<String>> = RefCell::new(Vec::new());
            let attempts = Cell::new(0u32);

            let mut callbacks = RemoteCallbacks::new();
            callbacks.credentials(|_url, username_from_url, allowed_types| {
                // libgit2 keeps asking while the remote refuses the credentials
                attempts.set(attempts.get() + 1);
                if attempts.get() > MAX_CREDENTIAL_ATTEMPTS {
                    return Err(git2::Error::from_str("authentication failed"));
                }
                push_credentials(username_from_url, allowed_types)
            });
            callbacks.push_update_reference(|refname, status| {
                if let Some(status) = status {
                    rejected.borrow_mut().push(format!("{} ({})", refname, status));
                }
                Ok(())
            });

            let mut options = PushOptions::new();
            options.remote_callbacks(callbacks);

            let refspecs = [
                format!("HEAD:refs/heads/{}", branch),
                format!("refs/tags/{}:refs/tags/{}", tag, tag),
            ];

            remote
                .push(&refspecs, Some(&mut options))
                .map_err(|e| BumpError::remote(format!("Push failed: {}", e)))?;
            drop(options);

            let rejected = rejected.into_inner();
            if !rejected.is_empty() {
                return Err(BumpError::remote(format!(
                    "Push rejected: {}",
                    rejected.join(", ")
                )));
            }

            Ok(())
        })
    }
}
