use regex::Regex;

use crate::error::{BumpError, Result};

/// Host and repository path derived from the origin remote URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInfo {
    pub host: String,
    pub name: String,
}

impl RemoteInfo {
    /// Parse an origin URL in HTTPS or scp-like SSH form.
    ///
    /// `https://github.com/user/repo.git` and `git@github.com:user/repo.git`
    /// both give host `github.com` and name `user/repo`.
    pub fn parse(origin_url: &str) -> Result<Self> {
        let trimmed = origin_url.trim();
        let without_suffix = trimmed.strip_suffix(".git").unwrap_or(trimmed);
        let normalized = without_suffix.replacen(':', "/", 1);

        let re = Regex::new(r"^.+(@|//)([^/]+)/(.+)$")
            .map_err(|e| BumpError::remote(format!("Invalid remote pattern: {}", e)))?;

        let captures = re.captures(&normalized).ok_or_else(|| {
            BumpError::remote(format!(
                "Cannot derive repository host and name from origin url '{}'",
                origin_url
            ))
        })?;

        Ok(RemoteInfo {
            host: captures[2].to_string(),
            name: captures[3].to_string(),
        })
    }

    /// Browsable repository URL used in release notes
    pub fn public_url(&self) -> String {
        format!("https://{}/{}", self.host, self.name)
    }

    /// HTTPS push URL carrying an access token
    pub fn authenticated_url(&self, token: &str) -> String {
        format!("https://{}@{}/{}.git", token, self.host, self.name)
    }
}
