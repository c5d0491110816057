use crate::error::{BumpError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Tags of the form `v1.2.3` or `1.2.3`; anything else is not a release tag.
fn semantic_tag_pattern() -> Result<&'static Regex> {
    static PATTERN: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^v?(\d+)\.(\d+)\.(\d+)$"))
        .as_ref()
        .map_err(|e| BumpError::version(format!("Invalid semantic tag pattern: {}", e)))
}

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version from a tag string (e.g., "v1.2.3" -> Version(1,2,3))
    ///
    /// Only a lowercase `v` prefix is accepted and exactly three numeric
    /// components must be present.
    pub fn parse_tag(tag: &str) -> Result<Self> {
        let captures = semantic_tag_pattern()?.captures(tag).ok_or_else(|| {
            BumpError::version(format!(
                "Invalid version format: '{}' - expected [v]X.Y.Z",
                tag
            ))
        })?;

        let component = |index: usize, name: &str| -> Result<u32> {
            captures[index].parse::<u32>().map_err(|_| {
                BumpError::version(format!(
                    "Invalid {} version in '{}': {}",
                    name, tag, &captures[index]
                ))
            })
        };

        Ok(Version {
            major: component(1, "major")?,
            minor: component(2, "minor")?,
            patch: component(3, "patch")?,
        })
    }

    /// Whether a tag name is a semantic release tag
    pub fn is_semantic_tag(tag: &str) -> bool {
        Self::parse_tag(tag).is_ok()
    }

    /// Bump version according to release type
    ///
    /// Lower components reset to zero. Overflowing a component is an error.
    pub fn bump(&self, release_type: ReleaseType) -> Result<Self> {
        let overflow = || BumpError::version(format!("Cannot bump {} ({})", self, release_type));

        let bumped = match release_type {
            ReleaseType::Major => Version {
                major: self.major.checked_add(1).ok_or_else(overflow)?,
                minor: 0,
                patch: 0,
            },
            ReleaseType::Minor => Version {
                major: self.major,
                minor: self.minor.checked_add(1).ok_or_else(overflow)?,
                patch: 0,
            },
            ReleaseType::Patch => Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch.checked_add(1).ok_or_else(overflow)?,
            },
        };

        Ok(bumped)
    }

    /// Tag name for this version (always `v`-prefixed)
    pub fn tag(&self) -> String {
        format!("v{}", self)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Release severity derived from semantic changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseType {
    Major,
    Minor,
    Patch,
}

impl ReleaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseType::Major => "major",
            ReleaseType::Minor => "minor",
            ReleaseType::Patch => "patch",
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseType {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(ReleaseType::Major),
            "minor" => Ok(ReleaseType::Minor),
            "patch" => Ok(ReleaseType::Patch),
            other => Err(BumpError::config(format!("Unknown release type: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse_tag("v1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
    }

    #[test]
    fn test_version_parse_without_v() {
        let v = Version::parse_tag("1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_rejects_other_shapes() {
        assert!(Version::parse_tag("1.2").is_err());
        assert!(Version::parse_tag("v1.2.3.4").is_err());
        assert!(Version::parse_tag("V1.2.3").is_err());
        assert!(Version::parse_tag("release-1.2.3").is_err());
        assert!(Version::parse_tag("v1.2.3-beta.1").is_err());
        assert!(Version::parse_tag("v1.2.3 ").is_err());
    }

    #[test]
    fn test_version_parse_component_overflow() {
        assert!(Version::parse_tag("v99999999999.0.0").is_err());
    }

    #[test]
    fn test_version_bump_major() {
        let bumped = Version::new(1, 4, 7).bump(ReleaseType::Major).unwrap();
        assert_eq!(bumped, Version::new(2, 0, 0));
    }

    #[test]
    fn test_version_bump_minor() {
        let bumped = Version::new(1, 4, 7).bump(ReleaseType::Minor).unwrap();
        assert_eq!(bumped, Version::new(1, 5, 0));
    }

    #[test]
    fn test_version_bump_patch() {
        let bumped = Version::new(1, 4, 7).bump(ReleaseType::Patch).unwrap();
        assert_eq!(bumped, Version::new(1, 4, 8));
    }

    #[test]
    fn test_version_bump_overflow() {
        let v = Version::new(1, 2, u32::MAX);
        assert!(v.bump(ReleaseType::Patch).is_err());
        assert_eq!(
            v.bump(ReleaseType::Minor).unwrap(),
            Version::new(1, 3, 0)
        );
    }

    #[test]
    fn test_version_display_and_tag() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.to_string(), "1.2.3");
        assert_eq!(v.tag(), "v1.2.3");
    }

    #[test]
    fn test_release_type_from_str() {
        assert_eq!("major".parse::<ReleaseType>().unwrap(), ReleaseType::Major);
        assert_eq!("patch".parse::<ReleaseType>().unwrap(), ReleaseType::Patch);
        assert!("huge".parse::<ReleaseType>().is_err());
    }
}
