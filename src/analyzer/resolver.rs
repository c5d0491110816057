use crate::analyzer::SemanticChange;
use crate::domain::{ReleaseType, Version};
use crate::error::{BumpError, Result};

/// Version adopted when there is no release tag and the root manifest has none
pub const DEFAULT_INITIAL_VERSION: &str = "1.0.0";

/// The release a run is going to make
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelease {
    pub release_type: ReleaseType,
    pub next_version: Version,
    /// Last release tag the version was computed from, if any
    pub last_tag: Option<String>,
}

impl ResolvedRelease {
    /// `v`-prefixed tag for the next version
    pub fn next_tag(&self) -> String {
        self.next_version.tag()
    }
}

/// Outcome of release resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No commit produced a semantic change; nothing must be written
    NoRelease,
    Release(ResolvedRelease),
}

impl Resolution {
    pub fn release(&self) -> Option<&ResolvedRelease> {
        match self {
            Resolution::NoRelease => None,
            Resolution::Release(release) => Some(release),
        }
    }
}

/// Aggregates semantic changes into a release severity and next version
#[derive(Debug, Clone)]
pub struct ReleaseResolver {
    severity_order: Vec<ReleaseType>,
}

impl Default for ReleaseResolver {
    fn default() -> Self {
        ReleaseResolver::new(crate::domain::default_severity_order())
    }
}

impl ReleaseResolver {
    /// Create a resolver with a severity ranking, highest first
    pub fn new(severity_order: Vec<ReleaseType>) -> Self {
        ReleaseResolver { severity_order }
    }

    /// Highest-ranked release type present among the changes
    pub fn release_type(&self, changes: &[SemanticChange]) -> Option<ReleaseType> {
        self.severity_order
            .iter()
            .copied()
            .find(|candidate| changes.iter().any(|c| c.release_type == *candidate))
    }

    /// Resolve the next release.
    ///
    /// With a last tag the matching component is bumped. Without one the
    /// fallback version (normally the root manifest's) is adopted unchanged, or
    /// [`DEFAULT_INITIAL_VERSION`] when the fallback is absent or empty.
    pub fn resolve(
        &self,
        changes: &[SemanticChange],
        last_tag: Option<&str>,
        fallback_version: Option<&str>,
    ) -> Result<Resolution> {
        let Some(release_type) = self.release_type(changes) else {
            return Ok(Resolution::NoRelease);
        };

        let next_version = match last_tag {
            Some(tag) => Version::parse_tag(tag)?.bump(release_type)?,
            None => {
                let declared = fallback_version
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .unwrap_or(DEFAULT_INITIAL_VERSION);
                parse_declared_version(declared)?
            }
        };

        Ok(Resolution::Release(ResolvedRelease {
            release_type,
            next_version,
            last_tag: last_tag.map(str::to_string),
        }))
    }
}

/// Accept a manifest version only if it is a plain `major.minor.patch`
fn parse_declared_version(declared: &str) -> Result<Version> {
    let parsed = semver::Version::parse(declared).map_err(|e| {
        BumpError::version(format!("Declared version '{}' is not semver: {}", declared, e))
    })?;

    if !parsed.pre.is_empty() || !parsed.build.is_empty() {
        return Err(BumpError::version(format!(
            "Declared version '{}' must be a plain major.minor.patch",
            declared
        )));
    }

    let component = |value: u64| {
        u32::try_from(value).map_err(|_| {
            BumpError::version(format!("Declared version '{}' is out of range", declared))
        })
    };

    Ok(Version::new(
        component(parsed.major)?,
        component(parsed.minor)?,
        component(parsed.patch)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CommitRecord;

    fn change(release_type: ReleaseType) -> SemanticChange {
        SemanticChange {
            group: release_type.to_string(),
            release_type,
            change_text: "x".to_string(),
            commit: CommitRecord::new("x", "", "a", "abc"),
        }
    }

    fn resolve(
        types: &[ReleaseType],
        last_tag: Option<&str>,
        fallback: Option<&str>,
    ) -> Result<Resolution> {
        let changes: Vec<_> = types.iter().copied().map(change).collect();
        ReleaseResolver::default().resolve(&changes, last_tag, fallback)
    }

    fn next_version(resolution: Resolution) -> String {
        resolution.release().unwrap().next_version.to_string()
    }

    #[test]
    fn test_no_changes_is_no_release() {
        assert_eq!(
            resolve(&[], Some("v1.0.0"), Some("1.0.0")).unwrap(),
            Resolution::NoRelease
        );
    }

    #[test]
    fn test_bumps_from_last_tag() {
        use ReleaseType::*;
        assert_eq!(next_version(resolve(&[Major], Some("v1.4.7"), None).unwrap()), "2.0.0");
        assert_eq!(next_version(resolve(&[Minor], Some("v1.4.7"), None).unwrap()), "1.5.0");
        assert_eq!(next_version(resolve(&[Patch], Some("1.4.7"), None).unwrap()), "1.4.8");
    }

    #[test]
    fn test_highest_severity_wins_regardless_of_order() {
        use ReleaseType::*;
        for order in [
            vec![Patch, Minor, Major],
            vec![Major, Patch, Minor],
            vec![Minor, Minor, Major, Patch],
        ] {
            let resolution = resolve(&order, Some("v0.3.1"), None).unwrap();
            let release = resolution.release().unwrap();
            assert_eq!(release.release_type, Major);
            assert_eq!(release.next_version, Version::new(1, 0, 0));
        }

        let resolution = resolve(&[Patch, Minor, Patch], Some("v0.3.1"), None).unwrap();
        assert_eq!(resolution.release().unwrap().release_type, Minor);
    }

    #[test]
    fn test_without_tag_adopts_fallback_verbatim() {
        let resolution = resolve(&[ReleaseType::Minor], None, Some("0.5.0")).unwrap();
        let release = resolution.release().unwrap();
        assert_eq!(release.next_version.to_string(), "0.5.0");
        assert_eq!(release.next_tag(), "v0.5.0");
        assert_eq!(release.last_tag, None);
    }

    #[test]
    fn test_without_tag_or_fallback_defaults() {
        assert_eq!(
            next_version(resolve(&[ReleaseType::Major], None, None).unwrap()),
            "1.0.0"
        );
        assert_eq!(
            next_version(resolve(&[ReleaseType::Patch], None, Some("  ")).unwrap()),
            "1.0.0"
        );
    }

    #[test]
    fn test_invalid_fallback_is_rejected() {
        assert!(resolve(&[ReleaseType::Patch], None, Some("banana")).is_err());
        assert!(resolve(&[ReleaseType::Patch], None, Some("1.0.0-beta.1")).is_err());
        assert!(resolve(&[ReleaseType::Patch], None, Some("1.0")).is_err());
    }

    #[test]
    fn test_last_tag_kept_on_release() {
        let resolution = resolve(&[ReleaseType::Patch], Some("v2.0.0"), None).unwrap();
        assert_eq!(
            resolution.release().unwrap().last_tag.as_deref(),
            Some("v2.0.0")
        );
    }

    #[test]
    fn test_custom_severity_order() {
        let resolver = ReleaseResolver::new(vec![ReleaseType::Patch, ReleaseType::Major]);
        let changes = vec![change(ReleaseType::Major), change(ReleaseType::Patch)];
        assert_eq!(resolver.release_type(&changes), Some(ReleaseType::Patch));

        let only_minor = vec![change(ReleaseType::Minor)];
        assert_eq!(resolver.release_type(&only_minor), None);
    }
}
