use crate::domain::ReleaseType;

/// What a rule looks at in a commit.
///
/// A rule matches either on the subject's conventional-commit type or on a
/// keyword footer in the body, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatcher {
    /// Conventional-commit types, e.g. `feat`, matched against the subject line
    SubjectPrefixes(Vec<String>),
    /// Footer keywords, e.g. `BREAKING CHANGE`, matched as `<keyword>: <text>` in the body
    BodyKeywords(Vec<String>),
}

/// One entry of the classification table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRule {
    /// Changelog section name
    pub group: String,
    pub release_type: ReleaseType,
    pub matcher: RuleMatcher,
}

impl ClassificationRule {
    pub fn subject(
        group: impl Into<String>,
        release_type: ReleaseType,
        prefixes: &[&str],
    ) -> Self {
        ClassificationRule {
            group: group.into(),
            release_type,
            matcher: RuleMatcher::SubjectPrefixes(prefixes.iter().map(|p| p.to_string()).collect()),
        }
    }

    pub fn body(group: impl Into<String>, release_type: ReleaseType, keywords: &[&str]) -> Self {
        ClassificationRule {
            group: group.into(),
            release_type,
            matcher: RuleMatcher::BodyKeywords(keywords.iter().map(|k| k.to_string()).collect()),
        }
    }
}

/// The built-in rule table.
///
/// Order decides the order of the changes produced for a single commit; it has
/// no say in severity, which comes from [`default_severity_order`].
pub fn default_rules() -> Vec<ClassificationRule> {
    vec![
        ClassificationRule::subject("Features", ReleaseType::Minor, &["feat"]),
        ClassificationRule::subject(
            "Fixes & improvements",
            ReleaseType::Patch,
            &["fix", "perf", "refactor", "docs"],
        ),
        ClassificationRule::body(
            "BREAKING CHANGES",
            ReleaseType::Major,
            &["BREAKING CHANGE", "BREAKING CHANGES"],
        ),
    ]
}

/// Severity ranking, highest first
pub fn default_severity_order() -> Vec<ReleaseType> {
    vec![ReleaseType::Major, ReleaseType::Minor, ReleaseType::Patch]
}
