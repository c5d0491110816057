use crate::domain::{ClassificationRule, CommitRecord, ReleaseType, RuleMatcher};
use crate::error::{BumpError, Result};
use regex::Regex;

/// One (commit, matched rule) pairing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticChange {
    pub group: String,
    pub release_type: ReleaseType,
    /// The matched subject line, or the text captured after a body keyword
    pub change_text: String,
    pub commit: CommitRecord,
}

#[derive(Debug)]
struct CompiledRule {
    rule: ClassificationRule,
    pattern: Regex,
}

impl CompiledRule {
    fn compile(rule: ClassificationRule) -> Result<Self> {
        let source = match &rule.matcher {
            RuleMatcher::SubjectPrefixes(prefixes) => {
                format!(
                    r"^(?:{})(?:\([a-z0-9\-_]+\))?:\s.+$",
                    alternation(&rule.group, prefixes)?
                )
            }
            RuleMatcher::BodyKeywords(keywords) => {
                format!(r"(?:{}):\s(.+)", alternation(&rule.group, keywords)?)
            }
        };

        let pattern = Regex::new(&source).map_err(|e| {
            BumpError::config(format!("Invalid pattern for rule '{}': {}", rule.group, e))
        })?;

        Ok(CompiledRule { rule, pattern })
    }

    fn change_text(&self, commit: &CommitRecord) -> Option<String> {
        match self.rule.matcher {
            RuleMatcher::SubjectPrefixes(_) => self
                .pattern
                .find(&commit.subject)
                .map(|m| m.as_str().to_string()),
            RuleMatcher::BodyKeywords(_) => self
                .pattern
                .captures(&commit.body)
                .and_then(|captures| captures.get(1))
                .map(|m| m.as_str().to_string()),
        }
    }
}

fn alternation(group: &str, tokens: &[String]) -> Result<String> {
    if tokens.is_empty() || tokens.iter().any(|t| t.is_empty()) {
        return Err(BumpError::config(format!(
            "Rule '{}' needs at least one non-empty prefix or keyword",
            group
        )));
    }

    Ok(tokens
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|"))
}

/// Applies the rule table to commits.
///
/// Classification is exhaustive: every rule a commit satisfies yields its own
/// [`SemanticChange`], so `feat: x` with a `BREAKING CHANGE: y` footer counts
/// as both a feature and a breaking change.
#[derive(Debug)]
pub struct ChangeClassifier {
    rules: Vec<CompiledRule>,
}

impl ChangeClassifier {
    /// Compile a rule table
    pub fn new(rules: Vec<ClassificationRule>) -> Result<Self> {
        let rules = rules
            .into_iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>>>()?;

        Ok(ChangeClassifier { rules })
    }

    /// Classifier for the built-in rule table
    pub fn with_default_rules() -> Result<Self> {
        Self::new(crate::domain::default_rules())
    }

    /// Classify commits in input order; within a commit, rule-table order
    pub fn classify(&self, commits: &[CommitRecord]) -> Vec<SemanticChange> {
        commits
            .iter()
            .flat_map(|commit| self.classify_commit(commit))
            .collect()
    }

    /// Every semantic change a single commit contributes
    pub fn classify_commit(&self, commit: &CommitRecord) -> Vec<SemanticChange> {
        self.rules
            .iter()
            .filter_map(|compiled| {
                compiled.change_text(commit).map(|change_text| SemanticChange {
                    group: compiled.rule.group.clone(),
                    release_type: compiled.rule.release_type,
                    change_text,
                    commit: commit.clone(),
                })
            })
            .collect()
    }
}
