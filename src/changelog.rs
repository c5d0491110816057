//! Markdown release notes for a resolved release.

use chrono::{NaiveDate, Utc};

use crate::analyzer::{ResolvedRelease, SemanticChange};

/// Render the release section.
///
/// Groups appear in the order they first show up in `changes`, and changes keep
/// their order inside a group. The header links a compare view when there is a
/// previous tag and the commit list of the new tag otherwise.
pub fn render_release_notes(
    release: &ResolvedRelease,
    changes: &[SemanticChange],
    repo_url: &str,
    date: NaiveDate,
) -> String {
    let next_version = release.next_version.to_string();
    let next_tag = release.next_tag();
    let date = date.format("%Y-%m-%d");

    let header = match &release.last_tag {
        Some(last_tag) => format!(
            "## [{}]({}/compare/{}...{}) ({})",
            next_version, repo_url, last_tag, next_tag, date
        ),
        None => format!(
            "## [{}]({}/commits/{}) ({})",
            next_version, repo_url, next_tag, date
        ),
    };

    let sections = group_changes(changes)
        .into_iter()
        .map(|(group, entries)| {
            let lines: Vec<String> = entries
                .iter()
                .map(|change| change_line(change, repo_url))
                .collect();
            format!("\n### {}\n{}", group, lines.join("\n"))
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n{}\n", header, sections)
}

/// Render the release section dated today (UTC)
pub fn render_release_notes_today(
    release: &ResolvedRelease,
    changes: &[SemanticChange],
    repo_url: &str,
) -> String {
    render_release_notes(release, changes, repo_url, Utc::now().date_naive())
}

fn change_line(change: &SemanticChange, repo_url: &str) -> String {
    format!(
        "* {} ([{}]({}/commit/{}))",
        change.change_text, change.commit.short_hash, repo_url, change.commit.full_hash
    )
}

fn group_changes(changes: &[SemanticChange]) -> Vec<(&str, Vec<&SemanticChange>)> {
    let mut groups: Vec<(&str, Vec<&SemanticChange>)> = Vec::new();

    for change in changes {
        match groups.iter_mut().find(|(group, _)| *group == change.group) {
            Some((_, entries)) => entries.push(change),
            None => groups.push((change.group.as_str(), vec![change])),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CommitRecord, ReleaseType, Version};

    const REPO: &str = "https://github.com/user/repo";

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    fn change(group: &str, release_type: ReleaseType, text: &str, hash: &str) -> SemanticChange {
        SemanticChange {
            group: group.to_string(),
            release_type,
            change_text: text.to_string(),
            commit: CommitRecord::new(text, "", &hash[..3], hash),
        }
    }

    fn release(last_tag: Option<&str>) -> ResolvedRelease {
        ResolvedRelease {
            release_type: ReleaseType::Minor,
            next_version: Version::new(1, 1, 0),
            last_tag: last_tag.map(str::to_string),
        }
    }

    #[test]
    fn test_render_with_previous_tag() {
        let changes = vec![change("Features", ReleaseType::Minor, "feat: add x", "abcdef")];
        let notes = render_release_notes(&release(Some("v1.0.0")), &changes, REPO, date());

        assert_eq!(
            notes,
            "## [1.1.0](https://github.com/user/repo/compare/v1.0.0...v1.1.0) (2024-03-09)\n\
             \n\
             ### Features\n\
             * feat: add x ([abc](https://github.com/user/repo/commit/abcdef))\n"
        );
    }

    #[test]
    fn test_render_first_release_links_commits() {
        let changes = vec![change("Features", ReleaseType::Minor, "feat: add x", "abcdef")];
        let notes = render_release_notes(&release(None), &changes, REPO, date());

        assert!(notes.starts_with(
            "## [1.1.0](https://github.com/user/repo/commits/v1.1.0) (2024-03-09)\n"
        ));
    }

    #[test]
    fn test_groups_follow_first_appearance() {
        let changes = vec![
            change("Fixes & improvements", ReleaseType::Patch, "fix: a", "111111"),
            change("BREAKING CHANGES", ReleaseType::Major, "gone", "222222"),
            change("Features", ReleaseType::Minor, "feat: b", "333333"),
            change("Fixes & improvements", ReleaseType::Patch, "fix: c", "444444"),
        ];
        let notes = render_release_notes(&release(Some("v1.0.0")), &changes, REPO, date());

        let headings: Vec<&str> = notes.lines().filter(|l| l.starts_with("### ")).collect();
        assert_eq!(
            headings,
            vec![
                "### Fixes & improvements",
                "### BREAKING CHANGES",
                "### Features"
            ]
        );

        let expected_fixes = "### Fixes & improvements\n\
             * fix: a ([111](https://github.com/user/repo/commit/111111))\n\
             * fix: c ([444](https://github.com/user/repo/commit/444444))\n\
             \n\
             ### BREAKING CHANGES";
        assert!(notes.contains(expected_fixes), "{}", notes);
    }

    #[test]
    fn test_render_today_uses_current_date() {
        let changes = vec![change("Features", ReleaseType::Minor, "feat: x", "abcdef")];
        let notes = render_release_notes_today(&release(None), &changes, REPO);
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        assert!(notes.lines().next().unwrap().ends_with(&format!("({})", today)));
    }
}
