use crate::domain::Version;

/// Pick the last release tag from a tag listing.
///
/// Tags that do not match `[v]X.Y.Z` are ignored. The highest version wins
/// regardless of listing order; on a tie (`v1.0.0` and `1.0.0`) the tag listed
/// first is kept.
pub fn last_semantic_tag<S: AsRef<str>>(tags: &[S]) -> Option<String> {
    let mut best: Option<(Version, &str)> = None;

    for tag in tags {
        let tag = tag.as_ref().trim();
        let Ok(version) = Version::parse_tag(tag) else {
            continue;
        };

        match best {
            Some((current, _)) if version <= current => {}
            _ => best = Some((version, tag)),
        }
    }

    best.map(|(_, tag)| tag.to_string())
}

/// Sort tag names the way `git tag --sort=-v:refname` would for release tags:
/// semantic tags by descending version, then every other tag by descending name.
pub fn sort_tags_descending(tags: &mut [String]) {
    tags.sort_by(|a, b| {
        match (Version::parse_tag(a).ok(), Version::parse_tag(b).ok()) {
            (Some(va), Some(vb)) => vb.cmp(&va),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => b.cmp(a),
        }
    });
}
