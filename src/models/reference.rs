use std::fmt;

/// A branch or tag of the engine repository whose results are published.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceKey {
    Branch(String),
    Tag(String),
}

impl ReferenceKey {
    pub fn branch(name: impl Into<String>) -> Self {
        ReferenceKey::Branch(name.into())
    }

    pub fn tag(name: impl Into<String>) -> Self {
        ReferenceKey::Tag(name.into())
    }

    /// The name as shown to the user, never normalized.
    pub fn display_name(&self) -> &str {
        match self {
            ReferenceKey::Branch(name) | ReferenceKey::Tag(name) => name,
        }
    }

    /// Directory of this reference inside the result store.
    pub fn storage_path(&self) -> String {
        match self {
            ReferenceKey::Branch(name) => format!("refs/heads/{}", name),
            ReferenceKey::Tag(name) => format!("refs/tags/{}", resolve(name).tag),
        }
    }
}

impl fmt::Display for ReferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTag {
    /// Components of the tag as published, split on `.`.
    pub version: Vec<String>,
    /// Tag as used in storage paths.
    pub tag: String,
}

impl ResolvedTag {
    /// Releases older than v0.10 were never run against test262.
    pub fn has_data(&self) -> bool {
        let [major, minor, ..] = self.version.as_slice() else {
            return true;
        };
        !(major == "v0" && minor.parse::<u32>().is_ok_and(|minor| minor < 10))
    }
}

/// Map a release tag to its storage segment. Two-part tags are stored with a trailing `.0`.
pub fn resolve(tag: &str) -> ResolvedTag {
    let version: Vec<String> = tag.split('.').map(str::to_string).collect();
    let tag = if version.len() == 2 {
        format!("{}.0", tag)
    } else {
        tag.to_string()
    };
    ResolvedTag { version, tag }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_part_tags_gain_a_patch_component() {
        let resolved = resolve("v0.9");
        assert_eq!(resolved.tag, "v0.9.0");
        assert_eq!(resolved.version, vec!["v0", "9"]);
    }

    #[test]
    fn three_part_tags_are_unchanged() {
        assert_eq!(resolve("v0.9.0").tag, "v0.9.0");
        assert_eq!(resolve("v0.10.2").tag, "v0.10.2");
    }

    #[test]
    fn legacy_tags_are_filtered() {
        assert!(!resolve("v0.9.5").has_data());
        assert!(!resolve("v0.9").has_data());
        assert!(resolve("v0.10.0").has_data());
        assert!(resolve("v0.10.2").has_data());
        assert!(resolve("v1.0.0").has_data());
    }

    #[test]
    fn unusual_tags_are_kept() {
        assert!(resolve("nightly").has_data());
        assert!(resolve("v0.rc1").has_data());
    }

    #[test]
    fn storage_paths() {
        assert_eq!(
            ReferenceKey::branch("master").storage_path(),
            "refs/heads/master"
        );
        assert_eq!(ReferenceKey::tag("v0.17").storage_path(), "refs/tags/v0.17.0");
        assert_eq!(ReferenceKey::tag("v0.17").display_name(), "v0.17");
    }
}
