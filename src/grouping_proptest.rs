//! Property-based tests for grouping and path containment.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::materialize::{contained_path, resolve_path};
    use crate::stars::{ResolvedVars, StarRecord, UNCLASSIFIED_LANGUAGE};
    use proptest::prelude::*;
    use std::path::Path;

    fn star(index: usize, language: Option<String>) -> StarRecord {
        StarRecord {
            name: format!("repo-{}", index),
            full_name: format!("owner/repo-{}", index),
            owner: "owner".to_string(),
            language,
            description: None,
            html_url: format!("https://github.com/owner/repo-{}", index),
            homepage: None,
            stargazers_count: index as u64,
            forks_count: 0,
            topics: Vec::new(),
            archived: false,
            fork: false,
        }
    }

    fn records() -> impl Strategy<Value = Vec<StarRecord>> {
        let language = prop::option::of(prop::sample::select(vec![
            "Go".to_string(),
            "Rust".to_string(),
            "C".to_string(),
            "TypeScript".to_string(),
        ]));
        prop::collection::vec(language, 0..40).prop_map(|languages| {
            languages
                .into_iter()
                .enumerate()
                .map(|(i, l)| star(i, l))
                .collect()
        })
    }

    // ============================================================================
    // grouping property tests
    // ============================================================================

    proptest! {
        /// Property: every record lands in exactly one group, nothing is lost
        #[test]
        fn grouping_is_a_partition(input in records()) {
            let vars = ResolvedVars::new(input.clone());

            let grouped: usize = vars.by_language.values().map(Vec::len).sum();
            prop_assert_eq!(grouped, input.len());

            for record in &input {
                let hits = vars
                    .by_language
                    .values()
                    .filter(|group| group.contains(record))
                    .count();
                prop_assert_eq!(hits, 1);
                prop_assert!(vars.group(record.language_label()).contains(record));
            }
        }

        /// Property: a group holds only records with its label
        #[test]
        fn groups_are_homogeneous(input in records()) {
            let vars = ResolvedVars::new(input);
            for (label, group) in &vars.by_language {
                for record in group {
                    prop_assert_eq!(record.language_label(), label.as_str());
                }
                if label == UNCLASSIFIED_LANGUAGE {
                    prop_assert!(group.iter().all(|r| r.language.is_none()));
                }
            }
        }

        /// Property: records keep their input order inside each group
        #[test]
        fn grouping_is_stable(input in records()) {
            let vars = ResolvedVars::new(input.clone());
            for (label, group) in &vars.by_language {
                let expected: Vec<&StarRecord> = input
                    .iter()
                    .filter(|r| r.language_label() == label)
                    .collect();
                let actual: Vec<&StarRecord> = group.iter().collect();
                prop_assert_eq!(actual, expected);
            }
        }

        /// Property: the language list is the sorted, unique key set
        #[test]
        fn languages_are_sorted_key_set(input in records()) {
            let vars = ResolvedVars::new(input);
            let keys: Vec<String> = vars.by_language.keys().cloned().collect();
            prop_assert_eq!(&vars.languages, &keys);
            prop_assert!(vars.languages.windows(2).all(|w| w[0] < w[1]));
        }

        /// Property: grouping is deterministic (same input = same output)
        #[test]
        fn grouping_is_deterministic(input in records()) {
            prop_assert_eq!(ResolvedVars::new(input.clone()), ResolvedVars::new(input));
        }
    }

    // ============================================================================
    // containment property tests
    // ============================================================================

    proptest! {
        /// Property: relative paths of plain components always stay inside
        #[test]
        fn plain_relative_paths_are_contained(parts in prop::collection::vec("[a-z0-9_-]{1,8}", 1..5)) {
            let root = Path::new("/repo");
            let relative = parts.join("/");
            let resolved = contained_path(root, Path::new(&relative)).unwrap();
            prop_assert!(resolved.starts_with(root));
        }

        /// Property: climbing above the root is always rejected
        #[test]
        fn climbing_out_is_rejected(depth in 1usize..4, name in "[a-z]{1,8}\\.md") {
            let root = Path::new("/srv/repo");
            let relative = format!("{}{}", "../".repeat(depth), name);
            prop_assert!(contained_path(root, Path::new(&relative)).is_err());
        }

        /// Property: resolved paths never contain `.` or `..` components
        #[test]
        fn resolution_removes_dot_components(parts in prop::collection::vec(prop::sample::select(vec!["a", "b", ".", ".."]), 0..8)) {
            let resolved = resolve_path(Path::new("/repo"), Path::new(&parts.join("/")));
            let has_dots = resolved
                .components()
                .any(|c| matches!(c, std::path::Component::CurDir | std::path::Component::ParentDir));
            prop_assert!(!has_dots);
        }
    }
}
