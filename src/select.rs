//! Version- and extension-based command selection.

use std::collections::HashSet;

use glob::Pattern;

use crate::errors::Error;
use crate::registry::{Command, Registry};

/// Known OpenCL standard versions, oldest first. The supported set for a
/// ceiling is an inclusive prefix of this list, not a numeric comparison.
pub const CL_VERSIONS: [&str; 7] = ["1.0", "1.1", "1.2", "2.0", "2.1", "2.2", "3.0"];

/// Commands exposed by every feature at or below `cl_std` plus every
/// extension matching one of `extensions`, in registry document order.
pub fn select(
    registry: &Registry,
    cl_std: &str,
    extensions: &[Pattern],
) -> Result<Vec<Command>, Error> {
    let ceiling = CL_VERSIONS
        .iter()
        .position(|v| *v == cl_std)
        .ok_or_else(|| Error::UnknownVersion {
            requested: cl_std.to_string(),
            known: CL_VERSIONS.iter().map(|v| v.to_string()).collect(),
        })?;
    let supported: HashSet<&str> = CL_VERSIONS[..=ceiling].iter().copied().collect();

    let mut selected: HashSet<&str> = HashSet::new();
    for feature in &registry.features {
        if supported.contains(feature.version.as_str()) {
            selected.extend(feature.commands.iter().map(String::as_str));
        }
    }
    for extension in &registry.extensions {
        if extensions.iter().any(|p| p.matches(&extension.name)) {
            selected.extend(extension.commands.iter().map(String::as_str));
        }
    }

    Ok(registry
        .commands
        .iter()
        .filter(|c| selected.contains(c.name()))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Extension, Feature, NameAndType, Type};

    fn command(name: &str) -> Command {
        Command::new(vec![NameAndType::new(name, Type::new("cl_int", ""))])
    }

    fn registry() -> Registry {
        Registry {
            features: vec![
                Feature {
                    version: "1.0".into(),
                    commands: vec!["clFoo".into()],
                },
                Feature {
                    version: "2.0".into(),
                    commands: vec!["clBar".into()],
                },
            ],
            extensions: vec![Extension {
                name: "cl_khr_sample".into(),
                commands: vec!["clFooKHR".into()],
            }],
            commands: vec![command("clFoo"), command("clBar"), command("clFooKHR")],
        }
    }

    fn names(commands: &[Command]) -> Vec<&str> {
        commands.iter().map(|c| c.name()).collect()
    }

    #[test]
    fn ceiling_excludes_later_features() {
        let selected = select(&registry(), "1.0", &[]).unwrap();
        assert_eq!(names(&selected), vec!["clFoo"]);
    }

    #[test]
    fn ceiling_includes_earlier_features() {
        let selected = select(&registry(), "2.1", &[]).unwrap();
        assert_eq!(names(&selected), vec!["clFoo", "clBar"]);
    }

    #[test]
    fn extension_pattern_selects_regardless_of_ceiling() {
        let patterns = vec![Pattern::new("cl_khr_*").unwrap()];
        let selected = select(&registry(), "1.0", &patterns).unwrap();
        assert_eq!(names(&selected), vec!["clFoo", "clFooKHR"]);
    }

    #[test]
    fn no_patterns_select_no_extensions() {
        let selected = select(&registry(), "3.0", &[]).unwrap();
        assert!(!names(&selected).contains(&"clFooKHR"));
    }

    #[test]
    fn earlier_ceiling_selects_a_subset() {
        let registry = registry();
        let patterns = vec![Pattern::new("cl_khr_*").unwrap()];
        let earlier = select(&registry, "1.0", &patterns).unwrap();
        let later = select(&registry, "3.0", &patterns).unwrap();
        let later_names: Vec<&str> = names(&later);
        for name in names(&earlier) {
            assert!(later_names.contains(&name));
        }
    }

    #[test]
    fn selection_preserves_document_order() {
        let mut registry = registry();
        // swap the feature declaration order so selection order differs from
        // document order if the filter were naive
        registry.features.swap(0, 1);
        let selected = select(&registry, "3.0", &[]).unwrap();
        assert_eq!(names(&selected), vec!["clFoo", "clBar"]);
    }

    #[test]
    fn unknown_ceiling_is_an_error() {
        let err = select(&registry(), "9.9", &[]).unwrap_err();
        assert!(matches!(err, Error::UnknownVersion { .. }));
        assert!(err.to_string().contains("9.9"));
        assert!(err.to_string().contains("3.0"));
    }
}
