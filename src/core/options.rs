//! Option propagation
//!
//! Derives the option set each ecosystem dependency is built with from the
//! top-level package configuration. Priority, lowest to highest:
//! no options, then `shared` copied from the top-level package, then the
//! dependency's explicit `options` table.
//!
//! The result is returned as a mapping; applying it to a concrete
//! package-manager invocation is the caller's job (see [`option_args`]).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::defaults;
use crate::core::manifest::{Manifest, OptionSet, OptionValue};

/// Linkage option name
pub const SHARED: &str = "shared";

/// Position-independent-code option name
pub const FPIC: &str = "fPIC";

/// Propagated options per package name
pub type PropagatedOptions = BTreeMap<String, OptionSet>;

/// Options of the top-level package, supplied by the invoking context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageConfiguration {
    /// Build as a shared library
    pub shared: bool,

    /// Build position-independent code
    #[serde(rename = "fPIC")]
    pub fpic: bool,

    /// Any other named options
    pub options: OptionSet,
}

impl Default for PackageConfiguration {
    fn default() -> Self {
        Self {
            shared: defaults::DEFAULT_SHARED,
            fpic: defaults::DEFAULT_FPIC,
            options: OptionSet::new(),
        }
    }
}

impl PackageConfiguration {
    /// Shared-library configuration
    pub fn shared() -> Self {
        Self {
            shared: true,
            ..Self::default()
        }
    }

    /// Static-library configuration
    pub fn static_lib() -> Self {
        Self {
            shared: false,
            ..Self::default()
        }
    }

    /// Add a named option
    #[must_use]
    pub fn with_option(mut self, name: &str, value: impl Into<OptionValue>) -> Self {
        self.options.insert(name.to_string(), value.into());
        self
    }

    /// The package's own option set.
    ///
    /// `fPIC` is dropped for shared builds: a shared library is always
    /// position independent, so the option has no meaning there.
    pub fn effective_options(&self) -> OptionSet {
        let mut options = self.options.clone();
        options.insert(SHARED.to_string(), OptionValue::Bool(self.shared));
        if self.shared {
            options.remove(FPIC);
        } else {
            options.insert(FPIC.to_string(), OptionValue::Bool(self.fpic));
        }
        options
    }
}

/// Compute the option set of every ecosystem dependency.
///
/// Entries without a `pkg` are left out; [`crate::core::resolver::resolve`]
/// reports them.
pub fn propagate(manifest: &Manifest, config: &PackageConfiguration) -> PropagatedOptions {
    let mut propagated = PropagatedOptions::new();

    for (_, entry) in manifest.ecosystem_dependencies() {
        let Some(package_name) = entry.package_name.as_deref() else {
            continue;
        };

        let mut options = OptionSet::new();

        tracing::trace!("options[\"{package_name}\"].shared={}", config.shared);
        options.insert(SHARED.to_string(), OptionValue::Bool(config.shared));

        for (key, value) in &entry.options {
            tracing::trace!("options[\"{package_name}\"].{key}={value}");
            options.insert(key.clone(), value.clone());
        }

        propagated.insert(package_name.to_string(), options);
    }

    propagated
}

/// Render propagated options as package-manager option assignments
/// (`pcre2/*:shared=True`), one per option.
pub fn option_args(propagated: &PropagatedOptions) -> Vec<String> {
    propagated
        .iter()
        .flat_map(|(package, options)| {
            options
                .iter()
                .map(move |(key, value)| format!("{package}/*:{key}={value}"))
        })
        .collect()
}

/// Parse a `key=value` option assignment
pub fn parse_assignment(raw: &str) -> Option<(String, OptionValue)> {
    let (key, value) = raw.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), OptionValue::parse_cli(value.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::{DependencyEntry, DependencyKind};
    use proptest::prelude::*;

    fn pcre_manifest(entry: DependencyEntry) -> Manifest {
        Manifest {
            name: "pcre".to_string(),
            version: "1.0.0".to_string(),
            dependencies: vec![("pcre2".to_string(), entry)],
            lock: None,
        }
    }

    #[test]
    fn test_shared_is_propagated() {
        let manifest = pcre_manifest(DependencyEntry::ecosystem("pcre2", "[>=10.40]"));

        let propagated = propagate(&manifest, &PackageConfiguration::shared());

        let expected: OptionSet = [(SHARED.to_string(), OptionValue::Bool(true))].into();
        assert_eq!(propagated, [("pcre2".to_string(), expected)].into());
    }

    #[test]
    fn test_static_is_propagated() {
        let manifest = pcre_manifest(DependencyEntry::ecosystem("pcre2", "[>=10.40]"));

        let propagated = propagate(&manifest, &PackageConfiguration::static_lib());

        assert_eq!(
            propagated["pcre2"].get(SHARED),
            Some(&OptionValue::Bool(false))
        );
    }

    #[test]
    fn test_explicit_override_wins() {
        let manifest = pcre_manifest(
            DependencyEntry::ecosystem("pcre2", "[>=10.40]").with_option("shared", false),
        );

        let propagated = propagate(&manifest, &PackageConfiguration::shared());

        assert_eq!(
            propagated["pcre2"].get(SHARED),
            Some(&OptionValue::Bool(false))
        );
    }

    #[test]
    fn test_override_only_touches_its_own_key() {
        let manifest = pcre_manifest(
            DependencyEntry::ecosystem("pcre2", "10.42").with_option("build_pcre2_16", true),
        );

        let propagated = propagate(&manifest, &PackageConfiguration::static_lib());
        let options = &propagated["pcre2"];

        assert_eq!(options.get(SHARED), Some(&OptionValue::Bool(false)));
        assert_eq!(options.get("build_pcre2_16"), Some(&OptionValue::Bool(true)));
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn test_top_level_options_are_not_propagated() {
        let manifest = pcre_manifest(DependencyEntry::ecosystem("pcre2", "10.42"));
        let config = PackageConfiguration::shared().with_option("with_jit", true);

        let propagated = propagate(&manifest, &config);

        assert!(!propagated["pcre2"].contains_key("with_jit"));
    }

    #[test]
    fn test_other_kinds_and_nameless_entries_are_ignored() {
        let mut other = DependencyEntry::ecosystem("core", "0.2.0");
        other.kind = DependencyKind::Other;
        let mut nameless = DependencyEntry::ecosystem("x", "1.0");
        nameless.package_name = None;

        let manifest = Manifest {
            name: "app".to_string(),
            version: "0.1.0".to_string(),
            dependencies: vec![
                ("core".to_string(), other),
                ("nameless".to_string(), nameless),
            ],
            lock: None,
        };

        assert!(propagate(&manifest, &PackageConfiguration::default()).is_empty());
    }

    #[test]
    fn test_effective_options_drop_fpic_when_shared() {
        let shared = PackageConfiguration::shared().effective_options();
        assert_eq!(shared.get(SHARED), Some(&OptionValue::Bool(true)));
        assert!(!shared.contains_key(FPIC));

        let static_lib = PackageConfiguration::static_lib().effective_options();
        assert_eq!(static_lib.get(SHARED), Some(&OptionValue::Bool(false)));
        assert_eq!(static_lib.get(FPIC), Some(&OptionValue::Bool(true)));
    }

    #[test]
    fn test_option_args_rendering() {
        let manifest = pcre_manifest(
            DependencyEntry::ecosystem("pcre2", "10.42").with_option("link_size", 4i64),
        );
        let args = option_args(&propagate(&manifest, &PackageConfiguration::shared()));

        assert_eq!(
            args,
            vec![
                "pcre2/*:link_size=4".to_string(),
                "pcre2/*:shared=True".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("with_jit=true"),
            Some(("with_jit".to_string(), OptionValue::Bool(true)))
        );
        assert_eq!(
            parse_assignment(" level = 3 "),
            Some(("level".to_string(), OptionValue::Integer(3)))
        );
        assert_eq!(parse_assignment("novalue"), None);
        assert_eq!(parse_assignment("=3"), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// `shared` follows the top-level package unless the entry overrides it
        #[test]
        fn prop_linkage_follows_config_unless_overridden(
            top_shared in any::<bool>(),
            overrides in prop::collection::vec(prop::option::of(any::<bool>()), 1..8),
        ) {
            let dependencies = overrides
                .iter()
                .enumerate()
                .map(|(i, shared)| {
                    let mut entry = DependencyEntry::ecosystem(&format!("pkg{i}"), "1.0");
                    if let Some(shared) = shared {
                        entry = entry.with_option(SHARED, *shared);
                    }
                    (format!("dep{i}"), entry)
                })
                .collect();
            let manifest = Manifest {
                name: "app".to_string(),
                version: "0.1.0".to_string(),
                dependencies,
                lock: None,
            };
            let config = PackageConfiguration {
                shared: top_shared,
                ..PackageConfiguration::default()
            };

            let first = propagate(&manifest, &config);
            let second = propagate(&manifest, &config);
            prop_assert_eq!(&first, &second);

            for (i, shared) in overrides.iter().enumerate() {
                let expected = shared.unwrap_or(top_shared);
                prop_assert_eq!(
                    first[&format!("pkg{i}")].get(SHARED),
                    Some(&OptionValue::Bool(expected))
                );
            }
        }
    }
}
