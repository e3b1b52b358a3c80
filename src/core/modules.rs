//! Source module selection.

use std::fmt;

use serde::Serialize;

use crate::core::options::{OptionSchema, OptionValue, SHARED_OPTION};

/// Module that is always checked out.
pub const BASE_MODULE: &str = "qtbase";

/// Ordered list of source modules to acquire.
///
/// The base module is first; the rest follow option declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModuleRequirement(Vec<String>);

impl ModuleRequirement {
    /// Select the modules required by a resolved schema.
    pub fn select(schema: &OptionSchema) -> Self {
        let mut modules = vec![BASE_MODULE.to_string()];

        for option in schema.iter() {
            if option.name == SHARED_OPTION {
                continue;
            }
            if option.value == OptionValue::Bool(true) {
                modules.push(module_name(option.name));
            }
        }

        ModuleRequirement(modules)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, module: &str) -> bool {
        self.0.iter().any(|m| m == module)
    }

    /// Comma-separated form used by `init-repository --module-subset`.
    pub fn subset_arg(&self) -> String {
        self.0.join(",")
    }
}

impl fmt::Display for ModuleRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.subset_arg())
    }
}

/// Module name for a Bool option.
pub fn module_name(option: &str) -> String {
    format!("qt{}", option)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::core::platform::{Arch, BuildType, Os, PlatformDescriptor};

    fn select(os: Os, pairs: &[(&str, &str)]) -> ModuleRequirement {
        let platform = PlatformDescriptor::new(os, Arch::X86_64, "gcc", BuildType::Release);
        let raw: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ModuleRequirement::select(&OptionSchema::resolve(&raw, &platform).unwrap())
    }

    #[test]
    fn test_base_module_first_regardless_of_shared() {
        for shared in ["True", "False"] {
            let modules = select(Os::Macos, &[("shared", shared)]);
            assert_eq!(modules.as_slice(), &["qtbase".to_string()]);
        }
    }

    #[test]
    fn test_linux_defaults_include_x11extras() {
        let modules = select(Os::Linux, &[]);
        assert_eq!(modules.as_slice(), &["qtbase", "qtx11extras"]);
    }

    #[test]
    fn test_declaration_order() {
        let modules = select(
            Os::Linux,
            &[("xmlpatterns", "True"), ("svg", "True"), ("canvas3d", "True")],
        );
        assert_eq!(modules.subset_arg(), "qtbase,qtcanvas3d,qtsvg,qtxmlpatterns,qtx11extras");
    }

    #[test]
    fn test_enum_options_do_not_select_modules() {
        let modules = select(Os::Windows, &[("openssl", "yes"), ("opengl", "dynamic")]);
        assert_eq!(modules.len(), 1);
        assert!(modules.contains("qtbase"));
        assert!(!modules.contains("qtopenssl"));
    }

    #[test]
    fn test_shared_never_a_module() {
        let modules = select(Os::Linux, &[("shared", "True")]);
        assert!(!modules.contains("qtshared"));
    }
}
