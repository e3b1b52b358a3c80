//! Option schema and resolution.
//!
//! The schema declares every recognized option with its kind, default and
//! availability. [`OptionSchema::resolve`] validates raw caller input
//! against it for one platform and prunes options that do not exist there.
//! A resolved schema is read-only.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::core::errors::PlanError;
use crate::core::platform::{Os, PlatformDescriptor};

/// The option controlling static vs. shared linkage. It does not name a
/// module.
pub const SHARED_OPTION: &str = "shared";

/// Kind of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Bool,
    Enum(&'static [&'static str]),
}

/// Platforms on which an option exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    All,
    WindowsOnly,
    LinuxOnly,
}

impl Availability {
    fn admits(&self, os: &Os) -> bool {
        match self {
            Availability::All => true,
            Availability::WindowsOnly => *os == Os::Windows,
            Availability::LinuxOnly => *os == Os::Linux,
        }
    }
}

/// Declaration of a single option.
#[derive(Debug, Clone, Copy)]
pub struct OptionDecl {
    pub name: &'static str,
    pub kind: OptionKind,
    pub default: &'static str,
    pub availability: Availability,
}

const fn flag(name: &'static str, default: &'static str) -> OptionDecl {
    OptionDecl {
        name,
        kind: OptionKind::Bool,
        default,
        availability: Availability::All,
    }
}

/// All recognized options, in declaration order.
pub const DECLARATIONS: &[OptionDecl] = &[
    flag(SHARED_OPTION, "True"),
    OptionDecl {
        name: "opengl",
        kind: OptionKind::Enum(&["desktop", "dynamic"]),
        default: "desktop",
        availability: Availability::WindowsOnly,
    },
    flag("canvas3d", "False"),
    flag("gamepad", "False"),
    flag("graphicaleffects", "False"),
    flag("imageformats", "False"),
    flag("location", "False"),
    flag("serialport", "False"),
    flag("svg", "False"),
    flag("tools", "False"),
    flag("webengine", "False"),
    flag("websockets", "False"),
    flag("xmlpatterns", "False"),
    OptionDecl {
        name: "x11extras",
        kind: OptionKind::Bool,
        default: "True",
        availability: Availability::LinuxOnly,
    },
    OptionDecl {
        name: "openssl",
        kind: OptionKind::Enum(&["no", "yes", "linked"]),
        default: "no",
        availability: Availability::WindowsOnly,
    },
];

impl OptionDecl {
    /// Whether the option exists on `os`.
    pub fn available_on(&self, os: &Os) -> bool {
        self.availability.admits(os)
    }

    /// Accepted values, for display.
    pub fn allowed_values(&self) -> Vec<&'static str> {
        match self.kind {
            OptionKind::Bool => vec!["True", "False"],
            OptionKind::Enum(values) => values.to_vec(),
        }
    }
}

fn declaration(name: &str) -> Option<&'static OptionDecl> {
    DECLARATIONS.iter().find(|d| d.name == name)
}

/// A validated option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Enum(String),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            OptionValue::Enum(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OptionValue::Bool(true) => "True",
            OptionValue::Bool(false) => "False",
            OptionValue::Enum(s) => s,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Some(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn parse_value(decl: &OptionDecl, raw: &str) -> Result<OptionValue, PlanError> {
    match decl.kind {
        OptionKind::Bool => parse_bool(raw).map(OptionValue::Bool).ok_or_else(|| {
            PlanError::InvalidOptionValue {
                name: decl.name.to_string(),
                value: raw.to_string(),
                allowed: vec!["True".to_string(), "False".to_string()],
            }
        }),
        OptionKind::Enum(allowed) => {
            if allowed.contains(&raw) {
                Ok(OptionValue::Enum(raw.to_string()))
            } else {
                Err(PlanError::InvalidOptionValue {
                    name: decl.name.to_string(),
                    value: raw.to_string(),
                    allowed: allowed.iter().map(|s| s.to_string()).collect(),
                })
            }
        }
    }
}

/// A single resolved option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedOption {
    pub name: &'static str,
    pub value: OptionValue,
}

/// Options resolved for one platform.
///
/// Entries keep declaration order. Options pruned for the platform are
/// absent and reading them is an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSchema {
    os: Os,
    entries: Vec<ResolvedOption>,
}

impl OptionSchema {
    /// Resolve raw `name -> value` input against the declarations for
    /// `platform`.
    pub fn resolve(
        raw: &BTreeMap<String, String>,
        platform: &PlatformDescriptor,
    ) -> Result<Self, PlanError> {
        for (name, value) in raw {
            let decl = declaration(name).ok_or_else(|| PlanError::UnknownOption {
                name: name.clone(),
            })?;
            // Value errors are reported before availability errors.
            parse_value(decl, value)?;
            if !decl.availability.admits(&platform.os) {
                return Err(PlanError::OptionUnavailable {
                    name: name.clone(),
                    os: platform.os.to_string(),
                });
            }
        }

        let mut entries = Vec::new();
        for decl in DECLARATIONS {
            if !decl.availability.admits(&platform.os) {
                tracing::debug!("pruning option `{}` for {}", decl.name, platform.os);
                continue;
            }
            let raw_value = raw.get(decl.name).map(String::as_str).unwrap_or(decl.default);
            entries.push(ResolvedOption {
                name: decl.name,
                value: parse_value(decl, raw_value)?,
            });
        }

        Ok(OptionSchema {
            os: platform.os.clone(),
            entries,
        })
    }

    /// Whether `name` exists in this resolved schema.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Read an option value.
    pub fn get(&self, name: &str) -> Result<&OptionValue, PlanError> {
        if let Some(entry) = self.entries.iter().find(|e| e.name == name) {
            return Ok(&entry.value);
        }
        if declaration(name).is_some() {
            Err(PlanError::OptionUnavailable {
                name: name.to_string(),
                os: self.os.to_string(),
            })
        } else {
            Err(PlanError::UnknownOption {
                name: name.to_string(),
            })
        }
    }

    /// Read a Bool option.
    pub fn get_bool(&self, name: &str) -> Result<bool, PlanError> {
        let value = self.get(name)?;
        value.as_bool().ok_or_else(|| PlanError::InvalidOptionValue {
            name: name.to_string(),
            value: value.to_string(),
            allowed: vec!["True".to_string(), "False".to_string()],
        })
    }

    /// Read an Enum option as a string.
    pub fn get_str(&self, name: &str) -> Result<&str, PlanError> {
        self.get(name).map(OptionValue::as_str)
    }

    pub fn is_shared(&self) -> Result<bool, PlanError> {
        self.get_bool(SHARED_OPTION)
    }

    /// Iterate over resolved options in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedOption> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse `name=value` pairs, as given on the command line.
pub fn parse_option_pairs<I, S>(pairs: I) -> anyhow::Result<BTreeMap<String, String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut map = BTreeMap::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("invalid option `{}`, expected name=value", pair))?;
        // Accept the `Qt:name=value` spelling used by packaging tools.
        let name = name.rsplit(':').next().unwrap_or(name).trim();
        map.insert(name.to_string(), value.trim().to_string());
    }
    Ok(map)
}
