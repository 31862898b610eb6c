//! Per-dialect template registry
//!
//! A [`TemplateRegistry`] maps logical function names to render templates,
//! logical type names to native type keywords, and window frame kinds to
//! whether the dialect supports them. Specializations start from a full
//! copy of their parent's registry ([`TemplateRegistry::specialize`]), apply
//! add/override/remove operations on the builder, and seal the result. A
//! sealed registry has no mutating methods and no link back to its parent,
//! so a removed entry stays removed.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Window frame kinds a dialect may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowFrameKind {
    Rows,
    Range,
    Groups,
}

impl WindowFrameKind {
    pub const ALL: [WindowFrameKind; 3] = [
        WindowFrameKind::Rows,
        WindowFrameKind::Range,
        WindowFrameKind::Groups,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WindowFrameKind::Rows => "rows",
            WindowFrameKind::Range => "range",
            WindowFrameKind::Groups => "groups",
        }
    }
}

impl fmt::Display for WindowFrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindowFrameKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rows" => Ok(WindowFrameKind::Rows),
            "range" => Ok(WindowFrameKind::Range),
            "groups" => Ok(WindowFrameKind::Groups),
            other => Err(Error::config(format!("unknown window frame kind '{}'", other))),
        }
    }
}

/// Sealed set of templates for one dialect
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateRegistry {
    functions: IndexMap<String, String>,
    types: IndexMap<String, String>,
    window_frame_types: IndexMap<WindowFrameKind, bool>,
}

impl TemplateRegistry {
    /// Start an empty registry
    pub fn builder() -> TemplateRegistryBuilder {
        TemplateRegistryBuilder::default()
    }

    /// Start a child registry from a full copy of this one
    pub fn specialize(&self) -> TemplateRegistryBuilder {
        TemplateRegistryBuilder {
            registry: self.clone(),
        }
    }

    /// Render template for a function
    pub fn function(&self, name: &str) -> Result<&str> {
        self.functions
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownTemplate(name.to_string()))
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Native type keyword for a logical type
    pub fn native_type(&self, logical: &str) -> Result<&str> {
        self.types
            .get(logical)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownType(logical.to_string()))
    }

    /// Whether the frame kind is present and enabled
    pub fn supports_window_frame(&self, kind: WindowFrameKind) -> bool {
        self.window_frame_types.get(&kind).copied().unwrap_or(false)
    }

    pub fn functions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.functions.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn types(&self) -> impl Iterator<Item = (&str, &str)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn window_frames(&self) -> impl Iterator<Item = (WindowFrameKind, bool)> + '_ {
        self.window_frame_types.iter().map(|(k, v)| (*k, *v))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Mutable staging area for a registry; consumed by [`build`](Self::build)
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistryBuilder {
    registry: TemplateRegistry,
}

impl TemplateRegistryBuilder {
    /// Add or replace a function template
    pub fn set_function(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.registry.functions.insert(name.into(), template.into());
        self
    }

    /// Delete a function template
    pub fn remove_function(mut self, name: &str) -> Self {
        if self.registry.functions.shift_remove(name).is_none() {
            log::warn!("removing function template '{}' that is not defined", name);
        }
        self
    }

    pub fn set_type(mut self, logical: impl Into<String>, native: impl Into<String>) -> Self {
        self.registry.types.insert(logical.into(), native.into());
        self
    }

    pub fn remove_type(mut self, logical: &str) -> Self {
        if self.registry.types.shift_remove(logical).is_none() {
            log::warn!("removing type '{}' that is not defined", logical);
        }
        self
    }

    pub fn set_window_frame_capability(mut self, kind: WindowFrameKind, supported: bool) -> Self {
        self.registry.window_frame_types.insert(kind, supported);
        self
    }

    pub fn remove_window_frame_capability(mut self, kind: WindowFrameKind) -> Self {
        self.registry.window_frame_types.shift_remove(&kind);
        self
    }

    /// Seal the registry for shared read-only use
    pub fn build(self) -> Arc<TemplateRegistry> {
        log::debug!(
            "sealed template registry: {} functions, {} types, {} window frame kinds",
            self.registry.functions.len(),
            self.registry.types.len(),
            self.registry.window_frame_types.len()
        );
        Arc::new(self.registry)
    }
}

/// Declarative overrides applied on top of a dialect's registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateOverrides {
    #[serde(default)]
    pub functions: IndexMap<String, String>,

    #[serde(default)]
    pub remove_functions: Vec<String>,

    #[serde(default)]
    pub types: IndexMap<String, String>,

    #[serde(default)]
    pub remove_types: Vec<String>,

    #[serde(default)]
    pub remove_window_frames: Vec<WindowFrameKind>,
}

impl TemplateOverrides {
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
            && self.remove_functions.is_empty()
            && self.types.is_empty()
            && self.remove_types.is_empty()
            && self.remove_window_frames.is_empty()
    }

    /// Apply removals first, then additions, so a name listed in both ends up defined
    pub fn apply(&self, mut builder: TemplateRegistryBuilder) -> TemplateRegistryBuilder {
        for name in &self.remove_functions {
            builder = builder.remove_function(name);
        }
        for name in &self.remove_types {
            builder = builder.remove_type(name);
        }
        for kind in &self.remove_window_frames {
            builder = builder.remove_window_frame_capability(*kind);
        }
        for (name, template) in &self.functions {
            builder = builder.set_function(name.clone(), template.clone());
        }
        for (logical, native) in &self.types {
            builder = builder.set_type(logical.clone(), native.clone());
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent() -> Arc<TemplateRegistry> {
        TemplateRegistry::builder()
            .set_function("SUM", "SUM({{ args_concat }})")
            .set_function("COVAR_POP", "COVAR_POP({{ args_concat }})")
            .set_type("binary", "BYTEA")
            .set_window_frame_capability(WindowFrameKind::Rows, true)
            .set_window_frame_capability(WindowFrameKind::Range, true)
            .build()
    }

    #[test]
    fn test_removed_function_does_not_fall_back() {
        let parent = parent();
        let child = parent.specialize().remove_function("COVAR_POP").build();

        assert!(parent.function("COVAR_POP").is_ok());
        assert!(matches!(
            child.function("COVAR_POP"),
            Err(Error::UnknownTemplate(name)) if name == "COVAR_POP"
        ));
        assert_eq!(child.function("SUM").unwrap(), "SUM({{ args_concat }})");
    }

    #[test]
    fn test_override_leaves_parent_untouched() {
        let parent = parent();
        let child = parent.specialize().set_type("binary", "VARBINARY").build();

        assert_eq!(parent.native_type("binary").unwrap(), "BYTEA");
        assert_eq!(child.native_type("binary").unwrap(), "VARBINARY");
        assert!(matches!(child.native_type("uuid"), Err(Error::UnknownType(_))));
    }

    #[test]
    fn test_window_frame_removal() {
        let child = parent()
            .specialize()
            .remove_window_frame_capability(WindowFrameKind::Range)
            .build();
        assert!(child.supports_window_frame(WindowFrameKind::Rows));
        assert!(!child.supports_window_frame(WindowFrameKind::Range));
        assert!(!child.supports_window_frame(WindowFrameKind::Groups));
    }

    #[test]
    fn test_overrides_apply_removals_before_additions() {
        let mut overrides = TemplateOverrides::default();
        overrides.remove_functions.push("SUM".into());
        overrides
            .functions
            .insert("SUM".into(), "SUM(DISTINCT {{ args_concat }})".into());
        overrides.remove_window_frames.push(WindowFrameKind::Rows);

        let child = overrides.apply(parent().specialize()).build();
        assert_eq!(child.function("SUM").unwrap(), "SUM(DISTINCT {{ args_concat }})");
        assert!(!child.supports_window_frame(WindowFrameKind::Rows));
        assert!(!overrides.is_empty());
    }

    #[test]
    fn test_frame_kind_parsing() {
        assert_eq!("GROUPS".parse::<WindowFrameKind>().unwrap(), WindowFrameKind::Groups);
        assert!("slices".parse::<WindowFrameKind>().is_err());
    }
}
