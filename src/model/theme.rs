use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::mapping::default_windows_roles;
use crate::error::{BuildError, BuildResult};

/// Optional `theme.toml` at the root of a theme source tree.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ThemeManifest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default)]
    pub inherits: Option<String>,

    /// Windows scheme role -> cursor name. Entries override the defaults.
    #[serde(default)]
    pub windows_roles: BTreeMap<String, String>,
}

impl ThemeManifest {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Reads the manifest if present, defaults otherwise.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> BuildResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| BuildError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn roles(&self) -> BTreeMap<String, String> {
        let mut roles = default_windows_roles();
        roles.extend(self.windows_roles.clone());
        roles
    }
}
