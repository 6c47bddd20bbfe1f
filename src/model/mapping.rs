use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{BuildError, BuildResult};

/// Alias name -> canonical cursor name, in file order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AliasMapping {
    pub entries: Vec<(String, String)>,
}

impl AliasMapping {
    /// Parses lines of the form `alias canonical`. Blank lines and `#`
    /// comments are skipped.
    pub fn parse(content: &str, path: &Path) -> BuildResult<Self> {
        let mut entries = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 2 {
                return Err(BuildError::MalformedAlias {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    reason: format!("expected 'alias canonical', got {} fields", parts.len()),
                });
            }
            if parts[0] == parts[1] {
                return Err(BuildError::MalformedAlias {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    reason: format!("'{}' aliases itself", parts[0]),
                });
            }
            entries.push((parts[0].to_string(), parts[1].to_string()));
        }

        Ok(Self { entries })
    }

    /// A missing file yields an empty mapping.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> BuildResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Follows alias links until a name in `available` is reached.
    pub fn resolve<'a>(&'a self, name: &'a str, available: &dyn Fn(&str) -> bool) -> Option<&'a str> {
        let mut current = name;
        // bounded walk so alias cycles terminate
        for _ in 0..=self.entries.len() {
            if available(current) {
                return Some(current);
            }
            current = self
                .entries
                .iter()
                .find(|(alias, _)| alias == current)
                .map(|(_, canonical)| canonical.as_str())?;
        }
        None
    }
}

/// Windows scheme roles in the order the registry scheme string expects them.
pub const WINDOWS_ROLES: [&str; 15] = [
    "Arrow",
    "Help",
    "AppStarting",
    "Wait",
    "Crosshair",
    "IBeam",
    "NWPen",
    "No",
    "SizeNS",
    "SizeWE",
    "SizeNWSE",
    "SizeNESW",
    "SizeAll",
    "UpArrow",
    "Hand",
];

pub fn default_windows_roles() -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();

    map.insert("Arrow".to_string(), "left_ptr".to_string());
    map.insert("Help".to_string(), "question_arrow".to_string());
    map.insert("AppStarting".to_string(), "left_ptr_watch".to_string());
    map.insert("Wait".to_string(), "wait".to_string());
    map.insert("Crosshair".to_string(), "crosshair".to_string());
    map.insert("IBeam".to_string(), "xterm".to_string());
    map.insert("NWPen".to_string(), "pencil".to_string());
    map.insert("No".to_string(), "circle".to_string());
    map.insert("SizeNS".to_string(), "size_ver".to_string());
    map.insert("SizeWE".to_string(), "size_hor".to_string());
    map.insert("SizeNWSE".to_string(), "size_fdiag".to_string());
    map.insert("SizeNESW".to_string(), "size_bdiag".to_string());
    map.insert("SizeAll".to_string(), "fleur".to_string());
    map.insert("UpArrow".to_string(), "up-arrow".to_string());
    map.insert("Hand".to_string(), "pointer".to_string());

    map
}
