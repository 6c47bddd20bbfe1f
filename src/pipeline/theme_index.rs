// Theme descriptors: index.theme for X11, install.inf for Windows.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::BuildResult;
use crate::model::mapping::{AliasMapping, WINDOWS_ROLES};
use crate::model::theme::ThemeManifest;

pub const INDEX_FILE: &str = "index.theme";
pub const INF_FILE: &str = "install.inf";

pub fn index_theme_content(theme_name: &str, manifest: &ThemeManifest) -> String {
    let mut content = format!("[Icon Theme]\nName={}\n", theme_name);
    if let Some(comment) = &manifest.comment {
        content.push_str(&format!("Comment={}\n", comment));
    }
    if let Some(inherits) = &manifest.inherits {
        content.push_str(&format!("Inherits={}\n", inherits));
    }
    content
}

/// Writes `index.theme` unless one is already there. Returns whether it wrote.
pub fn write_index_theme(theme_dir: &Path, theme_name: &str, manifest: &ThemeManifest) -> BuildResult<bool> {
    write_if_absent(&theme_dir.join(INDEX_FILE), || index_theme_content(theme_name, manifest))
}

/// Picks the built file for each scheme role, following aliases when the
/// role's cursor was only built under another name.
pub fn resolve_roles(
    roles: &BTreeMap<String, String>,
    aliases: &AliasMapping,
    built: &BTreeMap<String, String>,
) -> BTreeMap<&'static str, Option<String>> {
    let available = |name: &str| built.contains_key(name);

    WINDOWS_ROLES
        .iter()
        .map(|&role| {
            let file = roles
                .get(role)
                .and_then(|cursor| aliases.resolve(cursor, &available))
                .and_then(|name| built.get(name).cloned());
            (role, file)
        })
        .collect()
}

pub fn install_inf_content(
    theme_name: &str,
    resolved: &BTreeMap<&'static str, Option<String>>,
    built: &BTreeMap<String, String>,
) -> String {
    let scheme: Vec<String> = WINDOWS_ROLES
        .iter()
        .map(|role| match resolved.get(role) {
            Some(Some(_)) => format!("%10%\\%CUR_DIR%\\%{}%", role),
            _ => String::new(),
        })
        .collect();

    let mut out = String::new();
    out.push_str(&format!("; {} cursor scheme\n", theme_name));
    out.push_str("[Version]\nsignature=\"$CHICAGO$\"\n\n");
    out.push_str("[DefaultInstall]\nCopyFiles = Scheme.Cur\nAddReg = Scheme.Reg\n\n");
    out.push_str("[DestinationDirs]\nScheme.Cur = 10,\"%CUR_DIR%\"\n\n");
    out.push_str(&format!(
        "[Scheme.Reg]\nHKCU,\"Control Panel\\Cursors\\Schemes\",\"%SCHEME_NAME%\",,\"{}\"\n\n",
        scheme.join(",")
    ));

    out.push_str("[Scheme.Cur]\n");
    for file in built.values() {
        out.push_str(file);
        out.push('\n');
    }

    out.push_str("\n[Strings]\n");
    out.push_str(&format!("CUR_DIR = \"Cursors\\{}\"\n", theme_name));
    out.push_str(&format!("SCHEME_NAME = \"{}\"\n", theme_name));
    for role in WINDOWS_ROLES {
        if let Some(Some(file)) = resolved.get(role) {
            out.push_str(&format!("{} = \"{}\"\n", role, file));
        }
    }

    out
}

pub fn write_install_inf(
    theme_dir: &Path,
    theme_name: &str,
    manifest: &ThemeManifest,
    aliases: &AliasMapping,
    built: &BTreeMap<String, String>,
) -> BuildResult<bool> {
    let roles = manifest.roles();
    let resolved = resolve_roles(&roles, aliases, built);
    for (role, file) in &resolved {
        if file.is_none() {
            debug!("No cursor for Windows role {}", role);
        }
    }
    write_if_absent(&theme_dir.join(INF_FILE), || install_inf_content(theme_name, &resolved, built))
}

fn write_if_absent(path: &Path, content: impl FnOnce() -> String) -> BuildResult<bool> {
    if path.exists() {
        debug!("{} already exists, leaving it alone", path.display());
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn built(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(n, f)| (n.to_string(), f.to_string())).collect()
    }

    #[test]
    fn test_index_theme_minimal() {
        assert_eq!(
            index_theme_content("Capsule (Dark)", &ThemeManifest::default()),
            "[Icon Theme]\nName=Capsule (Dark)\n"
        );
    }

    #[test]
    fn test_index_theme_written_once() {
        let dir = tempdir().unwrap();
        let manifest = ThemeManifest {
            inherits: Some("hicolor".to_string()),
            ..Default::default()
        };

        assert!(write_index_theme(dir.path(), "First", &manifest).unwrap());
        assert!(!write_index_theme(dir.path(), "Second", &manifest).unwrap());

        let content = fs::read_to_string(dir.path().join(INDEX_FILE)).unwrap();
        assert_eq!(content, "[Icon Theme]\nName=First\nInherits=hicolor\n");
    }

    #[test]
    fn test_resolve_roles_through_aliases() {
        let mut roles = BTreeMap::new();
        roles.insert("Arrow".to_string(), "left_ptr".to_string());
        roles.insert("IBeam".to_string(), "xterm".to_string());
        roles.insert("Hand".to_string(), "pointer".to_string());
        let aliases = AliasMapping::parse("xterm text\n", Path::new("aliases")).unwrap();
        let built = built(&[("left_ptr", "left_ptr.cur"), ("text", "text.cur")]);

        let resolved = resolve_roles(&roles, &aliases, &built);
        assert_eq!(resolved["Arrow"].as_deref(), Some("left_ptr.cur"));
        assert_eq!(resolved["IBeam"].as_deref(), Some("text.cur"));
        assert_eq!(resolved["Hand"], None);
        assert_eq!(resolved.len(), WINDOWS_ROLES.len());
    }

    #[test]
    fn test_install_inf() {
        let dir = tempdir().unwrap();
        let built = built(&[("left_ptr", "left_ptr.cur"), ("wait", "wait.ani")]);
        let manifest = ThemeManifest::default();

        assert!(write_install_inf(dir.path(), "Capsule", &manifest, &AliasMapping::default(), &built).unwrap());
        let content = fs::read_to_string(dir.path().join(INF_FILE)).unwrap();

        assert!(content.contains("Arrow = \"left_ptr.cur\""));
        assert!(content.contains("Wait = \"wait.ani\""));
        assert!(!content.contains("Hand ="));
        assert!(content.contains("\"%10%\\%CUR_DIR%\\%Arrow%,,,%10%\\%CUR_DIR%\\%Wait%,"));
        assert!(content.contains("[Scheme.Cur]\nleft_ptr.cur\nwait.ani\n"));
        assert!(content.starts_with("; Capsule cursor scheme\n[Version]\n"));
        assert!(content.contains(",,,\"\n\n[Scheme.Cur]\n"));
        assert!(content.ends_with(
            "[Strings]\nCUR_DIR = \"Cursors\\Capsule\"\nSCHEME_NAME = \"Capsule\"\nArrow = \"left_ptr.cur\"\nWait = \"wait.ani\"\n"
        ));
    }
}
