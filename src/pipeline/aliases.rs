// Alias symlinks inside a built cursors directory.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::BuildResult;
use crate::model::mapping::AliasMapping;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct LinkReport {
    pub created: usize,
    /// Alias already present (file, link or dangling link).
    pub existing: usize,
    /// Canonical cursor was not built.
    pub missing_target: usize,
}

/// Creates `<alias> -> <cursor>` relative links for every pair, where
/// `<cursor>` is the built file the canonical name resolves to through the
/// mapping. An alias that already exists is left untouched, so the first
/// link written wins.
pub fn link_aliases(cursors_dir: &Path, mapping: &AliasMapping) -> BuildResult<LinkReport> {
    let mut report = LinkReport::default();

    // only compiled cursors count as targets, never links made by an earlier run
    let built = |name: &str| {
        fs::symlink_metadata(cursors_dir.join(name))
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    };

    for (alias, canonical) in &mapping.entries {
        let alias_path = cursors_dir.join(alias);

        // symlink_metadata also sees dangling links
        if fs::symlink_metadata(&alias_path).is_ok() {
            report.existing += 1;
            continue;
        }

        let Some(target) = mapping.resolve(canonical, &built) else {
            debug!("Skipping alias {} -> {}: target not built", alias, canonical);
            report.missing_target += 1;
            continue;
        };

        symlink(target, &alias_path)?;
        report.created += 1;
    }

    Ok(report)
}

#[cfg(unix)]
fn symlink(target: &str, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &str, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
