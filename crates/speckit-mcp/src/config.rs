use std::path::{Path, PathBuf};

use anyhow::Context;

/// Directories whose presence marks a framework root.
const ROOT_MARKERS: [&str; 2] = ["memory", "chatmodes"];

/// Resolve the framework root with precedence: `--root` / `SPEC_KIT_ROOT`,
/// nearest ancestor of the executable holding `memory/` or `chatmodes/`,
/// then the working directory.
pub fn resolve_framework_root(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(root) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(root);
    }
    if let Some(root) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().and_then(find_framework_root))
    {
        return Ok(root);
    }
    std::env::current_dir().context("failed to determine working directory")
}

pub fn find_framework_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| ROOT_MARKERS.iter().any(|m| dir.join(m).is_dir()))
        .map(Path::to_path_buf)
}
