//! `speckit-mcp init`: register this binary with the MCP clients installed
//! on the machine, scoped to the current project.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};

const SERVER_KEY: &str = "spec-kit";

/// Write project-scoped MCP config files in the current directory so that
/// Claude Code and/or Codex discover speckit-mcp when working in this project.
/// Only writes config for tools that are actually installed.
pub fn init_project(root: &Path) -> anyhow::Result<()> {
    let binary_path = std::env::current_exe()
        .and_then(|p| p.canonicalize())
        .context("failed to locate the speckit-mcp executable")?
        .to_string_lossy()
        .to_string();
    let root = root.to_string_lossy().to_string();
    let cwd = std::env::current_dir().context("failed to determine working directory")?;

    let has_claude = which("claude");
    let has_codex = which("codex");
    if !has_claude && !has_codex {
        bail!("Neither `claude` nor `codex` found in PATH. Install Claude Code or OpenAI Codex first, then re-run `speckit-mcp init`.");
    }

    let mut configured = Vec::new();
    if has_claude {
        let path = write_claude_config(&cwd, &binary_path, &root)?;
        eprintln!("Wrote {}", path.display());
        configured.push("Claude Code");
    }
    if has_codex {
        let path = write_codex_config(&cwd, &binary_path, &root)?;
        eprintln!("Wrote {}", path.display());
        configured.push("Codex");
    }

    eprintln!(
        "\nDone. {} will use spec-kit in this project.",
        configured.join(" and ")
    );
    Ok(())
}

fn which(name: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| {
            std::env::split_paths(&paths).any(|dir| {
                dir.join(name).is_file() || dir.join(format!("{name}.exe")).is_file()
            })
        })
        .unwrap_or(false)
}

/// Merge a stdio server entry into `.mcp.json`.
fn write_claude_config(
    dir: &Path,
    binary_path: &str,
    root: &str,
) -> anyhow::Result<std::path::PathBuf> {
    let path = dir.join(".mcp.json");
    let mut doc: serde_json::Value = if path.exists() {
        let contents =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&contents).unwrap_or_else(|_| serde_json::json!({}))
    } else {
        serde_json::json!({})
    };
    if !doc.is_object() {
        doc = serde_json::json!({});
    }

    if !doc.get("mcpServers").is_some_and(|v| v.is_object()) {
        doc["mcpServers"] = serde_json::json!({});
    }
    doc["mcpServers"][SERVER_KEY] = serde_json::json!({
        "type": "stdio",
        "command": binary_path,
        "args": ["--root", root],
    });

    fs::write(&path, serde_json::to_string_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Merge an `[mcp_servers.spec-kit]` table into `.codex/config.toml`.
fn write_codex_config(
    dir: &Path,
    binary_path: &str,
    root: &str,
) -> anyhow::Result<std::path::PathBuf> {
    let codex_dir = dir.join(".codex");
    let path = codex_dir.join("config.toml");

    let mut doc: toml_edit::DocumentMut = if path.exists() {
        fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?
            .parse()
            .unwrap_or_default()
    } else {
        toml_edit::DocumentMut::new()
    };

    if !doc.contains_table("mcp_servers") {
        doc["mcp_servers"] = toml_edit::Item::Table(toml_edit::Table::new());
    }

    let mut args = toml_edit::Array::new();
    args.push("--root");
    args.push(root);

    let mut server = toml_edit::Table::new();
    server.insert("command", toml_edit::value(binary_path));
    server.insert("args", toml_edit::value(args));
    doc["mcp_servers"][SERVER_KEY] = toml_edit::Item::Table(server);

    fs::create_dir_all(&codex_dir)
        .with_context(|| format!("creating {}", codex_dir.display()))?;
    fs::write(&path, doc.to_string()).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn claude_config_keeps_other_servers() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(".mcp.json"),
            r#"{"mcpServers": {"other": {"type": "stdio", "command": "other"}}}"#,
        )
        .unwrap();

        write_claude_config(tmp.path(), "/usr/bin/speckit-mcp", "/srv/kit").unwrap();

        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(tmp.path().join(".mcp.json")).unwrap())
                .unwrap();
        assert_eq!(doc["mcpServers"]["other"]["command"], "other");
        assert_eq!(
            doc["mcpServers"]["spec-kit"],
            serde_json::json!({
                "type": "stdio",
                "command": "/usr/bin/speckit-mcp",
                "args": ["--root", "/srv/kit"],
            })
        );
    }

    #[test]
    fn claude_config_replaces_garbage() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".mcp.json"), "[not json").unwrap();
        write_claude_config(tmp.path(), "speckit-mcp", "/kit").unwrap();
        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(tmp.path().join(".mcp.json")).unwrap())
                .unwrap();
        assert_eq!(doc["mcpServers"]["spec-kit"]["command"], "speckit-mcp");
    }

    #[test]
    fn codex_config_merges_into_existing_toml() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".codex")).unwrap();
        fs::write(
            tmp.path().join(".codex/config.toml"),
            "model = \"o4\"\n\n[mcp_servers.other]\ncommand = \"other\"\n",
        )
        .unwrap();

        write_codex_config(tmp.path(), "/usr/bin/speckit-mcp", "/srv/kit").unwrap();

        let text = fs::read_to_string(tmp.path().join(".codex/config.toml")).unwrap();
        let doc: toml_edit::DocumentMut = text.parse().unwrap();
        assert_eq!(doc["model"].as_str(), Some("o4"));
        assert_eq!(doc["mcp_servers"]["other"]["command"].as_str(), Some("other"));
        assert_eq!(
            doc["mcp_servers"]["spec-kit"]["command"].as_str(),
            Some("/usr/bin/speckit-mcp")
        );
        let args = doc["mcp_servers"]["spec-kit"]["args"].as_array().unwrap();
        assert_eq!(args.len(), 2);
    }
}
