//! Filesystem access to the framework tree: constitutions under `memory/`
//! and persona documents under `chatmodes/`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::resources::Document;

const MEMORY_DIR: &str = "memory";
const CONSTITUTION_DIR: &str = "constitution";
const CHATMODES_DIR: &str = "chatmodes";

/// Root of a Spec-Kit framework checkout. All reads are relative to it.
#[derive(Debug, Clone)]
pub struct Framework {
    root: PathBuf,
}

impl Framework {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `memory/constitution.md`, the primary core document.
    pub fn constitution_path(&self) -> PathBuf {
        self.root.join(MEMORY_DIR).join("constitution.md")
    }

    pub fn domain_constitution_path(&self, domain: &str) -> PathBuf {
        self.root
            .join(MEMORY_DIR)
            .join(CONSTITUTION_DIR)
            .join(format!("{}.constitution.md", domain))
    }

    pub fn chatmode_path(&self, persona: &str) -> PathBuf {
        self.root
            .join(CHATMODES_DIR)
            .join(format!("{}.chatmode.md", persona))
    }

    /// Read whichever document a parsed resource address points at.
    pub fn read(&self, document: &Document) -> Result<String> {
        match document {
            Document::CoreConstitution => self.core_constitution(),
            Document::DomainConstitution(domain) => self.domain_constitution(domain),
            Document::Chatmode(persona) => self.chatmode(persona),
        }
    }

    /// Core constitution, falling back to `core-principles.constitution.md`.
    pub fn core_constitution(&self) -> Result<String> {
        if let Some(text) = read_optional(&self.constitution_path())? {
            return Ok(text);
        }
        let fallback = self.domain_constitution_path("core-principles");
        read_optional(&fallback)?
            .ok_or_else(|| Error::NotFound("Core constitutional principles not found".to_string()))
    }

    /// Domain constitution. A missing file yields a synthesized default
    /// document instead of an error.
    pub fn domain_constitution(&self, domain: &str) -> Result<String> {
        check_identifier(domain)?;
        match read_optional(&self.domain_constitution_path(domain))? {
            Some(text) => Ok(text),
            None => {
                tracing::info!(domain, "no constitution on disk, using default template");
                Ok(default_domain_constitution(domain))
            }
        }
    }

    pub fn chatmode(&self, persona: &str) -> Result<String> {
        check_identifier(persona)?;
        read_optional(&self.chatmode_path(persona))?
            .ok_or_else(|| Error::NotFound(format!("Chat mode not found: {}", persona)))
    }

    pub fn chatmode_exists(&self, persona: &str) -> bool {
        check_identifier(persona).is_ok() && self.chatmode_path(persona).is_file()
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => {
            tracing::debug!(path = %path.display(), bytes = text.len(), "read document");
            Ok(Some(text))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(Error::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Identifiers become file names, so they must stay inside their directory.
fn check_identifier(id: &str) -> Result<()> {
    if id == ".." || id.contains(['/', '\\']) {
        return Err(Error::InvalidArgument(id.to_string()));
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn default_domain_constitution(domain: &str) -> String {
    format!(
        "# {title} Constitutional Principles

Domain-specific constitutional principles for **{domain}** are not yet defined.

## Default Constitutional Requirements

Based on core principles, all {domain} implementations must follow:

1. **Test-First Development (TDD)**
   - RED: Write failing test first
   - GREEN: Write minimal code to pass
   - REFACTOR: Improve code while keeping tests green

2. **Interface Design**
   - Clear contracts with input/output validation
   - Consistent error handling and responses
   - Semantic versioning (MAJOR.MINOR.PATCH.BUILD)
   - Comprehensive API documentation

3. **Observability First**
   - Structured logging with correlation IDs
   - Metrics collection and monitoring
   - Health checks and readiness probes
   - Distributed tracing support

4. **Security by Design** (Critical for {domain})
   - Authentication and authorization
   - Input validation and sanitization
   - Secure communication (HTTPS/TLS)
   - Audit logging and compliance

5. **Platform Agnostic**
   - Cross-platform compatibility
   - Container-ready deployment
   - Configuration externalization
   - Environment-specific settings

To create domain-specific constitutional principles, add them to:
`memory/constitution/{domain}.constitution.md`
",
        title = capitalize(domain),
        domain = domain,
    )
}
