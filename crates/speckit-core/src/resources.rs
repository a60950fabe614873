//! Resource addressing (`constitutional://` and `chatmode://` URIs) and the
//! fixed catalog advertised to clients.

use crate::error::{Error, Result};

pub const CONSTITUTIONAL_SCHEME: &str = "constitutional://";
pub const CHATMODE_SCHEME: &str = "chatmode://";
pub const MARKDOWN_MIME: &str = "text/markdown";

const CORE_PRINCIPLES_URI: &str = "constitutional://core-principles";
const DOMAIN_PREFIX: &str = "constitutional://context/";

/// A parsed resource address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    CoreConstitution,
    DomainConstitution(String),
    Chatmode(String),
}

impl Document {
    pub fn parse(uri: &str) -> Result<Self> {
        if uri.starts_with(CONSTITUTIONAL_SCHEME) {
            if uri == CORE_PRINCIPLES_URI {
                return Ok(Document::CoreConstitution);
            }
            if let Some(domain) = uri.strip_prefix(DOMAIN_PREFIX) {
                return Ok(Document::DomainConstitution(domain.to_string()));
            }
            return Err(Error::UnknownResource(format!(
                "Unknown constitutional URI: {}",
                uri
            )));
        }
        if let Some(persona) = uri.strip_prefix(CHATMODE_SCHEME) {
            return Ok(Document::Chatmode(persona.to_string()));
        }
        Err(Error::UnknownResource(format!("Unknown resource: {}", uri)))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResourceEntry {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
}

const fn entry(
    uri: &'static str,
    name: &'static str,
    description: &'static str,
) -> ResourceEntry {
    ResourceEntry {
        uri,
        name,
        description,
        mime_type: MARKDOWN_MIME,
    }
}

pub const CATALOG: &[ResourceEntry] = &[
    entry(
        CORE_PRINCIPLES_URI,
        "Core Constitutional Principles",
        "Non-negotiable framework rules (TDD, Interface Design, etc.)",
    ),
    entry(
        "constitutional://context/security",
        "Security Constitutional Rules",
        "Security-specific constitutional principles",
    ),
    entry(
        "constitutional://context/fintech",
        "Fintech Constitutional Rules",
        "Financial technology constitutional principles",
    ),
    entry(
        "constitutional://context/healthcare",
        "Healthcare Constitutional Rules",
        "Healthcare-specific constitutional principles",
    ),
    entry(
        "chatmode://dev",
        "Developer Agent Mode",
        "Full stack developer persona configuration",
    ),
    entry(
        "chatmode://qa",
        "QA Agent Mode",
        "Quality assurance engineer persona configuration",
    ),
    entry(
        "chatmode://sa",
        "Solution Architect Agent Mode",
        "Solution architect persona configuration",
    ),
];
