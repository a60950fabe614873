//! Core of the Spec-Kit MCP server: constitutional documents, agent personas,
//! context detection and compliance heuristics over a framework checkout.

pub mod compliance;
pub mod detect;
pub mod error;
pub mod framework;
pub mod markdown;
pub mod persona;
pub mod resources;

pub use compliance::{validate_compliance, ComplianceResult, ValidationType};
pub use detect::{detect_and_load_context, ContextReport, DetectionResult, Recommendations};
pub use error::{Error, Result};
pub use framework::Framework;
pub use persona::{PersonaConfig, PersonaSession, PersonaSwitch, TransitionGuidance};
pub use resources::{Document, ResourceEntry, CATALOG};
