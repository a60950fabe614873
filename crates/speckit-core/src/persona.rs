//! Agent personas: chatmode parsing, transition guidance and the per-session
//! "current persona" label.

use parking_lot::Mutex;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::framework::Framework;
use crate::markdown;

/// Persona ids accepted by `switch_agent_persona`.
pub const PERSONAS: [&str; 8] = ["pm", "sa", "dev", "qa", "devops", "security", "ba", "po"];

/// Label a fresh session starts with.
pub const DEFAULT_PERSONA: &str = "dev";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PersonaConfig {
    pub name: String,
    pub description: String,
    pub capabilities: Vec<String>,
    pub tools: Vec<String>,
    pub behavior: String,
    pub deliverables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionGuidance {
    pub transition_message: String,
    pub context_carryover: String,
    pub recommended_actions: Vec<String>,
    pub focus_areas: Vec<String>,
    pub deliverable_expectations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonaSwitch {
    pub previous_persona: String,
    pub current_persona: String,
    pub transition_context: String,
    pub persona_configuration: PersonaConfig,
    pub transition_guidance: TransitionGuidance,
    pub constitutional_requirements: Vec<String>,
}

/// Tracks which persona the connected agent last switched to. One per
/// client session; the label only feeds `previous_persona` in reports.
#[derive(Debug)]
pub struct PersonaSession {
    current: Mutex<String>,
}

impl Default for PersonaSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonaSession {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(DEFAULT_PERSONA.to_string()),
        }
    }

    pub fn current(&self) -> String {
        self.current.lock().clone()
    }

    pub fn switch(&self, framework: &Framework, persona: &str, context: &str) -> Result<PersonaSwitch> {
        if !framework.chatmode_exists(persona) {
            return Err(Error::InvalidPersona(persona.to_string()));
        }

        let content = framework.chatmode(persona)?;
        let config = parse_persona_config(&content, persona);

        let previous = std::mem::replace(&mut *self.current.lock(), persona.to_string());
        tracing::info!(from = %previous, to = persona, "switched persona");

        let transition_guidance = TransitionGuidance {
            transition_message: transition_message(&previous, persona),
            context_carryover: context.to_string(),
            recommended_actions: recommended_actions(persona),
            focus_areas: config.capabilities.iter().take(3).cloned().collect(),
            deliverable_expectations: config.deliverables.clone(),
        };

        Ok(PersonaSwitch {
            previous_persona: previous,
            current_persona: persona.to_string(),
            transition_context: context.to_string(),
            persona_configuration: config,
            transition_guidance,
            constitutional_requirements: constitutional_requirements(persona),
        })
    }
}

pub fn parse_persona_config(content: &str, persona: &str) -> PersonaConfig {
    let front = markdown::front_matter(content);
    PersonaConfig {
        name: display_name(persona),
        description: front.description,
        capabilities: markdown::section_items(content, "Key Capabilities"),
        tools: front.tools,
        behavior: markdown::section_items(content, "Persona Behavior")
            .into_iter()
            .next()
            .unwrap_or_default(),
        deliverables: markdown::section_items(content, "Deliverables"),
    }
}

pub fn display_name(persona: &str) -> String {
    let name = match persona {
        "pm" => "Product Manager",
        "sa" => "Solution Architect",
        "dev" => "Full Stack Developer",
        "qa" => "Quality Assurance Engineer",
        "devops" => "DevOps Engineer",
        "security" => "Security Engineer",
        "ba" => "Business Analyst",
        "po" => "Product Owner",
        other => return other.to_uppercase(),
    };
    name.to_string()
}

pub fn transition_message(from: &str, to: &str) -> String {
    let message = match (from, to) {
        ("pm", "sa") => "Transitioning from product strategy to technical architecture. Focus on translating business requirements into technical solutions.",
        ("pm", "dev") => "Moving from product planning to implementation. Ensure development aligns with product goals and user stories.",
        ("pm", "qa") => "Shifting from product definition to quality validation. Define acceptance criteria and test scenarios.",
        ("sa", "dev") => "Transitioning from architecture design to implementation. Follow architectural patterns and design principles.",
        ("sa", "devops") => "Moving from solution design to deployment strategy. Focus on scalability and operational requirements.",
        ("sa", "security") => "Shifting from general architecture to security architecture. Apply security by design principles.",
        ("dev", "qa") => "Transitioning from implementation to quality assurance. Provide context on code changes and potential test scenarios.",
        ("dev", "devops") => "Moving from development to deployment. Ensure code is deployment-ready with proper configurations.",
        ("dev", "sa") => "Shifting from implementation details to architectural review. Discuss technical decisions and patterns used.",
        ("qa", "dev") => "Transitioning from testing to development. Provide feedback on issues found and suggested improvements.",
        ("qa", "devops") => "Moving from quality assurance to deployment validation. Focus on production readiness and monitoring.",
        _ => {
            return format!(
                "Transitioning from {} to {} context.",
                display_name(from),
                display_name(to)
            )
        }
    };
    message.to_string()
}

pub fn recommended_actions(persona: &str) -> Vec<String> {
    let actions: &[&str] = match persona {
        "pm" => &[
            "Review and prioritize requirements",
            "Define acceptance criteria",
            "Validate business value alignment",
        ],
        "sa" => &[
            "Design technical architecture",
            "Define interface contracts",
            "Validate scalability requirements",
        ],
        "dev" => &[
            "Implement features following TDD",
            "Write comprehensive tests",
            "Follow coding standards and patterns",
        ],
        "qa" => &[
            "Design test scenarios and cases",
            "Validate functional requirements",
            "Perform integration testing with real dependencies",
        ],
        "devops" => &[
            "Setup deployment pipelines",
            "Configure monitoring and observability",
            "Ensure security and compliance",
        ],
        "security" => &[
            "Perform security assessment",
            "Validate authentication and authorization",
            "Review for security vulnerabilities",
        ],
        _ => &["Perform role-specific activities"],
    };
    actions.iter().map(|s| s.to_string()).collect()
}

pub fn constitutional_requirements(persona: &str) -> Vec<String> {
    let requirements: &[&str] = match persona {
        "pm" => &[
            "Define clear acceptance criteria",
            "Ensure business value alignment",
            "Validate user story completeness",
        ],
        "sa" => &[
            "Design with interface contracts",
            "Ensure platform agnostic architecture",
            "Plan for observability and monitoring",
        ],
        "dev" => &[
            "Follow TDD (RED-GREEN-REFACTOR)",
            "Implement proper error handling",
            "Write comprehensive tests before code",
        ],
        "qa" => &[
            "Use real dependencies in integration tests",
            "Follow Given-When-Then test structure",
            "Validate all acceptance criteria",
        ],
        "devops" => &[
            "Implement health checks",
            "Configure structured logging",
            "Ensure deployment automation",
        ],
        "security" => &[
            "Apply security by design principles",
            "Validate input sanitization",
            "Implement proper authentication",
        ],
        _ => &["Follow core constitutional principles"],
    };
    requirements.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const QA_DOC: &str = "---
description: \"Quality gatekeeper\"
tools: ['runTests', 'search']
---

## Key Capabilities
- **Test Design**: Scenario coverage
- **Automation**: CI suites
- **Exploratory**: Manual sessions
- **Performance**: Load checks

## Persona Behavior
- **Mindset**: Skeptical by default
- **Tone**: Precise

## Deliverables
- **Test Plan**: Scope and risks
";

    fn framework_with(personas: &[(&str, &str)]) -> (TempDir, Framework) {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("chatmodes");
        fs::create_dir_all(&dir).unwrap();
        for (id, body) in personas {
            fs::write(dir.join(format!("{id}.chatmode.md")), body).unwrap();
        }
        let fw = Framework::new(tmp.path());
        (tmp, fw)
    }

    #[test]
    fn display_names_cover_known_personas() {
        assert_eq!(display_name("ba"), "Business Analyst");
        assert_eq!(display_name("devops"), "DevOps Engineer");
        assert_eq!(display_name("ux"), "UX");
        for persona in PERSONAS {
            assert_ne!(display_name(persona), persona.to_uppercase());
        }
    }

    #[test]
    fn parses_full_chatmode() {
        let config = parse_persona_config(QA_DOC, "qa");
        assert_eq!(config.name, "Quality Assurance Engineer");
        assert_eq!(config.description, "Quality gatekeeper");
        assert_eq!(config.tools, vec!["runTests", "search"]);
        assert_eq!(config.capabilities.len(), 4);
        assert_eq!(config.behavior, "Mindset: Skeptical by default");
        assert_eq!(config.deliverables, vec!["Test Plan: Scope and risks"]);
    }

    #[test]
    fn bare_document_parses_to_defaults() {
        let config = parse_persona_config("# Product Owner\n", "po");
        assert_eq!(
            config,
            PersonaConfig {
                name: "Product Owner".into(),
                ..PersonaConfig::default()
            }
        );
    }

    #[test]
    fn switch_reports_previous_persona_and_guidance() {
        let (_tmp, fw) = framework_with(&[("qa", QA_DOC)]);
        let session = PersonaSession::new();

        let report = session.switch(&fw, "qa", "sprint 12 regression").unwrap();
        assert_eq!(report.previous_persona, "dev");
        assert_eq!(report.current_persona, "qa");
        assert_eq!(report.transition_context, "sprint 12 regression");
        assert_eq!(
            report.transition_guidance.transition_message,
            transition_message("dev", "qa")
        );
        assert_eq!(report.transition_guidance.context_carryover, "sprint 12 regression");
        assert_eq!(
            report.transition_guidance.focus_areas,
            vec![
                "Test Design: Scenario coverage",
                "Automation: CI suites",
                "Exploratory: Manual sessions",
            ]
        );
        assert_eq!(
            report.constitutional_requirements[1],
            "Follow Given-When-Then test structure"
        );
        assert_eq!(session.current(), "qa");
    }

    #[test]
    fn unknown_pair_uses_generic_message() {
        assert_eq!(
            transition_message("po", "ba"),
            "Transitioning from Product Owner to Business Analyst context."
        );
        assert_eq!(
            transition_message("qa", "qa"),
            "Transitioning from Quality Assurance Engineer to Quality Assurance Engineer context."
        );
    }

    #[test]
    fn unmapped_personas_get_generic_lists() {
        assert_eq!(recommended_actions("ba"), vec!["Perform role-specific activities"]);
        assert_eq!(
            constitutional_requirements("po"),
            vec!["Follow core constitutional principles"]
        );
    }

    #[test]
    fn missing_chatmode_is_invalid_persona_and_keeps_label() {
        let (_tmp, fw) = framework_with(&[]);
        let session = PersonaSession::new();
        let err = session.switch(&fw, "pm", "").unwrap_err();
        assert!(matches!(err, Error::InvalidPersona(ref p) if p == "pm"));
        assert!(err.to_string().starts_with("Invalid persona: pm."));
        assert_eq!(session.current(), DEFAULT_PERSONA);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let (_tmp, fw) = framework_with(&[("qa", QA_DOC)]);
        let report = PersonaSession::new().switch(&fw, "qa", "").unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert!(value["persona_configuration"]["deliverables"].is_array());
        assert!(value["transition_guidance"]["deliverable_expectations"].is_array());
    }
}
