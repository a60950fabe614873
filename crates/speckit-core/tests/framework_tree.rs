use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use speckit_core::{
    detect_and_load_context, validate_compliance, Document, Error, Framework, PersonaSession,
    CATALOG,
};
use tempfile::TempDir;

const DEV_CHATMODE: &str = "---
description: \"Full stack implementation with TDD\"
tools: ['codebase', 'editFiles', 'runTests']
---

# Developer Mode

## Key Capabilities
- **Implementation**: Production-quality features
- **Testing**: Unit and integration tests
- **Refactoring**: Keeps the code healthy
- **Debugging**: Root-cause analysis

## Persona Behavior
- **Approach**: Red, green, refactor

## Deliverables
- **Code**: Reviewed pull requests
- **Tests**: Passing suites
";

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

/// A framework tree with a core constitution, one domain and two personas.
fn framework_tree() -> (TempDir, Framework) {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "memory/constitution.md", "# Core Principles\n");
    write(
        tmp.path(),
        "memory/constitution/security.constitution.md",
        "# Security Principles\n",
    );
    write(tmp.path(), "chatmodes/dev.chatmode.md", DEV_CHATMODE);
    write(tmp.path(), "chatmodes/sa.chatmode.md", "# Architect\n");
    let fw = Framework::new(tmp.path());
    (tmp, fw)
}

#[test]
fn reads_catalog_resources() {
    let (_tmp, fw) = framework_tree();
    for entry in CATALOG {
        let doc = Document::parse(entry.uri).unwrap();
        match fw.read(&doc) {
            Ok(text) => assert!(!text.is_empty(), "{} is empty", entry.uri),
            // qa has no chatmode in this tree
            Err(Error::NotFound(msg)) => assert_eq!(msg, "Chat mode not found: qa"),
            Err(e) => panic!("unexpected error for {}: {e}", entry.uri),
        }
    }
}

#[test]
fn domain_resource_falls_back_to_template() {
    let (_tmp, fw) = framework_tree();
    let doc = Document::parse("constitutional://context/healthcare").unwrap();
    let text = fw.read(&doc).unwrap();
    assert!(text.starts_with("# Healthcare Constitutional Principles"));
}

#[test]
fn switching_round_trip_tracks_previous_persona() {
    let (_tmp, fw) = framework_tree();
    let session = PersonaSession::new();

    let to_sa = session.switch(&fw, "sa", "design review").unwrap();
    assert_eq!(to_sa.previous_persona, "dev");
    assert_eq!(to_sa.persona_configuration.name, "Solution Architect");
    assert!(to_sa.persona_configuration.capabilities.is_empty());
    assert_eq!(
        to_sa.transition_guidance.transition_message,
        "Shifting from implementation details to architectural review. Discuss technical decisions and patterns used."
    );

    let to_dev = session.switch(&fw, "dev", "").unwrap();
    assert_eq!(to_dev.previous_persona, "sa");
    let config = &to_dev.persona_configuration;
    assert_eq!(config.description, "Full stack implementation with TDD");
    assert_eq!(config.tools, vec!["codebase", "editFiles", "runTests"]);
    assert_eq!(config.behavior, "Approach: Red, green, refactor");
    assert_eq!(to_dev.transition_guidance.focus_areas.len(), 3);
    assert_eq!(
        to_dev.transition_guidance.deliverable_expectations,
        vec!["Code: Reviewed pull requests", "Tests: Passing suites"]
    );
}

#[test]
fn switching_to_missing_persona_fails() {
    let (_tmp, fw) = framework_tree();
    let err = PersonaSession::new().switch(&fw, "po", "").unwrap_err();
    assert!(matches!(err, Error::InvalidPersona(_)));
}

#[test]
fn compliance_tolerates_missing_domains() {
    let (_tmp, fw) = framework_tree();
    let domains = vec!["security".to_string(), "gaming".to_string()];
    let result = validate_compliance(&fw, "integration test with jest.mock()", "test", &domains)
        .unwrap();
    assert!(!result.constitutional_compliance);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.domains_checked, domains);
}

#[test]
fn unknown_validation_type_is_a_passing_no_op() {
    let (_tmp, fw) = framework_tree();
    let result = validate_compliance(&fw, "anything at all", "lint", &[]).unwrap();
    assert!(result.constitutional_compliance);
    assert!(result.violations.is_empty());
    assert!(result.recommendations.is_empty());
}

#[test]
fn compliance_requires_core_constitution() {
    let tmp = TempDir::new().unwrap();
    let fw = Framework::new(tmp.path());
    let err = validate_compliance(&fw, "x", "code", &[]).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn context_report_serializes_with_wire_keys() {
    let report = detect_and_load_context("kubectl rollout with cargo for the patient", &[]);
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(
        value["detection_results"]["detected_technologies"],
        serde_json::json!(["rust", "kubernetes"])
    );
    assert_eq!(value["instructions_to_load"][0], "context.instructions.md");
    assert!(value["recommendations"]["priority_order"].is_array());
}
