//! Heuristic constitutional compliance checks. Every check is a
//! case-insensitive regex presence test over the whole input; there is no
//! parsing, so false positives and negatives are expected.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::Result;
use crate::framework::Framework;

/// Validation modes accepted by `validate_constitutional_compliance`.
pub const VALIDATION_TYPES: [&str; 4] = ["code", "api", "architecture", "test"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationType {
    Code,
    Api,
    Architecture,
    Test,
}

impl ValidationType {
    /// Unknown names map to `None`; callers treat that as a no-op.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "code" => Some(Self::Code),
            "api" => Some(Self::Api),
            "architecture" => Some(Self::Architecture),
            "test" => Some(Self::Test),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceResult {
    pub constitutional_compliance: bool,
    pub violations: Vec<String>,
    pub recommendations: Vec<String>,
    pub domains_checked: Vec<String>,
}

impl ComplianceResult {
    fn new(domains: &[String]) -> Self {
        Self {
            constitutional_compliance: true,
            violations: Vec::new(),
            recommendations: Vec::new(),
            domains_checked: domains.to_vec(),
        }
    }

    fn violation(&mut self, message: &str) {
        self.violations.push(message.to_string());
        self.constitutional_compliance = false;
    }

    fn recommend(&mut self, message: &str) {
        self.recommendations.push(message.to_string());
    }
}

/// Constitution texts a validation runs under.
#[derive(Debug, Clone)]
pub struct ApplicableRules {
    pub core: String,
    pub domains: BTreeMap<String, String>,
}

/// Loads the core constitution (required) and each domain constitution
/// (missing ones are skipped).
pub fn load_applicable_rules(framework: &Framework, domains: &[String]) -> Result<ApplicableRules> {
    let core = framework.core_constitution()?;
    let mut loaded = BTreeMap::new();
    for domain in domains {
        match framework.domain_constitution(domain) {
            Ok(text) => {
                loaded.insert(domain.clone(), text);
            }
            Err(e) => tracing::debug!(domain = %domain, error = %e, "skipping domain rules"),
        }
    }
    Ok(ApplicableRules {
        core,
        domains: loaded,
    })
}

struct Heuristics {
    tests: Regex,
    public_interface: Regex,
    error_handling: Regex,
    logging: Regex,
    user_input: Regex,
    input_validation: Regex,
    api_docs: Regex,
    versioning: Regex,
    health_check: Regex,
    platform_specific: Regex,
    tight_coupling: Regex,
    integration_test: Regex,
    mocks: Regex,
    test_structure: Regex,
}

fn ci(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){}", pattern)).expect("valid compliance pattern")
}

static HEURISTICS: LazyLock<Heuristics> = LazyLock::new(|| Heuristics {
    tests: ci(r"test|spec|describe|it\("),
    public_interface: ci(r"public|export|api"),
    error_handling: ci(r"try|catch|throw|error|exception"),
    logging: ci(r"log|logger|console\."),
    user_input: ci(r"input|request|params|body|query"),
    input_validation: ci(r"validate|schema|joi|zod|yup"),
    api_docs: ci(r"swagger|openapi|@api|/\*\*.*@param"),
    versioning: ci(r"version|v\d+|/api/v"),
    health_check: ci(r"health|status|ping|ready"),
    platform_specific: ci(r"\.NET|\.net|windows|linux|macos|platform\.is"),
    tight_coupling: ci(r"import.*\.\./.*\.\./|require.*\.\./.*\.\./"),
    integration_test: ci(r"integration.*test|test.*integration"),
    mocks: ci(r"mock|stub|fake|spy|jest\.mock"),
    test_structure: ci(r"given|when|then|arrange|act|assert"),
});

pub fn validate_compliance(
    framework: &Framework,
    code: &str,
    validation_type: &str,
    domains: &[String],
) -> Result<ComplianceResult> {
    let rules = load_applicable_rules(framework, domains)?;
    tracing::debug!(
        core_bytes = rules.core.len(),
        domain_rules = rules.domains.len(),
        "loaded constitutional rules"
    );

    let mut result = ComplianceResult::new(domains);
    match ValidationType::parse(validation_type) {
        Some(kind) => check(kind, code, &mut result),
        None => tracing::warn!(validation_type, "unknown validation type, nothing checked"),
    }

    tracing::info!(
        validation_type,
        compliant = result.constitutional_compliance,
        violations = result.violations.len(),
        "compliance check finished"
    );
    Ok(result)
}

/// Runs the checks for one validation mode without touching the filesystem.
pub fn check(kind: ValidationType, code: &str, result: &mut ComplianceResult) {
    let h = &*HEURISTICS;
    match kind {
        ValidationType::Code => {
            if !h.tests.is_match(code) {
                result.violation("Missing tests - TDD requires test-first development");
            }
            if h.public_interface.is_match(code) && !h.error_handling.is_match(code) {
                result.violation("Missing error handling - All public interfaces must handle errors");
            }
            if !h.logging.is_match(code) {
                result.recommend("Consider adding structured logging for observability");
            }
            if h.user_input.is_match(code) && !h.input_validation.is_match(code) {
                result.violation("Missing input validation - All user inputs must be validated");
            }
        }
        ValidationType::Api => {
            if !h.api_docs.is_match(code) {
                result.violation("Missing API documentation - All APIs must be documented");
            }
            if !h.versioning.is_match(code) {
                result.violation("Missing versioning - All APIs must support semantic versioning");
            }
            if !h.health_check.is_match(code) {
                result.recommend("Consider adding health check endpoints");
            }
        }
        ValidationType::Architecture => {
            if h.platform_specific.is_match(code) {
                result.violation("Platform-specific code detected - Maintain platform agnostic design");
            }
            if h.tight_coupling.is_match(code) {
                result.recommend("Consider reducing coupling between services");
            }
        }
        ValidationType::Test => {
            if h.integration_test.is_match(code) && h.mocks.is_match(code) {
                result.violation("Mocks detected in integration tests - Use real dependencies only");
            }
            if !h.test_structure.is_match(code) {
                result.recommend("Consider using Given-When-Then structure for better test clarity");
            }
        }
    }
}
