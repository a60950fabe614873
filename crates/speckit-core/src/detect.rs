//! Technology and domain detection over free text, and the document
//! recommendations derived from it.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub const BASE_INSTRUCTION: &str = "context.instructions.md";
pub const DEFAULT_CHATMODE: &str = "dev.chatmode.md";
pub const CORE_CONSTITUTION: &str = "core-principles.constitution.md";

/// Domains whose constitutions are loaded ahead of technology instructions.
const CRITICAL_DOMAINS: [&str; 3] = ["security", "fintech", "healthcare"];

type PatternTable = Vec<(&'static str, Regex)>;

fn compile(table: &[(&'static str, &str)]) -> PatternTable {
    table
        .iter()
        .map(|(name, pattern)| {
            let re = Regex::new(&format!("(?i){}", pattern)).expect("valid detection pattern");
            (*name, re)
        })
        .collect()
}

static TECHNOLOGY_PATTERNS: LazyLock<PatternTable> = LazyLock::new(|| {
    compile(&[
        ("react", r"react|jsx|useState|useEffect|components?"),
        ("nextjs", r"next\.js|next|getStaticProps|getServerSideProps|pages/api"),
        ("angular", r"angular|@angular|ngOnInit|components?.*\.ts"),
        ("nestjs", r"nestjs|@nestjs|@Controller|@Service|@Injectable"),
        ("springboot", r"spring.*boot|@SpringBootApplication|@RestController|@Service"),
        ("flutter", r"flutter|dart|StatefulWidget|StatelessWidget"),
        ("go", r"package main|func main|goroutine|go\s+func"),
        ("rust", r"fn main|use std|cargo|impl.*for|trait"),
        ("csharp", r"using System|class.*:|public.*static.*void|\.NET"),
        ("docker", r"FROM.*:|COPY|RUN|EXPOSE|dockerfile"),
        ("kubernetes", r"apiVersion|kind:|metadata:|spec:|kubectl"),
        ("typescript", r"interface|type.*=|export.*type|\.ts$"),
        ("python", r"def |import |from.*import|\.py$"),
        ("java", r"public.*class|import.*java|\.java$"),
    ])
});

static DOMAIN_PATTERNS: LazyLock<PatternTable> = LazyLock::new(|| {
    compile(&[
        ("security", r"security|auth|encrypt|vulnerability|owasp|cyber"),
        ("fintech", r"payment|banking|financial|trading|blockchain|crypto|pci"),
        ("healthcare", r"patient|medical|healthcare|hipaa|clinical"),
        ("testing", r"test|testing|tdd|unit.*test|integration.*test"),
        ("performance", r"performance|scalability|optimization|load.*test"),
        ("ai-ml", r"ai|ml|machine.*learning|model|neural|tensorflow"),
        ("web3", r"blockchain|smart.*contract|web3|solidity|ethereum"),
    ])
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    pub detected_technologies: Vec<String>,
    pub detected_domains: Vec<String>,
    pub recommended_instructions: Vec<String>,
    pub recommended_chatmodes: Vec<String>,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub instructions: Vec<String>,
    pub chatmodes: Vec<String>,
    pub constitutional_domains: Vec<String>,
    pub workflow_suggestions: Vec<String>,
    pub priority_order: Vec<String>,
}

/// Payload of the `detect_and_load_context` tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextReport {
    pub detection_results: DetectionResult,
    pub recommendations: Recommendations,
    pub instructions_to_load: Vec<String>,
    pub chatmodes_to_load: Vec<String>,
    pub constitutional_domains: Vec<String>,
}

pub fn detect_and_load_context(content: &str, explicit_domains: &[String]) -> ContextReport {
    let detection = analyze(content, explicit_domains);
    let recommendations = recommend(&detection);
    tracing::debug!(
        technologies = ?detection.detected_technologies,
        domains = ?detection.detected_domains,
        confidence = detection.confidence_score,
        "analyzed content"
    );
    ContextReport {
        instructions_to_load: recommendations.instructions.clone(),
        chatmodes_to_load: recommendations.chatmodes.clone(),
        constitutional_domains: recommendations.constitutional_domains.clone(),
        detection_results: detection,
        recommendations,
    }
}

pub fn analyze(content: &str, explicit_domains: &[String]) -> DetectionResult {
    let technologies = detect_technologies(content);
    let domains = detect_domains(content, explicit_domains);
    DetectionResult {
        recommended_instructions: instructions_for(&technologies),
        recommended_chatmodes: chatmodes_for(&domains),
        confidence_score: confidence(technologies.len(), domains.len()),
        detected_technologies: technologies,
        detected_domains: domains,
    }
}

pub fn detect_technologies(content: &str) -> Vec<String> {
    TECHNOLOGY_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(content))
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Explicit domains first, in caller order, then detected ones in table order.
/// Each domain appears once.
pub fn detect_domains(content: &str, explicit_domains: &[String]) -> Vec<String> {
    let mut detected: Vec<String> = Vec::new();
    for domain in explicit_domains {
        if !detected.contains(domain) {
            detected.push(domain.clone());
        }
    }
    for (name, re) in DOMAIN_PATTERNS.iter() {
        if re.is_match(content) && !detected.iter().any(|d| d == name) {
            detected.push(name.to_string());
        }
    }
    detected
}

fn instruction_file(technology: &str) -> Option<&'static str> {
    Some(match technology {
        "react" => "reactjs.instructions.md",
        "nextjs" => "nextjs.instructions.md",
        "angular" => "angular.instructions.md",
        "nestjs" => "nestjs.instructions.md",
        "springboot" => "springboot.instructions.md",
        "flutter" => "dart-n-flutter.instructions.md",
        "go" => "go.instructions.md",
        "rust" => "rust.instructions.md",
        "csharp" => "csharp.instructions.md",
        "kubernetes" => "kubernetes-deployment-best-practices.instructions.md",
        "java" => "java.instructions.md",
        _ => return None,
    })
}

fn chatmode_files(domain: &str) -> &'static [&'static str] {
    match domain {
        "security" => &["security.chatmode.md"],
        "testing" => &["qa.chatmode.md"],
        "performance" => &["devops.chatmode.md", "sa.chatmode.md"],
        "fintech" | "healthcare" => &["security.chatmode.md", "sa.chatmode.md"],
        _ => &[],
    }
}

fn constitution_file(domain: &str) -> Option<&'static str> {
    Some(match domain {
        "security" => "security.constitution.md",
        "fintech" => "fintech.constitution.md",
        "healthcare" => "healthcare.constitution.md",
        "testing" => "testing.constitution.md",
        "performance" => "performance.constitution.md",
        "ai-ml" => "ai-ml.constitution.md",
        "web3" => "web3-blockchain.constitution.md",
        _ => return None,
    })
}

fn dedup_in_order<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(*item))
        .map(str::to_string)
        .collect()
}

pub fn instructions_for(technologies: &[String]) -> Vec<String> {
    dedup_in_order(
        std::iter::once(BASE_INSTRUCTION)
            .chain(technologies.iter().filter_map(|t| instruction_file(t))),
    )
}

pub fn chatmodes_for(domains: &[String]) -> Vec<String> {
    dedup_in_order(
        std::iter::once(DEFAULT_CHATMODE)
            .chain(domains.iter().flat_map(|d| chatmode_files(d).iter().copied())),
    )
}

/// Saturating score: technologies cap at 0.6, domains at 0.4.
pub fn confidence(technology_count: usize, domain_count: usize) -> f64 {
    let tech_weight = (technology_count as f64 * 0.3).min(0.6);
    let domain_weight = (domain_count as f64 * 0.2).min(0.4);
    (tech_weight + domain_weight).min(1.0)
}

pub fn recommend(detection: &DetectionResult) -> Recommendations {
    Recommendations {
        instructions: detection.recommended_instructions.clone(),
        chatmodes: detection.recommended_chatmodes.clone(),
        constitutional_domains: detection
            .detected_domains
            .iter()
            .filter_map(|d| constitution_file(d))
            .map(str::to_string)
            .collect(),
        workflow_suggestions: workflow_suggestions(detection),
        priority_order: priority_order(detection),
    }
}

fn workflow_suggestions(detection: &DetectionResult) -> Vec<String> {
    let has_domain = |d: &str| detection.detected_domains.iter().any(|x| x == d);
    let has_tech = |t: &str| detection.detected_technologies.iter().any(|x| x == t);

    let mut suggestions = Vec::new();
    if !detection.detected_technologies.is_empty() {
        suggestions.push("Load technology-specific instructions first");
    }
    if has_domain("security") {
        suggestions.push("Apply security constitutional principles");
        suggestions.push("Use security chatmode for sensitive operations");
    }
    if has_domain("testing") {
        suggestions.push("Enforce TDD constitutional requirements");
        suggestions.push("Switch to QA chatmode for test strategy");
    }
    if has_tech("kubernetes") {
        suggestions.push("Load DevOps best practices");
        suggestions.push("Apply deployment constitutional principles");
    }
    suggestions.into_iter().map(str::to_string).collect()
}

fn priority_order(detection: &DetectionResult) -> Vec<String> {
    let mut order = vec![CORE_CONSTITUTION.to_string(), BASE_INSTRUCTION.to_string()];
    for domain in CRITICAL_DOMAINS {
        if detection.detected_domains.iter().any(|d| d == domain) {
            order.push(format!("{}.constitution.md", domain));
        }
    }
    order.extend(
        detection
            .recommended_instructions
            .iter()
            .filter(|i| *i != BASE_INSTRUCTION)
            .cloned(),
    );
    order.extend(detection.recommended_chatmodes.iter().cloned());
    order
}
