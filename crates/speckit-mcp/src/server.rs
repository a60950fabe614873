use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        AnnotateAble, CallToolResult, Content, ListResourcesResult, PaginatedRequestParams,
        RawResource, ReadResourceRequestParams, ReadResourceResult, Resource, ResourceContents,
        ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use serde::{Deserialize, Serialize};
use speckit_core::{compliance, detect, Document, Framework, PersonaSession, CATALOG};

// --- Request types ---

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DetectContextRequest {
    /// Code or conversation content to analyze for context detection
    pub content: String,
    /// Explicitly specified domains to load (security, fintech, healthcare, etc.)
    #[serde(default)]
    pub explicit_domains: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SwitchPersonaRequest {
    /// The agent persona to switch to
    #[schemars(extend("enum" = ["pm", "sa", "dev", "qa", "devops", "security", "ba", "po"]))]
    pub persona: String,
    /// Additional context for the persona switch
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ValidateComplianceRequest {
    /// Code to validate against constitutional principles
    pub code: String,
    /// Type of validation to perform
    #[serde(rename = "type")]
    #[schemars(extend("enum" = ["code", "api", "architecture", "test"]))]
    pub validation_type: String,
    /// Specific domains to validate against
    #[serde(default)]
    pub domains: Vec<String>,
}

// --- Server ---

/// One instance per client connection; the persona label lives here so it
/// is scoped to the session rather than the process.
#[derive(Clone)]
pub struct SpecKitServer {
    framework: Arc<Framework>,
    session: Arc<PersonaSession>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SpecKitServer {
    pub fn new(framework: Framework) -> Self {
        Self {
            framework: Arc::new(framework),
            session: Arc::new(PersonaSession::new()),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Auto-detect technology/domain and load appropriate constitutional context")]
    fn detect_and_load_context(
        &self,
        Parameters(req): Parameters<DetectContextRequest>,
    ) -> Result<CallToolResult, McpError> {
        let report = detect::detect_and_load_context(&req.content, &req.explicit_domains);
        json_result(&report)
    }

    #[tool(description = "Switch between different agent personas (PM, SA, Dev, QA, etc.)")]
    fn switch_agent_persona(
        &self,
        Parameters(req): Parameters<SwitchPersonaRequest>,
    ) -> Result<CallToolResult, McpError> {
        let report = self
            .session
            .switch(&self.framework, &req.persona, &req.context)
            .map_err(to_mcp_error)?;
        json_result(&report)
    }

    #[tool(description = "Validate code or design against constitutional principles")]
    fn validate_constitutional_compliance(
        &self,
        Parameters(req): Parameters<ValidateComplianceRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = compliance::validate_compliance(
            &self.framework,
            &req.code,
            &req.validation_type,
            &req.domains,
        )
        .map_err(to_mcp_error)?;
        json_result(&result)
    }

    /// Resolve a `constitutional://` or `chatmode://` URI to its markdown.
    pub fn read_document(&self, uri: &str) -> Result<String, McpError> {
        let document = Document::parse(uri).map_err(to_mcp_error)?;
        self.framework.read(&document).map_err(to_mcp_error)
    }

    #[cfg(test)]
    pub fn current_persona(&self) -> String {
        self.session.current()
    }
}

#[tool_handler]
impl ServerHandler for SpecKitServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(catalog_resources()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = self.read_document(&request.uri)?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri.clone())],
        })
    }
}

// --- Helpers ---

pub fn catalog_resources() -> Vec<Resource> {
    CATALOG
        .iter()
        .map(|entry| {
            let mut raw = RawResource::new(entry.uri, entry.name);
            raw.description = Some(entry.description.to_string());
            raw.mime_type = Some(entry.mime_type.to_string());
            raw.no_annotation()
        })
        .collect()
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn to_mcp_error(err: speckit_core::Error) -> McpError {
    use speckit_core::Error;

    tracing::warn!(error = %err, "rejecting call");
    let message = err.to_string();
    match err {
        Error::NotFound(_) | Error::UnknownResource(_) => McpError::resource_not_found(message, None),
        Error::InvalidPersona(_) | Error::InvalidArgument(_) => McpError::invalid_params(message, None),
        Error::Io { .. } => McpError::internal_error(message, None),
    }
}

const INSTRUCTIONS: &str = r#"Spec-Kit serves constitutional engineering principles and agent personas.

## Resources
- `constitutional://core-principles`: non-negotiable rules (TDD, interface design, observability, security, platform agnosticism).
- `constitutional://context/{domain}`: domain rules; domains without a document get a default derived from the core principles.
- `chatmode://{persona}`: persona definitions (pm, sa, dev, qa, devops, security, ba, po).

## Workflow
1. Call `detect_and_load_context` with the code or conversation at hand. Load the returned documents in `priority_order`.
2. Call `switch_agent_persona` when the task moves to a different role. Follow the returned `recommended_actions` and `constitutional_requirements`.
3. Call `validate_constitutional_compliance` on code, API definitions, architecture notes or tests before handing work off. Violations block; recommendations are advisory."#;
