//! Regex-level extraction from chatmode documents. Deliberately lenient:
//! malformed front matter or missing sections yield empty values.

use std::sync::LazyLock;

use regex::Regex;

static FRONT_MATTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^---\n(.*?)\n---").expect("valid front matter regex"));
static DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"description:\s*"([^"]+)""#).expect("valid description regex"));
static TOOLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)tools:\s*\[(.*?)\]").expect("valid tools regex"));
static BOLD_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^- \*\*(.*?)\*\*: (.*?)$").expect("valid list item regex")
});

/// Fields read from the `---` block at the top of a chatmode file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub description: String,
    pub tools: Vec<String>,
}

pub fn front_matter(content: &str) -> FrontMatter {
    let Some(block) = FRONT_MATTER.captures(content).and_then(|c| c.get(1)) else {
        return FrontMatter::default();
    };
    let block = block.as_str();

    let description = DESCRIPTION
        .captures(block)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let tools = TOOLS
        .captures(block)
        .and_then(|c| c.get(1))
        .map(|m| {
            m.as_str()
                .split(',')
                .map(|t| t.trim().replace(['\'', '"'], ""))
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    FrontMatter { description, tools }
}

/// Body of `## <name>` (ASCII case-insensitive) up to the next `##` or end
/// of input.
pub fn section<'a>(content: &'a str, name: &str) -> Option<&'a str> {
    // ASCII lowercasing keeps byte offsets aligned with `content`.
    let haystack = content.to_ascii_lowercase();
    let heading = format!("## {}", name.to_ascii_lowercase());
    let start = haystack.find(&heading)?;
    let body = start + heading.len();
    let end = content[body..]
        .find("##")
        .map(|offset| body + offset)
        .unwrap_or(content.len());
    Some(&content[start..end])
}

/// `- **Label**: text` lines of a section, rendered as `Label: text`.
pub fn section_items(content: &str, name: &str) -> Vec<String> {
    let Some(body) = section(content, name) else {
        return Vec::new();
    };
    BOLD_ITEM
        .captures_iter(body)
        .map(|c| format!("{}: {}", &c[1], &c[2]))
        .collect()
}
