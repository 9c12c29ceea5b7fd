//! Prompt library for the advisor backends
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/mentor/prompts/overrides/)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! This allows users to customize the advisor's voice without modifying the
//! source, while automatically getting new default prompts on upgrade.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default prompts (compiled into binary)
mod defaults {
    pub const FINANCIAL_ADVICE: &str = include_str!("../../../prompts/financial_advice.md");
    pub const PERSONALIZED_TIP: &str = include_str!("../../../prompts/personalized_tip.md");
    pub const NEGOTIATION_ROLEPLAY: &str = include_str!("../../../prompts/negotiation_roleplay.md");
    pub const EXPLAIN_TERM: &str = include_str!("../../../prompts/explain_term.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Main advisor prompt for a user's stated concern
    FinancialAdvice,
    /// Short practical tip grounded in the diagnostic numbers
    PersonalizedTip,
    /// Creditor roleplay script for debt negotiation practice
    NegotiationRoleplay,
    /// Plain-language glossary explanation
    ExplainTerm,
}

impl PromptId {
    /// Get the string identifier for this prompt
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FinancialAdvice => "financial_advice",
            Self::PersonalizedTip => "personalized_tip",
            Self::NegotiationRoleplay => "negotiation_roleplay",
            Self::ExplainTerm => "explain_term",
        }
    }

    /// Get all known prompt IDs
    pub fn all() -> &'static [PromptId] {
        &[
            Self::FinancialAdvice,
            Self::PersonalizedTip,
            Self::NegotiationRoleplay,
            Self::ExplainTerm,
        ]
    }

    /// Get the default embedded content for this prompt
    fn default_content(&self) -> &'static str {
        match self {
            Self::FinancialAdvice => defaults::FINANCIAL_ADVICE,
            Self::PersonalizedTip => defaults::PERSONALIZED_TIP,
            Self::NegotiationRoleplay => defaults::NEGOTIATION_ROLEPLAY,
            Self::ExplainTerm => defaults::EXPLAIN_TERM,
        }
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    /// Unique identifier
    pub id: String,
    /// Version number for tracking changes
    pub version: u32,
    /// Language the prompt is written in (pt-BR for all defaults)
    pub language: String,
}

/// A loaded prompt with metadata and content
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Metadata from frontmatter
    pub metadata: PromptMetadata,
    /// The prompt content (user section plus any preamble)
    pub content: String,
    /// Whether this came from an override file
    pub is_override: bool,
    /// Path to override file (if any)
    pub override_path: Option<PathBuf>,
}

impl Prompt {
    /// Get the user section of the prompt
    pub fn user_section(&self) -> Option<&str> {
        extract_section(&self.content, "# User")
    }

    /// Render just the user section with `{{var}}` placeholders replaced
    pub fn render_user(&self, vars: &HashMap<&str, &str>) -> String {
        let template = self.user_section().unwrap_or(&self.content);
        let mut result = template.to_string();
        for (key, value) in vars {
            let pattern = format!("{{{{{}}}}}", key);
            result = result.replace(&pattern, value);
        }
        result
    }
}

/// Prompt library for loading and caching prompts
pub struct PromptLibrary {
    /// Override directory path
    override_dir: Option<PathBuf>,
    /// Cached parsed prompts
    cache: HashMap<PromptId, Prompt>,
}

impl PromptLibrary {
    /// Create a new prompt library with default paths
    pub fn new() -> Self {
        let override_dir = default_prompts_dir();
        Self {
            override_dir,
            cache: HashMap::new(),
        }
    }

    /// Create a prompt library with a custom override directory
    pub fn with_override_dir(path: PathBuf) -> Self {
        Self {
            override_dir: Some(path),
            cache: HashMap::new(),
        }
    }

    /// Create a prompt library with no override directory (embedded only)
    pub fn embedded_only() -> Self {
        Self {
            override_dir: None,
            cache: HashMap::new(),
        }
    }

    /// Get a prompt by ID, loading from override or default
    pub fn get(&mut self, id: PromptId) -> Result<&Prompt> {
        if !self.cache.contains_key(&id) {
            let prompt = self.load(id)?;
            self.cache.insert(id, prompt);
        }
        Ok(self.cache.get(&id).unwrap())
    }

    /// Load a prompt (checking override first, then default)
    fn load(&self, id: PromptId) -> Result<Prompt> {
        if let Some(ref override_dir) = self.override_dir {
            let override_path = override_dir.join(format!("{}.md", id.as_str()));
            if override_path.exists() {
                let content = fs::read_to_string(&override_path).map_err(|e| {
                    Error::Prompt(format!("Failed to read prompt override: {}", e))
                })?;
                let (metadata, body) = parse_prompt(&content)?;
                return Ok(Prompt {
                    metadata,
                    content: body,
                    is_override: true,
                    override_path: Some(override_path),
                });
            }
        }

        let content = id.default_content();
        let (metadata, body) = parse_prompt(content)?;
        Ok(Prompt {
            metadata,
            content: body,
            is_override: false,
            override_path: None,
        })
    }

    /// Check if a prompt has an override file
    pub fn has_override(&self, id: PromptId) -> bool {
        if let Some(ref override_dir) = self.override_dir {
            override_dir.join(format!("{}.md", id.as_str())).exists()
        } else {
            false
        }
    }

    /// Get the override directory path
    pub fn override_dir(&self) -> Option<&PathBuf> {
        self.override_dir.as_ref()
    }

    /// Clear the cache (useful after editing override files)
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Default prompts override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("mentor").join("prompts").join("overrides"))
}

/// Parse a prompt file into metadata and body
fn parse_prompt(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    if !content.starts_with("---") {
        return Err(Error::Prompt(
            "Prompt must start with YAML frontmatter (---)".into(),
        ));
    }

    let rest = &content[3..];
    let end = rest
        .find("---")
        .ok_or_else(|| Error::Prompt("Prompt frontmatter not closed (missing second ---)".into()))?;

    let frontmatter = &rest[..end].trim();
    let body = &rest[end + 3..].trim();

    let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
        .map_err(|e| Error::Prompt(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, body.to_string()))
}

/// Extract a section from the prompt content
fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = content.find(header)?;
    let after_header = &content[start + header.len()..];

    // Find the next header or end of content
    let end = after_header.find("\n# ").unwrap_or(after_header.len());

    Some(after_header[..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_prompt_frontmatter() {
        let content = r#"---
id: test_prompt
version: 1
language: pt-BR
---

# User
Olá {{nome}}.
"#;

        let (metadata, body) = parse_prompt(content).unwrap();
        assert_eq!(metadata.id, "test_prompt");
        assert_eq!(metadata.version, 1);
        assert_eq!(metadata.language, "pt-BR");
        assert!(body.contains("# User"));
    }

    #[test]
    fn missing_frontmatter_is_rejected() {
        assert!(parse_prompt("# User\nsem frontmatter").is_err());
    }

    #[test]
    fn render_user_replaces_vars() {
        let content = r#"---
id: test
version: 1
language: pt-BR
---

# User
Olá {{nome}}, sua dívida é {{valor}}."#;

        let (metadata, body) = parse_prompt(content).unwrap();
        let prompt = Prompt {
            metadata,
            content: body,
            is_override: false,
            override_path: None,
        };

        let mut vars = HashMap::new();
        vars.insert("nome", "Maria");
        vars.insert("valor", "R$ 1200,00");

        let rendered = prompt.render_user(&vars);
        assert!(rendered.contains("Olá Maria"));
        assert!(rendered.contains("R$ 1200,00"));
        assert!(!rendered.contains("# User"));
    }

    #[test]
    fn embedded_prompts_all_parse() {
        for id in PromptId::all() {
            let result = parse_prompt(id.default_content());
            assert!(
                result.is_ok(),
                "Failed to parse {}: {:?}",
                id.as_str(),
                result.err()
            );
            let (metadata, _) = result.unwrap();
            assert_eq!(metadata.id, id.as_str());
            assert_eq!(metadata.language, "pt-BR");
        }
    }

    #[test]
    fn library_loads_embedded_without_overrides() {
        let mut lib = PromptLibrary::embedded_only();
        for id in PromptId::all() {
            let prompt = lib.get(*id).unwrap();
            assert!(!prompt.is_override);
            assert!(prompt.override_path.is_none());
        }
    }

    #[test]
    fn override_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("explain_term.md");
        std::fs::write(
            &path,
            "---\nid: explain_term\nversion: 9\nlanguage: pt-BR\n---\n\n# User\nExplique {{termo}} à moda antiga.",
        )
        .unwrap();

        let mut lib = PromptLibrary::with_override_dir(dir.path().to_path_buf());
        let prompt = lib.get(PromptId::ExplainTerm).unwrap();
        assert!(prompt.is_override);
        assert_eq!(prompt.metadata.version, 9);
    }
}
