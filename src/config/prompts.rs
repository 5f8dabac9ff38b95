//! Prompt templates for vidlib.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub rag: RagPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for answer synthesis over retrieved passages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    pub system: String,
    pub user: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an assistant that answers questions about a video library using excerpts from the video transcripts.

Guidelines:
- Answer using only the numbered excerpts provided
- Refer to excerpts by their number, e.g. [2]
- If the excerpts do not contain the answer, say so clearly
- Be concise; a short paragraph is usually enough
- Answer in the language of the question"#
                .to_string(),

            user: r#"Question: {{question}}

Excerpts:
{{context}}

Answer the question based on the excerpts above."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let rag_path = custom_path.join("rag.toml");
            if rag_path.exists() {
                let content = std::fs::read_to_string(&rag_path)?;
                prompts.rag = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.rag.system.is_empty());
        assert!(prompts.rag.user.contains("{{question}}"));
        assert!(prompts.rag.user.contains("{{context}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_provided_vars_override_custom() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("question".to_string(), "from config".to_string());
        prompts
            .variables
            .insert("site".to_string(), "the archive".to_string());

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "from caller".to_string());

        let out = prompts.render_with_custom("{{question}} @ {{site}}", &vars);
        assert_eq!(out, "from caller @ the archive");
    }

    #[test]
    fn test_load_custom_rag_prompts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("rag.toml"),
            "system = \"be brief\"\nuser = \"Q: {{question}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.rag.system, "be brief");
        assert_eq!(prompts.rag.user, "Q: {{question}}");
    }
}
