//! Init command implementation
//!
//! Writes a starter `deepscribe.toml` plus `.env.example` into a directory.

use super::output::Output;
use super::InitProvider;
use crate::utils::config::{DeepscribeConfig, LlmProviderKind, DEFAULT_CONFIG_FILE};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug, PartialEq, Eq)]
pub enum InitResult {
    Success,
    /// deepscribe.toml already exists and --force was not given
    AlreadyExists,
    Error(String),
}

/// Configuration for the init command
#[derive(Debug, Clone)]
pub struct InitConfig {
    pub path: PathBuf,
    pub force: bool,
    pub provider: InitProvider,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing deepscribe");

    let base_path = &config.path;
    if !base_path.exists() {
        if let Err(e) = fs::create_dir_all(base_path) {
            output.error(&format!("Failed to create {}: {}", base_path.display(), e));
            return InitResult::Error(e.to_string());
        }
    }

    let config_path = base_path.join(DEFAULT_CONFIG_FILE);
    if config_path.exists() && !config.force {
        output.warning(&format!("{} already exists!", DEFAULT_CONFIG_FILE));
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    let toml_content = match generate_config(config.provider) {
        Ok(content) => content,
        Err(e) => {
            output.error(&format!("Failed to render configuration: {}", e));
            return InitResult::Error(e);
        }
    };
    if let Err(e) = write_file(&config_path, &toml_content, config.force) {
        output.error(&format!("Failed to create {}: {}", DEFAULT_CONFIG_FILE, e));
        return InitResult::Error(e.to_string());
    }
    output.created("config", DEFAULT_CONFIG_FILE);

    let env_example_path = base_path.join(".env.example");
    if env_example_path.exists() && !config.force {
        output.skipped(".env.example", "already exists");
    } else if let Err(e) = write_file(&env_example_path, &generate_env_example(config.provider), config.force) {
        output.error(&format!("Failed to create .env.example: {}", e));
        return InitResult::Error(e.to_string());
    } else {
        output.created("env", ".env.example");
    }

    output.complete("deepscribe initialized successfully!");

    output.header("Next Steps");
    output.newline();
    output.info("1. Set up API keys:");
    output.command("cp .env.example .env");
    if config.provider == InitProvider::Ollama {
        output.info("2. Start Ollama (if not running):");
        output.command("ollama serve");
        output.command("ollama pull llama3.2");
    }
    output.info("Run your first research:");
    output.command("deepscribe research \"your topic\"");

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    fs::write(path, content)
}

fn starter_config(provider: InitProvider) -> DeepscribeConfig {
    let mut config = DeepscribeConfig::default();
    if provider == InitProvider::Ollama {
        config.llm.provider = LlmProviderKind::Ollama;
        config.llm.model = "llama3.2".to_string();
        config.llm.api_base = "http://localhost:11434".to_string();
    }
    config
}

fn generate_config(provider: InitProvider) -> Result<String, String> {
    let body = starter_config(provider)
        .to_toml_string()
        .map_err(|e| e.to_string())?;
    Ok(format!(
        "# deepscribe configuration\n\
         #\n\
         # API keys are read from the environment variables named by *_api_key_env\n\
         # (a .env file in the working directory is loaded automatically).\n\n{}",
        body
    ))
}

fn generate_env_example(provider: InitProvider) -> String {
    let llm_line = match provider {
        InitProvider::Openai => "OPENAI_API_KEY=sk-...\n",
        InitProvider::Ollama => "# Ollama needs no API key\n",
    };
    format!(
        "# LLM backend\n{}\n# Deep-research backend (https://firecrawl.dev)\nFIRECRAWL_API_KEY=fc-...\n\n# Log filter, overrides [logging] level\n# RUST_LOG=deepscribe=debug\n",
        llm_line
    )
}
