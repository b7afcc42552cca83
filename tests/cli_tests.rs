//! CLI Integration Tests for deepscribe
//!
//! Tests the command-line interface: help output, the init command, the
//! config command, agent listing and research argument errors.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the deepscribe binary in `dir` with a clean key environment
fn run_deepscribe(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_deepscribe"))
        .args(args)
        .current_dir(dir)
        .env_remove("OPENAI_API_KEY")
        .env_remove("FIRECRAWL_API_KEY")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_command() {
    let dir = TempDir::new().unwrap();
    let output = run_deepscribe(&["--help"], dir.path());

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Usage"));
    for command in ["research", "init", "config", "agents"] {
        assert!(text.contains(command), "help is missing {}", command);
    }
}

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    let output = run_deepscribe(&["--version"], dir.path());

    assert!(output.status.success());
    assert!(stdout(&output).contains("deepscribe"));
}

#[test]
fn test_research_help_lists_options() {
    let dir = TempDir::new().unwrap();
    let output = run_deepscribe(&["research", "--help"], dir.path());

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("--output"));
    assert!(text.contains("--timeout"));
    assert!(text.contains("--no-save"));
}

// =============================================================================
// Init Command Tests
// =============================================================================

#[test]
fn test_init_creates_config() {
    let dir = TempDir::new().unwrap();
    let output = run_deepscribe(&["--no-color", "init"], dir.path());

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let config = fs::read_to_string(dir.path().join("deepscribe.toml")).unwrap();
    assert!(config.contains("[llm]"));
    assert!(config.contains("[research]"));
    assert!(config.contains("FIRECRAWL_API_KEY"));
    assert!(dir.path().join(".env.example").exists());
}

#[test]
fn test_init_keeps_existing_config_without_force() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("deepscribe.toml"), "[logging]\nlevel = \"warn\"\n").unwrap();

    let output = run_deepscribe(&["--no-color", "init"], dir.path());

    assert!(output.status.success());
    assert!(stdout(&output).contains("already exists"));
    let config = fs::read_to_string(dir.path().join("deepscribe.toml")).unwrap();
    assert_eq!(config, "[logging]\nlevel = \"warn\"\n");
}

#[test]
fn test_init_ollama_provider() {
    let dir = TempDir::new().unwrap();
    let output = run_deepscribe(&["--no-color", "init", "--provider", "ollama"], dir.path());

    assert!(output.status.success());
    let config = fs::read_to_string(dir.path().join("deepscribe.toml")).unwrap();
    assert!(config.contains("provider = \"ollama\""));
}

// =============================================================================
// Config Command Tests
// =============================================================================

#[test]
fn test_config_validate_generated_file() {
    let dir = TempDir::new().unwrap();
    assert!(run_deepscribe(&["init"], dir.path()).status.success());

    let output = run_deepscribe(&["--no-color", "config", "--validate"], dir.path());

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("is valid"));
}

#[test]
fn test_config_shows_missing_keys() {
    let dir = TempDir::new().unwrap();
    let output = run_deepscribe(&["--no-color", "config"], dir.path());

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("OPENAI_API_KEY: missing"));
    assert!(text.contains("FIRECRAWL_API_KEY: missing"));
    assert!(text.contains("crawl_depth = 3"));
}

#[test]
fn test_config_rejects_zero_limit() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("deepscribe.toml"), "[research]\nurl_limit = 0\n").unwrap();

    let output = run_deepscribe(&["config", "--validate"], dir.path());

    assert!(!output.status.success());
    assert!(stderr(&output).contains("url_limit"));
}

#[test]
fn test_config_rejects_unknown_provider() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("deepscribe.toml"), "[llm]\nprovider = \"nope\"\n").unwrap();

    let output = run_deepscribe(&["config"], dir.path());

    assert!(!output.status.success());
}

// =============================================================================
// Agents and Research Tests
// =============================================================================

#[test]
fn test_agents_lists_pipeline() {
    let dir = TempDir::new().unwrap();
    let output = run_deepscribe(&["--no-color", "agents"], dir.path());

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    for name in [
        "research_synthesis_agent",
        "source_quality_agent",
        "research_expansion_agent",
        "followup_question_agent",
    ] {
        assert!(text.contains(name), "missing agent {}", name);
    }
    assert!(text.contains("perform_deep_research"));
}

#[test]
fn test_research_without_keys_fails() {
    let dir = TempDir::new().unwrap();
    let output = run_deepscribe(&["--no-color", "research", "fusion energy"], dir.path());

    assert!(!output.status.success());
    assert!(stderr(&output).contains("OPENAI_API_KEY"));
    assert!(!dir.path().join("fusion_energy_research.md").exists());
}

#[test]
fn test_research_rejects_empty_topic() {
    let dir = TempDir::new().unwrap();
    let output = run_deepscribe(&["research", "   "], dir.path());

    assert!(!output.status.success());
    assert!(stderr(&output).contains("topic must not be empty"));
}
