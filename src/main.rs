use anyhow::{bail, Context};
use deepscribe::cli::init::{self, InitConfig, InitResult};
use deepscribe::cli::output::Output;
use deepscribe::cli::progress::TerminalProgress;
use deepscribe::cli::report::save_report;
use deepscribe::cli::{Cli, Commands, LogFormat};
use deepscribe::research::{ActivityCallback, FirecrawlClient};
use deepscribe::tools::deep_research::{DeepResearchTool, ResearchDefaults};
use deepscribe::types::ActivityEvent;
use deepscribe::{
    AgentRoster, Credentials, DeepscribeConfig, ResearchPipeline, ResearchReport,
    ResearchToolAdapter,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli {
        config: config_path,
        verbose,
        no_color,
        log_format,
        command,
    } = Cli::parse_args();

    let output = if no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match command {
        Commands::Init {
            path,
            force,
            provider,
        } => {
            init_logging("warn", verbose, log_format);
            match init::run(InitConfig { path, force, provider }, &output) {
                InitResult::Success | InitResult::AlreadyExists => Ok(()),
                InitResult::Error(e) => bail!("init failed: {}", e),
            }
        }
        Commands::Research {
            topic,
            output: output_path,
            timeout,
            no_save,
        } => {
            let (config, credentials) = setup(&config_path, verbose, log_format)?;
            let save_to = if no_save { None } else { Some(output_path) };
            research(&config, &credentials, &topic, timeout, save_to, output).await
        }
        Commands::Config { validate } => {
            let (config, credentials) = setup(&config_path, verbose, log_format)?;
            show_config(&config, &config_path, &credentials, validate, output)
        }
        Commands::Agents => {
            let (config, credentials) = setup(&config_path, verbose, log_format)?;
            list_agents(&config, &credentials, output)
        }
    }
}

/// Load the config, install logging at its level, then resolve credentials
fn setup(
    config_path: &Path,
    verbose: bool,
    log_format: LogFormat,
) -> anyhow::Result<(DeepscribeConfig, Credentials)> {
    let config = DeepscribeConfig::load(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    init_logging(&config.logging.level, verbose, log_format);
    let credentials = Credentials::from_env(&config);
    Ok((config, credentials))
}

fn init_logging(level: &str, verbose: bool, format: LogFormat) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };
    let fmt = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => fmt.json().init(),
        LogFormat::Text => fmt.init(),
    }
}

/// `save_to` is `None` for --no-save and `Some(None)` for the default file name
async fn research(
    config: &DeepscribeConfig,
    credentials: &Credentials,
    topic: &str,
    timeout: Option<u64>,
    save_to: Option<Option<PathBuf>>,
    output: Output,
) -> anyhow::Result<()> {
    if topic.trim().is_empty() {
        bail!("topic must not be empty");
    }

    output.banner();
    output.header(&format!("Researching: {}", topic));

    let on_activity: ActivityCallback = Arc::new(move |event: &ActivityEvent| output.activity(event));
    let pipeline = ResearchPipeline::from_config(config, credentials, Some(on_activity))
        .context("failed to set up the research pipeline")?
        .with_observer(Arc::new(TerminalProgress::new(output)));

    let run = pipeline.execute(topic);
    let result = match timeout {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), run)
            .await
            .with_context(|| format!("research timed out after {}s", secs))?,
        None => run.await,
    };
    let report = result?;

    print_report(&report, output);

    if let Some(path) = save_to {
        let saved = save_report(&report.final_document, topic, path.as_deref(), Path::new("."))?;
        output.complete(&format!("Report saved to {}", saved.display()));
    } else {
        output.complete("Research complete");
    }
    Ok(())
}

fn print_report(report: &ResearchReport, output: Output) {
    output.subheader("Draft report");
    output.markdown(&report.draft_report);

    output.subheader("Source credibility");
    if report.credibility.is_structured() {
        output.credibility_table(report.credibility.entries());
    } else {
        output.markdown(report.credibility.raw());
    }

    output.subheader("Follow-up questions");
    output.markdown(&report.followup_text);

    output.header("Final report");
    output.markdown(&report.final_document);
}

fn show_config(
    config: &DeepscribeConfig,
    path: &Path,
    credentials: &Credentials,
    validate: bool,
    output: Output,
) -> anyhow::Result<()> {
    config.validate()?;
    if validate {
        output.success(&format!("{} is valid", path.display()));
        return Ok(());
    }

    output.header("Configuration");
    output.kv("file", &path.display().to_string());
    output.kv("file exists", &path.exists().to_string());

    let key_status = |key: &Option<String>| if key.is_some() { "set" } else { "missing" };
    output.kv(&config.llm.api_key_env, key_status(&credentials.llm_key));
    output.kv(
        &config.research.api_key_env,
        key_status(&credentials.research_provider_key),
    );

    output.subheader("Effective settings");
    output.markdown(&config.to_toml_string()?);
    Ok(())
}

fn list_agents(
    config: &DeepscribeConfig,
    credentials: &Credentials,
    output: Output,
) -> anyhow::Result<()> {
    // Listing never contacts the research backend.
    let provider = FirecrawlClient::new(
        config.research.api_base.clone(),
        credentials.research_provider_key.clone().unwrap_or_default(),
    );
    let defaults = ResearchDefaults::from(&config.research);
    let tool = DeepResearchTool::new(ResearchToolAdapter::new(Arc::new(provider)), defaults);
    let roster = AgentRoster::new(Arc::new(tool), defaults);

    output.header("Pipeline agents");
    for agent in roster.iter() {
        output.subheader(&agent.role().to_string());
        output.kv("name", agent.name());
        let tools = agent.tools().tool_names();
        if tools.is_empty() {
            output.kv("tools", "none");
        } else {
            output.kv("tools", &tools.len().to_string());
            for tool in &tools {
                output.list_item(tool);
            }
        }
        if let Some(first_line) = agent.instructions().lines().next() {
            output.kv("instructions", first_line);
        }
    }
    Ok(())
}
