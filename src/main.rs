#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args
)]

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use datagen::{agent, config::Config, providers};

fn parse_temperature(s: &str) -> std::result::Result<f64, String> {
    let t: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if !(0.0..=2.0).contains(&t) {
        return Err("temperature must be between 0.0 and 2.0".to_string());
    }
    Ok(t)
}

/// `datagen` - a chat assistant that generates sample data.
#[derive(Parser, Debug)]
#[command(name = "datagen")]
#[command(version)]
#[command(about = "A chat assistant CLI that generates sample data through LLM tool calls.", long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    config_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the chat loop
    #[command(long_about = "\
Start the chat loop.

Launches an interactive session with the configured AI provider. \
Type 'exit' or 'quit' to leave. Use --message for single-shot \
queries without entering interactive mode.

Examples:
  datagen agent                                    # interactive session
  datagen agent -m \"generate 5 users\"              # single message
  datagen agent --model gpt-4o -t 0.3")]
    Agent {
        /// Single message mode (don't enter interactive mode)
        #[arg(short, long)]
        message: Option<String>,

        /// Provider to use (openai)
        #[arg(short, long)]
        provider: Option<String>,

        /// Model to use
        #[arg(long)]
        model: Option<String>,

        /// Temperature (0.0 - 2.0); defaults to the configured value
        #[arg(short, long, value_parser = parse_temperature)]
        temperature: Option<f64>,
    },

    /// Show system status
    Status,

    /// List supported AI providers
    Providers,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install default crypto provider for Rustls TLS.
    // This prevents the error: "could not automatically determine the
    // process-level CryptoProvider" when both aws-lc-rs and ring features
    // are available (or neither is explicitly selected).
    if let Err(e) = rustls::crypto::ring::default_provider().install_default() {
        eprintln!("Warning: Failed to install default crypto provider: {e:?}");
    }

    let cli = Cli::parse();

    if let Some(config_dir) = &cli.config_dir {
        if config_dir.trim().is_empty() {
            bail!("--config-dir cannot be empty");
        }
        std::env::set_var("DATAGEN_CONFIG_DIR", config_dir);
    }

    // Initialize logging - respects RUST_LOG env var, defaults to INFO
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut config = Config::load_or_init().await?;
    config.apply_env_overrides();

    match cli.command {
        Commands::Agent {
            message,
            provider,
            model,
            temperature,
        } => agent::run(config, message, provider, model, temperature)
            .await
            .map(|_| ()),

        Commands::Status => {
            println!("datagen Status");
            println!();
            println!("Version:      {}", env!("CARGO_PKG_VERSION"));
            println!("Config:       {}", config.config_path.display());
            println!();
            println!(
                "Provider:     {}",
                config.default_provider.as_deref().unwrap_or("openai")
            );
            println!(
                "Model:        {}",
                config.default_model.as_deref().unwrap_or("(default)")
            );
            println!("Temperature:  {}", config.default_temperature);
            println!("Step limit:   {}", config.agent.max_tool_iterations);
            println!(
                "API key:      {}",
                if config.api_key.is_some() {
                    "configured"
                } else {
                    "from environment"
                }
            );
            Ok(())
        }

        Commands::Providers => {
            let providers = providers::list_providers();
            let current = config
                .default_provider
                .as_deref()
                .unwrap_or("openai")
                .trim()
                .to_ascii_lowercase();
            println!("Supported providers ({} total):\n", providers.len());
            println!("  ID (use in config)  DESCRIPTION");
            println!("  ------------------- -----------");
            for p in &providers {
                let is_active = p.name.eq_ignore_ascii_case(&current)
                    || p.aliases
                        .iter()
                        .any(|alias| alias.eq_ignore_ascii_case(&current));
                let marker = if is_active { " (active)" } else { "" };
                println!("  {:<19} {}{}", p.name, p.display_name, marker);
            }
            Ok(())
        }
    }
}
