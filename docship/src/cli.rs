//! # docship CLI interface
//!
//! Command parsing and orchestration for the two tools. All pipeline logic
//! lives in `docship-core`; this module maps flags onto its configuration,
//! wires in the real GitHub client, git binary and stdin prompt, and prints
//! the human-facing status lines.
//!
//! Outcomes the operator is expected to act on (no token, rejected creation,
//! failed push) are printed and exit 0. Transport failures, unreadable PDFs
//! and a missing git binary surface as errors.
use crate::load_config::load_config;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docship_core::contract::TokenPrompt;
use docship_core::extract::extract_pdf;
use docship_core::git::GitCli;
use docship_core::github::GitHubClient;
use docship_core::publish::{publish, Creation, PublishReport, PushResult};
use docship_core::token::{resolve_token, StdinPrompt};
use std::path::PathBuf;

/// CLI for docship: pull text out of PDFs and publish a working tree to GitHub.
#[derive(Parser)]
#[clap(
    name = "docship",
    version,
    about = "Extract PDF text page by page, or publish the local git tree to a new GitHub repository"
)]
pub struct Cli {
    /// Optional YAML config file; every key falls back to its default
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write every page of a PDF to a text report with page markers
    ExtractPdf {
        /// PDF to read
        #[clap(long)]
        input: Option<PathBuf>,
        /// Text file to (over)write
        #[clap(long)]
        output: Option<PathBuf>,
    },
    /// Create the GitHub repository (or reuse it) and push the current branch
    Publish {
        /// Personal access token; only used when GITHUB_TOKEN and GH_TOKEN are unset
        token: Option<String>,
        /// Working tree to push (defaults to the current directory)
        #[clap(long)]
        workdir: Option<PathBuf>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    run_with(cli, &StdinPrompt, |name| std::env::var(name).ok()).await
}

/// Same as [`run`] with the prompt and environment lookup supplied by the caller.
pub async fn run_with<F>(cli: Cli, prompt: &dyn TokenPrompt, env_lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = load_config(cli.config.as_deref(), &env_lookup)?;

    match cli.command {
        Commands::ExtractPdf { input, output } => {
            if let Some(input) = input {
                config.extract.input = input;
            }
            if let Some(output) = output {
                config.extract.output = output;
            }
            config.extract.validate()?;
            config.extract.trace_loaded();

            tracing::info!(command = "extract-pdf", "Starting extraction");
            let summary = extract_pdf(&config.extract).with_context(|| {
                format!("extracting text from {}", config.extract.input.display())
            })?;
            println!(
                "Extracted {} pages to {}",
                summary.pages,
                summary.output.display()
            );
            Ok(())
        }
        Commands::Publish { token, workdir } => {
            if let Some(workdir) = workdir {
                config.publish.workdir = workdir;
            }
            config.publish.validate()?;
            config.publish.trace_loaded();

            let resolved = resolve_token(
                &config.publish.token_env_vars,
                &env_lookup,
                token.as_deref(),
                prompt,
            )
            .context("reading token from prompt")?;
            let Some(resolved) = resolved else {
                println!("No token provided");
                return Ok(());
            };
            tracing::info!(command = "publish", source = ?resolved.source, "Token resolved");

            let api = GitHubClient::new(&config.publish.api_base_url, &resolved.credential)?;
            let git = GitCli::new(&config.publish.workdir);
            let report = publish(&config.publish, &resolved.credential, &api, &git, |creation| {
                println!("{}", render_creation(creation))
            })
            .await
            .context("publishing repository")?;

            for line in render_report(&report) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

/// Printed as soon as the repository exists, ahead of the remaining stages.
pub fn render_creation(creation: &Creation) -> String {
    match creation {
        Creation::Created { html_url } => format!("✅ Created: {html_url}"),
        Creation::Reused => "Repo already exists, pushing to it...".to_string(),
    }
}

/// Status lines for how a publish run ended. The creation line is not
/// repeated here; see [`render_creation`].
pub fn render_report(report: &PublishReport) -> Vec<String> {
    match report {
        PublishReport::CreationRejected { status, body } => {
            vec![format!("❌ Error: {status} {body}")]
        }
        PublishReport::CreationUnknown { status, body } => {
            vec![format!("❓ Unrecognised response: {status} {body}")]
        }
        PublishReport::Completed(summary) => vec![match &summary.push {
            PushResult::Pushed { .. } => format!("✅ Pushed! {}", summary.urls.web),
            PushResult::Failed { primary, fallback } => {
                format!("Push error: {} {}", primary.trim_end(), fallback.trim_end())
            }
        }],
    }
}
