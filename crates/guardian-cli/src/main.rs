//! CLI entry point for guardian.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `guardian-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use guardian_app::{
    approve_baseline, evaluate_node, format_explanation, format_not_found, list_advisories,
    parse_report_json, render_annotations, render_markdown, run_check, run_explain,
    set_advisory_state, verdict_exit_code, write_report, write_text, AdvisoryFilter,
    ExplainOutput, GuardianContext,
};
use guardian_settings::Overrides;
use guardian_types::AdvisoryState;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "guardian",
    version,
    about = "Compliance checks, checksum baselines, and advisories for governed files"
)]
struct Cli {
    /// Storage root holding nodes/, advisories/ and governed files.
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Path to guardian config TOML (missing file means defaults).
    #[arg(long, global = true, default_value = "guardian.toml")]
    config: Utf8PathBuf,

    /// Log progress at info level.
    #[arg(long, global = true)]
    verbose: bool,

    /// Log at debug level.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate every node, open advisories for failures, and write the report.
    Check {
        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/guardian/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/guardian/comment.md")]
        markdown_out: Utf8PathBuf,

        /// Evaluate nodes in parallel.
        #[arg(long)]
        parallel: bool,
    },

    /// Evaluate one node and print its issues. No advisory is created.
    Evaluate {
        node_id: String,
    },

    /// Accept the node's current file contents as its checksum baseline.
    Approve {
        node_id: String,
    },

    /// List advisories or change their state.
    Advisories {
        #[command(subcommand)]
        cmd: AdvisoryCommands,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/guardian/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/guardian/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a rule (missing, forbid, require, checksum) with remediation guidance.
    Explain {
        rule: String,
    },
}

#[derive(Subcommand, Debug)]
enum AdvisoryCommands {
    /// Print advisories as JSON, oldest first.
    List {
        /// Only advisories in this state (open|acknowledged|approved|rejected).
        #[arg(long)]
        state: Option<AdvisoryState>,

        /// Only advisories for this node.
        #[arg(long)]
        node: Option<String>,
    },

    /// Move an advisory to a new state.
    SetState {
        id: String,
        state: AdvisoryState,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    match &cli.cmd {
        Commands::Check {
            report_out,
            write_markdown,
            markdown_out,
            parallel,
        } => cmd_check(&cli, report_out, *write_markdown, markdown_out, *parallel),
        Commands::Evaluate { node_id } => cmd_evaluate(&cli, node_id),
        Commands::Approve { node_id } => cmd_approve(&cli, node_id),
        Commands::Advisories { cmd } => cmd_advisories(&cli, cmd),
        Commands::Md { report, output } => cmd_md(report, output.as_deref()),
        Commands::Annotations { report, max } => cmd_annotations(report, *max),
        Commands::Explain { rule } => cmd_explain(rule),
    }
}

fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}

/// Load config (missing file is allowed) and bind the storage adapters.
fn load_context(cli: &Cli, parallel: Option<bool>) -> anyhow::Result<GuardianContext> {
    let cfg_text = match std::fs::read_to_string(&cli.config) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(err).with_context(|| format!("read config: {}", cli.config)),
    };

    let overrides = Overrides {
        data_dir: cli.data_dir.clone(),
        parallel,
    };
    let ctx = GuardianContext::load(&cfg_text, overrides)?;
    debug!(data_dir = %ctx.config.data_dir, "context loaded");
    Ok(ctx)
}

fn cmd_check(
    cli: &Cli,
    report_out: &Utf8Path,
    write_markdown: bool,
    markdown_out: &Utf8Path,
    parallel: bool,
) -> anyhow::Result<()> {
    let ctx = load_context(cli, parallel.then_some(true))?;
    let output = run_check(&ctx)?;

    write_report(report_out, &output.report).context("write report json")?;
    if write_markdown {
        write_text(markdown_out, &render_markdown(&output.report)).context("write markdown")?;
    }

    let data = &output.report.data;
    eprintln!(
        "guardian: {} nodes scanned, {} failed, {} advisories opened",
        data.nodes_scanned, data.nodes_failed, data.advisories_created
    );

    let code = verdict_exit_code(output.report.verdict, output.resolved_config.fail_on);
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn cmd_evaluate(cli: &Cli, node_id: &str) -> anyhow::Result<()> {
    let ctx = load_context(cli, None)?;
    let output = evaluate_node(&ctx, node_id)?;

    println!("{}", serde_json::to_string_pretty(&output.to_json())?);
    if !output.ok() {
        std::process::exit(2);
    }
    Ok(())
}

fn cmd_approve(cli: &Cli, node_id: &str) -> anyhow::Result<()> {
    let ctx = load_context(cli, None)?;
    let baseline = approve_baseline(&ctx, node_id)?;

    println!("{}", serde_json::to_string_pretty(&baseline)?);
    Ok(())
}

fn cmd_advisories(cli: &Cli, cmd: &AdvisoryCommands) -> anyhow::Result<()> {
    let ctx = load_context(cli, None)?;

    match cmd {
        AdvisoryCommands::List { state, node } => {
            let filter = AdvisoryFilter {
                state: *state,
                node_id: node.clone(),
            };
            let advisories = list_advisories(&ctx, &filter)?;
            println!("{}", serde_json::to_string_pretty(&advisories)?);
        }
        AdvisoryCommands::SetState { id, state } => {
            let advisory = set_advisory_state(&ctx, id, *state)?;
            println!("{}", serde_json::to_string_pretty(&advisory)?);
        }
    }
    Ok(())
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&report);

    if let Some(out_path) = output {
        write_text(out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;

    for annotation in render_annotations(&report, max) {
        println!("{}", annotation);
    }

    Ok(())
}

fn cmd_explain(rule: &str) -> anyhow::Result<()> {
    match run_explain(rule) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_rules,
        } => {
            eprint!("{}", format_not_found(&identifier, available_rules));
            std::process::exit(1);
        }
    }
}
