//! Cascade Statistics Core - command line entry point
//!
//! The `cs-core` binary handles:
//! - Temporal entropy scoring of a PHEME-style dataset
//! - Node and edge counts of the heterogeneous graph
//! - Text embedding and token-length statistics
//! - Configuration inspection and validation

use clap::{Args, Parser, Subcommand};
use cs_common::{Error, OutputFormat, RunId};
use cs_config::{SupportMode, TokenizerKind};
use cs_core::config::{
    list_presets, load_config, load_file, resolve, validate_config, ConfigOptions, ConfigSource,
    PresetName, ResolvedConfig,
};
use cs_core::dataset::analyze_dataset;
use cs_core::embed::{compute_seq_len_statistics, load_embedder, tokenizer_for};
use cs_core::exit_codes::ExitCode;
use cs_core::graph::compute_graph_stats;
use cs_core::log_event;
use cs_core::logging::{event_names, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage};
use cs_core::output::{
    render, render_error, ConfigShowOutput, ConfigValidateOutput, EmbedOutput, EntropyOutput,
    EntropyParams, HumanReport, PresetsOutput, SeqStatsOutput, VersionOutput,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Cascade Statistics Core - entropy, graph counts and embeddings for rumour datasets
#[derive(Parser)]
#[command(name = "cs-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Configuration file (TOML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Built-in preset used when no config file is given
    #[arg(long, global = true)]
    preset: Option<String>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every cascade of the dataset and write per-class entropy files
    Entropy(EntropyArgs),

    /// Count nodes and edges of the heterogeneous graph
    GraphStats(GraphArgs),

    /// Embed texts with the configured model
    Embed(EmbedArgs),

    /// Token-length statistics of a corpus
    SeqStats(SeqStatsArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct EntropyArgs {
    /// Dataset root holding the event folders
    #[arg(long)]
    root: Option<PathBuf>,

    /// Directory receiving `<event>/<class>_entropy.json` files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Bucket width in hours
    #[arg(long)]
    bucket_hours: Option<f64>,

    /// Smoothing constant
    #[arg(long)]
    alpha: Option<f64>,

    /// Buckets receiving smoothing mass (observed, full)
    #[arg(long)]
    support: Option<SupportMode>,
}

#[derive(Args, Debug)]
struct GraphArgs {
    /// Directory holding the edge files
    #[arg(long)]
    graph_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct EmbedArgs {
    /// Model name (word2vec, bertweet-base, ...)
    #[arg(long)]
    model: Option<String>,

    /// Model file location
    #[arg(long)]
    model_path: Option<PathBuf>,

    #[arg(long)]
    max_seq_len: Option<usize>,

    /// Tokenizer (whitespace, char)
    #[arg(long)]
    tokenizer: Option<TokenizerKind>,

    /// Include the tokens each row was built from
    #[arg(long)]
    show_tokens: bool,

    /// File with one text per line
    #[arg(long)]
    input: Option<PathBuf>,

    /// Texts to embed
    texts: Vec<String>,
}

#[derive(Args, Debug)]
struct SeqStatsArgs {
    /// File with one text per line
    #[arg(long)]
    input: Option<PathBuf>,

    #[arg(long)]
    batch_size: Option<usize>,

    /// Tokenizer (whitespace, char)
    #[arg(long)]
    tokenizer: Option<TokenizerKind>,

    /// Texts to measure
    texts: Vec<String>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the resolved configuration
    Show,
    /// Validate a configuration file (or the resolved configuration)
    Validate {
        /// Specific file to validate
        path: Option<PathBuf>,
    },
    /// List built-in presets
    Presets,
}

fn main() {
    let cli = Cli::parse();

    let cli_level = LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet);
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let run_id = RunId::new();
    let exit_code = match &cli.command {
        Commands::Entropy(args) => finish(
            &cli.global,
            &run_id,
            "entropy",
            run_entropy(&cli.global, &run_id, args),
        ),
        Commands::GraphStats(args) => finish(
            &cli.global,
            &run_id,
            "graph-stats",
            run_graph_stats(&cli.global, &run_id, args),
        ),
        Commands::Embed(args) => finish(
            &cli.global,
            &run_id,
            "embed",
            run_embed(&cli.global, &run_id, args),
        ),
        Commands::SeqStats(args) => finish(
            &cli.global,
            &run_id,
            "seq-stats",
            run_seq_stats(&cli.global, &run_id, args),
        ),
        Commands::Config(args) => run_config(&cli.global, &run_id, args),
        Commands::Version => finish(
            &cli.global,
            &run_id,
            "version",
            Ok((VersionOutput::default(), ExitCode::Clean)),
        ),
    };

    std::process::exit(exit_code.as_i32());
}

/// Print a payload (or the error) and pick the exit code.
fn finish<T>(
    global: &GlobalOpts,
    run_id: &RunId,
    command: &str,
    result: Result<(T, ExitCode), Error>,
) -> ExitCode
where
    T: Serialize + HumanReport,
{
    let outcome = result.and_then(|(body, code)| {
        render(global.format, run_id.as_str(), command, &body).map(|text| (text, code))
    });
    match outcome {
        Ok((text, code)) => {
            println!("{}", text);
            code
        }
        Err(err) => fail(global, run_id, command, &err),
    }
}

fn fail(global: &GlobalOpts, run_id: &RunId, command: &str, err: &Error) -> ExitCode {
    let code = ExitCode::for_error(err);
    tracing::error!(
        target: event_names::RUN_FAILED,
        run_id = %run_id,
        command = command,
        error_code = err.code(),
        exit_code = code.as_i32(),
        "{}",
        err
    );
    eprintln!("{}", render_error(global.format, run_id.as_str(), command, err));
    code
}

fn config_options(global: &GlobalOpts) -> Result<ConfigOptions, Error> {
    let preset = global
        .preset
        .as_deref()
        .map(|name| PresetName::parse(name).ok_or_else(|| Error::UnknownPreset(name.to_string())))
        .transpose()?;
    Ok(ConfigOptions {
        config_path: global.config.clone(),
        preset,
    })
}

fn load(global: &GlobalOpts, ctx: &LogContext) -> Result<ResolvedConfig, Error> {
    let resolved = match load_config(&config_options(global)?) {
        Ok(resolved) => resolved,
        Err(err) => {
            log_event!(ctx, ERROR, event_names::CONFIG_ERROR, Stage::Init,
                "configuration rejected",
                error_code = err.code(), error = %err);
            return Err(err.into());
        }
    };
    if resolved.source == ConfigSource::BuiltinPreset {
        log_event!(ctx, DEBUG, event_names::CONFIG_DEFAULT_USED, Stage::Init,
            "using built-in preset",
            preset = ?resolved.preset);
    } else {
        log_event!(ctx, INFO, event_names::CONFIG_LOADED, Stage::Init, "configuration loaded",
            source = %resolved.source,
            path = ?resolved.path);
    }
    Ok(resolved)
}

fn hours_to_secs(hours: f64) -> Result<u64, Error> {
    let secs = (hours * 3600.0).round();
    if !secs.is_finite() || secs < 1.0 || secs > u32::MAX as f64 {
        return Err(Error::InvalidBucketWidth(format!("{}h", hours)));
    }
    Ok(secs as u64)
}

/// One text per non-empty line of `input`, then the positional texts.
fn read_texts(input: Option<&Path>, texts: &[String]) -> Result<Vec<String>, Error> {
    let mut out = Vec::new();
    if let Some(path) = input {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::DatasetNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::Io(e),
        })?;
        out.extend(
            content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string),
        );
    }
    out.extend(texts.iter().cloned());
    Ok(out)
}

fn run_entropy(
    global: &GlobalOpts,
    run_id: &RunId,
    args: &EntropyArgs,
) -> Result<(EntropyOutput, ExitCode), Error> {
    let mut ctx = LogContext::new(run_id.as_str(), "");
    let resolved = load(global, &ctx)?;
    ctx = ctx.with_dataset(resolved.config.dataset.name.clone());

    let mut cfg = resolved.config.entropy.clone();
    if let Some(hours) = args.bucket_hours {
        cfg.bucket_width_secs = hours_to_secs(hours)?;
    }
    if let Some(alpha) = args.alpha {
        cfg.alpha = alpha;
    }
    if let Some(support) = args.support {
        cfg.support = support;
    }
    let root = args
        .root
        .clone()
        .unwrap_or_else(|| resolved.config.dataset.root.clone());
    let output_dir = args.output_dir.clone().unwrap_or_else(|| cfg.output_dir.clone());

    log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "entropy run started",
        root = %root.display(),
        output_dir = %output_dir.display(),
        bucket_width_secs = cfg.bucket_width_secs,
        alpha = cfg.alpha);

    let report = analyze_dataset(&root, &output_dir, &cfg, &ctx)?;
    let code = if report.has_failures() {
        ExitCode::PartialFail
    } else {
        ExitCode::Clean
    };

    log_event!(ctx, INFO, event_names::RUN_FINISHED, Stage::Write, "entropy run finished",
        records = report.records() as u64,
        skipped = report.skipped as u64,
        failed = report.batch.failed.len() as u64,
        exit_code = code.as_i32());

    Ok((
        EntropyOutput {
            config: resolved.snapshot(),
            parameters: EntropyParams {
                bucket_width_secs: cfg.bucket_width_secs,
                alpha: cfg.alpha,
                support: cfg.support,
                end_padding_secs: cfg.end_padding_secs,
            },
            report,
        },
        code,
    ))
}

fn run_graph_stats(
    global: &GlobalOpts,
    run_id: &RunId,
    args: &GraphArgs,
) -> Result<(cs_common::GraphStats, ExitCode), Error> {
    let mut ctx = LogContext::new(run_id.as_str(), "");
    let resolved = load(global, &ctx)?;
    ctx = ctx.with_dataset(resolved.config.dataset.name.clone());

    let mut dataset = resolved.config.dataset;
    if let Some(dir) = &args.graph_dir {
        dataset.graph_dir = dir.clone();
    }
    let stats = compute_graph_stats(&dataset, &ctx)?;
    Ok((stats, ExitCode::Clean))
}

fn run_embed(
    global: &GlobalOpts,
    run_id: &RunId,
    args: &EmbedArgs,
) -> Result<(EmbedOutput, ExitCode), Error> {
    let resolved = load(global, &LogContext::new(run_id.as_str(), ""))?;
    let mut cfg = resolved.config.embed;
    if let Some(model) = &args.model {
        cfg.model_name = model.clone();
    }
    if let Some(path) = &args.model_path {
        cfg.model_path = Some(path.clone());
    }
    if let Some(n) = args.max_seq_len {
        cfg.max_seq_len = n;
    }
    if let Some(tokenizer) = args.tokenizer {
        cfg.tokenizer = tokenizer;
    }

    let texts = read_texts(args.input.as_deref(), &args.texts)?;
    if texts.is_empty() {
        return Err(Error::EmptyInput("no texts to embed".to_string()));
    }

    let embedder = load_embedder(&cfg)?;
    let (embedding, tokens) = embedder.embed_with_tokens(&texts)?;
    let embeddings = (0..texts.len())
        .filter_map(|i| embedding.text(i).map(<[f32]>::to_vec))
        .collect();

    Ok((
        EmbedOutput {
            model: embedder.model(),
            shape: embedding.shape(),
            embeddings,
            tokens: args.show_tokens.then_some(tokens),
        },
        ExitCode::Clean,
    ))
}

fn run_seq_stats(
    global: &GlobalOpts,
    run_id: &RunId,
    args: &SeqStatsArgs,
) -> Result<(SeqStatsOutput, ExitCode), Error> {
    let resolved = load(global, &LogContext::new(run_id.as_str(), ""))?;
    let tokenizer = args.tokenizer.unwrap_or(resolved.config.embed.tokenizer);
    let batch_size = args.batch_size.unwrap_or(resolved.config.embed.batch_size);

    let texts = read_texts(args.input.as_deref(), &args.texts)?;
    let stats = compute_seq_len_statistics(&texts, &*tokenizer_for(tokenizer), batch_size)?;

    Ok((
        SeqStatsOutput {
            texts: texts.len(),
            tokenizer,
            batch_size,
            stats,
        },
        ExitCode::Clean,
    ))
}

fn run_config(global: &GlobalOpts, run_id: &RunId, args: &ConfigArgs) -> ExitCode {
    match &args.command {
        ConfigCommands::Show => finish(global, run_id, "config show", run_config_show(global)),
        ConfigCommands::Validate { path } => finish(
            global,
            run_id,
            "config validate",
            run_config_validate(global, path.as_deref()),
        ),
        ConfigCommands::Presets => finish(
            global,
            run_id,
            "config presets",
            Ok((
                PresetsOutput {
                    presets: list_presets(),
                },
                ExitCode::Clean,
            )),
        ),
    }
}

fn run_config_show(global: &GlobalOpts) -> Result<(ConfigShowOutput, ExitCode), Error> {
    let resolved = load_config(&config_options(global)?)?;
    Ok((
        ConfigShowOutput {
            source: resolved.snapshot(),
            values: resolved.config,
        },
        ExitCode::Clean,
    ))
}

/// Parse errors fail the command; semantic errors are reported as `valid: false`.
fn run_config_validate(
    global: &GlobalOpts,
    path: Option<&Path>,
) -> Result<(ConfigValidateOutput, ExitCode), Error> {
    let resolved = match path {
        Some(p) => load_file(p, ConfigSource::CliArgument)?,
        None => resolve(&config_options(global)?)?,
    };

    let (valid, error, code) = match validate_config(&resolved.config) {
        Ok(()) => (true, None, ExitCode::Clean),
        Err(e) => (false, Some(e.to_string()), ExitCode::ArgsError),
    };

    Ok((
        ConfigValidateOutput {
            valid,
            path: resolved.path,
            preset: resolved.preset,
            hash: resolved.hash,
            error,
        },
        code,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bucket_hours_convert_to_seconds() {
        assert_eq!(hours_to_secs(6.0).unwrap(), 21_600);
        assert_eq!(hours_to_secs(0.5).unwrap(), 1_800);
        assert!(hours_to_secs(0.0).is_err());
        assert!(hours_to_secs(-1.0).is_err());
        assert!(hours_to_secs(f64::NAN).is_err());
    }

    #[test]
    fn texts_from_file_then_arguments() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("texts.txt");
        std::fs::write(&path, "first line\n\n  \nsecond line\n").unwrap();
        let texts = read_texts(Some(&path), &["third".to_string()]).unwrap();
        assert_eq!(texts, vec!["first line", "second line", "third"]);
    }
}
