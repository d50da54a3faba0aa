//! Handle Check CLI Application
//!
//! A command-line interface for sweeping short-handle availability across
//! social platforms. This CLI application provides a user-friendly interface
//! to the handle-check-lib library.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use console::Term;
use handle_check_lib::{
    default_platforms, load_env_config, parse_timeout_string, write_results, ConfigManager,
    FileConfig, HandleSpace, HandleVerifier, PlatformSpec, ProgressTracker, ScanConfig,
    ScanPipeline,
};
use std::io::BufRead;
use std::process;
use std::sync::Arc;
use std::time::Duration;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Runs above this many handles ask for confirmation on a TTY.
const CONFIRM_THRESHOLD: u64 = 10_000;

/// CLI arguments for handle-check
#[derive(Parser, Debug)]
#[command(name = "handle-check")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find short handles that are free on every major platform")]
#[command(
    long_about = "Enumerate every fixed-length handle over an alphabet and keep the ones that are\nunregistered on all configured platforms at once (HTTP 404 on each profile URL).\n\nSupports concurrent checking, index-range resume, and data-driven platform sets."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Handle length to enumerate
    #[arg(
        short = 'l',
        long = "length",
        value_name = "N",
        help_heading = "Enumeration"
    )]
    pub length: Option<u32>,

    /// Alphabet the handles are drawn from
    #[arg(long = "alphabet", value_name = "CHARS", help_heading = "Enumeration")]
    pub alphabet: Option<String>,

    /// First enumeration index to scan, inclusive (for resuming)
    #[arg(long = "start", value_name = "INDEX", help_heading = "Enumeration")]
    pub start: Option<u64>,

    /// Last enumeration index to scan, exclusive (for sharding)
    #[arg(long = "end", value_name = "INDEX", help_heading = "Enumeration")]
    pub end: Option<u64>,

    /// Platforms to probe, in order (comma-separated or repeated)
    #[arg(short = 'P', long = "platform", value_name = "NAME", value_delimiter = ',', action = clap::ArgAction::Append, help_heading = "Probes")]
    pub platforms: Option<Vec<String>>,

    /// List the configured platforms in probe order and exit
    #[arg(long = "list-platforms", help_heading = "Probes")]
    pub list_platforms: bool,

    /// Per-probe request timeout (e.g. "5s", "30s", "2m")
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Performance")]
    pub timeout: Option<String>,

    /// Max concurrent verifier workers (default: 20, max: 100)
    #[arg(
        short = 'c',
        long = "concurrency",
        value_name = "N",
        help_heading = "Performance"
    )]
    pub concurrency: Option<usize>,

    /// Capacity of the bounded pipeline queues
    #[arg(
        long = "queue-capacity",
        value_name = "N",
        help_heading = "Performance"
    )]
    pub queue_capacity: Option<usize>,

    /// Skip confirmation prompts (for automation/agents)
    #[arg(long = "yes", short = 'y', help_heading = "Performance")]
    pub yes: bool,

    /// Output file for available handles (one per line)
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output"
    )]
    pub output: Option<String>,

    /// Print the final report as JSON on stdout
    #[arg(short = 'j', long = "json", help_heading = "Output")]
    pub json: bool,

    /// Suppress the live progress line
    #[arg(long = "no-progress", help_heading = "Output")]
    pub no_progress: bool,

    /// Preview the scan (counts, range, probe order) without any requests
    #[arg(long = "dry-run", help_heading = "Output")]
    pub dry_run: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show detailed debug information
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Validate arguments
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    init_tracing(&args);

    // Run the scan
    if let Err(e) = run_scan(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Route library and CLI tracing to stderr at a level matching the flags.
fn init_tracing(args: &Args) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if args.debug {
        "handle_check=debug,handle_check_lib=debug"
    } else if args.verbose {
        "handle_check=info,handle_check_lib=info"
    } else {
        "handle_check=warn,handle_check_lib=warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if let Some(concurrency) = args.concurrency {
        if concurrency == 0 || concurrency > 100 {
            return Err("Concurrency must be between 1 and 100".to_string());
        }
    }

    if args.length == Some(0) {
        return Err("Handle length must be at least 1".to_string());
    }

    if let Some(alphabet) = &args.alphabet {
        if alphabet.is_empty() {
            return Err("Alphabet cannot be empty".to_string());
        }
    }

    if let Some(timeout) = &args.timeout {
        if parse_timeout_string(timeout).is_none() {
            return Err(format!(
                "Invalid timeout '{}'. Use format like '5s', '30s', '2m'",
                timeout
            ));
        }
    }

    if args.queue_capacity == Some(0) {
        return Err("Queue capacity must be at least 1".to_string());
    }

    if let (Some(start), Some(end)) = (args.start, args.end) {
        if start >= end {
            return Err(format!(
                "Start index {} must be before end index {}",
                start, end
            ));
        }
    }

    if let Some(platforms) = &args.platforms {
        if platforms.iter().any(|p| p.trim().is_empty()) {
            return Err("Platform names cannot be empty".to_string());
        }
    }

    Ok(())
}

/// Main scan logic
async fn run_scan(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    // Build configuration and the ordered probe set from files, env, and CLI
    let (config, platforms) = build_config(&args)?;

    // Handle --list-platforms early
    if args.list_platforms {
        ui::print_platforms(&platforms);
        return Ok(());
    }

    // Resolve the enumeration space and range before any network work
    let space = HandleSpace::new(&config.alphabet, config.length)?;
    let (start, end) = space.resolve_range(config.start_index, config.end_index)?;
    let total = end - start;

    // Dry-run: preview and exit without checking
    if args.dry_run {
        ui::print_dry_run(total, start, end, &config.alphabet, config.length, &platforms);
        return Ok(());
    }

    // Interactive confirmation for large runs (TTY only)
    if total > CONFIRM_THRESHOLD && !args.yes {
        let term = Term::stderr();
        if term.is_term() {
            eprint!(
                "Will check {} handles across {} platforms (up to {} requests). Proceed? [Y/n] ",
                total,
                platforms.len(),
                total * platforms.len() as u64,
            );
            let mut input = String::new();
            std::io::stdin().lock().read_line(&mut input)?;
            let answer = input.trim().to_lowercase();
            if answer == "n" || answer == "no" {
                eprintln!("Aborted.");
                return Ok(());
            }
        }
    }

    if args.verbose {
        eprintln!(
            "Checking {} handles on {} platforms with concurrency {}",
            total,
            platforms.len(),
            config.concurrency
        );
    }

    // Wire the pipeline: injected progress tracker, optional display loop
    let verifier = HandleVerifier::from_specs(&platforms, config.probe_timeout)?;
    let progress = Arc::new(ProgressTracker::new(total));
    let pipeline = ScanPipeline::new(config.clone(), verifier);

    let display = if !args.no_progress && Term::stderr().is_term() {
        Some(ui::ProgressDisplay::start(progress.clone()))
    } else {
        None
    };

    let result = pipeline.run(progress).await;

    // Always stop the display before reporting anything
    if let Some(display) = display {
        display.stop().await;
    }
    let report = result?;

    // Flush the result set; a sink failure aborts with a diagnostic
    let written = write_results(&config.output, &report.available)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        eprintln!("{} handles written to {}", written, config.output);
    } else {
        ui::print_summary(&report, &config.output, written);
    }

    Ok(())
}

/// Build ScanConfig and the ordered platform set with config file integration.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments (explicit user input)
/// 2. Environment variables (HC_*)
/// 3. Local config file (./.handle-check.toml)
/// 4. Global config file (~/.handle-check.toml)
/// 5. XDG config file (~/.config/handle-check/config.toml)
/// 6. Built-in defaults
fn build_config(args: &Args) -> Result<(ScanConfig, Vec<PlatformSpec>), Box<dyn std::error::Error>> {
    let mut config = ScanConfig::default();

    // Create config manager for file discovery
    let config_manager = ConfigManager::new(args.verbose);

    // Step 1: Determine config file path and load config files
    let file_config = if let Some(explicit_config_path) = &args.config {
        // CLI --config flag provided
        if args.verbose {
            eprintln!(
                "Using explicit config file (CLI --config): {}",
                explicit_config_path
            );
        }

        config_manager.load_file(explicit_config_path).map_err(|e| {
            format!(
                "Failed to load config file '{}': {}",
                explicit_config_path, e
            )
        })?
    } else if let Ok(env_config_path) = std::env::var("HC_CONFIG") {
        // HC_CONFIG environment variable provided
        if args.verbose {
            eprintln!(
                "Using explicit config file (HC_CONFIG env var): {}",
                env_config_path
            );
        }

        config_manager
            .load_file(&env_config_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", env_config_path, e))?
    } else {
        // No explicit config: use automatic discovery, defaults on failure
        config_manager.discover_and_load().unwrap_or_default()
    };

    let platforms_from_file = file_config.platforms.clone();
    config = merge_file_config_into_scan_config(config, file_config);

    // Step 2: Apply environment variables (HC_*)
    config = apply_environment_config(config, args.verbose);

    // Step 3: Apply CLI arguments (highest precedence)
    config = apply_cli_args_to_config(config, args);

    // Resolve the probe set: config file replaces the catalog, CLI selects
    let platforms = resolve_platforms(args, platforms_from_file)?;

    tracing::debug!(
        concurrency = config.concurrency,
        length = config.length,
        platforms = platforms.len(),
        output = %config.output,
        "configuration resolved"
    );

    Ok((config, platforms))
}

/// Merge FileConfig defaults into ScanConfig
fn merge_file_config_into_scan_config(mut config: ScanConfig, file_config: FileConfig) -> ScanConfig {
    if let Some(defaults) = file_config.defaults {
        if let Some(concurrency) = defaults.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(length) = defaults.length {
            config.length = length;
        }
        if let Some(alphabet) = defaults.alphabet {
            config.alphabet = alphabet;
        }
        if let Some(output) = defaults.output {
            config.output = output;
        }
        if let Some(capacity) = defaults.queue_capacity {
            config.queue_capacity = capacity;
        }
        if let Some(timeout_str) = defaults.timeout {
            if let Some(timeout_secs) = parse_timeout_string(&timeout_str) {
                config.probe_timeout = Duration::from_secs(timeout_secs);
            }
        }
    }

    config
}

/// Apply HC_* environment variables to the config.
fn apply_environment_config(mut config: ScanConfig, verbose: bool) -> ScanConfig {
    let env_config = load_env_config(verbose);

    if let Some(concurrency) = env_config.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(length) = env_config.length {
        config.length = length;
    }
    if let Some(alphabet) = env_config.alphabet {
        config.alphabet = alphabet;
    }
    if let Some(output) = env_config.output {
        config.output = output;
    }
    if let Some(timeout_str) = &env_config.timeout {
        if let Some(timeout_secs) = parse_timeout_string(timeout_str) {
            config.probe_timeout = Duration::from_secs(timeout_secs);
        }
    }

    config
}

/// Apply CLI arguments to config (highest precedence).
///
/// Every override is an `Option`, so only flags the user actually passed
/// replace environment or config file values.
fn apply_cli_args_to_config(mut config: ScanConfig, args: &Args) -> ScanConfig {
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(length) = args.length {
        config.length = length;
    }
    if let Some(alphabet) = &args.alphabet {
        config.alphabet = alphabet.clone();
    }
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    if let Some(capacity) = args.queue_capacity {
        config.queue_capacity = capacity;
    }
    if let Some(timeout_str) = &args.timeout {
        if let Some(timeout_secs) = parse_timeout_string(timeout_str) {
            config.probe_timeout = Duration::from_secs(timeout_secs);
        }
    }
    if let Some(start) = args.start {
        config.start_index = start;
    }
    if args.end.is_some() {
        config.end_index = args.end;
    }

    config
}

/// Resolve the ordered probe set.
///
/// The config file's platform list (when present) replaces the built-in
/// catalog. `--platform` then selects and orders a subset by name; unknown
/// names are an error listing what is available.
fn resolve_platforms(
    args: &Args,
    from_file: Option<Vec<PlatformSpec>>,
) -> Result<Vec<PlatformSpec>, Box<dyn std::error::Error>> {
    let catalog = from_file.unwrap_or_else(default_platforms);

    let Some(selection) = &args.platforms else {
        return Ok(catalog);
    };

    let mut selected = Vec::with_capacity(selection.len());
    for name in selection {
        let name = name.trim();
        match catalog.iter().find(|spec| spec.name == name) {
            Some(spec) => {
                if selected.iter().any(|s: &PlatformSpec| s.name == name) {
                    return Err(format!("Platform '{}' selected more than once", name).into());
                }
                selected.push(spec.clone());
            }
            None => {
                let known: Vec<&str> = catalog.iter().map(|s| s.name.as_str()).collect();
                return Err(format!(
                    "Unknown platform '{}'. Configured platforms: {}",
                    name,
                    known.join(", ")
                )
                .into());
            }
        }
    }

    Ok(selected)
}
