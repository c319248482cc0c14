//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use bibcloud_core::frequency::FrequencyTable;
use bibcloud_core::output::{OutputConfig, write_outputs};
use bibcloud_core::pipeline::{ExtractReport, ProgressReporter, extract_text};
use bibcloud_normalize::{Tokenizer, Vocabulary};
use bibcloud_shared::{AppConfig, init_config, load_config, load_config_from};
use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// bibcloud: word-cloud text from bibliographies and documents.
#[derive(Parser)]
#[command(
    name = "bibcloud",
    version,
    about = "Extract and normalize words from .bib and .pdf files for a word cloud.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Extract cleaned tokens from bibliography and document files.
    Extract {
        /// Input files (.bib or .pdf); other extensions are skipped.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Number of most frequent tokens to print (defaults to config).
        #[arg(short = 'n', long)]
        top_words: Option<usize>,

        /// Output directory for text.txt, counts.csv and summary.json.
        #[arg(short, long, env = "BIBCLOUD_OUT_DIR")]
        out_dir: Option<PathBuf>,

        /// TOML file whose [vocabulary] section replaces the user config's.
        #[arg(long)]
        vocabulary: Option<PathBuf>,

        /// Print the frequency table without writing output files.
        #[arg(long)]
        no_write: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "bibcloud=info",
        1 => "bibcloud=debug",
        _ => "bibcloud=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Extract {
            files,
            top_words,
            out_dir,
            vocabulary,
            no_write,
        } => cmd_extract(ExtractArgs {
            files,
            top_words,
            out_dir,
            vocabulary,
            no_write,
        }),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

struct ExtractArgs {
    files: Vec<PathBuf>,
    top_words: Option<usize>,
    out_dir: Option<PathBuf>,
    vocabulary: Option<PathBuf>,
    no_write: bool,
}

fn cmd_extract(args: ExtractArgs) -> Result<()> {
    let config = load_config()?;

    // Flags win over the config file
    let top_words = args.top_words.unwrap_or(config.defaults.top_words);
    let out_dir = args
        .out_dir
        .unwrap_or_else(|| PathBuf::from(&config.defaults.out_dir));

    let vocabulary = load_vocabulary(&config, args.vocabulary.as_deref())?;
    info!(
        stop_words = vocabulary.stop_word_count(),
        mappings = vocabulary.mapping_count(),
        "vocabulary ready"
    );
    let tokenizer = Tokenizer::new(vocabulary);

    let reporter = CliProgress::new();
    let report = extract_text(&args.files, &tokenizer, &reporter)?;
    let table = FrequencyTable::from_text(&report.text);

    for (path, reason) in report.skipped() {
        eprintln!("  skipped {}: {reason}", path.display());
    }

    print_table(&table, top_words);

    if args.no_write {
        info!("--no-write given, outputs not written");
    } else {
        let output = OutputConfig {
            out_dir,
            top_words,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        };
        let paths = write_outputs(&output, &report, &table)?;

        println!();
        println!("  Text:    {}", paths.text.display());
        println!("  Counts:  {}", paths.counts.display());
        println!("  Summary: {}", paths.summary.display());
    }

    println!();
    println!(
        "  {} tokens ({} distinct) from {} file(s) in {:.1}s",
        report.token_count,
        table.distinct(),
        report.extracted_count(),
        report.elapsed.as_secs_f64()
    );
    println!();

    Ok(())
}

/// Vocabulary from `--vocabulary FILE` when given, else from the user config.
fn load_vocabulary(config: &AppConfig, override_file: Option<&Path>) -> Result<Vocabulary> {
    let vocabulary = match override_file {
        Some(path) => {
            let file = load_config_from(path)?;
            Vocabulary::from_config(&file.vocabulary)?
        }
        None => Vocabulary::from_config(&config.vocabulary)?,
    };
    Ok(vocabulary)
}

fn print_table(table: &FrequencyTable, top_words: usize) {
    if table.is_empty() {
        warn!("no tokens extracted");
        return;
    }

    let rows = table.top(top_words);
    let width = rows.iter().map(|r| r.token.chars().count()).max().unwrap_or(0);

    println!();
    for (rank, row) in rows.iter().enumerate() {
        println!("  {:>4}  {:<width$}  {}", rank + 1, row.token, row.count);
    }
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn file_started(&self, path: &Path, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Extracting [{current}/{total}] {}", path.display()));
    }

    fn file_skipped(&self, path: &Path, _reason: &str) {
        self.spinner
            .set_message(format!("Skipping {}", path.display()));
    }

    fn done(&self, _report: &ExtractReport) {
        self.spinner.finish_and_clear();
    }
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
