use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use rapip_cli::OutputFormat;
use rapip_cli::commands;
use rapip_cli::commands::measure::MeasureOptions;
use rapip_core::TransportKind;
use rapip_transport::headers::{DEFAULT_OVERHEAD_HEADER, DEFAULT_PRESENCE_HEADER};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "rapip")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Measure API request and parse latency, corrected for proxy overhead",
    long_about = "rapip issues a single measured GET request, times the round trip and the \
                  decoding of the JSON body, and subtracts any overhead an intermediary proxy \
                  reports through response headers."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
}

#[derive(Args)]
struct RequestArgs {
    /// URL to request
    #[arg(value_name = "URL")]
    url: String,

    /// Request header, may be repeated
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
    headers: Vec<String>,

    /// Response header marking that a proxy handled the request
    #[arg(long, env = "RAPIP_PRESENCE_HEADER", default_value = DEFAULT_PRESENCE_HEADER)]
    presence_header: String,

    /// Response header carrying the proxy overhead in milliseconds
    #[arg(long, env = "RAPIP_OVERHEAD_HEADER", default_value = DEFAULT_OVERHEAD_HEADER)]
    overhead_header: String,

    /// Give up on a request after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

impl RequestArgs {
    fn options(&self) -> MeasureOptions {
        MeasureOptions {
            headers: self.headers.clone(),
            presence_header: self.presence_header.clone(),
            overhead_header: self.overhead_header.clone(),
            timeout: self.timeout.map(Duration::from_secs),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Measure a request that completes when response headers arrive
    Fetch(RequestArgs),

    /// Measure a request that completes once the whole body is read
    Xhr(RequestArgs),

    /// Measure the same URL with both transports
    Compare(RequestArgs),

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Execute the command
    match cli.command {
        Commands::Fetch(args) => commands::measure::execute(
            &[TransportKind::Fetch],
            &args.url,
            &args.options(),
            cli.format,
        ),
        Commands::Xhr(args) => commands::measure::execute(
            &[TransportKind::Xhr],
            &args.url,
            &args.options(),
            cli.format,
        ),
        Commands::Compare(args) => commands::measure::execute(
            &[TransportKind::Xhr, TransportKind::Fetch],
            &args.url,
            &args.options(),
            cli.format,
        ),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("rapip=debug,rapip_cli=debug,rapip_core=debug,rapip_transport=debug")
    } else {
        EnvFilter::new("rapip=info,rapip_cli=info,rapip_transport=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
