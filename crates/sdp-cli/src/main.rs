//! # sdp CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// Selective disclosure primitives.
///
/// Parses JSON pointers, selects and frames JSON-LD documents, rewrites
/// blank nodes in N-Quads, and derives HMAC replacement labels.
#[derive(Parser, Debug)]
#[command(name = "sdp", version, about)]
struct Cli {
    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Parse a JSON pointer into steps.
    Pointer(sdp_cli::pointer::PointerArgs),
    /// Select parts of a JSON document by JSON pointers.
    Select(sdp_cli::pointer::SelectArgs),
    /// Convert JSON pointers into JSON-LD frames.
    Frames(sdp_cli::pointer::SelectArgs),
    /// Replace blank nodes in N-Quads with skolem IRIs.
    Skolemize(sdp_cli::statements::SkolemArgs),
    /// Replace skolem IRIs in N-Quads with blank nodes.
    Deskolemize(sdp_cli::statements::SkolemArgs),
    /// Rewrite blank node labels through a label map.
    Relabel(sdp_cli::statements::RelabelArgs),
    /// Derive HMAC replacement labels for a canonical id map.
    HmacLabels(sdp_cli::labels::HmacLabelsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries results.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if cli.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Pointer(args) => sdp_cli::pointer::run_pointer(&args, &mut out),
        Commands::Select(args) => sdp_cli::pointer::run_select(&args, &mut out),
        Commands::Frames(args) => sdp_cli::pointer::run_frames(&args, &mut out),
        Commands::Skolemize(args) => sdp_cli::statements::run_skolemize(&args, &mut out),
        Commands::Deskolemize(args) => sdp_cli::statements::run_deskolemize(&args, &mut out),
        Commands::Relabel(args) => sdp_cli::statements::run_relabel(&args, &mut out),
        Commands::HmacLabels(args) => sdp_cli::labels::run_hmac_labels(&args, &mut out),
    }
}
