pub mod config;
pub mod file;

use std::path::PathBuf;
use clap::Parser;
use log::*;
use railmlio::{ExportOptions, IdMode, SchemaVersion, Strictness};

type BoxResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Export a railway micro topology (JSON or RON) to railML 3.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Topology description, .json or .ron
    input :PathBuf,
    /// Output file, stdout if not given
    #[arg(short, long)]
    output :Option<PathBuf>,
    /// railML version to write (3.1 or 3.2)
    #[arg(long)]
    schema :Option<SchemaVersion>,
    /// Skip switches and signals that cannot be converted instead of failing
    #[arg(long)]
    lenient :bool,
    /// Numbered ids instead of uuids for elements without a topology id
    #[arg(long)]
    sequential_ids :bool,
    /// Config file to use instead of the user's default config
    #[arg(long)]
    config :Option<PathBuf>,
}

impl Args {
    fn export_options(&self, config :&config::Config) -> ExportOptions {
        let mut opts = config.export_options();
        if let Some(v) = self.schema { opts.version = v; }
        if self.lenient { opts.strictness = Strictness::Lenient; }
        if self.sequential_ids { opts.ids = IdMode::Sequential; }
        opts
    }
}

fn run(args :&Args) -> BoxResult<()> {
    let config = match &args.config {
        Some(path) => config::Config::load_path(path)?,
        None => config::Config::load(),
    };
    let options = args.export_options(&config);

    let topo = file::load_topology(&args.input)?;
    let doc = railmlio::export(&topo, &options)?;
    match &args.output {
        Some(path) => railmlio::write_railml_to_file(&doc, path)?,
        None => println!("{}", railmlio::write_railml(&doc)?),
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting {} v{}.", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
