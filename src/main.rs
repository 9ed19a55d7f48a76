use std::path::PathBuf;

use boxchart::{parse_file, document_to_json, write_chart, OUTPUT_DIR};
use clap::Parser;
use log::{LevelFilter, Log, Metadata, Record};

#[derive(Parser, Debug)]
#[command(name = "boxchart")]
#[command(about = "Render a text chord chart to a paged SVG grid", long_about = None)]
struct Cli {
    /// Chart text file to render
    input: PathBuf,

    /// Log parser and layout decisions to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print the parsed chart as JSON instead of rendering it
    #[arg(long)]
    json: bool,
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> boxchart::Result<()> {
    let doc = parse_file(&cli.input)?;

    if cli.json {
        println!("{}", document_to_json(&doc)?);
        return Ok(());
    }

    let path = write_chart(&doc, OUTPUT_DIR)?;
    println!("Wrote {}", path.display());
    Ok(())
}
