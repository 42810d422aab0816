use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "td", about = concat!("[ ] tend v", env!("CARGO_PKG_VERSION"), " - one list, kept by hand"), version)]
struct Cli {
    /// Run against a different data directory
    #[arg(short = 'C', long = "data-dir")]
    data_dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = tend::tui::run(cli.data_dir.as_deref()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
