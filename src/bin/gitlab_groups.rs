use clap::Parser;
use gitsonar::cli::ExplorerCli;
use gitsonar::commands::explore;

fn main() {
    gitsonar::init_logging();
    let cli = ExplorerCli::parse();

    if let Err(e) = explore::run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
