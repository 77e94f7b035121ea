use clap::Parser;
use gitsonar::cli::LinkerCli;
use gitsonar::commands::link;

fn main() {
    gitsonar::init_logging();
    let cli = LinkerCli::parse();

    if let Err(e) = link::run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
