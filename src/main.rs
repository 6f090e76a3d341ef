use clap::Parser;
use twdeck::cli::commands::Cli;
use twdeck::io::config_io::load_config;
use twdeck::io::gateway::TaskCli;
use twdeck::io::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = start(&cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn start(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    init_logging(config.log_file.as_deref())?;

    let store = TaskCli::new(&config.task);
    twdeck::tui::run(Box::new(store), &config)
}
