use clap::Parser;
use teloscan::{
    cli::{init_verbose, Cli, FULL_VERSION},
    commands::scan,
    utils::{handle_error_and_exit, Result},
};

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);

    log::info!("Running {}-{}", env!("CARGO_PKG_NAME"), *FULL_VERSION);
    scan::scan(cli.args)?;
    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e);
    }
}
