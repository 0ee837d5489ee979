mod commands;

use anyhow::Result;
use clap::Parser;

use commands::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    satchel_observability::init(cli.log_format.into());

    let mut stdout = std::io::stdout().lock();
    commands::run(cli, &mut stdout)
}
