mod commands;
mod terminal;

use commands::{CommandLine, filter};
use scoper_common::config::Config;
use terminal::{logging, print};
use tracing::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg: Config = commands.config()?;

    logging::init(&cfg);
    print::banner(cfg.chain_mode);

    if let Err(e) = filter::filter(&commands, &cfg).await {
        error!("{e:#}");
        std::process::exit(1);
    }

    Ok(())
}
