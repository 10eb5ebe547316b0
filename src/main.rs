use std::{process::ExitCode, time::Duration};

use anyhow::Error;
use chrono::Utc;
use log::{error, info, warn};
use relay_show::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let command = Command::from_args(std::env::args().skip(1));

    // Load the config file
    let config = Config::load()?;
    let library = ShowLibrary::new(&config.shows_dir);

    let pins = PinMap::from_config(&config)?;
    if pins.is_empty() {
        warn!("No lights configured, nothing will be driven");
    }
    let mut lights = LightController::new(pins, open_bank(&config)?);
    info!("Driving {} relays", lights.channel_count());

    let mut selector = TerminalSelector::stdio();

    let dispatcher = Dispatcher {
        library: &library,
        selector: &mut selector,
        lights: &mut lights,
        settle: Duration::from_millis(config.settle_ms),
        clock: &Utc::now,
    };

    if let Err(e) = dispatcher.run(command).await {
        error!("{:#}", e);
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
