use anyhow::Error;
use relay_show::prelude::*;

/// Seed the shows folder with the stock patterns
fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load()?;
    let written = FileStructure::verify(&config.shows_dir)?;

    println!(
        "{} new shows in {}: {:?}",
        written.len(),
        config.shows_dir.display(),
        written
    );

    Ok(())
}
