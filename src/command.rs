use std::time::Duration;

use anyhow::{Context, Error};
use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::{
    lights::{LightController, OutputBank},
    select::Selector,
    show::prelude::{cutoff_after_hours, Sequencer, ShowLibrary},
};

/// How one run of the program should behave, from its arguments
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Release every relay
    Off,
    /// Engage every relay
    On,
    /// Play a show, optionally stopping the looping after some hours
    Play { show: String, hours: Option<f64> },
    /// Ask which show to play
    Prompt,
}

impl Command {
    /// Build a command from the positional arguments, program name excluded
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);

        let Some(first) = args.next() else {
            return Command::Prompt;
        };

        match first.as_str() {
            "off" => Command::Off,
            "on" => Command::On,
            _ => Command::Play {
                show: first,
                hours: args.next().and_then(|hours| parse_hours(&hours)),
            },
        }
    }
}

fn parse_hours(arg: &str) -> Option<f64> {
    match arg.trim().parse::<f64>() {
        Ok(hours) if hours.is_finite() && hours >= 0.0 => Some(hours),
        _ => {
            warn!("Ignoring '{}', expected a number of hours", arg);
            None
        }
    }
}

/// Everything a command needs to run
pub struct Dispatcher<'a, B, S> {
    pub library: &'a ShowLibrary,
    pub selector: &'a mut S,
    pub lights: &'a mut LightController<B>,
    /// Settle time handed to the sequencer
    pub settle: Duration,
    /// Wall clock the cutoff is set and checked against, `Utc::now` outside tests
    pub clock: &'a dyn Fn() -> DateTime<Utc>,
}

impl<'a, B: OutputBank, S: Selector> Dispatcher<'a, B, S> {
    /// Run `command` to completion. The show is loaded before any relay is
    /// touched, so a missing or broken show leaves the lights as they were.
    pub async fn run(mut self, command: Command) -> Result<(), Error> {
        let (name, hours) = match command {
            Command::Off => {
                info!("Turning all lights off");
                return Ok(self.lights.all_off()?);
            }
            Command::On => {
                info!("Turning all lights on");
                return Ok(self.lights.all_on()?);
            }
            Command::Play { show, hours } => (show, hours),
            Command::Prompt => {
                let shows = self.library.list()?;
                let show = self
                    .selector
                    .select("Which show would you like to run?", &shows)?;
                (show, None)
            }
        };

        let cutoff = hours.and_then(|hours| cutoff_after_hours((self.clock)(), hours));
        let mut sequencer = Sequencer::new(cutoff).with_settle(self.settle);

        let show = self.library.load(&name)?;

        self.lights
            .initialize()
            .with_context(|| format!("could not set up the lights for '{name}'"))?;
        sequencer.start(show);

        tokio::select! {
            played = sequencer.play(self.lights, self.clock) => {
                played.with_context(|| format!("show '{name}' stopped on a hardware fault"))?;
            }
            // A failed handler registration disables this branch
            Ok(()) = tokio::signal::ctrl_c() => {
                warn!("Interrupted, turning everything off");
                self.lights.all_off()?;
            }
        }

        Ok(())
    }
}
