use std::io::Write;

use log::debug;
use pi_pinout::GpioPin;
use thiserror::Error;

#[cfg(feature = "pi")]
use std::collections::HashMap;

#[cfg(feature = "pi")]
use log::info;

#[cfg(feature = "pi")]
use rppal::gpio::{Gpio, OutputPin};

/// Physical level of an output line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    High,
    Low,
}

#[derive(Debug, Error)]
pub enum HardwareFault {
    #[error("pin {0} was never configured as an output")]
    Unconfigured(u8),
    #[cfg(feature = "pi")]
    #[error("could not open GPIO: {0}")]
    Open(#[source] rppal::gpio::Error),
    #[cfg(feature = "pi")]
    #[error("GPIO {pin}: {source}")]
    Gpio {
        pin: u8,
        #[source]
        source: rppal::gpio::Error,
    },
}

/// A set of output lines that can be claimed and driven. Knows nothing about
/// relays or polarity, only levels.
pub trait OutputBank {
    /// Claim `pin` as an output, already driven to `level`
    fn configure(&mut self, pin: GpioPin, level: Level) -> Result<(), HardwareFault>;

    /// Drive an already configured pin
    fn write(&mut self, pin: GpioPin, level: Level) -> Result<(), HardwareFault>;

    /// Called after a whole frame or bulk update has been written
    fn flush(&mut self) {}
}

/// Stand-in for the GPIO header when not running on a Pi. Remembers the level
/// of every line and every write that was made, and can draw the lines to the
/// terminal.
#[derive(Debug, Default)]
pub struct SimulatedBank {
    lines: Vec<(u8, Level)>,
    writes: Vec<(u8, Level)>,
    preview: bool,
}

impl SimulatedBank {
    pub fn new(preview: bool) -> Self {
        Self {
            preview,
            ..Default::default()
        }
    }

    /// Levels of all configured lines, in the order they were configured
    pub fn levels(&self) -> Vec<Level> {
        self.lines.iter().map(|(_, level)| *level).collect()
    }

    /// Every configure and write, oldest first
    pub fn writes(&self) -> &[(u8, Level)] {
        &self.writes
    }

    fn render(&self) -> String {
        self.lines
            .iter()
            .map(|(_, level)| match level {
                Level::Low => "\u{2593} ",
                Level::High => "\u{2591} ",
            })
            .collect()
    }
}

impl OutputBank for SimulatedBank {
    fn configure(&mut self, pin: GpioPin, level: Level) -> Result<(), HardwareFault> {
        match self.lines.iter_mut().find(|(line, _)| *line == pin.0) {
            Some(line) => line.1 = level,
            None => self.lines.push((pin.0, level)),
        }
        self.writes.push((pin.0, level));
        Ok(())
    }

    fn write(&mut self, pin: GpioPin, level: Level) -> Result<(), HardwareFault> {
        let line = self
            .lines
            .iter_mut()
            .find(|(line, _)| *line == pin.0)
            .ok_or(HardwareFault::Unconfigured(pin.0))?;

        line.1 = level;
        self.writes.push((pin.0, level));
        debug!("GPIO {}: {:?}", pin.0, level);
        Ok(())
    }

    fn flush(&mut self) {
        if self.preview {
            let mut stdout = std::io::stdout();
            let _ = write!(stdout, "\r{}", self.render());
            let _ = stdout.flush();
        }
    }
}

/// The real GPIO header, through rppal
#[cfg(feature = "pi")]
pub struct GpioBank {
    gpio: Gpio,
    pins: HashMap<u8, OutputPin>,
}

#[cfg(feature = "pi")]
impl GpioBank {
    pub fn open() -> Result<Self, HardwareFault> {
        let gpio = Gpio::new().map_err(HardwareFault::Open)?;
        info!("Opened GPIO");

        Ok(Self {
            gpio,
            pins: HashMap::new(),
        })
    }
}

#[cfg(feature = "pi")]
impl From<Level> for rppal::gpio::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::High => rppal::gpio::Level::High,
            Level::Low => rppal::gpio::Level::Low,
        }
    }
}

#[cfg(feature = "pi")]
impl OutputBank for GpioBank {
    fn configure(&mut self, pin: GpioPin, level: Level) -> Result<(), HardwareFault> {
        let raw = self
            .gpio
            .get(pin.0)
            .map_err(|source| HardwareFault::Gpio { pin: pin.0, source })?;

        let mut output = match level {
            Level::High => raw.into_output_high(),
            Level::Low => raw.into_output_low(),
        };

        // The relays have to hold their state after `on`/`off` exits
        output.set_reset_on_drop(false);

        self.pins.insert(pin.0, output);
        Ok(())
    }

    fn write(&mut self, pin: GpioPin, level: Level) -> Result<(), HardwareFault> {
        let output = self
            .pins
            .get_mut(&pin.0)
            .ok_or(HardwareFault::Unconfigured(pin.0))?;

        output.write(level.into());
        Ok(())
    }
}
