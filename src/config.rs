use std::{
    io,
    path::{Path, PathBuf},
};

use log::{debug, info};
use pi_pinout::{GpioPin, PhysicalPin, WiringPiPin};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the config is read from unless `RELAY_SHOW_CONFIG` says otherwise
pub const CONFIG_FILE: &str = "config.ron";

/// Physical header pins wired to the relay board, in channel order.
/// Pin 8 is the first UART line, so boards with the serial console enabled
/// should override this list.
pub const DEFAULT_PHYSICAL_PINS: [u8; 16] = [3, 5, 7, 8, 10, 11, 12, 13, 15, 16, 18, 19, 21, 22, 23, 24];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("{pin} is not a GPIO line")]
    InvalidPin { pin: String },
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// One entry per relay channel, in channel order
    pub lights: Vec<Light>,
    pub shows_dir: PathBuf,
    /// How long to let the relays settle after the final all-off
    pub settle_ms: u64,
    /// Draw every frame to the terminal when no GPIO is available
    pub preview: bool,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct Light {
    pub pin: Pin,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub enum Pin {
    Physical(PhysicalPin),
    Gpio(GpioPin),
    WiringPi(WiringPiPin),
}

/// Header pins that carry a GPIO line; the rest are power and ground
const GPIO_HEADER_PINS: [u8; 28] = [
    3, 5, 7, 8, 10, 11, 12, 13, 15, 16, 18, 19, 21, 22, 23, 24, 26, 27, 28, 29, 31, 32, 33, 35,
    36, 37, 38, 40,
];

/// Highest BCM line on the header
const MAX_GPIO: u8 = 27;

impl Pin {
    /// The BCM GPIO number behind this pin, whichever numbering it was
    /// written in. Power, ground and out of range pins are an error.
    pub fn gpio(&self) -> Result<GpioPin, ConfigError> {
        let valid = match *self {
            Pin::Physical(PhysicalPin(n)) => GPIO_HEADER_PINS.contains(&n),
            Pin::Gpio(GpioPin(n)) => n <= MAX_GPIO,
            // 17 to 20 were the P5 header of the rev 2 boards
            Pin::WiringPi(WiringPiPin(n)) => matches!(n, 0..=16 | 21..=31),
        };

        if !valid {
            return Err(ConfigError::InvalidPin {
                pin: format!("{:?}", self),
            });
        }

        Ok(match *self {
            Pin::Physical(pin) => pin.into(),
            Pin::Gpio(pin) => pin,
            Pin::WiringPi(pin) => pin.into(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lights: DEFAULT_PHYSICAL_PINS
                .iter()
                .map(|&pin| Light {
                    pin: Pin::Physical(PhysicalPin(pin)),
                })
                .collect(),
            shows_dir: PathBuf::from("shows"),
            settle_ms: 10,
            preview: false,
        }
    }
}

impl Config {
    /// Load `config.ron` (or the file named by `RELAY_SHOW_CONFIG`). A
    /// missing file means the stock 16-relay wiring.
    pub fn load() -> Result<Config, ConfigError> {
        let path = std::env::var_os("RELAY_SHOW_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let config = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&config)?;

        info!(
            "Loaded {} with {} lights",
            path.display(),
            config.lights.len()
        );

        Ok(config)
    }

    pub fn from_ron(text: &str) -> Result<Config, ConfigError> {
        Ok(ron::from_str(text)?)
    }
}
