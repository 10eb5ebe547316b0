use log::{debug, info, warn};
use pi_pinout::GpioPin;

use crate::config::{Config, ConfigError};

pub mod bank;

pub use bank::{HardwareFault, Level, OutputBank, SimulatedBank};

#[cfg(feature = "pi")]
pub use bank::GpioBank;

#[cfg(feature = "pi")]
pub type DefaultBank = GpioBank;

#[cfg(not(feature = "pi"))]
pub type DefaultBank = SimulatedBank;

/// Open whatever output bank this build drives: the GPIO header with the `pi`
/// feature, a simulated one everywhere else
pub fn open_bank(config: &Config) -> Result<DefaultBank, HardwareFault> {
    #[cfg(feature = "pi")]
    {
        let _ = config;
        GpioBank::open()
    }

    #[cfg(not(feature = "pi"))]
    {
        warn!("Not built for the Pi, relays are simulated");
        Ok(SimulatedBank::new(config.preview))
    }
}

/// Turn a relay state into the level on its line. The relay board is active
/// low: an engaged relay is a LOW line. Nothing else should know this.
pub fn signal(engaged: bool) -> Level {
    match engaged {
        true => Level::Low,
        false => Level::High,
    }
}

/// Channel index to GPIO line, fixed once the config is read
#[derive(Clone, Debug, PartialEq)]
pub struct PinMap {
    pins: Vec<GpioPin>,
}

impl PinMap {
    pub fn new(pins: Vec<GpioPin>) -> Self {
        Self { pins }
    }

    /// Resolve every configured light to its GPIO line. Fails on the first
    /// pin that is not a GPIO line, before anything is driven.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let pins = config
            .lights
            .iter()
            .map(|light| light.pin.gpio())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(pins))
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = GpioPin> + '_ {
        self.pins.iter().copied()
    }
}

/// Drives the relay board. Everything above this speaks in engaged/released;
/// the polarity flip happens in [`signal`].
pub struct LightController<B> {
    pins: PinMap,
    bank: B,
    initialized: bool,
}

impl<B: OutputBank> LightController<B> {
    pub fn new(pins: PinMap, bank: B) -> Self {
        Self {
            pins,
            bank,
            initialized: false,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.pins.len()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    /// Claim every pin as an output with the relay released
    pub fn initialize(&mut self) -> Result<(), HardwareFault> {
        if self.initialized {
            debug!("Lights already initialized");
            return Ok(());
        }

        self.configure_all(false)
    }

    /// Write one frame. Only the channels the frame has an entry for are
    /// touched; entries past the last channel are ignored.
    pub fn apply_frame(&mut self, frame: &[bool]) -> Result<(), HardwareFault> {
        for (channel, (pin, &engaged)) in self.pins.iter().zip(frame).enumerate() {
            debug!("Light {}: setting to {}", channel, engaged);
            self.bank.write(pin, signal(engaged))?;
        }

        self.bank.flush();
        Ok(())
    }

    pub fn all_on(&mut self) -> Result<(), HardwareFault> {
        self.set_all(true)
    }

    pub fn all_off(&mut self) -> Result<(), HardwareFault> {
        self.set_all(false)
    }

    fn set_all(&mut self, engaged: bool) -> Result<(), HardwareFault> {
        // Pins that were never opened get opened straight at the level asked for
        if !self.initialized {
            return self.configure_all(engaged);
        }

        for pin in self.pins.iter() {
            self.bank.write(pin, signal(engaged))?;
        }

        self.bank.flush();
        Ok(())
    }

    fn configure_all(&mut self, engaged: bool) -> Result<(), HardwareFault> {
        for (i, pin) in self.pins.iter().enumerate() {
            info!("Light {}: initializing on pin {}", i, pin.0);
            self.bank.configure(pin, signal(engaged))?;
        }

        self.initialized = true;
        self.bank.flush();
        Ok(())
    }
}
