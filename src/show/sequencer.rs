use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use tokio::time::sleep;

use crate::lights::{HardwareFault, LightController, OutputBank};

use super::Show;

/// Settle time after the final all-off, for the relay contacts to open
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(10);

/// Work out the cutoff for an "auto-off after this many hours" argument.
/// Negative, NaN and infinite hours mean no cutoff, and so does a cutoff too
/// far out to represent.
pub fn cutoff_after_hours(now: DateTime<Utc>, hours: f64) -> Option<DateTime<Utc>> {
    if !hours.is_finite() || hours < 0.0 {
        return None;
    }

    let millis = (hours * 3_600_000.0).round() as i64;
    now.checked_add_signed(chrono::Duration::milliseconds(millis))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencerState {
    /// Nothing loaded
    Idle,
    /// Drawing frames
    Running,
    /// Everything released, waiting for the relays to settle
    Ending,
    /// Done for good
    Stopped,
}

/// What the caller should do after a [`Sequencer::tick`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// A frame was drawn; tick again once it has been shown for this long
    Hold(Duration),
    /// The show ended and the relays were released; tick again after this
    Settle(Duration),
    /// Nothing left to do
    Done,
}

/// Plays one show on the lights. Holds the cursor, the cutoff and the show
/// itself; each [`tick`](Sequencer::tick) makes exactly one step and says how
/// long to wait before the next one, so the same machine can be driven by a
/// timer or stepped by hand.
pub struct Sequencer {
    state: SequencerState,
    show: Option<Show>,
    cursor: usize,
    cutoff: Option<DateTime<Utc>>,
    settle: Duration,
    passes: u64,
}

impl Sequencer {
    pub fn new(cutoff: Option<DateTime<Utc>>) -> Self {
        Self {
            state: SequencerState::Idle,
            show: None,
            cursor: 0,
            cutoff,
            settle: DEFAULT_SETTLE,
            passes: 0,
        }
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Index of the next frame to draw
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Completed trips through the show so far
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn show(&self) -> Option<&Show> {
        self.show.as_ref()
    }

    /// Load a show and start from its first frame
    pub fn start(&mut self, show: Show) {
        info!(
            "Starting show {} ({} frames, {}ms apart, loop: {})",
            show.name(),
            show.frames().len(),
            show.interval().as_millis(),
            show.looping()
        );

        if let Some(cutoff) = self.cutoff {
            info!("Looping stops after {}", cutoff.to_rfc3339());
        }

        self.show = Some(show);
        self.cursor = 0;
        self.passes = 0;
        self.state = SequencerState::Running;
    }

    /// Make one step of the show. `now` is only looked at when the last
    /// frame has been shown and the show is deciding whether to go round
    /// again.
    pub fn tick<B: OutputBank>(
        &mut self,
        lights: &mut LightController<B>,
        now: DateTime<Utc>,
    ) -> Result<Tick, HardwareFault> {
        match self.state {
            SequencerState::Idle | SequencerState::Stopped => Ok(Tick::Done),
            SequencerState::Running => self.step(lights, now),
            SequencerState::Ending => {
                self.state = SequencerState::Stopped;
                self.show = None;
                info!("Good night");
                Ok(Tick::Done)
            }
        }
    }

    fn step<B: OutputBank>(
        &mut self,
        lights: &mut LightController<B>,
        now: DateTime<Utc>,
    ) -> Result<Tick, HardwareFault> {
        let Some(show) = self.show.as_ref() else {
            warn!("Running without a show");
            self.state = SequencerState::Stopped;
            return Ok(Tick::Done);
        };

        if self.cursor >= show.frames().len() {
            self.passes += 1;

            if show.looping() && self.before_cutoff(now) {
                debug!("Show {}: pass {} done, looping", show.name(), self.passes);
                self.cursor = 0;
            } else {
                if show.looping() {
                    info!("Show {}: cutoff reached after {} passes", show.name(), self.passes);
                } else {
                    info!("Show {}: finished", show.name());
                }
                return self.end(lights);
            }
        }

        let frame = &show.frames()[self.cursor];
        debug!("Show {}: frame {}", show.name(), self.cursor);
        lights.apply_frame(frame.channels())?;
        self.cursor += 1;

        Ok(Tick::Hold(show.interval()))
    }

    fn end<B: OutputBank>(&mut self, lights: &mut LightController<B>) -> Result<Tick, HardwareFault> {
        self.state = SequencerState::Ending;
        lights.all_off()?;
        Ok(Tick::Settle(self.settle))
    }

    fn before_cutoff(&self, now: DateTime<Utc>) -> bool {
        match self.cutoff {
            Some(cutoff) => now < cutoff,
            None => true,
        }
    }

    /// Run the loaded show to the end, sleeping between ticks and reading
    /// `clock` at each one. Returns once the sequencer is stopped; a looping
    /// show with no cutoff never does.
    pub async fn play<B, C>(
        &mut self,
        lights: &mut LightController<B>,
        clock: C,
    ) -> Result<(), HardwareFault>
    where
        B: OutputBank,
        C: Fn() -> DateTime<Utc>,
    {
        loop {
            match self.tick(lights, clock())? {
                Tick::Hold(wait) | Tick::Settle(wait) => sleep(wait).await,
                Tick::Done => return Ok(()),
            }
        }
    }
}
