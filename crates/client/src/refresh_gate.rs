//! Guards user-triggered refreshes against overlap and rapid repeats.

use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};

pub const DEFAULT_REFRESH_COOLDOWN: Duration = Duration::from_millis(2000);

/// Source of "now" for cool-down bookkeeping.
pub type Clock = Rc<dyn Fn() -> DateTime<Utc>>;

pub fn system_clock() -> Clock {
    Rc::new(Utc::now)
}

/// What a refresh affordance should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Ready,
    InFlight,
    CoolingDown { remaining: Duration },
}

impl GateState {
    /// A disabled gate rejects triggers; render the button disabled.
    pub fn is_enabled(&self) -> bool {
        matches!(self, GateState::Ready)
    }
}

/// In-flight flag plus a cool-down window that starts when a refresh completes.
///
/// Rejected triggers are reported to the caller, never queued.
pub struct RefreshGate {
    cooldown: chrono::Duration,
    in_flight: bool,
    last_completed: Option<DateTime<Utc>>,
    clock: Clock,
}

impl RefreshGate {
    pub fn new(cooldown: Duration) -> Self {
        Self::with_clock(cooldown, system_clock())
    }

    pub fn with_clock(cooldown: Duration, clock: Clock) -> Self {
        let cooldown = chrono::Duration::from_std(cooldown).unwrap_or_else(|_| {
            crate::log_warn!("refresh cooldown {:?} out of range, using default", cooldown);
            chrono::Duration::milliseconds(DEFAULT_REFRESH_COOLDOWN.as_millis() as i64)
        });
        Self {
            cooldown,
            in_flight: false,
            last_completed: None,
            clock,
        }
    }

    pub fn state(&self) -> GateState {
        if self.in_flight {
            return GateState::InFlight;
        }
        let Some(done) = self.last_completed else {
            return GateState::Ready;
        };
        let remaining = self.cooldown - ((self.clock)() - done);
        match remaining.to_std() {
            Ok(remaining) if !remaining.is_zero() => GateState::CoolingDown { remaining },
            _ => GateState::Ready,
        }
    }

    /// Accept a trigger if the gate is ready; the caller must call
    /// [`finish`](Self::finish) once the triggered work settles.
    pub fn try_begin(&mut self) -> bool {
        if !self.state().is_enabled() {
            return false;
        }
        self.in_flight = true;
        true
    }

    pub fn finish(&mut self) {
        self.in_flight = false;
        self.last_completed = Some((self.clock)());
    }
}
