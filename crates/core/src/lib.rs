#![forbid(unsafe_code)]

pub mod countdown;
pub mod error;
pub mod games;
pub mod model;
pub mod phase;
pub mod time;

pub use countdown::{Countdown, CountdownTick, format_clock};
pub use error::Error;
pub use phase::{Phase, PhaseError, PhaseEvent, PhaseMachine, Transition};
pub use time::Clock;
