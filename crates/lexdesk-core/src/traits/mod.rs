//! Seams between the engine and the outside world.

pub mod clock;
pub mod provider;

pub use clock::{Clock, FixedClock, SystemClock};
pub use provider::CaseDataProvider;
