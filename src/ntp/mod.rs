//! Clock offset estimation from an NTP request/response exchange.

mod estimator;
mod offset;
mod timestamp;

pub use estimator::*;
pub use offset::*;
pub use timestamp::*;
