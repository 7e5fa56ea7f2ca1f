//! Word-clock gating: edge decimation and the release signal it drives.

pub mod decimator;
pub mod signal;

pub use decimator::ClockDecimator;
pub use signal::ReleaseSignal;
