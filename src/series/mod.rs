pub mod builder;
pub mod error;
pub mod markers;
pub mod payload;
pub mod resample;
pub mod smoothing;
