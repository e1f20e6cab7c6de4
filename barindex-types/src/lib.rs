//! Session, frequency, configuration and error types shared by the barindex crates.
#![warn(missing_docs)]

mod config;
mod error;
mod frequency;
mod session;

pub use config::{Closed, MergeHow, RangeConfig};
pub use error::BarError;
pub use frequency::{Frequency, FrequencyUnit};
pub use session::Session;
