//! Re-export of foundational types from `barindex-types`.
// Consolidated re-exports so downstream crates can depend on `barindex-core` only

pub use barindex_types::{
    BarError, Closed, Frequency, FrequencyUnit, MergeHow, RangeConfig, Session,
};

pub use chrono_tz::Tz;
