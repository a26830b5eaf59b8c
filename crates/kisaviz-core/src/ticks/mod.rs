//! Tick aggregation over a loaded contest snapshot.
//!
//! `ContestSnapshot` owns one fetch's participations and answers count
//! queries over their tick lists. All queries are read-only; a new fetch
//! means a new snapshot.

pub mod dates;
pub mod snapshot;

pub use dates::{day_count, day_range};
pub use snapshot::{ContestSnapshot, DailyWinner, TIE_SEPARATOR};
