//! Data models for contest API entities.
//!
//! - `RawParticipation`: a participant exactly as the API returns it, with the
//!   tick list still embedded as a JSON string. This is what gets cached.
//! - `Participation`: a decoded participant with its `TickList`
//! - `Contest`: an entry of the contest list

pub mod contest;
pub mod participation;

pub use contest::Contest;
pub use participation::{decode_all, Participation, RawParticipation, TickList};
