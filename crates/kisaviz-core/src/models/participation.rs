use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Species code -> date it was ticked. One date per code.
pub type TickList = BTreeMap<String, NaiveDate>;

/// A participant as returned by `contest_participations/{id}`.
/// `species_json` holds the tick list as a JSON-encoded object string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawParticipation {
    pub species_json: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A participant with its tick list decoded. Other fields are passed through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Participation {
    pub fields: Map<String, Value>,
    pub tick_list: TickList,
}

impl Participation {
    pub fn new(tick_list: TickList) -> Self {
        Self {
            fields: Map::new(),
            tick_list,
        }
    }

    /// Decode one raw participant; `index` is only used for error reporting.
    pub fn decode(raw: &RawParticipation, index: usize) -> Result<Self, DecodeError> {
        Ok(Self {
            fields: raw.fields.clone(),
            tick_list: decode_tick_list(&raw.species_json, index)?,
        })
    }

    pub fn has_ticks(&self) -> bool {
        !self.tick_list.is_empty()
    }
}

/// Decode every participant, failing on the first one that cannot be decoded.
pub fn decode_all(raw: &[RawParticipation]) -> Result<Vec<Participation>, DecodeError> {
    raw.iter()
        .enumerate()
        .map(|(index, r)| Participation::decode(r, index))
        .collect()
}

fn decode_tick_list(species_json: &str, index: usize) -> Result<TickList, DecodeError> {
    let value: Value = serde_json::from_str(species_json)
        .map_err(|source| DecodeError::TickList { index, source })?;

    match value {
        // PHP encodes an empty associative array as `[]`
        Value::Array(items) if items.is_empty() => Ok(TickList::new()),
        other => {
            serde_json::from_value(other).map_err(|source| DecodeError::TickList { index, source })
        }
    }
}
