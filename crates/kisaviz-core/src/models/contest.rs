use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contest {
    pub id: String,
    #[serde(default)]
    pub date_end: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Contest {
    /// Contest name if the API provided one
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    /// Sort contests so the most recently ended comes first.
    /// Contests without an end date sort last.
    pub fn sort_newest_first(contests: &mut [Contest]) {
        contests.sort_by(|a, b| b.date_end.cmp(&a.date_end));
    }
}
