//! @ai:module:intent Loaded records and joined evaluation examples
//! @ai:module:layer domain
//! @ai:module:public_api Example, LabelRecord, Loaded, DatasetLoadResult
//! @ai:module:stateless true

use crate::dataset::issue::Issue;
use crate::schema::{Difficulty, TicketResult, TicketTask};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// @ai:intent A validated label line: the gold result plus its raw difficulty tag
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRecord {
    pub result: TicketResult,
    /// Carried through unchecked; the dataset validator checks it against the closed set
    pub difficulty: Option<Value>,
}

impl LabelRecord {
    /// @ai:intent Difficulty as a plain string, if the label carried one
    /// @ai:effects pure
    pub fn difficulty_str(&self) -> Option<&str> {
        self.difficulty.as_ref().and_then(Value::as_str)
    }
}

/// @ai:intent Records keyed by ticket_id plus the issues raised while loading them
///            Every non-blank input line lands in exactly one of the two
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub records: BTreeMap<String, T>,
    pub issues: Vec<Issue>,
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            issues: Vec::new(),
        }
    }
}

/// @ai:intent Bundled task and gold result used during evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Example {
    pub task: TicketTask,
    pub gold: TicketResult,
    pub difficulty: Option<String>,
}

impl Example {
    pub fn ticket_id(&self) -> &str {
        &self.task.ticket_id
    }

    /// @ai:intent Parse the difficulty tag into the closed set, if it belongs to it
    /// @ai:effects pure
    pub fn difficulty_level(&self) -> Option<Difficulty> {
        self.difficulty.as_deref().and_then(|d| d.parse().ok())
    }
}

/// @ai:intent Output of the dataset join: scorable examples and every issue found
#[derive(Debug, Clone, Default)]
pub struct DatasetLoadResult {
    pub examples: Vec<Example>,
    pub issues: Vec<Issue>,
}
