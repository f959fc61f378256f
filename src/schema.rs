//! @ai:module:intent Task and result payload schemas with explicit validation
//! @ai:module:layer domain
//! @ai:module:public_api TicketTask, TicketResult, TicketCategory, TicketSeverity, Difficulty, FieldError, FieldErrors
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

const TASK_FIELDS: &[&str] = &["ticket_id", "title", "description", "metadata"];
const RESULT_FIELDS: &[&str] = &["category", "severity", "next_step", "confidence"];

/// @ai:intent Canonical ticket type chosen from the triage taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketCategory {
    Bug,
    Incident,
    Request,
    Question,
}

impl TicketCategory {
    pub const ALL: [TicketCategory; 4] = [
        TicketCategory::Bug,
        TicketCategory::Incident,
        TicketCategory::Request,
        TicketCategory::Question,
    ];

    /// @ai:intent Convert category to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketCategory::Bug => "bug",
            TicketCategory::Incident => "incident",
            TicketCategory::Request => "request",
            TicketCategory::Question => "question",
        }
    }
}

impl std::fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TicketCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| expected_one_of(&Self::ALL.map(|c| c.as_str())))
    }
}

/// @ai:intent Impact level aligned with the triage playbook, ordered low to critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TicketSeverity {
    pub const ALL: [TicketSeverity; 4] = [
        TicketSeverity::Low,
        TicketSeverity::Medium,
        TicketSeverity::High,
        TicketSeverity::Critical,
    ];

    /// @ai:intent Convert severity to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketSeverity::Low => "low",
            TicketSeverity::Medium => "medium",
            TicketSeverity::High => "high",
            TicketSeverity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for TicketSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TicketSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sev| sev.as_str() == s)
            .ok_or_else(|| expected_one_of(&Self::ALL.map(|sev| sev.as_str())))
    }
}

/// @ai:intent Difficulty tag attached to a labeled example
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// @ai:intent Convert difficulty to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| expected_one_of(&Self::ALL.map(|d| d.as_str())))
    }
}

fn expected_one_of(values: &[&str]) -> String {
    format!("input should be one of {}", values.join(", "))
}

/// @ai:intent A single validation failure located at a field path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{loc}: {msg}")]
pub struct FieldError {
    pub loc: String,
    pub msg: String,
}

/// @ai:intent All field failures collected while validating one payload
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    /// @ai:intent Build an error set with one entry
    /// @ai:effects pure
    pub fn single(loc: impl Into<String>, msg: impl Into<String>) -> Self {
        Self(vec![FieldError {
            loc: loc.into(),
            msg: msg.into(),
        }])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "[{}]", rendered.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

/// @ai:intent Incoming task payload for the ticket triage agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TicketTask {
    pub ticket_id: String,
    pub title: String,
    pub description: String,
    /// Optional key/value metadata such as product area or reporter role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

impl TicketTask {
    /// @ai:intent Validate a raw JSON payload into a task
    /// @ai:post Ok implies every string field is non-empty and no unknown keys exist
    /// @ai:effects pure
    pub fn validate(payload: &Value) -> Result<Self, FieldErrors> {
        let mut v = ObjectValidator::root(payload)?;

        let ticket_id = v.required_str("ticket_id");
        let title = v.required_str("title");
        let description = v.required_str("description");
        let metadata = v.optional_string_map("metadata");
        v.reject_unknown(TASK_FIELDS);

        match (ticket_id, title, description, metadata, v.into_errors()) {
            (Some(ticket_id), Some(title), Some(description), Some(metadata), errors)
                if errors.is_empty() =>
            {
                Ok(Self {
                    ticket_id,
                    title,
                    description,
                    metadata,
                })
            }
            (.., errors) => Err(errors),
        }
    }
}

/// @ai:intent Structured triage decision produced by the agent or stored as a gold label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TicketResult {
    pub category: TicketCategory,
    pub severity: TicketSeverity,
    pub next_step: String,
    pub confidence: f64,
}

impl TicketResult {
    /// @ai:intent Validate a raw JSON payload into a result
    /// @ai:post Ok implies confidence is within [0, 1] and next_step is non-empty
    /// @ai:effects pure
    pub fn validate(payload: &Value) -> Result<Self, FieldErrors> {
        let mut v = ObjectValidator::root(payload)?;

        let category = v.required_enum::<TicketCategory>("category");
        let severity = v.required_enum::<TicketSeverity>("severity");
        let next_step = v.required_str("next_step");
        let confidence = v.required_unit_interval("confidence");
        v.reject_unknown(RESULT_FIELDS);

        match (category, severity, next_step, confidence, v.into_errors()) {
            (Some(category), Some(severity), Some(next_step), Some(confidence), errors)
                if errors.is_empty() =>
            {
                Ok(Self {
                    category,
                    severity,
                    next_step,
                    confidence,
                })
            }
            (.., errors) => Err(errors),
        }
    }

    /// @ai:intent Re-check an already constructed result against the schema
    ///            Fields are public, so a value may have been mutated after validation
    /// @ai:effects pure
    pub fn check(&self) -> Result<(), FieldErrors> {
        let payload = serde_json::to_value(self)
            .map_err(|e| FieldErrors::single("__root__", e.to_string()))?;
        Self::validate(&payload).map(|_| ())
    }
}

/// @ai:intent Accumulates field errors while reading a JSON object
struct ObjectValidator<'a> {
    object: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> ObjectValidator<'a> {
    fn root(payload: &'a Value) -> Result<Self, FieldErrors> {
        match payload {
            Value::Object(object) => Ok(Self {
                object,
                errors: Vec::new(),
            }),
            _ => Err(FieldErrors::single("__root__", "input should be an object")),
        }
    }

    fn push(&mut self, loc: impl Into<String>, msg: impl Into<String>) {
        self.errors.push(FieldError {
            loc: loc.into(),
            msg: msg.into(),
        });
    }

    fn required(&mut self, key: &str) -> Option<&'a Value> {
        match self.object.get(key) {
            Some(value) => Some(value),
            None => {
                self.push(key, "field required");
                None
            }
        }
    }

    fn required_str(&mut self, key: &str) -> Option<String> {
        match self.required(key)? {
            Value::String(s) if s.is_empty() => {
                self.push(key, "string should have at least 1 character");
                None
            }
            Value::String(s) => Some(s.clone()),
            _ => {
                self.push(key, "input should be a valid string");
                None
            }
        }
    }

    fn required_enum<T: FromStr<Err = String>>(&mut self, key: &str) -> Option<T> {
        match self.required(key)? {
            Value::String(s) => match s.parse::<T>() {
                Ok(parsed) => Some(parsed),
                Err(msg) => {
                    self.push(key, msg);
                    None
                }
            },
            _ => {
                self.push(key, "input should be a valid string");
                None
            }
        }
    }

    fn required_unit_interval(&mut self, key: &str) -> Option<f64> {
        let value = self.required(key)?;
        match value.as_f64() {
            Some(n) if (0.0..=1.0).contains(&n) => Some(n),
            Some(_) => {
                self.push(key, "input should be between 0 and 1");
                None
            }
            None => {
                self.push(key, "input should be a valid number");
                None
            }
        }
    }

    /// Outer `None` means an error was recorded; `Some(None)` means absent or null.
    fn optional_string_map(&mut self, key: &str) -> Option<Option<BTreeMap<String, String>>> {
        let map = match self.object.get(key) {
            None | Some(Value::Null) => return Some(None),
            Some(Value::Object(map)) => map,
            Some(_) => {
                self.push(key, "input should be a valid dictionary");
                return None;
            }
        };

        let mut out = BTreeMap::new();
        let mut valid = true;
        for (k, v) in map {
            match v {
                Value::String(s) => {
                    out.insert(k.clone(), s.clone());
                }
                _ => {
                    self.push(format!("{}.{}", key, k), "input should be a valid string");
                    valid = false;
                }
            }
        }

        valid.then_some(Some(out))
    }

    fn reject_unknown(&mut self, allowed: &[&str]) {
        let unknown: Vec<String> = self
            .object
            .keys()
            .filter(|k| !allowed.contains(&k.as_str()))
            .cloned()
            .collect();

        for key in unknown {
            self.push(key, "extra field not permitted");
        }
    }

    fn into_errors(self) -> FieldErrors {
        FieldErrors(self.errors)
    }
}

/// @ai:intent JSON Schema document for the task payload
/// @ai:effects pure
pub fn task_json_schema() -> Value {
    json!({
        "title": "TicketTask",
        "type": "object",
        "additionalProperties": false,
        "required": ["ticket_id", "title", "description"],
        "properties": {
            "ticket_id": {"type": "string", "minLength": 1},
            "title": {"type": "string", "minLength": 1},
            "description": {"type": "string", "minLength": 1},
            "metadata": {
                "anyOf": [
                    {"type": "object", "additionalProperties": {"type": "string"}},
                    {"type": "null"}
                ],
                "default": null
            }
        }
    })
}

/// @ai:intent JSON Schema document for the result payload
/// @ai:effects pure
pub fn result_json_schema() -> Value {
    json!({
        "title": "TicketResult",
        "type": "object",
        "additionalProperties": false,
        "required": ["category", "severity", "next_step", "confidence"],
        "properties": {
            "category": {"enum": TicketCategory::ALL.map(|c| c.as_str())},
            "severity": {"enum": TicketSeverity::ALL.map(|s| s.as_str())},
            "next_step": {"type": "string", "minLength": 1},
            "confidence": {"type": "number", "minimum": 0.0, "maximum": 1.0}
        }
    })
}
