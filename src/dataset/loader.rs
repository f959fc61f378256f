//! @ai:module:intent JSONL loader and inner join for tasks and expected results
//! @ai:module:layer infrastructure
//! @ai:module:public_api DatasetLoader, DatasetLoaderTrait, join
//! @ai:module:stateless true

use crate::dataset::example::{DatasetLoadResult, Example, LabelRecord, Loaded};
use crate::dataset::issue::Issue;
use crate::schema::{TicketResult, TicketTask};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

/// @ai:intent Trait for loading and joining the evaluation dataset
pub trait DatasetLoaderTrait: Send + Sync {
    /// @ai:intent Load task lines keyed by ticket_id
    fn load_tasks(&self, path: &Path) -> Loaded<TicketTask>;

    /// @ai:intent Load label lines keyed by ticket_id
    fn load_labels(&self, path: &Path) -> Loaded<LabelRecord>;

    /// @ai:intent Load both files and inner-join them into examples
    fn assemble(&self, tasks_path: &Path, labels_path: &Path) -> DatasetLoadResult;
}

/// @ai:intent Reads line-delimited JSON records, turning every malformed line into an issue
/// @ai:effects pure (stateless)
pub struct DatasetLoader;

impl DatasetLoader {
    /// @ai:intent Create a new dataset loader
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Read a JSONL file, validating each object line with `parse`
    /// @ai:post every non-blank line yields exactly one record or one issue
    /// @ai:effects fs:read
    fn load_records<T, F>(path: &Path, parse: F) -> Loaded<T>
    where
        F: Fn(&str, Map<String, Value>) -> Result<(String, T), Issue>,
    {
        let mut loaded = Loaded::default();

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("Cannot open dataset file {}: {}", path.display(), e);
                loaded.issues.push(Issue::schema_failure(
                    format!("{} unreadable ({})", path.display(), e),
                    None,
                ));
                return loaded;
            }
        };

        for (index, line) in BufReader::new(file).lines().enumerate() {
            let lineno = index + 1;
            let location = format!("{}:{}", path.display(), lineno);

            let raw = match line {
                Ok(raw) => raw,
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    loaded.issues.push(Issue::schema_failure(
                        format!("{} invalid UTF-8 ({})", location, e),
                        None,
                    ));
                    continue;
                }
                Err(e) => {
                    loaded.issues.push(Issue::schema_failure(
                        format!("{} unreadable ({})", location, e),
                        None,
                    ));
                    break;
                }
            };

            let raw = raw.trim();

            if raw.is_empty() {
                continue;
            }

            let outcome = parse_object(&location, raw).and_then(|object| parse(&location, object));

            match outcome {
                Ok((ticket_id, record)) => {
                    if loaded.records.contains_key(&ticket_id) {
                        loaded.issues.push(Issue::join_mismatch(
                            format!("{} duplicate ticket_id", location),
                            Some(ticket_id),
                        ));
                    } else {
                        loaded.records.insert(ticket_id, record);
                    }
                }
                Err(issue) => loaded.issues.push(issue),
            }
        }

        tracing::info!(
            "Loaded {} records from {} ({} issues)",
            loaded.records.len(),
            path.display(),
            loaded.issues.len()
        );

        for issue in &loaded.issues {
            tracing::debug!("{}", issue);
        }

        loaded
    }

    /// @ai:intent Validate one task line: a nested `task` object matching the task schema
    /// @ai:effects pure
    fn parse_task(location: &str, mut payload: Map<String, Value>) -> Result<(String, TicketTask), Issue> {
        let Some(task_data) = payload.remove("task").filter(|v| !v.is_null()) else {
            return Err(Issue::schema_failure(
                format!("{} missing 'task' field", location),
                payload.get("ticket_id").and_then(candidate_id),
            ));
        };

        match TicketTask::validate(&task_data) {
            Ok(task) => Ok((task.ticket_id.clone(), task)),
            Err(errors) => Err(Issue::schema_failure(
                format!("{} task schema violation: {}", location, errors),
                task_data.get("ticket_id").and_then(candidate_id),
            )),
        }
    }

    /// @ai:intent Validate one label line: ticket_id, expected_result and optional difficulty
    /// @ai:effects pure
    fn parse_label(location: &str, mut payload: Map<String, Value>) -> Result<(String, LabelRecord), Issue> {
        let ticket_id = match payload.get("ticket_id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            _ => {
                return Err(Issue::schema_failure(
                    format!("{} missing or invalid 'ticket_id'", location),
                    None,
                ))
            }
        };

        let Some(expected) = payload.remove("expected_result").filter(|v| !v.is_null()) else {
            return Err(Issue::schema_failure(
                format!("{} missing 'expected_result' field", location),
                Some(ticket_id),
            ));
        };

        let result = TicketResult::validate(&expected).map_err(|errors| {
            Issue::schema_failure(
                format!("{} result schema violation: {}", location, errors),
                Some(ticket_id.clone()),
            )
        })?;

        let difficulty = payload.remove("difficulty").filter(|d| !d.is_null());

        Ok((ticket_id, LabelRecord { result, difficulty }))
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetLoaderTrait for DatasetLoader {
    /// @ai:effects fs:read
    fn load_tasks(&self, path: &Path) -> Loaded<TicketTask> {
        Self::load_records(path, Self::parse_task)
    }

    /// @ai:effects fs:read
    fn load_labels(&self, path: &Path) -> Loaded<LabelRecord> {
        Self::load_records(path, Self::parse_label)
    }

    /// @ai:effects fs:read
    fn assemble(&self, tasks_path: &Path, labels_path: &Path) -> DatasetLoadResult {
        let tasks = self.load_tasks(tasks_path);
        let labels = self.load_labels(labels_path);
        join(tasks, labels)
    }
}

/// @ai:intent Parse a raw line into a JSON object
/// @ai:effects pure
fn parse_object(location: &str, raw: &str) -> Result<Map<String, Value>, Issue> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(Issue::schema_failure(
            format!("{} expected object root", location),
            None,
        )),
        Err(e) => Err(Issue::schema_failure(
            format!("{} invalid JSON ({})", location, e),
            None,
        )),
    }
}

/// @ai:intent Recover an identifier from a payload that failed validation
/// @ai:effects pure
fn candidate_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// @ai:intent Inner-join loaded tasks and labels by ticket_id
/// @ai:post examples.len() == |T ∩ L|, sorted by ticket_id
/// @ai:post issues = task issues, label issues, missing labels (sorted), orphan labels (sorted)
/// @ai:effects pure
pub fn join(tasks: Loaded<TicketTask>, labels: Loaded<LabelRecord>) -> DatasetLoadResult {
    let Loaded {
        records: mut task_map,
        issues: task_issues,
    } = tasks;
    let Loaded {
        records: mut label_map,
        issues: label_issues,
    } = labels;

    let mut issues = task_issues;
    issues.extend(label_issues);

    let task_ids: BTreeSet<String> = task_map.keys().cloned().collect();
    let label_ids: BTreeSet<String> = label_map.keys().cloned().collect();

    for ticket_id in task_ids.difference(&label_ids) {
        issues.push(Issue::join_mismatch(
            "missing expected result for ticket_id",
            Some(ticket_id.clone()),
        ));
    }

    for ticket_id in label_ids.difference(&task_ids) {
        issues.push(Issue::join_mismatch(
            "orphan expected result without matching task",
            Some(ticket_id.clone()),
        ));
    }

    let examples: Vec<Example> = task_ids
        .intersection(&label_ids)
        .filter_map(|ticket_id| {
            let task = task_map.remove(ticket_id)?;
            let label = label_map.remove(ticket_id)?;
            let difficulty = label.difficulty_str().map(str::to_string);

            Some(Example {
                task,
                gold: label.result,
                difficulty,
            })
        })
        .collect();

    tracing::info!(
        "Joined {} examples ({} tasks, {} labels, {} issues)",
        examples.len(),
        task_ids.len(),
        label_ids.len(),
        issues.len()
    );

    DatasetLoadResult { examples, issues }
}
