//! @ai:module:intent Dataset validation against the task and result schemas
//! @ai:module:layer application
//! @ai:module:public_api validate_dataset
//! @ai:module:stateless true

use crate::dataset::example::{LabelRecord, Loaded};
use crate::dataset::loader::{join, DatasetLoader, DatasetLoaderTrait};
use crate::schema::Difficulty;
use std::path::Path;

/// @ai:intent Validate task and/or label files, returning one message per problem
/// @ai:post empty result means the given files load and join cleanly
/// @ai:effects fs:read
pub fn validate_dataset(tasks_path: Option<&Path>, labels_path: Option<&Path>) -> Vec<String> {
    let loader = DatasetLoader::new();

    let tasks = tasks_path.map(|path| loader.load_tasks(path));
    let labels = labels_path.map(|path| loader.load_labels(path));

    let difficulty_errors = labels.as_ref().map(check_difficulties).unwrap_or_default();

    let issues = match (tasks, labels) {
        (Some(tasks), Some(labels)) => join(tasks, labels).issues,
        (Some(tasks), None) => tasks.issues,
        (None, Some(labels)) => labels.issues,
        (None, None) => Vec::new(),
    };

    let mut errors: Vec<String> = issues.iter().map(|issue| issue.to_string()).collect();
    errors.extend(difficulty_errors);

    if errors.is_empty() {
        tracing::info!("Dataset validation passed");
    } else {
        tracing::warn!("Dataset validation found {} problems", errors.len());
    }

    errors
}

/// @ai:intent Check every label's difficulty tag against the closed set
/// @ai:effects pure
fn check_difficulties(labels: &Loaded<LabelRecord>) -> Vec<String> {
    let allowed: Vec<&str> = Difficulty::ALL.iter().map(|d| d.as_str()).collect();

    labels
        .records
        .iter()
        .filter_map(|(ticket_id, record)| {
            let raw = record.difficulty.as_ref()?;
            let valid = raw
                .as_str()
                .map(|d| d.parse::<Difficulty>().is_ok())
                .unwrap_or(false);

            (!valid).then(|| {
                format!(
                    "{}: difficulty must be one of {} (got {})",
                    ticket_id,
                    allowed.join(", "),
                    raw
                )
            })
        })
        .collect()
}
