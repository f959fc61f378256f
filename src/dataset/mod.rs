//! @ai:module:intent Evaluation dataset loading, joining and validation
//! @ai:module:layer domain
//! @ai:module:public_api Issue, IssueType, Example, DatasetLoader, DatasetLoadResult, validate_dataset

pub mod example;
pub mod issue;
pub mod loader;
pub mod validate;

pub use example::{DatasetLoadResult, Example, LabelRecord, Loaded};
pub use issue::{Issue, IssueSeverity, IssueType};
pub use loader::{join, DatasetLoader, DatasetLoaderTrait};
pub use validate::validate_dataset;
