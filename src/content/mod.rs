//! Portfolio content schema.
//!
//! | Module     | Purpose                                             |
//! |------------|-----------------------------------------------------|
//! | `block`    | Content-block tagged union and payload structs      |
//! | `metric`   | Display metric                                      |
//! | `project`  | Index entry, detail record, typed merge             |
//! | `index`    | Ordered project index loading                       |
//! | `validate` | Static checks over an index and its detail files    |

pub mod block;
mod index;
mod metric;
mod project;
pub mod validate;

use std::path::PathBuf;

use thiserror::Error;

pub use block::{Block, BlockPayload, ContentBlock, SchemaError};
pub use index::ProjectIndex;
pub use metric::Metric;
pub use project::{BodySource, DetailRecord, HeroHook, ProjectEntry, TechnicalItem, Theme};

/// Errors loading project records.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid project index")]
    Json(#[from] serde_json::Error),

    #[error("invalid project entry `{id}`")]
    Entry {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}
