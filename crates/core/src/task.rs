//! Task records and identifiers.

use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique task identifier.
///
/// Random UUIDs rather than timestamps: identifier allocation must never
/// collide within the store's namespace, including under concurrent creates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Allocate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form.
    pub fn parse(input: &str) -> Result<Self> {
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|_| Error::InvalidTaskId(input.to_string()))
    }

    /// Primary-store key for this task's record.
    pub fn record_key(&self) -> String {
        format!("task:{}", self.0)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A task record.
///
/// Canonical encoding is `{id, text, done, lat?, lng?}`; the lat/lng pair is
/// flattened out of [`GeoPoint`] on the wire and absent when the task has no
/// position. Decoding rejects a record carrying only one of the two.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TaskEncoding", into = "TaskEncoding")]
pub struct Task {
    /// Unique identifier, allocated at creation time.
    pub id: TaskId,
    /// Free-text description.
    pub text: String,
    /// Completion flag.
    pub done: bool,
    /// Optional geographic position.
    pub position: Option<GeoPoint>,
}

/// Wire/storage encoding of a task.
#[derive(Serialize, Deserialize)]
struct TaskEncoding {
    id: TaskId,
    text: String,
    done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lng: Option<f64>,
}

impl TryFrom<TaskEncoding> for Task {
    type Error = Error;

    fn try_from(enc: TaskEncoding) -> Result<Self> {
        let position = GeoPoint::from_parts(enc.lat, enc.lng)?;
        Ok(Self {
            id: enc.id,
            text: enc.text,
            done: enc.done,
            position,
        })
    }
}

impl From<Task> for TaskEncoding {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            text: task.text,
            done: task.done,
            lat: task.position.map(|p| p.lat),
            lng: task.position.map(|p| p.lng),
        }
    }
}
