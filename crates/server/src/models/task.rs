//! Community task model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kasilink_core::{Price, TaskId, TaskStatus, UserId};

/// A community task (delivery, pickup, errand) posted for others to take.
///
/// The assignee is recorded when the task is taken and is never set to the
/// creator's own id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub creator_id: UserId,
    pub title: String,
    pub description: String,
    pub budget: Price,
    pub location: String,
    pub status: TaskStatus,
    pub assignee_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Fields for posting a task. The creator is always the authenticated
/// caller, and the task starts open and unassigned.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub creator_id: UserId,
    pub title: String,
    pub description: String,
    pub budget: Price,
    pub location: String,
}
