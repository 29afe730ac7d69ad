//! Task and Order lifecycle state machines.
//!
//! Both machines are pure: given the current status, the requested status,
//! and the acting user, they either produce a transition record (the new
//! status plus any side-effect field to set) or reject the request as an
//! invalid transition. Callers apply the [authorization
//! policy](crate::policy) first, then persist the transition with a
//! compare-and-swap on the current status so a lost race is surfaced rather
//! than silently overwritten.
//!
//! # Task machine
//!
//! ```text
//! open ──(actor != creator)──> in_progress ──(actor == creator)──> completed
//!   └──────────────(actor == creator)─────────────────────────────────┘
//! ```
//!
//! Taking a task (`open -> in_progress`) records the actor as assignee.
//! `completed` is terminal.
//!
//! # Order machine
//!
//! ```text
//! pending -> transport_requested -> picked_up -> delivered -> completed
//! ```
//!
//! Creation may start at `pending` or `transport_requested`. Accepting a
//! transport (`transport_requested -> picked_up`) records the actor as
//! transporter.

use serde::{Deserialize, Serialize};

use crate::types::{OrderStatus, TaskStatus, UserId};

/// A rejected status-change request.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The requested transition does not exist in the state machine, or the
    /// row's status changed under the caller (lost compare-and-swap).
    #[error("invalid transition: {from} -> {to}")]
    Invalid {
        /// Current status, as a wire-format tag.
        from: &'static str,
        /// Requested status, as a wire-format tag.
        to: &'static str,
    },
}

impl TransitionError {
    fn task(from: TaskStatus, to: TaskStatus) -> Self {
        Self::Invalid {
            from: task_tag(from),
            to: task_tag(to),
        }
    }

    fn order(from: OrderStatus, to: OrderStatus) -> Self {
        Self::Invalid {
            from: order_tag(from),
            to: order_tag(to),
        }
    }
}

const fn task_tag(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Open => "open",
        TaskStatus::InProgress => "in_progress",
        TaskStatus::Completed => "completed",
    }
}

const fn order_tag(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "pending",
        OrderStatus::TransportRequested => "transport_requested",
        OrderStatus::PickedUp => "picked_up",
        OrderStatus::Delivered => "delivered",
        OrderStatus::Completed => "completed",
    }
}

/// The result of a valid task transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTransition {
    /// The status to write.
    pub status: TaskStatus,
    /// Assignee to record, set only when taking an open task.
    pub assignee_id: Option<UserId>,
}

/// Compute the task transition for a requested status change.
///
/// The assignee is set only on `open -> in_progress`, and only to the
/// transitioning actor's own id; completion leaves it untouched.
///
/// # Errors
///
/// Returns [`TransitionError::Invalid`] for any edge outside the machine,
/// including every transition out of `completed`.
pub fn task_transition(
    current: TaskStatus,
    requested: TaskStatus,
    actor_id: &UserId,
) -> Result<TaskTransition, TransitionError> {
    match (current, requested) {
        (TaskStatus::Open, TaskStatus::InProgress) => Ok(TaskTransition {
            status: TaskStatus::InProgress,
            assignee_id: Some(actor_id.clone()),
        }),
        // The creator may complete an untaken task; there is no guard
        // requiring the task to have been taken first.
        (TaskStatus::Open | TaskStatus::InProgress, TaskStatus::Completed) => Ok(TaskTransition {
            status: TaskStatus::Completed,
            assignee_id: None,
        }),
        (from, to) => Err(TransitionError::task(from, to)),
    }
}

/// The result of a valid order transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTransition {
    /// The status to write.
    pub status: OrderStatus,
    /// Transporter to record, set only when accepting a transport request.
    pub transport_id: Option<UserId>,
}

/// Compute the order transition for a requested status change.
///
/// The transporter is set only on `transport_requested -> picked_up`, and
/// only to the transitioning actor's own id.
///
/// # Errors
///
/// Returns [`TransitionError::Invalid`] for any edge outside the single
/// forward chain, including every transition out of `completed`.
pub fn order_transition(
    current: OrderStatus,
    requested: OrderStatus,
    actor_id: &UserId,
) -> Result<OrderTransition, TransitionError> {
    match (current, requested) {
        (OrderStatus::Pending, OrderStatus::TransportRequested) => Ok(OrderTransition {
            status: OrderStatus::TransportRequested,
            transport_id: None,
        }),
        (OrderStatus::TransportRequested, OrderStatus::PickedUp) => Ok(OrderTransition {
            status: OrderStatus::PickedUp,
            transport_id: Some(actor_id.clone()),
        }),
        (OrderStatus::PickedUp, OrderStatus::Delivered) => Ok(OrderTransition {
            status: OrderStatus::Delivered,
            transport_id: None,
        }),
        (OrderStatus::Delivered, OrderStatus::Completed) => Ok(OrderTransition {
            status: OrderStatus::Completed,
            transport_id: None,
        }),
        (from, to) => Err(TransitionError::order(from, to)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> UserId {
        UserId::from("user-b")
    }

    #[test]
    fn test_take_open_task_sets_assignee() {
        let t = task_transition(TaskStatus::Open, TaskStatus::InProgress, &actor())
            .expect("open -> in_progress is valid");
        assert_eq!(t.status, TaskStatus::InProgress);
        assert_eq!(t.assignee_id, Some(actor()));
    }

    #[test]
    fn test_complete_task_leaves_assignee_untouched() {
        let t = task_transition(TaskStatus::InProgress, TaskStatus::Completed, &actor())
            .expect("in_progress -> completed is valid");
        assert_eq!(t.status, TaskStatus::Completed);
        assert_eq!(t.assignee_id, None);
    }

    #[test]
    fn test_complete_untaken_task_allowed() {
        let t = task_transition(TaskStatus::Open, TaskStatus::Completed, &actor())
            .expect("open -> completed is valid");
        assert_eq!(t.status, TaskStatus::Completed);
        assert_eq!(t.assignee_id, None);
    }

    #[test]
    fn test_completed_task_is_terminal() {
        for requested in [TaskStatus::Open, TaskStatus::InProgress, TaskStatus::Completed] {
            let err = task_transition(TaskStatus::Completed, requested, &actor())
                .expect_err("completed is terminal");
            assert!(matches!(err, TransitionError::Invalid { from: "completed", .. }));
        }
    }

    #[test]
    fn test_task_cannot_reopen() {
        assert!(task_transition(TaskStatus::InProgress, TaskStatus::Open, &actor()).is_err());
        assert!(task_transition(TaskStatus::Open, TaskStatus::Open, &actor()).is_err());
    }

    #[test]
    fn test_order_forward_chain() {
        let t = order_transition(
            OrderStatus::Pending,
            OrderStatus::TransportRequested,
            &actor(),
        )
        .expect("pending -> transport_requested");
        assert_eq!(t.transport_id, None);

        let t = order_transition(
            OrderStatus::TransportRequested,
            OrderStatus::PickedUp,
            &actor(),
        )
        .expect("transport_requested -> picked_up");
        assert_eq!(t.transport_id, Some(actor()));

        let t = order_transition(OrderStatus::PickedUp, OrderStatus::Delivered, &actor())
            .expect("picked_up -> delivered");
        assert_eq!(t.transport_id, None);

        let t = order_transition(OrderStatus::Delivered, OrderStatus::Completed, &actor())
            .expect("delivered -> completed");
        assert_eq!(t.status, OrderStatus::Completed);
    }

    #[test]
    fn test_order_cannot_skip_or_rewind() {
        assert!(order_transition(OrderStatus::Pending, OrderStatus::PickedUp, &actor()).is_err());
        assert!(order_transition(OrderStatus::Pending, OrderStatus::Completed, &actor()).is_err());
        assert!(
            order_transition(OrderStatus::PickedUp, OrderStatus::TransportRequested, &actor())
                .is_err()
        );
        assert!(
            order_transition(OrderStatus::Completed, OrderStatus::Delivered, &actor()).is_err()
        );
    }

    #[test]
    fn test_error_message_names_both_states() {
        let err = order_transition(OrderStatus::Completed, OrderStatus::Pending, &actor())
            .expect_err("completed is terminal");
        assert_eq!(err.to_string(), "invalid transition: completed -> pending");
    }
}
