//! Authorization policy.
//!
//! Pure, stateless decisions: given the acting user (or anonymity), the
//! attempted action, and a snapshot of the relevant resource fields, return
//! allow or deny with a reason tag. Rules are evaluated in priority order
//! and the first match wins:
//!
//! 1. An unauthenticated actor attempting any protected action is denied
//!    (`unauthenticated`).
//! 2. Admins are allowed all moderation actions (user role changes, shop
//!    status changes, platform-wide reads).
//! 3. Resource-owner checks per action.
//! 4. Everything else is denied (`forbidden`).
//!
//! The policy has no side effects. Callers run it before invoking the
//! [lifecycle engine](crate::lifecycle) or touching storage.

use crate::types::{Role, TaskStatus, UserId};

/// The authenticated caller, as resolved by the identity layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Verified subject id.
    pub id: UserId,
    /// Stored platform role.
    pub role: Role,
}

impl Actor {
    /// Build an actor from a subject id and role.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    fn is(&self, other: &UserId) -> bool {
        &self.id == other
    }
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No verified identity was presented.
    Unauthenticated,
    /// The identity is verified but lacks rights for the action.
    Forbidden,
}

/// A deny decision with its reason tag.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Deny {
    #[error("authentication required")]
    Unauthenticated,
    #[error("forbidden")]
    Forbidden,
}

impl Deny {
    /// The reason tag for this denial.
    #[must_use]
    pub const fn reason(&self) -> DenyReason {
        match self {
            Self::Unauthenticated => DenyReason::Unauthenticated,
            Self::Forbidden => DenyReason::Forbidden,
        }
    }
}

/// An action paired with the resource snapshot the decision needs.
///
/// Snapshots are borrowed ids read from the store before the policy runs;
/// the policy itself never performs I/O.
#[derive(Debug, Clone)]
pub enum Action<'a> {
    /// Create a shop (the actor becomes its owner).
    CreateShop,
    /// Edit a shop's profile fields.
    UpdateShopProfile {
        /// Owner of the shop being edited.
        owner_id: &'a UserId,
    },
    /// Change a shop's moderation status.
    ModerateShop,
    /// Create, update, or delete a product under a shop.
    ManageProduct {
        /// Owner of the parent shop.
        shop_owner_id: &'a UserId,
    },
    /// Post a new community task.
    CreateTask,
    /// Take an open task (`open -> in_progress`).
    TakeTask {
        /// Creator of the task.
        creator_id: &'a UserId,
        /// Current task status.
        status: TaskStatus,
    },
    /// Mark a task completed.
    CompleteTask {
        /// Creator of the task.
        creator_id: &'a UserId,
    },
    /// Place an order against a shop/product pair.
    CreateOrder,
    /// Ask for third-party transport on an order (`pending -> transport_requested`).
    RequestTransport {
        /// Customer who placed the order.
        customer_id: &'a UserId,
    },
    /// Accept a transport request (`transport_requested -> picked_up`).
    /// Open marketplace: any authenticated actor may accept.
    AcceptTransport,
    /// Mark an order delivered (`picked_up -> delivered`).
    MarkDelivered {
        /// Owner of the shop the order was placed against.
        shop_owner_id: &'a UserId,
        /// Transporter recorded at pickup, if any.
        transport_id: Option<&'a UserId>,
    },
    /// Close out a delivered order (`delivered -> completed`).
    MarkCompleted {
        /// Customer who placed the order.
        customer_id: &'a UserId,
        /// Owner of the shop the order was placed against.
        shop_owner_id: &'a UserId,
    },
    /// List the orders placed against a shop.
    ViewShopOrders {
        /// Owner of the shop.
        owner_id: &'a UserId,
    },
    /// Read platform-wide data (stats, all users/shops/orders).
    AdminRead,
    /// Change another user's role.
    ChangeUserRole,
}

/// Decide whether `actor` may perform `action`.
///
/// `None` means the request carried no verified identity. Public reads
/// (shop/product/task listings) never consult the policy.
///
/// # Errors
///
/// Returns [`Deny::Unauthenticated`] for anonymous callers and
/// [`Deny::Forbidden`] for authenticated callers without rights.
pub fn authorize(actor: Option<&Actor>, action: &Action<'_>) -> Result<(), Deny> {
    let Some(actor) = actor else {
        return Err(Deny::Unauthenticated);
    };

    match action {
        // Any authenticated user.
        Action::CreateShop
        | Action::CreateTask
        | Action::CreateOrder
        | Action::AcceptTransport => Ok(()),

        // Owner only. Profile edits are not an admin-designated action;
        // moderation goes through ModerateShop.
        Action::UpdateShopProfile { owner_id } => allow_if(actor.is(owner_id)),

        // Admin only.
        Action::ModerateShop | Action::AdminRead | Action::ChangeUserRole => {
            allow_if(actor.is_admin())
        }

        // Owner of the parent shop, or an admin.
        Action::ManageProduct { shop_owner_id } => {
            allow_if(actor.is(shop_owner_id) || actor.is_admin())
        }

        // Creators cannot take their own task, and only open tasks can be
        // taken. Admins get no exemption here: an admin creator still may
        // not take their own task.
        Action::TakeTask { creator_id, status } => {
            allow_if(!actor.is(creator_id) && *status == TaskStatus::Open)
        }

        // Only the creator signs off on completion.
        Action::CompleteTask { creator_id } => allow_if(actor.is(creator_id)),

        Action::RequestTransport { customer_id } => {
            allow_if(actor.is(customer_id) || actor.is_admin())
        }

        Action::MarkDelivered {
            shop_owner_id,
            transport_id,
        } => allow_if(
            transport_id.is_some_and(|t| actor.is(t))
                || actor.is(shop_owner_id)
                || actor.is_admin(),
        ),

        Action::MarkCompleted {
            customer_id,
            shop_owner_id,
        } => allow_if(actor.is(customer_id) || actor.is(shop_owner_id) || actor.is_admin()),

        Action::ViewShopOrders { owner_id } => allow_if(actor.is(owner_id) || actor.is_admin()),
    }
}

const fn allow_if(condition: bool) -> Result<(), Deny> {
    if condition { Ok(()) } else { Err(Deny::Forbidden) }
}
