//! Authorization guard
//!
//! One rule set shared by every lifecycle and by the attachment
//! registry: admins see and touch everything; customers only their own
//! resources, and only while the resource is still open for owner
//! edits. Status changes through the generic status-set operation are
//! admin-only; owners act through the named lifecycle actions (cancel,
//! request revision, reject, convert).

use shared::error::{AppError, AppResult};
use shared::models::Actor;

pub fn can_view(actor: &Actor, owner_user_id: i64) -> bool {
    actor.is_admin() || actor.owns(owner_user_id)
}

/// `locked_for_owner` is the per-kind "no more owner edits" condition:
/// terminal for orders, anything past PENDING for quotes.
pub fn can_mutate(actor: &Actor, owner_user_id: i64, locked_for_owner: bool) -> bool {
    if actor.is_admin() {
        return true;
    }
    actor.owns(owner_user_id) && !locked_for_owner
}

pub fn can_change_status(actor: &Actor) -> bool {
    actor.is_admin()
}

pub fn ensure_can_view(actor: &Actor, owner_user_id: i64) -> AppResult<()> {
    if can_view(actor, owner_user_id) {
        Ok(())
    } else {
        Err(AppError::forbidden("Not allowed to view this resource"))
    }
}

pub fn ensure_can_mutate(
    actor: &Actor,
    owner_user_id: i64,
    locked_for_owner: bool,
) -> AppResult<()> {
    if can_mutate(actor, owner_user_id, locked_for_owner) {
        Ok(())
    } else {
        Err(AppError::forbidden("Not allowed to modify this resource"))
    }
}

pub fn ensure_can_change_status(actor: &Actor) -> AppResult<()> {
    if can_change_status(actor) {
        Ok(())
    } else {
        Err(AppError::forbidden("Only admins can change status directly"))
    }
}

pub fn ensure_admin(actor: &Actor) -> AppResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden("Admin role required"))
    }
}
