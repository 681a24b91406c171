//! Access rules for documents.
//!
//! Every decision is a pure function of the document owner, the
//! requester, and the grants on the document. Only active grants held by
//! the requester count. When several apply, the most permissive wins.
//! Permission levels nest (`delete` implies `edit` implies `view`), so a
//! `delete` grant also allows viewing.

use sehetak_core::types::UserId;
use sehetak_entity::{AccessLevel, PermissionLevel, SharingGrant};

/// The most permissive active grant `requester` holds among `grants`.
pub fn best_grant(requester: UserId, grants: &[SharingGrant]) -> Option<PermissionLevel> {
    grants
        .iter()
        .filter(|g| g.is_active && g.shared_with == requester)
        .map(|g| g.permission)
        .max()
}

/// How `requester` reaches a document owned by `owner`, if at all.
pub fn effective_access(
    owner: UserId,
    requester: UserId,
    grants: &[SharingGrant],
) -> Option<AccessLevel> {
    if owner == requester {
        return Some(AccessLevel::Owner);
    }
    best_grant(requester, grants).map(AccessLevel::Shared)
}

/// Turn a store row's owner and best grant into a listing access level.
pub fn listing_access(
    owner: UserId,
    viewer: UserId,
    best: Option<PermissionLevel>,
) -> Option<AccessLevel> {
    if owner == viewer {
        Some(AccessLevel::Owner)
    } else {
        best.map(AccessLevel::Shared)
    }
}

fn allows(owner: UserId, requester: UserId, grants: &[SharingGrant], need: PermissionLevel) -> bool {
    effective_access(owner, requester, grants).is_some_and(|level| level.allows(need))
}

/// Owner, or any active grant.
pub fn can_view(owner: UserId, requester: UserId, grants: &[SharingGrant]) -> bool {
    allows(owner, requester, grants, PermissionLevel::View)
}

/// Owner, or an active `edit` or `delete` grant.
pub fn can_edit(owner: UserId, requester: UserId, grants: &[SharingGrant]) -> bool {
    allows(owner, requester, grants, PermissionLevel::Edit)
}

/// Owner, or an active `delete` grant.
pub fn can_delete(owner: UserId, requester: UserId, grants: &[SharingGrant]) -> bool {
    allows(owner, requester, grants, PermissionLevel::Delete)
}
