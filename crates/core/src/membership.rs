//! Membership rules: who may be attached to a project, who may lead it,
//! and the set arithmetic behind `sync_members`.
//!
//! The repository applies the computed diff in one transaction; this module
//! only decides what the diff is, keeping retained members untouched so
//! their original attachment timestamps survive a sync.

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// Validate that every prospective member holds the TeamMember role.
///
/// Membership is restricted to Team Members; leadership is a separate,
/// single-valued relation and is never represented as a membership row.
pub fn validate_member_roles(targets: &[(DbId, Role)]) -> Result<(), CoreError> {
    for (user_id, role) in targets {
        if *role != Role::TeamMember {
            return Err(CoreError::InvalidMember(format!(
                "User {user_id} has role '{role}'; project members must have role '{}'",
                Role::TeamMember
            )));
        }
    }
    Ok(())
}

/// Validate that a prospective leader holds the ProjectManager role.
pub fn validate_leader_role(user_id: DbId, role: Role) -> Result<(), CoreError> {
    if role == Role::ProjectManager {
        Ok(())
    } else {
        Err(CoreError::InvalidLeader(format!(
            "User {user_id} has role '{role}'; a project leader must have role '{}'",
            Role::ProjectManager
        )))
    }
}

/// The additions and removals that turn `current` into `desired`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDiff {
    pub to_add: Vec<DbId>,
    pub to_remove: Vec<DbId>,
}

impl MemberDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Compute the sync diff. Duplicates in `desired` are ignored; members
/// present in both sets are left untouched.
pub fn sync_diff(current: &[DbId], desired: &[DbId]) -> MemberDiff {
    let mut to_add: Vec<DbId> = desired
        .iter()
        .copied()
        .filter(|id| !current.contains(id))
        .collect();
    to_add.dedup();
    // Dedup only removes consecutive repeats; sort first for arbitrary input.
    to_add.sort_unstable();
    to_add.dedup();

    let mut to_remove: Vec<DbId> = current
        .iter()
        .copied()
        .filter(|id| !desired.contains(id))
        .collect();
    to_remove.sort_unstable();
    to_remove.dedup();

    MemberDiff { to_add, to_remove }
}
