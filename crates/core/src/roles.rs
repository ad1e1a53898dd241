//! The three fixed roles and the capability predicates built on them.
//!
//! Role strings must match the values stored in the `users.role` column
//! (seeded in `create_users` migration).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;
use crate::visibility::ProjectScope;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_PROJECT_MANAGER: &str = "project_manager";
pub const ROLE_TEAM_MEMBER: &str = "team_member";

/// All valid role values, in privilege order.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_PROJECT_MANAGER, ROLE_TEAM_MEMBER];

/// A user's role. Immutable for the duration of a request; never cached
/// across requests (each request re-derives it from its auth token).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    ProjectManager,
    TeamMember,
}

impl Role {
    /// Return the database string for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::ProjectManager => ROLE_PROJECT_MANAGER,
            Role::TeamMember => ROLE_TEAM_MEMBER,
        }
    }

    /// Parse a database role string.
    pub fn parse(s: &str) -> Result<Role, CoreError> {
        match s {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_PROJECT_MANAGER => Ok(Role::ProjectManager),
            ROLE_TEAM_MEMBER => Ok(Role::TeamMember),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The acting user, passed explicitly into every core operation.
///
/// Core code never reaches into ambient session or global auth state; the
/// boundary layer builds an `Actor` from its token claims per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: DbId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: DbId, role: Role) -> Self {
        Actor { id, role }
    }
}

/// True iff the actor may create and edit projects (Admin or ProjectManager).
pub fn can_manage_projects(actor: &Actor) -> bool {
    matches!(actor.role, Role::Admin | Role::ProjectManager)
}

/// True iff the actor may delete projects (Admin only).
pub fn can_delete_projects(actor: &Actor) -> bool {
    actor.role == Role::Admin
}

/// True iff the actor is the project's leader.
pub fn is_project_leader(actor: &Actor, project: &ProjectScope) -> bool {
    project.leader_id == actor.id
}

/// True iff the user is leader, creator, or member of the project.
///
/// These are independent relations; one user may hold all three at once.
/// Takes a bare id rather than an [`Actor`] so callers can also ask this
/// about a user other than the one acting, such as a proposed assignee.
pub fn is_project_participant(user_id: DbId, project: &ProjectScope) -> bool {
    project.leader_id == user_id
        || project.created_by == user_id
        || project.member_ids.contains(&user_id)
}
