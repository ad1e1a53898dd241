//! The visibility scoper: which projects and tasks an actor may read.
//!
//! Every read path (listing, single-record fetch, dashboard counting) must
//! go through [`project_visible`] / [`task_visible`] rather than re-derive
//! the filter. The predicates evaluate a relational snapshot
//! ([`ProjectScope`]) loaded by the persistence layer, so the rule lives in
//! exactly one place.
//!
//! Scoping is monotonic: Admin sees everything, a ProjectManager sees the
//! projects they lead, a TeamMember sees at least the projects holding
//! their assigned tasks.

use crate::error::CoreError;
use crate::roles::{Actor, Role};
use crate::types::DbId;

/// Relational snapshot of one project, sufficient to evaluate visibility
/// for any actor without further queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectScope {
    pub id: DbId,
    pub leader_id: DbId,
    pub created_by: DbId,
    /// Users attached through the `project_members` join table.
    pub member_ids: Vec<DbId>,
    /// Distinct assignees across the project's tasks.
    pub assignee_ids: Vec<DbId>,
}

/// Relational snapshot of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskScope {
    pub id: DbId,
    pub project_id: DbId,
    pub assignee_id: Option<DbId>,
}

/// How far a team member's membership extends over a project's tasks.
///
/// `ProjectWide` is canonical: a general project member sees every task in
/// that project, not only their own. `AssignedOnly` is the narrower
/// historical policy, kept selectable so swapping it touches no call sites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MemberTaskPolicy {
    #[default]
    ProjectWide,
    AssignedOnly,
}

impl MemberTaskPolicy {
    /// Parse a configuration string (`project_wide` / `assigned_only`).
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "project_wide" => Ok(MemberTaskPolicy::ProjectWide),
            "assigned_only" => Ok(MemberTaskPolicy::AssignedOnly),
            other => Err(CoreError::Validation(format!(
                "Invalid member task policy '{other}'. Must be 'project_wide' or 'assigned_only'"
            ))),
        }
    }
}

/// True iff the actor may read the project.
///
/// - Admin: everything.
/// - ProjectManager: projects they lead.
/// - TeamMember: projects they are a member of, or that contain at least
///   one task assigned to them.
pub fn project_visible(actor: &Actor, project: &ProjectScope) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::ProjectManager => project.leader_id == actor.id,
        Role::TeamMember => {
            project.member_ids.contains(&actor.id) || project.assignee_ids.contains(&actor.id)
        }
    }
}

/// True iff the actor may read the task.
///
/// A task is never visible when its project is not: the assignee clause in
/// [`project_visible`] guarantees the implication holds for assignees too.
pub fn task_visible(
    actor: &Actor,
    task: &TaskScope,
    project: &ProjectScope,
    policy: MemberTaskPolicy,
) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::ProjectManager => project.leader_id == actor.id,
        Role::TeamMember => {
            if task.assignee_id == Some(actor.id) {
                return true;
            }
            match policy {
                MemberTaskPolicy::ProjectWide => project.member_ids.contains(&actor.id),
                MemberTaskPolicy::AssignedOnly => false,
            }
        }
    }
}

/// Filter a scope collection down to the actor's visible subset.
pub fn visible_projects<'a, I>(actor: &Actor, scopes: I) -> Vec<&'a ProjectScope>
where
    I: IntoIterator<Item = &'a ProjectScope>,
{
    scopes
        .into_iter()
        .filter(|scope| project_visible(actor, scope))
        .collect()
}
