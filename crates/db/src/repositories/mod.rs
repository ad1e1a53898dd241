//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-statement writes
//! (member sync, delete cascades, leader replacement) run inside a single
//! transaction.

pub mod comment_repo;
pub mod membership_repo;
pub mod project_repo;
pub mod scope_repo;
pub mod task_repo;
pub mod user_repo;

pub use comment_repo::CommentRepo;
pub use membership_repo::MembershipRepo;
pub use project_repo::ProjectRepo;
pub use scope_repo::ScopeRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
