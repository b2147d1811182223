pub mod diff;
pub mod error;
pub mod history;
pub mod models;

pub use diff::{FieldChange, changes_to_value, diff_states};
pub use error::{CoreError, Result};
pub use history::{RELATIONAL_FIELDS, VersionEntry, replay, version_entries};
pub use models::change_action::ChangeAction;
pub use models::change_record::ChangeRecord;
pub use models::member_role::MemberRole;
pub use models::member_status::MemberStatus;
pub use models::project::Project;
pub use models::project_document::ProjectDocument;
pub use models::project_member::ProjectMember;
pub use models::project_status::ProjectStatus;
pub use models::task::Task;
pub use models::task_status::TaskStatus;

#[cfg(test)]
mod tests;
