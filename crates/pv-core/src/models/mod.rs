pub mod change_action;
pub mod change_record;
pub mod member_role;
pub mod member_status;
pub mod project;
pub mod project_document;
pub mod project_member;
pub mod project_status;
pub mod task;
pub mod task_status;
