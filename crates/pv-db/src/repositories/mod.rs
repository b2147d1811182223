pub mod change_record_repository;
pub mod document_repository;
pub mod project_member_repository;
pub mod project_repository;
pub mod task_repository;
