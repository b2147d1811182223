use std::panic::Location;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use pv_config::ConfigError;
use pv_db::DbError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Project not found: {id} {location}")]
    ProjectNotFound { id: Uuid, location: ErrorLocation },

    #[error("Task not found: {id} {location}")]
    TaskNotFound { id: Uuid, location: ErrorLocation },

    #[error("Document not found: {id} {location}")]
    DocumentNotFound { id: Uuid, location: ErrorLocation },

    #[error("Member not found: user {user_id} in project {project_id} {location}")]
    MemberNotFound {
        project_id: Uuid,
        user_id: Uuid,
        location: ErrorLocation,
    },

    #[error("Version {requested} is out of range (max {max}) {location}")]
    VersionOutOfRange {
        requested: i64,
        max: i64,
        location: ErrorLocation,
    },

    #[error("Conflict: {message} {location}")]
    Conflict {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ServiceError {
    #[track_caller]
    pub fn project_not_found(id: Uuid) -> Self {
        Self::ProjectNotFound {
            id,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn task_not_found(id: Uuid) -> Self {
        Self::TaskNotFound {
            id,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn document_not_found(id: Uuid) -> Self {
        Self::DocumentNotFound {
            id,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn member_not_found(project_id: Uuid, user_id: Uuid) -> Self {
        Self::MemberNotFound {
            project_id,
            user_id,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn version_out_of_range(requested: i64, max: i64) -> Self {
        Self::VersionOutOfRange {
            requested,
            max,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = StdResult<T, ServiceError>;
