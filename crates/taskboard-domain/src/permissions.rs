//! Client-side role checks.
//!
//! The server remains the authority. These checks run at every action
//! boundary so that a non-admin reaching a hidden control gets a visible
//! refusal before any request is made.

use taskboard_core::{TaskboardError, TaskboardResult};

use crate::user::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedAction {
    CreateTask,
    EditTask,
    SaveTask,
    MoveTask,
    ArchiveTask,
    RestoreTask,
    ViewArchived,
    CreateBoard,
    DeleteBoard,
}

impl GuardedAction {
    pub fn denial_message(&self) -> &'static str {
        match self {
            Self::CreateTask => "You do not have permission to create new tasks.",
            Self::EditTask => "You do not have permission to edit tasks.",
            Self::SaveTask => "You do not have permission to modify tasks.",
            Self::MoveTask => "You do not have permission to move tasks.",
            Self::ArchiveTask => "You do not have permission to archive tasks.",
            Self::RestoreTask => "You do not have permission to restore tasks.",
            Self::ViewArchived => "You do not have permission to view archived tasks.",
            Self::CreateBoard => "You do not have permission to create boards.",
            Self::DeleteBoard => "You do not have permission to delete boards.",
        }
    }
}

pub fn is_allowed(role: Role, _action: GuardedAction) -> bool {
    role.is_admin()
}

pub fn authorize(role: Role, action: GuardedAction) -> TaskboardResult<()> {
    if is_allowed(role, action) {
        Ok(())
    } else {
        tracing::warn!(?action, %role, "Rejected action for role");
        Err(TaskboardError::permission_denied(action.denial_message()))
    }
}
