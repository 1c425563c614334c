//! Archived task requests.

use taskboard_core::TaskboardResult;
use taskboard_domain::{ArchiveScope, ArchivedTasksState, Role, Task, TaskId};

use crate::api::Services;

pub async fn fetch_archived(services: &Services) -> TaskboardResult<Vec<Task>> {
    services.tasks.archived_tasks().await
}

pub async fn restore_task(services: &Services, id: TaskId) -> TaskboardResult<()> {
    services.tasks.restore_task(id).await
}

pub struct ArchivedController {
    services: Services,
    pub state: ArchivedTasksState,
}

impl ArchivedController {
    /// Refused for non-admins before anything is fetched.
    pub async fn open(services: Services, role: Role, scope: ArchiveScope) -> TaskboardResult<Self> {
        let mut controller = Self {
            state: ArchivedTasksState::open(role, scope)?,
            services,
        };
        if let Err(err) = controller.reload().await {
            tracing::warn!(error = %err, "Archived tasks unavailable");
        }
        Ok(controller)
    }

    pub async fn reload(&mut self) -> TaskboardResult<()> {
        match fetch_archived(&self.services).await {
            Ok(tasks) => {
                self.state.loaded(tasks);
                Ok(())
            }
            Err(err) => {
                self.state.load_failed(&err);
                Err(err)
            }
        }
    }

    /// Restore a task, then re-fetch the archived list.
    pub async fn restore(&mut self, id: TaskId) -> TaskboardResult<()> {
        let id = self.state.request_restore(id)?;
        if let Err(err) = restore_task(&self.services, id).await {
            self.state.restore_failed(&err);
            return Err(err);
        }
        tracing::info!(task_id = id, "Restored task");
        self.state.restored(id);
        if let Err(err) = self.reload().await {
            tracing::warn!(error = %err, "Re-fetching archived tasks failed");
        }
        Ok(())
    }
}
