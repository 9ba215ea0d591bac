use tracing::{info, warn};

use crate::{
    ApiClient, Result, paths,
    types::{CommentPage, DashboardStats, NewTask, Task, TaskHistory, TaskUpdate, TasksEnvelope},
};

impl ApiClient {
    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.get(paths::tasks::DASHBOARD).await
    }

    /// Tasks visible to the current user; the server scopes by role.
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let envelope: TasksEnvelope = self.get(paths::tasks::ALL).await?;
        Ok(envelope.tasks)
    }

    /// Like [`list_tasks`](Self::list_tasks), degrading to an empty list.
    pub async fn load_tasks(&self) -> Vec<Task> {
        self.list_tasks().await.unwrap_or_else(|e| {
            warn!(error = %e, "failed to load tasks");
            Vec::new()
        })
    }

    pub async fn get_task(&self, id: i64) -> Result<Task> {
        self.get(&paths::tasks::detail(id)).await
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<Task> {
        task.validate()?;
        info!(title = %task.title, assignees = task.assignee.len(), "creating task");
        self.post(paths::tasks::CREATE, task).await
    }

    pub async fn update_task(&self, id: i64, update: &TaskUpdate) -> Result<Task> {
        info!(id, "updating task");
        self.put(&paths::tasks::detail(id), update).await
    }

    pub async fn delete_task(&self, id: i64) -> Result<()> {
        info!(id, "deleting task");
        self.delete(&paths::tasks::detail(id)).await
    }

    pub async fn task_history(&self) -> Result<TaskHistory> {
        self.get(paths::tasks::HISTORY).await
    }

    /// Follow-up comments across all visible tasks, paginated server-side.
    pub async fn all_comments(&self, page: u64, page_size: u64) -> Result<CommentPage> {
        self.get_query(paths::tasks::COMMENTS, &[
            ("page", page.max(1)),
            ("page_size", page_size.max(1)),
        ])
        .await
    }

    pub async fn task_comments(&self, id: i64) -> Result<CommentPage> {
        self.get(&paths::tasks::comments(id)).await
    }
}
