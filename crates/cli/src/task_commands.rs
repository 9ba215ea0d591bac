use {
    anyhow::Result,
    chrono::NaiveDate,
    clap::Subcommand,
    taskdesk_api::{NewTask, TaskFilter, TaskUpdate, paginate},
    taskdesk_config::TaskdeskConfig,
    taskdesk_routing::Route,
};

use crate::{app::App, output};

#[derive(Subcommand)]
pub enum TaskAction {
    /// List tasks visible to you.
    List {
        /// Match part of a title or an assignee's name.
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// Only tasks created on this day (YYYY-MM-DD).
        #[arg(long)]
        created_on: Option<NaiveDate>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Show {
        id: i64,
    },
    /// Assign a new task.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Assignee email; repeat for several.
        #[arg(long = "assignee", required = true)]
        assignees: Vec<String>,
        #[arg(long, default_value = "medium")]
        priority: String,
        #[arg(long)]
        due_date: Option<String>,
        #[arg(long)]
        reminder1: Option<String>,
        #[arg(long)]
        reminder2: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        due_date: Option<String>,
        /// Follow-up comment recorded with the change.
        #[arg(long)]
        comment: Option<String>,
    },
    Delete {
        id: i64,
    },
    /// Recent activity across your tasks.
    History,
    /// Follow-up comments, for one task or all of them.
    Comments {
        id: Option<i64>,
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 10)]
        page_size: u64,
    },
}

pub async fn handle_tasks(config: TaskdeskConfig, action: TaskAction) -> Result<()> {
    let app = App::connect(config).await?;
    let route = match action {
        TaskAction::Create { .. } => Route::AdminCreateTask,
        _ => Route::AdminTasks,
    };
    app.require(route)?;

    match action {
        TaskAction::List {
            search,
            status,
            priority,
            created_on,
            page,
        } => {
            let filter = TaskFilter {
                search,
                status,
                priority,
                created_on,
            };
            let tasks = filter.apply(app.client.load_tasks().await);
            let page = paginate(tasks, page, app.config.ui.page_size);
            output::print_table(output::tasks_table(&page.items));
            output::page_footer(&page);
        },
        TaskAction::Show { id } => {
            let task = app.client.get_task(id).await?;
            println!("#{} {}", task.id, task.title);
            println!("  status:    {}", task.status);
            println!("  priority:  {}", task.priority);
            println!("  assignees: {}", task.assignee_labels());
            if !task.department.is_empty() {
                println!("  department: {}", task.department.join(", "));
            }
            if let Some(due) = &task.due_date {
                println!("  due:       {due}");
            }
            if let Some(by) = &task.created_by {
                println!("  created by: {by}");
            }
            if !task.description.is_empty() {
                println!("\n{}", task.description);
            }
        },
        TaskAction::Create {
            title,
            description,
            assignees,
            priority,
            due_date,
            reminder1,
            reminder2,
        } => {
            let task = app
                .client
                .create_task(&NewTask {
                    title,
                    description,
                    assignee: assignees,
                    priority,
                    due_date,
                    reminder1,
                    reminder2,
                })
                .await?;
            println!("Created task {} ({})", task.id, task.title);
        },
        TaskAction::Update {
            id,
            title,
            description,
            status,
            priority,
            due_date,
            comment,
        } => {
            let task = app
                .client
                .update_task(id, &TaskUpdate {
                    title,
                    description,
                    assignee: None,
                    status,
                    priority,
                    due_date,
                    follow_comment: comment,
                })
                .await?;
            println!("Updated task {} ({})", task.id, task.status);
        },
        TaskAction::Delete { id } => {
            app.client.delete_task(id).await?;
            println!("Deleted task {id}");
        },
        TaskAction::History => {
            let history = app.client.task_history().await?;
            for entry in history.activities.iter().take(app.config.ui.page_size * 4) {
                println!(
                    "{}  {}  {}",
                    entry.timestamp.as_deref().unwrap_or("-"),
                    entry.performed_by.as_deref().unwrap_or("-"),
                    entry.action
                );
            }
            if !history.follow_comments.is_empty() {
                println!();
                output::print_table(output::comments_table(&history.follow_comments));
            }
        },
        TaskAction::Comments {
            id,
            page,
            page_size,
        } => {
            let comments = match id {
                Some(id) => app.client.task_comments(id).await?,
                None => app.client.all_comments(page, page_size).await?,
            };
            output::print_table(output::comments_table(&comments.follow_comments));
            if let Some(p) = comments.pagination {
                println!("page {} of {} ({} total)", p.page, p.pages, p.total);
            }
        },
    }
    Ok(())
}
