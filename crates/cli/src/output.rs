use {
    comfy_table::{Cell, Table},
    taskdesk_api::{DirectoryUser, FollowComment, Page, Task},
};

pub fn print_table(table: Table) {
    println!("{table}");
}

pub fn users_table(users: &[DirectoryUser]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Email", "Role", "Department"]);
    for user in users {
        table.add_row(vec![
            Cell::new(user.id),
            Cell::new(&user.name),
            Cell::new(&user.email),
            Cell::new(user.role.label()),
            Cell::new(user.department.as_deref().unwrap_or("-")),
        ]);
    }
    table
}

pub fn tasks_table(tasks: &[Task]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "ID", "Title", "Assignees", "Status", "Priority", "Due", "Created",
    ]);
    for task in tasks {
        table.add_row(vec![
            Cell::new(task.id),
            Cell::new(&task.title),
            Cell::new(task.assignee_labels()),
            Cell::new(&task.status),
            Cell::new(&task.priority),
            Cell::new(day(task.due_date.as_deref())),
            Cell::new(day(task.created_at.as_deref())),
        ]);
    }
    table
}

pub fn comments_table(comments: &[FollowComment]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Task", "Comment", "By", "When"]);
    for c in comments {
        let task = c
            .task_title
            .clone()
            .unwrap_or_else(|| format!("#{}", c.task_id));
        let by = match &c.performed_by_role {
            Some(role) => format!("{} ({})", c.performed_by, role.label()),
            None => c.performed_by.clone(),
        };
        table.add_row(vec![
            Cell::new(task),
            Cell::new(&c.comment),
            Cell::new(by),
            Cell::new(c.timestamp.as_deref().unwrap_or("-")),
        ]);
    }
    table
}

pub fn page_footer<T>(page: &Page<T>) {
    if page.total_pages > 1 {
        println!(
            "page {} of {} ({} total)",
            page.page, page.total_pages, page.total_items
        );
    } else {
        println!("{} total", page.total_items);
    }
}

/// Date part of an ISO-8601 timestamp.
fn day(raw: Option<&str>) -> &str {
    match raw {
        Some(s) => s.get(..10).unwrap_or(s),
        None => "-",
    }
}
