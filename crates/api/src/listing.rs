//! Client-side filtering and pagination for directory and task listings.

use {chrono::NaiveDate, taskdesk_common::Role};

use crate::types::{DirectoryUser, Task};

/// One page of a filtered listing. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Slice `items` into page `page` of `per_page` rows.
///
/// `page` is clamped into `1..=total_pages`; an empty listing has zero pages
/// and reports page 1.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));
    let items = items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();
    Page {
        items,
        page,
        total_pages,
        total_items,
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Case-insensitive substring of name or email.
    pub search: Option<String>,
    pub role: Option<Role>,
    pub department: Option<String>,
}

impl UserFilter {
    pub fn matches(&self, user: &DirectoryUser) -> bool {
        let search = self
            .search
            .as_deref()
            .is_none_or(|s| contains_ci(&user.name, s) || contains_ci(&user.email, s));
        let role = self.role.as_ref().is_none_or(|r| *r == user.role);
        let department = self
            .department
            .as_deref()
            .is_none_or(|d| user.department.as_deref() == Some(d));
        search && role && department
    }

    pub fn apply(&self, users: Vec<DirectoryUser>) -> Vec<DirectoryUser> {
        users.into_iter().filter(|u| self.matches(u)).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Case-insensitive substring of the title or any assignee label.
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    /// Calendar day the task was created on.
    pub created_on: Option<NaiveDate>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        let search = self
            .search
            .as_deref()
            .is_none_or(|s| contains_ci(&task.title, s) || contains_ci(&task.assignee_labels(), s));
        let status = self
            .status
            .as_deref()
            .is_none_or(|s| s.eq_ignore_ascii_case(&task.status));
        let priority = self
            .priority
            .as_deref()
            .is_none_or(|p| p.eq_ignore_ascii_case(&task.priority));
        let created = self
            .created_on
            .is_none_or(|day| created_day(task) == Some(day));
        search && status && priority && created
    }

    pub fn apply(&self, tasks: Vec<Task>) -> Vec<Task> {
        tasks.into_iter().filter(|t| self.matches(t)).collect()
    }
}

/// Calendar day of an ISO-8601 `created_at` value.
fn created_day(task: &Task) -> Option<NaiveDate> {
    let raw = task.created_at.as_deref()?;
    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
}
