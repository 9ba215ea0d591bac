use {
    anyhow::{Result, bail},
    taskdesk_config::TaskdeskConfig,
    taskdesk_routing::{Navigation, Route},
    tracing::warn,
};

use crate::{app::App, output};

/// Print where `path` leads for the current session, following in-client
/// redirects once.
pub async fn open_path(config: TaskdeskConfig, path: &str, no_browser: bool) -> Result<()> {
    let app = App::connect(config).await?;

    let mut nav = app.navigate(path);
    if let Navigation::Redirect(route) = nav {
        println!("{path} -> {route}");
        nav = app.navigate(route.path());
    }

    match nav {
        Navigation::Render(route) => println!("render {route}"),
        Navigation::Redirect(route) => println!("redirect {route}"),
        Navigation::Wait => println!("loading"),
        Navigation::External(url) => {
            println!("Redirecting to admin interface: {url}");
            if !no_browser && let Err(e) = open::that(&url) {
                warn!(url = %url, error = %e, "could not launch a browser");
            }
        },
        Navigation::NotFound(p) => bail!("no route matches {p}"),
    }
    Ok(())
}

/// Home dashboard: task counts plus the most recent tasks.
pub async fn dashboard(config: TaskdeskConfig) -> Result<()> {
    let app = App::connect(config).await?;
    let home = app.home()?;
    let user = app.require(home)?;

    let stats = app.client.dashboard_stats().await?;
    println!("{} ({})", user.display_name(), user.role.label());
    println!(
        "total: {}  completed: {}  ongoing: {}",
        stats.total_task, stats.completed_task, stats.ongoing_task
    );

    if home == Route::HodDashboard || home == Route::AdminDashboard {
        let mut tasks = app.client.load_tasks().await;
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tasks.truncate(app.config.ui.page_size);
        if !tasks.is_empty() {
            println!();
            output::print_table(output::tasks_table(&tasks));
        }
    }
    Ok(())
}
