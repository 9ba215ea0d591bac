use {
    anyhow::Result,
    clap::Subcommand,
    secrecy::Secret,
    taskdesk_api::{NewUser, UserFilter, UserUpdate, paginate},
    taskdesk_common::Role,
    taskdesk_config::TaskdeskConfig,
    taskdesk_routing::Route,
};

use crate::{app::App, output};

#[derive(Subcommand)]
pub enum UserAction {
    /// List the user directory.
    List {
        /// Match part of a name or email.
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Add a user. Faculty accounts do not need a password.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: Role,
        #[arg(long)]
        department: Option<String>,
        #[arg(long, env = "TASKDESK_NEW_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Change a user's details.
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        department: Option<String>,
    },
    Delete {
        id: i64,
    },
    /// Set a new password for your own account.
    ResetPassword {
        id: i64,
        /// Prompted for when omitted.
        #[arg(long)]
        password: Option<String>,
    },
}

pub async fn handle_users(config: TaskdeskConfig, action: UserAction) -> Result<()> {
    let app = App::connect(config).await?;

    // Password resets live on the dashboard, every other action on the
    // user directory page.
    let route = match action {
        UserAction::ResetPassword { .. } => app.home()?,
        _ => Route::AdminUsers,
    };
    app.require(route)?;

    match action {
        UserAction::List {
            search,
            role,
            department,
            page,
        } => {
            let filter = UserFilter {
                search,
                role,
                department,
            };
            let users = filter.apply(app.client.load_users().await);
            let page = paginate(users, page, app.config.ui.page_size);
            output::print_table(output::users_table(&page.items));
            output::page_footer(&page);
        },
        UserAction::Create {
            name,
            email,
            role,
            department,
            password,
        } => {
            let user = app
                .client
                .create_user(&NewUser {
                    name,
                    email,
                    role,
                    department,
                    password: password.map(Secret::new),
                })
                .await?;
            println!("Created user {} ({})", user.id, user.email);
        },
        UserAction::Update {
            id,
            name,
            email,
            role,
            department,
        } => {
            let user = app
                .client
                .update_user(id, &UserUpdate {
                    name,
                    email,
                    role,
                    department,
                })
                .await?;
            println!("Updated user {} ({})", user.id, user.email);
        },
        UserAction::Delete { id } => {
            app.client.delete_user(id).await?;
            println!("Deleted user {id}");
        },
        UserAction::ResetPassword { id, password } => {
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("New password: ")?,
            };
            let reply = app
                .client
                .reset_password(id, &Secret::new(password))
                .await?;
            if reply.message.is_empty() {
                println!("Password updated.");
            } else {
                println!("{}", reply.message);
            }
        },
    }
    Ok(())
}
