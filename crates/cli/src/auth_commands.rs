use {
    anyhow::{Result, bail},
    clap::Subcommand,
    secrecy::Secret,
    taskdesk_auth::{LoginFlow, TokenLocation},
    taskdesk_config::TaskdeskConfig,
};

use crate::app::App;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in with email and password.
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted.
        #[arg(long, env = "TASKDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Keep the session after this login session ends.
        #[arg(long)]
        remember: bool,
    },
    /// Sign out and forget stored credentials.
    Logout,
    /// Show the signed-in user's profile.
    Whoami,
    /// Show where the session token is stored and whether it is valid.
    Status,
}

pub async fn handle_auth(config: TaskdeskConfig, action: AuthAction) -> Result<()> {
    match action {
        AuthAction::Login {
            email,
            password,
            remember,
        } => login(config, &email, password, remember).await,
        AuthAction::Logout => logout(config),
        AuthAction::Whoami => whoami(config).await,
        AuthAction::Status => status(config).await,
    }
}

async fn login(
    config: TaskdeskConfig,
    email: &str,
    password: Option<String>,
    remember: bool,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ")?,
    };

    let app = App::mount(config)?;
    let flow = LoginFlow::new(app.session.clone());
    match flow.submit(email, Secret::new(password), remember).await {
        Ok(outcome) => {
            println!(
                "Signed in as {} ({})",
                outcome.user.display_name(),
                outcome.user.role.label()
            );
            println!("Home: {}", outcome.destination);
            Ok(())
        },
        Err(e) => bail!(e.user_message()),
    }
}

fn logout(config: TaskdeskConfig) -> Result<()> {
    let app = App::mount(config)?;
    app.session.clear_user();
    println!("Signed out.");
    Ok(())
}

async fn whoami(config: TaskdeskConfig) -> Result<()> {
    let app = App::connect(config).await?;
    let Some(user) = app.session.user() else {
        bail!("not signed in; run `taskdesk auth login`");
    };
    println!("{}", user.display_name());
    println!("  email:      {}", user.email);
    println!("  role:       {}", user.role.label());
    if let Some(dept) = &user.department {
        println!("  department: {dept}");
    }
    if user.is_superuser {
        println!("  superuser:  yes");
    }
    Ok(())
}

async fn status(config: TaskdeskConfig) -> Result<()> {
    let app = App::mount(config)?;
    let location = app.session.credentials().token_location();
    let cached = app.session.user();

    match location {
        None => {
            println!("No stored session.");
            return Ok(());
        },
        Some(TokenLocation::Durable) => println!("Token: remembered (durable)"),
        Some(TokenLocation::Session) => println!("Token: this login session only"),
    }
    if let Some(user) = &cached {
        println!("Cached profile: {} ({})", user.email, user.role.label());
    }

    let state = app.session.resolve().await;
    match state.user() {
        Some(user) => println!("Server: valid for {}", user.email),
        None => println!("Server: rejected; stored credentials were cleared"),
    }
    Ok(())
}
