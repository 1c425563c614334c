mod cli;
mod context;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::CliContext;
use taskboard_core::{init_logging, LogTarget};
use taskboard_domain::Route;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        init_logging(LogTarget::Silent)?;
        let config = context::load_config(&cli.connection)?;
        let session = context::open_session(&config)?;
        let route = Route::parse(&cli.route);
        tracing::info!(%route, "Starting terminal UI");
        let connector = context::remote_connector(config.clone());
        return taskboard_tui::run(config, session, connector, route).await;
    };

    init_logging(LogTarget::Stderr)?;

    if let Commands::Completions { shell } = command {
        clap_complete::generate(shell, &mut Cli::command(), "taskboard", &mut std::io::stdout());
        return Ok(());
    }

    if let Err(err) = run(&cli.connection, command).await {
        tracing::debug!(error = %err, "Command failed");
        output::output_failure(&err);
    }
    Ok(())
}

async fn run(connection: &cli::ConnectionArgs, command: Commands) -> anyhow::Result<()> {
    let mut ctx = CliContext::load(connection)?;

    match command {
        Commands::Login { username, password } => {
            handlers::auth::login(&mut ctx, username, password).await?
        }
        Commands::Logout => handlers::auth::logout(&mut ctx)?,
        Commands::Whoami => handlers::auth::whoami(&mut ctx).await?,
        Commands::Register {
            username,
            email,
            password,
        } => handlers::auth::register(&ctx, username, email, password).await?,
        Commands::ForgotPassword { email } => handlers::auth::forgot_password(&ctx, email).await?,
        Commands::ResetPassword { token, password } => {
            handlers::auth::reset_password(&ctx, token, password).await?
        }
        Commands::Board(board_cmd) => handlers::board::handle(&mut ctx, board_cmd.action).await?,
        Commands::Task(task_cmd) => handlers::task::handle(&mut ctx, task_cmd.action).await?,
        Commands::Archived(archived_cmd) => {
            handlers::archived::handle(&mut ctx, archived_cmd.action).await?
        }
        Commands::Notification(notification_cmd) => {
            handlers::notification::handle(&mut ctx, notification_cmd.action).await?
        }
        Commands::Completions { .. } => {}
    }
    Ok(())
}
