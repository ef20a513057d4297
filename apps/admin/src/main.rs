use std::fmt::Write as _;

use accounts_config::{load as load_config, Locale};
use accounts_database::{initialize_database, role_column_width, UserOrdering};
use accounts_users::{
    PrivilegeUpdate, RegisterRequest, User, UserError, UserRepo, UserService,
};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

mod telemetry;

#[derive(Debug, Parser)]
#[command(name = "accounts-admin")]
#[command(about = "Manage user records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply database migrations and exit
    Migrate,
    /// Register a user
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        bio: Option<String>,
        /// admin, moderator or user
        #[arg(long)]
        role: Option<String>,
    },
    /// List users
    List {
        #[arg(long, value_enum, default_value_t = OrderArg::Id)]
        order: OrderArg,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the user owning an email address
    Show { email: String },
    /// Change a user's role
    SetRole { id: i64, role: String },
    /// Change platform flags
    SetFlags {
        id: i64,
        #[arg(long)]
        staff: Option<bool>,
        #[arg(long)]
        superuser: Option<bool>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a user
    Delete { id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OrderArg {
    Id,
    IdDesc,
    Email,
    Username,
}

impl From<OrderArg> for UserOrdering {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Id => UserOrdering::IdAsc,
            OrderArg::IdDesc => UserOrdering::IdDesc,
            OrderArg::Email => UserOrdering::Email,
            OrderArg::Username => UserOrdering::Username,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;

    let config = load_config().context("failed to load configuration")?;

    let pool = initialize_database(&config.database)
        .await
        .context("failed to initialise database")?;

    if matches!(cli.command, Commands::Migrate) {
        info!(url = %config.database.url, "database is up to date");
        return Ok(());
    }

    let service = UserService::new(pool, &config.accounts);
    let output = execute(cli.command, &service).await?;
    print!("{output}");
    Ok(())
}

/// Run one command and return what should be printed.
async fn execute<R: UserRepo>(command: Commands, service: &UserService<R>) -> anyhow::Result<String> {
    let locale = service.locale();
    let describe = |err: UserError| anyhow::anyhow!(err.message(locale));

    let output = match command {
        Commands::Migrate => String::new(),
        Commands::Create {
            email,
            username,
            bio,
            role,
        } => {
            let user = service
                .register(RegisterRequest {
                    email,
                    username: Some(username),
                    bio,
                    role,
                })
                .await
                .map_err(describe)?;
            format!("created {} with id {}\n", user, user.id())
        }
        Commands::List { order, json } => {
            let users = service.list_users(order.into()).await.map_err(describe)?;
            if json {
                let mut rendered =
                    serde_json::to_string_pretty(&users).context("failed to encode users")?;
                rendered.push('\n');
                rendered
            } else {
                render_table(&users, locale)
            }
        }
        Commands::Show { email } => match service.get_by_email(&email).await.map_err(describe)? {
            Some(user) => render_table(std::slice::from_ref(&user), locale),
            None => anyhow::bail!("no user with email {email}"),
        },
        Commands::SetRole { id, role } => {
            let user = service
                .change_privileges(
                    id,
                    PrivilegeUpdate {
                        role: Some(role),
                        ..Default::default()
                    },
                )
                .await
                .map_err(describe)?;
            format!("{} is now {}\n", user, user.role.label(locale))
        }
        Commands::SetFlags {
            id,
            staff,
            superuser,
            active,
        } => {
            let user = service
                .change_privileges(
                    id,
                    PrivilegeUpdate {
                        is_staff: staff,
                        is_superuser: superuser,
                        is_active: active,
                        ..Default::default()
                    },
                )
                .await
                .map_err(describe)?;
            format!(
                "{}: staff={} superuser={} active={} admin={}\n",
                user,
                user.is_staff,
                user.is_superuser,
                user.is_active,
                user.is_admin()
            )
        }
        Commands::Delete { id } => {
            service.delete_account(id).await.map_err(describe)?;
            format!("deleted user {id}\n")
        }
    };

    Ok(output)
}

fn render_table(users: &[User], locale: Locale) -> String {
    let role_width = role_column_width();
    let mut out = String::new();

    if users.is_empty() {
        out.push_str("No users found\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<6} {:<30} {:<20} {:<role_width$} {:<6} {:<6} {:<10}",
        "ID", "Email", "Username", "Role", "Admin", "Staff", "Superuser"
    );
    let _ = writeln!(out, "{}", "-".repeat(86 + role_width));

    for user in users {
        let _ = writeln!(
            out,
            "{:<6} {:<30} {:<20} {:<role_width$} {:<6} {:<6} {:<10}",
            user.id(),
            user.email,
            user.username
                .as_ref()
                .map(|u| u.as_str())
                .unwrap_or("NULL"),
            user.role.label(locale),
            user.is_admin(),
            user.is_staff,
            user.is_superuser,
        );
    }

    out
}
