use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use bank_session::authz::Role;
use bank_session::pipeline::TracingNavigator;
use bank_session::session::FileTokenStorage;
use bank_session::{build_client, AuthState, ClientConfig, RouteGuard};

#[derive(Parser, Debug)]
#[command(author, version, about = "banking session client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and remember the access token
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Show the user behind the stored session
    Whoami,
    /// Forget the stored session
    Logout,
    /// Check whether the current user holds a permission token
    Can { permission: String },
    /// Show what the route guard decides for a view
    Visit {
        route: String,
        /// Roles allowed on the view; repeat for several
        #[arg(long = "role")]
        roles: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env();
    init_tracing();

    let cli = Cli::parse();
    let config = ClientConfig::from_env().context("invalid client configuration")?;
    let storage = Arc::new(FileTokenStorage::new(config.token_dir.clone()));
    let controller = build_client(&config, storage, Arc::new(TracingNavigator))?;

    match cli.command {
        Commands::Login { username, password } => {
            let outcome = controller
                .login(&username, &password)
                .await
                .map_err(|err| anyhow::anyhow!("login failed: {}", err.message()))?;
            println!("logged in as {} ({})", outcome.user.username, outcome.user.role);
            if outcome.must_change_credentials {
                println!("the server requires a credential change before continuing");
            }
        }
        Commands::Whoami => match controller.initialize().await {
            AuthState::Authenticated(user) => {
                println!("{:<10} {}", "id", user.id);
                println!("{:<10} {}", "username", user.username);
                println!("{:<10} {}", "name", user.full_name);
                println!("{:<10} {}", "email", user.email);
                println!("{:<10} {}", "role", user.role);
                println!("{:<10} {}", "active", user.is_active);
            }
            _ => println!("not logged in"),
        },
        Commands::Logout => {
            controller.initialize().await;
            controller.logout().await;
            println!("logged out");
        }
        Commands::Can { permission } => {
            controller.initialize().await;
            let allowed = controller.has_permission(&permission);
            println!("{permission}: {}", if allowed { "allowed" } else { "denied" });
        }
        Commands::Visit { route, roles } => {
            let required = roles
                .iter()
                .map(|r| r.parse::<Role>().map_err(anyhow::Error::msg))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let state = controller.initialize().await;
            let decision = RouteGuard::from_config(&config).evaluate(&state, &required);
            println!("{route}: {decision:?}");
        }
    }

    Ok(())
}

fn load_env() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    let _ = dotenvy::from_path(crate_env);
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr);

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
