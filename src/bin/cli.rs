use clap::{Parser, Subcommand};
use launchpad::{
    config::AppConfig,
    db,
    repositories::user_repository::SqliteUserRepository,
    services::user_service::{CreateUserRequest, UserService},
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "launchpad-cli")]
#[command(about = "CLI tool for managing Launchpad users", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// List all users, newest first
    List,

    /// Show a single user
    Show {
        /// Email address of the user
        #[arg(short, long)]
        email: String,
    },
}

fn get_password(prompt: &str) -> anyhow::Result<String> {
    use std::io::{self, Write};
    print!("{}: ", prompt);
    io::stdout().flush()?;

    Ok(rpassword::read_password()?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    let config = AppConfig::from_env()?;

    // Connect to database
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let user_service = UserService::new(user_repository);

    let outcome = run(cli.command, &user_service).await;
    pool.close().await;

    if let Err(err) = outcome {
        eprintln!("❌ {}", err);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Commands, user_service: &UserService) -> anyhow::Result<()> {
    match command {
        Commands::User { command } => match command {
            UserCommands::Create {
                email,
                name,
                password,
            } => {
                let password = match password {
                    Some(pw) => pw,
                    None => {
                        let password = get_password("Password")?;
                        let confirm = get_password("Confirm password")?;
                        if password != confirm {
                            anyhow::bail!("Passwords do not match");
                        }
                        password
                    }
                };

                let request = CreateUserRequest {
                    name,
                    email,
                    password,
                };

                let user = user_service
                    .create_user(request)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

                println!("✅ User created successfully!");
                println!("  ID: {}", user.id);
                println!("  Name: {}", user.display_name());
                println!("  Email: {}", user.email);
            }

            UserCommands::List => {
                let users = user_service
                    .list_users()
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

                if users.is_empty() {
                    println!("No users found.");
                } else {
                    println!("{:<5} {:<25} {:<40} {:<12}", "ID", "Name", "Email", "Joined");
                    println!("{}", "-".repeat(85));
                    for user in users {
                        println!(
                            "{:<5} {:<25} {:<40} {:<12}",
                            user.id,
                            user.display_name(),
                            user.email,
                            user.joined_on()
                        );
                    }
                }
            }

            UserCommands::Show { email } => match user_service
                .find_user_by_email(email.trim())
                .await
                .map_err(|e| anyhow::anyhow!("Failed to find user: {}", e))?
            {
                Some(user) => {
                    println!("  ID: {}", user.id);
                    println!("  Name: {}", user.name.as_deref().unwrap_or("(No Name)"));
                    println!("  Email: {}", user.email);
                    println!("  Created: {}", user.created_at.to_rfc3339());
                }
                None => anyhow::bail!("User '{}' not found", email),
            },
        },
    }

    Ok(())
}
