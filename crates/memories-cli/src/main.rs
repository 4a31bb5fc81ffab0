use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

use memories_cli::seeder::{self, EngagementPerPost, SeedConfig};
use memories_config::StorageConfig;
use memories_core::hash_password;
use memories_db::{PgPool, Repositories, UserRepository, init_db_pool};
use memories_models::NewUser;

#[derive(Parser)]
#[command(name = "memories-cli")]
#[command(about = "Memories CLI - Administrative tools for the Memories API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user account that can sign in with a password
    CreateUser {
        /// First name
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake users, posts, likes and comments
    Seed {
        /// Number of users to create
        #[arg(short = 'u', long, default_value = "5")]
        users: usize,

        /// Number of posts per user
        #[arg(short = 'p', long, default_value = "4")]
        posts: usize,

        /// Maximum likes per post
        #[arg(long, default_value = "5")]
        max_likes: usize,

        /// Maximum comments per post
        #[arg(long, default_value = "3")]
        max_comments: usize,
    },
    /// Delete every post (keeps users)
    ClearPosts,
    /// Delete every post and user
    ClearAll,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let pool = init_db_pool(&StorageConfig::from_env()).await?;

    match cli.command {
        Commands::CreateUser {
            first_name,
            last_name,
            email,
            password,
        } => handle_create_user(&pool, first_name, last_name, email, password).await,
        Commands::Seed {
            users,
            posts,
            max_likes,
            max_comments,
        } => handle_seed(&pool, users, posts, max_likes, max_comments).await,
        Commands::ClearPosts => {
            let removed = seeder::clear_posts(&pool).await?;
            println!("✅ Cleared {} posts", removed);
            Ok(())
        }
        Commands::ClearAll => seeder::clear_all(&pool).await,
    }
}

fn prompt_or(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("Failed to read {}", prompt.to_lowercase())),
    }
}

async fn handle_create_user(
    pool: &PgPool,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let first_name = prompt_or(first_name, "First name")?;
    let last_name = prompt_or(last_name, "Last name")?;
    let email = prompt_or(email, "Email address")?;
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    if password.len() < 6 {
        bail!("Password must be at least 6 characters");
    }

    let password_hash = hash_password(&password).map_err(|e| e.error)?;
    let name = format!("{} {}", first_name.trim(), last_name.trim());
    let new_user = NewUser::new(&name, &email, password_hash);

    let repos = Repositories::postgres(pool.clone());
    let Some(user) = repos.users.insert(&new_user).await? else {
        bail!("User with this email already exists");
    };

    println!("\n✅ User created successfully!");
    println!("   Email: {}", user.email);
    println!("   Name: {}", user.name);
    Ok(())
}

async fn handle_seed(
    pool: &PgPool,
    users: usize,
    posts: usize,
    max_likes: usize,
    max_comments: usize,
) -> anyhow::Result<()> {
    let config = SeedConfig::new(users)
        .with_posts_per_user(posts)
        .with_engagement(EngagementPerPost {
            max_likes,
            max_comments,
        });

    seeder::seed_all(&Repositories::postgres(pool.clone()), config).await?;
    Ok(())
}
