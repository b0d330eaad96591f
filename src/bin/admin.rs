//! CLI administration tool for golinks.
//!
//! Provides user and route administration without going through the HTTP
//! API, including the operator-only bootstrap of the first admin.
//!
//! # Usage
//!
//! ```bash
//! # Apply migrations for the configured dialect
//! cargo run --bin admin -- db migrate
//!
//! # Make the first admin
//! cargo run --bin admin -- user bootstrap admin@example.com
//!
//! # Promote another user
//! cargo run --bin admin -- user promote alice@example.com --as admin@example.com
//!
//! # Inspect, lock or delete a route
//! cargo run --bin admin -- route show docs
//! cargo run --bin admin -- route lock docs --as admin@example.com
//! cargo run --bin admin -- route delete docs
//! ```
//!
//! `route delete` only evicts the key from a remote cache. With the local
//! cache, servers keep the old redirect until restart, so the command always
//! asks for confirmation in that setup, even with `--yes`.
//!
//! # Environment Variables
//!
//! Same as the server; see [`golinks::config`].

use golinks::config::{self, Config};
use golinks::domain::repositories::{RouteStore, UserDirectory};
use golinks::infrastructure::persistence::{CachedRouteStore, SqlUserDirectory, run_migrations};
use golinks::server::{connect_pool, store_options};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::AnyPool;

/// CLI tool for managing golinks.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage routes
    Route {
        #[command(subcommand)]
        action: RouteAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List all users
    List,

    /// Make a user admin without an acting admin
    Bootstrap {
        name: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Promote a user to admin on behalf of an existing admin
    Promote {
        name: String,

        /// Acting admin
        #[arg(long = "as")]
        acting: String,
    },
}

#[derive(Subcommand)]
enum RouteAction {
    /// Show a route
    Show { short_key: String },

    /// Lock a route so only admins can change it
    Lock {
        short_key: String,

        /// Acting admin
        #[arg(long = "as")]
        acting: String,
    },

    /// Delete a route
    ///
    /// Without a remote cache, running servers keep redirecting the key from
    /// their local cache until they restart or evict it.
    Delete {
        short_key: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &config, pool).await?,
        Commands::Route { action } => handle_route_action(action, &config, pool).await?,
        Commands::Db { action } => handle_db_action(action, &config, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, config: &Config, pool: AnyPool) -> Result<()> {
    let users = SqlUserDirectory::new(config.dialect, pool);

    match action {
        UserAction::List => list_users(&users).await?,
        UserAction::Bootstrap { name, yes } => bootstrap_admin(&users, name, yes).await?,
        UserAction::Promote { name, acting } => {
            println!("{}", "⬆️  Promote User".bright_blue().bold());
            println!();

            users
                .promote_to_admin(&acting, &name)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to promote {}: {}", name, e))?;

            println!(
                "{} {} is now an admin",
                "✅".green(),
                name.cyan().bold()
            );
        }
    }

    Ok(())
}

/// Lists all users with their admin flag.
///
/// # Output Format
///
/// ```text
/// 👥 Users
///
///   ID  Name                                     Role
///   ──────────────────────────────────────────────────────
///   1   admin@example.com                        ADMIN
///   2   alice@example.com                        user
/// ```
async fn list_users(users: &SqlUserDirectory) -> Result<()> {
    println!("{}", "👥 Users".bright_blue().bold());
    println!();

    let all = users
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if all.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create the first admin with: {} admin user bootstrap <name>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<3} {:<40} {:<6}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Role".bright_white().bold()
    );
    println!("  {}", "─".repeat(54).bright_black());

    for user in &all {
        let role = if user.is_admin {
            "ADMIN".green().bold()
        } else {
            "user".normal()
        };

        println!(
            "  {:<3} {:<40} {}",
            user.id.to_string().bright_black(),
            user.name.cyan(),
            role
        );
    }

    println!();
    println!("  Total: {}", all.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Marks `name` as admin with no acting admin.
///
/// This is the only way to create the first admin, so it asks for
/// confirmation unless `--yes` is given.
async fn bootstrap_admin(users: &SqlUserDirectory, name: String, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔑 Bootstrap Admin".bright_blue().bold());
    println!();
    println!("  User: {}", name.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Grant admin rights without an acting admin?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    users
        .bootstrap_admin(&name)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bootstrap {}: {}", name, e))?;

    println!("{}", "✅ Admin created successfully!".green().bold());
    println!();

    Ok(())
}

async fn handle_route_action(action: RouteAction, config: &Config, pool: AnyPool) -> Result<()> {
    // Connect the same cache the server uses so deletes evict shared entries.
    let store = CachedRouteStore::new(pool, store_options(config).await);
    let cache_kind = store.cache_kind();

    match action {
        RouteAction::Show { short_key } => {
            let route = store
                .get(&short_key)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;

            println!("{}", "🔗 Route".bright_blue().bold());
            println!();
            println!("  Key:         {}", route.short_key.cyan().bold());
            println!("  URL:         {}", route.url.bright_white());
            println!("  Creator:     {}", route.creator);
            println!("  Team:        {}", route.team);
            println!(
                "  Created:     {}",
                route.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
            );
            println!(
                "  Modified:    {} by {}",
                route.modified_at.format("%Y-%m-%d %H:%M").to_string().bright_black(),
                route.last_modified_by
            );
            println!(
                "  Locked:      {}",
                if route.locked { "yes".red() } else { "no".green() }
            );
            println!();
        }
        RouteAction::Lock { short_key, acting } => {
            let mut route = store
                .get(&short_key)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            route.last_modified_by = acting;

            store
                .lock(route)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to lock {}: {}", short_key, e))?;

            println!("{} Route {} locked", "🔒".green(), short_key.cyan().bold());
        }
        RouteAction::Delete { short_key, yes } => {
            if !cache_kind.is_shared() {
                println!(
                    "{} No shared cache: running servers keep redirecting {} until restart",
                    "⚠️ ".yellow(),
                    short_key.cyan()
                );

                let confirmed = Confirm::new()
                    .with_prompt("Delete from the database anyway?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            } else if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete route {}?", short_key))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            store
                .delete(&short_key)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to delete {}: {}", short_key, e))?;

            println!("{}", "✅ Route deleted".green().bold());
        }
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, config: &Config, pool: &AnyPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").execute(pool).await?;

            println!(
                "{} ({})",
                "✅ Database connection OK".green().bold(),
                config.dialect
            );
        }
        DbAction::Migrate => {
            println!("{}", "🛠️  Applying migrations...".bright_blue());

            run_migrations(config.dialect, pool)
                .await
                .context("Migration failed")?;

            println!("{}", "✅ Schema up to date".green().bold());
        }
    }

    Ok(())
}
