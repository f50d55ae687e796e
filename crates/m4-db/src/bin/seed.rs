//! # Admin Seed
//!
//! Applies migrations (schema, fee table, initial catalog) and creates the
//! first admin account.
//!
//! ## Usage
//! ```bash
//! cargo run -p m4-db --bin seed -- --email admin@m4tatica.com.br --password s3cret
//!
//! # Or through the environment
//! M4_ADMIN_EMAIL=admin@m4tatica.com.br M4_ADMIN_PASSWORD=s3cret cargo run -p m4-db --bin seed
//!
//! # Specify database path
//! cargo run -p m4-db --bin seed -- --db ./data/m4.db --email ... --password ...
//! ```

use std::env;

use anyhow::{bail, Context};
use m4_core::validation::{validate_email, validate_password};
use m4_db::{hash_password, Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

struct SeedArgs {
    db_path: String,
    email: Option<String>,
    password: Option<String>,
}

fn parse_args() -> Option<SeedArgs> {
    let args: Vec<String> = env::args().collect();

    let mut parsed = SeedArgs {
        db_path: env::var("M4_DB_PATH").unwrap_or_else(|_| "m4.db".to_string()),
        email: env::var("M4_ADMIN_EMAIL").ok(),
        password: env::var("M4_ADMIN_PASSWORD").ok(),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if let Some(value) = args.get(i + 1) {
                    parsed.db_path = value.clone();
                    i += 1;
                }
            }
            "--email" | "-e" => {
                if let Some(value) = args.get(i + 1) {
                    parsed.email = Some(value.clone());
                    i += 1;
                }
            }
            "--password" | "-p" => {
                if let Some(value) = args.get(i + 1) {
                    parsed.password = Some(value.clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("M4 admin seed");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>          Database file path (default: $M4_DB_PATH or ./m4.db)");
                println!("  -e, --email <EMAIL>      Admin email (default: $M4_ADMIN_EMAIL)");
                println!("  -p, --password <PASS>    Admin password (default: $M4_ADMIN_PASSWORD)");
                println!("  -h, --help               Show this help message");
                return None;
            }
            other => warn!(argument = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    Some(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let Some(args) = parse_args() else {
        return Ok(());
    };

    let db = Database::new(DbConfig::new(&args.db_path))
        .await
        .with_context(|| format!("Failed to open database at {}", args.db_path))?;

    info!(
        path = %args.db_path,
        fees = db.fees().list().await?.len(),
        products = db.products().list().await?.len(),
        "Migrations and reference data applied"
    );

    let (Some(email), Some(password)) = (args.email, args.password) else {
        bail!("Admin credentials missing: pass --email/--password or set M4_ADMIN_EMAIL/M4_ADMIN_PASSWORD");
    };

    let email = validate_email(&email)?;
    validate_password(&password)?;

    if db.users().find_by_email(&email).await?.is_some() {
        info!(email = %email, "Admin user already exists, skipping");
        db.close().await;
        return Ok(());
    }

    let hash = hash_password(&password)?;
    let user = db.users().insert(&email, &hash).await?;
    info!(id = user.id, email = %user.email, "Admin user created");

    db.close().await;
    Ok(())
}
