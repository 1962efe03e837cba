// ABOUTME: Seeder for a fresh admin database: roles, navigation menus and voice types
// ABOUTME: Optionally resets the voice catalogue and the AI persona collection to defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

//! Admin data seeder for the Fluent Life admin API.
//!
//! Usage:
//! ```bash
//! # Seed roles, menus and missing voice types
//! cargo run --bin seed-admin-data
//!
//! # Replace the voice catalogue with the defaults
//! cargo run --bin seed-admin-data -- --reset-voice-types
//!
//! # Also reset AI personas to the built-in set
//! cargo run --bin seed-admin-data -- --with-ai-roles
//!
//! # Verbose output
//! cargo run --bin seed-admin-data -- -v
//! ```

use std::env;

use anyhow::Result;
use clap::Parser;
use fluent_admin_api::constants::defaults;
use fluent_admin_api::database::Database;
use fluent_admin_api::models::default_personas;
use fluent_admin_api::seed;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "seed-admin-data",
    about = "Fluent Life Admin Data Seeder",
    long_about = "Populate the admin database with built-in roles, navigation menus and voice types"
)]
struct SeedArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Replace every voice type with the built-in catalogue
    #[arg(long)]
    reset_voice_types: bool,

    /// Reset AI personas to the built-in set
    #[arg(long)]
    with_ai_roles: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    info!("=== Fluent Life Admin Data Seeder ===");

    let database_url = args
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| defaults::DATABASE_URL.to_owned());

    info!("Connecting to database: {}", database_url);
    let database = Database::new(&database_url).await?;

    info!("Step 1: Creating roles...");
    let roles = seed::seed_roles(&database).await?;
    info!("  Created {} roles", roles);

    info!("Step 2: Creating navigation menus...");
    let menus = seed::seed_menus(&database).await?;
    info!("  Created {} menus", menus);

    info!("Step 3: Creating voice types...");
    let voices = seed::seed_voice_types(&database, args.reset_voice_types).await?;
    if args.reset_voice_types {
        info!("  Replaced catalogue with {} voice types", voices);
    } else {
        info!("  Created {} voice types", voices);
    }

    if args.with_ai_roles {
        info!("Step 4: Resetting AI personas...");
        let personas = database.replace_ai_roles(&default_personas()).await?;
        info!("  Stored {} AI personas", personas.len());
    }

    info!("");
    info!("=== Seeding Complete ===");
    Ok(())
}
