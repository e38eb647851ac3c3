//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// Talleres Lima - directory admin API
#[derive(Parser, Debug)]
#[command(name = "talleres-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Seed initial data
    Seed(SeedArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "SERVER_PORT")]
    pub port: u16,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the seed command
#[derive(Parser, Debug)]
pub struct SeedArgs {
    #[command(subcommand)]
    pub target: SeedTarget,
}

/// Seedable data sets
#[derive(Subcommand, Debug)]
pub enum SeedTarget {
    /// Create the initial super admin account if it does not exist
    Admin(SeedAdminArgs),
}

/// Arguments for seeding the super admin
#[derive(Parser, Debug)]
pub struct SeedAdminArgs {
    /// Super admin email
    #[arg(long, env = "SEED_ADMIN_EMAIL")]
    pub email: String,

    /// Super admin password
    #[arg(long, env = "SEED_ADMIN_PASSWORD")]
    pub password: String,

    /// Display name
    #[arg(long, default_value = "Super Admin")]
    pub name: String,
}
