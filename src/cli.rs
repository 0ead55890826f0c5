use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lightbnb")]
#[command(author, version, about = "LightBnB property rental data store")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the database path from the config file
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create or upgrade the database schema
    Migrate,

    /// Search reviewed properties, cheapest first
    Search {
        /// Only this owner's properties (every other filter is then ignored)
        #[arg(long)]
        owner: Option<i64>,

        /// Case-insensitive part of the city name
        #[arg(long)]
        city: Option<String>,

        /// Minimum nightly cost in dollars (cents allowed, e.g. 49.50)
        #[arg(long)]
        min_price: Option<f64>,

        /// Maximum nightly cost in dollars (cents allowed, e.g. 149.99)
        #[arg(long)]
        max_price: Option<f64>,

        /// Minimum average rating
        #[arg(long)]
        min_rating: Option<f64>,

        /// Maximum number of rows (defaults to search.default_limit)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Show one property
    Property {
        /// Property id
        #[arg(long)]
        id: i64,
    },

    /// List a guest's reservations by start date
    Reservations {
        /// Guest user id
        #[arg(long)]
        guest: i64,

        /// Maximum number of rows
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },

    /// Register a user (the password is stored as a bcrypt hash)
    AddUser {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Check a user's password
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// List a property
    AddProperty {
        /// Owner user id
        #[arg(long)]
        owner: i64,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Nightly cost in dollars (cents allowed)
        #[arg(long)]
        cost: f64,

        #[arg(long)]
        street: String,

        #[arg(long)]
        city: String,

        #[arg(long)]
        province: String,

        #[arg(long)]
        post_code: String,

        #[arg(long)]
        country: String,

        #[arg(long, default_value = "")]
        thumbnail_photo_url: String,

        #[arg(long, default_value = "")]
        cover_photo_url: String,

        #[arg(long, default_value = "0")]
        parking_spaces: i64,

        #[arg(long, default_value = "0")]
        bathrooms: i64,

        #[arg(long, default_value = "0")]
        bedrooms: i64,
    },

    /// Book a property for a guest
    Reserve {
        #[arg(long)]
        property: i64,

        #[arg(long)]
        guest: i64,

        /// First night (YYYY-MM-DD)
        #[arg(long)]
        start: chrono::NaiveDate,

        /// Checkout day (YYYY-MM-DD)
        #[arg(long)]
        end: chrono::NaiveDate,
    },

    /// Review a reservation
    Review {
        #[arg(long)]
        property: i64,

        #[arg(long)]
        guest: i64,

        #[arg(long)]
        reservation: i64,

        /// Rating from 1 to 5
        #[arg(long)]
        rating: i64,

        #[arg(long)]
        message: Option<String>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
