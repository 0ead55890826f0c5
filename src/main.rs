mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use lb_core::config::Config;
use lb_core::{Error, PropertyId, ReservationId, UserId};
use lb_db::models::{NewProperty, NewReservation, NewReview, NewUser};
use lb_db::{Database, SearchOptions};
use serde::Serialize;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "lightbnb=debug,lb_db=debug,lb_core=debug".to_string()
        } else {
            "lightbnb=info,lb_db=warn,lb_core=warn".to_string()
        }
    });

    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("lightbnb {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        command => {
            let mut config = Config::load_or_default(cli.config.as_deref());
            if let Some(path) = cli.database {
                config.database.path = path;
            }
            for warning in config.validate() {
                tracing::warn!("Config warning: {warning}");
            }

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_command(command, config))
        }
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    let db = Database::open(&config.database)?;
    let result = dispatch(&db, command, &config).await;
    db.close();
    result
}

async fn dispatch(db: &Database, command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Migrate => {
            tracing::info!("Database ready at {}", config.database.path.display());
            println!("Database is up to date: {}", config.database.path.display());
            Ok(())
        }
        Commands::Search {
            owner,
            city,
            min_price,
            max_price,
            min_rating,
            limit,
        } => {
            let options = SearchOptions {
                owner_id: owner.map(UserId::from),
                city,
                minimum_price_per_night: min_price,
                maximum_price_per_night: max_price,
                minimum_rating: min_rating,
            };
            let limit = limit.unwrap_or(config.search.default_limit);
            let rows = db.search_properties(options, limit).await?;
            print_json(&rows)
        }
        Commands::Property { id } => {
            let id = PropertyId::from(id);
            let property = db
                .get_property(id)
                .await?
                .ok_or_else(|| Error::not_found("property", id))?;
            print_json(&property)
        }
        Commands::Reservations { guest, limit } => {
            let rows = db.get_all_reservations(UserId::from(guest), limit).await?;
            print_json(&rows)
        }
        Commands::AddUser {
            name,
            email,
            password,
        } => {
            let hash = bcrypt::hash(&password, config.security.bcrypt_cost)?;
            let user = db
                .add_user(NewUser {
                    name,
                    email,
                    password: hash,
                })
                .await?;
            tracing::info!(user_id = %user.id, "Registered user");
            print_json(&user)
        }
        Commands::Login { email, password } => {
            let user = db
                .get_user_with_email(email.as_str())
                .await?
                .ok_or_else(|| Error::not_found("user", &email))?;
            if !bcrypt::verify(&password, &user.password)? {
                anyhow::bail!("Incorrect password for {email}");
            }
            print_json(&user)
        }
        Commands::AddProperty {
            owner,
            title,
            description,
            cost,
            street,
            city,
            province,
            post_code,
            country,
            thumbnail_photo_url,
            cover_photo_url,
            parking_spaces,
            bathrooms,
            bedrooms,
        } => {
            let property = db
                .add_property(NewProperty {
                    owner_id: UserId::from(owner),
                    title,
                    description,
                    thumbnail_photo_url,
                    cover_photo_url,
                    cost_per_night: cost,
                    street,
                    city,
                    province,
                    post_code,
                    country,
                    parking_spaces,
                    number_of_bathrooms: bathrooms,
                    number_of_bedrooms: bedrooms,
                })
                .await?;
            print_json(&property)
        }
        Commands::Reserve {
            property,
            guest,
            start,
            end,
        } => {
            let reservation = db
                .add_reservation(NewReservation {
                    property_id: PropertyId::from(property),
                    guest_id: UserId::from(guest),
                    start_date: start,
                    end_date: end,
                })
                .await?;
            print_json(&reservation)
        }
        Commands::Review {
            property,
            guest,
            reservation,
            rating,
            message,
        } => {
            let review = db
                .add_review(NewReview {
                    guest_id: UserId::from(guest),
                    property_id: PropertyId::from(property),
                    reservation_id: ReservationId::from(reservation),
                    rating,
                    message,
                })
                .await?;
            print_json(&review)
        }
        Commands::Validate { .. } | Commands::Version => {
            anyhow::bail!("command does not use the database")
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    let Some(path) = path else {
        println!("No config file given; defaults are valid");
        return Ok(());
    };

    let config = Config::load(path)?;
    let warnings = config.validate();

    if warnings.is_empty() {
        println!("Configuration is valid: {}", path.display());
    } else {
        println!("Configuration has {} warning(s):", warnings.len());
        for warning in &warnings {
            println!("  - {warning}");
        }
    }
    Ok(())
}
