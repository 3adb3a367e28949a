use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    api::payload::{movie_list, MoviePayload},
    app_state::AppState,
    audit_verifier::verify_chain,
    config::{GateConfig, StoreBackend},
    identity::{SledUserDirectory, UserId},
    movie::{MovieDraft, MovieId},
};

/// Top-level CLI interface for watchgate
#[derive(Parser)]
#[command(
    name = "watchgate",
    version,
    about = "Movie catalog with age-gated access decisions and an audit trail"
)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Host/IP to bind, overrides the configuration
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, overrides the configuration
        #[arg(long)]
        port: Option<u16>,
    },

    /// Browse and manage the catalog
    #[command(subcommand)]
    Movies(MovieCommands),

    /// Run an access check and record the decision
    Check {
        #[arg(long)]
        movie: u64,
        #[arg(long, allow_negative_numbers = true)]
        age: i32,
        #[arg(long)]
        user: Option<u64>,
    },

    /// Query the access decision trail
    Audit {
        #[arg(long, conflicts_with_all = ["movie", "granted"])]
        user: Option<u64>,
        #[arg(long, conflicts_with = "granted")]
        movie: Option<u64>,
        #[arg(long)]
        granted: Option<bool>,
    },

    /// Recompute the audit hash chain
    VerifyAudit,

    /// Register a user in the local directory (sled backend only)
    AddUser {
        #[arg(long)]
        username: String,
    },

    /// Print the effective configuration as TOML
    ShowConfig,
}

#[derive(Subcommand)]
pub enum MovieCommands {
    List,
    Get {
        id: u64,
    },
    Search {
        title: String,
    },
    /// Movies whose minimum age is at most AGE
    ForAge {
        #[arg(allow_negative_numbers = true)]
        age: i64,
    },
    Genre {
        genre: String,
    },
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        min_age: u32,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        duration: Option<u32>,
    },
    Remove {
        id: u64,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn dispatch(cli: Cli, config: GateConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { host, port } => {
            let config = GateConfig {
                host: host.unwrap_or(config.host),
                port: port.unwrap_or(config.port),
                ..config
            };
            serve(config)
        }
        Commands::Movies(cmd) => {
            let state = AppState::from_config(&config)?;
            run_movie_command(&state, cmd)
        }
        Commands::Check { movie, age, user } => {
            let state = AppState::from_config(&config)?;
            let result = state
                .engine
                .check_access(MovieId(movie), age, user.map(UserId))?;
            print_json(&crate::api::payload::AccessResponse::from(result))
        }
        Commands::Audit {
            user,
            movie,
            granted,
        } => {
            let state = AppState::from_config(&config)?;
            let records = match (user, movie, granted) {
                (Some(user), _, _) => state.audit.find_by_user(UserId(user))?,
                (_, Some(movie), _) => state.audit.find_by_movie(MovieId(movie))?,
                (_, _, Some(granted)) => state.audit.find_by_outcome(granted)?,
                _ => state.audit.list()?,
            };
            print_json(&records)
        }
        Commands::VerifyAudit => {
            let state = AppState::from_config(&config)?;
            let report = verify_chain(state.audit.as_ref())?;
            print_json(&report)
        }
        Commands::AddUser { username } => {
            if config.backend != StoreBackend::Sled {
                anyhow::bail!("add-user needs the sled backend; in-memory users vanish on exit");
            }
            let db = sled::open(&config.data_dir)
                .with_context(|| format!("opening sled db at {}", config.data_dir))?;
            let user = SledUserDirectory::open(&db)?.register(&username)?;
            print_json(&user)
        }
        Commands::ShowConfig => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn run_movie_command(state: &AppState, cmd: MovieCommands) -> anyhow::Result<()> {
    let catalog = &state.catalog;
    match cmd {
        MovieCommands::List => print_json(&movie_list(&catalog.list()?)),
        MovieCommands::Get { id } => {
            print_json(&MoviePayload::from_movie(&catalog.get(MovieId(id))?))
        }
        MovieCommands::Search { title } => {
            print_json(&movie_list(&catalog.search_by_title(&title)?))
        }
        MovieCommands::ForAge { age } => print_json(&movie_list(&catalog.list_by_max_age(age)?)),
        MovieCommands::Genre { genre } => {
            print_json(&movie_list(&catalog.list_by_genre(&genre)?))
        }
        MovieCommands::Add {
            title,
            min_age,
            genre,
            description,
            duration,
        } => {
            let draft = MovieDraft {
                title,
                description,
                min_age: Some(min_age),
                genre,
                duration,
                ..MovieDraft::default()
            };
            print_json(&MoviePayload::from_movie(&catalog.create(draft)?))
        }
        MovieCommands::Remove { id } => {
            if catalog.delete(MovieId(id))? {
                println!("Removed movie {id}");
            } else {
                println!("Movie {id} not found; nothing removed");
            }
            Ok(())
        }
    }
}

fn serve(config: GateConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(&config)?);
    let app = crate::web::build_router(state, &config.cors_origins);
    let addr = config.bind_addr();

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building Tokio runtime")?;

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        tracing::info!(%addr, "HTTP server listening");
        axum::serve(listener, app).await.context("server error")
    })
}
