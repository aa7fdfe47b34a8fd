use std::path::PathBuf;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use gridiron::{Database, create_router};

const DEFAULT_DATABASE: &str = "./gridiron.db";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Args {
    #[arrrg(optional, "Path to the SQLite database file")]
    database: Option<String>,
    #[arrrg(optional, "Host to bind the HTTP server")]
    host: Option<String>,
    #[arrrg(optional, "Port to bind the HTTP server")]
    port: Option<u16>,
    #[arrrg(flag, "Enable verbose logging")]
    verbose: bool,
}

const HELP_TEXT: &str = r#"gridirond - football data daemon

USAGE:
    gridirond [OPTIONS]

OPTIONS:
    --database <PATH>    SQLite database file [env: DB_PATH] [default: ./gridiron.db]
    --host <HOST>        Host to bind the HTTP server [default: 127.0.0.1]
    --port <PORT>        Port to bind the HTTP server [env: PORT] [default: 8080]
    --verbose            Log at debug level unless RUST_LOG says otherwise

DESCRIPTION:
    Serves teams, players, games and player statistics over HTTP/JSON under /api/.
    The database is created and migrated on startup.

    The server shuts down gracefully on SIGTERM or Ctrl+C.

API ENDPOINTS:
    Health:
      GET    /health                              Liveness probe

    Teams:
      GET    /api/teams                           List teams (?conference=&division=)
      POST   /api/teams                           Create a team
      GET    /api/teams/{id}                      Get a team
      PUT    /api/teams/{id}                      Update a team
      PATCH  /api/teams/{id}                      Update a team
      DELETE /api/teams/{id}                      Delete a team
      GET    /api/teams/{id}/players              List a team's players
      GET    /api/teams/{id}/games                List a team's games

    Players:
      GET    /api/players                         List players
      POST   /api/players                         Create a player
      GET    /api/players/{id}                    Get a player
      PUT    /api/players/{id}                    Update a player
      PATCH  /api/players/{id}                    Update a player
      DELETE /api/players/{id}                    Delete a player
      GET    /api/players/{id}/stats              List a player's stat lines

    Games:
      GET    /api/games                           List games
      POST   /api/games                           Create a game
      GET    /api/games/{id}                      Get a game
      PUT    /api/games/{id}                      Update a game
      PATCH  /api/games/{id}                      Update a game
      DELETE /api/games/{id}                      Delete a game
      GET    /api/games/{id}/stats                List a game's stat lines
      GET    /api/games/season/{season}           List a season's games
      GET    /api/games/season/{season}/week/{n}  List one week's games

    Player statistics:
      GET    /api/player-stats                    List stat lines
      POST   /api/player-stats                    Record a stat line
      GET    /api/player-stats/{id}               Get a stat line
      PUT    /api/player-stats/{id}               Update a stat line
      PATCH  /api/player-stats/{id}               Update a stat line
      DELETE /api/player-stats/{id}               Delete a stat line"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = Args::from_command_line("USAGE: gridirond [OPTIONS]");

    if !free.is_empty() && free[0] == "help" {
        println!("{}", HELP_TEXT);
        return Ok(());
    }

    let config = ServerConfig::from_args(args)?;

    let default_level = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    tracing::info!(
        database = %config.database_path.display(),
        host = %config.host,
        port = config.port,
        "gridirond starting"
    );

    let db = Database::open(&config.database_path).await?;
    let app = create_router(db.pool().clone());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("failed to bind to {}: {}", addr, e))?;

    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.pool().close().await;
    tracing::info!("gridirond stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received, draining connections");
}

struct ServerConfig {
    database_path: PathBuf,
    host: String,
    port: u16,
    verbose: bool,
}

impl ServerConfig {
    /// Resolves each setting from its flag, then its environment variable, then the default.
    fn from_args(args: Args) -> Result<Self, String> {
        let database_path = args
            .database
            .or_else(|| std::env::var("DB_PATH").ok())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));
        let port = match args.port {
            Some(port) => port,
            None => match std::env::var("PORT") {
                Ok(raw) => raw
                    .parse()
                    .map_err(|_| format!("PORT must be a port number, got {:?}", raw))?,
                Err(_) => DEFAULT_PORT,
            },
        };
        Ok(Self {
            database_path,
            host: args.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            verbose: args.verbose,
        })
    }
}
