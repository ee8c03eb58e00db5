//! portico CLI
//!
//! Runs the front controller as a CGI program, dispatches single requests
//! from the command line and inspects the route table.

use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use portico::cgi;
use portico::state::SESSION_COOKIE;
use portico::{App, AppConfig};
use portico_auth::Session;
use portico_router::Request;

/// Front-controller dispatcher for the portico blog.
#[derive(Parser)]
#[command(name = "portico")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Route and user declaration (JSON). Uses the built-in one if omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Session database URL.
    #[arg(
        short,
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:portico.sqlite3?mode=rwc"
    )]
    database: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Append the request diagnostics trailer to every response.
    #[arg(long)]
    debug_trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List routes in match order.
    Routes,

    /// Validate the declaration against the registered controllers.
    Check,

    /// Dispatch one request and print the response.
    Dispatch {
        /// HTTP method, e.g. GET.
        method: String,

        /// Request URI, e.g. /blog/cat/tech?page=2.
        uri: String,

        /// Session key to send as the session cookie.
        #[arg(short, long)]
        session: Option<String>,

        /// Form field as key=value; repeatable.
        #[arg(short, long = "form", value_name = "KEY=VALUE")]
        form: Vec<String>,
    },

    /// Serve one CGI request from the environment and stdin.
    Cgi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the response in CGI mode.
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = AppConfig::load(cli.config.as_deref())?;
    let app = App::build(&config)?.with_debug_trace(cli.debug_trace);

    match cli.command {
        Commands::Routes => {
            println!("{:<8} {:<32} TARGET", "METHOD", "PATTERN");
            println!("{:-<72}", "");
            for entry in app.dispatcher().router().table().iter() {
                println!(
                    "{:<8} {:<32} {}",
                    entry.method.as_str(),
                    entry.pattern.pattern(),
                    entry.target
                );
            }
        }

        Commands::Check => {
            info!("Declaration is valid.");
        }

        Commands::Dispatch {
            method,
            uri,
            session,
            form,
        } => {
            let mut request = Request::new(method, uri).body(form.join("&"));
            if let Some(key) = session {
                request = request.header("Cookie", format!("{SESSION_COOKIE}={key}"));
            }

            let pool = connect(&cli.database).await?;
            let response = app.serve(&pool, &request).await?;
            cgi::write_http(&mut io::stdout().lock(), &response)?;
        }

        Commands::Cgi => {
            let var = |name: &str| std::env::var(name).ok();
            let mut body = Vec::new();
            let len = cgi::content_length(var);
            if len > 0 {
                io::stdin().lock().take(len as u64).read_to_end(&mut body)?;
            }
            let request = cgi::request_from_env(var, body);

            let pool = connect(&cli.database).await?;
            let response = app.serve(&pool, &request).await?;
            cgi::write_response(&mut io::stdout().lock(), &response)?;
        }
    }

    Ok(())
}

async fn connect(database: &str) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(database)
        .await?;
    portico_auth::create_tables(&pool).await?;

    let purged = Session::clear_expired(&pool).await?;
    let live = Session::count(&pool).await?;
    debug!(purged, live, "session store ready");
    Ok(pool)
}
