mod action;
mod app;
mod app_state;
mod component;
mod components;
mod theme;

use std::sync::Arc;

use concert_core::client::ApiClient;
use concert_core::config::Config;
use concert_core::platform;
use concert_core::session::SessionStore;

const USAGE: &str = "usage: concerts [login <email> <password> | signup <first> <last> <email> <password> | logout]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("concerts.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress
    // connection-level DEBUG from HTTP client internals.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    let config = Config::load().unwrap_or_default();
    let client = Arc::new(ApiClient::new(&config.api)?);
    let sessions = SessionStore::new(config.paths.session_file.clone());

    // ── CLI subcommands (credential handling stays out of the TUI) ───────────
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("login") => {
            let (Some(email), Some(password)) = (args.get(1), args.get(2)) else {
                eprintln!("{USAGE}");
                std::process::exit(2);
            };
            match client.login(email, password).await {
                Ok(user) => {
                    sessions.save(&user)?;
                    let badge = if user.is_admin() { " (admin)" } else { "" };
                    println!("Logged in as {}{badge}", user.display_name());
                }
                Err(e) => {
                    eprintln!("Login failed: {e}");
                    std::process::exit(1);
                }
            }
            return Ok(());
        }
        Some("signup") => {
            let (Some(first), Some(last), Some(email), Some(password)) =
                (args.get(1), args.get(2), args.get(3), args.get(4))
            else {
                eprintln!("{USAGE}");
                std::process::exit(2);
            };
            match client.signup(first, last, email, password).await {
                Ok(user) => {
                    sessions.save(&user)?;
                    println!("Signed up as {}", user.display_name());
                }
                Err(e) => {
                    eprintln!("Sign-up failed: {e}");
                    std::process::exit(1);
                }
            }
            return Ok(());
        }
        Some("logout") => {
            sessions.clear()?;
            println!("Logged out.");
            return Ok(());
        }
        Some(other) => {
            eprintln!("unknown command: {other}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
        None => {}
    }

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("concerts log: {}", log_path.display());
    tracing::info!("concerts starting…");

    let session = sessions.load();
    let app = app::App::new(config, client, session);
    app.run().await?;

    Ok(())
}
