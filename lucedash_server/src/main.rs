//! Entry point for the lucedash server. Loads the metrics database once, then serves
//! the dashboard page.

mod page;
mod routes;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Router};
use lucedash::config::{resolve_db_path, resolve_port, DEFAULT_BIND};
use lucedash::dataset;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

struct ParsedArgs {
    db: Option<String>,
    port: Option<String>,
    bind: Option<String>,
    check: bool,
}

fn usage(prog: &str) -> String {
    format!("Usage: {prog} [--db PATH|-d PATH] [--port PORT|-p PORT] [--bind ADDR] [--check]")
}

#[derive(Debug)]
enum ArgsError {
    Help(String),
    Unexpected(String),
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, ArgsError> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "lucedash_server".into());
    let mut db: Option<String> = None;
    let mut port: Option<String> = None;
    let mut bind: Option<String> = None;
    let mut check = false; // --check

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(ArgsError::Help(usage(&prog))),
            "--db" | "-d" => db = it.next(),
            "--port" | "-p" => port = it.next(),
            "--bind" => bind = it.next(),
            "--check" => check = true,
            _ if arg.starts_with("--db=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        db = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with("--port=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    port = Some(v.to_string());
                }
            }
            _ if arg.starts_with("--bind=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    bind = Some(v.to_string());
                }
            }
            _ => {
                return Err(ArgsError::Unexpected(format!(
                    "Unexpected argument '{arg}'. {}",
                    usage(&prog)
                )))
            }
        }
    }
    Ok(ParsedArgs {
        db,
        port,
        bind,
        check,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(ArgsError::Help(msg)) => {
            println!("{msg}");
            return Ok(());
        }
        Err(ArgsError::Unexpected(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    let db_path = resolve_db_path(parsed.db.as_deref());
    // No partial dashboard: any load failure ends the process before binding.
    let data = match dataset::load(&db_path) {
        Ok(d) => d,
        Err(e) => {
            error!("{e}");
            anyhow::bail!("startup aborted: {}", e.user_message());
        }
    };

    if parsed.check {
        println!("disk_metrics: {} rows, devices {:?}", data.disk.len(), data.devices());
        println!("cpu_metrics: {} rows", data.cpu.len());
        println!("memory_metrics: {} rows", data.memory.len());
        return Ok(());
    }

    let ip: IpAddr = parsed
        .bind
        .as_deref()
        .unwrap_or(DEFAULT_BIND)
        .parse()
        .context("invalid --bind address")?;
    let addr = SocketAddr::new(ip, resolve_port(parsed.port.as_deref()));

    let app = Router::new()
        .route("/", get(routes::index))
        .route("/theme/:theme", get(routes::switch_theme))
        .route("/api/view", get(routes::api_view))
        .with_state(AppState {
            dataset: Arc::new(data),
        });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("dashboard running at http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        std::iter::once("lucedash_server")
            .chain(v.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn long_short_and_assign_forms() {
        let p = parse_args(args(&["--db", "/tmp/a.sqlite", "-p", "9001"])).unwrap();
        assert_eq!(p.db.as_deref(), Some("/tmp/a.sqlite"));
        assert_eq!(p.port.as_deref(), Some("9001"));
        assert!(!p.check);

        let p = parse_args(args(&["-d", "b.sqlite", "--port=9002", "--bind=0.0.0.0", "--check"]))
            .unwrap();
        assert_eq!(p.db.as_deref(), Some("b.sqlite"));
        assert_eq!(p.port.as_deref(), Some("9002"));
        assert_eq!(p.bind.as_deref(), Some("0.0.0.0"));
        assert!(p.check);
    }

    #[test]
    fn help_and_unknown_args_are_told_apart() {
        match parse_args(args(&["--help"])) {
            Err(ArgsError::Help(msg)) => assert!(msg.starts_with("Usage:")),
            _ => panic!("--help should ask for usage"),
        }
        match parse_args(args(&["--db", "a.sqlite", "--verbose"])) {
            Err(ArgsError::Unexpected(msg)) => {
                assert!(msg.contains("--verbose") && msg.contains("Usage:"))
            }
            _ => panic!("--verbose should be rejected"),
        }
    }
}
