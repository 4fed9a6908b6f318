use std::ffi::OsString;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{Arg, Command, CommandFactory, Parser};
use nano_web::config::{DEFAULT_BACKLOG, DEFAULT_PORT};
use nano_web::{Server, ServerConfig};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// A minimal HTTP/1.1 server.
#[derive(Parser, Debug)]
#[command(name = "nano-server", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    bind: IpAddr,

    /// Listen backlog
    #[arg(long, default_value_t = DEFAULT_BACKLOG)]
    backlog: u32,

    /// Directory served under /static
    #[arg(long, default_value = ".")]
    static_root: PathBuf,

    /// Idle worker count, defaults to the available parallelism
    #[arg(long)]
    workers: Option<usize>,

    /// Seconds a client may take to send its request
    #[arg(long, default_value_t = 5)]
    read_timeout: u64,

    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        let config = ServerConfig::default()
            .with_bind_address(cli.bind)
            .with_port(cli.port)
            .with_backlog(cli.backlog)
            .with_read_timeout(Duration::from_secs(cli.read_timeout))
            .with_static_root(cli.static_root);

        match cli.workers {
            Some(workers) => config.with_workers(workers),
            None => config,
        }
    }
}

/// Keeps only the options `Cli` declares, each with its value.
///
/// Unknown tokens are dropped wherever they appear, so a stray argument never
/// hides the options that follow it. The program name is always kept.
fn retain_known_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let mut command = Cli::command();
    command.build();

    let mut args = args.into_iter();
    let mut kept: Vec<OsString> = args.next().into_iter().collect();

    while let Some(arg) = args.next() {
        let Some((option, inline_value)) = arg.to_str().and_then(|token| lookup_option(&command, token)) else {
            continue;
        };
        let takes_value = option.get_action().takes_values() && !inline_value;

        kept.push(arg);
        if takes_value && let Some(value) = args.next() {
            kept.push(value);
        }
    }

    kept
}

/// The declared option `token` names, and whether the token carries its value
/// inline (`--port=80`, `-p80`).
fn lookup_option<'a>(command: &'a Command, token: &str) -> Option<(&'a Arg, bool)> {
    if let Some(long) = token.strip_prefix("--") {
        let (name, inline_value) = match long.split_once('=') {
            Some((name, _)) => (name, true),
            None => (long, false),
        };
        return command.get_arguments().find(|arg| arg.get_long() == Some(name)).map(|arg| (arg, inline_value));
    }

    let mut shorts = token.strip_prefix('-')?.chars();
    let short = shorts.next()?;
    let inline_value = shorts.next().is_some();
    command.get_arguments().find(|arg| arg.get_short() == Some(short)).map(|arg| (arg, inline_value))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse_from(retain_known_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprint!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(cli.log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("can't install log subscriber: {e}");
    }

    let server = Server::with_default_routes(ServerConfig::from(cli));
    match server.run_until(shutdown_signal()).await {
        Ok(()) => {
            info!("graceful shutdown");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(cause = %e, "server failed to start");
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(cause = %e, "can't listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(cause = %e, "can't listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received ctrl-c"),
        () = terminate => info!("received SIGTERM"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(retain_known_args(args.iter().map(OsString::from)))
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::from(Cli::parse_from(["nano-server"]));
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn options_map_onto_config() {
        let cli = Cli::parse_from([
            "nano-server",
            "-p",
            "9090",
            "--bind",
            "127.0.0.1",
            "--backlog",
            "8",
            "--static-root",
            "/srv/www",
            "--workers",
            "3",
            "--read-timeout",
            "1",
        ]);
        let config = ServerConfig::from(cli);

        assert_eq!(config.socket_addr(), "127.0.0.1:9090".parse().unwrap());
        assert_eq!(config.backlog, 8);
        assert_eq!(config.static_root, PathBuf::from("/srv/www"));
        assert_eq!(config.workers, Some(3));
        assert_eq!(config.read_timeout, Duration::from_secs(1));
    }

    #[test]
    fn unknown_arguments_do_not_hide_later_options() {
        assert_eq!(parse(&["nano-server", "--foo", "-p", "9090"]).unwrap().port, 9090);
        assert_eq!(parse(&["nano-server", "extra", "-p", "9090"]).unwrap().port, 9090);
        assert_eq!(parse(&["nano-server", "-p", "9090", "--foo"]).unwrap().port, 9090);

        let cli = parse(&["nano-server", "-x", "--port=81", "stray", "--workers", "2", "--verbose"]).unwrap();
        assert_eq!(cli.port, 81);
        assert_eq!(cli.workers, Some(2));
    }

    #[test]
    fn inline_short_value() {
        assert_eq!(parse(&["nano-server", "-p8181"]).unwrap().port, 8181);
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = parse(&["nano-server", "-p", "abc"]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ValueValidation | ErrorKind::InvalidValue));
    }

    #[test]
    fn help_is_kept() {
        let args = retain_known_args(["nano-server", "--bogus", "--help"].map(OsString::from));
        assert_eq!(args, ["nano-server", "--help"].map(OsString::from));

        let err = parse(&["nano-server", "--bogus", "-h"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }
}
