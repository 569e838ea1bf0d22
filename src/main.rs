use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;
use vminfo::*;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[derive(Parser, Debug)]
#[command(name = "vminfo", version, about = "Virtual machine configuration and performance report")]
struct Cli {
    /// Config file (defaults to $CONFIG_FILE, then ./config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a report for one or more virtual machines
    Report {
        /// Virtual machine name(s), comma separated
        #[arg(long = "vm", required = true)]
        vm: String,

        /// Lookback window in minutes
        #[arg(long)]
        interval: Option<u32>,

        #[arg(long, value_enum, default_value_t = render::OutputFormat::Console)]
        format: render::OutputFormat,

        #[command(flatten)]
        endpoint: EndpointArgs,
    },
    /// Serve the HTML report front end
    Serve {
        #[command(flatten)]
        endpoint: EndpointArgs,
    },
}

/// Endpoint overrides; applied on top of the config file.
#[derive(clap::Args, Debug)]
struct EndpointArgs {
    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    #[arg(long)]
    user: Option<String>,

    #[arg(long, env = config::PASSWORD_ENV, hide_env_values = true)]
    password: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long)]
    insecure: bool,
}

impl EndpointArgs {
    fn apply(self, config: &mut config::AppConfig) -> Result<()> {
        if let Some(host) = self.host {
            config.endpoint.host = host;
        }
        if let Some(port) = self.port {
            config.endpoint.port = port;
        }
        if let Some(user) = self.user {
            config.endpoint.user = user;
        }
        if let Some(password) = self.password {
            config.endpoint.password = Some(password);
        }
        if self.insecure {
            config.endpoint.skip_cert_verification = true;
        }
        config.validate()
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<config::AppConfig> {
    match path {
        Some(p) => config::AppConfig::load_from_path(p),
        None => config::AppConfig::load(),
    }
}

/// Interactive fallback when no password was configured; only on a terminal.
fn prompt_password(prompt: &str) -> Result<String> {
    if !std::io::stdin().is_terminal() {
        return Err(config::missing_password());
    }
    Ok(rpassword::prompt_password(prompt)?)
}

async fn connect(app_config: &config::AppConfig) -> Result<Arc<session::Session>> {
    let options = app_config.connection_options_with(prompt_password)?;
    let session = session::Session::connect(&options).await?;
    Ok(Arc::new(session))
}

async fn run_report(
    app_config: &config::AppConfig,
    vm: &str,
    interval: Option<u32>,
    format: render::OutputFormat,
) -> Result<i32> {
    let names = report::parse_target_names(vm);
    anyhow::ensure!(!names.is_empty(), "--vm must name at least one virtual machine");
    let lookback = interval.unwrap_or(app_config.report.default_lookback_minutes);
    anyhow::ensure!(lookback > 0, "--interval must be > 0");

    let session = connect(app_config).await?;
    let options = report::ReportOptions::from_config(app_config);
    let outcomes = report::report_targets(&session, &names, lookback, &options).await?;

    let renderer = format.renderer();
    println!("{}", renderer.render_batch(&outcomes));

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed > 0 {
        tracing::warn!(failed, total = outcomes.len(), "some reports failed");
        return Ok(2);
    }
    Ok(0)
}

async fn run_server(app_config: config::AppConfig) -> Result<()> {
    let session = connect(&app_config).await?;
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let app = routes::app(session, app_config);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut app_config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Report {
            vm,
            interval,
            format,
            endpoint,
        } => {
            endpoint.apply(&mut app_config)?;
            let code = run_report(&app_config, &vm, interval, format).await?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Command::Serve { endpoint } => {
            endpoint.apply(&mut app_config)?;
            run_server(app_config).await?;
        }
    }
    Ok(())
}
