use anyhow::{Context, anyhow};
use clap::Parser;
use mcp_smoke::{
    Config, DEFAULT_PREVIEW_CHARS, DEFAULT_QUERY, DEFAULT_TOOL, Driver, Reporter, ServerParams,
    Transport,
};
use serde_json::{Map, Value};
use std::{path::PathBuf, process::ExitCode, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// Smoke test an MCP server: start it, list its tools and call one of them.
///
/// Without a COMMAND the knowledge base server is launched with
/// `python ../src/mcp_bedrock_kb/server.py`.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Extra environment variable for the server process
    #[arg(long = "env", value_name = "KEY=VALUE")]
    env: Vec<String>,

    /// Working directory for the server process
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Connect to a streamable HTTP endpoint instead of launching a process
    #[arg(long, env = "MCP_SMOKE_URL", conflicts_with_all = ["env", "cwd", "server"])]
    url: Option<Url>,

    /// Tool to invoke
    #[arg(long, env = "MCP_SMOKE_TOOL", default_value = DEFAULT_TOOL)]
    tool: String,

    /// Value of the `query` argument
    #[arg(long, env = "MCP_SMOKE_QUERY", default_value = DEFAULT_QUERY)]
    query: String,

    /// Full tool arguments as a JSON object, replaces --query
    #[arg(long, value_name = "JSON")]
    arguments: Option<String>,

    /// Per-step timeout in seconds, 0 waits forever
    #[arg(long, env = "MCP_SMOKE_TIMEOUT_SECS", default_value_t = 60)]
    timeout_secs: u64,

    /// Characters of the response to print
    #[arg(long, default_value_t = DEFAULT_PREVIEW_CHARS)]
    preview_chars: usize,

    /// Disable colored markers
    #[arg(long)]
    no_color: bool,

    /// Server command and its arguments
    #[arg(last = true, value_name = "COMMAND")]
    server: Vec<String>,
}

impl Args {
    fn config(&self) -> anyhow::Result<Config> {
        let transport = match &self.url {
            Some(url) => Transport::Http { url: url.clone() },
            None => Transport::Stdio(self.server_params()?),
        };

        let mut config = Config::new()
            .with_transport(transport)
            .with_tool(&self.tool)
            .with_query(&self.query)
            .with_timeout((self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)))
            .with_preview_chars(self.preview_chars);

        if let Some(arguments) = &self.arguments {
            let arguments: Map<String, Value> = serde_json::from_str(arguments)
                .context("--arguments must be a JSON object")?;
            config = config.with_arguments(arguments);
        }

        Ok(config)
    }

    fn server_params(&self) -> anyhow::Result<ServerParams> {
        let mut params = match self.server.split_first() {
            Some((command, args)) => ServerParams::new(command).args(args),
            None => ServerParams::default(),
        };

        for pair in &self.env {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| anyhow!("invalid --env {pair:?}, expected KEY=VALUE"))?;
            params = params.env(key, value);
        }

        if let Some(dir) = &self.cwd {
            params = params.cwd(dir);
        }

        Ok(params)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("warn,{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match args.config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!("running with config: {config:#?}");

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let mut driver =
        Driver::new(config, Reporter::stdout(!args.no_color)).with_cancellation(cancel);

    match driver.run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
