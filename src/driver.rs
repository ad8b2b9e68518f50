use crate::{
    Config, Error, McpClient, Report, Reporter, Result, Step, ToolOutput, types::preview,
};
use std::{future::Future, io};
use tokio_util::sync::CancellationToken;

/// Runs the smoke test: connect, list tools, call one tool, report.
pub struct Driver<W = io::Stdout> {
    config: Config,
    reporter: Reporter<W>,
    cancel: CancellationToken,
}

impl<W: io::Write> Driver<W> {
    pub fn new(config: Config, reporter: Reporter<W>) -> Self {
        Self {
            config,
            reporter,
            cancel: CancellationToken::new(),
        }
    }

    /// Abort whichever step is in flight once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn reporter(&self) -> &Reporter<W> {
        &self.reporter
    }

    /// Connect to the configured server and exercise it
    pub async fn run(&mut self) -> Result<Report> {
        let connect = McpClient::connect(&self.config.transport);
        let result = match self.step(Step::Connect, connect).await {
            Ok(client) => self.exercise_and_close(client).await,
            Err(err) => Err(err),
        };
        self.finish(result)
    }

    /// Exercise an already connected client, closing it afterwards
    pub async fn run_with(&mut self, client: McpClient) -> Result<Report> {
        let result = self.exercise_and_close(client).await;
        self.finish(result)
    }

    async fn exercise_and_close(&mut self, mut client: McpClient) -> Result<Report> {
        let result = self.exercise(&mut client).await;
        client.shutdown().await;
        result
    }

    /// Logs and reports the outcome of a run
    fn finish(&mut self, result: Result<Report>) -> Result<Report> {
        match &result {
            Ok(report) => tracing::info!(tool = %report.tool, "smoke test passed"),
            Err(err) => {
                tracing::error!(kind = ?err.kind(), "smoke test failed: {err}");
                self.reporter.failure(err);
            }
        }
        result
    }

    async fn exercise(&mut self, client: &mut McpClient) -> Result<Report> {
        self.reporter.listing();
        self.step(Step::ListTools, client.refresh_tools()).await?;

        let tools = client.tool_names();
        self.reporter.tools(&tools);

        let tool = self.config.tool.clone();
        if !client.has_tool(&tool) {
            return Err(Error::ToolNotAdvertised {
                tool,
                available: tools,
            });
        }

        self.reporter.calling(&tool);
        let call = client.call_tool(&tool, self.config.arguments.clone());
        let output = self.step(Step::CallTool, call).await?;
        let text = first_text(&tool, &output)?;

        let report = Report {
            server: client
                .server_info()
                .map(|info| format!("{} v{}", info.server_info.name, info.server_info.version)),
            tools,
            preview: preview(text, self.config.preview_chars).to_string(),
            tool,
        };
        self.reporter.success(&report);
        Ok(report)
    }

    /// Await `fut`, bounded by the configured timeout and the cancellation token
    async fn step<T, F>(&self, step: Step, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tracing::info!(%step, "starting");

        let bounded = async {
            match self.config.timeout {
                Some(timeout) => tokio::time::timeout(timeout, fut)
                    .await
                    .map_err(|_| Error::Timeout { step, timeout })?,
                None => fut.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled(step)),
            result = bounded => result,
        }
    }
}

/// The text of the first content part of a successful tool result
fn first_text<'a>(tool: &str, output: &'a ToolOutput) -> Result<&'a str> {
    if output.is_error() {
        return Err(Error::ToolFailed {
            tool: tool.to_string(),
            message: output.joined_text(),
        });
    }

    let first = output
        .content
        .first()
        .ok_or_else(|| Error::EmptyContent(tool.to_string()))?;

    match first.text.as_deref() {
        Some("") => Err(Error::EmptyContent(tool.to_string())),
        Some(text) => Ok(text),
        None => Err(Error::NonTextContent {
            tool: tool.to_string(),
            kind: first.kind.clone(),
        }),
    }
}
