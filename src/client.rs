use crate::{Error, Result, ServerParams, Step, ToolOutput, Transport};
use rmcp::{
    RoleClient, ServiceExt,
    model::{
        CallToolRequestParam, ClientCapabilities, ClientInfo, Implementation, ServerInfo, Tool,
    },
    service::RunningService,
    transport::{IntoTransport, StreamableHttpClientTransport, TokioChildProcess},
};
use serde_json::{Map, Value};
use tokio::process::Command;

type Session = RunningService<RoleClient, ClientInfo>;

/// MCP Client for interacting with MCP servers
pub struct McpClient {
    session: Session,
    tools: Vec<Tool>,
}

impl McpClient {
    /// Start or reach the server described by `transport` and perform the
    /// initialize handshake
    pub async fn connect(transport: &Transport) -> Result<Self> {
        match transport {
            Transport::Stdio(params) => {
                tracing::info!(command = %params.display(), "starting server process");
                let child =
                    TokioChildProcess::new(command(params)).map_err(|source| Error::Spawn {
                        command: params.display(),
                        source,
                    })?;
                Self::with_transport(child).await
            }
            Transport::Http { url } => {
                tracing::info!(%url, "connecting to server");
                let transport = StreamableHttpClientTransport::from_uri(url.to_string());
                Self::with_transport(transport).await
            }
        }
    }

    /// Perform the handshake over an already established transport
    pub async fn with_transport<T, E, A>(transport: T) -> Result<Self>
    where
        T: IntoTransport<RoleClient, E, A>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let session = client_info()
            .serve(transport)
            .await
            .map_err(Error::Handshake)?;

        if let Some(info) = session.peer_info() {
            tracing::info!(
                server = %info.server_info.name,
                version = %info.server_info.version,
                protocol = %info.protocol_version,
                "session initialized"
            );
        }

        Ok(Self {
            session,
            tools: vec![],
        })
    }

    /// Get server information
    pub fn server_info(&self) -> Option<&ServerInfo> {
        self.session.peer_info()
    }

    /// Refresh the list of available tools from the server
    pub async fn refresh_tools(&mut self) -> Result<()> {
        self.tools = self
            .session
            .list_all_tools()
            .await
            .map_err(|source| Error::Request {
                step: Step::ListTools,
                source,
            })?;

        tracing::debug!(count = self.tools.len(), "listed tools");
        Ok(())
    }

    /// Names of the tools from the last refresh, in server order
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|tool| tool.name.to_string()).collect()
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|tool| tool.name == name)
    }

    /// Call a tool with the given arguments
    pub async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> Result<ToolOutput> {
        tracing::debug!(tool = name, ?arguments, "calling tool");

        let result = self
            .session
            .call_tool(CallToolRequestParam {
                name: name.to_string().into(),
                arguments: Some(arguments),
            })
            .await
            .map_err(|source| Error::Request {
                step: Step::CallTool,
                source,
            })?;

        let output = serde_json::from_value(serde_json::to_value(result)?)?;
        Ok(output)
    }

    /// End the session. For stdio servers this also reaps the child.
    pub async fn shutdown(self) {
        match self.session.cancel().await {
            Ok(reason) => tracing::debug!(?reason, "session closed"),
            Err(err) => tracing::warn!("failed to close session: {err}"),
        }
    }
}

fn client_info() -> ClientInfo {
    ClientInfo {
        protocol_version: Default::default(),
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    }
}

fn command(params: &ServerParams) -> Command {
    let mut cmd = Command::new(&params.command);
    cmd.args(&params.args);
    if let Some(env) = &params.env {
        cmd.envs(env);
    }
    if let Some(dir) = &params.cwd {
        cmd.current_dir(dir);
    }
    cmd
}
