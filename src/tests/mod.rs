//! End-to-end tests of the driver against an in-process MCP server.


use crate::{Config, Driver, McpClient, Reporter};
use rmcp::{
    ServiceExt,
    handler::server::{
        ServerHandler,
        tool::{Parameters, ToolRouter},
    },
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use std::time::Duration;

type McpResult<T = (), E = rmcp::model::ErrorData> = core::result::Result<T, E>;

pub const STRANDS: &str = "Strands Agents is an open source SDK that takes a model-driven \
approach to building and running AI agents in just a few lines of code.";

/// How the fixture answers `query_knowledge_base`
#[derive(Debug, Clone)]
pub enum Answer {
    /// A single text part
    Text(String),
    /// Repeat the query back
    Echo,
    /// A successful result with no content parts
    Empty,
    /// A single image part
    Image,
    /// A result flagged with `isError`
    Fail(String),
    /// Never answer
    Stall,
}

/// Stand-in for the knowledge base server
#[derive(Clone)]
pub struct KnowledgeBase {
    answer: Answer,
    tool_router: ToolRouter<Self>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
struct Query {
    #[schemars(description = "Natural language question for the knowledge base")]
    query: String,
}

#[tool_router]
impl KnowledgeBase {
    pub fn new(answer: Answer) -> Self {
        Self {
            answer,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Query the knowledge base with a natural language question")]
    async fn query_knowledge_base(
        &self,
        Parameters(params): Parameters<Query>,
    ) -> McpResult<CallToolResult> {
        let result = match &self.answer {
            Answer::Text(text) => CallToolResult::success(vec![Content::text(text.clone())]),
            Answer::Echo => {
                CallToolResult::success(vec![Content::text(format!("You asked: {}", params.query))])
            }
            Answer::Empty => CallToolResult::success(vec![]),
            Answer::Image => {
                CallToolResult::success(vec![Content::image("iVBORw0KGgo=", "image/png")])
            }
            Answer::Fail(message) => CallToolResult::error(vec![Content::text(message.clone())]),
            Answer::Stall => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                CallToolResult::success(vec![])
            }
        };
        Ok(result)
    }
}

#[tool_handler]
impl ServerHandler for KnowledgeBase {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "knowledge-base".to_string(),
                version: "0.0.1".to_string(),
            },
            ..Default::default()
        }
    }
}

/// Start a fixture server and return a client connected to it over a
/// duplex stream
pub async fn connect(answer: Answer) -> McpClient {
    let (client, stream) = tokio::io::duplex(1 << 17);

    tokio::spawn(async move {
        if let Ok(server) = KnowledgeBase::new(answer).serve(stream).await {
            let _ = server.waiting().await;
        }
    });

    McpClient::with_transport(client)
        .await
        .unwrap_or_else(|err| panic!("handshake with fixture failed: {err}"))
}

/// A driver that renders into memory without colors
pub fn driver(config: Config) -> Driver<Vec<u8>> {
    Driver::new(config, Reporter::new(Vec::new(), false))
}

pub fn output(driver: &Driver<Vec<u8>>) -> String {
    String::from_utf8(driver.reporter().get_ref().clone()).unwrap()
}
