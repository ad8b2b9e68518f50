use serde_json::{Map, Value, json};
use std::{collections::BTreeMap, path::PathBuf, time::Duration};
use url::Url;

/// Tool invoked when nothing else is configured
pub const DEFAULT_TOOL: &str = "query_knowledge_base";

/// Query sent to the default tool
pub const DEFAULT_QUERY: &str = "What is AWS Strands?";

/// Number of characters of the response that get printed
pub const DEFAULT_PREVIEW_CHARS: usize = 200;

/// How a server process is launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerParams {
    /// Executable to run
    pub command: String,

    /// Arguments passed to the executable
    pub args: Vec<String>,

    /// Extra environment variables for the child. `None` inherits the
    /// parent environment untouched.
    pub env: Option<BTreeMap<String, String>>,

    /// Working directory for the child
    pub cwd: Option<PathBuf>,
}

impl ServerParams {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: vec![],
            env: None,
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Renders the command line for log and error messages
    pub fn display(&self) -> String {
        let mut line = self.command.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl Default for ServerParams {
    fn default() -> Self {
        // Relative to the server project's test directory
        Self::new("python").arg("../src/mcp_bedrock_kb/server.py")
    }
}

/// Transport type for MCP connections
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// Launch the server as a subprocess and talk over its stdio
    Stdio(ServerParams),
    /// Connect to a streamable HTTP endpoint
    Http { url: Url },
}

impl Default for Transport {
    fn default() -> Self {
        Self::Stdio(ServerParams::default())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Where the server under test lives
    pub transport: Transport,

    /// Name of the tool to invoke
    pub tool: String,

    /// Arguments for the tool call
    pub arguments: Map<String, Value>,

    /// Upper bound for each step. `None` waits indefinitely.
    pub timeout: Option<Duration>,

    /// Maximum number of characters of the response to print
    pub preview_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            tool: DEFAULT_TOOL.to_string(),
            arguments: query_arguments(DEFAULT_QUERY),
            timeout: Some(Duration::from_secs(60)),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_server(self, params: ServerParams) -> Self {
        self.with_transport(Transport::Stdio(params))
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.arguments = query_arguments(query);
        self
    }

    pub fn with_arguments(mut self, arguments: Map<String, Value>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }
}

fn query_arguments(query: impl Into<String>) -> Map<String, Value> {
    let mut arguments = Map::new();
    arguments.insert("query".to_string(), json!(query.into()));
    arguments
}
