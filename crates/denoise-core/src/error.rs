use std::fmt;
use std::path::PathBuf;

/// Engine-level errors used across the denoise SDK crates.
///
/// Contract rule: this type lives in `denoise-core` and is re-exported by the builder.
#[derive(Debug)]
pub enum EngineError {
    // ---- Host-facing ----
    /// A named socket the builder needs does not exist on a node.
    MissingSocket {
        node: String,
        socket: String,
    },

    /// A settings toggle could not be applied (e.g. no active view layer).
    UnsupportedHostState(String),

    // ---- Config ----
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    InvalidConfig {
        path: PathBuf,
        msg: String,
    },

    // ---- Graph contract ----
    Graph(String),

    // ---- Fallback ----
    Other(String),
}

impl EngineError {
    pub fn other<T: Into<String>>(s: T) -> Self {
        EngineError::Other(s.into())
    }

    pub fn graph<T: Into<String>>(s: T) -> Self {
        EngineError::Graph(s.into())
    }

    pub fn missing_socket(node: impl Into<String>, socket: impl Into<String>) -> Self {
        EngineError::MissingSocket {
            node: node.into(),
            socket: socket.into(),
        }
    }

    pub fn is_missing_socket(&self) -> bool {
        matches!(self, EngineError::MissingSocket { .. })
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::MissingSocket { node, socket } => {
                write!(f, "missing socket '{socket}' on {node} node")
            }
            EngineError::UnsupportedHostState(msg) => write!(f, "unsupported host state: {msg}"),

            EngineError::Io { path, source } => {
                write!(f, "io error at {}: {}", path.display(), source)
            }
            EngineError::Json { path, source } => {
                write!(f, "json parse error at {}: {}", path.display(), source)
            }
            EngineError::InvalidConfig { path, msg } => {
                write!(f, "invalid config at {}: {}", path.display(), msg)
            }

            EngineError::Graph(msg) => write!(f, "graph error: {msg}"),

            EngineError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Io { source, .. } => Some(source),
            EngineError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}
