//! palaver - MCP (Model Context Protocol) client session library
//!
//! A Rust implementation of the client side of the MCP 2025-03-26
//! specification: a duplex, concurrency-aware protocol engine over an
//! abstract transport.
//!
//! # Features
//!
//! - **Session**: handshake gating, request/response correlation with
//!   per-request timeouts, and protocol-level cancellation
//! - **Inbound requests**: capability-gated handlers for ping, roots
//!   listing, and sampling, run off the receive loop
//! - **Notifications**: a consumer-visible queue of parsed server
//!   notifications
//! - **Transports**: bring your own via the [`Transport`] trait, or spawn a
//!   server over stdio with [`StdioTransport`]
//!
//! # Example
//!
//! ```rust,ignore
//! use palaver::{ClientCapabilities, ClientSession, Implementation, StdioTransport};
//!
//! let transport = StdioTransport::spawn("my-mcp-server".into(), vec![], None)?;
//! let session = ClientSession::new(
//!     transport,
//!     Implementation::new("my-host", "1.0.0"),
//!     ClientCapabilities::default(),
//!     None,
//!     vec![],
//! );
//!
//! let info = session.initialize(None, None).await?;
//! println!("connected to {}", info.server_info.name);
//!
//! let (tools, _) = session
//!     .typed_request(palaver::ListToolsRequest::default(), None, None)
//!     .await?;
//! session.stop().await;
//! ```

pub mod session;
pub mod transport;
pub mod types;

// Re-export the session surface at the crate root
pub use session::{
    ClientSession, McpError, Notifications, SamplingHandler, SessionError,
    DEFAULT_REQUEST_TIMEOUT,
};

// Re-export transport types
pub use transport::{Metadata, StdioTransport, Transport, TransportError, TransportMessage};

// Re-export commonly used protocol types
pub use types::common::{
    CancelledNotification, EmptyResult, PingRequest, ProgressNotification,
};
pub use types::completion::{
    CompleteRequest, CompleteResult, Completion, CompletionArgument, CompletionReference,
};
pub use types::content::{
    Annotations, BlobResourceContents, Content, ResourceContents, TextResourceContents,
};
pub use types::error::{
    ErrorData, ProtocolError, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST,
    METHOD_NOT_FOUND, PARSE_ERROR,
};
pub use types::initialize::{
    ClientCapabilities, Implementation, InitializeRequest, InitializeResult,
    InitializedNotification, PromptsCapability, ResourcesCapability, RootsCapability,
    ServerCapabilities, ToolsCapability, PROTOCOL_VERSION,
};
pub use types::jsonrpc::{
    JsonRpcError, JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse,
    RequestId, JSONRPC_VERSION,
};
pub use types::logging::{LogLevel, LoggingMessageNotification, SetLevelRequest};
pub use types::prompt::{
    GetPromptRequest, GetPromptResult, ListPromptsRequest, ListPromptsResult, Prompt,
    PromptArgument, PromptMessage,
};
pub use types::resource::{
    ListResourceTemplatesRequest, ListResourceTemplatesResult, ListResourcesRequest,
    ListResourcesResult, ReadResourceRequest, ReadResourceResult, Resource, ResourceTemplate,
    SubscribeRequest, UnsubscribeRequest,
};
pub use types::roots::{ListRootsRequest, ListRootsResult, Root};
pub use types::sampling::{
    CreateMessageRequest, CreateMessageResult, IncludeContext, ModelHint, ModelPreferences,
    SamplingMessage,
};
pub use types::tool::{
    CallToolRequest, CallToolResult, ListToolsRequest, ListToolsResult, Tool, ToolAnnotations,
    ToolSchema,
};
pub use types::unions::{
    methods, ClientNotification, ClientRequest, ClientResult, McpNotification, McpRequest,
    ServerNotification, ServerRequest,
};
pub use types::{ProgressToken, RequestMeta, Role};
