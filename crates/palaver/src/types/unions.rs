//! Protocol Sums
//!
//! Closed, method-discriminated unions over the concrete request,
//! notification, and result types, plus the wire conversion helpers shared
//! by all of them.
//!
//! The wire form of a request or notification is `{"method": M, "params": P}`
//! with `params` omitted when empty. Decoding is a table lookup from method
//! to variant; unknown methods surface as [`ProtocolError::UnknownMethod`],
//! which the inbound path answers with METHOD_NOT_FOUND.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::common::{CancelledNotification, EmptyResult, PingRequest, ProgressNotification};
use super::completion::{CompleteRequest, CompleteResult};
use super::error::ProtocolError;
use super::initialize::{
    InitializeRequest, InitializeResult, InitializedNotification,
};
use super::logging::{LoggingMessageNotification, SetLevelRequest};
use super::prompt::{
    GetPromptRequest, GetPromptResult, ListPromptsRequest, ListPromptsResult,
    PromptListChangedNotification,
};
use super::resource::{
    ListResourceTemplatesRequest, ListResourceTemplatesResult, ListResourcesRequest,
    ListResourcesResult, ReadResourceRequest, ReadResourceResult,
    ResourceListChangedNotification, ResourceUpdatedNotification, SubscribeRequest,
    UnsubscribeRequest,
};
use super::roots::{ListRootsRequest, ListRootsResult, RootsListChangedNotification};
use super::sampling::{CreateMessageRequest, CreateMessageResult};
use super::tool::{
    CallToolRequest, CallToolResult, ListToolsRequest, ListToolsResult,
    ToolListChangedNotification,
};

/// The protocol's method strings. Free constants so dispatch tables can use
/// them in match patterns.
pub mod methods {
    pub const PING: &str = "ping";
    pub const INITIALIZE: &str = "initialize";
    pub const TOOLS_LIST: &str = "tools/list";
    pub const TOOLS_CALL: &str = "tools/call";
    pub const RESOURCES_LIST: &str = "resources/list";
    pub const RESOURCES_TEMPLATES_LIST: &str = "resources/templates/list";
    pub const RESOURCES_READ: &str = "resources/read";
    pub const RESOURCES_SUBSCRIBE: &str = "resources/subscribe";
    pub const RESOURCES_UNSUBSCRIBE: &str = "resources/unsubscribe";
    pub const PROMPTS_LIST: &str = "prompts/list";
    pub const PROMPTS_GET: &str = "prompts/get";
    pub const COMPLETION_COMPLETE: &str = "completion/complete";
    pub const LOGGING_SET_LEVEL: &str = "logging/setLevel";
    pub const ROOTS_LIST: &str = "roots/list";
    pub const SAMPLING_CREATE_MESSAGE: &str = "sampling/createMessage";

    pub const NOTIFICATION_CANCELLED: &str = "notifications/cancelled";
    pub const NOTIFICATION_PROGRESS: &str = "notifications/progress";
    pub const NOTIFICATION_INITIALIZED: &str = "notifications/initialized";
    pub const NOTIFICATION_ROOTS_LIST_CHANGED: &str = "notifications/roots/list_changed";
    pub const NOTIFICATION_MESSAGE: &str = "notifications/message";
    pub const NOTIFICATION_RESOURCES_UPDATED: &str = "notifications/resources/updated";
    pub const NOTIFICATION_RESOURCES_LIST_CHANGED: &str =
        "notifications/resources/list_changed";
    pub const NOTIFICATION_TOOLS_LIST_CHANGED: &str = "notifications/tools/list_changed";
    pub const NOTIFICATION_PROMPTS_LIST_CHANGED: &str = "notifications/prompts/list_changed";
}

/// A concrete MCP request type: its method string and its paired result.
pub trait McpRequest: Serialize + DeserializeOwned {
    const METHOD: &'static str;
    type Result: Serialize + DeserializeOwned;
}

/// A concrete MCP notification type and its method string.
pub trait McpNotification: Serialize + DeserializeOwned {
    const METHOD: &'static str;
}

impl McpRequest for PingRequest {
    const METHOD: &'static str = methods::PING;
    type Result = EmptyResult;
}

impl McpRequest for InitializeRequest {
    const METHOD: &'static str = methods::INITIALIZE;
    type Result = InitializeResult;
}

impl McpRequest for ListToolsRequest {
    const METHOD: &'static str = methods::TOOLS_LIST;
    type Result = ListToolsResult;
}

impl McpRequest for CallToolRequest {
    const METHOD: &'static str = methods::TOOLS_CALL;
    type Result = CallToolResult;
}

impl McpRequest for ListResourcesRequest {
    const METHOD: &'static str = methods::RESOURCES_LIST;
    type Result = ListResourcesResult;
}

impl McpRequest for ListResourceTemplatesRequest {
    const METHOD: &'static str = methods::RESOURCES_TEMPLATES_LIST;
    type Result = ListResourceTemplatesResult;
}

impl McpRequest for ReadResourceRequest {
    const METHOD: &'static str = methods::RESOURCES_READ;
    type Result = ReadResourceResult;
}

impl McpRequest for SubscribeRequest {
    const METHOD: &'static str = methods::RESOURCES_SUBSCRIBE;
    type Result = EmptyResult;
}

impl McpRequest for UnsubscribeRequest {
    const METHOD: &'static str = methods::RESOURCES_UNSUBSCRIBE;
    type Result = EmptyResult;
}

impl McpRequest for ListPromptsRequest {
    const METHOD: &'static str = methods::PROMPTS_LIST;
    type Result = ListPromptsResult;
}

impl McpRequest for GetPromptRequest {
    const METHOD: &'static str = methods::PROMPTS_GET;
    type Result = GetPromptResult;
}

impl McpRequest for CompleteRequest {
    const METHOD: &'static str = methods::COMPLETION_COMPLETE;
    type Result = CompleteResult;
}

impl McpRequest for SetLevelRequest {
    const METHOD: &'static str = methods::LOGGING_SET_LEVEL;
    type Result = EmptyResult;
}

impl McpRequest for ListRootsRequest {
    const METHOD: &'static str = methods::ROOTS_LIST;
    type Result = ListRootsResult;
}

impl McpRequest for CreateMessageRequest {
    const METHOD: &'static str = methods::SAMPLING_CREATE_MESSAGE;
    type Result = CreateMessageResult;
}

impl McpNotification for CancelledNotification {
    const METHOD: &'static str = methods::NOTIFICATION_CANCELLED;
}

impl McpNotification for ProgressNotification {
    const METHOD: &'static str = methods::NOTIFICATION_PROGRESS;
}

impl McpNotification for InitializedNotification {
    const METHOD: &'static str = methods::NOTIFICATION_INITIALIZED;
}

impl McpNotification for RootsListChangedNotification {
    const METHOD: &'static str = methods::NOTIFICATION_ROOTS_LIST_CHANGED;
}

impl McpNotification for LoggingMessageNotification {
    const METHOD: &'static str = methods::NOTIFICATION_MESSAGE;
}

impl McpNotification for ResourceUpdatedNotification {
    const METHOD: &'static str = methods::NOTIFICATION_RESOURCES_UPDATED;
}

impl McpNotification for ResourceListChangedNotification {
    const METHOD: &'static str = methods::NOTIFICATION_RESOURCES_LIST_CHANGED;
}

impl McpNotification for ToolListChangedNotification {
    const METHOD: &'static str = methods::NOTIFICATION_TOOLS_LIST_CHANGED;
}

impl McpNotification for PromptListChangedNotification {
    const METHOD: &'static str = methods::NOTIFICATION_PROMPTS_LIST_CHANGED;
}

/// Encode a params body, collapsing an empty object to absence.
fn params_value<T: Serialize>(
    kind: &'static str,
    body: &T,
) -> Result<Option<Value>, ProtocolError> {
    let value =
        serde_json::to_value(body).map_err(|source| ProtocolError::Encode { kind, source })?;
    match value {
        Value::Object(ref map) if map.is_empty() => Ok(None),
        other => Ok(Some(other)),
    }
}

/// Decode a params body, treating absence as an empty object.
fn from_params<T: DeserializeOwned>(
    method: &str,
    params: Option<&Value>,
) -> Result<T, ProtocolError> {
    let value = params.cloned().unwrap_or_else(|| Value::Object(Map::new()));
    serde_json::from_value(value).map_err(|source| ProtocolError::InvalidParams {
        method: method.to_string(),
        source,
    })
}

/// Compose the `{"method", "params"?}` wire shape.
fn wire_shape(method: &str, params: Option<Value>) -> Value {
    let mut obj = Map::new();
    obj.insert("method".to_string(), Value::String(method.to_string()));
    if let Some(params) = params {
        obj.insert("params".to_string(), params);
    }
    Value::Object(obj)
}

/// Split a `{"method", "params"?}` wire shape.
fn shape_parts(value: &Value) -> Result<(&str, Option<&Value>), ProtocolError> {
    let obj = value.as_object().ok_or(ProtocolError::NotAnObject)?;
    let method = obj
        .get("method")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::Unclassifiable)?;
    Ok((method, obj.get("params")))
}

/// Encode a result body to its wire form.
pub fn result_to_protocol<T: Serialize>(result: &T) -> Result<Value, ProtocolError> {
    serde_json::to_value(result).map_err(|source| ProtocolError::Encode {
        kind: "result",
        source,
    })
}

/// Decode a result body from its wire form.
pub fn result_from_protocol<T: DeserializeOwned>(value: &Value) -> Result<T, ProtocolError> {
    serde_json::from_value(value.clone()).map_err(ProtocolError::InvalidResult)
}

/// Requests the client sends to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientRequest {
    Ping(PingRequest),
    Initialize(InitializeRequest),
    ListTools(ListToolsRequest),
    CallTool(CallToolRequest),
    ListResources(ListResourcesRequest),
    ListResourceTemplates(ListResourceTemplatesRequest),
    ReadResource(ReadResourceRequest),
    Subscribe(SubscribeRequest),
    Unsubscribe(UnsubscribeRequest),
    ListPrompts(ListPromptsRequest),
    GetPrompt(GetPromptRequest),
    Complete(CompleteRequest),
    SetLevel(SetLevelRequest),
}

impl ClientRequest {
    /// The method string for this request.
    pub fn method(&self) -> &'static str {
        match self {
            ClientRequest::Ping(_) => PingRequest::METHOD,
            ClientRequest::Initialize(_) => InitializeRequest::METHOD,
            ClientRequest::ListTools(_) => ListToolsRequest::METHOD,
            ClientRequest::CallTool(_) => CallToolRequest::METHOD,
            ClientRequest::ListResources(_) => ListResourcesRequest::METHOD,
            ClientRequest::ListResourceTemplates(_) => ListResourceTemplatesRequest::METHOD,
            ClientRequest::ReadResource(_) => ReadResourceRequest::METHOD,
            ClientRequest::Subscribe(_) => SubscribeRequest::METHOD,
            ClientRequest::Unsubscribe(_) => UnsubscribeRequest::METHOD,
            ClientRequest::ListPrompts(_) => ListPromptsRequest::METHOD,
            ClientRequest::GetPrompt(_) => GetPromptRequest::METHOD,
            ClientRequest::Complete(_) => CompleteRequest::METHOD,
            ClientRequest::SetLevel(_) => SetLevelRequest::METHOD,
        }
    }

    /// The method string and encoded params, ready for an envelope.
    pub fn wire_parts(&self) -> Result<(&'static str, Option<Value>), ProtocolError> {
        let method = self.method();
        let params = match self {
            ClientRequest::Ping(r) => params_value(method, r)?,
            ClientRequest::Initialize(r) => params_value(method, r)?,
            ClientRequest::ListTools(r) => params_value(method, r)?,
            ClientRequest::CallTool(r) => params_value(method, r)?,
            ClientRequest::ListResources(r) => params_value(method, r)?,
            ClientRequest::ListResourceTemplates(r) => params_value(method, r)?,
            ClientRequest::ReadResource(r) => params_value(method, r)?,
            ClientRequest::Subscribe(r) => params_value(method, r)?,
            ClientRequest::Unsubscribe(r) => params_value(method, r)?,
            ClientRequest::ListPrompts(r) => params_value(method, r)?,
            ClientRequest::GetPrompt(r) => params_value(method, r)?,
            ClientRequest::Complete(r) => params_value(method, r)?,
            ClientRequest::SetLevel(r) => params_value(method, r)?,
        };
        Ok((method, params))
    }

    /// Wire form: `{"method": .., "params"?: ..}`.
    pub fn to_protocol(&self) -> Result<Value, ProtocolError> {
        let (method, params) = self.wire_parts()?;
        Ok(wire_shape(method, params))
    }

    /// Decode from a method string and params.
    pub fn from_parts(method: &str, params: Option<&Value>) -> Result<Self, ProtocolError> {
        Ok(match method {
            methods::PING => ClientRequest::Ping(from_params(method, params)?),
            methods::INITIALIZE => ClientRequest::Initialize(from_params(method, params)?),
            methods::TOOLS_LIST => ClientRequest::ListTools(from_params(method, params)?),
            methods::TOOLS_CALL => ClientRequest::CallTool(from_params(method, params)?),
            methods::RESOURCES_LIST => {
                ClientRequest::ListResources(from_params(method, params)?)
            }
            methods::RESOURCES_TEMPLATES_LIST => {
                ClientRequest::ListResourceTemplates(from_params(method, params)?)
            }
            methods::RESOURCES_READ => {
                ClientRequest::ReadResource(from_params(method, params)?)
            }
            methods::RESOURCES_SUBSCRIBE => {
                ClientRequest::Subscribe(from_params(method, params)?)
            }
            methods::RESOURCES_UNSUBSCRIBE => {
                ClientRequest::Unsubscribe(from_params(method, params)?)
            }
            methods::PROMPTS_LIST => ClientRequest::ListPrompts(from_params(method, params)?),
            methods::PROMPTS_GET => ClientRequest::GetPrompt(from_params(method, params)?),
            methods::COMPLETION_COMPLETE => {
                ClientRequest::Complete(from_params(method, params)?)
            }
            methods::LOGGING_SET_LEVEL => ClientRequest::SetLevel(from_params(method, params)?),
            other => return Err(ProtocolError::UnknownMethod(other.to_string())),
        })
    }

    /// Decode from the `{"method", "params"?}` wire shape.
    pub fn from_protocol(value: &Value) -> Result<Self, ProtocolError> {
        let (method, params) = shape_parts(value)?;
        Self::from_parts(method, params)
    }
}

/// Notifications the client sends to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientNotification {
    Cancelled(CancelledNotification),
    Progress(ProgressNotification),
    Initialized(InitializedNotification),
    RootsListChanged(RootsListChangedNotification),
}

impl ClientNotification {
    /// The method string for this notification.
    pub fn method(&self) -> &'static str {
        match self {
            ClientNotification::Cancelled(_) => CancelledNotification::METHOD,
            ClientNotification::Progress(_) => ProgressNotification::METHOD,
            ClientNotification::Initialized(_) => InitializedNotification::METHOD,
            ClientNotification::RootsListChanged(_) => RootsListChangedNotification::METHOD,
        }
    }

    /// The method string and encoded params, ready for an envelope.
    pub fn wire_parts(&self) -> Result<(&'static str, Option<Value>), ProtocolError> {
        let method = self.method();
        let params = match self {
            ClientNotification::Cancelled(n) => params_value(method, n)?,
            ClientNotification::Progress(n) => params_value(method, n)?,
            ClientNotification::Initialized(n) => params_value(method, n)?,
            ClientNotification::RootsListChanged(n) => params_value(method, n)?,
        };
        Ok((method, params))
    }

    /// Wire form: `{"method": .., "params"?: ..}`.
    pub fn to_protocol(&self) -> Result<Value, ProtocolError> {
        let (method, params) = self.wire_parts()?;
        Ok(wire_shape(method, params))
    }

    /// Decode from a method string and params.
    pub fn from_parts(method: &str, params: Option<&Value>) -> Result<Self, ProtocolError> {
        Ok(match method {
            methods::NOTIFICATION_CANCELLED => {
                ClientNotification::Cancelled(from_params(method, params)?)
            }
            methods::NOTIFICATION_PROGRESS => {
                ClientNotification::Progress(from_params(method, params)?)
            }
            methods::NOTIFICATION_INITIALIZED => {
                ClientNotification::Initialized(from_params(method, params)?)
            }
            methods::NOTIFICATION_ROOTS_LIST_CHANGED => {
                ClientNotification::RootsListChanged(from_params(method, params)?)
            }
            other => return Err(ProtocolError::UnknownMethod(other.to_string())),
        })
    }

    /// Decode from the `{"method", "params"?}` wire shape.
    pub fn from_protocol(value: &Value) -> Result<Self, ProtocolError> {
        let (method, params) = shape_parts(value)?;
        Self::from_parts(method, params)
    }
}

/// Requests the server sends to the client.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerRequest {
    Ping(PingRequest),
    ListRoots(ListRootsRequest),
    CreateMessage(Box<CreateMessageRequest>),
}

impl ServerRequest {
    /// The method string for this request.
    pub fn method(&self) -> &'static str {
        match self {
            ServerRequest::Ping(_) => PingRequest::METHOD,
            ServerRequest::ListRoots(_) => ListRootsRequest::METHOD,
            ServerRequest::CreateMessage(_) => CreateMessageRequest::METHOD,
        }
    }

    /// Decode from a method string and params.
    pub fn from_parts(method: &str, params: Option<&Value>) -> Result<Self, ProtocolError> {
        Ok(match method {
            methods::PING => ServerRequest::Ping(from_params(method, params)?),
            methods::ROOTS_LIST => ServerRequest::ListRoots(from_params(method, params)?),
            methods::SAMPLING_CREATE_MESSAGE => {
                ServerRequest::CreateMessage(Box::new(from_params(method, params)?))
            }
            other => return Err(ProtocolError::UnknownMethod(other.to_string())),
        })
    }

    /// Decode from the `{"method", "params"?}` wire shape.
    pub fn from_protocol(value: &Value) -> Result<Self, ProtocolError> {
        let (method, params) = shape_parts(value)?;
        Self::from_parts(method, params)
    }
}

/// Notifications the server sends to the client.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerNotification {
    Cancelled(CancelledNotification),
    Progress(ProgressNotification),
    LoggingMessage(LoggingMessageNotification),
    ResourceUpdated(ResourceUpdatedNotification),
    ResourceListChanged(ResourceListChangedNotification),
    ToolListChanged(ToolListChangedNotification),
    PromptListChanged(PromptListChangedNotification),
}

impl ServerNotification {
    /// The method string for this notification.
    pub fn method(&self) -> &'static str {
        match self {
            ServerNotification::Cancelled(_) => CancelledNotification::METHOD,
            ServerNotification::Progress(_) => ProgressNotification::METHOD,
            ServerNotification::LoggingMessage(_) => LoggingMessageNotification::METHOD,
            ServerNotification::ResourceUpdated(_) => ResourceUpdatedNotification::METHOD,
            ServerNotification::ResourceListChanged(_) => {
                ResourceListChangedNotification::METHOD
            }
            ServerNotification::ToolListChanged(_) => ToolListChangedNotification::METHOD,
            ServerNotification::PromptListChanged(_) => PromptListChangedNotification::METHOD,
        }
    }

    /// Decode from a method string and params.
    pub fn from_parts(method: &str, params: Option<&Value>) -> Result<Self, ProtocolError> {
        Ok(match method {
            methods::NOTIFICATION_CANCELLED => {
                ServerNotification::Cancelled(from_params(method, params)?)
            }
            methods::NOTIFICATION_PROGRESS => {
                ServerNotification::Progress(from_params(method, params)?)
            }
            methods::NOTIFICATION_MESSAGE => {
                ServerNotification::LoggingMessage(from_params(method, params)?)
            }
            methods::NOTIFICATION_RESOURCES_UPDATED => {
                ServerNotification::ResourceUpdated(from_params(method, params)?)
            }
            methods::NOTIFICATION_RESOURCES_LIST_CHANGED => {
                ServerNotification::ResourceListChanged(from_params(method, params)?)
            }
            methods::NOTIFICATION_TOOLS_LIST_CHANGED => {
                ServerNotification::ToolListChanged(from_params(method, params)?)
            }
            methods::NOTIFICATION_PROMPTS_LIST_CHANGED => {
                ServerNotification::PromptListChanged(from_params(method, params)?)
            }
            other => return Err(ProtocolError::UnknownMethod(other.to_string())),
        })
    }

    /// Decode from the `{"method", "params"?}` wire shape.
    pub fn from_protocol(value: &Value) -> Result<Self, ProtocolError> {
        let (method, params) = shape_parts(value)?;
        Self::from_parts(method, params)
    }
}

/// Results the client sends back for server-initiated requests.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientResult {
    Empty(EmptyResult),
    ListRoots(ListRootsResult),
    CreateMessage(Box<CreateMessageResult>),
}

impl ClientResult {
    /// Wire form of the result body.
    pub fn to_protocol(&self) -> Result<Value, ProtocolError> {
        match self {
            ClientResult::Empty(r) => result_to_protocol(r),
            ClientResult::ListRoots(r) => result_to_protocol(r),
            ClientResult::CreateMessage(r) => result_to_protocol(r.as_ref()),
        }
    }
}

impl From<PingRequest> for ClientRequest {
    fn from(r: PingRequest) -> Self {
        ClientRequest::Ping(r)
    }
}

impl From<InitializeRequest> for ClientRequest {
    fn from(r: InitializeRequest) -> Self {
        ClientRequest::Initialize(r)
    }
}

impl From<ListToolsRequest> for ClientRequest {
    fn from(r: ListToolsRequest) -> Self {
        ClientRequest::ListTools(r)
    }
}

impl From<CallToolRequest> for ClientRequest {
    fn from(r: CallToolRequest) -> Self {
        ClientRequest::CallTool(r)
    }
}

impl From<ListResourcesRequest> for ClientRequest {
    fn from(r: ListResourcesRequest) -> Self {
        ClientRequest::ListResources(r)
    }
}

impl From<ListResourceTemplatesRequest> for ClientRequest {
    fn from(r: ListResourceTemplatesRequest) -> Self {
        ClientRequest::ListResourceTemplates(r)
    }
}

impl From<ReadResourceRequest> for ClientRequest {
    fn from(r: ReadResourceRequest) -> Self {
        ClientRequest::ReadResource(r)
    }
}

impl From<SubscribeRequest> for ClientRequest {
    fn from(r: SubscribeRequest) -> Self {
        ClientRequest::Subscribe(r)
    }
}

impl From<UnsubscribeRequest> for ClientRequest {
    fn from(r: UnsubscribeRequest) -> Self {
        ClientRequest::Unsubscribe(r)
    }
}

impl From<ListPromptsRequest> for ClientRequest {
    fn from(r: ListPromptsRequest) -> Self {
        ClientRequest::ListPrompts(r)
    }
}

impl From<GetPromptRequest> for ClientRequest {
    fn from(r: GetPromptRequest) -> Self {
        ClientRequest::GetPrompt(r)
    }
}

impl From<CompleteRequest> for ClientRequest {
    fn from(r: CompleteRequest) -> Self {
        ClientRequest::Complete(r)
    }
}

impl From<SetLevelRequest> for ClientRequest {
    fn from(r: SetLevelRequest) -> Self {
        ClientRequest::SetLevel(r)
    }
}

impl From<CancelledNotification> for ClientNotification {
    fn from(n: CancelledNotification) -> Self {
        ClientNotification::Cancelled(n)
    }
}

impl From<ProgressNotification> for ClientNotification {
    fn from(n: ProgressNotification) -> Self {
        ClientNotification::Progress(n)
    }
}

impl From<InitializedNotification> for ClientNotification {
    fn from(n: InitializedNotification) -> Self {
        ClientNotification::Initialized(n)
    }
}

impl From<RootsListChangedNotification> for ClientNotification {
    fn from(n: RootsListChangedNotification) -> Self {
        ClientNotification::RootsListChanged(n)
    }
}
