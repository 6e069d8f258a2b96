use shopware_api::ApiError;
use shopware_util::JsonParseError;
use thiserror::Error;

use crate::tools::arguments::InputError;

/// Why a tool operation could not produce its normal result.
///
/// Every variant renders to the text the agent sees; none of them is a
/// protocol fault.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Input(#[from] InputError),

    /// Upstream answered with a status outside the operation's success set.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Token fetch or transport failure.
    #[error("{context}: {source}")]
    Request {
        context: String,
        #[source]
        source: ApiError,
    },

    /// Success status, but the body was not the JSON we need.
    #[error("{context}: {source}")]
    Response {
        context: String,
        #[source]
        source: JsonParseError,
    },
}

impl ToolError {
    pub(crate) fn upstream(status: u16, message: String) -> Self {
        ToolError::Upstream { status, message }
    }

    pub(crate) fn request(context: impl Into<String>) -> impl FnOnce(ApiError) -> Self {
        let context = context.into();
        move |source| ToolError::Request { context, source }
    }

    pub(crate) fn response(context: impl Into<String>) -> impl FnOnce(JsonParseError) -> Self {
        let context = context.into();
        move |source| ToolError::Response { context, source }
    }

    /// Short category label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Input(_) => "input",
            ToolError::Upstream { .. } => "upstream",
            ToolError::Request { .. } => "request",
            ToolError::Response { .. } => "response",
        }
    }
}

/// Collapse an operation result into the text returned to the caller.
pub fn into_message(result: Result<String, ToolError>) -> String {
    result.unwrap_or_else(|error| error.to_string())
}
