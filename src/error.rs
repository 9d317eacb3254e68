use thiserror::Error;

use crate::ServiceKind;

/// Everything a call can fail with.
///
/// Transport failures, HTTP errors and SOAP faults arrive in
/// [`Error::Soap`] exactly as the SOAP runtime reported them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid URL")]
    Url(#[from] url::ParseError),

    #[error("Unable to load WSDL")]
    Wsdl(#[from] memoq_wsdl::error::Error),

    #[error(transparent)]
    Soap(#[from] memoq_util::Error),

    #[error("The {service} service has no operation named {operation}")]
    UnknownOperation {
        service: ServiceKind,
        operation: String,
    },

    #[error("{operation} returned no result")]
    MissingResult { operation: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unable to convert response")]
    Json(#[from] serde_json::Error),
}
