use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to parse provided URL")]
    UrlParseError(#[from] url::ParseError),

    #[error("Unable to convert provided path")]
    PathConversionError(Option<std::io::Error>),

    #[error("Unable to open file")]
    FileOpenError(quick_xml::Error),

    #[error("Unable to get document from server")]
    TransportError(#[from] memoq_util::Error),

    #[error("Unsupported URL scheme {0}")]
    UnsupportedScheme(String),

    #[error("Error parsing XML input")]
    XmlParseError(#[from] quick_xml::Error),

    #[error("Element {element} is missing attribute {attribute}")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Undeclared namespace prefix {0}")]
    UnknownPrefix(String),

    #[error("No SOAP port found in WSDL")]
    NoSoapPort,
}
