use std::fmt;

use thiserror::Error;

use crate::xml::Element;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("Server responded with HTTP status {status}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Fault(#[from] Fault),

    #[error("Error parsing XML")]
    Xml(#[from] quick_xml::Error),

    #[error("Expected element {expected}, found {found}")]
    UnexpectedElement { expected: String, found: String },

    #[error("Unexpected end of document")]
    UnexpectedEof,
}

/// A SOAP fault as reported by the server.
///
/// SOAP 1.1 (`faultcode`/`faultstring`) and SOAP 1.2 (`Code/Value`,
/// `Reason/Text`) faults are both decoded into this shape. Nothing is
/// rewritten: code and message are the server's own text.
#[derive(Debug, Clone, PartialEq)]
pub struct Fault {
    pub code: String,
    pub message: String,
    pub actor: Option<String>,
    pub detail: Option<Element>,
}

impl Fault {
    pub fn from_element(fault: &Element) -> Self {
        let code = fault
            .child("faultcode")
            .and_then(Element::text)
            .or_else(|| {
                fault
                    .child("Code")
                    .and_then(|code| code.child("Value"))
                    .and_then(Element::text)
            })
            .unwrap_or_default()
            .to_owned();

        let message = fault
            .child("faultstring")
            .and_then(Element::text)
            .or_else(|| {
                fault
                    .child("Reason")
                    .and_then(|reason| reason.child("Text"))
                    .and_then(Element::text)
            })
            .unwrap_or_default()
            .to_owned();

        let actor = fault
            .child("faultactor")
            .or_else(|| fault.child("Role"))
            .and_then(Element::text)
            .map(ToOwned::to_owned);

        let detail = fault
            .child("detail")
            .or_else(|| fault.child("Detail"))
            .cloned();

        Self {
            code,
            message,
            actor,
            detail,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SOAP fault {}: {}", self.code, self.message)
    }
}

impl std::error::Error for Fault {}
