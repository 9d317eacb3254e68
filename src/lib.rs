//! Client for the memoQ server Web Service API.
//!
//! Each remote service has a wrapper ([`TmService`], [`ServerProjectService`]
//! and so on) that loads the service's WSDL from the server and forwards calls
//! to it. [`MemoQServer`] bundles the common lookups of one server.
//!
//! ```no_run
//! use memoq::{MemoQServer, Service, TmService};
//!
//! # fn main() -> Result<(), memoq::Error> {
//! let server = MemoQServer::new("http://localhost:8080")?;
//! println!("{}", server.summary()?);
//!
//! let tms = TmService::new("http://localhost:8080")?;
//! for tm in tms.list_tms(Some("eng"), None::<&str>)?.items() {
//!     println!("{}", memoq::to_value(tm));
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod response;
pub mod server;
pub mod service;
pub mod services;

pub use config::Config;
pub use error::Error;
pub use response::{to_map, to_value, to_values, Response};
pub use server::MemoQServer;
pub use service::{
    string_array, Service, ServiceKind, WebService, ARRAYS_NAMESPACE, MEMOQ_NAMESPACE,
};
pub use services::*;

pub use memoq_util::{
    xml::{Content, Element},
    Fault, HttpTransport, Transport,
};
