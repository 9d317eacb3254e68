pub mod error;
pub mod soap;
pub mod transport;
pub mod xml;

pub use error::{Error, Fault};
pub use transport::{HttpResponse, HttpTransport, Request, Transport};

pub use bytes::Bytes;
