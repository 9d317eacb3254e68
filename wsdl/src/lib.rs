use std::path::Path;
use url::Url;

use memoq_util::Transport;

mod parser;
mod resolve;

pub mod cache;
pub mod error;
pub mod types;

pub use resolve::{rebase, QualifiedName, ResolvedOperation, ResolvedPort};

/// Parses the WSDL at `url`, following `wsdl:import`s. Relative input is
/// treated as a file path.
pub fn parse<S: AsRef<str>>(
    url: S,
    transport: &dyn Transport,
) -> Result<types::Definition, error::Error> {
    let url = {
        match Url::parse(url.as_ref()) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => Url::from_file_path(
                &Path::new(url.as_ref())
                    .canonicalize()
                    .map_err(|err| error::Error::PathConversionError(Some(err)))?,
            )
            .map_err(|()| error::Error::PathConversionError(None))?,
            Err(err) => return Err(err.into()),
        }
    };

    parser::parse(url, transport)
}
