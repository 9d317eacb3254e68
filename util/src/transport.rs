use std::time::Duration;

use bytes::Bytes;
use reqwest::blocking::Client as Reqwest;
use tracing::trace;
use url::Url;

use crate::Error;

/// An outgoing SOAP request.
#[derive(Debug, Clone)]
pub struct Request<'a> {
    pub url: &'a Url,
    pub content_type: &'a str,
    /// Value of the SOAP 1.1 `SOAPAction` header. SOAP 1.2 carries the
    /// action inside `content_type` instead.
    pub soap_action: Option<&'a str>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

/// Moves bytes between the client and a server.
///
/// Each call to [`Transport::post`] is one round-trip; implementations must
/// not cache responses.
pub trait Transport: Send + Sync {
    /// Fetches a WSDL or XSD document.
    fn get(&self, url: &Url) -> Result<Bytes, Error>;

    fn post(&self, request: Request<'_>) -> Result<HttpResponse, Error>;
}

/// Blocking HTTP transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Reqwest,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self, Error> {
        let mut builder = Reqwest::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url) -> Result<Bytes, Error> {
        let response = self.client.get(url.clone()).send()?.error_for_status()?;
        Ok(response.bytes()?)
    }

    fn post(&self, request: Request<'_>) -> Result<HttpResponse, Error> {
        let mut builder = self
            .client
            .post(request.url.clone())
            .header(reqwest::header::CONTENT_TYPE, request.content_type)
            .body(request.body);

        if let Some(action) = request.soap_action {
            builder = builder.header("SOAPAction", format!("\"{}\"", action));
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        trace!(status, url = %request.url, "received response");

        Ok(HttpResponse {
            status,
            body: response.bytes()?,
        })
    }
}
