use super::xml::{
    events::{BytesDecl, BytesStart, Event},
    Element, FromXml, ToXml, Writer, XmlReader,
};
use super::{Error, Fault, Request, Transport};

use bytes::Buf;
use std::io::{BufRead, BufReader, Cursor, Read, Write};
use std::sync::Arc;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoapVersion {
    V11,
    V12,
}

pub struct Client {
    transport: Arc<dyn Transport>,
    endpoint: Url,
    version: SoapVersion,
    headers: Vec<Element>,
}

#[derive(Debug)]
pub struct Envelope<T> {
    version: SoapVersion,
    headers: Vec<Element>,
    body: T,
}

impl SoapVersion {
    pub fn envelope_namespace(self) -> &'static str {
        match self {
            SoapVersion::V11 => "http://schemas.xmlsoap.org/soap/envelope/",
            SoapVersion::V12 => "http://www.w3.org/2003/05/soap-envelope",
        }
    }

    pub fn from_envelope_namespace(namespace: &str) -> Option<Self> {
        [SoapVersion::V11, SoapVersion::V12]
            .into_iter()
            .find(|version| version.envelope_namespace() == namespace)
    }

    pub fn content_type(self, action: Option<&str>) -> String {
        match (self, action) {
            (SoapVersion::V11, _) => "text/xml; charset=utf-8".into(),
            (SoapVersion::V12, Some(action)) => {
                format!("application/soap+xml; charset=utf-8; action=\"{}\"", action)
            }
            (SoapVersion::V12, None) => "application/soap+xml; charset=utf-8".into(),
        }
    }
}

impl Client {
    pub fn new(transport: Arc<dyn Transport>, endpoint: Url, version: SoapVersion) -> Self {
        Self {
            transport,
            endpoint,
            version,
            headers: Vec::new(),
        }
    }

    /// Adds a SOAP header element sent with every request.
    pub fn with_header(mut self, header: Element) -> Self {
        self.headers.push(header);
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn version(&self) -> SoapVersion {
        self.version
    }

    /// Sends `body` as the single child of the SOAP body and returns the
    /// single child of the response body.
    pub fn send(&self, action: Option<&str>, body: Element) -> Result<Element, Error> {
        let operation = body.name.clone();
        let envelope = Envelope::new(self.version, body).with_headers(self.headers.clone());
        let content_type = self.version.content_type(action);

        let request = Request {
            url: &self.endpoint,
            content_type: &content_type,
            soap_action: match self.version {
                SoapVersion::V11 => Some(action.unwrap_or_default()),
                SoapVersion::V12 => None,
            },
            body: envelope.to_request()?,
        };

        debug!(%operation, endpoint = %self.endpoint, "sending SOAP request");
        let response = self.transport.post(request)?;
        let success = (200..300).contains(&response.status);

        match Envelope::<Element>::from_response(response.body.clone().reader()) {
            Ok(envelope) => {
                let body = envelope.into_body();

                if body.name == "Fault" {
                    Err(Fault::from_element(&body).into())
                } else if success {
                    Ok(body)
                } else {
                    Err(Error::Status {
                        status: response.status,
                        body: String::from_utf8_lossy(&response.body).into_owned(),
                    })
                }
            }

            Err(_) if !success => Err(Error::Status {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            }),

            Err(err) => Err(err),
        }
    }
}

impl<T> Envelope<T> {
    pub fn new(version: SoapVersion, body: T) -> Self {
        Self {
            version,
            headers: Vec::new(),
            body,
        }
    }

    pub fn with_headers(mut self, headers: Vec<Element>) -> Self {
        self.headers = headers;
        self
    }

    pub fn version(&self) -> SoapVersion {
        self.version
    }

    pub fn headers(&self) -> &[Element] {
        &self.headers
    }

    pub fn into_body(self) -> T {
        self.body
    }
}

impl<T: ToXml> Envelope<T> {
    pub fn to_request(&self) -> Result<Vec<u8>, Error> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        writer.write_event(Event::Decl(BytesDecl::new(b"1.0", Some(&b"utf-8"[..]), None)))?;
        self.to_xml(&mut writer)?;
        Ok(writer.into_inner().into_inner())
    }
}

impl<T: FromXml> Envelope<T> {
    pub fn from_response<R: Read>(read: R) -> Result<Self, Error> {
        let mut reader = XmlReader::new(BufReader::new(read));
        Self::from_xml(&mut reader)
    }
}

impl<T: ToXml> ToXml for Envelope<T> {
    fn to_xml<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), Error> {
        let envelope = BytesStart::owned_name("soap:Envelope")
            .with_attributes([("xmlns:soap", self.version.envelope_namespace())]);
        let header = BytesStart::owned_name("soap:Header");
        let body = BytesStart::owned_name("soap:Body");

        writer.write_event(Event::Start(envelope.to_borrowed()))?;

        if !self.headers.is_empty() {
            writer.write_event(Event::Start(header.to_borrowed()))?;
            for element in &self.headers {
                element.to_xml(writer)?;
            }
            writer.write_event(Event::End(header.to_end()))?;
        }

        writer.write_event(Event::Start(body.to_borrowed()))?;
        self.body.to_xml(writer)?;
        writer.write_event(Event::End(body.to_end()))?;
        writer.write_event(Event::End(envelope.to_end()))?;

        Ok(())
    }
}

impl<T: FromXml> FromXml for Envelope<T> {
    fn from_xml<R: BufRead>(reader: &mut XmlReader<R>) -> Result<Self, Error> {
        let envelope = reader.expect_start("Envelope")?;
        let version = envelope
            .namespace
            .as_deref()
            .and_then(SoapVersion::from_envelope_namespace)
            .unwrap_or(SoapVersion::V11);

        let mut headers = Vec::new();

        match reader.next_start()? {
            Some(start) if start.name == "Header" => {
                headers = reader.read_element(start)?.into_children();
                reader.expect_start("Body")?;
            }
            Some(start) if start.name == "Body" => (),
            Some(start) => {
                return Err(Error::UnexpectedElement {
                    expected: "Body".into(),
                    found: start.name,
                })
            }
            None => {
                return Err(Error::UnexpectedElement {
                    expected: "Body".into(),
                    found: "end of element".into(),
                })
            }
        }

        let body = T::from_xml(reader)?;
        reader.expect_end()?;
        reader.expect_end()?;

        Ok(Self {
            version,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HttpResponse;
    use bytes::Bytes;

    struct Canned(u16, &'static str);

    impl Transport for Canned {
        fn get(&self, _: &Url) -> Result<Bytes, Error> {
            unreachable!()
        }

        fn post(&self, _: Request<'_>) -> Result<HttpResponse, Error> {
            Ok(HttpResponse {
                status: self.0,
                body: Bytes::from_static(self.1.as_bytes()),
            })
        }
    }

    /// Keeps the content type and `SOAPAction` of each request.
    #[derive(Default)]
    struct Headers(std::sync::Mutex<Vec<(String, Option<String>)>>);

    impl Transport for Headers {
        fn get(&self, _: &Url) -> Result<Bytes, Error> {
            unreachable!()
        }

        fn post(&self, request: Request<'_>) -> Result<HttpResponse, Error> {
            self.0.lock().unwrap().push((
                request.content_type.to_owned(),
                request.soap_action.map(str::to_owned),
            ));

            Ok(HttpResponse {
                status: 200,
                body: Bytes::from_static(
                    br#"<s:Envelope xmlns:s="http://www.w3.org/2003/05/soap-envelope"><s:Body><ListTMsResponse/></s:Body></s:Envelope>"#,
                ),
            })
        }
    }

    fn client(status: u16, body: &'static str) -> Client {
        Client::new(
            Arc::new(Canned(status, body)),
            Url::parse("http://localhost:8080/memoqservices/tm").unwrap(),
            SoapVersion::V11,
        )
    }

    #[test]
    fn writes_envelope_with_headers() {
        let envelope = Envelope::new(
            SoapVersion::V11,
            Element::named("ListTMs").with_namespace("urn:memoq"),
        )
        .with_headers(vec![Element::new("ApiKey", "secret")]);

        let request = String::from_utf8(envelope.to_request().unwrap()).unwrap();

        assert_eq!(
            request,
            concat!(
                r#"<?xml version="1.0" encoding="utf-8"?>"#,
                r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
                r#"<soap:Header><ApiKey>secret</ApiKey></soap:Header>"#,
                r#"<soap:Body><ListTMs xmlns="urn:memoq"></ListTMs></soap:Body>"#,
                r#"</soap:Envelope>"#
            )
        );
    }

    #[test]
    fn content_type_carries_soap12_action() {
        assert_eq!(
            SoapVersion::V11.content_type(Some("urn:memoq/ListTMs")),
            "text/xml; charset=utf-8"
        );
        assert_eq!(
            SoapVersion::V12.content_type(Some("urn:memoq/ListTMs")),
            r#"application/soap+xml; charset=utf-8; action="urn:memoq/ListTMs""#
        );
        assert_eq!(
            SoapVersion::V12.content_type(None),
            "application/soap+xml; charset=utf-8"
        );
    }

    #[test]
    fn soap_action_header_is_only_sent_for_soap11() {
        let transport = Arc::new(Headers::default());
        let endpoint = Url::parse("http://localhost:8080/memoqservices/tm").unwrap();

        for version in [SoapVersion::V11, SoapVersion::V12] {
            Client::new(transport.clone(), endpoint.clone(), version)
                .send(Some("urn:memoq/ListTMs"), Element::named("ListTMs"))
                .unwrap();
        }
        Client::new(transport.clone(), endpoint, SoapVersion::V11)
            .send(None, Element::named("ListTMs"))
            .unwrap();

        let sent = transport.0.lock().unwrap();
        assert_eq!(sent[0].1.as_deref(), Some("urn:memoq/ListTMs"));
        assert_eq!(
            sent[1],
            (
                r#"application/soap+xml; charset=utf-8; action="urn:memoq/ListTMs""#.to_owned(),
                None
            )
        );
        assert_eq!(sent[2].1.as_deref(), Some(""));
    }

    #[test]
    fn reads_soap12_envelope_with_header() {
        let response = r#"<s:Envelope xmlns:s="http://www.w3.org/2003/05/soap-envelope">
            <s:Header><Trace xmlns="urn:x">1</Trace></s:Header>
            <s:Body><GetApiVersionResponse xmlns="urn:memoq">
                <GetApiVersionResult>9.12.8</GetApiVersionResult>
            </GetApiVersionResponse></s:Body>
        </s:Envelope>"#;

        let envelope = Envelope::<Element>::from_response(response.as_bytes()).unwrap();

        assert_eq!(envelope.version(), SoapVersion::V12);
        assert_eq!(envelope.headers()[0].name, "Trace");
        let body = envelope.into_body();
        assert_eq!(body.name, "GetApiVersionResponse");
        assert_eq!(
            body.child("GetApiVersionResult").and_then(Element::text),
            Some("9.12.8")
        );
    }

    #[test]
    fn decodes_faults_from_error_responses() {
        let fault = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body>
            <s:Fault>
                <faultcode>s:Client</faultcode>
                <faultstring xml:lang="en-US">No project with the given guid.</faultstring>
                <detail><UnexpectedFault xmlns="urn:memoq"><ErrorCode>NoSuchProject</ErrorCode></UnexpectedFault></detail>
            </s:Fault>
        </s:Body></s:Envelope>"#;

        match client(500, fault).send(None, Element::named("GetProject")) {
            Err(Error::Fault(fault)) => {
                assert_eq!(fault.code, "s:Client");
                assert_eq!(fault.message, "No project with the given guid.");
                assert_eq!(fault.actor, None);
                let detail = fault.detail.unwrap();
                assert_eq!(detail.children()[0].name, "UnexpectedFault");
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn non_soap_error_responses_keep_status() {
        match client(503, "Service Unavailable").send(None, Element::named("ListTMs")) {
            Err(Error::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "Service Unavailable");
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
