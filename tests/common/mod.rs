#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use memoq::{Config, MEMOQ_NAMESPACE};
use memoq_util::{Bytes, HttpResponse, Request, Transport};
use url::Url;

/// Host the generated WSDL advertises in `soap:address`. Calls must never
/// reach it.
pub const WSDL_HOST: &str = "memoq-internal";

const SOAP11_BINDING: &str = "http://schemas.xmlsoap.org/wsdl/soap/";
const SOAP12_BINDING: &str = "http://schemas.xmlsoap.org/wsdl/soap12/";

const OPERATIONS: &[&str] = &[
    "GetApiVersion",
    "ListProjects",
    "GetProject",
    "ListTMs",
    "DeleteTM",
    "ListTBs",
    "ListUsers",
    "ListGroups",
    "ListCorpora",
];

#[derive(Debug, Clone)]
pub struct Recorded {
    pub url: Url,
    pub content_type: String,
    pub soap_action: Option<String>,
    pub body: String,
}

/// Serves a generated WSDL for every GET and canned responses, in order,
/// for every POST.
#[derive(Default)]
pub struct MockTransport {
    fetched: Mutex<Vec<Url>>,
    posted: Mutex<Vec<Recorded>>,
    responses: Mutex<VecDeque<Result<HttpResponse, memoq_util::Error>>>,
    soap12: bool,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Serves WSDLs whose only binding is SOAP 1.2.
    pub fn soap12_only() -> Arc<Self> {
        Arc::new(Self {
            soap12: true,
            ..Self::default()
        })
    }

    pub fn respond(&self, status: u16, body: String) {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: Bytes::from(body),
        }));
    }

    /// Queues a successful response whose `{operation}Result` is `result`,
    /// raw XML included.
    pub fn respond_with(&self, operation: &str, result: &str) {
        self.respond(200, envelope(&format!(
            r#"<{op}Response xmlns="{ns}"><{op}Result>{result}</{op}Result></{op}Response>"#,
            op = operation,
            ns = MEMOQ_NAMESPACE,
            result = result,
        )));
    }

    pub fn fail_with(&self, error: memoq_util::Error) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn posted(&self) -> Vec<Recorded> {
        self.posted.lock().unwrap().clone()
    }

    pub fn fetched(&self) -> Vec<Url> {
        self.fetched.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &Url) -> Result<Bytes, memoq_util::Error> {
        self.fetched.lock().unwrap().push(url.clone());

        let service = url
            .path_segments()
            .and_then(|segments| segments.last())
            .unwrap_or("unknown");

        let binding = if self.soap12 {
            SOAP12_BINDING
        } else {
            SOAP11_BINDING
        };

        Ok(Bytes::from(wsdl(service, binding)))
    }

    fn post(&self, request: Request<'_>) -> Result<HttpResponse, memoq_util::Error> {
        self.posted.lock().unwrap().push(Recorded {
            url: request.url.clone(),
            content_type: request.content_type.to_owned(),
            soap_action: request.soap_action.map(str::to_owned),
            body: String::from_utf8(request.body).unwrap(),
        });

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no response queued for {}", request.url))
    }
}

/// A config for a host no other test uses, so the process-wide WSDL cache
/// starts empty for it.
pub fn config(host: &str) -> Config {
    Config::new(&format!("http://{}.memoq.test:8080", host)).unwrap()
}

pub fn envelope(body: &str) -> String {
    format!(
        concat!(
            r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">"#,
            r#"<s:Body>{}</s:Body></s:Envelope>"#
        ),
        body
    )
}

pub fn action(service: &str, operation: &str) -> String {
    format!("{}/I{}Service/{}", MEMOQ_NAMESPACE, service, operation)
}

/// A WCF-style WSDL with every operation of [`OPERATIONS`], its `soap`
/// prefix bound to `binding`.
pub fn wsdl(service: &str, binding_namespace: &str) -> String {
    let mut messages = String::new();
    let mut port_type = String::new();
    let mut binding = String::new();

    for operation in OPERATIONS {
        messages += &format!(
            r#"<wsdl:message name="I{s}Service_{op}_InputMessage"><wsdl:part name="parameters" element="tns:{op}"/></wsdl:message>
               <wsdl:message name="I{s}Service_{op}_OutputMessage"><wsdl:part name="parameters" element="tns:{op}Response"/></wsdl:message>"#,
            s = service,
            op = operation,
        );
        port_type += &format!(
            r#"<wsdl:operation name="{op}">
                 <wsdl:input message="tns:I{s}Service_{op}_InputMessage"/>
                 <wsdl:output message="tns:I{s}Service_{op}_OutputMessage"/>
               </wsdl:operation>"#,
            s = service,
            op = operation,
        );
        binding += &format!(
            r#"<wsdl:operation name="{op}">
                 <soap:operation soapAction="{action}" style="document"/>
                 <wsdl:input><soap:body use="literal"/></wsdl:input>
                 <wsdl:output><soap:body use="literal"/></wsdl:output>
               </wsdl:operation>"#,
            op = operation,
            action = action(service, operation),
        );
    }

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<wsdl:definitions name="{s}Service" targetNamespace="{ns}"
    xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/"
    xmlns:soap="{soap}"
    xmlns:tns="{ns}">
  <wsdl:types/>
  {messages}
  <wsdl:portType name="I{s}Service">{port_type}</wsdl:portType>
  <wsdl:binding name="BasicHttpBinding_I{s}Service" type="tns:I{s}Service">
    <soap:binding transport="http://schemas.xmlsoap.org/soap/http"/>
    {binding}
  </wsdl:binding>
  <wsdl:service name="{s}Service">
    <wsdl:port name="BasicHttpBinding_I{s}Service" binding="tns:BasicHttpBinding_I{s}Service">
      <soap:address location="http://{host}:8080/memoqservices/{s}/{s}Service"/>
    </wsdl:port>
  </wsdl:service>
</wsdl:definitions>"#,
        s = service,
        ns = MEMOQ_NAMESPACE,
        host = WSDL_HOST,
        soap = binding_namespace,
        messages = messages,
        port_type = port_type,
        binding = binding,
    )
}
