use std::{fmt, str::FromStr, sync::Arc};

use memoq_util::{
    soap::{Client, SoapVersion},
    xml::{Content, Element},
    Transport,
};
use memoq_wsdl::{cache, rebase, ResolvedOperation, ResolvedPort};
use tracing::debug;
use url::Url;

use crate::{Config, Error, Response};

/// Namespace of memoQ's service and data contracts.
pub const MEMOQ_NAMESPACE: &str = "http://kilgray.com/memoqservices/2007";

/// Namespace of serialized arrays of primitives (`string[]`, `int[]`).
pub const ARRAYS_NAMESPACE: &str = "http://schemas.microsoft.com/2003/10/Serialization/Arrays";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    ServerProject,
    Tm,
    Tb,
    FileManager,
    Security,
    /// Enterprise license management (ELM).
    License,
    LiveDocs,
    /// Light resources: segmentation rules, QA settings, templates and so on.
    Resource,
    /// Asynchronous tasks started by other services.
    Tasks,
}

/// One remote service bound to its endpoint.
///
/// Holds the operations resolved from the service's WSDL and a SOAP client
/// pointed at the endpoint derived from the configured base URL.
pub struct WebService {
    kind: ServiceKind,
    port: ResolvedPort,
    client: Client,
}

/// Behaviour shared by every service wrapper.
pub trait Service: Sized {
    const KIND: ServiceKind;

    fn connect_with(config: &Config, transport: Arc<dyn Transport>) -> Result<Self, Error>;

    fn web_service(&self) -> &WebService;

    /// Invokes any operation the service's WSDL declares, by its remote name.
    fn call(&self, operation: &str, args: Vec<Element>) -> Result<Response, Error> {
        self.web_service().call(operation, args)
    }

    fn get_api_version(&self) -> Result<String, Error> {
        self.call("GetApiVersion", Vec::new())?.into_text()
    }

    fn operations(&self) -> Vec<&str> {
        self.web_service().operations().collect()
    }

    fn endpoint(&self) -> &Url {
        self.web_service().endpoint()
    }
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 9] = [
        ServiceKind::ServerProject,
        ServiceKind::Tm,
        ServiceKind::Tb,
        ServiceKind::FileManager,
        ServiceKind::Security,
        ServiceKind::License,
        ServiceKind::LiveDocs,
        ServiceKind::Resource,
        ServiceKind::Tasks,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ServiceKind::ServerProject => "serverproject",
            ServiceKind::Tm => "tm",
            ServiceKind::Tb => "tb",
            ServiceKind::FileManager => "filemanager",
            ServiceKind::Security => "security",
            ServiceKind::License => "elm",
            ServiceKind::LiveDocs => "livedocs",
            ServiceKind::Resource => "resource",
            ServiceKind::Tasks => "tasks",
        }
    }

    pub fn path(self) -> String {
        format!("/memoqservices/{}", self.name())
    }

    /// Where the service publishes its WSDL. The path replaces any path
    /// already on `base_url`.
    pub fn wsdl_url(self, base_url: &Url) -> Result<Url, url::ParseError> {
        base_url.join(&format!("{}?wsdl", self.path()))
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ServiceKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.to_ascii_lowercase();

        ServiceKind::ALL
            .into_iter()
            .find(|kind| kind.name() == value)
            .or(match value.as_str() {
                "license" => Some(ServiceKind::License),
                "lightresource" | "resources" => Some(ServiceKind::Resource),
                _ => None,
            })
            .ok_or_else(|| format!("unknown service {:?}", value))
    }
}

impl WebService {
    /// Loads the service's WSDL (cached per URL for the life of the
    /// process) and binds a client to the endpoint on the configured host.
    pub fn connect(
        kind: ServiceKind,
        config: &Config,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, Error> {
        let base_url = config.base_url();
        let definition = cache::load(&kind.wsdl_url(base_url)?, transport.as_ref())?;
        let port = definition.resolve_port(SoapVersion::V11)?;

        let endpoint = match &port.location {
            Some(location) => rebase(base_url, &base_url.join(location)?),
            None => base_url.join(&kind.path())?,
        };

        debug!(service = %kind, %endpoint, operations = port.operations.len(), "bound service");

        let mut client = Client::new(transport, endpoint, port.version);
        if let Some(api_key) = config.api_key() {
            client = client.with_header(Element::new("ApiKey", api_key));
        }

        Ok(Self { kind, port, client })
    }

    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    pub fn endpoint(&self) -> &Url {
        self.client.endpoint()
    }

    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.port
            .operations
            .iter()
            .map(|operation| operation.name.as_str())
    }

    pub fn operation(&self, name: &str) -> Option<&ResolvedOperation> {
        self.port.operation(name)
    }

    pub fn call(&self, operation: &str, args: Vec<Element>) -> Result<Response, Error> {
        let resolved = self
            .port
            .operation(operation)
            .ok_or_else(|| Error::UnknownOperation {
                service: self.kind,
                operation: operation.to_owned(),
            })?;

        let request = Element::new(resolved.input.name.as_str(), Content::Elements(args))
            .with_namespace(resolved.input.namespace.as_str());

        let response = self.client.send(resolved.action.as_deref(), request)?;
        Ok(Response::new(operation, response))
    }
}

impl fmt::Debug for WebService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebService")
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint().as_str())
            .field("version", &self.port.version)
            .finish()
    }
}

/// Builds a serialized `string[]` argument, such as a list of language codes.
pub fn string_array<I, S>(values: I) -> Vec<Element>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values
        .into_iter()
        .map(|value| Element::new("string", value.into()).with_namespace(ARRAYS_NAMESPACE))
        .collect()
}
