use memoq_util::soap::SoapVersion;
use tracing::trace;
use url::Url;

use super::{
    error,
    types::{Binding, Definition, NamespacedName, Port, PortType, Service},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub namespace: String,
    pub name: String,
}

/// An operation joined with its binding: everything needed to call it.
#[derive(Debug, Clone)]
pub struct ResolvedOperation {
    pub name: String,
    pub action: Option<String>,
    pub documentation: Option<String>,
    /// Wrapper element of the request body.
    pub input: QualifiedName,
    pub output: Option<QualifiedName>,
}

#[derive(Debug, Clone)]
pub struct ResolvedPort {
    pub service: String,
    pub name: String,
    pub location: Option<String>,
    pub version: SoapVersion,
    pub operations: Vec<ResolvedOperation>,
}

/// Moves `location` onto the scheme, host and port of `base`, keeping its
/// path and query. Only applies when both are HTTP(S) URLs.
pub fn rebase(base: &Url, location: &Url) -> Url {
    let web = |url: &Url| matches!(url.scheme(), "http" | "https");

    if !(web(base) && web(location)) {
        return location.clone();
    }

    let mut rebased = base.clone();
    rebased.set_path(location.path());
    rebased.set_query(location.query());
    rebased.set_fragment(None);
    rebased
}

impl ResolvedPort {
    pub fn operation(&self, name: &str) -> Option<&ResolvedOperation> {
        self.operations
            .iter()
            .find(|operation| operation.name == name)
    }
}

impl Definition {
    /// Picks the first SOAP port using `preferred`, or failing that the
    /// first SOAP port of any version. Only document/literal bindings
    /// qualify.
    pub fn resolve_port(&self, preferred: SoapVersion) -> Result<ResolvedPort, error::Error> {
        let mut ports = Vec::new();

        for service in &self.services {
            for port in &service.ports {
                let binding = match self
                    .bindings
                    .iter()
                    .find(|binding| binding.name == port.binding)
                {
                    Some(binding) => binding,
                    None => continue,
                };

                let version = match binding.version.or(port.version) {
                    Some(version) => version,
                    None => continue,
                };

                if binding.style.as_deref() == Some("rpc") {
                    trace!(binding = %binding.name.name, "skipping rpc binding");
                    continue;
                }

                if let Some(port_type) = self
                    .port_types
                    .iter()
                    .find(|port_type| port_type.name == binding.ty)
                {
                    ports.push(self.resolve(service, port, binding, port_type, version));
                }
            }
        }

        if ports.is_empty() {
            return Err(error::Error::NoSoapPort);
        }

        let index = ports
            .iter()
            .position(|port| port.version == preferred)
            .unwrap_or(0);

        Ok(ports.swap_remove(index))
    }

    fn resolve(
        &self,
        service: &Service,
        port: &Port,
        binding: &Binding,
        port_type: &PortType,
        version: SoapVersion,
    ) -> ResolvedPort {
        let operations = port_type
            .operations
            .iter()
            .map(|operation| {
                let action = binding
                    .operations
                    .iter()
                    .find(|bound| bound.name == operation.name.name)
                    .and_then(|bound| bound.action.clone());

                let input = operation
                    .input
                    .as_ref()
                    .and_then(|message| self.message_element(message))
                    .unwrap_or_else(|| QualifiedName {
                        namespace: self.namespace_of(&port_type.name).to_owned(),
                        name: operation.name.name.clone(),
                    });

                let output = operation
                    .output
                    .as_ref()
                    .and_then(|message| self.message_element(message));

                ResolvedOperation {
                    name: operation.name.name.clone(),
                    action,
                    documentation: operation.documentation.clone(),
                    input,
                    output,
                }
            })
            .collect();

        ResolvedPort {
            service: service.name.name.clone(),
            name: port.name.clone(),
            location: port.location.clone(),
            version,
            operations,
        }
    }

    fn message_element(&self, message: &NamespacedName) -> Option<QualifiedName> {
        let message = self
            .messages
            .iter()
            .find(|candidate| candidate.name == *message)?;

        message
            .parts
            .iter()
            .find_map(|part| part.element.as_ref())
            .map(|element| QualifiedName {
                namespace: self.namespace_of(element).to_owned(),
                name: element.name.clone(),
            })
    }
}
