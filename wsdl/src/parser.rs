use quick_xml::{
    events::{attributes::Attributes, BytesStart, BytesText, Event},
    Reader,
};
use std::{collections::HashMap, io::BufRead};
use tracing::{debug, trace};
use url::Url;

use memoq_util::{soap::SoapVersion, Transport};

use super::{
    error,
    resolve::rebase,
    types::{
        Binding, BindingOperation, Definition, Message, NamespacedName, Operation, Part, Port,
        PortType, Service,
    },
};

const SOAP11_BINDING_NAMESPACE: &str = "http://schemas.xmlsoap.org/wsdl/soap/";
const SOAP12_BINDING_NAMESPACE: &str = "http://schemas.xmlsoap.org/wsdl/soap12/";

fn get_attributes<B: BufRead, const N: usize>(
    reader: &Reader<B>,
    attributes: Attributes<'_>,
    names: [&'static str; N],
) -> Result<[Option<String>; N], error::Error> {
    const INIT: Option<String> = None;
    let mut result = [INIT; N];

    for attribute in attributes {
        let attribute = attribute?;
        let key = reader.decode(attribute.key)?;

        for (index, name) in names.iter().enumerate() {
            if key == *name {
                result[index] = Some(attribute.unescape_and_decode_value(reader)?);
                break;
            }
        }
    }

    Ok(result)
}

fn required(
    value: Option<String>,
    element: &'static str,
    attribute: &'static str,
) -> Result<String, error::Error> {
    value.ok_or(error::Error::MissingAttribute { element, attribute })
}

fn split_namespaced_name(prefixed_name: &str) -> (Option<&str>, &str) {
    match prefixed_name.split_once(':') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, prefixed_name),
    }
}

fn soap_version(namespace: Option<&str>) -> Option<SoapVersion> {
    match namespace {
        Some(SOAP11_BINDING_NAMESPACE) => Some(SoapVersion::V11),
        Some(SOAP12_BINDING_NAMESPACE) => Some(SoapVersion::V12),
        _ => None,
    }
}

/// Prefix bindings of the document being parsed. Each imported document
/// starts from an empty set.
#[derive(Clone, Default)]
struct CurrentNamespaces {
    target: Vec<String>,
    namespaces: HashMap<Option<String>, String>,
}

struct Parser<'t> {
    root: Url,
    transport: &'t dyn Transport,
    visited: Vec<Url>,

    definition: Definition,
    current_namespaces: CurrentNamespaces,
}

#[derive(Debug)]
enum ParseState {
    Definitions,
    Import,
    Types,

    Message {
        name: String,
        parts: Vec<Part>,
    },
    Part(Part),

    PortType {
        name: String,
        operations: Vec<Operation>,
    },
    Operation {
        name: String,
        documentation: Option<String>,
        input: Option<NamespacedName>,
        output: Option<NamespacedName>,
    },
    Documentation(Option<String>),
    Input {
        message: NamespacedName,
    },
    Output {
        message: NamespacedName,
    },

    Binding {
        name: String,
        ty: NamespacedName,
        version: Option<SoapVersion>,
        style: Option<String>,
        operations: Vec<BindingOperation>,
    },
    Transport {
        version: Option<SoapVersion>,
        style: Option<String>,
    },
    BindingOperation {
        name: String,
        action: Option<String>,
    },
    OperationAction(Option<String>),

    Service {
        name: String,
        ports: Vec<Port>,
    },
    Port {
        name: String,
        binding: NamespacedName,
        version: Option<SoapVersion>,
        address: Option<String>,
    },
    Address {
        version: Option<SoapVersion>,
        location: String,
    },

    Other(String),
}

impl CurrentNamespaces {
    fn push_target_namespace(&mut self, namespace: String) {
        self.target.push(namespace);
    }

    fn pop_target_namespace(&mut self) {
        self.target.pop();
    }

    fn add_namespace_prefix(&mut self, prefix: Option<String>, namespace: &str) {
        self.namespaces.insert(prefix, namespace.to_owned());
    }

    fn target(&self) -> &str {
        self.target.last().map(String::as_str).unwrap_or_default()
    }

    fn lookup(&self, prefix: Option<&str>) -> Option<&str> {
        self.namespaces
            .get(&prefix.map(ToOwned::to_owned))
            .map(String::as_str)
    }
}

impl<'t> Parser<'t> {
    fn new(url: Url, transport: &'t dyn Transport) -> Self {
        Self {
            root: url,
            transport,
            visited: Vec::new(),

            definition: Default::default(),
            current_namespaces: Default::default(),
        }
    }

    fn target_namespaced(&mut self, name: String) -> NamespacedName {
        let target = self.current_namespaces.target().to_owned();
        NamespacedName::new(&mut self.definition.namespaces, &target, name)
    }

    /// Resolves a QName-valued attribute such as `tns:ListProjects`.
    fn resolve_namespace(&mut self, prefixed_name: &str) -> Result<NamespacedName, error::Error> {
        let (prefix, local_name) = split_namespaced_name(prefixed_name);

        let namespace = match (prefix, self.current_namespaces.lookup(prefix)) {
            (_, Some(namespace)) => namespace.to_owned(),
            (None, None) => self.current_namespaces.target().to_owned(),
            (Some(prefix), None) => return Err(error::Error::UnknownPrefix(prefix.into())),
        };

        Ok(NamespacedName::new(
            &mut self.definition.namespaces,
            &namespace,
            local_name.to_owned(),
        ))
    }

    fn parse(mut self) -> Result<Definition, error::Error> {
        self.parse_url(self.root.clone())?;
        Ok(self.definition)
    }

    fn parse_url(&mut self, url: Url) -> Result<(), error::Error> {
        if self.visited.contains(&url) {
            return Ok(());
        }
        self.visited.push(url.clone());

        debug!(%url, "parsing WSDL");
        let outer = std::mem::take(&mut self.current_namespaces);

        let result = match url.scheme() {
            "file" => self.parse_xml(
                &url,
                Reader::from_file(
                    url.to_file_path()
                        .map_err(|()| error::Error::PathConversionError(None))?,
                )
                .map_err(error::Error::FileOpenError)?,
            ),

            "http" | "https" => {
                let document = self.transport.get(&url)?;
                self.parse_xml(&url, Reader::from_reader(&document[..]))
            }

            other => Err(error::Error::UnsupportedScheme(other.into())),
        };

        self.current_namespaces = outer;
        result
    }

    fn parse_xml<B: BufRead>(&mut self, url: &Url, mut reader: Reader<B>) -> Result<(), error::Error> {
        reader.trim_text(true);

        let mut stack = Vec::new();
        let mut buffer = Vec::new();
        let mut namespace_buffer = Vec::new();

        loop {
            let (namespace, event) =
                reader.read_namespaced_event(&mut buffer, &mut namespace_buffer)?;
            let namespace = match namespace {
                Some(namespace) => Some(reader.decode(namespace)?.to_owned()),
                None => None,
            };

            match event {
                Event::Start(start) => {
                    self.handle_start(&mut stack, &reader, &start, namespace.as_deref(), url)?
                }
                Event::End(..) => self.handle_end(&mut stack)?,

                Event::Empty(start) => {
                    self.handle_start(&mut stack, &reader, &start, namespace.as_deref(), url)?;
                    self.handle_end(&mut stack)?;
                }

                Event::Text(text) => self.handle_text(&mut stack, &reader, text)?,

                Event::Eof => break,

                _ => (),
            }

            buffer.clear();
        }

        Ok(())
    }

    fn handle_start<B: BufRead>(
        &mut self,
        stack: &mut Vec<ParseState>,
        reader: &Reader<B>,
        start: &BytesStart<'_>,
        namespace: Option<&str>,
        url: &Url,
    ) -> Result<(), error::Error> {
        let (_, local_name) = split_namespaced_name(reader.decode(start.name())?);

        let state = stack.pop();
        let mut new_state = ParseState::Other(local_name.to_owned());

        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = reader.decode(attribute.key)?;
            let value = attribute.unescape_and_decode_value(reader)?;

            match split_namespaced_name(key) {
                (None, "xmlns") => self.current_namespaces.add_namespace_prefix(None, &value),
                (Some("xmlns"), prefix) => self
                    .current_namespaces
                    .add_namespace_prefix(Some(prefix.to_owned()), &value),
                _ => (),
            }
        }

        match state {
            None => {
                if local_name == "definitions" {
                    let [target] = get_attributes(reader, start.attributes(), ["targetNamespace"])?;
                    self.current_namespaces
                        .push_target_namespace(required(target, "definitions", "targetNamespace")?);
                    new_state = ParseState::Definitions;
                }
            }

            Some(ParseState::Definitions) => match local_name {
                "import" => {
                    let [location] = get_attributes(reader, start.attributes(), ["location"])?;
                    let location = url.join(&required(location, "import", "location")?)?;

                    self.parse_url(rebase(&self.root, &location))?;
                    trace!(%url, "back from import");

                    new_state = ParseState::Import;
                }

                "types" => new_state = ParseState::Types,

                "message" => {
                    let [name] = get_attributes(reader, start.attributes(), ["name"])?;

                    new_state = ParseState::Message {
                        name: required(name, "message", "name")?,
                        parts: Vec::new(),
                    };
                }

                "portType" => {
                    let [name] = get_attributes(reader, start.attributes(), ["name"])?;

                    new_state = ParseState::PortType {
                        name: required(name, "portType", "name")?,
                        operations: Vec::new(),
                    };
                }

                "binding" => {
                    let [name, ty] = get_attributes(reader, start.attributes(), ["name", "type"])?;
                    let ty = self.resolve_namespace(&required(ty, "binding", "type")?)?;

                    new_state = ParseState::Binding {
                        name: required(name, "binding", "name")?,
                        ty,
                        version: None,
                        style: None,
                        operations: Vec::new(),
                    };
                }

                "service" => {
                    let [name] = get_attributes(reader, start.attributes(), ["name"])?;

                    new_state = ParseState::Service {
                        name: required(name, "service", "name")?,
                        ports: Vec::new(),
                    };
                }

                _ => trace!("found {} inside definitions", local_name),
            },

            Some(ParseState::Message { .. }) if local_name == "part" => {
                let [name, element] = get_attributes(reader, start.attributes(), ["name", "element"])?;

                let element = element
                    .map(|element| self.resolve_namespace(&element))
                    .transpose()?;

                new_state = ParseState::Part(Part {
                    name: required(name, "part", "name")?,
                    element,
                });
            }

            Some(ParseState::PortType { .. }) if local_name == "operation" => {
                let [name] = get_attributes(reader, start.attributes(), ["name"])?;

                new_state = ParseState::Operation {
                    name: required(name, "operation", "name")?,
                    documentation: None,
                    input: None,
                    output: None,
                };
            }

            Some(ParseState::Operation { .. }) => match local_name {
                "documentation" => new_state = ParseState::Documentation(None),
                "input" | "output" => {
                    let [message] = get_attributes(reader, start.attributes(), ["message"])?;
                    let message = self.resolve_namespace(&required(message, "input", "message")?)?;

                    new_state = if local_name == "input" {
                        ParseState::Input { message }
                    } else {
                        ParseState::Output { message }
                    };
                }
                _ => trace!("found {} inside operation", local_name),
            },

            Some(ParseState::Binding { .. }) => match local_name {
                "binding" => {
                    let [style] = get_attributes(reader, start.attributes(), ["style"])?;

                    new_state = ParseState::Transport {
                        version: soap_version(namespace),
                        style,
                    };
                }

                "operation" => {
                    let [name] = get_attributes(reader, start.attributes(), ["name"])?;

                    new_state = ParseState::BindingOperation {
                        name: required(name, "operation", "name")?,
                        action: None,
                    };
                }

                _ => trace!("found {} inside binding", local_name),
            },

            Some(ParseState::BindingOperation { .. })
                if local_name == "operation" && soap_version(namespace).is_some() =>
            {
                let [action] = get_attributes(reader, start.attributes(), ["soapAction"])?;

                new_state = ParseState::OperationAction(action);
            }

            Some(ParseState::Service { .. }) if local_name == "port" => {
                let [name, binding] = get_attributes(reader, start.attributes(), ["name", "binding"])?;
                let binding = self.resolve_namespace(&required(binding, "port", "binding")?)?;

                new_state = ParseState::Port {
                    name: required(name, "port", "name")?,
                    binding,
                    version: None,
                    address: None,
                };
            }

            Some(ParseState::Port { .. }) if local_name == "address" => {
                let [location] = get_attributes(reader, start.attributes(), ["location"])?;

                new_state = ParseState::Address {
                    version: soap_version(namespace),
                    location: required(location, "address", "location")?,
                };
            }

            Some(ref other) => trace!("found {} inside {:?}", local_name, other),
        }

        stack.extend(state);
        stack.push(new_state);
        Ok(())
    }

    fn handle_end(&mut self, stack: &mut Vec<ParseState>) -> Result<(), error::Error> {
        let finished_state = stack.pop();
        let mut next_state = stack.pop();

        match finished_state {
            Some(ParseState::Definitions) => self.current_namespaces.pop_target_namespace(),

            Some(ParseState::Message { name, parts }) => {
                let name = self.target_namespaced(name);
                self.definition.messages.push(Message { name, parts })
            }

            Some(ParseState::Part(part)) => {
                if let Some(ParseState::Message { ref mut parts, .. }) = next_state {
                    parts.push(part)
                }
            }

            Some(ParseState::PortType { name, operations }) => {
                let name = self.target_namespaced(name);
                self.definition
                    .port_types
                    .push(PortType { name, operations })
            }

            Some(ParseState::Operation {
                name,
                documentation,
                input,
                output,
            }) => {
                let name = self.target_namespaced(name);
                if let Some(ParseState::PortType {
                    ref mut operations, ..
                }) = next_state
                {
                    operations.push(Operation {
                        name,
                        documentation,
                        input,
                        output,
                    })
                }
            }

            Some(ParseState::Documentation(text)) => {
                if let Some(ParseState::Operation {
                    ref mut documentation,
                    ..
                }) = next_state
                {
                    *documentation = text
                }
            }

            Some(ParseState::Input { message }) => {
                if let Some(ParseState::Operation { ref mut input, .. }) = next_state {
                    *input = Some(message)
                }
            }

            Some(ParseState::Output { message }) => {
                if let Some(ParseState::Operation { ref mut output, .. }) = next_state {
                    *output = Some(message)
                }
            }

            Some(ParseState::Transport {
                version: soap,
                style: binding_style,
            }) => {
                if let Some(ParseState::Binding {
                    ref mut version,
                    ref mut style,
                    ..
                }) = next_state
                {
                    *version = soap;
                    *style = binding_style;
                }
            }

            Some(ParseState::Binding {
                name,
                ty,
                version,
                style,
                operations,
            }) => {
                let name = self.target_namespaced(name);
                self.definition.bindings.push(Binding {
                    name,
                    ty,
                    version,
                    style,
                    operations,
                })
            }

            Some(ParseState::BindingOperation { name, action }) => {
                if let Some(ParseState::Binding {
                    ref mut operations, ..
                }) = next_state
                {
                    operations.push(BindingOperation { name, action })
                }
            }

            Some(ParseState::OperationAction(soap_action)) => {
                if let Some(ParseState::BindingOperation { ref mut action, .. }) = next_state {
                    *action = soap_action;
                }
            }

            Some(ParseState::Service { name, ports }) => {
                let name = self.target_namespaced(name);
                self.definition.services.push(Service { name, ports })
            }

            Some(ParseState::Port {
                name,
                binding,
                version,
                address,
            }) => {
                if let Some(ParseState::Service { ref mut ports, .. }) = next_state {
                    ports.push(Port {
                        name,
                        binding,
                        version,
                        location: address,
                    })
                }
            }

            Some(ParseState::Address {
                version: soap,
                location,
            }) => {
                if let Some(ParseState::Port {
                    ref mut version,
                    ref mut address,
                    ..
                }) = next_state
                {
                    *version = soap;
                    *address = Some(location);
                }
            }

            _ => (),
        }

        stack.extend(next_state);
        Ok(())
    }

    fn handle_text<B: BufRead>(
        &mut self,
        stack: &mut [ParseState],
        reader: &Reader<B>,
        text: BytesText<'_>,
    ) -> Result<(), error::Error> {
        if let Some(ParseState::Documentation(docs)) = stack.last_mut() {
            *docs = Some(text.unescape_and_decode(reader)?);
        }

        Ok(())
    }
}

pub fn parse(url: Url, transport: &dyn Transport) -> Result<Definition, error::Error> {
    Parser::new(url, transport).parse()
}
