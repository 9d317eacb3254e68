use memoq_util::soap::SoapVersion;

#[derive(Default, Debug, Clone)]
pub struct Namespaces(Vec<String>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespacedName {
    namespace_idx: usize,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Part {
    pub name: String,
    pub element: Option<NamespacedName>,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub name: NamespacedName,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone)]
pub struct Operation {
    pub name: NamespacedName,
    pub documentation: Option<String>,
    pub input: Option<NamespacedName>,
    pub output: Option<NamespacedName>,
}

#[derive(Debug, Clone)]
pub struct PortType {
    pub name: NamespacedName,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone)]
pub struct BindingOperation {
    pub name: String,
    pub action: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub name: NamespacedName,
    pub ty: NamespacedName,
    /// `None` for non-SOAP bindings (HTTP GET/POST, MIME).
    pub version: Option<SoapVersion>,
    /// `style` of the SOAP binding element, `document` when absent.
    pub style: Option<String>,
    pub operations: Vec<BindingOperation>,
}

#[derive(Debug, Clone)]
pub struct Port {
    pub name: String,
    pub binding: NamespacedName,
    pub version: Option<SoapVersion>,
    pub location: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Service {
    pub name: NamespacedName,
    pub ports: Vec<Port>,
}

#[derive(Default, Debug, Clone)]
pub struct Definition {
    pub namespaces: Namespaces,
    pub messages: Vec<Message>,
    pub port_types: Vec<PortType>,
    pub bindings: Vec<Binding>,
    pub services: Vec<Service>,
}

impl Namespaces {
    pub fn add_or_get(&mut self, namespace: &str) -> usize {
        if let Some(index) = self.index_of(namespace) {
            index
        } else {
            let index = self.0.len();
            self.0.push(namespace.to_owned());
            index
        }
    }

    pub fn get(&self, name: &NamespacedName) -> &str {
        &self.0[name.namespace_idx]
    }

    fn index_of(&self, namespace: &str) -> Option<usize> {
        self.0.iter().position(|value| value == namespace)
    }
}

impl NamespacedName {
    pub fn new(namespaces: &mut Namespaces, namespace: &str, name: String) -> Self {
        Self {
            namespace_idx: namespaces.add_or_get(namespace),
            name,
        }
    }
}

impl Definition {
    pub fn namespace_of(&self, name: &NamespacedName) -> &str {
        self.namespaces.get(name)
    }
}
