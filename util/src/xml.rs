use std::io::{BufRead, Cursor, Write};

pub use quick_xml::{events, Reader, Writer};

use events::{BytesStart, BytesText, Event};

use crate::Error;

pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

pub trait ToXml {
    fn to_xml<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), Error>;
}

pub trait FromXml: Sized {
    fn from_xml<R: BufRead>(reader: &mut XmlReader<R>) -> Result<Self, Error>;
}

/// Content of an [`Element`].
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// `xsi:nil="true"`
    Nil,
    Text(String),
    Elements(Vec<Element>),
}

/// A schema-less XML element.
///
/// Elements parsed from a response carry their resolved namespace. Elements
/// built locally usually leave it empty and inherit the namespace of the
/// element they are written into.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub namespace: Option<String>,
    pub attributes: Vec<(String, String)>,
    pub content: Content,
}

/// Start tag as seen by [`XmlReader`], already decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Start {
    pub name: String,
    pub namespace: Option<String>,
    pub attributes: Vec<(String, String)>,
    pub nil: bool,
}

enum Token {
    Start(Start),
    End,
    Text(String),
    Eof,
}

pub struct XmlReader<R: BufRead> {
    reader: Reader<R>,
    buffer: Vec<u8>,
    namespace_buffer: Vec<u8>,
}

impl Default for Content {
    fn default() -> Self {
        Content::Text(String::new())
    }
}

impl Element {
    pub fn new(name: impl Into<String>, content: impl Into<Content>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            attributes: Vec::new(),
            content: content.into(),
        }
    }

    /// An element without text, ready for [`Element::with_child`].
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, Content::Elements(Vec::new()))
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.push_child(child);
        self
    }

    pub fn push_child(&mut self, child: Element) {
        match &mut self.content {
            Content::Elements(children) => children.push(child),
            content => *content = Content::Elements(vec![child]),
        }
    }

    // Text is kept verbatim until the first child arrives. Whitespace
    // between children is dropped by `push_child` and by this guard.
    fn push_text(&mut self, text: &str) {
        if let Content::Text(existing) = &mut self.content {
            existing.push_str(text);
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.content, Content::Nil)
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Element] {
        match &self.content {
            Content::Elements(children) => children,
            _ => &[],
        }
    }

    pub fn into_children(self) -> Vec<Element> {
        match self.content {
            Content::Elements(children) => children,
            _ => Vec::new(),
        }
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children().iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children().iter().filter(move |child| child.name == name)
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_xml(&mut XmlReader::new(bytes))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        self.to_xml(&mut writer)?;
        Ok(writer.into_inner().into_inner())
    }

    fn from_start(start: Start) -> Self {
        Self {
            name: start.name,
            namespace: start.namespace,
            attributes: start.attributes,
            content: if start.nil {
                Content::Nil
            } else {
                Content::default()
            },
        }
    }
}

impl ToXml for Element {
    fn to_xml<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), Error> {
        let mut start = BytesStart::borrowed_name(self.name.as_bytes());

        if let Some(namespace) = &self.namespace {
            start.push_attribute(("xmlns", namespace.as_str()));
        }

        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        match &self.content {
            Content::Nil => {
                start.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
                start.push_attribute(("xsi:nil", "true"));
                writer.write_event(Event::Empty(start))?;
            }

            Content::Text(text) => {
                writer.write_event(Event::Start(start.to_borrowed()))?;
                writer.write_event(Event::Text(BytesText::from_plain_str(text)))?;
                writer.write_event(Event::End(start.to_end()))?;
            }

            Content::Elements(children) => {
                writer.write_event(Event::Start(start.to_borrowed()))?;
                for child in children {
                    child.to_xml(writer)?;
                }
                writer.write_event(Event::End(start.to_end()))?;
            }
        }

        Ok(())
    }
}

impl FromXml for Element {
    fn from_xml<R: BufRead>(reader: &mut XmlReader<R>) -> Result<Self, Error> {
        match reader.next_start()? {
            Some(start) => reader.read_element(start),
            None => Err(Error::UnexpectedElement {
                expected: "element".into(),
                found: "end of element".into(),
            }),
        }
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_owned())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<&String> for Content {
    fn from(text: &String) -> Self {
        Content::Text(text.clone())
    }
}

impl From<bool> for Content {
    fn from(value: bool) -> Self {
        Content::Text(value.to_string())
    }
}

macro_rules! content_from_number {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Content {
            fn from(value: $ty) -> Self {
                Content::Text(value.to_string())
            }
        })*
    };
}

content_from_number!(i32, i64, u32, u64, f64);

impl From<Element> for Content {
    fn from(element: Element) -> Self {
        Content::Elements(vec![element])
    }
}

impl From<Vec<Element>> for Content {
    fn from(elements: Vec<Element>) -> Self {
        Content::Elements(elements)
    }
}

impl<T: Into<Content>> From<Option<T>> for Content {
    fn from(value: Option<T>) -> Self {
        value.map_or(Content::Nil, Into::into)
    }
}

fn owned_start<R: BufRead>(
    reader: &Reader<R>,
    start: &BytesStart<'_>,
    namespace: Option<&[u8]>,
) -> Result<Start, Error> {
    let name = reader.decode(start.local_name())?.to_owned();
    let namespace = match namespace {
        Some(namespace) => Some(reader.decode(namespace)?.to_owned()),
        None => None,
    };

    let mut attributes = Vec::new();
    let mut nil = false;

    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = reader.decode(attribute.key)?;

        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }

        let value = attribute.unescape_and_decode_value(reader)?;

        match key.split_once(':') {
            Some((_, "nil")) => nil = value == "true" || value == "1",
            // Qualified attributes (xsi:type, xml:lang) cannot be written back
            // without their prefix declarations.
            Some(_) => (),
            None => attributes.push((key.to_owned(), value)),
        }
    }

    Ok(Start {
        name,
        namespace,
        attributes,
        nil,
    })
}

impl<R: BufRead> XmlReader<R> {
    pub fn new(read: R) -> Self {
        let mut reader = Reader::from_reader(read);
        reader.expand_empty_elements(true);

        Self {
            reader,
            buffer: Vec::new(),
            namespace_buffer: Vec::new(),
        }
    }

    fn next_token(&mut self) -> Result<Token, Error> {
        loop {
            self.buffer.clear();
            let (namespace, event) = self
                .reader
                .read_namespaced_event(&mut self.buffer, &mut self.namespace_buffer)?;

            let token = match event {
                Event::Start(start) => Token::Start(owned_start(&self.reader, &start, namespace)?),
                Event::End(..) => Token::End,
                Event::Text(text) => {
                    let text = text.unescape_and_decode(&self.reader)?;
                    if text.is_empty() {
                        continue;
                    }
                    Token::Text(text)
                }
                Event::CData(data) => Token::Text(self.reader.decode(&data)?.to_owned()),
                Event::Eof => Token::Eof,
                _ => continue,
            };

            return Ok(token);
        }
    }

    /// Next start tag at the current level, or `None` when the enclosing
    /// element ends first. Text, including layout whitespace, is skipped.
    pub fn next_start(&mut self) -> Result<Option<Start>, Error> {
        loop {
            match self.next_token()? {
                Token::Start(start) => return Ok(Some(start)),
                Token::End => return Ok(None),
                Token::Text(_) => (),
                Token::Eof => return Err(Error::UnexpectedEof),
            }
        }
    }

    pub fn expect_start(&mut self, name: &str) -> Result<Start, Error> {
        match self.next_start()? {
            Some(start) if start.name == name => Ok(start),
            Some(start) => Err(Error::UnexpectedElement {
                expected: name.into(),
                found: start.name,
            }),
            None => Err(Error::UnexpectedElement {
                expected: name.into(),
                found: "end of element".into(),
            }),
        }
    }

    pub fn expect_end(&mut self) -> Result<(), Error> {
        loop {
            match self.next_token()? {
                Token::End => return Ok(()),
                Token::Text(_) => (),
                Token::Start(start) => {
                    return Err(Error::UnexpectedElement {
                        expected: "end of element".into(),
                        found: start.name,
                    })
                }
                Token::Eof => return Err(Error::UnexpectedEof),
            }
        }
    }

    /// Reads the element opened by `start` up to and including its end tag.
    pub fn read_element(&mut self, start: Start) -> Result<Element, Error> {
        let mut stack = vec![Element::from_start(start)];

        loop {
            match self.next_token()? {
                Token::Start(start) => stack.push(Element::from_start(start)),
                Token::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.push_text(&text);
                    }
                }
                Token::End => {
                    let finished = stack.pop().ok_or(Error::UnexpectedEof)?;
                    match stack.last_mut() {
                        Some(parent) => parent.push_child(finished),
                        None => return Ok(finished),
                    }
                }
                Token::Eof => return Err(Error::UnexpectedEof),
            }
        }
    }
}
