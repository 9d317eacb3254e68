use memoq_util::xml::{Content, Element};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::Error;

/// The response element of one call, such as `ListTMsResponse`.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    operation: String,
    element: Element,
}

impl Response {
    pub fn new(operation: impl Into<String>, element: Element) -> Self {
        Self {
            operation: operation.into(),
            element,
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn into_element(self) -> Element {
        self.element
    }

    /// The `{operation}Result` child. Operations without a return value
    /// have none.
    pub fn result(&self) -> Option<&Element> {
        let name = self.result_name();
        self.element.children().iter().find(|child| child.name == name)
    }

    pub fn into_result(self) -> Option<Element> {
        let name = self.result_name();
        self.element
            .into_children()
            .into_iter()
            .find(|child| child.name == name)
    }

    pub fn text(&self) -> Option<&str> {
        self.result().and_then(Element::text)
    }

    pub fn into_text(self) -> Result<String, Error> {
        let operation = self.operation.clone();

        match self.into_result().map(|result| result.content) {
            Some(Content::Text(text)) => Ok(text),
            _ => Err(Error::MissingResult { operation }),
        }
    }

    /// Entries of a result that is a list, like the `ServerProjectInfo`
    /// elements of `ListProjectsResult`. Empty when the result is nil or
    /// missing.
    pub fn items(&self) -> &[Element] {
        self.result().map(Element::children).unwrap_or_default()
    }

    /// The whole response element as ordered JSON.
    pub fn to_map(&self) -> Map<String, Value> {
        to_map(&self.element)
    }

    /// Converts the result into `T` through its JSON form. An empty result
    /// reads as `""` or, when `T` wants a record, as `{}`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, Error> {
        match self.result() {
            Some(result) => from_element(result),
            None => Ok(serde_json::from_value(Value::Null)?),
        }
    }

    pub fn deserialize_items<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error> {
        self.items().iter().map(from_element::<T>).collect()
    }

    fn result_name(&self) -> String {
        format!("{}Result", self.operation)
    }
}

/// Converts the attributes and children of `element` into an ordered map.
///
/// Children are keyed by local name. A name that repeats becomes an array
/// holding every occurrence in document order, placed where the name first
/// appeared; siblings in between keep their own keys, so
/// `<A>1</A><B>2</B><A>3</A>` maps to `{"A": ["1", "3"], "B": "2"}`.
/// Attributes are keyed `@name` and never merge with a child of the same
/// name. Text-only elements become strings and `xsi:nil` becomes `null`.
pub fn to_map(element: &Element) -> Map<String, Value> {
    let mut map = Map::new();

    for (key, value) in &element.attributes {
        map.insert(format!("@{}", key), Value::String(value.clone()));
    }

    for child in element.children() {
        let value = to_value(child);

        match map.get_mut(&child.name) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(child.name.clone(), value);
            }
        }
    }

    for value in map.values_mut() {
        if let Value::Array(values) = value {
            fill_empty_records(values);
        }
    }

    map
}

/// Converts sibling elements of one kind, such as the items of a list
/// result. Empty ones become `{}` when any sibling is a record.
pub fn to_values<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Vec<Value> {
    let mut values = elements.into_iter().map(to_value).collect::<Vec<_>>();
    fill_empty_records(&mut values);
    values
}

/// Converts one element. An element with attributes becomes an object
/// whose text, if any, is kept under `_value`.
///
/// An element with neither text nor children, such as `<UserInfo/>`, becomes
/// `""` on its own: without the schema it cannot be told apart from an empty
/// string. Among record siblings it becomes `{}`, see [`to_values`].
pub fn to_value(element: &Element) -> Value {
    match &element.content {
        Content::Nil => Value::Null,
        Content::Text(text) if element.attributes.is_empty() => Value::String(text.clone()),
        Content::Text(text) => {
            let mut map = to_map(element);
            if !text.is_empty() {
                map.insert("_value".into(), Value::String(text.clone()));
            }
            Value::Object(map)
        }
        Content::Elements(_) => Value::Object(to_map(element)),
    }
}

// `<UserInfo/>` next to `<UserInfo>...</UserInfo>` is an empty record, not
// an empty string.
fn fill_empty_records(values: &mut [Value]) {
    if !values.iter().any(Value::is_object) {
        return;
    }

    for value in values {
        if value.as_str() == Some("") {
            *value = Value::Object(Map::new());
        }
    }
}

fn is_empty(element: &Element) -> bool {
    element.attributes.is_empty() && matches!(&element.content, Content::Text(text) if text.is_empty())
}

fn from_element<T: DeserializeOwned>(element: &Element) -> Result<T, Error> {
    match serde_json::from_value(to_value(element)) {
        Err(_) if is_empty(element) => Ok(serde_json::from_value(Value::Object(Map::new()))?),
        result => Ok(result?),
    }
}
