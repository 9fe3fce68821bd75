//! Custom error messages.
//!
//! A message is either fixed text or a closure. Closures are rendered once,
//! while the procedure is compiled, with the property the node sits at and
//! the constraint's limit.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::kind::Kind;

/// Where a node sits relative to its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    /// An object key.
    Key(String),
    /// A fixed tuple position.
    Index(usize),
    /// Any element of a homogeneous array; the index is only known at runtime.
    Each,
}

/// Arguments handed to a message closure.
#[derive(Debug, Clone, Copy)]
pub struct MessageArgs<'a> {
    /// The node's property, `None` for the root value.
    pub property: Option<&'a Property>,
    /// The node's kind.
    pub kind: Kind,
    /// The constraint's limit (`[min, max]` for a range), `None` for
    /// structural messages.
    pub limit: Option<&'a Value>,
}

type MessageFn = Arc<dyn Fn(&MessageArgs<'_>) -> String + Send + Sync>;

/// A custom error message.
#[derive(Clone)]
pub enum Message {
    /// Fixed text.
    Text(String),
    /// Rendered from the node's property and the constraint limit.
    Dynamic(MessageFn),
}

impl Message {
    /// Wraps a closure.
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&MessageArgs<'_>) -> String + Send + Sync + 'static,
    {
        Message::Dynamic(Arc::new(f))
    }

    pub(crate) fn render(&self, args: &MessageArgs<'_>) -> String {
        match self {
            Message::Text(text) => text.clone(),
            Message::Dynamic(f) => f(args),
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Message::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_message_ignores_args() {
        let message = Message::from("too short");
        let args = MessageArgs {
            property: None,
            kind: Kind::String,
            limit: Some(&json!(3)),
        };
        assert_eq!(message.render(&args), "too short");
    }

    #[test]
    fn test_dynamic_message_sees_property_and_limit() {
        let message = Message::dynamic(|args| match (args.property, args.limit) {
            (Some(Property::Key(key)), Some(limit)) => format!("{} needs {}", key, limit),
            _ => "unknown".to_string(),
        });
        let property = Property::Key("name".to_string());
        let args = MessageArgs {
            property: Some(&property),
            kind: Kind::String,
            limit: Some(&json!(3)),
        };
        assert_eq!(message.render(&args), "name needs 3");
    }
}
