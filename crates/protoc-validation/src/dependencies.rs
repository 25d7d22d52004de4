//! Message dependency resolution

use protoc_schema::{Message, Schema};
use tracing::trace;

/// Populate every message's dependency list
pub fn resolve_dependencies(schema: &mut Schema) {
    for message in &mut schema.messages {
        resolve_message_dependencies(message);
    }
}

/// Record the distinct other messages referenced by `message`'s fields, in
/// first-occurrence order. Primitive fields and references to the message
/// itself are ignored; array fields count through their element type.
pub fn resolve_message_dependencies(message: &mut Message) {
    let mut dependencies: Vec<String> = Vec::new();

    for field in &message.fields {
        if let Some(name) = field.message_ref() {
            if name != message.name && !dependencies.iter().any(|d| d == name) {
                dependencies.push(name.to_string());
            }
        }
    }

    trace!("{} depends on {:?}", message.name, dependencies);
    message.dependencies = dependencies;
}
