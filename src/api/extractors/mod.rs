//! Custom request extractors.

mod validated_json;

pub use validated_json::ValidatedJson;

#[cfg(test)]
pub(crate) use validated_json::validation_messages;
