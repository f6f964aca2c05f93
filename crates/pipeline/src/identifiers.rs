//! Newtype identifiers.
//!
//! Values that name something (an invocation, a completion model) are wrapped
//! in distinct newtypes so they cannot be confused with free-form text such as
//! log content or solution text.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is blank.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.trim().is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single invocation of the handler.
///
/// Generated fresh for every triggering event; recorded on the invocation span
/// so all log lines from one invocation can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(Uuid);

impl InvocationId {
    /// Generates a new random invocation identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an [`InvocationId`] from an existing UUID (e.g. a host-provided request id).
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers — String-backed (configuration)
// ---------------------------------------------------------------------------

string_id! {
    /// Names the completion model a request is directed at (e.g. `"gpt-4o"`).
    ModelName
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_name_rejects_blank_values() {
        assert!(ModelName::new("").is_none());
        assert!(ModelName::new("   ").is_none());
        assert_eq!(ModelName::new("gpt-4o").unwrap().as_str(), "gpt-4o");
    }

    #[test]
    fn model_name_serialises_as_plain_string() {
        let name = ModelName::new("gpt-4o").unwrap();
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"gpt-4o\"");
    }

    #[test]
    fn invocation_ids_are_unique() {
        assert_ne!(InvocationId::new_random(), InvocationId::new_random());
    }

    #[test]
    fn invocation_id_round_trips_through_uuid() {
        let uuid = Uuid::new_v4();
        assert_eq!(InvocationId::from_uuid(uuid).as_uuid(), uuid);
        assert_eq!(InvocationId::from_uuid(uuid).to_string(), uuid.to_string());
    }
}
