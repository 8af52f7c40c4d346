//! Strongly-typed identifiers.
//!
//! Every entity the engine tracks gets its own newtype so an agent id can
//! never be passed where a thought id is expected.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from an existing string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generates a new random (v4 UUID) identifier.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Unique identifier for an agent within a project.
    AgentId
);

string_id!(
    /// Identifier of the project (workspace) that owns agents and sessions.
    ProjectId
);

string_id!(
    /// Unique identifier for a single thought node.
    ThoughtId
);

string_id!(
    /// Unique identifier for a collaboration session.
    CollaborationId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ThoughtId::generate();
        let b = ThoughtId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_id_display_and_from() {
        let id: AgentId = "strategist".into();
        assert_eq!(id.to_string(), "strategist");
        assert_eq!(id, AgentId::new(String::from("strategist")));
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = ProjectId::new("demo");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"demo\"");
    }
}
