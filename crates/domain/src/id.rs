//! Typed identifier newtypes backed by the names used in configuration.
//!
//! Identifiers are opaque strings (`evening`, `light.kitchen`, …). Wrapping
//! them keeps a scene id from being passed where an entity id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Wrap a name, rejecting blank input.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::EmptyId`] when `name` is empty or
            /// only whitespace.
            pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
                let name = name.into();
                if name.trim().is_empty() {
                    return Err(ValidationError::EmptyId);
                }
                Ok(Self(name))
            }

            /// Borrow the underlying name.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifier of a [`Scene`](crate::scene::Scene).
    SceneId
);

define_id!(
    /// Identifier of an exhibition (a toggleable lighting layer).
    ExhibitionId
);

define_id!(
    /// Identifier of a trigger rule.
    TriggerId
);

define_id!(
    /// External entity identifier (`light.kitchen`, `binary_sensor.door`, …).
    EntityId
);
