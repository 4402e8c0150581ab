//! # Event payloads and their registry keys.
//!
//! Any `Send + Sync + 'static` type can be published; [`Event`] is implemented
//! for all of them, so payloads stay plain structs with no base type.
//! [`EventKey`] is what the subscriber registry is keyed by.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Marker for publishable payloads. Blanket-implemented.
pub trait Event: Any + Send + Sync + 'static {
    /// Key of this payload type in the subscriber registry.
    fn key() -> EventKey
    where
        Self: Sized,
    {
        EventKey::of::<Self>()
    }
}

impl<T: Any + Send + Sync + 'static> Event for T {}

/// Stable identity of a payload type: its `TypeId` plus a readable name.
///
/// Equality and hashing only look at the `TypeId`.
#[derive(Clone, Copy)]
pub struct EventKey {
    id: TypeId,
    name: &'static str,
}

impl EventKey {
    /// Key of payload type `E`.
    pub fn of<E: Event>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: type_name::<E>(),
        }
    }

    /// Fully qualified type name, for logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if this key belongs to payload type `E`.
    pub fn is<E: Event>(&self) -> bool {
        self.id == TypeId::of::<E>()
    }
}

impl PartialEq for EventKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventKey {}

impl Hash for EventKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
