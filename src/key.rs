//! Typed store keys and slot resolution.
//!
//! A [`StoreKey`] names a storage slot, carries the value type as a generic
//! parameter, and selects which backend holds the value. Keys are immutable
//! value objects; constructing one has no side effects.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Separator between the id and uuid components of a qualified slot
/// identifier. A control character so it cannot collide with real ids;
/// ids and uuids must not contain it.
const SLOT_SEPARATOR: char = '\u{1f}';

/// Which backend a key resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    /// Process-lifetime storage, lost on restart.
    Memory,
    /// Durable storage surviving restarts, stored in the clear.
    Persistent,
    /// Durable storage, encrypted before it reaches disk.
    EncryptedPersistent,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Persistent => write!(f, "persistent"),
            Self::EncryptedPersistent => write!(f, "encrypted"),
        }
    }
}

/// A typed, immutable key identifying one storage slot.
///
/// The value type `T` is part of the key: a slot must always be read with the
/// type it was written with, and binding `T` at the key level makes that a
/// compile-time contract. Two keys address the same slot iff their id,
/// normalized uuid, and kind all match.
///
/// A key with a uuid is a *parametrized* key: distinct uuids produce distinct
/// slots sharing the same base id.
///
/// # Example
///
/// ```ignore
/// let active_user: StoreKey<String> = StoreKey::new("active_user", StoreKind::Persistent);
/// let per_user = StoreKey::<Profile>::parametrized("profile", user_id, StoreKind::EncryptedPersistent);
/// ```
pub struct StoreKey<T> {
    id: String,
    uuid: Option<String>,
    kind: StoreKind,
    _value: PhantomData<fn() -> T>,
}

impl<T> StoreKey<T> {
    /// Create a key without a uuid component.
    pub fn new(id: impl Into<String>, kind: StoreKind) -> Self {
        Self {
            id: id.into(),
            uuid: None,
            kind,
            _value: PhantomData,
        }
    }

    /// Create a parametrized key whose slot depends on `uuid`.
    ///
    /// An empty uuid normalizes to absent, so `parametrized(id, "", kind)`
    /// and `new(id, kind)` address the same slot.
    pub fn parametrized(
        id: impl Into<String>,
        uuid: impl Into<String>,
        kind: StoreKind,
    ) -> Self {
        let uuid = uuid.into();
        Self {
            id: id.into(),
            uuid: if uuid.is_empty() { None } else { Some(uuid) },
            kind,
            _value: PhantomData,
        }
    }

    /// The base id of this key.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The uuid component, if this is a parametrized key.
    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    /// The backend this key resolves to.
    pub fn kind(&self) -> StoreKind {
        self.kind
    }

    /// Resolve the physical storage slot for this key.
    pub fn slot(&self) -> Slot {
        let mut qualified =
            String::with_capacity(self.id.len() + 1 + self.uuid.as_deref().map_or(0, str::len));
        qualified.push_str(&self.id);
        qualified.push(SLOT_SEPARATOR);
        if let Some(uuid) = &self.uuid {
            qualified.push_str(uuid);
        }
        Slot {
            kind: self.kind,
            qualified,
        }
    }
}

// Manual impls so `T` needs no bounds; the marker carries no data.

impl<T> Clone for StoreKey<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            uuid: self.uuid.clone(),
            kind: self.kind,
            _value: PhantomData,
        }
    }
}

impl<T> PartialEq for StoreKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.uuid == other.uuid && self.kind == other.kind
    }
}

impl<T> Eq for StoreKey<T> {}

impl<T> Hash for StoreKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.uuid.hash(state);
        self.kind.hash(state);
    }
}

impl<T> fmt::Debug for StoreKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreKey")
            .field("id", &self.id)
            .field("uuid", &self.uuid)
            .field("kind", &self.kind)
            .finish()
    }
}

/// A resolved physical storage address: backend kind plus the fully
/// qualified identifier (`id`, separator, `uuid` or empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slot {
    kind: StoreKind,
    qualified: String,
}

impl Slot {
    /// The backend this slot lives in.
    pub fn kind(&self) -> StoreKind {
        self.kind
    }

    /// The fully qualified identifier within the backend.
    pub fn qualified(&self) -> &str {
        &self.qualified
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Render the control separator as '/' for logs.
        let printable = self.qualified.replace(SLOT_SEPARATOR, "/");
        write!(f, "{}:{}", self.kind, printable)
    }
}
