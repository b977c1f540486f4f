//! The constructor registry: which factory reads the body behind an ID.
//!
//! Registration and lookup are separate phases. A [`RegistryBuilder`]
//! collects every factory once at startup; [`RegistryBuilder::build`] seals
//! it into a [`Registry`] that never changes again and can be shared by
//! reference or `Arc` across threads with no further synchronization.

use std::collections::HashMap;
use std::fmt;

use crate::deserialize::{Cursor, Error, Result};
use crate::object::{Constructor, Object};

/// Reads the body of one constructor (the ID has already been consumed).
pub type Factory = Box<dyn Fn(&mut Cursor<'_>) -> Result<Object> + Send + Sync>;

/// One registered constructor.
pub struct Entry {
    id: u32,
    name: String,
    base: Option<String>,
    factory: Factory,
    #[cfg(feature = "schema")]
    pub(crate) definition: Option<std::sync::Arc<tlcodec_schema::tl::Definition>>,
}

impl Entry {
    pub(crate) fn new(id: u32, name: String, base: Option<String>, factory: Factory) -> Self {
        Self {
            id,
            name,
            base,
            factory,
            #[cfg(feature = "schema")]
            definition: None,
        }
    }

    /// Constructor ID.
    pub fn id(&self) -> u32 { self.id }

    /// Qualified TL name, e.g. `"userStatusOnline"`.
    pub fn name(&self) -> &str { &self.name }

    /// Boxed type the constructor belongs to, when known.
    pub fn base_type(&self) -> Option<&str> { self.base.as_deref() }

    /// Runs the factory.
    pub fn read_body(&self, buf: &mut Cursor<'_>) -> Result<Object> {
        (self.factory)(buf)
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("id", &format_args!("{:#010x}", self.id))
            .field("name", &self.name)
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Two constructors claimed the same ID.
///
/// This is a build defect (mismatched generated code or a corrupt schema),
/// never a property of the data being decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateConstructor {
    /// The contested ID.
    pub id: u32,
    /// Name already registered under `id`.
    pub existing: String,
    /// Name that tried to register under `id`.
    pub incoming: String,
}

impl fmt::Display for DuplicateConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "constructor {:#010x} registered twice ({} and {})",
            self.id, self.existing, self.incoming
        )
    }
}

impl std::error::Error for DuplicateConstructor {}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Collects registrations before the registry is sealed.
#[derive(Default)]
pub struct RegistryBuilder {
    entries: HashMap<u32, Entry>,
    by_name: HashMap<String, u32>,
}

impl RegistryBuilder {
    /// Registers `factory` for `id`.
    ///
    /// # Panics
    ///
    /// If `id` is already registered. Use [`RegistryBuilder::try_register`]
    /// when the registrations come from data rather than code.
    pub fn register<F>(&mut self, id: u32, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&mut Cursor<'_>) -> Result<Object> + Send + Sync + 'static,
    {
        if let Err(e) = self.try_register(id, name, factory) {
            panic!("{e}");
        }
        self
    }

    /// Registers `factory` for `id`, refusing to replace an existing entry.
    pub fn try_register<F>(
        &mut self,
        id: u32,
        name: impl Into<String>,
        factory: F,
    ) -> std::result::Result<(), DuplicateConstructor>
    where
        F: Fn(&mut Cursor<'_>) -> Result<Object> + Send + Sync + 'static,
    {
        self.insert(Entry::new(id, name.into(), None, Box::new(factory)))
    }

    /// Registers a typed leaf under its own ID, name and base type.
    ///
    /// # Panics
    ///
    /// If its ID is already registered.
    pub fn register_type<T: Constructor>(&mut self) -> &mut Self {
        let entry = Entry::new(
            T::CONSTRUCTOR_ID,
            T::NAME.to_owned(),
            Some(T::BASE.to_owned()),
            Box::new(T::deserialize_object),
        );
        if let Err(e) = self.insert(entry) {
            panic!("{e}");
        }
        self
    }

    pub(crate) fn insert(&mut self, entry: Entry) -> std::result::Result<(), DuplicateConstructor> {
        if let Some(existing) = self.entries.get(&entry.id) {
            return Err(DuplicateConstructor {
                id: entry.id,
                existing: existing.name.clone(),
                incoming: entry.name,
            });
        }
        match self.by_name.get(&entry.name) {
            Some(&kept) => log::warn!(
                "{} is registered as {kept:#010x} and {:#010x}; names resolve to the first",
                entry.name,
                entry.id
            ),
            None => {
                self.by_name.insert(entry.name.clone(), entry.id);
            }
        }
        self.entries.insert(entry.id, entry);
        Ok(())
    }

    /// Runs a generated `register_all` function against this builder.
    pub fn register_all(&mut self, register_all: impl FnOnce(&mut Self)) -> &mut Self {
        register_all(self);
        self
    }

    /// Whether `id` has been registered.
    pub fn contains(&self, id: u32) -> bool {
        self.entries.contains_key(&id)
    }

    /// Seals the registry.
    pub fn build(self) -> Registry {
        let mut by_base: HashMap<String, Option<u32>> = HashMap::new();
        for entry in self.entries.values() {
            if let Some(base) = &entry.base {
                by_base
                    .entry(base.clone())
                    .and_modify(|sole| *sole = None)
                    .or_insert(Some(entry.id));
            }
        }
        log::debug!("constructor registry sealed with {} entries", self.entries.len());
        Registry { entries: self.entries, by_name: self.by_name, by_base }
    }
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// An immutable map from constructor ID to [`Entry`].
pub struct Registry {
    entries: HashMap<u32, Entry>,
    by_name: HashMap<String, u32>,
    /// `None` when the base type has more than one constructor.
    by_base: HashMap<String, Option<u32>>,
}

impl Registry {
    /// Starts collecting registrations.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Builds a registry from a generated `register_all` function.
    pub fn with(register_all: impl FnOnce(&mut RegistryBuilder)) -> Self {
        let mut builder = Self::builder();
        register_all(&mut builder);
        builder.build()
    }

    /// Looks up the entry for `id`.
    pub fn resolve(&self, id: u32) -> Result<&Entry> {
        self.entries.get(&id).ok_or(Error::UnknownConstructor { id })
    }

    /// Looks up a constructor by its qualified name.
    pub fn resolve_name(&self, name: &str) -> Option<&Entry> {
        self.by_name.get(name).and_then(|id| self.entries.get(id))
    }

    /// Qualified name registered for `id`.
    pub fn name_for_id(&self, id: u32) -> Option<&str> {
        self.entries.get(&id).map(Entry::name)
    }

    /// Constructor ID registered under `name`. When two IDs share a name,
    /// the one registered first.
    pub fn id_for_name(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    /// The constructor of boxed type `base`, if it has exactly one. This is
    /// what a `%Base` field is written as.
    pub fn sole_constructor(&self, base: &str) -> Option<u32> {
        self.by_base.get(base).copied().flatten()
    }

    /// Number of registered constructors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decodes one boxed object from the start of `bytes`.
    ///
    /// Bytes after the object are ignored; the transport layer above knows
    /// whether they are padding.
    pub fn decode(&self, bytes: &[u8]) -> Result<Object> {
        self.decode_with(bytes, crate::DecodeConfig::default())
    }

    /// [`Registry::decode`] with an explicit configuration.
    pub fn decode_with(&self, bytes: &[u8], config: crate::DecodeConfig) -> Result<Object> {
        let mut cursor = Cursor::with_registry(bytes, self).with_config(config);
        let object = crate::object::read_object(&mut cursor)?;
        if cursor.remaining() > 0 {
            log::debug!(
                "{} trailing bytes after {}",
                cursor.remaining(),
                object.qualified_name()
            );
        }
        Ok(object)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("len", &self.entries.len()).finish()
    }
}
