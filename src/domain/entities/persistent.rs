//! Base contract shared by every persistent entity.
//!
//! Entities reference each other through [`EntityRef`], a shared handle whose
//! pointer identity is the identity used when walking an entity graph. Each
//! entity declares which of its references must carry an id before it can be
//! persisted ([`PersistentEntity::stream_sequenced_dependencies`]); the
//! provided methods walk those declarations to sequence a whole graph.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{
    AddressEntity, BlogEntity, BlogEntryEntity, GuestBookEntity, GuestBookEntryEntity,
    PersonEntity, UserEntity,
};
use crate::domain::sequencing::{EntityId, EntityKind, Sequencer};
use crate::domain::value_objects::PersistentData;

/// Identity of an entity inside one process, derived from its allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityKey(usize);

/// Shared, mutable handle to an entity.
///
/// Cloning the handle shares the entity; use
/// [`EntityRef::copy_without_id`] for a structural copy. Equality is pointer
/// identity first, then the entity's own business-field equality.
pub struct EntityRef<T>(Arc<RwLock<T>>);

impl<T> EntityRef<T> {
    pub fn new(entity: T) -> Self {
        Self(Arc::new(RwLock::new(entity)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write()
    }

    /// Whether both handles point at the same entity instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn key(&self) -> EntityKey {
        EntityKey(Arc::as_ptr(&self.0) as *const () as usize)
    }

    /// A handle that does not keep the entity alive.
    pub fn downgrade(&self) -> WeakEntityRef<T> {
        WeakEntityRef(Arc::downgrade(&self.0))
    }
}

impl<T: PersistentEntity> EntityRef<T> {
    pub fn id(&self) -> Option<EntityId> {
        self.read().id()
    }

    /// A new, unshared entity structurally equal to this one, without id.
    /// Copied owned entities point back at the new copy.
    pub fn copy_without_id(&self) -> Self {
        let copy = Self::new(self.read().copy_without_id());
        T::claim_owned(&copy);
        copy
    }

    /// Transitive sequenced dependencies, excluding this entity itself.
    pub fn fetch_all_sequenced_dependencies(&self) -> Vec<EntityHandle> {
        let direct = self.read().stream_sequenced_dependencies();
        collect_transitive(direct, Some(self.key()))
    }

    /// Gives this entity and every transitive dependency without an id the
    /// next id from `sequencer`. No lock on this entity is held while its
    /// dependencies are visited.
    pub fn add_sequenced_id<S>(&self, sequencer: &S) -> &Self
    where
        S: Sequencer + ?Sized,
    {
        {
            let mut entity = self.write();
            if entity.id().is_none() {
                let id = sequencer.next_val(T::KIND);
                entity.assign_id(id);
                tracing::debug!(kind = %T::KIND, id, "Sequenced id assigned");
            }
        }

        assign_missing_ids(&self.fetch_all_sequenced_dependencies(), sequencer);
        self
    }
}

/// Non-owning counterpart of [`EntityRef`].
pub struct WeakEntityRef<T>(Weak<RwLock<T>>);

impl<T> WeakEntityRef<T> {
    pub fn upgrade(&self) -> Option<EntityRef<T>> {
        self.0.upgrade().map(EntityRef)
    }
}

impl<T> Clone for WeakEntityRef<T> {
    fn clone(&self) -> Self {
        Self(Weak::clone(&self.0))
    }
}

/// Reference from an entry to the blog or guest book it belongs to.
///
/// The parent owns its entries, so once an entry is one of them it only
/// holds the parent weakly. Until then the entry keeps the parent alive.
pub enum ParentRef<T> {
    /// The parent does not own the entry (yet).
    Detached(EntityRef<T>),
    /// The entry is one of the parent's owned entries.
    Owned(WeakEntityRef<T>),
}

impl<T> ParentRef<T> {
    pub fn get(&self) -> Option<EntityRef<T>> {
        match self {
            Self::Detached(parent) => Some(parent.clone()),
            Self::Owned(parent) => parent.upgrade(),
        }
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }
}

impl<T> Clone for ParentRef<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Detached(parent) => Self::Detached(parent.clone()),
            Self::Owned(parent) => Self::Owned(parent.clone()),
        }
    }
}

impl<T: PersistentEntity> fmt::Debug for ParentRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detached(_) => write!(f, "Detached({})", T::KIND),
            Self::Owned(_) => write!(f, "Owned({})", T::KIND),
        }
    }
}

impl<T> Clone for EntityRef<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> From<T> for EntityRef<T> {
    fn from(entity: T) -> Self {
        Self::new(entity)
    }
}

impl<T: fmt::Debug> fmt::Debug for EntityRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read().fmt(f)
    }
}

impl<T: PartialEq> PartialEq for EntityRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.read() == *other.read()
    }
}

impl<T: Eq> Eq for EntityRef<T> {}

impl<T: Hash> Hash for EntityRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.read().hash(state);
    }
}

/// Contract every concrete entity implements.
///
/// Equality of implementors must only consider business fields: never the id
/// and never the audit state.
pub trait PersistentEntity: Send + Sync + Sized + 'static {
    const KIND: EntityKind;

    fn id(&self) -> Option<EntityId>;

    /// Sets the surrogate key. Only called on entities without one.
    fn assign_id(&mut self, id: EntityId);

    fn persistent_data(&self) -> &PersistentData;

    fn replace_persistent_data(&mut self, persistent_data: PersistentData);

    /// Structurally equal copy with no id and fresh audit state. Owned
    /// dependencies are copied the same way, shared references are kept.
    fn copy_without_id(&self) -> Self;

    /// Direct references that need an id before this entity is persisted.
    fn stream_sequenced_dependencies(&self) -> SequencedDependencies;

    /// Points owned entities back at `entity` once it is behind a handle.
    fn claim_owned(_entity: &EntityRef<Self>) {}

    /// Refreshes the modification actor and timestamp.
    fn modified_by(&mut self, modifier: &str) -> &mut Self {
        let touched = self.persistent_data().touch(modifier);
        self.replace_persistent_data(touched);
        self
    }

    /// Depth-first, de-duplicated closure of the sequenced dependencies.
    fn fetch_all_sequenced_dependencies(&self) -> Vec<EntityHandle> {
        collect_transitive(self.stream_sequenced_dependencies(), None)
    }

    /// Gives this entity and every transitive dependency without an id the
    /// next id from `sequencer`.
    fn add_sequenced_id<S>(&mut self, sequencer: &S) -> &mut Self
    where
        S: Sequencer + ?Sized,
    {
        if self.id().is_none() {
            let id = sequencer.next_val(Self::KIND);
            self.assign_id(id);
            tracing::debug!(kind = %Self::KIND, id, "Sequenced id assigned");
        }

        assign_missing_ids(&self.fetch_all_sequenced_dependencies(), sequencer);
        self
    }
}

/// Type-erased handle to any concrete entity, compared by identity.
#[derive(Debug, Clone)]
pub enum EntityHandle {
    Address(EntityRef<AddressEntity>),
    Person(EntityRef<PersonEntity>),
    User(EntityRef<UserEntity>),
    Blog(EntityRef<BlogEntity>),
    BlogEntry(EntityRef<BlogEntryEntity>),
    GuestBook(EntityRef<GuestBookEntity>),
    GuestBookEntry(EntityRef<GuestBookEntryEntity>),
}

macro_rules! with_entity {
    ($handle:expr, $entity:ident => $body:expr) => {
        match $handle {
            EntityHandle::Address($entity) => $body,
            EntityHandle::Person($entity) => $body,
            EntityHandle::User($entity) => $body,
            EntityHandle::Blog($entity) => $body,
            EntityHandle::BlogEntry($entity) => $body,
            EntityHandle::GuestBook($entity) => $body,
            EntityHandle::GuestBookEntry($entity) => $body,
        }
    };
}

macro_rules! entity_handle_from {
    ($($variant:ident => $entity:ty),* $(,)?) => {
        $(
            impl From<EntityRef<$entity>> for EntityHandle {
                fn from(entity: EntityRef<$entity>) -> Self {
                    EntityHandle::$variant(entity)
                }
            }
        )*
    };
}

macro_rules! entity_handle_try_into {
    ($($variant:ident => $entity:ty),* $(,)?) => {
        $(
            impl TryFrom<EntityHandle> for EntityRef<$entity> {
                type Error = EntityHandle;

                fn try_from(handle: EntityHandle) -> Result<Self, EntityHandle> {
                    match handle {
                        EntityHandle::$variant(entity) => Ok(entity),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

entity_handle_try_into! {
    Address => AddressEntity,
    Person => PersonEntity,
    User => UserEntity,
    Blog => BlogEntity,
    BlogEntry => BlogEntryEntity,
    GuestBook => GuestBookEntity,
    GuestBookEntry => GuestBookEntryEntity,
}

entity_handle_from! {
    Address => AddressEntity,
    Person => PersonEntity,
    User => UserEntity,
    Blog => BlogEntity,
    BlogEntry => BlogEntryEntity,
    GuestBook => GuestBookEntity,
    GuestBookEntry => GuestBookEntryEntity,
}

impl EntityHandle {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Address(_) => EntityKind::Address,
            Self::Person(_) => EntityKind::Person,
            Self::User(_) => EntityKind::User,
            Self::Blog(_) => EntityKind::Blog,
            Self::BlogEntry(_) => EntityKind::BlogEntry,
            Self::GuestBook(_) => EntityKind::GuestBook,
            Self::GuestBookEntry(_) => EntityKind::GuestBookEntry,
        }
    }

    pub fn key(&self) -> EntityKey {
        with_entity!(self, entity => entity.key())
    }

    pub fn id(&self) -> Option<EntityId> {
        with_entity!(self, entity => entity.read().id())
    }

    pub fn assign_id(&self, id: EntityId) {
        with_entity!(self, entity => entity.write().assign_id(id))
    }

    pub fn stream_sequenced_dependencies(&self) -> SequencedDependencies {
        with_entity!(self, entity => entity.read().stream_sequenced_dependencies())
    }

    /// Transitive sequenced dependencies, excluding this entity itself.
    pub fn fetch_all_sequenced_dependencies(&self) -> Vec<EntityHandle> {
        collect_transitive(self.stream_sequenced_dependencies(), Some(self.key()))
    }

    pub fn add_sequenced_id<S>(&self, sequencer: &S)
    where
        S: Sequencer + ?Sized,
    {
        with_entity!(self, entity => {
            entity.add_sequenced_id(sequencer);
        })
    }

    pub fn modified_by(&self, modifier: &str) {
        with_entity!(self, entity => {
            entity.write().modified_by(modifier);
        })
    }

    /// Records `actor` wherever the audit state only knows the system actor.
    pub fn attribute_to(&self, actor: &str) {
        with_entity!(self, entity => {
            let mut entity = entity.write();
            let attributed = entity.persistent_data().attributed_to(actor);
            entity.replace_persistent_data(attributed);
        })
    }

    /// Whether this handle points at the same instance as `entity`.
    pub fn refers_to<T>(&self, entity: &EntityRef<T>) -> bool {
        self.key() == entity.key()
    }
}

impl PartialEq for EntityHandle {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for EntityHandle {}

impl Hash for EntityHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "{}.id<{}>", self.kind(), id),
            None => write!(f, "{}.id<null>", self.kind()),
        }
    }
}

/// Lazy sequence of optional direct dependencies.
#[derive(Debug)]
pub struct SequencedDependencies {
    dependencies: std::vec::IntoIter<Option<EntityHandle>>,
}

impl SequencedDependencies {
    pub fn empty() -> Self {
        Self {
            dependencies: Vec::new().into_iter(),
        }
    }

    /// Absent input yields an empty sequence.
    pub fn of<I>(dependencies: Option<I>) -> Self
    where
        I: IntoIterator<Item = Option<EntityHandle>>,
    {
        match dependencies {
            Some(dependencies) => Self {
                dependencies: dependencies.into_iter().collect::<Vec<_>>().into_iter(),
            },
            None => Self::empty(),
        }
    }

    /// Only the dependencies that are present.
    pub fn present(self) -> impl Iterator<Item = EntityHandle> {
        self.flatten()
    }
}

impl Iterator for SequencedDependencies {
    type Item = Option<EntityHandle>;

    fn next(&mut self) -> Option<Self::Item> {
        self.dependencies.next()
    }
}

fn collect_transitive(direct: SequencedDependencies, root: Option<EntityKey>) -> Vec<EntityHandle> {
    let mut seen: HashSet<EntityKey> = root.into_iter().collect();
    let mut all = Vec::new();

    let mut stack: Vec<EntityHandle> = direct.present().collect();
    stack.reverse();

    while let Some(handle) = stack.pop() {
        if !seen.insert(handle.key()) {
            continue;
        }

        let mut next: Vec<EntityHandle> = handle.stream_sequenced_dependencies().present().collect();
        next.reverse();
        stack.extend(next);
        all.push(handle);
    }

    all
}

fn assign_missing_ids<S>(dependencies: &[EntityHandle], sequencer: &S)
where
    S: Sequencer + ?Sized,
{
    for dependency in dependencies.iter().filter(|d| d.id().is_none()) {
        let kind = dependency.kind();
        let id = sequencer.next_val(kind);
        dependency.assign_id(id);
        tracing::debug!(%kind, id, "Sequenced id assigned to dependency");
    }
}
