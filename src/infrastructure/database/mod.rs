//! Database Module
//!
//! In-memory tables, one per entity kind, keyed by id.
//!
//! Saving an entity sequences it and every transitive sequenced dependency
//! with the configured [`Sequencer`], then stores each of them in its own
//! table. A table keeps one instance per id: saving another instance with a
//! stored id updates the stored one in place, and references are re-pointed
//! at the stored instances. What a lookup returns is therefore always the
//! instance every other stored entity refers to.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::domain::entities::{
    AddressEntity, BlogEntity, BlogEntryEntity, EntityHandle, EntityRef, GuestBookEntity,
    GuestBookEntryEntity, PersistentEntity, PersonEntity, UserEntity,
};
use crate::domain::sequencing::{EntityId, EntityKind, Sequencer};
use crate::domain::value_objects::SYSTEM_ACTOR;
use crate::shared::error::AppError;

type Table<T> = DashMap<EntityId, EntityRef<T>>;

/// Process-local storage for every entity kind.
pub struct InMemoryDatabase {
    sequencer: Arc<dyn Sequencer>,
    default_actor: String,
    /// Serialises saves so the username check and the insert stay atomic.
    save_lock: Mutex<()>,
    addresses: Table<AddressEntity>,
    people: Table<PersonEntity>,
    users: Table<UserEntity>,
    usernames: DashMap<String, EntityId>,
    blogs: Table<BlogEntity>,
    blog_entries: Table<BlogEntryEntity>,
    guest_books: Table<GuestBookEntity>,
    guest_book_entries: Table<GuestBookEntryEntity>,
}

impl InMemoryDatabase {
    pub fn new(sequencer: Arc<dyn Sequencer>) -> Self {
        Self {
            sequencer,
            default_actor: SYSTEM_ACTOR.to_string(),
            save_lock: Mutex::new(()),
            addresses: DashMap::new(),
            people: DashMap::new(),
            users: DashMap::new(),
            usernames: DashMap::new(),
            blogs: DashMap::new(),
            blog_entries: DashMap::new(),
            guest_books: DashMap::new(),
            guest_book_entries: DashMap::new(),
        }
    }

    /// Actor recorded on saved entities in place of the system actor, and
    /// as modifier when a stored entity is saved again.
    pub fn with_default_actor(mut self, actor: impl Into<String>) -> Self {
        self.default_actor = actor.into();
        self
    }

    /// Sequences and stores `entity` along with every transitive sequenced
    /// dependency, and returns the stored instance.
    ///
    /// An entry that is not yet one of its parent's entries is added to the
    /// stored parent first. When the parent already has an entry with the
    /// same content, that entry is saved and returned instead.
    ///
    /// # Errors
    ///
    /// `AppError::Conflict` when a user in the graph would take a username
    /// stored under another id. Nothing is sequenced or stored then.
    pub fn persist<T>(&self, entity: EntityRef<T>) -> Result<EntityRef<T>, AppError>
    where
        T: PersistentEntity,
        EntityHandle: From<EntityRef<T>>,
        EntityRef<T>: TryFrom<EntityHandle, Error = EntityHandle>,
    {
        let _guard = self.save_lock.lock();
        let incoming = EntityHandle::from(entity);
        self.check_usernames(&graph_of(&incoming))?;

        let (root, _parent) = self.adopt(incoming);
        let graph = graph_of(&root);

        if self.contains(&root) {
            root.modified_by(&self.default_actor);
        }
        for handle in graph.iter().filter(|handle| handle.id().is_none()) {
            handle.attribute_to(&self.default_actor);
        }

        root.add_sequenced_id(self.sequencer.as_ref());

        let stored = graph
            .iter()
            .map(|handle| self.store(handle))
            .collect::<Result<Vec<_>, _>>()?;
        for handle in &stored {
            self.relink(handle);
        }

        tracing::debug!(root = %root, stored = stored.len(), "Entity graph persisted");
        let saved = self
            .row(&root)
            .ok_or_else(|| AppError::Internal(format!("{} was not stored", root)))?;
        EntityRef::try_from(saved)
            .map_err(|handle| AppError::Internal(format!("{} is not a {}", handle, T::KIND)))
    }

    fn check_usernames(&self, graph: &[EntityHandle]) -> Result<(), AppError> {
        for handle in graph {
            if let EntityHandle::User(user) = handle {
                self.check_username(user)?;
            }
        }

        Ok(())
    }

    fn check_username(&self, user: &EntityRef<UserEntity>) -> Result<(), AppError> {
        let (id, username) = {
            let user = user.read();
            (user.id(), user.username().map(str::to_string))
        };
        let Some(username) = username else {
            return Ok(());
        };

        let taken_by = self.usernames.get(&username).map(|entry| *entry.value());
        match taken_by {
            Some(existing) if Some(existing) != id => Err(AppError::Conflict(format!(
                "Username '{}' is already taken",
                username
            ))),
            _ => Ok(()),
        }
    }

    /// Makes a detached entry one of the entries of its stored parent.
    ///
    /// Returns the entry to save, which is the parent's equal entry when it
    /// already has one, along with the parent. An owned entry only holds its
    /// parent weakly, so the caller keeps the parent until it is stored.
    fn adopt(&self, root: EntityHandle) -> (EntityHandle, Option<EntityHandle>) {
        if self.contains(&root) {
            return (root, None);
        }

        match root {
            EntityHandle::BlogEntry(entry) => {
                let parent = {
                    let entry = entry.read();
                    (!entry.is_owned()).then(|| entry.blog()).flatten()
                };
                match parent {
                    Some(blog) => {
                        let blog = stored_or(&self.blogs, blog);
                        (blog.add_entry(entry).into(), Some(blog.into()))
                    }
                    None => (entry.into(), None),
                }
            }
            EntityHandle::GuestBookEntry(entry) => {
                let parent = {
                    let entry = entry.read();
                    (!entry.is_owned()).then(|| entry.guest_book()).flatten()
                };
                match parent {
                    Some(guest_book) => {
                        let guest_book = stored_or(&self.guest_books, guest_book);
                        (guest_book.add_entry(entry).into(), Some(guest_book.into()))
                    }
                    None => (entry.into(), None),
                }
            }
            other => (other, None),
        }
    }

    fn contains(&self, handle: &EntityHandle) -> bool {
        let Some(id) = handle.id() else {
            return false;
        };

        match handle.kind() {
            EntityKind::Address => self.addresses.contains_key(&id),
            EntityKind::Person => self.people.contains_key(&id),
            EntityKind::User => self.users.contains_key(&id),
            EntityKind::Blog => self.blogs.contains_key(&id),
            EntityKind::BlogEntry => self.blog_entries.contains_key(&id),
            EntityKind::GuestBook => self.guest_books.contains_key(&id),
            EntityKind::GuestBookEntry => self.guest_book_entries.contains_key(&id),
        }
    }

    /// The stored instance with the same kind and id as `handle`.
    fn row(&self, handle: &EntityHandle) -> Option<EntityHandle> {
        let id = handle.id()?;

        match handle.kind() {
            EntityKind::Address => select_by_id(&self.addresses, id).map(EntityHandle::from),
            EntityKind::Person => select_by_id(&self.people, id).map(EntityHandle::from),
            EntityKind::User => select_by_id(&self.users, id).map(EntityHandle::from),
            EntityKind::Blog => select_by_id(&self.blogs, id).map(EntityHandle::from),
            EntityKind::BlogEntry => select_by_id(&self.blog_entries, id).map(EntityHandle::from),
            EntityKind::GuestBook => select_by_id(&self.guest_books, id).map(EntityHandle::from),
            EntityKind::GuestBookEntry => {
                select_by_id(&self.guest_book_entries, id).map(EntityHandle::from)
            }
        }
    }

    /// Stores `handle` and returns the instance now stored under its id.
    fn store(&self, handle: &EntityHandle) -> Result<EntityHandle, AppError> {
        let id = handle
            .id()
            .ok_or_else(|| AppError::Internal(format!("{} was not sequenced", handle)))?;

        let stored: EntityHandle = match handle {
            EntityHandle::Address(address) => {
                upsert(&self.addresses, id, address, AddressEntity::update_from).into()
            }
            EntityHandle::Person(person) => {
                upsert(&self.people, id, person, PersonEntity::update_from).into()
            }
            EntityHandle::User(user) => {
                let user = upsert(&self.users, id, user, UserEntity::update_from);
                let username = user.read().username().map(str::to_string);
                self.usernames.retain(|_, stored| *stored != id);
                if let Some(username) = username {
                    self.usernames.insert(username, id);
                }
                user.into()
            }
            EntityHandle::Blog(blog) => upsert(&self.blogs, id, blog, BlogEntity::update_from).into(),
            EntityHandle::BlogEntry(entry) => {
                upsert(&self.blog_entries, id, entry, BlogEntryEntity::update_from).into()
            }
            EntityHandle::GuestBook(guest_book) => {
                upsert(&self.guest_books, id, guest_book, GuestBookEntity::update_from).into()
            }
            EntityHandle::GuestBookEntry(entry) => {
                upsert(&self.guest_book_entries, id, entry, GuestBookEntryEntity::update_from).into()
            }
        };

        Ok(stored)
    }

    /// Re-points the references of a stored entity at stored instances.
    fn relink(&self, handle: &EntityHandle) {
        match handle {
            EntityHandle::Address(_) => {}
            EntityHandle::Person(person) => {
                let address = person.read().address().cloned();
                if let Some(address) = address.and_then(|address| replaced(&self.addresses, &address)) {
                    person.write().set_address(Some(address));
                }
            }
            EntityHandle::User(user) => {
                let person = user.read().person().cloned();
                if let Some(person) = person.and_then(|person| replaced(&self.people, &person)) {
                    user.write().set_person(Some(person));
                }
            }
            EntityHandle::Blog(blog) => {
                let user = blog.read().user().cloned();
                if let Some(user) = user.and_then(|user| replaced(&self.users, &user)) {
                    blog.write().set_user(Some(user));
                }
            }
            EntityHandle::GuestBook(guest_book) => {
                let user = guest_book.read().user().cloned();
                if let Some(user) = user.and_then(|user| replaced(&self.users, &user)) {
                    guest_book.write().set_user(Some(user));
                }
            }
            EntityHandle::BlogEntry(entry) => {
                let (owned, blog) = {
                    let entry = entry.read();
                    (entry.is_owned(), entry.blog())
                };
                let Some(blog) = blog else {
                    return;
                };
                let stored_blog = replaced(&self.blogs, &blog);
                if owned && stored_blog.is_none() {
                    return;
                }

                let member = stored_blog.unwrap_or(blog).add_entry(entry.clone());
                if !member.ptr_eq(entry) {
                    drop_row(&self.blog_entries, entry);
                }
            }
            EntityHandle::GuestBookEntry(entry) => {
                let (owned, guest_book) = {
                    let entry = entry.read();
                    (entry.is_owned(), entry.guest_book())
                };
                let Some(guest_book) = guest_book else {
                    return;
                };
                let stored_guest_book = replaced(&self.guest_books, &guest_book);
                if owned && stored_guest_book.is_none() {
                    return;
                }

                let member = stored_guest_book.unwrap_or(guest_book).add_entry(entry.clone());
                if !member.ptr_eq(entry) {
                    drop_row(&self.guest_book_entries, entry);
                }
            }
        }
    }

    /// Number of stored rows of the given kind.
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Address => self.addresses.len(),
            EntityKind::Person => self.people.len(),
            EntityKind::User => self.users.len(),
            EntityKind::Blog => self.blogs.len(),
            EntityKind::BlogEntry => self.blog_entries.len(),
            EntityKind::GuestBook => self.guest_books.len(),
            EntityKind::GuestBookEntry => self.guest_book_entries.len(),
        }
    }

    pub fn addresses(&self) -> &Table<AddressEntity> {
        &self.addresses
    }

    pub fn people(&self) -> &Table<PersonEntity> {
        &self.people
    }

    pub fn users(&self) -> &Table<UserEntity> {
        &self.users
    }

    pub fn blogs(&self) -> &Table<BlogEntity> {
        &self.blogs
    }

    pub fn blog_entries(&self) -> &Table<BlogEntryEntity> {
        &self.blog_entries
    }

    pub fn guest_books(&self) -> &Table<GuestBookEntity> {
        &self.guest_books
    }

    pub fn guest_book_entries(&self) -> &Table<GuestBookEntryEntity> {
        &self.guest_book_entries
    }

    /// Id of the user with this username.
    pub fn user_id_by_username(&self, username: &str) -> Option<EntityId> {
        self.usernames.get(username).map(|entry| *entry.value())
    }
}

/// The root followed by its transitive sequenced dependencies.
fn graph_of(root: &EntityHandle) -> Vec<EntityHandle> {
    let mut graph = root.fetch_all_sequenced_dependencies();
    graph.push(root.clone());
    graph
}

/// The stored instance with the id of `entity`, or `entity` itself.
fn stored_or<T: PersistentEntity>(table: &Table<T>, entity: EntityRef<T>) -> EntityRef<T> {
    entity
        .id()
        .and_then(|id| select_by_id(table, id))
        .unwrap_or(entity)
}

/// The stored instance with the id of `entity`, when that is another instance.
fn replaced<T: PersistentEntity>(table: &Table<T>, entity: &EntityRef<T>) -> Option<EntityRef<T>> {
    let row = select_by_id(table, entity.id()?)?;
    (!row.ptr_eq(entity)).then_some(row)
}

/// Inserts `incoming`, or updates the instance already stored under `id`
/// from it. Returns the stored instance.
fn upsert<T>(
    table: &Table<T>,
    id: EntityId,
    incoming: &EntityRef<T>,
    update: fn(&mut T, &T),
) -> EntityRef<T> {
    match select_by_id(table, id) {
        Some(existing) if !existing.ptr_eq(incoming) => {
            update(&mut existing.write(), &incoming.read());
            existing
        }
        _ => {
            table.insert(id, incoming.clone());
            incoming.clone()
        }
    }
}

/// Removes the row of `entity` if it is that exact instance.
fn drop_row<T: PersistentEntity>(table: &Table<T>, entity: &EntityRef<T>) {
    if let Some(id) = entity.id() {
        table.remove_if(&id, |_, row| row.ptr_eq(entity));
    }
}

/// Rows of `table` matching `predicate`, ordered by id.
pub fn select<T, F>(table: &Table<T>, predicate: F) -> Vec<EntityRef<T>>
where
    F: Fn(&T) -> bool,
{
    let mut rows: Vec<(EntityId, EntityRef<T>)> = table
        .iter()
        .filter(|row| predicate(&row.value().read()))
        .map(|row| (*row.key(), row.value().clone()))
        .collect();

    rows.sort_by_key(|(id, _)| *id);
    rows.into_iter().map(|(_, entity)| entity).collect()
}

/// The row with this id, if any.
pub fn select_by_id<T>(table: &Table<T>, id: EntityId) -> Option<EntityRef<T>> {
    table.get(&id).map(|row| row.value().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::AsDto;
    use crate::domain::builder::EntityBuilder;
    use crate::domain::sequencing::InMemorySequencer;
    use crate::domain::value_objects::PersistentData;

    fn database() -> InMemoryDatabase {
        InMemoryDatabase::new(Arc::new(InMemorySequencer::new(1)))
    }

    fn user(username: &str) -> EntityRef<UserEntity> {
        let address = AddressEntity::builder()
            .with_address_line_1("somewhere")
            .with_city("svg")
            .with_zip_code("1001")
            .build()
            .expect("Failed to build address");
        let person = PersonEntity::builder()
            .with_surname("jacobsen")
            .with_address(address.into())
            .build()
            .expect("Failed to build person");

        UserEntity::builder()
            .with_username(username)
            .with_person(person.into())
            .build()
            .expect("Failed to build user")
            .into()
    }

    #[test]
    fn test_persist_cascades_to_every_dependency() {
        let db = database();

        let saved = db.persist(user("jactor")).expect("Failed to persist");

        assert_eq!(saved.id(), Some(1));
        assert_eq!(db.count(EntityKind::User), 1);
        assert_eq!(db.count(EntityKind::Person), 1);
        assert_eq!(db.count(EntityKind::Address), 1);
        assert_eq!(db.user_id_by_username("jactor"), Some(1));
    }

    #[test]
    fn test_persist_keeps_shared_user_once() {
        let db = database();
        let user = user("jactor");
        let blog: EntityRef<BlogEntity> = BlogEntity::builder()
            .with_title("general ignorance")
            .with_user(user.clone())
            .build()
            .expect("Failed to build blog")
            .into();
        let guest_book: EntityRef<GuestBookEntity> = GuestBookEntity::builder()
            .with_title("enter when applied")
            .with_user(user.clone())
            .build()
            .expect("Failed to build guest book")
            .into();

        db.persist(blog).expect("Failed to persist blog");
        db.persist(guest_book).expect("Failed to persist guest book");

        assert_eq!(db.count(EntityKind::User), 1);
        assert_eq!(db.count(EntityKind::Blog), 1);
        assert_eq!(db.count(EntityKind::GuestBook), 1);
    }

    #[test]
    fn test_duplicate_username_is_conflict_and_nothing_is_sequenced() {
        let db = database();
        db.persist(user("jactor")).expect("Failed to persist");
        let duplicate = user("jactor");

        let error = db.persist(duplicate.clone()).unwrap_err();

        assert!(matches!(error, AppError::Conflict(_)));
        assert_eq!(duplicate.id(), None);
        assert_eq!(db.count(EntityKind::Person), 1);
    }

    #[test]
    fn test_default_actor_is_recorded_on_new_and_saved_again_entities() {
        let db = database().with_default_actor("batch");
        let user = db.persist(user("jactor")).expect("Failed to persist");
        {
            let user = user.read();
            assert_eq!(user.persistent_data().created_by(), "batch");
            assert_eq!(user.persistent_data().modified_by(), "batch");
        }
        let address = select_by_id(db.addresses(), 1).expect("No address stored");
        assert_eq!(address.read().persistent_data().created_by(), "batch");

        user.write().modified_by("tip");
        user.write().set_username("tip");
        db.persist(user.clone()).expect("Failed to persist again");

        assert_eq!(user.read().persistent_data().modified_by(), "batch");
        assert_eq!(db.count(EntityKind::User), 1);
        assert_eq!(db.user_id_by_username("tip"), Some(1));
        assert_eq!(db.user_id_by_username("jactor"), None);
    }

    #[test]
    fn test_actor_given_by_caller_is_kept() {
        let db = database().with_default_actor("batch");
        let user = user("jactor");
        user.write().replace_persistent_data(PersistentData::new("tip"));

        let saved = db.persist(user).expect("Failed to persist");

        assert_eq!(saved.read().persistent_data().created_by(), "tip");
    }

    fn blog_of(user: EntityRef<UserEntity>) -> EntityRef<BlogEntity> {
        BlogEntity::builder()
            .with_title("general ignorance")
            .with_user(user)
            .build()
            .expect("Failed to build blog")
            .into()
    }

    fn entry_in(blog: &EntityRef<BlogEntity>, entry: &str) -> EntityRef<BlogEntryEntity> {
        BlogEntryEntity::builder()
            .with_blog(blog.clone())
            .with_creator_name("jactor")
            .with_entry(entry)
            .build()
            .expect("Failed to build blog entry")
            .into()
    }

    fn entries_of(db: &InMemoryDatabase, blog_id: Option<EntityId>) -> Vec<EntityRef<BlogEntryEntity>> {
        select(db.blog_entries(), |entry| {
            entry.blog().and_then(|blog| blog.id()) == blog_id
        })
    }

    #[test]
    fn test_persisted_entry_becomes_one_of_the_blog_entries() {
        let db = database();
        let blog = blog_of(user("jactor"));
        let entry = entry_in(&blog, "the one");

        let saved = db.persist(entry.clone()).expect("Failed to persist entry");

        assert!(saved.ptr_eq(&entry));
        assert!(saved.read().is_owned());
        assert_eq!(blog.read().entries().len(), 1);
        assert_eq!(db.count(EntityKind::Blog), 1);
    }

    #[test]
    fn test_persisting_a_blog_copy_cascades_its_entries() {
        let db = database();
        let blog = blog_of(user("jactor"));
        db.persist(entry_in(&blog, "the one")).expect("Failed to persist entry");

        let copy = db.persist(blog.copy_without_id()).expect("Failed to persist copy");

        assert_ne!(copy.id(), blog.id());
        assert_eq!(entries_of(&db, copy.id()).len(), 1);
        assert_eq!(entries_of(&db, blog.id()).len(), 1);
        assert_eq!(db.count(EntityKind::BlogEntry), 2);
    }

    #[test]
    fn test_entry_with_equal_content_is_stored_once() {
        let db = database();
        let blog = blog_of(user("jactor"));
        let first = db.persist(entry_in(&blog, "the one")).expect("Failed to persist entry");
        db.persist(entry_in(&blog, "the other")).expect("Failed to persist entry");

        let again = db.persist(entry_in(&blog, "the one")).expect("Failed to persist entry");

        assert!(again.ptr_eq(&first));
        assert_eq!(db.count(EntityKind::BlogEntry), 2);
        assert_eq!(blog.read().entries().len(), 2);
    }

    #[test]
    fn test_entry_of_unstored_blog_copy_joins_the_stored_blog() {
        let db = database();
        let blog = db.persist(blog_of(user("jactor"))).expect("Failed to persist blog");
        let detached: EntityRef<BlogEntity> = BlogEntity::from(&blog.as_dto()).into();

        let entry = db
            .persist(entry_in(&detached, "the one"))
            .expect("Failed to persist entry");

        assert!(entry.read().blog().expect("No blog on entry").ptr_eq(&blog));
        assert_eq!(blog.read().entries().len(), 1);
        assert_eq!(db.count(EntityKind::Blog), 1);
    }

    #[test]
    fn test_guest_book_copy_cascades_its_entries() {
        let db = database();
        let guest_book: EntityRef<GuestBookEntity> = GuestBookEntity::builder()
            .with_title("enter when applied")
            .with_user(user("jactor"))
            .build()
            .expect("Failed to build guest book")
            .into();
        let entry: EntityRef<GuestBookEntryEntity> = GuestBookEntryEntity::builder()
            .with_guest_book(guest_book.clone())
            .with_creator_name("guest")
            .with_entry("hello")
            .build()
            .expect("Failed to build guest book entry")
            .into();
        db.persist(entry).expect("Failed to persist entry");

        let copy = db
            .persist(guest_book.copy_without_id())
            .expect("Failed to persist copy");

        let entries = select(db.guest_book_entries(), |entry| {
            entry.guest_book().and_then(|guest_book| guest_book.id()) == copy.id()
        });
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_saving_a_rebuilt_user_updates_the_stored_instance() {
        let db = database();
        let stored = db.persist(user("jactor")).expect("Failed to persist user");
        let blog = db.persist(blog_of(stored.clone())).expect("Failed to persist blog");
        let mut dto = stored.as_dto();
        dto.email_address = Some("jactor@somewhere".to_string());

        let saved = db
            .persist(EntityRef::new(UserEntity::from(&dto)))
            .expect("Failed to persist rebuilt user");

        assert!(saved.ptr_eq(&stored));
        let blog_user = blog.read().user().cloned().expect("No user on blog");
        assert!(blog_user.ptr_eq(&stored));
        assert_eq!(blog_user.read().email_address(), Some("jactor@somewhere"));
        assert!(stored
            .read()
            .person()
            .expect("No person on user")
            .ptr_eq(&select_by_id(db.people(), 1).expect("No person stored")));
        assert_eq!(db.count(EntityKind::User), 1);
        assert_eq!(db.count(EntityKind::Person), 1);
    }

    #[test]
    fn test_select_orders_by_id() {
        let db = database();
        db.persist(user("b")).expect("Failed to persist");
        db.persist(user("a")).expect("Failed to persist");

        let users = select(db.users(), |_| true);
        let ids: Vec<_> = users.iter().map(|user| user.id()).collect();

        assert_eq!(ids, vec![Some(1), Some(2)]);
        assert!(select_by_id(db.users(), 3).is_none());
    }
}
