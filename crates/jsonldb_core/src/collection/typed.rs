//! Typed collection implementation.

use super::Collection;
use crate::error::CoreResult;
use crate::file::{Rewrite, RewriteResult};
use jsonldb_codec::{from_record, to_record, Record};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// A collection of values of type `T`.
///
/// Records are converted with serde on the way in and out. Filtering is
/// done with plain Rust closures over `T`.
///
/// Records that do not deserialize into `T` are invisible to queries
/// (logged at `warn` level) and are written back unchanged by
/// [`TypedCollection::update`] and [`TypedCollection::delete`].
///
/// # Example
///
/// ```rust
/// use jsonldb_core::CollectionDir;
/// use serde::{Deserialize, Serialize};
/// # let tmp = tempfile::tempdir().unwrap();
///
/// #[derive(Debug, Serialize, Deserialize, PartialEq)]
/// struct User {
///     name: String,
///     age: u32,
/// }
///
/// let db = CollectionDir::open_default(tmp.path()).unwrap();
/// let users = db.typed_collection::<User>("users").unwrap();
/// users.insert(&User { name: "Alice".into(), age: 30 }).unwrap();
///
/// let adults = users.find(|u| u.age >= 18).unwrap();
/// assert_eq!(adults[0].name, "Alice");
/// ```
pub struct TypedCollection<T> {
    inner: Collection,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for TypedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for TypedCollection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedCollection")
            .field("name", &self.inner.name())
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> TypedCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub(crate) fn new(inner: Collection) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    /// Returns the collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Returns the untyped collection.
    #[must_use]
    pub fn untyped(&self) -> &Collection {
        &self.inner
    }

    /// Inserts one value.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` does not serialize to a JSON object or
    /// the write fails.
    pub fn insert(&self, value: &T) -> CoreResult<()> {
        self.inner.file().insert(value)
    }

    /// Inserts values in order as one append.
    ///
    /// # Errors
    ///
    /// Returns an error if any value does not serialize to an object;
    /// nothing is written then.
    pub fn insert_many<'a, I>(&self, values: I) -> CoreResult<usize>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let records = values
            .into_iter()
            .map(to_record)
            .collect::<Result<Vec<_>, _>>()?;
        self.inner.file().append_all(&records)
    }

    /// Returns every value, in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn all(&self) -> CoreResult<Vec<T>> {
        self.find(|_| true)
    }

    /// Returns every value satisfying `predicate`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn find<P>(&self, mut predicate: P) -> CoreResult<Vec<T>>
    where
        P: FnMut(&T) -> bool,
    {
        let mut found = Vec::new();
        for record in self.inner.file().records()? {
            if let Some(value) = self.decode(record?) {
                if predicate(&value) {
                    found.push(value);
                }
            }
        }
        Ok(found)
    }

    /// Returns the first value satisfying `predicate`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn find_one<P>(&self, mut predicate: P) -> CoreResult<Option<T>>
    where
        P: FnMut(&T) -> bool,
    {
        for record in self.inner.file().records()? {
            if let Some(value) = self.decode(record?) {
                if predicate(&value) {
                    return Ok(Some(value));
                }
            }
        }
        Ok(None)
    }

    /// Counts values satisfying `predicate`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn count<P>(&self, mut predicate: P) -> CoreResult<usize>
    where
        P: FnMut(&T) -> bool,
    {
        let mut count = 0;
        for record in self.inner.file().records()? {
            if let Some(value) = self.decode(record?) {
                if predicate(&value) {
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    /// Replaces each value satisfying `predicate` with `update_fn(value)`
    /// and persists the result.
    ///
    /// # Errors
    ///
    /// Returns an error if an updated value does not serialize to an
    /// object, or the rewrite fails. The file is unchanged on error.
    pub fn update<P, F>(&self, mut predicate: P, mut update_fn: F) -> CoreResult<RewriteResult>
    where
        P: FnMut(&T) -> bool,
        F: FnMut(T) -> T,
    {
        self.inner.file().rewrite(|record| match self.decode(record.clone()) {
            Some(value) if predicate(&value) => Ok(Rewrite::Replace(to_record(&update_fn(value))?)),
            _ => Ok(Rewrite::Keep(record)),
        })
    }

    /// Removes each value satisfying `predicate` and persists the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the rewrite fails. The file is unchanged on
    /// error.
    pub fn delete<P>(&self, mut predicate: P) -> CoreResult<RewriteResult>
    where
        P: FnMut(&T) -> bool,
    {
        self.inner.file().rewrite(|record| match self.decode(record.clone()) {
            Some(value) if predicate(&value) => Ok(Rewrite::Drop),
            _ => Ok(Rewrite::Keep(record)),
        })
    }

    fn decode(&self, record: Record) -> Option<T> {
        match from_record(record) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(
                    collection = self.name(),
                    reason = %err,
                    "skipping record that does not match the collection type"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::CollectionDir;
    use serde::Deserialize;
    use serde_json::json;
    use tempfile::{tempdir, TempDir};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct User {
        name: String,
        age: u32,
    }

    fn user(name: &str, age: u32) -> User {
        User {
            name: name.to_string(),
            age,
        }
    }

    fn create_test_collection() -> (TempDir, TypedCollection<User>) {
        let temp = tempdir().unwrap();
        let dir = CollectionDir::open_default(temp.path()).unwrap();
        let users = dir.typed_collection::<User>("users").unwrap();
        (temp, users)
    }

    #[test]
    fn insert_and_find() {
        let (_temp, users) = create_test_collection();
        users.insert(&user("Alice", 30)).unwrap();
        users.insert(&user("Bob", 17)).unwrap();

        assert_eq!(users.name(), "users");
        assert_eq!(users.find(|u| u.age >= 18).unwrap(), vec![user("Alice", 30)]);
        assert_eq!(users.find_one(|u| u.name == "Bob").unwrap(), Some(user("Bob", 17)));
        assert_eq!(users.find_one(|u| u.name == "Zed").unwrap(), None);
        assert_eq!(users.count(|_| true).unwrap(), 2);
    }

    #[test]
    fn insert_many_in_order() {
        let (_temp, users) = create_test_collection();
        let batch = vec![user("A", 1), user("B", 2), user("C", 3)];

        assert_eq!(users.insert_many(&batch).unwrap(), 3);
        assert_eq!(users.all().unwrap(), batch);
    }

    #[test]
    fn foreign_records_are_skipped() {
        let (_temp, users) = create_test_collection();
        users.insert(&user("Alice", 30)).unwrap();
        users.untyped().add(json!({"title": "not a user"})).unwrap();

        assert_eq!(users.all().unwrap(), vec![user("Alice", 30)]);
        assert_eq!(users.count(|_| true).unwrap(), 1);
        assert_eq!(users.untyped().count_all().unwrap(), 2);
    }

    #[test]
    fn update_persists_and_keeps_foreign_records() {
        let (_temp, users) = create_test_collection();
        users.insert(&user("Alice", 30)).unwrap();
        users.untyped().add(json!({"title": "not a user"})).unwrap();
        users.insert(&user("Bob", 17)).unwrap();

        let result = users
            .update(
                |u| u.name == "Bob",
                |mut u| {
                    u.age += 1;
                    u
                },
            )
            .unwrap();
        assert_eq!(result.records_matched, 1);
        assert_eq!(result.records_written, 3);

        assert_eq!(users.all().unwrap(), vec![user("Alice", 30), user("Bob", 18)]);
        assert_eq!(users.untyped().count_all().unwrap(), 3);
    }

    #[test]
    fn delete_persists() {
        let (_temp, users) = create_test_collection();
        users
            .insert_many(&[user("Alice", 30), user("Bob", 17), user("Carol", 45)])
            .unwrap();

        let result = users.delete(|u| u.age > 20).unwrap();
        assert_eq!(result.records_matched, 2);
        assert_eq!(users.all().unwrap(), vec![user("Bob", 17)]);
    }
}
