//! Object storage seam.
//!
//! [`ObjectStore`] is the narrow set of bucket calls the handler makes. The
//! bucket is fixed per store instance; keys are full object keys including
//! the user's root folder. [`InMemoryObjectStore`] keeps objects in a sorted
//! map and lists them the way S3 does: lexicographic key order, optional
//! delimiter grouping, and a single page of at most [`DEFAULT_MAX_KEYS`]
//! entries.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::StorageError;

/// Page size of a single listing call, matching the S3 default.
pub const DEFAULT_MAX_KEYS: usize = 1000;

/// One entry of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    /// Full object key.
    pub key: String,
    /// Body size in bytes.
    pub size: u64,
}

/// Result of a single listing call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectListing {
    /// Objects directly matched, in key order.
    pub contents: Vec<ObjectSummary>,
    /// Grouped prefixes (each ending with the delimiter) when a delimiter was given.
    pub common_prefixes: Vec<String>,
    /// Whether more entries exist beyond this page.
    pub is_truncated: bool,
}

impl ObjectListing {
    /// Keys of [`Self::contents`], in listing order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.contents.iter().map(|o| o.key.as_str())
    }
}

/// The bucket operations the file manager needs.
#[async_trait]
pub trait ObjectStore: Send + Sync + fmt::Debug {
    /// Name of the bucket this store writes to.
    fn bucket(&self) -> &str;

    /// Create or overwrite `key` with `body`.
    async fn put_object(&self, key: &str, body: Bytes) -> Result<(), StorageError>;

    /// Read the full body of `key`.
    ///
    /// Returns [`StorageError::NoSuchKey`] when the key does not exist.
    async fn get_object(&self, key: &str) -> Result<Bytes, StorageError>;

    /// List one page of keys starting with `prefix`.
    async fn list_objects(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
    ) -> Result<ObjectListing, StorageError>;

    /// Delete `key`. Deleting a missing key succeeds.
    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;

    /// Delete every key in `keys` in one batch.
    async fn delete_objects(&self, keys: &[String]) -> Result<(), StorageError>;
}

/// In-process object store backed by a `BTreeMap`.
///
/// # Examples
///
/// ```
/// # tokio_test::block_on(async {
/// use bytes::Bytes;
/// use s3fm_core::storage::{InMemoryObjectStore, ObjectStore};
///
/// let store = InMemoryObjectStore::new("files");
/// store.put_object("alice/a.txt", Bytes::from_static(b"hi")).await.unwrap();
/// assert_eq!(store.get_object("alice/a.txt").await.unwrap().as_ref(), b"hi");
/// # });
/// ```
pub struct InMemoryObjectStore {
    bucket: String,
    objects: RwLock<BTreeMap<String, Bytes>>,
    max_keys: usize,
}

impl fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("bucket", &self.bucket)
            .field("objects_count", &self.objects.read().len())
            .field("max_keys", &self.max_keys)
            .finish()
    }
}

impl InMemoryObjectStore {
    /// Create an empty store for `bucket`.
    #[must_use]
    pub fn new(bucket: impl Into<String>) -> Self {
        Self::with_max_keys(bucket, DEFAULT_MAX_KEYS)
    }

    /// Create an empty store with a custom listing page size.
    #[must_use]
    pub fn with_max_keys(bucket: impl Into<String>, max_keys: usize) -> Self {
        let bucket = bucket.into();
        debug!(%bucket, max_keys, "creating InMemoryObjectStore");
        Self {
            bucket,
            objects: RwLock::new(BTreeMap::new()),
            max_keys,
        }
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    /// Whether the store holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// Whether `key` exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.objects.read().contains_key(key)
    }

    /// Remove every object.
    pub fn reset(&self) {
        self.objects.write().clear();
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(&self, key: &str, body: Bytes) -> Result<(), StorageError> {
        debug!(key, size = body.len(), "storing object");
        self.objects.write().insert(key.to_owned(), body);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Bytes, StorageError> {
        self.objects
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NoSuchKey {
                key: key.to_owned(),
            })
    }

    async fn list_objects(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
    ) -> Result<ObjectListing, StorageError> {
        let objects = self.objects.read();
        let entries = objects
            .range::<str, _>((std::ops::Bound::Included(prefix), std::ops::Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix));
        Ok(list_from_btree(
            entries,
            prefix,
            delimiter.unwrap_or_default(),
            self.max_keys,
        ))
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        let removed = self.objects.write().remove(key).is_some();
        debug!(key, removed, "deleted object");
        Ok(())
    }

    async fn delete_objects(&self, keys: &[String]) -> Result<(), StorageError> {
        let mut objects = self.objects.write();
        for key in keys {
            objects.remove(key);
        }
        debug!(count = keys.len(), "deleted objects");
        Ok(())
    }
}

/// Build an [`ObjectListing`] from sorted `(key, body)` pairs that already
/// share `prefix`, applying delimiter grouping and the page limit.
fn list_from_btree<'a>(
    entries: impl Iterator<Item = (&'a String, &'a Bytes)>,
    prefix: &str,
    delimiter: &str,
    max_keys: usize,
) -> ObjectListing {
    let use_delim = !delimiter.is_empty();
    let mut listing = ObjectListing::default();
    let mut seen_prefixes = HashSet::new();

    for (key, body) in entries {
        let grouped = if use_delim {
            key[prefix.len()..]
                .find(delimiter)
                .map(|pos| format!("{prefix}{}{delimiter}", &key[prefix.len()..prefix.len() + pos]))
        } else {
            None
        };

        if grouped.as_ref().is_some_and(|cp| seen_prefixes.contains(cp)) {
            continue;
        }

        if listing.contents.len() + listing.common_prefixes.len() >= max_keys {
            listing.is_truncated = true;
            break;
        }

        match grouped {
            Some(cp) => {
                seen_prefixes.insert(cp.clone());
                listing.common_prefixes.push(cp);
            }
            None => listing.contents.push(ObjectSummary {
                key: key.clone(),
                size: body.len() as u64,
            }),
        }
    }

    listing
}
