use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{new_record_id, Record};

/// Minimal string-keyed persistence the collections are written through. Each
/// value is a whole collection, so `set` replaces everything under the key in
/// a single write.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove every listed key as one unit.
    fn remove_all(&self, keys: &[&str]) -> Result<()>;

    /// Flush and release the backend. Dropping the store without calling this
    /// is allowed but swallows close errors.
    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

/// The three independently persisted record sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Tours,
    Bookings,
    Contacts,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Tours,
        Collection::Bookings,
        Collection::Contacts,
    ];

    /// Storage key for the collection. Existing databases depend on these
    /// exact names.
    pub fn key(self) -> &'static str {
        match self {
            Collection::Tours => "av_passeios_v1",
            Collection::Bookings => "av_reservas_v1",
            Collection::Contacts => "av_contatos_v1",
        }
    }
}

/// Read a whole collection. Missing or unparseable content yields an empty
/// list; only backend failures are returned as errors.
pub fn load<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    collection: Collection,
) -> Result<Vec<T>> {
    let Some(raw) = store.get(collection.key())? else {
        debug!(collection = collection.key(), "collection not stored yet");
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(records) => {
            debug!(collection = collection.key(), count = records.len(), "loaded collection");
            Ok(records)
        }
        Err(err) => {
            warn!(
                collection = collection.key(),
                error = %err,
                "stored collection is malformed, treating it as empty"
            );
            Ok(Vec::new())
        }
    }
}

/// Read a collection of records, giving every record stored without an id a
/// fresh one. The backfilled ids are written back right away so they stay
/// the same on the next read.
pub(crate) fn load_records<T>(store: &dyn KeyValueStore, collection: Collection) -> Result<Vec<T>>
where
    T: DeserializeOwned + Serialize + Record,
{
    let mut records: Vec<T> = load(store, collection)?;
    let mut backfilled = 0;
    for record in &mut records {
        let id = record.id_mut();
        if id.trim().is_empty() {
            *id = new_record_id();
            backfilled += 1;
        }
    }

    if backfilled > 0 {
        save(store, collection, &records)?;
        info!(collection = collection.key(), backfilled, "assigned ids to stored records");
    }
    Ok(records)
}

/// Overwrite a whole collection.
pub fn save<T: Serialize>(
    store: &dyn KeyValueStore,
    collection: Collection,
    records: &[T],
) -> Result<()> {
    let encoded = serde_json::to_string(records)?;
    store.set(collection.key(), &encoded)?;
    debug!(collection = collection.key(), count = records.len(), "saved collection");
    Ok(())
}

/// Drop all three collections.
pub fn clear_all(store: &dyn KeyValueStore) -> Result<()> {
    let keys = Collection::ALL.map(Collection::key);
    store.remove_all(&keys)
}
