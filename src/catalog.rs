//! Service facade over the store. The terminal UI talks to this type only:
//! it owns the backend for the lifetime of the session and tells subscribers
//! about every successful mutation so views can re-pull what they show.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::dashboard;
use crate::db::{
    self, create_booking, create_contact, create_tour, delete_tour, delete_tour_at, ensure_seeded,
    fetch_bookings, fetch_contacts, fetch_tours, find_tour, find_tour_by_name, update_tour,
    update_tour_at, KeyValueStore, MemoryStore, SqliteStore,
};
use crate::error::Result;
use crate::export::{self, ExportKind};
use crate::filter::{filter_tours, DurationBucket};
use crate::models::{Booking, BookingDraft, Contact, ContactDraft, Stats, Tour, TourDraft};

/// What a successful mutation changed. Ids refer to the affected record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Seeded,
    TourCreated(String),
    TourUpdated(String),
    TourDeleted(String),
    BookingCreated(String),
    ContactCreated(String),
    /// Every collection was wiped and the tours re-seeded.
    Cleared,
}

type Listener = Box<dyn FnMut(&Change)>;

pub struct Catalog {
    store: Box<dyn KeyValueStore>,
    listeners: Vec<Listener>,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Catalog {
    /// Open the SQLite-backed catalog at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::with_store(Box::new(SqliteStore::open(path)?)))
    }

    /// Catalog that lives only as long as this value.
    pub fn in_memory() -> Self {
        Self::with_store(Box::new(MemoryStore::new()))
    }

    pub fn with_store(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            listeners: Vec::new(),
        }
    }

    /// Flush and close the backing store.
    pub fn close(self) -> Result<()> {
        self.store.close()
    }

    /// Register a callback run after each successful mutation.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&Change) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self, change: Change) {
        for listener in &mut self.listeners {
            listener(&change);
        }
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Seed the tour catalog if it is empty.
    pub fn ensure_seeded(&mut self) -> Result<bool> {
        let seeded = ensure_seeded(self.store())?;
        if seeded {
            self.notify(Change::Seeded);
        }
        Ok(seeded)
    }

    pub fn tours(&self) -> Result<Vec<Tour>> {
        fetch_tours(self.store())
    }

    pub fn tour(&self, id: &str) -> Result<Option<Tour>> {
        find_tour(self.store(), id)
    }

    pub fn tour_by_name(&self, name: &str) -> Result<Option<Tour>> {
        find_tour_by_name(self.store(), name)
    }

    pub fn create_tour(&mut self, draft: &TourDraft) -> Result<Tour> {
        let tour = create_tour(self.store(), draft)?;
        self.notify(Change::TourCreated(tour.id.clone()));
        Ok(tour)
    }

    pub fn update_tour_at(&mut self, index: usize, draft: &TourDraft) -> Result<Tour> {
        let tour = update_tour_at(self.store(), index, draft)?;
        self.notify(Change::TourUpdated(tour.id.clone()));
        Ok(tour)
    }

    pub fn update_tour(&mut self, id: &str, draft: &TourDraft) -> Result<Tour> {
        let tour = update_tour(self.store(), id, draft)?;
        self.notify(Change::TourUpdated(tour.id.clone()));
        Ok(tour)
    }

    pub fn delete_tour_at(&mut self, index: usize) -> Result<Tour> {
        let tour = delete_tour_at(self.store(), index)?;
        self.notify(Change::TourDeleted(tour.id.clone()));
        Ok(tour)
    }

    pub fn delete_tour(&mut self, id: &str) -> Result<Tour> {
        let tour = delete_tour(self.store(), id)?;
        self.notify(Change::TourDeleted(tour.id.clone()));
        Ok(tour)
    }

    /// Tours matching the text query and optional duration bucket.
    pub fn search_tours(&self, query: &str, bucket: Option<DurationBucket>) -> Result<Vec<Tour>> {
        Ok(filter_tours(&self.tours()?, query, bucket))
    }

    pub fn bookings(&self) -> Result<Vec<Booking>> {
        fetch_bookings(self.store())
    }

    pub fn recent_bookings(&self, limit: usize) -> Result<Vec<Booking>> {
        dashboard::latest_bookings(self.store(), limit)
    }

    pub fn create_booking(&mut self, draft: &BookingDraft) -> Result<Booking> {
        let booking = create_booking(self.store(), draft)?;
        self.notify(Change::BookingCreated(booking.id.clone()));
        Ok(booking)
    }

    pub fn contacts(&self) -> Result<Vec<Contact>> {
        fetch_contacts(self.store())
    }

    pub fn recent_contacts(&self, limit: usize) -> Result<Vec<Contact>> {
        dashboard::latest_contacts(self.store(), limit)
    }

    pub fn create_contact(&mut self, draft: &ContactDraft) -> Result<Contact> {
        let contact = create_contact(self.store(), draft)?;
        self.notify(Change::ContactCreated(contact.id.clone()));
        Ok(contact)
    }

    pub fn stats(&self) -> Result<Stats> {
        dashboard::stats(self.store())
    }

    pub fn export_json(&self) -> Result<String> {
        export::export_json(self.store())
    }

    pub fn export_csv(&self) -> Result<String> {
        export::export_csv(self.store())
    }

    pub fn export_tours_json(&self) -> Result<String> {
        export::export_tours_json(self.store())
    }

    pub fn write_export(&self, dir: &Path, kind: ExportKind) -> Result<PathBuf> {
        export::write_export(self.store(), dir, kind)
    }

    /// Remove every tour, booking and contact, then restore the seed catalog
    /// so the catalog is never left empty.
    pub fn clear_all(&mut self) -> Result<()> {
        db::clear_all(self.store())?;
        ensure_seeded(self.store())?;
        info!("cleared all collections and restored the seed catalog");
        self.notify(Change::Cleared);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::tempdir;

    use crate::models::Category;

    fn recorder(catalog: &mut Catalog) -> Rc<RefCell<Vec<Change>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        catalog.subscribe(move |change| sink.borrow_mut().push(change.clone()));
        seen
    }

    fn teste() -> TourDraft {
        TourDraft {
            name: "Teste".into(),
            location: "X".into(),
            duration: "4h".into(),
            price: 10.0,
            category: Category::Adventure,
            ..TourDraft::default()
        }
    }

    fn booking(name: &str) -> BookingDraft {
        BookingDraft {
            name: name.into(),
            email: "x@y.z".into(),
            tour_id: None,
            tour_name: "Forte Príncipe da Beira".into(),
        }
    }

    #[test]
    fn listeners_hear_successful_mutations_only() {
        let mut catalog = Catalog::in_memory();
        let seen = recorder(&mut catalog);

        catalog.ensure_seeded().unwrap();
        catalog.ensure_seeded().unwrap();
        let tour = catalog.create_tour(&teste()).unwrap();
        assert!(catalog.update_tour_at(99, &teste()).is_err());
        assert!(catalog.create_booking(&BookingDraft::default()).is_err());
        catalog.delete_tour(&tour.id).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                Change::Seeded,
                Change::TourCreated(tour.id.clone()),
                Change::TourDeleted(tour.id.clone()),
            ]
        );
    }

    #[test]
    fn created_tour_is_found_by_medium_but_not_short_filter() {
        let mut catalog = Catalog::in_memory();
        catalog.ensure_seeded().unwrap();
        catalog.create_tour(&teste()).unwrap();

        let medium = catalog.search_tours("teste", DurationBucket::parse("medio")).unwrap();
        assert_eq!(medium.len(), 1);
        let short = catalog.search_tours("teste", DurationBucket::parse("curta")).unwrap();
        assert!(short.is_empty());
    }

    #[test]
    fn clear_all_restores_seed_and_empties_the_rest() {
        let mut catalog = Catalog::in_memory();
        catalog.ensure_seeded().unwrap();
        catalog.create_tour(&teste()).unwrap();
        catalog.create_booking(&booking("A")).unwrap();
        catalog
            .create_contact(&ContactDraft {
                name: "C".into(),
                email: "c@d.e".into(),
                subject: String::new(),
                message: "Oi".into(),
            })
            .unwrap();
        let seen = recorder(&mut catalog);

        catalog.clear_all().unwrap();

        assert_eq!(catalog.tours().unwrap().len(), 9);
        assert!(catalog.bookings().unwrap().is_empty());
        assert!(catalog.contacts().unwrap().is_empty());
        assert_eq!(*seen.borrow(), vec![Change::Cleared]);
    }

    #[test]
    fn sqlite_catalog_persists_across_sessions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("amazonia-viva.sqlite");

        let mut catalog = Catalog::open(&path).unwrap();
        catalog.ensure_seeded().unwrap();
        catalog.create_booking(&booking("A")).unwrap();
        catalog.create_booking(&booking("B")).unwrap();
        catalog.close().unwrap();

        let mut reopened = Catalog::open(&path).unwrap();
        assert!(!reopened.ensure_seeded().unwrap());
        let names: Vec<_> = reopened
            .bookings()
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, ["B", "A"]);
        assert_eq!(
            reopened.stats().unwrap(),
            Stats {
                tour_count: 9,
                booking_count: 2,
                contact_count: 0,
            }
        );
    }
}
