//! Read-only summaries behind the dashboard. Everything is recomputed from the
//! store on each call; the collections are small enough that caching would
//! only add invalidation bugs.

use crate::db::{
    fetch_bookings, fetch_contacts, fetch_tours, recent_bookings, recent_contacts, KeyValueStore,
};
use crate::error::Result;
use crate::models::{Booking, Contact, Stats};

/// Bookings listed beside the catalog.
pub const CATALOG_RECENT_BOOKINGS: usize = 6;
/// Entries per dashboard panel.
pub const DASHBOARD_PANEL_SIZE: usize = 8;
/// Characters of a contact message shown in the dashboard panel.
pub const CONTACT_PREVIEW_CHARS: usize = 160;

pub fn stats(store: &dyn KeyValueStore) -> Result<Stats> {
    Ok(Stats {
        tour_count: fetch_tours(store)?.len(),
        booking_count: fetch_bookings(store)?.len(),
        contact_count: fetch_contacts(store)?.len(),
    })
}

pub fn latest_bookings(store: &dyn KeyValueStore, limit: usize) -> Result<Vec<Booking>> {
    recent_bookings(store, limit)
}

pub fn latest_contacts(store: &dyn KeyValueStore, limit: usize) -> Result<Vec<Contact>> {
    recent_contacts(store, limit)
}
