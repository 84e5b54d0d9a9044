use tracing::info;

use crate::error::Result;
use crate::models::{new_record_id, now_millis, Booking, BookingDraft};

use super::store::{load_records, save, Collection, KeyValueStore};

/// All bookings, newest first.
pub fn fetch_bookings(store: &dyn KeyValueStore) -> Result<Vec<Booking>> {
    load_records(store, Collection::Bookings)
}

/// Record a booking at the front of the list.
pub fn create_booking(store: &dyn KeyValueStore, draft: &BookingDraft) -> Result<Booking> {
    let draft = draft.validated()?;
    let booking = Booking {
        id: new_record_id(),
        name: draft.name,
        email: draft.email,
        tour_id: draft.tour_id,
        tour_name: draft.tour_name,
        timestamp: now_millis(),
    };

    let mut bookings = fetch_bookings(store)?;
    bookings.insert(0, booking.clone());
    save(store, Collection::Bookings, &bookings)?;
    info!(id = %booking.id, tour = %booking.tour_name, "recorded booking");
    Ok(booking)
}

/// The `limit` newest bookings.
pub fn recent_bookings(store: &dyn KeyValueStore, limit: usize) -> Result<Vec<Booking>> {
    let mut bookings = fetch_bookings(store)?;
    bookings.truncate(limit);
    Ok(bookings)
}

/// Clear the tour link on bookings for a deleted tour. Returns how many
/// bookings changed; nothing is written when none did.
pub(crate) fn detach_tour(store: &dyn KeyValueStore, tour_id: &str) -> Result<usize> {
    let mut bookings = fetch_bookings(store)?;
    let mut detached = 0;
    for booking in bookings
        .iter_mut()
        .filter(|booking| booking.tour_id.as_deref() == Some(tour_id))
    {
        booking.tour_id = None;
        detached += 1;
    }

    if detached > 0 {
        save(store, Collection::Bookings, &bookings)?;
    }
    Ok(detached)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::error::CatalogError;

    fn draft(name: &str) -> BookingDraft {
        BookingDraft {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            tour_id: None,
            tour_name: "Forte Príncipe da Beira".to_string(),
        }
    }

    #[test]
    fn newest_booking_comes_first() {
        let store = MemoryStore::default();
        let first = create_booking(&store, &draft("A")).unwrap();
        let second = create_booking(&store, &draft("B")).unwrap();
        let bookings = fetch_bookings(&store).unwrap();
        assert_eq!(bookings, vec![second, first]);
    }

    #[test]
    fn booking_is_timestamped_at_creation() {
        let store = MemoryStore::default();
        let before = now_millis();
        let booking = create_booking(&store, &draft("A")).unwrap();
        assert!(booking.timestamp >= before);
        assert!(booking.timestamp <= now_millis());
    }

    #[test]
    fn invalid_booking_is_not_persisted() {
        let store = MemoryStore::default();
        let mut invalid = draft("A");
        invalid.email.clear();
        let err = create_booking(&store, &invalid).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert!(store.get(Collection::Bookings.key()).unwrap().is_none());
    }

    #[test]
    fn recent_is_capped_by_collection_size() {
        let store = MemoryStore::default();
        for name in ["A", "B", "C"] {
            create_booking(&store, &draft(name)).unwrap();
        }
        let recent = recent_bookings(&store, 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].name, "C");
        assert_eq!(recent_bookings(&store, 10).unwrap().len(), 3);
        assert!(recent_bookings(&store, 0).unwrap().is_empty());
    }
}
