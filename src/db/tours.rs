use tracing::info;

use crate::error::{CatalogError, Result};
use crate::models::{new_record_id, now_millis, Tour, TourDraft};

use super::bookings::detach_tour;
use super::store::{load_records, save, Collection, KeyValueStore};

/// Every tour in stored (display) order.
pub fn fetch_tours(store: &dyn KeyValueStore) -> Result<Vec<Tour>> {
    load_records(store, Collection::Tours)
}

/// Look a tour up by id.
pub fn find_tour(store: &dyn KeyValueStore, id: &str) -> Result<Option<Tour>> {
    Ok(fetch_tours(store)?.into_iter().find(|tour| tour.id == id))
}

/// First tour whose name matches exactly. Used by flows that only carry the
/// tour name, such as bookings started from a filtered card.
pub fn find_tour_by_name(store: &dyn KeyValueStore, name: &str) -> Result<Option<Tour>> {
    Ok(fetch_tours(store)?.into_iter().find(|tour| tour.name == name))
}

/// Append a new tour, stamping its id and creation time.
pub fn create_tour(store: &dyn KeyValueStore, draft: &TourDraft) -> Result<Tour> {
    let draft = draft.validated()?;
    let mut tours = fetch_tours(store)?;
    let tour = draft.into_tour(new_record_id(), now_millis());
    tours.push(tour.clone());
    save(store, Collection::Tours, &tours)?;
    info!(id = %tour.id, name = %tour.name, "created tour");
    Ok(tour)
}

/// Replace the tour at `index` in place. The id is kept so bookings still
/// point at it.
pub fn update_tour_at(store: &dyn KeyValueStore, index: usize, draft: &TourDraft) -> Result<Tour> {
    let draft = draft.validated()?;
    let mut tours = fetch_tours(store)?;
    let slot = tours.get_mut(index).ok_or_else(|| CatalogError::tour_at(index))?;
    let updated = draft.into_tour(slot.id.clone(), now_millis());
    *slot = updated.clone();
    save(store, Collection::Tours, &tours)?;
    info!(id = %updated.id, index, "updated tour");
    Ok(updated)
}

/// Replace the tour with the given id, wherever it currently sits.
pub fn update_tour(store: &dyn KeyValueStore, id: &str, draft: &TourDraft) -> Result<Tour> {
    let index = position_of(store, id)?;
    update_tour_at(store, index, draft)
}

/// Remove the tour at `index`; later tours shift down by one. Bookings that
/// referenced it keep their name snapshot but lose the id link.
pub fn delete_tour_at(store: &dyn KeyValueStore, index: usize) -> Result<Tour> {
    let mut tours = fetch_tours(store)?;
    if index >= tours.len() {
        return Err(CatalogError::tour_at(index));
    }
    let removed = tours.remove(index);
    save(store, Collection::Tours, &tours)?;
    let detached = detach_tour(store, &removed.id)?;
    info!(id = %removed.id, index, detached, "deleted tour");
    Ok(removed)
}

/// Remove the tour with the given id.
pub fn delete_tour(store: &dyn KeyValueStore, id: &str) -> Result<Tour> {
    let index = position_of(store, id)?;
    delete_tour_at(store, index)
}

fn position_of(store: &dyn KeyValueStore, id: &str) -> Result<usize> {
    fetch_tours(store)?
        .iter()
        .position(|tour| tour.id == id)
        .ok_or_else(|| CatalogError::tour_id(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_booking, ensure_seeded, fetch_bookings, MemoryStore};
    use crate::models::{BookingDraft, Category};

    fn draft(name: &str) -> TourDraft {
        TourDraft {
            name: name.to_string(),
            location: "X".to_string(),
            duration: "4h".to_string(),
            price: 10.0,
            category: Category::Adventure,
            ..TourDraft::default()
        }
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::default();
        ensure_seeded(&store).unwrap();
        store
    }

    #[test]
    fn create_appends_with_id_and_timestamp() {
        let store = seeded();
        let tour = create_tour(&store, &draft("Teste")).unwrap();
        let tours = fetch_tours(&store).unwrap();
        assert_eq!(tours.len(), 10);
        assert_eq!(tours.last(), Some(&tour));
        assert!(tour.created_at.is_some());
        assert!(!tour.id.is_empty());
    }

    #[test]
    fn create_rejects_blank_name_without_persisting() {
        let store = seeded();
        let before = store.get(Collection::Tours.key()).unwrap();
        let err = create_tour(&store, &draft("   ")).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(store.get(Collection::Tours.key()).unwrap(), before);
    }

    #[test]
    fn update_replaces_only_the_indexed_tour() {
        let store = seeded();
        let before = fetch_tours(&store).unwrap();
        let updated = update_tour_at(&store, 3, &draft("Nova")).unwrap();
        let after = fetch_tours(&store).unwrap();
        assert_eq!(after[3], updated);
        assert_eq!(after[3].id, before[3].id);
        for (idx, tour) in after.iter().enumerate().filter(|(idx, _)| *idx != 3) {
            assert_eq!(tour, &before[idx]);
        }
    }

    #[test]
    fn out_of_range_update_and_delete_leave_collection_unchanged() {
        let store = seeded();
        let before = store.get(Collection::Tours.key()).unwrap();
        assert!(update_tour_at(&store, 9, &draft("Nada")).unwrap_err().is_not_found());
        assert!(delete_tour_at(&store, 42).unwrap_err().is_not_found());
        assert!(delete_tour(&store, "missing").unwrap_err().is_not_found());
        assert_eq!(store.get(Collection::Tours.key()).unwrap(), before);
    }

    #[test]
    fn delete_shifts_later_tours_down() {
        let store = seeded();
        let before = fetch_tours(&store).unwrap();
        let removed = delete_tour_at(&store, 2).unwrap();
        let after = fetch_tours(&store).unwrap();
        assert_eq!(removed, before[2]);
        assert_eq!(after.len(), before.len() - 1);
        let mut expected = before.clone();
        expected.remove(2);
        assert_eq!(after, expected);
    }

    #[test]
    fn id_based_operations_follow_the_record() {
        let store = seeded();
        let target = fetch_tours(&store).unwrap()[5].clone();
        delete_tour_at(&store, 0).unwrap();
        let updated = update_tour(&store, &target.id, &draft("Renomeado")).unwrap();
        assert_eq!(fetch_tours(&store).unwrap()[4], updated);
        assert_eq!(find_tour(&store, &target.id).unwrap(), Some(updated));
        delete_tour(&store, &target.id).unwrap();
        assert_eq!(find_tour(&store, &target.id).unwrap(), None);
    }

    #[test]
    fn tours_stored_without_ids_keep_the_id_they_are_listed_with() {
        let store = MemoryStore::default();
        store
            .set(
                Collection::Tours.key(),
                r#"[{"nome":"Forte","local":"Costa Marques","duracao":"2h"},{"name":"Museu"}]"#,
            )
            .unwrap();

        let first = fetch_tours(&store).unwrap();
        let second = fetch_tours(&store).unwrap();
        assert_eq!(first, second);
        assert!(first.iter().all(|tour| !tour.id.is_empty()));

        let forte = &first[0];
        let updated = update_tour(&store, &forte.id, &draft("Forte Renovado")).unwrap();
        assert_eq!(updated.id, forte.id);
        assert_eq!(find_tour(&store, &forte.id).unwrap(), Some(updated));

        delete_tour(&store, &first[1].id).unwrap();
        let remaining = fetch_tours(&store).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, forte.id);
    }

    #[test]
    fn deleting_a_tour_unlinks_its_bookings() {
        let store = seeded();
        let tour = find_tour_by_name(&store, "Cachoeira das Araras").unwrap().unwrap();
        let mut booking = BookingDraft::for_tour(&tour);
        booking.name = "Ana".to_string();
        booking.email = "ana@example.com".to_string();
        create_booking(&store, &booking).unwrap();

        delete_tour(&store, &tour.id).unwrap();

        let bookings = fetch_bookings(&store).unwrap();
        assert_eq!(bookings[0].tour_id, None);
        assert_eq!(bookings[0].tour_name, "Cachoeira das Araras");
    }
}
