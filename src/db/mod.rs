//! Persistence module split across logical submodules.

mod bookings;
mod connection;
mod contacts;
mod memory;
mod seed;
mod store;
mod tours;

pub use bookings::{create_booking, fetch_bookings, recent_bookings};
pub use connection::SqliteStore;
pub use contacts::{create_contact, fetch_contacts, recent_contacts};
pub use memory::MemoryStore;
pub use seed::{ensure_seeded, seed_tours};
pub use store::{clear_all, load, save, Collection, KeyValueStore};
pub use tours::{
    create_tour, delete_tour, delete_tour_at, fetch_tours, find_tour, find_tour_by_name,
    update_tour, update_tour_at,
};
