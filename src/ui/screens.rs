use anyhow::Result;

use crate::catalog::Catalog;
use crate::dashboard::{CATALOG_RECENT_BOOKINGS, DASHBOARD_PANEL_SIZE};
use crate::filter::{filter_tours, DurationBucket};
use crate::models::{Booking, Contact, Stats, Tour};

/// Catalog list with its search query and duration filter.
pub(crate) struct ToursScreen {
    pub(crate) tours: Vec<Tour>,
    pub(crate) filtered: Vec<Tour>,
    pub(crate) query: String,
    pub(crate) bucket: Option<DurationBucket>,
    pub(crate) selected: usize,
    pub(crate) recent_bookings: Vec<Booking>,
}

impl ToursScreen {
    pub(crate) fn load(catalog: &Catalog) -> Result<Self> {
        let mut screen = Self {
            tours: Vec::new(),
            filtered: Vec::new(),
            query: String::new(),
            bucket: None,
            selected: 0,
            recent_bookings: Vec::new(),
        };
        screen.reload(catalog)?;
        Ok(screen)
    }

    /// Re-pull tours and recent bookings, keeping the selection on the same
    /// tour when it still exists.
    pub(crate) fn reload(&mut self, catalog: &Catalog) -> Result<()> {
        let focus = self.current_tour().map(|tour| tour.id.clone());
        self.tours = catalog.tours()?;
        self.recent_bookings = catalog.recent_bookings(CATALOG_RECENT_BOOKINGS)?;
        self.apply_filter();
        if let Some(id) = focus {
            if let Some(idx) = self.filtered.iter().position(|tour| tour.id == id) {
                self.selected = idx;
            }
        }
        Ok(())
    }

    pub(crate) fn apply_filter(&mut self) {
        self.filtered = filter_tours(&self.tours, self.query.trim(), self.bucket);
        self.ensure_in_bounds();
    }

    pub(crate) fn set_query(&mut self, query: String) {
        self.query = query;
        self.apply_filter();
    }

    pub(crate) fn cycle_bucket(&mut self) -> Option<DurationBucket> {
        self.bucket = DurationBucket::cycle(self.bucket);
        self.apply_filter();
        self.bucket
    }

    pub(crate) fn clear_filters(&mut self) {
        self.query.clear();
        self.bucket = None;
        self.apply_filter();
    }

    pub(crate) fn is_filtered(&self) -> bool {
        !self.query.trim().is_empty() || self.bucket.is_some()
    }

    pub(crate) fn current_tour(&self) -> Option<&Tour> {
        self.filtered.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.filtered.is_empty() {
            return;
        }
        let last = self.filtered.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.filtered.len().saturating_sub(1);
    }

    fn ensure_in_bounds(&mut self) {
        if self.filtered.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.filtered.len() {
            self.selected = self.filtered.len() - 1;
        }
    }
}

/// Counts and recent activity shown on the dashboard.
#[derive(Default)]
pub(crate) struct DashboardScreen {
    pub(crate) stats: Stats,
    pub(crate) bookings: Vec<Booking>,
    pub(crate) contacts: Vec<Contact>,
}

impl DashboardScreen {
    pub(crate) fn load(catalog: &Catalog) -> Result<Self> {
        Ok(Self {
            stats: catalog.stats()?,
            bookings: catalog.recent_bookings(DASHBOARD_PANEL_SIZE)?,
            contacts: catalog.recent_contacts(DASHBOARD_PANEL_SIZE)?,
        })
    }
}
