use ratatui::text::Line;

use crate::models::{parse_price, BookingDraft, Category, ContactDraft, Tour, TourDraft};

use super::helpers::{cursor_column, field_line};

/// Shared rendering surface for the modal forms.
pub(crate) trait FormView {
    fn lines(&self) -> Vec<Line<'static>>;
    /// Column and row of the text cursor, relative to the form's inner area.
    fn cursor(&self) -> Option<(u16, u16)>;
    fn error(&self) -> Option<&str>;
}

/// Fields of the tour form in tab order.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum TourField {
    #[default]
    Name,
    Location,
    Duration,
    Price,
    Category,
    Description,
    Image,
}

impl TourField {
    const ORDER: [TourField; 7] = [
        TourField::Name,
        TourField::Location,
        TourField::Duration,
        TourField::Price,
        TourField::Category,
        TourField::Description,
        TourField::Image,
    ];

    fn label(self) -> &'static str {
        match self {
            TourField::Name => "Name",
            TourField::Location => "Location",
            TourField::Duration => "Duration",
            TourField::Price => "Price (R$)",
            TourField::Category => "Category",
            TourField::Description => "Description",
            TourField::Image => "Image",
        }
    }
}

/// Form state for tour creation/editing.
#[derive(Default, Clone)]
pub(crate) struct TourForm {
    pub(crate) name: String,
    pub(crate) location: String,
    pub(crate) duration: String,
    pub(crate) price: String,
    pub(crate) category: Category,
    pub(crate) description: String,
    pub(crate) image_ref: String,
    pub(crate) active: TourField,
    pub(crate) error: Option<String>,
}

impl TourForm {
    /// Populate the form from an existing tour when editing.
    pub(crate) fn from_tour(tour: &Tour) -> Self {
        Self {
            name: tour.name.clone(),
            location: tour.location.clone(),
            duration: tour.duration.clone(),
            price: tour.price.to_string(),
            category: tour.category,
            description: tour.description.clone(),
            image_ref: tour.image_ref.clone(),
            active: TourField::Name,
            error: None,
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.active = step(&TourField::ORDER, self.active, 1);
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = step(&TourField::ORDER, self.active, -1);
    }

    fn text_mut(&mut self, field: TourField) -> Option<&mut String> {
        match field {
            TourField::Name => Some(&mut self.name),
            TourField::Location => Some(&mut self.location),
            TourField::Duration => Some(&mut self.duration),
            TourField::Price => Some(&mut self.price),
            TourField::Description => Some(&mut self.description),
            TourField::Image => Some(&mut self.image_ref),
            TourField::Category => None,
        }
    }

    fn text(&self, field: TourField) -> &str {
        match field {
            TourField::Name => &self.name,
            TourField::Location => &self.location,
            TourField::Duration => &self.duration,
            TourField::Price => &self.price,
            TourField::Description => &self.description,
            TourField::Image => &self.image_ref,
            TourField::Category => self.category.label(),
        }
    }

    /// Append a character to the active field. The category field cycles on
    /// space instead of taking text; the price only takes digits and
    /// separators.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            TourField::Category => {
                if ch == ' ' {
                    self.category = self.category.next();
                    true
                } else {
                    false
                }
            }
            TourField::Price => {
                if ch.is_ascii_digit() || ch == ',' || ch == '.' {
                    self.price.push(ch);
                    true
                } else {
                    false
                }
            }
            field => {
                if ch.is_control() {
                    return false;
                }
                if let Some(value) = self.text_mut(field) {
                    value.push(ch);
                }
                true
            }
        }
    }

    pub(crate) fn backspace(&mut self) {
        let field = self.active;
        if let Some(value) = self.text_mut(field) {
            value.pop();
        }
    }

    pub(crate) fn cycle_category(&mut self) {
        if self.active == TourField::Category {
            self.category = self.category.next();
        }
    }

    /// Collect the inputs. Blank or unreadable prices become 0; the name check
    /// happens in the repository.
    pub(crate) fn to_draft(&self) -> TourDraft {
        TourDraft {
            name: self.name.clone(),
            location: self.location.clone(),
            duration: self.duration.clone(),
            price: parse_price(&self.price),
            category: self.category,
            description: self.description.clone(),
            image_ref: self.image_ref.clone(),
        }
    }
}

impl FormView for TourForm {
    fn lines(&self) -> Vec<Line<'static>> {
        TourField::ORDER
            .iter()
            .map(|&field| {
                field_line(
                    field.label(),
                    self.text(field),
                    self.active == field,
                    field == TourField::Name,
                )
            })
            .collect()
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        if self.active == TourField::Category {
            return None;
        }
        let row = position(&TourField::ORDER, self.active) as u16;
        Some((cursor_column(self.active.label(), self.text(self.active)), row))
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum BookingField {
    #[default]
    Name,
    Email,
    Tour,
}

impl BookingField {
    const ORDER: [BookingField; 3] = [BookingField::Name, BookingField::Email, BookingField::Tour];

    fn label(self) -> &'static str {
        match self {
            BookingField::Name => "Name",
            BookingField::Email => "E-mail",
            BookingField::Tour => "Tour",
        }
    }
}

/// A tour the booking form can point at.
#[derive(Clone)]
pub(crate) struct TourOption {
    pub(crate) id: String,
    pub(crate) name: String,
}

/// Quick booking form. The tour is picked from the current catalog with the
/// arrow keys rather than typed.
#[derive(Default, Clone)]
pub(crate) struct BookingForm {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) options: Vec<TourOption>,
    pub(crate) tour_index: usize,
    pub(crate) active: BookingField,
    pub(crate) error: Option<String>,
}

impl BookingForm {
    pub(crate) fn new(tours: &[Tour]) -> Self {
        Self {
            options: tours
                .iter()
                .map(|tour| TourOption {
                    id: tour.id.clone(),
                    name: tour.name.clone(),
                })
                .collect(),
            ..Self::default()
        }
    }

    /// Open the form with `tour` already chosen.
    pub(crate) fn for_tour(tours: &[Tour], tour: &Tour) -> Self {
        let mut form = Self::new(tours);
        form.tour_index = tours.iter().position(|t| t.id == tour.id).unwrap_or(0);
        form
    }

    pub(crate) fn next_field(&mut self) {
        self.active = step(&BookingField::ORDER, self.active, 1);
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = step(&BookingField::ORDER, self.active, -1);
    }

    /// Move the tour selection; only meaningful while the tour field has
    /// focus.
    pub(crate) fn shift_tour(&mut self, offset: isize) {
        if self.active != BookingField::Tour || self.options.is_empty() {
            return;
        }
        let len = self.options.len() as isize;
        self.tour_index = (self.tour_index as isize + offset).rem_euclid(len) as usize;
    }

    pub(crate) fn selected_tour(&self) -> Option<&TourOption> {
        self.options.get(self.tour_index)
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            BookingField::Name => self.name.push(ch),
            BookingField::Email => self.email.push(ch),
            BookingField::Tour => return false,
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            BookingField::Name => {
                self.name.pop();
            }
            BookingField::Email => {
                self.email.pop();
            }
            BookingField::Tour => {}
        }
    }

    pub(crate) fn to_draft(&self) -> BookingDraft {
        let tour = self.selected_tour();
        BookingDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            tour_id: tour.map(|option| option.id.clone()),
            tour_name: tour.map(|option| option.name.clone()).unwrap_or_default(),
        }
    }

    fn tour_label(&self) -> String {
        match self.selected_tour() {
            Some(option) => format!("< {} >", option.name),
            None => "-- no tours registered --".to_string(),
        }
    }
}

impl FormView for BookingForm {
    fn lines(&self) -> Vec<Line<'static>> {
        vec![
            field_line(
                BookingField::Name.label(),
                &self.name,
                self.active == BookingField::Name,
                true,
            ),
            field_line(
                BookingField::Email.label(),
                &self.email,
                self.active == BookingField::Email,
                true,
            ),
            field_line(
                BookingField::Tour.label(),
                &self.tour_label(),
                self.active == BookingField::Tour,
                true,
            ),
        ]
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        match self.active {
            BookingField::Name => Some((cursor_column("Name", &self.name), 0)),
            BookingField::Email => Some((cursor_column("E-mail", &self.email), 1)),
            BookingField::Tour => None,
        }
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum ContactField {
    #[default]
    Name,
    Email,
    Subject,
    Message,
}

impl ContactField {
    const ORDER: [ContactField; 4] = [
        ContactField::Name,
        ContactField::Email,
        ContactField::Subject,
        ContactField::Message,
    ];

    fn label(self) -> &'static str {
        match self {
            ContactField::Name => "Name",
            ContactField::Email => "E-mail",
            ContactField::Subject => "Subject",
            ContactField::Message => "Message",
        }
    }
}

#[derive(Default, Clone)]
pub(crate) struct ContactForm {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) subject: String,
    pub(crate) message: String,
    pub(crate) active: ContactField,
    pub(crate) error: Option<String>,
}

impl ContactForm {
    pub(crate) fn next_field(&mut self) {
        self.active = step(&ContactField::ORDER, self.active, 1);
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = step(&ContactField::ORDER, self.active, -1);
    }

    fn text_mut(&mut self) -> &mut String {
        match self.active {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Subject => &mut self.subject,
            ContactField::Message => &mut self.message,
        }
    }

    fn text(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Subject => &self.subject,
            ContactField::Message => &self.message,
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.text_mut().push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.text_mut().pop();
    }

    pub(crate) fn to_draft(&self) -> ContactDraft {
        ContactDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
        }
    }
}

impl FormView for ContactForm {
    fn lines(&self) -> Vec<Line<'static>> {
        ContactField::ORDER
            .iter()
            .map(|&field| {
                field_line(
                    field.label(),
                    self.text(field),
                    self.active == field,
                    field != ContactField::Subject,
                )
            })
            .collect()
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        let row = position(&ContactField::ORDER, self.active) as u16;
        Some((cursor_column(self.active.label(), self.text(self.active)), row))
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Pending tour removal awaiting confirmation.
#[derive(Clone)]
pub(crate) struct ConfirmTourDelete {
    pub(crate) id: String,
    pub(crate) name: String,
}

impl ConfirmTourDelete {
    pub(crate) fn from(tour: &Tour) -> Self {
        Self {
            id: tour.id.clone(),
            name: tour.name.clone(),
        }
    }
}

fn position<T: PartialEq>(order: &[T], current: T) -> usize {
    order.iter().position(|item| *item == current).unwrap_or(0)
}

fn step<T: PartialEq + Copy>(order: &[T], current: T, offset: isize) -> T {
    let len = order.len() as isize;
    let idx = (position(order, current) as isize + offset).rem_euclid(len);
    order[idx as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed_tours;

    #[test]
    fn tour_form_round_trips_an_existing_tour() {
        let tour = seed_tours().remove(0);
        let draft = TourForm::from_tour(&tour).to_draft();
        assert_eq!(draft, TourDraft::from(&tour));
    }

    #[test]
    fn price_field_rejects_letters() {
        let mut form = TourForm {
            active: TourField::Price,
            ..TourForm::default()
        };
        assert!(!form.push_char('a'));
        assert!(form.push_char('1'));
        assert!(form.push_char(','));
        assert!(form.push_char('5'));
        assert_eq!(form.to_draft().price, 1.5);
    }

    #[test]
    fn tab_order_wraps_around() {
        let mut form = TourForm::default();
        form.previous_field();
        assert!(form.active == TourField::Image);
        form.next_field();
        assert!(form.active == TourField::Name);
    }

    #[test]
    fn booking_form_starts_on_the_chosen_tour() {
        let tours = seed_tours();
        let mut form = BookingForm::for_tour(&tours, &tours[4]);
        assert_eq!(form.to_draft().tour_name, "Cachoeira das Araras");

        form.active = BookingField::Tour;
        form.shift_tour(-5);
        assert_eq!(form.to_draft().tour_name, tours[8].name);
        assert_eq!(form.to_draft().tour_id.as_deref(), Some(tours[8].id.as_str()));
    }

    #[test]
    fn booking_form_without_tours_has_no_selection() {
        let form = BookingForm::new(&[]);
        assert!(form.selected_tour().is_none());
        assert!(form.to_draft().tour_name.is_empty());
    }
}
