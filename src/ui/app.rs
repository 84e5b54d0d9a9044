use std::cell::Cell;
use std::mem;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::warn;

use crate::catalog::Catalog;
use crate::dashboard::CONTACT_PREVIEW_CHARS;
use crate::export::ExportKind;
use crate::models::{preview, Booking, Tour};

use super::forms::{BookingForm, ConfirmTourDelete, ContactForm, FormView, TourForm};
use super::helpers::{centered_rect, key_hints, surface_error};
use super::screens::{DashboardScreen, ToursScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Description characters shown in the details popup before cutting.
const DETAILS_DESCRIPTION_CHARS: usize = 300;

/// Top-level views, toggled with Tab.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Screen {
    Tours,
    Dashboard,
}

/// Fine-grained modes layered over the current screen.
enum Mode {
    Normal,
    AddingTour(TourForm),
    EditingTour { id: String, form: TourForm },
    ConfirmTourDelete(ConfirmTourDelete),
    TourDetails(Tour),
    Booking(BookingForm),
    Contact(ContactForm),
    Searching(SearchState),
    ConfirmClearAll,
}

/// State for an active inline search. `previous` is restored on Esc.
struct SearchState {
    query: String,
    previous: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    catalog: Catalog,
    export_dir: PathBuf,
    screen: Screen,
    tours: ToursScreen,
    dashboard: DashboardScreen,
    mode: Mode,
    status: Option<StatusMessage>,
    /// Raised by the catalog listener; views re-pull on the next tick.
    stale: Rc<Cell<bool>>,
}

impl App {
    pub fn new(mut catalog: Catalog, export_dir: PathBuf) -> Result<Self> {
        let stale = Rc::new(Cell::new(false));
        let flag = Rc::clone(&stale);
        catalog.subscribe(move |_| flag.set(true));

        let tours = ToursScreen::load(&catalog).context("failed to load tours")?;
        let dashboard = DashboardScreen::load(&catalog).context("failed to load dashboard")?;

        Ok(Self {
            catalog,
            export_dir,
            screen: Screen::Tours,
            tours,
            dashboard,
            mode: Mode::Normal,
            status: None,
            stale,
        })
    }

    /// Hand the catalog back so the caller can close it.
    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    /// Re-pull every view if a mutation happened since the last call.
    pub fn refresh_if_stale(&mut self) -> Result<()> {
        if self.stale.replace(false) {
            self.tours.reload(&self.catalog)?;
            self.dashboard = DashboardScreen::load(&self.catalog)?;
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingTour(form) => self.handle_tour_form(code, None, form)?,
            Mode::EditingTour { id, form } => self.handle_tour_form(code, Some(id), form)?,
            Mode::ConfirmTourDelete(confirm) => self.handle_confirm_tour_delete(code, confirm)?,
            Mode::TourDetails(tour) => self.handle_details(code, tour)?,
            Mode::Booking(form) => self.handle_booking_form(code, form)?,
            Mode::Contact(form) => self.handle_contact_form(code, form)?,
            Mode::Searching(state) => self.handle_search(code, state),
            Mode::ConfirmClearAll => self.handle_confirm_clear_all(code),
        };

        self.refresh_if_stale()?;
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.clear_status();
                self.screen = match self.screen {
                    Screen::Tours => Screen::Dashboard,
                    Screen::Dashboard => Screen::Tours,
                };
                return Ok(Mode::Normal);
            }
            _ => {}
        }

        match self.screen {
            Screen::Tours => self.handle_tours_key(code, exit),
            Screen::Dashboard => self.handle_dashboard_key(code),
        }
    }

    fn handle_tours_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                if self.tours.is_filtered() {
                    self.tours.clear_filters();
                    self.set_status("Filters cleared.", StatusKind::Info);
                } else {
                    *exit = true;
                }
            }
            KeyCode::Up => self.tours.move_selection(-1),
            KeyCode::Down => self.tours.move_selection(1),
            KeyCode::PageUp => self.tours.move_selection(-5),
            KeyCode::PageDown => self.tours.move_selection(5),
            KeyCode::Home => self.tours.select_first(),
            KeyCode::End => self.tours.select_last(),
            KeyCode::Enter => {
                if let Some(tour) = self.tours.current_tour().cloned() {
                    return Ok(Mode::TourDetails(tour));
                }
                self.set_status("No tour selected.", StatusKind::Error);
            }
            KeyCode::Char('f') | KeyCode::Char('/') => {
                self.clear_status();
                return Ok(Mode::Searching(SearchState {
                    query: self.tours.query.clone(),
                    previous: self.tours.query.clone(),
                }));
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                let message = match self.tours.cycle_bucket() {
                    Some(bucket) => format!("Duration: {}.", bucket.label()),
                    None => "Duration filter off.".to_string(),
                };
                self.set_status(message, StatusKind::Info);
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.tours.clear_filters();
                self.set_status("Filters cleared.", StatusKind::Info);
            }
            KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::AddingTour(TourForm::default()));
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(tour) = self.tours.current_tour() {
                    let mode = Mode::EditingTour {
                        id: tour.id.clone(),
                        form: TourForm::from_tour(tour),
                    };
                    self.clear_status();
                    return Ok(mode);
                }
                self.set_status("No tour selected to edit.", StatusKind::Error);
            }
            KeyCode::Char('-') | KeyCode::Delete => {
                if let Some(tour) = self.tours.current_tour() {
                    let confirm = ConfirmTourDelete::from(tour);
                    self.clear_status();
                    return Ok(Mode::ConfirmTourDelete(confirm));
                }
                self.set_status("No tour selected to remove.", StatusKind::Error);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if let Some(tour) = self.tours.current_tour().cloned() {
                    self.clear_status();
                    return Ok(self.booking_for(&tour));
                }
                self.set_status("No tour selected to book.", StatusKind::Error);
            }
            KeyCode::Char('o') | KeyCode::Char('O') => {
                if let Some(tour) = self.tours.current_tour().cloned() {
                    self.open_image(&tour);
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_dashboard_key(&mut self, code: KeyCode) -> Result<Mode> {
        match code {
            KeyCode::Esc => self.screen = Screen::Tours,
            KeyCode::Char('b') | KeyCode::Char('B') => {
                let tours = self.catalog.tours()?;
                if tours.is_empty() {
                    self.set_status("No tours registered to book.", StatusKind::Error);
                } else {
                    self.clear_status();
                    return Ok(Mode::Booking(BookingForm::new(&tours)));
                }
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                self.clear_status();
                return Ok(Mode::Contact(ContactForm::default()));
            }
            KeyCode::Char('j') | KeyCode::Char('J') => self.export(ExportKind::AllJson),
            KeyCode::Char('v') | KeyCode::Char('V') => self.export(ExportKind::AllCsv),
            KeyCode::Char('t') | KeyCode::Char('T') => self.export(ExportKind::ToursJson),
            KeyCode::Char('x') | KeyCode::Char('X') => {
                self.clear_status();
                return Ok(Mode::ConfirmClearAll);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_tour_form(
        &mut self,
        code: KeyCode,
        id: Option<String>,
        mut form: TourForm,
    ) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                let message = if id.is_some() {
                    "Edit cancelled."
                } else {
                    "Add tour cancelled."
                };
                self.set_status(message, StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Left | KeyCode::Right => form.cycle_category(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_tour(id.as_deref(), &form) {
                Ok(()) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        Ok(match (keep_open, id) {
            (false, _) => Mode::Normal,
            (true, Some(id)) => Mode::EditingTour { id, form },
            (true, None) => Mode::AddingTour(form),
        })
    }

    fn handle_confirm_tour_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmTourDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.catalog.delete_tour(&confirm.id) {
                    Ok(_) => {
                        self.set_status(format!("Deleted {}.", confirm.name), StatusKind::Info);
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        self.set_status(err.to_string(), StatusKind::Error);
                        Ok(Mode::Normal)
                    }
                }
            }
            _ => Ok(Mode::ConfirmTourDelete(confirm)),
        }
    }

    fn handle_details(&mut self, code: KeyCode, tour: Tour) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Enter => Ok(Mode::Normal),
            KeyCode::Char('r') | KeyCode::Char('R') => Ok(self.booking_for(&tour)),
            KeyCode::Char('o') | KeyCode::Char('O') => {
                self.open_image(&tour);
                Ok(Mode::TourDetails(tour))
            }
            _ => Ok(Mode::TourDetails(tour)),
        }
    }

    fn handle_booking_form(&mut self, code: KeyCode, mut form: BookingForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Booking cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Left => form.shift_tour(-1),
            KeyCode::Right => form.shift_tour(1),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.catalog.create_booking(&form.to_draft()) {
                Ok(booking) => {
                    self.set_status(
                        format!(
                            "Thank you {}! Booking for {} recorded.",
                            booking.name, booking.tour_name
                        ),
                        StatusKind::Info,
                    );
                    return Ok(Mode::Normal);
                }
                Err(err) => {
                    let message = err.to_string();
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::Booking(form))
    }

    fn handle_contact_form(&mut self, code: KeyCode, mut form: ContactForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Message discarded.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.catalog.create_contact(&form.to_draft()) {
                Ok(contact) => {
                    self.set_status(
                        format!("Thank you {}! Message saved.", contact.name),
                        StatusKind::Info,
                    );
                    return Ok(Mode::Normal);
                }
                Err(err) => {
                    let message = err.to_string();
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::Contact(form))
    }

    /// Live search: the list narrows as the query is typed.
    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Mode {
        match code {
            KeyCode::Esc => {
                self.tours.set_query(state.previous);
                return Mode::Normal;
            }
            KeyCode::Enter => {
                let shown = self.tours.filtered.len();
                self.set_status(format!("{shown} tour(s) found."), StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => state.query.push(ch),
            _ => return Mode::Searching(state),
        }
        self.tours.set_query(state.query.clone());
        Mode::Searching(state)
    }

    fn handle_confirm_clear_all(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.catalog.clear_all() {
                    Ok(()) => {
                        self.tours.clear_filters();
                        self.set_status(
                            "Data removed and seed catalog restored.",
                            StatusKind::Info,
                        );
                    }
                    Err(err) => {
                        self.set_status(format!("Clear failed: {err}"), StatusKind::Error);
                    }
                }
                Mode::Normal
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Nothing was removed.", StatusKind::Info);
                Mode::Normal
            }
            _ => Mode::ConfirmClearAll,
        }
    }

    fn save_tour(&mut self, id: Option<&str>, form: &TourForm) -> Result<()> {
        let draft = form.to_draft();
        let tour = match id {
            Some(id) => self.catalog.update_tour(id, &draft)?,
            None => self.catalog.create_tour(&draft)?,
        };
        self.set_status(format!("Saved {}.", tour.name), StatusKind::Info);
        Ok(())
    }

    fn booking_for(&mut self, tour: &Tour) -> Mode {
        match self.catalog.tours() {
            Ok(tours) => Mode::Booking(BookingForm::for_tour(&tours, tour)),
            Err(err) => {
                self.set_status(err.to_string(), StatusKind::Error);
                Mode::Normal
            }
        }
    }

    fn open_image(&mut self, tour: &Tour) {
        let target = tour.image_or_fallback().to_string();
        match open_link(&target) {
            Ok(()) => self.set_status(format!("Opened image for {}.", tour.name), StatusKind::Info),
            Err(err) => {
                warn!(target = %target, error = %err, "failed to open tour image");
                self.set_status(format!("Failed to open image: {err}"), StatusKind::Error);
            }
        }
    }

    fn export(&mut self, kind: ExportKind) {
        match self.catalog.write_export(&self.export_dir, kind) {
            Ok(path) => {
                self.set_status(format!("Exported to {}.", path.display()), StatusKind::Info)
            }
            Err(err) => self.set_status(format!("Export failed: {err}"), StatusKind::Error),
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match self.screen {
            Screen::Tours => self.draw_tours(frame, content_area),
            Screen::Dashboard => self.draw_dashboard(frame, content_area),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingTour(form) => self.draw_form(frame, area, "Add Tour", form, 70, 60),
            Mode::EditingTour { form, .. } => {
                self.draw_form(frame, area, "Edit Tour", form, 70, 60)
            }
            Mode::Booking(form) => self.draw_form(frame, area, "Quick Booking", form, 60, 40),
            Mode::Contact(form) => self.draw_form(frame, area, "Contact", form, 70, 50),
            Mode::ConfirmTourDelete(confirm) => self.draw_confirm(
                frame,
                area,
                "Confirm Removal",
                vec![
                    Line::from(format!("Remove {}?", confirm.name)),
                    Line::from("Existing bookings keep the tour name but lose the link."),
                ],
            ),
            Mode::ConfirmClearAll => self.draw_confirm(
                frame,
                area,
                "Clear All Data",
                vec![
                    Line::from("Remove every tour, booking and contact message?"),
                    Line::from("This cannot be undone. The seed catalog is restored afterwards."),
                ],
            ),
            Mode::TourDetails(tour) => self.draw_details(frame, area, tour),
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::Normal => {}
        }
    }

    fn draw_tours(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
            .split(area);

        let total = self.tours.tours.len();
        let shown = self.tours.filtered.len();
        let mut title = format!(" Tours ({shown} of {total}) ");
        if !self.tours.query.trim().is_empty() {
            title.push_str(&format!("• search \"{}\" ", self.tours.query.trim()));
        }
        if let Some(bucket) = self.tours.bucket {
            title.push_str(&format!("• {} ", bucket.label()));
        }
        let block = Block::default().title(title).borders(Borders::ALL);

        if self.tours.filtered.is_empty() {
            let message = if total == 0 {
                "No tours registered yet. Press '+' to add one."
            } else {
                "No tours found. Press 'c' to clear the filters."
            };
            let paragraph = Paragraph::new(message)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, columns[0]);
        } else {
            let items: Vec<ListItem> = self.tours.filtered.iter().map(tour_item).collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> ");
            let mut state = ListState::default().with_selected(Some(self.tours.selected));
            frame.render_stateful_widget(list, columns[0], &mut state);
        }

        self.draw_booking_panel(
            frame,
            columns[1],
            " Recent Bookings ",
            &self.tours.recent_bookings,
        );
    }

    fn draw_booking_panel(&self, frame: &mut Frame, area: Rect, title: &str, bookings: &[Booking]) {
        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        let lines: Vec<Line> = if bookings.is_empty() {
            vec![Line::from(Span::styled(
                "No recent bookings.",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            bookings
                .iter()
                .flat_map(|booking| {
                    vec![
                        Line::from(vec![
                            Span::styled(
                                booking.name.clone(),
                                Style::default().add_modifier(Modifier::BOLD),
                            ),
                            Span::raw(format!(" · {}", booking.tour_name)),
                        ]),
                        Line::from(Span::styled(
                            booking.formatted_time(),
                            Style::default().fg(Color::DarkGray),
                        )),
                    ]
                })
                .collect()
        };
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_dashboard(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);
        let stat_columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(rows[0]);

        let stats = self.dashboard.stats;
        for (idx, (label, value)) in [
            ("Tours", stats.tour_count),
            ("Bookings", stats.booking_count),
            ("Messages", stats.contact_count),
        ]
        .into_iter()
        .enumerate()
        {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                value.to_string(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .block(Block::default().title(format!(" {label} ")).borders(Borders::ALL));
            frame.render_widget(paragraph, stat_columns[idx]);
        }

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        self.draw_booking_panel(frame, panels[0], " Bookings ", &self.dashboard.bookings);

        let block = Block::default().title(" Messages ").borders(Borders::ALL);
        let lines: Vec<Line> = if self.dashboard.contacts.is_empty() {
            vec![Line::from(Span::styled(
                "No messages.",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            self.dashboard
                .contacts
                .iter()
                .flat_map(|contact| {
                    let subject = if contact.subject.is_empty() {
                        "-".to_string()
                    } else {
                        contact.subject.clone()
                    };
                    vec![
                        Line::from(vec![
                            Span::styled(
                                contact.name.clone(),
                                Style::default().add_modifier(Modifier::BOLD),
                            ),
                            Span::raw(format!(" · {subject}")),
                        ]),
                        Line::from(Span::styled(
                            contact.formatted_time(),
                            Style::default().fg(Color::DarkGray),
                        )),
                        Line::from(preview(&contact.message, CONTACT_PREVIEW_CHARS)),
                        Line::from(""),
                    ]
                })
                .collect()
        };
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, panels[1]);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        match (&self.mode, self.screen) {
            (Mode::AddingTour(_) | Mode::EditingTour { .. }, _) => key_hints(&[
                ("Enter", "Save"),
                ("Tab", "Next field"),
                ("Space/←→", "Category"),
                ("Esc", "Cancel"),
            ]),
            (Mode::Booking(_), _) => key_hints(&[
                ("Enter", "Book"),
                ("Tab", "Next field"),
                ("←→", "Tour"),
                ("Esc", "Cancel"),
            ]),
            (Mode::Contact(_), _) => key_hints(&[
                ("Enter", "Send"),
                ("Tab", "Next field"),
                ("Esc", "Cancel"),
            ]),
            (Mode::ConfirmTourDelete(_) | Mode::ConfirmClearAll, _) => {
                key_hints(&[("Y", "Confirm"), ("N/Esc", "Cancel")])
            }
            (Mode::TourDetails(_), _) => key_hints(&[
                ("R", "Book"),
                ("O", "Open image"),
                ("Esc", "Close"),
            ]),
            (Mode::Searching(_), _) => key_hints(&[("Enter", "Keep"), ("Esc", "Undo")]),
            (Mode::Normal, Screen::Tours) => key_hints(&[
                ("↑↓", "Navigate"),
                ("Enter", "Details"),
                ("F", "Search"),
                ("D", "Duration"),
                ("C", "Clear"),
                ("+", "Add"),
                ("E", "Edit"),
                ("-", "Remove"),
                ("R", "Book"),
                ("Tab", "Dashboard"),
                ("Q", "Quit"),
            ]),
            (Mode::Normal, Screen::Dashboard) => key_hints(&[
                ("B", "Quick booking"),
                ("M", "Message"),
                ("J", "Export JSON"),
                ("V", "Export CSV"),
                ("T", "Export tours"),
                ("X", "Clear all"),
                ("Tab", "Tours"),
                ("Q", "Quit"),
            ]),
        }
    }

    fn draw_form<F: FormView>(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        form: &F,
        percent_x: u16,
        percent_y: u16,
    ) {
        let popup_area = centered_rect(percent_x, percent_y, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = form.lines();
        lines.push(Line::from(""));
        match form.error() {
            Some(error) => lines.push(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red),
            ))),
            None => lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            ))),
        }

        frame.render_widget(Paragraph::new(lines), inner);

        if let Some((column, row)) = form.cursor() {
            let x = (inner.x + column).min(inner.right().saturating_sub(1));
            frame.set_cursor_position((x, inner.y + row));
        }
    }

    fn draw_confirm(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        mut lines: Vec<Line<'static>>,
    ) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Y to confirm or N / Esc to cancel.",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_details(&self, frame: &mut Frame, area: Rect, tour: &Tour) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!(" {} ", tour.name))
            .borders(Borders::ALL);
        let duration = if tour.duration.is_empty() {
            "-".to_string()
        } else {
            tour.duration.clone()
        };
        let label = Style::default().add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from(vec![Span::styled("Location: ", label), Span::raw(tour.location.clone())]),
            Line::from(vec![Span::styled("Duration: ", label), Span::raw(duration)]),
            Line::from(vec![Span::styled("Price: ", label), Span::raw(tour.display_price())]),
            Line::from(vec![
                Span::styled("Category: ", label),
                Span::raw(tour.category.label().to_string()),
            ]),
            Line::from(vec![
                Span::styled("Image: ", label),
                Span::raw(tour.image_or_fallback().to_string()),
            ]),
            Line::from(""),
            Line::from(preview(&tour.description, DETAILS_DESCRIPTION_CHARS)),
        ];
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Search: ".len() as u16 + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }
}

/// One catalog row: name in bold, then location, duration, price, category.
fn tour_item(tour: &Tour) -> ListItem<'static> {
    let duration = if tour.duration.is_empty() {
        "-"
    } else {
        tour.duration.as_str()
    };
    ListItem::new(vec![
        Line::from(Span::styled(
            tour.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "  {} • {} • {} • {}",
                tour.location,
                duration,
                tour.display_price(),
                tour.category.label()
            ),
            Style::default().fg(Color::Gray),
        )),
    ])
}
