//! JSON and CSV exports of the three collections.

use std::fs;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use tracing::info;

use crate::db::{fetch_bookings, fetch_contacts, fetch_tours, KeyValueStore};
use crate::error::Result;
use crate::models::{format_timestamp, now_millis, truncate_chars, Booking, Contact, Tour};

/// Contact messages are cut to this many characters in the CSV export only.
pub const CSV_MESSAGE_CHARS: usize = 40;

const CSV_HEADER: [&str; 5] = ["tipo", "campo1", "campo2", "campo3", "campo4"];

/// Full snapshot of every collection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub passeios: Vec<Tour>,
    pub reservas: Vec<Booking>,
    pub contatos: Vec<Contact>,
    pub exported_at: i64,
}

/// Which export to produce when writing to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    AllJson,
    AllCsv,
    ToursJson,
}

impl ExportKind {
    pub fn file_name(self) -> &'static str {
        match self {
            ExportKind::AllJson => "amazonia_viva_all_data.json",
            ExportKind::AllCsv => "amazonia_viva_data.csv",
            ExportKind::ToursJson => "passeios_amazonia.json",
        }
    }
}

pub fn export_document(store: &dyn KeyValueStore) -> Result<ExportDocument> {
    Ok(ExportDocument {
        passeios: fetch_tours(store)?,
        reservas: fetch_bookings(store)?,
        contatos: fetch_contacts(store)?,
        exported_at: now_millis(),
    })
}

/// Pretty-printed JSON with every collection and the export time.
pub fn export_json(store: &dyn KeyValueStore) -> Result<String> {
    Ok(serde_json::to_string_pretty(&export_document(store)?)?)
}

/// Pretty-printed JSON of the tour list alone.
pub fn export_tours_json(store: &dyn KeyValueStore) -> Result<String> {
    Ok(serde_json::to_string_pretty(&fetch_tours(store)?)?)
}

/// One flattened row per record, tagged by type, every field quoted.
pub fn export_csv(store: &dyn KeyValueStore) -> Result<String> {
    let tours = fetch_tours(store)?;
    let bookings = fetch_bookings(store)?;
    let contacts = fetch_contacts(store)?;
    render_csv(&tours, &bookings, &contacts)
}

fn render_csv(tours: &[Tour], bookings: &[Booking], contacts: &[Contact]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for tour in tours {
        let price = tour.price.to_string();
        writer.write_record([
            "tour",
            tour.name.as_str(),
            tour.location.as_str(),
            tour.duration.as_str(),
            price.as_str(),
        ])?;
    }
    for booking in bookings {
        let when = format_timestamp(booking.timestamp);
        writer.write_record([
            "booking",
            booking.name.as_str(),
            booking.email.as_str(),
            booking.tour_name.as_str(),
            when.as_str(),
        ])?;
    }
    for contact in contacts {
        let message = truncate_chars(&contact.message, CSV_MESSAGE_CHARS);
        writer.write_record([
            "contact",
            contact.name.as_str(),
            contact.email.as_str(),
            contact.subject.as_str(),
            message.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    let mut text = String::from_utf8_lossy(&bytes).into_owned();
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Render `kind` and write it under `dir`, returning the written path.
pub fn write_export(store: &dyn KeyValueStore, dir: &Path, kind: ExportKind) -> Result<PathBuf> {
    let contents = match kind {
        ExportKind::AllJson => export_json(store)?,
        ExportKind::AllCsv => export_csv(store)?,
        ExportKind::ToursJson => export_tours_json(store)?,
    };
    fs::create_dir_all(dir)?;
    let path = dir.join(kind.file_name());
    fs::write(&path, contents)?;
    info!(path = %path.display(), "wrote export");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_booking, create_contact, ensure_seeded, MemoryStore};
    use crate::models::{BookingDraft, ContactDraft};
    use serde_json::Value;
    use tempfile::tempdir;

    const LONG_MESSAGE: &str =
        "Gostaria de saber se o passeio \"Vale\" aceita grupos grandes no fim de semana.";

    fn populated() -> MemoryStore {
        let store = MemoryStore::default();
        ensure_seeded(&store).unwrap();
        create_booking(
            &store,
            &BookingDraft {
                name: "Ana".into(),
                email: "ana@example.com".into(),
                tour_id: None,
                tour_name: "Museu Madeira-Mamoré".into(),
            },
        )
        .unwrap();
        create_contact(
            &store,
            &ContactDraft {
                name: "Bruno".into(),
                email: "bruno@example.com".into(),
                subject: "Grupos".into(),
                message: LONG_MESSAGE.into(),
            },
        )
        .unwrap();
        store
    }

    #[test]
    fn csv_has_header_and_one_row_per_record() {
        let csv = export_csv(&populated()).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], r#""tipo","campo1","campo2","campo3","campo4""#);
        assert_eq!(lines.len(), 1 + 9 + 1 + 1);
        assert_eq!(
            lines[1],
            r#""tour","Vale das Cachoeiras","Nova União, Rondônia","meio-dia","120""#
        );
        assert!(lines[10]
            .starts_with(r#""booking","Ana","ana@example.com","Museu Madeira-Mamoré","#));
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn csv_doubles_quotes_and_truncates_messages() {
        let csv = export_csv(&populated()).unwrap();
        let contact_row = csv.lines().last().unwrap();
        let truncated: String = LONG_MESSAGE.chars().take(CSV_MESSAGE_CHARS).collect();
        let expected_field = format!("\"{}\"", truncated.replace('"', "\"\""));
        assert!(contact_row.starts_with(r#""contact","Bruno","bruno@example.com","Grupos","#));
        assert!(contact_row.ends_with(&expected_field));
        assert!(contact_row.contains("\"\"Vale\"\""));
    }

    #[test]
    fn json_keeps_full_messages_and_all_collections() {
        let json = export_json(&populated()).unwrap();
        let doc: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(doc["passeios"].as_array().unwrap().len(), 9);
        assert_eq!(doc["reservas"][0]["tourName"], "Museu Madeira-Mamoré");
        assert_eq!(doc["contatos"][0]["message"], LONG_MESSAGE);
        assert!(doc["exportedAt"].as_i64().unwrap() > 0);
    }

    #[test]
    fn empty_store_exports_header_only() {
        let store = MemoryStore::default();
        assert_eq!(export_csv(&store).unwrap(), r#""tipo","campo1","campo2","campo3","campo4""#);
        assert_eq!(export_tours_json(&store).unwrap(), "[]");
    }

    #[test]
    fn exports_are_written_with_their_file_names() {
        let store = populated();
        let dir = tempdir().unwrap();
        for kind in [ExportKind::AllJson, ExportKind::AllCsv, ExportKind::ToursJson] {
            let path = write_export(&store, dir.path(), kind).unwrap();
            assert_eq!(path, dir.path().join(kind.file_name()));
            assert!(!fs::read_to_string(&path).unwrap().is_empty());
        }
    }
}
