use tracing::info;

use crate::error::Result;
use crate::models::{new_record_id, now_millis, Contact, ContactDraft};

use super::store::{load_records, save, Collection, KeyValueStore};

/// All contact messages, newest first.
pub fn fetch_contacts(store: &dyn KeyValueStore) -> Result<Vec<Contact>> {
    load_records(store, Collection::Contacts)
}

/// Store a contact message at the front of the list.
pub fn create_contact(store: &dyn KeyValueStore, draft: &ContactDraft) -> Result<Contact> {
    let draft = draft.validated()?;
    let contact = Contact {
        id: new_record_id(),
        name: draft.name,
        email: draft.email,
        subject: draft.subject,
        message: draft.message,
        timestamp: now_millis(),
    };

    let mut contacts = fetch_contacts(store)?;
    contacts.insert(0, contact.clone());
    save(store, Collection::Contacts, &contacts)?;
    info!(id = %contact.id, "stored contact message");
    Ok(contact)
}

/// The `limit` newest contact messages.
pub fn recent_contacts(store: &dyn KeyValueStore, limit: usize) -> Result<Vec<Contact>> {
    let mut contacts = fetch_contacts(store)?;
    contacts.truncate(limit);
    Ok(contacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::error::CatalogError;

    fn draft(name: &str, message: &str) -> ContactDraft {
        ContactDraft {
            name: name.to_string(),
            email: "contato@example.com".to_string(),
            subject: "Dúvida".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn contacts_are_listed_newest_first() {
        let store = MemoryStore::default();
        create_contact(&store, &draft("A", "primeira")).unwrap();
        create_contact(&store, &draft("B", "segunda")).unwrap();
        let names: Vec<_> = fetch_contacts(&store)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["B", "A"]);
    }

    #[test]
    fn message_is_required() {
        let store = MemoryStore::default();
        let err = create_contact(&store, &draft("A", "  ")).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert!(fetch_contacts(&store).unwrap().is_empty());
    }

    #[test]
    fn recent_contacts_returns_prefix() {
        let store = MemoryStore::default();
        for idx in 0..5 {
            create_contact(&store, &draft(&format!("P{idx}"), "oi")).unwrap();
        }
        let recent = recent_contacts(&store, 3).unwrap();
        let names: Vec<_> = recent.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["P4", "P3", "P2"]);
    }
}
