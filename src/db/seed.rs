use tracing::info;

use crate::error::Result;
use crate::models::{new_record_id, Category, Tour};

use super::store::{load, save, Collection, KeyValueStore};

/// (name, location, duration, price, category, description, image)
type SeedRow = (
    &'static str,
    &'static str,
    &'static str,
    f64,
    Category,
    &'static str,
    &'static str,
);

const SEED_CATALOG: [SeedRow; 9] = [
    (
        "Vale das Cachoeiras",
        "Nova União, Rondônia",
        "meio-dia",
        120.00,
        Category::Adventure,
        "Um dos locais mais visitados de Rondônia, o Vale das Cachoeiras possui quedas d’água de águas cristalinas cercadas por vegetação amazônica. Ideal para banhos, caminhadas e fotografia.",
        "fotos/imagensPontosTuristicos/valedascachoeiras.jpg",
    ),
    (
        "Forte Príncipe da Beira",
        "Costa Marques, Rondônia",
        "2h",
        0.00,
        Category::Cultural,
        "Construído no século XVIII, o Forte Príncipe da Beira é uma das maiores fortalezas coloniais fora da Europa. Ponto histórico às margens do rio Guaporé, importante simbolo da região.",
        "fotos/imagensPontosTuristicos/forteprincipe.jpeg",
    ),
    (
        "Encontro das Águas Mamoré / Pacaás Novos",
        "Guajará-Mirim, Rondônia",
        "2-4h",
        80.00,
        Category::Ecotourism,
        "Fenômeno natural onde os rios se encontram com cores distintas. Passeio de barco recomendado para observação de fauna, fotografia e contemplação da paisagem ribeirinha.",
        "fotos/imagensPontosTuristicos/encontrodaságuas.jpg",
    ),
    (
        "Cachoeira 2 de Novembro",
        "Machadinho D’Oeste, Rondônia",
        "meio-dia",
        60.00,
        Category::Adventure,
        "Quedas d'água com poços para banho e áreas verdes ao redor. Excelente para relaxar em meio à natureza e realizar trilhas leves.",
        "fotos/imagensPontosTuristicos/2denovembro.jpg",
    ),
    (
        "Cachoeira das Araras",
        "Vilhena, Rondônia",
        "meio-dia",
        50.00,
        Category::Adventure,
        "Rodeada por vegetação nativa e conhecida pela presença de araras, a cachoeira oferece contato direto com a fauna local e águas limpas para banho.",
        "fotos/imagensPontosTuristicos/cachoeira-das-araras.webp",
    ),
    (
        "Morro Chico Mendes",
        "Ouro Preto do Oeste, Rondônia",
        "manhã/tarde",
        30.00,
        Category::Ecotourism,
        "Ponto de contemplação que homenageia Chico Mendes. Trilhas, mirantes e visão panorâmica da paisagem amazônica fazem parte do passeio.",
        "fotos/imagensPontosTuristicos/Morro-Chico-Mendes.jpg",
    ),
    (
        "Cachoeira do Rio Cautário",
        "Costa Marques, Rondônia",
        "dia inteiro",
        100.00,
        Category::Ecotourism,
        "Cachoeira localizada na Reserva Extrativista do Rio Cautário. Ambiente rústico e preservado, ideal para ecoturismo consciente e contato com comunidades locais.",
        "fotos/imagensPontosTuristicos/cachoeirariocautario.webp",
    ),
    (
        "Parque Estadual Serra dos Reis",
        "São Francisco do Guaporé / Costa Marques, Rondônia",
        "dia inteiro",
        0.00,
        Category::Ecotourism,
        "Parque estadual com rica biodiversidade, trilhas e formações rochosas. Excelente para pesquisa, observação de aves e trilhas na natureza.",
        "fotos/imagensPontosTuristicos/PARQUE-SERRA-DOS-REIS.jpg",
    ),
    (
        "Museu Madeira-Mamoré",
        "Porto Velho, Rondônia",
        "1-2h",
        10.00,
        Category::Cultural,
        "Museu que preserva a história da Estrada de Ferro Madeira-Mamoré, com locomotivas, fotos históricas e artefatos que contam a saga da ferrovia na Amazônia.",
        "fotos/imagensPontosTuristicos/museuefmm.webp",
    ),
];

/// Build the initial catalog with fresh ids.
pub fn seed_tours() -> Vec<Tour> {
    SEED_CATALOG
        .iter()
        .map(
            |&(name, location, duration, price, category, description, image_ref)| Tour {
                id: new_record_id(),
                name: name.to_string(),
                location: location.to_string(),
                duration: duration.to_string(),
                price,
                category,
                description: description.to_string(),
                image_ref: image_ref.to_string(),
                created_at: None,
            },
        )
        .collect()
}

/// Write the seed catalog when, and only when, no tour is stored. Returns
/// whether anything was written.
pub fn ensure_seeded(store: &dyn KeyValueStore) -> Result<bool> {
    let existing: Vec<Tour> = load(store, Collection::Tours)?;
    if !existing.is_empty() {
        return Ok(false);
    }

    let seed = seed_tours();
    save(store, Collection::Tours, &seed)?;
    info!(count = seed.len(), "seeded tour catalog");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[test]
    fn empty_store_receives_nine_tours() {
        let store = MemoryStore::default();
        assert!(ensure_seeded(&store).unwrap());
        let tours: Vec<Tour> = load(&store, Collection::Tours).unwrap();
        assert_eq!(tours.len(), 9);
        assert_eq!(tours[0].name, "Vale das Cachoeiras");
        assert_eq!(tours[8].name, "Museu Madeira-Mamoré");
        assert_eq!(tours[1].duration, "2h");
        assert_eq!(tours[1].price, 0.0);
    }

    #[test]
    fn seeding_twice_leaves_stored_bytes_unchanged() {
        let store = MemoryStore::default();
        ensure_seeded(&store).unwrap();
        let before = store.get(Collection::Tours.key()).unwrap();
        assert!(!ensure_seeded(&store).unwrap());
        assert_eq!(store.get(Collection::Tours.key()).unwrap(), before);
    }

    #[test]
    fn existing_catalog_is_never_reseeded() {
        let store = MemoryStore::default();
        let mut single = seed_tours();
        single.truncate(1);
        save(&store, Collection::Tours, &single).unwrap();
        assert!(!ensure_seeded(&store).unwrap());
        let tours: Vec<Tour> = load(&store, Collection::Tours).unwrap();
        assert_eq!(tours, single);
    }

    #[test]
    fn seed_ids_are_unique() {
        let tours = seed_tours();
        let mut ids: Vec<_> = tours.iter().map(|t| t.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), tours.len());
    }
}
