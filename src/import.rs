// Import of loosely-typed JSON documents into canonical records

use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{info, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::models::decode_image;
use crate::record::Record;

/// Parse a JSON document into records, coercing every field
///
/// The document must be an array. Each element is coerced field by field;
/// missing or mistyped values take defaults instead of failing. Elements
/// without an id get their 1-based position, and ids seen earlier in the
/// document are moved past the current maximum.
pub fn import_records<R: Record>(json: &str, config: &StoreConfig) -> StoreResult<Vec<R>> {
    let document: Value = serde_json::from_str(json).map_err(|e| StoreError::Format(e.to_string()))?;
    import_value(document, config)
}

/// Same as [`import_records`], for an already parsed document
pub fn import_value<R: Record>(document: Value, config: &StoreConfig) -> StoreResult<Vec<R>> {
    let items = match document {
        Value::Array(items) => items,
        other => {
            return Err(StoreError::Format(format!(
                "expected a JSON array, found {}",
                value_kind(&other)
            )));
        }
    };

    let empty = Map::new();
    let mut seen: HashSet<u64> = HashSet::new();
    let mut max_id = items
        .iter()
        .filter_map(|item| item.as_object())
        .filter_map(|raw| integer(raw, &["id"]))
        .filter(|id| *id > 0)
        .max()
        .unwrap_or(0) as u64;

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let raw = item.as_object().unwrap_or(&empty);
        let mut id = integer(raw, &["id"])
            .filter(|id| *id > 0)
            .map(|id| id as u64)
            .unwrap_or(index as u64 + 1);

        if !seen.insert(id) {
            max_id = max_id.max(items.len() as u64) + 1;
            warn!(
                collection = R::collection_name(),
                duplicate = id,
                reassigned = max_id,
                "Duplicate id in import, reassigning"
            );
            id = max_id;
            seen.insert(id);
        }

        records.push(R::coerce(id, raw, config));
    }

    info!(
        collection = R::collection_name(),
        count = records.len(),
        "Imported records"
    );

    Ok(records)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn lookup<'a>(raw: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| raw.get(*key)).filter(|v| !v.is_null())
}

/// Trimmed, non-blank string; numbers and booleans are stringified
pub(crate) fn text(raw: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    let s = match lookup(raw, keys)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if s.is_empty() { None } else { Some(s) }
}

/// Finite number, parsing numeric strings
pub(crate) fn number(raw: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    let n = match lookup(raw, keys)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Integer; fractional values truncate
pub(crate) fn integer(raw: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    let value = lookup(raw, keys)?;
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    match value {
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| number_from_str(s))
        }
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64),
        _ => None,
    }
}

fn number_from_str(s: &str) -> Option<i64> {
    s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)
}

pub(crate) fn flag(raw: &Map<String, Value>, keys: &[&str]) -> Option<bool> {
    match lookup(raw, keys)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub(crate) fn image(raw: &Map<String, Value>, keys: &[&str]) -> Option<Vec<u8>> {
    match lookup(raw, keys)? {
        Value::String(s) => decode_image(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgendaItem, AgendaKind, Product};
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::json;

    #[test]
    fn test_import_rejects_non_array() {
        let config = StoreConfig::default();
        let err = import_records::<Product>(r#"{"id": 1}"#, &config).unwrap_err();
        assert_eq!(
            err,
            StoreError::Format("expected a JSON array, found an object".to_string())
        );
    }

    #[test]
    fn test_import_rejects_unparseable() {
        let config = StoreConfig::default();
        let err = import_records::<Product>("[{", &config).unwrap_err();
        assert!(matches!(err, StoreError::Format(_)));
    }

    #[test]
    fn test_import_coerces_missing_fields() {
        let config = StoreConfig::default();
        let products: Vec<Product> = import_records("[{}, {\"name\": \"Gloss\"}]", &config).unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, 1);
        assert_eq!(products[1].id, 2);
        assert_eq!(products[0].name, "New product");
        assert_eq!(products[1].name, "Gloss");
        assert_eq!(products[0].price, 0.0);
        assert_eq!(products[0].stock, 0);
        assert_eq!(products[0].rating, 1.0);
        assert!(!products[0].cruelty_free);
        assert!(!products[0].vegan);
        assert!(products[0].image.is_none());
    }

    #[test]
    fn test_import_coerces_mistyped_values() {
        let config = StoreConfig::default();
        let doc = json!([{
            "id": "4",
            "price": "12.5",
            "rating": 9,
            "stock": 3.7,
            "vegan": "yes",
            "cruelty_free": 1,
            "image": "cGluaw=="
        }]);
        let products: Vec<Product> = import_value(doc, &config).unwrap();

        assert_eq!(products[0].id, 4);
        assert_eq!(products[0].price, 12.5);
        assert_eq!(products[0].rating, 5.0);
        assert_eq!(products[0].stock, 3);
        assert!(products[0].vegan);
        assert!(products[0].cruelty_free);
        assert_eq!(products[0].image.as_deref(), Some(&b"pink"[..]));
    }

    #[test]
    fn test_import_accepts_legacy_keys() {
        let config = StoreConfig::default();
        let doc = json!([{
            "id": 1,
            "nombre": "Liquid Blush",
            "marca": "Rare Beauty",
            "categoría": "Rostro",
            "acabado": "Satinado",
            "tono": "Happy",
            "precio": 115.0,
            "vegano": true,
            "image_b64": ""
        }]);
        let products: Vec<Product> = import_value(doc, &config).unwrap();

        assert_eq!(products[0].name, "Liquid Blush");
        assert_eq!(products[0].brand, "Rare Beauty");
        assert_eq!(products[0].category, "Rostro");
        assert_eq!(products[0].shade, "Happy");
        assert_eq!(products[0].price, 115.0);
        assert!(products[0].vegan);
        assert!(products[0].image.is_none());
    }

    #[test]
    fn test_import_reassigns_duplicate_ids() {
        let config = StoreConfig::default();
        let doc = json!([{"id": 2}, {"id": 2}, {}]);
        let products: Vec<Product> = import_value(doc, &config).unwrap();

        let ids: Vec<u64> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids[0], 2);
        assert_eq!(ids[1], 4);
        assert_eq!(ids[2], 3);
    }

    #[test]
    fn test_import_ids_unique_when_positions_collide() {
        let config = StoreConfig::default();
        let doc = json!([{}, {"id": 1}]);
        let products: Vec<Product> = import_value(doc, &config).unwrap();

        assert_eq!(products[0].id, 1);
        assert_ne!(products[1].id, 1);
    }

    #[test]
    fn test_import_non_object_elements_become_defaults() {
        let config = StoreConfig::default();
        let products: Vec<Product> = import_records("[42, \"x\"]", &config).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].id, 2);
        assert_eq!(products[1].name, "New product");
    }

    #[test]
    fn test_import_agenda() {
        let mut config = StoreConfig::default();
        config.agenda.date = NaiveDate::from_ymd_opt(2026, 10, 16);
        let doc = json!([
            {"topic": "Kickoff", "start": "2026-10-20T10:00:00", "minutes": 20, "kind": "decision"},
            {"Tema": "Budget", "Inicio": "11:30", "Min": "2", "Tipo": "Información", "Responsable": "Ana"}
        ]);
        let items: Vec<AgendaItem> = import_value(doc, &config).unwrap();

        let ts = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
        assert_eq!(items[0].start, ts("2026-10-20 10:00"));
        assert_eq!(items[0].end, ts("2026-10-20 10:20"));
        assert_eq!(items[0].kind, AgendaKind::Decision);
        assert_eq!(items[1].topic, "Budget");
        assert_eq!(items[1].owner, "Ana");
        assert_eq!(items[1].start, ts("2026-10-16 11:30"));
        assert_eq!(items[1].minutes, 5);
        assert_eq!(items[1].end, ts("2026-10-16 11:35"));
        assert_eq!(items[1].kind, AgendaKind::Information);
    }
}
