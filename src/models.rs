// Data models: catalog products, agenda items and meeting metadata

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::StoreConfig;
use crate::import::{flag, image, integer, number, text};
use crate::record::{FieldValue, Record};

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub finish: String,
    pub shade: String,
    pub price: f64,
    pub rating: f64,
    pub cruelty_free: bool,
    pub vegan: bool,
    pub stock: i64,
    pub description: String,
    pub image_url: Option<String>,
    /// Raw image bytes, base64 in JSON
    #[serde(default, with = "image_base64")]
    pub image: Option<Vec<u8>>,
}

/// Input for adding or replacing a product; `None` takes the configured default
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub finish: Option<String>,
    pub shade: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub stock: Option<i64>,
    pub cruelty_free: Option<bool>,
    pub vegan: Option<bool>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image: Option<Vec<u8>>,
}

const PRODUCT_COLUMNS: &[&str] = &[
    "id",
    "name",
    "brand",
    "category",
    "finish",
    "shade",
    "price",
    "rating",
    "cruelty_free",
    "vegan",
    "stock",
    "description",
    "image_url",
];

impl Record for Product {
    type Draft = ProductDraft;

    fn id(&self) -> u64 {
        self.id
    }

    fn collection_name() -> &'static str {
        "products"
    }

    fn columns() -> &'static [&'static str] {
        PRODUCT_COLUMNS
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "id" => FieldValue::Int(self.id as i64),
            "name" => self.name.as_str().into(),
            "brand" => self.brand.as_str().into(),
            "category" => self.category.as_str().into(),
            "finish" => self.finish.as_str().into(),
            "shade" => self.shade.as_str().into(),
            "price" => self.price.into(),
            "rating" => self.rating.into(),
            "cruelty_free" => self.cruelty_free.into(),
            "vegan" => self.vegan.into(),
            "stock" => self.stock.into(),
            "description" => self.description.as_str().into(),
            "image_url" => self.image_url.clone().unwrap_or_default().into(),
            _ => return None,
        };
        Some(value)
    }

    fn search_fields() -> &'static [&'static str] {
        &["name", "shade", "brand"]
    }

    fn from_draft(id: u64, draft: ProductDraft, _previous: Option<&Self>, config: &StoreConfig) -> Self {
        let d = &config.product;
        Product {
            id,
            name: non_blank(draft.name).unwrap_or_else(|| d.name.clone()),
            brand: non_blank(draft.brand).unwrap_or_else(|| d.brand.clone()),
            category: non_blank(draft.category).unwrap_or_else(|| d.category.clone()),
            finish: non_blank(draft.finish).unwrap_or_else(|| d.finish.clone()),
            shade: non_blank(draft.shade).unwrap_or_else(|| d.shade.clone()),
            price: d.price(draft.price),
            rating: d.rating(draft.rating),
            cruelty_free: draft.cruelty_free.unwrap_or(d.cruelty_free),
            vegan: draft.vegan.unwrap_or(d.vegan),
            stock: d.stock(draft.stock),
            description: non_blank(draft.description).unwrap_or_else(|| d.description.clone()),
            image_url: non_blank(draft.image_url),
            image: draft.image.filter(|bytes| !bytes.is_empty()),
        }
    }

    // Imports default numbers to zero (rating to its lower bound), not to the add-form defaults
    fn coerce(id: u64, raw: &Map<String, Value>, config: &StoreConfig) -> Self {
        let d = &config.product;
        Product {
            id,
            name: text(raw, &["name", "nombre"]).unwrap_or_else(|| d.name.clone()),
            brand: text(raw, &["brand", "marca"]).unwrap_or_else(|| d.brand.clone()),
            category: text(raw, &["category", "categoría", "categoria"]).unwrap_or_else(|| d.category.clone()),
            finish: text(raw, &["finish", "acabado"]).unwrap_or_else(|| d.finish.clone()),
            shade: text(raw, &["shade", "tono"]).unwrap_or_else(|| d.shade.clone()),
            price: number(raw, &["price", "precio"]).unwrap_or(0.0).max(0.0),
            rating: d.bound_rating(number(raw, &["rating"]).unwrap_or(d.rating_min)),
            cruelty_free: flag(raw, &["cruelty_free"]).unwrap_or(false),
            vegan: flag(raw, &["vegan", "vegano"]).unwrap_or(false),
            stock: integer(raw, &["stock"]).unwrap_or(0).max(0),
            description: text(raw, &["description", "descripcion"]).unwrap_or_default(),
            image_url: text(raw, &["image_url"]),
            image: image(raw, &["image", "image_b64"]),
        }
    }
}

/// Kind of agenda item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgendaKind {
    #[default]
    Discussion,
    Decision,
    Information,
}

impl AgendaKind {
    pub const ALL: [AgendaKind; 3] = [AgendaKind::Discussion, AgendaKind::Decision, AgendaKind::Information];

    /// Case-insensitive parse, accepting the labels older exports used
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "discussion" | "discusión" | "discusion" => Some(AgendaKind::Discussion),
            "decision" | "decisión" => Some(AgendaKind::Decision),
            "information" | "info" | "información" | "informacion" => Some(AgendaKind::Information),
            _ => None,
        }
    }
}

impl std::fmt::Display for AgendaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgendaKind::Discussion => write!(f, "Discussion"),
            AgendaKind::Decision => write!(f, "Decision"),
            AgendaKind::Information => write!(f, "Information"),
        }
    }
}

/// Meeting agenda item; `end` is always `start + minutes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaItem {
    pub id: u64,
    pub topic: String,
    pub owner: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub minutes: u32,
    pub kind: AgendaKind,
    pub objective: String,
}

/// Input for adding or replacing an agenda item
#[derive(Debug, Clone)]
pub struct AgendaDraft {
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub minutes: Option<i64>,
    pub kind: Option<AgendaKind>,
    pub topic: Option<String>,
    pub owner: Option<String>,
    pub objective: Option<String>,
    /// Start where the last item in the store ends, ignoring `start_time`
    pub auto_chain: bool,
}

impl AgendaDraft {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            start_time: None,
            minutes: None,
            kind: None,
            topic: None,
            owner: None,
            objective: None,
            auto_chain: false,
        }
    }
}

/// Start instant for a new agenda item
///
/// With `auto_chain` and a previous item, the new item starts where the
/// previous one ends; otherwise the requested start is used.
pub fn sequence_start(
    previous_end: Option<NaiveDateTime>,
    requested: NaiveDateTime,
    auto_chain: bool,
) -> NaiveDateTime {
    match previous_end {
        Some(end) if auto_chain => end,
        _ => requested,
    }
}

const AGENDA_COLUMNS: &[&str] = &[
    "id",
    "topic",
    "owner",
    "date",
    "start",
    "end",
    "minutes",
    "kind",
    "objective",
];

impl AgendaItem {
    fn scheduled(
        id: u64,
        start: NaiveDateTime,
        minutes: u32,
        kind: AgendaKind,
        topic: String,
        owner: String,
        objective: String,
    ) -> Self {
        AgendaItem {
            id,
            topic,
            owner,
            start,
            end: start + Duration::minutes(minutes as i64),
            minutes,
            kind,
            objective,
        }
    }
}

impl Record for AgendaItem {
    type Draft = AgendaDraft;

    fn id(&self) -> u64 {
        self.id
    }

    fn collection_name() -> &'static str {
        "agenda"
    }

    fn columns() -> &'static [&'static str] {
        AGENDA_COLUMNS
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "id" => FieldValue::Int(self.id as i64),
            "topic" => self.topic.as_str().into(),
            "owner" => self.owner.as_str().into(),
            "date" => self.start.format("%Y-%m-%d").to_string().into(),
            "start" => self.start.format("%H:%M").to_string().into(),
            "end" => self.end.format("%H:%M").to_string().into(),
            "minutes" => FieldValue::Int(self.minutes as i64),
            "kind" => self.kind.to_string().into(),
            "objective" => self.objective.as_str().into(),
            _ => return None,
        };
        Some(value)
    }

    fn search_fields() -> &'static [&'static str] {
        &["topic", "owner", "objective"]
    }

    fn from_draft(id: u64, draft: AgendaDraft, previous: Option<&Self>, config: &StoreConfig) -> Self {
        let d = &config.agenda;
        let requested = draft.date.and_time(draft.start_time.unwrap_or(d.start));
        let start = sequence_start(previous.map(|p| p.end), requested, draft.auto_chain);
        AgendaItem::scheduled(
            id,
            start,
            d.minutes(draft.minutes),
            draft.kind.unwrap_or(d.kind),
            non_blank(draft.topic).unwrap_or_else(|| d.topic.clone()),
            draft.owner.map(|s| s.trim().to_string()).unwrap_or_else(|| d.owner.clone()),
            draft.objective.map(|s| s.trim().to_string()).unwrap_or_else(|| d.objective.clone()),
        )
    }

    fn coerce(id: u64, raw: &Map<String, Value>, config: &StoreConfig) -> Self {
        let d = &config.agenda;
        let start_raw = text(raw, &["start", "Inicio"]);

        // A full timestamp in `start` wins over a separate `date`
        let start = match start_raw.as_deref().and_then(parse_datetime) {
            Some(start) => start,
            None => {
                let date = text(raw, &["date", "fecha"])
                    .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
                    .unwrap_or_else(|| d.date());
                let time = start_raw.as_deref().and_then(parse_time).unwrap_or(d.start);
                date.and_time(time)
            }
        };

        AgendaItem::scheduled(
            id,
            start,
            d.minutes(integer(raw, &["minutes", "Min"])),
            text(raw, &["kind", "Tipo"])
                .and_then(|s| AgendaKind::parse(&s))
                .unwrap_or(d.kind),
            text(raw, &["topic", "Tema"]).unwrap_or_else(|| d.topic.clone()),
            text(raw, &["owner", "Responsable"]).unwrap_or_default(),
            text(raw, &["objective", "Objetivo"]).unwrap_or_default(),
        )
    }
}

/// Meeting metadata shown in the minutes header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub title: String,
    pub date: NaiveDate,
    pub timezone: String,
    pub location: String,
    pub host: String,
    pub link: String,
}

impl Meeting {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            title: "General meeting".to_string(),
            date,
            timezone: "America/Lima".to_string(),
            location: "Virtual".to_string(),
            host: String::new(),
            link: String::new(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    ["%H:%M:%S", "%H:%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
}

/// Decode a base64 image payload; invalid or empty input yields `None`
pub fn decode_image(encoded: &str) -> Option<Vec<u8>> {
    use base64::Engine;
    let encoded = encoded.trim();
    if encoded.is_empty() {
        return None;
    }
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()
        .filter(|bytes| !bytes.is_empty())
}

mod image_base64 {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(image: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match image {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        match encoded.filter(|s| !s.is_empty()) {
            Some(s) => STANDARD.decode(s).map(Some).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        date().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_product_draft_defaults() {
        let config = StoreConfig::default();
        let product = Product::from_draft(3, ProductDraft::default(), None, &config);

        assert_eq!(product.id, 3);
        assert_eq!(product.name, "New product");
        assert_eq!(product.shade, "Pink");
        assert_eq!(product.price, 59.0);
        assert_eq!(product.rating, 4.5);
        assert_eq!(product.stock, 10);
        assert!(product.cruelty_free);
        assert!(!product.vegan);
        assert!(product.image_url.is_none());
    }

    #[test]
    fn test_product_draft_clamps_and_trims() {
        let config = StoreConfig::default();
        let draft = ProductDraft {
            name: Some("  Lip Oil  ".to_string()),
            brand: Some("   ".to_string()),
            price: Some(-10.0),
            rating: Some(7.2),
            stock: Some(-1),
            image_url: Some("  ".to_string()),
            ..Default::default()
        };
        let product = Product::from_draft(1, draft, None, &config);

        assert_eq!(product.name, "Lip Oil");
        assert_eq!(product.brand, "Other");
        assert_eq!(product.price, 0.0);
        assert_eq!(product.rating, 5.0);
        assert_eq!(product.stock, 0);
        assert!(product.image_url.is_none());
    }

    #[test]
    fn test_product_fields() {
        let config = StoreConfig::default();
        let product = Product::from_draft(1, ProductDraft::default(), None, &config);

        assert_eq!(product.field("price"), Some(FieldValue::Float(59.0)));
        assert_eq!(product.field("vegan"), Some(FieldValue::Bool(false)));
        assert_eq!(product.field("stock"), Some(FieldValue::Int(10)));
        assert_eq!(product.field("image_url"), Some(FieldValue::Text(String::new())));
        assert_eq!(product.field("nonexistent"), None);
        for column in Product::columns() {
            assert!(product.field(column).is_some(), "missing column {}", column);
        }
    }

    #[test]
    fn test_product_image_serializes_as_base64() {
        let config = StoreConfig::default();
        let draft = ProductDraft {
            image: Some(b"pink".to_vec()),
            ..Default::default()
        };
        let product = Product::from_draft(1, draft, None, &config);

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["image"], "cGluaw==");

        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back.image.as_deref(), Some(&b"pink"[..]));
    }

    #[test]
    fn test_product_without_image_serializes_null() {
        let config = StoreConfig::default();
        let product = Product::from_draft(1, ProductDraft::default(), None, &config);
        let json = serde_json::to_value(&product).unwrap();
        assert!(json["image"].is_null());
    }

    #[test]
    fn test_decode_image() {
        assert_eq!(decode_image("cGluaw=="), Some(b"pink".to_vec()));
        assert_eq!(decode_image("not base64!"), None);
        assert_eq!(decode_image(""), None);
    }

    #[test]
    fn test_agenda_kind_parse() {
        assert_eq!(AgendaKind::parse("Decision"), Some(AgendaKind::Decision));
        assert_eq!(AgendaKind::parse("información"), Some(AgendaKind::Information));
        assert_eq!(AgendaKind::parse("DISCUSSION"), Some(AgendaKind::Discussion));
        assert_eq!(AgendaKind::parse("brainstorm"), None);
    }

    #[test]
    fn test_agenda_kind_serialization() {
        let json = serde_json::to_string(&AgendaKind::Decision).unwrap();
        assert_eq!(json, "\"decision\"");
    }

    #[test]
    fn test_sequence_start() {
        assert_eq!(sequence_start(Some(at(9, 15)), at(11, 0), true), at(9, 15));
        assert_eq!(sequence_start(Some(at(9, 15)), at(11, 0), false), at(11, 0));
        assert_eq!(sequence_start(None, at(11, 0), true), at(11, 0));
    }

    #[test]
    fn test_agenda_draft_auto_chain() {
        let config = StoreConfig::default();
        let first = AgendaItem::from_draft(
            1,
            AgendaDraft {
                start_time: NaiveTime::from_hms_opt(8, 45, 0),
                minutes: Some(30),
                ..AgendaDraft::new(date())
            },
            None,
            &config,
        );
        assert_eq!(first.end, at(9, 15));

        let second = AgendaItem::from_draft(
            2,
            AgendaDraft {
                start_time: NaiveTime::from_hms_opt(14, 0, 0),
                minutes: Some(30),
                auto_chain: true,
                ..AgendaDraft::new(date())
            },
            Some(&first),
            &config,
        );
        assert_eq!(second.start, at(9, 15));
        assert_eq!(second.end, at(9, 45));
    }

    #[test]
    fn test_agenda_draft_defaults_and_clamp() {
        let config = StoreConfig::default();
        let item = AgendaItem::from_draft(
            1,
            AgendaDraft {
                minutes: Some(600),
                ..AgendaDraft::new(date())
            },
            None,
            &config,
        );

        assert_eq!(item.topic, "New topic");
        assert_eq!(item.kind, AgendaKind::Discussion);
        assert_eq!(item.start, at(9, 0));
        assert_eq!(item.minutes, 240);
        assert_eq!(item.end, at(13, 0));
    }

    #[test]
    fn test_agenda_fields() {
        let config = StoreConfig::default();
        let item = AgendaItem::from_draft(5, AgendaDraft::new(date()), None, &config);

        assert_eq!(item.field("start"), Some(FieldValue::Text("09:00".to_string())));
        assert_eq!(item.field("end"), Some(FieldValue::Text("09:15".to_string())));
        assert_eq!(item.field("date"), Some(FieldValue::Text("2026-10-16".to_string())));
        assert_eq!(item.field("kind"), Some(FieldValue::Text("Discussion".to_string())));
        assert_eq!(item.field("minutes"), Some(FieldValue::Int(15)));
    }

    #[test]
    fn test_meeting_defaults() {
        let meeting = Meeting::new(date());
        assert_eq!(meeting.title, "General meeting");
        assert_eq!(meeting.location, "Virtual");
        assert_eq!(meeting.timezone, "America/Lima");
    }
}
