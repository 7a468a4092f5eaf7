// Derived views over (filtered) record sequences

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{AgendaItem, Product};
use crate::record::Record;

/// Added to the range in min-max normalization so equal values yield 0
pub const NORMALIZE_EPSILON: f64 = 1e-9;

/// Catalog summary; derived values are `None` over an empty sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean_price: Option<f64>,
    pub mean_rating: Option<f64>,
    pub total_stock: Option<i64>,
}

impl Summary {
    pub fn of<'a, I>(products: I) -> Self
    where
        I: IntoIterator<Item = &'a Product>,
    {
        let mut count = 0usize;
        let mut price = 0.0;
        let mut rating = 0.0;
        let mut stock = 0i64;

        for p in products {
            count += 1;
            price += p.price;
            rating += p.rating;
            stock = stock.saturating_add(p.stock);
        }

        if count == 0 {
            return Summary {
                count,
                mean_price: None,
                mean_rating: None,
                total_stock: None,
            };
        }

        Summary {
            count,
            mean_price: Some(price / count as f64),
            mean_rating: Some(rating / count as f64),
            total_stock: Some(stock),
        }
    }
}

/// Agenda summary; bounds are `None` for an empty agenda
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgendaSummary {
    pub count: usize,
    pub total_minutes: u32,
    pub first_start: Option<NaiveDateTime>,
    pub last_end: Option<NaiveDateTime>,
}

impl AgendaSummary {
    pub fn of<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a AgendaItem>,
    {
        let mut summary = AgendaSummary {
            count: 0,
            total_minutes: 0,
            first_start: None,
            last_end: None,
        };

        for item in items {
            summary.count += 1;
            summary.total_minutes = summary.total_minutes.saturating_add(item.minutes);
            summary.first_start = Some(summary.first_start.map_or(item.start, |s| s.min(item.start)));
            summary.last_end = Some(summary.last_end.map_or(item.end, |e| e.max(item.end)));
        }

        summary
    }
}

/// Reduction applied per group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOp {
    Count,
    Mean,
}

/// Partition by `key` and reduce `value` per group
///
/// Records without the key field are skipped, as are records without a
/// numeric `value` when averaging. Groups with no members are absent.
pub fn group_aggregate<R: Record>(records: &[&R], key: &str, value: &str, op: GroupOp) -> BTreeMap<String, f64> {
    let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();

    for record in records {
        let Some(k) = record.field(key) else {
            continue;
        };
        let v = match op {
            GroupOp::Count => 0.0,
            GroupOp::Mean => match record.field(value).and_then(|v| v.as_f64()) {
                Some(v) => v,
                None => continue,
            },
        };
        let entry = groups.entry(k.to_string()).or_insert((0.0, 0));
        entry.0 += v;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(k, (sum, n))| {
            let reduced = match op {
                GroupOp::Count => n as f64,
                GroupOp::Mean => sum / n as f64,
            };
            (k, reduced)
        })
        .collect()
}

/// Per-record normalized values, keyed by field name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRow {
    pub id: u64,
    pub values: BTreeMap<String, f64>,
}

/// Min-max normalize each field across the sequence into [0, 1]
///
/// Non-numeric fields are left out of a record's row.
pub fn normalize<R: Record>(records: &[&R], fields: &[&str]) -> Vec<NormalizedRow> {
    let ranges: Vec<Option<(f64, f64)>> = fields
        .iter()
        .map(|field| {
            records
                .iter()
                .filter_map(|r| r.field(field).and_then(|v| v.as_f64()))
                .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                    Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                    None => Some((v, v)),
                })
        })
        .collect();

    records
        .iter()
        .map(|record| {
            let values = fields
                .iter()
                .zip(&ranges)
                .filter_map(|(field, range)| {
                    let (lo, hi) = (*range)?;
                    let v = record.field(field)?.as_f64()?;
                    Some((field.to_string(), (v - lo) / (hi - lo + NORMALIZE_EPSILON)))
                })
                .collect();
            NormalizedRow { id: record.id(), values }
        })
        .collect()
}
