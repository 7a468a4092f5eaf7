// Query filtering for generic records

use std::collections::BTreeSet;

use crate::record::{FieldValue, Record};

/// Constraint on a single named field
#[derive(Debug, Clone)]
pub struct Filter {
    /// Field name to filter on
    pub field: String,
    /// Comparison operator
    pub op: FilterOp,
}

/// Comparison operators for filtering
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    /// Field value (as displayed) is in the set; an empty set matches nothing
    OneOf(BTreeSet<String>),
    /// Numeric field <= bound
    AtMost(f64),
    /// Numeric field >= bound
    AtLeast(f64),
    /// Field equals value
    Eq(FieldValue),
}

impl Filter {
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        let Some(value) = record.field(&self.field) else {
            return false;
        };

        match &self.op {
            FilterOp::OneOf(allowed) => allowed.contains(&value.to_string()),
            FilterOp::AtMost(bound) => value.as_f64().is_some_and(|v| v <= *bound),
            FilterOp::AtLeast(bound) => value.as_f64().is_some_and(|v| v >= *bound),
            FilterOp::Eq(expected) => value == *expected,
        }
    }
}

impl std::fmt::Display for FilterOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterOp::OneOf(set) => {
                let items: Vec<&str> = set.iter().map(String::as_str).collect();
                write!(f, "IN ({})", items.join(", "))
            }
            FilterOp::AtMost(v) => write!(f, "<= {}", v),
            FilterOp::AtLeast(v) => write!(f, ">= {}", v),
            FilterOp::Eq(v) => write!(f, "= {}", v),
        }
    }
}

/// Case-insensitive substring search across several text fields
#[derive(Debug, Clone)]
pub struct TextSearch {
    needle: String,
    fields: Vec<String>,
}

impl TextSearch {
    pub fn new(needle: &str, fields: &[&str]) -> Self {
        Self {
            needle: needle.to_lowercase(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Matches if any of the fields contains the needle
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.fields.iter().any(|field| match record.field(field) {
            Some(FieldValue::Text(s)) => s.to_lowercase().contains(&self.needle),
            _ => false,
        })
    }
}

/// Conjunction of field filters plus an optional text search
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    pub filters: Vec<Filter>,
    pub search: Option<TextSearch>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn one_of<I, S>(mut self, field: &str, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.push(Filter {
            field: field.to_string(),
            op: FilterOp::OneOf(allowed.into_iter().map(Into::into).collect()),
        });
        self
    }

    pub fn at_most(mut self, field: &str, bound: f64) -> Self {
        self.filters.push(Filter {
            field: field.to_string(),
            op: FilterOp::AtMost(bound),
        });
        self
    }

    pub fn at_least(mut self, field: &str, bound: f64) -> Self {
        self.filters.push(Filter {
            field: field.to_string(),
            op: FilterOp::AtLeast(bound),
        });
        self
    }

    pub fn flag(mut self, field: &str, value: bool) -> Self {
        self.filters.push(Filter {
            field: field.to_string(),
            op: FilterOp::Eq(FieldValue::Bool(value)),
        });
        self
    }

    /// Search the record type's default search fields; a blank query is ignored
    pub fn search<R: Record>(self, query: &str) -> Self {
        self.search_in(query, R::search_fields())
    }

    pub fn search_in(mut self, query: &str, fields: &[&str]) -> Self {
        let query = query.trim();
        self.search = if query.is_empty() {
            None
        } else {
            Some(TextSearch::new(query, fields))
        };
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.search.is_none()
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.filters.iter().all(|f| f.matches(record)) && self.search.as_ref().is_none_or(|s| s.matches(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::models::{Product, ProductDraft};

    fn product(name: &str, brand: &str, shade: &str, price: f64, vegan: bool) -> Product {
        let draft = ProductDraft {
            name: Some(name.to_string()),
            brand: Some(brand.to_string()),
            shade: Some(shade.to_string()),
            price: Some(price),
            vegan: Some(vegan),
            ..Default::default()
        };
        Product::from_draft(1, draft, None, &StoreConfig::default())
    }

    #[test]
    fn test_one_of() {
        let p = product("Butter Gloss", "NYX", "Crème Brulee", 39.0, false);
        assert!(FilterSet::new().one_of("brand", ["NYX", "MAC"]).matches(&p));
        assert!(!FilterSet::new().one_of("brand", ["MAC"]).matches(&p));
    }

    #[test]
    fn test_empty_one_of_matches_nothing() {
        let p = product("Butter Gloss", "NYX", "Crème Brulee", 39.0, false);
        let empty: [&str; 0] = [];
        assert!(!FilterSet::new().one_of("brand", empty).matches(&p));
    }

    #[test]
    fn test_price_bound_inclusive() {
        let p = product("Butter Gloss", "NYX", "Crème Brulee", 39.0, false);
        assert!(FilterSet::new().at_most("price", 39.0).matches(&p));
        assert!(!FilterSet::new().at_most("price", 38.99).matches(&p));
        assert!(FilterSet::new().at_least("price", 39.0).matches(&p));
    }

    #[test]
    fn test_flag() {
        let p = product("Liquid Blush", "Rare Beauty", "Happy", 115.0, true);
        assert!(FilterSet::new().flag("vegan", true).matches(&p));
        assert!(!FilterSet::new().flag("vegan", false).matches(&p));
    }

    #[test]
    fn test_search_is_or_across_fields() {
        let p = product("Liquid Blush", "Rare Beauty", "Happy", 115.0, true);
        assert!(FilterSet::new().search::<Product>("rare").matches(&p));
        assert!(FilterSet::new().search::<Product>("HAPPY").matches(&p));
        assert!(FilterSet::new().search::<Product>("liquid").matches(&p));
        assert!(!FilterSet::new().search::<Product>("gloss").matches(&p));
    }

    #[test]
    fn test_search_ignores_description() {
        let p = product("Liquid Blush", "Rare Beauty", "Happy", 115.0, true);
        assert!(!FilterSet::new().search::<Product>("short product").matches(&p));
    }

    #[test]
    fn test_blank_search_ignored() {
        let set = FilterSet::new().search::<Product>("   ");
        assert!(set.is_empty());
    }

    #[test]
    fn test_conjunction() {
        let p = product("Liquid Blush", "Rare Beauty", "Happy", 115.0, true);
        let set = FilterSet::new()
            .one_of("brand", ["Rare Beauty"])
            .at_most("price", 100.0)
            .search::<Product>("blush");
        assert!(!set.matches(&p));
    }

    #[test]
    fn test_unknown_field_fails() {
        let p = product("Liquid Blush", "Rare Beauty", "Happy", 115.0, true);
        assert!(!FilterSet::new().at_most("weight", 10.0).matches(&p));
    }

    #[test]
    fn test_filter_op_display() {
        assert_eq!(FilterOp::AtMost(120.0).to_string(), "<= 120");
        assert_eq!(FilterOp::Eq(FieldValue::Bool(true)).to_string(), "= true");
        let set: BTreeSet<String> = ["MAC".to_string(), "NYX".to_string()].into();
        assert_eq!(FilterOp::OneOf(set).to_string(), "IN (MAC, NYX)");
    }
}
