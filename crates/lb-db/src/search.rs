//! Filtered property search.
//!
//! [`SearchStatement::build`] turns a [`SearchOptions`] bag and a row limit
//! into one parameterized statement over properties joined to their
//! reviews. Filters are collected as `(clause, value)` pairs first and
//! numbered in a single rendering pass, so placeholder `?N` always refers to
//! `params[N - 1]` however many filters are present.
//!
//! # Owner precedence
//!
//! When `owner_id` is set the search lists that owner's properties and
//! nothing else: city, price and rating filters in the same options are
//! ignored. See [`PropertyFilter::Owner`].

use lb_core::{Cents, Error, Result, UserId};
use rusqlite::types::Value;
use serde::Deserialize;

use crate::models::PROPERTY_COLS;

/// Row cap applied when the caller does not supply one.
pub use lb_core::config::DEFAULT_SEARCH_LIMIT as DEFAULT_LIMIT;

/// Aggregate used both as the selected rating and in the HAVING filter.
const AVERAGE_RATING: &str = "avg(property_reviews.rating)";

/// Optional search filters. Every field is independent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Restrict to one owner's properties. Takes precedence over every
    /// other field.
    pub owner_id: Option<UserId>,
    /// Case-insensitive substring of the city name.
    pub city: Option<String>,
    /// Lower bound on nightly cost, in dollars. Rounded to the cent.
    pub minimum_price_per_night: Option<f64>,
    /// Upper bound on nightly cost, in dollars. Rounded to the cent.
    pub maximum_price_per_night: Option<f64>,
    /// Lower bound on the average review rating.
    pub minimum_rating: Option<f64>,
}

impl SearchOptions {
    /// Resolve the options into the filter that will actually be applied.
    pub fn filter(&self) -> PropertyFilter<'_> {
        if let Some(owner) = self.owner_id {
            return PropertyFilter::Owner(owner);
        }
        PropertyFilter::Listing {
            city: self.city.as_deref().filter(|c| !c.is_empty()),
            price: PriceRange::from_bounds(
                self.minimum_price_per_night,
                self.maximum_price_per_night,
            ),
            minimum_rating: self.minimum_rating,
        }
    }

    fn has_listing_filters(&self) -> bool {
        self.city.is_some()
            || self.minimum_price_per_night.is_some()
            || self.maximum_price_per_night.is_some()
            || self.minimum_rating.is_some()
    }
}

/// The filter a [`SearchOptions`] resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyFilter<'a> {
    /// Only properties owned by this user. City, price and rating options
    /// are ignored in this mode.
    Owner(UserId),
    /// Public listing search.
    Listing {
        city: Option<&'a str>,
        price: PriceRange,
        minimum_rating: Option<f64>,
    },
}

/// Nightly cost bounds, in dollars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceRange {
    Any,
    Between { min: f64, max: f64 },
    AtLeast(f64),
    AtMost(f64),
}

impl PriceRange {
    pub fn from_bounds(min: Option<f64>, max: Option<f64>) -> Self {
        match (min, max) {
            (Some(min), Some(max)) => PriceRange::Between { min, max },
            (Some(min), None) => PriceRange::AtLeast(min),
            (None, Some(max)) => PriceRange::AtMost(max),
            (None, None) => PriceRange::Any,
        }
    }
}

/// One SQL fragment with exactly one `?` and the value bound to it.
#[derive(Debug)]
struct Clause {
    template: &'static str,
    value: Value,
}

impl Clause {
    fn new(template: &'static str, value: Value) -> Self {
        debug_assert_eq!(template.matches('?').count(), 1);
        Self { template, value }
    }

    fn cents(template: &'static str, dollars: f64) -> Result<Self> {
        Ok(Self::new(
            template,
            Value::Integer(Cents::from_dollars(dollars)?.get()),
        ))
    }

    /// Append the value and number the placeholder after its position.
    fn bind(self, params: &mut Vec<Value>) -> String {
        params.push(self.value);
        self.template
            .replacen('?', &format!("?{}", params.len()), 1)
    }
}

fn bind_all(clauses: Vec<Clause>, params: &mut Vec<Value>) -> String {
    clauses
        .into_iter()
        .map(|c| c.bind(params))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// A rendered search statement and its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl SearchStatement {
    /// Build the statement for `options`, capped at `limit` rows.
    pub fn build(options: &SearchOptions, limit: u32) -> Result<Self> {
        if limit == 0 {
            return Err(Error::Validation("search limit must be positive".into()));
        }

        let mut predicates = Vec::new();
        let mut having = Vec::new();

        match options.filter() {
            PropertyFilter::Owner(owner) => {
                if options.has_listing_filters() {
                    tracing::debug!(
                        owner_id = %owner,
                        "Owner filter set; ignoring city, price and rating filters"
                    );
                }
                predicates.push(Clause::new(
                    "properties.owner_id = ?",
                    Value::Integer(owner.get()),
                ));
            }
            PropertyFilter::Listing {
                city,
                price,
                minimum_rating,
            } => {
                if let Some(city) = city {
                    predicates.push(Clause::new(
                        "unicode_lower(properties.city) LIKE unicode_lower(?)",
                        Value::Text(format!("%{city}%")),
                    ));
                }

                match price {
                    PriceRange::Between { min, max } => {
                        predicates.push(Clause::cents("properties.cost_per_night >= ?", min)?);
                        predicates.push(Clause::cents("properties.cost_per_night <= ?", max)?);
                    }
                    PriceRange::AtLeast(min) => {
                        predicates.push(Clause::cents("properties.cost_per_night >= ?", min)?);
                    }
                    PriceRange::AtMost(max) => {
                        predicates.push(Clause::cents("properties.cost_per_night <= ?", max)?);
                    }
                    PriceRange::Any => {}
                }

                if let Some(rating) = minimum_rating {
                    having.push(Clause::new(
                        "avg(property_reviews.rating) >= ?",
                        Value::Real(rating),
                    ));
                }
            }
        }

        let mut params = Vec::with_capacity(predicates.len() + having.len() + 1);
        let mut sql = format!(
            "SELECT {PROPERTY_COLS}, {AVERAGE_RATING} AS average_rating
FROM properties
JOIN property_reviews ON properties.id = property_reviews.property_id"
        );

        if !predicates.is_empty() {
            sql.push_str("\nWHERE ");
            sql.push_str(&bind_all(predicates, &mut params));
        }

        sql.push_str("\nGROUP BY properties.id");

        if !having.is_empty() {
            sql.push_str("\nHAVING ");
            sql.push_str(&bind_all(having, &mut params));
        }

        sql.push_str("\nORDER BY properties.cost_per_night ASC\n");
        sql.push_str(&Clause::new("LIMIT ?", Value::Integer(i64::from(limit))).bind(&mut params));

        Ok(Self { sql, params })
    }
}
