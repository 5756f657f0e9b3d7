//! Car domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::cars_constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Domain model representing a car record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: i32,
    pub brand: String,
    pub model: String,
    pub plate: String,
    pub year: i32,
    pub created_at: NaiveDateTime,
}

/// Input model for creating a new car.
///
/// Every field is optional so that a missing value surfaces as an accumulated
/// validation message rather than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewCar {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub plate: Option<String>,
}

/// Fully validated car attributes, produced by
/// [`validate_new_car`](super::cars_validation::validate_new_car).
#[derive(Debug, Clone, PartialEq)]
pub struct CarDraft {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub plate: String,
}

/// Partial update for an existing car. Absent fields are left untouched;
/// `id` and `created_at` are never updatable.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CarUpdate {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub plate: Option<String>,
}

impl CarUpdate {
    /// True when the patch supplies no field at all.
    pub fn is_empty(&self) -> bool {
        self.brand.is_none() && self.model.is_none() && self.year.is_none() && self.plate.is_none()
    }
}

/// A named accessory attached to exactly one car.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarItem {
    pub id: i32,
    pub name: String,
    pub car_id: i32,
    pub created_at: NaiveDateTime,
}

/// Detail projection: the car plus the names of its items in storage order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarWithItems {
    #[serde(flatten)]
    pub car: Car,
    pub items: Vec<String>,
}

/// Raw list-query parameters as received from the caller.
///
/// Numeric parameters stay strings here: a malformed `page` or `limit` falls
/// back to its default instead of failing extraction.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CarListQuery {
    pub year: Option<String>,
    pub final_plate: Option<String>,
    pub brand: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Storage-agnostic filter and pagination descriptor for car listings.
///
/// All content filters AND-combine.
#[derive(Debug, Clone, PartialEq)]
pub struct CarFilters {
    /// Inclusive lower bound on `year`.
    pub year_min: Option<i32>,
    /// Suffix match on `plate`.
    pub plate_suffix: Option<String>,
    /// Case-sensitive substring match on `brand`.
    pub brand_contains: Option<String>,
    /// 1-based page number, at least 1.
    pub page: i64,
    /// Page size, within `[1, MAX_PAGE_SIZE]`.
    pub limit: i64,
}

impl CarFilters {
    /// Builds a filter descriptor from raw query parameters.
    ///
    /// Non-numeric `year` is ignored, non-numeric `page`/`limit` fall back to
    /// their defaults, `page` is clamped to at least 1 and `limit` to
    /// `[1, MAX_PAGE_SIZE]`.
    pub fn from_query(query: &CarListQuery) -> Self {
        let year_min = query
            .year
            .as_deref()
            .and_then(|year| year.trim().parse::<i32>().ok());
        let plate_suffix = query.final_plate.clone().filter(|s| !s.is_empty());
        let brand_contains = query.brand.clone().filter(|s| !s.is_empty());
        let page = query
            .page
            .as_deref()
            .and_then(|page| page.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .max(1);
        let limit = query
            .limit
            .as_deref()
            .and_then(|limit| limit.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        CarFilters {
            year_min,
            plate_suffix,
            brand_contains,
            page,
            limit,
        }
    }

    /// Row offset of the requested page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// One page of cars plus the pre-pagination total and total page count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarPage {
    pub count: i64,
    pub pages: i64,
    pub data: Vec<Car>,
}
