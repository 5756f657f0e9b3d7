//! Pure validation functions for car input models.
//!
//! These functions are stateless and accumulate every violation instead of
//! short-circuiting. The current time is always supplied by the caller so
//! the registration-year window can be pinned in tests.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Utc};

use super::cars_constants::{MAX_ITEMS_PER_CAR, YEAR_WINDOW};
use super::cars_model::{CarDraft, CarUpdate, NewCar};

/// Validates a plate against the fixed positional grammar `ABC-1D23`:
/// three uppercase letters, a hyphen, a digit, one character in A-J or 0-9,
/// then two digits. Exactly eight characters; no normalization is applied,
/// so lowercase input fails.
pub fn is_valid_plate(plate: &str) -> bool {
    let bytes = plate.as_bytes();
    if bytes.len() != 8 {
        return false;
    }
    bytes[..3].iter().all(u8::is_ascii_uppercase)
        && bytes[3] == b'-'
        && bytes[4].is_ascii_digit()
        && (matches!(bytes[5], b'A'..=b'J') || bytes[5].is_ascii_digit())
        && bytes[6].is_ascii_digit()
        && bytes[7].is_ascii_digit()
}

/// Accepted registration years: a rolling window ending one year past the
/// current year.
fn year_bounds(now: DateTime<Utc>) -> (i32, i32) {
    let max_year = now.year() + 1;
    (max_year - YEAR_WINDOW, max_year)
}

/// Validates input for car creation.
///
/// Returns the concrete attributes when everything checks out, or every
/// violation found, in field order (brand, model, year, plate).
pub fn validate_new_car(
    new_car: &NewCar,
    now: DateTime<Utc>,
) -> std::result::Result<CarDraft, Vec<String>> {
    let mut errors = Vec::new();
    let (min_year, max_year) = year_bounds(now);

    if new_car
        .brand
        .as_deref()
        .is_none_or(|brand| brand.trim().is_empty())
    {
        errors.push("brand is required".to_string());
    }
    if new_car
        .model
        .as_deref()
        .is_none_or(|model| model.trim().is_empty())
    {
        errors.push("model is required".to_string());
    }
    match new_car.year {
        None => errors.push("year is required".to_string()),
        Some(year) if year < min_year || year > max_year => {
            errors.push(format!("year must be between {min_year} and {max_year}"));
        }
        Some(_) => {}
    }
    match new_car.plate.as_deref() {
        None | Some("") => errors.push("plate is required".to_string()),
        Some(plate) if !is_valid_plate(plate) => {
            errors.push("plate must be in the correct format ABC-1D23".to_string());
        }
        Some(_) => {}
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    match (
        new_car.brand.clone(),
        new_car.model.clone(),
        new_car.year,
        new_car.plate.clone(),
    ) {
        (Some(brand), Some(model), Some(year), Some(plate)) => Ok(CarDraft {
            brand,
            model,
            year,
            plate,
        }),
        // Unreachable once the checks above passed.
        _ => Err(vec!["invalid car payload".to_string()]),
    }
}

/// Validates a partial update. Only supplied fields are checked, except for
/// the cross-field rule: a car is conceptually a (brand, model) pair, so a
/// patch changing `brand` must carry `model` as well.
pub fn validate_car_update(update: &CarUpdate, now: DateTime<Utc>) -> Vec<String> {
    let mut errors = Vec::new();
    let (min_year, max_year) = year_bounds(now);

    if let Some(brand) = update.brand.as_deref() {
        if brand.trim().is_empty() {
            errors.push("brand is required".to_string());
        }
        if update.model.is_none() {
            errors.push("model is required when brand is provided".to_string());
        }
    }
    if let Some(model) = update.model.as_deref() {
        if model.trim().is_empty() {
            errors.push("model is required".to_string());
        }
    }
    if let Some(year) = update.year {
        if year < min_year || year > max_year {
            errors.push(format!("year must be between {min_year} and {max_year}"));
        }
    }
    match update.plate.as_deref() {
        Some("") => errors.push("plate is required".to_string()),
        Some(plate) if !is_valid_plate(plate) => {
            errors.push("plate must be in the correct format ABC-1D23".to_string());
        }
        _ => {}
    }

    errors
}

/// Validates a replacement item list: at most [`MAX_ITEMS_PER_CAR`] names,
/// each non-empty, pairwise distinct (case-sensitive exact match).
pub fn validate_item_names(names: &[String]) -> Vec<String> {
    let mut errors = Vec::new();

    if names.len() > MAX_ITEMS_PER_CAR {
        errors.push(format!(
            "items must contain at most {MAX_ITEMS_PER_CAR} elements"
        ));
    }
    if names.iter().any(|name| name.trim().is_empty()) {
        errors.push("items must not contain empty names".to_string());
    }
    let mut seen = HashSet::new();
    if names.iter().any(|name| !seen.insert(name.as_str())) {
        errors.push("items must not contain duplicate values".to_string());
    }

    errors
}
