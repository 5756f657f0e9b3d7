//! Database models for cars and their items.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use carhub_core::cars::{Car, CarDraft, CarItem};

/// Database model for cars
#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::cars)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CarDB {
    pub id: i32,
    pub brand: String,
    pub model: String,
    pub plate: String,
    pub year: i32,
    pub created_at: NaiveDateTime,
}

/// Insertable row for a new car; `id` is assigned by SQLite.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::cars)]
pub struct NewCarDB {
    pub brand: String,
    pub model: String,
    pub plate: String,
    pub year: i32,
    pub created_at: NaiveDateTime,
}

/// Database model for car items
#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::cars_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CarItemDB {
    pub id: i32,
    pub name: String,
    pub car_id: i32,
    pub created_at: NaiveDateTime,
}

/// Insertable row for a new car item.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::cars_items)]
pub struct NewCarItemDB {
    pub name: String,
    pub car_id: i32,
    pub created_at: NaiveDateTime,
}

// Conversion implementations
impl From<CarDB> for Car {
    fn from(db: CarDB) -> Self {
        Self {
            id: db.id,
            brand: db.brand,
            model: db.model,
            plate: db.plate,
            year: db.year,
            created_at: db.created_at,
        }
    }
}

impl From<CarDraft> for NewCarDB {
    fn from(draft: CarDraft) -> Self {
        Self {
            brand: draft.brand,
            model: draft.model,
            plate: draft.plate,
            year: draft.year,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl From<CarItemDB> for CarItem {
    fn from(db: CarItemDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            car_id: db.car_id,
            created_at: db.created_at,
        }
    }
}
