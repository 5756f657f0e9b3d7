use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use log::debug;

use carhub_core::cars::{
    Car, CarDraft, CarFilters, CarItem, CarItemRepositoryTrait, CarRepositoryTrait,
};
use carhub_core::Result;

use super::model::{CarDB, CarItemDB, NewCarDB, NewCarItemDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{cars, cars_items};

/// Repository for managing car rows in the database
pub struct CarRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CarRepository {
    /// Creates a new CarRepository instance
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Base listing query with all content filters applied. Built twice per
    /// listing: once for the total count, once for the page itself.
    fn filtered(filters: &CarFilters) -> cars::BoxedQuery<'static, diesel::sqlite::Sqlite> {
        let mut query = cars::table.into_boxed();

        if let Some(year_min) = filters.year_min {
            query = query.filter(cars::year.ge(year_min));
        }
        if let Some(ref suffix) = filters.plate_suffix {
            query = query.filter(cars::plate.like(format!("%{suffix}")));
        }
        if let Some(ref needle) = filters.brand_contains {
            query = query.filter(cars::brand.like(format!("%{needle}%")));
        }

        query
    }
}

#[async_trait]
impl CarRepositoryTrait for CarRepository {
    fn get_by_id(&self, car_id: i32) -> Result<Option<Car>> {
        let mut conn = get_connection(&self.pool)?;

        let car = cars::table
            .find(car_id)
            .select(CarDB::as_select())
            .first::<CarDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        Ok(car.map(Car::from))
    }

    fn find_by_plate(&self, plate: &str, exclude_id: Option<i32>) -> Result<Option<Car>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = cars::table.filter(cars::plate.eq(plate)).into_boxed();
        if let Some(excluded) = exclude_id {
            query = query.filter(cars::id.ne(excluded));
        }

        let car = query
            .select(CarDB::as_select())
            .first::<CarDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        Ok(car.map(Car::from))
    }

    fn list(&self, filters: &CarFilters) -> Result<(i64, Vec<Car>)> {
        let mut conn = get_connection(&self.pool)?;

        let count = Self::filtered(filters)
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;

        let rows = Self::filtered(filters)
            .select(CarDB::as_select())
            .order(cars::id.asc())
            .offset(filters.offset())
            .limit(filters.limit)
            .load::<CarDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok((count, rows.into_iter().map(Car::from).collect()))
    }

    async fn create(&self, draft: CarDraft) -> Result<Car> {
        debug!("Inserting car with plate {}", draft.plate);
        self.writer
            .exec(move |conn| {
                let new_car: NewCarDB = draft.into();
                let row = diesel::insert_into(cars::table)
                    .values(&new_car)
                    .returning(CarDB::as_returning())
                    .get_result::<CarDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Car::from(row))
            })
            .await
    }

    async fn update(&self, car: Car) -> Result<Car> {
        self.writer
            .exec(move |conn| {
                // `id` and `created_at` are deliberately not in the change set.
                let row = diesel::update(cars::table.find(car.id))
                    .set((
                        cars::brand.eq(car.brand),
                        cars::model.eq(car.model),
                        cars::plate.eq(car.plate),
                        cars::year.eq(car.year),
                    ))
                    .returning(CarDB::as_returning())
                    .get_result::<CarDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Car::from(row))
            })
            .await
    }

    async fn delete(&self, car_id: i32) -> Result<usize> {
        self.writer
            .exec(move |conn| {
                let affected = diesel::delete(cars::table.find(car_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(affected)
            })
            .await
    }
}

/// Repository for car items. The only write is the atomic full-set
/// replacement; items are never mutated individually.
pub struct CarItemRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CarItemRepository {
    /// Creates a new CarItemRepository instance
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CarItemRepositoryTrait for CarItemRepository {
    fn list_for_car(&self, car_id: i32) -> Result<Vec<CarItem>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = cars_items::table
            .filter(cars_items::car_id.eq(car_id))
            .select(CarItemDB::as_select())
            .order(cars_items::id.asc())
            .load::<CarItemDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(CarItem::from).collect())
    }

    async fn replace_for_car(&self, car_id: i32, names: Vec<String>) -> Result<usize> {
        debug!("Replacing item set of car {car_id}");
        // The writer runs this closure inside one immediate transaction, so
        // the delete and the inserts commit or roll back together.
        self.writer
            .exec(move |conn| {
                diesel::delete(cars_items::table.filter(cars_items::car_id.eq(car_id)))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let now = chrono::Utc::now().naive_utc();
                let new_items: Vec<NewCarItemDB> = names
                    .into_iter()
                    .map(|name| NewCarItemDB {
                        name,
                        car_id,
                        created_at: now,
                    })
                    .collect();

                let inserted = diesel::insert_into(cars_items::table)
                    .values(&new_items)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(inserted)
            })
            .await
    }
}
