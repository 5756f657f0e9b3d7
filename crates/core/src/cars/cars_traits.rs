//! Car repository and service traits.
//!
//! These traits define the contract for car operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::cars_model::{
    Car, CarDraft, CarFilters, CarItem, CarListQuery, CarPage, CarUpdate, CarWithItems, NewCar,
};
use crate::errors::Result;

/// Trait defining the contract for Car repository operations.
#[async_trait]
pub trait CarRepositoryTrait: Send + Sync {
    /// Retrieves a car by its id, or `None` when absent.
    fn get_by_id(&self, car_id: i32) -> Result<Option<Car>>;

    /// Finds a car by its exact plate. When `exclude_id` is given, a match on
    /// that id is ignored (updates check against all *other* cars).
    fn find_by_plate(&self, plate: &str, exclude_id: Option<i32>) -> Result<Option<Car>>;

    /// Loads one page of cars matching `filters`, plus the pre-pagination
    /// total row count.
    fn list(&self, filters: &CarFilters) -> Result<(i64, Vec<Car>)>;

    /// Inserts a validated car and returns it with its generated id and
    /// creation timestamp.
    async fn create(&self, draft: CarDraft) -> Result<Car>;

    /// Persists new field values for an existing car. `id` and `created_at`
    /// are never touched.
    async fn update(&self, car: Car) -> Result<Car>;

    /// Deletes a car by id, returning the number of deleted rows. The car's
    /// items go with it.
    async fn delete(&self, car_id: i32) -> Result<usize>;
}

/// Trait defining the contract for CarItem repository operations.
///
/// Items are never mutated individually: the only write is a full-set
/// replacement, which implementations must perform atomically.
#[async_trait]
pub trait CarItemRepositoryTrait: Send + Sync {
    /// Lists the items attached to a car, in storage order.
    fn list_for_car(&self, car_id: i32) -> Result<Vec<CarItem>>;

    /// Replaces the full item set of a car as one atomic unit: all existing
    /// items are deleted and the given names inserted. Returns the number of
    /// inserted items.
    async fn replace_for_car(&self, car_id: i32, names: Vec<String>) -> Result<usize>;
}

/// Trait defining the contract for Car service operations.
///
/// The service layer owns all business-rule sequencing: validation,
/// duplicate-plate detection, and the mapping to structured errors.
#[async_trait]
pub trait CarServiceTrait: Send + Sync {
    /// Creates a new car after validating it and checking plate uniqueness.
    async fn create_car(&self, new_car: NewCar) -> Result<Car>;

    /// Applies a partial update to an existing car.
    async fn update_car(&self, car_id: i32, update: CarUpdate) -> Result<()>;

    /// Deletes a car by id.
    async fn delete_car(&self, car_id: i32) -> Result<()>;

    /// Retrieves a car together with its item names.
    fn get_car_with_items(&self, car_id: i32) -> Result<CarWithItems>;

    /// Lists cars matching the given query parameters, paginated.
    fn list_cars(&self, query: &CarListQuery) -> Result<CarPage>;

    /// Replaces a car's item set with the given names.
    async fn replace_car_items(&self, car_id: i32, names: Vec<String>) -> Result<()>;
}
