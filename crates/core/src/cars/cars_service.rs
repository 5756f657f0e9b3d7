use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;

use super::cars_constants::{CAR_ALREADY_REGISTERED, CAR_NOT_FOUND};
use super::cars_model::{Car, CarFilters, CarListQuery, CarPage, CarUpdate, CarWithItems, NewCar};
use super::cars_traits::{CarItemRepositoryTrait, CarRepositoryTrait, CarServiceTrait};
use super::cars_validation::{validate_car_update, validate_item_names, validate_new_car};
use crate::errors::{DatabaseError, Error, Result};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Service implementing the car use cases on top of injected repositories.
pub struct CarService {
    car_repository: Arc<dyn CarRepositoryTrait>,
    item_repository: Arc<dyn CarItemRepositoryTrait>,
    clock: Clock,
}

impl CarService {
    /// Creates a new CarService instance.
    pub fn new(
        car_repository: Arc<dyn CarRepositoryTrait>,
        item_repository: Arc<dyn CarItemRepositoryTrait>,
    ) -> Self {
        Self {
            car_repository,
            item_repository,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replaces the wall clock used for the registration-year window. Tests
    /// pin a fixed instant here.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// A storage-level unique(plate) violation means two writers passed the
    /// pre-check with the same plate; the caller sees the same conflict
    /// either way.
    fn map_plate_conflict(error: Error) -> Error {
        match error {
            Error::Database(DatabaseError::UniqueViolation(_)) => {
                Error::Conflict(CAR_ALREADY_REGISTERED.to_string())
            }
            other => other,
        }
    }
}

#[async_trait]
impl CarServiceTrait for CarService {
    async fn create_car(&self, new_car: NewCar) -> Result<Car> {
        let draft = validate_new_car(&new_car, self.now()).map_err(Error::Validation)?;

        if self
            .car_repository
            .find_by_plate(&draft.plate, None)?
            .is_some()
        {
            return Err(Error::Conflict(CAR_ALREADY_REGISTERED.to_string()));
        }

        debug!("Creating car with plate {}", draft.plate);
        self.car_repository
            .create(draft)
            .await
            .map_err(Self::map_plate_conflict)
    }

    async fn update_car(&self, car_id: i32, update: CarUpdate) -> Result<()> {
        let mut car = self
            .car_repository
            .get_by_id(car_id)?
            .ok_or_else(|| Error::NotFound(CAR_NOT_FOUND.to_string()))?;

        let errors = validate_car_update(&update, self.now());

        // The uniqueness probe runs before the error list is finalized; when
        // both a conflict and field errors exist, the field errors win.
        let mut plate_taken = false;
        if let Some(plate) = update.plate.as_deref() {
            plate_taken = self
                .car_repository
                .find_by_plate(plate, Some(car_id))?
                .is_some();
        }
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }
        if plate_taken {
            return Err(Error::Conflict(CAR_ALREADY_REGISTERED.to_string()));
        }

        if update.is_empty() {
            // Nothing supplied; the car stays as it is.
            return Ok(());
        }

        if let Some(brand) = update.brand {
            car.brand = brand;
        }
        if let Some(model) = update.model {
            car.model = model;
        }
        if let Some(year) = update.year {
            car.year = year;
        }
        if let Some(plate) = update.plate {
            car.plate = plate;
        }

        debug!("Updating car {car_id}");
        self.car_repository
            .update(car)
            .await
            .map(|_| ())
            .map_err(Self::map_plate_conflict)
    }

    async fn delete_car(&self, car_id: i32) -> Result<()> {
        let affected = self.car_repository.delete(car_id).await?;
        if affected == 0 {
            return Err(Error::NotFound(CAR_NOT_FOUND.to_string()));
        }
        debug!("Deleted car {car_id}");
        Ok(())
    }

    fn get_car_with_items(&self, car_id: i32) -> Result<CarWithItems> {
        let car = self
            .car_repository
            .get_by_id(car_id)?
            .ok_or_else(|| Error::NotFound(CAR_NOT_FOUND.to_string()))?;
        let items = self
            .item_repository
            .list_for_car(car_id)?
            .into_iter()
            .map(|item| item.name)
            .collect();
        Ok(CarWithItems { car, items })
    }

    fn list_cars(&self, query: &CarListQuery) -> Result<CarPage> {
        let filters = CarFilters::from_query(query);
        let (count, data) = self.car_repository.list(&filters)?;
        let pages = if count == 0 {
            0
        } else {
            (count + filters.limit - 1) / filters.limit
        };
        Ok(CarPage { count, pages, data })
    }

    async fn replace_car_items(&self, car_id: i32, names: Vec<String>) -> Result<()> {
        let errors = validate_item_names(&names);
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }
        if self.car_repository.get_by_id(car_id)?.is_none() {
            return Err(Error::NotFound(CAR_NOT_FOUND.to_string()));
        }

        debug!("Replacing items of car {car_id}");
        self.item_repository
            .replace_for_car(car_id, names)
            .await
            .map(|_| ())
    }
}
