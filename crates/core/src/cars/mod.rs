//! Cars module - domain models, services, and traits.

mod cars_constants;
mod cars_model;
mod cars_service;
mod cars_traits;
mod cars_validation;

mod cars_service_tests;

// Re-export the public interface
pub use cars_constants::*;
pub use cars_model::{
    Car, CarDraft, CarFilters, CarItem, CarListQuery, CarPage, CarUpdate, CarWithItems, NewCar,
};
pub use cars_service::CarService;
pub use cars_traits::{CarItemRepositoryTrait, CarRepositoryTrait, CarServiceTrait};
pub use cars_validation::{
    is_valid_plate, validate_car_update, validate_item_names, validate_new_car,
};
