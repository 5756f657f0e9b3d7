//! Diesel-backed repositories for cars and their items.

mod model;
mod repository;

pub use model::{CarDB, CarItemDB, NewCarDB, NewCarItemDB};
pub use repository::{CarItemRepository, CarRepository};
