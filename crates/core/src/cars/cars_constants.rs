//! Constants for the cars domain.

/// Maximum number of items a car may carry at any time.
pub const MAX_ITEMS_PER_CAR: usize = 5;

/// Width of the accepted registration-year window. The window ends one year
/// past the current year, so a car can be registered for the upcoming model
/// year.
pub const YEAR_WINDOW: i32 = 10;

/// Default page size for car listings.
pub const DEFAULT_PAGE_SIZE: i64 = 5;

/// Upper bound for the caller-supplied page size.
pub const MAX_PAGE_SIZE: i64 = 10;

/// Conflict message for duplicate plates, on both the pre-check and the
/// storage-constraint path.
pub const CAR_ALREADY_REGISTERED: &str = "car already registered";

/// Not-found message for car lookups by id.
pub const CAR_NOT_FOUND: &str = "car not found";
