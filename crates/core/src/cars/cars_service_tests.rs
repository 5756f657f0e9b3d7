#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};

    use crate::cars::cars_model::{
        Car, CarDraft, CarFilters, CarItem, CarListQuery, CarUpdate, NewCar,
    };
    use crate::cars::cars_service::CarService;
    use crate::cars::cars_traits::{
        CarItemRepositoryTrait, CarRepositoryTrait, CarServiceTrait,
    };
    use crate::errors::{DatabaseError, Error, Result};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn created_at() -> chrono::NaiveDateTime {
        fixed_now().naive_utc()
    }

    // --- Mock CarRepository ---

    #[derive(Clone, Default)]
    struct MockCarRepository {
        cars: Arc<Mutex<Vec<Car>>>,
        next_id: Arc<Mutex<i32>>,
        // Simulates the storage-layer unique(plate) backstop firing on insert.
        unique_violation_on_create: Arc<Mutex<bool>>,
    }

    impl MockCarRepository {
        fn new() -> Self {
            Self::default()
        }

        fn seed(&self, brand: &str, model: &str, year: i32, plate: &str) -> Car {
            let mut cars = self.cars.lock().unwrap();
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let car = Car {
                id: *next_id,
                brand: brand.to_string(),
                model: model.to_string(),
                plate: plate.to_string(),
                year,
                created_at: created_at(),
            };
            cars.push(car.clone());
            car
        }

        fn fail_next_create_with_unique_violation(&self) {
            *self.unique_violation_on_create.lock().unwrap() = true;
        }

        fn all(&self) -> Vec<Car> {
            self.cars.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CarRepositoryTrait for MockCarRepository {
        fn get_by_id(&self, car_id: i32) -> Result<Option<Car>> {
            Ok(self
                .cars
                .lock()
                .unwrap()
                .iter()
                .find(|car| car.id == car_id)
                .cloned())
        }

        fn find_by_plate(&self, plate: &str, exclude_id: Option<i32>) -> Result<Option<Car>> {
            Ok(self
                .cars
                .lock()
                .unwrap()
                .iter()
                .find(|car| car.plate == plate && Some(car.id) != exclude_id)
                .cloned())
        }

        fn list(&self, filters: &CarFilters) -> Result<(i64, Vec<Car>)> {
            let cars = self.cars.lock().unwrap();
            let matching: Vec<Car> = cars
                .iter()
                .filter(|car| filters.year_min.is_none_or(|min| car.year >= min))
                .filter(|car| {
                    filters
                        .plate_suffix
                        .as_deref()
                        .is_none_or(|suffix| car.plate.ends_with(suffix))
                })
                .filter(|car| {
                    filters
                        .brand_contains
                        .as_deref()
                        .is_none_or(|needle| car.brand.contains(needle))
                })
                .cloned()
                .collect();
            let count = matching.len() as i64;
            let page = matching
                .into_iter()
                .skip(filters.offset() as usize)
                .take(filters.limit as usize)
                .collect();
            Ok((count, page))
        }

        async fn create(&self, draft: CarDraft) -> Result<Car> {
            if *self.unique_violation_on_create.lock().unwrap() {
                return Err(Error::Database(DatabaseError::UniqueViolation(
                    "UNIQUE constraint failed: cars.plate".to_string(),
                )));
            }
            Ok(self.seed(&draft.brand, &draft.model, draft.year, &draft.plate))
        }

        async fn update(&self, car: Car) -> Result<Car> {
            let mut cars = self.cars.lock().unwrap();
            let existing = cars
                .iter_mut()
                .find(|c| c.id == car.id)
                .ok_or_else(|| Error::Database(DatabaseError::NotFound(car.id.to_string())))?;
            existing.brand = car.brand;
            existing.model = car.model;
            existing.plate = car.plate;
            existing.year = car.year;
            Ok(existing.clone())
        }

        async fn delete(&self, car_id: i32) -> Result<usize> {
            let mut cars = self.cars.lock().unwrap();
            let before = cars.len();
            cars.retain(|car| car.id != car_id);
            Ok(before - cars.len())
        }
    }

    // --- Mock CarItemRepository ---

    #[derive(Clone, Default)]
    struct MockCarItemRepository {
        items: Arc<Mutex<Vec<CarItem>>>,
        next_id: Arc<Mutex<i32>>,
    }

    impl MockCarItemRepository {
        fn new() -> Self {
            Self::default()
        }

        fn seed(&self, car_id: i32, name: &str) {
            let mut items = self.items.lock().unwrap();
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            items.push(CarItem {
                id: *next_id,
                name: name.to_string(),
                car_id,
                created_at: created_at(),
            });
        }

        fn names_for(&self, car_id: i32) -> Vec<String> {
            self.items
                .lock()
                .unwrap()
                .iter()
                .filter(|item| item.car_id == car_id)
                .map(|item| item.name.clone())
                .collect()
        }
    }

    #[async_trait]
    impl CarItemRepositoryTrait for MockCarItemRepository {
        fn list_for_car(&self, car_id: i32) -> Result<Vec<CarItem>> {
            Ok(self
                .items
                .lock()
                .unwrap()
                .iter()
                .filter(|item| item.car_id == car_id)
                .cloned()
                .collect())
        }

        async fn replace_for_car(&self, car_id: i32, names: Vec<String>) -> Result<usize> {
            let inserted = names.len();
            let mut items = self.items.lock().unwrap();
            items.retain(|item| item.car_id != car_id);
            let mut next_id = self.next_id.lock().unwrap();
            for name in names {
                *next_id += 1;
                items.push(CarItem {
                    id: *next_id,
                    name,
                    car_id,
                    created_at: created_at(),
                });
            }
            Ok(inserted)
        }
    }

    // --- Helpers ---

    fn service(
        car_repo: &MockCarRepository,
        item_repo: &MockCarItemRepository,
    ) -> CarService {
        CarService::new(Arc::new(car_repo.clone()), Arc::new(item_repo.clone()))
            .with_clock(Arc::new(fixed_now))
    }

    fn new_car(brand: &str, model: &str, year: i32, plate: &str) -> NewCar {
        NewCar {
            brand: Some(brand.to_string()),
            model: Some(model.to_string()),
            year: Some(year),
            plate: Some(plate.to_string()),
        }
    }

    fn assert_validation(result: Result<impl std::fmt::Debug>, expected: &[&str]) {
        match result {
            Err(Error::Validation(errors)) => assert_eq!(errors, expected),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    // ==================== create_car ====================

    #[tokio::test]
    async fn test_create_valid_car_returns_persisted_record() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        let service = service(&car_repo, &item_repo);

        let car = service
            .create_car(new_car("Fiat", "Uno", 2020, "ABC-1D23"))
            .await
            .expect("create should succeed");

        assert_eq!(car.id, 1);
        assert_eq!(car.brand, "Fiat");
        assert_eq!(car_repo.all().len(), 1);
    }

    #[tokio::test]
    async fn test_create_with_empty_input_returns_all_errors() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        let service = service(&car_repo, &item_repo);

        assert_validation(
            service.create_car(NewCar::default()).await,
            &[
                "brand is required",
                "model is required",
                "year is required",
                "plate is required",
            ],
        );
        assert!(car_repo.all().is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_plate_returns_conflict_and_keeps_one_row() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        let service = service(&car_repo, &item_repo);

        service
            .create_car(new_car("Fiat", "Uno", 2020, "ABC-1D23"))
            .await
            .expect("first create should succeed");
        let second = service
            .create_car(new_car("Ford", "Ka", 2021, "ABC-1D23"))
            .await;

        match second {
            Err(Error::Conflict(message)) => assert_eq!(message, "car already registered"),
            other => panic!("expected conflict, got {other:?}"),
        }
        let with_plate: Vec<Car> = car_repo
            .all()
            .into_iter()
            .filter(|car| car.plate == "ABC-1D23")
            .collect();
        assert_eq!(with_plate.len(), 1);
    }

    #[tokio::test]
    async fn test_create_maps_storage_unique_violation_to_conflict() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        let service = service(&car_repo, &item_repo);

        // The pre-check passes (no row visible) but the insert hits the
        // storage constraint, as with two interleaved writers.
        car_repo.fail_next_create_with_unique_violation();
        let result = service.create_car(new_car("Fiat", "Uno", 2020, "ABC-1D23")).await;

        match result {
            Err(Error::Conflict(message)) => assert_eq!(message, "car already registered"),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    // ==================== update_car ====================

    #[tokio::test]
    async fn test_update_missing_car_returns_not_found() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        let service = service(&car_repo, &item_repo);

        let result = service.update_car(42, CarUpdate::default()).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_brand_without_model_returns_cross_field_error() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        let car = car_repo.seed("Fiat", "Uno", 2020, "ABC-1D23");
        let service = service(&car_repo, &item_repo);

        let update = CarUpdate {
            brand: Some("Ford".to_string()),
            ..Default::default()
        };
        assert_validation(
            service.update_car(car.id, update).await,
            &["model is required when brand is provided"],
        );
        assert_eq!(car_repo.all()[0].brand, "Fiat");
    }

    #[tokio::test]
    async fn test_update_with_taken_plate_returns_conflict() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        car_repo.seed("Fiat", "Uno", 2020, "ABC-1D23");
        let target = car_repo.seed("Ford", "Ka", 2021, "DEF-2023");
        let service = service(&car_repo, &item_repo);

        let update = CarUpdate {
            plate: Some("ABC-1D23".to_string()),
            ..Default::default()
        };
        let result = service.update_car(target.id, update).await;
        match result {
            Err(Error::Conflict(message)) => assert_eq!(message, "car already registered"),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_keeping_own_plate_is_not_a_conflict() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        let car = car_repo.seed("Fiat", "Uno", 2020, "ABC-1D23");
        let service = service(&car_repo, &item_repo);

        let update = CarUpdate {
            plate: Some("ABC-1D23".to_string()),
            ..Default::default()
        };
        service
            .update_car(car.id, update)
            .await
            .expect("re-submitting the current plate should succeed");
    }

    #[tokio::test]
    async fn test_update_with_taken_plate_and_invalid_field_returns_validation_errors() {
        // Pinned ordering: the conflict probe runs, but accumulated field
        // errors win when both are present.
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        car_repo.seed("Fiat", "Uno", 2020, "ABC-1D23");
        let target = car_repo.seed("Ford", "Ka", 2021, "DEF-2023");
        let service = service(&car_repo, &item_repo);

        let update = CarUpdate {
            year: Some(1990),
            plate: Some("ABC-1D23".to_string()),
            ..Default::default()
        };
        assert_validation(
            service.update_car(target.id, update).await,
            &["year must be between 2016 and 2026"],
        );
    }

    #[tokio::test]
    async fn test_empty_update_leaves_car_unchanged() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        let car = car_repo.seed("Fiat", "Uno", 2020, "ABC-1D23");
        let service = service(&car_repo, &item_repo);

        service
            .update_car(car.id, CarUpdate::default())
            .await
            .expect("empty patch should succeed");
        assert_eq!(car_repo.all(), vec![car]);
    }

    #[tokio::test]
    async fn test_update_applies_only_supplied_fields() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        let car = car_repo.seed("Fiat", "Uno", 2020, "ABC-1D23");
        let service = service(&car_repo, &item_repo);

        let update = CarUpdate {
            year: Some(2022),
            ..Default::default()
        };
        service
            .update_car(car.id, update)
            .await
            .expect("patch should succeed");

        let updated = car_repo.all()[0].clone();
        assert_eq!(updated.year, 2022);
        assert_eq!(updated.brand, "Fiat");
        assert_eq!(updated.model, "Uno");
        assert_eq!(updated.plate, "ABC-1D23");
        assert_eq!(updated.created_at, car.created_at);
    }

    // ==================== delete_car ====================

    #[tokio::test]
    async fn test_delete_twice_returns_not_found_the_second_time() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        let car = car_repo.seed("Fiat", "Uno", 2020, "ABC-1D23");
        let service = service(&car_repo, &item_repo);

        service
            .delete_car(car.id)
            .await
            .expect("first delete should succeed");
        let second = service.delete_car(car.id).await;
        assert!(matches!(second, Err(Error::NotFound(_))));
    }

    // ==================== get_car_with_items ====================

    #[tokio::test]
    async fn test_get_car_with_no_items_returns_empty_list() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        let car = car_repo.seed("Fiat", "Uno", 2020, "ABC-1D23");
        let service = service(&car_repo, &item_repo);

        let detail = service
            .get_car_with_items(car.id)
            .expect("lookup should succeed");
        assert_eq!(detail.car, car);
        assert!(detail.items.is_empty());
    }

    #[tokio::test]
    async fn test_get_car_with_items_returns_names_in_storage_order() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        let car = car_repo.seed("Fiat", "Uno", 2020, "ABC-1D23");
        item_repo.seed(car.id, "radio");
        item_repo.seed(car.id, "alarm");
        let service = service(&car_repo, &item_repo);

        let detail = service
            .get_car_with_items(car.id)
            .expect("lookup should succeed");
        assert_eq!(detail.items, vec!["radio", "alarm"]);
    }

    #[tokio::test]
    async fn test_get_missing_car_returns_not_found() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        let service = service(&car_repo, &item_repo);

        assert!(matches!(
            service.get_car_with_items(7),
            Err(Error::NotFound(_))
        ));
    }

    // ==================== list_cars ====================

    #[tokio::test]
    async fn test_list_reports_count_and_ceiling_page_total() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        for i in 0..7 {
            car_repo.seed("Fiat", "Uno", 2020, &format!("ABC-1D2{i}"));
        }
        let service = service(&car_repo, &item_repo);

        let page = service
            .list_cars(&CarListQuery::default())
            .expect("list should succeed");
        assert_eq!(page.count, 7);
        assert_eq!(page.pages, 2);
        assert_eq!(page.data.len(), 5);
    }

    #[tokio::test]
    async fn test_list_second_page_holds_the_remainder() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        for i in 0..7 {
            car_repo.seed("Fiat", "Uno", 2020, &format!("ABC-1D2{i}"));
        }
        let service = service(&car_repo, &item_repo);

        let query = CarListQuery {
            page: Some("2".to_string()),
            ..Default::default()
        };
        let page = service.list_cars(&query).expect("list should succeed");
        assert_eq!(page.count, 7);
        assert_eq!(page.data.len(), 2);
    }

    #[tokio::test]
    async fn test_list_with_no_matches_has_zero_pages() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        let service = service(&car_repo, &item_repo);

        let page = service
            .list_cars(&CarListQuery::default())
            .expect("list should succeed");
        assert_eq!(page.count, 0);
        assert_eq!(page.pages, 0);
        assert!(page.data.is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_combine_with_and() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        car_repo.seed("Fiat", "Uno", 2018, "ABC-1D23");
        car_repo.seed("Fiat", "Argo", 2022, "DEF-2D23");
        car_repo.seed("Ford", "Ka", 2022, "GHI-3D23");
        let service = service(&car_repo, &item_repo);

        let query = CarListQuery {
            year: Some("2020".to_string()),
            brand: Some("Fi".to_string()),
            ..Default::default()
        };
        let page = service.list_cars(&query).expect("list should succeed");
        assert_eq!(page.count, 1);
        assert_eq!(page.data[0].plate, "DEF-2D23");
    }

    // ==================== replace_car_items ====================

    #[tokio::test]
    async fn test_replace_items_with_six_names_is_rejected() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        let car = car_repo.seed("Fiat", "Uno", 2020, "ABC-1D23");
        let service = service(&car_repo, &item_repo);

        let names: Vec<String> = (0..6).map(|i| format!("item-{i}")).collect();
        assert_validation(
            service.replace_car_items(car.id, names).await,
            &["items must contain at most 5 elements"],
        );
    }

    #[tokio::test]
    async fn test_replace_items_with_duplicates_is_rejected() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        let car = car_repo.seed("Fiat", "Uno", 2020, "ABC-1D23");
        item_repo.seed(car.id, "radio");
        let service = service(&car_repo, &item_repo);

        let names = vec!["alarm".to_string(), "alarm".to_string()];
        assert_validation(
            service.replace_car_items(car.id, names).await,
            &["items must not contain duplicate values"],
        );
        // The prior set is untouched on a rejected replacement.
        assert_eq!(item_repo.names_for(car.id), vec!["radio"]);
    }

    #[tokio::test]
    async fn test_replace_items_on_missing_car_returns_not_found() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        let service = service(&car_repo, &item_repo);

        let result = service
            .replace_car_items(9, vec!["radio".to_string()])
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_replace_items_supersedes_the_prior_set_exactly() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        let car = car_repo.seed("Fiat", "Uno", 2020, "ABC-1D23");
        item_repo.seed(car.id, "radio");
        item_repo.seed(car.id, "alarm");
        let service = service(&car_repo, &item_repo);

        let names: Vec<String> = (0..5).map(|i| format!("item-{i}")).collect();
        service
            .replace_car_items(car.id, names.clone())
            .await
            .expect("replacement should succeed");

        assert_eq!(item_repo.names_for(car.id), names);
    }

    #[tokio::test]
    async fn test_replace_items_with_empty_list_clears_the_set() {
        let car_repo = MockCarRepository::new();
        let item_repo = MockCarItemRepository::new();
        let car = car_repo.seed("Fiat", "Uno", 2020, "ABC-1D23");
        item_repo.seed(car.id, "radio");
        let service = service(&car_repo, &item_repo);

        service
            .replace_car_items(car.id, Vec::new())
            .await
            .expect("clearing should succeed");
        assert!(item_repo.names_for(car.id).is_empty());
    }
}
