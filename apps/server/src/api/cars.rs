use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use carhub_core::cars::{Car, CarListQuery, CarPage, CarUpdate, CarWithItems, NewCar};

use crate::{error::ApiResult, main_lib::AppState};

async fn create_car(
    State(state): State<Arc<AppState>>,
    Json(new_car): Json<NewCar>,
) -> ApiResult<(StatusCode, Json<Car>)> {
    let car = state.car_service.create_car(new_car).await?;
    Ok((StatusCode::CREATED, Json(car)))
}

async fn list_cars(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CarListQuery>,
) -> ApiResult<Json<CarPage>> {
    let page = state.car_service.list_cars(&query)?;
    Ok(Json(page))
}

async fn get_car(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CarWithItems>> {
    let detail = state.car_service.get_car_with_items(id)?;
    Ok(Json(detail))
}

async fn update_car(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<CarUpdate>,
) -> ApiResult<StatusCode> {
    state.car_service.update_car(id, update).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_car(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.car_service.delete_car(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn replace_car_items(
    Path(id): Path<i32>,
    State(state): State<Arc<AppState>>,
    Json(names): Json<Vec<String>>,
) -> ApiResult<StatusCode> {
    state.car_service.replace_car_items(id, names).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cars", get(list_cars).post(create_car))
        .route(
            "/cars/{id}",
            get(get_car).patch(update_car).delete(delete_car),
        )
        .route("/cars/{id}/items", put(replace_car_items))
}
