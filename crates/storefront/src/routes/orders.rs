//! Order read-back route.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Serialize;
use tracing::instrument;

use tamarind_core::Shopper;

use crate::db::{RepositoryError, addresses, orders};
use crate::error::AppError;
use crate::middleware::CurrentShopper;
use crate::routes::checkout::OrderBody;
use crate::state::AppState;

/// Successful order lookup envelope.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub success: bool,
    pub order: OrderBody,
}

/// `GET /api/orders/{order_number}` - one of the shopper's own orders.
///
/// Guest orders carry no owner reference, so guests (and users asking for
/// someone else's order) get the same 404 as a number that never existed.
#[instrument(skip_all, fields(order_number = %order_number))]
pub async fn show(
    State(state): State<AppState>,
    CurrentShopper(shopper): CurrentShopper,
    Path(order_number): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let Shopper::User(user_id) = shopper else {
        return Err(AppError::NotFound("order not found".to_owned()));
    };

    let mut conn = state.pool().acquire().await.map_err(RepositoryError::from)?;

    let (order, items) = orders::find_by_number_for_user(&mut conn, user_id, &order_number)
        .await?
        .ok_or_else(|| AppError::NotFound("order not found".to_owned()))?;

    let address = addresses::find(&mut conn, order.shipping_address_id).await?;

    Ok(Json(OrderResponse {
        success: true,
        order: OrderBody::new(&order, &items, address.as_ref()),
    }))
}
