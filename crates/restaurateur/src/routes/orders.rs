//! Order dispatch route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use star_burger_core::{Candidate, OrderId};

use crate::{
    db::{OrderRepository, RepositoryError},
    error::AppError,
    models::Order,
    services::{DispatchContext, OrderCandidates},
    state::AppState,
};

/// Order row as shown to restaurant managers.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub id: OrderId,
    pub status: &'static str,
    pub payment_type: &'static str,
    pub total_cost: Decimal,
    pub customer_name: String,
    pub phonenumber: String,
    pub address: String,
    pub comment: String,
    pub registered_at: DateTime<Utc>,
    pub candidates: Vec<Candidate>,
}

impl OrderView {
    fn new(order: &Order, candidates: OrderCandidates) -> Self {
        Self {
            id: order.id,
            status: order.status.label(),
            payment_type: order.payment_type.label(),
            total_cost: order.total_cost,
            customer_name: order.customer_name(),
            phonenumber: order.phonenumber.clone(),
            address: order.address.clone(),
            comment: order.comment.clone(),
            registered_at: order.registered_at,
            candidates: candidates.candidates,
        }
    }
}

/// Every unfinished order with its candidate restaurants.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<OrderView>>, AppError> {
    let orders = OrderRepository::new(state.pool()).list_unfinished().await?;
    let ctx = DispatchContext::load(state.pool()).await?;

    let assigned = state.assigner().assign_all(&orders, &ctx).await;

    Ok(Json(
        orders
            .iter()
            .zip(assigned)
            .map(|(order, candidates)| OrderView::new(order, candidates))
            .collect(),
    ))
}

/// Candidate restaurants for a single order.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OrderView>, AppError> {
    let order = OrderRepository::new(state.pool())
        .get_by_id(OrderId::new(id))
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("order {id}")),
            other => AppError::from(other),
        })?;
    let ctx = DispatchContext::load(state.pool()).await?;

    let candidates = state.assigner().assign_candidates(&order, &ctx).await;
    Ok(Json(OrderView::new(&order, candidates)))
}
