//! Shipment tracking service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::models::{Shipment, ShipmentStatus};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::repository::{DynStore, NewShipment};
use crate::services::{check_required, parse_field};

/// Shipment service for tracking order deliveries
#[derive(Clone)]
pub struct ShipmentService {
    store: DynStore,
}

/// Input for creating a shipment
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct CreateShipmentInput {
    #[serde(rename = "OrderID")]
    pub order_id: i32,
    #[validate(custom = "check_required")]
    pub tracking_number: String,
    #[validate(custom = "check_required")]
    pub carrier: String,
    pub status: Option<String>,
    pub estimated_delivery_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Body of the public status update: `{ "status": "..." }`
#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    #[serde(alias = "Status")]
    pub status: String,
}

/// Admin shipment update; absent fields keep their value
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateShipmentInput {
    #[validate(custom = "check_required")]
    pub tracking_number: Option<String>,
    #[validate(custom = "check_required")]
    pub carrier: Option<String>,
    #[serde(alias = "status")]
    pub status: Option<String>,
    pub estimated_delivery_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl ShipmentService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn list_shipments(&self) -> AppResult<Vec<Shipment>> {
        self.store.list_shipments().await
    }

    pub async fn get_shipment(&self, id: i32) -> AppResult<Shipment> {
        self.store
            .find_shipment(id)
            .await?
            .ok_or_else(|| AppError::not_found("Shipment", id))
    }

    pub async fn create_shipment(&self, input: CreateShipmentInput) -> AppResult<Shipment> {
        input.validate()?;
        let status = match input.status.as_deref() {
            Some(raw) => parse_field::<ShipmentStatus>("Status", raw)?,
            None => ShipmentStatus::default(),
        };

        if self.store.find_order(input.order_id).await?.is_none() {
            return Err(AppError::not_found("Order", input.order_id));
        }

        let shipment = NewShipment {
            order_id: input.order_id,
            tracking_number: input.tracking_number.trim().to_string(),
            status,
            carrier: input.carrier.trim().to_string(),
            estimated_delivery_date: input.estimated_delivery_date,
            actual_delivery_date: status.stamps_delivery().then(Utc::now),
            notes: input.notes,
        };

        let created = self.store.insert_shipment(shipment).await?;
        tracing::info!(
            shipment_id = created.id,
            order_id = created.order_id,
            tracking = %created.tracking_number,
            "shipment created"
        );
        Ok(created)
    }

    /// Move a shipment to a new status
    ///
    /// `Delivered` stamps the actual delivery date in the same write. No
    /// transition order is enforced.
    pub async fn update_status(&self, id: i32, status: &str) -> AppResult<Shipment> {
        let status = parse_field::<ShipmentStatus>("status", status)?;
        let mut shipment = self.get_shipment(id).await?;
        let previous = shipment.status;

        shipment.apply_status(status, Utc::now());
        let saved = self.save(shipment).await?;

        tracing::info!(shipment_id = id, from = %previous, to = %saved.status, "shipment status changed");
        Ok(saved)
    }

    pub async fn update_shipment(&self, id: i32, input: UpdateShipmentInput) -> AppResult<Shipment> {
        input.validate()?;
        let status = input
            .status
            .as_deref()
            .map(|raw| parse_field::<ShipmentStatus>("Status", raw))
            .transpose()?;

        let mut shipment = self.get_shipment(id).await?;
        if let Some(tracking_number) = input.tracking_number {
            shipment.tracking_number = tracking_number.trim().to_string();
        }
        if let Some(carrier) = input.carrier {
            shipment.carrier = carrier.trim().to_string();
        }
        if input.estimated_delivery_date.is_some() {
            shipment.estimated_delivery_date = input.estimated_delivery_date;
        }
        if input.notes.is_some() {
            shipment.notes = input.notes;
        }
        if let Some(status) = status {
            shipment.apply_status(status, Utc::now());
        }

        self.save(shipment).await
    }

    pub async fn delete_shipment(&self, id: i32) -> AppResult<()> {
        if !self.store.delete_shipment(id).await? {
            return Err(AppError::not_found("Shipment", id));
        }
        tracing::info!(shipment_id = id, "shipment deleted");
        Ok(())
    }

    async fn save(&self, shipment: Shipment) -> AppResult<Shipment> {
        let id = shipment.id;
        self.store
            .save_shipment(&shipment)
            .await?
            .ok_or_else(|| AppError::not_found("Shipment", id))
    }
}
