//! Demo data for development stores

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use crate::error::AppResult;
use crate::repository::DynStore;
use crate::services::catalog::CreateProductInput;
use crate::services::order::{OrderLineInput, PlaceOrderInput};
use crate::services::shipment::CreateShipmentInput;
use crate::services::supplier::CreateSupplierInput;
use crate::services::{CatalogService, OrderService, ShipmentService, SupplierService};

struct DemoSupplier {
    name: &'static str,
    contact: &'static str,
    address: &'static str,
    email: &'static str,
}

const SUPPLIERS: [DemoSupplier; 3] = [
    DemoSupplier {
        name: "Tech Solutions Inc",
        contact: "+1-555-0123",
        address: "123 Tech Street, Silicon Valley, CA",
        email: "contact@techsolutions.com",
    },
    DemoSupplier {
        name: "Global Electronics",
        contact: "+1-555-0124",
        address: "456 Electronics Ave, New York, NY",
        email: "info@globalelectronics.com",
    },
    DemoSupplier {
        name: "Smart Devices Co",
        contact: "+1-555-0125",
        address: "789 Smart Road, Boston, MA",
        email: "sales@smartdevices.com",
    },
];

struct DemoOrder {
    supplier: usize,
    status: &'static str,
    notes: &'static str,
    /// (product index, quantity)
    lines: &'static [(usize, i32)],
    tracking_number: &'static str,
    shipment_status: &'static str,
    carrier: &'static str,
    shipment_notes: &'static str,
    eta_days: i64,
}

/// (name, description, stock, price in cents, min stock level)
const PRODUCTS: [(&str, &str, i32, i64, i32); 3] = [
    ("Laptop Pro X1", "High-performance laptop with 16GB RAM", 50, 99999, 10),
    ("Smartphone Y2", "Latest smartphone with 5G capability", 100, 69999, 20),
    ("Tablet Z3", "10-inch tablet with stylus support", 75, 49999, 15),
];

/// Populate an empty catalog with demo suppliers, products, orders and shipments
///
/// Orders go through `OrderService` so their totals follow the pricing rules.
/// Returns false when the catalog already has products.
pub async fn seed_demo_data(store: DynStore) -> AppResult<bool> {
    if !store.list_products().await?.is_empty() {
        tracing::debug!("catalog not empty, skipping demo data");
        return Ok(false);
    }

    let suppliers = SupplierService::new(store.clone());
    let catalog = CatalogService::new(store.clone());
    let orders = OrderService::new(store.clone());
    let shipments = ShipmentService::new(store);

    let mut supplier_ids = Vec::with_capacity(SUPPLIERS.len());
    for demo in &SUPPLIERS {
        let supplier = suppliers
            .create_supplier(CreateSupplierInput {
                name: demo.name.to_string(),
                contact: demo.contact.to_string(),
                address: demo.address.to_string(),
                email: demo.email.to_string(),
                status: None,
            })
            .await?;
        supplier_ids.push(supplier.id);
    }

    let mut product_ids = Vec::with_capacity(PRODUCTS.len());
    for ((name, description, stock, cents, min_stock_level), supplier_id) in
        PRODUCTS.iter().zip(&supplier_ids)
    {
        let product = catalog
            .create_product(CreateProductInput {
                name: name.to_string(),
                description: Some(description.to_string()),
                category: "Electronics".to_string(),
                price: Decimal::new(*cents, 2),
                stock: *stock,
                min_stock_level: Some(*min_stock_level),
                supplier_id: *supplier_id,
            })
            .await?;
        product_ids.push(product.id);
    }

    let demo_orders = [
        DemoOrder {
            supplier: 0,
            status: "Processing",
            notes: "Urgent order for weekend delivery",
            lines: &[(0, 1), (1, 1)],
            tracking_number: "TRK123456",
            shipment_status: "In Transit",
            carrier: "FedEx",
            shipment_notes: "Express shipping",
            eta_days: 7,
        },
        DemoOrder {
            supplier: 1,
            status: "Pending",
            notes: "Regular monthly order",
            lines: &[(2, 2)],
            tracking_number: "TRK789012",
            shipment_status: "Preparing",
            carrier: "UPS",
            shipment_notes: "Standard shipping",
            eta_days: 14,
        },
    ];

    for demo in &demo_orders {
        let placed = orders
            .place_order(PlaceOrderInput {
                supplier_id: Some(supplier_ids[demo.supplier]),
                status: Some(demo.status.to_string()),
                notes: Some(demo.notes.to_string()),
                items: demo
                    .lines
                    .iter()
                    .map(|&(product, quantity)| OrderLineInput {
                        product_id: product_ids[product],
                        quantity,
                    })
                    .collect(),
                ..Default::default()
            })
            .await?;

        shipments
            .create_shipment(CreateShipmentInput {
                order_id: placed.order.id,
                tracking_number: demo.tracking_number.to_string(),
                carrier: demo.carrier.to_string(),
                status: Some(demo.shipment_status.to_string()),
                estimated_delivery_date: Some(Utc::now() + Duration::days(demo.eta_days)),
                notes: Some(demo.shipment_notes.to_string()),
            })
            .await?;
    }

    tracing::info!(
        suppliers = supplier_ids.len(),
        products = product_ids.len(),
        orders = demo_orders.len(),
        "demo data seeded"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::Arc;

    use super::*;
    use crate::repository::MemoryStore;

    #[tokio::test]
    async fn test_seed_populates_once() {
        let store: DynStore = Arc::new(MemoryStore::new());

        assert!(seed_demo_data(store.clone()).await.unwrap());
        assert!(!seed_demo_data(store.clone()).await.unwrap());

        assert_eq!(store.list_products().await.unwrap().len(), 3);
        assert_eq!(store.list_shipments().await.unwrap().len(), 2);

        let mut totals: Vec<Decimal> = store
            .list_orders()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.total_amount)
            .collect();
        totals.sort();
        assert_eq!(
            totals,
            vec![
                Decimal::from_str("999.98").unwrap(),
                Decimal::from_str("1699.98").unwrap()
            ]
        );
    }
}
