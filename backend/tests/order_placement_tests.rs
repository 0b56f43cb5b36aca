//! Order placement tests
//!
//! Property-based and unit tests for:
//! - Price snapshots and line totals
//! - Server-derived order totals
//! - All-or-nothing placement when a line is invalid

use std::str::FromStr;
use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;
use scm_backend::error::AppError;
use scm_backend::repository::{DynStore, MemoryStore};
use scm_backend::services::catalog::{CreateProductInput, UpdateProductInput};
use scm_backend::services::order::{OrderLineInput, PlaceOrderInput, UpdateOrderInput};
use scm_backend::services::supplier::CreateSupplierInput;
use scm_backend::services::{CatalogService, OrderService, SupplierService};
use shared::models::{OrderStatus, Product};

// ============================================================================
// Helpers
// ============================================================================

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn new_store() -> DynStore {
    Arc::new(MemoryStore::new())
}

async fn create_supplier(store: &DynStore) -> i32 {
    SupplierService::new(store.clone())
        .create_supplier(CreateSupplierInput {
            name: "Acme Parts".to_string(),
            contact: "+1-555-0100".to_string(),
            address: "1 Industrial Way".to_string(),
            email: "orders@acme.example".to_string(),
            status: None,
        })
        .await
        .unwrap()
        .id
}

async fn create_product(store: &DynStore, supplier_id: i32, name: &str, price: &str) -> Product {
    CatalogService::new(store.clone())
        .create_product(CreateProductInput {
            name: name.to_string(),
            description: None,
            category: "Parts".to_string(),
            price: dec(price),
            stock: 100,
            min_stock_level: None,
            supplier_id,
        })
        .await
        .unwrap()
}

fn order_for(supplier_id: i32, lines: &[(i32, i32)]) -> PlaceOrderInput {
    PlaceOrderInput {
        supplier_id: Some(supplier_id),
        items: lines
            .iter()
            .map(|&(product_id, quantity)| OrderLineInput {
                product_id,
                quantity,
            })
            .collect(),
        ..Default::default()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

mod unit_tests {
    use super::*;

    #[tokio::test]
    async fn test_widget_scenario() {
        let store = new_store();
        let supplier_id = create_supplier(&store).await;
        let widget = create_product(&store, supplier_id, "Widget", "10.00").await;

        let placed = OrderService::new(store.clone())
            .place_order(order_for(supplier_id, &[(widget.id, 3)]))
            .await
            .unwrap();

        assert_eq!(placed.items.len(), 1);
        let line = &placed.items[0];
        assert_eq!(line.unit_price, dec("10.00"));
        assert_eq!(line.total_price, dec("30.00"));
        assert_eq!(line.quantity, 3);
        assert_eq!(line.order_id, placed.order.id);
        assert_eq!(placed.order.total_amount, dec("30.00"));
        assert_eq!(placed.order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_n_lines_create_one_order_and_n_items() {
        let store = new_store();
        let supplier_id = create_supplier(&store).await;
        let a = create_product(&store, supplier_id, "Bolt", "0.25").await;
        let b = create_product(&store, supplier_id, "Nut", "0.10").await;
        let c = create_product(&store, supplier_id, "Gear", "12.49").await;

        let service = OrderService::new(store.clone());
        let placed = service
            .place_order(order_for(supplier_id, &[(a.id, 40), (b.id, 40), (c.id, 2)]))
            .await
            .unwrap();

        assert_eq!(service.list_orders().await.unwrap().len(), 1);
        let stored = service.get_order(placed.order.id).await.unwrap();
        assert_eq!(stored.items.len(), 3);
        for item in &stored.items {
            assert_eq!(item.total_price, item.unit_price * Decimal::from(item.quantity));
        }
        assert_eq!(stored.order.total_amount, dec("38.98"));
        assert_eq!(stored.items_total(), stored.order.total_amount);
    }

    #[tokio::test]
    async fn test_lines_keep_request_order() {
        let store = new_store();
        let supplier_id = create_supplier(&store).await;
        let a = create_product(&store, supplier_id, "A", "1.00").await;
        let b = create_product(&store, supplier_id, "B", "2.00").await;

        let placed = OrderService::new(store.clone())
            .place_order(order_for(supplier_id, &[(b.id, 1), (a.id, 1)]))
            .await
            .unwrap();

        let ids: Vec<i32> = placed.items.iter().map(|i| i.product_id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn test_unknown_product_fails_without_writes() {
        let store = new_store();
        let supplier_id = create_supplier(&store).await;

        let service = OrderService::new(store.clone());
        let err = service
            .place_order(order_for(supplier_id, &[(99999, 1)]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(ref what) if what == "Product 99999"));
        assert!(service.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_one_invalid_line_rejects_whole_order() {
        let store = new_store();
        let supplier_id = create_supplier(&store).await;
        let widget = create_product(&store, supplier_id, "Widget", "10.00").await;

        let service = OrderService::new(store.clone());
        let err = service
            .place_order(order_for(supplier_id, &[(widget.id, 2), (99999, 1)]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(service.list_orders().await.unwrap().is_empty());
        assert!(store.order_items(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_quantity_rejected() {
        let store = new_store();
        let supplier_id = create_supplier(&store).await;
        let widget = create_product(&store, supplier_id, "Widget", "10.00").await;
        let service = OrderService::new(store.clone());

        for quantity in [0, -1] {
            let err = service
                .place_order(order_for(supplier_id, &[(widget.id, quantity)]))
                .await
                .unwrap_err();
            assert!(
                matches!(err, AppError::Validation { ref field, .. } if field == "Quantity"),
                "quantity {} should be rejected",
                quantity
            );
        }
        assert!(service.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_items_rejected() {
        let store = new_store();
        let supplier_id = create_supplier(&store).await;

        let err = OrderService::new(store)
            .place_order(order_for(supplier_id, &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "items"));
    }

    #[tokio::test]
    async fn test_order_needs_supplier_or_user() {
        let store = new_store();
        let supplier_id = create_supplier(&store).await;
        let widget = create_product(&store, supplier_id, "Widget", "10.00").await;

        let mut input = order_for(supplier_id, &[(widget.id, 1)]);
        input.supplier_id = None;

        let err = OrderService::new(store).place_order(input).await.unwrap_err();
        assert_eq!(err.status_code().as_u16(), 400);
    }

    #[tokio::test]
    async fn test_unknown_supplier_is_not_found() {
        let store = new_store();
        let supplier_id = create_supplier(&store).await;
        let widget = create_product(&store, supplier_id, "Widget", "10.00").await;

        let err = OrderService::new(store)
            .place_order(order_for(4242, &[(widget.id, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref what) if what == "Supplier 4242"));
    }

    #[tokio::test]
    async fn test_unknown_status_rejected() {
        let store = new_store();
        let supplier_id = create_supplier(&store).await;
        let widget = create_product(&store, supplier_id, "Widget", "10.00").await;

        let mut input = order_for(supplier_id, &[(widget.id, 1)]);
        input.status = Some("Lost".to_string());

        let err = OrderService::new(store).place_order(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "Status"));
    }

    #[tokio::test]
    async fn test_client_total_is_ignored() {
        let store = new_store();
        let supplier_id = create_supplier(&store).await;
        let widget = create_product(&store, supplier_id, "Widget", "10.00").await;

        let mut input = order_for(supplier_id, &[(widget.id, 3)]);
        input.total_amount = Some(dec("1.00"));

        let placed = OrderService::new(store).place_order(input).await.unwrap();
        assert_eq!(placed.order.total_amount, dec("30.00"));
    }

    #[tokio::test]
    async fn test_price_change_does_not_touch_placed_lines() {
        let store = new_store();
        let supplier_id = create_supplier(&store).await;
        let widget = create_product(&store, supplier_id, "Widget", "10.00").await;

        let orders = OrderService::new(store.clone());
        let placed = orders
            .place_order(order_for(supplier_id, &[(widget.id, 3)]))
            .await
            .unwrap();

        CatalogService::new(store.clone())
            .update_product(
                widget.id,
                UpdateProductInput {
                    price: Some(dec("15.00")),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let stored = orders.get_order(placed.order.id).await.unwrap();
        assert_eq!(stored.items[0].unit_price, dec("10.00"));
        assert_eq!(stored.items[0].total_price, dec("30.00"));
        assert_eq!(stored.order.total_amount, dec("30.00"));

        // New orders pick up the new price
        let next = orders
            .place_order(order_for(supplier_id, &[(widget.id, 1)]))
            .await
            .unwrap();
        assert_eq!(next.items[0].unit_price, dec("15.00"));
    }

    #[tokio::test]
    async fn test_stock_is_not_decremented() {
        let store = new_store();
        let supplier_id = create_supplier(&store).await;
        let widget = create_product(&store, supplier_id, "Widget", "10.00").await;

        OrderService::new(store.clone())
            .place_order(order_for(supplier_id, &[(widget.id, 30)]))
            .await
            .unwrap();

        let after = CatalogService::new(store).get_product(widget.id).await.unwrap();
        assert_eq!(after.stock, widget.stock);
    }

    #[tokio::test]
    async fn test_update_order_changes_status_and_notes_only() {
        let store = new_store();
        let supplier_id = create_supplier(&store).await;
        let widget = create_product(&store, supplier_id, "Widget", "10.00").await;
        let service = OrderService::new(store.clone());

        let placed = service
            .place_order(order_for(supplier_id, &[(widget.id, 2)]))
            .await
            .unwrap();

        let updated = service
            .update_order(
                placed.order.id,
                UpdateOrderInput {
                    status: Some("Shipped".to_string()),
                    notes: Some("left the dock".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, OrderStatus::Shipped);
        assert_eq!(updated.notes.as_deref(), Some("left the dock"));
        assert_eq!(updated.total_amount, placed.order.total_amount);
    }

    #[tokio::test]
    async fn test_delete_order_removes_items() {
        let store = new_store();
        let supplier_id = create_supplier(&store).await;
        let widget = create_product(&store, supplier_id, "Widget", "10.00").await;
        let service = OrderService::new(store.clone());

        let placed = service
            .place_order(order_for(supplier_id, &[(widget.id, 2)]))
            .await
            .unwrap();
        service.delete_order(placed.order.id).await.unwrap();

        assert!(store.order_items(placed.order.id).await.unwrap().is_empty());
        assert!(matches!(
            service.get_order(placed.order.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_ordered_product_cannot_be_deleted() {
        let store = new_store();
        let supplier_id = create_supplier(&store).await;
        let widget = create_product(&store, supplier_id, "Widget", "10.00").await;

        OrderService::new(store.clone())
            .place_order(order_for(supplier_id, &[(widget.id, 1)]))
            .await
            .unwrap();

        let err = CatalogService::new(store)
            .delete_product(widget.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_price_beyond_money_column_rejected() {
        let store = new_store();
        let supplier_id = create_supplier(&store).await;
        let catalog = CatalogService::new(store.clone());

        let err = catalog
            .create_product(CreateProductInput {
                name: "Gold Widget".to_string(),
                description: None,
                category: "Parts".to_string(),
                price: dec("100000000000000000000000000"),
                stock: 1,
                min_stock_level: None,
                supplier_id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(catalog.list_products().await.unwrap().is_empty());

        let top = create_product(&store, supplier_id, "Top Shelf", "99999999.99").await;
        let err = catalog
            .update_product(
                top.id,
                UpdateProductInput {
                    price: Some(dec("100000000.00")),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code().as_u16(), 400);
    }

    #[tokio::test]
    async fn test_oversized_line_total_rejected_without_writes() {
        let store = new_store();
        let supplier_id = create_supplier(&store).await;
        let widget = create_product(&store, supplier_id, "Widget", "10.00").await;
        let service = OrderService::new(store.clone());

        // 10.00 x 10,000,000 = 100,000,000.00, one cent past NUMERIC(10,2)
        let err = service
            .place_order(order_for(supplier_id, &[(widget.id, 10_000_000)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "Quantity"));
        assert_eq!(err.status_code().as_u16(), 400);
        assert!(service.list_orders().await.unwrap().is_empty());

        // i32::MAX of the most expensive storable product must not panic
        let top = create_product(&store, supplier_id, "Top Shelf", "99999999.99").await;
        let err = service
            .place_order(order_for(supplier_id, &[(top.id, i32::MAX)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "Quantity"));
        assert!(service.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_order_total_rejected() {
        let store = new_store();
        let supplier_id = create_supplier(&store).await;
        let big = create_product(&store, supplier_id, "Press", "60000000.00").await;
        let bigger = create_product(&store, supplier_id, "Lathe", "40000000.00").await;
        let service = OrderService::new(store.clone());

        // Each line fits on its own; the sum does not
        let err = service
            .place_order(order_for(supplier_id, &[(big.id, 1), (bigger.id, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "Quantity"));
        assert!(service.list_orders().await.unwrap().is_empty());

        let placed = service
            .place_order(order_for(supplier_id, &[(big.id, 1)]))
            .await
            .unwrap();
        assert_eq!(placed.order.total_amount, dec("60000000.00"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod property_tests {
    use super::*;

    /// Basket lines as (price in cents, quantity)
    fn basket_strategy() -> impl Strategy<Value = Vec<(i64, i32)>> {
        prop::collection::vec((1i64..=500_000i64, 1i32..=50i32), 1..8)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// TotalAmount equals the sum of the stored line totals
        #[test]
        fn prop_total_is_sum_of_line_totals(basket in basket_strategy()) {
            let placed = tokio_test::block_on(async {
                let store = new_store();
                let supplier_id = create_supplier(&store).await;

                let mut lines = Vec::with_capacity(basket.len());
                for (i, (cents, quantity)) in basket.iter().enumerate() {
                    let price = Decimal::new(*cents, 2).to_string();
                    let product = create_product(&store, supplier_id, &format!("P{}", i), &price).await;
                    lines.push((product.id, *quantity));
                }

                OrderService::new(store)
                    .place_order(order_for(supplier_id, &lines))
                    .await
                    .unwrap()
            });

            prop_assert_eq!(placed.items.len(), basket.len());
            prop_assert_eq!(placed.order.total_amount, placed.items_total());

            for (item, (cents, quantity)) in placed.items.iter().zip(&basket) {
                prop_assert_eq!(item.unit_price, Decimal::new(*cents, 2));
                prop_assert_eq!(item.total_price, Decimal::new(cents * *quantity as i64, 2));
            }
        }
    }
}
