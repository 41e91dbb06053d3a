//! Integration tests for the Order aggregate.
//!
//! These tests walk an order through the lifecycle placement gives it:
//! construction, id assignment, shipping projection and delivery estimate.

use domain::{
    CustomerId, Money, Order, OrderError, OrderId, OrderItem, Shipping, ShippingItem,
    estimate_delivery_days,
};

fn sample_order() -> Order {
    Order::new(
        CustomerId::new(123),
        vec![
            OrderItem::new("prod1", Money::from_cents(1000), 2),
            OrderItem::new("prod2", Money::from_cents(500), 1),
        ],
        Money::from_cents(2500),
    )
    .unwrap()
}

mod order_lifecycle {
    use super::*;

    #[test]
    fn complete_order_lifecycle() {
        let mut order = sample_order();
        assert_eq!(order.id(), None);
        assert_eq!(order.delivery_days(), None);

        order.assign_id(OrderId::new(42)).unwrap();

        let mut shipping = Shipping::new(OrderId::new(42), order.shipping_items());
        let days = shipping.schedule();
        order.assign_delivery_days(days).unwrap();

        assert_eq!(order.id(), Some(OrderId::new(42)));
        assert_eq!(order.delivery_days(), Some(1));
        assert_eq!(shipping.delivery_days(), Some(1));
    }

    #[test]
    fn shipping_items_follow_order_items() {
        let order = sample_order();

        assert_eq!(
            order.shipping_items(),
            vec![ShippingItem::new("prod1", 2), ShippingItem::new("prod2", 1)]
        );
        assert_eq!(order.total_quantity(), 3);
        assert_eq!(
            estimate_delivery_days(&order.shipping_items()),
            estimate_delivery_days(&order.shipping_items())
        );
    }

    #[test]
    fn large_order_estimate() {
        let order = Order::new(
            CustomerId::new(124),
            vec![
                OrderItem::new("prod1", Money::from_cents(100), 30),
                OrderItem::new("prod2", Money::from_cents(100), 25),
            ],
            Money::from_cents(5500),
        )
        .unwrap();

        assert_eq!(estimate_delivery_days(&order.shipping_items()), 11);
    }
}

mod write_once {
    use super::*;

    #[test]
    fn id_cannot_be_reassigned() {
        let mut order = sample_order();
        order.assign_id(OrderId::new(1)).unwrap();

        let err = order.assign_id(OrderId::new(2)).unwrap_err();

        assert_eq!(err, OrderError::IdAlreadyAssigned(OrderId::new(1)));
        assert_eq!(order.id(), Some(OrderId::new(1)));
    }

    #[test]
    fn delivery_days_cannot_be_reassigned() {
        let mut order = sample_order();
        order.assign_delivery_days(3).unwrap();

        assert_eq!(
            order.assign_delivery_days(5),
            Err(OrderError::DeliveryAlreadyAssigned(3))
        );
    }

    #[test]
    fn restored_order_keeps_its_fields() {
        let order = Order::restore(
            OrderId::new(7),
            CustomerId::new(1),
            vec![OrderItem::new("prod1", Money::from_cents(1000), 1)],
            Money::from_cents(1000),
            Some(2),
        );

        assert_eq!(order.id(), Some(OrderId::new(7)));
        assert_eq!(order.delivery_days(), Some(2));
    }
}

mod validation {
    use super::*;

    #[test]
    fn rejects_invalid_orders() {
        let no_items = Order::new(CustomerId::new(1), vec![], Money::zero());
        assert_eq!(no_items, Err(OrderError::NoItems));

        let zero_quantity = Order::new(
            CustomerId::new(1),
            vec![OrderItem::new("prod1", Money::from_cents(100), 0)],
            Money::from_cents(100),
        );
        assert!(matches!(
            zero_quantity,
            Err(OrderError::InvalidQuantity { .. })
        ));

        let blank_code = Order::new(
            CustomerId::new(1),
            vec![OrderItem::new("  ", Money::from_cents(100), 1)],
            Money::from_cents(100),
        );
        assert_eq!(blank_code, Err(OrderError::EmptyProductCode));
    }

    #[test]
    fn total_is_not_recomputed() {
        let order = Order::new(
            CustomerId::new(1),
            vec![OrderItem::new("prod1", Money::from_cents(1000), 2)],
            Money::from_cents(1500),
        )
        .unwrap();

        assert_eq!(order.total_price(), Money::from_cents(1500));
        assert_eq!(order.items_total(), Money::from_cents(2000));
    }

    #[test]
    fn order_serializes_with_assigned_fields() {
        let mut order = sample_order();
        order.assign_id(OrderId::new(9)).unwrap();

        let json = serde_json::to_string(&order).unwrap();
        let restored: Order = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, order);
    }
}
