use time::OffsetDateTime;

use super::price::Price;

/// Sequence-assigned identifier types, one counter per entity
pub type UserId = u64;
pub type ProductId = u64;
pub type OrderId = u64;
pub type OrderItemId = u64;

/// A stored user row. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// A stored product row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
}

/// A stored order row. The user reference resolves to an existing row
/// at the moment the order is durably written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub placed_at: OffsetDateTime,
}

/// A stored order line item. Both references resolve to existing rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
}

/// An unsaved user; the store assigns the identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

/// An unsaved product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
}

/// An unsaved order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: UserId,
    pub placed_at: OffsetDateTime,
}

/// An unsaved order line item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
}
