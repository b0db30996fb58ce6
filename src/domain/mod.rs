pub mod entity;
pub mod error;
pub mod price;

// Re-export commonly used types
pub use entity::{
    NewOrder, NewOrderItem, NewProduct, NewUser, Order, OrderId, OrderItem, OrderItemId, Product,
    ProductId, User, UserId,
};
pub use error::DomainError;
pub use price::Price;
