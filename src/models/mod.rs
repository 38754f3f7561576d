//! Data structures persisted by the stores and serialized over the API.

pub mod cart_item;
pub mod order;
pub mod product;
pub mod user;

pub use cart_item::CartItem;
pub use order::{Customer, Order, OrderLine, OrderPatch, PaymentMethod, PaymentStatus};
pub use product::Product;
pub use user::User;
