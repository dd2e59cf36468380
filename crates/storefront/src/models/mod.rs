//! Domain types for the storefront.
//!
//! These types represent validated domain objects. Where a database column
//! needs parsing (status text, for example) the repository layer maps raw
//! rows into these types and surfaces bad data as corruption errors.

pub mod address;
pub mod cart;
pub mod coupon;
pub mod order;

pub use address::{Address, NewAddress};
pub use cart::{ActiveCart, Cart, CartLine};
pub use coupon::{Coupon, CouponUsageCounts};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem};
