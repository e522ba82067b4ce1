//! Milkrun
//!
//! Milkrun prices carts, promo codes and delivery subscriptions for a doorstep milk-delivery
//! service. All amounts are exact money values in minor units, and every quote is a pure function
//! of its inputs.

pub mod cart;
pub mod catalog;
pub mod fixtures;
pub mod items;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod quotes;
pub mod subscriptions;
