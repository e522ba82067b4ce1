//! Milkrun prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{AppliedPromo, Cart, CartError},
    catalog::{Catalog, CatalogError},
    fixtures::{Fixture, FixtureError},
    items::LineItem,
    orders::{Order, OrderError, OrderHistory, OrderLine, OrderStatus},
    pricing::{
        DeliveryPolicy, PricingError, compute_delivery_fee, compute_discount_amount,
        compute_subtotal, compute_total,
    },
    products::{Category, Product, ProductKey, Unit},
    promotions::{PromoCodes, PromoResolution, resolve_promo_code},
    quotes::{CartQuote, RenderError, SubscriptionQuote, quote_cart, quote_cart_with_policy},
    subscriptions::{
        SubscriptionCatalog, SubscriptionPlan, SubscriptionProduct, compute_daily_cost,
        compute_monthly_total, quote_subscription,
    },
};
