//! Shipping-method resolver and profit calculator for flea-market sellers in Japan.
//!
//! [`domain::ShippingResolver`] turns a product form into a ranked list of at most
//! three carrier options. [`infra::AnalysisService`] optionally adds AI advice on
//! top, falling back to canned text whenever the model is unavailable.

pub mod domain;
pub mod infra;
pub mod util;
