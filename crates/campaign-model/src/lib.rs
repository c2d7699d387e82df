//! PromoKit Campaign Model
//!
//! Defines the data contracts of one asset-generation run:
//! - **Payload:** discount terms, coupon, validity window, and course rows
//! - **Variants:** the four output assets (layout x content state) of a run
//! - **Catalog:** user-editable option lists the course rows are picked from
//!
//! Payloads and variants are built fresh for every run and never persisted.

pub mod catalog;
pub mod payload;
pub mod variant;

pub use catalog::*;
pub use payload::*;
pub use variant::*;
