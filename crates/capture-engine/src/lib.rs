//! PromoKit Capture Engine
//!
//! Turns a markup document into a transparent PNG snapshot of an exact pixel
//! size. One headless browser is held open for a whole batch; each capture
//! gets its own short-lived page (surface) that is closed before the next.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │          CaptureEngine (one per batch)        │
//! │                                               │
//! │  markup ──► new page (W x H, DPR 1)           │
//! │               │                               │
//! │               ├── set content                 │
//! │               ├── SettlePolicy: ready probe   │
//! │               │   + bounded wait + delay      │
//! │               ├── screenshot, no background   │
//! │               └── close page                  │
//! │                        │                      │
//! │                        ▼                      │
//! │                 Snapshot (PNG)                │
//! └───────────────────────────────────────────────┘
//! ```

pub mod backend;
pub mod engine;
pub mod settle;

pub use backend::ChromiumEngine;
pub use engine::*;
pub use settle::SettlePolicy;
