//! PromoKit Render Engine
//!
//! The two CPU-side stages of asset production:
//!
//! ```text
//! CampaignPayload ──► TemplateRenderer ──► markup ──► (capture engine)
//!                                                          │
//!                                                    snapshot.png
//!                                                          │
//! background.png ──► resize (Lanczos3) ──► source-over ◄───┘
//!                                              │
//!                                              ▼
//!                                          final.png
//! ```

pub mod compositor;
pub mod template;

pub use compositor::{alpha_composite, composite_files, load_background};
pub use template::TemplateRenderer;
