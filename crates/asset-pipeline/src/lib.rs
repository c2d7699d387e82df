//! PromoKit Asset Pipeline
//!
//! Drives one asset-generation run end to end:
//!
//! ```text
//! (campaign, payload)
//!        │
//!        ▼
//!  derive_variants ──► 4 x RenderVariant
//!        │
//!        ▼
//!  BatchOrchestrator (browser open for the whole loop)
//!    for each variant:
//!      render markup ──► capture snapshot ──► temp_*.png
//!                                               │
//!      composite over background ◄──────────────┘ (temp removed)
//!        │
//!        ▼
//!  package_assets ──► {Campaign}_Assets.zip (finals removed)
//! ```

pub mod generate;
pub mod orchestrator;
pub mod packager;
pub mod snapshot;

pub use generate::*;
pub use orchestrator::*;
pub use packager::*;
