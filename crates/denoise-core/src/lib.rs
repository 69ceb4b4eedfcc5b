//! Shared vocabulary for the denoise graph builder: errors, configuration, and the
//! fixed render pass table.
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod passes;

pub use config::{DenoiseConfig, LayoutConfig};
pub use error::EngineError;
pub use passes::{LightType, PassKey, PassType, PASS_TABLE};
