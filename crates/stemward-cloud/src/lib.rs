//! stemward cloud drivers
//!
//! This crate defines the contract the stemcell lifecycle manager uses to
//! talk to an IaaS, and ships a driver that speaks the CPI protocol to an
//! external executable.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │               stemward-core                      │
//! │         (Manager / CloudStemcell)                │
//! └─────────────────┬───────────────────────────────┘
//!                   │ Arc<dyn Cloud>
//! ┌─────────────────▼───────────────────────────────┐
//! │               stemward-cloud                     │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  trait Cloud { create_stemcell, ... }    │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐                               │
//! │  │   CpiCloud   │──── stdin/stdout JSON ────┐   │
//! │  └──────────────┘                           │   │
//! └─────────────────────────────────────────────┼───┘
//!                                               │
//!                                       ┌───────▼───────┐
//!                                       │ CPI executable│
//!                                       └───────────────┘
//! ```

pub mod cloud;
pub mod cpi;
pub mod error;

// Re-exports
pub use cloud::{Cloud, CloudProperties};
pub use cpi::{CpiCloud, CpiContext, CpiRequest, CpiResponse, CpiResponseError};
pub use error::{CloudError, Result};
