//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General utility commands
pub mod general;

/// Order management commands
pub mod order;

/// Production and cutting commands
pub mod production;

/// Stock ledger commands
pub mod stock;

// Export commands
pub use general::*;
pub use order::*;
pub use production::*;
pub use stock::*;
