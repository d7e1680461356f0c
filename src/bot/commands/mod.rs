//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General utility commands
pub mod general;

/// Data integrity and workflow add-on commands
pub mod integrity;

/// Recurring blueprint and generated entry commands
pub mod recurring;

/// Revenue cache commands
pub mod revenue;

// Export commands
pub use general::*;
pub use integrity::*;
pub use recurring::*;
pub use revenue::*;
