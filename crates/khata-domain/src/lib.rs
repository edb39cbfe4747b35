//! khata-domain
//!
//! Pure domain models (Transaction, Category, pending-queue entries).
//! No I/O, no storage. Only data types and core enums.

pub mod category;
pub mod common;
pub mod pending;
pub mod transaction;

pub use category::*;
pub use common::*;
pub use pending::*;
pub use transaction::*;
