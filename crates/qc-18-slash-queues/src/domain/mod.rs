//! # Domain Layer
//!
//! Pure domain logic for the Slashing Queues subsystem.
//!
//! ## Modules
//!
//! - `entities` - SlashEvent, FaultKind, ConsensusAddress
//! - `keys` - Sortable composite queue keys
//! - `config` - Namespace tags and release delays
//! - `errors` - Domain error types

pub mod config;
pub mod entities;
pub mod errors;
pub mod keys;
