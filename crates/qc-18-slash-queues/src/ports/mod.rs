//! # Ports Layer
//!
//! Defines the port traits for the Slashing Queues subsystem.
//!
//! ## Hexagonal Architecture
//!
//! - `inbound.rs` - Driving ports (API exposed to the state machine)
//! - `outbound.rs` - Driven ports (store and codec required by the queues)

pub mod inbound;
pub mod outbound;
