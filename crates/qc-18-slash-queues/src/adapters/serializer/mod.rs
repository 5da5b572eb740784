//! Serializer Adapters
//!
//! Implementations of the `EventCodec` trait.

mod bincode;

pub use self::bincode::BincodeEventCodec;
