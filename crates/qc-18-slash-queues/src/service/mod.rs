//! # Service Layer
//!
//! Application services of the Slashing Queues subsystem.
//!
//! - `iterator` - Queue cursor with guaranteed release
//! - `queue` - One time-ordered queue (double-sign or liveness)
//! - `queues` - Both queues composed, implementing `SlashQueueApi`

pub mod iterator;
pub mod queue;
pub mod queues;


pub use iterator::{IteratorState, QueueIterator};
pub use queue::SlashQueue;
pub use queues::SlashQueues;
