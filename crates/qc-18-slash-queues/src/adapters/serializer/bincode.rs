use crate::domain::entities::SlashEvent;
use crate::domain::errors::SerializationError;
use crate::ports::outbound::EventCodec;

/// Default slash event codec using bincode.
///
/// bincode's fixed-int encoding is deterministic, so every node stores the
/// same bytes for the same event.
#[derive(Debug, Default, Clone, Copy)]
pub struct BincodeEventCodec;

impl EventCodec for BincodeEventCodec {
    fn encode(&self, event: &SlashEvent) -> Result<Vec<u8>, SerializationError> {
        bincode::serialize(event).map_err(|e| SerializationError {
            message: e.to_string(),
        })
    }

    fn decode(&self, data: &[u8]) -> Result<SlashEvent, SerializationError> {
        bincode::deserialize(data).map_err(|e| SerializationError {
            message: e.to_string(),
        })
    }
}
