//! CAN transport layer: frame and identifier representations, receive
//! ingestion, and the collaborator traits the monitor is generic over.
pub mod can_frame;
pub mod can_id;
pub mod ingestion;
pub mod traits;
