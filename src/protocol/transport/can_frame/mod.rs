//! In-memory representation of a classic CAN frame.
//!
//! `CanFrame` is a plain `Copy` value: once it has been copied out of the
//! controller it carries no reference to the hardware it came from.
use crate::core::MAX_PAYLOAD_LEN;
use crate::error::FrameBuildError;
use crate::protocol::transport::can_id::CanId;
use embedded_can::{Id, StandardId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Received or synthetic CAN frame.
pub struct CanFrame {
    id: CanId,
    remote: bool,
    /// Data length code, 0 to 8.
    len: usize,
    /// Payload buffer. Only `data[..len]` is meaningful, and only for data frames.
    data: [u8; MAX_PAYLOAD_LEN],
}

impl CanFrame {
    /// Zeroed placeholder used to fill the queue storage.
    pub const EMPTY: CanFrame =
        CanFrame::from_parts(CanId::Standard(0), false, [0; MAX_PAYLOAD_LEN], 0);

    /// Assemble a frame without validation. `len` must not exceed eight.
    pub(crate) const fn from_parts(
        id: CanId,
        remote: bool,
        data: [u8; MAX_PAYLOAD_LEN],
        len: usize,
    ) -> Self {
        Self {
            id,
            remote,
            len,
            data,
        }
    }

    /// Build a data frame from up to eight payload bytes.
    ///
    /// The identifier is range-checked even when built from a bare variant.
    pub fn with_data(id: CanId, payload: &[u8]) -> Result<Self, FrameBuildError> {
        let id = id.validate()?;
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(FrameBuildError::PayloadTooLong { len: payload.len() });
        }
        let mut data = [0u8; MAX_PAYLOAD_LEN];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self::from_parts(id, false, data, payload.len()))
    }

    /// Build a remote-request frame with the given data length code.
    pub fn remote_request(id: CanId, dlc: usize) -> Result<Self, FrameBuildError> {
        let id = id.validate()?;
        if dlc > MAX_PAYLOAD_LEN {
            return Err(FrameBuildError::DlcOutOfRange { dlc });
        }
        Ok(Self::from_parts(id, true, [0; MAX_PAYLOAD_LEN], dlc))
    }

    /// Copy any `embedded_can` frame into a `CanFrame`.
    ///
    /// Data length codes above eight (CAN-FD encodings) are clamped.
    pub fn from_frame<F: embedded_can::Frame>(frame: &F) -> Self {
        let id = CanId::from(frame.id());
        if frame.is_remote_frame() {
            let dlc = frame.dlc().min(MAX_PAYLOAD_LEN);
            return Self::from_parts(id, true, [0; MAX_PAYLOAD_LEN], dlc);
        }
        let payload = frame.data();
        let len = payload.len().min(MAX_PAYLOAD_LEN);
        let mut data = [0u8; MAX_PAYLOAD_LEN];
        data[..len].copy_from_slice(&payload[..len]);
        Self::from_parts(id, false, data, len)
    }

    /// Convert into a driver-specific frame type.
    ///
    /// Returns `None` when the identifier is out of range or the driver
    /// refuses the identifier or length.
    pub fn to_frame<F: embedded_can::Frame>(&self) -> Option<F> {
        let id = Id::try_from(self.id).ok()?;
        if self.remote {
            F::new_remote(id, self.len)
        } else {
            F::new(id, self.payload())
        }
    }

    /// Identifier, tagged with its format.
    #[inline]
    pub const fn can_id(&self) -> CanId {
        self.id
    }

    /// Numeric identifier value.
    #[inline]
    pub const fn identifier(&self) -> u32 {
        self.id.raw()
    }

    #[inline]
    pub const fn is_extended(&self) -> bool {
        self.id.is_extended()
    }

    #[inline]
    pub const fn is_remote(&self) -> bool {
        self.remote
    }

    /// Data length code (0 to 8). For remote frames this is the requested length.
    #[inline]
    pub const fn data_length(&self) -> usize {
        self.len
    }

    /// Meaningful payload bytes. Always empty for remote frames.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        if self.remote {
            &[]
        } else {
            &self.data[..self.len]
        }
    }
}

impl Default for CanFrame {
    fn default() -> Self {
        Self::EMPTY
    }
}

//==================================================================================EMBEDDED_CAN
impl embedded_can::Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        let id: Id = id.into();
        CanFrame::with_data(CanId::from(id), data).ok()
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        let id: Id = id.into();
        CanFrame::remote_request(CanId::from(id), dlc).ok()
    }

    fn is_extended(&self) -> bool {
        self.id.is_extended()
    }

    fn is_remote_frame(&self) -> bool {
        self.remote
    }

    fn id(&self) -> Id {
        // Every constructor validates the identifier.
        Id::try_from(self.id).unwrap_or(Id::Standard(StandardId::ZERO))
    }

    fn dlc(&self) -> usize {
        self.len
    }

    fn data(&self) -> &[u8] {
        self.payload()
    }
}
