//! Standard (11-bit) and extended (29-bit) CAN identifiers.
use crate::error::FrameBuildError;
use embedded_can::{ExtendedId, Id, StandardId};

/// Largest 11-bit identifier.
pub const STANDARD_ID_MAX: u32 = 0x7FF;
/// Largest 29-bit identifier.
pub const EXTENDED_ID_MAX: u32 = 0x1FFF_FFFF;

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// CAN identifier, tagged with its format. The raw value is always in range
/// for its variant when built through [`CanId::standard`] or [`CanId::extended`].
pub enum CanId {
    Standard(u16),
    Extended(u32),
}

impl CanId {
    /// Build a standard identifier, rejecting values above `0x7FF`.
    pub const fn standard(raw: u16) -> Result<Self, FrameBuildError> {
        if (raw as u32) > STANDARD_ID_MAX {
            return Err(FrameBuildError::StandardIdOutOfRange { raw: raw as u32 });
        }
        Ok(CanId::Standard(raw))
    }

    /// Build an extended identifier, rejecting values above `0x1FFF_FFFF`.
    pub const fn extended(raw: u32) -> Result<Self, FrameBuildError> {
        if raw > EXTENDED_ID_MAX {
            return Err(FrameBuildError::ExtendedIdOutOfRange { raw });
        }
        Ok(CanId::Extended(raw))
    }

    /// Re-check the range of a value built directly from a variant.
    pub const fn validate(self) -> Result<Self, FrameBuildError> {
        match self {
            CanId::Standard(raw) => CanId::standard(raw),
            CanId::Extended(raw) => CanId::extended(raw),
        }
    }

    /// Numeric value of the identifier.
    #[inline]
    pub const fn raw(&self) -> u32 {
        match self {
            CanId::Standard(raw) => *raw as u32,
            CanId::Extended(raw) => *raw,
        }
    }

    /// `true` for 29-bit identifiers.
    #[inline]
    pub const fn is_extended(&self) -> bool {
        matches!(self, CanId::Extended(_))
    }

    /// Number of bytes printed for this identifier: two for standard,
    /// four for extended.
    #[inline]
    pub const fn rendered_width(&self) -> usize {
        match self {
            CanId::Standard(_) => 2,
            CanId::Extended(_) => 4,
        }
    }

    /// Identifier bytes as printed, most significant first.
    pub fn rendered_bytes(&self) -> ([u8; 4], usize) {
        let width = self.rendered_width();
        let be = self.raw().to_be_bytes();
        let mut out = [0u8; 4];
        out[..width].copy_from_slice(&be[4 - width..]);
        (out, width)
    }
}

//==================================================================================EMBEDDED_CAN
impl From<Id> for CanId {
    fn from(id: Id) -> Self {
        match id {
            Id::Standard(id) => CanId::Standard(id.as_raw()),
            Id::Extended(id) => CanId::Extended(id.as_raw()),
        }
    }
}

impl TryFrom<CanId> for Id {
    type Error = FrameBuildError;

    fn try_from(id: CanId) -> Result<Self, Self::Error> {
        match id {
            CanId::Standard(raw) => StandardId::new(raw)
                .map(Id::Standard)
                .ok_or(FrameBuildError::StandardIdOutOfRange { raw: raw as u32 }),
            CanId::Extended(raw) => ExtendedId::new(raw)
                .map(Id::Extended)
                .ok_or(FrameBuildError::ExtendedIdOutOfRange { raw }),
        }
    }
}
