//! Unified error taxonomy for SuperBoot.
//!
//! Every subsystem (VFS, filesystem readers, config parsers, device scan,
//! boot paths) reports failures through this single enum rather than its
//! own per-module error type, so the orchestrator can log and recover from
//! any of them uniformly. Firmware status codes are folded into this
//! taxonomy at the boundary where firmware calls happen (see
//! `superboot_efi::status::EfiStatus`'s `From` impl), rather than carried
//! around as a raw status code.

use core::fmt;

/// Top-level error type returned by SuperBoot's fallible operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A path, device, or boot entry could not be located.
    NotFound,
    /// The operation, filesystem, or boot protocol is not implemented.
    Unsupported,
    /// An on-disk structure (superblock, extent, directory entry) failed
    /// validation.
    VolumeCorrupted,
    /// A bounded table (mount table, target list, variable table, memory
    /// pool) has no room left.
    OutOfResources,
    /// A call received an argument outside its accepted range, or a
    /// configuration file could not be parsed.
    InvalidParameter,
    /// An image failed to load or start.
    LoadError,
    /// The condition may clear on retry (stale map key, device not yet
    /// ready, timeout).
    Transient,
}

impl Error {
    /// Maps a raw EFI status code (as returned by `EfiStatus::raw`) to the
    /// closest taxonomy member. Unrecognized error codes map to
    /// [`Error::Transient`], since firmware keeps adding status codes this
    /// crate doesn't otherwise need to distinguish.
    #[must_use]
    pub const fn from_efi_status(code: usize) -> Self {
        const ERROR_BIT: usize = 1 << (usize::BITS - 1);
        match code {
            c if c == ERROR_BIT | 0x0e => Self::NotFound,
            c if c == ERROR_BIT | 0x03 => Self::Unsupported,
            c if c == ERROR_BIT | 0x0a => Self::VolumeCorrupted,
            c if c == ERROR_BIT | 0x09 || c == ERROR_BIT | 0x0b => Self::OutOfResources,
            c if c == ERROR_BIT | 0x02 || c == ERROR_BIT | 0x04 => Self::InvalidParameter,
            c if c == ERROR_BIT | 0x01 => Self::LoadError,
            _ => Self::Transient,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Unsupported => write!(f, "unsupported"),
            Self::VolumeCorrupted => write!(f, "volume corrupted"),
            Self::OutOfResources => write!(f, "out of resources"),
            Self::InvalidParameter => write!(f, "invalid parameter"),
            Self::LoadError => write!(f, "load error"),
            Self::Transient => write!(f, "transient failure, retry may succeed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_all_variants() {
        assert_eq!(format!("{}", Error::NotFound), "not found");
        assert_eq!(format!("{}", Error::Unsupported), "unsupported");
        assert_eq!(format!("{}", Error::VolumeCorrupted), "volume corrupted");
        assert_eq!(format!("{}", Error::OutOfResources), "out of resources");
        assert_eq!(format!("{}", Error::InvalidParameter), "invalid parameter");
        assert_eq!(format!("{}", Error::LoadError), "load error");
        assert_eq!(
            format!("{}", Error::Transient),
            "transient failure, retry may succeed"
        );
    }

    #[test]
    fn from_efi_status_maps_known_codes() {
        const ERROR_BIT: usize = 1 << (usize::BITS - 1);
        assert_eq!(Error::from_efi_status(ERROR_BIT | 0x0e), Error::NotFound);
        assert_eq!(Error::from_efi_status(ERROR_BIT | 0x03), Error::Unsupported);
        assert_eq!(
            Error::from_efi_status(ERROR_BIT | 0x0a),
            Error::VolumeCorrupted
        );
        assert_eq!(
            Error::from_efi_status(ERROR_BIT | 0x09),
            Error::OutOfResources
        );
        assert_eq!(
            Error::from_efi_status(ERROR_BIT | 0x02),
            Error::InvalidParameter
        );
        assert_eq!(Error::from_efi_status(ERROR_BIT | 0x01), Error::LoadError);
    }

    #[test]
    fn from_efi_status_defaults_unknown_to_transient() {
        const ERROR_BIT: usize = 1 << (usize::BITS - 1);
        assert_eq!(Error::from_efi_status(ERROR_BIT | 0x7f), Error::Transient);
    }

    #[test]
    fn error_equality() {
        assert_eq!(Error::NotFound, Error::NotFound);
        assert_ne!(Error::NotFound, Error::Unsupported);
    }
}
