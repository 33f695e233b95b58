//! UEFI Disk I/O Protocol.
//!
//! The Disk I/O Protocol abstracts Block I/O devices behind a byte-granular
//! read/write interface, removing the caller's obligation to respect block
//! boundaries and alignment. SuperBoot's extent-tree filesystem reader uses
//! this protocol when present, falling back to Block I/O plus a bounce buffer
//! otherwise.

use crate::EfiStatus;

/// The Disk I/O Protocol.
#[repr(C)]
pub struct DiskIoProtocol {
    /// The revision of this protocol.
    pub revision: u64,
    /// Reads a number of bytes from the device, starting at `offset`.
    pub read_disk: unsafe extern "efiapi" fn(
        this: *mut DiskIoProtocol,
        media_id: u32,
        offset: u64,
        buffer_size: usize,
        buffer: *mut u8,
    ) -> EfiStatus,
    /// Writes a number of bytes to the device, starting at `offset`.
    pub write_disk: unsafe extern "efiapi" fn(
        this: *mut DiskIoProtocol,
        media_id: u32,
        offset: u64,
        buffer_size: usize,
        buffer: *const u8,
    ) -> EfiStatus,
}

// ── Compile-time layout assertions ──────────────────────────────────

#[cfg(target_pointer_width = "64")]
const _: () = assert!(core::mem::size_of::<DiskIoProtocol>() == 24);
