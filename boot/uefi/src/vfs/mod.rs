//! Virtual filesystem dispatch.
//!
//! The VFS hides the difference between "firmware already knows how to read
//! this volume" (FAT, via `SimpleFileSystemProtocol`) and "SuperBoot has to
//! read it itself" (ext4, via the block device directly) behind one
//! `open`/`read_file`/`dir_exists` surface. A mount is created lazily the
//! first time a device is touched and is idempotent: mounting an
//! already-mounted device is a no-op success.

pub mod native;

use superboot_core::collections::MountVec;
use superboot_core::error::Error;
use superboot_core::kwarn;
use superboot_efi::api::boot::BootServices;
use superboot_efi::api::{BlockIoId, DiskIoId, Protocol, SimpleFileSystemId};
use superboot_efi::protocol::block_io::BlockIoProtocol;
use superboot_efi::protocol::disk_io::DiskIoProtocol;
use superboot_efi::EfiHandle;

use crate::fs::ext4::Ext4Fs;

/// A byte-addressable view of a block device, hiding whether the firmware
/// exposes Disk I/O (byte-granular) or only Block I/O (block-granular).
pub enum RawDisk {
    /// Read through `EFI_DISK_IO_PROTOCOL`, which handles unaligned,
    /// non-block-sized reads itself.
    Disk {
        raw: *mut DiskIoProtocol,
        media_id: u32,
    },
    /// Read through `EFI_BLOCK_IO_PROTOCOL`, bouncing through a
    /// block-aligned buffer for any read that doesn't land on a block
    /// boundary.
    Block {
        raw: *mut BlockIoProtocol,
        media_id: u32,
        block_size: u32,
    },
}

impl RawDisk {
    /// Opens the best available raw-disk interface for `device`: Disk I/O if
    /// present, Block I/O otherwise.
    pub fn open(bs: &BootServices<'_>, device: EfiHandle) -> Result<Self, Error> {
        if let Ok(disk) = bs.handle_protocol::<DiskIoId>(device) {
            let media_id = block_media_id(bs, device).unwrap_or(0);
            return Ok(Self::Disk {
                raw: disk as *mut DiskIoProtocol,
                media_id,
            });
        }
        let block = bs
            .handle_protocol::<BlockIoId>(device)
            .map_err(Error::from)?;
        let media = unsafe { &*block.media };
        Ok(Self::Block {
            raw: block as *mut BlockIoProtocol,
            media_id: media.media_id,
            block_size: media.block_size,
        })
    }

    /// Reads `buf.len()` bytes starting at byte offset `offset`.
    pub fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<(), Error> {
        match *self {
            Self::Disk { raw, media_id } => {
                let status = unsafe {
                    ((*raw).read_disk)(raw, media_id, offset, buf.len(), buf.as_mut_ptr())
                };
                status.to_result().map_err(Error::from)
            }
            Self::Block {
                raw,
                media_id,
                block_size,
            } => read_via_blocks(raw, media_id, block_size, offset, buf),
        }
    }
}

fn block_media_id(bs: &BootServices<'_>, device: EfiHandle) -> Option<u32> {
    let block = bs.handle_protocol::<BlockIoId>(device).ok()?;
    Some(unsafe { &*block.media }.media_id)
}

/// Reads an arbitrary byte range from a block device by expanding the
/// request to whole blocks and bouncing through a stack buffer.
fn read_via_blocks(
    raw: *mut BlockIoProtocol,
    media_id: u32,
    block_size: u32,
    offset: u64,
    buf: &mut [u8],
) -> Result<(), Error> {
    const BOUNCE_BLOCKS: usize = 8;
    let block_size = block_size as u64;
    let mut bounce = [0u8; BOUNCE_BLOCKS * 4096];
    let bounce_bytes = (BOUNCE_BLOCKS as u64 * block_size).min(bounce.len() as u64) as usize;

    let mut written = 0usize;
    let mut cursor = offset;
    while written < buf.len() {
        let lba = cursor / block_size;
        let in_block = (cursor % block_size) as usize;
        let remaining = buf.len() - written;
        let this_chunk_bytes = (bounce_bytes - in_block).min(remaining + in_block);
        let blocks = this_chunk_bytes.div_ceil(block_size as usize) as u64;
        let read_len = (blocks * block_size) as usize;

        let status = unsafe {
            ((*raw).read_blocks)(raw, media_id, lba, read_len, bounce.as_mut_ptr())
        };
        status.to_result().map_err(Error::from)?;

        let take = (read_len - in_block).min(remaining);
        buf[written..written + take].copy_from_slice(&bounce[in_block..in_block + take]);
        written += take;
        cursor += take as u64;
    }
    Ok(())
}

/// Which driver serves a mounted volume.
enum Backend {
    /// Firmware's own `SimpleFileSystemProtocol`.
    Native,
    /// SuperBoot's own ext4 reader.
    Ext4(Ext4Fs),
}

struct Mount {
    device: EfiHandle,
    backend: Backend,
}

/// The mount table and dispatcher.
pub struct Vfs {
    mounts: MountVec<Mount>,
    external_drivers_loaded: bool,
}

impl Vfs {
    /// Builds an empty VFS with no mounts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mounts: MountVec::new(),
            external_drivers_loaded: false,
        }
    }

    /// One-time initialization: stages external filesystem drivers from
    /// `\EFI\superboot\drivers\*.efi`, if any, and reconnects controllers so
    /// they bind. Failure to find or load any driver is logged and
    /// swallowed — SuperBoot falls back to its built-in probes.
    pub fn init(&mut self, bs: &BootServices<'_>) {
        if self.external_drivers_loaded {
            return;
        }
        self.external_drivers_loaded = true;
        if let Err(err) = self.load_external_drivers(bs) {
            kwarn!("vfs: external driver load skipped: {}", err);
        }
    }

    fn load_external_drivers(&mut self, bs: &BootServices<'_>) -> Result<(), Error> {
        // External drivers live on the same device the image itself was
        // loaded from, under a fixed path; native() below resolves it
        // through whichever mount already serves that device.
        let handle = bs.image_handle();
        self.open(bs, handle)?;
        let driver_dir = "\\EFI\\superboot\\drivers";
        let Some(mount) = self.mounts.iter().find(|m| m.device == handle) else {
            return Ok(());
        };
        let Backend::Native = mount.backend else {
            return Ok(());
        };
        let Ok(fs) = native::open_native(bs, handle) else {
            return Ok(());
        };
        let Ok(dir) = fs.open_volume() else {
            return Ok(());
        };
        let Ok(drivers) = native::open_dir(&dir, driver_dir) else {
            return Ok(());
        };
        for name in native::list_dir(&drivers) {
            if !name.as_str().ends_with(".efi") {
                continue;
            }
            let Ok(file) = drivers.open(
                name.as_str(),
                superboot_efi::protocol::file::FileMode::READ,
                superboot_efi::protocol::file::FileAttributes::empty(),
            ) else {
                continue;
            };
            let mut info_buf = [0u8; 512];
            let Ok(size) = file.file_size(&mut info_buf) else {
                continue;
            };
            let Ok(buffer) = bs.allocate_pool(
                superboot_efi::memory::EfiMemoryType::LoaderData,
                size as usize,
            ) else {
                continue;
            };
            let slice = unsafe { core::slice::from_raw_parts_mut(buffer, size as usize) };
            if file.read(slice).is_ok() {
                if let Ok(image) = bs.load_image(slice) {
                    let _ = bs.start_image(image);
                }
            }
            let _ = unsafe { bs.free_pool(buffer) };
        }
        // One non-recursive reconnect pass lets newly loaded drivers bind
        // to controllers that were left unsupported at boot.
        let _ = bs.connect_controller(handle, true);
        Ok(())
    }

    /// Mounts `device`, probing native support first and falling back to
    /// SuperBoot's own drivers. Idempotent: a device already mounted
    /// returns success immediately without re-probing.
    pub fn open(&mut self, bs: &BootServices<'_>, device: EfiHandle) -> Result<(), Error> {
        if self.mounts.iter().any(|m| m.device == device) {
            return Ok(());
        }

        if bs.handle_protocol::<SimpleFileSystemId>(device).is_ok() {
            return self.push(device, Backend::Native);
        }

        let disk = RawDisk::open(bs, device)?;
        if crate::fs::probe::is_ext4(&disk)? {
            let fs = Ext4Fs::mount(&disk)?;
            return self.push(device, Backend::Ext4(fs));
        }
        if crate::fs::probe::is_btrfs(&disk).unwrap_or(false) {
            kwarn!("vfs: device carries a btrfs volume, no reader built in");
        } else if crate::fs::probe::is_xfs(&disk).unwrap_or(false) {
            kwarn!("vfs: device carries an XFS volume, no reader built in");
        } else if crate::fs::probe::is_ntfs(&disk).unwrap_or(false) {
            kwarn!("vfs: device carries an NTFS volume, no reader built in");
        }

        Err(Error::Unsupported)
    }

    fn push(&mut self, device: EfiHandle, backend: Backend) -> Result<(), Error> {
        self.mounts
            .try_push(Mount { device, backend })
            .map_err(|_| Error::OutOfResources)
    }

    /// Reads the entire contents of `path` on `device`, returning a pool
    /// buffer the caller must release back to the firmware (or that is
    /// simply leaked for the lifetime of this boot, as SuperBoot never
    /// calls `ExitBootServices` before its last allocation is read).
    pub fn read_file<'st>(
        &self,
        bs: &BootServices<'st>,
        device: EfiHandle,
        path: &str,
    ) -> Result<PoolBuffer<'st>, Error> {
        let mount = self
            .mounts
            .iter()
            .find(|m| m.device == device)
            .ok_or(Error::NotFound)?;
        match &mount.backend {
            Backend::Native => native::read_file(bs, device, path),
            Backend::Ext4(fs) => {
                let disk = RawDisk::open(bs, device)?;
                fs.read_file(&disk, path, bs)
            }
        }
    }

    /// `true` if `path` exists (as a file or directory) on `device`.
    pub fn exists(&self, bs: &BootServices<'_>, device: EfiHandle, path: &str) -> bool {
        self.read_file(bs, device, path).is_ok()
            || self
                .mounts
                .iter()
                .find(|m| m.device == device)
                .is_some_and(|m| match &m.backend {
                    Backend::Native => native::dir_exists(bs, device, path),
                    Backend::Ext4(fs) => RawDisk::open(bs, device)
                        .map(|disk| fs.dir_exists(&disk, path))
                        .unwrap_or(false),
                })
    }
}

impl Default for Vfs {
    fn default() -> Self {
        Self::new()
    }
}

/// An owned buffer allocated from EFI pool memory, freed on drop.
pub struct PoolBuffer<'bs> {
    bs: BootServices<'bs>,
    ptr: *mut u8,
    len: usize,
}

impl<'bs> PoolBuffer<'bs> {
    pub(crate) fn new(bs: &BootServices<'bs>, ptr: *mut u8, len: usize) -> Self {
        Self { bs: *bs, ptr, len }
    }

    /// Borrows the buffer's contents.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        unsafe { core::slice::from_raw_parts(self.ptr, self.len) }
    }
}

impl Drop for PoolBuffer<'_> {
    fn drop(&mut self) {
        let _ = unsafe { self.bs.free_pool(self.ptr) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vfs_starts_with_no_mounts() {
        let vfs = Vfs::new();
        assert!(vfs.mounts.is_empty());
    }
}
