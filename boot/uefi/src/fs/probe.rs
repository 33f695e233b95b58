//! Filesystem signature probes.
//!
//! Each probe reads the smallest region of the disk that carries its
//! filesystem's magic and reports whether it matched, without building any
//! in-memory filesystem state. Only ext4 has a mountable driver; the rest
//! exist so the scanner can name an unsupported partition in diagnostics
//! instead of silently skipping it.

use superboot_core::error::Error;

use crate::vfs::RawDisk;

const EXT4_SUPERBLOCK_OFFSET: u64 = 1024;
const EXT4_SUPER_MAGIC: u16 = 0xEF53;

const BTRFS_SUPERBLOCK_OFFSET: u64 = 0x1_0000;
const BTRFS_MAGIC: &[u8; 8] = b"_BHRfS_M";

const XFS_MAGIC: &[u8; 4] = b"XFSB";

const NTFS_OEM_OFFSET: u64 = 3;
const NTFS_OEM_ID: &[u8; 8] = b"NTFS    ";

/// `true` if `disk` carries an ext2/ext3/ext4 superblock.
pub fn is_ext4(disk: &RawDisk) -> Result<bool, Error> {
    let mut buf = [0u8; 2];
    disk.read_at(EXT4_SUPERBLOCK_OFFSET + 56, &mut buf)?;
    Ok(u16::from_le_bytes(buf) == EXT4_SUPER_MAGIC)
}

/// `true` if `disk` carries a btrfs superblock. Detection only: SuperBoot
/// has no btrfs reader.
pub fn is_btrfs(disk: &RawDisk) -> Result<bool, Error> {
    let mut buf = [0u8; 8];
    disk.read_at(BTRFS_SUPERBLOCK_OFFSET + 0x40, &mut buf)?;
    Ok(&buf == BTRFS_MAGIC)
}

/// `true` if `disk` carries an XFS superblock. Detection only: SuperBoot
/// has no XFS reader.
pub fn is_xfs(disk: &RawDisk) -> Result<bool, Error> {
    let mut buf = [0u8; 4];
    disk.read_at(0, &mut buf)?;
    Ok(&buf == XFS_MAGIC)
}

/// `true` if `disk` carries an NTFS boot sector. Detection only: SuperBoot
/// has no NTFS reader.
pub fn is_ntfs(disk: &RawDisk) -> Result<bool, Error> {
    let mut buf = [0u8; 8];
    disk.read_at(NTFS_OEM_OFFSET, &mut buf)?;
    Ok(&buf == NTFS_OEM_ID)
}
