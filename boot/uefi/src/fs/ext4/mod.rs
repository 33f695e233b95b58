//! Read-only ext4 reader.
//!
//! Supports ext2/ext3/ext4 with the same narrowing the original driver
//! accepted: no write, no journal replay, no encryption, no inline data,
//! extent-mapped regular files and directories only. Block sizes above 4 KiB
//! (bigalloc filesystems) are rejected as unsupported rather than sized for,
//! since virtually every ext4 volume SuperBoot will ever see uses 4 KiB
//! blocks.

use superboot_core::error::Error;
use superboot_efi::api::boot::BootServices;

use crate::vfs::{PoolBuffer, RawDisk};

const SUPERBLOCK_OFFSET: u64 = 1024;
const SUPER_MAGIC: u16 = 0xEF53;
const ROOT_INO: u32 = 2;
const EXTENT_MAGIC: u16 = 0xF30A;
const MAX_BLOCK_SIZE: usize = 4096;
const MAX_INODE_SIZE: usize = 256;

struct Superblock {
    log_block_size: u32,
    blocks_per_group: u32,
    inodes_per_group: u32,
    first_data_block: u32,
    rev_level: u32,
    inode_size: u16,
}

impl Superblock {
    fn parse(buf: &[u8]) -> Result<Self, Error> {
        let magic = u16::from_le_bytes([buf[56], buf[57]]);
        if magic != SUPER_MAGIC {
            return Err(Error::Unsupported);
        }
        let rev_level = u32::from_le_bytes(buf[76..80].try_into().unwrap());
        let inode_size = if rev_level >= 1 {
            u16::from_le_bytes([buf[88], buf[89]])
        } else {
            128
        };
        Ok(Self {
            log_block_size: u32::from_le_bytes(buf[24..28].try_into().unwrap()),
            blocks_per_group: u32::from_le_bytes(buf[32..36].try_into().unwrap()),
            inodes_per_group: u32::from_le_bytes(buf[40..44].try_into().unwrap()),
            first_data_block: u32::from_le_bytes(buf[20..24].try_into().unwrap()),
            rev_level,
            inode_size,
        })
    }
}

/// A mounted ext4 volume.
pub struct Ext4Fs {
    block_size: u32,
    inodes_per_group: u32,
    first_data_block: u32,
    inode_size: u16,
    group_desc_size: u32,
}

impl Ext4Fs {
    /// Reads the superblock and mounts `disk` if it carries a valid ext4
    /// signature.
    pub fn mount(disk: &RawDisk) -> Result<Self, Error> {
        let mut sb_buf = [0u8; 204];
        disk.read_at(SUPERBLOCK_OFFSET, &mut sb_buf)?;
        let sb = Superblock::parse(&sb_buf)?;

        let block_size = 1024u32 << sb.log_block_size;
        if block_size as usize > MAX_BLOCK_SIZE {
            return Err(Error::Unsupported);
        }

        Ok(Self {
            block_size,
            inodes_per_group: sb.inodes_per_group,
            first_data_block: sb.first_data_block,
            inode_size: sb.inode_size,
            group_desc_size: 32,
        })
    }

    fn read_block(&self, disk: &RawDisk, block: u64, buf: &mut [u8]) -> Result<(), Error> {
        disk.read_at(block * u64::from(self.block_size), buf)
    }

    fn read_inode(&self, disk: &RawDisk, ino: u32, buf: &mut [u8]) -> Result<(), Error> {
        let group = (ino - 1) / self.inodes_per_group;
        let index = (ino - 1) % self.inodes_per_group;

        let gd_offset = u64::from(self.first_data_block + 1) * u64::from(self.block_size)
            + u64::from(group) * u64::from(self.group_desc_size);
        let mut gd_buf = [0u8; 32];
        disk.read_at(gd_offset, &mut gd_buf)?;
        let inode_table = u32::from_le_bytes(gd_buf[8..12].try_into().unwrap());

        let inode_offset = u64::from(inode_table) * u64::from(self.block_size)
            + u64::from(index) * u64::from(self.inode_size);
        disk.read_at(inode_offset, &mut buf[..self.inode_size as usize])
    }

    /// Reads `file_size` bytes of extent-mapped data described by an
    /// inode's `i_block` field into `dst`.
    fn read_extents(
        &self,
        disk: &RawDisk,
        i_block: &[u8],
        file_size: u64,
        dst: &mut [u8],
    ) -> Result<(), Error> {
        let magic = u16::from_le_bytes([i_block[0], i_block[1]]);
        if magic != EXTENT_MAGIC {
            return Err(Error::VolumeCorrupted);
        }
        let entries = u16::from_le_bytes([i_block[2], i_block[3]]);
        let depth = u16::from_le_bytes([i_block[6], i_block[7]]);
        if depth != 0 {
            return Err(Error::Unsupported);
        }

        let mut block_buf = [0u8; MAX_BLOCK_SIZE];
        let block_size = self.block_size as usize;
        let mut remaining = file_size as usize;
        let mut written = 0usize;

        for i in 0..entries as usize {
            if remaining == 0 {
                break;
            }
            let base = 12 + i * 12;
            let ee = &i_block[base..base + 12];
            let start_hi = u16::from_le_bytes([ee[6], ee[7]]);
            let start_lo = u32::from_le_bytes(ee[8..12].try_into().unwrap());
            let phys_block = (u64::from(start_hi) << 32) | u64::from(start_lo);
            let mut len_blocks = u16::from_le_bytes([ee[4], ee[5]]);
            if len_blocks > 32768 {
                len_blocks -= 32768;
            }

            for b in 0..u64::from(len_blocks) {
                if remaining == 0 {
                    break;
                }
                self.read_block(disk, phys_block + b, &mut block_buf[..block_size])?;
                let take = remaining.min(block_size);
                dst[written..written + take].copy_from_slice(&block_buf[..take]);
                written += take;
                remaining -= take;
            }
        }

        Ok(())
    }

    fn inode_size_bytes(&self, buf: &[u8]) -> u64 {
        let size_lo = u32::from_le_bytes(buf[4..8].try_into().unwrap());
        let size_high = u32::from_le_bytes(buf[108..112].try_into().unwrap());
        (u64::from(size_high) << 32) | u64::from(size_lo)
    }

    fn dir_lookup(&self, disk: &RawDisk, dir_inode: &[u8], name: &str) -> Result<u32, Error> {
        let dir_size = self.inode_size_bytes(dir_inode);
        let i_block = &dir_inode[40..100];

        let mut block_buf = [0u8; MAX_BLOCK_SIZE];
        let block_size = self.block_size as usize;
        let magic = u16::from_le_bytes([i_block[0], i_block[1]]);
        if magic != EXTENT_MAGIC {
            return Err(Error::VolumeCorrupted);
        }
        let entries = u16::from_le_bytes([i_block[2], i_block[3]]);
        let depth = u16::from_le_bytes([i_block[6], i_block[7]]);
        if depth != 0 {
            return Err(Error::Unsupported);
        }

        let mut remaining = dir_size;
        for i in 0..entries as usize {
            if remaining == 0 {
                break;
            }
            let base = 12 + i * 12;
            let ee = &i_block[base..base + 12];
            let start_hi = u16::from_le_bytes([ee[6], ee[7]]);
            let start_lo = u32::from_le_bytes(ee[8..12].try_into().unwrap());
            let phys_block = (u64::from(start_hi) << 32) | u64::from(start_lo);
            let mut len_blocks = u16::from_le_bytes([ee[4], ee[5]]);
            if len_blocks > 32768 {
                len_blocks -= 32768;
            }

            for b in 0..u64::from(len_blocks) {
                if remaining == 0 {
                    break;
                }
                self.read_block(disk, phys_block + b, &mut block_buf[..block_size])?;
                let this_block = (remaining as usize).min(block_size);
                remaining -= this_block as u64;

                let mut pos = 0usize;
                while pos + 8 <= this_block {
                    let entry_inode =
                        u32::from_le_bytes(block_buf[pos..pos + 4].try_into().unwrap());
                    let rec_len = u16::from_le_bytes([block_buf[pos + 4], block_buf[pos + 5]]) as usize;
                    if rec_len == 0 {
                        break;
                    }
                    if rec_len % 4 != 0 {
                        return Err(Error::VolumeCorrupted);
                    }
                    let name_len = block_buf[pos + 6] as usize;
                    if pos + 8 + name_len > this_block {
                        return Err(Error::VolumeCorrupted);
                    }
                    let entry_name = &block_buf[pos + 8..pos + 8 + name_len];
                    if entry_inode != 0
                        && name_len == name.len()
                        && entry_name == name.as_bytes()
                    {
                        return Ok(entry_inode);
                    }
                    pos += rec_len;
                }
            }
        }

        Err(Error::NotFound)
    }

    fn resolve_path(&self, disk: &RawDisk, path: &str) -> Result<u32, Error> {
        let mut ino = ROOT_INO;
        let mut inode_buf = [0u8; MAX_INODE_SIZE];

        for component in path.trim_matches('/').split('/') {
            if component.is_empty() {
                continue;
            }
            self.read_inode(disk, ino, &mut inode_buf)?;
            let dir_slice = &inode_buf[..self.inode_size as usize];
            let flags = u32::from_le_bytes(dir_slice[32..36].try_into().unwrap());
            if flags & 0x0008_0000 == 0 {
                return Err(Error::Unsupported);
            }
            ino = self.dir_lookup(disk, dir_slice, component)?;
        }

        Ok(ino)
    }

    /// Reads the full contents of `path` (forward- or back-slash separated)
    /// into newly allocated pool memory.
    pub fn read_file<'st>(
        &self,
        disk: &RawDisk,
        path: &str,
        bs: &BootServices<'st>,
    ) -> Result<PoolBuffer<'st>, Error> {
        let mut normalized = [0u8; superboot_core::collections::MAX_PATH];
        let path = normalize_path(path, &mut normalized);

        let ino = self.resolve_path(disk, path)?;
        let mut inode_buf = [0u8; MAX_INODE_SIZE];
        self.read_inode(disk, ino, &mut inode_buf)?;
        let inode_slice = &inode_buf[..self.inode_size as usize];
        let flags = u32::from_le_bytes(inode_slice[32..36].try_into().unwrap());
        if flags & 0x0008_0000 == 0 {
            return Err(Error::Unsupported);
        }

        let size = self.inode_size_bytes(inode_slice) as usize;
        // One extra byte for a trailing NUL past the reported size, so
        // callers that treat the buffer as a C string never read past the
        // allocation.
        let buffer = bs
            .allocate_pool(superboot_efi::memory::EfiMemoryType::LoaderData, size + 1)
            .map_err(Error::from)?;
        let dst = unsafe { core::slice::from_raw_parts_mut(buffer, size) };

        if let Err(err) = self.read_extents(disk, &inode_slice[40..100], size as u64, dst) {
            let _ = unsafe { bs.free_pool(buffer) };
            return Err(err);
        }
        unsafe { *buffer.add(size) = 0 };

        Ok(PoolBuffer::new(bs, buffer, size))
    }

    /// `true` if `path` resolves to any inode (file or directory).
    #[must_use]
    pub fn dir_exists(&self, disk: &RawDisk, path: &str) -> bool {
        let mut normalized = [0u8; superboot_core::collections::MAX_PATH];
        let path = normalize_path(path, &mut normalized);
        self.resolve_path(disk, path).is_ok()
    }
}

/// Ext4 paths are `/`-separated; firmware paths arrive `\`-separated.
fn normalize_path<'a>(path: &str, out: &'a mut [u8]) -> &'a str {
    let bytes = path.as_bytes();
    let n = bytes.len().min(out.len());
    out[..n].copy_from_slice(&bytes[..n]);
    for b in &mut out[..n] {
        if *b == b'\\' {
            *b = b'/';
        }
    }
    core::str::from_utf8(&out[..n]).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn superblock_buf(log_block_size: u32, rev_level: u32, inode_size: u16) -> [u8; 204] {
        let mut buf = [0u8; 204];
        buf[20..24].copy_from_slice(&1u32.to_le_bytes()); // first_data_block
        buf[24..28].copy_from_slice(&log_block_size.to_le_bytes());
        buf[32..36].copy_from_slice(&8192u32.to_le_bytes()); // blocks_per_group
        buf[40..44].copy_from_slice(&2048u32.to_le_bytes()); // inodes_per_group
        buf[56..58].copy_from_slice(&SUPER_MAGIC.to_le_bytes());
        buf[76..80].copy_from_slice(&rev_level.to_le_bytes());
        buf[88..90].copy_from_slice(&inode_size.to_le_bytes());
        buf
    }

    #[test]
    fn superblock_parse_rejects_bad_magic() {
        let mut buf = superblock_buf(0, 1, 256);
        buf[56] = 0;
        assert_eq!(Superblock::parse(&buf).unwrap_err(), Error::Unsupported);
    }

    #[test]
    fn superblock_parse_reads_dynamic_inode_size() {
        let buf = superblock_buf(2, 1, 256);
        let sb = Superblock::parse(&buf).unwrap();
        assert_eq!(sb.log_block_size, 2);
        assert_eq!(sb.inode_size, 256);
        assert_eq!(sb.blocks_per_group, 8192);
        assert_eq!(sb.inodes_per_group, 2048);
    }

    #[test]
    fn superblock_parse_defaults_inode_size_for_rev0() {
        let buf = superblock_buf(0, 0, 0);
        let sb = Superblock::parse(&buf).unwrap();
        assert_eq!(sb.inode_size, 128);
    }

    #[test]
    fn normalize_path_rewrites_backslashes() {
        let mut out = [0u8; 64];
        assert_eq!(normalize_path(r"\boot\vmlinuz-linux", &mut out), "/boot/vmlinuz-linux");
    }

    #[test]
    fn normalize_path_leaves_forward_slashes_alone() {
        let mut out = [0u8; 64];
        assert_eq!(normalize_path("/boot/initramfs.img", &mut out), "/boot/initramfs.img");
    }

    #[test]
    fn normalize_path_truncates_to_buffer_len() {
        let mut out = [0u8; 4];
        assert_eq!(normalize_path("/abcdef", &mut out), "/abc");
    }
}
