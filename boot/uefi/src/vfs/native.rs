//! Native-path helpers: reading files and enumerating directories through
//! firmware's own `SimpleFileSystemProtocol`, used when a device already has
//! a filesystem driver installed (almost always FAT on the ESP).

use superboot_core::error::Error;
use superboot_core::str8::FixedStr;
use superboot_efi::api::boot::BootServices;
use superboot_efi::api::fs::{File, FileSystem};
use superboot_efi::api::SimpleFileSystemId;
use superboot_efi::protocol::file::{FileAttributes, FileMode};
use superboot_efi::EfiHandle;

use super::PoolBuffer;

pub(crate) fn open_native<'st>(
    bs: &BootServices<'st>,
    device: EfiHandle,
) -> Result<FileSystem<'st>, Error> {
    let raw = bs
        .handle_protocol::<SimpleFileSystemId>(device)
        .map_err(Error::from)?;
    Ok(FileSystem::new(raw))
}

/// Opens `path` (`\`-separated, rooted at the volume root) relative to a
/// directory handle, walking one path component at a time since the File
/// Protocol's `open` only resolves a single relative path string at a time
/// in practice-portable firmware.
pub(crate) fn open_dir<'st>(root: &File<'st>, path: &str) -> Result<File<'st>, Error> {
    open_path(root, path, FileAttributes::DIRECTORY)
}

fn open_path<'st>(
    root: &File<'st>,
    path: &str,
    attributes: FileAttributes,
) -> Result<File<'st>, Error> {
    root.open(path, FileMode::READ, attributes)
        .map_err(Error::from)
}

/// Lists the non-`.`/`..` entries of an open directory.
pub(crate) fn list_dir(dir: &File<'_>) -> impl Iterator<Item = FixedStr<256>> + '_ {
    core::iter::from_fn(move || {
        let mut buf = [0u8; 512];
        loop {
            let read = dir.read(&mut buf).ok()?;
            if read == 0 {
                return None;
            }
            let info = unsafe { &*(buf.as_ptr().cast::<superboot_efi::protocol::file::FileInfo>()) };
            let name_ptr = (&info.file_name) as *const [u16; 1] as *const u16;
            let name_wide = unsafe { core::slice::from_raw_parts(name_ptr, 255) };
            let mut narrow = [0u8; 256];
            let Some(n) = superboot_core::str8::ucs2_to_utf8(name_wide, &mut narrow) else {
                continue;
            };
            let name = core::str::from_utf8(&narrow[..n]).unwrap_or("");
            if name == "." || name == ".." {
                continue;
            }
            let mut out: FixedStr<256> = FixedStr::new();
            out.push_str(name);
            return Some(out);
        }
    })
}

/// Reads an entire file's contents into EFI pool memory.
pub(crate) fn read_file<'st>(
    bs: &BootServices<'st>,
    device: EfiHandle,
    path: &str,
) -> Result<PoolBuffer<'st>, Error> {
    let fs = open_native(bs, device)?;
    let root = fs.open_volume().map_err(Error::from)?;
    let file = root
        .open(path, FileMode::READ, FileAttributes::empty())
        .map_err(Error::from)?;

    let mut info_buf = [0u8; 512];
    let size = file.file_size(&mut info_buf).map_err(Error::from)?;
    let size = size as usize;

    // One extra byte for a trailing NUL past the file's reported size, so
    // callers that treat the buffer as a C string never read past the
    // allocation.
    let buffer = bs
        .allocate_pool(superboot_efi::memory::EfiMemoryType::LoaderData, size + 1)
        .map_err(Error::from)?;
    let slice = unsafe { core::slice::from_raw_parts_mut(buffer, size) };
    let read = file.read(slice).map_err(Error::from)?;
    if read != size {
        let _ = unsafe { bs.free_pool(buffer) };
        return Err(Error::VolumeCorrupted);
    }
    unsafe { *buffer.add(size) = 0 };

    Ok(PoolBuffer::new(bs, buffer, size))
}

/// `true` if `path` resolves to an existing file or directory.
pub(crate) fn dir_exists(bs: &BootServices<'_>, device: EfiHandle, path: &str) -> bool {
    let Ok(fs) = open_native(bs, device) else {
        return false;
    };
    let Ok(root) = fs.open_volume() else {
        return false;
    };
    open_path(&root, path, FileAttributes::empty()).is_ok()
}
