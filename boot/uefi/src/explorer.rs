//! Fallback file browser, invoked when the scanner finds nothing to boot
//! or a boot attempt fails before commit. Lets the user walk the
//! firmware-native filesystems directly and launch a `.efi` image by hand.
//!
//! Unlike the scanner, this only sees partitions firmware itself can
//! mount (`SimpleFileSystemProtocol`) — the built-in extent-tree reader
//! has no directory enumeration, only path lookup, so it can't back a
//! browser.

use core::fmt::Write as _;

use superboot_core::str8::FixedStr;
use superboot_efi::api::boot::BootServices;
use superboot_efi::api::fs::FileSystem;
use superboot_efi::api::{Boot, SimpleFileSystemId, SystemTable};
use superboot_efi::protocol::file::{FileAttributes, FileMode};
use superboot_efi::protocol::simple_text_input::scan_code;
use superboot_efi::EfiHandle;

const MAX_DEVICES: usize = 64;
const MAX_ENTRIES: usize = 128;
const MAX_NAME: usize = 256;
const MAX_PATH: usize = 512;

struct DirEntry {
    name: FixedStr<MAX_NAME>,
    is_dir: bool,
}

fn list_directory(
    fs: &FileSystem<'_>,
    path: &str,
    out: &mut [DirEntry; MAX_ENTRIES],
) -> Result<usize, superboot_efi::EfiStatus> {
    let root = fs.open_volume()?;
    let dir = root.open(path, FileMode::READ, FileAttributes::empty())?;

    let mut count = 0;
    let mut info_buf = [0u8; 1024];
    loop {
        // Each successful Read on a directory handle yields one child's
        // FileInfo; a zero-length read marks the end of the directory.
        let Ok(read) = dir.read(&mut info_buf) else {
            break;
        };
        if read == 0 {
            break;
        }
        let info = unsafe {
            &*(info_buf.as_ptr() as *const superboot_efi::protocol::file::FileInfo)
        };
        let mut name_buf = [0u8; MAX_NAME];
        let Some(len) = info.file_name_utf8(&mut name_buf) else {
            continue;
        };
        let Ok(name) = core::str::from_utf8(&name_buf[..len]) else {
            continue;
        };
        if name == "." || name == ".." {
            continue;
        }
        if count >= MAX_ENTRIES {
            break;
        }
        let mut entry_name = FixedStr::new();
        entry_name.push_str(name);
        out[count] = DirEntry {
            name: entry_name,
            is_dir: info.attribute & FileAttributes::DIRECTORY.bits() != 0,
        };
        count += 1;
    }
    Ok(count)
}

/// Runs the file browser until the user either launches an image
/// (does not return) or asks to back out (returns).
pub fn run(system_table: &SystemTable<Boot>) {
    let bs = system_table.boot_services();
    let mut console = system_table.console_out();
    let input = system_table.console_in();

    let mut devices = [core::ptr::null_mut(); MAX_DEVICES];
    let device_count = match bs.locate_handle_buffer::<SimpleFileSystemId>(&mut devices) {
        Ok(count) if count > 0 => count,
        _ => {
            let _ = console.output_string("explorer: no file systems found\n");
            return;
        }
    };

    let mut device_index = 0;
    let mut path = FixedStr::<MAX_PATH>::new();
    path.push_str("\\");
    let mut selected = 0usize;

    loop {
        let Ok(raw_fs) = bs.handle_protocol::<SimpleFileSystemId>(devices[device_index]) else {
            return;
        };
        let fs = FileSystem::new(raw_fs);

        let mut entries: [DirEntry; MAX_ENTRIES] =
            core::array::from_fn(|_| DirEntry { name: FixedStr::new(), is_dir: false });
        let count = list_directory(&fs, path.as_str(), &mut entries).unwrap_or(0);
        selected = selected.min(count.saturating_sub(1));

        draw(&mut console, path.as_str(), &entries[..count], selected, device_count, device_index);

        let key = crate::menu::wait_for_key(&bs, &input);
        match key.scan_code {
            scan_code::UP => selected = selected.saturating_sub(1),
            scan_code::DOWN => {
                if selected + 1 < count {
                    selected += 1;
                }
            }
            scan_code::ESC => return,
            _ if key.unicode_char == 0x09 => {
                device_index = (device_index + 1) % device_count;
                selected = 0;
            }
            _ if key.unicode_char == 0x08 => {
                pop_component(&mut path);
                selected = 0;
            }
            _ if key.unicode_char == 0x0D && count > 0 => {
                let entry = &entries[selected];
                if entry.is_dir {
                    push_component(&mut path, entry.name.as_str());
                    selected = 0;
                } else if ends_with_efi(entry.name.as_str()) {
                    let mut full = path;
                    push_component(&mut full, entry.name.as_str());
                    launch(&bs, device_index_handle(&devices, device_index), full.as_str(), &mut console);
                }
            }
            _ => {}
        }
    }
}

fn device_index_handle(devices: &[EfiHandle; MAX_DEVICES], index: usize) -> EfiHandle {
    devices[index]
}

fn ends_with_efi(name: &str) -> bool {
    name.len() >= 4 && name[name.len() - 4..].eq_ignore_ascii_case(".efi")
}

fn push_component(path: &mut FixedStr<MAX_PATH>, name: &str) {
    if !path.as_str().ends_with('\\') {
        path.push_str("\\");
    }
    path.push_str(name);
}

fn pop_component(path: &mut FixedStr<MAX_PATH>) {
    let trimmed = path.as_str().trim_end_matches('\\');
    let Some(idx) = trimmed.rfind('\\') else {
        return;
    };
    let mut new_path = FixedStr::new();
    if idx == 0 {
        new_path.push_str("\\");
    } else {
        new_path.push_str(&trimmed[..idx]);
    }
    *path = new_path;
}

/// Reads `path` off `device` and chain-loads it directly, bypassing the
/// VFS (the browser only ever sees firmware-native filesystems, so a
/// plain `File` read is enough). Only returns on failure.
fn launch(bs: &BootServices<'_>, device: EfiHandle, path: &str, console: &mut superboot_efi::api::Console<'_>) {
    let result = (|| -> Result<(), superboot_efi::EfiStatus> {
        let raw_fs = bs.handle_protocol::<SimpleFileSystemId>(device)?;
        let fs = FileSystem::new(raw_fs);
        let root = fs.open_volume()?;
        let file = root.open(path, FileMode::READ, FileAttributes::empty())?;

        let mut info_buf = [0u8; 1024];
        let size = usize::try_from(file.file_size(&mut info_buf)?)
            .map_err(|_| superboot_efi::EfiStatus::OUT_OF_RESOURCES)?;

        let buf = bs.allocate_pool(superboot_efi::memory::EfiMemoryType::LoaderData, size)?;
        let slice = unsafe { core::slice::from_raw_parts_mut(buf, size) };
        let mut read = 0;
        while read < size {
            let n = file.read(&mut slice[read..])?;
            if n == 0 {
                break;
            }
            read += n;
        }

        let image = bs.load_image(&slice[..read]);
        unsafe { bs.free_pool(buf) }.ok();
        bs.start_image(image?)
    })();

    if let Err(_status) = result {
        let _ = console.output_string("explorer: launch failed\n");
    }
}

fn draw(
    console: &mut superboot_efi::api::Console<'_>,
    path: &str,
    entries: &[DirEntry],
    selected: usize,
    device_count: usize,
    device_index: usize,
) {
    console.clear_screen().ok();
    console.set_cursor_position(0, 0).ok();
    let _ = console.output_string("SuperBoot file browser  (Tab: next device, Backspace: up, Esc: back)\n");
    let _ = write!(console, "device {device_index} of {device_count}  {path}\n\n");

    for (i, entry) in entries.iter().enumerate() {
        let marker = if i == selected { "> " } else { "  " };
        if entry.is_dir {
            let _ = write!(console, "{marker}[{}]\n", entry.name.as_str());
        } else {
            let _ = write!(console, "{marker}{}\n", entry.name.as_str());
        }
    }
}
