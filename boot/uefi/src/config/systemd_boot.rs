//! systemd-boot config parser: `loader.conf` (global `default` pattern) plus
//! one `key value` file per entry under `\loader\entries\*.conf`.
//!
//! Unlike the other two formats, a single `loader.conf` doesn't carry the
//! boot entries itself — they live in sibling files this parser must
//! enumerate directly through the VFS's native path, which is why `parse`
//! is the one format that actually uses its `bs`/`vfs` parameters.

use superboot_core::collections::{BootTargetVec, MAX_PATH};
use superboot_core::error::Error;
use superboot_core::str8::{self, FixedStr};
use superboot_efi::api::boot::BootServices;
use superboot_efi::EfiHandle;

use crate::entry::{BootTarget, ConfigType};
use crate::vfs::{native, Vfs};

use super::ConfigParserDesc;

pub const PARSER: ConfigParserDesc = ConfigParserDesc {
    name: "systemd-boot",
    config_type: ConfigType::SystemdBoot,
    config_paths: &["\\loader\\loader.conf"],
    parse,
};

const ENTRIES_DIR: &str = "\\loader\\entries";

fn forward_to_back_slashes(dst: &mut FixedStr<MAX_PATH>) {
    // FixedStr has no in-place mutation beyond append, so rebuild it.
    let mut fixed: FixedStr<MAX_PATH> = FixedStr::new();
    for ch in dst.as_str().chars() {
        let mut buf = [0u8; 4];
        fixed.push_str(if ch == '/' { "\\" } else { ch.encode_utf8(&mut buf) });
    }
    *dst = fixed;
}

/// Parses one `\loader\entries\*.conf` file's contents into `target`.
fn parse_entry_text(text: &str, device: EfiHandle, config_path: &str) -> BootTarget {
    let mut target = BootTarget::new(device, ConfigType::SystemdBoot, config_path);

    for raw_line in str8::lines(text.as_bytes()) {
        let trimmed = core::str::from_utf8(str8::trim(raw_line)).unwrap_or("");
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some(split) = trimmed.find(|c: char| c == ' ' || c == '\t') else {
            continue;
        };
        let key = &trimmed[..split];
        let value = trimmed[split..].trim();

        match key {
            "title" => target.title.push_str(value),
            "linux" => {
                target.kernel_path.push_str(value);
                forward_to_back_slashes(&mut target.kernel_path);
            }
            "initrd" => {
                if target.initrd_count < target.initrd_paths.len() {
                    let slot = &mut target.initrd_paths[target.initrd_count];
                    slot.push_str(value);
                    forward_to_back_slashes(slot);
                    target.initrd_count += 1;
                }
            }
            "options" => target.cmdline.push_str(value),
            "efi" => {
                target.efi_path.push_str(value);
                forward_to_back_slashes(&mut target.efi_path);
                target.is_chainload = true;
            }
            _ => {}
        }
    }

    target
}

/// Finds the `default` line in `loader.conf`, if any.
fn default_pattern(loader_conf: &str) -> Option<&str> {
    for raw_line in str8::lines(loader_conf.as_bytes()) {
        let trimmed = core::str::from_utf8(str8::trim(raw_line)).unwrap_or("");
        if let Some(rest) = trimmed.strip_prefix("default") {
            let rest = rest.trim();
            if !rest.is_empty() {
                return Some(rest);
            }
        }
    }
    None
}

fn parse(
    loader_conf: &str,
    device: EfiHandle,
    _config_path: &str,
    bs: &BootServices<'_>,
    _vfs: &mut Vfs,
    out: &mut BootTargetVec<BootTarget>,
) -> Result<(), Error> {
    let default = default_pattern(loader_conf);

    let Ok(fs) = native::open_native(bs, device) else {
        return Ok(());
    };
    let Ok(root) = fs.open_volume() else {
        return Ok(());
    };
    let Ok(entries_dir) = native::open_dir(&root, ENTRIES_DIR) else {
        return Ok(());
    };

    for name in native::list_dir(&entries_dir) {
        if out.is_full() {
            break;
        }
        let name = name.as_str();
        if name.len() < 6 || !name.ends_with(".conf") {
            continue;
        }

        let mut entry_path: FixedStr<MAX_PATH> = FixedStr::new();
        entry_path.push_str(ENTRIES_DIR);
        entry_path.push_str("\\");
        entry_path.push_str(name);

        let Ok(buffer) = native::read_file(bs, device, entry_path.as_str()) else {
            continue;
        };
        let text = core::str::from_utf8(buffer.as_slice()).unwrap_or("");

        let mut target = parse_entry_text(text, device, entry_path.as_str());
        target.index = out.len() as u32;
        if let Some(pattern) = default {
            if name.contains(pattern) {
                target.is_default = true;
            }
        }

        if target.is_bootable() {
            out.try_push(target).map_err(|_| Error::OutOfResources)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_handle() -> EfiHandle {
        core::ptr::null_mut()
    }

    #[test]
    fn parses_entry_keys() {
        let text = "title    Arch Linux\nlinux    /vmlinuz-linux\ninitrd   /initramfs-linux.img\noptions  root=UUID=xxxx rw quiet\n";
        let target = parse_entry_text(text, dummy_handle(), "\\loader\\entries\\arch.conf");
        assert_eq!(target.title.as_str(), "Arch Linux");
        assert_eq!(target.kernel_path.as_str(), "\\vmlinuz-linux");
        assert_eq!(target.initrd_paths[0].as_str(), "\\initramfs-linux.img");
        assert_eq!(target.cmdline.as_str(), "root=UUID=xxxx rw quiet");
        assert!(target.is_bootable());
    }

    #[test]
    fn efi_key_marks_chainload() {
        let text = "title   Windows\nefi     /EFI/Microsoft/Boot/bootmgfw.efi\n";
        let target = parse_entry_text(text, dummy_handle(), "\\loader\\entries\\windows.conf");
        assert!(target.is_chainload);
        assert_eq!(target.efi_path.as_str(), "\\EFI\\Microsoft\\Boot\\bootmgfw.efi");
    }

    #[test]
    fn default_pattern_extracts_value() {
        assert_eq!(default_pattern("timeout 5\ndefault arch*\n"), Some("arch*"));
        assert_eq!(default_pattern("timeout 5\n"), None);
    }
}
