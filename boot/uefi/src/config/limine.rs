//! Limine config parser: `/Title` sections of indented `key: value` lines.
//!
//! ```text
//! timeout: 5
//!
//! /Arch Linux
//!     protocol: linux
//!     kernel_path: boot():/boot/vmlinuz-linux
//!     kernel_cmdline: root=UUID=xxxx rw
//!     module_path: boot():/boot/initramfs-linux.img
//! ```

use superboot_core::collections::{BootTargetVec, MAX_PATH};
use superboot_core::error::Error;
use superboot_core::str8::{self, FixedStr};
use superboot_efi::api::boot::BootServices;
use superboot_efi::EfiHandle;

use crate::entry::{BootTarget, ConfigType};
use crate::vfs::Vfs;

use super::ConfigParserDesc;

pub const PARSER: ConfigParserDesc = ConfigParserDesc {
    name: "Limine",
    config_type: ConfigType::Limine,
    config_paths: &[
        "\\limine.cfg",
        "\\boot\\limine\\limine.cfg",
        "\\EFI\\BOOT\\limine.cfg",
    ],
    parse,
};

/// Strips a `boot():`/`guid(...):` device prefix and converts `/` to `\`,
/// rooting the result at the volume if it wasn't already.
fn translate_path(raw: &str, dst: &mut FixedStr<MAX_PATH>) {
    let body = match str8::find(raw.as_bytes(), b"):") {
        Some(pos) => &raw[pos + 2..],
        None => raw,
    };
    if !body.starts_with('/') && !body.starts_with('\\') {
        dst.push_str("\\");
    }
    for ch in body.chars() {
        if ch == '/' {
            dst.push_str("\\");
        } else {
            let mut buf = [0u8; 4];
            dst.push_str(ch.encode_utf8(&mut buf));
        }
    }
}

fn flush(
    cur: Option<BootTarget>,
    out: &mut BootTargetVec<BootTarget>,
) -> Result<(), Error> {
    let Some(target) = cur else {
        return Ok(());
    };
    if target.is_bootable() {
        out.try_push(target).map_err(|_| Error::OutOfResources)?;
    }
    Ok(())
}

fn parse(
    text: &str,
    device: EfiHandle,
    config_path: &str,
    _bs: &BootServices<'_>,
    _vfs: &mut Vfs,
    out: &mut BootTargetVec<BootTarget>,
) -> Result<(), Error> {
    parse_text(text, device, config_path, out)
}

fn parse_text(
    text: &str,
    device: EfiHandle,
    config_path: &str,
    out: &mut BootTargetVec<BootTarget>,
) -> Result<(), Error> {
    let mut cur: Option<BootTarget> = None;

    for raw_line in str8::lines(text.as_bytes()) {
        let trimmed = core::str::from_utf8(str8::trim(raw_line)).unwrap_or("");
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(title) = trimmed.strip_prefix('/') {
            flush(cur.take(), out)?;
            if out.is_full() {
                break;
            }
            let mut target = BootTarget::new(device, ConfigType::Limine, config_path);
            target.title.push_str(title);
            cur = Some(target);
            continue;
        }

        let Some(target) = cur.as_mut() else {
            continue;
        };

        let Some(colon) = trimmed.find(':') else {
            continue;
        };
        let key = trimmed[..colon].trim();
        let value = trimmed[colon + 1..].trim();

        match key {
            "kernel_path" => translate_path(value, &mut target.kernel_path),
            "kernel_cmdline" | "cmdline" => target.cmdline.push_str(value),
            "module_path" => {
                if target.initrd_count < target.initrd_paths.len() {
                    let slot = &mut target.initrd_paths[target.initrd_count];
                    translate_path(value, slot);
                    target.initrd_count += 1;
                }
            }
            "protocol" => {
                if value == "chainload" {
                    target.is_chainload = true;
                }
            }
            "path" | "image_path" => {
                translate_path(value, &mut target.efi_path);
                target.is_chainload = true;
            }
            _ => {}
        }
    }

    flush(cur, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_handle() -> EfiHandle {
        core::ptr::null_mut()
    }

    #[test]
    fn translate_path_strips_device_prefix_and_flips_slashes() {
        let mut dst: FixedStr<MAX_PATH> = FixedStr::new();
        translate_path("boot():/boot/vmlinuz-linux", &mut dst);
        assert_eq!(dst.as_str(), "\\boot\\vmlinuz-linux");
    }

    #[test]
    fn translate_path_roots_a_bare_relative_path() {
        let mut dst: FixedStr<MAX_PATH> = FixedStr::new();
        translate_path("boot/vmlinuz", &mut dst);
        assert_eq!(dst.as_str(), "\\boot\\vmlinuz");
    }

    #[test]
    fn parses_a_single_section() {
        let text = "timeout: 5\n\n/Arch Linux\n    protocol: linux\n    kernel_path: boot():/boot/vmlinuz-linux\n    kernel_cmdline: root=UUID=xxxx rw\n    module_path: boot():/boot/initramfs-linux.img\n";
        let mut out: BootTargetVec<BootTarget> = BootTargetVec::new();
        parse_text(text, dummy_handle(), "\\limine.cfg", &mut out).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title.as_str(), "Arch Linux");
        assert_eq!(out[0].kernel_path.as_str(), "\\boot\\vmlinuz-linux");
        assert_eq!(out[0].initrd_count, 1);
        assert_eq!(out[0].initrd_paths[0].as_str(), "\\boot\\initramfs-linux.img");
        assert_eq!(out[0].cmdline.as_str(), "root=UUID=xxxx rw");
    }

    #[test]
    fn a_section_without_kernel_or_chainload_is_dropped() {
        let text = "/Incomplete\n    protocol: linux\n";
        let mut out: BootTargetVec<BootTarget> = BootTargetVec::new();
        parse_text(text, dummy_handle(), "\\limine.cfg", &mut out).unwrap();
        assert!(out.is_empty());
    }
}
