//! GRUB-style menu script parser (`grub.cfg`).
//!
//! No `grub.c` exists in the retained reference sources — `sb_parser_grub`
//! is declared and registered but its body was never captured. Implemented
//! from the `GrubVarTable`/`GrubVar` variable-table ABI and the documented
//! subset: `set name=value`, `menuentry "title" { ... }` blocks containing
//! `linux`/`initrd`/`chainloader` directives, and `$var`/`${var}`
//! interpolation against the variable table. No nesting, conditionals, or
//! functions.

use superboot_core::collections::{BootTargetVec, GrubVarVec, MAX_CMDLINE, MAX_PATH};
use superboot_core::error::Error;
use superboot_core::str8::{self, FixedStr};
use superboot_efi::api::boot::BootServices;
use superboot_efi::EfiHandle;

use crate::entry::{BootTarget, ConfigType};
use crate::vfs::Vfs;

use super::ConfigParserDesc;

pub const PARSER: ConfigParserDesc = ConfigParserDesc {
    name: "GRUB",
    config_type: ConfigType::Grub,
    config_paths: &["\\boot\\grub\\grub.cfg", "\\grub\\grub.cfg", "\\grub2\\grub.cfg"],
    parse,
};

struct GrubVar {
    name: FixedStr<64>,
    value: FixedStr<MAX_CMDLINE>,
}

struct VarTable {
    entries: GrubVarVec<GrubVar>,
}

impl VarTable {
    fn new() -> Self {
        Self {
            entries: GrubVarVec::new(),
        }
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|v| v.name.as_str() == name)
            .map(|v| v.value.as_str())
    }

    fn set(&mut self, name: &str, value: &str) {
        if let Some(existing) = self.entries.iter_mut().find(|v| v.name.as_str() == name) {
            existing.value.clear();
            existing.value.push_str(value);
            return;
        }
        let mut entry = GrubVar {
            name: FixedStr::new(),
            value: FixedStr::new(),
        };
        entry.name.push_str(name);
        entry.value.push_str(value);
        let _ = self.entries.try_push(entry);
    }

    /// Expands `$var` and `${var}` references in `src`, writing the result
    /// into `dst`. Unknown variables expand to nothing, matching shell
    /// parameter expansion of an unset variable.
    fn expand(&self, src: &str, dst: &mut FixedStr<MAX_CMDLINE>) {
        let mut chars = src.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch != '$' {
                let mut buf = [0u8; 4];
                dst.push_str(ch.encode_utf8(&mut buf));
                continue;
            }

            let braced = chars.peek() == Some(&'{');
            if braced {
                chars.next();
            }
            let mut name: FixedStr<64> = FixedStr::new();
            while let Some(&c) = chars.peek() {
                let is_name_char = c.is_ascii_alphanumeric() || c == '_';
                if braced {
                    if c == '}' {
                        chars.next();
                        break;
                    }
                } else if !is_name_char {
                    break;
                }
                name.push_str(core::str::from_utf8(&[c as u8]).unwrap_or(""));
                chars.next();
            }
            if let Some(value) = self.get(name.as_str()) {
                dst.push_str(value);
            }
        }
    }
}

/// Strips a leading `(device)` specifier and converts `/` to `\`.
fn translate_path(raw: &str, dst: &mut FixedStr<MAX_PATH>) {
    let body = if raw.starts_with('(') {
        str8::find(raw.as_bytes(), b")")
            .map(|pos| &raw[pos + 1..])
            .unwrap_or(raw)
    } else {
        raw
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

fn quoted_title(rest: &str) -> &str {
    let rest = rest.trim_start();
    let Some(rest) = rest.strip_prefix('"').or_else(|| rest.strip_prefix('\'')) else {
        return rest.split(['{', ' ']).next().unwrap_or("");
    };
    rest.split(['"', '\'']).next().unwrap_or("")
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
    let mut vars = VarTable::new();
    let mut cur: Option<BootTarget> = None;

    for raw_line in str8::lines(text.as_bytes()) {
        let trimmed = core::str::from_utf8(str8::trim(raw_line)).unwrap_or("");
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if trimmed == "}" {
            if let Some(target) = cur.take() {
                if target.is_bootable() && !out.is_full() {
                    out.try_push(target).map_err(|_| Error::OutOfResources)?;
                }
            }
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("set ") {
            let rest = rest.trim_start();
            if let Some(eq) = rest.find('=') {
                let name = rest[..eq].trim();
                let mut value: FixedStr<MAX_CMDLINE> = FixedStr::new();
                vars.expand(rest[eq + 1..].trim(), &mut value);
                vars.set(name, value.as_str());
            }
            continue;
        }

        if trimmed.starts_with("menuentry") {
            if cur.is_none() && !out.is_full() {
                let title = quoted_title(&trimmed["menuentry".len()..]);
                let mut target = BootTarget::new(device, ConfigType::Grub, config_path);
                target.title.push_str(title);
                cur = Some(target);
            }
            continue;
        }

        let Some(target) = cur.as_mut() else {
            continue;
        };

        let Some(split) = trimmed.find(char::is_whitespace) else {
            continue;
        };
        let directive = &trimmed[..split];
        let mut args: FixedStr<MAX_CMDLINE> = FixedStr::new();
        vars.expand(trimmed[split..].trim(), &mut args);
        let args = args.as_str();

        match directive {
            "linux" | "linux16" | "linuxefi" => {
                let (path, cmdline) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
                translate_path(path, &mut target.kernel_path);
                target.cmdline.push_str(cmdline.trim_start());
            }
            "initrd" | "initrdefi" => {
                for path in args.split_whitespace() {
                    if target.initrd_count < target.initrd_paths.len() {
                        let slot = &mut target.initrd_paths[target.initrd_count];
                        translate_path(path, slot);
                        target.initrd_count += 1;
                    }
                }
            }
            "chainloader" => {
                translate_path(args.trim(), &mut target.efi_path);
                target.is_chainload = true;
            }
            _ => {}
        }
    }

    if let Some(target) = cur.take() {
        if target.is_bootable() && !out.is_full() {
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
    fn var_table_set_get_and_overwrite() {
        let mut vars = VarTable::new();
        vars.set("root", "UUID=1234");
        assert_eq!(vars.get("root"), Some("UUID=1234"));
        vars.set("root", "UUID=5678");
        assert_eq!(vars.get("root"), Some("UUID=5678"));
        assert_eq!(vars.get("missing"), None);
    }

    #[test]
    fn expand_substitutes_braced_and_bare_vars() {
        let mut vars = VarTable::new();
        vars.set("root", "UUID=1234");
        let mut out: FixedStr<MAX_CMDLINE> = FixedStr::new();
        vars.expand("root=${root} rw quiet $unset", &mut out);
        assert_eq!(out.as_str(), "root=UUID=1234 rw quiet ");
    }

    #[test]
    fn translate_path_strips_device_spec() {
        let mut dst: FixedStr<MAX_PATH> = FixedStr::new();
        translate_path("(hd0,gpt1)/boot/vmlinuz-linux", &mut dst);
        assert_eq!(dst.as_str(), "\\boot\\vmlinuz-linux");
    }

    #[test]
    fn parses_a_menuentry_with_variable_expansion() {
        let text = "set root=UUID=1234\nmenuentry \"Arch Linux\" {\n    linux /boot/vmlinuz-linux root=$root rw\n    initrd /boot/initramfs-linux.img\n}\n";
        let mut out: BootTargetVec<BootTarget> = BootTargetVec::new();
        parse_text(text, dummy_handle(), "\\boot\\grub\\grub.cfg", &mut out).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title.as_str(), "Arch Linux");
        assert_eq!(out[0].kernel_path.as_str(), "\\boot\\vmlinuz-linux");
        assert_eq!(out[0].cmdline.as_str(), "root=UUID=1234 rw");
        assert_eq!(out[0].initrd_paths[0].as_str(), "\\boot\\initramfs-linux.img");
    }

    #[test]
    fn chainloader_entry_is_bootable() {
        let text = "menuentry \"Windows\" {\n    chainloader (hd0,gpt1)/EFI/Microsoft/Boot/bootmgfw.efi\n}\n";
        let mut out: BootTargetVec<BootTarget> = BootTargetVec::new();
        parse_text(text, dummy_handle(), "\\boot\\grub\\grub.cfg", &mut out).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].is_chainload);
        assert_eq!(out[0].efi_path.as_str(), "\\EFI\\Microsoft\\Boot\\bootmgfw.efi");
    }
}
