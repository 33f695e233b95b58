//! The universal "parsed boot entry" that bridges config parsers, the VFS,
//! and the kernel loaders.
//!
//! Every config parser produces zero or more [`BootTarget`]s; the menu lets
//! the user pick one, and the orchestrator dispatches it to either the
//! Linux loader or the chain-load path.

use superboot_core::collections::{MAX_CMDLINE, MAX_INITRDS, MAX_PATH, MAX_TITLE};
use superboot_core::str8::FixedStr;
use superboot_efi::EfiHandle;

/// Which config format produced a [`BootTarget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigType {
    /// GRUB-style menu script (`grub.cfg`).
    Grub,
    /// systemd-boot's `loader.conf` + `loader/entries/*.conf`.
    SystemdBoot,
    /// Limine's `limine.cfg`.
    Limine,
}

/// A single discovered, fully-resolved boot entry.
///
/// Paths are stored relative to the root of `device_handle`'s filesystem,
/// using `\`-separated UEFI path syntax, ready to hand to
/// [`superboot_efi::api::fs::File::open`].
pub struct BootTarget {
    /// Human-readable label shown in the menu.
    pub title: FixedStr<MAX_TITLE>,
    /// Path to the kernel image, or empty if this entry only chain-loads.
    pub kernel_path: FixedStr<MAX_PATH>,
    /// Paths to initrd/initramfs images, in load order.
    pub initrd_paths: [FixedStr<MAX_PATH>; MAX_INITRDS],
    /// Number of valid entries in `initrd_paths`.
    pub initrd_count: usize,
    /// Kernel command line, ASCII as the Linux boot protocol requires.
    pub cmdline: FixedStr<MAX_CMDLINE>,
    /// Path to the config file this entry was parsed from, for provenance
    /// and diagnostics.
    pub config_path: FixedStr<MAX_PATH>,
    /// Which parser produced this entry.
    pub config_type: ConfigType,
    /// UEFI handle of the block device / partition this entry lives on.
    pub device_handle: EfiHandle,
    /// If `true`, `efi_path` should be chain-loaded instead of booting
    /// `kernel_path` through the Linux protocol.
    pub is_chainload: bool,
    /// Path to a `.efi` image to chain-load, valid when `is_chainload`.
    pub efi_path: FixedStr<MAX_PATH>,
    /// Ordering hint; the scanner assigns these densely as entries are found.
    pub index: u32,
    /// `true` if this entry was marked as the config's default.
    pub is_default: bool,
}

impl BootTarget {
    /// Builds an empty entry rooted at `device_handle`, parsed from
    /// `config_path` by `config_type`. Callers fill in the remaining fields.
    #[must_use]
    pub fn new(device_handle: EfiHandle, config_type: ConfigType, config_path: &str) -> Self {
        let mut cp = FixedStr::new();
        cp.push_str(config_path);
        Self {
            title: FixedStr::new(),
            kernel_path: FixedStr::new(),
            initrd_paths: [FixedStr::new(); MAX_INITRDS],
            initrd_count: 0,
            cmdline: FixedStr::new(),
            config_path: cp,
            config_type,
            device_handle,
            is_chainload: false,
            efi_path: FixedStr::new(),
            index: 0,
            is_default: false,
        }
    }

    /// Appends an initrd path, silently dropping it if the table is full.
    pub fn push_initrd(&mut self, path: &str) {
        if self.initrd_count < MAX_INITRDS {
            self.initrd_paths[self.initrd_count].push_str(path);
            self.initrd_count += 1;
        }
    }

    /// `true` if this entry is complete enough to boot: either a kernel
    /// path or a chain-load target has been set.
    #[must_use]
    pub fn is_bootable(&self) -> bool {
        !self.kernel_path.is_empty() || self.is_chainload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_handle() -> EfiHandle {
        core::ptr::null_mut()
    }

    #[test]
    fn new_entry_is_not_bootable_until_populated() {
        let target = BootTarget::new(dummy_handle(), ConfigType::Limine, "\\limine.cfg");
        assert!(!target.is_bootable());
        assert_eq!(target.config_path.as_str(), "\\limine.cfg");
    }

    #[test]
    fn kernel_path_makes_an_entry_bootable() {
        let mut target = BootTarget::new(dummy_handle(), ConfigType::Grub, "\\boot\\grub\\grub.cfg");
        target.kernel_path.push_str("\\boot\\vmlinuz-linux");
        assert!(target.is_bootable());
    }

    #[test]
    fn chainload_flag_makes_an_entry_bootable_without_a_kernel() {
        let mut target = BootTarget::new(dummy_handle(), ConfigType::SystemdBoot, "\\loader\\entries\\windows.conf");
        target.is_chainload = true;
        target.efi_path.push_str("\\EFI\\Microsoft\\Boot\\bootmgfw.efi");
        assert!(target.is_bootable());
    }

    #[test]
    fn push_initrd_respects_capacity() {
        let mut target = BootTarget::new(dummy_handle(), ConfigType::Limine, "\\limine.cfg");
        for i in 0..MAX_INITRDS + 2 {
            target.push_initrd(if i % 2 == 0 { "\\a" } else { "\\b" });
        }
        assert_eq!(target.initrd_count, MAX_INITRDS);
    }
}
