//! Bounded collection aliases shared across SuperBoot.
//!
//! Every table SuperBoot builds at runtime (discovered boot targets, initrd
//! paths for a single entry, VFS mounts, GRUB script variables, E820 ranges)
//! has a fixed upper bound fixed at compile time and lives on the stack or
//! in a static, never on a heap — there is no allocator in this crate or
//! any of its callers.

use planck_noalloc::vec::ArrayVec;

/// Maximum number of boot targets the scanner can report in one run.
///
/// Carried verbatim from the original implementation's `SB_MAX_TARGETS`.
pub const MAX_BOOT_TARGETS: usize = 64;

/// Maximum number of initrd/initramfs paths a single boot entry may list.
pub const MAX_INITRDS: usize = 8;

/// Maximum number of simultaneous VFS mounts.
///
/// Carried verbatim from the original implementation's `VFS_MAX_MOUNTS`.
pub const MAX_MOUNTS: usize = 64;

/// Maximum number of `set name=value` variables a GRUB-style script may define.
///
/// Carried verbatim from the original implementation's `SB_MAX_VARS`.
pub const MAX_GRUB_VARS: usize = 128;

/// Maximum number of usable-memory ranges in an E820 map passed to Linux.
pub const MAX_E820_ENTRIES: usize = 128;

/// Maximum length, in bytes, of a firmware-visible path.
pub const MAX_PATH: usize = 512;

/// Maximum length, in bytes, of a boot entry's display title.
pub const MAX_TITLE: usize = 256;

/// Maximum length, in bytes, of a kernel command line.
pub const MAX_CMDLINE: usize = 4096;

/// Maximum length, in bytes, of a GRUB-style variable name.
pub const MAX_VAR_NAME: usize = 64;

/// Maximum length, in bytes, of a GRUB-style variable value.
pub const MAX_VAR_VALUE: usize = 512;

/// A vector of boot targets, bounded to [`MAX_BOOT_TARGETS`].
pub type BootTargetVec<T> = ArrayVec<T, MAX_BOOT_TARGETS>;

/// A vector of initrd paths, bounded to [`MAX_INITRDS`].
pub type InitrdVec<T> = ArrayVec<T, MAX_INITRDS>;

/// A vector of VFS mount entries, bounded to [`MAX_MOUNTS`].
pub type MountVec<T> = ArrayVec<T, MAX_MOUNTS>;

/// A vector of GRUB script variables, bounded to [`MAX_GRUB_VARS`].
pub type GrubVarVec<T> = ArrayVec<T, MAX_GRUB_VARS>;

/// A vector of E820 memory-map entries, bounded to [`MAX_E820_ENTRIES`].
pub type E820Vec<T> = ArrayVec<T, MAX_E820_ENTRIES>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boot_target_vec_respects_capacity() {
        let mut v: BootTargetVec<u32> = ArrayVec::new();
        for i in 0..MAX_BOOT_TARGETS {
            assert!(v.try_push(i as u32).is_ok());
        }
        assert!(v.try_push(999).is_err());
        assert_eq!(v.len(), MAX_BOOT_TARGETS);
    }

    #[test]
    fn e820_vec_starts_empty() {
        let v: E820Vec<u64> = ArrayVec::new();
        assert_eq!(v.len(), 0);
        assert!(v.is_empty());
    }
}
