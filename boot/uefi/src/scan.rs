//! Block device scanner.
//!
//! Enumerates every handle that supports Block I/O, keeps only logical
//! partitions with media present, mounts each through the VFS, and probes
//! it against every registered [`config::PARSERS`] entry in turn. The first
//! config path that exists for a given parser wins that partition — a
//! device isn't checked for both `\boot\grub\grub.cfg` and `\grub\grub.cfg`.
//! Per-partition failures (an unmountable filesystem, a corrupt config) are
//! logged and skipped; one bad partition never aborts the scan.

use superboot_core::collections::{BootTargetVec, MAX_BOOT_TARGETS};
use superboot_core::error::Error;
use superboot_core::{kdebug, kinfo, kwarn};
use superboot_efi::api::boot::BootServices;
use superboot_efi::api::BlockIoId;
use superboot_efi::EfiHandle;

use crate::config::{self, ConfigParserDesc};
use crate::entry::BootTarget;
use crate::vfs::Vfs;

/// Upper bound on the number of block I/O handles the scanner will
/// enumerate in one run, independent of how many turn out bootable.
const MAX_HANDLES: usize = 256;

fn scan_partition(
    bs: &BootServices<'_>,
    vfs: &mut Vfs,
    device: EfiHandle,
    out: &mut BootTargetVec<BootTarget>,
) -> Result<(), Error> {
    vfs.open(bs, device)?;

    for parser in config::PARSERS {
        if out.is_full() {
            return Ok(());
        }
        if let Some(path) = first_existing_path(bs, vfs, device, parser) {
            kdebug!("scan: found {} at {}", parser.name, path);
            let buffer = match vfs.read_file(bs, device, path) {
                Ok(buffer) => buffer,
                Err(err) => {
                    kwarn!("scan: failed to read {}: {:?}", path, err);
                    continue;
                }
            };
            let Ok(text) = core::str::from_utf8(buffer.as_slice()) else {
                kwarn!("scan: {} is not valid UTF-8, skipping", path);
                continue;
            };
            let before = out.len();
            if let Err(err) = (parser.parse)(text, device, path, bs, vfs, out) {
                kwarn!("scan: {} parser failed on {}: {:?}", parser.name, path, err);
                continue;
            }
            kinfo!("scan: {} entries from {}", out.len() - before, path);
        }
    }

    Ok(())
}

fn first_existing_path(
    bs: &BootServices<'_>,
    vfs: &Vfs,
    device: EfiHandle,
    parser: &ConfigParserDesc,
) -> Option<&'static str> {
    parser
        .config_paths
        .iter()
        .copied()
        .find(|path| vfs.exists(bs, device, path))
}

/// Scans every present logical partition and appends discovered boot
/// targets to `out`, stopping early once it's full.
pub fn scan_all(bs: &BootServices<'_>, vfs: &mut Vfs, out: &mut BootTargetVec<BootTarget>) {
    kinfo!("scan: enumerating block devices");

    let mut handles = [core::ptr::null_mut(); MAX_HANDLES];
    let count = match bs.locate_handle_buffer::<BlockIoId>(&mut handles) {
        Ok(count) => count,
        Err(err) => {
            kwarn!("scan: no block I/O handles found: {:?}", err);
            return;
        }
    };
    kinfo!("scan: {} block I/O handles", count);

    for &handle in &handles[..count] {
        if out.len() >= MAX_BOOT_TARGETS {
            break;
        }

        let Ok(block_io) = bs.handle_protocol::<BlockIoId>(handle) else {
            continue;
        };
        let media = unsafe { &*block_io.media };
        if !media.logical_partition || !media.media_present {
            continue;
        }

        kdebug!(
            "scan: partition (media_id={}, block_size={})",
            media.media_id,
            media.block_size
        );

        if let Err(err) = scan_partition(bs, vfs, handle, out) {
            kwarn!("scan: partition skipped: {:?}", err);
        }
    }

    kinfo!("scan: {} boot target(s) found", out.len());
}
