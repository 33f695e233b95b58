//! Top-level boot flow: init, scan, menu, dispatch.
//!
//! This is the only module that sequences the others. Everything it calls
//! is designed to fail soft — a scan that finds nothing, or a boot attempt
//! that returns instead of taking over the machine, both fall through to
//! the file browser rather than hanging or resetting.

use superboot_core::collections::BootTargetVec;
use superboot_core::{kinfo, kwarn};
use superboot_efi::api::{Boot, SystemTable};

use crate::boot::{chainload, linux};
use crate::entry::BootTarget;
use crate::vfs::Vfs;
use crate::{explorer, menu, scan};

/// Menu countdown, in seconds, before the default entry auto-boots.
const DEFAULT_TIMEOUT_SECS: u32 = 5;

/// Runs the full boot sequence. Returns only if every avenue — scan, menu,
/// dispatch, and the file browser — has been exhausted.
pub fn run(system_table: SystemTable<Boot>) {
    let mut vfs = Vfs::new();
    vfs.init(&system_table.boot_services());

    let mut targets = BootTargetVec::<BootTarget>::new();
    scan::scan_all(&system_table.boot_services(), &mut vfs, &mut targets);

    if targets.is_empty() {
        kwarn!("orchestrator: no boot targets found, entering file browser");
        explorer::run(&system_table);
        return;
    }

    let Some(selected) = menu::run(&system_table, &targets, DEFAULT_TIMEOUT_SECS) else {
        kinfo!("orchestrator: reboot requested from menu");
        reboot(&system_table);
    };

    let target = &targets.as_slice()[selected];
    kinfo!("orchestrator: booting \"{}\"", target.title.as_str());

    let system_table = if target.is_chainload {
        let err = chainload::chainload(&system_table, &mut vfs, target);
        kwarn!("orchestrator: chainload returned ({:?})", err);
        system_table
    } else {
        // `boot_linux` only returns on a pre-commit failure (it consumes
        // `system_table` to call `exit_boot_services` on the success path,
        // which never returns here). Boot services are still active on
        // every path that returns, so rebuilding a `Boot` handle from the
        // same handle/pointer pair is sound.
        let image_handle = system_table.image_handle();
        let raw = system_table.as_raw_ptr();
        let err = linux::boot_linux(system_table, &mut vfs, target);
        kwarn!("orchestrator: boot_linux returned ({:?})", err);
        unsafe { SystemTable::<Boot>::from_raw(image_handle, raw) }
    };

    explorer::run(&system_table);
}

fn reboot(system_table: &SystemTable<Boot>) -> ! {
    let rt = unsafe { &*(*system_table.as_raw_ptr()).runtime_services };
    unsafe { rt.reset_system(superboot_efi::table::ResetType::Cold, superboot_efi::EfiStatus::SUCCESS) }
}
