//! SuperBoot: a UEFI meta-bootloader that scans attached storage for
//! Linux, systemd-boot, GRUB, and Limine configurations, presents a
//! textual menu, and hands off to the chosen kernel or chain-loaded image.

#![no_std]
#![no_main]

mod args;
mod boot;
mod config;
mod entry;
mod explorer;
mod fs;
mod menu;
mod orchestrator;
mod scan;
mod vfs;

use core::fmt::{self, Write as _};
use core::sync::atomic::{AtomicPtr, Ordering};

use superboot_core::log::LogLevel;
use superboot_core::{kfatal, kinfo};
use superboot_efi::api::{console_out_from_raw, Boot, LoadedImageId, SystemTable};
use superboot_efi::{table, EfiHandle, EfiStatus};

/// Raw system table pointer, stashed so the logging sink can reach the
/// console without holding a `SystemTable<Boot>` borrow for the process
/// lifetime. Set once in `efi_main` before any log macro can fire.
static SYSTEM_TABLE: AtomicPtr<table::SystemTable> = AtomicPtr::new(core::ptr::null_mut());

fn console_print(args: fmt::Arguments<'_>) {
    let raw = SYSTEM_TABLE.load(Ordering::Acquire);
    if raw.is_null() {
        return;
    }
    // SAFETY: non-null only after `efi_main` has stored a table pointer
    // that remains valid until `ExitBootServices`, which this loader never
    // reaches without either committing to a kernel or calling `efi_main`
    // only once.
    let mut console = unsafe { console_out_from_raw(raw) };
    let _ = console.write_fmt(args);
}

fn log_sink(level: LogLevel, args: fmt::Arguments<'_>) {
    console_print(format_args!("[{}] {}\n", level.name(), args));
}

/// Reads the firmware load-options string off the loaded-image protocol
/// and converts it to UTF-8, truncating at the first unpaired surrogate
/// or once `out` is full.
fn read_cmdline<'buf>(
    bs: &superboot_efi::api::boot::BootServices<'_>,
    image_handle: EfiHandle,
    out: &'buf mut [u8],
) -> Option<&'buf str> {
    let loaded_image = bs.handle_protocol::<LoadedImageId>(image_handle).ok()?;
    if loaded_image.load_options.is_null() || loaded_image.load_options_size == 0 {
        return None;
    }
    let units = (loaded_image.load_options_size as usize) / 2;
    // SAFETY: firmware guarantees `load_options` points to at least
    // `load_options_size` bytes for the lifetime of the loaded image.
    let wide = unsafe {
        core::slice::from_raw_parts(loaded_image.load_options as *const u16, units)
    };
    let len = superboot_core::str8::ucs2_to_utf8(wide, out)?;
    core::str::from_utf8(&out[..len]).ok()
}

#[unsafe(no_mangle)]
extern "efiapi" fn efi_main(image_handle: EfiHandle, system_table: *mut table::SystemTable) -> EfiStatus {
    SYSTEM_TABLE.store(system_table, Ordering::Release);
    unsafe {
        superboot_core::log::set_print_fn(console_print);
        superboot_core::log::set_log_fn(log_sink);
    }

    // SAFETY: `image_handle`/`system_table` are exactly the values firmware
    // passed to this entry point, and this is the only place `efi_main`
    // constructs a `SystemTable<Boot>` from them.
    let st = unsafe { SystemTable::<Boot>::from_raw(image_handle, system_table) };

    let mut cmdline_buf = [0u8; 512];
    let cmdline = read_cmdline(&st.boot_services(), image_handle, &mut cmdline_buf);
    let startup = args::StartupArgs::parse(cmdline);
    superboot_core::log::set_threshold(startup.log_level);

    kinfo!("SuperBoot starting");
    orchestrator::run(st);

    // `orchestrator::run` only returns once the file browser itself
    // returns (the user asked to back out with nothing left to try).
    EfiStatus::NOT_FOUND
}

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    kfatal!("panic: {}", info);
    loop {
        core::hint::spin_loop();
    }
}
