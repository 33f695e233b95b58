//! Config-format registry and parser dispatch.
//!
//! Every supported bootloader config format is a stateless [`ConfigParserDesc`]:
//! a list of paths to probe for it on a partition, and a `parse` function that
//! turns the file's contents into zero or more [`BootTarget`]s. The scanner
//! tries every registered parser's paths in turn; the first file that exists
//! wins for that partition.

pub mod grub;
pub mod limine;
pub mod systemd_boot;

use superboot_core::collections::BootTargetVec;
use superboot_core::error::Error;
use superboot_efi::api::boot::BootServices;
use superboot_efi::EfiHandle;

use crate::entry::{BootTarget, ConfigType};
use crate::vfs::Vfs;

/// One supported config format.
pub struct ConfigParserDesc {
    /// Display name, used only in diagnostics.
    pub name: &'static str,
    pub config_type: ConfigType,
    /// Paths probed, in order, relative to a partition's filesystem root.
    pub config_paths: &'static [&'static str],
    /// Turns the contents of whichever `config_paths` entry matched into
    /// boot targets, appending them to `out`. `bs`/`vfs` are only used by
    /// parsers (systemd-boot) that must read additional files beyond the
    /// one the scanner already opened.
    pub parse: fn(
        &str,
        EfiHandle,
        &str,
        &BootServices<'_>,
        &mut Vfs,
        &mut BootTargetVec<BootTarget>,
    ) -> Result<(), Error>,
}

/// Every registered parser, probed in this order by the scanner.
pub const PARSERS: &[ConfigParserDesc] = &[grub::PARSER, systemd_boot::PARSER, limine::PARSER];
