//! EFI chain-loading: the fallback path for boot targets that are not
//! Linux kernels (Windows Boot Manager, other UEFI shells, a second-stage
//! bootloader). Reads the target `.efi` image via the VFS and hands it to
//! firmware's own `LoadImage`/`StartImage` pair.

use superboot_core::error::Error;
use superboot_core::{kinfo, kwarn};
use superboot_efi::api::{Boot, SystemTable};

use crate::entry::BootTarget;
use crate::vfs::Vfs;

/// Chain-loads `target.efi_path`. Returns only on failure, or if the
/// loaded image itself returns control back to us.
pub fn chainload(system_table: &SystemTable<Boot>, vfs: &mut Vfs, target: &BootTarget) -> Error {
    let bs = system_table.boot_services();

    kinfo!("chainload: {}", target.efi_path.as_str());

    let image = match vfs.read_file(&bs, target.device_handle, target.efi_path.as_str()) {
        Ok(buf) => buf,
        Err(err) => {
            kwarn!("chainload: failed to read image: {:?}", err);
            return err;
        }
    };

    let handle = match bs.load_image(image.as_slice()) {
        Ok(handle) => handle,
        Err(status) => {
            kwarn!("chainload: LoadImage failed: {:?}", status);
            return Error::from(status);
        }
    };

    // The image is fully copied into firmware-owned memory by LoadImage;
    // drop our read buffer before handing off control.
    drop(image);

    if let Err(status) = bs.start_image(handle) {
        kwarn!("chainload: StartImage returned: {:?}", status);
        return Error::from(status);
    }

    // StartImage returned success without taking over the system. Treat
    // this as "nothing left to do" rather than a hard error.
    Error::Transient
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_efi_status_round_trips_through_from() {
        let status = superboot_efi::EfiStatus::LOAD_ERROR;
        assert_eq!(Error::from(status), Error::LoadError);
    }
}
