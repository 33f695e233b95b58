//! EFI memory map → Linux E820 conversion.
//!
//! The kernel's zero page wants a BIOS-style E820 table, not a UEFI memory
//! map: fewer, coarser region types, and coalesced where possible. Firmware
//! descriptors may be larger than [`EfiMemoryDescriptor`] — callers must
//! step by the map's reported `descriptor_size`, never `size_of`.

use superboot_core::collections::E820Vec;
use superboot_efi::api::memory::MemoryMap;
use superboot_efi::memory::{EfiMemoryDescriptor, EfiMemoryType};

/// One Linux E820 memory-map entry, as placed verbatim into the zero page.
#[repr(C, packed)]
#[derive(Debug, Clone, Copy)]
pub struct E820Entry {
    pub addr: u64,
    pub size: u64,
    pub kind: u32,
}

const _: () = assert!(core::mem::size_of::<E820Entry>() == 20);

/// E820 region types, as defined by the BIOS E820 convention.
pub mod kind {
    pub const RAM: u32 = 1;
    pub const RESERVED: u32 = 2;
    pub const ACPI_RECLAIMABLE: u32 = 3;
    pub const ACPI_NVS: u32 = 4;
}

fn map_type(efi_type: u32) -> u32 {
    match efi_memory_type_from(efi_type) {
        Some(
            EfiMemoryType::LoaderCode
            | EfiMemoryType::LoaderData
            | EfiMemoryType::BootServicesCode
            | EfiMemoryType::BootServicesData
            | EfiMemoryType::ConventionalMemory,
        ) => kind::RAM,
        Some(EfiMemoryType::AcpiReclaimMemory) => kind::ACPI_RECLAIMABLE,
        Some(EfiMemoryType::AcpiMemoryNvs) => kind::ACPI_NVS,
        _ => kind::RESERVED,
    }
}

/// `EfiMemoryType` has no `TryFrom<u32>` of its own; match on the
/// documented discriminants directly rather than transmuting.
fn efi_memory_type_from(raw: u32) -> Option<EfiMemoryType> {
    Some(match raw {
        0 => EfiMemoryType::ReservedMemoryType,
        1 => EfiMemoryType::LoaderCode,
        2 => EfiMemoryType::LoaderData,
        3 => EfiMemoryType::BootServicesCode,
        4 => EfiMemoryType::BootServicesData,
        5 => EfiMemoryType::RuntimeServicesCode,
        6 => EfiMemoryType::RuntimeServicesData,
        7 => EfiMemoryType::ConventionalMemory,
        8 => EfiMemoryType::UnusableMemory,
        9 => EfiMemoryType::AcpiReclaimMemory,
        10 => EfiMemoryType::AcpiMemoryNvs,
        11 => EfiMemoryType::MemoryMappedIO,
        12 => EfiMemoryType::MemoryMappedIOPortSpace,
        13 => EfiMemoryType::PalCode,
        14 => EfiMemoryType::PersistentMemory,
        15 => EfiMemoryType::UnacceptedMemoryType,
        _ => return None,
    })
}

/// Converts a UEFI memory map into E820 entries, coalescing adjacent
/// same-type regions. Stops once `out` is full.
pub fn convert(map: &MemoryMap<'_>, out: &mut E820Vec<E820Entry>) {
    for desc in map {
        append_descriptor(desc, out);
        if out.is_full() {
            return;
        }
    }
}

fn append_descriptor(desc: &EfiMemoryDescriptor, out: &mut E820Vec<E820Entry>) {
    let kind = map_type(desc.memory_type);
    let addr = desc.physical_start;
    let size = desc.number_of_pages * 4096;

    if let Some(last) = out.as_mut_slice().last_mut() {
        if last.kind == kind && last.addr + last.size == addr {
            last.size += size;
            return;
        }
    }

    let _ = out.try_push(E820Entry { addr, size, kind });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(memory_type: u32, physical_start: u64, pages: u64) -> EfiMemoryDescriptor {
        EfiMemoryDescriptor {
            memory_type,
            physical_start,
            virtual_start: 0,
            number_of_pages: pages,
            attribute: 0,
        }
    }

    #[test]
    fn coalesces_adjacent_same_type_regions() {
        let descs = [
            descriptor(1, 0x0, 1),      // LoaderCode, 0x0..0x1000
            descriptor(2, 0x1000, 2),   // LoaderData, 0x1000..0x3000
            descriptor(9, 0x4000, 1),   // ACPIReclaim, 0x4000..0x5000
        ];
        let mut out: E820Vec<E820Entry> = E820Vec::new();
        for d in &descs {
            append_descriptor(d, &mut out);
        }
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].addr, 0x0);
        assert_eq!(out[0].size, 0x3000);
        assert_eq!(out[0].kind, kind::RAM);
        assert_eq!(out[1].addr, 0x4000);
        assert_eq!(out[1].size, 0x1000);
        assert_eq!(out[1].kind, kind::ACPI_RECLAIMABLE);
    }

    #[test]
    fn non_adjacent_regions_stay_separate() {
        let descs = [descriptor(7, 0x0, 1), descriptor(7, 0x2000, 1)];
        let mut out: E820Vec<E820Entry> = E820Vec::new();
        for d in &descs {
            append_descriptor(d, &mut out);
        }
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn unknown_efi_type_maps_to_reserved() {
        assert_eq!(map_type(11), kind::RESERVED);
        assert_eq!(map_type(7), kind::RAM);
        assert_eq!(map_type(10), kind::ACPI_NVS);
    }
}
