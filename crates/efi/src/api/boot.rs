use core::ffi::c_void;

use crate::memory::{EfiAllocateType, EfiMemoryType};
use crate::table;
use crate::{EfiEvent, EfiGuid, EfiHandle, EfiPhysicalAddress, EfiStatus};

use super::memory::MemoryMap;
use super::Protocol;

/// Safe wrapper around UEFI Boot Services.
#[derive(Clone, Copy)]
pub struct BootServices<'st> {
    raw: &'st table::BootServices,
    image_handle: EfiHandle,
}

impl<'st> BootServices<'st> {
    pub(crate) fn new(raw: &'st table::BootServices, image_handle: EfiHandle) -> Self {
        Self { raw, image_handle }
    }

    /// Locate a protocol interface registered in the handle database.
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if no instance of the protocol is installed.
    pub fn locate_protocol<P: Protocol>(&self) -> Result<&'st mut P::Raw, EfiStatus> {
        let mut interface: *mut c_void = core::ptr::null_mut();
        let status = unsafe {
            (self.raw.locate_protocol)(
                &P::GUID as *const EfiGuid,
                core::ptr::null_mut(),
                &mut interface,
            )
        };
        status.to_result()?;
        if interface.is_null() {
            return Err(EfiStatus::NOT_FOUND);
        }
        Ok(unsafe { &mut *(interface as *mut P::Raw) })
    }

    /// Returns the protocol interface of `handle`, if it supports `P`.
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if `handle` does not support the protocol.
    pub fn handle_protocol<P: Protocol>(&self, handle: EfiHandle) -> Result<&'st mut P::Raw, EfiStatus> {
        let mut interface: *mut c_void = core::ptr::null_mut();
        let status =
            unsafe { (self.raw.handle_protocol)(handle, &P::GUID as *const EfiGuid, &mut interface) };
        status.to_result()?;
        if interface.is_null() {
            return Err(EfiStatus::NOT_FOUND);
        }
        Ok(unsafe { &mut *(interface as *mut P::Raw) })
    }

    /// Returns every handle in the handle database that supports protocol `P`.
    ///
    /// The caller provides `out` to receive the handles; returns the number of
    /// handles written. Pass a buffer sized generously (SuperBoot bounds this by
    /// its own target-list capacity, not the firmware's).
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if no handle supports the protocol, or if `out`
    /// is smaller than the number of matching handles (`BUFFER_TOO_SMALL`).
    pub fn locate_handle_buffer<P: Protocol>(
        &self,
        out: &mut [EfiHandle],
    ) -> Result<usize, EfiStatus> {
        let mut count = out.len();
        let mut buffer: *mut EfiHandle = out.as_mut_ptr();
        let status = unsafe {
            (self.raw.locate_handle_buffer)(
                table::LocateSearchType::ByProtocol,
                &P::GUID as *const EfiGuid,
                core::ptr::null_mut(),
                &mut count,
                &mut buffer,
            )
        };
        status.to_result()?;
        Ok(count)
    }

    /// Loads an EFI image from an in-memory buffer.
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if the firmware rejects the image.
    pub fn load_image(&self, source: &[u8]) -> Result<EfiHandle, EfiStatus> {
        let mut handle: EfiHandle = core::ptr::null_mut();
        let status = unsafe {
            (self.raw.load_image)(
                false,
                self.image_handle,
                core::ptr::null_mut(),
                source.as_ptr().cast::<c_void>(),
                source.len(),
                &mut handle,
            )
        };
        status.to_result()?;
        Ok(handle)
    }

    /// Transfers control to a previously loaded image's entry point.
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if the image returns an error status, or is not
    /// startable.
    pub fn start_image(&self, image_handle: EfiHandle) -> Result<(), EfiStatus> {
        let status = unsafe {
            (self.raw.start_image)(image_handle, core::ptr::null_mut(), core::ptr::null_mut())
        };
        status.to_result()
    }

    /// Connects drivers to `controller`, optionally recursively.
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if no drivers could be connected.
    pub fn connect_controller(&self, controller: EfiHandle, recursive: bool) -> Result<(), EfiStatus> {
        let status = unsafe {
            (self.raw.connect_controller)(
                controller,
                core::ptr::null_mut(),
                core::ptr::null_mut(),
                recursive,
            )
        };
        status.to_result()
    }

    /// Allocates `size` bytes of pool memory of the given type.
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if the firmware fails to allocate the requested memory.
    pub fn allocate_pool(&self, memory_type: EfiMemoryType, size: usize) -> Result<*mut u8, EfiStatus> {
        let mut buffer: *mut c_void = core::ptr::null_mut();
        let status = unsafe { (self.raw.allocate_pool)(memory_type, size, &mut buffer) };
        status.to_result()?;
        Ok(buffer.cast::<u8>())
    }

    /// Frees pool memory previously returned by [`allocate_pool`](Self::allocate_pool).
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if the firmware fails to free the memory.
    ///
    /// # Safety
    ///
    /// `buffer` must have been allocated by `allocate_pool` on this same table
    /// and not already freed.
    pub unsafe fn free_pool(&self, buffer: *mut u8) -> Result<(), EfiStatus> {
        let status = unsafe { (self.raw.free_pool)(buffer.cast::<c_void>()) };
        status.to_result()
    }

    /// Allocate `pages` pages from the system memory.
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if the firmware fails to allocate the requested memory.
    pub fn allocate_pages(
        &self,
        alloc_type: EfiAllocateType,
        memory_type: EfiMemoryType,
        pages: usize,
    ) -> Result<EfiPhysicalAddress, EfiStatus> {
        let mut address: EfiPhysicalAddress = 0;
        let status =
            unsafe { (self.raw.allocate_pages)(alloc_type, memory_type, pages, &mut address) };
        status.to_result()?;
        Ok(address)
    }

    /// Allocate `pages` pages at a caller-chosen fixed physical address.
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if the firmware fails to allocate at `address`.
    pub fn allocate_pages_at(
        &self,
        address: EfiPhysicalAddress,
        memory_type: EfiMemoryType,
        pages: usize,
    ) -> Result<EfiPhysicalAddress, EfiStatus> {
        let mut address = address;
        let status = unsafe {
            (self.raw.allocate_pages)(
                EfiAllocateType::AllocateAddress,
                memory_type,
                pages,
                &mut address,
            )
        };
        status.to_result()?;
        Ok(address)
    }

    /// Allocate `pages` pages with an uppermost address no greater than
    /// `max_address`.
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if no range below `max_address` satisfies the
    /// request.
    pub fn allocate_pages_below(
        &self,
        max_address: EfiPhysicalAddress,
        memory_type: EfiMemoryType,
        pages: usize,
    ) -> Result<EfiPhysicalAddress, EfiStatus> {
        let mut address = max_address;
        let status = unsafe {
            (self.raw.allocate_pages)(
                EfiAllocateType::AllocateMaxAddress,
                memory_type,
                pages,
                &mut address,
            )
        };
        status.to_result()?;
        Ok(address)
    }

    /// Free previously allocated pages.
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if the firmware fails to free the memory.
    pub fn free_pages(&self, address: EfiPhysicalAddress, pages: usize) -> Result<(), EfiStatus> {
        let status = unsafe { (self.raw.free_pages)(address, pages) };
        status.to_result()
    }

    /// Get the current UEFI memory map.
    ///
    /// The caller provides a buffer that will be filled with memory descriptors.
    /// The buffer should be aligned to `EfiMemoryDescriptor` alignment.
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if the buffer is too small or the firmware fails
    /// the request.
    pub fn get_memory_map<'buf>(&self, buf: &'buf mut [u8]) -> Result<MemoryMap<'buf>, EfiStatus> {
        let mut map_size = buf.len();
        let mut map_key: usize = 0;
        let mut desc_size: usize = 0;
        let mut desc_version: u32 = 0;

        let status = unsafe {
            (self.raw.get_memory_map)(
                &mut map_size,
                buf.as_mut_ptr(),
                &mut map_key,
                &mut desc_size,
                &mut desc_version,
            )
        };
        status.to_result()?;

        Ok(MemoryMap::new(
            &buf[..map_size],
            map_key,
            desc_size,
            desc_version,
        ))
    }

    /// Probes the firmware for the memory map's current size without
    /// allocating anything, by calling `GetMemoryMap` with an empty buffer.
    ///
    /// Firmware always writes the required `map_size` and `descriptor_size`
    /// out-parameters on `BUFFER_TOO_SMALL`, so this always succeeds in
    /// practice (`EFI_SUCCESS` from an empty buffer would mean a zero-size
    /// map, which no real firmware reports).
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if the firmware reports anything other than
    /// `BUFFER_TOO_SMALL` for an empty buffer.
    pub fn memory_map_size(&self) -> Result<(usize, usize), EfiStatus> {
        let mut map_size: usize = 0;
        let mut map_key: usize = 0;
        let mut desc_size: usize = 0;
        let mut desc_version: u32 = 0;

        let status = unsafe {
            (self.raw.get_memory_map)(
                &mut map_size,
                core::ptr::null_mut(),
                &mut map_key,
                &mut desc_size,
                &mut desc_version,
            )
        };
        if status != EfiStatus::BUFFER_TOO_SMALL {
            status.to_result()?;
        }

        Ok((map_size, desc_size))
    }

    /// Stops execution until one of `events` is signaled, returning its index.
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if the firmware rejects the request.
    pub fn wait_for_event(&self, events: &mut [EfiEvent]) -> Result<usize, EfiStatus> {
        let mut index: usize = 0;
        let status =
            unsafe { (self.raw.wait_for_event)(events.len(), events.as_mut_ptr(), &mut index) };
        status.to_result()?;
        Ok(index)
    }

    /// Stall (busy-wait) for the given number of microseconds.
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if the stall operation fails.
    pub fn stall(&self, microseconds: usize) -> Result<(), EfiStatus> {
        let status = unsafe { (self.raw.stall)(microseconds) };
        status.to_result()
    }

    /// Set the system watchdog timer.
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if the firmware fails to set the timer.
    pub fn set_watchdog_timer(&self, timeout: usize, watchdog_code: u64) -> Result<(), EfiStatus> {
        let status =
            unsafe { (self.raw.set_watchdog_timer)(timeout, watchdog_code, 0, core::ptr::null()) };
        status.to_result()
    }

    /// Returns the image handle.
    pub fn image_handle(&self) -> EfiHandle {
        self.image_handle
    }

    /// Creates a timer event, not yet armed.
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if the firmware fails to create the event.
    pub fn create_timer_event(&self) -> Result<EfiEvent, EfiStatus> {
        const EVT_TIMER: u32 = 0x8000_0000;
        let mut event: EfiEvent = core::ptr::null_mut();
        let status = unsafe {
            (self.raw.create_event)(
                EVT_TIMER,
                crate::tpl::APPLICATION,
                None,
                core::ptr::null_mut(),
                &mut event,
            )
        };
        status.to_result()?;
        Ok(event)
    }

    /// Arms `event` to fire once after `hundred_ns` units of 100 nanoseconds.
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if the firmware rejects the timer.
    pub fn set_relative_timer(&self, event: EfiEvent, hundred_ns: u64) -> Result<(), EfiStatus> {
        let status =
            unsafe { (self.raw.set_timer)(event, table::TimerDelay::Relative, hundred_ns) };
        status.to_result()
    }

    /// Cancels a previously armed timer.
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if the firmware rejects the cancellation.
    pub fn cancel_timer(&self, event: EfiEvent) -> Result<(), EfiStatus> {
        let status = unsafe { (self.raw.set_timer)(event, table::TimerDelay::Cancel, 0) };
        status.to_result()
    }

    /// Closes an event created by [`create_timer_event`](Self::create_timer_event).
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if the firmware fails to close the event.
    pub fn close_event(&self, event: EfiEvent) -> Result<(), EfiStatus> {
        let status = unsafe { (self.raw.close_event)(event) };
        status.to_result()
    }
}
