use core::marker::PhantomData;

use crate::protocol::simple_text_input::{InputKey, SimpleTextInputProtocol};
use crate::EfiStatus;

/// Safe wrapper around a UEFI Simple Text Input Protocol (console input).
pub struct ConsoleInput<'st> {
    raw: *mut SimpleTextInputProtocol,
    _lifetime: PhantomData<&'st ()>,
}

impl<'st> ConsoleInput<'st> {
    pub(crate) fn new(raw: *mut SimpleTextInputProtocol) -> Self {
        Self {
            raw,
            _lifetime: PhantomData,
        }
    }

    /// Reads the next keystroke, if one is pending.
    ///
    /// Returns `Ok(None)` if no key is available (`EFI_NOT_READY`); callers that
    /// want to block should wait on the input device's `wait_for_key` event via
    /// `BootServices::wait_for_event` first.
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` for any firmware error other than `NOT_READY`.
    pub fn read_key(&self) -> Result<Option<InputKey>, EfiStatus> {
        let mut key = InputKey {
            scan_code: 0,
            unicode_char: 0,
        };
        let status = unsafe { ((*self.raw).read_key_stroke)(self.raw, &mut key) };
        if status == EfiStatus::NOT_READY {
            return Ok(None);
        }
        status.to_result()?;
        Ok(Some(key))
    }

    /// The event signaled when a keystroke is available, for use with
    /// `BootServices::wait_for_event`.
    pub fn wait_for_key_event(&self) -> crate::EfiEvent {
        unsafe { (*self.raw).wait_for_key }
    }

    /// Resets the input device.
    ///
    /// # Errors
    ///
    /// Returns `Err(EfiStatus)` if the device fails to reset.
    pub fn reset(&self) -> Result<(), EfiStatus> {
        let status = unsafe { ((*self.raw).reset)(self.raw, false) };
        status.to_result()
    }
}
