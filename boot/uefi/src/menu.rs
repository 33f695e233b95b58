//! The textual boot menu: lists discovered targets, lets the user pick
//! one with the arrow keys, and auto-boots the default entry after a
//! countdown if nothing is pressed.
//!
//! This is an external collaborator the orchestrator calls through one
//! narrow entry point ([`run`]) — it owns no state the rest of the crate
//! depends on.

use superboot_core::collections::BootTargetVec;
use superboot_efi::api::boot::BootServices;
use superboot_efi::api::console::Console;
use superboot_efi::api::input::ConsoleInput;
use superboot_efi::api::{Boot, SystemTable};
use superboot_efi::protocol::simple_text::color;
use superboot_efi::protocol::simple_text_input::scan_code;

use crate::entry::{BootTarget, ConfigType};

const COLOR_NORMAL_FG: usize = color::WHITE;
const COLOR_NORMAL_BG: usize = color::BLUE;
const COLOR_HILITE_FG: usize = color::YELLOW;
const COLOR_HILITE_BG: usize = color::BLACK;
const COLOR_HEADER_FG: usize = color::CYAN;

/// One second, expressed in the 100ns units `SetTimer` wants.
const ONE_SECOND_100NS: u64 = 10_000_000;

fn config_tag(kind: ConfigType) -> &'static str {
    match kind {
        ConfigType::Grub => "[GRUB]",
        ConfigType::SystemdBoot => "[SD-BOOT]",
        ConfigType::Limine => "[LIMINE]",
    }
}

fn draw(console: &Console<'_>, targets: &BootTargetVec<BootTarget>, selected: usize, seconds_left: u32) {
    let (cols, rows) = console.query_current_mode().unwrap_or((80, 25));

    console.set_attribute(COLOR_NORMAL_FG, COLOR_NORMAL_BG).ok();
    console.clear_screen().ok();

    const HEADER: &str = "SuperBoot";
    console.set_attribute(COLOR_HEADER_FG, COLOR_NORMAL_BG).ok();
    let header_col = (cols.saturating_sub(HEADER.len())) / 2;
    console.set_cursor_position(header_col, 0).ok();
    let _ = console.output_string(HEADER);

    let start_row = 2;
    let visible = rows.saturating_sub(start_row + 2).max(1);
    let scroll_off = if selected >= visible { selected - visible + 1 } else { 0 };

    for i in 0..visible {
        let idx = scroll_off + i;
        if idx >= targets.len() {
            break;
        }
        let target = &targets.as_slice()[idx];

        if idx == selected {
            console.set_attribute(COLOR_HILITE_FG, COLOR_HILITE_BG).ok();
        } else {
            console.set_attribute(COLOR_NORMAL_FG, COLOR_NORMAL_BG).ok();
        }
        console.set_cursor_position(2, start_row + i).ok();
        let _ = console.output_string(config_tag(target.config_type));
        let _ = console.output_string(" ");
        let _ = console.output_string(target.title.as_str());
    }

    console.set_attribute(COLOR_HEADER_FG, COLOR_NORMAL_BG).ok();
    console.set_cursor_position(0, rows.saturating_sub(1)).ok();
    if seconds_left > 0 {
        let _ = console.output_string("Enter: boot  Esc: reboot  (auto-boot in a moment)");
    } else {
        let _ = console.output_string("Enter: boot  Esc: reboot");
    }
}

/// Returns the index of the default entry, or `0` if none is marked.
fn default_index(targets: &BootTargetVec<BootTarget>) -> usize {
    targets
        .as_slice()
        .iter()
        .position(|t| t.is_default)
        .unwrap_or(0)
}

/// Runs the interactive boot menu until the user selects an entry, the
/// countdown expires, or they ask to reboot.
///
/// Returns `Some(index)` into `targets` for the entry to boot, or `None`
/// if the user asked to reboot instead.
pub fn run(
    system_table: &SystemTable<Boot>,
    targets: &BootTargetVec<BootTarget>,
    timeout_secs: u32,
) -> Option<usize> {
    if targets.is_empty() {
        return None;
    }

    let bs = system_table.boot_services();
    let console = system_table.console_out();
    let input = system_table.console_in();

    let mut selected = default_index(targets);
    let mut seconds_left = timeout_secs;

    loop {
        draw(&console, targets, selected, seconds_left);

        let key = if seconds_left > 0 {
            match wait_with_countdown(&bs, &input) {
                Some(key) => {
                    seconds_left = 0;
                    key
                }
                None => {
                    seconds_left -= 1;
                    if seconds_left == 0 {
                        return Some(selected);
                    }
                    continue;
                }
            }
        } else {
            wait_for_key(&bs, &input)
        };

        match key.scan_code {
            scan_code::UP => selected = selected.saturating_sub(1),
            scan_code::DOWN => {
                if selected + 1 < targets.len() {
                    selected += 1;
                }
            }
            scan_code::ESC => return None,
            _ => {
                if key.unicode_char == 0x0D {
                    return Some(selected);
                }
            }
        }
    }
}

/// Blocks until a keystroke is available. Shared with the file browser,
/// which has the same "wait on ConIn" need without a countdown.
pub(crate) fn wait_for_key(
    bs: &BootServices<'_>,
    input: &ConsoleInput<'_>,
) -> superboot_efi::protocol::simple_text_input::InputKey {
    loop {
        let mut events = [input.wait_for_key_event()];
        let _ = bs.wait_for_event(&mut events);
        if let Ok(Some(key)) = input.read_key() {
            return key;
        }
    }
}

/// Waits for either a keystroke or a one-second timer, whichever comes
/// first. Returns `None` if the timer fired with no key pressed.
fn wait_with_countdown(
    bs: &BootServices<'_>,
    input: &ConsoleInput<'_>,
) -> Option<superboot_efi::protocol::simple_text_input::InputKey> {
    let Ok(timer) = bs.create_timer_event() else {
        return Some(wait_for_key(bs, input));
    };
    if bs.set_relative_timer(timer, ONE_SECOND_100NS).is_err() {
        let _ = bs.close_event(timer);
        return Some(wait_for_key(bs, input));
    }

    let mut events = [input.wait_for_key_event(), timer];
    let result = bs.wait_for_event(&mut events);
    let _ = bs.cancel_timer(timer);
    let _ = bs.close_event(timer);

    match result {
        Ok(0) => match input.read_key() {
            Ok(Some(key)) => Some(key),
            _ => None,
        },
        _ => None,
    }
}
