//! Renderers for the frame map and per-process page tables.

use crate::constants::*;
use crate::error::{VmError, VmResult};
use crate::memory::PhysicalMemory;

/// Render the frame usage map, 16 frames per row, `.` free / `#` allocated.
pub fn page_free_map(pm: &PhysicalMemory) -> String {
    let mut out = String::from("--- PAGE FREE MAP ---\n");

    for frame in 0..PAGE_COUNT {
        out.push(if pm.is_frame_free(frame as u8) { '.' } else { '#' });
        if (frame + 1) % 16 == 0 {
            out.push('\n');
        }
    }

    out
}

/// Render `proc`'s page table, one `virtual -> physical` line per mapped
/// page, in hex.
pub fn page_table(pm: &PhysicalMemory, proc: u8) -> VmResult<String> {
    if proc as usize >= MAX_PROCS {
        return Err(VmError::InvalidProcess { proc });
    }
    let table = pm
        .page_table_of(proc)
        .ok_or(VmError::InvalidProcess { proc })?;

    let mut out = format!("--- PROCESS {proc} PAGE TABLE ---\n");
    for page in 0..PAGE_COUNT {
        if let Some(frame) = pm.page_entry(table, page) {
            out.push_str(&format!("{page:02x} -> {frame:02x}\n"));
        }
    }

    Ok(out)
}
