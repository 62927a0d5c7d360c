use std::fmt;

use crate::constants::*;
use crate::error::{VmError, VmResult};
use crate::memory::PhysicalMemory;

/// Represents the decomposed components of a virtual address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtAddr {
    pub raw: usize,
    pub page: usize,
    pub offset: usize,
}

impl VirtAddr {
    /// Decompose a raw address into page number and byte offset
    pub fn from_raw(raw: usize) -> Self {
        VirtAddr {
            raw,
            page: raw >> PAGE_SHIFT,
            offset: raw & OFFSET_MASK,
        }
    }
}

impl fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VA({}) = (page={}, offset={})",
            self.raw, self.page, self.offset
        )
    }
}

/// Translate `va` in `proc`'s address space to a physical byte address.
///
/// The physical address is composed with the same bit layout the virtual
/// split uses: `frame << PAGE_SHIFT | offset`.
pub fn translate(pm: &PhysicalMemory, proc: u8, va: VirtAddr) -> VmResult<usize> {
    // Step 1: the process must exist and have a page table assigned
    if proc as usize >= MAX_PROCS {
        return Err(VmError::InvalidProcess { proc });
    }
    let table = pm
        .page_table_of(proc)
        .ok_or(VmError::InvalidProcess { proc })?;

    // Step 2: the page number must fit the table. The offset is in range by
    // construction of the split.
    if va.page >= PAGE_COUNT {
        return Err(VmError::InvalidAddress {
            proc,
            vaddr: va.raw,
        });
    }

    // Step 3: the page must be mapped to a frame
    let frame = pm
        .page_entry(table, va.page)
        .ok_or(VmError::UnmappedPage {
            proc,
            page: va.page,
        })?;

    let pa = PhysicalMemory::frame_address(frame, va.offset);
    log::trace!("proc {proc}: {va} -> PA {pa}");
    Ok(pa)
}
