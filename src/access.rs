//! Byte load/store through the address translator.

use crate::error::VmResult;
use crate::memory::PhysicalMemory;
use crate::translation::{self, VirtAddr};

/// One completed memory access, reported back to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub proc: u8,
    pub vaddr: VirtAddr,
    pub paddr: usize,
    pub value: u8,
}

/// Write one byte into `proc`'s address space. Never allocates.
pub fn store_byte(
    pm: &mut PhysicalMemory,
    proc: u8,
    vaddr: VirtAddr,
    value: u8,
) -> VmResult<Access> {
    let paddr = translation::translate(pm, proc, vaddr)?;
    pm.write(paddr, value);
    Ok(Access {
        proc,
        vaddr,
        paddr,
        value,
    })
}

/// Read one byte from `proc`'s address space.
pub fn load_byte(pm: &PhysicalMemory, proc: u8, vaddr: VirtAddr) -> VmResult<Access> {
    let paddr = translation::translate(pm, proc, vaddr)?;
    let value = pm.read(paddr);
    Ok(Access {
        proc,
        vaddr,
        paddr,
        value,
    })
}
