pub const PAGE_SHIFT: u32 = 8;

pub const PAGE_SIZE: usize = 1 << PAGE_SHIFT;
pub const PAGE_COUNT: usize = 64;
pub const MEM_SIZE: usize = 16384;

pub const OFFSET_MASK: usize = PAGE_SIZE - 1;

// Frame 0 layout: bytes 0..PAGE_COUNT are the frame usage bitmap, bytes
// PTP_OFFSET..PTP_OFFSET+MAX_PROCS are the per-process page table pointers.
pub const PTP_OFFSET: usize = 64;
pub const MAX_PROCS: usize = 64;

const _: () = assert!(PAGE_COUNT * PAGE_SIZE == MEM_SIZE);
const _: () = assert!(PTP_OFFSET + MAX_PROCS <= PAGE_SIZE);
