use std::error::Error;
use std::fmt;

/// What a failed frame allocation was meant to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocFor {
    PageTable,
    DataPage,
}

impl fmt::Display for AllocFor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocFor::PageTable => write!(f, "page table"),
            AllocFor::DataPage => write!(f, "data page"),
        }
    }
}

/// Failure of a single memory-manager operation.
///
/// Every variant is a per-command diagnostic: the shell prints it and keeps
/// processing the remaining commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmError {
    /// The frame pool ran dry while allocating for `proc`.
    OutOfMemory { proc: u8, what: AllocFor },
    /// `proc` already has a page table assigned.
    ProcessExists { proc: u8 },
    /// `proc` is out of range or has no page table assigned.
    InvalidProcess { proc: u8 },
    /// The virtual page number does not fit the page table.
    InvalidAddress { proc: u8, vaddr: usize },
    /// The virtual page is in range but has no frame mapped.
    UnmappedPage { proc: u8, page: usize },
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmError::OutOfMemory { proc, what } => write!(f, "OOM: proc {proc}: {what}"),
            VmError::ProcessExists { proc } => write!(f, "proc {proc} already exists"),
            VmError::InvalidProcess { proc } => write!(f, "no such process: {proc}"),
            VmError::InvalidAddress { proc, vaddr } => {
                write!(f, "proc {proc}: virtual address {vaddr} out of range")
            }
            VmError::UnmappedPage { proc, page } => {
                write!(f, "proc {proc}: virtual page {page:02x} is not mapped")
            }
        }
    }
}

impl Error for VmError {}

pub type VmResult<T> = Result<T, VmError>;
