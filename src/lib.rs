pub mod access;
pub mod constants;
pub mod error;
pub mod logging;
pub mod memory;
pub mod process;
pub mod report;
pub mod translation;

// Re-export commonly used items for convenience
pub use constants::*;
pub use error::{AllocFor, VmError, VmResult};
pub use memory::PhysicalMemory;
pub use translation::VirtAddr;
