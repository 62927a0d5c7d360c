//! Process lifecycle: page table construction and teardown.

use crate::constants::*;
use crate::error::{AllocFor, VmError, VmResult};
use crate::memory::PhysicalMemory;

/// Create process `proc` with a fresh page table and `pages` data pages.
///
/// Frames are granted lowest-index-first: the table frame, then one frame
/// per virtual page `0..pages`. If the pool runs dry partway through,
/// everything granted by this call is released again before the error is
/// reported, so a failed create leaves the free map untouched.
pub fn create_process(pm: &mut PhysicalMemory, proc: u8, pages: usize) -> VmResult<()> {
    if proc as usize >= MAX_PROCS {
        return Err(VmError::InvalidProcess { proc });
    }
    if pm.page_table_of(proc).is_some() {
        return Err(VmError::ProcessExists { proc });
    }

    let table = pm.allocate_frame().ok_or(VmError::OutOfMemory {
        proc,
        what: AllocFor::PageTable,
    })?;

    // The frame may have held data in a previous life
    pm.zero_frame(table);
    pm.set_page_table(proc, table);

    for page in 0..pages {
        match pm.allocate_frame() {
            Some(frame) => pm.set_page_entry(table, page, frame),
            None => {
                release(pm, proc, table);
                return Err(VmError::OutOfMemory {
                    proc,
                    what: AllocFor::DataPage,
                });
            }
        }
    }

    log::debug!("proc {proc}: page table in frame {table}, {pages} data pages");
    Ok(())
}

/// Tear down `proc`, releasing every frame it owns.
///
/// Data frames are freed first, then the table frame, then the pointer
/// entry is cleared. A process with no table assigned is reported and
/// nothing changes, so destroying twice cannot double-free.
pub fn destroy_process(pm: &mut PhysicalMemory, proc: u8) -> VmResult<()> {
    if proc as usize >= MAX_PROCS {
        return Err(VmError::InvalidProcess { proc });
    }
    let table = pm
        .page_table_of(proc)
        .ok_or(VmError::InvalidProcess { proc })?;

    release(pm, proc, table);
    log::debug!("proc {proc}: destroyed");
    Ok(())
}

/// Free every frame the table maps, the table frame itself, and the
/// pointer entry for `proc`.
fn release(pm: &mut PhysicalMemory, proc: u8, table: u8) {
    for page in 0..PAGE_COUNT {
        if let Some(frame) = pm.page_entry(table, page) {
            pm.free_frame(frame);
        }
    }
    pm.free_frame(table);
    pm.clear_page_table(proc);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_process_gets_lowest_frames() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 0, 2).unwrap();

        // Frame 0 is reserved, so the table lands in frame 1
        assert_eq!(pm.page_table_of(0), Some(1));
        assert_eq!(pm.page_entry(1, 0), Some(2));
        assert_eq!(pm.page_entry(1, 1), Some(3));
        assert_eq!(pm.free_frame_count(), PAGE_COUNT - 4);
    }

    #[test]
    fn test_live_processes_share_no_frames() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 0, 2).unwrap();
        create_process(&mut pm, 1, 2).unwrap();

        let frames_of = |pm: &PhysicalMemory, proc: u8| -> Vec<u8> {
            let table = pm.page_table_of(proc).unwrap();
            let mut owned = vec![table];
            owned.extend((0..PAGE_COUNT).filter_map(|page| pm.page_entry(table, page)));
            owned
        };

        let a = frames_of(&pm, 0);
        let b = frames_of(&pm, 1);
        assert_eq!(b, vec![4, 5, 6]);
        assert!(a.iter().all(|frame| !b.contains(frame)));
    }

    #[test]
    fn test_destroy_releases_every_frame() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 0, 5).unwrap();
        destroy_process(&mut pm, 0).unwrap();

        assert_eq!(pm.page_table_of(0), None);
        assert_eq!(pm.free_frame_count(), PAGE_COUNT - 1);

        // The released frames are immediately reusable
        create_process(&mut pm, 7, 1).unwrap();
        assert_eq!(pm.page_table_of(7), Some(1));
        assert_eq!(pm.page_entry(1, 0), Some(2));
    }

    #[test]
    fn test_destroy_twice_is_reported_not_corrupting() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 0, 3).unwrap();
        destroy_process(&mut pm, 0).unwrap();

        assert_eq!(
            destroy_process(&mut pm, 0),
            Err(VmError::InvalidProcess { proc: 0 })
        );
        assert_eq!(pm.free_frame_count(), PAGE_COUNT - 1);
    }

    #[test]
    fn test_destroy_unknown_process_is_safe() {
        let mut pm = PhysicalMemory::new();
        assert_eq!(
            destroy_process(&mut pm, 42),
            Err(VmError::InvalidProcess { proc: 42 })
        );
        assert_eq!(pm.free_frame_count(), PAGE_COUNT - 1);
    }

    #[test]
    fn test_create_existing_process_is_rejected() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 0, 1).unwrap();
        let free_before = pm.free_frame_count();

        assert_eq!(
            create_process(&mut pm, 0, 2),
            Err(VmError::ProcessExists { proc: 0 })
        );
        assert_eq!(pm.free_frame_count(), free_before);
        assert_eq!(pm.page_table_of(0), Some(1));
    }

    #[test]
    fn test_process_id_out_of_range() {
        let mut pm = PhysicalMemory::new();
        assert_eq!(
            create_process(&mut pm, MAX_PROCS as u8, 1),
            Err(VmError::InvalidProcess {
                proc: MAX_PROCS as u8
            })
        );
    }

    #[test]
    fn test_exact_fit_uses_every_frame() {
        // 63 frames free: one table plus 62 data pages fits exactly
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 0, PAGE_COUNT - 2).unwrap();
        assert_eq!(pm.free_frame_count(), 0);
    }

    #[test]
    fn test_one_page_too_many_rolls_back() {
        let mut pm = PhysicalMemory::new();
        assert_eq!(
            create_process(&mut pm, 0, PAGE_COUNT - 1),
            Err(VmError::OutOfMemory {
                proc: 0,
                what: AllocFor::DataPage
            })
        );

        // Full rollback: the failed call leaves the free map untouched
        assert_eq!(pm.free_frame_count(), PAGE_COUNT - 1);
        assert_eq!(pm.page_table_of(0), None);
    }

    #[test]
    fn test_rollback_mid_request() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 0, 57).unwrap();
        assert_eq!(pm.free_frame_count(), 5);

        // Needs 6 frames, only 5 remain
        assert_eq!(
            create_process(&mut pm, 1, 5),
            Err(VmError::OutOfMemory {
                proc: 1,
                what: AllocFor::DataPage
            })
        );
        assert_eq!(pm.free_frame_count(), 5);
        assert_eq!(pm.page_table_of(1), None);

        // A request that fits the remainder still succeeds
        create_process(&mut pm, 1, 4).unwrap();
        assert_eq!(pm.free_frame_count(), 0);
    }

    #[test]
    fn test_table_allocation_failure_when_full() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 0, PAGE_COUNT - 2).unwrap();

        assert_eq!(
            create_process(&mut pm, 1, 0),
            Err(VmError::OutOfMemory {
                proc: 1,
                what: AllocFor::PageTable
            })
        );
        assert_eq!(pm.page_table_of(1), None);
    }

    #[test]
    fn test_reused_table_frame_carries_no_stale_mappings() {
        let mut pm = PhysicalMemory::new();

        // Fill frame 2 with data through proc 0's page 0, then tear down
        create_process(&mut pm, 0, 1).unwrap();
        pm.write(PhysicalMemory::frame_address(2, 0), 7);
        pm.write(PhysicalMemory::frame_address(2, 9), 7);
        destroy_process(&mut pm, 0).unwrap();

        // Frame 1 becomes proc 1's table again; frame 2 becomes a table for
        // proc 2 after one more create, and must read as empty
        create_process(&mut pm, 1, 0).unwrap();
        create_process(&mut pm, 2, 0).unwrap();
        assert_eq!(pm.page_table_of(2), Some(2));
        for page in 0..PAGE_COUNT {
            assert_eq!(pm.page_entry(2, page), None);
        }
    }
}
