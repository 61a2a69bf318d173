use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

/// `System` wrapper that tallies allocations and allocated bytes.
///
/// Install it as `#[global_allocator]` in a bench binary and hand a
/// `&'static` reference to the runner to get per-operation allocation figures.
#[derive(Debug, Default)]
pub struct CountingAllocator {
    total_bytes: AtomicU64,
    allocations: AtomicU64,
}

impl CountingAllocator {
    pub const fn new() -> Self {
        Self {
            total_bytes: AtomicU64::new(0),
            allocations: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> AllocationSnapshot {
        AllocationSnapshot {
            bytes: self.total_bytes.load(Ordering::Relaxed),
            allocations: self.allocations.load(Ordering::Relaxed),
        }
    }

    fn record(&self, bytes: u64) {
        self.total_bytes.fetch_add(bytes, Ordering::Relaxed);
        self.allocations.fetch_add(1, Ordering::Relaxed);
    }
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            self.record(layout.size() as u64);
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            self.record(layout.size() as u64);
        }
        ptr
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let result = unsafe { System.realloc(ptr, layout, new_size) };
        if !result.is_null() {
            self.record(new_size.saturating_sub(layout.size()) as u64);
        }
        result
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationSnapshot {
    pub bytes: u64,
    pub allocations: u64,
}

impl AllocationSnapshot {
    /// Counts accumulated since `earlier`.
    pub fn since(self, earlier: AllocationSnapshot) -> AllocationSnapshot {
        AllocationSnapshot {
            bytes: self.bytes.saturating_sub(earlier.bytes),
            allocations: self.allocations.saturating_sub(earlier.allocations),
        }
    }
}

#[cfg(test)]
#[path = "alloc_test.rs"]
mod alloc_test;
