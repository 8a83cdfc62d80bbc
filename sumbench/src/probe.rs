//! Peak heap-memory probing around a single call.
//!
//! Memory figures come from [`TrackingAllocator`], which only counts when the
//! final binary installs it as the global allocator:
//!
//! ```rust,ignore
//! #[global_allocator]
//! static ALLOCATOR: sumbench::probe::TrackingAllocator = sumbench::probe::TrackingAllocator;
//! ```
//!
//! [`ProbeManager::detect`] checks for that at runtime and falls back to a
//! no-op probe with a warning when it is missing.

use std::alloc::{GlobalAlloc, Layout, System};
use std::fmt;
use std::hint::black_box;
use std::sync::atomic::{AtomicUsize, Ordering};

static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
static PEAK: AtomicUsize = AtomicUsize::new(0);
static ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);

/// Heap usage observed while a probe was active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryUsage {
    /// Highest live heap size above the level at `begin`, in bytes
    pub peak_bytes: u64,
}

impl fmt::Display for MemoryUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mib = self.peak_bytes as f64 / 1024.0 / 1024.0;
        write!(f, "{:.2} MiB ({} bytes)", mib, self.peak_bytes)
    }
}

/// `System` allocator that keeps live and peak byte counts.
pub struct TrackingAllocator;

fn record_alloc(size: usize) {
    ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
    let now = ALLOCATED.fetch_add(size, Ordering::Relaxed) + size;
    PEAK.fetch_max(now, Ordering::Relaxed);
}

fn record_dealloc(size: usize) {
    ALLOCATED.fetch_sub(size, Ordering::Relaxed);
}

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        record_dealloc(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            record_dealloc(layout.size());
            record_alloc(new_size);
        }
        new_ptr
    }
}

impl TrackingAllocator {
    /// Whether this allocator is the process's global allocator.
    pub fn is_installed() -> bool {
        let before = ALLOCATIONS.load(Ordering::Relaxed);
        drop(black_box(Box::new(0u64)));
        ALLOCATIONS.load(Ordering::Relaxed) != before
    }

    /// Live heap bytes right now.
    pub fn allocated() -> usize {
        ALLOCATED.load(Ordering::Relaxed)
    }

    /// Highest live heap size since the last [`TrackingAllocator::reset_peak`].
    pub fn peak() -> usize {
        PEAK.load(Ordering::Relaxed)
    }

    pub fn reset_peak() {
        PEAK.store(ALLOCATED.load(Ordering::Relaxed), Ordering::Relaxed);
    }
}

/// A sampler wrapped around a call.
pub trait MemoryProbe {
    fn name(&self) -> &'static str;

    /// Whether this probe produces figures at all.
    fn available(&self) -> bool {
        true
    }

    fn begin(&mut self) {}

    fn end(&mut self) -> Option<MemoryUsage> {
        None
    }
}

/// Identity pass-through used when no memory sampler is available.
#[derive(Default)]
pub struct NoopProbe;

impl MemoryProbe for NoopProbe {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn available(&self) -> bool {
        false
    }
}

/// Reports the heap high-water mark reached between `begin` and `end`.
#[derive(Default)]
pub struct AllocationProbe {
    baseline: usize,
}

impl MemoryProbe for AllocationProbe {
    fn name(&self) -> &'static str {
        "allocation"
    }

    fn begin(&mut self) {
        self.baseline = TrackingAllocator::allocated();
        TrackingAllocator::reset_peak();
    }

    fn end(&mut self) -> Option<MemoryUsage> {
        let peak = TrackingAllocator::peak().saturating_sub(self.baseline);
        Some(MemoryUsage {
            peak_bytes: peak as u64,
        })
    }
}

pub struct ProbeManager {
    probe: Box<dyn MemoryProbe>,
}

impl ProbeManager {
    pub fn new(probe: Box<dyn MemoryProbe>) -> Self {
        Self { probe }
    }

    /// Use the allocation probe if the tracking allocator is installed,
    /// otherwise warn and continue without memory figures.
    pub fn detect() -> Self {
        if TrackingAllocator::is_installed() {
            log::debug!("Tracking allocator detected, reporting peak heap usage");
            Self::new(Box::<AllocationProbe>::default())
        } else {
            log::warn!(
                "Memory sampler unavailable: the tracking allocator is not installed. \
                 Memory figures will be skipped."
            );
            Self::new(Box::new(NoopProbe))
        }
    }

    pub fn available(&self) -> bool {
        self.probe.available()
    }

    pub fn probe_name(&self) -> &'static str {
        self.probe.name()
    }

    /// Run `f` with the probe around it.
    pub fn sample<T>(&mut self, f: impl FnOnce() -> T) -> (T, Option<MemoryUsage>) {
        self.probe.begin();
        let output = f();
        let usage = self.probe.end();
        (output, usage)
    }
}
