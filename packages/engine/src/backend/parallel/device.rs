//! Device - worker pool and the buffers it owns
//!
//! Native builds give each device its own rayon pool. wasm32 builds run on
//! the global pool that JS starts through `initDevicePool`.
//!
//! The grid lives in `DeviceGrid`, separate from any host copy. A kernel
//! launch moves the whole `DeviceGrid` onto the pool and the host blocks
//! until it comes back (completion barrier). While a kernel is in flight
//! the host holds no reference to device memory, so nothing can observe a
//! half-written generation.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use rayon::ThreadPool;
#[cfg(not(target_arch = "wasm32"))]
use rayon::ThreadPoolBuilder;

use crate::core::error::{EngineError, EngineResult};
use crate::core::random::cell_state;
use crate::core::rule::{Cell, DEAD};
use crate::backend::render::{paint_row, DEAD_COLOR};

/// Pixel buffer shared with the display, written by the kernel itself
pub struct RenderMapping {
    pub pixels: Vec<u32>,
}

pub struct DeviceGrid {
    pub rows: u32,
    pub cols: u32,
    pub current: Vec<Cell>,
    pub next: Vec<Cell>,
    /// Per-cell xorshift32 state, seeded once at allocation
    pub rng_states: Vec<u32>,
    pub mapping: Option<RenderMapping>,
}

fn device_alloc<T: Clone>(len: usize, value: T) -> EngineResult<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|e| EngineError::device(format!("out of device memory ({len} elements): {e}")))?;
    buf.resize(len, value);
    Ok(buf)
}

impl DeviceGrid {
    fn allocate(rows: u32, cols: u32, seed: u64, mapped: bool) -> EngineResult<Self> {
        let size = rows as usize * cols as usize;
        let mut rng_states = device_alloc(size, 0u32)?;
        for (idx, state) in rng_states.iter_mut().enumerate() {
            *state = cell_state(seed, idx);
        }
        let mapping = if mapped {
            Some(RenderMapping {
                pixels: device_alloc(size, DEAD_COLOR)?,
            })
        } else {
            None
        };
        Ok(Self {
            rows,
            cols,
            current: device_alloc(size, DEAD)?,
            next: device_alloc(size, DEAD)?,
            rng_states,
            mapping,
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.current.len()
    }

    /// Publish `next` as current after a completed kernel
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Full host-to-device transfer of the current generation.
    /// Returns the rows whose mapped pixels changed.
    pub fn upload(&mut self, staging: &[Cell]) -> Vec<u32> {
        self.current.copy_from_slice(staging);
        self.next.fill(DEAD);
        self.repaint_all()
    }

    /// Sparse transfer: set the given cells to `value`.
    /// Returns the rows whose mapped pixels changed.
    pub fn write_cells(&mut self, indices: &[usize], value: Cell) -> Vec<u32> {
        let cols = self.cols as usize;
        let mut rows: Vec<u32> = Vec::new();
        for &idx in indices {
            self.current[idx] = value;
            rows.push((idx / cols) as u32);
        }
        rows.sort_unstable();
        rows.dedup();
        let Some(mapping) = self.mapping.as_mut() else {
            return Vec::new();
        };
        rows.retain(|&row| {
            let start = row as usize * cols;
            paint_row(
                &self.current[start..start + cols],
                &mut mapping.pixels[start..start + cols],
            )
        });
        rows
    }

    /// Device-to-host copy of the current generation
    pub fn download(&self) -> Vec<Cell> {
        self.current.clone()
    }

    pub fn alive_count(&self) -> u64 {
        self.current.iter().map(|&c| c as u64).sum()
    }

    fn repaint_all(&mut self) -> Vec<u32> {
        let cols = self.cols as usize;
        let Some(mapping) = self.mapping.as_mut() else {
            return Vec::new();
        };
        self.current
            .chunks(cols)
            .zip(mapping.pixels.chunks_mut(cols))
            .enumerate()
            .filter_map(|(row, (cells, pixels))| paint_row(cells, pixels).then_some(row as u32))
            .collect()
    }
}

/// Rayon pool that runs kernels
enum Workers {
    /// Pool owned by this device (native targets)
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    Dedicated(ThreadPool),
    /// Process-wide pool. On wasm32 this is the pool started by
    /// `initDevicePool`, since threads cannot be spawned from wasm directly.
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    Global,
}

impl Workers {
    #[cfg(not(target_arch = "wasm32"))]
    fn acquire(threads: usize) -> EngineResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("automata-device-{i}"))
            .panic_handler(|_| tracing::error!("Device kernel panicked"))
            .build()
            .map_err(|e| EngineError::device(format!("failed to start worker pool: {e}")))?;
        Ok(Workers::Dedicated(pool))
    }

    #[cfg(target_arch = "wasm32")]
    fn acquire(_threads: usize) -> EngineResult<Self> {
        if global_pool::is_ready() {
            Ok(Workers::Global)
        } else {
            Err(EngineError::device(
                "global thread pool not started (await initDevicePool first)",
            ))
        }
    }

    fn count(&self) -> usize {
        match self {
            Workers::Dedicated(pool) => pool.current_num_threads(),
            Workers::Global => rayon::current_num_threads(),
        }
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        match self {
            Workers::Dedicated(pool) => pool.spawn(job),
            Workers::Global => rayon::spawn(job),
        }
    }
}

/// Readiness of the wasm32 global pool. `wasm-bindgen-rayon` builds it
/// asynchronously, and touching rayon before that would poison it.
#[cfg(target_arch = "wasm32")]
pub(crate) mod global_pool {
    use std::sync::atomic::{AtomicBool, Ordering};

    static READY: AtomicBool = AtomicBool::new(false);

    pub(crate) fn mark_ready() {
        READY.store(true, Ordering::Release);
    }

    pub(crate) fn is_ready() -> bool {
        READY.load(Ordering::Acquire)
    }
}

pub struct Device {
    workers: Workers,
    grid: Option<DeviceGrid>,
    timeout: Duration,
    lost: Option<String>,
}

impl Device {
    /// Acquire a worker pool and allocate the device buffers.
    /// Anything acquired before a failure is released on return.
    pub fn acquire(
        threads: usize,
        timeout: Duration,
        rows: u32,
        cols: u32,
        seed: u64,
        mapped: bool,
    ) -> EngineResult<Self> {
        Self::with_workers(Workers::acquire(threads)?, timeout, rows, cols, seed, mapped)
    }

    fn with_workers(
        workers: Workers,
        timeout: Duration,
        rows: u32,
        cols: u32,
        seed: u64,
        mapped: bool,
    ) -> EngineResult<Self> {
        let grid = DeviceGrid::allocate(rows, cols, seed, mapped)?;
        tracing::debug!(
            "Device acquired: {} workers, {} cells, mapped = {}",
            workers.count(),
            grid.size(),
            mapped
        );
        Ok(Self {
            workers,
            grid: Some(grid),
            timeout,
            lost: None,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers.count()
    }

    pub fn grid(&self) -> EngineResult<&DeviceGrid> {
        match self.grid.as_ref() {
            Some(grid) => Ok(grid),
            None => Err(self.lost_error()),
        }
    }

    pub fn grid_mut(&mut self) -> EngineResult<&mut DeviceGrid> {
        let lost = self.lost_error();
        self.grid.as_mut().ok_or(lost)
    }

    pub fn is_lost(&self) -> bool {
        self.lost.is_some()
    }

    /// Run `kernel` on the pool and block until it signals completion.
    /// A timeout or a panicking kernel loses the device for good.
    pub fn launch<F, T>(&mut self, kernel: F) -> EngineResult<T>
    where
        F: FnOnce(&mut DeviceGrid) -> T + Send + 'static,
        T: Send + 'static,
    {
        let mut grid = self.grid.take().ok_or_else(|| self.lost_error())?;
        let (done, wait) = mpsc::sync_channel(1);
        self.workers.spawn(move || {
            let out = kernel(&mut grid);
            let _ = done.send((grid, out));
        });

        match wait.recv_timeout(self.timeout) {
            Ok((grid, out)) => {
                self.grid = Some(grid);
                Ok(out)
            }
            Err(RecvTimeoutError::Timeout) => {
                Err(self.mark_lost(format!("kernel did not complete within {:?}", self.timeout)))
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(self.mark_lost("kernel aborted before signalling completion".to_string()))
            }
        }
    }

    fn mark_lost(&mut self, reason: String) -> EngineError {
        tracing::error!("Device lost: {}", reason);
        self.lost = Some(reason.clone());
        EngineError::Device(reason)
    }

    fn lost_error(&self) -> EngineError {
        EngineError::device(
            self.lost
                .clone()
                .unwrap_or_else(|| "device grid unavailable".to_string()),
        )
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        tracing::debug!("Device released (lost = {})", self.is_lost());
    }
}
