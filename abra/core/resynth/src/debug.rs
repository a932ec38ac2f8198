use std::time::Duration;

#[cfg(debug_assertions)]
macro_rules! debug_println {
  ($($arg:tt)*) => { println!($($arg)*) }
}

#[cfg(not(debug_assertions))]
macro_rules! debug_println {
  ($($arg:tt)*) => {
    ()
  };
}

pub(crate) use debug_println;

/// Loggable events for the resynthesis driver, mirroring `abra::utils::debug::DebugFilters`.
///
/// Only pass boundaries log; the per-candidate inner loop must not allocate
/// or print (see the crate's concurrency notes).
pub enum DebugResynth {
  /// A fill pass over `boundary_count` pixels completed.
  /// - `boundary_count`: number of pixels filled this pass.
  /// - `remaining`: pixels still left in the fill queue.
  /// - `duration`: time taken for the pass.
  FillPass(usize, usize, Duration),
  /// A block of refinement sweeps completed.
  /// - `sweeps_run`: number of sweeps actually executed (may be less than
  ///   the configured maximum if convergence was detected early).
  /// - `improved`: number of pixels whose belief improved across the block.
  /// - `duration`: time taken for the block.
  RefinementBlock(u32, usize, Duration),
  /// The run finished.
  /// - `unfilled`: count of masked pixels left unfilled.
  /// - `cancelled`: whether cancellation ended the run early.
  /// - `duration`: total wall time.
  Finished(usize, bool, Duration),
}

impl DebugResynth {
  #[allow(unused_variables)]
  pub fn log(self) {
    match self {
      DebugResynth::FillPass(boundary_count, remaining, duration) => {
        debug_println!("resynth: fill pass filled={} remaining={} time={:?}", boundary_count, remaining, duration)
      }
      DebugResynth::RefinementBlock(sweeps_run, improved, duration) => {
        debug_println!(
          "resynth:   refinement block sweeps={} improved={} time={:?}",
          sweeps_run,
          improved,
          duration
        )
      }
      DebugResynth::Finished(unfilled, cancelled, duration) => {
        debug_println!("resynth: finished unfilled={} cancelled={} time={:?}", unfilled, cancelled, duration)
      }
    }
  }
}
