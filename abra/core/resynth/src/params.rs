/// Configuration for a `resynthesize` call.
///
/// Construct with `ResynthesizeParams::new()` and chain the `with_*`
/// builders, following this workspace's `CollageOptions` convention.
#[derive(Clone, Debug)]
pub struct ResynthesizeParams {
  pub(crate) tries: u32,
  pub(crate) comp_radius: i32,
  pub(crate) max_adjustment: u8,
  pub(crate) equal_adjustment: bool,
  pub(crate) use_reference: bool,
  pub(crate) inner_passes: u32,
  pub(crate) outer_passes: u32,
  pub(crate) important_count: usize,
  pub(crate) threads: usize,
  pub(crate) seed: Option<u64>,
  pub(crate) selection_rect: Option<(i32, i32, i32, i32)>,
}

impl Default for ResynthesizeParams {
  fn default() -> Self {
    ResynthesizeParams {
      tries: 200,
      comp_radius: 3,
      max_adjustment: 0,
      equal_adjustment: false,
      use_reference: true,
      inner_passes: 20,
      outer_passes: 4,
      important_count: 6,
      threads: 1,
      seed: None,
      selection_rect: None,
    }
  }
}

impl ResynthesizeParams {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of random candidates drawn per boundary pixel per fill pass.
  pub fn with_tries(mut self, tries: u32) -> Self {
    assert!(tries > 0, "tries must be > 0");
    self.tries = tries;
    self
  }

  /// Comparison patch radius `R_cmp`; the patch is `(2 * R_cmp + 1)^2`.
  pub fn with_comp_radius(mut self, comp_radius: i32) -> Self {
    assert!(comp_radius >= 0, "comp_radius must be >= 0");
    self.comp_radius = comp_radius;
    self
  }

  /// Maximum per-channel color adjustment; `0` disables color adjustment.
  pub fn with_max_adjustment(mut self, max_adjustment: u8) -> Self {
    self.max_adjustment = max_adjustment;
    self
  }

  /// When set (and `max_adjustment > 0`), replaces the per-channel offset
  /// with its average across channels - a luminance-only shift.
  pub fn with_equal_adjustment(mut self, equal_adjustment: bool) -> Self {
    self.equal_adjustment = equal_adjustment;
    self
  }

  /// `false` selects legacy rectangle-rejection sampling instead of
  /// reference-layer sampling.
  pub fn with_use_reference(mut self, use_reference: bool) -> Self {
    self.use_reference = use_reference;
    self
  }

  pub fn with_inner_passes(mut self, inner_passes: u32) -> Self {
    self.inner_passes = inner_passes;
    self
  }

  pub fn with_outer_passes(mut self, outer_passes: u32) -> Self {
    self.outer_passes = outer_passes;
    self
  }

  /// Floor on the number of boundary pixels kept per fill pass.
  pub fn with_important_count(mut self, important_count: usize) -> Self {
    self.important_count = important_count.max(1);
    self
  }

  /// Worker-thread count for the fill pass. `1` (the default) runs the pass
  /// on the calling thread with no pool at all.
  pub fn with_threads(mut self, threads: usize) -> Self {
    self.threads = threads.max(1);
    self
  }

  /// Seeds the random-number generator for this invocation. `None` (the
  /// default) seeds from OS entropy.
  pub fn with_seed(mut self, seed: u64) -> Self {
    self.seed = Some(seed);
    self
  }

  /// Legacy-mode selection rectangle `[sx1, sx2) x [sy1, sy2)`. Ignored when
  /// `use_reference` is true. Defaults to the full reference raster clipped
  /// by `comp_radius` when left unset.
  pub fn with_selection_rect(mut self, sx1: i32, sy1: i32, sx2: i32, sy2: i32) -> Self {
    self.selection_rect = Some((sx1, sy1, sx2, sy2));
    self
  }
}

/// Outcome of a `resynthesize` call that did not hit a pre-flight error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResynthesisReport {
  /// Count of masked pixels left unfilled because the boundary picker found
  /// no further progress possible (an unreachable region).
  pub unfilled: usize,
  /// Whether the run stopped early because the cancellation flag was set.
  pub cancelled: bool,
}

impl ResynthesisReport {
  pub fn complete() -> Self {
    ResynthesisReport { unfilled: 0, cancelled: false }
  }
}
