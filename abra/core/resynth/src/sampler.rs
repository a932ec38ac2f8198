use rand::Rng;

use crate::coordinate::Coordinate;
use crate::raster::Raster;

/// Proposes candidate donor locations for a fill or refinement step.
pub enum CandidateSampler<'a> {
  /// Draws from the reference-point list: every pixel that is both an
  /// eligible donor (`reference_mask != 0`) and outside `data_mask`.
  ReferenceLayer { points: &'a [Coordinate] },
  /// Rejection-samples within a pre-clipped selection rectangle, discarding
  /// draws that land on a masked pixel. Worst-case `O(area / donor-density)`
  /// per draw when donor density is low - a known weakness carried from the
  /// original algorithm.
  Legacy { data_mask: &'a Raster<u8>, rect: (i32, i32, i32, i32) },
}

impl<'a> CandidateSampler<'a> {
  /// Produces up to `tries` candidates. In reference-layer mode, once `tries`
  /// reaches or exceeds the size of the reference-point list, the whole list
  /// is returned instead of being randomly resampled.
  pub fn sample(&self, tries: u32, rng: &mut impl Rng) -> Vec<Coordinate> {
    match self {
      CandidateSampler::ReferenceLayer { points } => {
        if points.is_empty() {
          return Vec::new();
        }
        if tries as usize >= points.len() {
          return points.to_vec();
        }
        (0..tries).map(|_| points[rng.random_range(0..points.len())]).collect()
      }
      CandidateSampler::Legacy { data_mask, rect } => {
        let (sx1, sy1, sx2, sy2) = *rect;
        if sx2 <= sx1 || sy2 <= sy1 {
          return Vec::new();
        }
        let mut out = Vec::with_capacity(tries as usize);
        for _ in 0..tries {
          if let Some(p) = reject_sample(data_mask, sx1, sy1, sx2, sy2, rng) {
            out.push(p);
          }
        }
        out
      }
    }
  }
}

/// Rejection-samples a single unmasked point from `[sx1, sx2) x [sy1, sy2)`.
/// Bails out (returning `None`) after a generous bound on attempts so a
/// near-fully-masked rectangle cannot spin forever.
fn reject_sample(data_mask: &Raster<u8>, sx1: i32, sy1: i32, sx2: i32, sy2: i32, rng: &mut impl Rng) -> Option<Coordinate> {
  let area = (sx2 - sx1) as u64 * (sy2 - sy1) as u64;
  let max_attempts = (area * 4).max(64);
  for _ in 0..max_attempts {
    let x = rng.random_range(sx1..sx2);
    let y = rng.random_range(sy1..sy2);
    let p = Coordinate::new(x, y);
    if data_mask.get(p) == 0 {
      return Some(p);
    }
  }
  None
}

/// Clips a requested selection rectangle (or the full raster, when `None`)
/// so a full comparison patch around any candidate inside it lies within the
/// raster bounds.
pub fn clip_selection_rect(width: u32, height: u32, comp_radius: i32, requested: Option<(i32, i32, i32, i32)>) -> (i32, i32, i32, i32) {
  let (sx1, sy1, sx2, sy2) = requested.unwrap_or((0, 0, width as i32, height as i32));
  let sx1 = sx1.max(comp_radius);
  let sy1 = sy1.max(comp_radius);
  let sx2 = sx2.min(width as i32 - comp_radius - 1);
  let sy2 = sy2.min(height as i32 - comp_radius - 1);
  (sx1, sy1, sx2.max(sx1), sy2.max(sy1))
}
