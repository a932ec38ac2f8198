use rand::{Rng, SeedableRng};
use rand::rngs::SmallRng;
use rayon::prelude::*;

use crate::comparator::{score_patch, PatchScore, PatchSide};
use crate::context::ResynthesisContext;
use crate::coordinate::Coordinate;
use crate::sampler::CandidateSampler;

/// The per-pixel outcome of a fill attempt: the chosen donor and its score,
/// or `None` if the sampler produced no usable candidate this pass.
type FillOutcome = Option<(Coordinate, PatchScore)>;

/// Runs one fill pass over `boundary`, writing results back into `ctx`.
///
/// Scoring for every pixel in `boundary` is read-only with respect to `ctx`
/// (it only reads `data`/`confidence`/the source raster), so it can run in
/// parallel across `ctx.params.threads` workers; every write - pixel color,
/// confidence, transfer source and belief - is deferred and applied
/// sequentially afterwards so no pixel's write is visible to another pixel's
/// read within the same pass.
///
/// Returns the number of pixels actually filled this pass.
pub fn fill_pass(ctx: &mut ResynthesisContext, boundary: &[Coordinate]) -> usize {
  let seeds: Vec<u64> = (0..boundary.len()).map(|_| ctx.rng.random()).collect();

  // Reborrow as shared: scoring only reads `ctx`, and a shared reference is
  // what lets the parallel branch satisfy rayon's `Sync` requirement.
  let ctx_ref: &ResynthesisContext = ctx;

  let outcomes: Vec<FillOutcome> = if ctx_ref.params.threads > 1 {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(ctx_ref.params.threads).build().expect("failed to build resynth thread pool");
    pool.install(|| {
      boundary
        .par_iter()
        .zip(seeds.par_iter())
        .map(|(&p, &seed)| score_pixel(ctx_ref, p, &mut SmallRng::seed_from_u64(seed)))
        .collect()
    })
  } else {
    boundary
      .iter()
      .zip(seeds.iter())
      .map(|(&p, &seed)| score_pixel(ctx_ref, p, &mut SmallRng::seed_from_u64(seed)))
      .collect()
  };

  let mut filled = 0;
  for (&p, outcome) in boundary.iter().zip(outcomes.into_iter()) {
    if let Some((candidate, score)) = outcome {
      apply_transfer(ctx, p, candidate, score);
      filled += 1;
    }
  }
  filled
}

/// Draws `params.tries` candidates for `p` and keeps the lowest-cost one.
fn score_pixel(ctx: &ResynthesisContext, p: Coordinate, rng: &mut impl Rng) -> FillOutcome {
  let sampler = if ctx.params.use_reference {
    CandidateSampler::ReferenceLayer { points: &ctx.reference_points }
  } else {
    CandidateSampler::Legacy { data_mask: &ctx.data_mask, rect: ctx.selection_rect }
  };
  let candidates = sampler.sample(ctx.params.tries, rng);
  if candidates.is_empty() {
    return None;
  }

  let target_side = PatchSide { pixels: &ctx.data, defined: &ctx.confidence };
  let candidate_side = PatchSide { pixels: ctx.source_pixels(), defined: ctx.source_defined() };

  let mut best: FillOutcome = None;
  for candidate in candidates {
    let best_so_far = best.as_ref().map(|(_, s)| s.cost).unwrap_or(i64::MAX);
    let score = score_patch(
      &target_side,
      &candidate_side,
      p,
      candidate,
      ctx.params.comp_radius,
      best_so_far,
      ctx.channels,
      ctx.params.max_adjustment,
      ctx.params.equal_adjustment,
    );
    if score.cost < best_so_far {
      best = Some((candidate, score));
    }
  }
  best
}

/// Writes the chosen donor's (offset-adjusted) color into `data[p]` and
/// updates `confidence`, `transfer_source` and `transfer_belief` per §4.E's
/// decay rule: the new confidence is `max(10, donor_confidence - 5)`, so a
/// chain of transfers decays towards (but never below) 10, keeping later
/// passes from trusting a long chain of guesses as much as solid ground
/// truth. A reference-layer donor is treated as fully known (confidence 255)
/// since it is never itself synthesized.
pub(crate) fn apply_transfer(ctx: &mut ResynthesisContext, p: Coordinate, candidate: Coordinate, score: PatchScore) {
  let donor_confidence: i32 = if ctx.params.use_reference { 255 } else { ctx.confidence.get(candidate) as i32 };
  let donor_pixel: [u8; 4] = {
    let slot = ctx.source_pixels().slot(candidate);
    [slot[0], slot[1], slot[2], slot[3]]
  };

  let dst = ctx.data.slot_mut(p);
  for lane in 0..4 {
    let shifted = donor_pixel[lane] as i32 + score.offset[lane];
    dst[lane] = shifted.clamp(0, 255) as u8;
  }

  ctx.confidence.set(p, donor_confidence.saturating_sub(5).max(10) as u8);
  ctx.transfer_source.set(p, candidate);
  ctx.transfer_belief.set(p, score.cost.min(i32::MAX as i64) as i32);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::params::ResynthesizeParams;
  use crate::raster::Raster;

  fn flat_context(value: u8, hole: (i32, i32, i32, i32)) -> ResynthesisContext {
    let mut data: Raster<u8> = Raster::new_pixels(16, 16, 1);
    let mut data_mask: Raster<u8> = Raster::new_scalar(16, 16);
    for y in 0..16 {
      for x in 0..16 {
        data.slot_mut(Coordinate::new(x, y))[0] = value;
      }
    }
    for y in hole.1..hole.3 {
      for x in hole.0..hole.2 {
        let p = Coordinate::new(x, y);
        data.slot_mut(p)[0] = 0;
        data_mask.set(p, 1);
      }
    }
    let reference = data.clone();
    let reference_mask: Raster<u8> = Raster::new_scalar(16, 16);
    let params = ResynthesizeParams::new().with_seed(42).with_use_reference(false).with_tries(16);
    ResynthesisContext::new(data, data_mask, reference, reference_mask, 1, params).unwrap()
  }

  #[test]
  fn fill_pass_reproduces_flat_color_in_a_hole() {
    let mut ctx = flat_context(200, (6, 6, 10, 10));
    let boundary: Vec<Coordinate> = ctx.fill_queue.clone();
    let filled = fill_pass(&mut ctx, &boundary);
    assert!(filled > 0);
    for &p in &boundary {
      if ctx.transfer_belief.get(p) >= 0 {
        assert_eq!(ctx.data.slot(p)[0], 200);
        assert!(ctx.confidence.get(p) >= 10);
      }
    }
  }

  #[test]
  fn unfilled_pixels_keep_negative_belief() {
    let mut ctx = flat_context(128, (1, 1, 3, 3));
    let boundary: Vec<Coordinate> = ctx.fill_queue.clone();
    fill_pass(&mut ctx, &boundary);
    for &p in &boundary {
      assert!(ctx.transfer_belief.get(p) >= 0 || ctx.transfer_belief.get(p) == -1);
    }
  }
}
