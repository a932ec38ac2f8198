use rand::Rng;

use crate::comparator::{score_patch, PatchSide};
use crate::context::ResynthesisContext;
use crate::coordinate::Coordinate;
use crate::fill::apply_transfer;

/// Runs one refinement sweep over `pixels`, in forward or reverse order, and
/// returns how many pixels improved on their current transfer.
///
/// Each pixel is refined against two sources of candidates:
///
/// 1. coherence: for every already-transferred 8-neighbour `n`, the offset
///    that made `n`'s transfer work (`transfer_source[n] - n`) is reapplied
///    at `p`, on the idea that a patch which worked for a neighbour likely
///    works here too;
/// 2. shrinking random search: starting from `p`'s own current source and a
///    window covering the whole raster, candidates are drawn from a
///    window around that source that halves every round until it vanishes.
///
/// This mutates pixels one at a time and in sequence (each pixel's updated
/// `transfer_source` can feed the next pixel's coherence candidates within
/// the same sweep), so, unlike `fill_pass`, this never runs in parallel.
pub fn refine_sweep(ctx: &mut ResynthesisContext, pixels: &[Coordinate], reverse: bool) -> usize {
  let mut improved = 0;
  let indices: Box<dyn Iterator<Item = usize>> = if reverse { Box::new((0..pixels.len()).rev()) } else { Box::new(0..pixels.len()) };

  for i in indices {
    let p = pixels[i];
    if ctx.transfer_belief.get(p) < 0 {
      continue;
    }
    if refine_pixel(ctx, p) {
      improved += 1;
    }
  }
  improved
}

fn refine_pixel(ctx: &mut ResynthesisContext, p: Coordinate) -> bool {
  let mut candidates = coherence_candidates(ctx, p);
  candidates.extend(random_search_candidates(ctx, p));

  if candidates.is_empty() {
    return false;
  }

  let current_source = ctx.transfer_source.get(p);
  let current_cost = ctx.transfer_belief.get(p) as i64;

  let target_side = PatchSide { pixels: &ctx.data, defined: &ctx.confidence };
  let candidate_side = PatchSide { pixels: ctx.source_pixels(), defined: ctx.source_defined() };

  let mut best: Option<(Coordinate, crate::comparator::PatchScore)> = None;
  let mut best_so_far = current_cost;

  for candidate in candidates {
    if candidate == current_source {
      continue;
    }
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
      best_so_far = score.cost;
      best = Some((candidate, score));
    }
  }

  match best {
    Some((candidate, score)) => {
      apply_transfer(ctx, p, candidate, score);
      true
    }
    None => false,
  }
}

/// Candidate sources proposed by `p`'s already-transferred, synthesized
/// 8-neighbours: the offset that worked for `n` (`transfer_source[n] - n`),
/// reapplied at `p`. Ground-truth neighbours are excluded - `data_mask[n] ==
/// 0` means `n` was never synthesized, so `transfer_source[n] == n` and the
/// "offset" would just be zero, proposing `p` itself as its own candidate.
fn coherence_candidates(ctx: &ResynthesisContext, p: Coordinate) -> Vec<Coordinate> {
  p.neighbours8()
    .into_iter()
    .filter(|&n| ctx.transfer_belief.is_inside(n) && ctx.data_mask.get(n) != 0 && ctx.transfer_belief.get(n) >= 0)
    .map(|n| {
      let offset = ctx.transfer_source.get(n) - n;
      p + offset
    })
    .collect()
}

/// Shrinking window search around `p`'s current source: the window starts at
/// `max(width, height)` and halves every round until it would contribute no
/// offset (`< 1`), per §4.F. A draw is only kept if it lands inside the
/// raster and outside `data_mask` - candidates on masked (not yet ground
/// truth) pixels are dropped rather than proposed.
fn random_search_candidates(ctx: &mut ResynthesisContext, p: Coordinate) -> Vec<Coordinate> {
  let source = ctx.transfer_source.get(p);
  let mut search_range = ctx.data.width().max(ctx.data.height()) as i32;
  let mut candidates = Vec::new();

  while search_range >= 1 {
    let ox = ctx.rng.random_range(-search_range..=search_range);
    let oy = ctx.rng.random_range(-search_range..=search_range);
    let candidate = source + Coordinate::new(ox, oy);
    if ctx.data.is_inside(candidate) && ctx.data_mask.get(candidate) == 0 {
      candidates.push(candidate);
    }
    search_range /= 2;
  }
  candidates
}
