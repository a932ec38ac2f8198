use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::boundary::pick_boundary;
use crate::context::ResynthesisContext;
use crate::coordinate::Coordinate;
use crate::debug::DebugResynth;
use crate::error::Error;
use crate::fill::fill_pass;
use crate::params::{ResynthesizeParams, ResynthesisReport};
use crate::raster::Raster;
use crate::refine::refine_sweep;

/// Fills every masked pixel of `data` using context from `data` itself and/or
/// `reference`, alternating boundary selection, candidate fill and local
/// refinement until the fill queue is exhausted or no further progress is
/// possible, then runs `params.outer_passes` final refinement sweeps over the
/// whole filled region.
///
/// `progress` is called after each fill pass with the fraction of originally
/// masked pixels now resolved (`0.0..=1.0`); `cancel`, when set at any poll
/// point, stops the run early and the returned report records it. Neither an
/// empty mask nor an unreachable sub-region is an error: both are `Ok`
/// reports, the latter with `unfilled > 0`.
pub fn resynthesize(
  data: Raster<u8>,
  data_mask: Raster<u8>,
  reference: Raster<u8>,
  reference_mask: Raster<u8>,
  channels: u32,
  params: ResynthesizeParams,
  mut progress: impl FnMut(f32),
  cancel: &AtomicBool,
) -> Result<(Raster<u8>, ResynthesisReport), Error> {
  let start = Instant::now();
  let inner_passes = params.inner_passes;
  let outer_passes = params.outer_passes;
  let comp_radius = params.comp_radius;
  let important_count = params.important_count;

  let mut ctx = ResynthesisContext::new(data, data_mask, reference, reference_mask, channels, params)?;
  let all_masked: Vec<Coordinate> = ctx.fill_queue.clone();
  let total = all_masked.len().max(1);
  let mut cancelled = false;

  while !ctx.fill_queue.is_empty() {
    if cancel.load(Ordering::Relaxed) {
      cancelled = true;
      break;
    }

    let boundary = pick_boundary(&ctx.data, &ctx.confidence, &ctx.transfer_belief, &mut ctx.fill_queue, comp_radius, important_count);
    if boundary.is_empty() {
      break;
    }

    let pass_start = Instant::now();
    fill_pass(&mut ctx, &boundary);
    DebugResynth::FillPass(boundary.len(), ctx.fill_queue.len(), pass_start.elapsed()).log();

    if cancel.load(Ordering::Relaxed) {
      cancelled = true;
      break;
    }

    let refine_start = Instant::now();
    let mut sweeps_run = 0;
    let mut total_improved = 0;
    for i in 0..inner_passes {
      let improved = refine_sweep(&mut ctx, &boundary, i % 2 == 1);
      sweeps_run += 1;
      total_improved += improved;
      if improved == 0 {
        break;
      }
    }
    DebugResynth::RefinementBlock(sweeps_run, total_improved, refine_start.elapsed()).log();

    let resolved = all_masked.iter().filter(|&&p| ctx.transfer_belief.get(p) >= 0).count();
    progress(resolved as f32 / total as f32);
  }

  if !cancelled {
    for i in 0..outer_passes {
      if cancel.load(Ordering::Relaxed) {
        cancelled = true;
        break;
      }
      let refine_start = Instant::now();
      let improved = refine_sweep(&mut ctx, &all_masked, i % 2 == 1);
      DebugResynth::RefinementBlock(1, improved, refine_start.elapsed()).log();
    }
  }

  let unfilled = all_masked.iter().filter(|&&p| ctx.transfer_belief.get(p) < 0).count();
  DebugResynth::Finished(unfilled, cancelled, start.elapsed()).log();

  Ok((ctx.data, ResynthesisReport { unfilled, cancelled }))
}
