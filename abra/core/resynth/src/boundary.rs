use crate::coordinate::Coordinate;
use crate::raster::Raster;

/// Computes the boundary-priority "complexity" of `p`'s comparison patch:
/// the squared deviation of its defined neighbours from their mean, summed
/// across all four lanes, times their mean confidence.
///
/// Returns `-1` when the patch has no defined neighbour at all (per spec,
/// this marks `p` as having no usable context yet).
pub fn complexity(data: &Raster<u8>, confidence: &Raster<u8>, p: Coordinate, comp_radius: i32) -> i64 {
  let mut defined: Vec<Coordinate> = Vec::new();
  let mut confidence_sum: i64 = 0;

  for oy in -comp_radius..=comp_radius {
    for ox in -comp_radius..=comp_radius {
      let q = p + Coordinate::new(ox, oy);
      if confidence.is_inside(q) {
        let c = confidence.get(q);
        if c > 0 {
          confidence_sum += c as i64;
          defined.push(q);
        }
      }
    }
  }

  let defined_count = defined.len() as i64;
  if defined_count == 0 {
    return -1;
  }

  // Sum-then-divide mean; the original source's accumulator assigns instead
  // of adding into the running mean, which this spec calls out as a bug and
  // deliberately does not reproduce.
  let mut mean = [0i64; 4];
  for &q in &defined {
    let px = data.slot(q);
    for lane in 0..4 {
      mean[lane] += px[lane] as i64;
    }
  }
  for lane in mean.iter_mut() {
    *lane /= defined_count;
  }

  let mut deviation: i64 = 0;
  for &q in &defined {
    let px = data.slot(q);
    for lane in 0..4 {
      let d = mean[lane] - px[lane] as i64;
      deviation += d * d;
    }
  }
  deviation /= defined_count;

  let mean_confidence = confidence_sum / defined_count;
  deviation * mean_confidence
}

/// `true` if none of `p`'s 8 neighbours has `confidence > 0` - i.e. `p` is an
/// island with no defined context to fill from this pass.
pub fn is_island(confidence: &Raster<u8>, p: Coordinate) -> bool {
  p.neighbours8().iter().all(|&n| !confidence.is_inside(n) || confidence.get(n) == 0)
}

/// Produces this pass's prioritized boundary list from the current fill
/// queue, per §4.B:
///
/// 1. compacts `fill_queue` (drops already-filled pixels),
/// 2. skips islands,
/// 3. scores the rest by complexity,
/// 4. sorts ascending and keeps the upper half (or all, if that would leave
///    fewer than `important_count`).
pub fn pick_boundary(
  data: &Raster<u8>,
  confidence: &Raster<u8>,
  transfer_belief: &Raster<i32>,
  fill_queue: &mut Vec<Coordinate>,
  comp_radius: i32,
  important_count: usize,
) -> Vec<Coordinate> {
  fill_queue.retain(|&p| transfer_belief.get(p) < 0);

  let mut scored: Vec<(i64, Coordinate)> = fill_queue
    .iter()
    .copied()
    .filter(|&p| !is_island(confidence, p))
    .map(|p| (complexity(data, confidence, p, comp_radius), p))
    .collect();

  scored.sort_by_key(|&(score, _)| score);

  let keep_from = if scored.len() > important_count { scored.len() / 2 } else { 0 };

  scored[keep_from..].iter().map(|&(_, p)| p).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn island_has_no_defined_neighbours() {
    let confidence: Raster<u8> = Raster::new_scalar(5, 5);
    assert!(is_island(&confidence, Coordinate::new(2, 2)));
  }

  #[test]
  fn non_island_has_a_defined_neighbour() {
    let mut confidence: Raster<u8> = Raster::new_scalar(5, 5);
    confidence.set(Coordinate::new(1, 1), 255);
    assert!(!is_island(&confidence, Coordinate::new(2, 2)));
  }

  #[test]
  fn complexity_is_negative_one_without_context() {
    let data: Raster<u8> = Raster::new_pixels(5, 5, 3);
    let confidence: Raster<u8> = Raster::new_scalar(5, 5);
    assert_eq!(complexity(&data, &confidence, Coordinate::new(2, 2), 1), -1);
  }

  #[test]
  fn complexity_is_zero_for_uniform_context() {
    let mut data: Raster<u8> = Raster::new_pixels(5, 5, 3);
    let mut confidence: Raster<u8> = Raster::new_scalar(5, 5);
    for y in 0..5 {
      for x in 0..5 {
        let p = Coordinate::new(x, y);
        data.slot_mut(p).copy_from_slice(&[100, 100, 100, 0]);
        confidence.set(p, 200);
      }
    }
    assert_eq!(complexity(&data, &confidence, Coordinate::new(2, 2), 1), 0);
  }

  #[test]
  fn pick_boundary_keeps_upper_half_and_compacts_filled() {
    let data: Raster<u8> = Raster::new_pixels(10, 10, 1);
    let mut confidence: Raster<u8> = Raster::new_scalar(10, 10);
    let mut transfer_belief: Raster<i32> = Raster::new_scalar(10, 10);
    transfer_belief.as_mut_slice().iter_mut().for_each(|v| *v = -1);

    // Give every to-be-boundary pixel one defined 8-neighbour so none are islands.
    for x in 1..9 {
      confidence.set(Coordinate::new(x, 0), 255);
    }

    let mut fill_queue: Vec<Coordinate> = (1..9).map(|x| Coordinate::new(x, 1)).collect();
    // Mark one pixel as already filled; it should be compacted away.
    transfer_belief.set(Coordinate::new(1, 1), 0);

    let picked = pick_boundary(&data, &confidence, &transfer_belief, &mut fill_queue, 1, 6);
    assert!(!fill_queue.contains(&Coordinate::new(1, 1)));
    assert!(!picked.is_empty());
    assert!(picked.len() <= fill_queue.len());
  }
}
