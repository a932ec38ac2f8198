use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::coordinate::Coordinate;
use crate::error::Error;
use crate::params::ResynthesizeParams;
use crate::raster::Raster;
use crate::sampler::clip_selection_rect;

/// All driver-owned state for one `resynthesize` invocation.
///
/// Built once during setup and threaded through every component; no globals.
pub struct ResynthesisContext {
  pub data: Raster<u8>,
  pub data_mask: Raster<u8>,
  pub reference: Raster<u8>,
  pub reference_mask: Raster<u8>,
  pub confidence: Raster<u8>,
  pub transfer_source: Raster<Coordinate>,
  pub transfer_belief: Raster<i32>,

  pub channels: u32,
  pub params: ResynthesizeParams,
  pub rng: SmallRng,

  pub fill_queue: Vec<Coordinate>,
  pub reference_points: Vec<Coordinate>,
  pub selection_rect: (i32, i32, i32, i32),
}

impl ResynthesisContext {
  pub fn new(
    data: Raster<u8>,
    data_mask: Raster<u8>,
    reference: Raster<u8>,
    reference_mask: Raster<u8>,
    channels: u32,
    params: ResynthesizeParams,
  ) -> Result<ResynthesisContext, Error> {
    let width = data.width();
    let height = data.height();

    if !(channels == 1 || channels == 3 || channels == 4) {
      return Err(Error::ChannelCountOutOfRange { channels });
    }
    require_same_shape(width, height, "data_mask", data_mask.width(), data_mask.height())?;
    require_same_shape(width, height, "reference", reference.width(), reference.height())?;
    require_same_shape(width, height, "reference_mask", reference_mask.width(), reference_mask.height())?;

    let min_side = (2 * params.comp_radius + 1).max(0) as u32;
    if width < min_side || height < min_side {
      return Err(Error::RasterTooSmall { width, height, min: min_side, comp_radius: params.comp_radius });
    }

    let mut confidence: Raster<u8> = Raster::new_scalar(width, height);
    let mut transfer_source: Raster<Coordinate> = Raster::new_scalar(width, height);
    let mut transfer_belief: Raster<i32> = Raster::new_scalar(width, height);
    let mut fill_queue = Vec::new();

    for y in 0..height as i32 {
      for x in 0..width as i32 {
        let p = Coordinate::new(x, y);
        if data_mask.get(p) == 0 {
          confidence.set(p, 255);
          transfer_belief.set(p, 0);
          transfer_source.set(p, p);
        } else {
          confidence.set(p, 0);
          transfer_belief.set(p, -1);
          fill_queue.push(p);
        }
      }
    }

    let reference_points: Vec<Coordinate> = (0..height as i32)
      .flat_map(|y| (0..width as i32).map(move |x| Coordinate::new(x, y)))
      .filter(|&p| reference_mask.get(p) != 0 && data_mask.get(p) == 0)
      .collect();

    let selection_rect = clip_selection_rect(width, height, params.comp_radius, params.selection_rect);

    if !fill_queue.is_empty() {
      let legacy_area_empty = selection_rect.2 <= selection_rect.0 || selection_rect.3 <= selection_rect.1;
      let no_donors = if params.use_reference { reference_points.is_empty() } else { legacy_area_empty };
      if no_donors {
        return Err(Error::NoDonors);
      }
    }

    let rng = match params.seed {
      Some(seed) => SmallRng::seed_from_u64(seed),
      None => SmallRng::from_os_rng(),
    };

    Ok(ResynthesisContext {
      data,
      data_mask,
      reference,
      reference_mask,
      confidence,
      transfer_source,
      transfer_belief,
      channels,
      params,
      rng,
      fill_queue,
      reference_points,
      selection_rect,
    })
  }

  /// The raster and definedness-raster pair that donor candidates are drawn
  /// from and compared against, for the invocation's sampling mode. Since
  /// `use_reference` is fixed for the whole invocation, every recorded
  /// `transfer_source` coordinate indexes into the same raster for the
  /// lifetime of this context - no per-pixel space tag is needed.
  pub fn source_pixels(&self) -> &Raster<u8> {
    if self.params.use_reference { &self.reference } else { &self.data }
  }

  pub fn source_defined(&self) -> &Raster<u8> {
    if self.params.use_reference { &self.reference_mask } else { &self.confidence }
  }
}

fn require_same_shape(w: u32, h: u32, what: &'static str, other_w: u32, other_h: u32) -> Result<(), Error> {
  if w != other_w || h != other_h {
    return Err(Error::MismatchedDimensions { what, data_w: w, data_h: h, other_w, other_h });
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn blank_rasters(w: u32, h: u32, channels: u32) -> (Raster<u8>, Raster<u8>, Raster<u8>, Raster<u8>) {
    (
      Raster::new_pixels(w, h, channels),
      Raster::new_scalar(w, h),
      Raster::new_pixels(w, h, channels),
      Raster::new_scalar(w, h),
    )
  }

  #[test]
  fn rejects_mismatched_dimensions() {
    let (data, _, reference, reference_mask) = blank_rasters(10, 10, 3);
    let data_mask: Raster<u8> = Raster::new_scalar(9, 9);
    let err = ResynthesisContext::new(data, data_mask, reference, reference_mask, 3, ResynthesizeParams::new()).unwrap_err();
    assert!(matches!(err, Error::MismatchedDimensions { .. }));
  }

  #[test]
  fn rejects_bad_channel_count() {
    let (data, data_mask, reference, reference_mask) = blank_rasters(10, 10, 3);
    let err = ResynthesisContext::new(data, data_mask, reference, reference_mask, 2, ResynthesizeParams::new()).unwrap_err();
    assert!(matches!(err, Error::ChannelCountOutOfRange { channels: 2 }));
  }

  #[test]
  fn rejects_raster_smaller_than_comp_window() {
    let (data, data_mask, reference, reference_mask) = blank_rasters(4, 4, 3);
    let params = ResynthesizeParams::new().with_comp_radius(3);
    let err = ResynthesisContext::new(data, data_mask, reference, reference_mask, 3, params).unwrap_err();
    assert!(matches!(err, Error::RasterTooSmall { .. }));
  }

  #[test]
  fn empty_mask_has_no_fill_queue_and_no_donor_error() {
    let (data, data_mask, reference, reference_mask) = blank_rasters(10, 10, 3);
    let ctx = ResynthesisContext::new(data, data_mask, reference, reference_mask, 3, ResynthesizeParams::new()).unwrap();
    assert!(ctx.fill_queue.is_empty());
  }

  #[test]
  fn no_donors_when_reference_mask_empty_and_mask_present() {
    let (data, mut data_mask, reference, reference_mask) = blank_rasters(10, 10, 3);
    data_mask.set(Coordinate::new(5, 5), 1);
    let err = ResynthesisContext::new(data, data_mask, reference, reference_mask, 3, ResynthesizeParams::new()).unwrap_err();
    assert_eq!(err, Error::NoDonors);
  }

  #[test]
  fn ground_truth_pixels_get_full_confidence_and_self_source() {
    let (data, data_mask, reference, reference_mask) = blank_rasters(10, 10, 3);
    let ctx = ResynthesisContext::new(data, data_mask, reference, reference_mask, 3, ResynthesizeParams::new()).unwrap();
    let p = Coordinate::new(3, 3);
    assert_eq!(ctx.confidence.get(p), 255);
    assert_eq!(ctx.transfer_belief.get(p), 0);
    assert_eq!(ctx.transfer_source.get(p), p);
  }
}
