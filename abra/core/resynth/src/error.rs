use thiserror::Error;

/// Errors raised during pre-flight validation, before any pass runs.
///
/// Cancellation is not an error (see `ResynthesisReport::cancelled`), and
/// neither is an empty mask or an unreachable region — both of those are
/// `Ok` outcomes reported through `ResynthesisReport`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
  #[error("data and {what} have mismatched dimensions: {data_w}x{data_h} vs {other_w}x{other_h}")]
  MismatchedDimensions {
    what: &'static str,
    data_w: u32,
    data_h: u32,
    other_w: u32,
    other_h: u32,
  },

  #[error("channel count {channels} is out of range, expected 1, 3 or 4")]
  ChannelCountOutOfRange { channels: u32 },

  #[error("raster is {width}x{height}, smaller than the minimum {min}x{min} required for comp_radius {comp_radius}")]
  RasterTooSmall { width: u32, height: u32, min: u32, comp_radius: i32 },

  #[error("no donor pixels are available: the reference-point list and the legacy selection rectangle are both empty")]
  NoDonors,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn messages_have_no_trailing_punctuation() {
    let errors = [
      Error::MismatchedDimensions { what: "data_mask", data_w: 4, data_h: 4, other_w: 5, other_h: 5 },
      Error::ChannelCountOutOfRange { channels: 2 },
      Error::RasterTooSmall { width: 2, height: 2, min: 7, comp_radius: 3 },
      Error::NoDonors,
    ];
    for error in errors {
      let message = error.to_string();
      assert!(!message.ends_with('.'));
    }
  }
}
