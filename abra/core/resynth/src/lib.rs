//! Patch-based resynthesis: fills a masked region of an image with content
//! plausibly sampled from the rest of the image (or a separate reference
//! image), by greedy boundary-inward patch matching followed by coherence
//! and random-search refinement.

mod boundary;
mod comparator;
mod context;
mod coordinate;
mod debug;
mod driver;
mod error;
mod fill;
mod params;
mod raster;
mod refine;
mod sampler;

pub use coordinate::Coordinate;
pub use driver::resynthesize;
pub use error::Error;
pub use params::{ResynthesisReport, ResynthesizeParams};
pub use raster::Raster;

pub type Result<T> = std::result::Result<T, Error>;
