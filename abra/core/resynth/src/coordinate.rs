use std::cmp::Ordering;
use std::ops::{Add, Sub};

/// An integer pixel coordinate.
///
/// Ordered by squared Euclidean distance from the origin; this ordering only
/// matters when materializing a sorted offset list (`Coordinate::offsets_within`)
/// and ties are broken by `(x, y)` so the resulting order is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coordinate {
  x: i32,
  y: i32,
}

impl Coordinate {
  pub fn new(x: i32, y: i32) -> Coordinate {
    Coordinate { x, y }
  }

  pub fn zero() -> Coordinate {
    Coordinate { x: 0, y: 0 }
  }

  /// Gets the x-coordinate.
  pub fn x(&self) -> i32 {
    self.x
  }

  /// Gets the y-coordinate.
  pub fn y(&self) -> i32 {
    self.y
  }

  pub fn is_zero(&self) -> bool {
    self.x == 0 && self.y == 0
  }

  /// Squared Euclidean distance from the origin.
  pub fn norm_sq(&self) -> i64 {
    (self.x as i64) * (self.x as i64) + (self.y as i64) * (self.y as i64)
  }

  /// All offsets `(ox, oy)` with `|ox|, |oy| <= radius`, sorted by distance from
  /// the origin (closest first), ties broken by `(x, y)`.
  pub fn offsets_within(radius: i32) -> Vec<Coordinate> {
    let mut offsets = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
    for oy in -radius..=radius {
      for ox in -radius..=radius {
        offsets.push(Coordinate::new(ox, oy));
      }
    }
    offsets.sort();
    offsets
  }

  /// The 8 neighbours of this coordinate, in a fixed, deterministic order.
  pub fn neighbours8(&self) -> [Coordinate; 8] {
    [
      *self + Coordinate::new(-1, -1),
      *self + Coordinate::new(0, -1),
      *self + Coordinate::new(1, -1),
      *self + Coordinate::new(-1, 0),
      *self + Coordinate::new(1, 0),
      *self + Coordinate::new(-1, 1),
      *self + Coordinate::new(0, 1),
      *self + Coordinate::new(1, 1),
    ]
  }
}

impl Add for Coordinate {
  type Output = Coordinate;
  fn add(self, rhs: Coordinate) -> Coordinate {
    Coordinate::new(self.x + rhs.x, self.y + rhs.y)
  }
}

impl Sub for Coordinate {
  type Output = Coordinate;
  fn sub(self, rhs: Coordinate) -> Coordinate {
    Coordinate::new(self.x - rhs.x, self.y - rhs.y)
  }
}

impl PartialOrd for Coordinate {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Coordinate {
  fn cmp(&self, other: &Self) -> Ordering {
    self
      .norm_sq()
      .cmp(&other.norm_sq())
      .then_with(|| self.x.cmp(&other.x))
      .then_with(|| self.y.cmp(&other.y))
  }
}

impl From<(i32, i32)> for Coordinate {
  fn from(p: (i32, i32)) -> Coordinate {
    Coordinate::new(p.0, p.1)
  }
}

impl From<Coordinate> for (i32, i32) {
  fn from(p: Coordinate) -> (i32, i32) {
    (p.x, p.y)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn add_and_sub_are_inverses() {
    let a = Coordinate::new(3, -4);
    let b = Coordinate::new(-1, 2);
    assert_eq!((a + b) - b, a);
  }

  #[test]
  fn offsets_within_are_sorted_by_distance() {
    let offsets = Coordinate::offsets_within(1);
    assert_eq!(offsets.len(), 9);
    assert_eq!(offsets[0], Coordinate::new(0, 0));
    for pair in offsets.windows(2) {
      assert!(pair[0].norm_sq() <= pair[1].norm_sq());
    }
  }

  #[test]
  fn neighbours8_excludes_self() {
    let p = Coordinate::new(5, 5);
    let neighbours = p.neighbours8();
    assert_eq!(neighbours.len(), 8);
    assert!(!neighbours.contains(&p));
    for n in neighbours {
      assert!((n.x - p.x).abs() <= 1 && (n.y - p.y).abs() <= 1);
    }
  }
}
