//! Connector anchor geometry.
//!
//! Pure functions from measured rectangles to connector endpoints. Rectangles
//! are in page coordinates as returned by `getBoundingClientRect`; the
//! results are translated into the connector overlay's own coordinate space.

/// Distance above the child's edge midpoint where a double list connector
/// leaves the parent's center line and starts curving.
pub const DOUBLE_LIST_BEND: f64 = 40.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn midpoint(self, other: Point) -> Point {
		Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self {
			x,
			y,
			width,
			height,
		}
	}

	/// A rectangle that has not been laid out yet.
	pub fn is_empty(&self) -> bool {
		self.width <= 0.0 || self.height <= 0.0
	}

	pub fn center_x(&self) -> f64 {
		self.x + self.width / 2.0
	}

	pub fn center_y(&self) -> f64 {
		self.y + self.height / 2.0
	}

	pub fn right(&self) -> f64 {
		self.x + self.width
	}

	pub fn bottom(&self) -> f64 {
		self.y + self.height
	}

	pub fn top_center(&self) -> Point {
		Point::new(self.center_x(), self.y)
	}

	pub fn bottom_center(&self) -> Point {
		Point::new(self.center_x(), self.bottom())
	}

	pub fn mid_left(&self) -> Point {
		Point::new(self.x, self.center_y())
	}

	pub fn mid_right(&self) -> Point {
		Point::new(self.right(), self.center_y())
	}
}

/// Which column of a double list a node sits in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
	Left,
	Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectorLayout {
	/// Parent bottom-center to child top-center.
	#[default]
	Vertical,
	/// Down the parent's center line, then out to the child's inner edge.
	DoubleList(Side),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchors {
	Vertical {
		start: Point,
		end: Point,
	},
	DoubleList {
		start: Point,
		curve_start: Point,
		end: Point,
		side: Side,
	},
}

/// Connector endpoints for a parent/child pair, relative to `origin` (the
/// top-left corner of the overlay the connector is drawn in).
///
/// Returns `None` while either box is unmeasured.
pub fn anchors(parent: Rect, child: Rect, origin: Point, layout: ConnectorLayout) -> Option<Anchors> {
	if parent.is_empty() || child.is_empty() {
		return None;
	}
	let local = |p: Point| Point::new(p.x - origin.x, p.y - origin.y);
	let start = local(parent.bottom_center());

	Some(match layout {
		ConnectorLayout::Vertical => Anchors::Vertical {
			start,
			end: local(child.top_center()),
		},
		ConnectorLayout::DoubleList(side) => {
			let end = local(match side {
				Side::Left => child.mid_right(),
				Side::Right => child.mid_left(),
			});
			let curve_start = Point::new(start.x, (end.y - DOUBLE_LIST_BEND).max(start.y));
			Anchors::DoubleList {
				start,
				curve_start,
				end,
				side,
			}
		}
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	const PARENT: Rect = Rect::new(100.0, 50.0, 200.0, 100.0);

	#[test]
	fn vertical_runs_bottom_center_to_top_center() {
		let child = Rect::new(60.0, 300.0, 80.0, 40.0);
		let anchors = anchors(PARENT, child, Point::new(10.0, 20.0), ConnectorLayout::Vertical).unwrap();
		assert_eq!(
			anchors,
			Anchors::Vertical {
				start: Point::new(190.0, 130.0),
				end: Point::new(90.0, 280.0),
			}
		);
	}

	#[test]
	fn double_list_fans_out_symmetrically() {
		let origin = Point::default();
		let left = Rect::new(0.0, 400.0, 150.0, 60.0);
		let right = Rect::new(250.0, 400.0, 150.0, 60.0);

		let Some(Anchors::DoubleList { start, curve_start, end: left_end, .. }) =
			anchors(PARENT, left, origin, ConnectorLayout::DoubleList(Side::Left))
		else {
			panic!("expected double list anchors");
		};
		let Some(Anchors::DoubleList { curve_start: right_curve, end: right_end, .. }) =
			anchors(PARENT, right, origin, ConnectorLayout::DoubleList(Side::Right))
		else {
			panic!("expected double list anchors");
		};

		assert_eq!(start, Point::new(200.0, 150.0));
		assert_eq!(left_end, Point::new(150.0, 430.0));
		assert_eq!(right_end, Point::new(250.0, 430.0));
		assert_eq!(curve_start, right_curve);
		assert_eq!(curve_start, Point::new(200.0, 430.0 - DOUBLE_LIST_BEND));
		assert_eq!(start.x - left_end.x, right_end.x - start.x);
	}

	#[test]
	fn curve_start_never_rises_above_parent() {
		let close = Rect::new(0.0, 140.0, 150.0, 40.0);
		let anchors = anchors(PARENT, close, Point::default(), ConnectorLayout::DoubleList(Side::Left)).unwrap();
		let Anchors::DoubleList { start, curve_start, .. } = anchors else {
			panic!("expected double list anchors");
		};
		assert_eq!(curve_start.y, start.y);
	}

	#[test]
	fn unmeasured_boxes_yield_nothing() {
		let child = Rect::new(0.0, 0.0, 0.0, 0.0);
		assert!(anchors(PARENT, child, Point::default(), ConnectorLayout::Vertical).is_none());
		assert!(anchors(Rect::default(), PARENT, Point::default(), ConnectorLayout::Vertical).is_none());
	}
}
