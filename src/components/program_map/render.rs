use std::fmt::Write;

use leptos::prelude::*;

use super::geometry::{Anchors, Point, Side};

/// Height of the arrowhead. Fixed in pixels, independent of zoom.
pub const ARROW_TIP: f64 = 8.0;
pub const STROKE_WIDTH: f64 = 3.0;
pub const HIGHLIGHT_STROKE_SCALE: f64 = 1.25;

/// A connector ready to draw: SVG path directives plus the arrowhead
/// triangle. Rebuilt on every redraw from fresh measurements.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectorPath {
	pub id: String,
	pub d: String,
	pub arrow: [Point; 3],
	pub highlighted: bool,
}

impl ConnectorPath {
	pub fn from_anchors(id: String, anchors: Anchors, highlighted: bool) -> Self {
		match anchors {
			Anchors::Vertical { start, end } => Self::vertical(id, start, end, highlighted),
			Anchors::DoubleList {
				start,
				curve_start,
				end,
				side,
			} => Self::double_list(id, start, curve_start, end, side, highlighted),
		}
	}

	/// Quadratic from `start` to the midpoint, smoothly continued down to
	/// the top of the arrowhead.
	pub fn vertical(id: String, start: Point, end: Point, highlighted: bool) -> Self {
		let mid = start.midpoint(end);
		let control = Point::new(start.x, mid.y);
		let mut d = String::new();
		let _ = write!(
			d,
			"M {} {} Q {} {}, {} {} T {} {}",
			start.x,
			start.y,
			control.x,
			control.y,
			mid.x,
			mid.y,
			end.x,
			end.y - ARROW_TIP
		);
		let arrow = [
			end,
			Point::new(end.x - ARROW_TIP / 2.0, end.y - ARROW_TIP),
			Point::new(end.x + ARROW_TIP / 2.0, end.y - ARROW_TIP),
		];
		Self {
			id,
			d,
			arrow,
			highlighted,
		}
	}

	/// Straight drop along the parent's center line to `curve_start`, then a
	/// quadratic out to the child's inner edge.
	pub fn double_list(
		id: String,
		start: Point,
		curve_start: Point,
		end: Point,
		side: Side,
		highlighted: bool,
	) -> Self {
		// The arrow points away from the center line.
		let back = match side {
			Side::Left => ARROW_TIP,
			Side::Right => -ARROW_TIP,
		};
		let mut d = String::new();
		let _ = write!(
			d,
			"M {} {} L {} {} Q {} {} {} {}",
			start.x,
			start.y,
			curve_start.x,
			curve_start.y,
			curve_start.x,
			end.y,
			end.x + back,
			end.y
		);
		let arrow = [
			end,
			Point::new(end.x + back, end.y - ARROW_TIP / 2.0),
			Point::new(end.x + back, end.y + ARROW_TIP / 2.0),
		];
		Self {
			id,
			d,
			arrow,
			highlighted,
		}
	}

	pub fn stroke_width(&self) -> f64 {
		if self.highlighted {
			STROKE_WIDTH * HIGHLIGHT_STROKE_SCALE
		} else {
			STROKE_WIDTH
		}
	}

	pub fn arrow_stroke_width(&self) -> f64 {
		if self.highlighted { 2.0 } else { 1.0 }
	}

	pub fn class(&self) -> &'static str {
		if self.highlighted {
			"connector transition fill-blue-500 stroke-blue-500"
		} else {
			"connector transition fill-black stroke-black"
		}
	}

	pub fn arrow_points(&self) -> String {
		self.arrow
			.iter()
			.map(|p| format!("{},{}", p.x, p.y))
			.collect::<Vec<_>>()
			.join(" ")
	}
}

/// Draws one connector into the enclosing `<svg>` overlay.
#[component]
pub fn Connector(#[prop(into)] path: Signal<Option<ConnectorPath>>) -> impl IntoView {
	move || {
		path.get().map(|p| {
			view! {
				<g id=p.id.clone() class=p.class()>
					<path d=p.d.clone() fill="none" stroke-width=p.stroke_width().to_string() />
					<polygon points=p.arrow_points() stroke-width=p.arrow_stroke_width().to_string() />
				</g>
			}
		})
	}
}
