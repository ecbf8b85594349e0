//! Flow layout decisions that are not left to CSS: the double course list
//! split and its one-time balancing, `And` flow direction, and centering the
//! diagram in its scroll container.

/// Entries up to this count flow in a row inside a top-level `And`.
pub const AND_ROW_LIMIT: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub enum Columns<T> {
	/// n <= 1: one centered column.
	Single(Vec<T>),
	/// Even indices left, odd indices right.
	Double { left: Vec<T>, right: Vec<T> },
}

pub fn split_columns<T>(items: impl IntoIterator<Item = T>) -> Columns<T> {
	let items: Vec<T> = items.into_iter().collect();
	if items.len() <= 1 {
		return Columns::Single(items);
	}
	let (mut left, mut right) = (Vec::new(), Vec::new());
	for (i, item) in items.into_iter().enumerate() {
		if i % 2 == 0 {
			left.push(item);
		} else {
			right.push(item);
		}
	}
	Columns::Double { left, right }
}

/// Outer-edge padding that keeps the gap between the two columns centered
/// under the parent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColumnPadding {
	pub left: f64,
	pub right: f64,
}

pub fn column_padding(left_width: f64, right_width: f64) -> ColumnPadding {
	let diff = (left_width - right_width).abs();
	if left_width < right_width {
		ColumnPadding {
			left: diff,
			right: 0.0,
		}
	} else {
		ColumnPadding {
			left: 0.0,
			right: diff,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlowDirection {
	Row,
	#[default]
	Column,
}

impl FlowDirection {
	pub fn class(self) -> &'static str {
		match self {
			FlowDirection::Row => "flex-row",
			FlowDirection::Column => "flex-col",
		}
	}
}

pub fn and_flow(len: usize, nested: bool) -> FlowDirection {
	if len <= AND_ROW_LIMIT && !nested {
		FlowDirection::Row
	} else {
		FlowDirection::Column
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollCentering {
	pub scroll_left: f64,
	/// The content is narrower than the container, so it is centered with
	/// flexbox instead of scrolling.
	pub fits: bool,
}

pub fn center_scroll(scroll_width: f64, client_width: f64, content_width: f64) -> ScrollCentering {
	ScrollCentering {
		scroll_left: ((scroll_width - client_width) / 2.0).max(0.0),
		fits: content_width < client_width,
	}
}
