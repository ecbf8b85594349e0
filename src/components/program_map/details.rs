//! Content of the side panel's "active node" section and the bookkeeping
//! that keeps a slow course lookup from overwriting a newer one.

use super::state::NodeId;
use super::types::{Course, CourseDetails, Credits};
use crate::error::FetchError;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DetailsStatus {
	#[default]
	Idle,
	Loading,
	Loaded,
	Failed(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActiveNodeDetails {
	pub node: Option<NodeId>,
	pub title: String,
	pub url: Option<String>,
	pub code: Option<String>,
	pub credits: Option<Credits>,
	pub paragraphs: Vec<String>,
	pub description: Option<String>,
	pub status: DetailsStatus,
}

impl ActiveNodeDetails {
	/// What is known about a course before its details arrive.
	pub fn from_course(node: NodeId, course: &Course) -> Self {
		Self {
			node: Some(node),
			title: course.display_name(),
			url: Some(course.url.clone()),
			code: Some(course.code()),
			credits: Some(course.credits),
			paragraphs: Vec::new(),
			description: None,
			status: DetailsStatus::Loading,
		}
	}

	pub fn with_course_details(mut self, details: &CourseDetails) -> Self {
		self.title = details.name.clone();
		self.url = Some(details.url.clone());
		self.code = Some(format!("{} {}", details.subject_code, details.number));
		self.credits = Some(details.credits());
		self.description = Some(details.description.clone()).filter(|d| !d.trim().is_empty());
		self.paragraphs = [
			("Prerequisites", &details.prerequisite_narrative),
			("Corequisites", &details.corequisite_narrative),
		]
		.into_iter()
		.filter_map(|(label, text)| {
			text.as_deref()
				.filter(|t| !t.trim().is_empty())
				.map(|t| format!("{label}: {t}"))
		})
		.collect();
		self.status = DetailsStatus::Loaded;
		self
	}

	pub fn with_failure(mut self, err: &FetchError) -> Self {
		self.status = DetailsStatus::Failed(err.to_string());
		self
	}

	/// Short status shown inside the box of `node` while its details are
	/// pending or after they failed.
	pub fn inline_status(&self, node: &NodeId) -> Option<&'static str> {
		if self.node.as_ref() != Some(node) {
			return None;
		}
		match self.status {
			DetailsStatus::Loading => Some("Loading details..."),
			DetailsStatus::Failed(_) => Some("Failed to load details"),
			DetailsStatus::Idle | DetailsStatus::Loaded => None,
		}
	}

	/// What the diagram's layout depends on: the inline status of the node
	/// the details belong to.
	pub fn layout_key(&self) -> Option<(NodeId, &'static str)> {
		let node = self.node.clone()?;
		let status = self.inline_status(&node)?;
		Some((node, status))
	}
}

/// Identifies one details request: the node it was issued for and when.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailsTicket {
	pub node: NodeId,
	generation: u64,
}

/// Tracks which details request is current. Earlier requests are never
/// cancelled; their responses are simply refused.
#[derive(Clone, Debug, Default)]
pub struct DetailsTracker {
	current: Option<DetailsTicket>,
	generation: u64,
}

impl DetailsTracker {
	pub fn begin(&mut self, node: NodeId) -> DetailsTicket {
		self.generation += 1;
		let ticket = DetailsTicket {
			node,
			generation: self.generation,
		};
		self.current = Some(ticket.clone());
		ticket
	}

	pub fn is_current(&self, ticket: &DetailsTicket) -> bool {
		self.current.as_ref() == Some(ticket)
	}

	pub fn reset(&mut self) {
		self.current = None;
	}
}
