use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, warn};

use super::details::{ActiveNodeDetails, DetailsTracker};
use super::mapper::DiagramNode;
use super::state::{NodeId, NodeRegistry};
use super::types::Course;
use crate::api::{ApiConfig, fetch_course_details};
use crate::error::DiagramError;

/// Shared diagram state, provided once at the app root.
///
/// Every node reads the registry through its own memo, so a registry write
/// only re-renders the nodes whose snapshot changed.
#[derive(Clone, Copy)]
pub struct ProgramMapContext {
	pub registry: RwSignal<NodeRegistry>,
	pub active_details: RwSignal<ActiveNodeDetails>,
	pub show_details: RwSignal<bool>,
	details: StoredValue<DetailsTracker>,
}

impl ProgramMapContext {
	pub fn new() -> Self {
		Self {
			registry: RwSignal::new(NodeRegistry::new()),
			active_details: RwSignal::new(ActiveNodeDetails::default()),
			show_details: RwSignal::new(false),
			details: StoredValue::new(DetailsTracker::default()),
		}
	}

	pub fn provide() -> Self {
		let ctx = Self::new();
		provide_context(ctx);
		ctx
	}

	/// Discards every node of the previously shown program.
	pub fn reset(&self) {
		self.registry.update(NodeRegistry::clear);
		self.details.update_value(DetailsTracker::reset);
		self.active_details.set(ActiveNodeDetails::default());
	}

	/// Adds `node` to the registry. Must run before any of its children
	/// register; an orphan is reported and left unconnected.
	pub fn register(&self, node: &DiagramNode) {
		let result = self.registry.try_update_untracked(|registry| {
			registry.register(node.id.clone(), node.parent.clone(), node.title.clone())
		});
		if let Some(Err(err)) = result {
			report(&err, node);
		}
	}

	pub fn hover(&self, id: &NodeId, entering: bool) {
		self.registry.update(|registry| {
			let result = if entering {
				registry.hover_enter(id)
			} else {
				registry.hover_leave(id)
			};
			if let Err(err) = result {
				warn!("hover ignored: {err}");
			}
		});
	}

	pub fn toggle_selected(&self, id: &NodeId) {
		self.registry.update(|registry| match registry.toggle_selected(id) {
			Ok(selected) => debug!("node `{id}` selected: {selected}"),
			Err(err) => warn!("selection ignored: {err}"),
		});
	}

	pub fn redraw_all(&self) {
		self.registry.update(NodeRegistry::request_redraw_all);
	}

	pub fn selected_titles(&self) -> Signal<Vec<String>> {
		let registry = self.registry;
		Signal::derive(move || registry.with(NodeRegistry::selected_titles))
	}

	/// Shows what is known about `course` right away and fills in the rest
	/// when the lookup returns, unless another request was made meanwhile.
	pub fn request_course_details(&self, node: NodeId, course: &Course, api: ApiConfig) {
		let Some(ticket) = self.details.try_update_value(|tracker| tracker.begin(node.clone())) else {
			return;
		};
		let pending = ActiveNodeDetails::from_course(node, course);
		self.active_details.set(pending.clone());
		self.show_details.set(true);

		let ctx = *self;
		let guid = course.guid.clone();
		spawn_local(async move {
			let result = fetch_course_details(&api, &guid).await;
			let current = ctx
				.details
				.try_with_value(|tracker| tracker.is_current(&ticket))
				.unwrap_or(false);
			if !current {
				debug!("discarding stale details for node `{}`", ticket.node);
				return;
			}
			let details = match result {
				Ok(details) => pending.with_course_details(&details),
				Err(err) => pending.with_failure(&err),
			};
			let _ = ctx.active_details.try_set(details);
		});
	}
}

impl Default for ProgramMapContext {
	fn default() -> Self {
		Self::new()
	}
}

/// Orphans are bugs in the mapping order: log them with the raw node and,
/// in debug builds, make sure somebody notices.
fn report(err: &DiagramError, node: &DiagramNode) {
	error!("{err}; raw node: {:?}", node.content);
	if cfg!(debug_assertions) {
		if let Some(window) = web_sys::window() {
			let _ = window.alert_with_message(&format!("{err}. See console for more information."));
		}
	}
}
