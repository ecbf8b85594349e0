//! The node registry: the diagram's shadow graph.
//!
//! One [`NodeRecord`] per rendered node, keyed by [`NodeId`] and kept in
//! registration order. Parent links are back-references by id, children are
//! appended as they register. Hover and selection propagate by walking the
//! parent links to the root.
//!
//! Records are only ever added or updated by id; the only removal is
//! [`NodeRegistry::clear`], which happens when a different program is shown.

use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use log::{debug, error, warn};
use rustc_hash::FxHasher;

use crate::error::DiagramError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// Builds an id from a display title and the node's position in the tree.
	///
	/// The suffix hashes the parent id, the sibling index and the title, so
	/// the same program always yields the same ids while siblings sharing a
	/// title still get distinct ones.
	pub fn derive(title: &str, parent: Option<&NodeId>, index: usize) -> Self {
		let mut hasher = FxHasher::default();
		parent.map(NodeId::as_str).hash(&mut hasher);
		index.hash(&mut hasher);
		title.hash(&mut hasher);
		Self(format!("{}-{:08x}", slugify(title), hasher.finish() as u32))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

fn slugify(title: &str) -> String {
	let mut slug = String::with_capacity(title.len());
	for c in title.chars() {
		if c.is_alphanumeric() {
			slug.extend(c.to_lowercase());
		} else if !slug.is_empty() && !slug.ends_with('-') {
			slug.push('-');
		}
	}
	let slug = slug.trim_end_matches('-');
	if slug.is_empty() { "node".into() } else { slug.into() }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeRecord {
	pub id: NodeId,
	pub title: String,
	pub parent: Option<NodeId>,
	pub children: Vec<NodeId>,
	/// Active hover sources on this node or any descendant.
	pub hover_count: u32,
	/// Whether the pointer is on this node itself.
	pub hovered: bool,
	pub directly_selected: bool,
	/// Selected descendants at any depth.
	pub child_selected_count: u32,
	pub redraw_trigger: u64,
}

impl NodeRecord {
	pub fn new(id: NodeId, parent: Option<NodeId>, title: impl Into<String>) -> Self {
		Self {
			id,
			title: title.into(),
			parent,
			children: Vec::new(),
			hover_count: 0,
			hovered: false,
			directly_selected: false,
			child_selected_count: 0,
			redraw_trigger: 0,
		}
	}

	pub fn is_highlighted(&self) -> bool {
		self.hover_count > 0 || self.directly_selected || self.child_selected_count > 0
	}

	pub fn highlight(&self) -> NodeHighlight {
		NodeHighlight {
			hover_count: self.hover_count,
			directly_selected: self.directly_selected,
			child_selected_count: self.child_selected_count,
			redraw_trigger: self.redraw_trigger,
		}
	}
}

/// What a rendered node observes of its own record.
///
/// Everything a node's box colour and its connector depend on, so a change
/// to any field re-runs the node's redraw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeHighlight {
	pub hover_count: u32,
	pub directly_selected: bool,
	pub child_selected_count: u32,
	pub redraw_trigger: u64,
}

impl NodeHighlight {
	pub fn is_highlighted(&self) -> bool {
		self.hover_count > 0 || self.directly_selected || self.child_selected_count > 0
	}
}

#[derive(Clone, Debug, Default)]
pub struct NodeRegistry {
	records: IndexMap<NodeId, NodeRecord>,
	selection: Vec<NodeId>,
}

impl NodeRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, id: &NodeId) -> Option<&NodeRecord> {
		self.records.get(id)
	}

	pub fn set(&mut self, id: NodeId, record: NodeRecord) {
		self.records.insert(id, record);
	}

	pub fn clear(&mut self) {
		debug!("clearing {} registered nodes", self.records.len());
		self.records.clear();
		self.selection.clear();
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &NodeRecord> {
		self.records.values()
	}

	pub fn root(&self) -> Option<&NodeId> {
		self.records.values().find(|r| r.parent.is_none()).map(|r| &r.id)
	}

	/// Adds a node and links it into its parent's children.
	///
	/// The parent must already be registered. When it is not, the node is
	/// still recorded (it renders, unconnected) and `OrphanParent` is
	/// returned for the caller to surface. An id already held under another
	/// parent is left as it is and `ConflictingParent` is returned.
	pub fn register(
		&mut self,
		id: NodeId,
		parent: Option<NodeId>,
		title: impl Into<String>,
	) -> Result<(), DiagramError> {
		if let Some(existing) = self.records.get(&id) {
			if existing.parent == parent {
				return Ok(());
			}
			warn!(
				"node `{id}` re-registered under `{parent:?}`, previously under `{:?}`",
				existing.parent
			);
			return Err(DiagramError::ConflictingParent {
				existing: existing.parent.clone(),
				parent,
				child: id,
			});
		}

		if parent.is_none() {
			if let Some(root) = self.root().filter(|root| **root != id) {
				return Err(DiagramError::DuplicateRoot {
					root: root.clone(),
					child: id,
				});
			}
		}

		self.records
			.insert(id.clone(), NodeRecord::new(id.clone(), parent.clone(), title));

		let Some(parent) = parent else {
			return Ok(());
		};
		match self.records.get_mut(&parent) {
			Some(record) => {
				if !record.children.contains(&id) {
					record.children.push(id);
				}
				Ok(())
			}
			None => Err(DiagramError::OrphanParent { parent, child: id }),
		}
	}

	/// Parent, grandparent, ... up to the root.
	pub fn ancestors<'a>(&'a self, id: &NodeId) -> Ancestors<'a> {
		Ancestors {
			registry: self,
			next: self.records.get(id).and_then(|r| r.parent.as_ref()),
			remaining: self.records.len(),
		}
	}

	pub fn hover_enter(&mut self, id: &NodeId) -> Result<bool, DiagramError> {
		let chain = self.chain(id)?;
		let record = self.record_mut(id)?;
		if record.hovered {
			return Ok(false);
		}
		record.hovered = true;
		for node in &chain {
			if let Some(record) = self.records.get_mut(node) {
				record.hover_count += 1;
			}
		}
		Ok(true)
	}

	pub fn hover_leave(&mut self, id: &NodeId) -> Result<bool, DiagramError> {
		let chain = self.chain(id)?;
		let record = self.record_mut(id)?;
		if !record.hovered {
			return Ok(false);
		}
		record.hovered = false;
		for node in &chain {
			if let Some(record) = self.records.get_mut(node) {
				record.hover_count = record.hover_count.saturating_sub(1);
			}
		}
		Ok(true)
	}

	/// Flips direct selection and returns the new state.
	///
	/// Every ancestor's `child_selected_count` moves by exactly one.
	pub fn toggle_selected(&mut self, id: &NodeId) -> Result<bool, DiagramError> {
		let chain = self.chain(id)?;
		let record = self.record_mut(id)?;
		record.directly_selected = !record.directly_selected;
		let selected = record.directly_selected;

		for ancestor in chain.iter().skip(1) {
			if let Some(record) = self.records.get_mut(ancestor) {
				record.child_selected_count = if selected {
					record.child_selected_count + 1
				} else {
					record.child_selected_count.saturating_sub(1)
				};
			}
		}

		if selected {
			self.selection.push(id.clone());
		} else {
			self.selection.retain(|s| s != id);
		}
		Ok(selected)
	}

	pub fn is_highlighted(&self, id: &NodeId) -> bool {
		self.records.get(id).is_some_and(NodeRecord::is_highlighted)
	}

	pub fn highlight(&self, id: &NodeId) -> Option<NodeHighlight> {
		self.records.get(id).map(NodeRecord::highlight)
	}

	/// Snapshots of every ancestor of `id`, parent first.
	pub fn ancestor_highlights(&self, id: &NodeId) -> Vec<NodeHighlight> {
		self.ancestors(id)
			.filter_map(|ancestor| self.highlight(ancestor))
			.collect()
	}

	pub fn highlighted(&self) -> impl Iterator<Item = &NodeId> {
		self.records
			.values()
			.filter(|r| r.is_highlighted())
			.map(|r| &r.id)
	}

	pub fn request_redraw_all(&mut self) {
		for record in self.records.values_mut() {
			record.redraw_trigger = record.redraw_trigger.wrapping_add(1);
		}
	}

	/// Titles of directly selected nodes, oldest selection first.
	pub fn selected_titles(&self) -> Vec<String> {
		self.selection
			.iter()
			.filter_map(|id| self.records.get(id))
			.map(|r| r.title.clone())
			.collect()
	}

	pub fn connector_count(&self) -> usize {
		self.records.values().map(|r| r.children.len()).sum()
	}

	fn record_mut(&mut self, id: &NodeId) -> Result<&mut NodeRecord, DiagramError> {
		self.records
			.get_mut(id)
			.ok_or_else(|| DiagramError::UnknownNode(id.clone()))
	}

	/// `id` followed by its ancestors.
	fn chain(&self, id: &NodeId) -> Result<Vec<NodeId>, DiagramError> {
		if !self.records.contains_key(id) {
			return Err(DiagramError::UnknownNode(id.clone()));
		}
		Ok(std::iter::once(id)
			.chain(self.ancestors(id))
			.cloned()
			.collect())
	}
}

pub struct Ancestors<'a> {
	registry: &'a NodeRegistry,
	next: Option<&'a NodeId>,
	remaining: usize,
}

impl<'a> Iterator for Ancestors<'a> {
	type Item = &'a NodeId;

	fn next(&mut self) -> Option<Self::Item> {
		let id = self.next.take()?;
		if self.remaining == 0 {
			error!("parent links around `{id}` form a cycle, stopping ancestor walk");
			return None;
		}
		self.remaining -= 1;
		match self.registry.records.get(id) {
			Some(record) => {
				self.next = record.parent.as_ref();
				Some(id)
			}
			None => {
				error!("node with id `{id}` was not found in the node tree");
				None
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn id(s: &str) -> NodeId {
		NodeId::new(s)
	}

	/// root -> module -> {a, b}
	fn small_tree() -> NodeRegistry {
		let mut registry = NodeRegistry::new();
		registry.register(id("root"), None, "Program").unwrap();
		registry.register(id("module"), Some(id("root")), "Core").unwrap();
		registry.register(id("a"), Some(id("module")), "Course A").unwrap();
		registry.register(id("b"), Some(id("module")), "Course B").unwrap();
		registry
	}

	#[test]
	fn derive_is_stable_and_distinguishes_siblings() {
		let parent = id("core-00000001");
		let first = NodeId::derive("Intro to Programming", Some(&parent), 0);
		assert_eq!(first, NodeId::derive("Intro to Programming", Some(&parent), 0));
		assert_ne!(first, NodeId::derive("Intro to Programming", Some(&parent), 1));
		assert!(first.as_str().starts_with("intro-to-programming-"));
	}

	#[test]
	fn derive_falls_back_for_symbol_only_titles() {
		assert!(NodeId::derive("  ", None, 0).as_str().starts_with("node-"));
	}

	#[test]
	fn register_links_children_in_order() {
		let registry = small_tree();
		assert_eq!(registry.root(), Some(&id("root")));
		assert_eq!(registry.get(&id("module")).unwrap().children, vec![id("a"), id("b")]);
		assert_eq!(registry.connector_count(), 3);
	}

	#[test]
	fn orphan_is_recorded_but_unlinked() {
		let mut registry = small_tree();
		let err = registry
			.register(id("stray"), Some(id("missing")), "Stray")
			.unwrap_err();
		assert_eq!(
			err,
			DiagramError::OrphanParent {
				parent: id("missing"),
				child: id("stray"),
			}
		);
		assert!(registry.get(&id("stray")).is_some());
		assert_eq!(registry.connector_count(), 3);
	}

	#[test]
	fn second_root_is_rejected() {
		let mut registry = small_tree();
		let err = registry.register(id("other"), None, "Other").unwrap_err();
		assert!(matches!(err, DiagramError::DuplicateRoot { .. }));
		assert_eq!(registry.root(), Some(&id("root")));
	}

	#[test]
	fn reparenting_is_rejected_and_keeps_the_record() {
		let mut registry = small_tree();
		registry.hover_enter(&id("a")).unwrap();
		registry.toggle_selected(&id("a")).unwrap();

		let err = registry.register(id("a"), Some(id("root")), "Course A").unwrap_err();
		assert_eq!(
			err,
			DiagramError::ConflictingParent {
				existing: Some(id("module")),
				parent: Some(id("root")),
				child: id("a"),
			}
		);
		let record = registry.get(&id("a")).unwrap();
		assert_eq!(record.parent, Some(id("module")));
		assert_eq!(record.hover_count, 1);
		assert!(record.directly_selected);
		assert_eq!(registry.get(&id("root")).unwrap().children, vec![id("module")]);
		assert_eq!(registry.get(&id("module")).unwrap().children, vec![id("a"), id("b")]);

		registry.toggle_selected(&id("a")).unwrap();
		registry.hover_leave(&id("a")).unwrap();
		assert!(registry.highlighted().next().is_none());
	}

	#[test]
	fn re_registering_keeps_interaction_state() {
		let mut registry = small_tree();
		registry.hover_enter(&id("a")).unwrap();
		registry.register(id("a"), Some(id("module")), "Course A").unwrap();
		assert_eq!(registry.get(&id("a")).unwrap().hover_count, 1);
		assert_eq!(registry.get(&id("module")).unwrap().children.len(), 2);
	}

	#[test]
	fn hover_lights_path_to_root() {
		let mut registry = small_tree();
		assert!(registry.hover_enter(&id("a")).unwrap());
		let lit: Vec<_> = registry.highlighted().cloned().collect();
		assert_eq!(lit, vec![id("root"), id("module"), id("a")]);
		assert!(!registry.is_highlighted(&id("b")));

		assert!(registry.hover_leave(&id("a")).unwrap());
		assert_eq!(registry.highlighted().count(), 0);
	}

	#[test]
	fn hover_is_balanced_per_node() {
		let mut registry = small_tree();
		registry.hover_enter(&id("a")).unwrap();
		assert!(!registry.hover_enter(&id("a")).unwrap());
		assert_eq!(registry.get(&id("root")).unwrap().hover_count, 1);

		registry.hover_leave(&id("a")).unwrap();
		assert!(!registry.hover_leave(&id("a")).unwrap());
		assert_eq!(registry.get(&id("root")).unwrap().hover_count, 0);
	}

	#[test]
	fn nested_hover_counts_every_source() {
		let mut registry = small_tree();
		registry.hover_enter(&id("module")).unwrap();
		registry.hover_enter(&id("a")).unwrap();
		assert_eq!(registry.get(&id("module")).unwrap().hover_count, 2);
		registry.hover_leave(&id("a")).unwrap();
		assert!(registry.is_highlighted(&id("module")));
		registry.hover_leave(&id("module")).unwrap();
		assert!(!registry.is_highlighted(&id("root")));
	}

	#[test]
	fn selecting_siblings_counts_each_once() {
		let mut registry = small_tree();
		assert!(registry.toggle_selected(&id("a")).unwrap());
		assert!(registry.toggle_selected(&id("b")).unwrap());
		assert_eq!(registry.get(&id("module")).unwrap().child_selected_count, 2);
		assert_eq!(registry.get(&id("root")).unwrap().child_selected_count, 2);
		assert_eq!(registry.selected_titles(), vec!["Course A", "Course B"]);

		assert!(!registry.toggle_selected(&id("a")).unwrap());
		assert_eq!(registry.get(&id("module")).unwrap().child_selected_count, 1);
		assert_eq!(registry.get(&id("root")).unwrap().child_selected_count, 1);
		assert!(!registry.get(&id("a")).unwrap().directly_selected);
		assert_eq!(registry.selected_titles(), vec!["Course B"]);
	}

	#[test]
	fn selection_does_not_count_itself() {
		let mut registry = small_tree();
		registry.toggle_selected(&id("module")).unwrap();
		let module = registry.get(&id("module")).unwrap();
		assert!(module.directly_selected);
		assert_eq!(module.child_selected_count, 0);
		assert_eq!(registry.get(&id("root")).unwrap().child_selected_count, 1);
	}

	#[test]
	fn unknown_node_is_an_error() {
		let mut registry = small_tree();
		assert_eq!(
			registry.hover_enter(&id("nope")),
			Err(DiagramError::UnknownNode(id("nope")))
		);
		assert!(registry.toggle_selected(&id("nope")).is_err());
	}

	#[test]
	fn cyclic_parents_terminate() {
		let mut registry = NodeRegistry::new();
		let mut a = NodeRecord::new(id("a"), Some(id("b")), "A");
		a.children.push(id("b"));
		registry.set(id("a"), a);
		registry.set(id("b"), NodeRecord::new(id("b"), Some(id("a")), "B"));
		assert!(registry.ancestors(&id("a")).count() <= registry.len());
		registry.hover_enter(&id("a")).unwrap();
		registry.request_redraw_all();
		assert!(registry.ancestor_highlights(&id("a")).len() <= registry.len());
	}

	/// Many[Core{List:[A, B]}, Sibling{List:[C]}]: padding Core's list moves
	/// Sibling and C too, so a redraw must reach nodes outside the list.
	#[test]
	fn redraw_all_reaches_nodes_outside_the_padded_list() {
		let mut registry = NodeRegistry::new();
		registry.register(id("root"), None, "Program").unwrap();
		for (node, parent) in [
			("core", "root"),
			("list", "core"),
			("a", "list"),
			("b", "list"),
			("sibling", "root"),
			("sibling-list", "sibling"),
			("c", "sibling-list"),
		] {
			registry.register(id(node), Some(id(parent)), node).unwrap();
		}

		registry.request_redraw_all();
		for record in registry.iter() {
			assert_eq!(record.redraw_trigger, 1, "`{}` kept stale geometry", record.id);
		}
	}

	#[test]
	fn ancestor_highlights_follow_the_parent_chain() {
		let mut registry = small_tree();
		assert_eq!(registry.ancestor_highlights(&id("a")).len(), 2);
		assert!(registry.ancestor_highlights(&id("root")).is_empty());

		let before = registry.ancestor_highlights(&id("a"));
		registry.toggle_selected(&id("b")).unwrap();
		let after = registry.ancestor_highlights(&id("a"));
		assert_ne!(before, after);
		assert_eq!(after[0].child_selected_count, 1);
		assert_eq!(after[1].child_selected_count, 1);
	}

	#[test]
	fn clear_discards_everything() {
		let mut registry = small_tree();
		registry.toggle_selected(&id("a")).unwrap();
		registry.clear();
		assert!(registry.is_empty());
		assert!(registry.selected_titles().is_empty());
		assert_eq!(registry.root(), None);
	}
}
