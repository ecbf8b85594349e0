//! Maps a [`Program`] onto the tree of diagram nodes.
//!
//! One builder per tree variant. Each builder derives its node id, records
//! the parent id it was handed and threads its own id down to its children,
//! so the resulting tree is already in parent-before-child order.

use log::debug;
use serde_json::Value;

use super::geometry::{ConnectorLayout, Side};
use super::layout::{FlowDirection, and_flow};
use super::state::{NodeId, NodeRegistry};
use super::types::{Course, CourseEntry, Label, Program, Requirement, RequirementModule, Requirements};
use crate::error::DiagramError;

#[derive(Clone, Debug, PartialEq)]
pub enum NodeContent {
	Program { url: String, has_requirements: bool },
	/// Title only: modules, course lists, `And` and boxed `Or` groups.
	Heading,
	Narrative(Option<String>),
	SelectFromCourses { empty: bool },
	Course(Course),
	Label(Label),
	/// Placeholder for shapes the diagram cannot draw; keeps the raw data.
	Unimplemented(Value),
}

/// How a node arranges its children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChildLayout {
	Row,
	#[default]
	Column,
	/// Two alternating columns flanking the parent's center line.
	DoubleList,
}

impl From<FlowDirection> for ChildLayout {
	fn from(flow: FlowDirection) -> Self {
		match flow {
			FlowDirection::Row => ChildLayout::Row,
			FlowDirection::Column => ChildLayout::Column,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct DiagramNode {
	pub id: NodeId,
	pub parent: Option<NodeId>,
	pub title: String,
	pub content: NodeContent,
	pub layout: ChildLayout,
	/// How the connector into this node is routed.
	pub connector: ConnectorLayout,
	pub children: Vec<DiagramNode>,
}

impl DiagramNode {
	fn new(title: String, parent: Option<&NodeId>, index: usize, content: NodeContent) -> Self {
		Self {
			id: NodeId::derive(&title, parent, index),
			parent: parent.cloned(),
			title,
			content,
			layout: ChildLayout::default(),
			connector: ConnectorLayout::default(),
			children: Vec::new(),
		}
	}

	/// Pre-order: every node comes after its parent.
	pub fn iter(&self) -> impl Iterator<Item = &DiagramNode> {
		let mut stack = vec![self];
		std::iter::from_fn(move || {
			let node = stack.pop()?;
			stack.extend(node.children.iter().rev());
			Some(node)
		})
	}

	pub fn node_count(&self) -> usize {
		self.iter().count()
	}

	/// Registers the whole tree, parents first.
	///
	/// Failures are logged and returned; every node is still registered.
	pub fn mount(&self, registry: &mut NodeRegistry) -> Vec<DiagramError> {
		let mut errors = Vec::new();
		for node in self.iter() {
			if let Err(err) = registry.register(node.id.clone(), node.parent.clone(), node.title.clone()) {
				log::error!("{err}; raw node: {:?}", node.content);
				errors.push(err);
			}
		}
		errors
	}
}

/// Where a course entry sits, which decides boxing and flow.
#[derive(Clone, Copy, Debug, Default)]
struct EntryContext {
	nested: bool,
	column: Option<Side>,
}

impl EntryContext {
	fn nested() -> Self {
		Self {
			nested: true,
			column: None,
		}
	}

	fn connector(self) -> ConnectorLayout {
		self.column
			.map(ConnectorLayout::DoubleList)
			.unwrap_or_default()
	}
}

fn title_or(title: Option<&str>, placeholder: &str) -> String {
	match title.map(str::trim) {
		Some(title) if !title.is_empty() => title.to_string(),
		_ => placeholder.to_string(),
	}
}

pub fn build_program(program: &Program) -> DiagramNode {
	let mut root = DiagramNode::new(
		title_or(Some(program.title.as_str()), "Program"),
		None,
		0,
		NodeContent::Program {
			url: program.url.clone(),
			has_requirements: program.requirements.is_some(),
		},
	);
	root.layout = ChildLayout::Row;
	if let Some(reqs) = &program.requirements {
		build_requirements(reqs, &root.id, &mut root.children);
	}
	debug!("mapped program `{}` to {} nodes", program.title, root.node_count());
	root
}

fn build_requirements(reqs: &Requirements, parent: &NodeId, out: &mut Vec<DiagramNode>) {
	match reqs {
		Requirements::Single(module) => build_module(module, parent, out),
		Requirements::Many(modules) => {
			for module in modules {
				build_module(module, parent, out);
			}
		}
		Requirements::Unrecognized(raw) => build_unimplemented(raw, parent, EntryContext::default(), out),
	}
}

fn build_module(module: &RequirementModule, parent: &NodeId, out: &mut Vec<DiagramNode>) {
	match module {
		RequirementModule::SingleBasicRequirement { title, requirement } => {
			let mut node = DiagramNode::new(
				title_or(title.as_deref(), "SingleBasicRequirement"),
				Some(parent),
				out.len(),
				NodeContent::Heading,
			);
			match requirement {
				// An untitled course list adds nothing but an empty box.
				Requirement::Courses { title, courses } if title_or(title.as_deref(), "").is_empty() => {
					fill_course_list(courses, &mut node);
				}
				requirement => build_requirement(requirement, &node.id, &mut node.children),
			}
			out.push(node);
		}
		RequirementModule::BasicRequirements { title, requirements } => {
			let mut node = DiagramNode::new(
				title_or(title.as_deref(), "BasicRequirements"),
				Some(parent),
				out.len(),
				NodeContent::Heading,
			);
			node.layout = ChildLayout::Row;
			for requirement in requirements {
				build_requirement(requirement, &node.id, &mut node.children);
			}
			out.push(node);
		}
		RequirementModule::Label { title } => {
			let node = DiagramNode::new(
				title_or(Some(title.as_str()), "Label"),
				Some(parent),
				out.len(),
				NodeContent::Heading,
			);
			out.push(node);
		}
		RequirementModule::SelectOneEmphasis(raw)
		| RequirementModule::Unimplemented(raw)
		| RequirementModule::Unrecognized(raw) => build_unimplemented(raw, parent, EntryContext::default(), out),
	}
}

fn build_requirement(requirement: &Requirement, parent: &NodeId, out: &mut Vec<DiagramNode>) {
	match requirement {
		Requirement::Courses { title, courses } => {
			let mut node = DiagramNode::new(
				title_or(title.as_deref(), "Courses"),
				Some(parent),
				out.len(),
				NodeContent::Heading,
			);
			fill_course_list(courses, &mut node);
			out.push(node);
		}
		Requirement::SelectFromCourses { title, courses } => {
			let entries = courses.as_deref().unwrap_or_default();
			let mut node = DiagramNode::new(
				title_or(Some(title.as_str()), "SelectFromCourses"),
				Some(parent),
				out.len(),
				NodeContent::SelectFromCourses {
					empty: entries.is_empty(),
				},
			);
			for entry in entries {
				build_course_entry(entry, &node.id, EntryContext::default(), &mut node.children);
			}
			out.push(node);
		}
		Requirement::Label { title, req_narrative } => {
			let node = DiagramNode::new(
				title_or(title.as_deref(), "RequirementLabel"),
				Some(parent),
				out.len(),
				NodeContent::Narrative(req_narrative.clone()),
			);
			out.push(node);
		}
		Requirement::Unrecognized(raw) => build_unimplemented(raw, parent, EntryContext::default(), out),
	}
}

/// More than one entry goes into the double list; each entry then maps to
/// exactly one child so the alternating split lines up with entry indices.
fn fill_course_list(entries: &[CourseEntry], node: &mut DiagramNode) {
	if entries.len() > 1 {
		node.layout = ChildLayout::DoubleList;
		for (i, entry) in entries.iter().enumerate() {
			let side = if i % 2 == 0 { Side::Left } else { Side::Right };
			let ctx = EntryContext {
				nested: false,
				column: Some(side),
			};
			build_course_entry(entry, &node.id, ctx, &mut node.children);
		}
	} else {
		node.layout = ChildLayout::Column;
		for entry in entries {
			build_course_entry(entry, &node.id, EntryContext::default(), &mut node.children);
		}
	}
}

fn build_course_entry(entry: &CourseEntry, parent: &NodeId, ctx: EntryContext, out: &mut Vec<DiagramNode>) {
	match entry {
		CourseEntry::And(entries) => {
			let mut node = DiagramNode::new("And".into(), Some(parent), out.len(), NodeContent::Heading);
			node.layout = and_flow(entries.len(), ctx.nested).into();
			node.connector = ctx.connector();
			for entry in entries {
				build_course_entry(entry, &node.id, EntryContext::nested(), &mut node.children);
			}
			out.push(node);
		}
		CourseEntry::Or(entries) => match ctx.column {
			Some(_) => {
				let mut node = DiagramNode::new("Or".into(), Some(parent), out.len(), NodeContent::Heading);
				node.layout = ChildLayout::Row;
				node.connector = ctx.connector();
				for entry in entries {
					build_course_entry(entry, &node.id, EntryContext::nested(), &mut node.children);
				}
				out.push(node);
			}
			// Alternatives sit side by side under the parent itself.
			None => {
				for entry in entries {
					build_course_entry(entry, parent, EntryContext::nested(), out);
				}
			}
		},
		CourseEntry::Course(course) => {
			let mut node = DiagramNode::new(
				course.display_name(),
				Some(parent),
				out.len(),
				NodeContent::Course(course.clone()),
			);
			node.connector = ctx.connector();
			out.push(node);
		}
		CourseEntry::Label(label) => {
			let mut node = DiagramNode::new(
				title_or(Some(label.name.as_str()), "Label"),
				Some(parent),
				out.len(),
				NodeContent::Label(label.clone()),
			);
			node.connector = ctx.connector();
			out.push(node);
		}
		CourseEntry::Unrecognized(raw) => build_unimplemented(raw, parent, ctx, out),
	}
}

fn build_unimplemented(raw: &Value, parent: &NodeId, ctx: EntryContext, out: &mut Vec<DiagramNode>) {
	let mut node = DiagramNode::new(
		"Unimplemented".into(),
		Some(parent),
		out.len(),
		NodeContent::Unimplemented(raw.clone()),
	);
	node.connector = ctx.connector();
	out.push(node);
}
