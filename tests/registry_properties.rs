//! Property tests for the node registry and the diagram mapping.
//!
//! Verifies:
//! 1. hover enter + leave over any sequence of nodes leaves no hover count
//! 2. selecting then deselecting any set of nodes leaves no selection count
//! 3. highlight is exactly "hovered, selected, or a descendant selected"
//! 4. the double list puts ceil(n/2) entries left and floor(n/2) right
//! 5. a mapped program mounts with one root, no dangling parents and one
//!    connector per non-root node

use proptest::prelude::*;

use program_map::components::program_map::layout::{Columns, split_columns};
use program_map::components::program_map::types::{
	Course, CourseEntry, Credits, Requirement, RequirementModule, Requirements,
};
use program_map::components::program_map::{NodeId, NodeRegistry, Program, build_program};

// ── Strategy helpers ──────────────────────────────────────────────────

/// Random tree as a parent index per node; node 0 is the root.
fn arb_tree() -> impl Strategy<Value = Vec<usize>> {
	prop::collection::vec(any::<prop::sample::Index>(), 0..40).prop_map(|picks| {
		picks
			.iter()
			.enumerate()
			.map(|(i, pick)| pick.index(i + 1))
			.collect()
	})
}

fn node(i: usize) -> NodeId {
	NodeId::new(format!("n{i}"))
}

fn registry_for(parents: &[usize]) -> NodeRegistry {
	let mut registry = NodeRegistry::new();
	registry.register(node(0), None, "root").unwrap();
	for (i, parent) in parents.iter().enumerate() {
		registry
			.register(node(i + 1), Some(node(*parent)), format!("node {}", i + 1))
			.unwrap();
	}
	registry
}

fn arb_tree_with_picks() -> impl Strategy<Value = (Vec<usize>, Vec<prop::sample::Index>)> {
	(arb_tree(), prop::collection::vec(any::<prop::sample::Index>(), 0..20))
}

fn course(i: usize) -> CourseEntry {
	CourseEntry::Course(Course {
		url: format!("https://catalog.example.edu/c{i}"),
		path: String::new(),
		guid: format!("c-{i}"),
		name: Some(format!("Course {i}")),
		number: format!("{}", 1000 + i),
		subject_name: None,
		subject_code: "CPSC".into(),
		credits: Credits(3.0, None),
	})
}

/// Module shapes as (titled?, course count) pairs.
fn arb_program() -> impl Strategy<Value = Program> {
	prop::collection::vec((any::<bool>(), 0usize..6), 0..6).prop_map(|modules| {
		let modules = modules
			.into_iter()
			.enumerate()
			.map(|(m, (titled, count))| {
				let courses = (0..count).map(|c| course(m * 10 + c)).collect();
				if titled {
					RequirementModule::BasicRequirements {
						title: Some(format!("Module {m}")),
						requirements: vec![Requirement::Courses {
							title: Some(format!("List {m}")),
							courses,
						}],
					}
				} else {
					RequirementModule::SingleBasicRequirement {
						title: Some(format!("Module {m}")),
						requirement: Requirement::Courses { title: None, courses },
					}
				}
			})
			.collect();
		Program {
			url: "https://catalog.example.edu/p".into(),
			guid: "p-1".into(),
			title: "Generated Program".into(),
			requirements: Some(Requirements::Many(modules)),
		}
	})
}

// ── Properties ────────────────────────────────────────────────────────

proptest! {
	#[test]
	fn hover_round_trip_restores_counts((parents, picks) in arb_tree_with_picks()) {
		let mut registry = registry_for(&parents);
		let ids: Vec<NodeId> = picks.iter().map(|p| node(p.index(parents.len() + 1))).collect();
		for id in &ids {
			registry.hover_enter(id).unwrap();
		}
		for id in ids.iter().rev() {
			registry.hover_leave(id).unwrap();
		}
		for record in registry.iter() {
			prop_assert_eq!(record.hover_count, 0);
			prop_assert!(!record.hovered);
			prop_assert!(!record.is_highlighted());
		}
	}

	#[test]
	fn select_round_trip_restores_counts((parents, picks) in arb_tree_with_picks()) {
		let mut registry = registry_for(&parents);
		let mut ids: Vec<NodeId> = picks.iter().map(|p| node(p.index(parents.len() + 1))).collect();
		ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
		ids.dedup();
		for id in &ids {
			prop_assert!(registry.toggle_selected(id).unwrap());
		}
		prop_assert_eq!(registry.selected_titles().len(), ids.len());
		for id in &ids {
			prop_assert!(!registry.toggle_selected(id).unwrap());
		}
		prop_assert!(registry.selected_titles().is_empty());
		for record in registry.iter() {
			prop_assert_eq!(record.child_selected_count, 0);
			prop_assert!(!record.directly_selected);
		}
	}

	#[test]
	fn highlight_matches_its_definition((parents, picks) in arb_tree_with_picks()) {
		let mut registry = registry_for(&parents);
		let total = parents.len() + 1;
		for (step, pick) in picks.iter().enumerate() {
			let id = node(pick.index(total));
			match step % 3 {
				0 => { registry.toggle_selected(&id).unwrap(); }
				1 => { registry.hover_enter(&id).unwrap(); }
				_ => { registry.hover_leave(&id).unwrap(); }
			}
		}

		for record in registry.iter() {
			let selected_below = registry
				.iter()
				.filter(|other| other.directly_selected)
				.filter(|other| registry.ancestors(&other.id).any(|a| *a == record.id))
				.count() as u32;
			prop_assert_eq!(record.child_selected_count, selected_below);
			prop_assert_eq!(
				record.is_highlighted(),
				record.hover_count > 0 || record.directly_selected || record.child_selected_count > 0
			);
		}
	}

	#[test]
	fn double_list_splits_evenly(n in 2usize..64) {
		match split_columns(0..n) {
			Columns::Double { left, right } => {
				prop_assert_eq!(left.len(), n.div_ceil(2));
				prop_assert_eq!(right.len(), n / 2);
				prop_assert!(left.iter().all(|i| i % 2 == 0));
				prop_assert!(right.iter().all(|i| i % 2 == 1));
			}
			Columns::Single(_) => prop_assert!(false, "{} entries must split", n),
		}
	}

	#[test]
	fn mapped_programs_form_one_tree(program in arb_program()) {
		let root = build_program(&program);
		let mut registry = NodeRegistry::new();
		prop_assert!(root.mount(&mut registry).is_empty());

		prop_assert_eq!(registry.len(), root.node_count());
		prop_assert_eq!(registry.iter().filter(|r| r.parent.is_none()).count(), 1);
		prop_assert_eq!(registry.root(), Some(&root.id));
		prop_assert_eq!(registry.connector_count(), registry.len() - 1);
		for record in registry.iter() {
			if let Some(parent) = &record.parent {
				let parent = registry.get(parent);
				prop_assert!(parent.is_some());
				prop_assert!(parent.unwrap().children.contains(&record.id));
			}
		}
	}
}
