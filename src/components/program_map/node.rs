use leptos::html::{Div, Section};
use leptos::prelude::*;
use log::{info, warn};
use web_sys::{DomRect, MouseEvent};

use super::context::ProgramMapContext;
use super::geometry::{Point, Rect, anchors};
use super::layout::{ColumnPadding, Columns, FlowDirection, column_padding, split_columns};
use super::mapper::{ChildLayout, DiagramNode, NodeContent};
use super::render::{Connector, ConnectorPath};
use super::state::NodeId;
use super::types::Course;
use crate::config::AppConfig;
use crate::error::DiagramError;

const NODE_CLASS: &str = "node flex min-h-[120px] min-w-[250px] flex-col items-center justify-center rounded-lg border-2 border-solid border-black transition";

/// One box of the diagram plus, recursively, everything below it.
///
/// The node registers itself before building its children, so a child
/// always finds its parent's record.
#[component]
pub fn DiagramNodeView(node: DiagramNode) -> AnyView {
	let ctx = expect_context::<ProgramMapContext>();
	ctx.register(&node);

	let DiagramNode {
		id,
		parent,
		title,
		content,
		layout,
		connector,
		children,
	} = node;

	let highlight = {
		let id = id.clone();
		Memo::new(move |_| ctx.registry.with(|r| r.highlight(&id)).unwrap_or_default())
	};
	let section_ref = NodeRef::<Section>::new();
	let connector_path = RwSignal::new(None::<ConnectorPath>);
	let overlay_id = format!("{id}-overlay");

	if let Some(parent_id) = parent {
		let ancestors = {
			let id = id.clone();
			Memo::new(move |_| ctx.registry.with(|r| r.ancestor_highlights(&id)))
		};
		let (id, overlay_id) = (id.clone(), overlay_id.clone());
		// Re-measured on every change of the node's or an ancestor's snapshot.
		Effect::new(move |_| {
			ancestors.track();
			let state = highlight.get();
			let measured = measure(&parent_id, section_ref.get(), &overlay_id)
				.and_then(|(parent, own, origin)| anchors(parent, own, origin, connector));
			match measured {
				Some(anchors) => connector_path.set(Some(ConnectorPath::from_anchors(
					format!("{parent_id}->{id}"),
					anchors,
					state.is_highlighted(),
				))),
				None => warn!("{}", DiagramError::GeometryUnavailable(id.clone())),
			}
		});
	}

	let (enter_id, leave_id, click_id) = (id.clone(), id.clone(), id.clone());
	let content = node_content(&id, &title, content);
	let children = (!children.is_empty()).then(|| {
		let flow = match layout {
			ChildLayout::DoubleList => {
				return view! { <DoubleList nodes=children /> }.into_any();
			}
			ChildLayout::Row => FlowDirection::Row,
			ChildLayout::Column => FlowDirection::Column,
		};
		view! {
			<div class=format!(
				"children-container flex flex-shrink-0 {} items-start justify-center gap-20",
				flow.class(),
			)>{children_views(children)}</div>
		}
		.into_any()
	});

	view! {
		<div class="node-container relative flex w-max flex-shrink-0 flex-col items-center gap-20 rounded border border-black p-10">
			<div class="section-container flex flex-row items-center justify-center">
				<section
					id=id.to_string()
					node_ref=section_ref
					on:click=move |_| ctx.toggle_selected(&click_id)
					on:mouseenter=move |_| ctx.hover(&enter_id, true)
					on:mouseleave=move |_| ctx.hover(&leave_id, false)
					class=move || {
						let state = highlight.get();
						let fill = if state.is_highlighted() { "bg-sky-300" } else { "bg-sky-100" };
						let ring = if state.directly_selected { " ring-4 ring-blue-500" } else { "" };
						format!("{NODE_CLASS} {fill}{ring}")
					}
				>
					{content}
				</section>
			</div>
			<svg id=overlay_id class="connector-overlay pointer-events-none absolute left-0 top-0 h-0 w-0 overflow-visible">
				<Connector path=connector_path />
			</svg>
			{children}
		</div>
	}
	.into_any()
}

fn children_views(children: Vec<DiagramNode>) -> impl IntoView {
	children
		.into_iter()
		.map(|child| view! { <DiagramNodeView node=child /> })
		.collect_view()
}

/// Course entries split into two columns whose outer edges are padded once,
/// after the first layout, so the gap between them sits under the parent.
#[component]
fn DoubleList(nodes: Vec<DiagramNode>) -> impl IntoView {
	let ctx = expect_context::<ProgramMapContext>();
	let (left, right) = match split_columns(nodes) {
		Columns::Double { left, right } => (left, right),
		Columns::Single(single) => (single, Vec::new()),
	};
	let (left_ref, right_ref) = (NodeRef::<Div>::new(), NodeRef::<Div>::new());
	let padding = RwSignal::new(ColumnPadding::default());

	Effect::new(move |balanced: Option<bool>| {
		if balanced == Some(true) {
			return true;
		}
		let (Some(left), Some(right)) = (left_ref.get(), right_ref.get()) else {
			return false;
		};
		let (left_width, right_width) = (
			left.get_bounding_client_rect().width(),
			right.get_bounding_client_rect().width(),
		);
		padding.set(column_padding(left_width, right_width));
		// Padding shifts the list's ancestors and their siblings as well.
		request_animation_frame(move || ctx.redraw_all());
		true
	});

	view! {
		<div class="children-container double-list flex flex-shrink-0 flex-row items-start justify-center gap-20">
			<div
				node_ref=left_ref
				class="double-list-left flex flex-col items-end gap-10"
				style:padding-left=move || format!("{}px", padding.get().left)
			>
				{children_views(left)}
			</div>
			<div
				node_ref=right_ref
				class="double-list-right flex flex-col items-start gap-10"
				style:padding-right=move || format!("{}px", padding.get().right)
			>
				{children_views(right)}
			</div>
		</div>
	}
}

fn node_content(id: &NodeId, title: &str, content: NodeContent) -> AnyView {
	let title = title.to_string();
	match content {
		NodeContent::Program { url, has_requirements } => view! {
			<h3 class="w-[80%] text-center">{title}</h3>
			<a href=url target="_blank" class="underline hover:text-blue-600" on:click=stop>
				"Link to Catalog"
			</a>
			{(!has_requirements).then(|| view! { <p>"No Requirements Listed"</p> })}
		}
		.into_any(),
		NodeContent::Heading => view! { <h3 class="w-[80%] text-center">{title}</h3> }.into_any(),
		NodeContent::Narrative(narrative) => view! {
			<h3 class="w-[80%] text-center">{title}</h3>
			{narrative.map(|text| view! { <p class="w-[80%]">{text}</p> })}
		}
		.into_any(),
		NodeContent::SelectFromCourses { empty } => view! {
			<h3 class="w-[80%] text-center">{title}</h3>
			{empty.then(|| view! { <p>"No courses listed."</p> })}
		}
		.into_any(),
		NodeContent::Label(label) => view! {
			<h3 class="w-[80%] text-center">{title}</h3>
			<p class="text-sm">{format!("{} credits", label.credits)}</p>
		}
		.into_any(),
		NodeContent::Course(course) => course_content(id.clone(), title, course),
		NodeContent::Unimplemented(raw) => {
			let id = id.clone();
			let log_raw = move |ev: MouseEvent| {
				ev.stop_propagation();
				let pretty = serde_json::to_string_pretty(&raw).unwrap_or_else(|_| raw.to_string());
				info!("raw content for node with id `{id}`:\n{pretty}");
			};
			view! {
				<h3 class="w-[80%] text-center">"Unimplemented"</h3>
				<button class="rounded-md bg-blue-300 px-5 py-3" on:click=log_raw>
					"Log Raw Content"
				</button>
			}
			.into_any()
		}
	}
}

fn course_content(id: NodeId, title: String, course: Course) -> AnyView {
	let ctx = expect_context::<ProgramMapContext>();
	let api = expect_context::<AppConfig>().api;
	let summary = format!("{} · {} credits", course.code(), course.credits);
	let url = course.url.clone();
	let status_id = id.clone();
	let status = move || ctx.active_details.with(|details| details.inline_status(&status_id));
	let show_details = move |ev: MouseEvent| {
		ev.stop_propagation();
		ctx.request_course_details(id.clone(), &course, api.clone());
	};

	view! {
		<h3 class="w-[80%] text-center">{title}</h3>
		<p class="text-sm">{summary}</p>
		<a href=url target="_blank" class="underline hover:text-blue-600" on:click=stop>
			"Link to Course"
		</a>
		<button class="rounded-md bg-blue-300 px-3 py-1" on:click=show_details>
			"Show Details"
		</button>
		// Fixed height so the box keeps its size whatever the status.
		<p class="h-5 truncate text-sm italic">{move || status().unwrap_or_default()}</p>
	}
	.into_any()
}

/// Keeps link clicks from toggling the enclosing node's selection.
fn stop(ev: MouseEvent) {
	ev.stop_propagation();
}

fn measure(parent: &NodeId, own: Option<web_sys::HtmlElement>, overlay_id: &str) -> Option<(Rect, Rect, Point)> {
	let document = web_sys::window()?.document()?;
	let parent = document.get_element_by_id(parent.as_str())?;
	let overlay = document.get_element_by_id(overlay_id)?;
	let own = own?;
	let origin = overlay.get_bounding_client_rect();
	Some((
		rect(&parent.get_bounding_client_rect()),
		rect(&own.get_bounding_client_rect()),
		Point::new(origin.x(), origin.y()),
	))
}

fn rect(r: &DomRect) -> Rect {
	Rect::new(r.x(), r.y(), r.width(), r.height())
}
