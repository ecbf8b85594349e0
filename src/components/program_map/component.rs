use leptos::ev;
use leptos::html::Div;
use leptos::prelude::*;
use log::{debug, info};

use super::context::ProgramMapContext;
use super::details::ActiveNodeDetails;
use super::layout::center_scroll;
use super::mapper::build_program;
use super::node::DiagramNodeView;
use super::side_panel::SidePanel;
use super::types::Program;

/// Scrollable diagram of one program's requirements with the side panel
/// next to it.
#[component]
pub fn ProgramMap(program: Program) -> impl IntoView {
	let ctx = expect_context::<ProgramMapContext>();
	ctx.reset();
	info!("mapping program `{}` ({})", program.title, program.guid);
	let tree = build_program(&program);
	debug!("{} diagram nodes for `{}`", tree.node_count(), program.guid);

	let container_ref = NodeRef::<Div>::new();
	let content_ref = NodeRef::<Div>::new();
	let fits = RwSignal::new(false);
	let fullscreen = RwSignal::new(false);

	// Centers once, after the first layout.
	Effect::new(move |centered: Option<bool>| {
		if centered == Some(true) {
			return true;
		}
		let (Some(container), Some(content)) = (container_ref.get(), content_ref.get()) else {
			return false;
		};
		let centering = center_scroll(
			container.scroll_width() as f64,
			container.client_width() as f64,
			content.get_bounding_client_rect().width(),
		);
		fits.set(centering.fits);
		container.set_scroll_left(centering.scroll_left as i32);
		true
	});

	// An inline course status can change the height of a box.
	let layout_key = Memo::new(move |_| ctx.active_details.with(ActiveNodeDetails::layout_key));
	Effect::new(move |previous: Option<()>| {
		layout_key.track();
		if previous.is_some() {
			request_animation_frame(move || ctx.redraw_all());
		}
	});

	let resize = window_event_listener(ev::resize, move |_| ctx.redraw_all());
	on_cleanup(move || resize.remove());

	let toggle_fullscreen = move |_| {
		fullscreen.update(|on| *on = !*on);
		request_animation_frame(move || ctx.redraw_all());
	};

	view! {
		<div class=move || {
			if fullscreen.get() {
				"program-map fixed inset-0 z-50 flex flex-col bg-white"
			} else {
				"program-map relative flex h-[80vh] w-full flex-col"
			}
		}>
			<div class="flex flex-row items-center justify-between border-b border-black px-4 py-2">
				<h2 class="text-lg font-bold">{program.title.clone()}</h2>
				<button class="rounded-md bg-blue-300 px-3 py-1" on:click=toggle_fullscreen>
					{move || if fullscreen.get() { "Exit Fullscreen" } else { "Fullscreen" }}
				</button>
			</div>
			<div class="flex min-h-0 flex-1 flex-row">
				<div
					node_ref=container_ref
					class=move || {
						if fits.get() {
							"diagram-container flex h-full flex-1 justify-center overflow-auto"
						} else {
							"diagram-container h-full flex-1 overflow-auto"
						}
					}
				>
					<div node_ref=content_ref class="w-max p-10">
						<DiagramNodeView node=tree />
					</div>
				</div>
				<SidePanel />
			</div>
		</div>
	}
}
