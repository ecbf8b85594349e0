use leptos::prelude::*;

use super::context::ProgramMapContext;
use super::details::{ActiveNodeDetails, DetailsStatus};

/// Details of the last course asked about, and the live list of selected
/// nodes.
#[component]
pub fn SidePanel() -> impl IntoView {
	let ctx = expect_context::<ProgramMapContext>();
	let selected = ctx.selected_titles();
	let show = ctx.show_details;

	view! {
		<aside class=move || {
			if show.get() {
				"side-panel flex h-full w-[350px] flex-shrink-0 flex-col gap-4 overflow-y-auto border-l border-black p-4"
			} else {
				"side-panel flex h-full w-10 flex-shrink-0 flex-col border-l border-black"
			}
		}>
			<button
				class="self-start rounded-md bg-blue-300 px-2 py-1"
				on:click=move |_| show.update(|on| *on = !*on)
			>
				{move || if show.get() { "Hide" } else { "Show" }}
			</button>
			<Show when=move || show.get()>
				<section class="active-node flex flex-col gap-2">
					<h2 class="text-lg font-bold">"Details"</h2>
					{move || ctx.active_details.with(active_details)}
				</section>
				<section class="selected-nodes flex flex-col gap-2">
					<h2 class="text-lg font-bold">"Selected"</h2>
					{move || {
						let titles = selected.get();
						if titles.is_empty() {
							view! { <p class="italic">"No selected nodes."</p> }.into_any()
						} else {
							view! {
								<ul class="list-disc pl-5">
									{titles.into_iter().map(|title| view! { <li>{title}</li> }).collect_view()}
								</ul>
							}
							.into_any()
						}
					}}
				</section>
			</Show>
		</aside>
	}
}

fn active_details(details: &ActiveNodeDetails) -> AnyView {
	if details.node.is_none() {
		return view! { <p class="italic">"Pick a course to see its details."</p> }.into_any();
	}
	let status = match &details.status {
		DetailsStatus::Loading => Some("Loading...".to_string()),
		DetailsStatus::Failed(message) => Some(format!("Could not load details: {message}")),
		DetailsStatus::Idle | DetailsStatus::Loaded => None,
	};
	let heading = match (&details.code, details.credits) {
		(Some(code), Some(credits)) => Some(format!("{code} · {credits} credits")),
		(Some(code), None) => Some(code.clone()),
		_ => None,
	};
	let description = match (&details.description, &details.status) {
		(Some(description), _) => Some(description.clone()),
		(None, DetailsStatus::Loaded) => Some("No description.".to_string()),
		_ => None,
	};

	view! {
		<h3 class="font-semibold">{details.title.clone()}</h3>
		{heading.map(|text| view! { <p class="text-sm">{text}</p> })}
		{details.url.clone().map(|url| view! {
			<a href=url target="_blank" class="text-sm underline hover:text-blue-600">"Catalog Entry"</a>
		})}
		{details.paragraphs.iter().map(|p| view! { <p>{p.clone()}</p> }).collect_view()}
		{description.map(|text| view! { <p class="whitespace-pre-line">{text}</p> })}
		{status.map(|text| view! { <p class="text-sm italic">{text}</p> })}
	}
	.into_any()
}
