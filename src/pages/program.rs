use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::api::fetch_program;
use crate::components::program_map::ProgramMap;
use crate::config::AppConfig;

/// Loads the program named in the route and shows its map.
#[component]
pub fn ProgramPage() -> impl IntoView {
	let api = expect_context::<AppConfig>().api;
	let params = use_params_map();
	let guid = move || params.read().get("guid").unwrap_or_default();
	let program = LocalResource::new(move || {
		let (api, guid) = (api.clone(), guid());
		async move { fetch_program(&api, &guid).await }
	});

	view! {
		<div class="flex flex-col gap-2 p-4">
			<a class="underline hover:text-blue-600" href="/">"All Programs"</a>
			<Suspense fallback=|| view! { <p>"Loading program..."</p> }>
				{move || Suspend::new(async move {
					match program.await {
						Ok(program) => view! { <ProgramMap program /> }.into_any(),
						Err(err) => view! {
							<p class="text-red-700">{format!("Could not load program: {err}")}</p>
						}
						.into_any(),
					}
				})}
			</Suspense>
		</div>
	}
}
