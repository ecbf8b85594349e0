use leptos::prelude::*;

use crate::api::fetch_program_titles;
use crate::config::AppConfig;

/// Lists every program the data service knows, each linking to its map.
#[component]
pub fn Home() -> impl IntoView {
	let api = expect_context::<AppConfig>().api;
	let titles = LocalResource::new(move || {
		let api = api.clone();
		async move { fetch_program_titles(&api).await }
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<div class="mx-auto flex max-w-3xl flex-col gap-4 p-10">
				<h1 class="text-2xl font-bold">"Programs"</h1>
				<Suspense fallback=|| view! { <p>"Loading programs..."</p> }>
					{move || Suspend::new(async move {
						titles.await.map(|titles| {
							view! {
								<ul class="flex flex-col gap-1">
									{titles
										.into_iter()
										.map(|(title, guid)| {
											view! {
												<li>
													<a class="underline hover:text-blue-600" href=format!("/programs/{guid}")>
														{title}
													</a>
												</li>
											}
										})
										.collect_view()}
								</ul>
							}
						})
					})}
				</Suspense>
			</div>
		</ErrorBoundary>
	}
}
