use leptos::prelude::*;

/// 404 Not Found Page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="p-10">
			<h1 class="text-2xl font-bold">"Uh oh!" <br /> "We couldn't find that page!"</h1>
			<a class="underline hover:text-blue-600" href="/">"Back to the program list"</a>
		</div>
	}
}
