use leptos::prelude::*;
use program_map::App;
use program_map::config::AppConfig;

fn main() {
	let config = AppConfig::from_env();
	program_map::init_logging(config.log_level);

	mount_to_body(move || view! { <App config=config.clone() /> })
}
