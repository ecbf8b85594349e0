//! Client for the program/course data service.

use indexmap::IndexMap;
use log::{debug, error};
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::components::program_map::{CourseDetails, Program};
use crate::error::FetchError;

/// Program title → program guid, in the order the service lists them.
pub type ProgramTitles = IndexMap<String, String>;

#[derive(Clone, Debug, PartialEq)]
pub struct ApiConfig {
	base_url: String,
}

impl ApiConfig {
	pub fn new(base_url: impl Into<String>) -> Self {
		let base_url: String = base_url.into();
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
		}
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub fn program_titles_url(&self) -> String {
		format!("{}/api/programs/titles?with_guid=true", self.base_url)
	}

	pub fn program_url(&self, guid: &str) -> String {
		format!("{}/api/programs/{guid}", self.base_url)
	}

	pub fn course_url(&self, guid: &str) -> String {
		format!("{}/api/courses/{guid}", self.base_url)
	}
}

pub async fn fetch_program_titles(api: &ApiConfig) -> Result<ProgramTitles, FetchError> {
	get_json(api.program_titles_url()).await
}

pub async fn fetch_program(api: &ApiConfig, guid: &str) -> Result<Program, FetchError> {
	get_json(api.program_url(guid)).await
}

pub async fn fetch_course_details(api: &ApiConfig, guid: &str) -> Result<CourseDetails, FetchError> {
	get_json(api.course_url(guid)).await
}

async fn get_json<T: DeserializeOwned>(url: String) -> Result<T, FetchError> {
	debug!("fetching {url}");
	let result = fetch_text(&url).await.and_then(|body| decode(&url, &body));
	if let Err(err) = &result {
		error!("{err}");
	}
	result
}

async fn fetch_text(url: &str) -> Result<String, FetchError> {
	let window = web_sys::window().ok_or(FetchError::NoWindow)?;
	let response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(|err| FetchError::Network {
			url: url.to_string(),
			message: js_message(&err),
		})?;
	let response: Response = response.dyn_into().map_err(|err| FetchError::Network {
		url: url.to_string(),
		message: js_message(&err),
	})?;
	if !response.ok() {
		return Err(FetchError::Status {
			url: url.to_string(),
			status: response.status(),
		});
	}

	let body_error = |err: JsValue| FetchError::Body {
		url: url.to_string(),
		message: js_message(&err),
	};
	let text = JsFuture::from(response.text().map_err(body_error)?)
		.await
		.map_err(body_error)?;
	text.as_string().ok_or_else(|| FetchError::Body {
		url: url.to_string(),
		message: "response body is not text".into(),
	})
}

pub fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, FetchError> {
	serde_json::from_str(body).map_err(|err| FetchError::Decode {
		url: url.to_string(),
		message: err.to_string(),
	})
}

fn js_message(value: &JsValue) -> String {
	value
		.dyn_ref::<js_sys::Error>()
		.map(|err| String::from(err.message()))
		.or_else(|| value.as_string())
		.unwrap_or_else(|| format!("{value:?}"))
}
