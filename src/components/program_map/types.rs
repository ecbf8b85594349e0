//! The requirement tree as served by the data service.
//!
//! Every tagged enum arrives as `{"type": "<Tag>", "data": <payload>}`. An
//! unknown tag or a payload that does not match its tag never fails the whole
//! program: it decodes to an `Unrecognized` variant holding the raw JSON so
//! the diagram can still place a node for it.

use std::fmt;

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Program {
	pub url: String,
	pub guid: String,
	pub title: String,
	#[serde(default)]
	pub requirements: Option<Requirements>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Requirements {
	Single(RequirementModule),
	Many(Vec<RequirementModule>),
	Unrecognized(Value),
}

#[derive(Clone, Debug, PartialEq)]
pub enum RequirementModule {
	SingleBasicRequirement {
		title: Option<String>,
		requirement: Requirement,
	},
	BasicRequirements {
		title: Option<String>,
		requirements: Vec<Requirement>,
	},
	/// Kept raw: the diagram shows it as an unimplemented placeholder.
	SelectOneEmphasis(Value),
	Label {
		title: String,
	},
	Unimplemented(Value),
	Unrecognized(Value),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Requirement {
	Courses {
		title: Option<String>,
		courses: Vec<CourseEntry>,
	},
	SelectFromCourses {
		title: String,
		courses: Option<Vec<CourseEntry>>,
	},
	Label {
		title: Option<String>,
		req_narrative: Option<String>,
	},
	Unrecognized(Value),
}

/// A boolean expression over course references.
#[derive(Clone, Debug, PartialEq)]
pub enum CourseEntry {
	And(Vec<CourseEntry>),
	Or(Vec<CourseEntry>),
	Label(Label),
	Course(Course),
	Unrecognized(Value),
}

/// Credit range: the minimum, and an inclusive maximum when the course is
/// variable credit.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Credits(pub f64, pub Option<f64>);

impl fmt::Display for Credits {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.1 {
			Some(max) if max != self.0 => write!(f, "{}-{}", self.0, max),
			_ => write!(f, "{}", self.0),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Course {
	pub url: String,
	#[serde(default)]
	pub path: String,
	pub guid: String,
	pub name: Option<String>,
	pub number: String,
	#[serde(default)]
	pub subject_name: Option<String>,
	pub subject_code: String,
	pub credits: Credits,
}

impl Course {
	pub fn code(&self) -> String {
		format!("{} {}", self.subject_code, self.number)
	}

	pub fn display_name(&self) -> String {
		match self.name.as_deref() {
			Some(name) if !name.trim().is_empty() => name.to_string(),
			_ => format!("Course: {}", self.guid),
		}
	}
}

/// A course-list entry that is not a course itself ("Any 3000-level CPSC").
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Label {
	#[serde(default)]
	pub url: String,
	#[serde(default)]
	pub guid: String,
	pub name: String,
	#[serde(default)]
	pub number: Option<String>,
	#[serde(default)]
	pub subject_code: Option<String>,
	pub credits: Credits,
}

/// Response of `GET /api/courses/{guid}`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CourseDetails {
	pub url: String,
	pub guid: String,
	#[serde(default)]
	pub path: String,
	pub subject_code: String,
	#[serde(default)]
	pub subject_name: Option<String>,
	pub number: String,
	pub name: String,
	pub credits_min: f64,
	#[serde(default)]
	pub credits_max: Option<f64>,
	pub description: String,
	#[serde(default)]
	pub prerequisite_narrative: Option<String>,
	#[serde(default)]
	pub prerequisite: Option<String>,
	#[serde(default)]
	pub corequisite_narrative: Option<String>,
	#[serde(default)]
	pub corequisite: Option<String>,
}

impl CourseDetails {
	pub fn credits(&self) -> Credits {
		Credits(self.credits_min, self.credits_max)
	}
}

#[derive(Deserialize)]
struct TitledModule<R> {
	title: Option<String>,
	#[serde(alias = "requirements")]
	requirement: R,
}

#[derive(Deserialize)]
struct ModuleLabel {
	title: String,
}

#[derive(Deserialize)]
struct CoursesPayload<C> {
	#[serde(default)]
	title: Option<String>,
	courses: C,
}

#[derive(Deserialize)]
struct RequirementLabel {
	#[serde(default)]
	title: Option<String>,
	#[serde(default, rename = "reqNarrative")]
	req_narrative: Option<String>,
}

fn tag_of(raw: &Value) -> Option<(&str, &Value)> {
	let tag = raw.get("type")?.as_str()?;
	Some((tag, raw.get("data").unwrap_or(&Value::Null)))
}

fn payload<T: DeserializeOwned>(kind: &str, tag: &str, data: &Value) -> Option<T> {
	T::deserialize(data)
		.map_err(|err| warn!("malformed {kind}::{tag} payload: {err}"))
		.ok()
}

fn unrecognized(kind: &str, raw: Value) -> Value {
	warn!("unrecognized {kind} shape: {raw}");
	raw
}

impl Requirements {
	fn from_value(raw: Value) -> Self {
		let decoded = match tag_of(&raw) {
			Some((tag @ "Single", data)) => payload("Requirements", tag, data).map(Self::Single),
			Some((tag @ "Many", data)) => payload("Requirements", tag, data).map(Self::Many),
			_ => None,
		};
		decoded.unwrap_or_else(|| Self::Unrecognized(unrecognized("Requirements", raw)))
	}
}

impl RequirementModule {
	fn from_value(raw: Value) -> Self {
		const KIND: &str = "RequirementModule";
		let decoded = match tag_of(&raw) {
			Some((tag @ "SingleBasicRequirement", data)) => payload::<TitledModule<Requirement>>(KIND, tag, data)
				.map(|m| Self::SingleBasicRequirement {
					title: m.title,
					requirement: m.requirement,
				}),
			Some((tag @ "BasicRequirements", data)) => payload::<TitledModule<Vec<Requirement>>>(KIND, tag, data)
				.map(|m| Self::BasicRequirements {
					title: m.title,
					requirements: m.requirement,
				}),
			Some(("SelectOneEmphasis", _)) => Some(Self::SelectOneEmphasis(raw.clone())),
			Some((tag @ "Label", data)) => {
				payload::<ModuleLabel>(KIND, tag, data).map(|l| Self::Label { title: l.title })
			}
			Some(("Unimplemented", _)) => Some(Self::Unimplemented(raw.clone())),
			_ => None,
		};
		decoded.unwrap_or_else(|| Self::Unrecognized(unrecognized(KIND, raw)))
	}
}

impl Requirement {
	fn from_value(raw: Value) -> Self {
		const KIND: &str = "Requirement";
		let decoded = match tag_of(&raw) {
			Some((tag @ "Courses", data)) => payload::<CoursesPayload<Vec<CourseEntry>>>(KIND, tag, data)
				.map(|c| Self::Courses {
					title: c.title,
					courses: c.courses,
				}),
			Some((tag @ "SelectFromCourses", data)) => {
				payload::<CoursesPayload<Option<Vec<CourseEntry>>>>(KIND, tag, data).map(|c| {
					Self::SelectFromCourses {
						title: c.title.unwrap_or_default(),
						courses: c.courses,
					}
				})
			}
			Some((tag @ "Label", data)) => payload::<RequirementLabel>(KIND, tag, data).map(|l| Self::Label {
				title: l.title,
				req_narrative: l.req_narrative,
			}),
			_ => None,
		};
		decoded.unwrap_or_else(|| Self::Unrecognized(unrecognized(KIND, raw)))
	}
}

impl CourseEntry {
	fn from_value(raw: Value) -> Self {
		const KIND: &str = "CourseEntry";
		let decoded = match tag_of(&raw) {
			Some((tag @ "And", data)) => payload(KIND, tag, data).map(Self::And),
			Some((tag @ "Or", data)) => payload(KIND, tag, data).map(Self::Or),
			Some((tag @ "Label", data)) => payload(KIND, tag, data).map(Self::Label),
			Some((tag @ "Course", data)) => payload(KIND, tag, data).map(Self::Course),
			_ => None,
		};
		decoded.unwrap_or_else(|| Self::Unrecognized(unrecognized(KIND, raw)))
	}
}

macro_rules! deserialize_tagged {
	($($ty:ty),+) => {
		$(
			impl<'de> Deserialize<'de> for $ty {
				fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
					Value::deserialize(deserializer).map(Self::from_value)
				}
			}
		)+
	};
}

deserialize_tagged!(Requirements, RequirementModule, Requirement, CourseEntry);
