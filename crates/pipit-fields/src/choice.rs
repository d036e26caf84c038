//! Choice entries for select fields

use pipit_core::DeveloperName;
use serde::{Deserialize, Serialize};

/// One entry of a select field's ordered choice list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChoice {
	/// Display label
	pub label: String,
	/// Stable identifier stored in documents
	pub developer_name: DeveloperName,
	/// Disabled choices stay valid in stored documents but are rejected
	/// for new input
	#[serde(default)]
	pub disabled: bool,
}

impl FieldChoice {
	/// Create an enabled choice, deriving the developer name from the label.
	pub fn new(label: impl Into<String>) -> pipit_core::EngineResult<Self> {
		let label = label.into();
		let developer_name = DeveloperName::parse(&label)?;
		Ok(Self {
			label,
			developer_name,
			disabled: false,
		})
	}
}
