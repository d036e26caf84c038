//! Content type schemas
//!
//! A content type describes one collection of content items: labels, an
//! immutable developer name, a default route template, and an ordered list
//! of typed fields. Fields are soft-deleted so historical document keys
//! keep their meaning; active field orders stay a dense `0..n-1`
//! permutation through every create, delete, and reorder.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use pipit_core::{
	AuditStamp, ContentTypeId, DeletionStamp, DeveloperName, EngineError, EngineResult, FieldId,
	RequestContext, ValidationErrors,
};
use pipit_fields::{FieldChoice, FieldDefinition, FieldKind};
use regex::Regex;
use tracing::{debug, info};
use uuid::Uuid;

/// Placeholders a default route template may use.
pub const ROUTE_PLACEHOLDERS: [&str; 5] = [
	"ContentTypeDeveloperName",
	"PrimaryField",
	"Id",
	"CurrentYear",
	"CurrentMonth",
];

static PLACEHOLDER_REGEX: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder regex is valid"));

/// One typed, orderable, optionally-required attribute of a content type.
#[derive(Debug, Clone)]
pub struct ContentTypeField {
	/// Field identifier
	pub id: FieldId,
	/// Owning content type
	pub content_type_id: ContentTypeId,
	/// Display label
	pub label: String,
	/// Immutable slug, unique within the content type
	pub developer_name: DeveloperName,
	/// Field kind
	pub kind: FieldKind,
	/// Dense position among the content type's active fields
	pub field_order: u32,
	/// Whether submitted documents must carry a value
	pub is_required: bool,
	/// Choice list, only meaningful for select kinds
	pub choices: Vec<FieldChoice>,
	/// Target content type, only for relationship fields
	pub related_content_type_id: Option<ContentTypeId>,
	/// Audit bookkeeping
	pub audit: AuditStamp,
	/// Present once the field has been logically deleted
	pub deleted: Option<DeletionStamp>,
}

impl ContentTypeField {
	/// Whether the field has been logically deleted.
	pub fn is_deleted(&self) -> bool {
		self.deleted.is_some()
	}

	/// Borrowed view for cleaning and display.
	pub fn definition(&self) -> FieldDefinition<'_> {
		FieldDefinition {
			developer_name: self.developer_name.as_str(),
			label: &self.label,
			kind: self.kind,
			is_required: self.is_required,
			choices: &self.choices,
		}
	}
}

/// A user-defined schema describing a collection of content items.
#[derive(Debug, Clone)]
pub struct ContentType {
	/// Content type identifier
	pub id: ContentTypeId,
	/// Singular display label ("Post")
	pub label_singular: String,
	/// Plural display label ("Posts")
	pub label_plural: String,
	/// Free-form description shown in the admin
	pub description: String,
	/// Immutable slug, unique among non-deleted content types
	pub developer_name: DeveloperName,
	/// Route pattern for new items, e.g. `{ContentTypeDeveloperName}/{PrimaryField}`
	pub default_route_template: String,
	/// The field supplying an item's human-readable title
	pub primary_field_id: Option<FieldId>,
	/// Every field ever created, active ones first in order
	pub fields: Vec<ContentTypeField>,
	/// Audit bookkeeping
	pub audit: AuditStamp,
	/// Present once the content type has been logically deleted
	pub deleted: Option<DeletionStamp>,
}

impl ContentType {
	/// Whether the content type has been logically deleted.
	pub fn is_deleted(&self) -> bool {
		self.deleted.is_some()
	}

	/// Active (non-deleted) fields in display order.
	pub fn active_fields(&self) -> impl Iterator<Item = &ContentTypeField> {
		let mut fields: Vec<&ContentTypeField> =
			self.fields.iter().filter(|f| !f.is_deleted()).collect();
		fields.sort_by_key(|f| f.field_order);
		fields.into_iter()
	}

	/// Look up an active field by developer name.
	pub fn field(&self, developer_name: &str) -> Option<&ContentTypeField> {
		self.fields
			.iter()
			.find(|f| !f.is_deleted() && f.developer_name == *developer_name)
	}

	/// Look up a field by id, deleted or not.
	pub fn field_by_id(&self, id: FieldId) -> Option<&ContentTypeField> {
		self.fields.iter().find(|f| f.id == id)
	}

	/// The field designated as the primary (title) field.
	pub fn primary_field(&self) -> Option<&ContentTypeField> {
		self.primary_field_id.and_then(|id| self.field_by_id(id))
	}

	/// Kind of an active field, for filter/sort validation.
	pub fn field_kind(&self, developer_name: &str) -> Option<FieldKind> {
		self.field(developer_name).map(|f| f.kind)
	}

	/// Definitions of the active fields, in display order.
	pub fn definitions(&self) -> Vec<FieldDefinition<'_>> {
		self.active_fields().map(|f| f.definition()).collect()
	}

	/// Reassign dense orders to the active fields, preserving their
	/// current relative order. Deleted fields keep their stale order.
	fn renumber(&mut self) {
		let mut active: Vec<usize> = (0..self.fields.len())
			.filter(|&i| !self.fields[i].is_deleted())
			.collect();
		active.sort_by_key(|&i| self.fields[i].field_order);
		for (order, index) in active.into_iter().enumerate() {
			self.fields[index].field_order = order as u32;
		}
	}
}

/// Input for [`SchemaRegistry::create_content_type`].
#[derive(Debug, Clone)]
pub struct NewContentType {
	/// Singular display label
	pub label_singular: String,
	/// Plural display label
	pub label_plural: String,
	/// Developer name; normalized and validated as a slug
	pub developer_name: String,
	/// Default route template for new items
	pub default_route_template: String,
	/// Free-form description
	pub description: String,
}

/// Input for [`SchemaRegistry::edit_content_type`]. The developer name is
/// deliberately absent — it is immutable.
#[derive(Debug, Clone)]
pub struct EditContentType {
	/// New singular label
	pub label_singular: String,
	/// New plural label
	pub label_plural: String,
	/// New description
	pub description: String,
	/// New default route template
	pub default_route_template: String,
	/// New primary field designation
	pub primary_field_id: Option<FieldId>,
}

/// Input for [`SchemaRegistry::create_field`].
#[derive(Debug, Clone)]
pub struct NewField {
	/// Display label
	pub label: String,
	/// Developer name; normalized and validated as a slug
	pub developer_name: String,
	/// Field kind; immutable after creation
	pub kind: FieldKind,
	/// Whether submitted documents must carry a value
	pub is_required: bool,
	/// Choice list for select kinds
	pub choices: Vec<FieldChoice>,
	/// Target content type for relationship fields
	pub related_content_type_id: Option<ContentTypeId>,
}

/// Input for [`SchemaRegistry::edit_field`]. Developer name and kind are
/// immutable; only presentation and constraint settings can change.
#[derive(Debug, Clone)]
pub struct EditField {
	/// New display label
	pub label: String,
	/// New required flag
	pub is_required: bool,
	/// Replacement choice list, `None` to keep the current one
	pub choices: Option<Vec<FieldChoice>>,
}

/// The registry of all content type schemas.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
	types: DashMap<ContentTypeId, ContentType>,
}

impl SchemaRegistry {
	/// Create an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a content type.
	pub async fn create_content_type(
		&self,
		input: NewContentType,
		ctx: &RequestContext,
	) -> EngineResult<ContentType> {
		let developer_name = DeveloperName::parse(&input.developer_name)?;
		if self.developer_name_taken(&developer_name) {
			return Err(EngineError::validation(
				"developer_name",
				format!("The developer name '{}' is already in use.", developer_name),
			));
		}
		validate_route_template(&input.default_route_template)?;

		let content_type = ContentType {
			id: Uuid::new_v4(),
			label_singular: input.label_singular,
			label_plural: input.label_plural,
			description: input.description,
			developer_name,
			default_route_template: input.default_route_template,
			primary_field_id: None,
			fields: Vec::new(),
			audit: AuditStamp::new(ctx),
			deleted: None,
		};
		info!(content_type = %content_type.developer_name, "created content type");
		self.types.insert(content_type.id, content_type.clone());
		Ok(content_type)
	}

	/// Fetch a non-deleted content type.
	pub async fn get(&self, id: ContentTypeId) -> EngineResult<ContentType> {
		self.types
			.get(&id)
			.filter(|ct| !ct.is_deleted())
			.map(|ct| ct.clone())
			.ok_or_else(|| EngineError::not_found("content type", id))
	}

	/// Fetch a non-deleted content type by developer name.
	pub async fn get_by_developer_name(&self, developer_name: &str) -> EngineResult<ContentType> {
		self.types
			.iter()
			.find(|ct| !ct.is_deleted() && ct.developer_name == *developer_name)
			.map(|ct| ct.clone())
			.ok_or_else(|| EngineError::not_found("content type", developer_name))
	}

	/// All non-deleted content types, ordered by singular label.
	pub async fn list(&self) -> Vec<ContentType> {
		let mut types: Vec<ContentType> = self
			.types
			.iter()
			.filter(|ct| !ct.is_deleted())
			.map(|ct| ct.clone())
			.collect();
		types.sort_by(|a, b| a.label_singular.cmp(&b.label_singular));
		types
	}

	/// Edit labels, description, route template, and the primary field.
	pub async fn edit_content_type(
		&self,
		id: ContentTypeId,
		input: EditContentType,
		ctx: &RequestContext,
	) -> EngineResult<ContentType> {
		validate_route_template(&input.default_route_template)?;

		let mut entry = self
			.types
			.get_mut(&id)
			.filter(|ct| !ct.is_deleted())
			.ok_or_else(|| EngineError::not_found("content type", id))?;

		if let Some(primary_id) = input.primary_field_id {
			let valid = entry
				.field_by_id(primary_id)
				.is_some_and(|f| !f.is_deleted());
			if !valid {
				return Err(EngineError::validation(
					"primary_field_id",
					"The primary field must be an active field of this content type.",
				));
			}
		}

		entry.label_singular = input.label_singular;
		entry.label_plural = input.label_plural;
		entry.description = input.description;
		entry.default_route_template = input.default_route_template;
		if input.primary_field_id.is_some() {
			entry.primary_field_id = input.primary_field_id;
		}
		entry.audit.touch(ctx);
		Ok(entry.clone())
	}

	/// Logically delete a content type, freeing its developer name.
	pub async fn delete_content_type(
		&self,
		id: ContentTypeId,
		ctx: &RequestContext,
	) -> EngineResult<()> {
		let mut entry = self
			.types
			.get_mut(&id)
			.filter(|ct| !ct.is_deleted())
			.ok_or_else(|| EngineError::not_found("content type", id))?;
		entry.deleted = Some(DeletionStamp::new(ctx));
		entry.audit.touch(ctx);
		info!(content_type = %entry.developer_name, "deleted content type");
		Ok(())
	}

	/// Add a field to a content type. The first field created becomes the
	/// primary field unless one is already designated.
	pub async fn create_field(
		&self,
		content_type_id: ContentTypeId,
		input: NewField,
		ctx: &RequestContext,
	) -> EngineResult<ContentTypeField> {
		let developer_name = DeveloperName::parse(&input.developer_name)?;
		validate_field_shape(&input)?;

		// Relationship targets are validated before the owning entry is
		// locked; the backing store's constraints are the last word under
		// concurrent deletes.
		if let Some(related_id) = input.related_content_type_id
			&& self
				.types
				.get(&related_id)
				.filter(|ct| !ct.is_deleted())
				.is_none()
		{
			return Err(EngineError::validation(
				"related_content_type_id",
				"The related content type does not exist.",
			));
		}

		let mut entry = self
			.types
			.get_mut(&content_type_id)
			.filter(|ct| !ct.is_deleted())
			.ok_or_else(|| EngineError::not_found("content type", content_type_id))?;

		let taken = entry
			.fields
			.iter()
			.any(|f| !f.is_deleted() && f.developer_name == developer_name);
		if taken {
			return Err(EngineError::validation(
				"developer_name",
				format!(
					"The developer name '{}' is already in use on this content type.",
					developer_name
				),
			));
		}

		let next_order = entry.fields.iter().filter(|f| !f.is_deleted()).count() as u32;
		let field = ContentTypeField {
			id: Uuid::new_v4(),
			content_type_id,
			label: input.label,
			developer_name,
			kind: input.kind,
			field_order: next_order,
			is_required: input.is_required,
			choices: input.choices,
			related_content_type_id: input.related_content_type_id,
			audit: AuditStamp::new(ctx),
			deleted: None,
		};
		debug!(
			content_type = %entry.developer_name,
			field = %field.developer_name,
			"created field"
		);
		entry.fields.push(field.clone());
		if entry.primary_field_id.is_none() {
			entry.primary_field_id = Some(field.id);
		}
		entry.audit.touch(ctx);
		Ok(field)
	}

	/// Edit a field's label, required flag, and choices.
	pub async fn edit_field(
		&self,
		content_type_id: ContentTypeId,
		field_id: FieldId,
		input: EditField,
		ctx: &RequestContext,
	) -> EngineResult<ContentTypeField> {
		let mut entry = self
			.types
			.get_mut(&content_type_id)
			.filter(|ct| !ct.is_deleted())
			.ok_or_else(|| EngineError::not_found("content type", content_type_id))?;

		let field = entry
			.fields
			.iter_mut()
			.find(|f| f.id == field_id && !f.is_deleted())
			.ok_or_else(|| EngineError::not_found("content type field", field_id))?;

		if let Some(choices) = &input.choices
			&& !field.kind.has_choices()
			&& !choices.is_empty()
		{
			return Err(EngineError::validation(
				"choices",
				"Only select fields carry a choice list.",
			));
		}

		field.label = input.label;
		field.is_required = input.is_required;
		if let Some(choices) = input.choices {
			field.choices = choices;
		}
		field.audit.touch(ctx);
		let field = field.clone();
		entry.audit.touch(ctx);
		Ok(field)
	}

	/// Logically delete a field. The designated primary field cannot be
	/// deleted; historical document keys for the field are left untouched.
	pub async fn delete_field(
		&self,
		content_type_id: ContentTypeId,
		field_id: FieldId,
		ctx: &RequestContext,
	) -> EngineResult<()> {
		let mut entry = self
			.types
			.get_mut(&content_type_id)
			.filter(|ct| !ct.is_deleted())
			.ok_or_else(|| EngineError::not_found("content type", content_type_id))?;

		if entry.primary_field_id == Some(field_id) {
			return Err(EngineError::validation(
				"field",
				"The primary field cannot be deleted. Designate another primary field first.",
			));
		}

		let field = entry
			.fields
			.iter_mut()
			.find(|f| f.id == field_id && !f.is_deleted())
			.ok_or_else(|| EngineError::not_found("content type field", field_id))?;
		field.deleted = Some(DeletionStamp::new(ctx));
		let name = field.developer_name.clone();
		entry.renumber();
		entry.audit.touch(ctx);
		info!(content_type = %entry.developer_name, field = %name, "deleted field");
		Ok(())
	}

	/// Move a field to a new position. The position clamps to
	/// `[0, active_count - 1]` and every active field is renumbered in one
	/// operation, so orders stay a dense permutation.
	pub async fn reorder_field(
		&self,
		content_type_id: ContentTypeId,
		field_id: FieldId,
		new_position: u32,
		ctx: &RequestContext,
	) -> EngineResult<Vec<ContentTypeField>> {
		let mut entry = self
			.types
			.get_mut(&content_type_id)
			.filter(|ct| !ct.is_deleted())
			.ok_or_else(|| EngineError::not_found("content type", content_type_id))?;

		let mut order: Vec<FieldId> = {
			let mut active: Vec<&ContentTypeField> =
				entry.fields.iter().filter(|f| !f.is_deleted()).collect();
			active.sort_by_key(|f| f.field_order);
			active.iter().map(|f| f.id).collect()
		};
		let from = order
			.iter()
			.position(|&id| id == field_id)
			.ok_or_else(|| EngineError::not_found("content type field", field_id))?;
		let to = (new_position as usize).min(order.len() - 1);

		let id = order.remove(from);
		order.insert(to, id);
		for field in entry.fields.iter_mut() {
			if let Some(position) = order.iter().position(|&i| i == field.id) {
				field.field_order = position as u32;
			}
		}
		entry.audit.touch(ctx);
		debug!(content_type = %entry.developer_name, %field_id, to, "reordered field");

		let mut result: Vec<ContentTypeField> =
			entry.fields.iter().filter(|f| !f.is_deleted()).cloned().collect();
		result.sort_by_key(|f| f.field_order);
		Ok(result)
	}

	fn developer_name_taken(&self, developer_name: &DeveloperName) -> bool {
		self.types
			.iter()
			.any(|ct| !ct.is_deleted() && ct.developer_name == *developer_name)
	}
}

fn validate_field_shape(input: &NewField) -> EngineResult<()> {
	let mut errors = ValidationErrors::new();
	if !input.kind.has_choices() && !input.choices.is_empty() {
		errors.push("choices", "Only select fields carry a choice list.");
	}
	if input.kind.is_relationship() && input.related_content_type_id.is_none() {
		errors.push(
			"related_content_type_id",
			"Relationship fields must name a related content type.",
		);
	}
	if !input.kind.is_relationship() && input.related_content_type_id.is_some() {
		errors.push(
			"related_content_type_id",
			"Only relationship fields may name a related content type.",
		);
	}
	errors.into_result()
}

/// Check that a route template only uses known placeholders.
pub fn validate_route_template(template: &str) -> EngineResult<()> {
	if template.trim().is_empty() {
		return Err(EngineError::validation(
			"default_route_template",
			"Enter a route template.",
		));
	}
	for capture in PLACEHOLDER_REGEX.captures_iter(template) {
		let name = &capture[1];
		if !ROUTE_PLACEHOLDERS.contains(&name) {
			return Err(EngineError::validation(
				"default_route_template",
				format!("Unknown route template placeholder '{{{}}}'.", name),
			));
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("{ContentTypeDeveloperName}/{PrimaryField}")]
	#[case("blog/{CurrentYear}/{CurrentMonth}/{Id}")]
	#[case("plain/path")]
	fn test_route_template_accepts_known_placeholders(#[case] template: &str) {
		assert!(validate_route_template(template).is_ok());
	}

	#[rstest]
	#[case("{Bogus}")]
	#[case("posts/{primaryfield}")]
	#[case("")]
	fn test_route_template_rejects_unknown_placeholders(#[case] template: &str) {
		assert!(validate_route_template(template).is_err());
	}
}
