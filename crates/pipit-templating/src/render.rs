//! Tera-backed rendering
//!
//! Render contexts are built from the same paths the variable resolver
//! advertises, so an inserted token always resolves. Web templates render
//! inside their layout chain: the child's output becomes the parent's
//! `renderbody` variable, level by level.

use crate::menus::NavigationMenu;
use crate::templates::{EmailTemplate, TemplateStore};
use pipit_content::items::ContentItem;
use pipit_content::schema::ContentType;
use pipit_core::{OrganizationSettings, TemplateId};
use pipit_fields::{FieldKind, FieldValue, RelatedItemResolver, display_value};
use serde_json::{Value as JsonValue, json};
use thiserror::Error;

/// Rendering failures.
#[derive(Debug, Error)]
pub enum RenderError {
	/// The template (or one of its layouts) does not exist
	#[error("template not found: {0}")]
	TemplateNotFound(TemplateId),
	/// Tera rejected the template or the context
	#[error("template render error: {0}")]
	Render(String),
}

/// A rendered email, subject and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
	/// Rendered subject line
	pub subject: String,
	/// Rendered body
	pub body: String,
}

/// Build the render context for one content item.
///
/// The context mirrors the variable resolver's paths: ambient organization
/// data under `CurrentOrganization`, the item under `ContentItem` with its
/// published (or draft) document under `PublishedContent`. Choice and
/// relationship values appear as `{Value, Text}` objects.
pub fn item_render_context(
	item: &ContentItem,
	content_type: &ContentType,
	org: &OrganizationSettings,
	related: &dyn RelatedItemResolver,
) -> tera::Context {
	let mut context = tera::Context::new();
	context.insert(
		"CurrentOrganization",
		&json!({
			"OrganizationName": org.name,
			"WebsiteUrl": org.website_url,
			"TimeZone": org.timezone.name(),
		}),
	);

	let document = item.published.as_ref().unwrap_or(&item.draft);
	let mut content = serde_json::Map::new();
	for field in content_type.active_fields() {
		let Some(value) = document.get(field.developer_name.as_str()) else {
			continue;
		};
		let entry = match field.kind {
			FieldKind::SingleSelect
			| FieldKind::MultipleSelect
			| FieldKind::OneToOneRelationship => json!({
				"Value": raw_json(value),
				"Text": display_value(value, &field.definition(), org, related),
			}),
			_ => raw_json(value),
		};
		content.insert(field.developer_name.to_string(), entry);
	}

	context.insert(
		"ContentItem",
		&json!({
			"Id": item.id.to_string(),
			"PrimaryField": item.primary_text(content_type, org),
			"RoutePath": item.route_path,
			"IsPublished": item.is_published,
			"CreationTime": org.format_datetime(item.audit.created_at),
			"LastModificationTime": org.format_datetime(item.audit.updated_at),
			"PublishedContent": JsonValue::Object(content),
		}),
	);
	context
}

/// The `NavigationMenu` context value for a menu: enabled items in ordinal
/// order. Insert it under the `NavigationMenu` key.
pub fn menu_context_value(menu: &NavigationMenu) -> JsonValue {
	let mut items: Vec<&crate::menus::NavigationMenuItem> =
		menu.items.iter().filter(|i| !i.is_disabled).collect();
	items.sort_by_key(|i| i.ordinal);
	json!({
		"Label": menu.label,
		"DeveloperName": menu.developer_name.as_str(),
		"Items": items
			.iter()
			.map(|i| {
				json!({
					"Label": i.label,
					"Url": i.url,
					"OpenInNewTab": i.open_in_new_tab,
				})
			})
			.collect::<Vec<_>>(),
	})
}

fn raw_json(value: &FieldValue) -> JsonValue {
	match value {
		FieldValue::Text(s) => json!(s),
		FieldValue::Number(n) => json!(n),
		FieldValue::Date(d) => json!(d.format("%Y-%m-%d").to_string()),
		FieldValue::Checkbox(v) => json!(v),
		FieldValue::Choice(v) => json!(v),
		FieldValue::Choices(v) => json!(v),
		FieldValue::Relationship(v) => json!(v.map(|id| id.to_string())),
	}
}

/// Render a web template inside its layout chain.
///
/// The named template renders first; each parent layout then renders with
/// the previous output available as `renderbody`. Layout cycles are
/// rejected at edit time, so the chain is finite.
pub async fn render_web_page(
	store: &TemplateStore,
	template_id: TemplateId,
	context: &tera::Context,
) -> Result<String, RenderError> {
	let mut template = store
		.get_web_template(template_id)
		.await
		.map_err(|_| RenderError::TemplateNotFound(template_id))?;

	let mut body = render_one(&template.content, context)?;
	while let Some(parent_id) = template.parent_layout_id {
		template = store
			.get_web_template(parent_id)
			.await
			.map_err(|_| RenderError::TemplateNotFound(parent_id))?;
		let mut layered = context.clone();
		layered.insert("renderbody", &body);
		body = render_one(&template.content, &layered)?;
	}
	Ok(body)
}

/// Render an email template's subject and body against one context.
pub fn render_email(
	template: &EmailTemplate,
	context: &tera::Context,
) -> Result<RenderedEmail, RenderError> {
	Ok(RenderedEmail {
		subject: render_one(&template.subject, context)?,
		body: render_one(&template.content, context)?,
	})
}

fn render_one(content: &str, context: &tera::Context) -> Result<String, RenderError> {
	tera::Tera::one_off(content, context, false)
		.map_err(|e| RenderError::Render(e.to_string()))
}
