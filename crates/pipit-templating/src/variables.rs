//! The template variable resolver
//!
//! Maps a content type's active fields plus the fixed built-in categories
//! onto the named variables authors can insert into a template. Pure
//! metadata generation: no caching, no side effects — the output always
//! reflects the schema it was handed.

use pipit_content::schema::ContentType;
use pipit_fields::FieldKind;

/// The fixed categories of insertable variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableCategory {
	/// Organization-wide settings
	CurrentOrganization,
	/// The signed-in user
	CurrentUser,
	/// The inbound request
	Request,
	/// The main navigation menu
	NavigationMenu,
	/// The content item being rendered
	ContentItem,
	/// A view's list result
	ContentItemListResult,
}

impl VariableCategory {
	/// Display label for the variable picker.
	pub fn label(&self) -> &'static str {
		match self {
			VariableCategory::CurrentOrganization => "Organization",
			VariableCategory::CurrentUser => "Current user",
			VariableCategory::Request => "Request",
			VariableCategory::NavigationMenu => "Navigation menu",
			VariableCategory::ContentItem => "Content item",
			VariableCategory::ContentItemListResult => "List result",
		}
	}
}

/// One insertable variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVariable {
	/// Human-facing label in the picker
	pub label: String,
	/// Data path the templating layer resolves at render time
	pub path: String,
}

impl TemplateVariable {
	fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			path: path.into(),
		}
	}

	/// The token authors paste into a template body.
	pub fn insert_token(&self) -> String {
		format!("{{{{ {} }}}}", self.path)
	}
}

/// A category's variables, in picker order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableGroup {
	/// The category these variables belong to
	pub category: VariableCategory,
	/// The variables, base fields first
	pub variables: Vec<TemplateVariable>,
}

/// Resolve the variables available to a template.
///
/// Built-in templates (layouts and the system defaults) only expose the
/// ambient categories; everything else additionally exposes the content
/// item and list-result surfaces, including one variable per active field
/// of `content_type`. Choice and relationship fields contribute both a raw
/// `.Value` path and a human-readable `.Text` path.
pub fn template_variables(
	content_type: Option<&ContentType>,
	is_built_in_template: bool,
) -> Vec<VariableGroup> {
	let mut groups = vec![
		VariableGroup {
			category: VariableCategory::CurrentOrganization,
			variables: vec![
				TemplateVariable::new("Organization name", "CurrentOrganization.OrganizationName"),
				TemplateVariable::new("Website URL", "CurrentOrganization.WebsiteUrl"),
				TemplateVariable::new("Time zone", "CurrentOrganization.TimeZone"),
			],
		},
		VariableGroup {
			category: VariableCategory::CurrentUser,
			variables: vec![
				TemplateVariable::new("User id", "CurrentUser.UserId"),
				TemplateVariable::new("Full name", "CurrentUser.FullName"),
				TemplateVariable::new("Email address", "CurrentUser.EmailAddress"),
				TemplateVariable::new("Is authenticated", "CurrentUser.IsAuthenticated"),
			],
		},
		VariableGroup {
			category: VariableCategory::Request,
			variables: vec![
				TemplateVariable::new("Path", "Request.Path"),
				TemplateVariable::new("Query string", "Request.QueryString"),
				TemplateVariable::new("Origin", "Request.Origin"),
			],
		},
		VariableGroup {
			category: VariableCategory::NavigationMenu,
			variables: vec![
				TemplateVariable::new("Menu label", "NavigationMenu.Label"),
				TemplateVariable::new("Menu items", "NavigationMenu.Items"),
			],
		},
	];

	if is_built_in_template {
		return groups;
	}

	let mut item_variables = vec![
		TemplateVariable::new("Id", "ContentItem.Id"),
		TemplateVariable::new("Primary field", "ContentItem.PrimaryField"),
		TemplateVariable::new("Route path", "ContentItem.RoutePath"),
		TemplateVariable::new("Is published", "ContentItem.IsPublished"),
		TemplateVariable::new("Creation time", "ContentItem.CreationTime"),
		TemplateVariable::new("Last modification time", "ContentItem.LastModificationTime"),
	];
	if let Some(content_type) = content_type {
		for field in content_type.active_fields() {
			let base = format!("ContentItem.PublishedContent.{}", field.developer_name);
			match field.kind {
				FieldKind::SingleSelect
				| FieldKind::MultipleSelect
				| FieldKind::OneToOneRelationship => {
					item_variables
						.push(TemplateVariable::new(field.label.clone(), format!("{base}.Value")));
					item_variables.push(TemplateVariable::new(
						format!("{} (text)", field.label),
						format!("{base}.Text"),
					));
				}
				_ => {
					item_variables.push(TemplateVariable::new(field.label.clone(), base));
				}
			}
		}
	}
	groups.push(VariableGroup {
		category: VariableCategory::ContentItem,
		variables: item_variables,
	});

	groups.push(VariableGroup {
		category: VariableCategory::ContentItemListResult,
		variables: vec![
			TemplateVariable::new("Items", "ContentItemListResult.Items"),
			TemplateVariable::new("Total count", "ContentItemListResult.TotalCount"),
			TemplateVariable::new("Page number", "ContentItemListResult.PageNumber"),
			TemplateVariable::new("Page size", "ContentItemListResult.PageSize"),
			TemplateVariable::new("Total pages", "ContentItemListResult.TotalPages"),
		],
	});

	groups
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_built_in_templates_only_expose_ambient_categories() {
		let groups = template_variables(None, true);
		assert!(
			!groups
				.iter()
				.any(|g| g.category == VariableCategory::ContentItem)
		);
		assert!(
			groups
				.iter()
				.any(|g| g.category == VariableCategory::CurrentOrganization)
		);
	}

	#[rstest]
	fn test_insert_token_shape() {
		let variable = TemplateVariable::new("Id", "ContentItem.Id");
		assert_eq!(variable.insert_token(), "{{ ContentItem.Id }}");
	}
}
