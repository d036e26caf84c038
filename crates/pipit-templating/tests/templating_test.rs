//! Tests for templates, menus, variables, and rendering

use pipit_content::items::ContentStore;
use pipit_content::routes::RouteRegistry;
use pipit_content::schema::{ContentType, NewContentType, NewField, SchemaRegistry};
use pipit_core::{OrganizationSettings, PageRequest, RequestContext, RevisionSort};
use pipit_fields::{FieldChoice, FieldKind, NoRelatedItems};
use pipit_templating::{
	MenuStore, NewMenuItem, TemplateStore, VariableCategory, item_render_context,
	menu_context_value, render_email, render_web_page, template_variables,
};
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;

#[rstest]
#[tokio::test]
async fn test_every_template_save_appends_a_revision() {
	let store = TemplateStore::new();
	let ctx = RequestContext::system();

	let template = store
		.create_web_template(
			"Post page".to_string(),
			"post-page",
			"v1".to_string(),
			false,
			None,
			&ctx,
		)
		.await
		.unwrap();
	store
		.edit_web_template(template.id, "Post page".to_string(), "v2".to_string(), None, &ctx)
		.await
		.unwrap();
	store
		.edit_web_template(template.id, "Post page".to_string(), "v3".to_string(), None, &ctx)
		.await
		.unwrap();

	let history = store
		.web_template_revisions(template.id, PageRequest::first(), RevisionSort::NewestFirst)
		.await;
	assert_eq!(history.total, 3);
	assert_eq!(history.items[0].snapshot.content, "v3");
}

#[rstest]
#[tokio::test]
async fn test_revert_adopts_snapshot_and_grows_history() {
	let store = TemplateStore::new();
	let ctx = RequestContext::system();
	let template = store
		.create_web_template(
			"Post page".to_string(),
			"post-page",
			"v1".to_string(),
			false,
			None,
			&ctx,
		)
		.await
		.unwrap();
	store
		.edit_web_template(template.id, "Post page".to_string(), "v2".to_string(), None, &ctx)
		.await
		.unwrap();

	let history = store
		.web_template_revisions(template.id, PageRequest::first(), RevisionSort::OldestFirst)
		.await;
	let first = &history.items[0];

	let reverted = store.revert_web_template(first.id, &ctx).await.unwrap();

	assert_eq!(reverted.content, "v1");
	let history = store
		.web_template_revisions(template.id, PageRequest::first(), RevisionSort::NewestFirst)
		.await;
	assert_eq!(history.total, 3);
	assert_eq!(history.items[0].snapshot.content, "v1");
}

#[rstest]
#[tokio::test]
async fn test_built_in_template_cannot_be_deleted() {
	let store = TemplateStore::new();
	let ctx = RequestContext::system();
	let template = store
		.create_web_template(
			"Layout".to_string(),
			"layout",
			"{{ renderbody }}".to_string(),
			true,
			None,
			&ctx,
		)
		.await
		.unwrap();

	assert!(store.delete_web_template(template.id, &ctx).await.is_err());
}

#[rstest]
#[tokio::test]
async fn test_layout_cycle_rejected() {
	let store = TemplateStore::new();
	let ctx = RequestContext::system();
	let layout = store
		.create_web_template(
			"Layout".to_string(),
			"layout",
			"{{ renderbody }}".to_string(),
			false,
			None,
			&ctx,
		)
		.await
		.unwrap();
	let child = store
		.create_web_template(
			"Child".to_string(),
			"child",
			"body".to_string(),
			false,
			Some(layout.id),
			&ctx,
		)
		.await
		.unwrap();

	// Pointing the layout back at its child would loop forever.
	let err = store
		.edit_web_template(
			layout.id,
			"Layout".to_string(),
			"{{ renderbody }}".to_string(),
			Some(child.id),
			&ctx,
		)
		.await
		.unwrap_err();
	assert!(err.is_validation());
}

async fn blog_with_item() -> (
	SchemaRegistry,
	ContentStore,
	ContentType,
	pipit_content::items::ContentItem,
	RequestContext,
) {
	let schemas = SchemaRegistry::new();
	let store = ContentStore::new(Arc::new(RouteRegistry::new()));
	let ctx = RequestContext::system();

	let blog = schemas
		.create_content_type(
			NewContentType {
				label_singular: "Post".to_string(),
				label_plural: "Posts".to_string(),
				developer_name: "blog".to_string(),
				default_route_template: "{ContentTypeDeveloperName}/{PrimaryField}".to_string(),
				description: String::new(),
			},
			&ctx,
		)
		.await
		.unwrap();
	for (name, kind, choices) in [
		("title", FieldKind::SingleLineText, Vec::new()),
		(
			"category",
			FieldKind::SingleSelect,
			vec![FieldChoice::new("News").unwrap()],
		),
	] {
		schemas
			.create_field(
				blog.id,
				NewField {
					label: name.to_string(),
					developer_name: name.to_string(),
					kind,
					is_required: name == "title",
					choices,
					related_content_type_id: None,
				},
				&ctx,
			)
			.await
			.unwrap();
	}
	let blog = schemas.get(blog.id).await.unwrap();
	let item = store
		.create_item(
			&blog,
			json!({"title": "Hello", "category": "news"}).as_object().unwrap(),
			false,
			None,
			&ctx,
		)
		.await
		.unwrap();
	(schemas, store, blog, item, ctx)
}

#[rstest]
#[tokio::test]
async fn test_render_web_page_through_layout_chain() {
	let (_, _, blog, item, ctx) = blog_with_item().await;
	let templates = TemplateStore::new();

	let layout = templates
		.create_web_template(
			"Layout".to_string(),
			"layout",
			"<html>{{ renderbody }}</html>".to_string(),
			true,
			None,
			&ctx,
		)
		.await
		.unwrap();
	let page = templates
		.create_web_template(
			"Post page".to_string(),
			"post-page",
			"<h1>{{ ContentItem.PublishedContent.title }}</h1>\
			 <p>{{ ContentItem.PublishedContent.category.Text }}</p>"
				.to_string(),
			false,
			Some(layout.id),
			&ctx,
		)
		.await
		.unwrap();

	let context = item_render_context(&item, &blog, &ctx.organization, &NoRelatedItems);
	let html = render_web_page(&templates, page.id, &context).await.unwrap();

	assert_eq!(html, "<html><h1>Hello</h1><p>News</p></html>");
}

#[rstest]
#[tokio::test]
async fn test_render_email_substitutes_subject_and_body() {
	let (_, _, blog, item, ctx) = blog_with_item().await;
	let templates = TemplateStore::new();
	let email = templates
		.create_email_template(
			"New post".to_string(),
			"new-post",
			"Published: {{ ContentItem.PrimaryField }}".to_string(),
			"Read it at {{ ContentItem.RoutePath }}".to_string(),
			false,
			&ctx,
		)
		.await
		.unwrap();

	let context = item_render_context(&item, &blog, &ctx.organization, &NoRelatedItems);
	let rendered = render_email(&email, &context).unwrap();

	assert_eq!(rendered.subject, "Published: Hello");
	assert_eq!(rendered.body, "Read it at blog/hello");
}

#[rstest]
#[tokio::test]
async fn test_variable_resolver_tracks_schema_changes() {
	let (schemas, _, blog, _, ctx) = blog_with_item().await;

	let has_category = |content_type: &ContentType| {
		template_variables(Some(content_type), false)
			.into_iter()
			.find(|g| g.category == VariableCategory::ContentItem)
			.unwrap()
			.variables
			.iter()
			.any(|v| v.path.contains("category"))
	};
	assert!(has_category(&blog));

	let category = blog.field("category").unwrap();
	schemas.delete_field(blog.id, category.id, &ctx).await.unwrap();
	let blog = schemas.get(blog.id).await.unwrap();

	assert!(!has_category(&blog));
}

#[rstest]
#[tokio::test]
async fn test_choice_fields_expose_value_and_text_paths() {
	let (_, _, blog, _, _) = blog_with_item().await;

	let item_group = template_variables(Some(&blog), false)
		.into_iter()
		.find(|g| g.category == VariableCategory::ContentItem)
		.unwrap();

	let paths: Vec<&str> = item_group.variables.iter().map(|v| v.path.as_str()).collect();
	assert!(paths.contains(&"ContentItem.PublishedContent.title"));
	assert!(paths.contains(&"ContentItem.PublishedContent.category.Value"));
	assert!(paths.contains(&"ContentItem.PublishedContent.category.Text"));
}

#[rstest]
#[tokio::test]
async fn test_first_menu_is_main_and_protected() {
	let menus = MenuStore::new();
	let ctx = RequestContext::system();

	let main = menus.create_menu("Main".to_string(), "main", &ctx).await.unwrap();
	assert!(main.is_main_menu);

	let footer = menus
		.create_menu("Footer".to_string(), "footer", &ctx)
		.await
		.unwrap();
	assert!(!footer.is_main_menu);

	// The main menu cannot be deleted until another takes over.
	assert!(menus.delete_menu(main.id, &ctx).await.is_err());
	menus.set_as_main_menu(footer.id, &ctx).await.unwrap();
	assert!(menus.delete_menu(main.id, &ctx).await.is_ok());
	assert_eq!(menus.main_menu().await.unwrap().id, footer.id);
}

#[rstest]
#[tokio::test]
async fn test_menu_item_mutations_are_revisioned_and_revertable() {
	let menus = MenuStore::new();
	let ctx = RequestContext::system();
	let menu = menus.create_menu("Main".to_string(), "main", &ctx).await.unwrap();

	let home = menus
		.add_item(
			menu.id,
			NewMenuItem {
				label: "Home".to_string(),
				url: "/".to_string(),
				is_disabled: false,
				open_in_new_tab: false,
				parent_item_id: None,
			},
			&ctx,
		)
		.await
		.unwrap();
	menus
		.add_item(
			menu.id,
			NewMenuItem {
				label: "About".to_string(),
				url: "/about".to_string(),
				is_disabled: false,
				open_in_new_tab: false,
				parent_item_id: None,
			},
			&ctx,
		)
		.await
		.unwrap();
	menus.remove_item(menu.id, home.id, &ctx).await.unwrap();

	let history = menus
		.revisions_for(menu.id, PageRequest::first(), RevisionSort::OldestFirst)
		.await;
	assert_eq!(history.total, 3);

	// Revert to the two-item state.
	let two_items = &history.items[1];
	let reverted = menus.revert_menu(two_items.id, &ctx).await.unwrap();
	assert_eq!(reverted.items.len(), 2);
	assert_eq!(
		menus
			.revisions_for(menu.id, PageRequest::first(), RevisionSort::OldestFirst)
			.await
			.total,
		4
	);
}

#[rstest]
#[tokio::test]
async fn test_menu_context_value_skips_disabled_items() {
	let menus = MenuStore::new();
	let ctx = RequestContext::system();
	let menu = menus.create_menu("Main".to_string(), "main", &ctx).await.unwrap();
	menus
		.add_item(
			menu.id,
			NewMenuItem {
				label: "Home".to_string(),
				url: "/".to_string(),
				is_disabled: false,
				open_in_new_tab: false,
				parent_item_id: None,
			},
			&ctx,
		)
		.await
		.unwrap();
	menus
		.add_item(
			menu.id,
			NewMenuItem {
				label: "Hidden".to_string(),
				url: "/hidden".to_string(),
				is_disabled: true,
				open_in_new_tab: false,
				parent_item_id: None,
			},
			&ctx,
		)
		.await
		.unwrap();

	let menu = menus.get(menu.id).await.unwrap();
	let value = menu_context_value(&menu);

	let items = value["Items"].as_array().unwrap();
	assert_eq!(items.len(), 1);
	assert_eq!(items[0]["Label"], "Home");
}

#[rstest]
#[tokio::test]
async fn test_organization_settings_flow_into_render_context() {
	let (_, _, blog, item, _) = blog_with_item().await;
	let org = OrganizationSettings {
		name: "Acme".to_string(),
		website_url: "https://acme.example".to_string(),
		..Default::default()
	};
	let templates = TemplateStore::new();
	let ctx = RequestContext::system();
	let page = templates
		.create_web_template(
			"Page".to_string(),
			"page",
			"{{ CurrentOrganization.OrganizationName }}".to_string(),
			false,
			None,
			&ctx,
		)
		.await
		.unwrap();

	let context = item_render_context(&item, &blog, &org, &NoRelatedItems);
	let html = render_web_page(&templates, page.id, &context).await.unwrap();
	assert_eq!(html, "Acme");
}
