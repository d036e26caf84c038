//! Tests for the content item draft/publish/trash lifecycle

use pipit_content::items::ContentStore;
use pipit_content::routes::{RouteRegistry, RouteTarget};
use pipit_content::schema::{ContentType, NewContentType, NewField, SchemaRegistry};
use pipit_content::trash::ItemState;
use pipit_core::{PageRequest, RequestContext, RevisionSort};
use pipit_fields::{FieldKind, FieldValue};
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

struct Fixture {
	schemas: SchemaRegistry,
	store: ContentStore,
	ctx: RequestContext,
}

async fn blog_fixture() -> (Fixture, ContentType) {
	let schemas = SchemaRegistry::new();
	let routes = Arc::new(RouteRegistry::new());
	let store = ContentStore::new(routes);
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
	schemas
		.create_field(
			blog.id,
			NewField {
				label: "Title".to_string(),
				developer_name: "title".to_string(),
				kind: FieldKind::SingleLineText,
				is_required: true,
				choices: Vec::new(),
				related_content_type_id: None,
			},
			&ctx,
		)
		.await
		.unwrap();
	schemas
		.create_field(
			blog.id,
			NewField {
				label: "Body".to_string(),
				developer_name: "body".to_string(),
				kind: FieldKind::SingleLineText,
				is_required: false,
				choices: Vec::new(),
				related_content_type_id: None,
			},
			&ctx,
		)
		.await
		.unwrap();

	let blog = schemas.get(blog.id).await.unwrap();
	(Fixture { schemas, store, ctx }, blog)
}

fn values(pairs: &[(&str, &str)]) -> serde_json::Map<String, serde_json::Value> {
	pairs
		.iter()
		.map(|(k, v)| (k.to_string(), json!(v)))
		.collect()
}

#[rstest]
#[tokio::test]
async fn test_create_and_publish_records_revision_and_route() {
	// Arrange
	let (fx, blog) = blog_fixture().await;

	// Act
	let item = fx
		.store
		.create_item(
			&blog,
			&values(&[("title", "Hello"), ("body", "World")]),
			false,
			None,
			&fx.ctx,
		)
		.await
		.unwrap();

	// Assert
	assert!(item.is_published);
	assert!(!item.has_unsaved_changes());
	assert_eq!(item.route_path, "blog/hello");
	assert_eq!(fx.store.revision_count(item.id).await, 1);
	assert_eq!(
		fx.store.routes().resolve("blog/hello").await,
		Some(RouteTarget::ContentItem(item.id))
	);

	let revisions = fx
		.store
		.revisions_for(item.id, PageRequest::first(), RevisionSort::NewestFirst)
		.await;
	assert_eq!(revisions.items[0].snapshot, item.published.unwrap());
}

#[rstest]
#[tokio::test]
async fn test_draft_edit_leaves_published_content_alone() {
	// Arrange
	let (fx, blog) = blog_fixture().await;
	let item = fx
		.store
		.create_item(
			&blog,
			&values(&[("title", "Hello"), ("body", "World")]),
			false,
			None,
			&fx.ctx,
		)
		.await
		.unwrap();

	// Act
	let edited = fx
		.store
		.edit_item(
			item.id,
			&blog,
			&values(&[("title", "Hello2"), ("body", "World")]),
			true,
			&fx.ctx,
		)
		.await
		.unwrap();

	// Assert
	assert!(edited.is_draft());
	assert_eq!(
		edited.draft.get("title"),
		Some(&FieldValue::Text("Hello2".to_string()))
	);
	assert_eq!(
		edited.published.as_ref().unwrap().get("title"),
		Some(&FieldValue::Text("Hello".to_string()))
	);
	assert_eq!(fx.store.revision_count(item.id).await, 1);
}

#[rstest]
#[tokio::test]
async fn test_publish_always_matches_latest_revision() {
	let (fx, blog) = blog_fixture().await;
	let item = fx
		.store
		.create_item(&blog, &values(&[("title", "v1")]), false, None, &fx.ctx)
		.await
		.unwrap();

	for title in ["v2", "v3", "v4"] {
		let published = fx
			.store
			.edit_item(item.id, &blog, &values(&[("title", title)]), false, &fx.ctx)
			.await
			.unwrap();

		let latest = fx
			.store
			.revisions_for(item.id, PageRequest::first(), RevisionSort::NewestFirst)
			.await;
		assert_eq!(
			latest.items[0].snapshot,
			published.published.clone().unwrap()
		);
	}
	assert_eq!(fx.store.revision_count(item.id).await, 4);
}

#[rstest]
#[tokio::test]
async fn test_required_field_missing_is_per_field_validation_error() {
	let (fx, blog) = blog_fixture().await;

	let err = fx
		.store
		.create_item(&blog, &values(&[("body", "no title")]), false, None, &fx.ctx)
		.await
		.unwrap_err();

	match err {
		pipit_core::EngineError::Validation(errors) => {
			assert!(errors.has_field("title"));
			assert!(!errors.has_field("body"));
		}
		other => panic!("expected validation error, got {other:?}"),
	}
}

#[rstest]
#[tokio::test]
async fn test_route_collision_is_rejected_not_suffixed() {
	let (fx, blog) = blog_fixture().await;
	fx.store
		.create_item(&blog, &values(&[("title", "Hello")]), false, None, &fx.ctx)
		.await
		.unwrap();

	let err = fx
		.store
		.create_item(&blog, &values(&[("title", "Hello")]), false, None, &fx.ctx)
		.await
		.unwrap_err();
	assert!(err.is_validation());
}

#[rstest]
#[tokio::test]
async fn test_route_override_via_settings() {
	let (fx, blog) = blog_fixture().await;
	let item = fx
		.store
		.create_item(&blog, &values(&[("title", "Hello")]), false, None, &fx.ctx)
		.await
		.unwrap();

	let moved = fx
		.store
		.edit_item_settings(item.id, Some("evergreen/hello".to_string()), None, &fx.ctx)
		.await
		.unwrap();

	assert_eq!(moved.route_path, "evergreen/hello");
	assert_eq!(fx.store.routes().resolve("blog/hello").await, None);
	assert_eq!(
		fx.store.routes().resolve("evergreen/hello").await,
		Some(RouteTarget::ContentItem(item.id))
	);
}

#[rstest]
#[tokio::test]
async fn test_unpublish_keeps_draft() {
	let (fx, blog) = blog_fixture().await;
	let item = fx
		.store
		.create_item(&blog, &values(&[("title", "Hello")]), false, None, &fx.ctx)
		.await
		.unwrap();

	let unpublished = fx.store.unpublish(item.id, &fx.ctx).await.unwrap();

	assert!(!unpublished.is_published);
	assert!(unpublished.published.is_none());
	assert_eq!(
		unpublished.draft.get("title"),
		Some(&FieldValue::Text("Hello".to_string()))
	);
	// History is untouched by an unpublish.
	assert_eq!(fx.store.revision_count(item.id).await, 1);
}

#[rstest]
#[tokio::test]
async fn test_discard_draft_resets_to_published() {
	let (fx, blog) = blog_fixture().await;
	let item = fx
		.store
		.create_item(&blog, &values(&[("title", "Hello")]), false, None, &fx.ctx)
		.await
		.unwrap();
	fx.store
		.edit_item(item.id, &blog, &values(&[("title", "Scratch")]), true, &fx.ctx)
		.await
		.unwrap();

	let discarded = fx.store.discard_draft(item.id, &fx.ctx).await.unwrap();

	assert_eq!(
		discarded.draft.get("title"),
		Some(&FieldValue::Text("Hello".to_string()))
	);
	assert!(!discarded.has_unsaved_changes());
}

#[rstest]
#[tokio::test]
async fn test_discard_draft_without_publish_is_validation_error() {
	let (fx, blog) = blog_fixture().await;
	let item = fx
		.store
		.create_item(&blog, &values(&[("title", "Hello")]), true, None, &fx.ctx)
		.await
		.unwrap();

	let err = fx.store.discard_draft(item.id, &fx.ctx).await.unwrap_err();
	assert!(err.is_validation());
}

#[rstest]
#[tokio::test]
async fn test_delete_restore_round_trip_preserves_identity() {
	// Arrange
	let (fx, blog) = blog_fixture().await;
	let item = fx
		.store
		.create_item(
			&blog,
			&values(&[("title", "Hello"), ("body", "World")]),
			false,
			None,
			&fx.ctx,
		)
		.await
		.unwrap();

	// Act: delete, then restore.
	let deleted = fx.store.delete(item.id, &blog, &fx.ctx).await.unwrap();
	assert_eq!(fx.store.state_of(item.id).await, ItemState::Trashed);
	assert_eq!(deleted.primary_text, "Hello");
	assert_eq!(fx.store.routes().resolve("blog/hello").await, None);

	let restored = fx.store.restore(item.id, &fx.ctx).await.unwrap();

	// Assert: same id, same route, same published content.
	assert_eq!(restored.id, item.id);
	assert_eq!(restored.route_path, item.route_path);
	assert_eq!(restored.published, item.published);
	assert!(restored.is_published);
	assert_eq!(fx.store.state_of(item.id).await, ItemState::Active);
}

#[rstest]
#[tokio::test]
async fn test_purge_destroys_item_and_history() {
	let (fx, blog) = blog_fixture().await;
	let item = fx
		.store
		.create_item(&blog, &values(&[("title", "Hello")]), false, None, &fx.ctx)
		.await
		.unwrap();
	fx.store.delete(item.id, &blog, &fx.ctx).await.unwrap();

	fx.store.purge(item.id, &fx.ctx).await.unwrap();

	assert_eq!(fx.store.state_of(item.id).await, ItemState::Purged);
	assert_eq!(fx.store.revision_count(item.id).await, 0);
	assert!(fx.store.restore(item.id, &fx.ctx).await.is_err());
}

#[rstest]
#[tokio::test]
async fn test_revert_adopts_snapshot_and_appends() {
	// Arrange: two published versions.
	let (fx, blog) = blog_fixture().await;
	let item = fx
		.store
		.create_item(&blog, &values(&[("title", "v1")]), false, None, &fx.ctx)
		.await
		.unwrap();
	fx.store
		.edit_item(item.id, &blog, &values(&[("title", "v2")]), false, &fx.ctx)
		.await
		.unwrap();

	let history = fx
		.store
		.revisions_for(item.id, PageRequest::first(), RevisionSort::OldestFirst)
		.await;
	let first = &history.items[0];

	// Act
	let reverted = fx.store.revert(first.id, &fx.ctx).await.unwrap();

	// Assert: content adopted, history grew, invariant held.
	assert_eq!(
		reverted.published.as_ref().unwrap().get("title"),
		Some(&FieldValue::Text("v1".to_string()))
	);
	assert_eq!(fx.store.revision_count(item.id).await, 3);
	let latest = fx
		.store
		.revisions_for(item.id, PageRequest::first(), RevisionSort::NewestFirst)
		.await;
	assert_eq!(latest.items[0].snapshot, reverted.published.unwrap());
}

#[rstest]
#[tokio::test]
async fn test_deleted_field_values_survive_in_documents() {
	// Arrange
	let (fx, blog) = blog_fixture().await;
	let item = fx
		.store
		.create_item(
			&blog,
			&values(&[("title", "Hello"), ("body", "Legacy")]),
			false,
			None,
			&fx.ctx,
		)
		.await
		.unwrap();

	// Act: delete the body field, then edit the item.
	let body = blog.field("body").unwrap();
	fx.schemas.delete_field(blog.id, body.id, &fx.ctx).await.unwrap();
	let blog = fx.schemas.get(blog.id).await.unwrap();

	let edited = fx
		.store
		.edit_item(
			item.id,
			&blog,
			&values(&[("title", "Hello2"), ("body", "resubmitted")]),
			true,
			&fx.ctx,
		)
		.await
		.unwrap();

	// Assert: the stored legacy value is retained, the resubmitted value
	// for the deleted field is ignored.
	assert_eq!(
		edited.draft.get("body"),
		Some(&FieldValue::Text("Legacy".to_string()))
	);
	assert_eq!(
		edited.draft.get("title"),
		Some(&FieldValue::Text("Hello2".to_string()))
	);
}

#[rstest]
#[tokio::test]
async fn test_revert_of_unknown_revision_is_not_found() {
	let (fx, _) = blog_fixture().await;
	let err = fx.store.revert(Uuid::new_v4(), &fx.ctx).await.unwrap_err();
	assert!(err.is_not_found());
}
