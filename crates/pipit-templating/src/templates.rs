//! Web and email templates with revision history
//!
//! Every content-affecting save appends a snapshot of the new state to the
//! template's revision log, so the latest revision always mirrors the live
//! template. Reverting adopts an old snapshot and appends it as a fresh
//! revision — history only ever grows.

use dashmap::DashMap;
use pipit_core::{
	AuditStamp, DeveloperName, EngineError, EngineResult, PageLimits, PageRequest, Paged,
	RequestContext, Revision, RevisionId, RevisionLog, RevisionSort, TemplateId,
};
use tracing::{debug, info};
use uuid::Uuid;

/// A page-rendering template.
#[derive(Debug, Clone)]
pub struct WebTemplate {
	/// Template identifier
	pub id: TemplateId,
	/// Immutable slug, unique among web templates
	pub developer_name: DeveloperName,
	/// Display label
	pub label: String,
	/// Template body, in the engine's template syntax
	pub content: String,
	/// Built-in templates ship with the system and cannot be deleted
	pub is_built_in: bool,
	/// Layout this template renders inside, if any
	pub parent_layout_id: Option<TemplateId>,
	/// Audit bookkeeping
	pub audit: AuditStamp,
}

/// Snapshot shape for web template revisions.
#[derive(Debug, Clone, PartialEq)]
pub struct WebTemplateSnapshot {
	/// Label at snapshot time
	pub label: String,
	/// Body at snapshot time
	pub content: String,
	/// Layout assignment at snapshot time
	pub parent_layout_id: Option<TemplateId>,
}

impl WebTemplate {
	fn snapshot(&self) -> WebTemplateSnapshot {
		WebTemplateSnapshot {
			label: self.label.clone(),
			content: self.content.clone(),
			parent_layout_id: self.parent_layout_id,
		}
	}
}

/// An email-rendering template.
#[derive(Debug, Clone)]
pub struct EmailTemplate {
	/// Template identifier
	pub id: TemplateId,
	/// Immutable slug, unique among email templates
	pub developer_name: DeveloperName,
	/// Display label
	pub label: String,
	/// Subject line template
	pub subject: String,
	/// Body template
	pub content: String,
	/// Built-in templates ship with the system and cannot be deleted
	pub is_built_in: bool,
	/// Audit bookkeeping
	pub audit: AuditStamp,
}

/// Snapshot shape for email template revisions.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailTemplateSnapshot {
	/// Label at snapshot time
	pub label: String,
	/// Subject at snapshot time
	pub subject: String,
	/// Body at snapshot time
	pub content: String,
}

impl EmailTemplate {
	fn snapshot(&self) -> EmailTemplateSnapshot {
		EmailTemplateSnapshot {
			label: self.label.clone(),
			subject: self.subject.clone(),
			content: self.content.clone(),
		}
	}
}

/// The store of web and email templates and their revision logs.
#[derive(Debug, Default)]
pub struct TemplateStore {
	web: DashMap<TemplateId, WebTemplate>,
	email: DashMap<TemplateId, EmailTemplate>,
	web_revisions: RevisionLog<WebTemplateSnapshot>,
	email_revisions: RevisionLog<EmailTemplateSnapshot>,
}

impl TemplateStore {
	/// Create an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a web template and record its first revision.
	pub async fn create_web_template(
		&self,
		label: String,
		developer_name: &str,
		content: String,
		is_built_in: bool,
		parent_layout_id: Option<TemplateId>,
		ctx: &RequestContext,
	) -> EngineResult<WebTemplate> {
		let developer_name = DeveloperName::parse(developer_name)?;
		if self
			.web
			.iter()
			.any(|t| t.developer_name == developer_name)
		{
			return Err(EngineError::validation(
				"developer_name",
				format!("The developer name '{}' is already in use.", developer_name),
			));
		}
		if let Some(parent) = parent_layout_id
			&& !self.web.contains_key(&parent)
		{
			return Err(EngineError::validation(
				"parent_layout_id",
				"The parent layout does not exist.",
			));
		}

		let template = WebTemplate {
			id: Uuid::new_v4(),
			developer_name,
			label,
			content,
			is_built_in,
			parent_layout_id,
			audit: AuditStamp::new(ctx),
		};
		self.web_revisions.append(template.id, template.snapshot(), ctx);
		info!(template = %template.developer_name, "created web template");
		self.web.insert(template.id, template.clone());
		Ok(template)
	}

	/// Fetch a web template.
	pub async fn get_web_template(&self, id: TemplateId) -> EngineResult<WebTemplate> {
		self.web
			.get(&id)
			.map(|t| t.clone())
			.ok_or_else(|| EngineError::not_found("web template", id))
	}

	/// Fetch a web template by developer name.
	pub async fn get_web_template_by_developer_name(
		&self,
		developer_name: &str,
	) -> EngineResult<WebTemplate> {
		self.web
			.iter()
			.find(|t| t.developer_name == *developer_name)
			.map(|t| t.clone())
			.ok_or_else(|| EngineError::not_found("web template", developer_name))
	}

	/// All web templates, ordered by label.
	pub async fn list_web_templates(&self) -> Vec<WebTemplate> {
		let mut templates: Vec<WebTemplate> = self.web.iter().map(|t| t.clone()).collect();
		templates.sort_by(|a, b| a.label.cmp(&b.label));
		templates
	}

	/// Edit a web template, appending a revision of the new state.
	pub async fn edit_web_template(
		&self,
		id: TemplateId,
		label: String,
		content: String,
		parent_layout_id: Option<TemplateId>,
		ctx: &RequestContext,
	) -> EngineResult<WebTemplate> {
		if let Some(parent) = parent_layout_id {
			self.ensure_no_layout_cycle(id, parent)?;
		}

		let mut entry = self
			.web
			.get_mut(&id)
			.ok_or_else(|| EngineError::not_found("web template", id))?;
		entry.label = label;
		entry.content = content;
		entry.parent_layout_id = parent_layout_id;
		entry.audit.touch(ctx);
		let template = entry.clone();
		drop(entry);
		self.web_revisions.append(id, template.snapshot(), ctx);
		debug!(template = %template.developer_name, "edited web template");
		Ok(template)
	}

	/// Delete a non-built-in web template and its history.
	pub async fn delete_web_template(
		&self,
		id: TemplateId,
		_ctx: &RequestContext,
	) -> EngineResult<()> {
		let built_in = self
			.web
			.get(&id)
			.map(|t| t.is_built_in)
			.ok_or_else(|| EngineError::not_found("web template", id))?;
		if built_in {
			return Err(EngineError::validation(
				"template",
				"Built-in templates cannot be deleted.",
			));
		}
		if self
			.web
			.iter()
			.any(|t| t.parent_layout_id == Some(id))
		{
			return Err(EngineError::validation(
				"template",
				"The template is used as a layout by other templates.",
			));
		}
		self.web.remove(&id);
		self.web_revisions.purge_parent(id);
		info!(template_id = %id, "deleted web template");
		Ok(())
	}

	/// One page of a web template's revision history.
	pub async fn web_template_revisions(
		&self,
		id: TemplateId,
		request: PageRequest,
		sort: RevisionSort,
	) -> Paged<Revision<WebTemplateSnapshot>> {
		self.web_revisions
			.list(id, request, &PageLimits::default(), sort)
	}

	/// Adopt an old web template revision and append it as a fresh one.
	pub async fn revert_web_template(
		&self,
		revision_id: RevisionId,
		ctx: &RequestContext,
	) -> EngineResult<WebTemplate> {
		let revision = self
			.web_revisions
			.get(revision_id)
			.ok_or_else(|| EngineError::not_found("web template revision", revision_id))?;

		let mut entry = self
			.web
			.get_mut(&revision.parent_id)
			.ok_or_else(|| EngineError::not_found("web template", revision.parent_id))?;
		entry.label = revision.snapshot.label.clone();
		entry.content = revision.snapshot.content.clone();
		entry.parent_layout_id = revision.snapshot.parent_layout_id;
		entry.audit.touch(ctx);
		let template = entry.clone();
		drop(entry);
		self.web_revisions
			.append(template.id, revision.snapshot, ctx);
		info!(template = %template.developer_name, %revision_id, "reverted web template");
		Ok(template)
	}

	/// Create an email template and record its first revision.
	pub async fn create_email_template(
		&self,
		label: String,
		developer_name: &str,
		subject: String,
		content: String,
		is_built_in: bool,
		ctx: &RequestContext,
	) -> EngineResult<EmailTemplate> {
		let developer_name = DeveloperName::parse(developer_name)?;
		if self
			.email
			.iter()
			.any(|t| t.developer_name == developer_name)
		{
			return Err(EngineError::validation(
				"developer_name",
				format!("The developer name '{}' is already in use.", developer_name),
			));
		}

		let template = EmailTemplate {
			id: Uuid::new_v4(),
			developer_name,
			label,
			subject,
			content,
			is_built_in,
			audit: AuditStamp::new(ctx),
		};
		self.email_revisions
			.append(template.id, template.snapshot(), ctx);
		info!(template = %template.developer_name, "created email template");
		self.email.insert(template.id, template.clone());
		Ok(template)
	}

	/// Fetch an email template.
	pub async fn get_email_template(&self, id: TemplateId) -> EngineResult<EmailTemplate> {
		self.email
			.get(&id)
			.map(|t| t.clone())
			.ok_or_else(|| EngineError::not_found("email template", id))
	}

	/// Edit an email template, appending a revision of the new state.
	pub async fn edit_email_template(
		&self,
		id: TemplateId,
		label: String,
		subject: String,
		content: String,
		ctx: &RequestContext,
	) -> EngineResult<EmailTemplate> {
		let mut entry = self
			.email
			.get_mut(&id)
			.ok_or_else(|| EngineError::not_found("email template", id))?;
		entry.label = label;
		entry.subject = subject;
		entry.content = content;
		entry.audit.touch(ctx);
		let template = entry.clone();
		drop(entry);
		self.email_revisions.append(id, template.snapshot(), ctx);
		Ok(template)
	}

	/// One page of an email template's revision history.
	pub async fn email_template_revisions(
		&self,
		id: TemplateId,
		request: PageRequest,
		sort: RevisionSort,
	) -> Paged<Revision<EmailTemplateSnapshot>> {
		self.email_revisions
			.list(id, request, &PageLimits::default(), sort)
	}

	/// Adopt an old email template revision and append it as a fresh one.
	pub async fn revert_email_template(
		&self,
		revision_id: RevisionId,
		ctx: &RequestContext,
	) -> EngineResult<EmailTemplate> {
		let revision = self
			.email_revisions
			.get(revision_id)
			.ok_or_else(|| EngineError::not_found("email template revision", revision_id))?;

		let mut entry = self
			.email
			.get_mut(&revision.parent_id)
			.ok_or_else(|| EngineError::not_found("email template", revision.parent_id))?;
		entry.label = revision.snapshot.label.clone();
		entry.subject = revision.snapshot.subject.clone();
		entry.content = revision.snapshot.content.clone();
		entry.audit.touch(ctx);
		let template = entry.clone();
		drop(entry);
		self.email_revisions
			.append(template.id, revision.snapshot, ctx);
		info!(template = %template.developer_name, %revision_id, "reverted email template");
		Ok(template)
	}

	/// Walk the layout chain from `parent` upwards; assigning it to
	/// `template_id` must not create a cycle.
	fn ensure_no_layout_cycle(
		&self,
		template_id: TemplateId,
		parent: TemplateId,
	) -> EngineResult<()> {
		let mut current = Some(parent);
		while let Some(id) = current {
			if id == template_id {
				return Err(EngineError::validation(
					"parent_layout_id",
					"Assigning this layout would create a cycle.",
				));
			}
			current = self
				.web
				.get(&id)
				.ok_or_else(|| EngineError::not_found("web template", id))?
				.parent_layout_id;
		}
		Ok(())
	}
}
