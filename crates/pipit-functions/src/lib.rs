//! # Pipit Functions
//!
//! The registry of user-defined functions: named scripts bound to a trigger
//! (an HTTP entry point or a content item event), with an activation switch
//! and full revision history. Every content-affecting save appends a
//! snapshot, and reverting adopts an old snapshot as a fresh revision — the
//! same rule every revisioned entity in the engine follows.
//!
//! Executing the scripts is the host's concern; this crate only stores,
//! versions, and hands out what to run.

#![warn(rustdoc::broken_intra_doc_links)]

use dashmap::DashMap;
use pipit_core::{
	AuditStamp, DeveloperName, EngineError, EngineResult, FunctionId, PageLimits, PageRequest,
	Paged, RequestContext, Revision, RevisionId, RevisionLog, RevisionSort,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// What causes a function to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionTrigger {
	/// An HTTP GET against the function's public endpoint
	HttpGet,
	/// An HTTP POST against the function's public endpoint
	HttpPost,
	/// A content item was created
	ContentItemCreated,
	/// A content item was updated
	ContentItemUpdated,
	/// A content item was deleted
	ContentItemDeleted,
}

impl FunctionTrigger {
	/// Human-readable label shown in the trigger picker.
	pub fn label(&self) -> &'static str {
		match self {
			FunctionTrigger::HttpGet => "HTTP GET",
			FunctionTrigger::HttpPost => "HTTP POST",
			FunctionTrigger::ContentItemCreated => "Content item created",
			FunctionTrigger::ContentItemUpdated => "Content item updated",
			FunctionTrigger::ContentItemDeleted => "Content item deleted",
		}
	}
}

/// A user-defined function.
#[derive(Debug, Clone)]
pub struct ScriptFunction {
	/// Function identifier
	pub id: FunctionId,
	/// Immutable slug, unique among functions
	pub developer_name: DeveloperName,
	/// Display label
	pub label: String,
	/// What causes the function to run
	pub trigger: FunctionTrigger,
	/// The script body the host executes
	pub code: String,
	/// Inactive functions are kept and versioned but never run
	pub is_active: bool,
	/// Audit bookkeeping
	pub audit: AuditStamp,
}

/// Snapshot shape for function revisions.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSnapshot {
	/// Label at snapshot time
	pub label: String,
	/// Trigger at snapshot time
	pub trigger: FunctionTrigger,
	/// Script body at snapshot time
	pub code: String,
}

impl ScriptFunction {
	fn snapshot(&self) -> FunctionSnapshot {
		FunctionSnapshot {
			label: self.label.clone(),
			trigger: self.trigger,
			code: self.code.clone(),
		}
	}
}

/// The store of user-defined functions and their revision log.
#[derive(Debug, Default)]
pub struct FunctionStore {
	functions: DashMap<FunctionId, ScriptFunction>,
	revisions: RevisionLog<FunctionSnapshot>,
}

impl FunctionStore {
	/// Create an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a function and record its first revision. New functions start
	/// active.
	pub async fn create_function(
		&self,
		label: String,
		developer_name: &str,
		trigger: FunctionTrigger,
		code: String,
		ctx: &RequestContext,
	) -> EngineResult<ScriptFunction> {
		let developer_name = DeveloperName::parse(developer_name)?;
		if self
			.functions
			.iter()
			.any(|f| f.developer_name == developer_name)
		{
			return Err(EngineError::validation(
				"developer_name",
				format!("The developer name '{}' is already in use.", developer_name),
			));
		}

		let function = ScriptFunction {
			id: Uuid::new_v4(),
			developer_name,
			label,
			trigger,
			code,
			is_active: true,
			audit: AuditStamp::new(ctx),
		};
		self.revisions.append(function.id, function.snapshot(), ctx);
		info!(function = %function.developer_name, "created function");
		self.functions.insert(function.id, function.clone());
		Ok(function)
	}

	/// Fetch a function.
	pub async fn get(&self, id: FunctionId) -> EngineResult<ScriptFunction> {
		self.functions
			.get(&id)
			.map(|f| f.clone())
			.ok_or_else(|| EngineError::not_found("function", id))
	}

	/// Fetch a function by developer name.
	pub async fn get_by_developer_name(
		&self,
		developer_name: &str,
	) -> EngineResult<ScriptFunction> {
		self.functions
			.iter()
			.find(|f| f.developer_name == *developer_name)
			.map(|f| f.clone())
			.ok_or_else(|| EngineError::not_found("function", developer_name))
	}

	/// All functions, ordered by label.
	pub async fn list(&self) -> Vec<ScriptFunction> {
		let mut functions: Vec<ScriptFunction> =
			self.functions.iter().map(|f| f.clone()).collect();
		functions.sort_by(|a, b| a.label.cmp(&b.label));
		functions
	}

	/// The active functions bound to one trigger, ordered by label.
	pub async fn active_for_trigger(&self, trigger: FunctionTrigger) -> Vec<ScriptFunction> {
		let mut functions: Vec<ScriptFunction> = self
			.functions
			.iter()
			.filter(|f| f.is_active && f.trigger == trigger)
			.map(|f| f.clone())
			.collect();
		functions.sort_by(|a, b| a.label.cmp(&b.label));
		functions
	}

	/// Edit a function, appending a revision of the new state.
	pub async fn edit_function(
		&self,
		id: FunctionId,
		label: String,
		trigger: FunctionTrigger,
		code: String,
		ctx: &RequestContext,
	) -> EngineResult<ScriptFunction> {
		let mut entry = self
			.functions
			.get_mut(&id)
			.ok_or_else(|| EngineError::not_found("function", id))?;
		entry.label = label;
		entry.trigger = trigger;
		entry.code = code;
		entry.audit.touch(ctx);
		let function = entry.clone();
		drop(entry);
		self.revisions.append(id, function.snapshot(), ctx);
		debug!(function = %function.developer_name, "edited function");
		Ok(function)
	}

	/// Activate or deactivate a function. Activation is not part of the
	/// versioned content, so no revision is appended.
	pub async fn set_active(
		&self,
		id: FunctionId,
		is_active: bool,
		ctx: &RequestContext,
	) -> EngineResult<ScriptFunction> {
		let mut entry = self
			.functions
			.get_mut(&id)
			.ok_or_else(|| EngineError::not_found("function", id))?;
		entry.is_active = is_active;
		entry.audit.touch(ctx);
		Ok(entry.clone())
	}

	/// Delete a function and its revision history.
	pub async fn delete_function(&self, id: FunctionId, _ctx: &RequestContext) -> EngineResult<()> {
		self.functions
			.remove(&id)
			.ok_or_else(|| EngineError::not_found("function", id))?;
		self.revisions.purge_parent(id);
		info!(function_id = %id, "deleted function");
		Ok(())
	}

	/// One page of a function's revision history.
	pub async fn revisions_for(
		&self,
		id: FunctionId,
		request: PageRequest,
		sort: RevisionSort,
	) -> Paged<Revision<FunctionSnapshot>> {
		self.revisions.list(id, request, &PageLimits::default(), sort)
	}

	/// Adopt an old function revision and append it as a fresh one.
	pub async fn revert_function(
		&self,
		revision_id: RevisionId,
		ctx: &RequestContext,
	) -> EngineResult<ScriptFunction> {
		let revision = self
			.revisions
			.get(revision_id)
			.ok_or_else(|| EngineError::not_found("function revision", revision_id))?;

		let mut entry = self
			.functions
			.get_mut(&revision.parent_id)
			.ok_or_else(|| EngineError::not_found("function", revision.parent_id))?;
		entry.label = revision.snapshot.label.clone();
		entry.trigger = revision.snapshot.trigger;
		entry.code = revision.snapshot.code.clone();
		entry.audit.touch(ctx);
		let function = entry.clone();
		drop(entry);
		self.revisions.append(function.id, revision.snapshot, ctx);
		info!(function = %function.developer_name, %revision_id, "reverted function");
		Ok(function)
	}
}
