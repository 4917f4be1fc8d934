//! Provisioning-engine contracts and built-in recorders of declared state.
//!
//! The engine is the external system that turns a synthesized [`Template`] into real
//! resources. This crate only models the seam: an idempotent "declare desired state" call
//! keyed by stack name, plus describe/destroy. The built-in engines record declared state
//! (in memory or in a JSON file) and are intended for tests, demos, and dry runs.

pub mod file;
pub mod memory;

pub use file::FileEngine;
pub use memory::MemoryEngine;

// self
use crate::{
	_prelude::*,
	naming::StackName,
	template::{Template, TemplateError},
};

/// Boxed future returned by engine operations.
pub type EngineFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, EngineError>> + 'a + Send>>;

/// Contract implemented by provisioning engines.
pub trait ProvisioningEngine
where
	Self: Send + Sync,
{
	/// Idempotently declares the desired state of a provisioning unit.
	///
	/// Declaring the same template twice is a no-op; the unit is created, updated, or
	/// destroyed as one atomic whole under the engine's own model.
	fn declare(&self, stack: StackName, template: Template) -> EngineFuture<'_, DeclareOutcome>;

	/// Fetches the last declared state of a unit, if any.
	fn describe<'a>(&'a self, stack: &'a StackName) -> EngineFuture<'a, Option<DeclaredState>>;

	/// Removes a unit and everything it declared.
	fn destroy<'a>(&'a self, stack: &'a StackName) -> EngineFuture<'a, Option<DeclaredState>>;
}

/// Result of an idempotent declare call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclareOutcome {
	/// No unit existed under this name; one was created.
	Created,
	/// The unit existed with a different template and was replaced.
	Updated,
	/// The declared template matches the recorded state; nothing to do.
	Unchanged,
}

/// Error type produced by [`ProvisioningEngine`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum EngineError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// The submitted template was rejected.
	#[error(transparent)]
	Template(#[from] TemplateError),
}

/// Recorded desired state of one provisioning unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeclaredState {
	/// The declared template.
	pub template: Template,
	/// Fingerprint of the declared template.
	pub fingerprint: String,
	/// Instant of the declaration that last changed the unit.
	pub declared_at: OffsetDateTime,
	/// Monotonic revision, starting at 1 and bumped on every change.
	pub revision: u64,
}
impl DeclaredState {
	/// Records the first declaration of a unit.
	pub fn first(template: Template, fingerprint: String, instant: OffsetDateTime) -> Self {
		Self { template, fingerprint, declared_at: instant, revision: 1 }
	}

	/// Records a changed declaration, bumping the revision.
	pub fn advance(&self, template: Template, fingerprint: String, instant: OffsetDateTime) -> Self {
		Self { template, fingerprint, declared_at: instant, revision: self.revision + 1 }
	}
}

/// Decides what a declare call does given the recorded state and the incoming fingerprint.
pub(crate) fn classify_declaration(
	existing: Option<&DeclaredState>,
	fingerprint: &str,
) -> DeclareOutcome {
	match existing {
		None => DeclareOutcome::Created,
		Some(state) if state.fingerprint == fingerprint => DeclareOutcome::Unchanged,
		Some(_) => DeclareOutcome::Updated,
	}
}
