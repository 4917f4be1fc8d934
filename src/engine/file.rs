//! Simple file-backed [`ProvisioningEngine`] recorder for dry runs and lightweight tooling.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	engine::{
		DeclareOutcome, DeclaredState, EngineError, EngineFuture, ProvisioningEngine,
		classify_declaration,
	},
	naming::StackName,
	obs::{self, OpOutcome, OpSpan, StackOp},
	template::Template,
};

/// Persists declared state to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileEngine {
	path: PathBuf,
	inner: Arc<RwLock<HashMap<StackName, DeclaredState>>>,
}
impl FileEngine {
	/// Opens (or creates) a state file at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, EngineError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = if path.exists() { Self::load_snapshot(&path)? } else { HashMap::new() };

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	fn load_snapshot(path: &Path) -> Result<HashMap<StackName, DeclaredState>, EngineError> {
		if !path.exists() {
			return Ok(HashMap::new());
		}

		let metadata = path.metadata().map_err(|e| EngineError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| EngineError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;
		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
		let entries: Vec<(StackName, DeclaredState)> =
			serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
				EngineError::Serialization {
					message: format!("Failed to parse {}: {e}", path.display()),
				}
			})?;

		Ok(entries.into_iter().collect())
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), EngineError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| EngineError::Backend {
				message: format!("Failed to create state directory {}: {e}", parent.display()),
			})?;
		}
		Ok(())
	}

	fn persist_locked(&self, contents: &HashMap<StackName, DeclaredState>) -> Result<(), EngineError> {
		Self::ensure_parent_exists(&self.path)?;

		let snapshot: Vec<_> = contents.iter().collect();
		let serialized =
			serde_json::to_vec_pretty(&snapshot).map_err(|e| EngineError::Serialization {
				message: format!("Failed to serialize state snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| EngineError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| EngineError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| EngineError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| EngineError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}

	fn declare_locked(
		&self,
		stack: StackName,
		template: Template,
	) -> Result<DeclareOutcome, EngineError> {
		let fingerprint = template.fingerprint()?;
		let mut guard = self.inner.write();
		let outcome = classify_declaration(guard.get(&stack), &fingerprint);
		let instant = OffsetDateTime::now_utc();

		match outcome {
			DeclareOutcome::Created => {
				guard.insert(stack, DeclaredState::first(template, fingerprint, instant));
				self.persist_locked(&guard)?;
			},
			DeclareOutcome::Updated => {
				let previous = guard.get(&stack).cloned().ok_or(EngineError::Backend {
					message: "Declared state disappeared mid-update.".into(),
				})?;

				guard.insert(stack, previous.advance(template, fingerprint, instant));
				self.persist_locked(&guard)?;
			},
			DeclareOutcome::Unchanged => {},
		}

		Ok(outcome)
	}
}
impl ProvisioningEngine for FileEngine {
	fn declare(&self, stack: StackName, template: Template) -> EngineFuture<'_, DeclareOutcome> {
		Box::pin(async move {
			let _span = OpSpan::new(StackOp::Declare, "file").entered();

			obs::record_op_outcome(StackOp::Declare, OpOutcome::Attempt);

			match self.declare_locked(stack, template) {
				Ok(outcome) => {
					obs::record_op_outcome(StackOp::Declare, OpOutcome::Success);

					Ok(outcome)
				},
				Err(e) => {
					obs::record_op_outcome(StackOp::Declare, OpOutcome::Failure);

					Err(e)
				},
			}
		})
	}

	fn describe<'a>(&'a self, stack: &'a StackName) -> EngineFuture<'a, Option<DeclaredState>> {
		Box::pin(async move { Ok(self.inner.read().get(stack).cloned()) })
	}

	fn destroy<'a>(&'a self, stack: &'a StackName) -> EngineFuture<'a, Option<DeclaredState>> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let removed = guard.remove(stack);

			if removed.is_some() {
				self.persist_locked(&guard)?;
			}

			Ok(removed)
		})
	}
}
