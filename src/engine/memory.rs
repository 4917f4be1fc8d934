//! Thread-safe in-memory [`ProvisioningEngine`] implementation for local development and tests.

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

type StateMap = Arc<RwLock<HashMap<StackName, DeclaredState>>>;

/// Engine stand-in that records declared state in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryEngine(StateMap);
impl MemoryEngine {
	fn declare_now(
		map: StateMap,
		stack: StackName,
		template: Template,
	) -> Result<DeclareOutcome, EngineError> {
		let fingerprint = template.fingerprint()?;
		let mut guard = map.write();
		let outcome = classify_declaration(guard.get(&stack), &fingerprint);
		let instant = OffsetDateTime::now_utc();

		match outcome {
			DeclareOutcome::Created => {
				guard.insert(stack, DeclaredState::first(template, fingerprint, instant));
			},
			DeclareOutcome::Updated => {
				let previous = guard.get(&stack).cloned().ok_or(EngineError::Backend {
					message: "Declared state disappeared mid-update.".into(),
				})?;

				guard.insert(stack, previous.advance(template, fingerprint, instant));
			},
			DeclareOutcome::Unchanged => {},
		}

		Ok(outcome)
	}

	fn describe_now(map: StateMap, stack: StackName) -> Option<DeclaredState> {
		map.read().get(&stack).cloned()
	}

	fn destroy_now(map: StateMap, stack: StackName) -> Option<DeclaredState> {
		map.write().remove(&stack)
	}
}
impl ProvisioningEngine for MemoryEngine {
	fn declare(&self, stack: StackName, template: Template) -> EngineFuture<'_, DeclareOutcome> {
		let map = self.0.clone();

		Box::pin(async move {
			let _span = OpSpan::new(StackOp::Declare, "memory").entered();

			obs::record_op_outcome(StackOp::Declare, OpOutcome::Attempt);

			match Self::declare_now(map, stack, template) {
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
		let map = self.0.clone();
		let stack = stack.to_owned();

		Box::pin(async move { Ok(Self::describe_now(map, stack)) })
	}

	fn destroy<'a>(&'a self, stack: &'a StackName) -> EngineFuture<'a, Option<DeclaredState>> {
		let map = self.0.clone();
		let stack = stack.to_owned();

		Box::pin(async move { Ok(Self::destroy_now(map, stack)) })
	}
}
