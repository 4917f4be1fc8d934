// self
use userpool_stack::{
	engine::{DeclareOutcome, MemoryEngine, ProvisioningEngine},
	gateway::GatewayUserPoolStack,
	naming::{StackName, StageName},
	template::Template,
};

fn build_declaration(stage: &str) -> (StackName, Template) {
	let stage = StageName::new(stage).expect("Stage fixture should be valid.");
	let gateway = GatewayUserPoolStack::new(stage).expect("Gateway stack should assemble.");
	let template = gateway.synth().expect("Gateway stack should synthesize.");

	(gateway.name().clone(), template)
}

#[tokio::test]
async fn declaring_twice_is_idempotent() {
	let engine = MemoryEngine::default();
	let (name, template) = build_declaration("dev");
	let first = engine
		.declare(name.clone(), template.clone())
		.await
		.expect("First declaration should succeed.");

	assert_eq!(first, DeclareOutcome::Created);

	let second = engine
		.declare(name.clone(), template.clone())
		.await
		.expect("Repeat declaration should succeed.");

	assert_eq!(second, DeclareOutcome::Unchanged);

	let state = engine
		.describe(&name)
		.await
		.expect("Describe should succeed.")
		.expect("Declared state should remain present.");

	assert_eq!(state.revision, 1);
	assert_eq!(
		state.fingerprint,
		template.fingerprint().expect("Fingerprint should compute.")
	);
}

#[tokio::test]
async fn changed_templates_bump_the_revision() {
	let engine = MemoryEngine::default();
	let (name, template) = build_declaration("dev");

	engine
		.declare(name.clone(), template)
		.await
		.expect("First declaration should succeed.");

	// Same unit name, different desired state: a prod-shaped template under the dev name.
	let (_, changed) = build_declaration("prod");
	let outcome = engine
		.declare(name.clone(), changed.clone())
		.await
		.expect("Changed declaration should succeed.");

	assert_eq!(outcome, DeclareOutcome::Updated);

	let state = engine
		.describe(&name)
		.await
		.expect("Describe should succeed.")
		.expect("Declared state should remain present.");

	assert_eq!(state.revision, 2);
	assert_eq!(state.template, changed);
}

#[tokio::test]
async fn stacks_are_tracked_independently() {
	let engine = MemoryEngine::default();
	let (dev_name, dev_template) = build_declaration("dev");
	let (prod_name, prod_template) = build_declaration("prod");

	engine
		.declare(dev_name.clone(), dev_template)
		.await
		.expect("Dev declaration should succeed.");
	engine
		.declare(prod_name.clone(), prod_template)
		.await
		.expect("Prod declaration should succeed.");

	let dev = engine
		.describe(&dev_name)
		.await
		.expect("Describe should succeed.")
		.expect("Dev state should be present.");
	let prod = engine
		.describe(&prod_name)
		.await
		.expect("Describe should succeed.")
		.expect("Prod state should be present.");

	assert_ne!(dev.fingerprint, prod.fingerprint);
}

#[tokio::test]
async fn destroy_removes_the_whole_unit() {
	let engine = MemoryEngine::default();
	let (name, template) = build_declaration("dev");

	engine
		.declare(name.clone(), template.clone())
		.await
		.expect("Declaration should succeed.");

	let removed = engine
		.destroy(&name)
		.await
		.expect("Destroy should succeed.")
		.expect("Destroy should return the removed state.");

	assert_eq!(removed.template, template);
	assert!(
		engine.describe(&name).await.expect("Describe should succeed.").is_none(),
		"Destroyed units must not be describable."
	);
	assert!(
		engine.destroy(&name).await.expect("Destroy should succeed.").is_none(),
		"Destroying a missing unit is a no-op."
	);

	// Redeclaring after destroy starts a fresh unit at revision 1.
	let outcome = engine
		.declare(name.clone(), template)
		.await
		.expect("Redeclaration should succeed.");

	assert_eq!(outcome, DeclareOutcome::Created);
}
