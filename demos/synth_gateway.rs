//! Synthesizes the gateway user-pool template for a stage, declares it against the in-memory
//! engine twice to show idempotency, and prints the template with its fingerprint.

// crates.io
use color_eyre::Result;
// self
use userpool_stack::{
	engine::{MemoryEngine, ProvisioningEngine},
	gateway::GatewayUserPoolStack,
	naming::StageName,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let stage = StageName::new("dev")?;
	let gateway = GatewayUserPoolStack::new(stage)?;
	let template = gateway.synth()?;
	let engine = MemoryEngine::default();
	let first = engine.declare(gateway.name().clone(), template.clone()).await?;
	let second = engine.declare(gateway.name().clone(), template.clone()).await?;

	println!("{}", serde_json::to_string_pretty(&template)?);
	println!("Fingerprint: {}.", template.fingerprint()?);
	println!("First declaration: {first:?}; repeat declaration: {second:?}.");
	println!(
		"Hosted UI for ap-southeast-2: {}.",
		gateway.domain_url().resolve("ap-southeast-2")?
	);

	Ok(())
}
