// std
use std::collections::BTreeSet;
// self
use userpool_stack::{
	gateway::{CHANGE_MSISDN_SCOPE, DOMAIN_URL_OUTPUT, GatewayUserPoolStack, TELCO_CALLBACK_URL},
	naming::StageName,
	template::{Expr, Template},
};

fn synth(stage: &str) -> (GatewayUserPoolStack, Template) {
	let stage = StageName::new(stage).expect("Stage fixture should be valid.");
	let gateway = GatewayUserPoolStack::new(stage).expect("Gateway stack should assemble.");
	let template = gateway.synth().expect("Gateway stack should synthesize.");

	(gateway, template)
}

fn client_scopes(template: &Template) -> BTreeSet<String> {
	let scopes = template
		.resource("CognitoUserPoolClientTelco")
		.expect("Telco client should be declared.")
		.properties["scopes"]
		.clone();

	serde_json::from_value(scopes).expect("Client scopes should deserialize as a string list.")
}

#[test]
fn names_share_the_stage_prefix() {
	for stage in ["dev", "staging", "prod"] {
		let (gateway, template) = synth(stage);
		let prefix = format!("{stage}-nova-api-gateway");

		assert_eq!(gateway.name().as_ref(), prefix);
		assert_eq!(
			template.resource("CognitoUserPool").expect("Pool should be declared.").properties
				["pool_name"],
			format!("{prefix}-userpool")
		);
		assert_eq!(
			template
				.resource("CognitoResourceServer")
				.expect("Server should be declared.")
				.properties["identifier"],
			format!("{stage}.novagateway.co.nz")
		);
		assert_eq!(
			template
				.resource("CognitoResourceServer")
				.expect("Server should be declared.")
				.properties["name"],
			format!("{prefix}-resourceserver")
		);
		assert_eq!(
			template
				.resource("CognitoUserPoolClientTelco")
				.expect("Telco client should be declared.")
				.properties["client_name"],
			format!("{prefix}-userpoolclient-telco")
		);
	}
}

#[test]
fn dev_stage_matches_documented_identifiers() {
	let (_, template) = synth("dev");

	assert_eq!(
		template.resource("CognitoResourceServer").expect("Server should be declared.").properties
			["identifier"],
		"dev.novagateway.co.nz"
	);
	assert_eq!(
		template.resource("CognitoUserPool").expect("Pool should be declared.").properties
			["pool_name"],
		"dev-nova-api-gateway-userpool"
	);
}

#[test]
fn client_scope_set_is_exact() {
	let (_, template) = synth("dev");
	let expected: BTreeSet<String> = [
		"openid".to_owned(),
		"email".to_owned(),
		"profile".to_owned(),
		format!("dev.novagateway.co.nz/{CHANGE_MSISDN_SCOPE}"),
	]
	.into_iter()
	.collect();

	assert_eq!(client_scopes(&template), expected);
}

#[test]
fn resource_server_declares_exactly_one_scope() {
	let (_, template) = synth("prod");
	let scopes = template
		.resource("CognitoResourceServer")
		.expect("Server should be declared.")
		.properties["scopes"]
		.clone();
	let scopes: Vec<serde_json::Value> =
		serde_json::from_value(scopes).expect("Server scopes should deserialize as a list.");

	assert_eq!(scopes.len(), 1);
	assert_eq!(scopes[0]["name"], CHANGE_MSISDN_SCOPE);
}

#[test]
fn telco_client_is_confidential_with_postman_callback() {
	let (_, template) = synth("dev");
	let client = template
		.resource("CognitoUserPoolClientTelco")
		.expect("Telco client should be declared.");

	assert_eq!(client.properties["generate_secret"], true);
	assert_eq!(client.properties["flows"]["authorization_code"], true);
	assert_eq!(client.properties["flows"]["client_credentials"], false);
	assert_eq!(client.properties["callback_urls"], serde_json::json!([TELCO_CALLBACK_URL]));
	assert_eq!(client.properties["identity_providers"], serde_json::json!(["user_pool"]));
}

#[test]
fn declaration_order_and_edges_hold() {
	let (_, template) = synth("dev");
	let order: Vec<_> =
		template.resources.iter().map(|r| r.logical_id.as_ref().to_owned()).collect();

	assert_eq!(
		order,
		["CognitoUserPool", "CognitoResourceServer", "CognitoUserPoolClientTelco", "CognitoUserPoolDomain"]
	);

	let client = template
		.resource("CognitoUserPoolClientTelco")
		.expect("Telco client should be declared.");
	let edges: Vec<_> = client.depends_on.iter().map(|id| id.as_ref()).collect();

	assert_eq!(edges, ["CognitoUserPool", "CognitoResourceServer"]);

	let domain =
		template.resource("CognitoUserPoolDomain").expect("Domain should be declared.");
	let edges: Vec<_> = domain.depends_on.iter().map(|id| id.as_ref()).collect();

	assert_eq!(edges, ["CognitoUserPool"]);
	assert!(template.validate().is_ok());
}

#[test]
fn domain_prefix_resolves_with_a_concrete_region() {
	let (gateway, template) = synth("prod");
	let prefix = template
		.resource("CognitoUserPoolDomain")
		.expect("Domain should be declared.")
		.properties["domain_prefix"]
		.clone();
	let prefix: Expr =
		serde_json::from_value(prefix).expect("Domain prefix should deserialize as an expression.");

	assert_eq!(
		prefix.resolve("ap-southeast-2").expect("Prefix should resolve with a concrete region."),
		"prod-nova-api-gateway-ap-southeast-2"
	);

	let url = gateway
		.domain_url()
		.resolve("ap-southeast-2")
		.expect("Domain URL should resolve with a concrete region.");

	assert_eq!(
		url,
		"https://prod-nova-api-gateway-ap-southeast-2.auth.ap-southeast-2.amazoncognito.com"
	);
	assert_eq!(
		template.output(DOMAIN_URL_OUTPUT).expect("Domain URL output should be declared.").value,
		gateway.domain_url()
	);
}

#[test]
fn synthesis_is_deterministic() {
	let (gateway, template) = synth("dev");
	let again = gateway.synth().expect("Repeat synthesis should succeed.");

	assert_eq!(template, again);
	assert_eq!(
		template.fingerprint().expect("Fingerprint should compute."),
		again.fingerprint().expect("Fingerprint should compute.")
	);

	let (_, prod) = synth("prod");

	assert_ne!(
		template.fingerprint().expect("Fingerprint should compute."),
		prod.fingerprint().expect("Fingerprint should compute.")
	);
}
