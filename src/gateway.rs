//! The gateway user-pool stack: one identity directory, one resource server with a single
//! telco scope, one confidential app client, a hosted sign-in domain, and the domain URL
//! output, all named after the deployment stage.

// self
use crate::{
	_prelude::*,
	naming::{LogicalId, StackName, StageName},
	resource::{
		AppClient, AutoVerify, HostedDomain, IdentityProvider, OAuthFlow, ResourceServer,
		SignInAliases, UserPool,
	},
	scope::{ResourceScope, StandardScope},
	stack::{DomainHandle, Stack, StackError},
	template::{Expr, Template},
};

/// The single custom scope exposed by the gateway resource server.
pub const CHANGE_MSISDN_SCOPE: &str = "mobile-external-2degrees-changemsisdn.post";
/// Callback registered for the telco client (Postman's hosted OAuth callback).
pub const TELCO_CALLBACK_URL: &str = "https://oauth.pstmn.io/v1/callback";
/// Name of the deployment-time output carrying the hosted domain's base URL.
pub const DOMAIN_URL_OUTPUT: &str = "UserPoolDomainUrl";

const CHANGE_MSISDN_SCOPE_DESCRIPTION: &str = "Change 2 degrees MSISDN";
const RESOURCE_SERVER_DOMAIN: &str = "novagateway.co.nz";
const NAME_PREFIX: &str = "nova-api-gateway";

/// The fully assembled gateway declaration unit for one stage.
#[derive(Clone, Debug)]
pub struct GatewayUserPoolStack {
	stage: StageName,
	stack: Stack,
	domain: DomainHandle,
}
impl GatewayUserPoolStack {
	/// Assembles the gateway topology for the provided stage: four resources plus the
	/// domain URL output.
	///
	/// The stage drives every name: the pool, client, and domain share the
	/// `{stage}-nova-api-gateway` prefix and the resource server is identified as
	/// `{stage}.novagateway.co.nz`. The topology itself is fixed; provisioning the same
	/// stage twice declares the same desired state.
	pub fn new(stage: StageName) -> Result<Self> {
		let prefix = format!("{stage}-{NAME_PREFIX}");
		let mut stack = Stack::new(
			StackName::new(&prefix)?,
			format!("Identity resources for the {stage} nova API gateway."),
		);
		let pool = stack.add_user_pool(
			LogicalId::new("CognitoUserPool")?,
			UserPool::builder()
				.pool_name(format!("{prefix}-userpool"))
				.self_sign_up_enabled(true)
				.sign_in_aliases(SignInAliases { email: true, ..Default::default() })
				.auto_verify(AutoVerify { email: true, phone: false })
				.build()?,
		)?;
		let server = stack.add_resource_server(
			LogicalId::new("CognitoResourceServer")?,
			&pool,
			ResourceServer::builder(format!("{stage}.{RESOURCE_SERVER_DOMAIN}"))
				.name(format!("{prefix}-resourceserver"))
				.scope(ResourceScope::new(
					CHANGE_MSISDN_SCOPE,
					CHANGE_MSISDN_SCOPE_DESCRIPTION,
				)?)
				.build()?,
		)?;

		// The telco client gets exactly the three standard identity scopes plus the one
		// resource-server scope; widening the grant means editing this declaration.
		stack.add_app_client(
			LogicalId::new("CognitoUserPoolClientTelco")?,
			&pool,
			AppClient::builder()
				.client_name(format!("{prefix}-userpoolclient-telco"))
				.generate_secret(true)
				.flow(OAuthFlow::AuthorizationCode)
				.scopes([
					StandardScope::OpenId.into(),
					StandardScope::Email.into(),
					StandardScope::Profile.into(),
					server.scope(CHANGE_MSISDN_SCOPE)?,
				])
				.callback_url(Url::parse(TELCO_CALLBACK_URL)?)
				.identity_provider(IdentityProvider::UserPool)
				.build()?,
		)?;

		let domain = stack.add_hosted_domain(
			LogicalId::new("CognitoUserPoolDomain")?,
			&pool,
			HostedDomain::new(Expr::concat([Expr::lit(format!("{prefix}-")), Expr::Region]))?,
		)?;

		stack.add_output(DOMAIN_URL_OUTPUT, domain.base_url())?;

		Ok(Self { stage, stack, domain })
	}

	/// Stage this unit was assembled for.
	pub fn stage(&self) -> &StageName {
		&self.stage
	}

	/// Name of the provisioning unit (`{stage}-nova-api-gateway`).
	pub fn name(&self) -> &StackName {
		self.stack.name()
	}

	/// The underlying declaration unit.
	pub fn stack(&self) -> &Stack {
		&self.stack
	}

	/// Base URL expression of the hosted sign-in surface.
	pub fn domain_url(&self) -> Expr {
		self.domain.base_url()
	}

	/// Synthesizes the declaration template.
	pub fn synth(&self) -> Result<Template, StackError> {
		self.stack.synth()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn stage(value: &str) -> StageName {
		StageName::new(value).expect("Stage fixture should be valid.")
	}

	#[test]
	fn dev_stage_names_follow_the_convention() {
		let gateway = GatewayUserPoolStack::new(stage("dev"))
			.expect("Gateway stack should assemble for dev.");
		let template = gateway.synth().expect("Gateway stack should synthesize.");
		let pool = template.resource("CognitoUserPool").expect("Pool should be declared.");
		let server =
			template.resource("CognitoResourceServer").expect("Server should be declared.");

		assert_eq!(gateway.name().as_ref(), "dev-nova-api-gateway");
		assert_eq!(pool.properties["pool_name"], "dev-nova-api-gateway-userpool");
		assert_eq!(server.properties["identifier"], "dev.novagateway.co.nz");
	}

	#[test]
	fn topology_is_five_declarations() {
		let gateway = GatewayUserPoolStack::new(stage("uat"))
			.expect("Gateway stack should assemble for uat.");
		let template = gateway.synth().expect("Gateway stack should synthesize.");

		assert_eq!(template.resources.len(), 4);
		assert_eq!(template.outputs.len(), 1);
		assert!(template.output(DOMAIN_URL_OUTPUT).is_some());
	}

	#[test]
	fn malformed_stages_fail_before_assembly() {
		assert!(StageName::new("Dev").is_err());
		assert!(StageName::new("").is_err());
	}
}
