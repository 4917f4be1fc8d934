//! Strongly typed names enforced across stack declarations.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_name {
	($name:ident, $doc:literal, $kind:literal, $validate:path, $max:expr) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new name after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, NamingError> {
				let view = value.as_ref();

				$validate($kind, view, $max)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = NamingError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				$validate($kind, &value, $max)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = NamingError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const STAGE_MAX_LEN: usize = 32;
const STACK_MAX_LEN: usize = 128;
const LOGICAL_ID_MAX_LEN: usize = 255;

/// Error returned when name validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum NamingError {
	/// The name was empty.
	#[error("{kind} name cannot be empty.")]
	Empty {
		/// Kind of name (stage, stack, logical id).
		kind: &'static str,
	},
	/// The name contains a character outside the permitted set.
	#[error("{kind} name contains an illegal character: {character:?}.")]
	IllegalCharacter {
		/// Kind of name (stage, stack, logical id).
		kind: &'static str,
		/// First offending character.
		character: char,
	},
	/// The name starts or ends with a hyphen.
	#[error("{kind} name must start and end with an alphanumeric character.")]
	HyphenAtEdge {
		/// Kind of name (stage, stack, logical id).
		kind: &'static str,
	},
	/// The name exceeded the allowed character count.
	#[error("{kind} name exceeds {max} characters.")]
	TooLong {
		/// Kind of name (stage, stack, logical id).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_name! {
	StageName,
	"Deployment stage label interpolated into resource names (e.g. `dev`, `prod`).",
	"Stage",
	validate_label,
	STAGE_MAX_LEN
}
def_name! {
	StackName,
	"Name of a provisioning unit tracked by an engine.",
	"Stack",
	validate_label,
	STACK_MAX_LEN
}
def_name! {
	LogicalId,
	"Template-local identifier for a declared resource.",
	"LogicalId",
	validate_logical_id,
	LOGICAL_ID_MAX_LEN
}

/// Lowercase alphanumeric + hyphen labels, alphanumeric at both ends. Cloud naming surfaces
/// (pool names, hosted-domain prefixes) reject anything wider, so malformed stages fail here
/// instead of at engine submission time.
fn validate_label(kind: &'static str, view: &str, max: usize) -> Result<(), NamingError> {
	if view.is_empty() {
		return Err(NamingError::Empty { kind });
	}
	if view.len() > max {
		return Err(NamingError::TooLong { kind, max });
	}
	if let Some(character) =
		view.chars().find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
	{
		return Err(NamingError::IllegalCharacter { kind, character });
	}
	if view.starts_with('-') || view.ends_with('-') {
		return Err(NamingError::HyphenAtEdge { kind });
	}

	Ok(())
}

fn validate_logical_id(kind: &'static str, view: &str, max: usize) -> Result<(), NamingError> {
	if view.is_empty() {
		return Err(NamingError::Empty { kind });
	}
	if view.len() > max {
		return Err(NamingError::TooLong { kind, max });
	}
	if let Some(character) = view.chars().find(|c| !c.is_ascii_alphanumeric()) {
		return Err(NamingError::IllegalCharacter { kind, character });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn stages_validate_charset_and_edges() {
		let stage = StageName::new("dev").expect("Stage fixture should be valid.");

		assert_eq!(stage.as_ref(), "dev");
		assert!(StageName::new("uat-2").is_ok());
		assert!(StageName::new("").is_err());
		assert!(StageName::new("Dev").is_err(), "Uppercase must be rejected.");
		assert!(StageName::new("dev stage").is_err(), "Whitespace must be rejected.");
		assert!(StageName::new("-dev").is_err());
		assert!(StageName::new("dev-").is_err());
	}

	#[test]
	fn logical_ids_are_alphanumeric_only() {
		LogicalId::new("CognitoUserPool").expect("Logical id fixture should be valid.");

		assert!(LogicalId::new("Cognito-UserPool").is_err());
		assert!(LogicalId::new("").is_err());
	}

	#[test]
	fn length_limits_are_enforced() {
		let exact = "a".repeat(32);

		StageName::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(33);

		assert!(StageName::new(&too_long).is_err());
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let stage: StageName =
			serde_json::from_str("\"prod\"").expect("Stage should deserialize successfully.");

		assert_eq!(stage.as_ref(), "prod");
		assert!(serde_json::from_str::<StageName>("\"with space\"").is_err());
		assert!(serde_json::from_str::<LogicalId>("\"has-hyphen\"").is_err());
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<StackName, u8> = HashMap::from_iter([(
			StackName::new("gateway-dev").expect("Stack name used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("gateway-dev"), Some(&7));
	}
}
