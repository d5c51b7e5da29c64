//! The `did:self` method: assembly and parsing of the identifier string.
//!
//! This is the only module that knows the field order and the delimiter.
//! The grammar is:
//!
//! ```text
//! did:self:<alg>:<pubkey_b64url>:<endpoint_b64url>:<metadata_b64url>:<sig_b64url>
//! ```
//!
//! The signature covers `<alg>:<pubkey>:<endpoint>:<metadata>` (the
//! *encoded* text segments, not the decoded bytes), so a verifier rebuilds
//! the payload from the transmitted string verbatim and never has to
//! re-serialize anything. Segments past the seventh are ignored, which
//! leaves the format extensible by convention.

use std::fmt::Display;
use std::str::FromStr;

use crate::base64url;
use crate::crypto::ed25519::{KeyPair, PublicKey};
use crate::crypto::SigAlgo;

/// Open, schema-free mapping carried in the metadata segment. `name`,
/// `type`, `created` and `version` are conventional keys, not required ones.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A parsed or freshly issued `did:self` identifier.
///
/// Parsing distinguishes two failure modes on purpose: a string that cannot
/// be interpreted at all is a [`ParseError`], while a string that parses
/// but whose signature does not check out comes back as a `DidSelf` with
/// [`is_valid`](Self::is_valid) `== false`. The latter still exposes its
/// endpoint and metadata (useful for display) but must not be trusted.
#[derive(Debug, Clone)]
pub struct DidSelf {
	/// The string representation of the DID, exactly as issued or received.
	s: String,
	algorithm: SigAlgo,
	public_key: PublicKey,
	endpoint: String,
	metadata: Metadata,
	valid: bool,
}

impl DidSelf {
	pub const PREFIX: &'static str = "did:self:";

	/// Issues a new identifier binding `endpoint` and `metadata` to the key
	/// pair's public key.
	///
	/// The private key is only touched for the one signing call; it is not
	/// referenced by the returned value. Nothing is emitted on failure.
	pub fn create(
		key_pair: &KeyPair,
		endpoint: &str,
		metadata: &Metadata,
	) -> Result<Self, CreateError> {
		let algorithm = SigAlgo::Ed25519;
		let public_key = key_pair.public();

		let pub_key_b64 = base64url::encode(public_key.as_bytes());
		let endpoint_b64 = base64url::encode(endpoint);
		let metadata_b64 = base64url::encode(serde_json::to_vec(metadata)?);

		let payload =
			signing_payload(algorithm.label(), &pub_key_b64, &endpoint_b64, &metadata_b64);
		let signature_b64 = base64url::encode(key_pair.sign(payload.as_bytes()).to_bytes());

		let s = format!(
			"{}{algorithm}:{pub_key_b64}:{endpoint_b64}:{metadata_b64}:{signature_b64}",
			Self::PREFIX
		);
		Ok(Self {
			s,
			algorithm,
			public_key,
			endpoint: endpoint.to_owned(),
			metadata: metadata.clone(),
			valid: true,
		})
	}

	/// Gets the identifier string, exactly as issued or received.
	pub fn as_str(&self) -> &str {
		&self.s
	}

	pub fn algorithm(&self) -> SigAlgo {
		self.algorithm
	}

	pub fn public_key(&self) -> &PublicKey {
		&self.public_key
	}

	/// The service endpoint, verbatim. It is not canonicalized and not
	/// validated beyond being UTF-8; whether to trust its scheme is the
	/// caller's call.
	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	pub fn metadata(&self) -> &Metadata {
		&self.metadata
	}

	/// Whether the signature segment verifies against the public key over
	/// the transmitted payload. Identifiers returned by [`Self::create`]
	/// are valid by construction.
	pub fn is_valid(&self) -> bool {
		self.valid
	}
}

/// The canonical byte string signatures are computed over. Field order and
/// delimiter here are the format contract; touching them invalidates every
/// identifier ever issued.
fn signing_payload(algorithm: &str, pub_key: &str, endpoint: &str, metadata: &str) -> String {
	format!("{algorithm}:{pub_key}:{endpoint}:{metadata}")
}

impl FromStr for DidSelf {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let parts: Vec<&str> = s.split(':').collect();
		if parts.len() < 7 {
			return Err(ParseError::TooFewSegments(parts.len()));
		}
		if parts[0] != "did" {
			return Err(ParseError::InvalidScheme);
		}
		if parts[1] != "self" {
			return Err(ParseError::WrongMethod(parts[1].to_owned()));
		}
		let algorithm: SigAlgo = parts[2].parse()?;

		let pub_key_bytes = base64url::decode(parts[3]).map_err(|source| {
			ParseError::Encoding {
				segment: "public key",
				source,
			}
		})?;
		let pub_key_bytes: [u8; PublicKey::LEN] = pub_key_bytes
			.as_slice()
			.try_into()
			.map_err(|_| ParseError::PubKeyLength(pub_key_bytes.len()))?;
		let public_key = PublicKey::try_from_bytes(&pub_key_bytes)?;

		let endpoint_bytes = base64url::decode(parts[4]).map_err(|source| {
			ParseError::Encoding {
				segment: "endpoint",
				source,
			}
		})?;
		let endpoint = String::from_utf8(endpoint_bytes)?;

		let metadata_bytes = base64url::decode(parts[5]).map_err(|source| {
			ParseError::Encoding {
				segment: "metadata",
				source,
			}
		})?;
		let metadata: Metadata = serde_json::from_slice(&metadata_bytes)?;

		let signature = base64url::decode(parts[6]).map_err(|source| {
			ParseError::Encoding {
				segment: "signature",
				source,
			}
		})?;

		// Rebuild the payload from the encoded text as transmitted, so
		// verification cannot be confused by re-encoding differences.
		let payload = signing_payload(parts[2], parts[3], parts[4], parts[5]);
		let valid = public_key.verify(payload.as_bytes(), &signature);

		Ok(Self {
			s: s.to_owned(),
			algorithm,
			public_key,
			endpoint,
			metadata,
			valid,
		})
	}
}

impl TryFrom<String> for DidSelf {
	type Error = ParseError;

	fn try_from(s: String) -> Result<Self, Self::Error> {
		s.as_str().parse()
	}
}

impl Display for DidSelf {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.as_str().fmt(f)
	}
}

#[derive(thiserror::Error, Debug)]
pub enum CreateError {
	#[error("failed to serialize metadata as json")]
	Metadata(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
	#[error("expected the did: scheme")]
	InvalidScheme,
	#[error("expected the \"self\" did method but got {0:?}")]
	WrongMethod(String),
	#[error("expected at least 7 colon separated segments but got {0}")]
	TooFewSegments(usize),
	#[error(transparent)]
	UnknownAlgo(#[from] crate::crypto::UnknownAlgo),
	#[error("malformed base64url in the {segment} segment")]
	Encoding {
		segment: &'static str,
		#[source]
		source: base64url::DecodeError,
	},
	#[error("public key segment decoded to {0} bytes but {len} were expected", len = PublicKey::LEN)]
	PubKeyLength(usize),
	#[error(transparent)]
	PubKey(#[from] crate::crypto::ed25519::TryFromBytesError),
	#[error("endpoint segment is not valid utf-8")]
	EndpointUtf8(#[from] std::string::FromUtf8Error),
	#[error("metadata segment is not a valid json object")]
	Metadata(#[from] serde_json::Error),
}
