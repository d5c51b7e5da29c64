//! Ed25519 key pairs, signing and verification.
//!
//! Key generation draws from the operating system CSPRNG owned by this
//! module; nothing here shares an ambient global generator. Verification is
//! a pure function of (public key, payload, signature): there is no code
//! path that reports a signature as valid without checking it.

use curve25519_dalek::edwards::CompressedEdwardsY;
use ed25519_dalek::{Signature, Signer as _, SigningKey, VerifyingKey};
#[cfg(feature = "random")]
use rand_core::OsRng;

pub const SIGNATURE_LEN: usize = ed25519_dalek::SIGNATURE_LENGTH;

/// An Ed25519 key pair. The secret half never leaves this struct: it is not
/// serialized, not exposed by any accessor, and not printed by `Debug`.
pub struct KeyPair {
	signing: SigningKey,
}

impl KeyPair {
	pub const SEED_LEN: usize = ed25519_dalek::SECRET_KEY_LENGTH;

	/// Generates a fresh key pair from the operating system CSPRNG.
	#[cfg(feature = "random")]
	pub fn generate() -> Self {
		Self {
			signing: SigningKey::generate(&mut OsRng),
		}
	}

	/// Deterministically derives a key pair from a 32-byte secret seed.
	pub fn from_seed(seed: &[u8; Self::SEED_LEN]) -> Self {
		Self {
			signing: SigningKey::from_bytes(seed),
		}
	}

	/// Same as [`Self::from_seed`], for callers holding a slice of unchecked
	/// length.
	pub fn try_from_seed(seed: &[u8]) -> Result<Self, InvalidSeedLength> {
		let seed: &[u8; Self::SEED_LEN] = seed
			.try_into()
			.map_err(|_| InvalidSeedLength(seed.len()))?;
		Ok(Self::from_seed(seed))
	}

	pub fn public(&self) -> PublicKey {
		PublicKey(self.signing.verifying_key())
	}

	/// Signs `payload`, producing a [`SIGNATURE_LEN`]-byte signature.
	pub fn sign(&self, payload: &[u8]) -> Signature {
		self.signing.sign(payload)
	}
}

impl std::fmt::Debug for KeyPair {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("KeyPair")
			.field("public", &self.public())
			.finish_non_exhaustive()
	}
}

#[derive(thiserror::Error, Debug, Eq, PartialEq)]
#[error("expected a {len}-byte secret seed but got {0} bytes", len = KeyPair::SEED_LEN)]
pub struct InvalidSeedLength(pub usize);

/// An Ed25519 public key.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
	pub const LEN: usize = ed25519_dalek::PUBLIC_KEY_LENGTH;

	/// Instantiates `PublicKey` from some bytes. Performs all necessary
	/// validation that the key is valid and of sufficient strength.
	///
	/// Note that we will reject any keys that are too weak (aka low order).
	pub fn try_from_bytes(bytes: &[u8; Self::LEN]) -> Result<Self, TryFromBytesError> {
		let compressed_edwards = CompressedEdwardsY(bytes.to_owned());
		let Some(edwards) = compressed_edwards.decompress() else {
			return Err(TryFromBytesError::NotOnCurve);
		};
		let key = VerifyingKey::from(edwards);
		if key.is_weak() {
			return Err(TryFromBytesError::WeakKey);
		}
		Ok(Self(key))
	}

	pub fn as_bytes(&self) -> &[u8; Self::LEN] {
		self.0.as_bytes()
	}

	pub fn to_bytes(&self) -> [u8; Self::LEN] {
		self.0.to_bytes()
	}

	/// Checks that `signature` was produced over exactly `payload` by the
	/// private half of this key. Returns false for everything else,
	/// including signature bytes of the wrong length.
	pub fn verify(&self, payload: &[u8], signature: &[u8]) -> bool {
		let Ok(signature) = Signature::from_slice(signature) else {
			return false;
		};
		self.0.verify_strict(payload, &signature).is_ok()
	}
}

#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum TryFromBytesError {
	#[error(
		"the provided bytes were not the y coordinate of a valid point on the curve"
	)]
	NotOnCurve,
	#[error("public key has a low order and is too weak, which would allow the key to generate signatures that work for almost any message. To prevent this, we reject weak keys.")]
	WeakKey,
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_sign_verify_round_trip() {
		let key_pair = KeyPair::from_seed(&[42; 32]);
		let signature = key_pair.sign(b"payload").to_bytes();
		assert!(key_pair.public().verify(b"payload", &signature));
		assert!(!key_pair.public().verify(b"payload2", &signature));
		assert!(!key_pair.public().verify(b"", &signature));
	}

	#[test]
	fn test_cross_key_rejection() {
		let a = KeyPair::from_seed(&[1; 32]);
		let b = KeyPair::from_seed(&[2; 32]);
		let signature = a.sign(b"payload").to_bytes();
		assert!(a.public().verify(b"payload", &signature));
		assert!(!b.public().verify(b"payload", &signature));
	}

	#[test]
	fn test_rejects_wrong_length_signature() {
		let key_pair = KeyPair::from_seed(&[3; 32]);
		let signature = key_pair.sign(b"payload").to_bytes();
		assert!(!key_pair.public().verify(b"payload", &signature[..63]));
		assert!(!key_pair.public().verify(b"payload", &[]));
	}

	#[test]
	fn test_public_key_round_trips_through_bytes() {
		let key_pair = KeyPair::from_seed(&[4; 32]);
		let restored = PublicKey::try_from_bytes(key_pair.public().as_bytes())
			.expect("a freshly derived key is on the curve and not weak");
		assert_eq!(restored, key_pair.public());
		let signature = key_pair.sign(b"payload").to_bytes();
		assert!(restored.verify(b"payload", &signature));
	}

	#[test]
	fn test_rejects_weak_keys() {
		// The compressed identity point and the order-4 point with y = 0,
		// two of the canonical low order elements.
		let mut identity = [0; PublicKey::LEN];
		identity[0] = 1;
		assert_eq!(
			PublicKey::try_from_bytes(&identity),
			Err(TryFromBytesError::WeakKey)
		);
		assert_eq!(
			PublicKey::try_from_bytes(&[0; PublicKey::LEN]),
			Err(TryFromBytesError::WeakKey)
		);
	}

	#[test]
	fn test_from_seed_is_deterministic() {
		assert_eq!(
			KeyPair::from_seed(&[9; 32]).public(),
			KeyPair::from_seed(&[9; 32]).public()
		);
	}

	#[test]
	fn test_try_from_seed_length() {
		assert_eq!(
			KeyPair::try_from_seed(&[0; 16]).unwrap_err(),
			InvalidSeedLength(16)
		);
		assert!(KeyPair::try_from_seed(&[0; 32]).is_ok());
	}

	#[cfg(feature = "random")]
	#[test]
	fn test_generate_is_not_a_constant() {
		assert_ne!(KeyPair::generate().public(), KeyPair::generate().public());
	}

	#[test]
	fn test_debug_does_not_expose_secret() {
		let key_pair = KeyPair::from_seed(&[0xab; 32]);
		let debugged = format!("{key_pair:?}");
		assert!(debugged.contains("public"));
		assert!(!debugged.contains("signing"));
		assert!(debugged.ends_with(".. }"), "expected elided fields: {debugged}");
	}
}
