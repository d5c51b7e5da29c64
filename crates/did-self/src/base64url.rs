//! The one text codec of the wire format: url-safe base64 without padding.
//!
//! Every data segment of a `did:self` string goes through this module, in
//! both directions. Keeping a single codec (instead of one helper per
//! environment) means the alphabet, the padding rule and the rejection
//! behavior can never drift apart between issuer and verifier.

use base64::prelude::BASE64_URL_SAFE_NO_PAD;
use base64::Engine as _;

/// Encodes bytes (or a UTF-8 string) as url-safe base64 with no `=` padding.
///
/// Deterministic: the same input always yields the same output.
pub fn encode(data: impl AsRef<[u8]>) -> String {
	BASE64_URL_SAFE_NO_PAD.encode(data)
}

/// Decodes a padding-free url-safe base64 string back into bytes.
///
/// Rejects characters outside the url-safe alphabet, explicit `=` padding,
/// lengths that unpadded base64 cannot produce, and non-canonical trailing
/// bits.
pub fn decode(s: &str) -> Result<Vec<u8>, DecodeError> {
	Ok(BASE64_URL_SAFE_NO_PAD.decode(s)?)
}

#[derive(thiserror::Error, Debug, Eq, PartialEq)]
#[error("malformed base64url segment")]
pub struct DecodeError(#[from] base64::DecodeError);

#[cfg(test)]
mod test {
	use super::*;

	use hex_literal::hex;

	#[test]
	fn test_round_trip() {
		let cases: &[&[u8]] = &[
			b"",
			&[0],
			&[0; 32],
			b"Hello World!",
			&[0xff, 0xfe, 0x00, 0x01],
			"Yellow ঞ Sus😂".as_bytes(),
		];
		for &case in cases {
			let encoded = encode(case);
			assert!(
				!encoded.contains('='),
				"padding leaked into {encoded:?}"
			);
			assert!(
				encoded
					.chars()
					.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
				"non url-safe character in {encoded:?}"
			);
			assert_eq!(
				decode(&encoded).expect("round trip should decode"),
				case
			);
		}
	}

	#[test]
	fn test_rfc8037_vector() {
		// Pubkey and its encoding from https://datatracker.ietf.org/doc/html/rfc8037#appendix-A.2
		let pubkey_bytes = hex!(
			"d7 5a 98 01 82 b1 0a b7 d5 4b fe d3 c9 64 07 3a
			 0e e1 72 f3 da a6 23 25 af 02 1a 68 f7 07 51 1a"
		);
		let encoded = "11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo";
		assert_eq!(encode(pubkey_bytes), encoded);
		assert_eq!(decode(encoded).unwrap(), pubkey_bytes);
	}

	#[test]
	fn test_rejects_malformed() {
		let cases = [
			"a",     // no unpadded base64 has length 1 mod 4
			"ab cd", // whitespace
			"abc!",  // outside the alphabet
			"AA==",  // explicit padding is not part of this format
			"++++",  // standard alphabet, not the url-safe one
			"////",
		];
		for case in cases {
			assert!(decode(case).is_err(), "{case:?} should be rejected");
		}
	}
}
