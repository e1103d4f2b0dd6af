// self
use steam_openid::{auth::AssertionToken, error::MalformedTokenError};

const REQUIRED: [(&str, &str); 9] = [
	("openid.ns", "A"),
	("openid.op_endpoint", "B"),
	("openid.claimed_id", "C"),
	("openid.return_to", "D"),
	("openid.response_nonce", "E"),
	("openid.assoc_handle", "F"),
	("openid.identity", "http://example.com/id/76561198000000000"),
	("openid.sig", "G"),
	("openid.signed", "H"),
];

fn redirect_without(skip: Option<&str>) -> String {
	let query = REQUIRED
		.iter()
		.filter(|(key, _)| Some(*key) != skip)
		.map(|(key, value)| format!("{key}={value}"))
		.collect::<Vec<_>>()
		.join("&");

	format!("http://localhost/?{query}")
}

#[test]
fn complete_redirect_yields_the_steam_id() {
	let token = AssertionToken::from_redirect(&redirect_without(None))
		.expect("Complete redirect should parse.");

	assert_eq!(token.steam_id.as_ref(), "76561198000000000");
	assert_eq!(token.ns, "A");
	assert_eq!(token.op_endpoint, "B");
	assert_eq!(token.signature, "G");
	assert_eq!(token.signed, "H");
	assert!(token.mode.is_none());
}

#[test]
fn every_required_field_is_enforced() {
	for (field, _) in REQUIRED {
		let err = AssertionToken::from_redirect(&redirect_without(Some(field)))
			.expect_err("Redirect missing a required field should be rejected.");

		assert_eq!(err, MalformedTokenError::MissingField { field }, "while omitting {field}");
	}
}

#[test]
fn mode_and_unknown_parameters_pass_through() {
	let url = format!(
		"{}&openid.mode=id_res&openid.signed=ignored&utm_source=x",
		redirect_without(None)
	);
	let token: AssertionToken = url.parse().expect("Redirect with extras should parse.");

	assert_eq!(token.mode.as_deref(), Some("id_res"));
	assert_eq!(token.signed, "H");
}

#[test]
fn real_steam_assertion_parses() {
	let url = "http://localhost/?openid.ns=http%3A%2F%2Fspecs.openid.net%2Fauth%2F2.0\
		&openid.mode=id_res\
		&openid.op_endpoint=https%3A%2F%2Fsteamcommunity.com%2Fopenid%2Flogin\
		&openid.claimed_id=https%3A%2F%2Fsteamcommunity.com%2Fopenid%2Fid%2F76561197960435530\
		&openid.identity=https%3A%2F%2Fsteamcommunity.com%2Fopenid%2Fid%2F76561197960435530\
		&openid.return_to=http%3A%2F%2Flocalhost\
		&openid.response_nonce=2024-01-01T00%3A00%3A00ZVzM3zbNhBp9V1ehb7XUvnnE9ZKg%3D\
		&openid.assoc_handle=1234567890\
		&openid.signed=signed%2Cop_endpoint%2Cclaimed_id%2Cidentity%2Creturn_to%2Cresponse_nonce%2Cassoc_handle\
		&openid.sig=W0u5DRbtHE1GG0ZKXjerUZDUGmc%3D";
	let token = AssertionToken::from_redirect(url).expect("Steam assertion should parse.");

	assert_eq!(token.steam_id.as_u64(), Some(76_561_197_960_435_530));
	assert_eq!(token.ns, "http://specs.openid.net/auth/2.0");
	assert_eq!(token.signed_fields().count(), 7);
	assert!(token.signed_fields().any(|field| field == "claimed_id"));
}

#[test]
fn identity_without_an_id_segment_is_rejected() {
	let url = redirect_without(None)
		.replace("http://example.com/id/76561198000000000", "http://example.com/profiles/1");
	let err =
		AssertionToken::from_redirect(&url).expect_err("Identity without /id/ should fail.");

	assert!(matches!(err, MalformedTokenError::InvalidIdentity { .. }));
}

#[test]
fn steam_id_equals_the_text_after_the_last_id_segment() {
	let long_tail = "7".repeat(129);
	let cases = [("abc%20def", "abc def".to_owned()), (long_tail.as_str(), long_tail.clone())];

	for (encoded, expected) in cases {
		let url = redirect_without(None).replace("76561198000000000", encoded);
		let token = AssertionToken::from_redirect(&url)
			.expect("Any non-empty identity tail should parse.");

		assert_eq!(token.steam_id.as_ref(), expected);
	}
}
