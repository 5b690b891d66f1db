use hidr::crypto::{KEY_LEN, ShareKey};
use hidr::token::{ID_LEN, OpaqueId, ShareToken, TOKEN_BYTES};
use hidr::HidrError;

fn sample_key() -> ShareKey {
    let mut key = [0u8; KEY_LEN];
    for (i, b) in key.iter_mut().enumerate() {
        *b = i as u8 + 1;
    }
    ShareKey::from_bytes(key)
}

fn sample_id() -> OpaqueId {
    OpaqueId::from_bytes([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, 0x00, 0x11])
}

#[test]
fn encode_decode_roundtrip() {
    let token = ShareToken::new(sample_key(), sample_id());
    let decoded = ShareToken::decode(&token.encode()).expect("decode token");

    assert_eq!(decoded.key(), &sample_key());
    assert_eq!(decoded.id(), &sample_id());
}

#[test]
fn encoding_matches_issued_tokens() {
    // key 在前、id 在后，base64url 无 padding。
    let token = ShareToken::new(sample_key(), sample_id());

    assert_eq!(token.encode(), "AQIDBAUGBwgJCgsMDQ4PEKq7zN3u_wAR");
    assert_eq!(token.to_string(), token.encode());
}

#[test]
fn random_tokens_have_fixed_url_safe_length() {
    for _ in 0..200 {
        let token = ShareToken::new(
            ShareKey::generate().expect("generate key"),
            OpaqueId::generate().expect("generate id"),
        );
        let encoded = token.encode();

        assert_eq!(encoded.len(), 32);
        assert!(
            encoded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "token is not URL safe: {encoded}"
        );

        let parsed: ShareToken = encoded.parse().expect("parse token");
        assert_eq!(parsed, token);
    }
}

#[test]
fn decode_ignores_surrounding_whitespace() {
    let expected = ShareToken::new(sample_key(), sample_id());

    let decoded = ShareToken::decode("  AQIDBAUGBwgJCgsMDQ4PEKq7zN3u_wAR\n").expect("decode token");
    assert_eq!(decoded, expected);
}

#[test]
fn into_parts_splits_at_key_length() {
    let (key, id) = ShareToken::decode("AAECAwQFBgcICQoLDA0OD6q7zN3u_wAR")
        .expect("decode token")
        .into_parts();

    let expected_key: Vec<u8> = (0..KEY_LEN as u8).collect();
    assert_eq!(key.as_bytes().as_slice(), expected_key.as_slice());
    assert_eq!(id.to_hex(), "aabbccddeeff0011");
    assert_eq!(TOKEN_BYTES, KEY_LEN + ID_LEN);
}

#[test]
fn short_token_is_format_error() {
    // 解码后不足 key 长度：无法切分。
    for token in ["", "AQID", "AQIDBAUGBwgJCgsMDQ4P"] {
        let err = ShareToken::decode(token).expect_err("short token must be rejected");
        assert!(matches!(err, HidrError::Format(_)), "unexpected error: {err:?}");
    }
}

#[test]
fn token_with_wrong_id_length_is_format_error() {
    // key 完整但 id 长度不对（截断 / 多出字节）。
    for token in ["AQIDBAUGBwgJCgsMDQ4PEKq7zN3u", "AQIDBAUGBwgJCgsMDQ4PEKq7zN3u_wARIg"] {
        let err = ShareToken::decode(token).expect_err("wrong length must be rejected");
        assert!(matches!(err, HidrError::Format(_)), "unexpected error: {err:?}");
    }
}

#[test]
fn non_base64_token_is_format_error() {
    for token in ["not a token!", "AQIDBAUGBwgJCgsMDQ4PEKq7zN3u+wAR", "AQID/AUG"] {
        let err = ShareToken::decode(token).expect_err("invalid alphabet must be rejected");
        assert!(matches!(err, HidrError::Format(_)), "unexpected error: {err:?}");
    }
}

#[test]
fn token_debug_and_errors_do_not_leak_key() {
    let token = ShareToken::new(ShareKey::from_bytes([0x5a; KEY_LEN]), sample_id());
    let debug = format!("{token:?}");

    assert!(!debug.contains("5a5a"), "key bytes leaked: {debug}");
    assert!(debug.contains("aabbccddeeff0011"));
}

#[test]
fn opaque_id_hex_roundtrip() {
    let id = OpaqueId::from_hex("aabbccddeeff0011").expect("parse id");
    assert_eq!(id, sample_id());
    assert_eq!(id.to_string(), "aabbccddeeff0011");

    assert!(OpaqueId::from_hex("aabb").is_err());
    assert!(OpaqueId::from_hex("not hex!").is_err());
}
