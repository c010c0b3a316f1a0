//! RC4 against the published test vectors.

use pdfcrypt_core::arcfour::Arcfour;

fn hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

#[test]
fn test_arcfour_key() {
    let mut cipher = Arcfour::new(b"Key").unwrap();
    let result = cipher.process(b"Plaintext");
    assert_eq!(hex(&result), "bbf316e8d940af0ad3");
}

#[test]
fn test_arcfour_wiki() {
    let mut cipher = Arcfour::new(b"Wiki").unwrap();
    let result = cipher.process(b"pedia");
    assert_eq!(hex(&result), "1021bf0420");
}

#[test]
fn test_arcfour_secret() {
    let result = Arcfour::apply(b"Secret", b"Attack at dawn").unwrap();
    assert_eq!(hex(&result), "45a01f645fc35b383552544b9bf5");
}

#[test]
fn test_arcfour_keystream_continues_across_calls() {
    let mut split = Arcfour::new(b"Secret").unwrap();
    let mut joined = split.process(b"Attack ");
    joined.extend(split.process(b"at dawn"));
    assert_eq!(hex(&joined), "45a01f645fc35b383552544b9bf5");
}

#[test]
fn test_arcfour_roundtrip_all_key_lengths() {
    let data: Vec<u8> = (0..=255u8).collect();
    for len in [1usize, 5, 10, 16, 32, 256] {
        let key: Vec<u8> = (0..len).map(|i| (i * 7 + 3) as u8).collect();
        let encrypted = Arcfour::apply(&key, &data).unwrap();
        assert_eq!(encrypted.len(), data.len());
        assert_eq!(Arcfour::apply(&key, &encrypted).unwrap(), data);
    }
}

#[test]
fn test_arcfour_rejects_bad_keys() {
    assert!(Arcfour::new(b"").is_err());
    assert!(Arcfour::new(&[0u8; 257]).is_err());
}
