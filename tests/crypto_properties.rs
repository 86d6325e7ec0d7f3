use base64::{engine::general_purpose::STANDARD, Engine};
use proptest::prelude::*;
use sealcfg::crypto::{decrypt_token, encrypt_token, Envelope, MIN_ENVELOPE_LEN};

// Each case runs the 100k-round KDF twice; keep the case count small
fn config() -> ProptestConfig {
    ProptestConfig::with_cases(8)
}

const REFERENCE_ENVELOPE: &str =
    "AAECAwQFBgcICQoLDA0OD2RlZmdoaWprbG1ub5MTBZAJhl/+90yKjDr3OmMDFOIlZvYxbrE=";

#[test]
fn opens_envelope_produced_by_other_implementations() {
    let plaintext = decrypt_token(REFERENCE_ENVELOPE, "correct-horse").unwrap();
    assert_eq!(plaintext.as_str(), "sk-ABC123");
}

#[test]
fn short_envelope_is_rejected() {
    let full = Envelope::parse(REFERENCE_ENVELOPE).unwrap().to_bytes();
    assert!(full.len() > MIN_ENVELOPE_LEN);

    let truncated = STANDARD.encode(&full[..MIN_ENVELOPE_LEN - 1]);
    assert!(decrypt_token(&truncated, "correct-horse")
        .unwrap_err()
        .is_decryption());
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn seal_open_roundtrips(plaintext in "\\PC{0,64}", password in "[ -~]{1,24}") {
        let envelope = encrypt_token(&plaintext, &password).unwrap();
        let opened = decrypt_token(&envelope, &password).unwrap();
        prop_assert_eq!(opened.as_str(), plaintext.as_str());
    }

    #[test]
    fn wrong_password_never_opens(plaintext in "\\PC{0,32}", password in "[a-z]{8}") {
        let envelope = encrypt_token(&plaintext, &password).unwrap();
        let wrong = format!("{}!", password);
        prop_assert!(decrypt_token(&envelope, &wrong).unwrap_err().is_decryption());
    }

    #[test]
    fn any_flipped_ciphertext_byte_is_detected(offset in 0usize..25, bit in 0u8..8) {
        let envelope = encrypt_token("sk-ABC123", "correct-horse").unwrap();
        let mut parsed = Envelope::parse(&envelope).unwrap();

        let index = offset % parsed.sealed.len();
        parsed.sealed[index] ^= 1 << bit;

        let tampered = parsed.encode();
        prop_assert!(decrypt_token(&tampered, "correct-horse").unwrap_err().is_decryption());
    }
}

#[test]
fn garbage_input_is_a_decryption_error() {
    for input in ["", "not base64!!", "AAAA", "sk-ABC123"] {
        assert!(decrypt_token(input, "pw").unwrap_err().is_decryption(), "{}", input);
    }
}
