//! The MAC key is derived from, but never equal to, the encryption key, and
//! neither key can stand in for the other.

use sfp_crypto_core::cipher::{decrypt_block, encrypt_block};
use sfp_crypto_core::integrity;
use sfp_crypto_core::kdf::{derive, derive_file_keys, Pbkdf2Params, KEY_LEN};

const PARAMS: Pbkdf2Params = Pbkdf2Params { iterations: 10 };

#[test]
fn mac_key_differs_from_pbkdf2_output() {
    let salt = [0x01u8; 16];
    let keys = derive_file_keys(b"password", &salt, &PARAMS).expect("derive");
    let master = derive(b"password", &salt, PARAMS.iterations, KEY_LEN).expect("derive");

    assert_ne!(keys.encryption_key(), keys.mac_key());
    assert_eq!(keys.encryption_key().as_slice(), master.expose());
    assert_ne!(keys.mac_key().as_slice(), master.expose());
}

#[test]
fn mac_key_depends_on_salt() {
    let a = derive_file_keys(b"password", &[0x01u8; 16], &PARAMS).expect("derive");
    let b = derive_file_keys(b"password", &[0x02u8; 16], &PARAMS).expect("derive");
    assert_ne!(a.mac_key(), b.mac_key());
}

#[test]
fn mac_key_cannot_decrypt_and_encryption_key_cannot_authenticate() {
    let salt = [0x02u8; 16];
    let iv = [0x03u8; 16];
    let keys = derive_file_keys(b"password", &salt, &PARAMS).expect("derive");

    let ct = encrypt_block(keys.encryption_key(), &iv, b"role check").expect("encrypt");
    let tag = integrity::tag(keys.mac_key(), &ct);

    assert!(!integrity::verify(keys.encryption_key(), &ct, &tag));
    if let Ok(pt) = decrypt_block(keys.mac_key(), &iv, &ct) {
        assert_ne!(pt.expose(), b"role check");
    }
}
