//! A container produced by the terminal scripts' algorithm, with fixed salt
//! and IV, must decrypt byte-for-byte and re-encode identically.

use sfp_crypto_core::cipher::encrypt_block;
use sfp_crypto_core::container::{open, Container};
use sfp_crypto_core::integrity;
use sfp_crypto_core::kdf::{derive_file_keys, Pbkdf2Params};
use sfp_crypto_core::CryptoError;

use super::hex;

const PASSWORD: &[u8] = b"correct horse battery staple";
const PLAINTEXT: &[u8] = b"SFA known-answer plaintext\n";

const SALT: &str = "000102030405060708090a0b0c0d0e0f";
const IV: &str = "101112131415161718191a1b1c1d1e1f";
const ENCRYPTION_KEY: &str = "49d49c25f597846209f0d92e7770ab64e1c75e94b4ce6c509265ee67175d2a1e";
const MAC_KEY: &str = "9fcee8a0c2f4ae6a31b49deb7da4194325e6cbceb1734ce6a8d45ce4582ae2a4";
const TAG: &str = "ac18eedb073ff05e9e019dd0f0c497b4fa106f42f7ce1d1a0057747a01c56f8e";
const CIPHERTEXT: &str = "77f9c90c34f7ee3b8a67c500d640e232be6d90ce7ed155fb5d358bc9d0c8d765";
const CONTAINER: &str = "5346415f454e435259505445445f46494c455f56310a\
                         000102030405060708090a0b0c0d0e0f\
                         101112131415161718191a1b1c1d1e1f\
                         ac18eedb073ff05e9e019dd0f0c497b4fa106f42f7ce1d1a0057747a01c56f8e\
                         77f9c90c34f7ee3b8a67c500d640e232be6d90ce7ed155fb5d358bc9d0c8d765";

#[test]
fn derives_expected_keys() {
    let keys = derive_file_keys(PASSWORD, &hex(SALT), &Pbkdf2Params::default()).expect("derive");
    assert_eq!(keys.encryption_key().as_slice(), hex(ENCRYPTION_KEY).as_slice());
    assert_eq!(keys.mac_key().as_slice(), hex(MAC_KEY).as_slice());
}

#[test]
fn opens_reference_container() {
    let bytes = hex(CONTAINER);
    assert_eq!(bytes.len(), 118);

    let plaintext = open(&bytes, PASSWORD, &Pbkdf2Params::default()).expect("open");
    assert_eq!(plaintext.expose(), PLAINTEXT);
}

#[test]
fn decodes_reference_fields() {
    let container = Container::from_bytes(&hex(CONTAINER)).expect("decode");
    assert_eq!(container.salt.as_slice(), hex(SALT).as_slice());
    assert_eq!(container.iv.as_slice(), hex(IV).as_slice());
    assert_eq!(container.tag.as_slice(), hex(TAG).as_slice());
    assert_eq!(container.ciphertext, hex(CIPHERTEXT));
}

#[test]
fn same_salt_and_iv_reproduce_reference_bytes() {
    let keys = derive_file_keys(PASSWORD, &hex(SALT), &Pbkdf2Params::default()).expect("derive");
    let iv: [u8; 16] = hex(IV).try_into().expect("16-byte IV");
    let salt: [u8; 16] = hex(SALT).try_into().expect("16-byte salt");

    let ciphertext = encrypt_block(keys.encryption_key(), &iv, PLAINTEXT).expect("encrypt");
    let container = Container {
        salt,
        iv,
        tag: integrity::tag(keys.mac_key(), &ciphertext),
        ciphertext,
    };
    assert_eq!(container.to_bytes(), hex(CONTAINER));
}

#[test]
fn reference_container_rejects_wrong_password() {
    let result = open(
        &hex(CONTAINER),
        b"Correct horse battery staple",
        &Pbkdf2Params::default(),
    );
    assert!(matches!(result, Err(CryptoError::Authentication)));
}
