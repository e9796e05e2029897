//! NIST SP 800-38A F.2.5 — CBC-AES256.Encrypt.
//!
//! `encrypt_block` always pads, so the four NIST blocks are followed by one
//! full PKCS#7 block. The first four ciphertext blocks must match exactly.

use sfp_crypto_core::cipher::{decrypt_block, encrypt_block, BLOCK_LEN};

use super::hex;

const KEY: &str = "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4";
const IV: &str = "000102030405060708090a0b0c0d0e0f";
const PLAINTEXT: &str = "6bc1bee22e409f96e93d7e117393172a\
                         ae2d8a571e03ac9c9eb76fac45af8e51\
                         30c81c46a35ce411e5fbc1191a0a52ef\
                         f69f2445df4f9b17ad2b417be66c3710";
const CIPHERTEXT: &str = "f58c4c04d6e5f1ba779eabfb5f7bfbd6\
                          9cfc4e967edb808d679f777bc6702c7d\
                          39f23369a9d9bacfa530e26304231461\
                          b2eb05e2c39be9fcda6c19078c6a9d1b";

#[test]
fn nist_f25_cbc_aes256_encrypt() {
    let ct = encrypt_block(&hex(KEY), &hex(IV), &hex(PLAINTEXT)).expect("encrypt should succeed");

    assert_eq!(ct.len(), 5 * BLOCK_LEN);
    assert_eq!(&ct[..4 * BLOCK_LEN], hex(CIPHERTEXT).as_slice());
}

#[test]
fn nist_f25_cbc_aes256_decrypt() {
    let ct = encrypt_block(&hex(KEY), &hex(IV), &hex(PLAINTEXT)).expect("encrypt should succeed");
    let pt = decrypt_block(&hex(KEY), &hex(IV), &ct).expect("decrypt should succeed");
    assert_eq!(pt.expose(), hex(PLAINTEXT).as_slice());
}
