//! Entropy and uniqueness of the random material that goes into containers.
//!
//! Thresholds are calibrated for sample size: 64 KB of uniform bytes averages
//! ~7.997 bits/byte, 1 KB ~7.81. They catch degenerate CSPRNG output without
//! tripping on natural variance.

use std::collections::HashSet;

use sfp_crypto_core::container::Container;
use sfp_crypto_core::Pbkdf2Params;

const PARAMS: Pbkdf2Params = Pbkdf2Params { iterations: 1 };

/// Shannon entropy of a byte slice (bits per byte).
#[allow(clippy::cast_precision_loss)]
fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut freq = [0u64; 256];
    for &b in data {
        freq[b as usize] = freq[b as usize].saturating_add(1);
    }
    let len = data.len() as f64;
    freq.iter()
        .filter(|&&f| f > 0)
        .map(|&f| {
            let p = f as f64 / len;
            -p * p.log2()
        })
        .sum()
}

#[test]
fn salt_and_iv_stream_64kb_entropy() {
    let mut stream = Vec::with_capacity(65536);
    for _ in 0..2048 {
        let c = Container::seal(b"", b"pw", &PARAMS).expect("seal");
        stream.extend_from_slice(&c.salt);
        stream.extend_from_slice(&c.iv);
    }
    let entropy = shannon_entropy(&stream);
    assert!(
        entropy > 7.99,
        "salt/IV stream entropy too low: {entropy:.4}"
    );
}

/// A run of zero bytes must not show through CBC: the ciphertext of 64 KB of
/// zeros should look uniformly random.
#[test]
fn ciphertext_of_zero_plaintext_has_high_entropy() {
    let plaintext = vec![0u8; 65536];
    let container = Container::seal(&plaintext, b"pw", &PARAMS).expect("seal");
    let entropy = shannon_entropy(&container.ciphertext);
    assert!(
        entropy > 7.99,
        "ciphertext of zero plaintext entropy too low: {entropy:.4}"
    );
}

#[test]
fn salts_and_ivs_are_unique_across_many_containers() {
    let mut salts = HashSet::new();
    let mut ivs = HashSet::new();

    for _ in 0..200 {
        let c = Container::seal(b"x", b"pw", &PARAMS).expect("seal");
        assert!(salts.insert(c.salt), "salt repeated");
        assert!(ivs.insert(c.iv), "IV repeated");
    }
}

#[test]
fn salt_and_iv_of_one_container_differ() {
    let c = Container::seal(b"x", b"pw", &PARAMS).expect("seal");
    assert_ne!(c.salt, c.iv);
    assert_ne!(c.salt, [0u8; 16]);
    assert_ne!(c.iv, [0u8; 16]);
}

#[test]
fn concatenated_salts_have_high_entropy() {
    let mut pool = Vec::with_capacity(64 * 32);
    for _ in 0..64 {
        let c = Container::seal(b"", b"pw", &PARAMS).expect("seal");
        pool.extend_from_slice(&c.salt);
        pool.extend_from_slice(&c.iv);
    }
    let entropy = shannon_entropy(&pool);
    assert!(entropy > 7.5, "salt/IV pool entropy too low: {entropy:.4}");
}
