//! Proof-of-work puzzle
//!
//! A proof is accepted when SHA-256 of the previous proof concatenated with
//! the candidate, both in decimal form, starts with four zero hex digits.
//! Difficulty is fixed, not adaptive.

use sha2::{Digest, Sha256};

/// Required hex prefix of an accepted digest (~16 bits of work).
const DIFFICULTY_PREFIX: &str = "0000";

/// Does `proof` solve the puzzle posed by `last_proof`?
pub fn valid_proof(last_proof: u64, proof: u64) -> bool {
    let guess = format!("{}{}", last_proof, proof);
    let digest = hex::encode(Sha256::digest(guess.as_bytes()));
    digest.starts_with(DIFFICULTY_PREFIX)
}

/// Find the smallest non-negative proof accepted against `last_proof`.
///
/// Unbounded linear search from zero; deterministic, so any node reproduces
/// the same result for the same input.
pub fn solve(last_proof: u64) -> u64 {
    let mut proof = 0;
    while !valid_proof(last_proof, proof) {
        proof += 1;
    }
    proof
}
