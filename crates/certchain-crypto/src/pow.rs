use crate::hasher::BlockHasher;

/// Default number of leading zero hex digits required of a proof.
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// A BLAKE3 digest has 64 hex digits; more leading zeros can never be met.
pub const MAX_DIFFICULTY: u32 = 64;

/// Proof-of-work condition and nonce search.
///
/// A candidate `c` is a valid proof for a previous proof `p` when the hex
/// BLAKE3 digest of the decimal string `"{p}{c}"` starts with `difficulty`
/// zeros. The search is pure and does no I/O, so it can be run on any thread
/// and tested in isolation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProofOfWork {
    difficulty: u32,
}

impl ProofOfWork {
    pub fn new(difficulty: u32) -> Result<Self, PowError> {
        if difficulty > MAX_DIFFICULTY {
            return Err(PowError::DifficultyTooHigh {
                difficulty,
                max: MAX_DIFFICULTY,
            });
        }
        Ok(Self { difficulty })
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Check the work condition for `candidate` against `previous_proof`.
    pub fn is_valid(&self, previous_proof: u64, candidate: u64) -> bool {
        let guess = format!("{previous_proof}{candidate}");
        let digest = BlockHasher::raw_hash(guess.as_bytes());
        leading_zero_nibbles(&digest) >= self.difficulty
    }

    /// Linear search from zero for the first valid proof.
    ///
    /// Every candidate below the returned value fails [`Self::is_valid`].
    /// The expected number of attempts is `16^difficulty`; there is no
    /// timeout or cancellation.
    pub fn find(&self, previous_proof: u64) -> u64 {
        let mut candidate = 0u64;
        while !self.is_valid(previous_proof, candidate) {
            candidate += 1;
        }
        tracing::debug!(
            previous_proof,
            proof = candidate,
            difficulty = self.difficulty,
            "proof of work found"
        );
        candidate
    }

    /// Same search as [`Self::find`], giving up after `max_attempts` candidates.
    pub fn find_bounded(&self, previous_proof: u64, max_attempts: u64) -> Option<u64> {
        (0..max_attempts).find(|&candidate| self.is_valid(previous_proof, candidate))
    }
}

impl Default for ProofOfWork {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
        }
    }
}

fn leading_zero_nibbles(digest: &[u8; 32]) -> u32 {
    let mut count = 0;
    for byte in digest {
        if *byte == 0 {
            count += 2;
            continue;
        }
        if byte >> 4 == 0 {
            count += 1;
        }
        break;
    }
    count
}

/// Errors from proof-of-work configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PowError {
    #[error("difficulty {difficulty} exceeds the maximum of {max}")]
    DifficultyTooHigh { difficulty: u32, max: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_digest(previous: u64, candidate: u64) -> String {
        let raw = BlockHasher::raw_hash(format!("{previous}{candidate}").as_bytes());
        raw.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn found_proof_satisfies_condition() {
        let pow = ProofOfWork::new(2).unwrap();
        let proof = pow.find(100);
        assert!(pow.is_valid(100, proof));
        assert!(hex_digest(100, proof).starts_with("00"));
    }

    #[test]
    fn search_is_linear_from_zero() {
        let pow = ProofOfWork::new(2).unwrap();
        let proof = pow.find(7);
        for earlier in 0..proof {
            assert!(!pow.is_valid(7, earlier), "candidate {earlier} should fail");
        }
    }

    #[test]
    fn zero_difficulty_accepts_first_candidate() {
        let pow = ProofOfWork::new(0).unwrap();
        assert_eq!(pow.find(12345), 0);
    }

    #[test]
    fn bounded_search_matches_unbounded() {
        let pow = ProofOfWork::new(2).unwrap();
        let proof = pow.find(42);
        assert_eq!(pow.find_bounded(42, proof + 1), Some(proof));
        assert_eq!(pow.find_bounded(42, proof), None);
    }

    #[test]
    fn condition_agrees_with_hex_prefix() {
        let pow = ProofOfWork::new(1).unwrap();
        for candidate in 0..200 {
            assert_eq!(
                pow.is_valid(3, candidate),
                hex_digest(3, candidate).starts_with('0')
            );
        }
    }

    #[test]
    fn difficulty_is_capped() {
        assert_eq!(
            ProofOfWork::new(65).unwrap_err(),
            PowError::DifficultyTooHigh {
                difficulty: 65,
                max: 64
            }
        );
        assert!(ProofOfWork::new(64).is_ok());
    }

    #[test]
    fn leading_zero_nibbles_counts_half_bytes() {
        let mut digest = [0xffu8; 32];
        assert_eq!(leading_zero_nibbles(&digest), 0);
        digest[0] = 0x0f;
        assert_eq!(leading_zero_nibbles(&digest), 1);
        digest[0] = 0x00;
        digest[1] = 0x01;
        assert_eq!(leading_zero_nibbles(&digest), 3);
        assert_eq!(leading_zero_nibbles(&[0u8; 32]), 64);
    }
}
