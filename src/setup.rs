// -*- mode: rust; -*-
//
// This file is part of mpt-dalek.
// Copyright (c) 2020 isis lovecruft
// See LICENSE for licensing information.
//
// Authors:
// - isis agora lovecruft <isis@patternsinthevoid.net>

//! The trusted third party's setup phase of the masked proximity test.

use curve25519_dalek::scalar::Scalar;

use rand_core::CryptoRng;
use rand_core::RngCore;

use zeroize::Zeroize;

use crate::errors::DecodeError;
use crate::errors::SetupError;
use crate::fingerprint::hamming;
use crate::fingerprint::Fingerprint;
use crate::parameters::Parameters;
use crate::wire::Reader;

/// Sample a uniformly random scalar, rejecting zero.
fn random_nonzero_scalar<R>(csprng: &mut R) -> Scalar
where
    R: RngCore + CryptoRng,
{
    loop {
        let scalar = Scalar::random(csprng);

        if scalar != Scalar::ZERO {
            return scalar;
        }
    }
}

/// The evaluation material produced by the trusted third party.
///
/// The bundle is dealt to both the client and the server: the client needs it
/// to compute its masked response over the blinded database, and the server
/// needs it to recompute that response from the revealed witness and to strip
/// the masks off for the final decision.  The per-item blinders and per-chunk
/// masks are secret with respect to everyone *outside* the protocol, and are
/// wiped from memory when the bundle is dropped.
pub struct TrustedSetup {
    /// The parameters this setup was performed for.
    params: Parameters,
    /// One non-zero blinder \\( \gamma_i \\) per database item.
    gamma: Vec<Scalar>,
    /// One mask \\( r_b \\) per chunk window.
    masks: Vec<Scalar>,
    /// \\( \sum_b r_b \\), used by the server to strip the masks.
    mask_sum: Scalar,
    /// The fingerprint database itself.
    db: Vec<Fingerprint>,
}

impl Zeroize for TrustedSetup {
    fn zeroize(&mut self) {
        self.gamma.zeroize();
        self.masks.zeroize();
        self.mask_sum.zeroize();
    }
}

impl Drop for TrustedSetup {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl TrustedSetup {
    /// Perform the trusted setup over a fingerprint database.
    ///
    /// # Inputs
    ///
    /// * The fingerprint `db` to test proximity against,
    /// * the protocol instance [`Parameters`], and
    /// * a cryptographically secure PRNG.
    ///
    /// # Returns
    ///
    /// The [`TrustedSetup`] bundle to deal to the client and the server, or a
    /// [`SetupError`] if the parameters or the database were malformed.
    pub fn new<R>(
        db: Vec<Fingerprint>,
        params: Parameters,
        csprng: &mut R,
    ) -> Result<TrustedSetup, SetupError>
    where
        R: RngCore + CryptoRng,
    {
        params.validate()?;

        if db.is_empty() {
            return Err(SetupError::EmptyDatabase);
        }

        let lambda = params.lambda();

        for (index, item) in db.iter().enumerate() {
            if item.len() != lambda {
                return Err(SetupError::ItemLength { index, expected: lambda, actual: item.len() });
            }
        }

        // Step 1: Sample a non-zero blinder for every database item, so that
        //         a single proximate item cannot be cancelled out of the
        //         aggregate by a zero coefficient.
        let mut gamma: Vec<Scalar> = Vec::with_capacity(db.len());

        for _ in 0..db.len() {
            gamma.push(random_nonzero_scalar(csprng));
        }

        // Step 2: Sample one mask per chunk window.  These may be zero; only
        //         their sum matters for unmasking.
        let mut masks: Vec<Scalar> = Vec::with_capacity(params.chunks as usize);

        for _ in 0..params.chunks {
            masks.push(Scalar::random(csprng));
        }

        let mask_sum = masks.iter().sum();

        Ok(TrustedSetup { params, gamma, masks, mask_sum, db })
    }

    /// The parameters this setup was performed for.
    pub fn parameters(&self) -> Parameters {
        self.params
    }

    /// The number of fingerprints in the database.
    pub fn database_len(&self) -> usize {
        self.db.len()
    }

    pub(crate) fn mask_sum(&self) -> &Scalar {
        &self.mask_sum
    }

    /// Evaluate the window polynomial
    /// \\( z(d) = \prod_{t=\epsilon}^{\ell} (d - t) \\).
    ///
    /// Since a window's Hamming distance always lies in \\( [0, \ell] \\),
    /// the product is zero exactly when \\( d \geq \epsilon \\): only windows
    /// strictly closer than the threshold contribute to the aggregate.
    pub(crate) fn window_polynomial(&self, distance: u32) -> Scalar {
        let d = Scalar::from(distance as u64);
        let mut acc = Scalar::ONE;

        for t in self.params.epsilon..=self.params.ell {
            acc *= d - Scalar::from(t as u64);
        }
        acc
    }

    /// The blinded aggregate
    /// \\( s_b = \sum_i \gamma_i \cdot z(\mathrm{ham}(q_b, d_{i,b})) \\) of
    /// every database item's window `chunk_index` against the query window.
    pub(crate) fn chunk_aggregate(&self, query_chunk: &[u8], chunk_index: usize) -> Scalar {
        let ell = self.params.ell as usize;
        let mut acc = Scalar::ZERO;

        for (item, gamma) in self.db.iter().zip(self.gamma.iter()) {
            let distance = hamming(query_chunk, item.chunk(chunk_index, ell));

            acc += gamma * self.window_polynomial(distance);
        }
        acc
    }

    /// The chunk aggregate with that chunk's mask folded in.
    pub(crate) fn masked_chunk(&self, query_chunk: &[u8], chunk_index: usize) -> Scalar {
        self.chunk_aggregate(query_chunk, chunk_index) + self.masks[chunk_index]
    }

    /// Serialise this setup bundle for dealing to the client and the server.
    pub fn to_bytes(&self) -> Vec<u8> {
        let lambda = self.params.lambda();
        let packed_len = (lambda + 7) / 8;
        let capacity = 16 + 32 * (self.gamma.len() + self.masks.len()) + packed_len * self.db.len();
        let mut bytes = Vec::with_capacity(capacity);

        bytes.extend_from_slice(&self.params.ell.to_le_bytes());
        bytes.extend_from_slice(&self.params.chunks.to_le_bytes());
        bytes.extend_from_slice(&self.params.epsilon.to_le_bytes());
        bytes.extend_from_slice(&(self.db.len() as u32).to_le_bytes());

        for gamma in self.gamma.iter() {
            bytes.extend_from_slice(&gamma.to_bytes());
        }
        for mask in self.masks.iter() {
            bytes.extend_from_slice(&mask.to_bytes());
        }
        for item in self.db.iter() {
            bytes.extend_from_slice(&item.to_packed());
        }
        bytes
    }

    /// Deserialise a setup bundle produced by [`TrustedSetup::to_bytes`].
    ///
    /// Every scalar must be canonical, every item blinder non-zero, and the
    /// parameters and database must satisfy the same invariants
    /// [`TrustedSetup::new`] enforces.
    pub fn from_bytes(bytes: &[u8]) -> Result<TrustedSetup, DecodeError> {
        let mut reader = Reader::new(bytes);

        let ell = reader.u32_le()?;
        let chunks = reader.u32_le()?;
        let epsilon = reader.u32_le()?;
        let params = Parameters::new(ell, chunks, epsilon)?;

        let count = reader.u32_le()? as usize;

        if count == 0 {
            return Err(DecodeError::InvalidDatabase(SetupError::EmptyDatabase));
        }
        // Bound the allocations below by the input length before trusting
        // the untrusted counts.
        let scalars = count.saturating_add(chunks as usize);

        if reader.remaining() < scalars.saturating_mul(32) {
            return Err(DecodeError::Truncated);
        }

        let mut gamma: Vec<Scalar> = Vec::with_capacity(count);

        for _ in 0..count {
            let scalar = read_scalar(&mut reader)?;

            if scalar == Scalar::ZERO {
                return Err(DecodeError::ZeroBlinder);
            }
            gamma.push(scalar);
        }

        let mut masks: Vec<Scalar> = Vec::with_capacity(chunks as usize);

        for _ in 0..chunks {
            masks.push(read_scalar(&mut reader)?);
        }

        let lambda = params.lambda();
        let packed_len = (lambda + 7) / 8;
        let mut db: Vec<Fingerprint> = Vec::with_capacity(count);

        for _ in 0..count {
            db.push(Fingerprint::from_packed(reader.take(packed_len)?, lambda)?);
        }
        reader.finish()?;

        let mask_sum = masks.iter().sum();

        Ok(TrustedSetup { params, gamma, masks, mask_sum, db })
    }
}

fn read_scalar(reader: &mut Reader<'_>) -> Result<Scalar, DecodeError> {
    let bytes: [u8; 32] = reader.array()?;

    Option::<Scalar>::from(Scalar::from_canonical_bytes(bytes)).ok_or(DecodeError::NonCanonicalScalar)
}

#[cfg(test)]
mod test {
    use super::*;

    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    fn tiny_setup(seed: u64) -> TrustedSetup {
        let params = Parameters::new(8, 4, 3).unwrap();
        let db = vec![
            Fingerprint::from_bits(vec![0; params.lambda()]).unwrap(),
            Fingerprint::from_bits(vec![1; params.lambda()]).unwrap(),
        ];
        let mut csprng = ChaCha20Rng::seed_from_u64(seed);

        TrustedSetup::new(db, params, &mut csprng).unwrap()
    }

    #[test]
    fn item_blinders_are_nonzero() {
        let setup = tiny_setup(7);

        assert!(setup.gamma.iter().all(|gamma| *gamma != Scalar::ZERO));
    }

    #[test]
    fn mask_sum_matches_the_masks() {
        let setup = tiny_setup(9);
        let sum: Scalar = setup.masks.iter().sum();

        assert_eq!(setup.mask_sum, sum);
    }

    #[test]
    fn window_polynomial_vanishes_at_and_past_the_threshold() {
        let setup = tiny_setup(11);

        for distance in 3..=8 {
            assert_eq!(setup.window_polynomial(distance), Scalar::ZERO);
        }
        for distance in 0..3 {
            assert_ne!(setup.window_polynomial(distance), Scalar::ZERO);
        }
    }

    #[test]
    fn empty_database_is_rejected() {
        let params = Parameters::new(8, 4, 3).unwrap();
        let mut csprng = ChaCha20Rng::seed_from_u64(1);
        let result = TrustedSetup::new(vec![], params, &mut csprng);

        assert!(matches!(result, Err(SetupError::EmptyDatabase)));
    }

    #[test]
    fn short_database_item_is_rejected() {
        let params = Parameters::new(8, 4, 3).unwrap();
        let db = vec![
            Fingerprint::from_bits(vec![0; params.lambda()]).unwrap(),
            Fingerprint::from_bits(vec![0; 5]).unwrap(),
        ];
        let mut csprng = ChaCha20Rng::seed_from_u64(1);
        let result = TrustedSetup::new(db, params, &mut csprng);

        assert!(matches!(result,
                         Err(SetupError::ItemLength { index: 1, expected: 32, actual: 5 })));
    }

    #[test]
    fn bundle_roundtrips_through_bytes() {
        let setup = tiny_setup(13);
        let bytes = setup.to_bytes();
        let reloaded = TrustedSetup::from_bytes(&bytes).unwrap();

        assert_eq!(reloaded.to_bytes(), bytes);
    }

    #[test]
    fn zeroed_blinder_is_rejected_on_decode() {
        let setup = tiny_setup(17);
        let mut bytes = setup.to_bytes();

        // The first blinder sits just past the parameter and count header.
        for byte in bytes[16..48].iter_mut() {
            *byte = 0;
        }
        assert!(matches!(TrustedSetup::from_bytes(&bytes), Err(DecodeError::ZeroBlinder)));
    }

    #[test]
    fn truncated_bundle_is_rejected() {
        let setup = tiny_setup(19);
        let bytes = setup.to_bytes();

        assert!(matches!(TrustedSetup::from_bytes(&bytes[..bytes.len() - 1]),
                         Err(DecodeError::Truncated)));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let setup = tiny_setup(23);
        let mut bytes = setup.to_bytes();

        bytes.push(0);
        assert!(matches!(TrustedSetup::from_bytes(&bytes), Err(DecodeError::TrailingBytes(1))));
    }
}
