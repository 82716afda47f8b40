// -*- mode: rust; -*-
//
// This file is part of mpt-dalek.
// Copyright (c) 2020 isis lovecruft
// See LICENSE for licensing information.
//
// Authors:
// - isis agora lovecruft <isis@patternsinthevoid.net>

//! Server-side verification of submissions and the proximity decision.

use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::Identity;

use subtle::ConstantTimeEq;

use crate::errors::VerificationError;
use crate::setup::TrustedSetup;
use crate::submission::commit_to_witness;
use crate::submission::root_of_commitment;
use crate::submission::transcript_hash;
use crate::submission::Submission;

/// The server's decision for a verified submission.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decision {
    /// Some window of some database item lies strictly within the proximity
    /// threshold of the corresponding window of the witness.
    ///
    /// A match can, with negligible probability, also be reported when
    /// distinct non-zero chunk aggregates happen to cancel to a non-zero sum
    /// differently than expected; [`Decision::NoMatch`], by contrast, is
    /// exact whenever no window is proximate.
    Match,
    /// No window of any database item is proximate to the witness.
    NoMatch,
}

/// Run the server's side of the protocol: check a submission against the
/// setup and, if it verifies, strip the masks and decide proximity.
///
/// # Inputs
///
/// * The [`TrustedSetup`] bundle this server was dealt, and
/// * the [`Submission`] received from the client.
///
/// # Returns
///
/// The [`Decision`] for a well-formed submission, or the
/// [`VerificationError`] for the first check the submission failed.  The
/// checks run in a fixed order: witness length, commitment, root, response
/// recomputation, transcript hash.
pub fn verify_and_decide(
    setup: &TrustedSetup,
    submission: &Submission,
) -> Result<Decision, VerificationError> {
    let params = setup.parameters();
    let lambda = params.lambda();
    let witness = submission.witness();

    if witness.len() != lambda {
        return Err(VerificationError::WitnessLength { expected: lambda, actual: witness.len() });
    }

    let expected_commitment = commit_to_witness(witness);

    if !bool::from(expected_commitment.as_slice().ct_eq(submission.commitment.as_slice())) {
        return Err(VerificationError::CommitmentMismatch);
    }

    let expected_root = root_of_commitment(&submission.commitment);

    if !bool::from(expected_root.as_slice().ct_eq(submission.root.as_slice())) {
        return Err(VerificationError::RootMismatch);
    }

    let response = submission
        .response
        .decompress()
        .ok_or(VerificationError::MalformedResponse)?;

    // Recompute the masked response from the revealed witness.
    let ell = params.ell as usize;
    let mut masked_sum = Scalar::ZERO;

    for chunk_index in 0..params.chunks as usize {
        masked_sum += setup.masked_chunk(witness.chunk(chunk_index, ell), chunk_index);
    }

    let expected_response = RistrettoPoint::mul_base(&masked_sum).compress();

    if !bool::from(expected_response.as_bytes().ct_eq(submission.response.as_bytes())) {
        return Err(VerificationError::ResponseMismatch);
    }

    let expected_transcript = transcript_hash(
        submission.msgid,
        &submission.root,
        &submission.commitment,
        &submission.response,
    );

    if !bool::from(expected_transcript.as_slice().ct_eq(submission.proof.transcript.as_slice())) {
        return Err(VerificationError::TranscriptMismatch);
    }

    // Strip the masks: R * g^{-r_sum} is the identity exactly when every
    // chunk aggregate summed to zero, i.e. no window was proximate.
    let unmasked = response - RistrettoPoint::mul_base(setup.mask_sum());

    if unmasked == RistrettoPoint::identity() {
        Ok(Decision::NoMatch)
    } else {
        Ok(Decision::Match)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    use crate::fingerprint::Fingerprint;
    use crate::parameters::Parameters;

    #[test]
    fn close_neighbor_is_a_match() {
        let params = Parameters::new(8, 4, 3).unwrap();
        let db = vec![
            Fingerprint::from_bits(vec![0; params.lambda()]).unwrap(),
            Fingerprint::from_bits(vec![1; params.lambda()]).unwrap(),
        ];
        let mut csprng = ChaCha20Rng::seed_from_u64(7);
        let setup = TrustedSetup::new(db, params, &mut csprng).unwrap();

        let mut bits = vec![0; params.lambda()];
        bits[0] = 1;
        bits[9] = 1;
        let query = Fingerprint::from_bits(bits).unwrap();

        let submission = Submission::create(&setup, query, 42).unwrap();

        assert_eq!(verify_and_decide(&setup, &submission), Ok(Decision::Match));
    }

    #[test]
    fn distant_query_is_no_match() {
        let params = Parameters::new(8, 4, 3).unwrap();
        let db = vec![Fingerprint::from_bits(vec![0; params.lambda()]).unwrap()];
        let mut csprng = ChaCha20Rng::seed_from_u64(9);
        let setup = TrustedSetup::new(db, params, &mut csprng).unwrap();
        let query = Fingerprint::from_bits(vec![1; params.lambda()]).unwrap();

        let submission = Submission::create(&setup, query, 11).unwrap();

        assert_eq!(verify_and_decide(&setup, &submission), Ok(Decision::NoMatch));
    }

    #[test]
    fn zero_threshold_never_matches() {
        let params = Parameters::new(8, 4, 0).unwrap();
        let db = vec![Fingerprint::from_bits(vec![0; params.lambda()]).unwrap()];
        let mut csprng = ChaCha20Rng::seed_from_u64(13);
        let setup = TrustedSetup::new(db, params, &mut csprng).unwrap();

        // Even an identical query cannot be strictly closer than zero bits.
        let query = Fingerprint::from_bits(vec![0; params.lambda()]).unwrap();
        let submission = Submission::create(&setup, query, 1).unwrap();

        assert_eq!(verify_and_decide(&setup, &submission), Ok(Decision::NoMatch));
    }
}
