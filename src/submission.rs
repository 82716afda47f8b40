// -*- mode: rust; -*-
//
// This file is part of mpt-dalek.
// Copyright (c) 2020 isis lovecruft
// See LICENSE for licensing information.
//
// Authors:
// - isis agora lovecruft <isis@patternsinthevoid.net>

//! Client submissions and the proofs which accompany them.

use curve25519_dalek::ristretto::CompressedRistretto;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;

use sha2::Digest;
use sha2::Sha512;

use crate::errors::DecodeError;
use crate::errors::SubmissionError;
use crate::fingerprint::Fingerprint;
use crate::setup::TrustedSetup;
use crate::wire::Reader;

const COMMITMENT_LABEL: &[u8] = b"MPT-v1/commitment";
const ROOT_LABEL: &[u8] = b"MPT-v1/root";
const TRANSCRIPT_LABEL: &[u8] = b"MPT-v1/transcript";

/// The SHA-512 commitment to a witness fingerprint.
pub(crate) fn commit_to_witness(witness: &Fingerprint) -> [u8; 64] {
    let mut hash = Sha512::new();

    hash.update(COMMITMENT_LABEL);
    hash.update((witness.len() as u64).to_le_bytes());
    hash.update(witness.to_packed());

    let mut commitment = [0u8; 64];

    commitment.copy_from_slice(&hash.finalize());
    commitment
}

/// The root binding a commitment into the submission.
pub(crate) fn root_of_commitment(commitment: &[u8; 64]) -> [u8; 64] {
    let mut hash = Sha512::new();

    hash.update(ROOT_LABEL);
    hash.update(commitment);

    let mut root = [0u8; 64];

    root.copy_from_slice(&hash.finalize());
    root
}

/// The transcript hash binding every public part of a submission together.
pub(crate) fn transcript_hash(
    msgid: u64,
    root: &[u8; 64],
    commitment: &[u8; 64],
    response: &CompressedRistretto,
) -> [u8; 64] {
    let mut hash = Sha512::new();

    hash.update(TRANSCRIPT_LABEL);
    hash.update(msgid.to_le_bytes());
    hash.update(root);
    hash.update(commitment);
    hash.update(response.as_bytes());

    let mut transcript = [0u8; 64];

    transcript.copy_from_slice(&hash.finalize());
    transcript
}

/// The proof accompanying a [`Submission`].
///
/// The proof carries the witness bits themselves, so that the server can
/// recompute every public part of the submission; it attests to a correct
/// execution of the client and is auditable, but it is *not* zero-knowledge.
#[derive(Clone, Debug)]
pub struct SubmissionProof {
    /// The transcript hash binding the submission's public parts.
    pub(crate) transcript: [u8; 64],
    /// The query fingerprint, revealed for recomputation.
    pub(crate) witness: Fingerprint,
}

/// A client's masked response for one query fingerprint.
#[derive(Clone, Debug)]
pub struct Submission {
    /// The message identifier chosen by the client for this run.
    pub msgid: u64,
    /// The SHA-512 commitment to the query fingerprint.
    pub commitment: [u8; 64],
    /// The root binding the commitment.
    pub root: [u8; 64],
    /// The masked group response \\( R = g^{\sum_b (s_b + r_b)} \\), compressed.
    pub response: CompressedRistretto,
    /// The witness-carrying proof.
    pub proof: SubmissionProof,
}

impl Submission {
    /// Run the client's side of the protocol: commit to the `query`, compute
    /// the masked response over the blinded database, and bind the whole
    /// transcript under `msgid`.
    ///
    /// # Returns
    ///
    /// The [`Submission`] to send to the server, or a [`SubmissionError`] if
    /// the query does not have the length the setup's parameters require.
    pub fn create(
        setup: &TrustedSetup,
        query: Fingerprint,
        msgid: u64,
    ) -> Result<Submission, SubmissionError> {
        let params = setup.parameters();
        let lambda = params.lambda();

        if query.len() != lambda {
            return Err(SubmissionError::QueryLength { expected: lambda, actual: query.len() });
        }

        let commitment = commit_to_witness(&query);
        let root = root_of_commitment(&commitment);

        let ell = params.ell as usize;
        let mut masked_sum = Scalar::ZERO;

        for chunk_index in 0..params.chunks as usize {
            masked_sum += setup.masked_chunk(query.chunk(chunk_index, ell), chunk_index);
        }

        let response = RistrettoPoint::mul_base(&masked_sum).compress();
        let transcript = transcript_hash(msgid, &root, &commitment, &response);

        Ok(Submission {
            msgid,
            commitment,
            root,
            response,
            proof: SubmissionProof { transcript, witness: query },
        })
    }

    /// The witness fingerprint revealed by this submission's proof.
    pub fn witness(&self) -> &Fingerprint {
        &self.proof.witness
    }

    /// Serialise this submission for sending to the server.
    pub fn to_bytes(&self) -> Vec<u8> {
        let packed = self.proof.witness.to_packed();
        let mut bytes = Vec::with_capacity(236 + packed.len());

        bytes.extend_from_slice(&self.msgid.to_le_bytes());
        bytes.extend_from_slice(&self.commitment);
        bytes.extend_from_slice(&self.root);
        bytes.extend_from_slice(self.response.as_bytes());
        bytes.extend_from_slice(&self.proof.transcript);
        bytes.extend_from_slice(&(self.proof.witness.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&packed);
        bytes
    }

    /// Deserialise a submission produced by [`Submission::to_bytes`].
    ///
    /// Only the structure is checked here; whether the submission *verifies*
    /// is the server's decision, via
    /// [`verify_and_decide`](crate::verify_and_decide).
    pub fn from_bytes(bytes: &[u8]) -> Result<Submission, DecodeError> {
        let mut reader = Reader::new(bytes);

        let msgid = reader.u64_le()?;
        let commitment: [u8; 64] = reader.array()?;
        let root: [u8; 64] = reader.array()?;
        let response = CompressedRistretto(reader.array::<32>()?);
        let transcript: [u8; 64] = reader.array()?;

        let bit_len = reader.u32_le()? as usize;
        let witness = Fingerprint::from_packed(reader.take((bit_len + 7) / 8)?, bit_len)?;

        reader.finish()?;

        Ok(Submission {
            msgid,
            commitment,
            root,
            response,
            proof: SubmissionProof { transcript, witness },
        })
    }
}
