// -*- mode: rust; -*-
//
// This file is part of mpt-dalek.
// Copyright (c) 2020 isis lovecruft
// See LICENSE for licensing information.
//
// Authors:
// - isis agora lovecruft <isis@patternsinthevoid.net>

//! Runtime errors which may occur during an instance of a masked proximity test.

use thiserror::Error;

/// Protocol parameters were malformed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum ParameterError {
    /// A chunk window must contain at least one bit.
    #[error("a chunk window must contain at least one bit")]
    EmptyWindow,
    /// A fingerprint must consist of at least one chunk.
    #[error("a fingerprint must consist of at least one chunk")]
    NoChunks,
    /// The proximity threshold cannot exceed the window size.
    #[error("the proximity threshold {epsilon} exceeds the window size {ell}")]
    ThresholdTooLarge {
        /// The offending threshold.
        epsilon: u32,
        /// The window size it was checked against.
        ell: u32,
    },
}

/// A fingerprint could not be constructed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum FingerprintError {
    /// A bit value other than 0 or 1 was supplied.
    #[error("bit {index} has value {value}, expected 0 or 1")]
    InvalidBit {
        /// The position of the offending bit.
        index: usize,
        /// The value found there.
        value: u8,
    },
    /// A character other than '0' or '1' was supplied.
    #[error("character {index} is not '0' or '1'")]
    InvalidCharacter {
        /// The position of the offending character.
        index: usize,
    },
    /// A packed encoding had the wrong number of bytes for its bit length.
    #[error("expected {expected} packed bytes for {bits} bits, got {actual}")]
    PackedLength {
        /// The number of bits the encoding claims to hold.
        bits: usize,
        /// The number of bytes that bit length requires.
        expected: usize,
        /// The number of bytes found.
        actual: usize,
    },
    /// Unused padding bits in a packed encoding must be zero.
    #[error("padding bits past the end of the fingerprint must be zero")]
    NonZeroPadding,
}

/// The trusted setup could not be performed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum SetupError {
    /// The protocol parameters did not validate.
    #[error(transparent)]
    InvalidParameters(#[from] ParameterError),
    /// A setup over an empty database can never report a match.
    #[error("the fingerprint database is empty")]
    EmptyDatabase,
    /// Every database item must be exactly lambda bits long.
    #[error("database item {index} is {actual} bits, expected {expected}")]
    ItemLength {
        /// The position of the offending item.
        index: usize,
        /// The fingerprint length the parameters require.
        expected: usize,
        /// The length of the item found there.
        actual: usize,
    },
}

/// A submission could not be created.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum SubmissionError {
    /// The query must be exactly lambda bits long.
    #[error("the query is {actual} bits, expected {expected}")]
    QueryLength {
        /// The fingerprint length the parameters require.
        expected: usize,
        /// The length of the query.
        actual: usize,
    },
}

/// A submission was rejected by the server.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum VerificationError {
    /// The witness must be exactly lambda bits long.
    #[error("the witness is {actual} bits, expected {expected}")]
    WitnessLength {
        /// The fingerprint length the parameters require.
        expected: usize,
        /// The length of the witness.
        actual: usize,
    },
    /// The witness does not open the commitment.
    #[error("the witness does not open the commitment")]
    CommitmentMismatch,
    /// The root does not bind the commitment.
    #[error("the root does not bind the commitment")]
    RootMismatch,
    /// The masked response is not a valid group element encoding.
    #[error("the masked response is not a valid group element")]
    MalformedResponse,
    /// The masked response was not derived from the witness.
    #[error("the masked response was not derived from the witness")]
    ResponseMismatch,
    /// The transcript hash does not bind the submission.
    #[error("the transcript hash does not bind the submission")]
    TranscriptMismatch,
}

/// A wire encoding could not be decoded.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum DecodeError {
    /// The input ended before the encoding did.
    #[error("unexpected end of input")]
    Truncated,
    /// The encoding ended before the input did.
    #[error("{0} trailing bytes after the encoding")]
    TrailingBytes(usize),
    /// A scalar encoding was not canonical.
    #[error("a scalar encoding was not canonical")]
    NonCanonicalScalar,
    /// An item blinder decoded to zero.
    #[error("an item blinder decoded to zero")]
    ZeroBlinder,
    /// The encoded parameters did not validate.
    #[error(transparent)]
    InvalidParameters(#[from] ParameterError),
    /// An encoded fingerprint did not validate.
    #[error(transparent)]
    InvalidFingerprint(#[from] FingerprintError),
    /// The encoded database did not validate.
    #[error(transparent)]
    InvalidDatabase(#[from] SetupError),
}
