// -*- mode: rust; -*-
//
// This file is part of mpt-dalek.
// Copyright (c) 2020 isis lovecruft
// See LICENSE for licensing information.
//
// Authors:
// - isis agora lovecruft <isis@patternsinthevoid.net>

//! Configurable parameters for an instance of a masked proximity test.

use crate::errors::ParameterError;

/// The configuration parameters for conducting a run of the masked proximity
/// test protocol.
///
/// A fingerprint consists of `chunks` consecutive windows of `ell` bits each,
/// for a total length of \\( \lambda = \ell B \\) bits.  A database item is
/// considered *proximate* to a query when the Hamming distance between some
/// pair of corresponding windows is strictly below `epsilon`.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct Parameters {
    /// The number of bits in each chunk window.
    pub ell: u32,
    /// The number of chunk windows in a fingerprint.
    pub chunks: u32,
    /// The proximity threshold, in bits.
    ///
    /// Note that a threshold of zero is degenerate: no Hamming distance is
    /// strictly below zero, so no submission will ever report a match.
    pub epsilon: u32,
}

impl Parameters {
    /// Construct parameters, checking the protocol invariants.
    ///
    /// # Returns
    ///
    /// The validated [`Parameters`], or a [`ParameterError`] naming the
    /// violated invariant.
    pub fn new(ell: u32, chunks: u32, epsilon: u32) -> Result<Parameters, ParameterError> {
        let parameters = Parameters { ell, chunks, epsilon };

        parameters.validate()?;
        Ok(parameters)
    }

    /// Check the protocol invariants: `ell > 0`, `chunks > 0`, and
    /// `epsilon <= ell`.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.ell == 0 {
            return Err(ParameterError::EmptyWindow);
        }
        if self.chunks == 0 {
            return Err(ParameterError::NoChunks);
        }
        if self.epsilon > self.ell {
            return Err(ParameterError::ThresholdTooLarge { epsilon: self.epsilon, ell: self.ell });
        }
        Ok(())
    }

    /// The total number of bits in a fingerprint.
    pub fn lambda(&self) -> usize {
        self.ell as usize * self.chunks as usize
    }
}
