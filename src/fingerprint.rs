// -*- mode: rust; -*-
//
// This file is part of mpt-dalek.
// Copyright (c) 2020 isis lovecruft
// See LICENSE for licensing information.
//
// Authors:
// - isis agora lovecruft <isis@patternsinthevoid.net>

//! Bit-fingerprints over which proximity is tested.

use std::str::FromStr;

use crate::errors::FingerprintError;

/// A fingerprint: a fixed-length vector of bits.
///
/// Both the items of the database handed to the trusted third party and the
/// query a client submits a masked response for are fingerprints of
/// \\( \lambda \\) bits, split into consecutive windows for the per-chunk
/// distance tests.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fingerprint {
    bits: Vec<u8>,
}

impl Fingerprint {
    /// Construct a fingerprint from a vector of bits, each of which must be
    /// 0 or 1.
    pub fn from_bits(bits: Vec<u8>) -> Result<Fingerprint, FingerprintError> {
        for (index, bit) in bits.iter().enumerate() {
            if *bit > 1 {
                return Err(FingerprintError::InvalidBit { index, value: *bit });
            }
        }
        Ok(Fingerprint { bits })
    }

    /// The number of bits in this fingerprint.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether this fingerprint contains no bits at all.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The bits of this fingerprint, one byte per bit.
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// The `index`th window of `ell` consecutive bits.
    pub(crate) fn chunk(&self, index: usize, ell: usize) -> &[u8] {
        let start = index * ell;

        &self.bits[start..start + ell]
    }

    /// Pack the bits into bytes, least significant bit first, the final
    /// partial byte (if any) zero-padded.
    pub fn to_packed(&self) -> Vec<u8> {
        let mut packed = vec![0u8; (self.bits.len() + 7) / 8];

        for (index, bit) in self.bits.iter().enumerate() {
            packed[index / 8] |= bit << (index % 8);
        }
        packed
    }

    /// Unpack `bit_len` bits from a packed encoding produced by
    /// [`Fingerprint::to_packed`].
    ///
    /// The encoding must be exactly \\( \lceil \mathtt{bit\\_len} / 8 \rceil \\)
    /// bytes, and any padding bits past `bit_len` must be zero, so that each
    /// fingerprint has a unique packed form.
    pub fn from_packed(packed: &[u8], bit_len: usize) -> Result<Fingerprint, FingerprintError> {
        let expected = (bit_len + 7) / 8;

        if packed.len() != expected {
            return Err(FingerprintError::PackedLength {
                bits: bit_len,
                expected,
                actual: packed.len(),
            });
        }
        if bit_len % 8 != 0 {
            let padding = packed[expected - 1] >> (bit_len % 8);

            if padding != 0 {
                return Err(FingerprintError::NonZeroPadding);
            }
        }

        let mut bits = Vec::with_capacity(bit_len);

        for index in 0..bit_len {
            bits.push((packed[index / 8] >> (index % 8)) & 1);
        }
        Ok(Fingerprint { bits })
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintError;

    /// Parse a fingerprint from a string of '0' and '1' characters.
    fn from_str(s: &str) -> Result<Fingerprint, FingerprintError> {
        let mut bits = Vec::with_capacity(s.len());

        for (index, character) in s.chars().enumerate() {
            match character {
                '0' => bits.push(0),
                '1' => bits.push(1),
                _ => return Err(FingerprintError::InvalidCharacter { index }),
            }
        }
        Ok(Fingerprint { bits })
    }
}

/// The Hamming distance between two equal-length windows of bits.
pub(crate) fn hamming(x: &[u8], y: &[u8]) -> u32 {
    x.iter().zip(y.iter()).filter(|(a, b)| a != b).count() as u32
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn non_binary_bit_is_rejected() {
        assert_eq!(Fingerprint::from_bits(vec![0, 1, 2]),
                   Err(FingerprintError::InvalidBit { index: 2, value: 2 }));
    }

    #[test]
    fn parses_from_a_bitstring() {
        let fingerprint: Fingerprint = "0110".parse().unwrap();

        assert_eq!(fingerprint.bits(), &[0, 1, 1, 0]);
    }

    #[test]
    fn non_binary_character_is_rejected() {
        let result = Fingerprint::from_str("01x0");

        assert_eq!(result, Err(FingerprintError::InvalidCharacter { index: 2 }));
    }

    #[test]
    fn packed_roundtrip_with_partial_final_byte() {
        let fingerprint = Fingerprint::from_bits(vec![1, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0]).unwrap();
        let packed = fingerprint.to_packed();

        assert_eq!(packed.len(), 2);
        assert_eq!(Fingerprint::from_packed(&packed, 11).unwrap(), fingerprint);
    }

    #[test]
    fn nonzero_padding_is_rejected() {
        let result = Fingerprint::from_packed(&[0xff, 0xff], 11);

        assert_eq!(result, Err(FingerprintError::NonZeroPadding));
    }

    #[test]
    fn wrong_packed_length_is_rejected() {
        let result = Fingerprint::from_packed(&[0x00], 11);

        assert_eq!(result,
                   Err(FingerprintError::PackedLength { bits: 11, expected: 2, actual: 1 }));
    }

    #[test]
    fn hamming_counts_differing_positions() {
        assert_eq!(hamming(&[0, 1, 1, 0], &[1, 1, 0, 0]), 2);
        assert_eq!(hamming(&[0, 0], &[0, 0]), 0);
    }
}
