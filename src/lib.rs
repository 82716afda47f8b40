// -*- mode: rust; -*-
//
// This file is part of mpt-dalek.
// Copyright (c) 2020 isis lovecruft
// See LICENSE for licensing information.
//
// Authors:
// - isis agora lovecruft <isis@patternsinthevoid.net>

//! A Rust implementation of a single-shot **masked proximity test** (MPT)
//! over databases of bit-fingerprints.
//!
//! A trusted third party prepares blinded evaluation material over a database
//! of \\( n \\) fingerprints, each \\( \lambda = \ell B \\) bits long and
//! split into \\( B \\) windows of \\( \ell \\) bits.  A client then submits
//! a single masked group response for a query fingerprint, together with a
//! witness-carrying proof, and a server verifies the submission and decides
//! whether *some* window of *some* database item lies strictly within
//! Hamming distance \\( \epsilon \\) of the corresponding query window,
//! without learning which one.
//!
//! The blinding works in the exponent: for each window the client aggregates
//! \\( s_b = \sum_i \gamma_i \cdot z(d_{i,b}) \\), where \\( \gamma_i \\) is
//! a secret non-zero per-item blinder and
//! \\( z(d) = \prod_{t=\epsilon}^{\ell}(d - t) \\) vanishes exactly on the
//! non-proximate distances; each \\( s_b \\) is masked with a secret
//! \\( r_b \\) before being folded into the response
//! \\( R = g^{\sum_b (s_b + r_b)} \\).  The server strips
//! \\( g^{\sum_b r_b} \\) back off and reads the decision from whether the
//! identity remains.
//!
//! The proof object reveals the witness so the server can recompute the
//! transcript; it makes the protocol executable and auditable, but it is
//! **not** zero-knowledge.
//!
//! # Usage
//!
//! The trusted third party performs the setup over the database and deals
//! the resulting bundle to both other roles:
//!
//! ```rust
//! use mpt_dalek::Decision;
//! use mpt_dalek::Fingerprint;
//! use mpt_dalek::Parameters;
//! use mpt_dalek::Submission;
//! use mpt_dalek::TrustedSetup;
//! use mpt_dalek::verify_and_decide;
//!
//! use rand::rngs::OsRng;
//!
//! # fn do_test() -> Result<(), Box<dyn std::error::Error>> {
//! let params = Parameters::new(8, 4, 3)?;
//! let db = vec![
//!     Fingerprint::from_bits(vec![0; params.lambda()])?,
//!     Fingerprint::from_bits(vec![1; params.lambda()])?,
//! ];
//! let setup = TrustedSetup::new(db, params, &mut OsRng)?;
//!
//! // The client submits a masked response for a query which differs from
//! // the all-zeroes item in only two bits.
//! let mut bits = vec![0; params.lambda()];
//! bits[0] = 1;
//! bits[9] = 1;
//! let query = Fingerprint::from_bits(bits)?;
//!
//! let submission = Submission::create(&setup, query, 42)?;
//!
//! // The server verifies the submission and decides proximity.
//! assert_eq!(verify_and_decide(&setup, &submission)?, Decision::Match);
//! # Ok(()) } fn main() { assert!(do_test().is_ok()); }
//! ```
//!
//! A query far from every database item verifies just the same, but the
//! unmasked response collapses to the identity:
//!
//! ```rust
//! # use mpt_dalek::Decision;
//! # use mpt_dalek::Fingerprint;
//! # use mpt_dalek::Parameters;
//! # use mpt_dalek::Submission;
//! # use mpt_dalek::TrustedSetup;
//! # use mpt_dalek::verify_and_decide;
//! #
//! # use rand::rngs::OsRng;
//! #
//! # fn do_test() -> Result<(), Box<dyn std::error::Error>> {
//! # let params = Parameters::new(8, 4, 3)?;
//! # let db = vec![Fingerprint::from_bits(vec![0; params.lambda()])?];
//! # let setup = TrustedSetup::new(db, params, &mut OsRng)?;
//! let query = Fingerprint::from_bits(vec![1; params.lambda()])?;
//! let submission = Submission::create(&setup, query, 43)?;
//!
//! assert_eq!(verify_and_decide(&setup, &submission)?, Decision::NoMatch);
//! # Ok(()) } fn main() { assert!(do_test().is_ok()); }
//! ```
//!
//! Setups and submissions have fixed-layout byte encodings
//! ([`TrustedSetup::to_bytes`], [`Submission::to_bytes`]) for dealing the
//! bundle out-of-band and for sending submissions over a wire.

#![warn(future_incompatible)]
#![deny(missing_docs)]

pub mod errors;
pub mod fingerprint;
pub mod parameters;
pub mod setup;
pub mod submission;
pub mod verification;

mod wire;

pub use fingerprint::Fingerprint;
pub use parameters::Parameters;
pub use setup::TrustedSetup;
pub use submission::Submission;
pub use submission::SubmissionProof;
pub use verification::verify_and_decide;
pub use verification::Decision;
