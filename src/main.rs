// -*- mode: rust; -*-
//
// This file is part of mpt-dalek.
// Copyright (c) 2020 isis lovecruft
// See LICENSE for licensing information.
//
// Authors:
// - isis agora lovecruft <isis@patternsinthevoid.net>

//! Command-line tool for running masked proximity tests over file artifacts.

use anyhow::Context;
use clap::Parser;
use log::{info, LevelFilter};
use rand::rngs::OsRng;
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use std::path::PathBuf;

use mpt_dalek::{verify_and_decide, Decision, Fingerprint, Parameters, Submission, TrustedSetup};

/// Command-line interface for the masked proximity test tool
#[derive(clap::Parser, Debug)]
#[clap(name = "mpt", version, about = "Masked proximity testing over fingerprint databases", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[clap(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    /// Subcommand to execute
    #[clap(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the trusted setup over a fingerprint database
    Setup {
        /// Path to the database file, one 0/1 fingerprint string per line
        #[clap(short, long)]
        db: PathBuf,

        /// Bits per chunk window
        #[clap(long, default_value_t = 16)]
        ell: u32,

        /// Number of chunk windows per fingerprint
        #[clap(long, default_value_t = 16)]
        chunks: u32,

        /// Proximity threshold in bits
        #[clap(long, default_value_t = 6)]
        epsilon: u32,

        /// Derive the setup randomness from a fixed seed instead of the OS
        #[clap(long)]
        seed: Option<u64>,

        /// Output file for the setup bundle (default: setup.bin)
        #[clap(short, long, default_value = "setup.bin")]
        out: PathBuf,
    },

    /// Create a masked submission for a query fingerprint
    Submit {
        /// Path to the setup bundle
        #[clap(short, long, default_value = "setup.bin")]
        setup: PathBuf,

        /// The query fingerprint as a 0/1 string
        #[clap(short, long)]
        query: String,

        /// Message identifier to bind into the submission
        #[clap(short, long)]
        msgid: u64,

        /// Output file for the submission (default: submission.bin)
        #[clap(short, long, default_value = "submission.bin")]
        out: PathBuf,
    },

    /// Verify a submission and print the proximity decision
    Verify {
        /// Path to the setup bundle
        #[clap(short, long, default_value = "setup.bin")]
        setup: PathBuf,

        /// Path to the submission file
        #[clap(long, default_value = "submission.bin")]
        submission: PathBuf,
    },
}

fn read_database(path: &PathBuf) -> anyhow::Result<Vec<Fingerprint>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read database: {}", path.display()))?;
    let mut db = Vec::new();

    for (number, line) in contents.lines().enumerate() {
        let line = line.trim();

        if line.is_empty() {
            continue;
        }
        let fingerprint = line
            .parse::<Fingerprint>()
            .with_context(|| format!("Bad fingerprint on line {}", number + 1))?;

        db.push(fingerprint);
    }
    Ok(db)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.debug {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Setup { db, ell, chunks, epsilon, seed, out } => {
            info!("Running trusted setup over {:?}", db);
            let params = Parameters::new(ell, chunks, epsilon)
                .context("Invalid protocol parameters")?;
            let database = read_database(&db)?;

            info!("Database holds {} fingerprints of {} bits", database.len(), params.lambda());
            let setup = match seed {
                Some(seed) => {
                    let mut csprng = ChaCha20Rng::seed_from_u64(seed);
                    TrustedSetup::new(database, params, &mut csprng)
                }
                None => TrustedSetup::new(database, params, &mut OsRng),
            }
            .context("Trusted setup failed")?;

            std::fs::write(&out, setup.to_bytes())
                .with_context(|| format!("Failed to write setup bundle: {}", out.display()))?;
            println!("Setup bundle written to {}", out.display());
        }
        Commands::Submit { setup, query, msgid, out } => {
            info!("Creating submission with msgid {}", msgid);
            let bundle_bytes = std::fs::read(&setup)
                .with_context(|| format!("Failed to read setup bundle: {}", setup.display()))?;
            let bundle = TrustedSetup::from_bytes(&bundle_bytes)
                .context("Failed to decode setup bundle")?;

            let query = query
                .parse::<Fingerprint>()
                .context("Bad query fingerprint")?;
            let submission = Submission::create(&bundle, query, msgid)
                .context("Failed to create submission")?;

            std::fs::write(&out, submission.to_bytes())
                .with_context(|| format!("Failed to write submission: {}", out.display()))?;
            println!("commitment: {}", hex::encode(submission.commitment));
            println!("Submission written to {}", out.display());
        }
        Commands::Verify { setup, submission } => {
            info!("Verifying submission");
            let bundle_bytes = std::fs::read(&setup)
                .with_context(|| format!("Failed to read setup bundle: {}", setup.display()))?;
            let bundle = TrustedSetup::from_bytes(&bundle_bytes)
                .context("Failed to decode setup bundle")?;

            let submission_bytes = std::fs::read(&submission)
                .with_context(|| format!("Failed to read submission: {}", submission.display()))?;
            let submission = Submission::from_bytes(&submission_bytes)
                .context("Failed to decode submission")?;

            let decision = verify_and_decide(&bundle, &submission)
                .context("Submission rejected")?;

            match decision {
                Decision::Match => println!("✓ proximity match"),
                Decision::NoMatch => println!("✗ no match within threshold"),
            }
        }
    }
    Ok(())
}
