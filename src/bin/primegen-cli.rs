//! # primegen-cli — command-line front end for the prime engine
//!
//! Thin demonstrator over [`primeforge`]: not part of the library's public
//! contract, just a way to drive it from a shell. Every subcommand maps to
//! one library entry point.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use primeforge::digest::Sha256Digest;
use rug::Integer;

#[derive(Parser)]
#[command(name = "primegen-cli", about = "FIPS 186-4 prime generation and primality testing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the plain Miller-Rabin test on a candidate
    Test {
        /// Candidate to test, decimal
        candidate: String,
        /// Number of Miller-Rabin rounds
        #[arg(long, default_value_t = 20)]
        rounds: i64,
    },
    /// Run the enhanced Miller-Rabin test, reporting a composite witness when found
    EnhancedTest {
        /// Candidate to test, decimal
        candidate: String,
        /// Number of Miller-Rabin rounds
        #[arg(long, default_value_t = 20)]
        rounds: i64,
    },
    /// Check whether a candidate has any small prime factor <= 211
    SieveCheck {
        /// Candidate to check, decimal
        candidate: String,
    },
    /// Exact primality test for a value that fits in a u32
    IsPrime32 {
        /// Value to test
        value: u32,
    },
    /// Generate a provable prime via Shawe-Taylor, seeded with SHA-256
    Generate {
        /// Target bit length
        #[arg(long)]
        length: u32,
        /// Initial seed, as a hex string
        #[arg(long)]
        seed_hex: String,
    },
}

fn main() -> Result<()> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt().json().with_target(false).init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();

    match &cli.command {
        Commands::Test { candidate, rounds } => {
            let n = parse_candidate(candidate)?;
            let mut rng = rand::thread_rng();
            let result = primeforge::is_probable_prime(&n, &mut rng, *rounds)
                .context("is_probable_prime failed")?;
            println!("{result}");
        }
        Commands::EnhancedTest { candidate, rounds } => {
            let n = parse_candidate(candidate)?;
            let mut rng = rand::thread_rng();
            let result = primeforge::enhanced_probable_prime_test(&n, &mut rng, *rounds)
                .context("enhanced_probable_prime_test failed")?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::SieveCheck { candidate } => {
            let n = parse_candidate(candidate)?;
            println!("{}", primeforge::has_any_small_factors(&n));
        }
        Commands::IsPrime32 { value } => {
            println!("{}", primeforge::primality32::is_prime_u32(*value));
        }
        Commands::Generate { length, seed_hex } => {
            let seed = parse_hex(seed_hex)?;
            let mut hash = Sha256Digest::new();
            let out = primeforge::generate_random_prime(&mut hash, *length, &seed)
                .context("generate_random_prime failed")?;
            println!("prime: {}", out.prime);
            println!("prime_seed: {}", hex_encode(&out.prime_seed));
            println!("prime_gen_counter: {}", out.prime_gen_counter);
        }
    }

    Ok(())
}

fn parse_candidate(s: &str) -> Result<Integer> {
    Integer::from_str_radix(s, 10).with_context(|| format!("invalid decimal integer: {s}"))
}

fn parse_hex(s: &str) -> Result<Vec<u8>> {
    if s.len() % 2 != 0 {
        anyhow::bail!("hex string must have an even number of digits");
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).context("invalid hex digit"))
        .collect()
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
