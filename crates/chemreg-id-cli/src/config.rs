use std::path::PathBuf;

use anyhow::{Context, bail};
use chemreg_id::{AllocatorConfig, DEFAULT_INCREMENT_START, DEFAULT_PREFIX, Domain};
use clap::{Parser, Subcommand};

/// Command-line arguments for the `chemreg-id` binary.
///
/// The global flags describe the identifier layout every subcommand works
/// with. Prefix and start payload can also come from the environment (or a
/// `.env` file) so that a deployment's settings are picked up unchanged.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "chemreg-id",
    version,
    about = "Inspect, validate and recover ChemReg identifiers"
)]
pub struct CliArgs {
    /// Identifier domain: compound, substance or record (or CID, SID, RID).
    #[arg(long, global = true, default_value_t = Domain::Compound)]
    pub domain: Domain,

    /// Uppercase code written before the domain tag.
    ///
    /// Environment variable: `CHEMREG_ID_PREFIX`
    #[arg(long, global = true, env = "CHEMREG_ID_PREFIX", default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// First payload issued when no valid identifier has been persisted.
    ///
    /// Environment variable: `CHEMREG_ID_INCREMENT_START`
    #[arg(
        long,
        global = true,
        env = "CHEMREG_ID_INCREMENT_START",
        default_value_t = DEFAULT_INCREMENT_START
    )]
    pub increment_start: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the checksum digit of a payload.
    Checksum { payload: u64 },

    /// Print the identifier for an explicit payload.
    Build { payload: u64 },

    /// Print payload, checksum and verdict for each identifier.
    ///
    /// Exits with status 1 if any identifier is invalid.
    Inspect {
        #[arg(required = true)]
        identifiers: Vec<String>,
    },

    /// Validate registry numbers of the form NNNNNNN-NN-R.
    ///
    /// Exits with status 1 if any number is invalid.
    Registry {
        #[arg(required = true)]
        numbers: Vec<String>,
    },

    /// Recover the last issued payload from a file of identifiers, one per
    /// line.
    Recover {
        #[arg(long)]
        file: PathBuf,
    },

    /// Seed a scratch counter from a file of identifiers and print the next
    /// identifiers it would issue.
    Mint {
        #[arg(long)]
        file: PathBuf,

        #[arg(long, default_value_t = 1)]
        count: usize,
    },
}

/// Validated settings for one invocation.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub allocator: AllocatorConfig,
    pub command: Command,
}

impl TryFrom<CliArgs> for RunConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if let Command::Mint { count: 0, .. } = args.command {
            bail!("--count must be greater than 0");
        }

        let allocator = AllocatorConfig::new(args.domain)
            .with_prefix(args.prefix)
            .with_increment_start(args.increment_start);
        allocator
            .validate()
            .context("invalid identifier configuration")?;

        Ok(Self {
            allocator,
            command: args.command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<RunConfig> {
        let argv = core::iter::once("chemreg-id").chain(args.iter().copied());
        let args = CliArgs::try_parse_from(argv)?;
        RunConfig::try_from(args)
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let config = parse(&["build", "42", "--domain", "sid", "--prefix", "ABC"]).unwrap();
        assert_eq!(config.allocator.domain, Domain::Substance);
        assert_eq!(config.allocator.prefix, "ABC");
        assert_eq!(config.allocator.sequence_key, "substance_seq");
        assert_eq!(config.command, Command::Build { payload: 42 });
    }

    #[test]
    fn rejects_bad_prefix() {
        let err = parse(&["checksum", "1", "--prefix", "dtx"]).unwrap_err();
        assert!(err.to_string().contains("invalid identifier configuration"));
    }

    #[test]
    fn rejects_zero_start() {
        assert!(parse(&["checksum", "1", "--increment-start", "0"]).is_err());
    }

    #[test]
    fn rejects_empty_mint() {
        let err = parse(&["mint", "--file", "ids.txt", "--count", "0"]).unwrap_err();
        assert!(err.to_string().contains("--count"));
    }

    #[test]
    fn rejects_unknown_domain() {
        assert!(parse(&["checksum", "1", "--domain", "polymer"]).is_err());
    }
}
