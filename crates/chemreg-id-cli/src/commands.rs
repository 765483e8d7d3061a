use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use chemreg_id::{
    Allocator, AllocatorConfig, IdentifierFormat, MemorySequenceStore, validate_registry_number,
    weighted_digit_checksum,
};

use crate::{
    config::{Command, RunConfig},
    source::FileIdentifierSource,
};

/// Runs one subcommand, writing its report to stdout.
///
/// Validation commands exit with status 1 when any input was rejected.
pub fn run(config: RunConfig) -> anyhow::Result<ExitCode> {
    let mut out = io::stdout().lock();
    let passed = execute(&mut out, config)?;
    out.flush()?;
    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Returns whether every input passed validation.
fn execute(out: &mut impl Write, config: RunConfig) -> anyhow::Result<bool> {
    let RunConfig { allocator, command } = config;
    let format = IdentifierFormat::new(allocator.prefix.clone(), allocator.domain)?;

    match command {
        Command::Checksum { payload } => {
            writeln!(out, "{}", weighted_digit_checksum(payload))?;
            Ok(true)
        }
        Command::Build { payload } => {
            writeln!(out, "{}", format.build(payload))?;
            Ok(true)
        }
        Command::Inspect { identifiers } => inspect(out, &format, &identifiers),
        Command::Registry { numbers } => registry(out, &numbers),
        Command::Recover { file } => recover(out, allocator, file),
        Command::Mint { file, count } => mint(out, allocator, file, count),
    }
}

fn inspect(
    out: &mut impl Write,
    format: &IdentifierFormat,
    identifiers: &[String],
) -> anyhow::Result<bool> {
    let mut invalid = 0_usize;
    for id in identifiers {
        let payload = display_or_dash(format.extract_payload(id));
        let checksum = display_or_dash(format.extract_checksum(id));
        match format.parse(id) {
            Ok(_) => writeln!(out, "{id}\tpayload={payload}\tchecksum={checksum}\tok")?,
            Err(err) => {
                invalid += 1;
                writeln!(
                    out,
                    "{id}\tpayload={payload}\tchecksum={checksum}\tinvalid: {err}"
                )?;
            }
        }
    }
    Ok(report(invalid, identifiers.len(), "identifiers"))
}

fn registry(out: &mut impl Write, numbers: &[String]) -> anyhow::Result<bool> {
    let mut invalid = 0_usize;
    for value in numbers {
        match validate_registry_number(value) {
            Ok(number) => writeln!(out, "{number}\tok")?,
            Err(err) => {
                invalid += 1;
                writeln!(out, "{value}\tinvalid: {err}")?;
            }
        }
    }
    Ok(report(invalid, numbers.len(), "registry numbers"))
}

fn recover(
    out: &mut impl Write,
    config: AllocatorConfig,
    file: PathBuf,
) -> anyhow::Result<bool> {
    let allocator = Allocator::new(
        config,
        MemorySequenceStore::new(),
        FileIdentifierSource::new(file),
    )?;
    let last = allocator.recover_sequence()?;
    let next = last.checked_add(1).context("payload space exhausted")?;

    tracing::info!(
        file = %allocator.source().path().display(),
        domain = %allocator.config().domain,
        last,
        "recovered sequence"
    );
    writeln!(out, "last\t{last}")?;
    writeln!(out, "next\t{next}")?;
    Ok(true)
}

fn mint(
    out: &mut impl Write,
    config: AllocatorConfig,
    file: PathBuf,
    count: usize,
) -> anyhow::Result<bool> {
    let allocator = Allocator::new(
        config,
        MemorySequenceStore::new(),
        FileIdentifierSource::new(file),
    )?;
    for _ in 0..count {
        writeln!(out, "{}", allocator.build_identifier(None)?)?;
    }

    tracing::info!(
        file = %allocator.source().path().display(),
        domain = %allocator.config().domain,
        count,
        "minted identifiers against a scratch counter"
    );
    Ok(true)
}

fn report(invalid: usize, total: usize, what: &str) -> bool {
    if invalid > 0 {
        tracing::warn!(invalid, total, "some {what} failed validation");
    }
    invalid == 0
}

fn display_or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use chemreg_id::Domain;

    use super::*;

    fn run_to_string(config: RunConfig) -> (bool, String) {
        let mut out = Vec::new();
        let passed = execute(&mut out, config).unwrap();
        (passed, String::from_utf8(out).unwrap())
    }

    fn compound(command: Command) -> RunConfig {
        RunConfig {
            allocator: AllocatorConfig::new(Domain::Compound),
            command,
        }
    }

    #[test]
    fn checksum_and_build() {
        let (passed, out) = run_to_string(compound(Command::Checksum { payload: 2_345_678 }));
        assert!(passed);
        assert_eq!(out, "8\n");

        let (_, out) = run_to_string(compound(Command::Build { payload: 2_345_678 }));
        assert_eq!(out, "DTXCID802345678\n");
    }

    #[test]
    fn inspect_reports_each_identifier() {
        let (passed, out) = run_to_string(compound(Command::Inspect {
            identifiers: vec!["DTXCID802345678".into(), "DTXCID902345678".into()],
        }));
        assert!(!passed);

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "DTXCID802345678\tpayload=2345678\tchecksum=8\tok");
        assert!(lines[1].starts_with("DTXCID902345678\tpayload=2345678\tchecksum=9\tinvalid:"));
    }

    #[test]
    fn inspect_dashes_unreadable_parts() {
        let (passed, out) = run_to_string(compound(Command::Inspect {
            identifiers: vec!["FOO8".into()],
        }));
        assert!(!passed);
        assert!(out.starts_with("FOO8\tpayload=-\tchecksum=-\tinvalid:"));
    }

    #[test]
    fn registry_numbers() {
        let (passed, out) = run_to_string(compound(Command::Registry {
            numbers: vec!["7732-18-5".into()],
        }));
        assert!(passed);
        assert_eq!(out, "7732-18-5\tok\n");

        let (passed, _) = run_to_string(compound(Command::Registry {
            numbers: vec!["7732-18-4".into()],
        }));
        assert!(!passed);
    }

    #[test]
    fn recover_and_mint_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "DTXCID802345678\nFOO8\nDTXCID902345679").unwrap();

        let (_, out) = run_to_string(compound(Command::Recover {
            file: file.path().to_owned(),
        }));
        assert_eq!(out, "last\t2345678\nnext\t2345679\n");

        let (_, out) = run_to_string(compound(Command::Mint {
            file: file.path().to_owned(),
            count: 2,
        }));
        assert_eq!(out, "DTXCID502345679\nDTXCID802345680\n");
    }
}
