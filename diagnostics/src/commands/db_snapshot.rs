//! `db-snapshot`: dump users and drivers, then describe requested relations.

use std::io::{self, Write};

use crate::domain::SnapshotReporter;
use crate::domain::ports::SnapshotRepository;

/// Print the dispatch snapshot followed by one description per relation.
///
/// # Errors
///
/// Returns an error only when writing to `out` fails.
pub fn run_db_snapshot<R: SnapshotRepository>(
    reporter: &SnapshotReporter<R>,
    relations: &[String],
    out: &mut impl Write,
) -> io::Result<usize> {
    let mut failures = 0;

    match reporter.report() {
        Ok(snapshot) => writeln!(out, "{snapshot}")?,
        Err(err) => {
            writeln!(out, "ERROR: {err}")?;
            failures += 1;
        }
    }

    for relation in relations {
        match reporter.describe(relation) {
            Ok(description) => writeln!(out, "{description}")?,
            Err(err) => {
                writeln!(out, "ERROR: {err}")?;
                failures += 1;
            }
        }
    }

    Ok(failures)
}
