//! Human-readable result lines.

use std::io::{self, Write};

use crawlgate_core::AccessDecision;
use tracing::error;

use crate::gate::GateError;

/// `AI-Training permission for {url}: {allowed}`
pub fn permission_line(url: &str, decision: &AccessDecision) -> String {
    format!("AI-Training permission for {url}: {}", decision.allowed)
}

/// Write one permission line per URL and count decisions left unrecorded.
///
/// A denial is a normal result. Only a provenance failure counts; its
/// decision is still written so the caller sees what was decided.
pub fn write_report<W, U>(
    out: &mut W,
    urls: &[U],
    results: Vec<Result<AccessDecision, GateError>>,
) -> io::Result<usize>
where
    W: Write,
    U: AsRef<str>,
{
    let mut unrecorded = 0;
    for (url, result) in urls.iter().zip(results) {
        let url = url.as_ref();
        match result {
            Ok(decision) => writeln!(out, "{}", permission_line(url, &decision))?,
            Err(err @ GateError::Persistence { .. }) => {
                writeln!(out, "{}", permission_line(url, err.decision()))?;
                error!(error = %err, "decision not recorded");
                unrecorded += 1;
            }
        }
    }
    Ok(unrecorded)
}
