//! The read/forward loop between the log source and the terminal.
//!
//! Forwarded lines and the one-time release notice go to stdout. The waiting
//! indicator and parse diagnostics go to stderr, prefixed with a carriage
//! return so they overwrite the indicator in place.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use silencer_core::{Clock, GateStats, Handled, StreamGate, Verdict};

/// Blank line written ahead of the notice to wipe the status indicator.
const STATUS_CLEAR: &str = "          ";

/// Rendering switches for [`run`].
#[derive(Debug, Clone, Copy)]
pub struct FilterOptions {
    /// Write the `<elapsed> / <seen>` indicator while waiting.
    pub status: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self { status: true }
    }
}

/// Text announcing that the gate has opened.
pub fn notice_text(quiet_secs: u64) -> String {
    format!("No new activity for {quiet_secs} seconds. You can now interact with the device.")
}

/// Feeds every line of `input` through `gate` until end of stream.
///
/// The clock is sampled once per line. A closed stdout or stderr ends the run
/// early without error.
pub fn run<R, O, E, C>(
    input: &mut R,
    out: &mut O,
    err: &mut E,
    gate: &mut StreamGate,
    clock: &C,
    options: FilterOptions,
) -> Result<GateStats>
where
    R: BufRead,
    O: Write,
    E: Write,
    C: Clock,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = input
            .read_until(b'\n', &mut buf)
            .context("failed to read log input")?;
        if read == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        let handled = gate.handle(&line, clock.now());

        match render(&buf, &handled, out, err, options) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                tracing::debug!("output closed, stopping");
                break;
            }
            Err(e) => return Err(e).context("failed to write output"),
        }
    }

    Ok(gate.stats())
}

fn render<O: Write, E: Write>(
    raw: &[u8],
    handled: &Handled,
    out: &mut O,
    err: &mut E,
    options: FilterOptions,
) -> io::Result<()> {
    if options.status {
        if let Some(status) = handled.status {
            write!(err, "\r{status}   ")?;
            err.flush()?;
        }
    }

    if let Some(release) = handled.release {
        writeln!(out, "{STATUS_CLEAR}")?;
        writeln!(out, "{}", notice_text(release.quiet_secs))?;
        out.flush()?;
    }

    match &handled.verdict {
        Verdict::Forward => {
            out.write_all(raw)?;
            out.flush()?;
        }
        Verdict::Suppress => {}
        Verdict::Drop(failure) => {
            tracing::trace!(%failure, "dropped line");
            if failure.is_reportable() {
                err.write_all(b"\rCould not parse line: ")?;
                err.write_all(raw)?;
                if !raw.ends_with(b"\n") {
                    writeln!(err)?;
                }
                err.flush()?;
            }
        }
    }

    Ok(())
}
