//! The quiet-period gate.
//!
//! While waiting, every line is swallowed and its category remembered. Each
//! previously unseen category restarts the quiet timer. Once no new category
//! has appeared for longer than the quiet period, the gate opens for good and
//! every parseable line is forwarded from then on.

use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::category::{CategoryKey, DEFAULT_CATEGORY_FIELD, ParseFailure, classify};

/// Default quiet period before the gate opens.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_secs(60);

/// Invalid gate settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Field positions are 1-based.
    #[error("category field position must be at least 1, got {position}")]
    InvalidFieldPosition { position: usize },
}

/// Tunables for a [`StreamGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateConfig {
    quiet_period: Duration,
    category_field: usize,
}

impl GateConfig {
    /// Builds a config from a quiet period in seconds and a 1-based field position.
    pub fn new(quiet_secs: u64, field_position: usize) -> Result<Self, ConfigError> {
        if field_position == 0 {
            return Err(ConfigError::InvalidFieldPosition {
                position: field_position,
            });
        }
        Ok(Self {
            quiet_period: Duration::from_secs(quiet_secs),
            category_field: field_position - 1,
        })
    }

    pub const fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Zero-based index of the category token.
    pub const fn category_field(&self) -> usize {
        self.category_field
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            quiet_period: DEFAULT_QUIET_PERIOD,
            category_field: DEFAULT_CATEGORY_FIELD,
        }
    }
}

/// Gate lifecycle. `Passthrough` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateState {
    Waiting,
    Passthrough,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Waiting => "waiting",
            Self::Passthrough => "passthrough",
        };
        write!(f, "{s}")
    }
}

/// What to do with the line that was just handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Write the line to the output unchanged.
    Forward,
    /// Swallow the line; its category was recorded.
    Suppress,
    /// The line has no category and is never forwarded.
    Drop(ParseFailure),
}

/// Progress toward the quiet period, reported after each waiting line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietStatus {
    /// Whole seconds since the last new category.
    pub elapsed_secs: u64,
    /// Number of distinct categories seen so far.
    pub seen: usize,
}

impl fmt::Display for QuietStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.elapsed_secs, self.seen)
    }
}

/// Emitted once, when the gate opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Release {
    /// Quiet duration that triggered the release, in whole seconds.
    pub quiet_secs: u64,
}

/// Result of [`StreamGate::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handled {
    pub verdict: Verdict,
    pub status: Option<QuietStatus>,
    pub release: Option<Release>,
}

impl Handled {
    const fn dropped(failure: ParseFailure) -> Self {
        Self {
            verdict: Verdict::Drop(failure),
            status: None,
            release: None,
        }
    }

    const fn forwarded() -> Self {
        Self {
            verdict: Verdict::Forward,
            status: None,
            release: None,
        }
    }
}

/// Line counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateStats {
    pub lines: u64,
    pub forwarded: u64,
    pub suppressed: u64,
    pub unparsed: u64,
    pub boundary_markers: u64,
}

impl fmt::Display for GateStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines: {} forwarded, {} suppressed, {} unparsed, {} boundary markers",
            self.lines, self.forwarded, self.suppressed, self.unparsed, self.boundary_markers
        )
    }
}

/// Stateful line filter owning the seen set, quiet timer and gate state.
#[derive(Debug)]
pub struct StreamGate {
    config: GateConfig,
    state: GateState,
    seen: HashSet<CategoryKey>,
    quiet_since: Instant,
    stats: GateStats,
}

impl StreamGate {
    /// Creates a waiting gate whose quiet timer starts at `started_at`.
    pub fn new(config: GateConfig, started_at: Instant) -> Self {
        Self {
            config,
            state: GateState::Waiting,
            seen: HashSet::new(),
            quiet_since: started_at,
            stats: GateStats::default(),
        }
    }

    /// Processes one line that arrived at `now`.
    ///
    /// Lines must be handed over in arrival order. The line that opens the gate
    /// is forwarded after the release; it always carries a known category,
    /// since a new one restarts the timer.
    pub fn handle(&mut self, line: &str, now: Instant) -> Handled {
        self.stats.lines += 1;

        let key = match classify(line, self.config.category_field) {
            Ok(key) => key,
            Err(failure) => {
                if failure.is_reportable() {
                    self.stats.unparsed += 1;
                } else {
                    self.stats.boundary_markers += 1;
                }
                return Handled::dropped(failure);
            }
        };

        if self.state == GateState::Passthrough {
            self.stats.forwarded += 1;
            return Handled::forwarded();
        }

        if !self.seen.contains(&key) {
            tracing::trace!(category = %key, seen = self.seen.len() + 1, "new category");
            self.seen.insert(key);
            // Keep the timer monotonic even if the caller's clock stutters.
            self.quiet_since = self.quiet_since.max(now);
        }

        let elapsed_secs = now.saturating_duration_since(self.quiet_since).as_secs();
        let status = Some(QuietStatus {
            elapsed_secs,
            seen: self.seen.len(),
        });

        if elapsed_secs > self.config.quiet_period.as_secs() {
            self.state = GateState::Passthrough;
            self.stats.forwarded += 1;
            tracing::info!(
                quiet_secs = elapsed_secs,
                categories = self.seen.len(),
                "stream went quiet, forwarding all lines"
            );
            return Handled {
                verdict: Verdict::Forward,
                status,
                release: Some(Release {
                    quiet_secs: elapsed_secs,
                }),
            };
        }

        self.stats.suppressed += 1;
        Handled {
            verdict: Verdict::Suppress,
            status,
            release: None,
        }
    }

    pub const fn state(&self) -> GateState {
        self.state
    }

    /// Number of distinct categories recorded while waiting.
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub fn has_seen(&self, category: &str) -> bool {
        self.seen.contains(category)
    }

    /// Arrival time of the most recent new category.
    pub const fn quiet_since(&self) -> Instant {
        self.quiet_since
    }

    pub const fn stats(&self) -> GateStats {
        self.stats
    }
}
