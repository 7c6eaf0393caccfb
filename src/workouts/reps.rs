//! Parsing of free-form rep target strings.
//!
//! Rep targets are entered as free text in the builder: a plain count
//! ("10"), a range ("8-12"), a max-effort token ("AMRAP", "to failure"),
//! or a timed hold ("30s"). The duration estimator and the session
//! engine's default-fill both go through this parser so the two never
//! disagree about what a reps string means.

/// Assumed rep count for max-effort sets ("AMRAP", "fail").
const MAX_EFFORT_REPS: u32 = 12;

/// A parsed rep target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepTarget {
    /// Fixed rep count
    Count(u32),
    /// Rep range, low to high
    Range(u32, u32),
    /// Timed set, duration in seconds
    Timed(u32),
    /// As many reps as possible / to failure
    MaxEffort,
}

impl RepTarget {
    /// Parse a free-form reps string.
    ///
    /// Unrecognized input falls back to `Count` of the leading numeric
    /// portion when present, otherwise `MaxEffort` (qualitative token).
    pub fn parse(reps: &str) -> Self {
        let trimmed = reps.trim().to_lowercase();

        if trimmed.contains("amrap") || trimmed.contains("fail") {
            return RepTarget::MaxEffort;
        }

        // Timed sets: "30s", "45 sec", "60 seconds"
        if let Some(stripped) = trimmed
            .strip_suffix("seconds")
            .or_else(|| trimmed.strip_suffix("sec"))
            .or_else(|| trimmed.strip_suffix('s'))
        {
            if let Ok(secs) = stripped.trim().parse::<u32>() {
                return RepTarget::Timed(secs);
            }
        }

        // Ranges: "8-12", "8 - 12"
        if let Some((low, high)) = trimmed.split_once('-') {
            if let (Ok(a), Ok(b)) = (low.trim().parse::<u32>(), high.trim().parse::<u32>()) {
                return RepTarget::Range(a.min(b), a.max(b));
            }
        }

        if let Ok(count) = trimmed.parse::<u32>() {
            return RepTarget::Count(count);
        }

        match leading_number(&trimmed) {
            Some(count) => RepTarget::Count(count),
            None => RepTarget::MaxEffort,
        }
    }

    /// Average rep count assumed when estimating duration.
    ///
    /// Timed sets count as a single "rep"; the time itself is taken from
    /// [`RepTarget::seconds_override`].
    pub fn average_reps(&self) -> f64 {
        match self {
            RepTarget::Count(n) => *n as f64,
            RepTarget::Range(low, high) => (*low + *high) as f64 / 2.0,
            RepTarget::Timed(_) => 1.0,
            RepTarget::MaxEffort => MAX_EFFORT_REPS as f64,
        }
    }

    /// For timed sets, the per-rep time is the hold duration itself.
    pub fn seconds_override(&self) -> Option<u32> {
        match self {
            RepTarget::Timed(secs) => Some(*secs),
            _ => None,
        }
    }

    /// Rep count used to default-fill a completed set the user logged no
    /// input for: the numeric portion of the target where one exists.
    pub fn default_log_reps(&self) -> u32 {
        match self {
            RepTarget::Count(n) => *n,
            RepTarget::Range(low, _) => *low,
            RepTarget::Timed(secs) => *secs,
            RepTarget::MaxEffort => MAX_EFFORT_REPS,
        }
    }
}

/// Extract the leading digits of a string, if any.
fn leading_number(s: &str) -> Option<u32> {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
