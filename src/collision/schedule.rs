use std::cmp::Ordering;
use std::fmt;

/// When a contact next needs attention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImpactSchedule {
    /// Due immediately: freshly created, just resolved, or one of its bodies
    /// changed velocity.
    Reprocess,
    /// Predicted absolute simulation time of impact.
    At(f64),
    /// Separating or moving in parallel; never due until rescheduled.
    Never,
}

impl ImpactSchedule {
    fn rank(&self) -> u8 {
        match self {
            ImpactSchedule::Reprocess => 0,
            ImpactSchedule::At(_) => 1,
            ImpactSchedule::Never => 2,
        }
    }

    /// Whether the event falls strictly before `time`.
    pub fn is_due_before(&self, time: f64) -> bool {
        match *self {
            ImpactSchedule::Reprocess => true,
            ImpactSchedule::At(toi) => toi < time,
            ImpactSchedule::Never => false,
        }
    }

    pub fn time(&self) -> Option<f64> {
        match *self {
            ImpactSchedule::At(toi) => Some(toi),
            _ => None,
        }
    }

    /// Soonest first: `Reprocess`, then `At` by ascending time, then `Never`.
    pub fn cmp_soonest(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ImpactSchedule::At(a), ImpactSchedule::At(b)) => a.total_cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for ImpactSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpactSchedule::Reprocess => write!(f, "reprocess"),
            ImpactSchedule::At(toi) => write!(f, "t={toi:.4}"),
            ImpactSchedule::Never => write!(f, "never"),
        }
    }
}
