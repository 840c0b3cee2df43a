//! Stress runs comparing [`RingBuf`] against [`ReferenceList`].
//!
//! Two drivers share the same comparison:
//!
//! - `sweep`: every (insertions, depth) pair for one capacity. Each case puts
//!   `0..insertions`, inserts `-1` at `depth`, and reads the buffer back
//!   through its textual rendering.
//! - `random_ops`: seeded mixes of put/insert, checked after every call,
//!   including out-of-range depths that must be rejected untouched.
//!
//! With metatest on, the model is occasionally corrupted so a run that never
//! fails proves nothing about the harness itself.

use crate::error::{RingBufError, StressError};
use crate::listify::listify;
use crate::model::ReferenceList;
use crate::ring_buf::RingBuf;
use serde::Serialize;
use std::fmt;

pub const SEED_ENV: &str = "RINGCHECK_SEED";

const MARKER: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Params {
    pub size: usize,
    pub insertions: usize,
    pub insert_depth: usize,
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "size={} insertions={} depth={}", self.size, self.insertions, self.insert_depth)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CaseOptions {
    /// `Some(n)`: corrupt the model in roughly one case out of `n`.
    pub metatest: Option<u32>,
}

/// Result of one comparison. `expected` is the (possibly corrupted) model.
#[derive(Debug, Clone, Serialize)]
pub struct CaseOutcome {
    pub case: String,
    pub expected: Vec<i64>,
    pub got: Vec<i64>,
    pub corrupted: bool,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.expected == self.got
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StressReport {
    pub mode: &'static str,
    pub size: usize,
    pub cases_run: usize,
    pub passed: usize,
    pub failures: Vec<CaseOutcome>,
    pub seed: Option<u64>,
    pub metatest: bool,
    /// Cases whose model was corrupted on purpose
    pub corrupted: usize,
}

impl StressReport {
    fn record(&mut self, outcome: CaseOutcome) {
        self.cases_run += 1;
        if outcome.corrupted {
            self.corrupted += 1;
        }
        if outcome.passed() {
            self.passed += 1;
        } else {
            log::warn!("{}:\nExpected {:?}\n     Got {:?}", outcome.case, outcome.expected, outcome.got);
            self.failures.push(outcome);
        }
    }

    /// Corrupted cases that nevertheless compared equal.
    pub fn undetected(&self) -> usize {
        self.corrupted - self.failures.iter().filter(|f| f.corrupted).count()
    }

    /// Real mismatches, i.e. failures not caused by metatest corruption.
    pub fn genuine_failures(&self) -> usize {
        self.failures.iter().filter(|f| !f.corrupted).count()
    }

    pub fn ok(&self) -> bool {
        self.genuine_failures() == 0 && self.undetected() == 0
    }
}

/// Seed from `cli`, else `RINGCHECK_SEED`, else random. Logged for reproduction.
pub fn resolve_seed(cli: Option<u64>) -> u64 {
    if let Some(seed) = cli {
        log::info!("{}={} (from command line)", SEED_ENV, seed);
        return seed;
    }
    match std::env::var(SEED_ENV).map(|s| s.parse::<u64>()) {
        Ok(Ok(seed)) => {
            log::info!("{}={} (from environment)", SEED_ENV, seed);
            seed
        }
        Ok(Err(e)) => {
            let seed = fastrand::u64(..);
            log::warn!("ignoring unparsable {} ({}); using {}", SEED_ENV, e, seed);
            seed
        }
        Err(_) => {
            let seed = fastrand::u64(..);
            log::info!("{}={} (randomly generated)", SEED_ENV, seed);
            seed
        }
    }
}

/// One sweep case: put `0..insertions`, insert the marker at `insert_depth`,
/// compare against the list model truncated to `size`.
pub fn run_case(
    pars: &Params,
    opts: &CaseOptions,
    rng: &mut fastrand::Rng,
) -> Result<CaseOutcome, StressError> {
    if pars.insert_depth >= pars.size {
        return Err(StressError::Precondition { depth: pars.insert_depth, size: pars.size });
    }

    let mut fake = ReferenceList::new();
    let mut real = RingBuf::new(pars.size)?;

    for i in 0..pars.insertions as i64 {
        fake.prepend(i);
        real.put(i);
    }

    fake.insert(pars.insert_depth, MARKER);
    real.insert(pars.insert_depth, MARKER)?;
    fake.truncate(pars.size);

    let mut corrupted = false;
    if let Some(one_in) = opts.metatest {
        if rng.u32(0..one_in.max(1)) == 0 {
            let max_depth = pars.insertions.min(pars.size - 1);
            if max_depth > 0 {
                corrupted = fake.corrupt_at(rng.usize(0..max_depth));
            }
        }
    }

    let outcome = CaseOutcome {
        case: pars.to_string(),
        expected: fake.as_slice().to_vec(),
        got: listify(&real.to_string())?,
        corrupted,
    };
    log::trace!("{}: raw {}", outcome.case, real.raw_dump());
    log::debug!("{}:\nExpected {:?}\n     Got {:?}", outcome.case, outcome.expected, outcome.got);
    Ok(outcome)
}

/// Every `insertions in 0..max_inserts` with every depth below
/// `min(insertions, size)`.
pub fn sweep(
    size: usize,
    max_inserts: usize,
    opts: &CaseOptions,
    seed: u64,
) -> Result<StressReport, StressError> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut report = StressReport {
        mode: "sweep",
        size,
        seed: opts.metatest.map(|_| seed),
        metatest: opts.metatest.is_some(),
        ..Default::default()
    };

    for insertions in 0..max_inserts {
        for insert_depth in 0..insertions.min(size) {
            let pars = Params { size, insertions, insert_depth };
            report.record(run_case(&pars, opts, &mut rng)?);
        }
    }

    log::info!("{} passed", report.passed);
    Ok(report)
}

#[derive(Debug, Clone, Copy)]
pub struct RandomOptions {
    pub rounds: usize,
    pub ops_per_round: usize,
    pub bad_depth_pct: u8,
}

/// Seeded random put/insert mixes. Each round is one buffer; the first
/// divergence ends that round.
pub fn random_ops(size: usize, opts: &RandomOptions, seed: u64) -> Result<StressReport, StressError> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut report = StressReport {
        mode: "random",
        size,
        seed: Some(seed),
        ..Default::default()
    };

    for round in 0..opts.rounds {
        report.record(run_round(size, round, opts, &mut rng)?);
    }

    log::info!("{} of {} rounds passed", report.passed, report.cases_run);
    Ok(report)
}

fn run_round(
    size: usize,
    round: usize,
    opts: &RandomOptions,
    rng: &mut fastrand::Rng,
) -> Result<CaseOutcome, StressError> {
    let mut fake = ReferenceList::new();
    let mut real = RingBuf::new(size)?;
    let mut next: i64 = 0;

    for op in 0..opts.ops_per_round {
        let label;
        if rng.bool() {
            label = format!("round {} op {}: put({})", round, op, next);
            fake.prepend(next);
            real.put(next);
        } else if rng.u8(0..100) < opts.bad_depth_pct {
            let depth = size + rng.usize(0..size);
            label = format!("round {} op {}: insert({}, {}) rejected", round, op, depth, next);
            match real.insert(depth, next) {
                Err(RingBufError::InvalidDepth { .. }) => {}
                _ => return Ok(diverged(label, fake.as_slice(), &real)),
            }
        } else {
            let depth = rng.usize(0..=real.len().min(size - 1));
            label = format!("round {} op {}: insert({}, {})", round, op, depth, next);
            fake.insert(depth, next);
            if real.insert(depth, next).is_err() {
                return Ok(diverged(label, fake.as_slice(), &real));
            }
        }
        fake.truncate(size);
        next += 1;

        if real.len() > real.capacity() || !real.iter().eq(fake.as_slice().iter()) {
            return Ok(diverged(label, fake.as_slice(), &real));
        }
        log::trace!("{} -> {}", label, real);
    }

    Ok(CaseOutcome {
        case: format!("round {}", round),
        expected: fake.as_slice().to_vec(),
        got: real.snapshot(),
        corrupted: false,
    })
}

/// Mark a round failed. The model side gets a sentinel length mismatch if
/// the contents happen to agree (e.g. a wrongly accepted or rejected insert).
fn diverged(case: String, expected: &[i64], real: &RingBuf<i64>) -> CaseOutcome {
    let mut expected = expected.to_vec();
    let got = real.snapshot();
    if expected == got {
        expected.push(i64::MIN);
    }
    CaseOutcome { case, expected, got, corrupted: false }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> fastrand::Rng {
        fastrand::Rng::with_seed(7)
    }

    #[test]
    fn five_puts_then_insert_at_two() {
        let pars = Params { size: 10, insertions: 5, insert_depth: 2 };
        let out = run_case(&pars, &CaseOptions::default(), &mut rng()).unwrap();
        assert!(out.passed());
        assert_eq!(out.got, vec![4, 3, -1, 2, 1, 0]);
    }

    #[test]
    fn truncates_model_to_size() {
        let pars = Params { size: 10, insertions: 25, insert_depth: 9 };
        let out = run_case(&pars, &CaseOptions::default(), &mut rng()).unwrap();
        assert!(out.passed());
        assert_eq!(out.got.len(), 10);
        assert_eq!(out.got[9], -1);
    }

    #[test]
    fn depth_at_size_is_a_precondition_error() {
        let pars = Params { size: 4, insertions: 8, insert_depth: 4 };
        let err = run_case(&pars, &CaseOptions::default(), &mut rng()).unwrap_err();
        assert_eq!(err, StressError::Precondition { depth: 4, size: 4 });
    }

    #[test]
    fn full_sweep_of_ten_passes() {
        let report = sweep(10, 30, &CaseOptions::default(), 1).unwrap();
        // sum over insertions 0..30 of min(insertions, 10)
        assert_eq!(report.cases_run, 45 + 20 * 10);
        assert_eq!(report.passed, report.cases_run);
        assert!(report.ok());
    }

    #[test]
    fn metatest_corruption_is_always_detected() {
        let opts = CaseOptions { metatest: Some(2) };
        let report = sweep(10, 30, &opts, 42).unwrap();
        assert!(report.corrupted > 0);
        assert_eq!(report.failures.len(), report.corrupted);
        assert_eq!(report.undetected(), 0);
        assert_eq!(report.genuine_failures(), 0);
        assert!(report.ok());
    }

    #[test]
    fn random_rounds_pass_for_many_sizes() {
        let opts = RandomOptions { rounds: 20, ops_per_round: 60, bad_depth_pct: 10 };
        for size in 1..12 {
            let report = random_ops(size, &opts, 99).unwrap();
            assert_eq!(report.cases_run, 20);
            assert!(report.ok(), "size {}: {:?}", size, report.failures);
        }
    }

    #[test]
    fn same_seed_same_report() {
        let opts = RandomOptions { rounds: 3, ops_per_round: 20, bad_depth_pct: 0 };
        let a = random_ops(5, &opts, 1234).unwrap();
        let b = random_ops(5, &opts, 1234).unwrap();
        assert_eq!(a.passed, b.passed);
        assert_eq!(a.failures.len(), b.failures.len());
        assert_eq!(a.seed, Some(1234));
    }

    #[test]
    fn cli_seed_wins() {
        assert_eq!(resolve_seed(Some(5)), 5);
    }
}
