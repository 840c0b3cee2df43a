use ringcheck::stress::{run_case, sweep, CaseOptions, Params};
use ringcheck::{RingBuf, RingBufError};

#[test]
fn capacity_ten_matches_list_model_everywhere() {
    let mut rng = fastrand::Rng::with_seed(0);
    let opts = CaseOptions::default();
    for insertions in 0..30 {
        for insert_depth in 0..insertions.min(10) {
            let pars = Params { size: 10, insertions, insert_depth };
            let out = run_case(&pars, &opts, &mut rng).unwrap();
            assert!(out.passed(), "{}: expected {:?} got {:?}", out.case, out.expected, out.got);
        }
    }
}

#[test]
fn sweeps_pass_for_small_capacities() {
    for size in 1..8 {
        let report = sweep(size, 3 * size, &CaseOptions::default(), 0).unwrap();
        assert!(report.ok(), "size {}: {:?}", size, report.failures);
    }
}

#[test]
fn rejected_insert_keeps_contents() {
    let mut rb = RingBuf::new(3).unwrap();
    for i in 0..5 {
        rb.put(i);
    }
    let before = rb.snapshot();
    for depth in 3..6 {
        assert!(matches!(rb.insert(depth, -1), Err(RingBufError::InvalidDepth { .. })));
    }
    assert_eq!(rb.snapshot(), before);
    assert_eq!(rb.len(), 3);
}

#[test]
fn zero_capacity_never_builds() {
    assert_eq!(RingBuf::<u8>::new(0).unwrap_err(), RingBufError::InvalidCapacity(0));
}
