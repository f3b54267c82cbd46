//! Build pipeline tests: error surfacing, two-phase build, parallel parity
//! 构建流水线测试：错误上报、两阶段构建、并行一致性

use aok::{OK, Void};
use log::info;
use qmi::{Asc, Error, Ident, Qmi};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

#[test]
fn test_unsorted_rejected() -> Void {
  let data = vec![3u64, 1, 2];

  let err = Qmi::<u64, _, _, 64>::new(&data).unwrap_err();
  assert_eq!(err, Error::Unsorted { pos: 1 });

  let err = Qmi::<u64, _, _, 64>::build_parallel(&data, Ident, Asc).unwrap_err();
  assert_eq!(err, Error::Unsorted { pos: 1 });

  // Violation deep inside the array names its exact position.
  let mut data: Vec<u64> = (0..100).collect();
  data[63] = 0;
  let err = Qmi::<u64, _, _, 64>::new(&data).unwrap_err();
  assert_eq!(err, Error::Unsorted { pos: 63 });

  info!("unsorted_rejected passed");
  OK
}

#[test]
fn test_prepare_finalize() -> Void {
  let data: Vec<u64> = (0..10_000).map(|i| i * 3).collect();

  let prepared = Qmi::<u64, _, _, 128>::prepare(&data, Ident, Asc)?;
  assert_eq!(prepared.segment_count(), 128);

  let tasks = prepared.tasks();
  assert_eq!(tasks.len(), 128);
  for (i, t) in tasks.iter().enumerate() {
    assert_eq!(t.seg, i);
    assert!(t.end > t.start);
  }

  // Run the tasks in the caller's own threading model (here: plain threads).
  let results = std::thread::scope(|s| {
    let handles: Vec<_> = tasks.iter().map(|t| s.spawn(move || t.run())).collect();
    handles.into_iter().map(|h| h.join().expect("task panicked")).collect::<Vec<_>>()
  });

  let idx = prepared.finalize(results)?;
  assert_eq!(idx.len(), 10_000);
  assert_eq!(idx.find(2997), Some(999));
  assert_eq!(idx.find(2998), None);

  info!("prepare_finalize passed");
  OK
}

#[test]
fn test_finalize_count_mismatch() -> Void {
  let data: Vec<u64> = (0..1000).collect();

  let prepared = Qmi::<u64, _, _, 64>::prepare(&data, Ident, Asc)?;
  let mut results: Vec<_> = prepared.tasks().iter().map(|t| t.run()).collect();
  results.pop();

  let err = prepared.finalize(results).unwrap_err();
  assert_eq!(
    err,
    Error::ResultMismatch {
      expected: 64,
      got: 63
    }
  );

  info!("finalize_count_mismatch passed");
  OK
}

/// Sequential and parallel builds answer every query identically
/// 顺序与并行构建对每个查询给出完全相同的结果
#[test]
fn test_build_parity() -> Void {
  let mut data = Vec::new();
  for i in 0u64..2000 {
    data.push(i * i / 7);
  }
  data.sort_unstable();

  let seq = Qmi::<u64, _, _, 256>::build(&data, Ident, Asc)?;
  let par = Qmi::<u64, _, _, 256>::build_parallel(&data, Ident, Asc)?;

  assert_eq!(seq.segment_count(), par.segment_count());
  for (a, b) in seq.segments().iter().zip(par.segments()) {
    assert_eq!(a.idx_start, b.idx_start);
    assert_eq!(a.idx_end, b.idx_end);
    assert_eq!(a.model(), b.model());
    assert_eq!(a.max_residual, b.max_residual);
  }

  let max = *data.last().expect("non-empty");
  for probe in (0..=max + 1).step_by(97) {
    assert_eq!(seq.find(probe), par.find(probe), "find {probe}");
    assert_eq!(seq.lower_bound(probe), par.lower_bound(probe), "lower {probe}");
    assert_eq!(seq.upper_bound(probe), par.upper_bound(probe), "upper {probe}");
  }

  info!("build_parity passed");
  OK
}

#[test]
fn test_parallel_lookups() -> Void {
  let data: Vec<u64> = (0..100_000).collect();
  let idx = Qmi::<u64, _, _, 512>::build_parallel(&data, Ident, Asc)?;

  // Arbitrary concurrent readers over the immutable index.
  std::thread::scope(|s| {
    for t in 0..4u64 {
      let idx = &idx;
      s.spawn(move || {
        for k in (t * 25_000..(t + 1) * 25_000).step_by(101) {
          assert_eq!(idx.find(k), Some(k as usize));
        }
      });
    }
  });

  info!("parallel_lookups passed");
  OK
}
