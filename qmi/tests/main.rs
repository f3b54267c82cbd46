//! Core lookup tests
//! 核心查找测试

use aok::{OK, Void};
use log::info;
use qmi::{ModelKind, Qmi};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

#[test]
fn test_empty() -> Void {
  let data: Vec<u64> = vec![];
  let idx: Qmi<u64> = Qmi::new(&data)?;

  assert_eq!(idx.len(), 0);
  assert!(idx.is_empty());
  assert_eq!(idx.segment_count(), 0);
  assert_eq!(idx.find(42), None);
  assert_eq!(idx.lower_bound(42), 0);
  assert_eq!(idx.upper_bound(42), 0);
  assert_eq!(idx.equal_range(42), (0, 0));

  info!("empty passed");
  OK
}

#[test]
fn test_single_element() -> Void {
  let data = vec![42u64];
  let idx: Qmi<u64> = Qmi::new(&data)?;

  assert_eq!(idx.len(), 1);
  assert_eq!(idx.segment_count(), 1);
  assert_eq!(idx.find(42), Some(0));
  assert_eq!(idx.find(41), None);
  assert_eq!(idx.find(43), None);
  assert_eq!(idx.equal_range(42), (0, 1));

  info!("single_element passed");
  OK
}

/// Sequential keys: every segment linear with a zero certificate
/// 连续键：每段线性且证书为零
#[test]
fn test_sequential_keys() -> Void {
  let data: Vec<u64> = (0..1000).collect();
  let idx = Qmi::<u64, _, _, 256>::new(&data)?;

  for seg in idx.segments() {
    assert_eq!(seg.kind(), ModelKind::Linear);
    assert_eq!(seg.max_residual, 0);
  }

  assert_eq!(idx.find(500), Some(500));
  assert_eq!(idx.find(0), Some(0));
  assert_eq!(idx.find(999), Some(999));
  assert_eq!(idx.find(1000), None);
  assert_eq!(idx.equal_range(500), (500, 501));

  for k in (0..1000).step_by(7) {
    assert_eq!(idx.find(k), Some(k as usize), "key={k}");
  }

  info!("sequential_keys passed");
  OK
}

/// All-identical keys select a constant model in every segment
/// 全同键时每段均为常量模型
#[test]
fn test_all_identical() -> Void {
  let data = vec![42u64; 1000];
  let idx: Qmi<u64> = Qmi::new(&data)?;

  for seg in idx.segments() {
    assert_eq!(seg.kind(), ModelKind::Constant);
  }

  let p = idx.find(42).expect("present key");
  assert!(p < 1000);
  assert_eq!(idx.equal_range(42), (0, 1000));
  assert_eq!(idx.find(41), None);
  assert_eq!(idx.find(43), None);

  info!("all_identical passed");
  OK
}

/// More segments than keys: clamped to one key per segment
/// 段数多于键数时收缩为一键一段
#[test]
fn test_segment_clamp() -> Void {
  let data: Vec<u64> = (0..10).map(|i| i * 5).collect();
  let idx = Qmi::<u64, _, _, 64>::new(&data)?;

  assert_eq!(idx.segment_count(), 10);
  for (i, seg) in idx.segments().iter().enumerate() {
    assert_eq!(seg.idx_start, i);
    assert_eq!(seg.idx_end, i + 1);
  }
  for (i, &k) in data.iter().enumerate() {
    assert_eq!(idx.find(k), Some(i));
  }
  assert_eq!(idx.find(7), None);

  info!("segment_clamp passed");
  OK
}

#[test]
fn test_sparse_keys() -> Void {
  let data: Vec<u64> = (0..1000).step_by(2).collect();
  let idx: Qmi<u64> = Qmi::new(&data)?;

  assert_eq!(idx.find(0), Some(0));
  assert_eq!(idx.find(2), Some(1));
  assert_eq!(idx.find(998), Some(499));
  assert_eq!(idx.find(1), None);
  assert_eq!(idx.find(997), None);

  info!("sparse_keys passed");
  OK
}

#[test]
fn test_stats() -> Void {
  let data: Vec<u64> = (0..10_000).collect();
  let idx: Qmi<u64> = Qmi::new(&data)?;
  let stats = idx.stats();

  assert_eq!(stats.segments, idx.segment_count());
  assert!(stats.avg_segment_size > 1.0);
  assert!(stats.memory_bytes >= idx.segment_count() * 64);
  assert_eq!(idx.mem_usage(), stats.memory_bytes);

  info!(
    "stats: segments={} avg={:.2} mem={}",
    stats.segments, stats.avg_segment_size, stats.memory_bytes
  );
  OK
}

/// Signed and floating keys
/// 有符号与浮点键
#[test]
fn test_key_types() -> Void {
  let data: Vec<i64> = (-500..500).collect();
  let idx: Qmi<i64> = Qmi::new(&data)?;
  assert_eq!(idx.find(-500), Some(0));
  assert_eq!(idx.find(0), Some(500));
  assert_eq!(idx.find(499), Some(999));
  assert_eq!(idx.find(500), None);

  let data: Vec<f64> = (0..1000).map(|i| f64::from(i) * 0.25).collect();
  let idx: Qmi<f64> = Qmi::new(&data)?;
  assert_eq!(idx.find(0.25), Some(1));
  assert_eq!(idx.find(249.75), Some(999));
  assert_eq!(idx.find(0.3), None);

  let data: Vec<f32> = (0..100).map(|i| i as f32 * 1.5).collect();
  let idx: Qmi<f32> = Qmi::new(&data)?;
  assert_eq!(idx.find(1.5), Some(1));
  assert_eq!(idx.find(2.0), None);

  info!("key_types passed");
  OK
}
