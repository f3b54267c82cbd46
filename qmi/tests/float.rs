//! Floating-point key scenarios
//! 浮点键场景测试

use aok::{OK, Void};
use log::info;
use qmi::Qmi;

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

fn check_all<const N: usize>(data: &[f64], idx: &Qmi<f64, qmi::Ident, qmi::Asc, N>) {
  for (i, &k) in data.iter().enumerate() {
    let p = idx.find(k).expect("stored key");
    assert_eq!(data[p], k, "i={i} k={k}");
  }
}

#[test]
fn test_negative_and_mixed_magnitude() -> Void {
  let data: Vec<f64> = (-500..500).map(|i| f64::from(i) * 1.75).collect();
  let idx: Qmi<f64> = Qmi::new(&data)?;
  check_all(&data, &idx);
  assert_eq!(idx.find(-875.0), Some(0));
  assert_eq!(idx.find(0.0), Some(500));
  assert_eq!(idx.find(0.5), None);

  let mut data: Vec<f64> = vec![1e-9, 1e-6, 1e-3, 0.1, 1.0, 10.0, 1e3, 1e6, 1e9, 1e12];
  data.insert(0, 0.0);
  let idx: Qmi<f64> = Qmi::new(&data)?;
  check_all(&data, &idx);
  assert_eq!(idx.find(5.0), None);

  info!("negative_and_mixed_magnitude passed");
  OK
}

#[test]
fn test_fractional_sequence() -> Void {
  let data: Vec<f64> = (0..10_000).map(|i| f64::from(i) / 7.0).collect();
  let idx: Qmi<f64> = Qmi::new(&data)?;

  check_all(&data, &idx);
  for probe in [3.0f64, 100.5, 1000.1] {
    let lo = data.partition_point(|&r| r < probe);
    assert_eq!(idx.lower_bound(probe), lo, "probe={probe}");
  }

  info!("fractional_sequence passed");
  OK
}

/// Exponential growth: large dynamic range in one array
/// 指数增长：单数组内的巨大动态范围
#[test]
fn test_exponential_growth() -> Void {
  let data: Vec<f64> = (0..600).map(|i| (f64::from(i) * 0.05).exp()).collect();
  let idx = Qmi::<f64, _, _, 64>::new(&data)?;

  check_all(&data, &idx);
  assert_eq!(idx.find(-1.0), None);
  assert_eq!(idx.find(data[599] + 1.0), None);

  info!("exponential_growth passed");
  OK
}

/// Duplicated fractional keys keep run semantics
/// 重复的小数键保持游程语义
#[test]
fn test_fractional_duplicates() -> Void {
  let mut data = Vec::new();
  for i in 0..200 {
    let k = f64::from(i) * 0.5;
    for _ in 0..=(i % 3) {
      data.push(k);
    }
  }
  let idx: Qmi<f64> = Qmi::new(&data)?;

  for probe in [0.0f64, 0.5, 42.5, 99.5] {
    let lo = data.partition_point(|&r| r < probe);
    let hi = data.partition_point(|&r| r <= probe);
    assert_eq!(idx.equal_range(probe), (lo, hi), "probe={probe}");
  }

  info!("fractional_duplicates passed");
  OK
}

/// f32 keys go through the same f64 model arithmetic
/// f32 键同样经过 f64 模型计算
#[test]
fn test_f32_keys() -> Void {
  let data: Vec<f32> = (0..5000).map(|i| i as f32 * 0.25 - 600.0).collect();
  let idx: Qmi<f32> = Qmi::new(&data)?;

  for (i, &k) in data.iter().enumerate().step_by(17) {
    assert_eq!(idx.find(k), Some(i), "k={k}");
  }
  assert_eq!(idx.find(-600.1), None);
  assert_eq!(idx.find(data[4999] + 0.25), None);

  info!("f32_keys passed");
  OK
}
