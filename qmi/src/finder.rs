//! Learned segment finder: a linear model over segment minimum keys plus a
//! bounded correction search inside the certified window.
//! 学习型段查找器：段最小键上的线性模型，加证书窗口内的有界校正搜索。

#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use crate::{Key, Order, dlog::dlog, seg::Segment};

/// Segment finder state: regression `(slope, intercept)` fitted over
/// `(key_min[i] → i)`, its residual certificate, and the `key_min` values
/// duplicated contiguously for search-friendly access.
/// 段查找器状态：`(key_min[i] → i)` 上的回归、残差证书，及连续复制的
/// `key_min` 数组。
#[derive(Clone, Debug)]
pub struct Finder<K: Key> {
  slope: f64,
  intercept: f64,
  max_residual: u32,
  key_min: Vec<K>,
}

impl<K: Key> Finder<K> {
  /// Fit over the built segment array (least squares, then measure the
  /// certificate).
  /// 在已构建的段数组上拟合（最小二乘后实测证书）。
  pub(crate) fn fit(segments: &[Segment<K>]) -> Self {
    let key_min: Vec<K> = segments.iter().map(|s| s.key_min).collect();
    let m = key_min.len();
    if m <= 1 {
      return Self {
        slope: 0.0,
        intercept: 0.0,
        max_residual: 0,
        key_min,
      };
    }

    let n = m as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (i, k) in key_min.iter().enumerate() {
      let x = k.as_f64();
      let y = i as f64;
      sum_x += x;
      sum_y += y;
      sum_xy += x * y;
      sum_xx += x * x;
    }

    let denom = n * sum_xx - sum_x * sum_x;
    let (slope, intercept) = if denom.abs() < f64::EPSILON || !denom.is_finite() {
      // All minimum keys equivalent in f64: predict the middle segment.
      // 所有最小键在 f64 上等价：预测中间段。
      (0.0, (n - 1.0) * 0.5)
    } else {
      let slope = (n * sum_xy - sum_x * sum_y) / denom;
      let intercept = (sum_y - slope * sum_x) / n;
      (slope, intercept)
    };
    let (slope, intercept) = if slope.is_finite() && intercept.is_finite() {
      (slope, intercept)
    } else {
      (0.0, (n - 1.0) * 0.5)
    };

    let mut max_residual = 0u32;
    for (i, k) in key_min.iter().enumerate() {
      let pred = slope.mul_add(k.as_f64(), intercept);
      let err = (pred - i as f64).abs().ceil();
      max_residual = max_residual.max(err as u32);
    }

    dlog!("finder: {m} segments, slope={slope} max_residual={max_residual}");
    Self {
      slope,
      intercept,
      max_residual,
      key_min,
    }
  }

  #[inline]
  #[must_use]
  pub fn slope(&self) -> f64 {
    self.slope
  }

  #[inline]
  #[must_use]
  pub fn intercept(&self) -> f64 {
    self.intercept
  }

  #[inline]
  #[must_use]
  pub fn max_residual(&self) -> u32 {
    self.max_residual
  }

  /// Bytes held by the duplicated `key_min` array
  /// 复制的 `key_min` 数组占用的字节数
  #[inline]
  #[must_use]
  pub fn mem_usage(&self) -> usize {
    self.key_min.len() * size_of::<K>()
  }

  /// Arithmetic guess, clamped into `[0, n_segments - 1]`
  /// 算术猜测，截断到 `[0, n_segments - 1]`
  #[inline]
  #[must_use]
  pub fn predict(&self, key: f64) -> usize {
    if self.key_min.len() <= 1 {
      return 0;
    }
    let hi = self.key_min.len() - 1;
    let guess = self.slope.mul_add(key, self.intercept);
    if !(guess > 0.0) {
      0
    } else if guess >= hi as f64 {
      hi
    } else {
      guess as usize
    }
  }

  /// Locate a segment whose key range admits `key`, correcting the guess with
  /// a bounded three-way binary search inside the certified window. If the
  /// window misses (a gap key, or a key whose f64 image breaks the fit), the
  /// search widens to the whole segment array; a key falling strictly between
  /// two segments clamps to a valid index. Out-of-range semantics belong to
  /// the caller.
  /// 定位键范围包含 `key` 的段；先在证书窗口内做三路二分校正，未命中
  /// （空隙键或 f64 映射破坏拟合）则退回全段数组搜索；落在两段之间的键
  /// 截断到合法下标，越界语义由调用方处理。
  pub(crate) fn locate<O: Order<K>>(&self, key: &K, segments: &[Segment<K>], order: &O) -> usize {
    let m = segments.len();
    if m <= 1 {
      return 0;
    }

    let guess = self.predict(key.as_f64());
    let radius = self.max_residual as usize + 1;
    let lo = guess.saturating_sub(radius);
    let hi = (guess + radius).min(m - 1);

    match three_way(segments, key, order, lo, hi + 1) {
      Ok(j) => j,
      Err(_) => {
        dlog!("finder: window [{lo}, {hi}] missed, widening");
        match three_way(segments, key, order, 0, m) {
          Ok(j) => j,
          Err(ins) => ins.min(m - 1),
        }
      }
    }
  }
}

/// Three-way binary search over `[left, right)`: `Ok` with an admitting
/// segment, `Err` with the insertion point for a key no range admits.
/// `[left, right)` 上的三路二分：命中返回 `Ok`，无段包含时返回插入点。
fn three_way<K: Key, O: Order<K>>(
  segments: &[Segment<K>],
  key: &K,
  order: &O,
  mut left: usize,
  mut right: usize,
) -> std::result::Result<usize, usize> {
  while left < right {
    let mid = left + (right - left) / 2;
    let seg = &segments[mid];
    if order.lt(key, &seg.key_min) {
      right = mid;
    } else if order.lt(&seg.key_max, key) {
      left = mid + 1;
    } else {
      return Ok(mid);
    }
  }
  Err(left)
}
