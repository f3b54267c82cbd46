//! Cache-line segment descriptor
//! 缓存行段描述符

#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use crate::{
  Key,
  consts::{MIN_RADIUS, RADIUS_MARGIN},
  model::{Model, ModelKind},
};

/// Segment descriptor: key range, index range, packed local model, and the
/// residual certificate. Hot fields first; the three model variants share the
/// `[f64; 3]` payload so the whole record stays inside one cache line.
/// 段描述符：键范围、下标范围、紧凑局部模型与残差证书。
/// 热字段在前；三种模型共用 `[f64; 3]` 载荷，整体保持在一个缓存行内。
#[repr(C, align(64))]
#[derive(Clone, Copy, Debug)]
pub struct Segment<K: Key> {
  /// Closed key interval covered by this segment
  /// 本段覆盖的闭键区间
  pub key_min: K,
  pub key_max: K,
  /// Half-open index range in the record array; `idx_end - idx_start >= 1`
  /// 记录数组中的半开下标区间
  pub idx_start: usize,
  pub idx_end: usize,
  params: [f64; 3],
  /// Certificate: per-record prediction error never exceeds this
  /// 证书：逐记录预测误差不超过此值
  pub max_residual: u32,
  kind: ModelKind,
}

// One cache line for every supported key width.
const _: () = assert!(size_of::<Segment<u64>>() == 64);
const _: () = assert!(size_of::<Segment<f64>>() == 64);
const _: () = assert!(size_of::<Segment<u8>>() == 64);
const _: () = assert!(align_of::<Segment<u64>>() == 64);

impl<K: Key> Segment<K> {
  #[must_use]
  pub(crate) fn new(
    key_min: K,
    key_max: K,
    idx_start: usize,
    idx_end: usize,
    model: Model,
    max_residual: u32,
  ) -> Self {
    let (kind, params) = match model {
      Model::Constant(c) => (ModelKind::Constant, [c as f64, 0.0, 0.0]),
      Model::Linear { a, b } => (ModelKind::Linear, [a, b, 0.0]),
      Model::Quadratic { a, b, c } => (ModelKind::Quadratic, [a, b, c]),
    };
    Self {
      key_min,
      key_max,
      idx_start,
      idx_end,
      params,
      max_residual,
      kind,
    }
  }

  #[inline]
  #[must_use]
  pub fn kind(&self) -> ModelKind {
    self.kind
  }

  /// Typed view of the packed model
  /// 紧凑模型的类型化视图
  #[must_use]
  pub fn model(&self) -> Model {
    match self.kind {
      ModelKind::Constant => Model::Constant(self.params[0] as usize),
      ModelKind::Linear => Model::Linear {
        a: self.params[0],
        b: self.params[1],
      },
      ModelKind::Quadratic => Model::Quadratic {
        a: self.params[0],
        b: self.params[1],
        c: self.params[2],
      },
    }
  }

  /// Predict the global position of `key`, clamped into
  /// `[idx_start, idx_end - 1]`.
  /// 预测 `key` 的全局位置，截断到 `[idx_start, idx_end - 1]`。
  #[inline]
  #[must_use]
  pub fn predict(&self, key: K) -> usize {
    match self.kind {
      ModelKind::Constant => self.clamp(self.params[0] as usize),
      ModelKind::Linear => {
        let pred = key.as_f64().mul_add(self.params[0], self.params[1]);
        self.clamp_f64(pred)
      }
      ModelKind::Quadratic => {
        let x = key.as_f64();
        let pred = x.mul_add(x.mul_add(self.params[0], self.params[1]), self.params[2]);
        self.clamp_f64(pred)
      }
    }
  }

  /// Search radius for the correction step: the certificate plus one unit for
  /// the float→int rounding of the prediction and one for the rounding of the
  /// certificate itself, floored at 4.
  /// 校正步骤的搜索半径：证书加两格取整余量，下限为 4。
  #[inline]
  #[must_use]
  pub fn search_radius(&self) -> usize {
    (self.max_residual as usize + RADIUS_MARGIN).max(MIN_RADIUS)
  }

  #[inline]
  fn clamp(&self, pos: usize) -> usize {
    pos.clamp(self.idx_start, self.idx_end - 1)
  }

  // Round toward zero after clamping into the index range; NaN lands on the
  // low edge via the negated comparison.
  // 截断后向零取整；NaN 经取反比较落在下边界。
  #[inline]
  fn clamp_f64(&self, pred: f64) -> usize {
    let lo = self.idx_start;
    let hi = self.idx_end - 1;
    if !(pred > lo as f64) {
      lo
    } else if pred >= hi as f64 {
      hi
    } else {
      pred as usize
    }
  }
}
