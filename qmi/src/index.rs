//! The index: a two-level learned model over a borrowed sorted slice.
//! 索引主体：借用有序切片上的两级学习模型。
//!
//! Immutable after build; every query is a pure read, so arbitrary threads
//! may query concurrently without locks.

#![allow(clippy::cast_precision_loss)]

use rayon::prelude::*;

use crate::{
  Asc, Extract, Ident, Key, Order, Result,
  build::Prepared,
  consts::seg_count,
  dlog::dlog,
  export,
  finder::Finder,
  search,
  seg::Segment,
};

/// Lightweight statistics of the built state
/// 已构建状态的轻量统计
#[derive(Clone, Debug, Default)]
pub struct Stats {
  pub segments: usize,
  pub avg_segment_size: f64,
  pub memory_bytes: usize,
}

/// Learned index over an immutable sorted array.
/// 不可变有序数组上的学习型索引。
///
/// `R` is the record type, `X` the key accessor (identity for scalar keys),
/// `O` the total order, and `N` the compile-time segment bound (presets in
/// [`seg_count`](crate::consts::seg_count)). The index borrows the records
/// for its lifetime and answers every query with integer positions.
#[derive(Clone, Debug)]
pub struct Qmi<'a, R, X = Ident, O = Asc, const N: usize = { seg_count::LARGE }>
where
  X: Extract<R>,
  O: Order<X::Key>,
{
  data: &'a [R],
  extract: X,
  order: O,
  segments: Vec<Segment<X::Key>>,
  finder: Finder<X::Key>,
  /// Global key range; `None` for the empty index
  /// 全局键范围；空索引为 `None`
  bounds: Option<(X::Key, X::Key)>,
}

impl<'a, K: Key, const N: usize> Qmi<'a, K, Ident, Asc, N> {
  /// Build over plain scalar keys in natural order
  /// 在自然序标量键上构建
  ///
  /// # Errors
  /// `Error::Unsorted` if the data violates ascending order.
  pub fn new(data: &'a [K]) -> Result<Self> {
    Self::build(data, Ident, Asc)
  }
}

impl<'a, R, X, O, const N: usize> Qmi<'a, R, X, O, N>
where
  X: Extract<R>,
  O: Order<X::Key>,
{
  /// Sequential build
  /// 顺序构建
  ///
  /// # Errors
  /// `Error::Unsorted` names the first out-of-order position.
  pub fn build(data: &'a [R], extract: X, order: O) -> Result<Self> {
    Prepared::<R, X, O, N>::new(data, extract, order)?.run_sequential()
  }

  /// Parallel build: the independent per-segment analyses run on the rayon
  /// pool, then results are installed in segment order. Produces an index
  /// that answers every query identically to [`build`](Self::build).
  /// 并行构建：独立的逐段分析在 rayon 线程池执行，结果按段序安装；
  /// 查询结果与顺序构建完全一致。
  ///
  /// # Errors
  /// Same as [`build`](Self::build).
  pub fn build_parallel(data: &'a [R], extract: X, order: O) -> Result<Self>
  where
    R: Sync,
  {
    Prepared::<R, X, O, N>::new(data, extract, order)?.run_parallel()
  }

  /// Two-phase build for custom concurrency: returns the prepared state whose
  /// [`tasks`](Prepared::tasks) may be executed anywhere before
  /// [`finalize`](Prepared::finalize).
  /// 两阶段构建：返回可在任意线程模型下执行任务的准备态。
  ///
  /// # Errors
  /// `Error::Unsorted` surfaces here.
  pub fn prepare(data: &'a [R], extract: X, order: O) -> Result<Prepared<'a, R, X, O, N>> {
    Prepared::new(data, extract, order)
  }

  pub(crate) fn from_parts(
    data: &'a [R],
    extract: X,
    order: O,
    segments: Vec<Segment<X::Key>>,
    finder: Finder<X::Key>,
  ) -> Self {
    let bounds = match (segments.first(), segments.last()) {
      (Some(first), Some(last)) => Some((first.key_min, last.key_max)),
      _ => None,
    };
    Self {
      data,
      extract,
      order,
      segments,
      finder,
      bounds,
    }
  }

  /// Position of a key equivalent to `key` under the order, or `None`.
  /// With duplicates any equivalent position may be returned.
  /// 返回序下与 `key` 等价的某个位置；不存在则为 `None`。
  #[must_use]
  pub fn find(&self, key: X::Key) -> Option<usize> {
    let (key_min, key_max) = self.bounds?;
    let o = &self.order;
    if o.lt(&key, &key_min) || o.lt(&key_max, &key) {
      return None;
    }

    let j = self.finder.locate(&key, &self.segments, o);
    let seg = &self.segments[j];
    if o.lt(&key, &seg.key_min) || o.lt(&seg.key_max, &key) {
      // Key falls in the gap between two segments.
      // 键落在两段之间的空隙。
      dlog!("find: key in gap at segment {j}");
      return None;
    }

    let pred = seg.predict(key);
    let at_pred = self.extract.key(&self.data[pred]);
    if o.equiv(&at_pred, &key) {
      return Some(pred);
    }

    let go_left = o.lt(&key, &at_pred);
    dlog!(
      "find: segment {j} pred={pred} radius={} dir={}",
      seg.search_radius(),
      if go_left { "left" } else { "right" }
    );
    search::find_from(
      self.data,
      seg.idx_start,
      seg.idx_end,
      pred,
      seg.search_radius(),
      go_left,
      |r| o.lt(&self.extract.key(r), &key),
      |r| o.equiv(&self.extract.key(r), &key),
    )
  }

  /// Position of the first key `⪰ key`, or `len()` if none
  /// 首个 `⪰ key` 的位置；不存在则为 `len()`
  #[must_use]
  pub fn lower_bound(&self, key: X::Key) -> usize {
    let Some((key_min, key_max)) = self.bounds else {
      return 0;
    };
    let o = &self.order;
    if o.lt(&key, &key_min) {
      return 0;
    }
    if o.lt(&key_max, &key) {
      return self.data.len();
    }

    let seg = &self.segments[self.lower_seg(&key)];
    let pred = seg.predict(key);
    search::bound_from(
      self.data,
      seg.idx_start,
      seg.idx_end,
      pred,
      seg.search_radius(),
      |r| o.lt(&self.extract.key(r), &key),
    )
  }

  /// Position of the first key `≻ key`, or `len()` if none
  /// 首个 `≻ key` 的位置；不存在则为 `len()`
  #[must_use]
  pub fn upper_bound(&self, key: X::Key) -> usize {
    let Some((key_min, key_max)) = self.bounds else {
      return 0;
    };
    let o = &self.order;
    if o.lt(&key, &key_min) {
      return 0;
    }
    if o.lt(&key_max, &key) {
      return self.data.len();
    }

    let seg = &self.segments[self.upper_seg(&key)];
    let pred = seg.predict(key);
    search::bound_from(
      self.data,
      seg.idx_start,
      seg.idx_end,
      pred,
      seg.search_radius(),
      |r| !o.lt(&key, &self.extract.key(r)),
    )
  }

  /// `(lower_bound(key), upper_bound(key))`
  #[inline]
  #[must_use]
  pub fn equal_range(&self, key: X::Key) -> (usize, usize) {
    (self.lower_bound(key), self.upper_bound(key))
  }

  /// Model-predicted position for `key`, clamped into the located segment.
  /// A prediction, not an answer: the true position lies within
  /// [`predict_range`](Self::predict_range) of it.
  /// `key` 的模型预测位置（截断到所在段）；真实位置在
  /// [`predict_range`](Self::predict_range) 之内。
  #[must_use]
  pub fn predict(&self, key: X::Key) -> usize {
    if self.segments.is_empty() {
      return 0;
    }
    let j = self.finder.locate(&key, &self.segments, &self.order);
    self.segments[j].predict(key)
  }

  /// Search window `[start, end)` implied by the located segment's residual
  /// certificate: when the certificate holds, an occurrence of `key` lies
  /// inside it.
  /// 由所在段残差证书推出的搜索窗口 `[start, end)`：证书成立时，
  /// `key` 的匹配位置在窗口之内。
  #[must_use]
  pub fn predict_range(&self, key: X::Key) -> (usize, usize) {
    if self.segments.is_empty() {
      return (0, 0);
    }
    let j = self.finder.locate(&key, &self.segments, &self.order);
    let seg = &self.segments[j];
    let pred = seg.predict(key);
    let radius = seg.search_radius();
    let start = pred.saturating_sub(radius).max(seg.idx_start);
    let end = (pred + radius + 1).min(seg.idx_end);
    (start, end)
  }

  /// Batch lookup, one result per probe in order
  /// 批量查找，按探针顺序返回
  pub fn find_many<I>(&self, keys: I) -> Vec<Option<usize>>
  where
    I: IntoIterator<Item = X::Key>,
  {
    keys.into_iter().map(|k| self.find(k)).collect()
  }

  /// Count probes that hit a stored key
  /// 统计命中的探针数
  pub fn count_hits<I>(&self, keys: I) -> usize
  where
    I: IntoIterator<Item = X::Key>,
  {
    keys.into_iter().filter(|&k| self.find(k).is_some()).count()
  }

  /// Parallel batch lookup on the rayon pool; queries are pure reads, so any
  /// number may run concurrently.
  /// rayon 线程池上的并行批量查找；查询为纯读，可任意并发。
  pub fn find_many_parallel(&self, keys: &[X::Key]) -> Vec<Option<usize>>
  where
    R: Sync,
  {
    keys.par_iter().map(|&k| self.find(k)).collect()
  }

  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.data.len()
  }

  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  #[inline]
  #[must_use]
  pub fn segment_count(&self) -> usize {
    self.segments.len()
  }

  /// Read-only view of the segment descriptors
  /// 段描述符的只读视图
  #[inline]
  #[must_use]
  pub fn segments(&self) -> &[Segment<X::Key>] {
    &self.segments
  }

  #[inline]
  #[must_use]
  pub fn finder(&self) -> &Finder<X::Key> {
    &self.finder
  }

  /// Index memory excluding the borrowed records
  /// 不含借用记录的索引内存占用
  #[inline]
  #[must_use]
  pub fn mem_usage(&self) -> usize {
    self.segments.len() * size_of::<Segment<X::Key>>() + self.finder.mem_usage()
  }

  #[must_use]
  pub fn stats(&self) -> Stats {
    Stats {
      segments: self.segments.len(),
      avg_segment_size: self.data.len() as f64 / self.segments.len().max(1) as f64,
      memory_bytes: self.mem_usage(),
    }
  }

  /// Metadata document of the built state (schema stable for tooling)
  /// 已构建状态的元数据文档（供工具使用的稳定模式）
  #[must_use]
  pub fn export_metadata(&self) -> String {
    export::metadata(self)
  }

  pub(crate) fn raw_parts(
    &self,
  ) -> (
    &[R],
    &X,
    &Finder<X::Key>,
    &[Segment<X::Key>],
    Option<(X::Key, X::Key)>,
  ) {
    (
      self.data,
      &self.extract,
      &self.finder,
      &self.segments,
      self.bounds,
    )
  }

  /// First segment whose key range admits `key`. Duplicate runs can span
  /// segments; the learned guess is corrected to the run's first segment with
  /// a partition over the monotone `key_max` sequence.
  /// 键范围包含 `key` 的首段；重复键可跨段，用 `key_max` 单调序列上的
  /// 二分把学习猜测修正到游程首段。
  fn lower_seg(&self, key: &X::Key) -> usize {
    let o = &self.order;
    let segs = &self.segments;
    let j = self.finder.locate(key, segs, o);
    if o.lt(&segs[j].key_max, key) {
      // Clamped into a gap below the key.
      j + 1 + segs[j + 1..].partition_point(|s| o.lt(&s.key_max, key))
    } else {
      segs[..=j].partition_point(|s| o.lt(&s.key_max, key))
    }
  }

  /// Last segment whose key range admits `key`
  /// 键范围包含 `key` 的末段
  fn upper_seg(&self, key: &X::Key) -> usize {
    let o = &self.order;
    let segs = &self.segments;
    let j = self.finder.locate(key, segs, o);
    if o.lt(key, &segs[j].key_min) {
      // Clamped into a gap above the key; global min ⪯ key keeps this ≥ 1.
      segs[..j].partition_point(|s| !o.lt(key, &s.key_min)) - 1
    } else {
      j + segs[j..].partition_point(|s| !o.lt(key, &s.key_min)) - 1
    }
  }
}
