//! Build pipeline: sortedness check, quantile segmentation, per-segment
//! analysis tasks, and finalization into an index.
//! 构建流水线：有序性检查、分位数切段、逐段分析任务与索引定稿。
//!
//! `prepare` → `tasks` → `finalize` is the custom-concurrency surface;
//! `build` and `build_parallel` on the index are the one-call forms.

use rayon::prelude::*;

use crate::{
  Error, Extract, Order, Qmi, Result,
  analyze::{Analysis, analyze},
  consts::SEGMENTS_LIMIT,
  dlog::dlog,
  finder::Finder,
  seg::Segment,
};

/// One independent segment-analysis task: a thin handle over a disjoint
/// slice of the input. Safe to run on any thread.
/// 单个独立的段分析任务：输入不相交切片上的轻量句柄，可在任意线程执行。
#[derive(Clone, Debug)]
pub struct Task<'a, R, X, O> {
  pub seg: usize,
  pub start: usize,
  pub end: usize,
  data: &'a [R],
  extract: X,
  order: O,
}

impl<R, X, O> Task<'_, R, X, O>
where
  X: Extract<R>,
  O: Order<X::Key>,
{
  /// Run the analysis for this segment
  /// 执行本段分析
  #[must_use]
  pub fn run(&self) -> Analysis {
    analyze(self.data, self.start, self.end, &self.extract, &self.order)
  }
}

/// Build state between segmentation and finalization. The quantile boundaries
/// are fixed here; analysis results are installed by `finalize`.
/// 切段与定稿之间的构建状态：分位数边界在此确定，分析结果由 `finalize` 安装。
pub struct Prepared<'a, R, X, O, const N: usize>
where
  X: Extract<R>,
  O: Order<X::Key>,
{
  data: &'a [R],
  extract: X,
  order: O,
  ranges: Vec<(usize, usize)>,
}

impl<'a, R, X, O, const N: usize> Prepared<'a, R, X, O, N>
where
  X: Extract<R>,
  O: Order<X::Key>,
{
  /// Check order, fix quantile boundaries, and capture the inputs.
  /// 检查有序性，确定分位数边界并保存输入。
  ///
  /// # Errors
  /// `Error::Unsorted` names the first position whose key sorts before its
  /// predecessor.
  pub(crate) fn new(data: &'a [R], extract: X, order: O) -> Result<Self> {
    const {
      assert!(N >= 1 && N <= SEGMENTS_LIMIT, "segment count out of [1, 4096]");
    }

    let n = data.len();
    if n > 1 {
      let mut prev = extract.key(&data[0]);
      for (i, r) in data.iter().enumerate().skip(1) {
        let k = extract.key(r);
        if order.lt(&k, &prev) {
          return Err(Error::Unsorted { pos: i });
        }
        prev = k;
      }
    }

    // Equal-count segments; integer division tolerates a one-record imbalance.
    // 等量切段；整除允许一条记录的偏差。
    let m = N.min(n);
    let ranges = (0..m).map(|i| (i * n / m, (i + 1) * n / m)).collect();
    dlog!("prepare: {n} records into {m} segments");

    Ok(Self {
      data,
      extract,
      order,
      ranges,
    })
  }

  #[inline]
  #[must_use]
  pub fn segment_count(&self) -> usize {
    self.ranges.len()
  }

  /// The independent analysis tasks, in segment order
  /// 按段序排列的独立分析任务
  #[must_use]
  pub fn tasks(&self) -> Vec<Task<'a, R, X, O>> {
    self
      .ranges
      .iter()
      .enumerate()
      .map(|(seg, &(start, end))| Task {
        seg,
        start,
        end,
        data: self.data,
        extract: self.extract.clone(),
        order: self.order.clone(),
      })
      .collect()
  }

  /// Install analysis results (one per segment, in segment order), fit the
  /// segment finder, and produce the immutable index.
  /// 按段序安装分析结果，拟合段查找器，生成不可变索引。
  ///
  /// # Errors
  /// `Error::ResultMismatch` on a wrong result count,
  /// `Error::ResidualOverflow` when a residual does not fit the certificate.
  pub fn finalize(self, results: Vec<Analysis>) -> Result<Qmi<'a, R, X, O, N>> {
    if results.len() != self.ranges.len() {
      return Err(Error::ResultMismatch {
        expected: self.ranges.len(),
        got: results.len(),
      });
    }

    let mut segments = Vec::with_capacity(self.ranges.len());
    for (seg, (&(start, end), a)) in self.ranges.iter().zip(&results).enumerate() {
      if a.max_residual > u32::MAX as usize {
        return Err(Error::ResidualOverflow {
          seg,
          residual: a.max_residual,
        });
      }
      dlog!(
        "segment {seg} [{start}, {end}): {} max_residual={}",
        a.model.kind().name(),
        a.max_residual
      );
      segments.push(Segment::new(
        self.extract.key(&self.data[start]),
        self.extract.key(&self.data[end - 1]),
        start,
        end,
        a.model,
        a.max_residual as u32,
      ));
    }

    let finder = Finder::fit(&segments);
    Ok(Qmi::from_parts(
      self.data,
      self.extract,
      self.order,
      segments,
      finder,
    ))
  }

  /// Run all tasks sequentially and finalize
  /// 顺序执行全部任务并定稿
  pub(crate) fn run_sequential(self) -> Result<Qmi<'a, R, X, O, N>> {
    let results = self.tasks().iter().map(Task::run).collect();
    self.finalize(results)
  }

  /// Dispatch the tasks to the rayon pool and finalize. Each task reads a
  /// disjoint slice and writes its own result slot; collection preserves
  /// segment order.
  /// 将任务派发到 rayon 线程池并定稿；各任务读不相交切片，结果按段序收集。
  pub(crate) fn run_parallel(self) -> Result<Qmi<'a, R, X, O, N>>
  where
    R: Sync,
  {
    let results = self.tasks().into_par_iter().map(|t| t.run()).collect();
    self.finalize(results)
  }
}
