//! Segment analyser: fits candidate local models over a contiguous range and
//! picks the cheapest one meeting the error budget.
//! 段分析器：在连续区间上拟合候选局部模型，选出满足误差预算且求值最廉价者。
//!
//! Pure and re-entrant: reads only `[start, end)`, mutates nothing, safe to
//! run concurrently on disjoint ranges.

#![allow(clippy::cast_precision_loss)]

use crate::{
  Extract, Key, Order,
  consts::{MAX_LINEAR_RESIDUAL, QUADRATIC_DET_FLOOR, QUADRATIC_GAIN},
  dlog::dlog,
  model::Model,
};

/// Analyser output: the selected model and its measured residuals
/// 分析器输出：选定模型及其实测残差
#[derive(Clone, Copy, Debug)]
pub struct Analysis {
  pub model: Model,
  pub max_residual: usize,
  pub mean_residual: f64,
}

impl Analysis {
  #[inline]
  fn constant(start: usize, max_residual: usize) -> Self {
    Self {
      model: Model::Constant(start),
      max_residual,
      mean_residual: 0.0,
    }
  }
}

/// Analyse `[start, end)` of the sorted record slice and select a model.
/// 分析已排序记录切片的 `[start, end)` 区间并选择模型。
///
/// Decision order: constant short-circuits, endpoint linear fit, quadratic
/// attempt only when linear misses the budget, non-finite fallback.
pub fn analyze<R, X, O>(data: &[R], start: usize, end: usize, extract: &X, order: &O) -> Analysis
where
  X: Extract<R>,
  O: Order<X::Key>,
{
  let n = end - start;
  if n <= 1 {
    return Analysis::constant(start, 0);
  }

  let first = extract.key(&data[start]);
  if data[start + 1..end]
    .iter()
    .all(|r| order.equiv(&extract.key(r), &first))
  {
    dlog!("analyze [{start}, {end}): all keys equal, CONSTANT");
    return Analysis::constant(start, 0);
  }

  let k0 = first.as_f64();
  let k1 = extract.key(&data[end - 1]).as_f64();
  let span = k1 - k0;
  // Degenerate span: keys differ under the order but not in f64.
  // 退化键距：序下不同但 f64 上不可分。
  if span.abs() < f64::EPSILON {
    return Analysis::constant(start, 0);
  }

  // Endpoint linear fit: index = a·key + b. The span may be negative under a
  // reverse order; a negative slope keeps the certificate valid.
  // 端点线性拟合；逆序下斜率为负，证书依然成立。
  let a = (n - 1) as f64 / span;
  let b = start as f64 - a * k0;
  if !a.is_finite() || !b.is_finite() {
    return Analysis::constant(start, n - 1);
  }

  let linear = Model::Linear { a, b };
  let (linear_max, linear_mean) = measure(data, start, end, extract, &linear);

  if linear_max <= MAX_LINEAR_RESIDUAL {
    dlog!("analyze [{start}, {end}): LINEAR max_residual={linear_max}");
    return Analysis {
      model: linear,
      max_residual: linear_max,
      mean_residual: linear_mean,
    };
  }

  if let Some(quad) = fit_quadratic(data, start, end, extract) {
    let (quad_max, quad_mean) = measure(data, start, end, extract, &quad);
    if (quad_max as f64) < linear_max as f64 * QUADRATIC_GAIN {
      dlog!(
        "analyze [{start}, {end}): QUADRATIC max_residual={quad_max} (linear {linear_max})"
      );
      return Analysis {
        model: quad,
        max_residual: quad_max,
        mean_residual: quad_mean,
      };
    }
  }

  dlog!("analyze [{start}, {end}): LINEAR max_residual={linear_max} (quadratic rejected)");
  Analysis {
    model: linear,
    max_residual: linear_max,
    mean_residual: linear_mean,
  }
}

/// Max (ceiled) and mean absolute residual of `model` over the range
/// 模型在区间上的最大（向上取整）与平均绝对残差
fn measure<R, X: Extract<R>>(
  data: &[R],
  start: usize,
  end: usize,
  extract: &X,
  model: &Model,
) -> (usize, f64) {
  let mut max = 0usize;
  let mut total = 0.0;
  for (i, r) in data[start..end].iter().enumerate() {
    let pred = model.eval(extract.key(r).as_f64());
    let err = (pred - (start + i) as f64).abs();
    max = max.max(err.ceil() as usize);
    total += err;
  }
  (max, total / (end - start) as f64)
}

/// Ordinary-least-squares quadratic via the 3×3 normal equations, solved by
/// Cramer's rule. The fit runs with the segment's first key as the origin to
/// keep the system well conditioned, then the coefficients are expanded back
/// to raw key space (which the descriptor stores and `predict` evaluates).
/// Returns None when the system is ill-conditioned or the fit is non-finite.
/// 通过 3×3 正规方程做二次最小二乘（Cramer 求解）；以段首键为原点拟合
/// 以保持良态，再展开回原始键空间。病态或非有限时返回 None。
fn fit_quadratic<R, X: Extract<R>>(
  data: &[R],
  start: usize,
  end: usize,
  extract: &X,
) -> Option<Model> {
  let origin = extract.key(&data[start]).as_f64();
  let mut s1 = 0.0;
  let mut s2 = 0.0;
  let mut s3 = 0.0;
  let mut s4 = 0.0;
  let mut t0 = 0.0;
  let mut t1 = 0.0;
  let mut t2 = 0.0;

  for (i, r) in data[start..end].iter().enumerate() {
    let x = extract.key(r).as_f64() - origin;
    let y = (start + i) as f64;
    let x2 = x * x;
    s1 += x;
    s2 += x2;
    s3 += x2 * x;
    s4 += x2 * x2;
    t0 += y;
    t1 += x * y;
    t2 += x2 * y;
  }

  let n = (end - start) as f64;
  let denom = s4 * (s2 * n - s1 * s1) - s3 * (s3 * n - s1 * s2) + s2 * (s3 * s1 - s2 * s2);
  if !(denom.abs() > QUADRATIC_DET_FLOOR) {
    return None;
  }

  let a = (t2 * (s2 * n - s1 * s1) - s3 * (t1 * n - t0 * s1) + s2 * (t1 * s1 - t0 * s2)) / denom;
  let b = (s4 * (t1 * n - t0 * s1) - t2 * (s3 * n - s1 * s2) + s2 * (s3 * t0 - t1 * s2)) / denom;
  let c = (t0 - a * s2 - b * s1) / n;

  // Expand y = a·x'² + b·x' + c with x' = x − origin back to raw keys.
  let b_raw = b - 2.0 * a * origin;
  let c_raw = (a * origin - b) * origin + c;

  if !(a.is_finite() && b_raw.is_finite() && c_raw.is_finite()) {
    return None;
  }

  Some(Model::Quadratic {
    a,
    b: b_raw,
    c: c_raw,
  })
}
