//! Metadata export: a read-only JSON observer of the built state.
//! 元数据导出：已构建状态的只读 JSON 观察者。
//!
//! Field names are a stable contract for external tooling.

use serde::Serialize;
use serde_json::{Value, json};

use crate::{Extract, Key, Model, Order, Qmi};

#[derive(Serialize)]
struct Doc {
  size: usize,
  num_segments: usize,
  min: f64,
  max: f64,
  segment_finder: FinderDoc,
  keys: Vec<f64>,
  segments: Vec<SegDoc>,
}

#[derive(Serialize)]
struct FinderDoc {
  model_type: &'static str,
  max_error: u32,
  slope: f64,
  intercept: f64,
}

#[derive(Serialize)]
struct SegDoc {
  index: usize,
  start_idx: usize,
  end_idx: usize,
  min_val: f64,
  max_val: f64,
  max_error: u32,
  model_type: &'static str,
  params: Value,
}

pub(crate) fn metadata<R, X, O, const N: usize>(idx: &Qmi<R, X, O, N>) -> String
where
  X: Extract<R>,
  O: Order<X::Key>,
{
  let (data, extract, finder, segments, bounds) = idx.raw_parts();
  let (min, max) = bounds.map_or((0.0, 0.0), |(lo, hi)| (lo.as_f64(), hi.as_f64()));

  let doc = Doc {
    size: data.len(),
    num_segments: segments.len(),
    min,
    max,
    segment_finder: FinderDoc {
      model_type: "LINEAR",
      max_error: finder.max_residual(),
      slope: finder.slope(),
      intercept: finder.intercept(),
    },
    keys: data.iter().map(|r| extract.key(r).as_f64()).collect(),
    segments: segments
      .iter()
      .enumerate()
      .map(|(index, s)| SegDoc {
        index,
        start_idx: s.idx_start,
        end_idx: s.idx_end,
        min_val: s.key_min.as_f64(),
        max_val: s.key_max.as_f64(),
        max_error: s.max_residual,
        model_type: s.kind().name(),
        params: match s.model() {
          Model::Constant(c) => json!({ "constant_idx": c }),
          Model::Linear { a, b } => json!({ "slope": a, "intercept": b }),
          Model::Quadratic { a, b, c } => json!({ "a": a, "b": b, "c": c }),
        },
      })
      .collect(),
  };

  serde_json::to_string_pretty(&doc).expect("metadata document serializes")
}
