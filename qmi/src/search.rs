//! Directional bounded search: exponential expansion from the predicted
//! position, then a tail fallback over whatever the expansion left unexplored.
//! 方向性有界搜索：从预测位置指数扩张，再对未覆盖的剩余区间做收尾二分。
//!
//! The searched-boundary variable guarantees each position in the segment is
//! examined by at most one bounded binary search across all radii.

use crate::dlog::dlog;

/// First position in `slice` where `left_of` turns false
/// `slice` 中 `left_of` 首次为假的位置
#[inline]
fn partition<R>(slice: &[R], left_of: &impl Fn(&R) -> bool) -> usize {
  slice.partition_point(left_of)
}

/// Find a position equal to the key inside `[start, end)`, expanding outward
/// from `pred`. `lt_key(r)` is "record sorts before the key", `is_key(r)` is
/// equivalence; `go_left` was decided by the caller from one comparison at
/// `pred` (which is known not to match).
/// 在 `[start, end)` 内查找与键相等的位置，从 `pred` 向外扩张。
pub(crate) fn find_from<R>(
  data: &[R],
  start: usize,
  end: usize,
  pred: usize,
  max_radius: usize,
  go_left: bool,
  lt_key: impl Fn(&R) -> bool,
  is_key: impl Fn(&R) -> bool,
) -> Option<usize> {
  if go_left {
    // Rightmost already-searched position; never re-examined.
    // 右侧已搜索边界，不再重查。
    let mut right_boundary = pred;
    let mut radius = 1;
    while radius <= max_radius {
      let left_pos = pred.saturating_sub(radius).max(start);
      if left_pos >= right_boundary {
        break;
      }
      let p = left_pos + partition(&data[left_pos..right_boundary], &lt_key);
      if p < right_boundary && is_key(&data[p]) {
        return Some(p);
      }
      right_boundary = left_pos;
      radius <<= 1;
    }
    // Remaining unexplored left region.
    if right_boundary > start {
      dlog!("find: tail fallback left [{start}, {right_boundary})");
      let p = start + partition(&data[start..right_boundary], &lt_key);
      if p < right_boundary && is_key(&data[p]) {
        return Some(p);
      }
    }
    None
  } else {
    let mut left_boundary = pred + 1;
    let mut radius = 1;
    while radius <= max_radius {
      let right_pos = (pred + radius + 1).min(end);
      if right_pos <= left_boundary {
        break;
      }
      let p = left_boundary + partition(&data[left_boundary..right_pos], &lt_key);
      if p < right_pos && is_key(&data[p]) {
        return Some(p);
      }
      left_boundary = right_pos;
      radius <<= 1;
    }
    if left_boundary < end {
      dlog!("find: tail fallback right [{left_boundary}, {end})");
      let p = left_boundary + partition(&data[left_boundary..end], &lt_key);
      if p < end && is_key(&data[p]) {
        return Some(p);
      }
    }
    None
  }
}

/// Boundary position inside `[start, end]`: the first index whose record is
/// not `left_of` the key, located by directional exponential expansion from
/// `pred`. With `left_of = record ≺ key` this is the lower bound; with
/// `left_of = ¬(key ≺ record)` the upper bound.
/// `[start, end]` 内的边界位置：首个 `left_of` 为假的下标。
/// `left_of = 记录 ≺ 键` 时为下界，`left_of = ¬(键 ≺ 记录)` 时为上界。
pub(crate) fn bound_from<R>(
  data: &[R],
  start: usize,
  end: usize,
  pred: usize,
  max_radius: usize,
  left_of: impl Fn(&R) -> bool,
) -> usize {
  if left_of(&data[pred]) {
    // Boundary lies strictly right of pred.
    // 边界严格在 pred 右侧。
    let mut left_boundary = pred + 1;
    let mut radius = 1;
    while radius <= max_radius {
      let right_pos = (pred + radius + 1).min(end);
      if right_pos <= left_boundary {
        break;
      }
      let p = left_boundary + partition(&data[left_boundary..right_pos], &left_of);
      if p < right_pos {
        // Transition found; everything left of it is already known left_of.
        return p;
      }
      left_boundary = right_pos;
      radius <<= 1;
    }
    if left_boundary < end {
      dlog!("bound: tail fallback right [{left_boundary}, {end})");
      return left_boundary + partition(&data[left_boundary..end], &left_of);
    }
    end
  } else {
    // pred itself is past the boundary; scan left for the transition.
    // pred 已在边界之后，向左找转折点。
    let mut right_boundary = pred;
    let mut radius = 1;
    while radius <= max_radius {
      let left_pos = pred.saturating_sub(radius).max(start);
      if left_pos >= right_boundary {
        break;
      }
      let p = left_pos + partition(&data[left_pos..right_boundary], &left_of);
      if p > left_pos {
        // data[p - 1] is left_of: definitive transition (p may equal the old
        // boundary, which is then the answer).
        return p;
      }
      right_boundary = left_pos;
      radius <<= 1;
    }
    if right_boundary > start {
      dlog!("bound: tail fallback left [{start}, {right_boundary})");
      return start + partition(&data[start..right_boundary], &left_of);
    }
    right_boundary
  }
}
