//! Diagnostic logging at build and lookup decision points.
//! Compiles to a constant dead branch without the `dlog` feature.
//! 构建与查找决策点的诊断日志；未启用 `dlog` 特性时为零开销。

macro_rules! dlog {
  ($($t:tt)*) => {
    if cfg!(feature = "dlog") {
      log::trace!($($t)*);
    }
  };
}

pub(crate) use dlog;
