//! Error types / 错误类型

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
  /// Adjacent keys violate the order: key at `pos` sorts before key at `pos - 1`
  /// 相邻键违反排序：位置 `pos` 的键排在 `pos - 1` 之前
  #[error("input is not sorted: key at position {pos} sorts before its predecessor")]
  Unsorted { pos: usize },

  /// Segment residual does not fit the u32 certificate
  /// 段残差超出 u32 证书宽度
  #[error(
    "segment {seg} residual {residual} exceeds the u32 certificate; use fewer elements per segment or preprocess the data"
  )]
  ResidualOverflow { seg: usize, residual: usize },

  /// `finalize` received the wrong number of analysis results
  /// `finalize` 收到的分析结果数量不匹配
  #[error("expected {expected} analysis results, got {got}")]
  ResultMismatch { expected: usize, got: usize },
}
