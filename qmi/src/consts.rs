//! Model selection and search tuning constants
//! 模型选择与搜索调优常量

/// Linear models with residual ≤ 8 are accepted without trying quadratic.
/// The exponential search covers residual 8 in three windows (radii 2, 4, 8).
/// 线性残差 ≤ 8 直接接受，指数搜索三轮（半径 2、4、8）即可覆盖。
pub const MAX_LINEAR_RESIDUAL: usize = 8;

/// Quadratic must beat linear by 30% (residual < 0.7 × linear) to be worth 2 FMA.
/// 二次模型残差需比线性低 30% 才值得两次 FMA。
pub const QUADRATIC_GAIN: f64 = 0.7;

/// Determinant floor for the 3×3 normal equations; below it the system is
/// ill-conditioned and the quadratic fit is abandoned.
/// 3×3 正规方程的行列式下限，低于此值放弃二次拟合。
pub const QUADRATIC_DET_FLOOR: f64 = 1e-10;

/// Extra radius over the certificate: one unit for the float→int rounding of
/// the prediction, one for the rounding of the certificate itself.
/// 证书之外的额外半径：预测取整一格，证书取整一格。
pub const RADIUS_MARGIN: usize = 2;

/// Radius floor; amortises the search over tiny, well-fit segments.
/// 半径下限，摊平微小段上的搜索成本。
pub const MIN_RADIUS: usize = 4;

/// Hard bound on the compile-time segment count parameter.
/// 编译期段数参数的硬上限。
pub const SEGMENTS_LIMIT: usize = 4096;

/// Recommended segment count presets
/// 推荐段数预设
pub mod seg_count {
  pub const TINY: usize = 32;
  pub const SMALL: usize = 64;
  pub const MEDIUM: usize = 128;
  pub const LARGE: usize = 256;
  pub const XLARGE: usize = 512;
  pub const XXLARGE: usize = 1024;
  pub const MAX: usize = 2048;
}
