//! # qmi: learned quantile-model index
//! qmi：分位数模型学习索引
//!
//! An in-memory learned index over an immutable sorted array. The array is
//! cut into equal-count segments; each segment carries a small local model
//! (constant / linear / quadratic) predicting positions to within a certified
//! residual, and a learned segment finder maps keys to segments. Lookups
//! predict, then converge with a directional exponential search bounded by
//! the certificate.
//! 在不可变有序数组上的内存学习索引：等量切段，每段携带带残差证书的
//! 局部模型，学习型段查找器将键映射到段；查询先预测，再在证书界内
//! 用方向性指数搜索收敛。
//!
//! ## Usage / 使用方法
//!
//! ```rust
//! use qmi::Qmi;
//!
//! let data: Vec<u64> = (0..100_000).collect();
//! let idx: Qmi<u64> = Qmi::new(&data).unwrap();
//! assert_eq!(idx.find(12_345), Some(12_345));
//! assert_eq!(idx.find(100_000), None);
//! assert_eq!(idx.equal_range(500), (500, 501));
//! ```
//!
//! Records with an extracted key and a custom order:
//!
//! ```rust
//! use qmi::{Asc, Qmi, by_key};
//!
//! struct Row {
//!   id: u64,
//! }
//!
//! let rows: Vec<Row> = (0..100).map(|i| Row { id: i * 2 }).collect();
//! let idx = Qmi::<_, _, _, 64>::build(&rows, by_key(|r: &Row| r.id), Asc).unwrap();
//! assert_eq!(idx.find(40), Some(20));
//! assert_eq!(idx.find(41), None);
//! ```

pub mod analyze;
mod build;
pub mod consts;
mod dlog;
pub mod error;
mod export;
mod finder;
mod index;
mod key;
mod model;
mod search;
mod seg;

pub use analyze::{Analysis, analyze};
pub use build::{Prepared, Task};
pub use consts::seg_count;
pub use error::{Error, Result};
pub use finder::Finder;
pub use index::{Qmi, Stats};
pub use key::{Asc, ByKey, Desc, Extract, Ident, Key, Order, by_key};
pub use model::{Model, ModelKind};
pub use seg::Segment;
