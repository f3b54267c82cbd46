//! Key, order, and key-accessor seams
//! 键、排序与取键接口

use std::{fmt::Debug, marker::PhantomData};

use num_traits::AsPrimitive;

/// Key trait for supported numeric types
/// 支持的键类型约束
pub trait Key: Copy + PartialOrd + AsPrimitive<f64> + Send + Sync + Debug + 'static {
  /// Convert to f64 for model arithmetic
  /// 转换为 f64 供模型计算
  #[inline(always)]
  #[must_use]
  fn as_f64(self) -> f64 {
    self.as_()
  }
}

macro_rules! impl_key {
  ($($t:ty),*) => {
    $(
      impl Key for $t {}
    )*
  };
}

impl_key!(u8, i8, u16, i16, u32, i32, u64, i64, usize, isize, f32, f64);

/// Total order over keys; `lt` is a strict-weak-order "less than".
/// Equivalence is derived: `!lt(a,b) && !lt(b,a)`.
/// 键的全序；`lt` 为严格弱序的小于，等价关系由其导出。
pub trait Order<K>: Clone + Send + Sync {
  fn lt(&self, a: &K, b: &K) -> bool;

  /// `a ⪯ b` under the order
  #[inline]
  fn le(&self, a: &K, b: &K) -> bool {
    !self.lt(b, a)
  }

  /// Equivalence under the order
  /// 序下的等价
  #[inline]
  fn equiv(&self, a: &K, b: &K) -> bool {
    !self.lt(a, b) && !self.lt(b, a)
  }
}

/// Natural ascending order (default)
/// 自然升序（默认）
#[derive(Clone, Copy, Debug, Default)]
pub struct Asc;

impl<K: PartialOrd> Order<K> for Asc {
  #[inline(always)]
  fn lt(&self, a: &K, b: &K) -> bool {
    a < b
  }
}

/// Reverse order, for descending-sorted data
/// 逆序，用于降序数据
#[derive(Clone, Copy, Debug, Default)]
pub struct Desc;

impl<K: PartialOrd> Order<K> for Desc {
  #[inline(always)]
  fn lt(&self, a: &K, b: &K) -> bool {
    b < a
  }
}

impl<K, F> Order<K> for F
where
  F: Fn(&K, &K) -> bool + Clone + Send + Sync,
{
  #[inline(always)]
  fn lt(&self, a: &K, b: &K) -> bool {
    self(a, b)
  }
}

/// Key accessor φ: extracts an ordered numeric key from a record.
/// 取键函数 φ：从记录中提取可排序的数值键。
pub trait Extract<R>: Clone + Send + Sync {
  type Key: Key;

  fn key(&self, rec: &R) -> Self::Key;
}

/// Identity accessor for plain scalar keys
/// 标量键的恒等访问器
#[derive(Clone, Copy, Debug, Default)]
pub struct Ident;

impl<K: Key> Extract<K> for Ident {
  type Key = K;

  #[inline(always)]
  fn key(&self, rec: &K) -> K {
    *rec
  }
}

/// Closure adapter for record types; the marker pins the key type the
/// closure produces. Build one with [`by_key`].
/// 记录类型的闭包适配器；标记固定闭包产出的键类型。用 [`by_key`] 构造。
#[derive(Clone, Copy, Debug)]
pub struct ByKey<F, K>(F, PhantomData<K>);

/// Key accessor from a closure: `by_key(|r: &Row| r.id)`
/// 由闭包构造取键函数
#[inline]
pub fn by_key<R, K, F>(f: F) -> ByKey<F, K>
where
  K: Key,
  F: Fn(&R) -> K + Clone + Send + Sync,
{
  ByKey(f, PhantomData)
}

impl<R, K, F> Extract<R> for ByKey<F, K>
where
  K: Key,
  F: Fn(&R) -> K + Clone + Send + Sync,
{
  type Key = K;

  #[inline(always)]
  fn key(&self, rec: &R) -> K {
    (self.0)(rec)
  }
}
