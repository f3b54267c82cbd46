//! Capture sink for the `log` facade: an append-only, mutex-guarded buffer
//! with a getter and a clear, so tests can read diagnostic lines back.
//! `log` 门面的捕获接收器：互斥锁保护的追加缓冲区，带读取与清空，
//! 供测试回读诊断日志。

use std::fmt::Write;

use parking_lot::Mutex;

static BUF: Mutex<String> = Mutex::new(String::new());

struct Sink;

static SINK: Sink = Sink;

impl log::Log for Sink {
  fn enabled(&self, _: &log::Metadata) -> bool {
    true
  }

  fn log(&self, record: &log::Record) {
    let mut buf = BUF.lock();
    let _ = writeln!(buf, "{}", record.args());
  }

  fn flush(&self) {}
}

/// Install the capture sink at trace level. Idempotent; a no-op when another
/// logger is already installed.
/// 以 trace 级别安装捕获接收器；幂等，已有 logger 时为空操作。
pub fn init() {
  if log::set_logger(&SINK).is_ok() {
    log::set_max_level(log::LevelFilter::Trace);
  }
}

/// Snapshot of the captured lines
/// 已捕获内容的快照
#[must_use]
pub fn get() -> String {
  BUF.lock().clone()
}

/// Drop everything captured so far
/// 清空已捕获内容
pub fn clear() {
  BUF.lock().clear();
}
