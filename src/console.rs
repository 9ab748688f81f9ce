//! 文字出力チャネル
//!
//! 実機では semihosting の stdout。起動時は準備完了を待つが、上限時間と中断条件を持たせて
//! 無限ループで固まらないようにする。

use embedded_hal::blocking::delay::DelayMs;

use crate::config::ReadyWait;
use crate::error::ConsoleError;

pub trait Console {
    type Error;

    /// 準備ができていれば Ok、まだなら WouldBlock
    fn poll_ready(&mut self) -> nb::Result<(), Self::Error>;

    /// 1行出力（改行は実装側で付ける）
    fn write_line(&mut self, line: &str) -> Result<(), Self::Error>;
}

/// 準備完了まで待つ（上限 `wait.timeout_ms`）
pub fn wait_ready<C, D>(console: &mut C, delay: &mut D, wait: ReadyWait) -> Result<(), ConsoleError<C::Error>>
where
    C: Console,
    D: DelayMs<u32>,
{
    wait_ready_or_cancel(console, delay, wait, || false)
}

/// 準備完了まで待つ。`cancelled` が true を返したらその時点でやめる
pub fn wait_ready_or_cancel<C, D, F>(
    console: &mut C,
    delay: &mut D,
    wait: ReadyWait,
    mut cancelled: F,
) -> Result<(), ConsoleError<C::Error>>
where
    C: Console,
    D: DelayMs<u32>,
    F: FnMut() -> bool,
{
    // 0 だと進まないので最低 1ms
    let step_ms = wait.step_ms.max(1);
    let mut waited_ms: u32 = 0;
    loop {
        match console.poll_ready() {
            Ok(()) => return Ok(()),
            Err(nb::Error::Other(e)) => return Err(ConsoleError::Io(e)),
            Err(nb::Error::WouldBlock) => {}
        }
        if cancelled() {
            return Err(ConsoleError::Cancelled);
        }
        if waited_ms >= wait.timeout_ms {
            return Err(ConsoleError::Timeout { waited_ms });
        }
        let step = step_ms.min(wait.timeout_ms - waited_ms);
        delay.delay_ms(step);
        waited_ms += step;
    }
}
