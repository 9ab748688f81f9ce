//! 起動処理
//!
//! 出力チャネルの準備待ち -> "starting!" -> タイマ設定。
//! タイマ設定に失敗したら LED を点灯させるだけで、止まらずにメインループへ進む。

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;

use crate::config::{ReadyWait, TimerConfig, STARTUP_MESSAGE};
use crate::console::{self, Console};
use crate::error::{ConsoleError, TimerError};
use crate::hal::{InterruptControl, TimerPeripheral};
use crate::timebase::TimeBase;
use crate::timer;

/// 起動結果
#[derive(Debug, PartialEq, Eq)]
pub struct StartupReport<E> {
    /// 準備待ちと "starting!" の出力結果
    pub console: Result<(), ConsoleError<E>>,
    pub timer: Result<TimeBase, TimerError>,
}

impl<E> StartupReport<E> {
    pub fn timer_running(&self) -> bool {
        self.timer.is_ok()
    }
}

pub fn bring_up<C, D, T, I, L>(
    console: &mut C,
    delay: &mut D,
    wait: ReadyWait,
    timer: &mut T,
    irq: &mut I,
    indicator: &mut L,
    config: &TimerConfig,
) -> StartupReport<C::Error>
where
    C: Console,
    D: DelayMs<u32>,
    T: TimerPeripheral,
    I: InterruptControl,
    L: OutputPin,
{
    let console_result = console::wait_ready(console, delay, wait)
        .and_then(|()| console.write_line(STARTUP_MESSAGE).map_err(ConsoleError::Io));

    let timer_result = timer::configure(timer, irq, config);
    if let Err(_e) = &timer_result {
        #[cfg(feature = "defmt")]
        defmt::error!("{}", _e);

        // LD2 点灯。ピン操作の失敗はどうしようもないので無視
        let _ = indicator.set_high();
    }

    StartupReport {
        console: console_result,
        timer: timer_result,
    }
}
