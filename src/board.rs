//! NUCLEO-F446RE 向けの実装
//!
//! TIM2 はレジスタ直叩き(PAC)、NVIC は cortex-m、出力は semihosting。

use core::fmt::{self, Write};

use cortex_m::peripheral::NVIC;
use cortex_m_semihosting::hio;
use stm32f4::stm32f446::{Interrupt, NVIC_PRIO_BITS, TIM2};

use crate::console::Console;
use crate::error::HalError;
use crate::hal::{BaseConfig, ClockDivision, CountDirection, InterruptControl, TimerId, TimerPeripheral};
use crate::timebase::PRESCALER_MAX;

// HAL のタイマハンドルと同じ状態遷移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Reset,
    Ready,
    Busy,
}

/// TIM2（32bit、APB1）
///
/// RCC の APB1ENR.TIM2EN は呼び出し側で有効にしておくこと。
pub struct Tim2 {
    tim: TIM2,
    state: State,
}

impl Tim2 {
    pub fn new(tim: TIM2) -> Self {
        Self {
            tim,
            state: State::Reset,
        }
    }
}

impl TimerPeripheral for Tim2 {
    fn id(&self) -> TimerId {
        TimerId::Tim2
    }

    fn init_base(&mut self, config: &BaseConfig) -> Result<(), HalError> {
        if self.state == State::Busy {
            return Err(HalError::Busy);
        }
        let time_base = config.time_base;
        if time_base.prescaler > PRESCALER_MAX {
            return Err(HalError::InvalidParameter);
        }

        // 設定中はカウント停止
        self.tim.cr1.modify(|_, w| w.cen().disabled());

        self.tim.cr1.modify(|_, w| {
            let w = match config.direction {
                CountDirection::Up => w.dir().up(),
                CountDirection::Down => w.dir().down(),
            };
            let w = match config.clock_division {
                ClockDivision::Div1 => w.ckd().div1(),
                ClockDivision::Div2 => w.ckd().div2(),
                ClockDivision::Div4 => w.ckd().div4(),
            };
            // ARPE 無効なら ARR の書き換えが即反映される
            let w = if config.auto_reload_preload {
                w.arpe().enabled()
            } else {
                w.arpe().disabled()
            };
            // UG では更新割り込みを出さない（オーバーフローのみ）
            w.urs().counter_only()
        });

        self.tim.psc.write(|w| unsafe { w.bits(time_base.prescaler) }); // プリスケーラ（何クロックで1カウントか設定）
        self.tim.arr.write(|w| unsafe { w.bits(time_base.period) }); // オートリロードレジスタ（カウント値設定）
        self.tim.egr.write(|w| w.ug().update()); // 更新生成（PSC をすぐ反映させる）
        self.tim.sr.modify(|_, w| w.uif().clear());

        self.state = State::Ready;
        Ok(())
    }

    fn start_interrupt(&mut self) -> Result<(), HalError> {
        match self.state {
            State::Reset => return Err(HalError::NotInitialized),
            State::Busy => return Err(HalError::Busy),
            State::Ready => {}
        }
        self.tim.dier.modify(|_, w| w.uie().enabled()); // 更新割り込み有効化
        self.tim.cr1.modify(|_, w| w.cen().enabled()); // カウント開始
        self.state = State::Busy;
        Ok(())
    }

    fn take_update(&mut self) -> bool {
        if self.tim.sr.read().uif().bit_is_clear() {
            return false;
        }
        self.tim.sr.modify(|_, w| w.uif().clear());
        true
    }
}

/// タイマの割り込み番号（TIM1/TIM8 と共有のエントリもある）
pub fn interrupt_of(timer: TimerId) -> Interrupt {
    match timer {
        TimerId::Tim1 | TimerId::Tim10 => Interrupt::TIM1_UP_TIM10,
        TimerId::Tim2 => Interrupt::TIM2,
        TimerId::Tim3 => Interrupt::TIM3,
        TimerId::Tim4 => Interrupt::TIM4,
        TimerId::Tim5 => Interrupt::TIM5,
        TimerId::Tim6 => Interrupt::TIM6_DAC,
        TimerId::Tim7 => Interrupt::TIM7,
        TimerId::Tim8 | TimerId::Tim13 => Interrupt::TIM8_UP_TIM13,
        TimerId::Tim9 => Interrupt::TIM1_BRK_TIM9,
        TimerId::Tim11 => Interrupt::TIM1_TRG_COM_TIM11,
        TimerId::Tim12 => Interrupt::TIM8_BRK_TIM12,
        TimerId::Tim14 => Interrupt::TIM8_TRG_COM_TIM14,
    }
}

pub struct Nvic {
    nvic: NVIC,
}

impl Nvic {
    pub fn new(nvic: NVIC) -> Self {
        Self { nvic }
    }
}

impl InterruptControl for Nvic {
    fn set_priority(&mut self, timer: TimerId, priority: u8) {
        // 優先度は上位 4bit だけ有効（下位に書いても無視される）
        let max = (1u8 << NVIC_PRIO_BITS) - 1;
        let prio = priority.min(max) << (8 - NVIC_PRIO_BITS);
        unsafe {
            self.nvic.set_priority(interrupt_of(timer), prio);
        }
    }

    fn unmask(&mut self, timer: TimerId) {
        unsafe {
            NVIC::unmask(interrupt_of(timer));
        }
    }
}

/// semihosting の stdout（デバッガ接続が必要）
pub struct SemihostingConsole {
    out: Option<hio::HStdout>,
}

impl SemihostingConsole {
    pub const fn new() -> Self {
        Self { out: None }
    }
}

impl Default for SemihostingConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for SemihostingConsole {
    type Error = fmt::Error;

    fn poll_ready(&mut self) -> nb::Result<(), fmt::Error> {
        if self.out.is_none() {
            self.out = hio::hstdout().ok();
        }
        match self.out {
            Some(_) => Ok(()),
            None => Err(nb::Error::WouldBlock),
        }
    }

    fn write_line(&mut self, line: &str) -> Result<(), fmt::Error> {
        let out = self.out.as_mut().ok_or(fmt::Error)?;
        writeln!(out, "{}", line)
    }
}
