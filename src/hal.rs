//! ペリフェラルの抽象化
//!
//! 実機では board モジュールの実装(TIM2 / NVIC)を使い、テストでは偽物を差し込む。

use crate::error::HalError;
use crate::timebase::{CounterWidth, TimeBase};

/// タイマの識別子
///
/// 同じ割り込みエントリを複数のタイマで共有する場合に、どのタイマが発火したかを区別する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerId {
    Tim1,
    Tim2,
    Tim3,
    Tim4,
    Tim5,
    Tim6,
    Tim7,
    Tim8,
    Tim9,
    Tim10,
    Tim11,
    Tim12,
    Tim13,
    Tim14,
}

impl TimerId {
    /// カウンタ幅（STM32F446 では TIM2 と TIM5 だけ 32bit）
    pub const fn counter_width(self) -> CounterWidth {
        match self {
            Self::Tim2 | Self::Tim5 => CounterWidth::Bits32,
            _ => CounterWidth::Bits16,
        }
    }
}

/// カウント方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CountDirection {
    Up,
    Down,
}

/// デジタルフィルタ等のクロック分周(CR1.CKD)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockDivision {
    Div1,
    Div2,
    Div4,
}

/// ベース初期化で書き込む内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaseConfig {
    pub time_base: TimeBase,
    pub direction: CountDirection,
    pub clock_division: ClockDivision,
    /// ARR プリロード(CR1.ARPE)。無効なら新しい周期がすぐに反映される
    pub auto_reload_preload: bool,
}

impl BaseConfig {
    /// アップカウント、分周なし、ARR プリロード無効
    pub const fn periodic(time_base: TimeBase) -> Self {
        Self {
            time_base,
            direction: CountDirection::Up,
            clock_division: ClockDivision::Div1,
            auto_reload_preload: false,
        }
    }
}

/// ハードウェアタイマ
pub trait TimerPeripheral {
    fn id(&self) -> TimerId;

    fn counter_width(&self) -> CounterWidth {
        self.id().counter_width()
    }

    /// PSC/ARR/CR1 を設定する（カウントはまだ開始しない）
    fn init_base(&mut self, config: &BaseConfig) -> Result<(), HalError>;

    /// 更新割り込みを有効にしてカウント開始
    fn start_interrupt(&mut self) -> Result<(), HalError>;

    /// 更新フラグが立っていればクリアして true を返す
    fn take_update(&mut self) -> bool;
}

/// 割り込みコントローラ
pub trait InterruptControl {
    fn set_priority(&mut self, timer: TimerId, priority: u8);

    fn unmask(&mut self, timer: TimerId);
}
