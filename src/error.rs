//! エラー型
//!
//! タイマ設定の失敗は「ベース初期化の失敗」と「割り込みモード開始の失敗」の2種類だけ。
//! どちらもアプリ側では LED(LD2) を点灯させるだけで、リトライも文字出力もしない。

use core::fmt;

/// ペリフェラル層から返ってくるエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// レジスタに収まらない値などの不正なパラメータ
    InvalidParameter,
    /// 既に動作中
    Busy,
    /// 初期化前に操作された
    NotInitialized,
    /// ハードウェア側の異常
    Hardware,
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter => write!(f, "invalid parameter"),
            Self::Busy => write!(f, "peripheral busy"),
            Self::NotInitialized => write!(f, "peripheral not initialized"),
            Self::Hardware => write!(f, "hardware error"),
        }
    }
}

/// プリスケーラ/周期の計算エラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeBaseError {
    /// インターバルが 0 ms
    ZeroInterval,
    /// カウント周波数が 0、またはタイマクロックより大きい
    InvalidCountRate { timer_clock_hz: u32, count_hz: u32 },
    /// プリスケーラが PSC レジスタ(16bit)に収まらない
    PrescalerOverflow(u32),
    /// 周期が 32bit に収まらない
    PeriodOverflow(u64),
}

impl fmt::Display for TimeBaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroInterval => write!(f, "interval must be at least 1 ms"),
            Self::InvalidCountRate {
                timer_clock_hz,
                count_hz,
            } => write!(
                f,
                "cannot count at {} Hz from a {} Hz timer clock",
                count_hz, timer_clock_hz
            ),
            Self::PrescalerOverflow(psc) => write!(f, "prescaler {} does not fit 16 bits", psc),
            Self::PeriodOverflow(ticks) => write!(f, "{} ticks do not fit the counter", ticks),
        }
    }
}

/// ベース初期化の失敗要因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BaseInitError {
    TimeBase(TimeBaseError),
    /// 周期がカウンタ幅(16bit タイマなど)を超える
    PeriodTooWide { period: u32, max: u32 },
    Hal(HalError),
}

impl fmt::Display for BaseInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeBase(e) => write!(f, "time base: {}", e),
            Self::PeriodTooWide { period, max } => {
                write!(f, "period {} exceeds counter maximum {}", period, max)
            }
            Self::Hal(e) => write!(f, "{}", e),
        }
    }
}

impl From<TimeBaseError> for BaseInitError {
    fn from(e: TimeBaseError) -> Self {
        Self::TimeBase(e)
    }
}

impl From<HalError> for BaseInitError {
    fn from(e: HalError) -> Self {
        Self::Hal(e)
    }
}

/// タイマ設定のエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// ベース初期化の失敗
    BaseInit(BaseInitError),
    /// 割り込みモードでの開始に失敗
    StartInterrupt(HalError),
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BaseInit(e) => write!(f, "timer base init failed: {}", e),
            Self::StartInterrupt(e) => write!(f, "timer interrupt start failed: {}", e),
        }
    }
}

impl From<BaseInitError> for TimerError {
    fn from(e: BaseInitError) -> Self {
        Self::BaseInit(e)
    }
}

/// 出力チャネルのエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleError<E> {
    /// 準備完了を待ちきれなかった
    Timeout { waited_ms: u32 },
    /// 待機を中断された
    Cancelled,
    Io(E),
}

impl<E: fmt::Debug> fmt::Display for ConsoleError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { waited_ms } => {
                write!(f, "console not ready after {} ms", waited_ms)
            }
            Self::Cancelled => write!(f, "console wait cancelled"),
            Self::Io(e) => write!(f, "console io error: {:?}", e),
        }
    }
}

/// 割り込みハンドラ登録のエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// 登録枠が埋まっている
    Full,
    /// 同じタイマに既にハンドラが登録済み
    AlreadyBound(crate::hal::TimerId),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "no free handler slot"),
            Self::AlreadyBound(id) => write!(f, "{:?} already has a handler", id),
        }
    }
}
