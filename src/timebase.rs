//! プリスケーラ(PSC)と周期(ARR)の計算
//!
//! カウント周波数 = タイマクロック / (PSC + 1)
//! 割り込み間隔   = (ARR + 1) / カウント周波数

use crate::error::TimeBaseError;

/// PSC レジスタは全タイマ共通で 16bit
pub const PRESCALER_MAX: u32 = u16::MAX as u32;

/// タイマのカウンタ幅（TIM2/TIM5 は 32bit、それ以外は 16bit）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CounterWidth {
    Bits16,
    Bits32,
}

impl CounterWidth {
    /// ARR に書ける最大値
    pub const fn max(self) -> u32 {
        match self {
            Self::Bits16 => u16::MAX as u32,
            Self::Bits32 => u32::MAX,
        }
    }
}

/// PSC と ARR に書く値
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeBase {
    pub prescaler: u32,
    pub period: u32,
}

impl TimeBase {
    /// `interval_ms` ごとに更新イベントが起きる値を求める
    ///
    /// 範囲外の値は丸めずにエラーを返す。カウンタ幅のチェックは
    /// タイマごとに違うので [`TimeBase::fits`] で別に行う。
    pub fn compute(interval_ms: u32, timer_clock_hz: u32, count_hz: u32) -> Result<Self, TimeBaseError> {
        if interval_ms == 0 {
            return Err(TimeBaseError::ZeroInterval);
        }
        if count_hz == 0 || count_hz > timer_clock_hz {
            return Err(TimeBaseError::InvalidCountRate {
                timer_clock_hz,
                count_hz,
            });
        }

        let prescaler = timer_clock_hz / count_hz - 1;
        if prescaler > PRESCALER_MAX {
            return Err(TimeBaseError::PrescalerOverflow(prescaler));
        }

        let ticks = u64::from(interval_ms) * u64::from(count_hz) / 1000;
        if ticks == 0 {
            // 1カウントより短い
            return Err(TimeBaseError::PeriodOverflow(ticks));
        }
        let period = u32::try_from(ticks - 1).map_err(|_| TimeBaseError::PeriodOverflow(ticks))?;

        Ok(Self { prescaler, period })
    }

    /// ARR がカウンタ幅に収まるか
    pub const fn fits(&self, width: CounterWidth) -> bool {
        self.period <= width.max()
    }

    /// 実際に得られるカウント周波数 [Hz]
    pub const fn count_hz(&self, timer_clock_hz: u32) -> u32 {
        timer_clock_hz / (self.prescaler + 1)
    }

    /// 実際の割り込み間隔 [us]
    pub fn interval_us(&self, timer_clock_hz: u32) -> u64 {
        let clocks = (u64::from(self.prescaler) + 1) * (u64::from(self.period) + 1);
        clocks * 1_000_000 / u64::from(timer_clock_hz)
    }
}
