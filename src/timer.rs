//! タイマの設定
//!
//! 1. インターバルから PSC/ARR を計算
//! 2. ベース初期化（アップカウント、分周なし、ARR プリロード無効）
//! 3. 割り込み優先度の設定と有効化
//! 4. 更新割り込みモードでカウント開始

use crate::config::TimerConfig;
use crate::error::{BaseInitError, TimerError};
use crate::hal::{BaseConfig, InterruptControl, TimerPeripheral};
use crate::timebase::TimeBase;

/// ベース初期化まで（割り込みは触らない）
pub fn init_base<T: TimerPeripheral>(timer: &mut T, config: &TimerConfig) -> Result<TimeBase, BaseInitError> {
    let time_base = TimeBase::compute(config.interval_ms, config.timer_clock_hz, config.count_hz)?;

    let width = timer.counter_width();
    if !time_base.fits(width) {
        return Err(BaseInitError::PeriodTooWide {
            period: time_base.period,
            max: width.max(),
        });
    }

    timer.init_base(&BaseConfig::periodic(time_base))?;
    Ok(time_base)
}

/// 周期割り込みの設定一式。ベース初期化に失敗したら開始は試みない
pub fn configure<T, I>(timer: &mut T, irq: &mut I, config: &TimerConfig) -> Result<TimeBase, TimerError>
where
    T: TimerPeripheral,
    I: InterruptControl,
{
    let time_base = init_base(timer, config)?;

    let id = timer.id();
    irq.set_priority(id, config.priority);
    irq.unmask(id);

    timer.start_interrupt().map_err(TimerError::StartInterrupt)?;

    #[cfg(feature = "defmt")]
    defmt::debug!(
        "{} running: psc={} arr={}",
        id,
        time_base.prescaler,
        time_base.period
    );

    Ok(time_base)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{HalError, TimeBaseError};
    use crate::hal::{ClockDivision, CountDirection, TimerId};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum FailAt {
        Nowhere,
        Base,
        Start,
    }

    /// 書き込まれた設定を記録する偽タイマ
    pub(crate) struct FakeTimer {
        pub(crate) id: TimerId,
        pub(crate) fail_at: FailAt,
        pub(crate) base: Option<BaseConfig>,
        pub(crate) started: bool,
        pub(crate) update_pending: bool,
    }

    impl FakeTimer {
        pub(crate) fn new(id: TimerId) -> Self {
            Self {
                id,
                fail_at: FailAt::Nowhere,
                base: None,
                started: false,
                update_pending: false,
            }
        }

        pub(crate) fn failing(id: TimerId, fail_at: FailAt) -> Self {
            Self {
                fail_at,
                ..Self::new(id)
            }
        }

        /// カウンタが ARR に達したことにする
        pub(crate) fn elapse(&mut self) {
            if self.started {
                self.update_pending = true;
            }
        }
    }

    impl TimerPeripheral for FakeTimer {
        fn id(&self) -> TimerId {
            self.id
        }

        fn init_base(&mut self, config: &BaseConfig) -> Result<(), HalError> {
            if self.fail_at == FailAt::Base {
                return Err(HalError::Hardware);
            }
            self.base = Some(*config);
            Ok(())
        }

        fn start_interrupt(&mut self) -> Result<(), HalError> {
            if self.fail_at == FailAt::Start {
                return Err(HalError::Busy);
            }
            if self.base.is_none() {
                return Err(HalError::NotInitialized);
            }
            self.started = true;
            Ok(())
        }

        fn take_update(&mut self) -> bool {
            core::mem::replace(&mut self.update_pending, false)
        }
    }

    #[derive(Default)]
    pub(crate) struct FakeNvic {
        pub(crate) priority: Option<(TimerId, u8)>,
        pub(crate) unmasked: Vec<TimerId>,
    }

    impl InterruptControl for FakeNvic {
        fn set_priority(&mut self, timer: TimerId, priority: u8) {
            self.priority = Some((timer, priority));
        }

        fn unmask(&mut self, timer: TimerId) {
            self.unmasked.push(timer);
        }
    }

    #[test]
    fn programs_periodic_up_counter() {
        let mut timer = FakeTimer::new(TimerId::Tim2);
        let mut nvic = FakeNvic::default();
        let config = TimerConfig::new(10_000).with_priority(2);

        let time_base = configure(&mut timer, &mut nvic, &config).unwrap();

        assert_eq!(
            time_base,
            TimeBase {
                prescaler: 8_999,
                period: 99_999
            }
        );
        let base = timer.base.unwrap();
        assert_eq!(base.time_base, time_base);
        assert_eq!(base.direction, CountDirection::Up);
        assert_eq!(base.clock_division, ClockDivision::Div1);
        assert!(!base.auto_reload_preload);
        assert_eq!(nvic.priority, Some((TimerId::Tim2, 2)));
        assert_eq!(nvic.unmasked, vec![TimerId::Tim2]);
        assert!(timer.started);
    }

    #[test]
    fn base_failure_skips_interrupt_setup() {
        let mut timer = FakeTimer::failing(TimerId::Tim2, FailAt::Base);
        let mut nvic = FakeNvic::default();

        let err = configure(&mut timer, &mut nvic, &TimerConfig::new(10_000)).unwrap_err();

        assert_eq!(err, TimerError::BaseInit(BaseInitError::Hal(HalError::Hardware)));
        assert!(nvic.unmasked.is_empty());
        assert!(!timer.started);
    }

    #[test]
    fn start_failure_is_reported_separately() {
        let mut timer = FakeTimer::failing(TimerId::Tim2, FailAt::Start);
        let mut nvic = FakeNvic::default();

        let err = configure(&mut timer, &mut nvic, &TimerConfig::new(10_000)).unwrap_err();

        assert_eq!(err, TimerError::StartInterrupt(HalError::Busy));
        assert!(timer.base.is_some());
        assert!(!timer.started);
    }

    #[test]
    fn out_of_range_interval_is_a_base_failure() {
        let mut timer = FakeTimer::new(TimerId::Tim2);
        let mut nvic = FakeNvic::default();

        let err = configure(&mut timer, &mut nvic, &TimerConfig::new(0)).unwrap_err();

        assert_eq!(
            err,
            TimerError::BaseInit(BaseInitError::TimeBase(TimeBaseError::ZeroInterval))
        );
        assert!(timer.base.is_none());
    }

    #[test]
    fn sixteen_bit_timer_rejects_long_period() {
        // TIM3 は 16bit なので 10 秒(ARR = 99999)は入らない
        let mut timer = FakeTimer::new(TimerId::Tim3);

        let err = init_base(&mut timer, &TimerConfig::new(10_000)).unwrap_err();

        assert_eq!(
            err,
            BaseInitError::PeriodTooWide {
                period: 99_999,
                max: 65_535
            }
        );
        assert!(timer.base.is_none());
    }
}
