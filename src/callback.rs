//! 周期経過の割り込みハンドラと、その登録先
//!
//! 割り込みエントリは同じ系統のタイマで共有されうるので、ハンドラは自分のタイマかを
//! 確認してからフラグを立てる。割り込み中なので文字出力などのブロックする処理はしない。

use core::cell::RefCell;

use critical_section::Mutex;

use crate::error::DispatchError;
use crate::flag::TriggerFlag;
use crate::hal::TimerId;

/// 「このタイマ」と「このフラグ」を結びつけたハンドラ
#[derive(Clone, Copy)]
pub struct PeriodElapsedHandler<'a> {
    owner: TimerId,
    flag: &'a TriggerFlag,
}

impl<'a> PeriodElapsedHandler<'a> {
    pub const fn new(owner: TimerId, flag: &'a TriggerFlag) -> Self {
        Self { owner, flag }
    }

    pub fn owner(&self) -> TimerId {
        self.owner
    }

    /// 発火したタイマが自分のものならフラグを立てて true
    pub fn on_period_elapsed(&self, fired: TimerId) -> bool {
        if fired != self.owner {
            return false;
        }
        self.flag.raise();
        true
    }
}

/// 割り込みエントリから呼ばれるハンドラの登録表
pub struct Dispatcher<'a, const N: usize> {
    slots: Mutex<RefCell<[Option<PeriodElapsedHandler<'a>>; N]>>,
}

impl<'a, const N: usize> Dispatcher<'a, N> {
    pub const fn new() -> Self {
        Self {
            slots: Mutex::new(RefCell::new([None; N])),
        }
    }

    /// ハンドラを空いている枠に登録（同じタイマへの二重登録は不可）
    pub fn register(&self, handler: PeriodElapsedHandler<'a>) -> Result<(), DispatchError> {
        critical_section::with(|cs| {
            let mut slots = self.slots.borrow_ref_mut(cs);
            if slots
                .iter()
                .flatten()
                .any(|bound| bound.owner() == handler.owner())
            {
                return Err(DispatchError::AlreadyBound(handler.owner()));
            }
            let slot = slots
                .iter_mut()
                .find(|slot| slot.is_none())
                .ok_or(DispatchError::Full)?;
            *slot = Some(handler);
            Ok(())
        })
    }

    /// 割り込みエントリから呼ぶ。反応したハンドラの数を返す
    pub fn dispatch(&self, fired: TimerId) -> usize {
        critical_section::with(|cs| {
            self.slots
                .borrow_ref(cs)
                .iter()
                .flatten()
                .filter(|handler| handler.on_period_elapsed(fired))
                .count()
        })
    }
}

impl<'a, const N: usize> Default for Dispatcher<'a, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_ignores_other_timers() {
        let flag = TriggerFlag::new();
        let handler = PeriodElapsedHandler::new(TimerId::Tim2, &flag);

        assert!(!handler.on_period_elapsed(TimerId::Tim3));
        assert!(!flag.is_raised());

        assert!(handler.on_period_elapsed(TimerId::Tim2));
        assert!(flag.is_raised());
    }

    #[test]
    fn dispatch_reaches_only_the_owner() {
        let tim2_flag = TriggerFlag::new();
        let tim5_flag = TriggerFlag::new();
        let dispatcher: Dispatcher<'_, 2> = Dispatcher::new();
        dispatcher
            .register(PeriodElapsedHandler::new(TimerId::Tim2, &tim2_flag))
            .unwrap();
        dispatcher
            .register(PeriodElapsedHandler::new(TimerId::Tim5, &tim5_flag))
            .unwrap();

        assert_eq!(dispatcher.dispatch(TimerId::Tim5), 1);
        assert!(!tim2_flag.is_raised());
        assert!(tim5_flag.take());

        assert_eq!(dispatcher.dispatch(TimerId::Tim4), 0);
        assert!(!tim2_flag.is_raised());
        assert!(!tim5_flag.is_raised());
    }

    #[test]
    fn register_rejects_duplicates_and_overflow() {
        let flag = TriggerFlag::new();
        let dispatcher: Dispatcher<'_, 1> = Dispatcher::new();
        dispatcher
            .register(PeriodElapsedHandler::new(TimerId::Tim2, &flag))
            .unwrap();

        assert_eq!(
            dispatcher.register(PeriodElapsedHandler::new(TimerId::Tim2, &flag)),
            Err(DispatchError::AlreadyBound(TimerId::Tim2))
        );
        assert_eq!(
            dispatcher.register(PeriodElapsedHandler::new(TimerId::Tim3, &flag)),
            Err(DispatchError::Full)
        );
    }

    #[test]
    fn empty_dispatcher_does_nothing() {
        let dispatcher: Dispatcher<'_, 4> = Dispatcher::default();
        assert_eq!(dispatcher.dispatch(TimerId::Tim2), 0);
    }
}
