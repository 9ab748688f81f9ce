//! 割り込みとメインループの間で共有するフラグ
//!
//! 書き込むのは割り込みハンドラだけ、読み出し&クリアするのはメインループだけ。
//! 何度セットされても 1 回分の通知にまとまる（キューにはしない）。

use core::cell::Cell;

use critical_section::Mutex;

pub struct TriggerFlag {
    raised: Mutex<Cell<bool>>,
}

impl TriggerFlag {
    /// static に置けるように const
    pub const fn new() -> Self {
        Self {
            raised: Mutex::new(Cell::new(false)),
        }
    }

    /// 割り込みハンドラから呼ぶ
    pub fn raise(&self) {
        critical_section::with(|cs| self.raised.borrow(cs).set(true));
    }

    pub fn is_raised(&self) -> bool {
        critical_section::with(|cs| self.raised.borrow(cs).get())
    }

    /// 読み出しとクリアを割り込み禁止区間でまとめて行う
    pub fn take(&self) -> bool {
        critical_section::with(|cs| self.raised.borrow(cs).replace(false))
    }

    pub fn clear(&self) {
        critical_section::with(|cs| self.raised.borrow(cs).set(false));
    }
}

impl Default for TriggerFlag {
    fn default() -> Self {
        Self::new()
    }
}
