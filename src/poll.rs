//! メインループ側のポーリング
//!
//! フラグが立っていたら 1 行出力してフラグを下ろす。ループが遅れて複数回分の
//! 割り込みが溜まっても出力は 1 回だけ（回数は数えない）。

use crate::console::Console;
use crate::flag::TriggerFlag;

pub struct Poller<'a> {
    flag: &'a TriggerFlag,
    message: &'a str,
}

impl<'a> Poller<'a> {
    pub const fn new(flag: &'a TriggerFlag, message: &'a str) -> Self {
        Self { flag, message }
    }

    /// 1 回分の確認。出力したら Ok(true)
    ///
    /// 先にフラグを下ろしてから出力するので、出力中に来た割り込みは次回に回る。
    pub fn poll<C: Console>(&self, console: &mut C) -> Result<bool, C::Error> {
        if !self.flag.take() {
            return Ok(false);
        }
        console.write_line(self.message)?;
        Ok(true)
    }
}
