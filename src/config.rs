//! コンパイル時の設定値
//!
//! クロック構成(main.rs の設定と合わせること)
//!   SYSCLK: HSE(ST-Link 8MHz) -> PLL -> 180MHz
//!   APB1: 45MHz -> TIM2 のクロックは APB1 * 2 = 90MHz

/// 割り込み間隔のデフォルト値 [ms]
pub const DEFAULT_INTERVAL_MS: u32 = 10_000;

/// 割り込み間隔 [ms]
/// ビルド時に環境変数 `TIMER_INTERVAL_MS` で上書きできる（数字以外が入っているとビルドエラー）
pub const INTERVAL_MS: u32 = match option_env!("TIMER_INTERVAL_MS") {
    Some(text) => parse_ms(text),
    None => DEFAULT_INTERVAL_MS,
};

/// システムクロック [Hz]
pub const SYSCLK_HZ: u32 = 180_000_000;

/// TIM2 の動作クロック [Hz]
pub const TIMER_CLOCK_HZ: u32 = 90_000_000;

/// カウント周波数 [Hz]（1カウント = 0.1ms）
pub const COUNT_HZ: u32 = 10_000;

/// TIM2 割り込みの優先度（0 が最高、STM32F446 は 0 ~ 15）
pub const TIMER_IRQ_PRIORITY: u8 = 0;

/// 出力チャネルの準備完了を待つ上限 [ms]
pub const CONSOLE_READY_TIMEOUT_MS: u32 = 3_000;

/// 準備完了を確認する間隔 [ms]
pub const CONSOLE_READY_STEP_MS: u32 = 10;

pub const STARTUP_MESSAGE: &str = "starting!";
pub const TRIGGER_MESSAGE: &str = "Timer triggered!";

/// タイマ設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerConfig {
    pub interval_ms: u32,
    pub timer_clock_hz: u32,
    pub count_hz: u32,
    pub priority: u8,
}

impl TimerConfig {
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            timer_clock_hz: TIMER_CLOCK_HZ,
            count_hz: COUNT_HZ,
            priority: TIMER_IRQ_PRIORITY,
        }
    }

    pub const fn with_timer_clock(mut self, timer_clock_hz: u32) -> Self {
        self.timer_clock_hz = timer_clock_hz;
        self
    }

    pub const fn with_count_rate(mut self, count_hz: u32) -> Self {
        self.count_hz = count_hz;
        self
    }

    pub const fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::new(INTERVAL_MS)
    }
}

/// 出力チャネルの待ち合わせ設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadyWait {
    pub timeout_ms: u32,
    pub step_ms: u32,
}

impl Default for ReadyWait {
    fn default() -> Self {
        Self {
            timeout_ms: CONSOLE_READY_TIMEOUT_MS,
            step_ms: CONSOLE_READY_STEP_MS,
        }
    }
}

// 10進数の文字列を ms として読む（const 評価で失敗するとビルドエラーになる）
const fn parse_ms(text: &str) -> u32 {
    let bytes = text.as_bytes();
    assert!(!bytes.is_empty(), "TIMER_INTERVAL_MS is empty");
    let mut value: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        assert!(b.is_ascii_digit(), "TIMER_INTERVAL_MS must be decimal digits");
        value = match value.checked_mul(10) {
            Some(v) => v,
            None => panic!("TIMER_INTERVAL_MS does not fit u32"),
        };
        value = match value.checked_add((b - b'0') as u32) {
            Some(v) => v,
            None => panic!("TIMER_INTERVAL_MS does not fit u32"),
        };
        i += 1;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_interval() {
        assert_eq!(parse_ms("10000"), 10_000);
        assert_eq!(parse_ms("1"), 1);
        assert_eq!(parse_ms("4294967295"), u32::MAX);
    }

    #[test]
    #[should_panic]
    fn rejects_non_digits() {
        parse_ms("10s");
    }

    #[test]
    fn builder_overrides_single_fields() {
        let config = TimerConfig::new(500).with_timer_clock(16_000_000).with_priority(3);
        assert_eq!(config.interval_ms, 500);
        assert_eq!(config.timer_clock_hz, 16_000_000);
        assert_eq!(config.count_hz, COUNT_HZ);
        assert_eq!(config.priority, 3);
    }

    #[test]
    fn default_uses_board_clock() {
        let config = TimerConfig::default();
        assert_eq!(config.interval_ms, INTERVAL_MS);
        assert_eq!(config.timer_clock_hz, TIMER_CLOCK_HZ);
        assert_eq!(config.count_hz, 10_000);
    }
}
