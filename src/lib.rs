//! STM32F446RE(NUCLEO-F446RE) でタイマ割り込みを周期的に発生させ、
//! 割り込みで立てたフラグをメインループでポーリングして出力するサンプル
//!
//! 割り込み側はフラグを立てるだけで、文字出力はメインループで行う。
//! 実機に依存しない部分はホストでテストできるように `board` feature の外に置いている。

#![cfg_attr(not(test), no_std)]

pub mod callback;
pub mod config;
pub mod console;
pub mod error;
pub mod flag;
pub mod hal;
pub mod poll;
pub mod startup;
pub mod timebase;
pub mod timer;

#[cfg(feature = "board")]
pub mod board;

pub use error::{HalError, TimerError};
