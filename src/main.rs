// TIM2 の割り込みで 10 秒ごとにフラグを立て、メインループで semihosting 経由で出力
// タイマ設定に失敗した場合は LD2 を点灯させる（メインループは止めない）

#![no_std]
#![no_main]

// pick a panicking behavior
use panic_halt as _; // you can put a breakpoint on `rust_begin_unwind` to catch panics
                     // use panic_abort as _; // requires nightly
                     // use panic_itm as _; // logs messages over ITM; requires ITM support
                     // use panic_semihosting as _; // logs messages to the host stderr; requires a debugger

#[cfg(feature = "defmt")]
use defmt_rtt as _;

use core::cell::RefCell;

// cortex-m コア向けのスタートアップ処理を提供
// メモリの初期化から例外テーブルのシンボル登録（リセット以外はダミーの定義）まで実施してくれる。
use cortex_m_rt::entry;

use critical_section::Mutex;

use stm32f4xx_hal as hal;

// pac は stm32f4::stm32f446 と同義
// interrupt マクロで割り込み関数を定義する（デフォルトの何もしない定義に上書きする感じ）
use crate::hal::{pac, pac::interrupt, prelude::*};

use stm32f446re_periodic_timer::board::{Nvic, SemihostingConsole, Tim2};
use stm32f446re_periodic_timer::callback::{Dispatcher, PeriodElapsedHandler};
use stm32f446re_periodic_timer::config::{ReadyWait, TimerConfig, SYSCLK_HZ, TRIGGER_MESSAGE};
use stm32f446re_periodic_timer::flag::TriggerFlag;
use stm32f446re_periodic_timer::hal::{TimerId, TimerPeripheral};
use stm32f446re_periodic_timer::poll::Poller;
use stm32f446re_periodic_timer::startup;

// 割り込みとメインループで共有するフラグ
static TRIGGER: TriggerFlag = TriggerFlag::new();

// TIM2 割り込みから呼ぶハンドラの登録表
static DISPATCHER: Dispatcher<'static, 1> = Dispatcher::new();

// グローバル変数(割り込み関数で更新フラグをクリアするため)
static TIMER: Mutex<RefCell<Option<Tim2>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    let peripheral = pac::Peripherals::take().unwrap();
    let core_peripheral = cortex_m::Peripherals::take().unwrap();

    // TIM2 へのクロック入力設定（RCC を constrain する前に）
    peripheral.RCC.apb1enr.modify(|_, w| w.tim2en().enabled());

    // SYSCLK: HSE(ST-Link 8MHz) -> PLL -> 180MHz
    // APB1: 45MHz（TIM2 のクロックは APB1 * 2 = 90MHz）
    let rcc = peripheral.RCC.constrain();
    let _clocks = rcc
        .cfgr
        .use_hse(8.MHz())
        .bypass_hse_oscillator()
        .sysclk(SYSCLK_HZ.Hz())
        .pclk1(45.MHz()) // peripheral clock 1
        .freeze();

    // GPIOA-5 が LD2 に接続されている（エラー表示用）
    let gpioa = peripheral.GPIOA.split();
    let mut led = gpioa.pa5.into_push_pull_output(); // 出力設定 & push-pull モード
    led.set_low();

    let mut delay = cortex_m::delay::Delay::new(core_peripheral.SYST, SYSCLK_HZ);
    let mut console = SemihostingConsole::new();
    let mut nvic = Nvic::new(core_peripheral.NVIC);
    let mut timer = Tim2::new(peripheral.TIM2);

    DISPATCHER
        .register(PeriodElapsedHandler::new(TimerId::Tim2, &TRIGGER))
        .unwrap();

    // timer を グローバル変数に move するまで割り込みを止めておく
    let _report = critical_section::with(|cs| {
        let report = startup::bring_up(
            &mut console,
            &mut delay,
            ReadyWait::default(),
            &mut timer,
            &mut nvic,
            &mut led,
            &TimerConfig::default(),
        );
        TIMER.borrow(cs).replace(Some(timer));
        report
    });

    #[cfg(feature = "defmt")]
    defmt::info!("timer running: {}", _report.timer_running());

    let poller = Poller::new(&TRIGGER, TRIGGER_MESSAGE);
    loop {
        // 出力に失敗してもフラグは消費済みなので、そのまま次の周期を待つ
        poller.poll(&mut console).ok();
    }
}

#[interrupt]
fn TIM2() {
    critical_section::with(|cs| {
        let mut timer = TIMER.borrow_ref_mut(cs);
        if let Some(timer) = timer.as_mut() {
            if timer.take_update() {
                DISPATCHER.dispatch(timer.id());
            }
        }
    });
}
