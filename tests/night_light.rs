//! Night light behaviour over several cycles, against a mocked LTR-303 and a
//! recording LED strip

use als_nightlight::config;
use als_nightlight::control::{Controller, CycleOutcome};
use als_nightlight::led_control::{IndicatorLed, LED_OFF_COLOR, LED_ON_COLOR};
use als_nightlight::ltr303::Ltr303;
use als_nightlight::lux::{LuxScale, calculate_lux};
use als_nightlight::state_machine::{LightState, StateTransition};
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use smart_leds::{RGB8, SmartLedsWrite};

const ADDR: u8 = config::SENSOR_I2C_ADDRESS;

#[derive(Default)]
struct RecordingStrip {
    frames: Vec<Vec<RGB8>>,
}

impl SmartLedsWrite for RecordingStrip {
    type Error = ();
    type Color = RGB8;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        self.frames.push(iterator.into_iter().map(Into::into).collect());
        Ok(())
    }
}

fn read(register: u8, value: u8) -> [I2cTransaction; 2] {
    [
        I2cTransaction::write(ADDR, vec![register]),
        I2cTransaction::read(ADDR, vec![value]),
    ]
}

fn startup() -> Vec<I2cTransaction> {
    let mut expectations = vec![];
    expectations.extend(read(0x86, 0xA0));
    expectations.extend(read(0x87, 0x05));
    expectations.extend(read(0x80, 0x00));
    expectations.push(I2cTransaction::write(ADDR, vec![0x80, 0x01]));
    expectations.extend(read(0x85, 0x03));
    expectations
}

fn not_ready() -> Vec<I2cTransaction> {
    read(0x8C, 0x00).to_vec()
}

fn sample(ch0: u16, ch1: u16) -> Vec<I2cTransaction> {
    let [ch0_low, ch0_high] = ch0.to_le_bytes();
    let [ch1_low, ch1_high] = ch1.to_le_bytes();
    let mut expectations = vec![];
    expectations.extend(read(0x8C, 0x04));
    expectations.extend(read(0x88, ch1_low));
    expectations.extend(read(0x89, ch1_high));
    expectations.extend(read(0x8A, ch0_low));
    expectations.extend(read(0x8B, ch0_high));
    expectations
}

fn state_of(outcome: CycleOutcome) -> Option<(LightState, StateTransition)> {
    match outcome {
        CycleOutcome::Sampled(report) => Some((report.state, report.transition)),
        CycleOutcome::NotReady => None,
    }
}

#[test]
fn dusk_to_dawn() {
    let expectations: Vec<I2cTransaction> = [
        startup(),
        sample(1000, 200), // daylight
        not_ready(),
        sample(8, 1), // dusk
        sample(6, 0), // night, already on
        not_ready(),
        sample(300, 60), // dawn
    ]
    .concat();

    let mut controller = Controller::new(
        Ltr303::new(I2cMock::new(&expectations), ADDR),
        IndicatorLed::new(RecordingStrip::default()),
    );
    controller.start(&mut NoopDelay::new());

    assert_eq!(
        state_of(controller.run_cycle()),
        Some((LightState::Off, StateTransition::Stay))
    );
    assert_eq!(state_of(controller.run_cycle()), None);
    assert_eq!(
        state_of(controller.run_cycle()),
        Some((LightState::On, StateTransition::Transition(LightState::On)))
    );
    assert_eq!(
        state_of(controller.run_cycle()),
        Some((LightState::On, StateTransition::Stay))
    );
    assert_eq!(state_of(controller.run_cycle()), None);
    assert!(controller.indicator_on());
    assert_eq!(
        state_of(controller.run_cycle()),
        Some((LightState::Off, StateTransition::Transition(LightState::Off)))
    );

    let (mut i2c, strip) = controller.release();
    i2c.done();
    // Two clears at start-up, then exactly one frame per edge
    assert_eq!(
        strip.frames,
        [
            [LED_OFF_COLOR],
            [LED_OFF_COLOR],
            [LED_ON_COLOR],
            [LED_OFF_COLOR]
        ]
    );
}

#[test]
fn reading_at_threshold_keeps_indicator_on() {
    // Threshold placed exactly on the lux of ch0=10, ch1=0
    let threshold = calculate_lux(10, 0);
    let expectations: Vec<I2cTransaction> = [sample(10, 0), sample(10, 0), sample(11, 0)].concat();

    let mut controller = Controller::with_settings(
        Ltr303::new(I2cMock::new(&expectations), ADDR),
        IndicatorLed::new(RecordingStrip::default()),
        threshold,
        LuxScale::default(),
    );

    assert_eq!(
        state_of(controller.run_cycle()),
        Some((LightState::On, StateTransition::Transition(LightState::On)))
    );
    assert_eq!(
        state_of(controller.run_cycle()),
        Some((LightState::On, StateTransition::Stay))
    );
    assert_eq!(
        state_of(controller.run_cycle()),
        Some((LightState::Off, StateTransition::Transition(LightState::Off)))
    );

    controller.release().0.done();
}

#[test]
fn scaled_counts_use_configured_divisor() {
    use als_nightlight::lux::{Gain, IntegrationTime};

    // 120 counts would be 212.9 lux at unity gain, at 48x they are only 4.4 lux
    let expectations = sample(120, 0);
    let mut controller = Controller::with_settings(
        Ltr303::new(I2cMock::new(&expectations), ADDR),
        IndicatorLed::new(RecordingStrip::default()),
        config::LUX_THRESHOLD,
        LuxScale::new(Gain::X48, IntegrationTime::Ms100),
    );

    let CycleOutcome::Sampled(report) = controller.run_cycle() else {
        panic!("expected a sample");
    };
    assert!((report.lux - 1.7743 * 120.0 / 48.0).abs() < 1e-3);
    assert_eq!(report.state, LightState::On);

    controller.release().0.done();
}
