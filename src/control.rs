//! Night light control loop
//!
//! One blocking loop: wait, check the sensor's data-ready flag, read both
//! channels, decode lux and let the state machine decide whether the
//! indicator changes. Bus failures never stop the loop.

use crate::config;
use crate::led_control::IndicatorLed;
use crate::ltr303::{AlsStatus, ChannelReading, Ltr303};
use crate::lux::{Gain, IntegrationTime, LuxScale, calculate_lux_scaled};
use crate::state_machine::{IndicatorStateMachine, LightState, StateTransition};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, info, warn};
use smart_leds::{RGB8, SmartLedsWrite};

/// Sensor values gathered while bringing the board up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupReport {
    pub part_id: Option<u8>,
    pub manufacturer_id: Option<u8>,
    /// ALS_CONTR as written when enabling active mode
    pub control: Option<u8>,
    pub meas_rate: Option<u8>,
    /// Scale the counts are decoded with from now on
    pub scale: LuxScale,
}

/// Everything observed in one completed cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub reading: ChannelReading,
    pub lux: f32,
    pub state: LightState,
    pub transition: StateTransition,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    /// No new measurement was flagged; nothing was decided
    NotReady,
    Sampled(CycleReport),
}

/// Owns the sensor, the indicator and the decision threshold
///
/// The indicator's last commanded state is the only on/off state; every
/// decision starts from it.
pub struct Controller<I2C, W>
where
    I2C: I2c,
    W: SmartLedsWrite<Color = RGB8>,
{
    sensor: Ltr303<I2C>,
    led: IndicatorLed<W>,
    state_machine: IndicatorStateMachine,
    scale: LuxScale,
    sample_interval_ms: u32,
}

impl<I2C, W> Controller<I2C, W>
where
    I2C: I2c,
    W: SmartLedsWrite<Color = RGB8>,
{
    /// Create a controller with the board's compile-time configuration
    ///
    /// The configured gain and integration time are used until `start` reads
    /// the sensor's own settings back.
    pub fn new(sensor: Ltr303<I2C>, led: IndicatorLed<W>) -> Self {
        Self::with_settings(
            sensor,
            led,
            config::LUX_THRESHOLD,
            LuxScale::new(config::SENSOR_GAIN, config::SENSOR_INTEGRATION_TIME),
        )
    }

    pub fn with_settings(
        sensor: Ltr303<I2C>,
        led: IndicatorLed<W>,
        threshold_lux: f32,
        scale: LuxScale,
    ) -> Self {
        Self {
            sensor,
            led,
            state_machine: IndicatorStateMachine::new(threshold_lux),
            scale,
            sample_interval_ms: config::SAMPLE_INTERVAL_MS,
        }
    }

    pub fn light_state(&self) -> LightState {
        LightState::from(self.led.state())
    }

    pub fn scale(&self) -> LuxScale {
        self.scale
    }

    /// Last state commanded to the indicator
    pub fn indicator_on(&self) -> bool {
        self.led.state()
    }

    /// Give back the bus and the LED writer
    pub fn release(self) -> (I2C, W) {
        (self.sensor.release(), self.led.release())
    }

    /// Bring the indicator and the sensor into their running state
    ///
    /// The identification registers are read for diagnostics only. Gain and
    /// integration time are read back so lux is decoded with what the sensor
    /// actually runs at. Failures are logged and reported as `None`, keeping the
    /// previous scale; start-up always completes.
    pub fn start<D: DelayNs>(&mut self, delay: &mut D) -> StartupReport {
        self.led.init();

        let part_id = self
            .sensor
            .part_id()
            .inspect_err(|e| warn!("[ALS] Failed to read PART_ID: {:?}", e))
            .ok();
        let manufacturer_id = self
            .sensor
            .manufacturer_id()
            .inspect_err(|e| warn!("[ALS] Failed to read MANUFAC_ID: {:?}", e))
            .ok();
        let control = self
            .sensor
            .activate()
            .inspect_err(|e| warn!("[ALS] Failed to enable active mode: {:?}", e))
            .ok();
        if let Some(control) = control {
            match Gain::from_control(control) {
                Some(gain) => self.scale.gain = gain,
                None => warn!("[ALS] Reserved gain code in ALS_CONTR=0x{:02X}", control),
            }
        }

        let meas_rate = self
            .sensor
            .meas_rate()
            .inspect_err(|e| warn!("[ALS] Failed to read ALS_MEAS_RATE: {:?}", e))
            .ok();
        if let Some(time) = meas_rate.and_then(IntegrationTime::from_meas_rate) {
            self.scale.integration_time = time;
        }

        delay.delay_ms(config::SENSOR_SETTLE_MS);

        info!(
            "[CTRL] Started, threshold {} lux, gain {:?}, integration {}ms",
            self.state_machine.get_threshold(),
            self.scale.gain,
            self.scale.integration_time.millis()
        );

        StartupReport {
            part_id,
            manufacturer_id,
            control,
            meas_rate,
            scale: self.scale,
        }
    }

    /// Run one sample/decide/actuate cycle without waiting
    pub fn run_cycle(&mut self) -> CycleOutcome {
        let status = self.sensor.status().unwrap_or_else(|e| {
            warn!("[ALS] Failed to read ALS_STATUS: {:?}", e);
            AlsStatus::default()
        });

        if !status.data_ready() {
            debug!("[ALS] No new data (ALS_STATUS=0x{:02X})", status.0);
            return CycleOutcome::NotReady;
        }
        if status.data_invalid() {
            debug!("[ALS] Measurement flagged invalid, using it anyway");
        }

        let reading = self.sensor.read_channels();
        let lux = calculate_lux_scaled(reading.ch0, reading.ch1, self.scale);
        let transition = self.state_machine.handle_reading(self.light_state(), lux);

        if let StateTransition::Transition(new_state) = transition {
            self.led.set_state(new_state.is_on());
        }

        CycleOutcome::Sampled(CycleReport {
            reading,
            lux,
            state: self.light_state(),
            transition,
        })
    }

    /// Wait one sample interval, then run a cycle
    pub fn wait_and_run_cycle<D: DelayNs>(&mut self, delay: &mut D) -> CycleOutcome {
        delay.delay_ms(self.sample_interval_ms);
        self.run_cycle()
    }

    /// Run the loop forever, handing each cycle's outcome to `on_cycle`
    pub fn run<D, F>(&mut self, delay: &mut D, mut on_cycle: F) -> !
    where
        D: DelayNs,
        F: FnMut(&CycleOutcome),
    {
        loop {
            let outcome = self.wait_and_run_cycle(delay);
            on_cycle(&outcome);
        }
    }
}
