//! Indicator state machine
//!
//! Decides from each decoded illuminance whether the indicator has to change.
//! Only edges produce a transition; staying in the right state is silent. The
//! machine holds no on/off state of its own: the caller passes in the state the
//! indicator was last commanded to.

use log::info;

/// Indicator states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightState {
    #[default]
    Off,
    On,
}

impl LightState {
    pub fn is_on(self) -> bool {
        self == LightState::On
    }
}

impl From<bool> for LightState {
    fn from(on: bool) -> Self {
        if on { LightState::On } else { LightState::Off }
    }
}

/// Result of feeding one reading to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateTransition {
    /// Keep the current state
    Stay,
    /// Move to a new state
    Transition(LightState),
}

/// Threshold state machine for the night light
pub struct IndicatorStateMachine {
    threshold_lux: f32,
}

impl IndicatorStateMachine {
    pub fn new(threshold_lux: f32) -> Self {
        Self { threshold_lux }
    }

    pub fn get_threshold(&self) -> f32 {
        self.threshold_lux
    }

    /// Decide what one decoded illuminance means for an indicator in `current_state`
    pub fn handle_reading(&self, current_state: LightState, lux: f32) -> StateTransition {
        let transition = self.get_state_transition(current_state, lux);

        if let StateTransition::Transition(new_state) = transition {
            match new_state {
                LightState::On => info!("[CTRL] Dark ({} lux), indicator on", lux),
                LightState::Off => info!("[CTRL] Bright ({} lux), indicator off", lux),
            }
        }

        transition
    }

    /// The threshold itself counts as dark
    fn get_state_transition(&self, current_state: LightState, lux: f32) -> StateTransition {
        match current_state {
            LightState::Off if lux <= self.threshold_lux => {
                StateTransition::Transition(LightState::On)
            }
            LightState::On if lux > self.threshold_lux => {
                StateTransition::Transition(LightState::Off)
            }
            _ => StateTransition::Stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_reading_turns_on() {
        let sm = IndicatorStateMachine::new(20.0);
        assert_eq!(
            sm.handle_reading(LightState::Off, 15.0),
            StateTransition::Transition(LightState::On)
        );
    }

    #[test]
    fn bright_reading_turns_off() {
        let sm = IndicatorStateMachine::new(20.0);
        assert_eq!(
            sm.handle_reading(LightState::On, 25.0),
            StateTransition::Transition(LightState::Off)
        );
    }

    #[test]
    fn threshold_counts_as_dark() {
        let sm = IndicatorStateMachine::new(20.0);
        assert_eq!(
            sm.handle_reading(LightState::Off, 20.0),
            StateTransition::Transition(LightState::On)
        );
        // Already on: exactly at the threshold is not bright enough to turn off
        assert_eq!(sm.handle_reading(LightState::On, 20.0), StateTransition::Stay);
    }

    #[test]
    fn matching_state_stays() {
        let sm = IndicatorStateMachine::new(20.0);
        assert_eq!(sm.handle_reading(LightState::Off, 500.0), StateTransition::Stay);
        assert_eq!(sm.handle_reading(LightState::On, 0.0), StateTransition::Stay);
    }

    #[test]
    fn decision_follows_the_state_passed_in() {
        // Same reading, opposite answers: nothing is remembered between calls
        let sm = IndicatorStateMachine::new(20.0);
        assert_eq!(
            sm.handle_reading(LightState::Off, 3.0),
            StateTransition::Transition(LightState::On)
        );
        assert_eq!(
            sm.handle_reading(LightState::Off, 3.0),
            StateTransition::Transition(LightState::On)
        );
        assert_eq!(sm.handle_reading(LightState::On, 3.0), StateTransition::Stay);
    }

    #[test]
    fn negative_lux_counts_as_dark() {
        let sm = IndicatorStateMachine::new(20.0);
        assert_eq!(
            sm.handle_reading(LightState::Off, -4.5),
            StateTransition::Transition(LightState::On)
        );
    }

    #[test]
    fn light_state_from_indicator_flag() {
        assert_eq!(LightState::from(true), LightState::On);
        assert_eq!(LightState::from(false), LightState::Off);
        assert_eq!(LightState::default(), LightState::Off);
    }
}
