//! Board drivers: buttons, indicator LEDs and task spawning.

pub mod button;
pub mod status_led;
pub mod task_pin;
