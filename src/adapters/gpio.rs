//! ESP-IDF implementation of the [`DigitalIo`] facade.
//!
//! Thin wrapper over the raw `gpio_*` driver calls.  The type is zero-sized
//! and `Copy`: every task that needs pins gets its own handle, and the
//! driver serialises register access internally.

use core::ffi::c_void;

use embedded_hal::digital::PinState;
use esp_idf_svc::sys::*;
use log::info;

use crate::app::ports::{Direction, DigitalIo, InterruptTrigger, PinConfig, PinId, Pull};
use crate::error::GpioError;

#[derive(Debug, Clone, Copy, Default)]
pub struct EspGpio;

impl EspGpio {
    /// Install the per-pin ISR dispatcher.  Idempotent.
    pub fn install_isr_service() -> Result<(), GpioError> {
        // SAFETY: ESP_ERR_INVALID_STATE means the service is already
        // installed, which is fine.
        let ret = unsafe { gpio_install_isr_service(0) };
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(GpioError::IsrInstallFailed(ret));
        }
        info!("gpio: ISR service installed");
        Ok(())
    }
}

/// Recovers the `fn()` stored in `arg` by [`EspGpio::register_interrupt`].
unsafe extern "C" fn isr_trampoline(arg: *mut c_void) {
    // SAFETY: `arg` was produced from a `fn()` in `register_interrupt`.
    let handler: fn() = unsafe { core::mem::transmute::<*mut c_void, fn()>(arg) };
    handler();
}

impl DigitalIo for EspGpio {
    fn configure(&mut self, pin: PinId, config: PinConfig) -> Result<(), GpioError> {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: match config.direction {
                Direction::Input => gpio_mode_t_GPIO_MODE_INPUT,
                Direction::Output => gpio_mode_t_GPIO_MODE_OUTPUT,
            },
            pull_up_en: if config.pull == Pull::Up {
                gpio_pullup_t_GPIO_PULLUP_ENABLE
            } else {
                gpio_pullup_t_GPIO_PULLUP_DISABLE
            },
            pull_down_en: if config.pull == Pull::Down {
                gpio_pulldown_t_GPIO_PULLDOWN_ENABLE
            } else {
                gpio_pulldown_t_GPIO_PULLDOWN_DISABLE
            },
            intr_type: match config.interrupt {
                InterruptTrigger::Disabled => gpio_int_type_t_GPIO_INTR_DISABLE,
                InterruptTrigger::RisingEdge => gpio_int_type_t_GPIO_INTR_POSEDGE,
                InterruptTrigger::FallingEdge => gpio_int_type_t_GPIO_INTR_NEGEDGE,
                InterruptTrigger::AnyEdge => gpio_int_type_t_GPIO_INTR_ANYEDGE,
                InterruptTrigger::LowLevel => gpio_int_type_t_GPIO_INTR_LOW_LEVEL,
                InterruptTrigger::HighLevel => gpio_int_type_t_GPIO_INTR_HIGH_LEVEL,
            },
            ..Default::default()
        };
        // SAFETY: `cfg` is a fully initialised config for a single pin.
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(GpioError::ConfigFailed(ret));
        }
        Ok(())
    }

    fn read(&mut self, pin: PinId) -> PinState {
        // SAFETY: register read on a configured pin.
        PinState::from(unsafe { gpio_get_level(pin) } != 0)
    }

    fn write(&mut self, pin: PinId, level: PinState) -> Result<(), GpioError> {
        let raw = match level {
            PinState::High => 1,
            PinState::Low => 0,
        };
        // SAFETY: register write on a configured pin.
        let ret = unsafe { gpio_set_level(pin, raw) };
        if ret != ESP_OK as i32 {
            return Err(GpioError::WriteFailed(ret));
        }
        Ok(())
    }

    fn register_interrupt(&mut self, pin: PinId, handler: fn()) -> Result<(), GpioError> {
        Self::install_isr_service()?;
        // SAFETY: the trampoline only ever casts `arg` back to `fn()`.
        let ret = unsafe { gpio_isr_handler_add(pin, Some(isr_trampoline), handler as *mut c_void) };
        if ret != ESP_OK as i32 {
            return Err(GpioError::IsrRegisterFailed(ret));
        }
        // SAFETY: handler is attached; enabling the line is a register write.
        unsafe { gpio_intr_enable(pin) };
        Ok(())
    }
}
