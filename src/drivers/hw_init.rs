//! Raw ESP-IDF GPIO and ADC1 access.
//!
//! Thin, unsafe-contained wrappers over the `esp_idf_svc::sys` calls the
//! node needs.  Every function maps a non-OK `esp_err_t` to the matching
//! typed error.  Only compiled for `target_os = "espidf"`; the host build
//! uses the simulation in [`crate::adapters::hardware`].

use esp_idf_svc::sys::*;
use log::info;

use crate::error::{ActuatorError, InitError, SensorError};

// ── GPIO ──────────────────────────────────────────────────────

/// Configure `pin` as a plain output and drive it LOW.
pub fn gpio_configure_output(pin: i32) -> Result<(), ActuatorError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: gpio_config only reads the struct; pin range is checked by IDF.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(ActuatorError::GpioConfigFailed { pin, rc: ret });
    }
    gpio_write(pin, false)
}

/// Switch `pin` between input (hi-Z) and output.
pub fn gpio_set_mode(pin: i32, output: bool) -> Result<(), ActuatorError> {
    let mode = if output {
        gpio_mode_t_GPIO_MODE_OUTPUT
    } else {
        gpio_mode_t_GPIO_MODE_INPUT
    };
    // SAFETY: direction register write on a pin owned by the worker.
    let ret = unsafe { gpio_set_direction(pin, mode) };
    if ret != ESP_OK as i32 {
        return Err(ActuatorError::GpioConfigFailed { pin, rc: ret });
    }
    Ok(())
}

pub fn gpio_write(pin: i32, high: bool) -> Result<(), ActuatorError> {
    // SAFETY: level register write on an already-configured output.
    let ret = unsafe { gpio_set_level(pin, u32::from(high)) };
    if ret != ESP_OK as i32 {
        return Err(ActuatorError::GpioWriteFailed { pin, rc: ret });
    }
    Ok(())
}

// ── ADC1 (oneshot) ────────────────────────────────────────────

static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: ADC1_HANDLE is written once in `adc1_init()` before the worker
/// starts; afterwards only the worker reads it.
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

/// Create the ADC1 oneshot unit (once) and configure `channels` for
/// 12-bit reads at 12 dB attenuation.
pub fn adc1_init(channels: &[u32]) -> Result<(), InitError> {
    // SAFETY: called from the single-threaded init path only.
    unsafe {
        if adc1_handle().is_null() {
            let init_cfg = adc_oneshot_unit_init_cfg_t {
                unit_id: adc_unit_t_ADC_UNIT_1,
                ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
                ..Default::default()
            };
            let ret = adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE);
            if ret != ESP_OK as i32 {
                return Err(InitError::AdcInitFailed(ret));
            }
        }

        let chan_cfg = adc_oneshot_chan_cfg_t {
            atten: adc_atten_t_ADC_ATTEN_DB_12,
            bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
        };
        for &ch in channels {
            let ret = adc_oneshot_config_channel(adc1_handle(), ch, &chan_cfg);
            if ret != ESP_OK as i32 {
                return Err(InitError::AdcInitFailed(ret));
            }
        }
    }

    info!("hw_init: ADC1 configured (channels={:?}, 12-bit, 12dB)", channels);
    Ok(())
}

pub fn adc1_read(channel: u32) -> Result<u16, SensorError> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract; worker-only access after init.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(SensorError::AdcReadFailed(ret));
    }
    Ok(raw.max(0) as u16)
}
