//! Task Watchdog Timer (TWDT).
//!
//! Armed once association has finished (the association wait can
//! legitimately block for 30 s). After that the control loop feeds it
//! every iteration; a loop stalled past the timeout resets the node.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

pub const WATCHDOG_TIMEOUT_MS: u32 = 10_000;

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
    feeds: u64,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl Watchdog {
    /// Reconfigure the TWDT and subscribe the calling task.
    pub fn new() -> Self {
        #[cfg(target_os = "espidf")]
        {
            let cfg = esp_task_wdt_config_t {
                timeout_ms: WATCHDOG_TIMEOUT_MS,
                idle_core_mask: 0,
                trigger_panic: true,
            };
            // SAFETY: plain ESP-IDF calls on the current task.
            let ret = unsafe { esp_task_wdt_reconfigure(&cfg) };
            if ret != ESP_OK {
                log::warn!("Watchdog: reconfigure returned {} (already configured?)", ret);
            }
            let ret = unsafe { esp_task_wdt_add(core::ptr::null_mut()) };
            let subscribed = ret == ESP_OK;
            if subscribed {
                info!("Watchdog: armed ({} ms, panic on trigger)", WATCHDOG_TIMEOUT_MS);
            } else {
                log::warn!("Watchdog: subscribe failed ({})", ret);
            }
            Self { subscribed, feeds: 0 }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            info!("Watchdog(sim): armed, no-op");
            Self { feeds: 0 }
        }
    }

    /// Call at least once per timeout period.
    pub fn feed(&mut self) {
        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: resets the TWDT entry of the subscribed task.
            unsafe {
                esp_task_wdt_reset();
            }
        }
        self.feeds = self.feeds.wrapping_add(1);
    }

    pub fn feeds(&self) -> u64 {
        self.feeds
    }
}
