//! Periodic hardware timers using ESP-IDF's esp_timer API.
//!
//! [`HwTimer`] implements [`PeriodicTimer`] over one esp_timer.  The
//! firmware keeps two of them in statics: the sensor sampler and the
//! blink tick.  On simulation targets the timer only tracks its state.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! they can take the critical section used by the blink divider.
//!
//! "Interrupt disabled" is modelled by stopping the esp_timer: the
//! callback can no longer run, and enabling again starts a fresh period.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

#[cfg(target_os = "espidf")]
use core::sync::atomic::AtomicPtr;

#[cfg(target_os = "espidf")]
use esp_idf_sys::*;

use crate::app::ports::PeriodicTimer;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init::HwInitError;

pub struct HwTimer {
    name: &'static core::ffi::CStr,
    #[cfg(target_os = "espidf")]
    handle: AtomicPtr<esp_timer>,
    period_us: AtomicU32,
    /// Counting (armed) as far as the core is concerned.
    armed: AtomicBool,
    /// Callback allowed to run.
    irq_enabled: AtomicBool,
}

impl HwTimer {
    pub const fn new(name: &'static core::ffi::CStr) -> Self {
        Self {
            name,
            #[cfg(target_os = "espidf")]
            handle: AtomicPtr::new(core::ptr::null_mut()),
            period_us: AtomicU32::new(0),
            armed: AtomicBool::new(false),
            irq_enabled: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name.to_str().unwrap_or("timer")
    }

    pub fn period_us(&self) -> u32 {
        self.period_us.load(Ordering::Acquire)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    pub fn interrupt_enabled(&self) -> bool {
        self.irq_enabled.load(Ordering::Acquire)
    }

    /// Create the underlying esp_timer with `handler` as its callback.
    /// The handler is leaked: timers live for the whole run.
    #[cfg(target_os = "espidf")]
    pub fn create<F>(&'static self, handler: F) -> Result<(), HwInitError>
    where
        F: FnMut() + Send + 'static,
    {
        let handler: &'static mut F = Box::leak(Box::new(handler));
        let args = esp_timer_create_args_t {
            callback: Some(trampoline::<F>),
            arg: (handler as *mut F).cast(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: self.name.as_ptr(),
            skip_unhandled_events: true,
        };
        let mut handle: esp_timer_handle_t = core::ptr::null_mut();
        // SAFETY: args and the leaked handler outlive the timer.
        let ret = unsafe { esp_timer_create(&args, &mut handle) };
        if ret != ESP_OK {
            return Err(HwInitError::TimerCreateFailed(ret));
        }
        self.handle.store(handle, Ordering::Release);
        log::info!("hw_timer: '{}' created", self.name());
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn hw_start(&self) {
        let handle = self.handle.load(Ordering::Acquire);
        if handle.is_null() {
            return;
        }
        // SAFETY: handle came from esp_timer_create() and is never deleted.
        // Stopping an idle timer returns ESP_ERR_INVALID_STATE, which is fine.
        unsafe {
            esp_timer_stop(handle);
            let ret = esp_timer_start_periodic(handle, u64::from(self.period_us()));
            if ret != ESP_OK {
                log::error!("hw_timer: '{}' start failed (rc={})", self.name(), ret);
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn hw_stop(&self) {
        let handle = self.handle.load(Ordering::Acquire);
        if !handle.is_null() {
            // SAFETY: as in hw_start().
            unsafe { esp_timer_stop(handle) };
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn hw_start(&self) {}

    #[cfg(not(target_os = "espidf"))]
    fn hw_stop(&self) {}
}

/// Runs the leaked handler registered in [`HwTimer::create`].
#[cfg(target_os = "espidf")]
unsafe extern "C" fn trampoline<F: FnMut()>(arg: *mut core::ffi::c_void) {
    // SAFETY: arg is the `&'static mut F` leaked in create().  Each
    // handler belongs to exactly one timer and the esp_timer task runs
    // callbacks one at a time, so the exclusive borrow is never aliased.
    let handler = unsafe { &mut *arg.cast::<F>() };
    handler();
}

impl PeriodicTimer for HwTimer {
    fn arm(&self, period_us: u32) {
        self.period_us.store(period_us, Ordering::Release);
        self.armed.store(true, Ordering::Release);
        self.irq_enabled.store(true, Ordering::Release);
        self.hw_start();
    }

    fn disarm(&self) {
        self.armed.store(false, Ordering::Release);
        self.irq_enabled.store(false, Ordering::Release);
        self.hw_stop();
    }

    fn restart(&self) {
        if self.is_armed() && self.interrupt_enabled() {
            self.hw_start();
        }
    }

    fn enable_interrupt(&self) {
        if !self.is_armed() {
            return;
        }
        if !self.irq_enabled.swap(true, Ordering::AcqRel) {
            self.hw_start();
        }
    }

    fn disable_interrupt(&self) {
        if self.irq_enabled.swap(false, Ordering::AcqRel) {
            self.hw_stop();
        }
    }
}
