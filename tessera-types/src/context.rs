//! Per-caller execution context.
//!
//! A [`Context`] carries the notice sink and the cooperative interrupt flag for every operation that takes one. There
//! is no process-wide state: two contexts never observe each other's notices or interrupt requests, so each thread can
//! own its own context.

use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::TesseraTypesError;

type NoticeHandler = Box<dyn Fn(&str) + Send + Sync>;
type InterruptCallback = Box<dyn Fn() + Send + Sync>;

/// Handle to the notice sink and interrupt flag used by geometry operations.
pub struct Context {
    notice_handler: Option<NoticeHandler>,
    interrupt_callback: Option<InterruptCallback>,
    interrupt: Interrupt,
}

impl Context {
    /// Creates a context that forwards notices to the `log` facade.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts building a context with custom handlers.
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    /// Reports a non-fatal notice. Execution continues after the handler returns.
    pub fn notice(&self, message: &str) {
        match &self.notice_handler {
            Some(handler) => handler(message),
            None => log::info!("{message}"),
        }
    }

    /// Returns the interrupt flag of this context. The handle can be cloned and moved to another thread to request
    /// cancellation of a long-running operation.
    pub fn interrupt(&self) -> Interrupt {
        self.interrupt.clone()
    }

    /// Cooperative cancellation checkpoint.
    ///
    /// Runs the installed interrupt callback (which may itself request an interrupt) and then fails with
    /// [`TesseraTypesError::Interrupted`] if an interrupt was requested. The flag is cleared when it is reported, so
    /// the next operation starts fresh.
    pub fn check_interrupt(&self) -> Result<(), TesseraTypesError> {
        if let Some(callback) = &self.interrupt_callback {
            callback();
        }

        if self.interrupt.take() {
            log::debug!("Interrupt requested, stopping the operation");
            return Err(TesseraTypesError::Interrupted);
        }

        Ok(())
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("custom_notice_handler", &self.notice_handler.is_some())
            .field("interrupt_callback", &self.interrupt_callback.is_some())
            .field("interrupt", &self.interrupt)
            .finish()
    }
}

/// Builder for [`Context`].
#[derive(Default)]
pub struct ContextBuilder {
    notice_handler: Option<NoticeHandler>,
    interrupt_callback: Option<InterruptCallback>,
}

impl ContextBuilder {
    /// Sets the function that receives notices instead of the `log` facade.
    pub fn notice_handler(mut self, handler: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.notice_handler = Some(Box::new(handler));
        self
    }

    /// Sets the function called at every interrupt checkpoint.
    pub fn interrupt_callback(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.interrupt_callback = Some(Box::new(callback));
        self
    }

    /// Creates the context.
    pub fn build(self) -> Context {
        Context {
            notice_handler: self.notice_handler,
            interrupt_callback: self.interrupt_callback,
            interrupt: Interrupt::default(),
        }
    }
}

/// Advisory interrupt flag shared between a context and anyone holding a clone of it.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    /// Asks the running operation to stop at its next checkpoint.
    pub fn request(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Withdraws a pending request.
    pub fn clear(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// Returns true if an interrupt is pending.
    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn take(&self) -> bool {
        self.flag.swap(false, Ordering::SeqCst)
    }
}

/// Requests an interrupt of whatever operation is currently running with `ctx`.
pub fn request_interrupt(ctx: &Context) {
    ctx.interrupt.request();
}

/// Cancels a pending interrupt request of `ctx`.
pub fn cancel_interrupt(ctx: &Context) {
    ctx.interrupt.clear();
}
