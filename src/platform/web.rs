//! Browser frame loop
//!
//! `FrameLoop` owns the requestAnimationFrame callback. Cancelling (or
//! dropping) it stops the pending frame and frees the closure, so no
//! callback outlives the page's game instance.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

type FrameCallback = Closure<dyn FnMut(f64)>;

pub struct FrameLoop {
    handle: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn request_frame(callback: &FrameCallback) -> Result<i32, JsValue> {
    window()?.request_animation_frame(callback.as_ref().unchecked_ref())
}

impl FrameLoop {
    /// Call `on_frame` with the frame timestamp (ms) every animation frame
    pub fn start<F>(mut on_frame: F) -> Result<Self, JsValue>
    where
        F: FnMut(f64) + 'static,
    {
        let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));

        let handle_inner = handle.clone();
        let callback_inner = callback.clone();
        *callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
            on_frame(timestamp);

            let next = callback_inner.borrow().as_ref().map(request_frame);
            match next {
                Some(Ok(id)) => handle_inner.set(Some(id)),
                Some(Err(e)) => {
                    log::error!("requestAnimationFrame failed: {:?}", e);
                    handle_inner.set(None);
                }
                None => handle_inner.set(None),
            }
        }));

        let first = match callback.borrow().as_ref() {
            Some(cb) => request_frame(cb)?,
            None => return Err(JsValue::from_str("frame callback missing")),
        };
        handle.set(Some(first));

        Ok(Self { handle, callback })
    }

    /// Cancel the pending frame and release the callback.
    ///
    /// Must not be called from inside the frame callback itself.
    pub fn cancel(&self) {
        if let Some(id) = self.handle.take() {
            if let Ok(window) = window() {
                let _ = window.cancel_animation_frame(id);
            }
            log::info!("Frame loop cancelled");
        }
        // Breaks the closure's reference back to its own cell
        if let Ok(mut slot) = self.callback.try_borrow_mut() {
            slot.take();
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}
