use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use dioxus::logger::tracing::warn;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use super::{Task, TimerId, Timers};

type Sink = Rc<dyn Fn(TimerId, Task)>;

/// `setTimeout`-backed timers. Fired steps are delivered to the sink set with
/// [`BrowserTimers::set_sink`].
pub struct BrowserTimers {
    window: Window,
    next_id: u64,
    live: Rc<RefCell<HashMap<TimerId, i32>>>,
    sink: Option<Sink>,
}

impl BrowserTimers {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            next_id: 0,
            live: Rc::new(RefCell::new(HashMap::new())),
            sink: None,
        }
    }

    pub fn set_sink(&mut self, sink: impl Fn(TimerId, Task) + 'static) {
        self.sink = Some(Rc::new(sink));
    }
}

impl Timers for BrowserTimers {
    fn schedule(&mut self, delay: Duration, task: Task) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let Some(sink) = self.sink.clone() else {
            warn!("timer scheduled before a sink was set; step dropped");
            return id;
        };

        let live = self.live.clone();
        let callback = Closure::once_into_js(move || {
            if live.borrow_mut().remove(&id).is_some() {
                sink(id, task);
            }
        });
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
        {
            Ok(handle) => {
                self.live.borrow_mut().insert(id, handle);
            }
            Err(e) => warn!("setTimeout failed: {e:?}"),
        }
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(handle) = self.live.borrow_mut().remove(&id) {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}
