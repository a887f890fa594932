//! Browser wiring: document listeners and the handle that owns them.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::logger::tracing::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, EventTarget, KeyboardEvent, Node};

use crate::dom::BrowserDom;
use crate::drawer::{Dispatch, Drawer, Key, KeyInput};
use crate::error::DrawerError;
use crate::settings::DrawerSettings;
use crate::timers::BrowserTimers;

pub type BrowserDrawer = Drawer<BrowserDom, BrowserTimers>;

/// A listener registration. Dropping it removes exactly the callback that
/// was added.
pub struct Subscription {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Subscription {
    pub fn listen(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, DrawerError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|e| DrawerError::Browser(format!("addEventListener({event}): {e:?}")))?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
        {
            warn!("removeEventListener({}) failed: {e:?}", self.event);
        }
    }
}

/// A mounted drawer. Dropping it detaches the document listeners and cancels
/// pending transition steps.
pub struct DrawerHandle {
    drawer: Rc<RefCell<BrowserDrawer>>,
    _click: Subscription,
    _keydown: Subscription,
}

impl DrawerHandle {
    /// Opens or closes the panel with the given id through its trigger.
    pub fn toggle(&self, panel_id: &str) -> Result<(), DrawerError> {
        let mut drawer = self
            .drawer
            .try_borrow_mut()
            .map_err(|_| DrawerError::Browser("drawer busy".into()))?;
        drawer.toggle_panel(panel_id)
    }
}

impl Drop for DrawerHandle {
    fn drop(&mut self) {
        match self.drawer.try_borrow_mut() {
            Ok(mut drawer) => drawer.cancel_pending(),
            Err(_) => warn!("drawer busy during teardown; pending steps left to expire"),
        }
        info!("drawer unmounted");
    }
}

fn report(dispatch: Dispatch, event: &Event) {
    if dispatch.prevent_default {
        event.prevent_default();
    }
    for e in dispatch.errors {
        warn!("drawer: {e}");
    }
}

/// Resolves an event target to the element it belongs to (text nodes map to
/// their parent).
fn target_element(event: &Event) -> Option<Element> {
    let target = event.target()?;
    match target.dyn_into::<Element>() {
        Ok(el) => Some(el),
        Err(other) => other.dyn_into::<Node>().ok()?.parent_element(),
    }
}

/// Attaches a drawer controller to the page document.
pub fn mount(settings: DrawerSettings) -> Result<DrawerHandle, DrawerError> {
    let window = web_sys::window().ok_or_else(|| DrawerError::Browser("no window".into()))?;
    let dom = BrowserDom::new()?;
    let document: EventTarget = dom.document().clone().into();
    let drawer = Rc::new(RefCell::new(Drawer::new(
        dom,
        BrowserTimers::new(window),
        settings,
    )?));

    let weak = Rc::downgrade(&drawer);
    drawer.borrow_mut().timers_mut().set_sink(move |id, task| {
        let Some(drawer) = weak.upgrade() else { return };
        match drawer.try_borrow_mut() {
            Ok(mut drawer) => drawer.fire(id, task),
            Err(_) => warn!("drawer busy; dropped {:?} for {}", task.step, task.panel),
        };
    });

    let weak = Rc::downgrade(&drawer);
    let click = Subscription::listen(&document, "click", move |event| {
        let Some(drawer) = weak.upgrade() else { return };
        let Some(target) = target_element(&event) else { return };
        let Ok(mut drawer) = drawer.try_borrow_mut() else {
            warn!("drawer busy; click ignored");
            return;
        };
        let dispatch = drawer.handle_click(&target);
        report(dispatch, &event);
    })?;

    let weak = Rc::downgrade(&drawer);
    let keydown = Subscription::listen(&document, "keydown", move |event| {
        let Some(drawer) = weak.upgrade() else { return };
        let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else { return };
        let input = KeyInput {
            key: Key::from_event(&key_event.key(), key_event.key_code()),
            shift: key_event.shift_key(),
            target: target_element(&event),
        };
        let Ok(mut drawer) = drawer.try_borrow_mut() else {
            warn!("drawer busy; keydown ignored");
            return;
        };
        let dispatch = drawer.handle_keydown(&input);
        report(dispatch, &event);
    })?;

    info!("drawer mounted");
    Ok(DrawerHandle {
        drawer,
        _click: click,
        _keydown: keydown,
    })
}

#[cfg(test)]
mod tests {
    use wasm_bindgen_test::*;
    use web_sys::HtmlElement;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    async fn sleep(ms: i32) {
        let promise = js_sys::Promise::new(&mut |resolve, _| {
            web_sys::window()
                .unwrap()
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                .unwrap();
        });
        wasm_bindgen_futures::JsFuture::from(promise).await.unwrap();
    }

    /// A trigger and its panel appended to the test page, removed on drop.
    struct Markup {
        trigger: HtmlElement,
        panel: Element,
    }

    impl Markup {
        fn new(id: &str) -> Self {
            let document = web_sys::window().unwrap().document().unwrap();
            let body = document.body().unwrap();
            let trigger: HtmlElement = document
                .create_element("button")
                .unwrap()
                .dyn_into()
                .unwrap();
            trigger.set_attribute("data-drawer-trigger", "").unwrap();
            trigger.set_attribute("aria-controls", id).unwrap();
            let panel = document.create_element("div").unwrap();
            panel.set_id(id);
            panel.set_attribute("data-drawer-target", "").unwrap();
            body.append_child(&trigger).unwrap();
            body.append_child(&panel).unwrap();
            Self { trigger, panel }
        }

        fn has_class(&self, class: &str) -> bool {
            self.panel.class_list().contains(class)
        }
    }

    impl Drop for Markup {
        fn drop(&mut self) {
            self.trigger.remove();
            self.panel.remove();
        }
    }

    #[wasm_bindgen_test]
    fn dropped_handle_stops_listening() {
        let markup = Markup::new("mount-listen");
        let handle = mount(DrawerSettings::default()).unwrap();

        markup.trigger.click();
        assert!(markup.has_class("is-active"));
        assert_eq!(
            markup.trigger.get_attribute("aria-expanded").as_deref(),
            Some("true")
        );

        drop(handle);
        markup.panel.class_list().remove_1("is-active").unwrap();
        markup.trigger.click();
        assert!(!markup.has_class("is-active"));
    }

    #[wasm_bindgen_test]
    async fn live_handle_reveals_after_open_delay() {
        let markup = Markup::new("mount-reveal");
        let handle = mount(DrawerSettings::default()).unwrap();

        markup.trigger.click();
        assert!(!markup.has_class("is-visible"));
        sleep(120).await;
        assert!(markup.has_class("is-visible"));
        drop(handle);
    }

    #[wasm_bindgen_test]
    async fn dropped_handle_cancels_pending_reveal() {
        let markup = Markup::new("mount-cancel");
        let handle = mount(DrawerSettings::default()).unwrap();

        markup.trigger.click();
        assert!(markup.has_class("is-active"));
        drop(handle);

        sleep(120).await;
        assert!(!markup.has_class("is-visible"));
    }

    #[wasm_bindgen_test]
    fn toggle_through_handle_opens_and_closes() {
        let markup = Markup::new("mount-toggle");
        let handle = mount(DrawerSettings::default()).unwrap();

        handle.toggle("mount-toggle").unwrap();
        assert!(markup.has_class("is-active"));
        handle.toggle("mount-toggle").unwrap();
        assert_eq!(
            markup.trigger.get_attribute("aria-expanded").as_deref(),
            Some("false")
        );
        drop(handle);
    }
}
