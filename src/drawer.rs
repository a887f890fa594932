//! The drawer controller.
//!
//! Panels move through `Closed -> Opening -> Open -> Closing -> Closed`. The
//! two timed edges (`Opening -> Open`, `Closing -> Closed`) are timers keyed by
//! panel id; starting a transition cancels whatever the panel had pending, so
//! a burst of clicks always settles on the last request.

use std::collections::HashMap;
use std::time::Duration;

use dioxus::logger::tracing::{debug, warn};

use crate::aria::{self, ARIA_CONTROLS};
use crate::dom::{Dom, closest};
use crate::error::DrawerError;
use crate::focus::FocusTrap;
use crate::settings::DrawerSettings;
use crate::timers::{ManualTimers, Step, Task, TimerId, Timers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl Phase {
    fn locks_scroll(self) -> bool {
        matches!(self, Phase::Opening | Phase::Open)
    }
}

#[derive(Debug)]
struct PanelState<N> {
    phase: Phase,
    pending: Option<TimerId>,
    trap: Option<FocusTrap<N>>,
}

impl<N> Default for PanelState<N> {
    fn default() -> Self {
        Self {
            phase: Phase::Closed,
            pending: None,
            trap: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Tab,
    Other,
}

impl Key {
    /// Classifies a keyboard event by `key`, falling back to the legacy
    /// `keyCode` for browsers that leave `key` unset.
    pub fn from_event(key: &str, key_code: u32) -> Self {
        match (key, key_code) {
            ("Escape" | "Esc", _) | (_, 27) => Key::Escape,
            ("Tab", _) | (_, 9) => Key::Tab,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeyInput<N> {
    pub key: Key,
    pub shift: bool,
    pub target: Option<N>,
}

/// What a delegated event handler did.
#[derive(Debug, Default)]
pub struct Dispatch {
    pub prevent_default: bool,
    pub errors: Vec<DrawerError>,
}

impl Dispatch {
    fn record(&mut self, result: Result<(), DrawerError>) {
        if let Err(e) = result {
            self.errors.push(e);
        }
    }
}

pub struct Drawer<D: Dom, T: Timers> {
    dom: D,
    timers: T,
    settings: DrawerSettings,
    panels: HashMap<String, PanelState<D::Node>>,
}

impl<D: Dom, T: Timers> Drawer<D, T> {
    pub fn new(dom: D, timers: T, settings: DrawerSettings) -> Result<Self, DrawerError> {
        settings.validate()?;
        Ok(Self {
            dom,
            timers,
            settings,
            panels: HashMap::new(),
        })
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    pub fn phase(&self, panel_id: &str) -> Phase {
        self.panels
            .get(panel_id)
            .map(|s| s.phase)
            .unwrap_or_default()
    }

    /// Opens the panel named by the trigger's `aria-controls`.
    pub fn open(&mut self, trigger: &D::Node) -> Result<(), DrawerError> {
        let id = self
            .dom
            .attribute(trigger, ARIA_CONTROLS)
            .filter(|id| !id.is_empty())
            .ok_or(DrawerError::TriggerWithoutControls)?;
        let panel = self
            .dom
            .element_by_id(&id)
            .ok_or_else(|| DrawerError::PanelNotFound(id.clone()))?;

        let controllers = self.controllers(&id);
        let state = self.panels.entry(id.clone()).or_default();
        if matches!(state.phase, Phase::Opening | Phase::Open) {
            set_all_expanded(&self.dom, &controllers, true);
            return Ok(());
        }

        if let Some(pending) = state.pending.take() {
            self.timers.cancel(pending);
        }
        self.dom.add_class(&panel, &self.settings.active_class);
        set_all_expanded(&self.dom, &controllers, true);
        state.phase = Phase::Opening;
        state.pending = Some(self.timers.schedule(
            self.settings.open_delay(),
            Task {
                panel: id.clone(),
                step: Step::Reveal,
            },
        ));
        debug!("drawer {id}: opening");
        self.sync_scroll_lock();
        Ok(())
    }

    /// Closes the panel enclosing `element`.
    pub fn close(&mut self, element: &D::Node) -> Result<(), DrawerError> {
        let panel = closest(&self.dom, element, &self.settings.selector_target)
            .ok_or(DrawerError::NotInPanel)?;
        let id = self
            .dom
            .attribute(&panel, "id")
            .filter(|id| !id.is_empty())
            .ok_or(DrawerError::PanelWithoutId)?;
        let controllers = self.controllers(&id);
        if controllers.is_empty() {
            return Err(DrawerError::TriggerNotFound(id));
        }

        let has_active = self.dom.has_class(&panel, &self.settings.active_class);
        let state = self.panels.entry(id.clone()).or_default();
        match state.phase {
            Phase::Closing => {
                set_all_expanded(&self.dom, &controllers, false);
                return Ok(());
            }
            Phase::Closed if !has_active => {
                set_all_expanded(&self.dom, &controllers, false);
                return Ok(());
            }
            _ => {}
        }

        if let Some(pending) = state.pending.take() {
            self.timers.cancel(pending);
        }
        state.trap = None;
        self.dom.remove_class(&panel, &self.settings.visible_class);
        set_all_expanded(&self.dom, &controllers, false);
        state.phase = Phase::Closing;
        state.pending = Some(self.timers.schedule(
            self.settings.close_delay(),
            Task {
                panel: id.clone(),
                step: Step::Retire,
            },
        ));
        debug!("drawer {id}: closing");
        self.sync_scroll_lock();
        Ok(())
    }

    /// Opens the trigger's panel unless it is opening or open, in which case
    /// it closes it. The panel's phase decides, not the trigger's attribute,
    /// so several triggers for one panel agree.
    pub fn toggle(&mut self, trigger: &D::Node) -> Result<(), DrawerError> {
        let id = self
            .dom
            .attribute(trigger, ARIA_CONTROLS)
            .filter(|id| !id.is_empty())
            .ok_or(DrawerError::TriggerWithoutControls)?;
        let current = if self.phase(&id).locks_scroll() { "true" } else { "false" };
        if aria::toggle_expanded(Some(current)) == "true" {
            return self.open(trigger);
        }
        let panel = self
            .dom
            .element_by_id(&id)
            .ok_or(DrawerError::PanelNotFound(id))?;
        self.close(&panel)
    }

    /// [`Drawer::toggle`] addressed by panel id instead of trigger.
    pub fn toggle_panel(&mut self, panel_id: &str) -> Result<(), DrawerError> {
        let trigger = self
            .controllers(panel_id)
            .into_iter()
            .next()
            .ok_or_else(|| DrawerError::TriggerNotFound(panel_id.to_string()))?;
        self.toggle(&trigger)
    }

    /// Runs a timed step. Steps that were cancelled or replaced are dropped.
    pub fn fire(&mut self, id: TimerId, task: Task) {
        let Some(state) = self.panels.get_mut(&task.panel) else {
            return;
        };
        if state.pending != Some(id) {
            debug!("drawer {}: stale {:?} ignored", task.panel, task.step);
            return;
        }
        state.pending = None;

        let Some(panel) = self.dom.element_by_id(&task.panel) else {
            warn!("drawer {} left the document mid-transition", task.panel);
            state.phase = Phase::Closed;
            state.trap = None;
            self.sync_scroll_lock();
            return;
        };
        match task.step {
            Step::Reveal => {
                self.dom.add_class(&panel, &self.settings.visible_class);
                state.trap = Some(FocusTrap::new(&self.dom, &panel));
                state.phase = Phase::Open;
                debug!("drawer {}: open", task.panel);
            }
            Step::Retire => {
                self.dom.remove_class(&panel, &self.settings.active_class);
                state.phase = Phase::Closed;
                debug!("drawer {}: closed", task.panel);
            }
        }
    }

    /// Delegated document click handler.
    pub fn handle_click(&mut self, target: &D::Node) -> Dispatch {
        let open = closest(&self.dom, target, &self.settings.selector_trigger);
        let close = closest(&self.dom, target, &self.settings.selector_close);

        let mut dispatch = Dispatch::default();
        if let Some(trigger) = &open {
            let result = self.open(trigger);
            dispatch.record(result);
        }
        if let Some(closer) = &close {
            let result = self.close(closer);
            dispatch.record(result);
        }
        dispatch.prevent_default = open.is_some() || close.is_some();
        dispatch
    }

    /// Delegated document keydown handler.
    pub fn handle_keydown(&mut self, input: &KeyInput<D::Node>) -> Dispatch {
        let mut dispatch = Dispatch::default();
        match input.key {
            Key::Escape => {
                let active: Vec<_> = self
                    .dom
                    .query_all(&self.settings.selector_target)
                    .into_iter()
                    .filter(|p| self.dom.has_class(p, &self.settings.active_class))
                    .collect();
                for panel in &active {
                    let result = self.close(panel);
                    dispatch.record(result);
                }
            }
            Key::Tab => {
                let target = input.target.clone().or_else(|| self.dom.active_element());
                let Some(target) = target else {
                    return dispatch;
                };
                // Nested open panels: the innermost one owns the event.
                let trap = self
                    .panels
                    .values()
                    .filter_map(|s| s.trap.as_ref())
                    .filter(|t| self.dom.contains(t.container(), &target))
                    .reduce(|outer, t| {
                        if self.dom.contains(outer.container(), t.container()) {
                            t
                        } else {
                            outer
                        }
                    });
                if let Some(trap) = trap {
                    dispatch.prevent_default = trap.handle_tab(&self.dom, input.shift);
                }
            }
            Key::Other => {}
        }
        dispatch
    }

    /// Cancels every pending step. Used when the instance is torn down.
    pub fn cancel_pending(&mut self) {
        for state in self.panels.values_mut() {
            if let Some(pending) = state.pending.take() {
                self.timers.cancel(pending);
            }
        }
    }

    /// Every element whose `aria-controls` names `panel_id`, in document order.
    fn controllers(&self, panel_id: &str) -> Vec<D::Node> {
        self.dom
            .query_all("[aria-controls]")
            .into_iter()
            .filter(|n| self.dom.attribute(n, ARIA_CONTROLS).as_deref() == Some(panel_id))
            .collect()
    }

    fn sync_scroll_lock(&self) {
        let locked = self.panels.values().any(|s| s.phase.locks_scroll());
        self.dom.set_scroll_locked(locked);
    }
}

fn set_all_expanded<D: Dom>(dom: &D, nodes: &[D::Node], expanded: bool) {
    for node in nodes {
        aria::set_expanded(dom, node, expanded);
    }
}

impl<D: Dom> Drawer<D, ManualTimers> {
    /// Moves the virtual clock forward, firing every step that comes due.
    pub fn advance(&mut self, by: Duration) {
        let until = self.timers.now() + by;
        while let Some((id, task)) = self.timers.pop_due(until) {
            self.fire(id, task);
        }
        self.timers.set_now(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDom, NodeId};

    fn drawer() -> (MemoryDom, Drawer<MemoryDom, ManualTimers>) {
        let dom = MemoryDom::new();
        let drawer = Drawer::new(dom.clone(), ManualTimers::new(), DrawerSettings::default()).unwrap();
        (dom, drawer)
    }

    fn markup(dom: &MemoryDom, id: &str) -> (NodeId, NodeId) {
        let trigger = dom.element(
            dom.body(),
            "button",
            &[("data-drawer-trigger", ""), ("aria-controls", id), ("aria-expanded", "false")],
        );
        let panel = dom.element(dom.body(), "div", &[("id", id), ("data-drawer-target", "")]);
        (trigger, panel)
    }

    #[test]
    fn key_classification() {
        assert_eq!(Key::from_event("Escape", 0), Key::Escape);
        assert_eq!(Key::from_event("", 27), Key::Escape);
        assert_eq!(Key::from_event("Tab", 0), Key::Tab);
        assert_eq!(Key::from_event("Unidentified", 9), Key::Tab);
        assert_eq!(Key::from_event("a", 65), Key::Other);
    }

    #[test]
    fn rejects_invalid_settings() {
        let settings = DrawerSettings {
            active_class: String::new(),
            ..Default::default()
        };
        assert!(Drawer::new(MemoryDom::new(), ManualTimers::new(), settings).is_err());
    }

    #[test]
    fn phases_follow_timers() {
        let (dom, mut drawer) = drawer();
        let (trigger, _) = markup(&dom, "p1");

        assert_eq!(drawer.phase("p1"), Phase::Closed);
        drawer.open(&trigger).unwrap();
        assert_eq!(drawer.phase("p1"), Phase::Opening);
        drawer.advance(Duration::from_millis(50));
        assert_eq!(drawer.phase("p1"), Phase::Open);
        drawer.close(&dom.element_by_id("p1").unwrap()).unwrap();
        assert_eq!(drawer.phase("p1"), Phase::Closing);
        drawer.advance(Duration::from_millis(350));
        assert_eq!(drawer.phase("p1"), Phase::Closed);
        assert_eq!(drawer.timers_mut().pending(), 0);
    }

    #[test]
    fn toggle_follows_phase() {
        let (dom, mut drawer) = drawer();
        let (trigger, panel) = markup(&dom, "p1");

        drawer.toggle(&trigger).unwrap();
        assert_eq!(drawer.phase("p1"), Phase::Opening);
        drawer.advance(Duration::from_millis(50));
        drawer.toggle(&trigger).unwrap();
        assert_eq!(drawer.phase("p1"), Phase::Closing);
        assert!(!dom.has_class(&panel, "is-visible"));
        assert_eq!(dom.attribute(&trigger, "aria-expanded").as_deref(), Some("false"));
    }

    #[test]
    fn toggle_panel_resolves_trigger_by_id() {
        let (dom, mut drawer) = drawer();
        let (trigger, _) = markup(&dom, "p1");

        drawer.toggle_panel("p1").unwrap();
        assert_eq!(dom.attribute(&trigger, "aria-expanded").as_deref(), Some("true"));
        assert!(matches!(
            drawer.toggle_panel("nope"),
            Err(DrawerError::TriggerNotFound(id)) if id == "nope"
        ));
    }

    #[test]
    fn stale_fire_is_ignored() {
        let (dom, mut drawer) = drawer();
        let (trigger, panel) = markup(&dom, "p1");

        drawer.open(&trigger).unwrap();
        drawer.fire(
            TimerId(999),
            Task {
                panel: "p1".into(),
                step: Step::Reveal,
            },
        );
        assert!(!dom.has_class(&panel, "is-visible"));
        assert_eq!(drawer.phase("p1"), Phase::Opening);
    }

    #[test]
    fn panel_removed_mid_transition_settles_closed() {
        let (dom, mut drawer) = drawer();
        let (trigger, panel) = markup(&dom, "p1");

        drawer.open(&trigger).unwrap();
        dom.remove(panel);
        drawer.advance(Duration::from_millis(50));
        assert_eq!(drawer.phase("p1"), Phase::Closed);
        assert!(!dom.scroll_locked());
    }

    #[test]
    fn cancel_pending_stops_transitions() {
        let (dom, mut drawer) = drawer();
        let (trigger, panel) = markup(&dom, "p1");

        drawer.open(&trigger).unwrap();
        drawer.cancel_pending();
        drawer.advance(Duration::from_secs(1));
        assert!(!dom.has_class(&panel, "is-visible"));
    }
}
