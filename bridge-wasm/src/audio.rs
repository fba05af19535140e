//! `HTMLAudioElement`-backed audio output.
//!
//! Commands map one-to-one onto the element's properties and methods. The
//! element's `timeupdate`, `durationchange` and `ended` events are forwarded
//! as [`AudioEvent`]s to a callback registered with
//! [`HtmlAudioOutput::on_event`].

use std::cell::RefCell;
use std::rc::Rc;

use bridge_traits::{
    error::Result as BridgeResult,
    media::MediaRef,
    playback::{AudioEvent, AudioOutput},
};
use tracing::{debug, warn};
use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, EventTarget, HtmlAudioElement};

use crate::error::js_error;

type EventReader = fn(&HtmlAudioElement) -> AudioEvent;

const FORWARDED_EVENTS: [(&str, EventReader); 3] = [
    ("timeupdate", |element| {
        AudioEvent::TimeUpdate(element.current_time())
    }),
    ("durationchange", |element| {
        AudioEvent::DurationChange(element.duration())
    }),
    ("ended", |_| AudioEvent::Ended),
];

/// Registered DOM listener, removed from its target on drop.
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let callback: &js_sys::Function = self.closure.as_ref().unchecked_ref();
        if let Err(err) = self.target.remove_event_listener_with_callback(self.event, callback) {
            warn!(
                event = self.event,
                error = %js_error("removeEventListener", err),
                "Listener not removed"
            );
        }
    }
}

/// [`AudioOutput`] over a single `HTMLAudioElement`.
///
/// Clones share the element and its listeners; listeners are detached when
/// the last clone is dropped or [`HtmlAudioOutput::clear_listeners`] is called.
#[derive(Clone)]
pub struct HtmlAudioOutput {
    element: HtmlAudioElement,
    listeners: Rc<RefCell<Vec<Listener>>>,
}

impl HtmlAudioOutput {
    /// Create a detached element (`new Audio()`).
    pub fn new() -> BridgeResult<Self> {
        let element =
            HtmlAudioElement::new().map_err(|err| js_error("create audio element", err))?;
        element.set_preload("metadata");
        Ok(Self::from_element(element))
    }

    /// Drive an element that already lives in the page.
    pub fn from_element(element: HtmlAudioElement) -> Self {
        Self {
            element,
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// The underlying element.
    pub fn element(&self) -> &HtmlAudioElement {
        &self.element
    }

    /// Forward the element's playback events to `callback`.
    ///
    /// Replaces any previously registered callback.
    pub fn on_event(&self, callback: impl Fn(AudioEvent) + 'static) -> BridgeResult<()> {
        self.clear_listeners();

        let callback: Rc<dyn Fn(AudioEvent)> = Rc::new(callback);
        let mut listeners = Vec::with_capacity(FORWARDED_EVENTS.len());

        for (event, read) in FORWARDED_EVENTS {
            let element = self.element.clone();
            let callback = Rc::clone(&callback);
            let closure = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                callback(read(&element));
            });

            self.element
                .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
                .map_err(|err| js_error("addEventListener", err))?;

            listeners.push(Listener {
                target: self.element.clone().into(),
                event,
                closure,
            });
        }

        *self.listeners.borrow_mut() = listeners;
        Ok(())
    }

    /// Detach every forwarded event listener.
    pub fn clear_listeners(&self) {
        self.listeners.borrow_mut().clear();
    }
}

impl AudioOutput for HtmlAudioOutput {
    fn set_source(&self, source: &MediaRef) -> BridgeResult<()> {
        self.element.set_src(source.as_str());
        debug!(source = %source, "Audio source set");
        Ok(())
    }

    fn play(&self) -> BridgeResult<()> {
        let promise = self
            .element
            .play()
            .map_err(|err| js_error("play", err))?;

        // Autoplay policy or decode failures reject asynchronously.
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = JsFuture::from(promise).await {
                warn!(error = %js_error("play", err), "Playback did not start");
            }
        });
        Ok(())
    }

    fn pause(&self) -> BridgeResult<()> {
        self.element.pause().map_err(|err| js_error("pause", err))
    }

    fn set_current_time(&self, seconds: f64) -> BridgeResult<()> {
        self.element.set_current_time(seconds);
        Ok(())
    }

    fn set_volume(&self, volume: f64) -> BridgeResult<()> {
        self.element.set_volume(volume);
        Ok(())
    }
}
