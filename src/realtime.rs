//! Realtime Socket Transport
//!
//! Owns the browser websocket for the notes channel. Frames are built and
//! read by [`NotesChannel`]; this side only moves them and keeps the
//! connection alive. Dropping the subscription leaves the channel and
//! closes the socket.
//!
//! A subscription reports its loss once, whether the join was refused or
//! the socket closed; the owner decides when to build a new one.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Interval;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use notes_core::config::HEARTBEAT_INTERVAL_MS;
use notes_core::realtime::ChannelEvent;
use notes_core::{ConfigError, NotesChannel, SupabaseConfig};

#[derive(Error, Debug)]
pub enum SubscribeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Could not open realtime socket: {0}")]
    Socket(String),
}

fn send(socket: &WebSocket, frame: Result<String, serde_json::Error>) {
    if socket.ready_state() != WebSocket::OPEN {
        return;
    }
    match frame {
        Ok(text) => {
            if let Err(e) = socket.send_with_str(&text) {
                log::warn!("Realtime send failed: {:?}", e);
            }
        }
        Err(e) => log::error!("Could not encode realtime frame: {}", e),
    }
}

/// Live subscription to the owner's note changes
pub struct RealtimeSubscription {
    socket: WebSocket,
    channel: Rc<RefCell<NotesChannel>>,
    _on_open: Closure<dyn FnMut(Event)>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
    _heartbeat: Interval,
}

impl RealtimeSubscription {
    /// Connect and join. `on_event` sees joins, row changes and, at most
    /// once, the event that ended the subscription.
    pub fn subscribe(
        config: &SupabaseConfig,
        owner_id: &str,
        access_token: &str,
        on_event: impl Fn(&ChannelEvent) + 'static,
    ) -> Result<Self, SubscribeError> {
        let url = config.realtime_url()?;
        let socket =
            WebSocket::new(&url).map_err(|e| SubscribeError::Socket(format!("{:?}", e)))?;
        let channel = Rc::new(RefCell::new(NotesChannel::new(owner_id)));
        let lost = Rc::new(Cell::new(false));
        let on_event: Rc<dyn Fn(&ChannelEvent)> = Rc::new(move |event: &ChannelEvent| {
            if event.requires_rejoin() && lost.replace(true) {
                return;
            }
            on_event(event);
        });

        let on_open = {
            let socket = socket.clone();
            let channel = channel.clone();
            let token = access_token.to_string();
            Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                log::debug!("Realtime socket open, joining {}", channel.borrow().topic());
                send(&socket, channel.borrow_mut().join_frame(Some(&token)));
            })
        };

        let on_message = {
            let channel = channel.clone();
            let on_event = on_event.clone();
            Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
                let Some(text) = ev.data().as_string() else {
                    return;
                };
                let event = channel.borrow().parse(&text);
                match &event {
                    ChannelEvent::Joined => log::info!("Subscribed to note changes"),
                    ChannelEvent::JoinRejected(reason) => {
                        log::warn!("Realtime subscription refused: {}", reason)
                    }
                    ChannelEvent::Change(kind) => log::debug!("Note change: {:?}", kind),
                    ChannelEvent::Closed => log::warn!("Realtime channel closed by server"),
                    ChannelEvent::Ignored => return,
                }
                on_event(&event);
            })
        };

        let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |ev: CloseEvent| {
            log::info!("Realtime socket closed ({})", ev.code());
            on_event(&ChannelEvent::Closed);
        });

        let on_error = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            log::warn!("Realtime socket error");
        });

        socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        let heartbeat = {
            let socket = socket.clone();
            let channel = channel.clone();
            Interval::new(HEARTBEAT_INTERVAL_MS, move || {
                send(&socket, channel.borrow_mut().heartbeat_frame());
            })
        };

        Ok(Self {
            socket,
            channel,
            _on_open: on_open,
            _on_message: on_message,
            _on_close: on_close,
            _on_error: on_error,
            _heartbeat: heartbeat,
        })
    }
}

impl Drop for RealtimeSubscription {
    fn drop(&mut self) {
        send(&self.socket, self.channel.borrow_mut().leave_frame());
        // handlers must not fire once their closures are freed
        self.socket.set_onopen(None);
        self.socket.set_onmessage(None);
        self.socket.set_onclose(None);
        self.socket.set_onerror(None);
        let _ = self.socket.close();
        log::debug!("Realtime subscription dropped");
    }
}
