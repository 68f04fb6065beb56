//! Browser transport: a `web_sys::WebSocket` feeding the pose channel
//!
//! Socket callbacks only queue `TransportEvent`s; the animation frame drains
//! the queue through `pump`. The callbacks are owned here rather than leaked
//! so tearing the transport down leaves nothing firing.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{BinaryType, CloseEvent, Event, MessageEvent, WebSocket};

use super::TransportEvent;
use crate::arcade::Arcade;

type EventQueue = Rc<RefCell<VecDeque<TransportEvent>>>;

struct Handlers {
    _on_open: Closure<dyn FnMut(Event)>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

pub struct WebTransport {
    queue: EventQueue,
    socket: Option<WebSocket>,
    handlers: Option<Handlers>,
}

impl WebTransport {
    /// Open the first connection
    pub fn start(arcade: &mut Arcade) -> Self {
        let mut transport = Self {
            queue: Rc::new(RefCell::new(VecDeque::new())),
            socket: None,
            handlers: None,
        };
        let url = arcade.channel_mut().begin_connect().to_owned();
        transport.open(&url);
        transport
    }

    fn open(&mut self, url: &str) {
        self.close();

        let socket = match WebSocket::new(url) {
            Ok(socket) => socket,
            Err(e) => {
                // Bad URL or blocked scheme: report it like any other failure
                let mut queue = self.queue.borrow_mut();
                queue.push_back(TransportEvent::Failed(format!("{:?}", e)));
                queue.push_back(TransportEvent::Closed);
                return;
            }
        };
        socket.set_binary_type(BinaryType::Arraybuffer);

        let queue = self.queue.clone();
        let on_open = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
            queue.borrow_mut().push_back(TransportEvent::Opened);
        });

        let queue = self.queue.clone();
        let on_message = Closure::<dyn FnMut(_)>::new(move |event: MessageEvent| {
            // Binary frames carry no pose data
            if let Some(text) = event.data().as_string() {
                queue.borrow_mut().push_back(TransportEvent::Text(text));
            }
        });

        let queue = self.queue.clone();
        let on_error = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
            queue
                .borrow_mut()
                .push_back(TransportEvent::Failed("websocket error".to_string()));
        });

        let queue = self.queue.clone();
        let on_close = Closure::<dyn FnMut(_)>::new(move |_event: CloseEvent| {
            queue.borrow_mut().push_back(TransportEvent::Closed);
        });

        socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        self.socket = Some(socket);
        self.handlers = Some(Handlers {
            _on_open: on_open,
            _on_message: on_message,
            _on_error: on_error,
            _on_close: on_close,
        });
    }

    /// Deliver queued socket events and start a reconnect when one is due.
    pub fn pump(&mut self, arcade: &mut Arcade, now_ms: f64) {
        loop {
            // Release the borrow before handing the event on
            let next = self.queue.borrow_mut().pop_front();
            let Some(event) = next else { break };
            arcade.on_transport_event(event, now_ms);
        }
        if arcade.channel().poll_reconnect(now_ms) {
            let url = arcade.channel_mut().begin_connect().to_owned();
            self.open(&url);
        }
    }

    /// Detach callbacks and close the socket
    pub fn close(&mut self) {
        if let Some(socket) = self.socket.take() {
            socket.set_onopen(None);
            socket.set_onmessage(None);
            socket.set_onerror(None);
            socket.set_onclose(None);
            let _ = socket.close();
        }
        self.handlers = None;
    }
}

impl Drop for WebTransport {
    fn drop(&mut self) {
        self.close();
    }
}
