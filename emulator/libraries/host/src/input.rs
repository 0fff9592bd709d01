use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::collections::VecDeque;

use crate::keys::KeyEvent;


/// Something the UI wants the controller to do
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    Key(KeyEvent),
    /// The complete contents of a ROM the user picked
    LoadRom(Vec<u8>),
    Unload,
    Quit,
}

pub fn event_queue<T>() -> (EventSender<T>, EventReceiver<T>) {
    let sender = EventSender {
        queue: Arc::new(Mutex::new(VecDeque::new())),
    };

    let receiver = EventReceiver {
        queue: sender.queue.clone(),
    };

    (sender, receiver)
}

fn lock<T>(queue: &Mutex<VecDeque<T>>) -> MutexGuard<'_, VecDeque<T>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone)]
pub struct EventSender<T> {
    queue: Arc<Mutex<VecDeque<T>>>,
}

impl<T> EventSender<T> {
    pub fn send(&self, event: T) {
        lock(&self.queue).push_back(event);
    }
}

pub struct EventReceiver<T> {
    queue: Arc<Mutex<VecDeque<T>>>,
}

impl<T> EventReceiver<T> {
    pub fn receive(&self) -> Option<T> {
        lock(&self.queue).pop_front()
    }
}
