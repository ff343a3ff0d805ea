// filepath: src/event.rs
//! Buffered input events and the rules for handing them out.
//!
//! Presses accumulate in per-kind queues until the program drains them, so
//! a slow animation loop never loses clicks. Installing a callback for an
//! event kind takes that kind out of its queue: from then on the callback
//! sees the events and the queue stays empty.

use smithay_client_toolkit::seat::keyboard::Keysym;

/// A left-button press, in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseClick {
    pub x: f64,
    pub y: f64,
}

/// A pressed key, reduced to what a teaching program cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// A key that produces a character, including space.
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    Delete,
    Left,
    Right,
    Up,
    Down,
    /// Anything else, identified by its raw keysym value.
    Other(u32),
}

impl Key {
    pub(crate) fn from_keysym(keysym: Keysym) -> Key {
        if keysym == Keysym::Return || keysym == Keysym::KP_Enter {
            Key::Enter
        } else if keysym == Keysym::Escape {
            Key::Escape
        } else if keysym == Keysym::BackSpace {
            Key::Backspace
        } else if keysym == Keysym::Tab {
            Key::Tab
        } else if keysym == Keysym::Delete {
            Key::Delete
        } else if keysym == Keysym::Left {
            Key::Left
        } else if keysym == Keysym::Right {
            Key::Right
        } else if keysym == Keysym::Up {
            Key::Up
        } else if keysym == Keysym::Down {
            Key::Down
        } else {
            match keysym.key_char() {
                Some(c) => Key::Char(c),
                None => Key::Other(keysym.raw()),
            }
        }
    }
}

pub(crate) type MouseCallback = Box<dyn FnMut(f64, f64)>;
pub(crate) type KeyCallback = Box<dyn FnMut(Key)>;

/// Input state for one canvas: queues, callbacks and the pointer sample.
#[derive(Default)]
pub(crate) struct Input {
    clicks: Vec<MouseClick>,
    keys: Vec<Key>,
    on_mouse_pressed: Option<MouseCallback>,
    on_mouse_released: Option<MouseCallback>,
    on_key_pressed: Option<KeyCallback>,
    /// Set while `wait_for_click` spins; presses are swallowed instead of
    /// queued so the waited-for click is not seen twice.
    waiting_for_click: bool,
    /// Where the press landed, if one has arrived during this wait.
    wait_press: Option<MouseClick>,
    wait_done: Option<MouseClick>,
    pointer: (f64, f64),
    on_canvas: bool,
}

impl Input {
    pub(crate) fn record_press(&mut self, x: f64, y: f64) {
        let click = MouseClick { x, y };
        if self.waiting_for_click {
            self.wait_press = Some(click);
        } else if let Some(callback) = self.on_mouse_pressed.as_mut() {
            callback(x, y);
        } else {
            self.clicks.push(click);
        }
    }

    pub(crate) fn record_release(&mut self, x: f64, y: f64) {
        if self.waiting_for_click {
            // Any release ends the wait, even one whose press predates it.
            let press = self.wait_press.take();
            self.wait_done = Some(press.unwrap_or(MouseClick { x, y }));
        } else if let Some(callback) = self.on_mouse_released.as_mut() {
            callback(x, y);
        }
    }

    pub(crate) fn record_key(&mut self, key: Key) {
        if let Some(callback) = self.on_key_pressed.as_mut() {
            callback(key);
        } else {
            self.keys.push(key);
        }
    }

    pub(crate) fn take_clicks(&mut self) -> Vec<MouseClick> {
        std::mem::take(&mut self.clicks)
    }

    pub(crate) fn take_keys(&mut self) -> Vec<Key> {
        std::mem::take(&mut self.keys)
    }

    pub(crate) fn set_on_mouse_pressed(&mut self, callback: Option<MouseCallback>) {
        self.on_mouse_pressed = callback;
    }

    pub(crate) fn set_on_mouse_released(&mut self, callback: Option<MouseCallback>) {
        self.on_mouse_released = callback;
    }

    pub(crate) fn set_on_key_pressed(&mut self, callback: Option<KeyCallback>) {
        self.on_key_pressed = callback;
    }

    pub(crate) fn begin_wait(&mut self) {
        self.waiting_for_click = true;
        self.wait_press = None;
        self.wait_done = None;
    }

    /// The completed click, once a press and its release have both arrived.
    pub(crate) fn finish_wait(&mut self) -> Option<MouseClick> {
        let done = self.wait_done.take()?;
        self.waiting_for_click = false;
        self.wait_press = None;
        Some(done)
    }

    pub(crate) fn abort_wait(&mut self) {
        self.waiting_for_click = false;
        self.wait_press = None;
        self.wait_done = None;
    }

    pub(crate) fn pointer_entered(&mut self, x: f64, y: f64) {
        self.on_canvas = true;
        self.pointer = (x, y);
    }

    pub(crate) fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer = (x, y);
    }

    pub(crate) fn pointer_left(&mut self) {
        self.on_canvas = false;
    }

    pub(crate) fn pointer(&self) -> (f64, f64) {
        self.pointer
    }

    pub(crate) fn pointer_on_canvas(&self) -> bool {
        self.on_canvas
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_clicks_queue_until_drained() {
        let mut input = Input::default();
        input.record_press(10.0, 20.0);
        input.record_press(30.0, 40.0);

        let first = input.take_clicks();
        assert_eq!(
            first,
            vec![MouseClick { x: 10.0, y: 20.0 }, MouseClick { x: 30.0, y: 40.0 }]
        );
        // Draining empties the queue; a second drain reports nothing new.
        assert!(input.take_clicks().is_empty());

        input.record_press(1.0, 2.0);
        assert_eq!(input.take_clicks(), vec![MouseClick { x: 1.0, y: 2.0 }]);
    }

    #[test]
    fn test_keys_queue_until_drained() {
        let mut input = Input::default();
        input.record_key(Key::Char('a'));
        input.record_key(Key::Enter);
        assert_eq!(input.take_keys(), vec![Key::Char('a'), Key::Enter]);
        assert!(input.take_keys().is_empty());
    }

    #[test]
    fn test_callback_replaces_press_queue() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut input = Input::default();
        input.set_on_mouse_pressed(Some(Box::new(move |x, y| {
            sink.borrow_mut().push((x, y));
        })));

        input.record_press(5.0, 6.0);
        input.record_press(7.0, 8.0);

        assert_eq!(*seen.borrow(), vec![(5.0, 6.0), (7.0, 8.0)]);
        assert!(input.take_clicks().is_empty());
    }

    #[test]
    fn test_clearing_a_callback_restores_the_queue() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut input = Input::default();
        input.set_on_mouse_pressed(Some(Box::new(move |x, y| {
            sink.borrow_mut().push((x, y));
        })));
        input.record_press(1.0, 2.0);

        input.set_on_mouse_pressed(None);
        input.record_press(3.0, 4.0);

        // The first press went to the callback, the second queued.
        assert_eq!(*seen.borrow(), vec![(1.0, 2.0)]);
        assert_eq!(input.take_clicks(), vec![MouseClick { x: 3.0, y: 4.0 }]);
    }

    #[test]
    fn test_key_callback_replaces_key_queue() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut input = Input::default();
        input.set_on_key_pressed(Some(Box::new(move |key| {
            sink.borrow_mut().push(key);
        })));

        input.record_key(Key::Char('q'));
        assert_eq!(*seen.borrow(), vec![Key::Char('q')]);
        assert!(input.take_keys().is_empty());
    }

    #[test]
    fn test_wait_completes_on_release_not_press() {
        let mut input = Input::default();
        input.begin_wait();

        input.record_press(12.0, 34.0);
        assert_eq!(input.finish_wait(), None);

        input.record_release(13.0, 35.0);
        // The click reported is where the press landed.
        assert_eq!(input.finish_wait(), Some(MouseClick { x: 12.0, y: 34.0 }));
    }

    #[test]
    fn test_wait_completes_even_when_the_press_predates_it() {
        let mut input = Input::default();
        input.record_press(1.0, 1.0);
        input.begin_wait();
        input.record_release(2.0, 2.0);
        assert_eq!(input.finish_wait(), Some(MouseClick { x: 2.0, y: 2.0 }));
        // The pre-wait press stays in the queue.
        assert_eq!(input.take_clicks(), vec![MouseClick { x: 1.0, y: 1.0 }]);
    }

    #[test]
    fn test_waited_click_is_not_queued() {
        let mut input = Input::default();
        input.begin_wait();
        input.record_press(3.0, 4.0);
        input.record_release(3.0, 4.0);
        assert!(input.finish_wait().is_some());
        assert!(input.take_clicks().is_empty());
    }

    #[test]
    fn test_keys_still_queue_while_waiting_for_click() {
        let mut input = Input::default();
        input.begin_wait();
        input.record_key(Key::Char('x'));
        assert_eq!(input.take_keys(), vec![Key::Char('x')]);
    }

    #[test]
    fn test_pointer_sample_tracks_entry_and_exit() {
        let mut input = Input::default();
        assert!(!input.pointer_on_canvas());

        input.pointer_entered(50.0, 60.0);
        input.pointer_moved(55.0, 65.0);
        assert!(input.pointer_on_canvas());
        assert_eq!(input.pointer(), (55.0, 65.0));

        input.pointer_left();
        assert!(!input.pointer_on_canvas());
        // The last sample stays readable after the pointer leaves.
        assert_eq!(input.pointer(), (55.0, 65.0));
    }
}
