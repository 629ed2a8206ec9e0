//! Notifications raised toward the UI layer.
//!
//! The viewer owns a [`Notifier`] with one channel per [`Notification`] kind.
//! Each channel holds any number of listeners, called in registration order.
//! The core never reacts to its own notifications.

use std::fmt;

use crate::model::Annotation;

/// Kinds of notification the viewer raises, each carrying an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    AnnotationMouseover,
    AnnotationMouseout,
    AnnotationClick,
    AnnotationAdded,
    AnnotationRemoved,
}

impl Notification {
    pub const ALL: [Notification; 5] = [
        Notification::AnnotationMouseover,
        Notification::AnnotationMouseout,
        Notification::AnnotationClick,
        Notification::AnnotationAdded,
        Notification::AnnotationRemoved,
    ];

    /// Channel name as exposed to listeners.
    pub fn name(self) -> &'static str {
        match self {
            Notification::AnnotationMouseover => "annotationMouseover",
            Notification::AnnotationMouseout => "annotationMouseout",
            Notification::AnnotationClick => "annotationClick",
            Notification::AnnotationAdded => "annotationAdded",
            Notification::AnnotationRemoved => "annotationRemoved",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A registered callback.
pub type Listener = Box<dyn FnMut(Notification, &Annotation)>;

/// Named channels with one or more listeners each.
#[derive(Default)]
pub struct Notifier {
    channels: [Vec<Listener>; 5],
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` on the `kind` channel.
    pub fn on<F>(&mut self, kind: Notification, listener: F)
    where
        F: FnMut(Notification, &Annotation) + 'static,
    {
        self.channels[kind.index()].push(Box::new(listener));
    }

    /// Calls every listener of `kind` with `annotation`.
    pub fn emit(&mut self, kind: Notification, annotation: &Annotation) {
        for listener in &mut self.channels[kind.index()] {
            listener(kind, annotation);
        }
    }

    /// Number of listeners on the `kind` channel.
    pub fn listener_count(&self, kind: Notification) -> usize {
        self.channels[kind.index()].len()
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for kind in Notification::ALL {
            map.entry(&kind.name(), &self.listener_count(kind));
        }
        map.finish()
    }
}
