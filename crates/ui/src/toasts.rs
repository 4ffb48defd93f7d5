use std::time::Duration;

use dioxus::prelude::*;

use services::{Notification, Notifier};

/// How long a toast stays up unless dismissed first.
const TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
}

/// Signal-backed toast queue, provided once at the app root.
#[derive(Clone, Copy, PartialEq)]
pub struct Toasts {
    entries: Signal<Vec<Toast>>,
    next_id: Signal<u64>,
}

impl Toasts {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Signal::new(Vec::new()),
            next_id: Signal::new(0),
        }
    }

    #[must_use]
    pub fn entries(&self) -> Vec<Toast> {
        self.entries.read().clone()
    }

    pub fn push(&self, notification: Notification) -> u64 {
        let mut next_id = self.next_id;
        let id = *next_id.peek();
        next_id.set(id + 1);

        let mut entries = self.entries;
        entries.write().push(Toast { id, notification });
        id
    }

    pub fn dismiss(&self, id: u64) {
        let mut entries = self.entries;
        entries.write().retain(|toast| toast.id != id);
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for Toasts {
    fn notify(&self, notification: Notification) {
        let id = self.push(notification);
        let toasts = *self;
        spawn(async move {
            tokio::time::sleep(TOAST_TTL).await;
            toasts.dismiss(id);
        });
    }
}

#[component]
pub fn ToastRegion() -> Element {
    let toasts = use_context::<Toasts>();
    let entries = toasts.entries();

    rsx! {
        div { class: "toasts", role: "status",
            for toast in entries {
                div {
                    key: "{toast.id}",
                    class: "toast toast--{toast.notification.severity.as_str()}",
                    div { class: "toast-body",
                        strong { class: "toast-title", "{toast.notification.title}" }
                        p { class: "toast-description", "{toast.notification.description}" }
                    }
                    button {
                        class: "toast-dismiss",
                        r#type: "button",
                        aria_label: "Dismiss",
                        onclick: move |_| toasts.dismiss(toast.id),
                        "×"
                    }
                }
            }
        }
    }
}
