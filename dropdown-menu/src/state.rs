use crate::subscription::Subscription;

/// Listeners that exist only while the panel is open.
#[derive(Debug)]
pub struct OpenListeners {
    /// Key presses bubbling through the host.
    pub keyboard: Subscription,
    /// Every click in the document.
    pub outside_click: Subscription,
}

/// Disclosure state of the panel.
#[derive(Debug, Default)]
pub enum Disclosure {
    #[default]
    Closed,
    Open(OpenListeners),
}

impl Disclosure {
    pub fn is_open(&self) -> bool {
        matches!(self, Disclosure::Open(_))
    }
}
