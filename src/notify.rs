use tokio::sync::mpsc;

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient, user-visible message (toast/snackbar material). Every
/// recoverable failure in the core ends up here rather than in a panic or a
/// swallowed error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Sending half of the notice stream. Cheap to clone and hand to every
/// coordinator/flow; if the consuming side is gone the send is dropped
/// silently, same as messaging a disconnected chat client.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl Notifier {
    pub fn channel() -> (Notifier, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Notifier { tx }, rx)
    }

    /// A notifier with no listener, for contexts (tests, the snapshot
    /// binary) that do not render notices.
    pub fn disconnected() -> Notifier {
        let (tx, _rx) = mpsc::unbounded_channel();
        Notifier { tx }
    }

    pub fn notify(&self, level: NoticeLevel, message: impl Into<String>) {
        let _ = self.tx.send(Notice {
            level,
            message: message.into(),
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(NoticeLevel::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.notify(NoticeLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(NoticeLevel::Error, message);
    }
}
