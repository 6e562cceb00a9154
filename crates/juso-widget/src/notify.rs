//! Transient, self-dismissing user notices.

use crate::view::ViewHandle;
use juso_core::{Notice, NoticeKind};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// How long a notice stays visible before it removes itself.
pub(crate) const NOTICE_LIFETIME: Duration = Duration::from_secs(3);

/// Publishes transient notices into view state and expires them.
///
/// Concurrent notices stack as independent entries; each one carries its
/// own expiry task and removes exactly itself.
#[derive(Clone)]
pub struct Notifier {
    view: ViewHandle,
    cancel: CancellationToken,
}

impl Notifier {
    /// Create a notifier publishing into the given view.
    ///
    /// Expiry tasks exit early when `cancel` fires (widget teardown).
    #[must_use]
    pub fn new(view: ViewHandle, cancel: CancellationToken) -> Self {
        Self { view, cancel }
    }

    /// Show a notice and schedule its removal.
    ///
    /// Returns the notice ID so tests and hosts can track it.
    pub fn show(&self, message: impl Into<String>, kind: NoticeKind) -> Uuid {
        let notice = Notice::new(kind, message);
        let id = notice.id;

        tracing::debug!(%id, %kind, "showing notice");
        self.view.update(|state| state.notices.push(notice));

        let view = self.view.clone();
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(NOTICE_LIFETIME) => {
                    view.update(|state| state.notices.retain(|notice| notice.id != id));
                }
            }
        });

        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_notice_expires_after_lifetime() {
        let view = ViewHandle::new();
        let notifier = Notifier::new(view.clone(), CancellationToken::new());

        notifier.show("주소가 입력되었습니다.", NoticeKind::Success);
        assert_eq!(view.snapshot().notices.len(), 1);

        // Just before the lifetime the notice is still visible
        tokio::time::sleep(NOTICE_LIFETIME - Duration::from_millis(10)).await;
        assert_eq!(view.snapshot().notices.len(), 1);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(view.snapshot().notices.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_notices_stack_independently() {
        let view = ViewHandle::new();
        let notifier = Notifier::new(view.clone(), CancellationToken::new());

        notifier.show("first", NoticeKind::Info);
        tokio::time::sleep(Duration::from_secs(1)).await;
        notifier.show("second", NoticeKind::Error);

        assert_eq!(view.snapshot().notices.len(), 2);

        // The first notice expires alone
        tokio::time::sleep(Duration::from_secs(2) + Duration::from_millis(10)).await;
        let notices = view.snapshot().notices;
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "second");

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(view.snapshot().notices.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_notifier_stops_expiring() {
        let view = ViewHandle::new();
        let cancel = CancellationToken::new();
        let notifier = Notifier::new(view.clone(), cancel.clone());

        notifier.show("stuck", NoticeKind::Info);
        cancel.cancel();

        tokio::time::sleep(NOTICE_LIFETIME * 2).await;
        // The expiry task exited without touching view state; teardown
        // clears notices separately.
        assert_eq!(view.snapshot().notices.len(), 1);
    }
}
