//! One-shot redirect subscription: armed by the session, fired once by the host.

// crates.io
use tokio::sync::oneshot;
// self
use crate::_prelude::*;

/// Host-side handle that delivers the provider redirect to the session.
///
/// Cloning shares the same subscription. The first [`fire`](Self::fire) consumes it; later calls
/// are ignored. Once every clone is dropped without firing, the waiting session fails with
/// [`Error::RedirectAbandoned`].
#[derive(Clone, Debug)]
pub struct RedirectObserver(Arc<Mutex<Option<oneshot::Sender<String>>>>);
impl RedirectObserver {
	/// Arms a new observer and returns it with the session-side subscription.
	pub fn arm() -> (Self, RedirectSubscription) {
		let (tx, rx) = oneshot::channel();

		(Self(Arc::new(Mutex::new(Some(tx)))), RedirectSubscription(rx))
	}

	/// Delivers the redirect target, returning whether this call consumed the subscription.
	pub fn fire(&self, redirect_url: impl Into<String>) -> bool {
		let Some(tx) = self.0.lock().take() else {
			return false;
		};

		tx.send(redirect_url.into()).is_ok()
	}

	/// Whether the observer still waits for its redirect.
	pub fn is_armed(&self) -> bool {
		self.0.lock().as_ref().is_some_and(|tx| !tx.is_closed())
	}
}

/// Session-side end of a [`RedirectObserver`].
#[derive(Debug)]
pub struct RedirectSubscription(oneshot::Receiver<String>);
impl RedirectSubscription {
	/// Waits for the redirect target. There is no timeout.
	pub async fn redirected(self) -> Result<String> {
		self.0.await.map_err(|_| Error::RedirectAbandoned)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn only_the_first_redirect_is_consumed() {
		let (observer, subscription) = RedirectObserver::arm();
		let host_copy = observer.clone();

		assert!(observer.is_armed());
		assert!(host_copy.fire("http://localhost/?first"));
		assert!(!observer.fire("http://localhost/?second"));
		assert!(!observer.is_armed());

		let target = subscription.redirected().await.expect("First redirect should arrive.");

		assert_eq!(target, "http://localhost/?first");
	}

	#[tokio::test]
	async fn dropping_every_observer_abandons_the_wait() {
		let (observer, subscription) = RedirectObserver::arm();

		drop(observer);

		let err = subscription.redirected().await.expect_err("Abandoned wait should fail.");

		assert!(matches!(err, Error::RedirectAbandoned));
	}

	#[test]
	fn firing_after_the_session_left_reports_failure() {
		let (observer, subscription) = RedirectObserver::arm();

		drop(subscription);

		assert!(!observer.is_armed());
		assert!(!observer.fire("http://localhost/"));
	}
}
