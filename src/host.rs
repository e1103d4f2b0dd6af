//! Embedded browsing host contracts.
//!
//! The session never renders anything itself. A [`BrowsingHost`] opens a view configured by
//! [`ViewOptions`], the session navigates it to the provider's login page exactly once, and the
//! host reports the provider's redirect through the [`RedirectObserver`] it received in
//! [`BrowsingHost::open`]. The session closes the view on every exit path.

pub mod observer;

pub use observer::*;

// self
use crate::{_prelude::*, error::HostError};

/// Boxed future returned by [`BrowsingView::navigate`].
pub type HostFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, HostError>> + 'a + Send>>;

/// Creates embedded views for authentication attempts.
pub trait BrowsingHost: Send + Sync {
	/// Opens a view and wires `observer` to its "before redirect" notification.
	///
	/// The host should forward redirect targets with [`RedirectObserver::fire`]; only the first
	/// notification is consumed.
	fn open(
		&self,
		options: &ViewOptions,
		observer: RedirectObserver,
	) -> Result<Box<dyn BrowsingView>, HostError>;
}

/// One embedded view owned by a session for the duration of an attempt.
pub trait BrowsingView: Send + Sync {
	/// Loads `url` and shows the view.
	fn navigate<'a>(&'a self, url: &'a Url) -> HostFuture<'a, ()>;

	/// Closes the view. Called at most once per view.
	fn close(&self);
}

/// Presentation settings for the authentication view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
	/// Width in logical pixels.
	pub width: u32,
	/// Height in logical pixels.
	pub height: u32,
	/// Keep the view above other windows.
	pub always_on_top: bool,
	/// Hide the menu bar unless the user asks for it.
	pub auto_hide_menu_bar: bool,
	/// Let scripts inside the view reach host APIs.
	pub host_api_access: bool,
}
impl ViewOptions {
	/// Overrides the view size.
	pub fn with_size(mut self, width: u32, height: u32) -> Self {
		self.width = width;
		self.height = height;

		self
	}

	/// Overrides the always-on-top flag.
	pub fn with_always_on_top(mut self, always_on_top: bool) -> Self {
		self.always_on_top = always_on_top;

		self
	}

	/// Overrides menu bar auto-hiding.
	pub fn with_auto_hide_menu_bar(mut self, auto_hide: bool) -> Self {
		self.auto_hide_menu_bar = auto_hide;

		self
	}

	/// Overrides host API access for scripts in the view.
	pub fn with_host_api_access(mut self, enabled: bool) -> Self {
		self.host_api_access = enabled;

		self
	}
}
impl Default for ViewOptions {
	fn default() -> Self {
		Self {
			width: 800,
			height: 600,
			always_on_top: true,
			auto_hide_menu_bar: true,
			host_api_access: false,
		}
	}
}

/// Owns an open view and closes it exactly once, on drop at the latest.
pub(crate) struct ViewGuard(Option<Box<dyn BrowsingView>>);
impl ViewGuard {
	pub(crate) fn new(view: Box<dyn BrowsingView>) -> Self {
		Self(Some(view))
	}

	pub(crate) async fn navigate(&self, url: &Url) -> Result<(), HostError> {
		match self.0.as_deref() {
			Some(view) => view.navigate(url).await,
			None => Ok(()),
		}
	}

	/// Gives the view up without closing it; the host already tore it down.
	pub(crate) fn release(&mut self) {
		self.0.take();
	}

	pub(crate) fn close(&mut self) {
		if let Some(view) = self.0.take() {
			view.close();
		}
	}
}
impl Drop for ViewGuard {
	fn drop(&mut self) {
		self.close();
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;

	struct CountingView(Arc<AtomicUsize>);
	impl BrowsingView for CountingView {
		fn navigate<'a>(&'a self, _url: &'a Url) -> HostFuture<'a, ()> {
			Box::pin(async { Ok(()) })
		}

		fn close(&self) {
			self.0.fetch_add(1, Ordering::SeqCst);
		}
	}

	#[test]
	fn defaults_match_the_auth_window() {
		let options = ViewOptions::default();

		assert_eq!((options.width, options.height), (800, 600));
		assert!(options.always_on_top);
		assert!(options.auto_hide_menu_bar);
		assert!(!options.host_api_access);
	}

	#[test]
	fn partial_options_fill_in_defaults() {
		let options: ViewOptions = serde_json::from_str("{\"width\":1024,\"always_on_top\":false}")
			.expect("Partial view options should deserialize.");

		assert_eq!(options, ViewOptions::default().with_size(1024, 600).with_always_on_top(false));
	}

	#[test]
	fn guard_closes_once() {
		let closes = Arc::new(AtomicUsize::new(0));
		let mut guard = ViewGuard::new(Box::new(CountingView(closes.clone())));

		guard.close();
		guard.close();
		drop(guard);

		assert_eq!(closes.load(Ordering::SeqCst), 1);

		let dropped = ViewGuard::new(Box::new(CountingView(closes.clone())));

		drop(dropped);

		assert_eq!(closes.load(Ordering::SeqCst), 2);

		let mut released = ViewGuard::new(Box::new(CountingView(closes.clone())));

		released.release();
		drop(released);

		assert_eq!(closes.load(Ordering::SeqCst), 2);
	}
}
