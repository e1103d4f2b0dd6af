//! Steam sign-in for desktop apps: capture the OpenID 2.0 redirect, parse the signed assertion,
//! and resolve the player's profile behind one async session.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod host;
pub mod http;
pub mod obs;
pub mod openid;
pub mod profile;
pub mod provider;
pub mod session;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// crates.io
	use tokio::sync::Notify;
	// self
	use crate::{
		auth::ApiKey,
		error::HostError,
		host::{BrowsingHost, BrowsingView, HostFuture, RedirectObserver, ViewOptions},
		http::ReqwestHttpClient,
		openid::{RelyingParty, StatelessRelyingParty},
		provider::ProviderDescriptor,
		session::AuthenticationSession,
	};

	/// Session type alias used by reqwest-backed integration tests.
	pub type ReqwestTestSession = AuthenticationSession<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs an [`AuthenticationSession`] wired to a [`RecordingHost`], the built-in
	/// stateless relying party, and the reqwest transport used across integration tests.
	pub fn build_reqwest_test_session(
		descriptor: ProviderDescriptor,
		api_key: &str,
	) -> (ReqwestTestSession, RecordingHost) {
		let relying_party: Arc<dyn RelyingParty> =
			Arc::new(StatelessRelyingParty::from_descriptor(&descriptor));
		let host = RecordingHost::default();
		let session = AuthenticationSession::with_http_client(
			ApiKey::new(api_key),
			descriptor,
			relying_party,
			Arc::new(host.clone()),
			test_reqwest_http_client(),
		);

		(session, host)
	}

	/// Everything a [`RecordingHost`] observed so far.
	#[derive(Clone, Debug, Default)]
	pub struct HostJournal {
		/// View options passed to every `open` call.
		pub opened: Vec<ViewOptions>,
		/// URLs passed to `navigate`, in order.
		pub navigations: Vec<Url>,
		/// Number of `close` calls across all views.
		pub closes: usize,
	}

	/// In-process browsing host that records calls and lets tests deliver redirects by hand.
	#[derive(Clone, Debug, Default)]
	pub struct RecordingHost {
		journal: Arc<Mutex<HostJournal>>,
		observer: Arc<Mutex<Option<RedirectObserver>>>,
		fail_navigation: Arc<Mutex<bool>>,
		navigated: Arc<Notify>,
	}
	impl RecordingHost {
		/// Returns a snapshot of the recorded calls.
		pub fn journal(&self) -> HostJournal {
			self.journal.lock().clone()
		}

		/// Returns the observer handed over by the most recent `open` call.
		pub fn observer(&self) -> Option<RedirectObserver> {
			self.observer.lock().clone()
		}

		/// Makes every subsequent `navigate` call fail.
		pub fn fail_navigation(&self) {
			*self.fail_navigation.lock() = true;
		}

		/// Drops the stored observer, mimicking a host that tore its view down.
		pub fn forget_observer(&self) {
			self.observer.lock().take();
		}

		/// Waits until a view was navigated at least once.
		pub async fn navigated(&self) {
			while self.journal().navigations.is_empty() {
				self.navigated.notified().await;
			}
		}

		/// Waits until the session navigated the view, then fires `redirect_url` on its observer.
		pub async fn redirect_when_ready(&self, redirect_url: &str) -> bool {
			self.navigated().await;

			self.observer().is_some_and(|observer| observer.fire(redirect_url))
		}
	}
	impl BrowsingHost for RecordingHost {
		fn open(
			&self,
			options: &ViewOptions,
			observer: RedirectObserver,
		) -> Result<Box<dyn BrowsingView>, HostError> {
			self.journal.lock().opened.push(options.clone());
			*self.observer.lock() = Some(observer);

			Ok(Box::new(RecordingView {
				journal: self.journal.clone(),
				fail_navigation: *self.fail_navigation.lock(),
				navigated: self.navigated.clone(),
			}))
		}
	}

	struct RecordingView {
		journal: Arc<Mutex<HostJournal>>,
		fail_navigation: bool,
		navigated: Arc<Notify>,
	}
	impl BrowsingView for RecordingView {
		fn navigate<'a>(&'a self, url: &'a Url) -> HostFuture<'a, ()> {
			Box::pin(async move {
				if self.fail_navigation {
					return Err(HostError::Navigation {
						url: url.to_string(),
						message: "navigation disabled by the test host".into(),
					});
				}

				self.journal.lock().navigations.push(url.clone());
				self.navigated.notify_one();

				Ok(())
			})
		}

		fn close(&self) {
			self.journal.lock().closes += 1;
		}
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
