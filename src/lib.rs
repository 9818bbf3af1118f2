#![doc(html_root_url = "https://docs.rs/view-switcher/0.0.1")]
#![warn(clippy::pedantic)]

//! Swaps the [`View`] shown inside a container element, running hide and show hooks in order.
//!
//! See [`Switcher`] for the transition rules and [`dom`] for the [`web_sys`] bindings.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

mod config;
pub mod dom;
mod switcher;
mod view;

pub use config::{Completion, Config, Hide, Show};
pub use switcher::{Switcher, SwitcherBuilder};
pub use view::{Container, RemovalListener, RemovalListeners, RenderOptions, SubscriptionId, View};
