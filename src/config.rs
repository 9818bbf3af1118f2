use core::fmt::{self, Debug, Formatter};
use std::rc::Rc;
use tracing::{trace, warn};

/// Hook run before an outgoing view is removed.
///
/// Both variants receive `(outgoing, incoming)`. `incoming` is [`None`] when the switcher is being [cleared](`crate::Switcher::clear`).
pub enum Hide<V: ?Sized> {
	/// The outgoing view is removed as soon as the hook returns.
	Sync(Rc<dyn Fn(&Rc<V>, Option<&Rc<V>>)>),
	/// The outgoing view is removed once the [`Completion`] is called.
	///
	/// In [sequential mode](`Config::wait_for_remove`), the incoming view isn't shown before then either.
	WithCompletion(Rc<dyn Fn(&Rc<V>, Option<&Rc<V>>, Completion)>),
}
impl<V: ?Sized> Clone for Hide<V> {
	fn clone(&self) -> Self {
		match self {
			Self::Sync(hook) => Self::Sync(Rc::clone(hook)),
			Self::WithCompletion(hook) => Self::WithCompletion(Rc::clone(hook)),
		}
	}
}
impl<V: ?Sized> Debug for Hide<V> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Sync(_) => "Hide::Sync(..)",
			Self::WithCompletion(_) => "Hide::WithCompletion(..)",
		})
	}
}

/// Hook run after an incoming view was rendered and inserted.
pub enum Show<V: ?Sized> {
	Sync(Rc<dyn Fn(&Rc<V>)>),
	/// The [`Completion`] is a convenience for the hook's own sequencing. The switcher doesn't wait for it.
	WithCompletion(Rc<dyn Fn(&Rc<V>, Completion)>),
}
impl<V: ?Sized> Clone for Show<V> {
	fn clone(&self) -> Self {
		match self {
			Self::Sync(hook) => Self::Sync(Rc::clone(hook)),
			Self::WithCompletion(hook) => Self::WithCompletion(Rc::clone(hook)),
		}
	}
}
impl<V: ?Sized> Debug for Show<V> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Sync(_) => "Show::Sync(..)",
			Self::WithCompletion(_) => "Show::WithCompletion(..)",
		})
	}
}

/// Construction-time options of a [`Switcher`](`crate::Switcher`).
///
/// This is a closed set: the switcher has no notion of other keys.
pub struct Config<V: ?Sized> {
	pub hide: Option<Hide<V>>,
	pub show: Option<Show<V>>,
	/// Called whenever the switcher enters the empty state, but not again while it stays empty.
	pub empty: Option<Rc<dyn Fn()>>,
	/// Insert shown views as the container's first child instead of its last.
	pub prepend: bool,
	/// Sequential mode: don't show the incoming view before the outgoing one's hide sequence has completed.
	///
	/// Only the latest request is honoured. Requests superseded while a hide is in flight are never shown.
	pub wait_for_remove: bool,
	/// Whether construction calls [`Switcher::render`](`crate::Switcher::render`). Defaults to `true`.
	pub auto_render: bool,
}
impl<V: ?Sized> Default for Config<V> {
	fn default() -> Self {
		Self {
			hide: None,
			show: None,
			empty: None,
			prepend: false,
			wait_for_remove: false,
			auto_render: true,
		}
	}
}
impl<V: ?Sized> Clone for Config<V> {
	fn clone(&self) -> Self {
		Self {
			hide: self.hide.clone(),
			show: self.show.clone(),
			empty: self.empty.clone(),
			prepend: self.prepend,
			wait_for_remove: self.wait_for_remove,
			auto_render: self.auto_render,
		}
	}
}
impl<V: ?Sized> Debug for Config<V> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Config")
			.field("hide", &self.hide)
			.field("show", &self.show)
			.field("empty", &self.empty.as_ref().map(|_| ".."))
			.field("prepend", &self.prepend)
			.field("wait_for_remove", &self.wait_for_remove)
			.field("auto_render", &self.auto_render)
			.finish()
	}
}
impl<V: ?Sized> Config<V> {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn hide(mut self, hook: impl 'static + Fn(&Rc<V>, Option<&Rc<V>>)) -> Self {
		self.hide = Some(Hide::Sync(Rc::new(hook)));
		self
	}

	#[must_use]
	pub fn hide_with_completion(mut self, hook: impl 'static + Fn(&Rc<V>, Option<&Rc<V>>, Completion)) -> Self {
		self.hide = Some(Hide::WithCompletion(Rc::new(hook)));
		self
	}

	#[must_use]
	pub fn show(mut self, hook: impl 'static + Fn(&Rc<V>)) -> Self {
		self.show = Some(Show::Sync(Rc::new(hook)));
		self
	}

	#[must_use]
	pub fn show_with_completion(mut self, hook: impl 'static + Fn(&Rc<V>, Completion)) -> Self {
		self.show = Some(Show::WithCompletion(Rc::new(hook)));
		self
	}

	#[must_use]
	pub fn empty(mut self, hook: impl 'static + Fn()) -> Self {
		self.empty = Some(Rc::new(hook));
		self
	}

	#[must_use]
	pub fn prepend(mut self, prepend: bool) -> Self {
		self.prepend = prepend;
		self
	}

	#[must_use]
	pub fn wait_for_remove(mut self, wait_for_remove: bool) -> Self {
		self.wait_for_remove = wait_for_remove;
		self
	}

	#[must_use]
	pub fn auto_render(mut self, auto_render: bool) -> Self {
		self.auto_render = auto_render;
		self
	}
}

/// One-shot continuation handed to [`Hide::WithCompletion`] and [`Show::WithCompletion`] hooks.
///
/// It may be stored and called at any later point. If it is dropped without being called instead,
/// the corresponding transition never finishes.
#[must_use = "A transition stalls until its `Completion` is called."]
pub struct Completion {
	what: &'static str,
	awaited: bool,
	continuation: Option<Box<dyn FnOnce()>>,
}
impl Completion {
	pub(crate) fn awaited(what: &'static str, continuation: impl 'static + FnOnce()) -> Self {
		Self {
			what,
			awaited: true,
			continuation: Some(Box::new(continuation)),
		}
	}

	pub(crate) fn convenience(what: &'static str) -> Self {
		Self {
			what,
			awaited: false,
			continuation: Some(Box::new(|| ())),
		}
	}

	pub fn complete(mut self) {
		trace!(what = self.what, "Completion called.");
		if let Some(continuation) = self.continuation.take() {
			continuation();
		}
	}
}
impl Drop for Completion {
	fn drop(&mut self) {
		if self.awaited && self.continuation.is_some() {
			warn!(what = self.what, "`Completion` dropped without being called. The transition will not finish.");
		}
	}
}
impl Debug for Completion {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Completion").field("what", &self.what).field("pending", &self.continuation.is_some()).finish()
	}
}
