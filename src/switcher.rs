use crate::{
	config::{Completion, Config, Hide, Show},
	view::{Container, RenderOptions, SubscriptionId, View},
};
use core::{
	cell::RefCell,
	fmt::{self, Debug, Formatter},
};
use std::rc::{Rc, Weak};
use tracing::{debug, instrument, trace};

/// Stamp of one [`Switcher::set`], [`Switcher::clear`] or [`Switcher::remove`] call.
///
/// Deferred work only proceeds while its stamp is still the latest one issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Transition(u64);
impl Transition {
	fn next(self) -> Self {
		Self(self.0 + 1)
	}
}

fn same_view<V: ?Sized>(a: &Rc<V>, b: &Rc<V>) -> bool {
	view_address(a) == view_address(b)
}

fn view_address<V: ?Sized>(view: &Rc<V>) -> *const () {
	Rc::as_ptr(view).cast()
}

struct State<C, V: ?Sized> {
	el: Option<Rc<C>>,
	config: Config<V>,
	current: Option<Rc<V>>,
	/// Removal subscription on `current`.
	subscription: Option<SubscriptionId>,
	/// The most recently displaced view, until its hide sequence completes.
	previous: Option<Rc<V>>,
	/// Requested in sequential mode while the outgoing view is still being hidden.
	pending: Option<Rc<V>>,
	/// Transition that started the sequential hide which is still in flight.
	///
	/// While set, `current` is [`None`] and further requests only replace `pending`.
	hiding: Option<Transition>,
	latest: Transition,
	/// Whether the switcher is in the empty state, which `empty` was notified about.
	empty: bool,
	rendered: bool,
}
impl<C, V: ?Sized> State<C, V> {
	fn issue_transition(&mut self) -> Transition {
		self.latest = self.latest.next();
		self.latest
	}

	/// Marks the switcher as empty, returning the hook to call if this is a change.
	#[must_use]
	fn enter_empty(&mut self) -> Option<Rc<dyn Fn()>> {
		if self.empty {
			None
		} else {
			self.empty = true;
			self.config.empty.clone()
		}
	}
}

/// Swaps the view displayed inside a container element.
///
/// All state lives behind a single-threaded shared cell. Hooks and views are always called without any borrow held,
/// so they may call back into the switcher. [`Completion`]s and removal listeners only hold a weak reference
/// and do nothing once the switcher was dropped.
pub struct Switcher<C, V: ?Sized> {
	state: Rc<RefCell<State<C, V>>>,
}
impl<C, V: ?Sized> Debug for Switcher<C, V> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let state = self.state.borrow();
		f.debug_struct("Switcher")
			.field("has_container", &state.el.is_some())
			.field("config", &state.config)
			.field("has_current", &state.current.is_some())
			.field("has_previous", &state.previous.is_some())
			.field("has_pending", &state.pending.is_some())
			.field("hiding", &state.hiding)
			.field("latest", &state.latest)
			.field("rendered", &state.rendered)
			.finish()
	}
}

/// Collects the construction options of a [`Switcher`] that has an initial view.
pub struct SwitcherBuilder<C, V: ?Sized> {
	el: Option<C>,
	view: Option<Rc<V>>,
	config: Config<V>,
}
impl<C, V: ?Sized> Default for SwitcherBuilder<C, V> {
	fn default() -> Self {
		Self {
			el: None,
			view: None,
			config: Config::default(),
		}
	}
}
impl<C, V> SwitcherBuilder<C, V>
where
	C: 'static + Container,
	V: 'static + ?Sized + View<C>,
{
	#[must_use]
	pub fn el(mut self, el: C) -> Self {
		self.el = Some(el);
		self
	}

	/// The view to start out with. It becomes current immediately and is rendered along with the switcher.
	#[must_use]
	pub fn view(mut self, view: Rc<V>) -> Self {
		self.view = Some(view);
		self
	}

	#[must_use]
	pub fn config(mut self, config: Config<V>) -> Self {
		self.config = config;
		self
	}

	#[must_use]
	pub fn build(self) -> Switcher<C, V> {
		Switcher::construct(self.el, self.view, self.config)
	}
}

impl<C, V> Switcher<C, V>
where
	C: 'static + Container,
	V: 'static + ?Sized + View<C>,
{
	/// Creates an empty switcher, which notifies [`Config::empty`] right away.
	///
	/// Without a container, views are still rendered and shown but never inserted anywhere.
	#[must_use]
	pub fn new(el: impl Into<Option<C>>, config: Config<V>) -> Self {
		Self::construct(el.into(), None, config)
	}

	#[must_use]
	pub fn builder() -> SwitcherBuilder<C, V> {
		SwitcherBuilder::default()
	}

	#[instrument(skip_all)]
	fn construct(el: Option<C>, view: Option<Rc<V>>, config: Config<V>) -> Self {
		let auto_render = config.auto_render;
		let this = Self {
			state: Rc::new(RefCell::new(State {
				el: el.map(Rc::new),
				config,
				current: None,
				subscription: None,
				previous: None,
				pending: None,
				hiding: None,
				latest: Transition(0),
				empty: false,
				rendered: false,
			})),
		};

		match view {
			Some(view) => {
				this.state.borrow_mut().current = Some(Rc::clone(&view));
				this.subscribe(&view);
			}
			None => this.notify_empty(),
		}

		if auto_render {
			this.render();
		}
		this
	}

	fn from_state(state: Rc<RefCell<State<C, V>>>) -> Self {
		Self { state }
	}

	fn upgrade(state: &Weak<RefCell<State<C, V>>>) -> Option<Self> {
		let state = state.upgrade().map(Self::from_state);
		if state.is_none() {
			trace!("Switcher was dropped in the meantime.");
		}
		state
	}

	/// Requests a transition to `view`.
	///
	/// Does nothing if `view` is already the latest requested view.
	/// Otherwise the current view is hidden and `view` is shown, either right away
	/// or, in [sequential mode](`Config::wait_for_remove`), once the hide sequence completed.
	///
	/// In sequential mode, requests made while a hide is still in flight only replace the pending view.
	/// Whichever view was requested last is shown once that hide completes, even if it is the one being hidden.
	#[instrument(skip_all)]
	pub fn set(&self, view: Rc<V>) {
		let (stamp, outgoing, subscription, wait_for_remove) = {
			let mut state = self.state.borrow_mut();
			let target = state.pending.as_ref().or_else(|| state.current.as_ref());
			if target.map_or(false, |target| same_view(target, &view)) {
				debug!("View is already current. Ignoring.");
				return;
			}

			let stamp = state.issue_transition();
			let wait_for_remove = state.config.wait_for_remove;
			if wait_for_remove {
				state.pending = Some(Rc::clone(&view));
				if let Some(hiding) = state.hiding {
					debug!(transition = stamp.0, hiding = hiding.0, "Hide in flight. Replaced pending view.");
					return;
				}
				state.hiding = Some(stamp);
			}

			let outgoing = state.current.take();
			let subscription = state.subscription.take();
			if outgoing.is_some() {
				state.previous = outgoing.clone();
			}
			(stamp, outgoing, subscription, wait_for_remove)
		};
		debug!(transition = stamp.0, has_outgoing = outgoing.is_some(), wait_for_remove, "Switching view.");

		if let (Some(outgoing), Some(subscription)) = (&outgoing, subscription) {
			outgoing.unsubscribe_removed(subscription);
		}

		if wait_for_remove {
			let state = Rc::downgrade(&self.state);
			self.hide(
				outgoing,
				Some(&view),
				Some(Box::new(move || {
					if let Some(this) = Self::upgrade(&state) {
						this.show_pending(stamp)
					}
				})),
			);
		} else {
			self.hide(outgoing, Some(&view), None);
			self.show_if_latest(stamp, view);
		}
	}

	/// Hides the current view without replacement.
	///
	/// [`Config::empty`] is notified as soon as the view slot is vacated, unless the switcher already was empty.
	/// A pending view of an unfinished sequential transition is discarded.
	pub fn clear(&self) {
		self.clear_and_then(None)
	}

	/// Like [`Switcher::clear`], calling `callback` once the hide sequence completed.
	///
	/// If there is no view to hide, `callback` runs right away.
	pub fn clear_with(&self, callback: impl 'static + FnOnce()) {
		self.clear_and_then(Some(Box::new(callback)))
	}

	#[instrument(skip_all)]
	fn clear_and_then(&self, callback: Option<Box<dyn FnOnce()>>) {
		let (outgoing, subscription, empty) = {
			let mut state = self.state.borrow_mut();
			let stamp = state.issue_transition();
			if state.pending.take().is_some() {
				debug!(transition = stamp.0, "Discarded pending view.");
			}
			let outgoing = state.current.take();
			let subscription = state.subscription.take();
			if outgoing.is_some() {
				state.previous = outgoing.clone();
			}
			(outgoing, subscription, state.enter_empty())
		};
		debug!(has_outgoing = outgoing.is_some(), "Clearing.");

		if let (Some(outgoing), Some(subscription)) = (&outgoing, subscription) {
			outgoing.unsubscribe_removed(subscription);
		}
		if let Some(empty) = empty {
			empty()
		}
		self.hide(outgoing, None, callback);
	}

	/// Renders and inserts the current view if that didn't happen yet.
	///
	/// Only the first call has any effect, whether or not there was a view at that point.
	#[instrument(skip_all)]
	pub fn render(&self) {
		let (view, el, prepend) = {
			let mut state = self.state.borrow_mut();
			if state.rendered {
				trace!("Already rendered.");
				return;
			}
			state.rendered = true;
			(state.current.clone(), state.el.clone(), state.config.prepend)
		};

		if let Some(view) = view {
			Self::render_view(&view, el.as_deref(), prepend);
		}
	}

	/// Tears down the current and previous view and detaches the container from its parent.
	///
	/// Outstanding sequential transitions are abandoned.
	#[instrument(skip_all)]
	pub fn remove(&self) {
		let (current, subscription, previous, el) = {
			let mut state = self.state.borrow_mut();
			state.issue_transition();
			state.pending = None;
			state.hiding = None;
			state.empty = true;
			(state.current.take(), state.subscription.take(), state.previous.take(), state.el.clone())
		};
		debug!(has_current = current.is_some(), has_previous = previous.is_some(), "Removing switcher.");

		if let Some(current) = &current {
			if let Some(subscription) = subscription {
				current.unsubscribe_removed(subscription);
			}
			current.remove();
		}
		if let Some(previous) = previous {
			if !current.as_ref().map_or(false, |current| same_view(current, &previous)) {
				previous.remove();
			}
		}
		if let Some(el) = el {
			el.detach();
		}
	}

	#[must_use]
	pub fn current(&self) -> Option<Rc<V>> {
		self.state.borrow().current.clone()
	}

	/// The most recently displaced view, while its hide sequence hasn't completed yet.
	#[must_use]
	pub fn previous(&self) -> Option<Rc<V>> {
		self.state.borrow().previous.clone()
	}

	/// The view a sequential transition will show once the outgoing view is hidden.
	#[must_use]
	pub fn pending(&self) -> Option<Rc<V>> {
		self.state.borrow().pending.clone()
	}

	/// Whether the switcher is in the empty state: it was cleared, never showed a view, or its view removed itself.
	///
	/// A sequential transition that is waiting for a hide to complete doesn't count as empty.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		let state = self.state.borrow();
		state.empty && state.pending.is_none()
	}

	#[must_use]
	pub fn is_rendered(&self) -> bool {
		self.state.borrow().rendered
	}

	#[must_use]
	pub fn container(&self) -> Option<Rc<C>> {
		self.state.borrow().el.clone()
	}

	#[must_use]
	pub fn config(&self) -> Config<V> {
		self.state.borrow().config.clone()
	}

	fn show_if_latest(&self, stamp: Transition, view: Rc<V>) {
		{
			let mut state = self.state.borrow_mut();
			if state.latest != stamp {
				debug!(transition = stamp.0, latest = state.latest.0, "Superseded. Not showing.");
				return;
			}
			state.pending = None;
		}
		self.show(view);
	}

	fn show_pending(&self, hide: Transition) {
		let view = {
			let mut state = self.state.borrow_mut();
			if state.hiding != Some(hide) {
				debug!(transition = hide.0, "Hide completed after teardown. Not showing.");
				return;
			}
			state.hiding = None;
			state.pending.take()
		};
		match view {
			Some(view) => self.show(view),
			None => trace!("Pending view was cleared."),
		}
	}

	fn show(&self, view: Rc<V>) {
		let (el, prepend, hook) = {
			let mut state = self.state.borrow_mut();
			state.current = Some(Rc::clone(&view));
			state.empty = false;
			(state.el.clone(), state.config.prepend, state.config.show.clone())
		};
		trace!("Showing view.");

		self.subscribe(&view);
		Self::render_view(&view, el.as_deref(), prepend);

		match hook {
			Some(Show::Sync(hook)) => hook(&view),
			Some(Show::WithCompletion(hook)) => hook(&view, Completion::convenience("show")),
			None => (),
		}
	}

	fn render_view(view: &Rc<V>, el: Option<&C>, prepend: bool) {
		if !view.is_rendered() {
			view.render(RenderOptions { container: el });
		}

		if let Some(el) = el {
			if view.inserts_self() {
				trace!("View inserts itself.");
			} else {
				let node = view.element();
				if prepend {
					el.prepend_child(&node)
				} else {
					el.append_child(&node)
				}
			}
		}
	}

	/// Runs the hide sequence for `outgoing`, calling `done` after it was removed.
	fn hide(&self, outgoing: Option<Rc<V>>, incoming: Option<&Rc<V>>, done: Option<Box<dyn FnOnce()>>) {
		let outgoing = match outgoing {
			Some(outgoing) => outgoing,
			None => {
				trace!("Nothing to hide.");
				if let Some(done) = done {
					done()
				}
				return;
			}
		};

		let finish = {
			let state = Rc::downgrade(&self.state);
			let outgoing = Rc::clone(&outgoing);
			move || {
				trace!("Removing outgoing view.");
				outgoing.remove();
				if let Some(this) = Self::upgrade(&state) {
					this.forget_previous(&outgoing);
				}
				if let Some(done) = done {
					done()
				}
			}
		};

		let hook = self.state.borrow().config.hide.clone();
		match hook {
			Some(Hide::WithCompletion(hook)) => hook(&outgoing, incoming, Completion::awaited("hide", finish)),
			Some(Hide::Sync(hook)) => {
				hook(&outgoing, incoming);
				finish()
			}
			None => finish(),
		}
	}

	fn forget_previous(&self, view: &Rc<V>) {
		let mut state = self.state.borrow_mut();
		if state.previous.as_ref().map_or(false, |previous| same_view(previous, view)) {
			state.previous = None;
		}
	}

	fn subscribe(&self, view: &Rc<V>) {
		let state = Rc::downgrade(&self.state);
		let address = view_address(view);
		let subscription = view.subscribe_removed(Box::new(move || {
			if let Some(this) = Self::upgrade(&state) {
				this.on_view_removed(address)
			}
		}));

		let subscription = match subscription {
			Some(subscription) => subscription,
			None => return trace!("View doesn't report its removal."),
		};
		let still_current = {
			let mut state = self.state.borrow_mut();
			let still_current = state.current.as_ref().map_or(false, |current| same_view(current, view));
			if still_current {
				state.subscription = Some(subscription);
			}
			still_current
		};
		if !still_current {
			view.unsubscribe_removed(subscription);
		}
	}

	fn on_view_removed(&self, address: *const ()) {
		let empty = {
			let mut state = self.state.borrow_mut();
			if !state.current.as_ref().map_or(false, |current| view_address(current) == address) {
				trace!("Removed view isn't current anymore.");
				return;
			}
			debug!("Current view was removed externally.");
			state.current = None;
			state.subscription = None;
			state.enter_empty()
		};
		if let Some(empty) = empty {
			empty()
		}
	}

	fn notify_empty(&self) {
		let empty = self.state.borrow_mut().enter_empty();
		if let Some(empty) = empty {
			empty()
		}
	}
}
