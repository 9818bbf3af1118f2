//! The collaborator contract between a [`Switcher`](`crate::Switcher`) and the things it switches.

use core::fmt::{self, Debug, Formatter};
use hashbrown::HashMap;
use tracing::trace;

/// A display surface that views are inserted into, for example a [`web_sys::Element`].
///
/// Insertion is best-effort: implementations report failures through their own logging and never to the caller.
pub trait Container {
	/// The handle a [`View`] exposes for its root element.
	type Node;

	/// Inserts `node` as the last child.
	fn append_child(&self, node: &Self::Node);

	/// Inserts `node` before the current first child, or appends it if there are no children.
	fn prepend_child(&self, node: &Self::Node);

	/// Removes the container itself from its parent, if it has one.
	fn detach(&self);
}

/// Passed to [`View::render`].
pub struct RenderOptions<'a, C> {
	/// The container the view is about to be inserted into.
	///
	/// [`None`] if the switcher was constructed without one, in which case nothing will be inserted.
	pub container: Option<&'a C>,
}
impl<'a, C> Clone for RenderOptions<'a, C> {
	fn clone(&self) -> Self {
		*self
	}
}
impl<'a, C> Copy for RenderOptions<'a, C> {}

/// Identifies one registration made through [`View::subscribe_removed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Called at most once, when a view removes itself.
pub type RemovalListener = Box<dyn FnOnce()>;

/// An object owning a displayable element and its own teardown.
///
/// Views are shared as [`Rc`](`std::rc::Rc`)s and compared by address, so all methods take `&self`.
/// The switcher never holds a borrow of its own state while calling any of these,
/// which means implementations may freely call back into the switcher.
pub trait View<C: Container> {
	/// Renders the view. Skipped by the switcher if [`View::is_rendered`] returns `true`.
	fn render(&self, options: RenderOptions<'_, C>);

	/// The root element that gets inserted into the container.
	fn element(&self) -> C::Node;

	/// Tears the view down, detaching its element from any parent.
	///
	/// This should notify removal listeners registered through [`View::subscribe_removed`].
	/// It may be called again on a view that was already removed, for example when a hide sequence
	/// completes after the switcher itself was torn down.
	fn remove(&self);

	fn is_rendered(&self) -> bool {
		false
	}

	/// Whether the view places its own element, in which case the switcher won't insert it.
	fn inserts_self(&self) -> bool {
		false
	}

	/// Registers a one-shot `listener` to be called when the view is removed.
	///
	/// Returns [`None`] if removal notifications aren't supported, which is the default.
	fn subscribe_removed(&self, _listener: RemovalListener) -> Option<SubscriptionId> {
		None
	}

	fn unsubscribe_removed(&self, _subscription: SubscriptionId) {}
}

/// A registry of pending [`RemovalListener`]s that a [`View`] implementation can embed
/// (usually in a [`RefCell`](`core::cell::RefCell`)) to support [`View::subscribe_removed`].
#[derive(Default)]
pub struct RemovalListeners {
	next_id: u64,
	listeners: HashMap<SubscriptionId, RemovalListener>,
}
impl Debug for RemovalListeners {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("RemovalListeners").field("next_id", &self.next_id).field("len", &self.len()).finish()
	}
}
impl RemovalListeners {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn subscribe(&mut self, listener: RemovalListener) -> SubscriptionId {
		let id = SubscriptionId(self.next_id);
		self.next_id += 1;
		self.listeners.insert(id, listener);
		trace!(?id, "Subscribed removal listener.");
		id
	}

	/// Returns whether `subscription` was still pending.
	pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
		let removed = self.listeners.remove(&subscription).is_some();
		trace!(id = ?subscription, removed, "Unsubscribed removal listener.");
		removed
	}

	/// Takes all pending listeners in subscription order.
	///
	/// Call them only after releasing any borrow of `self`, since they may re-enter the view.
	#[must_use]
	pub fn take_all(&mut self) -> Vec<RemovalListener> {
		let mut listeners: Vec<_> = self.listeners.drain().collect();
		listeners.sort_unstable_by_key(|(id, _)| *id);
		listeners.into_iter().map(|(_, listener)| listener).collect()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.listeners.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.listeners.is_empty()
	}
}
