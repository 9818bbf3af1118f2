//! [`web_sys`] bindings: [`Container`] for [***Element***](https://developer.mozilla.org/en-US/docs/Web/API/Element)s
//! and [`ElementView`], a plain [`View`] over an existing element.

use crate::view::{Container, RemovalListener, RemovalListeners, RenderOptions, SubscriptionId, View};
use core::cell::{Cell, RefCell};
use tracing::{error, instrument, trace};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, Node};

/// DOM exceptions are logged and otherwise ignored.
impl Container for Element {
	type Node = Node;

	fn append_child(&self, node: &Node) {
		if let Err(error) = Node::append_child(self, node) {
			error!(?error, "Failed to append view element.");
		}
	}

	fn prepend_child(&self, node: &Node) {
		let first_child = self.first_child();
		if let Err(error) = Node::insert_before(self, node, first_child.as_ref()) {
			error!(?error, "Failed to prepend view element.");
		}
	}

	fn detach(&self) {
		let parent = match self.parent_node() {
			Some(parent) => parent,
			None => return trace!("Container has no parent."),
		};
		if let Err(error) = parent.remove_child(self) {
			error!(?error, "Failed to detach container.");
		}
	}
}

/// A [`View`] around a pre-built [`web_sys::Element`].
///
/// Rendering only marks the view as rendered. Removal detaches the element and notifies removal listeners,
/// so the same view can be shown again afterwards.
#[derive(Debug)]
pub struct ElementView {
	element: Element,
	rendered: Cell<bool>,
	inserts_self: bool,
	listeners: RefCell<RemovalListeners>,
}
impl ElementView {
	#[must_use]
	pub fn new(element: Element) -> Self {
		Self {
			element,
			rendered: Cell::new(false),
			inserts_self: false,
			listeners: RefCell::default(),
		}
	}

	/// Creates a `tag` element with the given markup as content.
	///
	/// # Errors
	///
	/// Iff `document` refuses to create the element, for example because `tag` isn't a valid name.
	#[instrument(skip(document))]
	pub fn with_html(document: &Document, tag: &str, inner_html: &str) -> Result<Self, JsValue> {
		let element = document.create_element(tag)?;
		element.set_inner_html(inner_html);
		Ok(Self::new(element))
	}

	/// Marks the view as placing its own element, so a switcher won't insert it.
	#[must_use]
	pub fn inserting_self(mut self) -> Self {
		self.inserts_self = true;
		self
	}

	#[must_use]
	pub fn as_element(&self) -> &Element {
		&self.element
	}
}
impl View<Element> for ElementView {
	fn render(&self, _options: RenderOptions<'_, Element>) {
		trace!(tag = %self.element.tag_name(), "Rendering element view.");
		self.rendered.set(true);
	}

	fn element(&self) -> Node {
		self.element.clone().into()
	}

	fn remove(&self) {
		trace!(tag = %self.element.tag_name(), "Removing element view.");
		self.element.remove();
		let listeners = self.listeners.borrow_mut().take_all();
		for listener in listeners {
			listener()
		}
	}

	fn is_rendered(&self) -> bool {
		self.rendered.get()
	}

	fn inserts_self(&self) -> bool {
		self.inserts_self
	}

	fn subscribe_removed(&self, listener: RemovalListener) -> Option<SubscriptionId> {
		Some(self.listeners.borrow_mut().subscribe(listener))
	}

	fn unsubscribe_removed(&self, subscription: SubscriptionId) {
		self.listeners.borrow_mut().unsubscribe(subscription);
	}
}
