use std::{cell::RefCell, rc::Rc};
use view_switcher::{Config, Switcher, View};

use fake_dom_::{complete_first, counter, log, name_of, take, view, Completions, FakeElement, FakeView, TestSwitcher};

#[test]
fn swaps_and_clears() {
	let log = log();
	let container = FakeElement::new("container");
	let (empty_count, empty) = counter();
	let switcher = TestSwitcher::new(container.clone(), Config::new().empty(empty));
	assert_eq!(empty_count.get(), 1, "starts out empty");

	let a = view("a", &log);
	let b = view("b", &log);

	switcher.set(Rc::clone(&a));
	assert_eq!(container.first_child(), Some(a.element.clone()));

	switcher.set(Rc::clone(&b));
	assert_eq!(container.first_child(), Some(b.element.clone()));
	assert_eq!(container.child_names(), ["b"]);
	assert_eq!(a.element.parent(), None);
	assert_eq!(empty_count.get(), 1, "switching doesn't pass through empty");

	switcher.clear();
	assert!(container.child_names().is_empty());
	assert_eq!(empty_count.get(), 2);
	assert!(switcher.is_empty());

	switcher.clear();
	assert_eq!(empty_count.get(), 2, "already empty");
}

#[test]
fn last_of_many_wins() {
	let log = log();
	let container = FakeElement::new("container");
	let switcher = TestSwitcher::new(container.clone(), Config::new());

	let views: Vec<_> = (0..5).map(|i| view(&format!("v{}", i), &log)).collect();
	for view in &views {
		switcher.set(Rc::clone(view));
	}

	assert_eq!(name_of(switcher.current().as_ref()), "v4");
	assert_eq!(container.child_names(), ["v4"]);
	for view in &views[..4] {
		assert_eq!(view.remove_count.get(), 1, "{} removed once", view.name());
	}
	assert_eq!(views[4].remove_count.get(), 0);
}

#[test]
fn setting_current_view_is_a_no_op() {
	let log = log();
	let container = FakeElement::new("container");
	let hooks = {
		let hide_log = Rc::clone(&log);
		let show_log = Rc::clone(&log);
		Config::new()
			.hide(move |outgoing: &Rc<FakeView>, _| hide_log.borrow_mut().push(format!("hide:{}", outgoing.name())))
			.show(move |view| show_log.borrow_mut().push(format!("show:{}", view.name())))
	};
	let switcher = Switcher::new(container.clone(), hooks);

	let a = view("a", &log);
	switcher.set(Rc::clone(&a));
	assert_eq!(take(&log), ["render:a", "show:a"]);

	switcher.set(Rc::clone(&a));
	assert!(take(&log).is_empty());
	assert_eq!(a.render_count.get(), 1);
	assert_eq!(container.child_names(), ["a"]);
}

#[test]
fn sync_hooks_run_in_order() {
	let log = log();
	let container = FakeElement::new("container");
	let hooks = {
		let hide_log = Rc::clone(&log);
		let show_log = Rc::clone(&log);
		Config::new()
			.hide(move |outgoing: &Rc<FakeView>, incoming: Option<&Rc<FakeView>>| {
				hide_log.borrow_mut().push(format!("hide:{}->{}", outgoing.name(), name_of(incoming)))
			})
			.show(move |view| show_log.borrow_mut().push(format!("show:{}", view.name())))
	};
	let switcher = Switcher::new(container, hooks);

	switcher.set(view("a", &log));
	switcher.set(view("b", &log));
	switcher.clear_with({
		let log = Rc::clone(&log);
		move || log.borrow_mut().push("cleared".to_owned())
	});

	assert_eq!(
		take(&log),
		[
			"render:a",
			"show:a",
			"hide:a->b",
			"remove:a",
			"render:b",
			"show:b",
			"hide:b->none",
			"remove:b",
			"cleared",
		]
	);
}

#[test]
fn async_hide_does_not_block_show() {
	let log = log();
	let container = FakeElement::new("container");
	let completions = Completions::default();
	let config = {
		let completions = Rc::clone(&completions);
		Config::new().hide_with_completion(move |_: &Rc<FakeView>, _, done| completions.borrow_mut().push(done))
	};
	let switcher = Switcher::new(container.clone(), config);

	let a = view("a", &log);
	let b = view("b", &log);
	switcher.set(Rc::clone(&a));
	switcher.set(Rc::clone(&b));

	assert_eq!(container.child_names(), ["a", "b"], "`a` is still being hidden");
	assert_eq!(name_of(switcher.current().as_ref()), "b");
	assert_eq!(name_of(switcher.previous().as_ref()), "a");
	assert_eq!(a.remove_count.get(), 0);

	complete_first(&completions);
	assert_eq!(container.child_names(), ["b"]);
	assert_eq!(a.remove_count.get(), 1);
	assert!(switcher.previous().is_none());
}

#[test]
fn prepends_when_configured() {
	let log = log();

	let container = FakeElement::new("container");
	container.push(&FakeElement::new("header"));
	let switcher = TestSwitcher::new(container.clone(), Config::new().prepend(true));
	switcher.set(view("a", &log));
	assert_eq!(container.child_names(), ["a", "header"]);

	let container = FakeElement::new("container");
	container.push(&FakeElement::new("header"));
	let switcher = TestSwitcher::new(container.clone(), Config::new());
	switcher.set(view("a", &log));
	assert_eq!(container.child_names(), ["header", "a"]);
}

#[test]
fn respects_insert_self_and_rendered() {
	let log = log();
	let container = FakeElement::new("container");
	let switcher = TestSwitcher::new(container.clone(), Config::new());

	let placed = Rc::new(FakeView::new("placed", &log).inserting_self());
	switcher.set(Rc::clone(&placed));
	assert_eq!(placed.render_count.get(), 1);
	assert!(container.child_names().is_empty());
	assert_eq!(placed.element.parent(), None);

	let ready = Rc::new(FakeView::new("ready", &log).pre_rendered());
	switcher.set(Rc::clone(&ready));
	assert_eq!(ready.render_count.get(), 0);
	assert_eq!(container.child_names(), ["ready"]);
}

#[test]
fn without_container_views_are_still_rendered_and_shown() {
	let log = log();
	let shown = Rc::new(RefCell::new(Vec::new()));
	let config = {
		let shown = Rc::clone(&shown);
		Config::new().show(move |view: &Rc<FakeView>| shown.borrow_mut().push(view.name()))
	};
	let switcher = TestSwitcher::new(None, config);

	let a = view("a", &log);
	switcher.set(Rc::clone(&a));
	assert_eq!(a.render_count.get(), 1);
	assert!(a.rendered_without_container.get());
	assert_eq!(a.element.parent(), None);
	assert_eq!(*shown.borrow(), ["a"]);
	assert!(switcher.container().is_none());
}

#[test]
fn show_completion_is_not_awaited() {
	let log = log();
	let container = FakeElement::new("container");
	let completions = Completions::default();
	let config = {
		let completions = Rc::clone(&completions);
		Config::new().show_with_completion(move |_: &Rc<FakeView>, done| completions.borrow_mut().push(done))
	};
	let switcher = Switcher::new(container.clone(), config);

	switcher.set(view("a", &log));
	switcher.set(view("b", &log));
	assert_eq!(container.child_names(), ["b"]);
	assert_eq!(completions.borrow().len(), 2);

	complete_first(&completions);
	completions.borrow_mut().clear();
	assert_eq!(container.child_names(), ["b"]);
}

#[test]
fn works_with_trait_objects() {
	let log = log();
	let container = FakeElement::new("container");
	let switcher = Switcher::<FakeElement, dyn View<FakeElement>>::new(container.clone(), Config::new());

	let a: Rc<dyn View<FakeElement>> = view("a", &log);
	let b: Rc<dyn View<FakeElement>> = Rc::new(FakeView::new("b", &log).pre_rendered());

	switcher.set(Rc::clone(&a));
	switcher.set(Rc::clone(&a));
	switcher.set(Rc::clone(&b));
	assert_eq!(take(&log), ["render:a", "remove:a"]);
	assert_eq!(container.child_names(), ["b"]);
}
