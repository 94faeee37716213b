//! Behavioural tests for frames applied to the component tree.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;

use crate::component::{Color, ComponentKind};
use crate::dispatch::DispatchError;
use crate::identity::Address;

use super::support::{self, SessionWorld};


#[fixture]
fn session() -> RefCell<SessionWorld> {
    support::session_world()
}

#[given("an empty tree")]
fn given_empty_tree(session: &RefCell<SessionWorld>) {
    *session.borrow_mut() = SessionWorld::new();
}

#[when("the server creates container {id}")]
fn when_container_created(session: &RefCell<SessionWorld>, id: String) {
    session
        .borrow_mut()
        .apply(json!([{"func": "container_new", "id": id}]));
}

#[when("the server inserts button {id} labelled {label} into container {parent}")]
fn when_button_inserted(
    session: &RefCell<SessionWorld>,
    id: String,
    label: String,
    parent: String,
) {
    session.borrow_mut().apply(json!([{
        "func": "container_insert",
        "parentID": parent,
        "id": id,
        "newFunc": "button_new",
        "text": label,
    }]));
}

#[when("the server creates alert {id}")]
fn when_alert_created(session: &RefCell<SessionWorld>, id: String) {
    session
        .borrow_mut()
        .apply(json!([{"func": "alert_new", "id": id}]));
}

#[when("the server removes alert {id}")]
fn when_alert_removed(session: &RefCell<SessionWorld>, id: String) {
    session
        .borrow_mut()
        .apply(json!([{"func": "alert_remove", "id": id}]));
}

#[when("the server creates button {id} coloured {color}")]
fn when_button_created(session: &RefCell<SessionWorld>, id: String, color: String) {
    session
        .borrow_mut()
        .apply(json!([{"func": "button_new", "id": id, "color": color}]));
}

#[when("the server recolours button {id} to {color}")]
fn when_button_recoloured(session: &RefCell<SessionWorld>, id: String, color: String) {
    session
        .borrow_mut()
        .apply(json!([{"func": "button_update_color", "id": id, "color": color}]));
}

#[when("the server sends {func} followed by a container {id}")]
fn when_unknown_then_container(session: &RefCell<SessionWorld>, func: String, id: String) {
    session.borrow_mut().apply(json!([
        {"func": func, "id": "ignored"},
        {"func": "container_new", "id": id}
    ]));
}

#[then("component {address} is a button labelled {label}")]
fn then_button_labelled(
    session: &RefCell<SessionWorld>,
    address: String,
    label: String,
) -> Result<(), String> {
    let session = session.borrow();
    let node = session
        .tree
        .lookup(&address)
        .ok_or_else(|| format!("{address} is not live"))?;
    if node.kind() != ComponentKind::Button {
        return Err(format!("{address} is a {}", node.kind()));
    }
    match node.instance().content.text("text") {
        Some(text) if text == label => Ok(()),
        other => Err(format!("{address} is labelled {other:?}")),
    }
}

#[then("container {parent} holds {child}")]
fn then_container_holds(
    session: &RefCell<SessionWorld>,
    parent: String,
    child: String,
) -> Result<(), String> {
    let session = session.borrow();
    let node = session
        .tree
        .lookup(&parent)
        .ok_or_else(|| format!("{parent} is not live"))?;
    if node.children() == [Address::new(child.as_str())] {
        Ok(())
    } else {
        Err(format!("{parent} holds {:?}", node.children()))
    }
}

#[then("the last operation was a stale no-op")]
fn then_last_stale(session: &RefCell<SessionWorld>) -> Result<(), String> {
    let session = session.borrow();
    let report = session.last_report.as_ref().ok_or("no frame applied")?;
    let errors = report.errors().collect::<Vec<_>>();
    if errors.len() == 1 && errors.iter().all(|error| error.is_stale()) {
        Ok(())
    } else {
        Err(format!("expected one stale identity, got {errors:?}"))
    }
}

#[then("the last operation succeeded")]
fn then_last_succeeded(session: &RefCell<SessionWorld>) -> Result<(), String> {
    let session = session.borrow();
    let report = session.last_report.as_ref().ok_or("no frame applied")?;
    match report.errors().next() {
        None if report.applied() > 0 => Ok(()),
        None => Err("frame applied nothing".to_owned()),
        Some(error) => Err(format!("operation failed: {error}")),
    }
}

#[then("the frame reported an unresolved handler")]
fn then_unresolved(session: &RefCell<SessionWorld>) -> Result<(), String> {
    let session = session.borrow();
    let report = session.last_report.as_ref().ok_or("no frame applied")?;
    if report
        .errors()
        .any(|error| matches!(error, DispatchError::UnresolvedHandler { .. }))
    {
        Ok(())
    } else {
        Err(format!("no unresolved handler in {:?}", report.outcomes()))
    }
}

#[then("component {address} is live")]
fn then_live(session: &RefCell<SessionWorld>, address: String) -> Result<(), String> {
    if session.borrow().tree.exists(&address) {
        Ok(())
    } else {
        Err(format!("{address} is not live"))
    }
}

#[then("component {address} is not live")]
fn then_not_live(session: &RefCell<SessionWorld>, address: String) -> Result<(), String> {
    if session.borrow().tree.exists(&address) {
        Err(format!("{address} is still live"))
    } else {
        Ok(())
    }
}

#[then("button {id} is coloured {color}")]
fn then_button_colour(session: &RefCell<SessionWorld>, id: String, color: String) -> Result<(), String> {
    let expected = color
        .parse::<Color>()
        .map_err(|error| format!("invalid colour '{color}': {error}"))?;
    let session = session.borrow();
    let actual = session
        .tree
        .lookup(&id)
        .and_then(|node| node.instance().content.color("color"));
    if actual == Some(expected) {
        Ok(())
    } else {
        Err(format!("{id} is coloured {actual:?}"))
    }
}

#[scenario(path = "tests/features/live_updates.feature")]
fn live_updates(session: RefCell<SessionWorld>) -> Result<(), String> {
    let _ = session;
    Ok(())
}
