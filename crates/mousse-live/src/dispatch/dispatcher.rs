//! Ordered, fault-isolated application of operations to the tree.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::component::{Attributes, ComponentKind, Payload, Region, Surface};
use crate::handlers::{ComponentHandler, CreateContext, HandlerFault};
use crate::identity::{Address, Node, Placement, Tree};

use super::DISPATCH_TARGET;
use super::decoder::{self, Frame};
use super::errors::DispatchError;
use super::operation::Operation;
use super::registry::{HandlerRegistry, Route, Verb};
use super::report::{Applied, FrameReport, OperationOutcome, TickReport};

const DISMISS_FUNC: &str = "dismiss";
const TICK_FUNC: &str = "tick";

/// Applies decoded operations to a [`Tree`] through a [`HandlerRegistry`].
///
/// Operations run strictly in order. Each runs inside its own fault boundary:
/// handler errors and handler panics are reported for that operation only and
/// never stop the rest of the frame.
#[derive(Debug)]
pub struct Dispatcher {
    registry: HandlerRegistry,
}

/// Everything a constructor route needs besides the tree.
struct Construction<'a> {
    func: &'a str,
    handler: &'a dyn ComponentHandler,
    payload: &'a Payload,
    address: Address,
    placement: Placement,
    slot: Attributes,
    now: Instant,
}

impl Dispatcher {
    /// Dispatcher over `registry`.
    #[must_use]
    pub fn new(registry: HandlerRegistry) -> Self {
        Self { registry }
    }

    /// Dispatcher over the builtin widget set.
    #[must_use]
    pub fn with_builtin_widgets() -> Self {
        Self::new(HandlerRegistry::with_builtin_widgets())
    }

    /// Registration table in use.
    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Decodes `frame` and applies its operations in order.
    ///
    /// Elements that do not form an operation are reported in their position
    /// and the rest of the frame still applies.
    pub fn apply_frame(&self, tree: &mut Tree, frame: &Frame, now: Instant) -> FrameReport {
        let entries = match decoder::decode(frame) {
            Ok(entries) => entries,
            Err(error) => return FrameReport::rejected(error),
        };
        let mut report = FrameReport::default();
        for entry in entries {
            let outcome = match entry {
                Ok(operation) => self.apply_logged(tree, &operation, now),
                Err(error) => {
                    let func = error_func(&error).to_owned();
                    let result = Err(error);
                    log_outcome(&func, &result);
                    OperationOutcome { func, result }
                }
            };
            report.push(outcome);
        }
        report
    }

    /// Applies `operations` in order, isolating each one.
    pub fn apply_all(&self, tree: &mut Tree, operations: &[Operation], now: Instant) -> FrameReport {
        let mut report = FrameReport::default();
        for operation in operations {
            report.push(self.apply_logged(tree, operation, now));
        }
        report
    }

    fn apply_logged(&self, tree: &mut Tree, operation: &Operation, now: Instant) -> OperationOutcome {
        let result = self.apply(tree, operation, now);
        log_outcome(&operation.func, &result);
        OperationOutcome {
            func: operation.func.clone(),
            result,
        }
    }

    /// Applies one operation inside its own fault boundary.
    ///
    /// # Errors
    ///
    /// Returns the [`DispatchError`] describing why the operation had no
    /// effect.
    pub fn apply(
        &self,
        tree: &mut Tree,
        operation: &Operation,
        now: Instant,
    ) -> Result<Applied, DispatchError> {
        let route = self
            .registry
            .resolve(&operation.func)
            .ok_or_else(|| DispatchError::unresolved(&operation.func))?;
        isolate(&operation.func, || self.route(tree, operation, route, now))
    }

    /// Closes a user-dismissible instance, as its close button would.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::StaleIdentity`] when nothing is live at
    /// `address` and [`DispatchError::InvalidOperation`] when the instance is
    /// not dismissible.
    pub fn dismiss(&self, tree: &mut Tree, address: &str) -> Result<Applied, DispatchError> {
        let node = tree
            .lookup(address)
            .ok_or_else(|| DispatchError::stale(DISMISS_FUNC, Address::new(address)))?;
        let handler = self.handler(DISMISS_FUNC, node.kind())?;
        if !handler.dismissible(node.instance()) {
            return Err(DispatchError::invalid(
                DISMISS_FUNC,
                format!("{} '{address}' cannot be dismissed", node.kind()),
            ));
        }
        let removed = tree
            .remove(address)
            .ok_or_else(|| DispatchError::stale(DISMISS_FUNC, Address::new(address)))?;
        info!(
            target: DISPATCH_TARGET,
            address = %address,
            removed = removed.len(),
            "component dismissed by the user"
        );
        Ok(Applied::Removed(removed))
    }

    /// Services component timers that are due at `now`.
    ///
    /// Instances past their lifetime are removed; the rest get their
    /// timer-driven state refreshed.
    pub fn tick(&self, tree: &mut Tree, now: Instant) -> TickReport {
        let mut report = TickReport::default();
        for address in tree.due_timers(now) {
            let Some(node) = tree.lookup(address.as_str()) else {
                continue;
            };
            let kind = node.kind();
            let Some(timer) = node.instance().timer else {
                continue;
            };
            if timer.is_expired(now) {
                tree.remove(address.as_str());
                debug!(target: DISPATCH_TARGET, address = %address, "component timer expired");
                report.expired.push(address);
                continue;
            }
            if !timer.is_due(now) {
                continue;
            }
            let result = isolate(TICK_FUNC, || {
                let handler = self.handler(TICK_FUNC, kind)?;
                if let Some(node) = tree.lookup_mut(address.as_str()) {
                    let instance = node.instance_mut();
                    handler.tick(instance, now);
                    if let Some(timer) = instance.timer.as_mut() {
                        timer.advance(now);
                    }
                }
                Ok(())
            });
            match result {
                Ok(()) => report.refreshed.push(address),
                Err(error) => {
                    error!(
                        target: DISPATCH_TARGET,
                        address = %address,
                        error = %error,
                        "component timer failed; removing component"
                    );
                    tree.remove(address.as_str());
                    report.expired.push(address);
                }
            }
        }
        report
    }

    fn route(
        &self,
        tree: &mut Tree,
        operation: &Operation,
        route: Route,
        now: Instant,
    ) -> Result<Applied, DispatchError> {
        match route {
            Route::Component { kind, verb } => match verb {
                Verb::New => self.create(tree, operation, kind, now),
                Verb::Insert => self.insert(tree, operation, kind, now),
                Verb::Update(attribute) => self.update(tree, operation, kind, attribute),
                Verb::UpdateChild(attribute) => {
                    self.update_child(tree, operation, kind, attribute)
                }
                Verb::Remove => Self::remove(tree, operation, kind),
                Verb::RemoveChild => Self::remove_child(tree, operation, kind),
                Verb::Notify => self.notify(tree, &operation.func, operation, kind, now),
            },
            Route::Notify => self.generic_notify(tree, operation, now),
            Route::RemoveComponent => Self::remove_component(tree, operation),
        }
    }

    fn create(
        &self,
        tree: &mut Tree,
        operation: &Operation,
        kind: ComponentKind,
        now: Instant,
    ) -> Result<Applied, DispatchError> {
        let func = operation.func.as_str();
        let handler = self.handler(func, kind)?;
        let address = required_address(operation)?;
        let placement = match (handler.home_region(), operation.parent()) {
            (Some(region), _) => Placement::Region(region),
            (None, Some(parent)) => Placement::Parent(Address::new(parent)),
            (None, None) => Placement::Root,
        };
        self.construct(
            tree,
            Construction {
                func,
                handler,
                payload: &operation.payload,
                address,
                placement,
                slot: Attributes::new(),
                now,
            },
        )
    }

    fn insert(
        &self,
        tree: &mut Tree,
        operation: &Operation,
        kind: ComponentKind,
        now: Instant,
    ) -> Result<Applied, DispatchError> {
        let func = operation.func.as_str();
        let parent_handler = self.handler(func, kind)?;
        let parent = required_parent(operation)?;
        let parent_node = tree
            .lookup(parent)
            .ok_or_else(|| DispatchError::stale(func, Address::new(parent)))?;
        expect_kind(func, parent, parent_node, kind)?;

        let payload = &operation.payload;
        let is_markup = payload.str("render").is_some();
        let child_handler = if is_markup {
            self.handler(func, ComponentKind::Markup)?
        } else if let Some(constructor) = payload.str("newFunc") {
            match self.registry.resolve(constructor) {
                Some(Route::Component {
                    kind: child_kind,
                    verb: Verb::New,
                }) => self.handler(constructor, child_kind)?,
                Some(_) => {
                    return Err(DispatchError::invalid(
                        func,
                        format!("newFunc '{constructor}' is not a constructor"),
                    ));
                }
                None => return Err(DispatchError::unresolved(constructor)),
            }
        } else {
            return Err(DispatchError::invalid(
                func,
                "insert needs either newFunc or render",
            ));
        };

        let address = match operation.id.as_deref() {
            Some(id) => Address::resolve(Some(parent), id),
            None if is_markup => {
                let local = tree.next_local_address(ComponentKind::Markup);
                Address::resolve(Some(parent), local.as_str())
            }
            None => return Err(DispatchError::invalid(func, "missing id")),
        };

        self.construct(
            tree,
            Construction {
                func,
                handler: child_handler,
                payload,
                address,
                placement: Placement::Parent(Address::new(parent)),
                slot: parent_handler.insert_slot(payload),
                now,
            },
        )
    }

    fn notify(
        &self,
        tree: &mut Tree,
        func: &str,
        operation: &Operation,
        kind: ComponentKind,
        now: Instant,
    ) -> Result<Applied, DispatchError> {
        let handler = self.handler(func, kind)?;
        let address = tree.next_local_address(kind);
        let region = handler.home_region().unwrap_or(Region::Toasts);
        self.construct(
            tree,
            Construction {
                func,
                handler,
                payload: &operation.payload,
                address,
                placement: Placement::Region(region),
                slot: Attributes::new(),
                now,
            },
        )
    }

    fn generic_notify(
        &self,
        tree: &mut Tree,
        operation: &Operation,
        now: Instant,
    ) -> Result<Applied, DispatchError> {
        let kind = operation
            .payload
            .text("type")
            .ok_or_else(|| DispatchError::invalid(&operation.func, "missing notification type"))?;
        let target = format!("{kind}_notify");
        match self.registry.resolve(&target) {
            Some(Route::Component {
                kind,
                verb: Verb::Notify,
            }) => self.notify(tree, &target, operation, kind, now),
            Some(_) | None => Err(DispatchError::unresolved(target)),
        }
    }

    fn construct(
        &self,
        tree: &mut Tree,
        construction: Construction<'_>,
    ) -> Result<Applied, DispatchError> {
        let Construction {
            func,
            handler,
            payload,
            address,
            placement,
            slot,
            now,
        } = construction;

        if tree.exists(address.as_str()) {
            return Err(DispatchError::collision(func, address));
        }

        let mut instance = handler
            .create(payload, &CreateContext { now })
            .map_err(|fault| DispatchError::handler_fault(func, fault))?;

        if let Placement::Parent(parent) = &placement
            && let Some(parent_node) = tree.lookup(parent.as_str())
            && let Some(parent_handler) = self.registry.handler(parent_node.kind())
        {
            parent_handler.cascade(parent_node.instance(), handler.kind(), &mut instance);
        }

        let node = Node::new(handler.kind(), instance)
            .with_slot(slot)
            .with_wrapper(handler.has_wrapper());
        tree.insert(address.clone(), node, placement)
            .map_err(|error| DispatchError::from_identity(func, error))?;
        Ok(Applied::Created(address))
    }

    fn update(
        &self,
        tree: &mut Tree,
        operation: &Operation,
        kind: ComponentKind,
        attribute: &'static str,
    ) -> Result<Applied, DispatchError> {
        let func = operation.func.as_str();
        let handler = self.handler(func, kind)?;
        let address = required_address(operation)?;
        let target = match handler.surface_of(attribute).unwrap_or(Surface::Content) {
            Surface::Content => address,
            Surface::Wrapper => address.wrapper(),
        };

        let node = tree
            .lookup_mut(target.as_str())
            .ok_or_else(|| DispatchError::stale(func, target.clone()))?;
        expect_kind(func, target.as_str(), node, kind)?;
        handler
            .update(node.instance_mut(), attribute, &operation.payload)
            .map_err(|fault| DispatchError::handler_fault(func, fault))?;

        let canonical = tree
            .canonical(target.as_str())
            .cloned()
            .unwrap_or(target);
        if handler.accepts_children() {
            cascade_to_children(tree, handler, &canonical);
        }
        Ok(Applied::Updated(canonical))
    }

    fn update_child(
        &self,
        tree: &mut Tree,
        operation: &Operation,
        kind: ComponentKind,
        attribute: &'static str,
    ) -> Result<Applied, DispatchError> {
        let func = operation.func.as_str();
        let handler = self.handler(func, kind)?;
        let parent = required_parent(operation)?;
        let parent_node = tree
            .lookup(parent)
            .ok_or_else(|| DispatchError::stale(func, Address::new(parent)))?;
        expect_kind(func, parent, parent_node, kind)?;

        let address = required_address(operation)?;
        let child = tree
            .lookup_mut(address.as_str())
            .ok_or_else(|| DispatchError::stale(func, address.clone()))?;
        handler
            .update_child(child.slot_mut(), attribute, &operation.payload)
            .map_err(|fault| DispatchError::handler_fault(func, fault))?;
        Ok(Applied::Updated(address))
    }

    fn remove(
        tree: &mut Tree,
        operation: &Operation,
        kind: ComponentKind,
    ) -> Result<Applied, DispatchError> {
        let func = operation.func.as_str();
        let address = required_address(operation)?;
        let node = tree
            .lookup(address.as_str())
            .ok_or_else(|| DispatchError::stale(func, address.clone()))?;
        expect_kind(func, address.as_str(), node, kind)?;
        tree.remove(address.as_str())
            .map(Applied::Removed)
            .ok_or_else(|| DispatchError::stale(func, address))
    }

    fn remove_child(
        tree: &mut Tree,
        operation: &Operation,
        kind: ComponentKind,
    ) -> Result<Applied, DispatchError> {
        let func = operation.func.as_str();
        let parent = required_parent(operation)?;
        if let Some(parent_node) = tree.lookup(parent) {
            expect_kind(func, parent, parent_node, kind)?;
        }
        let address = required_address(operation)?;
        tree.remove(address.as_str())
            .map(Applied::Removed)
            .ok_or_else(|| DispatchError::stale(func, address))
    }

    fn remove_component(tree: &mut Tree, operation: &Operation) -> Result<Applied, DispatchError> {
        let address = required_address(operation)?;
        tree.remove(address.wrapper().as_str())
            .or_else(|| tree.remove(address.as_str()))
            .map(Applied::Removed)
            .ok_or_else(|| DispatchError::stale(&operation.func, address))
    }

    fn handler(
        &self,
        func: &str,
        kind: ComponentKind,
    ) -> Result<&dyn ComponentHandler, DispatchError> {
        self.registry
            .handler(kind)
            .ok_or_else(|| DispatchError::unresolved(func))
    }
}

fn required_address(operation: &Operation) -> Result<Address, DispatchError> {
    operation
        .address()
        .ok_or_else(|| DispatchError::invalid(&operation.func, "missing id"))
}

fn required_parent(operation: &Operation) -> Result<&str, DispatchError> {
    operation
        .parent()
        .ok_or_else(|| DispatchError::invalid(&operation.func, "missing parentID"))
}

fn expect_kind(
    func: &str,
    address: &str,
    node: &Node,
    expected: ComponentKind,
) -> Result<(), DispatchError> {
    if node.kind() == expected {
        Ok(())
    } else {
        Err(DispatchError::invalid(
            func,
            format!("'{address}' is a {}, not a {expected}", node.kind()),
        ))
    }
}

fn cascade_to_children(tree: &mut Tree, handler: &dyn ComponentHandler, parent: &Address) {
    let Some(node) = tree.lookup(parent.as_str()) else {
        return;
    };
    let parent_instance = node.instance().clone();
    let children = node.children().to_vec();
    for child in children {
        if let Some(child_node) = tree.lookup_mut(child.as_str()) {
            let child_kind = child_node.kind();
            handler.cascade(&parent_instance, child_kind, child_node.instance_mut());
        }
    }
}

fn isolate<T>(
    func: &str,
    body: impl FnOnce() -> Result<T, DispatchError>,
) -> Result<T, DispatchError> {
    panic::catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|payload| {
        Err(DispatchError::handler_fault(
            func,
            HandlerFault::panicked(panic_message(payload.as_ref())),
        ))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-textual panic payload".to_owned())
}

fn error_func(error: &DispatchError) -> &str {
    match error {
        DispatchError::UnresolvedHandler { func }
        | DispatchError::StaleIdentity { func, .. }
        | DispatchError::HandlerFault { func, .. }
        | DispatchError::IdentityCollision { func, .. }
        | DispatchError::InvalidOperation { func, .. } => func,
    }
}

fn log_outcome(func: &str, result: &Result<Applied, DispatchError>) {
    match result {
        Ok(applied) => debug!(
            target: DISPATCH_TARGET,
            func = %func,
            outcome = ?applied,
            "operation applied"
        ),
        Err(error) if error.is_stale() => info!(
            target: DISPATCH_TARGET,
            func = %func,
            class = error.class(),
            error = %error,
            "operation skipped"
        ),
        Err(
            error @ (DispatchError::HandlerFault { .. } | DispatchError::UnresolvedHandler { .. }),
        ) => error!(
            target: DISPATCH_TARGET,
            func = %func,
            class = error.class(),
            error = %error,
            "operation failed"
        ),
        Err(error) => warn!(
            target: DISPATCH_TARGET,
            func = %func,
            class = error.class(),
            error = %error,
            "operation rejected"
        ),
    }
}
