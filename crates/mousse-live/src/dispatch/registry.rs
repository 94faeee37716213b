//! Explicit registration table mapping `func` keys to routes.
//!
//! Keys are derived once, at registration time, from each handler's declared
//! capabilities. Dispatch is then a map lookup followed by an exhaustive match
//! on [`Route`]; nothing is resolved by name at apply time.

use std::collections::HashMap;

use crate::component::ComponentKind;
use crate::handlers::{ComponentHandler, builtin_handlers};

/// Key of the generic notification route.
pub const NOTIFY_FUNC: &str = "notify";

/// Key of the generic removal route.
pub const REMOVE_COMPONENT_FUNC: &str = "removeComponent";

/// Lifecycle verb of a component route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// `<kind>_new`
    New,
    /// `<kind>_insert`
    Insert,
    /// `<kind>_update_<attribute>`
    Update(&'static str),
    /// `<kind>_update_child_<attribute>`
    UpdateChild(&'static str),
    /// `<kind>_remove`
    Remove,
    /// `<kind>_remove_child`
    RemoveChild,
    /// `<kind>_notify`
    Notify,
}

/// Resolved destination of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Verb applied through the handler of `kind`.
    Component {
        /// Component type.
        kind: ComponentKind,
        /// Lifecycle verb.
        verb: Verb,
    },
    /// `notify`: forwards to `<payload.type>_notify`.
    Notify,
    /// `removeComponent`: removes by wrapper address, else content address.
    RemoveComponent,
}

/// Handler table populated at startup.
pub struct HandlerRegistry {
    routes: HashMap<String, Route>,
    handlers: HashMap<ComponentKind, Box<dyn ComponentHandler>>,
}

impl HandlerRegistry {
    /// Registry holding only the generic routes.
    #[must_use]
    pub fn new() -> Self {
        let mut routes = HashMap::new();
        routes.insert(NOTIFY_FUNC.to_owned(), Route::Notify);
        routes.insert(REMOVE_COMPONENT_FUNC.to_owned(), Route::RemoveComponent);
        Self {
            routes,
            handlers: HashMap::new(),
        }
    }

    /// Registry holding every builtin widget.
    #[must_use]
    pub fn with_builtin_widgets() -> Self {
        let mut registry = Self::new();
        for handler in builtin_handlers() {
            registry.register(handler);
        }
        registry
    }

    /// Registers `handler`, replacing any previous handler of the same kind.
    pub fn register(&mut self, handler: Box<dyn ComponentHandler>) {
        let kind = handler.kind();
        self.routes
            .retain(|_, route| !matches!(route, Route::Component { kind: owner, .. } if *owner == kind));

        let mut add = |suffix: String, verb: Verb| {
            self.routes
                .insert(format!("{kind}_{suffix}"), Route::Component { kind, verb });
        };
        if handler.constructible() {
            add("new".to_owned(), Verb::New);
            add("remove".to_owned(), Verb::Remove);
        }
        if handler.accepts_children() {
            add("insert".to_owned(), Verb::Insert);
            add("remove_child".to_owned(), Verb::RemoveChild);
        }
        for spec in handler.attributes() {
            add(format!("update_{}", spec.name), Verb::Update(spec.name));
        }
        for name in handler.child_attributes() {
            add(format!("update_child_{name}"), Verb::UpdateChild(*name));
        }
        if handler.notifies() {
            add("notify".to_owned(), Verb::Notify);
        }

        self.handlers.insert(kind, handler);
    }

    /// Route registered under `func`.
    #[must_use]
    pub fn resolve(&self, func: &str) -> Option<Route> {
        self.routes.get(func).copied()
    }

    /// Handler registered for `kind`.
    #[must_use]
    pub fn handler(&self, kind: ComponentKind) -> Option<&dyn ComponentHandler> {
        self.handlers.get(&kind).map(Box::as_ref)
    }

    /// Number of registered component handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no component handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Number of resolvable keys, the generic routes included.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds = self.handlers.keys().copied().collect::<Vec<_>>();
        kinds.sort();
        formatter
            .debug_struct("HandlerRegistry")
            .field("routes", &self.routes.len())
            .field("kinds", &kinds)
            .finish()
    }
}
