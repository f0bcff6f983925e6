//! Primitive types - Props, components and refs.
//!
//! These types define what a tree description is made of. Components are
//! plain Rust values behind [`Component`]; the engine instantiates them from
//! a [`ComponentType`] when the tree is mounted.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::dom::Node;
use super::vnode::VNode;

// =============================================================================
// Props
// =============================================================================

/// Properties passed to a component.
///
/// String values keyed by name, plus the child trees the parent handed in.
#[derive(Clone, Default)]
pub struct Props {
    values: BTreeMap<String, String>,
    children: Vec<VNode>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Props with the given children and no values.
    pub fn with_children(children: Vec<VNode>) -> Self {
        Self {
            values: BTreeMap::new(),
            children,
        }
    }

    /// Set a value (builder style).
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Append a child (builder style).
    pub fn child(mut self, child: impl Into<VNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn children(&self) -> &[VNode] {
        &self.children
    }

    /// Children as a single tree: nothing, the only child, or a fragment.
    pub fn children_node(&self) -> VNode {
        match self.children.as_slice() {
            [] => VNode::Null,
            [only] => only.clone(),
            many => VNode::Fragment(many.to_vec()),
        }
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Props")
            .field("values", &self.values)
            .field("children", &self.children.len())
            .finish()
    }
}

// =============================================================================
// Component
// =============================================================================

/// A component instance.
///
/// `render` is called on mount and on every re-render with the current
/// props. Lifecycle hooks default to no-ops.
pub trait Component {
    fn render(&self, props: &Props) -> VNode;

    /// Called once the component's output is in the DOM.
    fn did_mount(&self) {}

    /// Called once, before the component's output is removed.
    fn will_unmount(&self) {}
}

/// Function component adapter.
struct FnComponent<F>(F);

impl<F> Component for FnComponent<F>
where
    F: Fn(&Props) -> VNode,
{
    fn render(&self, props: &Props) -> VNode {
        (self.0)(props)
    }
}

/// Factory type for component instances.
pub type ComponentFactory = Rc<dyn Fn() -> Box<dyn Component>>;

/// A component "class": a name plus a factory for instances.
///
/// Two `ComponentType`s are the same type only when they share the factory,
/// so clone a type rather than building it twice.
#[derive(Clone)]
pub struct ComponentType {
    name: Rc<str>,
    factory: ComponentFactory,
}

impl ComponentType {
    /// Stateful component built by `factory` for every mount.
    pub fn new<C, F>(name: &str, factory: F) -> Self
    where
        C: Component + 'static,
        F: Fn() -> C + 'static,
    {
        Self {
            name: Rc::from(name),
            factory: Rc::new(move || Box::new(factory()) as Box<dyn Component>),
        }
    }

    /// Stateless component rendering through `render`.
    pub fn function<F>(name: &str, render: F) -> Self
    where
        F: Fn(&Props) -> VNode + 'static,
    {
        let render = Rc::new(render);
        Self {
            name: Rc::from(name),
            factory: Rc::new(move || {
                let render = render.clone();
                Box::new(FnComponent(move |props: &Props| render(props))) as Box<dyn Component>
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn instantiate(&self) -> Box<dyn Component> {
        (self.factory)()
    }

    pub fn same_type(&self, other: &ComponentType) -> bool {
        Rc::ptr_eq(&self.factory, &other.factory)
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentType({})", self.name)
    }
}

// =============================================================================
// Node Ref
// =============================================================================

/// Slot the engine fills with an element's DOM node while it is mounted.
#[derive(Clone, Default)]
pub struct NodeRef(Rc<RefCell<Option<Node>>>);

impl NodeRef {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mounted node, if any.
    pub fn current(&self) -> Option<Node> {
        self.0.borrow().clone()
    }

    pub(crate) fn set(&self, node: Option<Node>) {
        *self.0.borrow_mut() = node;
    }

    /// True if both handles point at the same slot.
    pub fn same_slot(&self, other: &NodeRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeRef").field(&self.current()).finish()
    }
}
