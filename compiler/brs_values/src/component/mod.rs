//! Components: reference-counted objects that advertise interfaces.
//!
//! # Dispatch
//!
//! Each component type owns a static table of interfaces, each an ordered
//! list of method definitions (`MethodDef`). Method lookup walks the table
//! in registration order and binds the first match to the receiver,
//! producing an ordinary `Callable`. A pending *filter* (the interface most
//! recently navigated through, as in `obj.ifArray.Count()`) narrows the
//! next lookup to one interface and is consumed by it.
//!
//! # Ownership
//!
//! `ObjectRef` is an `Rc<RefCell<dyn BrsComponent>>`. Containers hold
//! strong references to their elements; functions read out of an
//! associative array keep only a weak reference to it. Containers that
//! hold each other form cycles that are never freed.

pub mod array;
pub mod assoc_array;
pub mod boxed;
mod factory;

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::callable::{Callable, MethodFn, Signature};
use crate::value::Value;

pub use array::RoArray;
pub use assoc_array::RoAssociativeArray;
pub use boxed::BoxedValue;
pub use factory::{create_object, Arity, ConstructorFn, FactoryEntry, ObjectFactory};

/// Upcast to `Any` for downcasting trait objects.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A runtime object.
pub trait BrsComponent: AsAny {
    fn core(&self) -> &ComponentCore;

    fn core_mut(&mut self) -> &mut ComponentCore;

    /// Text form. `nested` is set when rendered inside a container listing.
    fn display(&self, nested: bool) -> String {
        let _ = nested;
        format!("<Component: {}>", self.core().name())
    }

    /// Equality against a value that is not this very object.
    fn equal_to(&self, other: &Value) -> bool {
        let _ = other;
        false
    }

    /// The primitive a boxed component wraps.
    fn unbox(&self) -> Option<Value> {
        None
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        None
    }

    fn as_collection_mut(&mut self) -> Option<&mut dyn Collection> {
        None
    }
}

/// Element access and the iteration protocol used by `for each`.
pub trait Collection {
    /// Element at `index`. `Ok(None)` means "no such element, try a method
    /// of that name".
    fn get(&self, index: &Value, case_sensitive: bool) -> Result<Option<Value>, String>;

    fn set(&mut self, index: &Value, value: Value, case_sensitive: bool) -> Result<(), String>;

    /// Snapshot of the iterable elements.
    fn elements(&self) -> Vec<Value>;

    fn reset_next(&mut self);

    fn has_next(&self) -> bool;

    /// Next element; `Invalid` once exhausted.
    fn get_next(&mut self) -> Value;

    /// Re-validates the cursor after the collection changed size.
    fn update_next(&mut self);
}

/// A method a component type exposes.
pub struct MethodDef {
    pub name: &'static str,
    pub signatures: Vec<Rc<Signature>>,
    pub func: MethodFn,
}

impl MethodDef {
    pub fn new(name: &'static str, signature: Signature, func: MethodFn) -> Self {
        MethodDef {
            name,
            signatures: vec![Rc::new(signature)],
            func,
        }
    }
}

/// A named, ordered group of methods.
pub struct InterfaceDef {
    pub name: &'static str,
    pub methods: Vec<MethodDef>,
}

impl InterfaceDef {
    pub fn new(name: &'static str, methods: Vec<MethodDef>) -> Self {
        InterfaceDef { name, methods }
    }

    fn find(&self, method: &str) -> Option<&MethodDef> {
        self.methods
            .iter()
            .find(|def| def.name.eq_ignore_ascii_case(method))
    }
}

/// State every component carries: its class name, interface table and the
/// pending interface filter.
pub struct ComponentCore {
    name: &'static str,
    interfaces: Rc<[InterfaceDef]>,
    filter: Option<String>,
}

impl ComponentCore {
    pub fn new(name: &'static str, interfaces: Rc<[InterfaceDef]>) -> Self {
        ComponentCore {
            name,
            interfaces,
            filter: None,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn interfaces(&self) -> &[InterfaceDef] {
        &self.interfaces
    }

    pub fn has_interface(&self, name: &str) -> bool {
        self.interfaces
            .iter()
            .any(|iface| iface.name.eq_ignore_ascii_case(name))
    }

    /// Resolves `method`, honoring and consuming the filter. Without a
    /// filter the first interface declaring the name wins.
    fn resolve(&mut self, method: &str) -> Option<(&'static str, Vec<Rc<Signature>>, MethodFn)> {
        let found = match self.filter.take() {
            Some(filter) => self
                .interfaces
                .iter()
                .find(|iface| iface.name.eq_ignore_ascii_case(&filter))
                .and_then(|iface| iface.find(method)),
            None => self.interfaces.iter().find_map(|iface| iface.find(method)),
        };
        found.map(|def| (def.name, def.signatures.clone(), def.func))
    }
}

/// Descriptor value for an interface: a name and its method names.
///
/// Never callable itself; `global` is the only one scripts see directly.
#[derive(Clone, Debug)]
pub struct BrsInterface {
    name: String,
    methods: FxHashSet<String>,
}

impl BrsInterface {
    pub fn new<'a>(name: impl Into<String>, methods: impl IntoIterator<Item = &'a str>) -> Self {
        BrsInterface {
            name: name.into(),
            methods: methods.into_iter().map(str::to_lowercase).collect(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains(&name.to_lowercase())
    }
}

/// Shared handle to a component.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<dyn BrsComponent>>);

impl ObjectRef {
    pub fn new<C: BrsComponent>(component: C) -> Self {
        ObjectRef(Rc::new(RefCell::new(component)))
    }

    pub fn borrow(&self) -> Ref<'_, dyn BrsComponent> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, dyn BrsComponent> {
        self.0.borrow_mut()
    }

    /// Same object.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }

    pub fn component_name(&self) -> &'static str {
        self.borrow().core().name()
    }

    pub fn has_interface(&self, name: &str) -> bool {
        self.borrow().core().has_interface(name)
    }

    pub fn interface_names(&self) -> Vec<&'static str> {
        self.borrow()
            .core()
            .interfaces()
            .iter()
            .map(|iface| iface.name)
            .collect()
    }

    /// Narrows the next method lookup to `interface`.
    pub fn set_filter(&self, interface: Option<&str>) {
        self.borrow_mut().core_mut().filter = interface.map(str::to_owned);
    }

    /// Looks up `name` and binds it to this object.
    pub fn get_method(&self, name: &str) -> Option<Callable> {
        let (method_name, signatures, func) = self.borrow_mut().core_mut().resolve(name)?;
        Some(Callable::method(method_name, signatures, self.clone(), func))
    }

    pub fn is_collection(&self) -> bool {
        self.borrow().as_collection().is_some()
    }

    /// Element at `index`, falling back to a method named by a string index,
    /// then to `Invalid`.
    pub fn get_element(&self, index: &Value, case_sensitive: bool) -> Result<Value, String> {
        let found = {
            let component = self.borrow();
            let Some(collection) = component.as_collection() else {
                return Err(format!("{} is not a collection", component.core().name()));
            };
            collection.get(index, case_sensitive)?
        };
        if let Some(value) = found {
            return Ok(value);
        }
        let method = index
            .unbox()
            .as_str()
            .and_then(|name| self.get_method(name));
        Ok(method.map_or(Value::Invalid, Value::Callable))
    }

    pub fn set_element(&self, index: &Value, value: Value, case_sensitive: bool) -> Result<(), String> {
        let mut component = self.borrow_mut();
        let name = component.core().name();
        match component.as_collection_mut() {
            Some(collection) => collection.set(index, value, case_sensitive),
            None => Err(format!("{name} is not a collection")),
        }
    }

    /// Runs `f` against the collection behind this object.
    pub fn with_collection_mut<R>(&self, f: impl FnOnce(&mut dyn Collection) -> R) -> Option<R> {
        let mut component = self.borrow_mut();
        component.as_collection_mut().map(f)
    }

    pub fn unbox(&self) -> Option<Value> {
        self.borrow().unbox()
    }

    pub fn display(&self, nested: bool) -> String {
        self.borrow().display(nested)
    }

    pub fn is<C: BrsComponent>(&self) -> bool {
        AsAny::as_any(&*self.borrow()).is::<C>()
    }

    /// Runs `f` against the concrete component, if it is a `C`.
    pub fn with<C: BrsComponent, R>(&self, f: impl FnOnce(&C) -> R) -> Option<R> {
        let component = self.borrow();
        AsAny::as_any(&*component).downcast_ref::<C>().map(f)
    }

    pub fn with_mut<C: BrsComponent, R>(&self, f: impl FnOnce(&mut C) -> R) -> Option<R> {
        let mut component = self.borrow_mut();
        AsAny::as_any_mut(&mut *component).downcast_mut::<C>().map(f)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({})", self.component_name())
    }
}

#[cfg(test)]
mod tests;
