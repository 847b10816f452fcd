//! Property system for virtual and rendered nodes
//!
//! Props are kept as an ordered `Vec<(name, value)>`: small, insertion
//! ordered and cheap to scan for the handful of props a node carries.

use std::fmt;
use std::sync::Arc;

use compact_str::CompactString;

/// Prop names that describe tree structure and are never synced as properties.
pub const RESERVED_PROPS: [&str; 2] = ["children", "key"];

/// Check whether a prop name is reserved (`children`, `key`).
#[inline]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_PROPS.contains(&name)
}

// =============================================================================
// Callback
// =============================================================================

/// Event handler stored in a prop.
///
/// Two callbacks are equal only when they are the same allocation, so a
/// handler recreated on every pass counts as a changed prop.
#[derive(Clone)]
pub struct Callback(Arc<dyn Fn() + Send + Sync>);

impl Callback {
    /// Wrap a closure as a callback.
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invoke the handler.
    #[inline]
    pub fn call(&self) {
        (self.0)()
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Arc::as_ptr(&self.0))
    }
}

// =============================================================================
// PropValue
// =============================================================================

/// Value of a single property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Str(CompactString),
    Num(f64),
    Bool(bool),
    Handler(Callback),
}

impl PropValue {
    /// String view, if this is a string prop
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view, if this is a number prop
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Self::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean view, if this is a bool prop
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Handler view, if this is an event handler
    pub fn as_handler(&self) -> Option<&Callback> {
        match self {
            Self::Handler(cb) => Some(cb),
            _ => None,
        }
    }

    /// Value as it would appear in an HTML attribute.
    ///
    /// Handlers and `false` have no attribute form.
    pub fn to_attr_value(&self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s.to_string()),
            Self::Num(n) => Some(format_num(*n)),
            Self::Bool(true) => Some(String::new()),
            Self::Bool(false) | Self::Handler(_) => None,
        }
    }
}

/// Format a number the way a script engine prints it: integers without `.0`.
pub fn format_num(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl From<CompactString> for PropValue {
    fn from(s: CompactString) -> Self {
        Self::Str(s)
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        Self::Num(n)
    }
}

impl From<i64> for PropValue {
    fn from(n: i64) -> Self {
        Self::Num(n as f64)
    }
}

impl From<u32> for PropValue {
    fn from(n: u32) -> Self {
        Self::Num(n as f64)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Callback> for PropValue {
    fn from(cb: Callback) -> Self {
        Self::Handler(cb)
    }
}

// =============================================================================
// Props
// =============================================================================

/// Node properties as ordered name/value pairs
pub type Props = Vec<(CompactString, PropValue)>;

/// Extension trait for prop operations on Props
pub trait PropsExt {
    /// Get a prop value by name
    fn get_prop(&self, name: &str) -> Option<&PropValue>;

    /// Check if a prop exists
    fn has_prop(&self, name: &str) -> bool;

    /// Set a prop value (insert or update)
    fn set_prop(&mut self, name: impl Into<CompactString>, value: impl Into<PropValue>);

    /// Remove a prop by name, returning the old value if present
    fn remove_prop(&mut self, name: &str) -> Option<PropValue>;

    /// Get a string prop
    fn get_str(&self, name: &str) -> Option<&str> {
        self.get_prop(name).and_then(PropValue::as_str)
    }

    /// Get a numeric prop
    fn get_num(&self, name: &str) -> Option<f64> {
        self.get_prop(name).and_then(PropValue::as_num)
    }

    /// Get a boolean prop, `false` when absent
    fn get_flag(&self, name: &str) -> bool {
        self.get_prop(name).and_then(PropValue::as_bool).unwrap_or(false)
    }

    /// Get a handler prop
    fn get_handler(&self, name: &str) -> Option<&Callback> {
        self.get_prop(name).and_then(PropValue::as_handler)
    }
}

impl PropsExt for Props {
    fn get_prop(&self, name: &str) -> Option<&PropValue> {
        self.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    fn has_prop(&self, name: &str) -> bool {
        self.iter().any(|(k, _)| k == name)
    }

    fn set_prop(&mut self, name: impl Into<CompactString>, value: impl Into<PropValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(prop) = self.iter_mut().find(|(k, _)| k == &name) {
            prop.1 = value;
        } else {
            self.push((name, value));
        }
    }

    fn remove_prop(&mut self, name: &str) -> Option<PropValue> {
        self.iter()
            .position(|(k, _)| k == name)
            .map(|pos| self.remove(pos).1)
    }
}

// =============================================================================
// Tests
// =============================================================================
