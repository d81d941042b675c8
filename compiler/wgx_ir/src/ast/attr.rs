//! Attributes (`@vertex`, `@location(0)`, ...).

use std::fmt;

/// Value of `@builtin(...)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinValue {
    Position,
    VertexIndex,
    InstanceIndex,
}

impl BuiltinValue {
    /// Parse the WGSL spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "position" => Some(BuiltinValue::Position),
            "vertex_index" => Some(BuiltinValue::VertexIndex),
            "instance_index" => Some(BuiltinValue::InstanceIndex),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BuiltinValue::Position => "position",
            BuiltinValue::VertexIndex => "vertex_index",
            BuiltinValue::InstanceIndex => "instance_index",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InterpolateType {
    Flat,
    Linear,
    Perspective,
}

impl InterpolateType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "flat" => Some(InterpolateType::Flat),
            "linear" => Some(InterpolateType::Linear),
            "perspective" => Some(InterpolateType::Perspective),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum InterpolateSampling {
    #[default]
    Undefined,
    Center,
    Centroid,
    Sample,
    First,
    Either,
}

impl InterpolateSampling {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "center" => Some(InterpolateSampling::Center),
            "centroid" => Some(InterpolateSampling::Centroid),
            "sample" => Some(InterpolateSampling::Sample),
            "first" => Some(InterpolateSampling::First),
            "either" => Some(InterpolateSampling::Either),
            _ => None,
        }
    }
}

/// Attribute attached to a declaration, parameter, member or return type.
///
/// Numeric arguments are literal non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Const,
    Invariant,
    MustUse,
    Vertex,
    Fragment,
    Compute,
    Align(u32),
    Binding(u32),
    Builtin(BuiltinValue),
    Group(u32),
    Location(u32),
    Interpolate {
        ty: InterpolateType,
        sampling: InterpolateSampling,
    },
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Const => f.write_str("@const"),
            Attribute::Invariant => f.write_str("@invariant"),
            Attribute::MustUse => f.write_str("@must_use"),
            Attribute::Vertex => f.write_str("@vertex"),
            Attribute::Fragment => f.write_str("@fragment"),
            Attribute::Compute => f.write_str("@compute"),
            Attribute::Align(n) => write!(f, "@align({n})"),
            Attribute::Binding(n) => write!(f, "@binding({n})"),
            Attribute::Builtin(b) => write!(f, "@builtin({})", b.as_str()),
            Attribute::Group(n) => write!(f, "@group({n})"),
            Attribute::Location(n) => write!(f, "@location({n})"),
            Attribute::Interpolate { ty, sampling } => write!(f, "@interpolate({ty:?}, {sampling:?})"),
        }
    }
}

/// Lookups over an attribute slice.
pub trait AttributeSliceExt {
    fn find_map_attr<T>(&self, f: impl Fn(&Attribute) -> Option<T>) -> Option<T>;

    fn group(&self) -> Option<u32> {
        self.find_map_attr(|a| match a {
            Attribute::Group(n) => Some(*n),
            _ => None,
        })
    }

    fn binding(&self) -> Option<u32> {
        self.find_map_attr(|a| match a {
            Attribute::Binding(n) => Some(*n),
            _ => None,
        })
    }

    fn location(&self) -> Option<u32> {
        self.find_map_attr(|a| match a {
            Attribute::Location(n) => Some(*n),
            _ => None,
        })
    }

    fn builtin(&self) -> Option<BuiltinValue> {
        self.find_map_attr(|a| match a {
            Attribute::Builtin(b) => Some(*b),
            _ => None,
        })
    }

    fn align(&self) -> Option<u32> {
        self.find_map_attr(|a| match a {
            Attribute::Align(n) => Some(*n),
            _ => None,
        })
    }

    fn is_flat(&self) -> bool {
        self.find_map_attr(|a| match a {
            Attribute::Interpolate {
                ty: InterpolateType::Flat,
                ..
            } => Some(()),
            _ => None,
        })
        .is_some()
    }
}

impl AttributeSliceExt for [Attribute] {
    fn find_map_attr<T>(&self, f: impl Fn(&Attribute) -> Option<T>) -> Option<T> {
        self.iter().find_map(f)
    }
}
