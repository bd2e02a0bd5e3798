//! Argument schema type system.
//!
//! A keyword declares an ordered list of [`ArgumentSchema`]s. At compile time each
//! raw token from a call like `damage(?entity, 5)` is resolved against the schema
//! at its position, producing a typed [`Value`]. Execution never re-parses text.
//!
//! ## Schema Variants
//!
//! | Variant | Resolves | Diagnostic label |
//! |---------|----------|------------------|
//! | `Primitive` | number / boolean / char / string, optional validator | yes |
//! | `Values` | number / boolean / char / string | no (type name) |
//! | `Enum` | member of an [`ArgumentEnum`], case-insensitive | yes |
//! | `Targeter` | a [`Targeter`] from an allowed set | no |
//! | `Manual` | anything a parse function accepts | yes |

use std::fmt;
use std::sync::Arc;

use crate::error::ArgumentError;
use crate::targeter::{Capabilities, Targeter};

/// Predicate applied to a converted primitive.
pub type Validator = fn(&Value) -> bool;

/// Caller-supplied parser for `Manual` arguments.
pub type ManualParser = fn(&str) -> Option<Value>;

/// Parser for `Enum` arguments, monomorphized per enumeration.
pub type EnumParser = fn(&str) -> Option<EnumValue>;

// =============================================================================
// Primitive Kinds
// =============================================================================

/// Primitive argument types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    Char,
    String,
}

impl PrimitiveKind {
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Char => "char",
            PrimitiveKind::String => "string",
        }
    }

    /// Convert a raw token. Returns `None` if the token is not a valid value of
    /// this kind. Non-finite floats are rejected.
    pub fn parse(self, raw: &str) -> Option<Value> {
        match self {
            PrimitiveKind::Byte => raw.parse().ok().map(Value::Byte),
            PrimitiveKind::Short => raw.parse().ok().map(Value::Short),
            PrimitiveKind::Integer => raw.parse().ok().map(Value::Integer),
            PrimitiveKind::Long => raw.parse().ok().map(Value::Long),
            PrimitiveKind::Float => raw
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::Float),
            PrimitiveKind::Double => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::Double),
            PrimitiveKind::Boolean => match raw.to_ascii_lowercase().as_str() {
                "true" => Some(Value::Boolean(true)),
                "false" => Some(Value::Boolean(false)),
                _ => None,
            },
            PrimitiveKind::Char => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Value::Char(c)),
                    _ => None,
                }
            }
            PrimitiveKind::String => Some(Value::String(translate_color_codes(raw))),
        }
    }
}

/// Translate `&`-prefixed formatting codes into `§` codes.
fn translate_color_codes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        let is_code = matches!(
            chars.peek(),
            Some(next) if next.is_ascii_hexdigit() || "kKlLmMnNoOrR".contains(*next)
        );
        if c == '&' && is_code {
            out.push('§');
        } else {
            out.push(c);
        }
    }
    out
}

// =============================================================================
// Enumerations
// =============================================================================

/// A fixed enumeration that can appear as a keyword argument.
pub trait ArgumentEnum: Copy + Send + Sync + 'static {
    /// Name used in diagnostics, e.g. "potion effect type".
    const NAME: &'static str;

    /// All members, in a stable order.
    fn variants() -> &'static [Self];

    /// The configuration spelling of a member.
    fn variant_name(self) -> &'static str;
}

/// A resolved enumeration member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub enumeration: &'static str,
    pub index: usize,
    pub name: &'static str,
}

impl EnumValue {
    pub fn of<E: ArgumentEnum>(member: E) -> Self {
        let index = E::variants()
            .iter()
            .position(|v| v.variant_name() == member.variant_name())
            .unwrap_or_default();
        Self {
            enumeration: E::NAME,
            index,
            name: member.variant_name(),
        }
    }

    /// Convert back to the enumeration it came from.
    pub fn get<E: ArgumentEnum>(&self) -> Option<E> {
        if self.enumeration != E::NAME {
            return None;
        }
        E::variants().get(self.index).copied()
    }
}

fn parse_enum<E: ArgumentEnum>(raw: &str) -> Option<EnumValue> {
    E::variants()
        .iter()
        .find(|v| v.variant_name().eq_ignore_ascii_case(raw))
        .map(|v| EnumValue::of(*v))
}

// =============================================================================
// Values
// =============================================================================

/// A resolved, type-checked argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Char(char),
    String(String),
    Targeter(Targeter),
    Enum(EnumValue),
}

impl Value {
    /// Any numeric value widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Byte(v) => Some(*v as f64),
            Value::Short(v) => Some(*v as f64),
            Value::Integer(v) => Some(*v as f64),
            Value::Long(v) => Some(*v as f64),
            Value::Float(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Any integer value widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(*v as i64),
            Value::Short(v) => Some(*v as i64),
            Value::Integer(v) => Some(*v as i64),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_targeter(&self) -> Option<Targeter> {
        match self {
            Value::Targeter(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_enum<E: ArgumentEnum>(&self) -> Option<E> {
        match self {
            Value::Enum(v) => v.get(),
            _ => None,
        }
    }
}

/// The resolved argument list of one compiled call.
///
/// Shared by every execution of the ability that owns it; never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Arguments(Arc<[Value]>);

impl Arguments {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.iter()
    }

    pub fn targeter(&self, index: usize) -> Option<Targeter> {
        self.get(index).and_then(Value::as_targeter)
    }

    /// Targeter modes referenced anywhere in this list.
    pub fn targeters(&self) -> Capabilities {
        Capabilities::of(self.iter().filter_map(Value::as_targeter))
    }

    pub fn double(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(Value::as_f64)
    }

    pub fn integer(&self, index: usize) -> Option<i64> {
        self.get(index).and_then(Value::as_i64)
    }

    pub fn boolean(&self, index: usize) -> Option<bool> {
        self.get(index).and_then(Value::as_bool)
    }

    pub fn string(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(Value::as_str)
    }

    pub fn enumeration<E: ArgumentEnum>(&self, index: usize) -> Option<E> {
        self.get(index).and_then(Value::as_enum)
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Describes how one raw token becomes one [`Value`].
#[derive(Clone)]
pub enum ArgumentSchema {
    Primitive {
        kind: PrimitiveKind,
        validator: Option<Validator>,
        label: Option<&'static str>,
    },
    Enum {
        enumeration: &'static str,
        parse: EnumParser,
        label: Option<&'static str>,
    },
    Targeter {
        allowed: Capabilities,
    },
    Values {
        kind: PrimitiveKind,
    },
    Manual {
        parse: ManualParser,
        label: &'static str,
    },
}

impl ArgumentSchema {
    /// A labelled primitive with no extra validation.
    pub fn primitive(kind: PrimitiveKind, label: &'static str) -> Self {
        ArgumentSchema::Primitive {
            kind,
            validator: None,
            label: Some(label),
        }
    }

    /// A labelled primitive restricted by `validator`.
    pub fn validated(kind: PrimitiveKind, label: &'static str, validator: Validator) -> Self {
        ArgumentSchema::Primitive {
            kind,
            validator: Some(validator),
            label: Some(label),
        }
    }

    /// A member of the enumeration `E`.
    pub fn enumeration<E: ArgumentEnum>(label: &'static str) -> Self {
        ArgumentSchema::Enum {
            enumeration: E::NAME,
            parse: parse_enum::<E>,
            label: Some(label),
        }
    }

    /// One of the given targeter modes.
    pub fn targeter<I: IntoIterator<Item = Targeter>>(allowed: I) -> Self {
        ArgumentSchema::Targeter {
            allowed: Capabilities::of(allowed),
        }
    }

    /// An unlabelled primitive.
    pub fn values(kind: PrimitiveKind) -> Self {
        ArgumentSchema::Values { kind }
    }

    /// Parsed by a custom function.
    pub fn manual(label: &'static str, parse: ManualParser) -> Self {
        ArgumentSchema::Manual { parse, label }
    }

    /// Human-readable description of what this schema accepts.
    pub fn expected(&self) -> String {
        match self {
            ArgumentSchema::Primitive { kind, label, .. } => {
                label.unwrap_or_else(|| kind.name()).to_string()
            }
            ArgumentSchema::Enum {
                enumeration, label, ..
            } => label.unwrap_or(*enumeration).to_string(),
            ArgumentSchema::Targeter { allowed } => {
                let modes: Vec<_> = allowed.targeters().map(Targeter::identifier).collect();
                format!("targeter ({})", modes.join(", "))
            }
            ArgumentSchema::Values { kind } => kind.name().to_string(),
            ArgumentSchema::Manual { label, .. } => label.to_string(),
        }
    }

    /// Resolve the token at `position` of a call.
    pub fn resolve(&self, raw: &str, position: usize) -> Result<Value, ArgumentError> {
        let invalid = || ArgumentError::Invalid {
            position,
            raw: raw.to_string(),
            expected: self.expected(),
        };

        match self {
            ArgumentSchema::Primitive {
                kind, validator, ..
            } => {
                let value = kind.parse(raw).ok_or_else(invalid)?;
                match validator {
                    Some(check) if !check(&value) => Err(ArgumentError::Rejected {
                        position,
                        raw: raw.to_string(),
                        expected: self.expected(),
                    }),
                    _ => Ok(value),
                }
            }
            ArgumentSchema::Values { kind } => kind.parse(raw).ok_or_else(invalid),
            ArgumentSchema::Enum { parse, .. } => parse(raw).map(Value::Enum).ok_or_else(invalid),
            ArgumentSchema::Targeter { allowed } => Targeter::from_identifier(raw)
                .filter(|t| allowed.contains(t.capability()))
                .map(Value::Targeter)
                .ok_or_else(invalid),
            ArgumentSchema::Manual { parse, .. } => parse(raw).ok_or_else(invalid),
        }
    }
}

impl fmt::Debug for ArgumentSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentSchema::Primitive {
                kind,
                validator,
                label,
            } => f
                .debug_struct("Primitive")
                .field("kind", kind)
                .field("validated", &validator.is_some())
                .field("label", label)
                .finish(),
            ArgumentSchema::Enum {
                enumeration, label, ..
            } => f
                .debug_struct("Enum")
                .field("enumeration", enumeration)
                .field("label", label)
                .finish(),
            ArgumentSchema::Targeter { allowed } => {
                f.debug_struct("Targeter").field("allowed", allowed).finish()
            }
            ArgumentSchema::Values { kind } => f.debug_struct("Values").field("kind", kind).finish(),
            ArgumentSchema::Manual { label, .. } => {
                f.debug_struct("Manual").field("label", label).finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Slot {
        Head,
        Feet,
    }

    impl ArgumentEnum for Slot {
        const NAME: &'static str = "slot";

        fn variants() -> &'static [Self] {
            &[Slot::Head, Slot::Feet]
        }

        fn variant_name(self) -> &'static str {
            match self {
                Slot::Head => "head",
                Slot::Feet => "feet",
            }
        }
    }

    fn non_negative(value: &Value) -> bool {
        value.as_f64().is_some_and(|v| v >= 0.0)
    }

    #[test]
    fn test_primitive_numbers() {
        assert_eq!(PrimitiveKind::Integer.parse("5"), Some(Value::Integer(5)));
        assert_eq!(PrimitiveKind::Integer.parse("5.5"), None);
        assert_eq!(PrimitiveKind::Double.parse("-10"), Some(Value::Double(-10.0)));
        assert_eq!(PrimitiveKind::Byte.parse("300"), None);
        assert_eq!(PrimitiveKind::Double.parse("NaN"), None);
        assert_eq!(PrimitiveKind::Double.parse("bogus"), None);
    }

    #[test]
    fn test_primitive_boolean_and_char() {
        assert_eq!(PrimitiveKind::Boolean.parse("TRUE"), Some(Value::Boolean(true)));
        assert_eq!(PrimitiveKind::Boolean.parse("yes"), None);
        assert_eq!(PrimitiveKind::Char.parse("x"), Some(Value::Char('x')));
        assert_eq!(PrimitiveKind::Char.parse("xy"), None);
        assert_eq!(PrimitiveKind::Char.parse(""), None);
    }

    #[test]
    fn test_string_color_codes() {
        assert_eq!(
            PrimitiveKind::String.parse("&aHello & bye"),
            Some(Value::String("§aHello & bye".to_string()))
        );
    }

    #[test]
    fn test_validated_primitive() {
        let schema = ArgumentSchema::validated(PrimitiveKind::Double, "damage", non_negative);

        assert_eq!(schema.resolve("5", 1), Ok(Value::Double(5.0)));
        assert_eq!(
            schema.resolve("-1", 1),
            Err(ArgumentError::Rejected {
                position: 1,
                raw: "-1".to_string(),
                expected: "damage".to_string(),
            })
        );
        assert_eq!(
            schema.resolve("lots", 1),
            Err(ArgumentError::Invalid {
                position: 1,
                raw: "lots".to_string(),
                expected: "damage".to_string(),
            })
        );
    }

    #[test]
    fn test_values_uses_type_name() {
        let schema = ArgumentSchema::values(PrimitiveKind::Integer);
        let err = schema.resolve("x", 0).unwrap_err();
        assert_eq!(err.to_string(), "argument 0: 'x' is not a valid integer");
    }

    #[test]
    fn test_enum_case_insensitive() {
        let schema = ArgumentSchema::enumeration::<Slot>("equipment slot");
        let value = schema.resolve("FEET", 2).unwrap();
        assert_eq!(value.as_enum::<Slot>(), Some(Slot::Feet));
        assert!(schema.resolve("hands", 2).is_err());
    }

    #[test]
    fn test_targeter_allowed_modes() {
        let schema = ArgumentSchema::targeter([Targeter::Player, Targeter::Entity]);

        assert_eq!(schema.resolve("@target", 0), Ok(Value::Targeter(Targeter::Entity)));
        assert!(schema.resolve("?block", 0).is_err());
        assert!(schema.resolve("nobody", 0).is_err());
        assert_eq!(schema.expected(), "targeter (?player, ?entity)");
    }

    #[test]
    fn test_manual_parser() {
        fn parse_even(raw: &str) -> Option<Value> {
            raw.parse::<i32>()
                .ok()
                .filter(|v| v % 2 == 0)
                .map(Value::Integer)
        }

        let schema = ArgumentSchema::manual("even number", parse_even);
        assert_eq!(schema.resolve("4", 0), Ok(Value::Integer(4)));
        assert!(schema.resolve("3", 0).is_err());
    }

    #[test]
    fn test_arguments_accessors() {
        let args = Arguments::new(vec![
            Value::Targeter(Targeter::Player),
            Value::Integer(3),
            Value::String("hi".to_string()),
        ]);

        assert_eq!(args.len(), 3);
        assert_eq!(args.targeter(0), Some(Targeter::Player));
        assert_eq!(args.double(1), Some(3.0));
        assert_eq!(args.integer(1), Some(3));
        assert_eq!(args.string(2), Some("hi"));
        assert_eq!(args.boolean(2), None);
        assert_eq!(args.targeters(), Capabilities::PLAYER);
    }
}
