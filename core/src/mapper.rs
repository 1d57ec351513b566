//! Field annotation to option type mapping.
//!
//! [`option_type`] is total: every annotation maps to something the
//! command-line layer can parse, falling back to plain text.

use crate::option::{Bounds, OptionType};
use crate::types::{Constraint, FieldDescriptor, FieldType};

/// Maps a field's annotation (and numeric markers) to an option type.
///
/// Rules, first match wins:
///
/// 1. `String`, `Bool`, `Uuid` map to themselves.
/// 2. `Int`/`Float` with at least one bound marker map to a range type,
///    otherwise to the bare numeric type.
/// 3. `Enum` maps to a choice over its members.
/// 4. `Date` and `DateTime` both map to the date-time type.
/// 5. Anything else maps to `String`.
///
/// # Examples
///
/// ```
/// use model_options_core::{option_type, Bounds, FieldDescriptor, FieldType, Limit, OptionType};
///
/// let port = FieldDescriptor::new("port", FieldType::Int).ge(1024).le(65535);
/// assert_eq!(
///     option_type(&port),
///     OptionType::IntRange(Bounds {
///         min: Some(Limit::Int(1024)),
///         max: Some(Limit::Int(65535)),
///         min_open: false,
///         max_open: false,
///     })
/// );
/// ```
pub fn option_type(field: &FieldDescriptor) -> OptionType {
    match &field.annotation {
        FieldType::String => OptionType::String,
        FieldType::Bool => OptionType::Bool,
        FieldType::Uuid => OptionType::Uuid,
        FieldType::Int | FieldType::Float => numeric_type(field),
        FieldType::Enum { members, .. } => OptionType::Choice(members.clone()),
        // A plain date still gets the date-time parser.
        FieldType::Date | FieldType::DateTime => OptionType::datetime(),
        FieldType::Other(_) => OptionType::String,
    }
}

fn numeric_type(field: &FieldDescriptor) -> OptionType {
    let bounds = collect_bounds(&field.metadata);
    let is_int = field.annotation == FieldType::Int;

    match (bounds.is_unbounded(), is_int) {
        (true, true) => OptionType::Int,
        (true, false) => OptionType::Float,
        (false, true) => OptionType::IntRange(bounds),
        (false, false) => OptionType::FloatRange(bounds),
    }
}

/// Folds constraint markers into bounds; the last marker per side wins.
fn collect_bounds(metadata: &[Constraint]) -> Bounds {
    let mut bounds = Bounds::default();
    for constraint in metadata {
        match *constraint {
            Constraint::Ge(limit) => {
                bounds.min = Some(limit);
                bounds.min_open = false;
            }
            Constraint::Gt(limit) => {
                bounds.min = Some(limit);
                bounds.min_open = true;
            }
            Constraint::Le(limit) => {
                bounds.max = Some(limit);
                bounds.max_open = false;
            }
            Constraint::Lt(limit) => {
                bounds.max = Some(limit);
                bounds.max_open = true;
            }
        }
    }
    bounds
}
