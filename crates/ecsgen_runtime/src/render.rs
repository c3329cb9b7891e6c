//! Diagnostic rendering of component values.
//!
//! One field renders as the bare value. Several fields render as
//! `|Name -> a: 1, b: 2|`. This is a display contract, not a format anyone
//! should parse.

use std::fmt::{Display, Write};

pub fn render_fields(component: &str, fields: &[(&str, &dyn Display)]) -> String {
    match fields {
        [] => component.to_string(),
        [(_, value)] => value.to_string(),
        _ => {
            let mut out = format!("|{component} -> ");
            for (i, (name, value)) in fields.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                // Writing to a String cannot fail.
                let _ = write!(out, "{name}: {value}");
            }
            out.push('|');
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_field_is_bare_value() {
        let fields: [(&str, &dyn Display); 1] = [("value", &42)];
        assert_eq!(render_fields("Health", &fields), "42");
    }

    #[test]
    fn test_many_fields_are_delimited() {
        let fields: [(&str, &dyn Display); 2] = [("x", &1.5), ("y", &-2)];
        assert_eq!(
            render_fields("Position", &fields),
            "|Position -> x: 1.5, y: -2|"
        );
    }

    #[test]
    fn test_tag_renders_name() {
        assert_eq!(render_fields("Frozen", &[]), "Frozen");
    }
}
