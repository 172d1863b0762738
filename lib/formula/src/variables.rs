use std::collections::HashMap;

use log::debug;

use crate::token::parse_identifier;

/// Replaces every identifier in `expression` with its value from `variables`
///
/// Identifiers with no value are left as they are, the tokenizer later
/// skips them.
pub fn substitute(expression: &str, variables: &HashMap<String, f64>) -> String {
    let mut output = String::with_capacity(expression.len());
    let mut remaining = expression;

    while let Some(c) = remaining.chars().next() {
        match parse_identifier(remaining) {
            Ok((rest, name)) => {
                match variables.get(name) {
                    Some(value) => output.push_str(&value.to_string()),
                    None => {
                        debug!("No value for variable \"{}\"", name);
                        output.push_str(name)
                    }
                }
                remaining = rest;
            }
            Err(_) => {
                output.push(c);
                remaining = &remaining[c.len_utf8()..];
            }
        }
    }
    output
}
