//! `number`/`integer` keyword set (§4.4.3). Both type names dispatch to the
//! same node; `require_integer` distinguishes them. `multipleOf` tolerates
//! one ULP of floating-point error rather than demanding exact divisibility.

use schema_core::{Reporter, ValidationOutput};
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct NumberNode {
    pub require_integer: bool,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    pub multiple_of: Option<f64>,
}

impl NumberNode {
    pub fn validate(
        &self,
        instance: &Value,
        location: &str,
        absolute_keyword_location: &str,
        reporter: &mut dyn Reporter,
    ) {
        let Value::Number(n) = instance else { return };
        let value = match n.as_f64() {
            Some(v) => v,
            None => return,
        };

        if self.require_integer && !is_lossless_integer(n, value) {
            reporter.error(ValidationOutput::new(
                location,
                "instance is not a number representable as an integer",
                "type",
                absolute_keyword_location,
            ));
            return;
        }

        if let Some(min) = self.minimum {
            if value < min {
                reporter.error(ValidationOutput::new(
                    location,
                    format!("{value} is less than the minimum of {min}"),
                    "minimum",
                    absolute_keyword_location,
                ));
            }
        }
        if let Some(max) = self.maximum {
            if value > max {
                reporter.error(ValidationOutput::new(
                    location,
                    format!("{value} is greater than the maximum of {max}"),
                    "maximum",
                    absolute_keyword_location,
                ));
            }
        }
        if let Some(min) = self.exclusive_minimum {
            if value <= min {
                reporter.error(ValidationOutput::new(
                    location,
                    format!("{value} is not strictly greater than {min}"),
                    "exclusiveMinimum",
                    absolute_keyword_location,
                ));
            }
        }
        if let Some(max) = self.exclusive_maximum {
            if value >= max {
                reporter.error(ValidationOutput::new(
                    location,
                    format!("{value} is not strictly less than {max}"),
                    "exclusiveMaximum",
                    absolute_keyword_location,
                ));
            }
        }
        if let Some(divisor) = self.multiple_of {
            if divisor != 0.0 && !is_multiple_of(value, divisor) {
                reporter.error(ValidationOutput::new(
                    location,
                    format!("{value} is not a multiple of {divisor}"),
                    "multipleOf",
                    absolute_keyword_location,
                ));
            }
        }
    }
}

fn is_lossless_integer(n: &serde_json::Number, value: f64) -> bool {
    if n.is_i64() || n.is_u64() {
        return true;
    }
    value.is_finite()
        && value.fract() == 0.0
        && value >= i64::MIN as f64
        && value <= i64::MAX as f64
        && (value as i64) as f64 == value
}

/// `|remainder(value, divisor)| <= |nextafter(value, 0) - value|`, i.e. a
/// tolerance of one ULP of `value`.
fn is_multiple_of(value: f64, divisor: f64) -> bool {
    let remainder = value - divisor * (value / divisor).round();
    remainder.abs() <= next_toward_zero(value).abs()
}

fn next_toward_zero(value: f64) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    let bits = value.to_bits();
    let next_bits = if value > 0.0 { bits - 1 } else { bits + 1 };
    (f64::from_bits(next_bits) - value).abs()
}

#[cfg(test)]
mod test {
    use super::*;
    use schema_core::CollectingReporter;
    use serde_json::json;

    fn check(node: &NumberNode, value: Value) -> CollectingReporter {
        let mut reporter = CollectingReporter::new();
        node.validate(&value, "", "#", &mut reporter);
        reporter
    }

    #[test]
    fn minimum_and_maximum_bound_inclusively() {
        let node = NumberNode { minimum: Some(0.0), maximum: Some(10.0), ..Default::default() };
        assert!(check(&node, json!(0)).is_empty());
        assert!(check(&node, json!(10)).is_empty());
        assert!(!check(&node, json!(-1)).is_empty());
        assert!(!check(&node, json!(11)).is_empty());
    }

    #[test]
    fn exclusive_bounds_reject_the_boundary_value() {
        let node = NumberNode { exclusive_minimum: Some(0.0), ..Default::default() };
        assert!(!check(&node, json!(0)).is_empty());
        assert!(check(&node, json!(0.001)).is_empty());
    }

    #[test]
    fn multiple_of_tolerates_float_rounding() {
        let node = NumberNode { multiple_of: Some(0.1), ..Default::default() };
        assert!(check(&node, json!(0.3)).is_empty());
        assert!(!check(&node, json!(0.35)).is_empty());
    }

    #[test]
    fn require_integer_rejects_non_lossless_float() {
        let node = NumberNode { require_integer: true, ..Default::default() };
        assert!(check(&node, json!(4)).is_empty());
        assert!(check(&node, json!(4.0)).is_empty());
        assert!(!check(&node, json!(4.5)).is_empty());
    }

    #[test]
    fn zero_is_a_multiple_of_every_divisor() {
        let node = NumberNode { multiple_of: Some(7.0), ..Default::default() };
        assert!(check(&node, json!(0)).is_empty());
    }
}
