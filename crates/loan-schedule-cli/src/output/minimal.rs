use serde_json::Value;

use super::{payload, scalar_text};

/// Headline figure of each command, in the order they are looked for.
const PRIORITY_KEYS: [&str; 4] = ["scheduled_payment", "updated", "unapplied", "outcome"];

/// Print just the headline answer: the installment payment for schedules,
/// the update count for sweeps, the unapplied remainder for payments and
/// the accrued amount for single accruals.
pub fn print_minimal(value: &Value) {
    let body = payload(value);

    if let Value::Object(map) = body {
        for key in PRIORITY_KEYS {
            match map.get(key) {
                Some(Value::Object(outcome)) => {
                    let kind = outcome.get("outcome").map(scalar_text).unwrap_or_default();
                    match outcome.get("amount") {
                        Some(amount) => println!("{} {}", kind, scalar_text(amount)),
                        None => println!("{}", kind),
                    }
                    return;
                }
                Some(val) if !val.is_null() => {
                    println!("{}", scalar_text(val));
                    return;
                }
                _ => {}
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar_text(val));
            return;
        }
    }

    println!("{}", scalar_text(body));
}
