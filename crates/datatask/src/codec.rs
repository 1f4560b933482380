//! Canonical JSON encoding of a [`Task`].
//!
//! The encoding is itself a valid task description: decoding it normalizes
//! back to an equal task. Leaves are written `{reference: position}`, aliases
//! `{name: child}` and operators `{"$name": [args...]}`.

use crate::builder::Normalizer;
use crate::descriptor::OPERATOR_SIGIL;
use crate::error::Result;
use crate::expr::Expr;
use crate::reference::ReferenceTable;
use crate::schema::InputColumn;
use crate::task::Task;
use crate::value::RawValue;

/// Render a task as compact canonical JSON.
///
/// # Errors
///
/// Fails only if the JSON serializer fails.
pub fn encode(task: &Task) -> serde_json::Result<String> {
    serde_json::to_string(&task.to_raw())
}

/// Render a task as indented canonical JSON.
///
/// # Errors
///
/// Fails only if the JSON serializer fails.
pub fn encode_pretty(task: &Task) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&task.to_raw())
}

/// Parse and normalize a task description with default limits.
///
/// Text encoded from a task built under larger limits must be decoded with
/// [`Normalizer::decode`] and the same limits.
///
/// # Errors
///
/// Returns [`crate::Error::Parse`] for invalid JSON, or the first validation
/// error found in the description.
pub fn decode(text: &str) -> Result<Task> {
    Normalizer::default().decode(text)
}

impl Normalizer {
    /// Parse and normalize a task description under this normalizer's limits.
    ///
    /// Accepts any description, canonical or not; for every task `t` built by
    /// this normalizer, `decode(encode(t)) == t`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Parse`] for invalid JSON, or the first
    /// validation error found in the description.
    pub fn decode(&self, text: &str) -> Result<Task> {
        self.normalize_json(text)
    }
}

impl Task {
    /// The canonical description of this task as a raw value tree.
    #[must_use]
    pub fn to_raw(&self) -> RawValue {
        let references = self.resources();
        let mut root = Vec::with_capacity(3);

        if !references.is_empty() {
            root.push((
                "resources",
                RawValue::mapping(references.iter().map(|(k, v)| (k, RawValue::from(v)))),
            ));
        }

        let inputs = self.inputs().iter().map(|(locator, input)| {
            let schema = input.schema().iter().map(InputColumn::to_raw).collect::<Vec<_>>();
            (
                reference_key(references, locator),
                specification(schema, input.header()),
            )
        });
        root.push(("inputs", RawValue::mapping(inputs)));

        let outputs = self.outputs().iter().map(|(locator, output)| {
            let schema = output
                .schema()
                .iter()
                .map(|expr| descriptor(references, expr))
                .collect::<Vec<_>>();
            (
                reference_key(references, locator),
                specification(schema, output.header()),
            )
        });
        root.push(("outputs", RawValue::mapping(outputs)));

        RawValue::mapping(root)
    }

    /// Compact canonical JSON; see [`encode`].
    ///
    /// # Errors
    ///
    /// Fails only if the JSON serializer fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        encode(self)
    }

    /// Indented canonical JSON; see [`encode_pretty`].
    ///
    /// # Errors
    ///
    /// Fails only if the JSON serializer fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        encode_pretty(self)
    }
}

fn specification(schema: Vec<RawValue>, header: bool) -> RawValue {
    RawValue::mapping([
        ("schema", RawValue::from(schema)),
        ("header", RawValue::from(header)),
    ])
}

fn descriptor(references: &ReferenceTable, expr: &Expr) -> RawValue {
    match expr {
        Expr::Column(column) => RawValue::mapping([(
            reference_key(references, &column.resource),
            RawValue::from(column.column),
        )]),
        Expr::Alias { name, child } => {
            RawValue::mapping([(name.clone(), descriptor(references, child))])
        }
        Expr::Operator { operator, args } => RawValue::mapping([(
            format!("{OPERATOR_SIGIL}{operator}"),
            RawValue::from(
                args.iter()
                    .map(|arg| descriptor(references, arg))
                    .collect::<Vec<_>>(),
            ),
        )]),
    }
}

/// The key to write for `locator` so that it resolves back to `locator`.
///
/// Normalization guarantees a key exists for every input. Output locators
/// only appear as `outputs` keys, where a sigil is not an operator.
fn reference_key(references: &ReferenceTable, locator: &str) -> String {
    references
        .descriptor_key(locator)
        .unwrap_or(locator)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVENTORY: &str = r#"{
        "resources": {"inv": "https://x/inventory.csv", "rep": "/r.csv"},
        "inputs": {"inv": {"schema": ["item", "quantity", "price"], "header": true}},
        "outputs": {"rep": [{"inv": 0}, {"cost": {"$mul": [{"inv": "quantity"}, {"inv": 2}]}}]}
    }"#;

    #[test]
    fn test_encode_shape() {
        let task = Task::from_json(INVENTORY).unwrap();
        let json: serde_json::Value = serde_json::from_str(&encode(&task).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "resources": {"inv": "https://x/inventory.csv", "rep": "/r.csv"},
                "inputs": {
                    "https://x/inventory.csv": {"schema": ["item", "quantity", "price"], "header": true}
                },
                "outputs": {
                    "/r.csv": {
                        "schema": [
                            {"https://x/inventory.csv": 0},
                            {"cost": {"$mul": [
                                {"https://x/inventory.csv": 1},
                                {"https://x/inventory.csv": 2}
                            ]}}
                        ],
                        "header": false
                    }
                }
            })
        );
    }

    #[test]
    fn test_round_trip() {
        let task = Task::from_json(INVENTORY).unwrap();
        assert_eq!(decode(&encode(&task).unwrap()).unwrap(), task);
        assert_eq!(decode(&task.to_json_pretty().unwrap()).unwrap(), task);
    }

    #[test]
    fn test_empty_resources_are_omitted() {
        let task = Task::from_json(r#"{"inputs": ["a.csv"]}"#).unwrap();
        assert_eq!(
            task.to_json().unwrap(),
            r#"{"inputs":{"a.csv":{"schema":[],"header":false}},"outputs":{}}"#
        );
    }

    #[test]
    fn test_shadowed_locator_uses_reference() {
        // "a.csv" is both a locator and a reference to another locator
        let task = Task::from_json(
            r#"{"resources": {"a.csv": "b.csv", "x": "a.csv"},
                "inputs": {"x": ["id"], "a.csv": ["key"]},
                "outputs": {"o": [{"x": "id"}, {"a.csv": "key"}]}}"#,
        )
        .unwrap();
        let text = encode(&task).unwrap();
        assert!(text.contains(r#""x":{"schema":["id"]"#));
        assert_eq!(decode(&text).unwrap(), task);
    }

    #[test]
    fn test_round_trip_under_raised_depth_limit() {
        let leaf = serde_json::json!({"i": "x"});
        let chain = (0..70).fold(leaf, |child, level| {
            serde_json::json!({ format!("a{level}"): child })
        });
        let text =
            serde_json::json!({"inputs": {"i": ["x"]}, "outputs": {"o": [chain]}}).to_string();

        let normalizer = Normalizer::builder().max_depth(100).build();
        let task = normalizer.decode(&text).unwrap();
        let encoded = encode(&task).unwrap();

        assert_eq!(normalizer.decode(&encoded).unwrap(), task);
        assert!(matches!(
            decode(&encoded).unwrap_err(),
            crate::Error::ExpressionTooDeep { limit: 64, .. }
        ));
    }

    #[test]
    fn test_sigil_reference_is_not_used_for_leaves() {
        let task = Task::from_json(
            r#"{"resources": {"$s": "$data.csv", "s": "$data.csv"},
                "inputs": {"$s": ["v"]},
                "outputs": {"$data.csv": ["v"]}}"#,
        )
        .unwrap();
        let text = encode(&task).unwrap();
        assert!(text.contains(r#""inputs":{"s":"#));
        assert!(text.contains(r#"{"s":0}"#));
        assert_eq!(decode(&text).unwrap(), task);
    }

    #[test]
    fn test_sigil_locator_uses_reference() {
        let task = Task::from_json(
            r#"{"resources": {"s": "$data.csv"},
                "inputs": {"s": ["v"]},
                "outputs": {"o": [{"s": "v"}]}}"#,
        )
        .unwrap();
        let text = encode(&task).unwrap();
        assert!(text.contains(r#"{"s":0}"#));
        assert_eq!(decode(&text).unwrap(), task);
    }
}
