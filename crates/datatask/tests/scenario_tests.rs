//! End-to-end normalization of complete task descriptions

use datatask::{ColumnRef, Error, Expr, InputColumn, Task};

fn column(resource: &str, column: usize) -> Expr {
    Expr::Column(ColumnRef {
        resource: resource.to_string(),
        column,
    })
}

/// Inputs and outputs listed without any schema are placeholders
#[test]
fn test_placeholder_resources() {
    let task = Task::from_json(r#"{"inputs": ["transactions.csv"], "outputs": ["report.csv"]}"#)
        .unwrap();

    let input = &task.inputs()["transactions.csv"];
    assert!(input.schema().is_empty());
    assert!(!input.header());

    let output = &task.outputs()["report.csv"];
    assert!(output.schema().is_empty());
    assert!(!output.header());
    assert!(task.resources().is_empty());
}

/// Symbolic references resolve to their locators everywhere
#[test]
fn test_symbolic_references() {
    let task = Task::from_json(
        r#"{
            "resources": {"inv": "https://x/inventory.csv", "rep": "/r.csv"},
            "inputs": {"inv": ["item", "quantity", "price"]},
            "outputs": {"rep": [{"inv": 0}, {"inv": 1}]}
        }"#,
    )
    .unwrap();

    assert_eq!(
        task.outputs()["/r.csv"].schema(),
        [
            column("https://x/inventory.csv", 0),
            column("https://x/inventory.csv", 1)
        ]
    );
    assert_eq!(task.input("inv").unwrap().schema().len(), 3);
}

/// Aliases and operators nest around leaf columns
#[test]
fn test_alias_around_operator() {
    let task = Task::from_json(
        r#"{
            "inputs": {"inv": ["item", "quantity", "price"]},
            "outputs": {"rep": [
                {"item": {"inv": "item"}},
                {"cost": {"$mul": [{"inv": "quantity"}, {"inv": "price"}]}}
            ]}
        }"#,
    )
    .unwrap();

    let schema = task.outputs()["rep"].schema();
    assert_eq!(
        schema[0],
        Expr::Alias {
            name: "item".to_string(),
            child: Box::new(column("inv", 0)),
        }
    );
    assert_eq!(
        schema[1],
        Expr::Alias {
            name: "cost".to_string(),
            child: Box::new(Expr::Operator {
                operator: "mul".to_string(),
                args: vec![column("inv", 1), column("inv", 2)],
            }),
        }
    );
}

#[test]
fn test_missing_column_fails() {
    let err = Task::from_json(r#"{"inputs": {"inv": ["item"]}, "outputs": {"rep": [{"inv": "missing"}]}}"#)
        .unwrap_err();
    assert!(matches!(err, Error::UnknownColumn { .. }), "{err}");
}

#[test]
fn test_operator_without_arguments_fails() {
    let err = Task::from_json(r#"{"inputs": [], "outputs": {"rep": [{"$op": []}]}}"#).unwrap_err();
    match err {
        Error::MalformedOperator { operator, path, .. } => {
            assert_eq!(operator, "$op");
            assert_eq!(path.to_string(), "outputs.rep[0].$op");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_columns_selected_from_reference_table_output() {
    let task = Task::from_json(
        r#"{
            "resources": {"abc": "https://examples.org/abc.txt", "xyz": "xyz.txt"},
            "inputs": {"abc": ["column"]},
            "outputs": {"xyz": [{"abc": "column"}]}
        }"#,
    )
    .unwrap();
    assert_eq!(
        task.outputs()["xyz.txt"].schema(),
        [column("https://examples.org/abc.txt", 0)]
    );
}

#[test]
fn test_literal_input_with_symbolic_output() {
    let task = Task::from_json(
        r#"{
            "resources": {"xyz": "xyz.csv"},
            "inputs": {"abc.csv": ["a", "b", "c"]},
            "outputs": {"xyz": {"schema": [{"abc.csv": 2}, {"abc.csv": "b"}], "header": true}}
        }"#,
    )
    .unwrap();
    let output = task.output("xyz").unwrap();
    assert!(output.header());
    assert_eq!(output.schema(), [column("abc.csv", 2), column("abc.csv", 1)]);
}

#[test]
fn test_input_specification_forms() {
    let task = Task::from_json(
        r#"{
            "inputs": {
                "abc.txt": ["a", "b", "c"],
                "def.csv": {},
                "ghi.csv": {"schema": ["x", 1], "header": true}
            },
            "outputs": {"xyz.txt": []}
        }"#,
    )
    .unwrap();

    assert_eq!(task.inputs().len(), 3);
    assert!(task.inputs()["def.csv"].schema().is_empty());
    let ghi = &task.inputs()["ghi.csv"];
    assert!(ghi.header());
    assert_eq!(
        ghi.schema(),
        [InputColumn::Name("x".to_string()), InputColumn::Index(1)]
    );
}

#[test]
fn test_inputs_without_outputs() {
    let task = Task::from_json(r#"{"inputs": {"abc.txt": {"header": true}}}"#).unwrap();
    assert!(task.outputs().is_empty());
    assert!(task.inputs()["abc.txt"].header());
}

#[test]
fn test_explicitly_empty_outputs_are_accepted() {
    let task = Task::from_json(r#"{"inputs": {"abc.txt": ["x"]}, "outputs": {}}"#).unwrap();
    assert!(task.outputs().is_empty());

    // Input-only tasks encode with an empty outputs mapping
    let encoded = datatask::encode(&task).unwrap();
    assert!(encoded.ends_with(r#""outputs":{}}"#));
    assert_eq!(datatask::decode(&encoded).unwrap(), task);
}

#[test]
fn test_empty_descriptions_fail() {
    for json in ["{}", r#"{"outputs": {}}"#, r#"{"inputs": {}, "outputs": []}"#] {
        assert!(
            matches!(Task::from_json(json).unwrap_err(), Error::EmptyTask),
            "{json}"
        );
    }
}

#[test]
fn test_output_column_may_read_any_input() {
    let task = Task::from_json(
        r#"{
            "inputs": {"a.csv": ["id", "x"], "b.csv": ["id", "y"]},
            "outputs": {"joined.csv": [
                {"id": {"a.csv": "id"}},
                {"$add": [{"a.csv": "x"}, {"b.csv": "y"}]}
            ]}
        }"#,
    )
    .unwrap();

    let lineage = task.lineage("joined.csv").unwrap();
    assert_eq!(lineage[0].name, Some("id"));
    assert_eq!(lineage[1].name, None);
    assert_eq!(
        lineage[1].sources,
        [
            &ColumnRef {
                resource: "a.csv".to_string(),
                column: 1
            },
            &ColumnRef {
                resource: "b.csv".to_string(),
                column: 1
            }
        ]
    );
}

#[test]
fn test_double_alias_keeps_outer_name() {
    let task = Task::from_json(
        r#"{"inputs": {"i": ["a"]}, "outputs": {"o": [{"outer": {"inner": {"i": "a"}}}]}}"#,
    )
    .unwrap();
    let expr = &task.outputs()["o"].schema()[0];
    assert_eq!(expr.name(), Some("outer"));
    assert_eq!(expr.depth(), 3);
}

#[test]
fn test_operator_names_are_opaque() {
    let task = Task::from_json(
        r#"{"inputs": {"i": ["a"]}, "outputs": {"o": [{"$some-future_op.v2": ["a"]}]}}"#,
    );
    // "a" is a home column of "o", which is not an input
    assert!(matches!(task.unwrap_err(), Error::UnknownColumn { .. }));

    let task = Task::from_json(
        r#"{"inputs": {"i": ["a"]}, "outputs": {"o": [{"$some-future_op.v2": [{"i": "a"}]}]}}"#,
    )
    .unwrap();
    assert_eq!(
        task.outputs()["o"].schema()[0],
        Expr::Operator {
            operator: "some-future_op.v2".to_string(),
            args: vec![column("i", 0)],
        }
    );
}
