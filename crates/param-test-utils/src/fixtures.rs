//! Sample configuration files.

use param_tree::{Mapping, Scalar, ValueNode};

/// A YAML file exercising scalars, nested maps and sequences of both.
pub const BASIC_YAML: &str = r#"some_snake_case_setting: bar
someCamelCaseSetting: foo
a_number: 45
a_float: 3.14
a_string: foobar
some_sub_config:
  name: Joseph
  an_array:
    - white
    - orange
array_with_hash:
  name: Sebastian
  an_array:
    - keyone: 10
    - keytwo: 11
"#;

/// A flat properties file
pub const BASIC_PROPERTIES: &str = "# people\nname = Sebastian\nfamily: Wilson\n";

/// Keys of [`BASIC_YAML`] after flattening, in document order.
pub const BASIC_YAML_KEYS: &[&str] = &[
    "some_snake_case_setting",
    "someCamelCaseSetting",
    "a_number",
    "a_float",
    "a_string",
    "some_sub_config/name",
    "some_sub_config/an_array/0",
    "some_sub_config/an_array/1",
    "array_with_hash/name",
    "array_with_hash/an_array/0/keyone",
    "array_with_hash/an_array/1/keytwo",
];

fn map<const N: usize>(entries: [(&str, ValueNode); N]) -> ValueNode {
    ValueNode::Map(
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect::<Mapping>(),
    )
}

fn string(value: &str) -> ValueNode {
    ValueNode::Scalar(Scalar::from(value))
}

/// The tree [`BASIC_YAML`] comes back as after a push and restore.
///
/// The store only holds strings, so every leaf is a string scalar.
pub fn basic_yaml_restored() -> ValueNode {
    map([
        ("some_snake_case_setting", string("bar")),
        ("someCamelCaseSetting", string("foo")),
        ("a_number", string("45")),
        ("a_float", string("3.14")),
        ("a_string", string("foobar")),
        (
            "some_sub_config",
            map([
                ("name", string("Joseph")),
                (
                    "an_array",
                    ValueNode::Sequence(vec![string("white"), string("orange")]),
                ),
            ]),
        ),
        (
            "array_with_hash",
            map([
                ("name", string("Sebastian")),
                (
                    "an_array",
                    ValueNode::Sequence(vec![
                        map([("keyone", string("10"))]),
                        map([("keytwo", string("11"))]),
                    ]),
                ),
            ]),
        ),
    ])
}
