use bon::Builder;
use indexmap::IndexMap;
use serde::{de::Error, Deserialize, Deserializer};
use serde_json::Value;

/// A build target as declared in the configuration file.
///
/// Keys other than `images`, `labels`, `args` and `tags` are kept
/// in `extra` in declaration order and copied onto the generated
/// bake target untouched (e.g. `context`, `dockerfile`, `platforms`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Builder)]
pub struct TargetSpec {
    /// Image references that each receive every generated tag.
    pub images: Vec<String>,

    /// Labels that override the generated ones.
    #[serde(default, deserialize_with = "scalar_map")]
    pub labels: Option<IndexMap<String, String>>,

    /// Build args that override the generated ones.
    #[serde(default, deserialize_with = "scalar_map")]
    pub args: Option<IndexMap<String, String>>,

    /// Literal tags appended after the generated ones.
    pub tags: Option<Vec<String>>,

    #[serde(flatten)]
    #[builder(default)]
    pub extra: IndexMap<String, Value>,
}

/// Numbers and booleans are written unquoted in YAML, e.g.
/// `NODE_VERSION: 20`, and are kept as their string rendering.
fn scalar_map<'de, D>(deserializer: D) -> Result<Option<IndexMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(map) = Option::<IndexMap<String, Value>>::deserialize(deserializer)? else {
        return Ok(None);
    };

    map.into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) if n.is_f64() => n
                    .as_f64()
                    .map_or_else(|| n.to_string(), |f| f.to_string()),
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(D::Error::custom(format!(
                        "value of '{key}' must be a string, number or boolean, got {other}"
                    )))
                }
            };
            Ok((key, value))
        })
        .collect::<Result<_, _>>()
        .map(Some)
}

#[cfg(test)]
mod test {
    use docker_meta_utils::string_vec;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::TargetSpec;

    #[test]
    fn keeps_unknown_keys_in_order() {
        let target: TargetSpec = serde_json::from_value(json!({
            "images": ["a", "b"],
            "dockerfile": "Dockerfile.prod",
            "labels": { "x": "y" },
            "context": ".",
            "platforms": ["linux/amd64", "linux/arm64"],
        }))
        .unwrap();

        assert_eq!(target.images, string_vec!["a", "b"]);
        assert_eq!(
            target.labels,
            Some(IndexMap::from([("x".to_string(), "y".to_string())]))
        );
        assert_eq!(
            target.extra.keys().collect::<Vec<_>>(),
            vec!["dockerfile", "context", "platforms"]
        );
        assert_eq!(target.extra["platforms"], json!(["linux/amd64", "linux/arm64"]));
    }

    #[test]
    fn scalar_label_and_arg_values_become_strings() {
        let target: TargetSpec = serde_yaml::from_str(
            "images: [a]\nlabels:\n  release: true\nargs:\n  NODE_VERSION: 20\n  RATIO: 1.5\n  NAME: app\n",
        )
        .unwrap();

        assert_eq!(
            target.labels,
            Some(IndexMap::from([("release".to_string(), "true".to_string())]))
        );
        assert_eq!(
            target.args.unwrap().into_iter().collect::<Vec<_>>(),
            vec![
                ("NODE_VERSION".to_string(), "20".to_string()),
                ("RATIO".to_string(), "1.5".to_string()),
                ("NAME".to_string(), "app".to_string()),
            ]
        );
    }

    #[test]
    fn nested_arg_values_are_rejected() {
        let err = serde_json::from_value::<TargetSpec>(json!({
            "images": ["a"],
            "args": { "LIST": [1, 2] },
        }))
        .unwrap_err();

        assert!(err.to_string().contains("value of 'LIST' must be a string, number or boolean"));
    }

    #[test]
    fn images_are_required() {
        assert!(serde_json::from_value::<TargetSpec>(json!({ "tags": ["x"] })).is_err());
    }
}
