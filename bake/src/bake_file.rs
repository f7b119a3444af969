use indexmap::IndexMap;
use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The document consumed by `docker buildx bake -f`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BakeFile {
    pub target: IndexMap<String, BakeTarget>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<IndexMap<String, Value>>,
}

/// One generated bake target.
///
/// Keys are serialized as `tags`, `labels`, `args` and then
/// every passthrough key of the declared target in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BakeTarget {
    pub tags: Vec<String>,
    pub labels: IndexMap<String, String>,
    pub args: IndexMap<String, String>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl BakeFile {
    /// Renders the bake file as JSON indented by two spaces.
    ///
    /// # Errors
    /// Will error if a passthrough value can't be serialized.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).into_diagnostic()
    }
}

#[cfg(test)]
mod test {
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{BakeFile, BakeTarget};

    #[test]
    fn serializes_passthrough_after_generated_keys() {
        let bake = BakeFile {
            target: IndexMap::from([(
                "app".to_string(),
                BakeTarget {
                    tags: vec!["a:1".to_string()],
                    labels: IndexMap::from([("l".to_string(), "v".to_string())]),
                    args: IndexMap::from([("BRANCH".to_string(), "main".to_string())]),
                    extra: IndexMap::from([
                        ("dockerfile".to_string(), json!("Dockerfile")),
                        ("context".to_string(), json!(".")),
                    ]),
                },
            )]),
            group: None,
        };

        assert_eq!(
            bake.to_json_pretty().unwrap(),
            r#"{
  "target": {
    "app": {
      "tags": [
        "a:1"
      ],
      "labels": {
        "l": "v"
      },
      "args": {
        "BRANCH": "main"
      },
      "dockerfile": "Dockerfile",
      "context": "."
    }
  }
}"#
        );
    }

    #[test]
    fn empty_collections_are_kept() {
        let bake = BakeFile {
            target: IndexMap::from([("app".to_string(), BakeTarget::default())]),
            group: Some(IndexMap::new()),
        };

        assert_eq!(
            serde_json::to_value(&bake).unwrap(),
            json!({
                "target": { "app": { "tags": [], "labels": {}, "args": {} } },
                "group": {},
            })
        );
    }
}
