//! Filter settings: config file defaults merged with command-line flags.
//!
//! The config file is JSON or YAML, chosen by extension (`.yaml`/`.yml` is
//! YAML, anything else JSON):
//!
//! ```yaml
//! by: [name, email]   # or "name,email"
//! tags: [labels]
//! strict: true
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value as Json;
use sift::{fold, FilterBy, Matcher, Value};
use tracing::debug;

use crate::args::Args;

/// `by` accepts a comma-separated string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ByConfig {
    Spec(String),
    List(Vec<String>),
}

/// Contents of a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub by: Option<ByConfig>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub strict: Option<bool>,
}

impl FileConfig {
    /// Loads a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text, is_yaml(path))
            .with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parses config text.
    pub fn parse(text: &str, yaml: bool) -> Result<Self> {
        if yaml {
            Ok(serde_yaml::from_str(text)?)
        } else {
            Ok(serde_json::from_str(text)?)
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}

/// Effective filter settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Properties matched with the built-in folded substring test.
    pub by: Vec<String>,
    /// Array properties searched element by element.
    pub tags: Vec<String>,
    /// Strings only.
    pub strict: bool,
}

impl Settings {
    /// Merges the config file named by `--config` (if any) with the flags.
    ///
    /// Non-empty `--by` / `--tag` replace the file's lists; `--strict`
    /// turns strict mode on regardless of the file.
    pub fn resolve(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let by = if args.by.is_empty() {
            match &file.by {
                Some(ByConfig::Spec(spec)) => parse_names(spec)?,
                Some(ByConfig::List(list)) => list_names(list)?,
                None => Vec::new(),
            }
        } else {
            parse_names(&args.by.join(","))?
        };

        let tags = if args.tags.is_empty() {
            file.tags
        } else {
            args.tags.clone()
        };

        let settings = Settings {
            by,
            tags,
            strict: args.strict || file.strict.unwrap_or(false),
        };
        debug!(?settings, "resolved filter settings");
        Ok(settings)
    }

    /// Builds the strategy: property matchers first, then tag matchers.
    pub fn filter_by(&self) -> FilterBy<Json> {
        match (self.by.as_slice(), self.tags.is_empty()) {
            ([], true) => FilterBy::None,
            ([name], true) => FilterBy::property(name.as_str()),
            (names, _) => FilterBy::Matchers(
                names
                    .iter()
                    .map(|name| Matcher::property(name.as_str()))
                    .chain(self.tags.iter().map(|tag| tag_matcher(tag)))
                    .collect(),
            ),
        }
    }

    /// Replaces the property list from a comma-separated spec.
    pub fn set_by(&mut self, spec: &str) -> Result<()> {
        self.by = parse_names(spec)?;
        Ok(())
    }
}

/// Validates a comma-separated property spec and returns its names.
fn parse_names(spec: &str) -> Result<Vec<String>> {
    let parsed: FilterBy<Json> = spec
        .parse()
        .with_context(|| format!("invalid property list '{spec}'"))?;
    Ok(owned_names(&parsed))
}

/// Validates a config list entry by entry; commas inside a name are kept.
fn list_names(list: &[String]) -> Result<Vec<String>> {
    let parsed: FilterBy<Json> = FilterBy::from_names(list)
        .with_context(|| format!("invalid property list {list:?}"))?;
    Ok(owned_names(&parsed))
}

fn owned_names(filter_by: &FilterBy<Json>) -> Vec<String> {
    filter_by
        .property_names()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Matches when any string element of the array property `name` contains
/// the query, case-insensitively.
pub fn tag_matcher(name: &str) -> Matcher<Json> {
    let property = name.to_string();
    Matcher::custom(name, move |_: &Value<'_>, query: &str, item: &Json| {
        let query = fold(query);
        item.get(property.as_str())
            .and_then(Json::as_array)
            .is_some_and(|elements| {
                elements
                    .iter()
                    .filter_map(Json::as_str)
                    .any(|element| fold(element).contains(&query))
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use std::io::Write;

    fn args(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("sift").chain(argv.iter().copied()))
    }

    #[test]
    fn parses_json_config() {
        let config = FileConfig::parse(r#"{"by": "name,email", "strict": true}"#, false).unwrap();
        assert_eq!(config.by, Some(ByConfig::Spec("name,email".to_string())));
        assert_eq!(config.strict, Some(true));
    }

    #[test]
    fn parses_yaml_config() {
        let config = FileConfig::parse("by: [name, email]\ntags: [labels]\n", true).unwrap();
        assert_eq!(
            config.by,
            Some(ByConfig::List(vec!["name".to_string(), "email".to_string()]))
        );
        assert_eq!(config.tags, vec!["labels"]);
        assert_eq!(config.strict, None);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(FileConfig::parse(r#"{"sort": "name"}"#, false).is_err());
    }

    #[test]
    fn flags_override_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "by: title\nstrict: true").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let from_file = Settings::resolve(&args(&["-c", path.as_str()])).unwrap();
        assert_eq!(from_file.by, vec!["title"]);
        assert!(from_file.strict);

        let overridden =
            Settings::resolve(&args(&["-c", path.as_str(), "--by", "name,email"])).unwrap();
        assert_eq!(overridden.by, vec!["name", "email"]);
        assert!(overridden.strict);
    }

    #[test]
    fn config_list_keeps_commas_in_names() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"by": ["last,first", "email"]}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let settings = Settings::resolve(&args(&["-c", path.as_str()])).unwrap();
        assert_eq!(settings.by, vec!["last,first", "email"]);

        let items = vec![
            json!({"last,first": "Lee, Ann", "email": "x@y.z"}),
            json!({"last": "Ann", "first": "Bob", "email": "b@y.z"}),
        ];
        assert_eq!(sift::positions("ann", &items, &settings.filter_by(), false), vec![0]);
    }

    #[test]
    fn config_list_rejects_duplicates() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "by: [name, ' name']").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let err = Settings::resolve(&args(&["-c", path.as_str()])).unwrap_err();
        assert!(format!("{err:#}").contains("more than once"));
    }

    #[test]
    fn missing_config_is_an_error() {
        let err = Settings::resolve(&args(&["-c", "/definitely/not/here.json"])).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config"));
    }

    #[test]
    fn invalid_property_list_is_an_error() {
        let err = Settings::resolve(&args(&["--by", "name,,email"])).unwrap_err();
        assert!(format!("{err:#}").contains("empty property name"));
    }

    #[test]
    fn strategy_shapes() {
        let none = Settings::default();
        assert_eq!(none.filter_by().kind(), "none");

        let one = Settings {
            by: vec!["name".to_string()],
            ..Settings::default()
        };
        assert_eq!(one.filter_by().kind(), "property");

        let tagged = Settings {
            by: vec!["name".to_string()],
            tags: vec!["labels".to_string()],
            strict: false,
        };
        match tagged.filter_by() {
            FilterBy::Matchers(list) => {
                let names: Vec<&str> = list.iter().map(Matcher::name).collect();
                assert_eq!(names, vec!["name", "labels"]);
            }
            other => panic!("unexpected strategy {other:?}"),
        }
    }

    #[test]
    fn tag_matcher_searches_array_elements() {
        let items = vec![
            json!({"name": "a", "labels": ["Urgent", "home"]}),
            json!({"name": "b", "labels": "urgent"}),
            json!({"name": "c"}),
        ];
        let strategy = FilterBy::matchers([tag_matcher("labels")]);
        assert_eq!(sift::positions("URG", &items, &strategy, true), vec![0]);
    }

    #[test]
    fn set_by_replaces_properties() {
        let mut settings = Settings::default();
        settings.set_by("a, b").unwrap();
        assert_eq!(settings.by, vec!["a", "b"]);
        settings.set_by("").unwrap();
        assert!(settings.by.is_empty());
        assert!(settings.set_by("a,a").is_err());
    }
}
