use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

use super::StatsError;

/// Partial field update emitted by an editor. Shallow-merged into a record.
pub type StatPatch = Map<String, Value>;

/// Process-local identity of a record.
///
/// Two records with identical contents are still different records; updates and
/// removals target a key, never a value. Keys are not persisted: every record gets a
/// fresh one when it is built or deserialized, and keeps it across clones and patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKey(Uuid);

impl RecordKey {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for RecordKey {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// One stat record owned by a player.
///
/// `id` is the stat-type identifier shared by every record of the same plugin; it is
/// the join key into the registry. Everything else is plugin-defined and kept as an
/// open map so records of unregistered types survive a load/save cycle untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStatsData {
    #[serde(skip)]
    key: RecordKey,
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PlayerStatsData {
    pub fn new(stat_type_id: impl Into<String>) -> Self {
        Self {
            key: RecordKey::new(),
            id: stat_type_id.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn key(&self) -> RecordKey {
        self.key
    }

    pub fn is_same_record(&self, other: &PlayerStatsData) -> bool {
        self.key == other.key
    }

    /// Shallow merge: every patch entry replaces the field of the same name.
    /// The identity and the stat-type identifier are kept.
    pub fn merged(&self, patch: &StatPatch) -> Result<Self, StatsError> {
        let mut merged = self.clone();
        for (name, value) in patch {
            if name == "id" {
                if value.as_str() != Some(self.id.as_str()) {
                    return Err(StatsError::Validation(
                        "stat type identifier cannot be patched".to_string(),
                    ));
                }
                continue;
            }
            merged.fields.insert(name.clone(), value.clone());
        }
        Ok(merged)
    }

    /// Reads the record through a plugin's typed view.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, StatsError> {
        let mut object = self.fields.clone();
        object.insert("id".to_string(), Value::String(self.id.clone()));
        serde_json::from_value(Value::Object(object)).map_err(|e| StatsError::MalformedRecord {
            stat_type: self.id.clone(),
            message: e.to_string(),
        })
    }
}

impl PartialEq for PlayerStatsData {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.fields == other.fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Integer,
    Text,
}

/// One input of an editor or setup form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

impl FieldSpec {
    pub fn integer(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FieldKind::Integer,
            min: None,
            max: None,
        }
    }

    pub fn text(name: &str, label: &str) -> Self {
        Self {
            kind: FieldKind::Text,
            ..Self::integer(name, label)
        }
    }

    pub fn bounded(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Updater,
    Configurator,
}

/// Editing or setup surface of a plugin. Built on demand, see [`super::ComponentLoader`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub selector: String,
    pub fields: Vec<FieldSpec>,
}

impl Component {
    pub fn bind(&self, record: &PlayerStatsData) -> StatEditor {
        StatEditor {
            selector: self.selector.clone(),
            key: record.key(),
            record: record.clone(),
            fields: self.fields.clone(),
        }
    }
}

/// A component bound to one record: the editing affordance of an updatable stat type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatEditor {
    pub selector: String,
    pub key: RecordKey,
    pub record: PlayerStatsData,
    pub fields: Vec<FieldSpec>,
}
