use crate::err::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// JSON:API envelope returned by every endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct Document<D> {
    pub data: Option<D>,
    pub included: Option<Vec<Resource<Value>>>,
    pub meta: Option<Meta>,
    pub links: Option<Map<String, Value>>,
    pub errors: Option<Vec<ApiError>>,
}

// not derived: a derive would require `D: Default`
impl<D> Default for Document<D> {
    fn default() -> Self {
        Self {
            data: None,
            included: None,
            meta: None,
            links: None,
            errors: None,
        }
    }
}

pub type ListDocument<A> = Document<Vec<Resource<A>>>;

impl<D> Document<D> {
    pub fn into_data(self) -> Option<D> {
        self.data
    }
}

impl<A> Document<Vec<Resource<A>>> {
    /// List payload, empty when the backend sent no `data`.
    pub fn items(&self) -> &[Resource<A>] {
        self.data.as_deref().unwrap_or_default()
    }

    pub fn count(&self) -> Option<u64> {
        self.meta.as_ref().and_then(|meta| meta.count)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Meta {
    pub count: Option<u64>,
    pub pages: Option<Pages>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Pages {
    pub first: Option<String>,
    pub last: Option<String>,
    pub next: Option<String>,
    pub prev: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Resource<A> {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: A,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<BTreeMap<String, Relationship>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Map<String, Value>>,
}

impl<A> Resource<A> {
    /// First identifier linked under `name`, if any.
    pub fn related(&self, name: &str) -> Option<&ResourceIdentifier> {
        self.relationships
            .as_ref()
            .and_then(|rels| rels.get(name))
            .and_then(|rel| rel.data.as_ref())
            .and_then(|data| match data {
                RelationshipData::One(identifier) => Some(identifier),
                RelationshipData::Many(identifiers) => identifiers.first(),
            })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Relationship {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RelationshipData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum RelationshipData {
    One(ResourceIdentifier),
    Many(Vec<ResourceIdentifier>),
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl ResourceIdentifier {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// Body of a POST/PATCH: `{"data": {"type", "id"?, "attributes", "relationships"?}}`.
#[derive(Debug, Serialize)]
pub struct WriteDocument<A> {
    pub data: WriteResource<A>,
}

#[derive(Debug, Serialize)]
pub struct WriteResource<A> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub attributes: A,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<&'static str, Relationship>,
}

impl<A: Serialize> WriteDocument<A> {
    pub fn create(kind: &'static str, attributes: A) -> Self {
        Self {
            data: WriteResource {
                kind,
                id: None,
                attributes,
                relationships: BTreeMap::new(),
            },
        }
    }

    pub fn update(kind: &'static str, id: &str, attributes: A) -> Self {
        Self {
            data: WriteResource {
                kind,
                id: Some(id.into()),
                attributes,
                relationships: BTreeMap::new(),
            },
        }
    }

    pub fn relate(mut self, name: &'static str, identifier: ResourceIdentifier) -> Self {
        self.data.relationships.insert(
            name,
            Relationship {
                data: Some(RelationshipData::One(identifier)),
                links: None,
            },
        );
        self
    }

    pub fn relate_opt(self, name: &'static str, identifier: Option<ResourceIdentifier>) -> Self {
        match identifier {
            Some(identifier) => self.relate(name, identifier),
            None => self,
        }
    }
}

/// Relationship linkage body: `{"data": {"type", "id"}}` or `{"data": [...]}`.
pub fn linkage(identifier: ResourceIdentifier) -> Value {
    serde_json::json!({ "data": identifier })
}

pub fn linkage_many(identifiers: Vec<ResourceIdentifier>) -> Value {
    serde_json::json!({ "data": identifiers })
}
