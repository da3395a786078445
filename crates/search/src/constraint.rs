//! Constraint definitions. Every constructor validates its required fields,
//! so a definition that exists is always renderable.

use crate::error::SearchError;
use serde::{Deserialize, Serialize};

/// The element a constraint applies to. An empty namespace means the element
/// is in no namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRef {
    #[serde(default)]
    namespace: String,
    #[serde(rename = "element")]
    local: String,
}

impl ElementRef {
    pub fn new(
        namespace: impl Into<String>,
        local: impl Into<String>,
    ) -> Result<Self, SearchError> {
        let element = Self {
            namespace: namespace.into(),
            local: local.into(),
        };
        element.validate()?;
        Ok(element)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn local(&self) -> &str {
        &self.local
    }

    pub(crate) fn validate(&self) -> Result<(), SearchError> {
        if self.local.trim().is_empty() {
            return Err(SearchError::required("element name"));
        }
        Ok(())
    }
}

/// Matches documents whose element value equals the query term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueConstraint {
    #[serde(flatten)]
    element: ElementRef,
}

impl ValueConstraint {
    pub fn new(element: ElementRef) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &ElementRef {
        &self.element
    }
}

/// Matches documents whose element contains the query words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordConstraint {
    #[serde(flatten)]
    element: ElementRef,
}

impl WordConstraint {
    pub fn new(element: ElementRef) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &ElementRef {
        &self.element
    }
}

/// A named numeric or date range with display metadata. `ge` is the inclusive
/// lower bound, `lt` the exclusive upper bound, both relative to `anchor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedBucket {
    name: String,
    ge: String,
    lt: String,
    anchor: String,
    title: String,
}

impl ComputedBucket {
    pub fn new(
        name: impl Into<String>,
        ge: impl Into<String>,
        lt: impl Into<String>,
        anchor: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Self, SearchError> {
        let bucket = Self {
            name: name.into(),
            ge: ge.into(),
            lt: lt.into(),
            anchor: anchor.into(),
            title: title.into(),
        };
        bucket.validate()?;
        Ok(bucket)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ge(&self) -> &str {
        &self.ge
    }

    pub fn lt(&self) -> &str {
        &self.lt
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn validate(&self) -> Result<(), SearchError> {
        if self.name.trim().is_empty() {
            return Err(SearchError::required("bucket name"));
        }
        if self.anchor.trim().is_empty() {
            return Err(SearchError::required("bucket anchor"));
        }
        Ok(())
    }
}

/// A range constraint over a typed range index, optionally pre-partitioned
/// into computed buckets that are rendered in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeConstraint {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    collation: Option<String>,
    #[serde(flatten)]
    element: ElementRef,
    #[serde(default)]
    buckets: Vec<ComputedBucket>,
}

impl RangeConstraint {
    pub fn new(kind: impl Into<String>, element: ElementRef) -> Result<Self, SearchError> {
        let kind = kind.into();
        if kind.trim().is_empty() {
            return Err(SearchError::required("range type"));
        }
        Ok(Self {
            kind,
            collation: None,
            element,
            buckets: Vec::new(),
        })
    }

    pub fn with_collation(mut self, collation: impl Into<String>) -> Result<Self, SearchError> {
        let collation = collation.into();
        if collation.trim().is_empty() {
            return Err(SearchError::required("collation"));
        }
        self.collation = Some(collation);
        Ok(self)
    }

    pub fn with_bucket(mut self, bucket: ComputedBucket) -> Self {
        self.buckets.push(bucket);
        self
    }

    pub fn add_bucket(&mut self, bucket: ComputedBucket) {
        self.buckets.push(bucket);
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn collation(&self) -> Option<&str> {
        self.collation.as_deref()
    }

    pub fn element(&self) -> &ElementRef {
        &self.element
    }

    pub fn buckets(&self) -> &[ComputedBucket] {
        &self.buckets
    }

    pub(crate) fn validate(&self) -> Result<(), SearchError> {
        if self.kind.trim().is_empty() {
            return Err(SearchError::required("range type"));
        }
        if self.collation.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(SearchError::required("collation"));
        }
        self.element.validate()?;
        self.buckets.iter().try_for_each(ComputedBucket::validate)
    }
}

/// Any of the three constraint kinds, for callers that build options generically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintDefinition {
    Value(ValueConstraint),
    Word(WordConstraint),
    Range(RangeConstraint),
}

impl From<ValueConstraint> for ConstraintDefinition {
    fn from(c: ValueConstraint) -> Self {
        ConstraintDefinition::Value(c)
    }
}

impl From<WordConstraint> for ConstraintDefinition {
    fn from(c: WordConstraint) -> Self {
        ConstraintDefinition::Word(c)
    }
}

impl From<RangeConstraint> for ConstraintDefinition {
    fn from(c: RangeConstraint) -> Self {
        ConstraintDefinition::Range(c)
    }
}
