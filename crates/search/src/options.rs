//! The options document compiler.

use crate::constraint::{
    ComputedBucket, ConstraintDefinition, ElementRef, RangeConstraint, ValueConstraint,
    WordConstraint,
};
use crate::error::SearchError;
use indexmap::IndexMap;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde::Deserialize;
use std::fmt;

pub const SEARCH_NAMESPACE: &str = "http://marklogic.com/appservices/search";

/// The token a display name renders as: every whitespace character becomes `_`.
pub fn constraint_token(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Facet flag plus the value, word and range constraints of one query. Each
/// kind is keyed by display name independently of the others and keeps
/// insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    return_facets: bool,
    values: IndexMap<String, ValueConstraint>,
    words: IndexMap<String, WordConstraint>,
    ranges: IndexMap<String, RangeConstraint>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self {
            return_facets: true,
            values: IndexMap::new(),
            words: IndexMap::new(),
            ranges: IndexMap::new(),
        }
    }

    pub fn return_facets(&self) -> bool {
        self.return_facets
    }

    pub fn set_return_facets(&mut self, return_facets: bool) -> &mut Self {
        self.return_facets = return_facets;
        self
    }

    pub fn value_constraints(&self) -> &IndexMap<String, ValueConstraint> {
        &self.values
    }

    pub fn word_constraints(&self) -> &IndexMap<String, WordConstraint> {
        &self.words
    }

    pub fn range_constraints(&self) -> &IndexMap<String, RangeConstraint> {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.words.is_empty() && self.ranges.is_empty()
    }

    pub fn add_value_constraint(
        &mut self,
        name: impl Into<String>,
        constraint: ValueConstraint,
    ) -> Result<&mut Self, SearchError> {
        let name = name.into();
        check_name(&name, "value", self.values.keys())?;
        constraint.element().validate()?;
        self.values.insert(name, constraint);
        Ok(self)
    }

    pub fn add_word_constraint(
        &mut self,
        name: impl Into<String>,
        constraint: WordConstraint,
    ) -> Result<&mut Self, SearchError> {
        let name = name.into();
        check_name(&name, "word", self.words.keys())?;
        constraint.element().validate()?;
        self.words.insert(name, constraint);
        Ok(self)
    }

    pub fn add_range_constraint(
        &mut self,
        name: impl Into<String>,
        constraint: RangeConstraint,
    ) -> Result<&mut Self, SearchError> {
        let name = name.into();
        check_name(&name, "range", self.ranges.keys())?;
        constraint.validate()?;
        self.ranges.insert(name, constraint);
        Ok(self)
    }

    /// Adds a constraint of any kind under `name`.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        constraint: impl Into<ConstraintDefinition>,
    ) -> Result<&mut Self, SearchError> {
        match constraint.into() {
            ConstraintDefinition::Value(c) => self.add_value_constraint(name, c),
            ConstraintDefinition::Word(c) => self.add_word_constraint(name, c),
            ConstraintDefinition::Range(c) => self.add_range_constraint(name, c),
        }
    }

    /// Builds options from a JSON description, validating every constraint
    /// exactly as the `add_*` methods do.
    ///
    /// ```json
    /// { "return_facets": false,
    ///   "value": { "Title": { "namespace": "urn:x", "element": "title" } },
    ///   "range": { "Date": { "type": "xs:date", "element": "date", "buckets": [] } } }
    /// ```
    pub fn from_json(text: &str) -> Result<Self, SearchError> {
        let raw: RawOptions = serde_json::from_str(text)?;
        let mut options = SearchOptions::new();
        options.set_return_facets(raw.return_facets);
        for (name, c) in raw.value {
            options.add_value_constraint(name, c)?;
        }
        for (name, c) in raw.word {
            options.add_word_constraint(name, c)?;
        }
        for (name, c) in raw.range {
            options.add_range_constraint(name, c)?;
        }
        log::debug!(
            "Loaded search options with {} value, {} word and {} range constraints",
            options.values.len(),
            options.words.len(),
            options.ranges.len()
        );
        Ok(options)
    }

    /// Renders the options document. Constraints are written kind by kind
    /// (value, word, range), each kind in insertion order.
    pub fn serialize(&self) -> Result<String, SearchError> {
        let mut writer = Writer::new(Vec::new());

        let mut options = BytesStart::new("options");
        options.push_attribute(("xmlns", SEARCH_NAMESPACE));
        writer.write_event(Event::Start(options))?;

        let facets = if self.return_facets { "true" } else { "false" };
        write_text_element(&mut writer, "return-facets", facets)?;

        for (name, constraint) in &self.values {
            write_constraint(&mut writer, name, |w| {
                write_wrapped_element(w, "value", constraint.element())
            })?;
        }
        for (name, constraint) in &self.words {
            write_constraint(&mut writer, name, |w| {
                write_wrapped_element(w, "word", constraint.element())
            })?;
        }
        for (name, constraint) in &self.ranges {
            write_constraint(&mut writer, name, |w| write_range(w, constraint))?;
        }

        writer.write_event(Event::End(BytesEnd::new("options")))?;
        let xml = String::from_utf8(writer.into_inner())?;
        log::trace!("Serialized search options: {}", xml);
        Ok(xml)
    }
}

impl fmt::Display for SearchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let xml = self.serialize().map_err(|_| fmt::Error)?;
        f.write_str(&xml)
    }
}

fn check_name<'a>(
    name: &str,
    kind: &'static str,
    existing: impl Iterator<Item = &'a String>,
) -> Result<(), SearchError> {
    if name.trim().is_empty() {
        return Err(SearchError::required("constraint name"));
    }
    let token = constraint_token(name);
    if existing.map(|n| constraint_token(n)).any(|t| t == token) {
        return Err(SearchError::DuplicateConstraint { kind, token });
    }
    Ok(())
}

#[derive(Deserialize)]
struct RawOptions {
    #[serde(default = "default_return_facets")]
    return_facets: bool,
    #[serde(default)]
    value: IndexMap<String, ValueConstraint>,
    #[serde(default)]
    word: IndexMap<String, WordConstraint>,
    #[serde(default)]
    range: IndexMap<String, RangeConstraint>,
}

fn default_return_facets() -> bool {
    true
}

type XmlWriter = Writer<Vec<u8>>;

fn write_text_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<(), SearchError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_constraint<F>(writer: &mut XmlWriter, name: &str, body: F) -> Result<(), SearchError>
where
    F: FnOnce(&mut XmlWriter) -> Result<(), SearchError>,
{
    let token = constraint_token(name);
    let mut start = BytesStart::new("constraint");
    start.push_attribute(("name", token.as_str()));
    writer.write_event(Event::Start(start))?;
    body(writer)?;
    writer.write_event(Event::End(BytesEnd::new("constraint")))?;
    Ok(())
}

fn write_element_ref(writer: &mut XmlWriter, element: &ElementRef) -> Result<(), SearchError> {
    let mut start = BytesStart::new("element");
    start.push_attribute(("ns", element.namespace()));
    start.push_attribute(("name", element.local()));
    writer.write_event(Event::Empty(start))?;
    Ok(())
}

fn write_wrapped_element(
    writer: &mut XmlWriter,
    wrapper: &str,
    element: &ElementRef,
) -> Result<(), SearchError> {
    writer.write_event(Event::Start(BytesStart::new(wrapper)))?;
    write_element_ref(writer, element)?;
    writer.write_event(Event::End(BytesEnd::new(wrapper)))?;
    Ok(())
}

fn write_range(writer: &mut XmlWriter, range: &RangeConstraint) -> Result<(), SearchError> {
    let mut start = BytesStart::new("range");
    start.push_attribute(("type", range.kind()));
    if let Some(collation) = range.collation() {
        start.push_attribute(("collation", collation));
    }
    writer.write_event(Event::Start(start))?;
    write_element_ref(writer, range.element())?;
    for bucket in range.buckets() {
        write_bucket(writer, bucket)?;
    }
    writer.write_event(Event::End(BytesEnd::new("range")))?;
    Ok(())
}

fn write_bucket(writer: &mut XmlWriter, bucket: &ComputedBucket) -> Result<(), SearchError> {
    let mut start = BytesStart::new("computed-bucket");
    start.push_attribute(("name", bucket.name()));
    start.push_attribute(("ge", bucket.ge()));
    start.push_attribute(("lt", bucket.lt()));
    start.push_attribute(("anchor", bucket.anchor()));
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(bucket.title())))?;
    writer.write_event(Event::End(BytesEnd::new("computed-bucket")))?;
    Ok(())
}
