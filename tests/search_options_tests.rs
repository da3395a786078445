use activedoc::search::{SEARCH_NAMESPACE, SearchError};
use activedoc::{ComputedBucket, ElementRef, RangeConstraint, SearchOptions, WordConstraint};

#[test]
fn test_full_options_document() -> Result<(), SearchError> {
    let mut options = SearchOptions::new();
    options
        .add_word_constraint("Body Text", WordConstraint::new(ElementRef::new("", "body")?))?
        .add_range_constraint(
            "Published",
            RangeConstraint::new("xs:date", ElementRef::new("urn:pub", "date")?)?
                .with_bucket(ComputedBucket::new("today", "P0D", "P1D", "start-of-day", "Today")?)
                .with_bucket(ComputedBucket::new(
                    "week",
                    "-P7D",
                    "P0D",
                    "start-of-day",
                    "Last week",
                )?),
        )?;

    let expected = format!(
        concat!(
            r#"<options xmlns="{}">"#,
            "<return-facets>true</return-facets>",
            r#"<constraint name="Body_Text"><word><element ns="" name="body"/></word></constraint>"#,
            r#"<constraint name="Published"><range type="xs:date">"#,
            r#"<element ns="urn:pub" name="date"/>"#,
            r#"<computed-bucket name="today" ge="P0D" lt="P1D" anchor="start-of-day">Today</computed-bucket>"#,
            r#"<computed-bucket name="week" ge="-P7D" lt="P0D" anchor="start-of-day">Last week</computed-bucket>"#,
            "</range></constraint>",
            "</options>"
        ),
        SEARCH_NAMESPACE
    );
    assert_eq!(options.serialize()?, expected);
    Ok(())
}

#[test]
fn test_options_parse_as_xml() -> Result<(), Box<dyn std::error::Error>> {
    let options = SearchOptions::from_json(
        r#"{
            "value": { "Region Type": { "namespace": "urn:geo", "element": "region" } },
            "word": { "Region Type": { "namespace": "urn:geo", "element": "region" } }
        }"#,
    )?;
    let xml = options.serialize()?;
    let doc = activedoc::Document::parse(&xml)?;
    assert_eq!(
        doc.read_in("return-facets", Some(SEARCH_NAMESPACE))?.as_text(),
        Some("true")
    );
    assert_eq!(
        doc.read_in("constraint/@name", Some(SEARCH_NAMESPACE))?
            .as_texts()
            .map(<[String]>::to_vec),
        Some(vec!["Region_Type".to_string(), "Region_Type".to_string()])
    );
    Ok(())
}

#[test]
fn test_invalid_definitions_never_reach_the_builder() {
    assert!(ElementRef::new("urn:x", "").is_err());
    assert!(ComputedBucket::new("", "0", "1", "a", "t").is_err());
    assert!(matches!(
        SearchOptions::from_json(r#"{ "range": { "R": { "type": "", "element": "e" } } }"#),
        Err(SearchError::Validation { field: "range type", .. })
    ));
    assert!(matches!(
        SearchOptions::from_json("not json"),
        Err(SearchError::Json(_))
    ));
}
