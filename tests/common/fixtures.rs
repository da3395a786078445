use activedoc::DomainConfig;

pub const BOOK: &str =
    "<book><chapter><title>A</title></chapter><chapter><title>B</title></chapter></book>";

pub const LIBRARY_NS: &str = "urn:library";

/// A namespaced library with mixed content, an empty element and attributes.
pub fn library_xml() -> String {
    format!(
        r#"<library xmlns="{ns}" xmlns:m="urn:meta"><m:owner>City</m:owner><shelf id="s1"><book lang="en"><title>Dune</title><author>Herbert</author></book><book lang="fr"><title>Candide</title><author>Voltaire</author><notes/></book></shelf></library>"#,
        ns = LIBRARY_NS
    )
}

pub fn library_config() -> DomainConfig {
    DomainConfig::new()
        .with_root("library")
        .with_default_namespace(LIBRARY_NS)
        .with_namespace("owner", "urn:meta")
        .with_field("title")
        .with_field("owner")
}

/// A flat document with `count` simple records, for benchmarks and bulk reads.
pub fn records_xml(count: usize) -> String {
    let mut xml = String::from("<records>");
    for i in 0..count {
        xml.push_str(&format!(
            "<record><id>{}</id><name>item {}</name></record>",
            i, i
        ));
    }
    xml.push_str("</records>");
    xml
}
