// Writing the arena back out as markup.
use crate::error::DomError;
use crate::tree::{NodeId, NodeKind, Tree, qualify};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesPI, BytesStart, BytesText, Event};

impl Tree {
    /// Serializes `id` and its subtree. Serializing the root writes every
    /// top-level node of the document.
    pub fn to_xml(&self, id: NodeId) -> Result<String, DomError> {
        let mut writer = Writer::new(Vec::new());
        self.write_node(&mut writer, id)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }

    /// Serializes the whole document.
    pub fn to_xml_document(&self) -> Result<String, DomError> {
        self.to_xml(self.root())
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, id: NodeId) -> Result<(), DomError> {
        match self.kind(id) {
            NodeKind::Root => {
                for &child in self.children(id) {
                    self.write_node(writer, child)?;
                }
            }
            NodeKind::Element(element) => {
                let name = element.qualified_name();
                let mut start = BytesStart::new(name.as_str());
                for decl in &element.namespaces {
                    let key = match &decl.prefix {
                        Some(prefix) => format!("xmlns:{}", prefix),
                        None => "xmlns".to_string(),
                    };
                    start.push_attribute((key.as_str(), decl.uri.as_str()));
                }
                for attr in &element.attributes {
                    let key = qualify(attr.prefix.as_deref(), &attr.name.local);
                    start.push_attribute((key.as_str(), attr.value.as_str()));
                }

                let children = self.children(id);
                if children.is_empty() {
                    writer.write_event(Event::Empty(start))?;
                } else {
                    writer.write_event(Event::Start(start))?;
                    for &child in children {
                        self.write_node(writer, child)?;
                    }
                    writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
                }
            }
            NodeKind::Text(text) => {
                writer.write_event(Event::Text(BytesText::new(text)))?;
            }
            NodeKind::Comment(text) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?;
            }
            NodeKind::ProcessingInstruction { target, value } => {
                let content = match value {
                    Some(value) => format!("{} {}", target, value),
                    None => target.clone(),
                };
                writer.write_event(Event::PI(BytesPI::new(content)))?;
            }
        }
        Ok(())
    }
}
