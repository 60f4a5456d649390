use crate::result::{CscBuildError, Result};

/** Read-only view over one element of a project document
 *
 * The configuration loader only needs named children, attributes and the
 * element's text, so any tree parser can back it. Names are compared by
 * local name; namespace prefixes are ignored.
 */
pub trait DocumentNode: Sized {
    fn name(&self) -> &str;

    /// First child element with the given name.
    fn child(&self, name: &str) -> Option<Self>;

    /// All child elements with the given name, in document order.
    fn children(&self, name: &str) -> Vec<Self>;

    fn attribute(&self, name: &str) -> Option<&str>;

    /// Concatenated text of the element and all its descendants.
    fn text(&self) -> String;
}

impl<'a, 'input> DocumentNode for roxmltree::Node<'a, 'input> {
    fn name(&self) -> &str {
        self.tag_name().name()
    }

    fn child(&self, name: &str) -> Option<Self> {
        self.children()
            .find(|node| node.is_element() && node.tag_name().name() == name)
    }

    fn children(&self, name: &str) -> Vec<Self> {
        roxmltree::Node::children(self)
            .filter(|node| node.is_element() && node.tag_name().name() == name)
            .collect()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        roxmltree::Node::attribute(self, name)
    }

    fn text(&self) -> String {
        self.descendants()
            .filter(|node| node.is_text())
            .filter_map(|node| node.text())
            .collect()
    }
}

/// Parses `content` as XML, mapping syntax errors to `MalformedConfig`.
pub fn parse_xml(content: &str) -> Result<roxmltree::Document<'_>> {
    roxmltree::Document::parse(content)
        .map_err(|e| CscBuildError::malformed(format!("Invalid XML: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_children_by_local_name() {
        let doc = parse_xml(
            r#"<Project xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
                 <ItemGroup><Compile Include="a.cs"/></ItemGroup>
                 <ItemGroup><Compile Include="b.cs"/></ItemGroup>
               </Project>"#,
        )
        .unwrap();
        let root = doc.root_element();

        assert_eq!(DocumentNode::name(&root), "Project");
        let groups = DocumentNode::children(&root, "ItemGroup");
        assert_eq!(groups.len(), 2);

        let compile = DocumentNode::child(&groups[1], "Compile").unwrap();
        assert_eq!(DocumentNode::attribute(&compile, "Include"), Some("b.cs"));
        assert!(DocumentNode::child(&root, "PropertyGroup").is_none());
    }

    #[test]
    fn text_concatenates_descendants() {
        let doc = parse_xml("<OutputType>  lib<!-- c -->rary </OutputType>").unwrap();
        assert_eq!(DocumentNode::text(&doc.root_element()), "  library ");
    }

    #[test]
    fn syntax_errors_are_malformed_config() {
        let err = parse_xml("<Project>").unwrap_err();
        assert!(matches!(err, CscBuildError::MalformedConfig(_)));
    }
}
