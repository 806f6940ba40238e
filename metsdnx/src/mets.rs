//! METS container elements.
//!
//! Small constructors for the standard METS sections plus [`MetsDocument`],
//! which holds the finished sections and emits them in schema order.

use crate::xml::Element;

pub const METS_NS: &str = "http://www.loc.gov/METS/";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// `MDTYPE` of a metadata wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MdType {
    /// Dublin Core descriptive metadata.
    Dc,
    /// DNX administrative metadata (`MDTYPE="OTHER" OTHERMDTYPE="dnx"`).
    Dnx,
}

/// The empty `mets:mets` root with namespace declarations.
pub fn mets_root() -> Element {
    Element::new("mets:mets")
        .with_attr("xmlns:mets", METS_NS)
        .with_attr("xmlns:xlink", XLINK_NS)
}

/// `mdWrap` + `xmlData` around a payload.
pub fn md_wrap(md_type: MdType, payload: Element) -> Element {
    let wrap = match md_type {
        MdType::Dc => Element::new("mets:mdWrap").with_attr("MDTYPE", "DC"),
        MdType::Dnx => Element::new("mets:mdWrap")
            .with_attr("MDTYPE", "OTHER")
            .with_attr("OTHERMDTYPE", "dnx"),
    };
    wrap.with_child(Element::new("mets:xmlData").with_child(payload))
}

pub fn dmd_sec(id: &str, record: Element) -> Element {
    Element::new("mets:dmdSec")
        .with_attr("ID", id)
        .with_child(md_wrap(MdType::Dc, record))
}

pub fn amd_sec(id: &str) -> Element {
    Element::new("mets:amdSec").with_attr("ID", id)
}

pub fn file_sec() -> Element {
    Element::new("mets:fileSec")
}

pub fn file_grp(id: &str, admid: &str) -> Element {
    Element::new("mets:fileGrp")
        .with_attr("ID", id)
        .with_attr("ADMID", admid)
        .with_attr("USE", "VIEW")
}

pub fn file(id: &str, admid: &str) -> Element {
    Element::new("mets:file")
        .with_attr("ID", id)
        .with_attr("ADMID", admid)
}

pub fn flocat(href: &str) -> Element {
    Element::new("mets:FLocat")
        .with_attr("LOCTYPE", "URL")
        .with_attr("xlink:href", href)
}

pub fn struct_map(id: &str, map_type: &str) -> Element {
    Element::new("mets:structMap")
        .with_attr("ID", id)
        .with_attr("TYPE", map_type)
}

pub fn div(label: &str) -> Element {
    Element::new("mets:div").with_attr("LABEL", label)
}

pub fn typed_div(div_type: &str, label: &str) -> Element {
    Element::new("mets:div")
        .with_attr("TYPE", div_type)
        .with_attr("LABEL", label)
}

pub fn fptr(file_id: &str) -> Element {
    Element::new("mets:fptr").with_attr("FILEID", file_id)
}

/// Finished sections of a document, kept apart until final assembly.
#[derive(Debug, Clone, Default)]
pub struct MetsDocument {
    pub dmd_secs: Vec<Element>,
    pub ie_amd: Option<Element>,
    pub rep_amds: Vec<Element>,
    pub file_amds: Vec<Element>,
    pub file_sec: Option<Element>,
    pub struct_maps: Vec<Element>,
}

impl MetsDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit the root element: descriptive sections, IE block, representation
    /// blocks, file blocks, file section, then structural maps.
    pub fn into_element(self) -> Element {
        mets_root()
            .with_children(self.dmd_secs)
            .with_children(self.ie_amd)
            .with_children(self.rep_amds)
            .with_children(self.file_amds)
            .with_children(self.file_sec)
            .with_children(self.struct_maps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_grp_marks_view_use() {
        let grp = file_grp("rep1", "rep1-amd");
        assert_eq!(grp.attr("USE"), Some("VIEW"));
        assert_eq!(grp.attr("ADMID"), Some("rep1-amd"));
    }

    #[test]
    fn test_dnx_wrapper_shape() {
        let wrap = md_wrap(MdType::Dnx, Element::new("dnx"));
        assert_eq!(wrap.attr("MDTYPE"), Some("OTHER"));
        assert_eq!(wrap.attr("OTHERMDTYPE"), Some("dnx"));
        let xml_data = wrap.find("mets:xmlData").unwrap();
        assert!(xml_data.find("dnx").is_some());
    }

    #[test]
    fn test_document_section_order() {
        let doc = MetsDocument {
            dmd_secs: vec![dmd_sec("ie-dmd", Element::new("dc:record"))],
            ie_amd: Some(amd_sec("ie-amd")),
            rep_amds: vec![amd_sec("rep1-amd")],
            file_amds: vec![amd_sec("fid1-1-amd")],
            file_sec: Some(file_sec()),
            struct_maps: vec![struct_map("rep1-1", "LOGICAL")],
        };
        let root = doc.into_element();
        let order: Vec<_> = root
            .children()
            .map(|e| e.attr("ID").unwrap_or(e.name()))
            .collect();
        assert_eq!(
            order,
            vec!["ie-dmd", "ie-amd", "rep1-amd", "fid1-1-amd", "mets:fileSec", "rep1-1"]
        );
        assert_eq!(root.attr("xmlns:mets"), Some(METS_NS));
    }

    #[test]
    fn test_flocat_href() {
        let loc = flocat("pm/img.tif");
        assert_eq!(loc.attr("xlink:href"), Some("pm/img.tif"));
        assert_eq!(loc.attr("LOCTYPE"), Some("URL"));
    }
}
