//! Fixed package parts of a generated DOCX
//!
//! Everything here except `word/document.xml` is independent of the report
//! content. Core properties carry no timestamps so repeated exports stay
//! byte-identical.

use crate::archive::OoxmlArchive;
use crate::writer::{escape_xml, half_points};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
<Override PartName="/word/settings.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings" Target="settings.xml"/>
</Relationships>"#;

const SETTINGS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:defaultTabStop w:val="720"/>
<w:characterSpacingControl w:val="doNotCompress"/>
<w:compat><w:compatSetting w:name="compatibilityMode" w:uri="http://schemas.microsoft.com/office/word" w:val="15"/></w:compat>
</w:settings>"#;

const APP_PROPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">
<Application>gpaudit</Application>
</Properties>"#;

/// Write every part except `word/document.xml`
pub fn write_parts(
    archive: &mut OoxmlArchive,
    title: Option<&str>,
    font_family: &str,
    heading_px: f32,
    paragraph_px: f32,
) {
    archive.set_string("[Content_Types].xml", CONTENT_TYPES);
    archive.set_string("_rels/.rels", PACKAGE_RELS);
    archive.set_string("word/_rels/document.xml.rels", DOCUMENT_RELS);
    archive.set_string("word/settings.xml", SETTINGS);
    archive.set_string(
        "word/styles.xml",
        styles_xml(font_family, heading_px, paragraph_px),
    );
    archive.set_string("docProps/core.xml", core_xml(title));
    archive.set_string("docProps/app.xml", APP_PROPS);
}

/// Default styles: Normal, the heading style used for heading blocks and a
/// bordered table grid
pub fn styles_xml(font_family: &str, heading_px: f32, paragraph_px: f32) -> String {
    let font = escape_xml(font_family);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:docDefaults>
<w:rPrDefault><w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}" w:eastAsia="{font}"/><w:sz w:val="{body}"/><w:szCs w:val="{body}"/><w:lang w:val="te-IN" w:bidi="te-IN"/></w:rPr></w:rPrDefault>
<w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="276" w:lineRule="auto"/></w:pPr></w:pPrDefault>
</w:docDefaults>
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>
<w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="240"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:bCs/><w:sz w:val="{heading}"/><w:szCs w:val="{heading}"/></w:rPr></w:style>
<w:style w:type="table" w:default="1" w:styleId="TableNormal"><w:name w:val="Normal Table"/><w:tblPr><w:tblInd w:w="0" w:type="dxa"/><w:tblCellMar><w:top w:w="0" w:type="dxa"/><w:left w:w="108" w:type="dxa"/><w:bottom w:w="0" w:type="dxa"/><w:right w:w="108" w:type="dxa"/></w:tblCellMar></w:tblPr></w:style>
<w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:basedOn w:val="TableNormal"/><w:tblPr><w:tblBorders><w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/></w:tblBorders></w:tblPr></w:style>
</w:styles>"#,
        font = font,
        body = half_points(paragraph_px),
        heading = half_points(heading_px),
    )
}

/// Core properties with the document title
pub fn core_xml(title: Option<&str>) -> String {
    let title = title
        .map(|t| format!("<dc:title>{}</dc:title>", escape_xml(t)))
        .unwrap_or_default();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
{title}<dc:creator>gpaudit</dc:creator>
</cp:coreProperties>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_override_has_a_part() {
        let mut archive = OoxmlArchive::new();
        write_parts(&mut archive, Some("T"), "Noto Sans Telugu", 18.0, 14.0);
        archive.set_string("word/document.xml", "<w:document/>");

        for line in CONTENT_TYPES.lines() {
            if let Some(rest) = line.split("PartName=\"/").nth(1) {
                let part = rest.split('"').next().unwrap();
                assert!(archive.contains(part), "{} missing", part);
            }
        }
    }

    #[test]
    fn test_styles_carry_font_and_sizes() {
        let styles = styles_xml("Noto Sans Telugu", 18.0, 14.0);
        assert!(styles.contains(r#"w:ascii="Noto Sans Telugu""#));
        assert!(styles.contains(r#"<w:sz w:val="28"/>"#));
        assert!(styles.contains(r#"<w:sz w:val="36"/>"#));
        assert!(styles.contains(r#"w:styleId="TableGrid""#));
    }

    #[test]
    fn test_core_title_is_escaped() {
        let core = core_xml(Some("A & B"));
        assert!(core.contains("<dc:title>A &amp; B</dc:title>"));
        assert!(!core_xml(None).contains("dc:title"));
        assert!(!core.contains("dcterms:created"));
        assert!(core_xml(Some("A\u{1}B")).contains("<dc:title>AB</dc:title>"));
    }
}
