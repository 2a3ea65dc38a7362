//! DOCX text extraction: reads `word/document.xml` out of the zip container and
//! keeps the text runs, one line per paragraph.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

pub fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::Docx(format!("{DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(e.to_string()))?;

    document_xml_to_text(&xml)
}

/// Walks WordprocessingML and emits `<w:t>` text. Tabs and breaks only count
/// inside a run, so tab-stop definitions in paragraph properties are skipped.
pub fn document_xml_to_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);

    let mut out = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:r" => in_run = true,
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) if in_run => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t.unescape().map_err(|e| ExtractError::Docx(e.to_string()))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::Docx(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p>
      <w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>
      <w:r><w:t>Jane Doe</w:t></w:r>
    </w:p>
    <w:p>
      <w:r><w:t xml:space="preserve">Rust </w:t></w:r>
      <w:r><w:t>&amp; Go</w:t><w:tab/><w:t>2019</w:t></w:r>
    </w:p>
    <w:p>
      <w:r><w:t>Line one</w:t><w:br/><w:t>Line two</w:t></w:r>
    </w:p>
  </w:body>
</w:document>"#;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            let options = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Stored);
            writer.start_file("[Content_Types].xml", options).unwrap();
            writer.write_all(b"<Types/>").unwrap();
            writer.start_file(DOCUMENT_PART, options).unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_paragraphs_become_lines() {
        let text = document_xml_to_text(DOCUMENT_XML).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Jane Doe", "Rust & Go\t2019", "Line one", "Line two"]);
    }

    #[test]
    fn test_tab_stops_in_paragraph_properties_are_ignored() {
        let text = document_xml_to_text(DOCUMENT_XML).unwrap();
        assert!(text.starts_with("Jane Doe"));
    }

    #[test]
    fn test_extract_docx_reads_document_part() {
        let bytes = build_docx(DOCUMENT_XML);
        let text = extract_docx(&bytes).unwrap();
        assert!(text.contains("Rust & Go"));
    }

    #[test]
    fn test_docx_without_document_part_fails() {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            let options = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Stored);
            writer.start_file("word/styles.xml", options).unwrap();
            writer.write_all(b"<w:styles/>").unwrap();
            writer.finish().unwrap();
        }
        let err = extract_docx(&buffer.into_inner()).unwrap_err();
        assert!(matches!(err, ExtractError::Docx(ref msg) if msg.contains(DOCUMENT_PART)));
    }

    #[test]
    fn test_non_zip_bytes_fail() {
        let err = extract_docx(b"plain text pretending to be docx").unwrap_err();
        assert!(matches!(err, ExtractError::Docx(_)));
    }

    #[test]
    fn test_full_pipeline_through_dispatcher() {
        let bytes = build_docx(DOCUMENT_XML);
        let text = crate::extraction::extract_resume_text("resume.docx", &bytes).unwrap();
        assert_eq!(text, "Jane Doe\nRust & Go\t2019\nLine one\nLine two");
    }
}
