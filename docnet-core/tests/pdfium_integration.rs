//! Integration tests against the native PDFium engine.
//!
//! Requires libpdfium: `cargo test --features pdfium` (see PDFIUM_LIB_DIR).
//! Documents are generated in-process, so no fixture files are needed.

#![cfg(feature = "pdfium")]

use docnet_core::{DocLib, ErrorCode, PageDimensions};
use serial_test::serial;
use std::io::Write;

const PDF995_TITLES: [&str; 3] = [
    "Introduction to the Pdf995 Suite",
    "Sample Word document with links",
    "Excel Chart and Spreadsheet",
];

/// Build a PDF 1.7 file with `page_count` pages, an info dictionary and one
/// top-level outline entry per title (entry `i` points at page `i`). With
/// `cyclic_outline` the last entry's /Next points back to the first.
fn build_pdf(page_count: usize, titles: &[&str], cyclic_outline: bool) -> Vec<u8> {
    // Object numbers: 1 catalog, 2 pages, 3 info, 4 outline root,
    // then the pages, then the outline entries.
    let first_page = 5;
    let first_entry = first_page + page_count;
    let page_ref = |i: usize| format!("{} 0 R", first_page + i);
    let entry_ref = |i: usize| format!("{} 0 R", first_entry + i);

    let kids: Vec<_> = (0..page_count).map(page_ref).collect();
    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R /Outlines 4 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{}] /Count {page_count} >>", kids.join(" ")),
        "<< /Title (Docnet Sample) /Author (docnet) >>".to_string(),
    ];
    objects.push(if titles.is_empty() {
        "<< /Type /Outlines /Count 0 >>".to_string()
    } else {
        format!(
            "<< /Type /Outlines /First {} /Last {} /Count {} >>",
            entry_ref(0),
            entry_ref(titles.len() - 1),
            titles.len()
        )
    });
    for i in 0..page_count {
        let (width, height) = if i % 2 == 0 { (612, 792) } else { (300, 400) };
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {width} {height}] >>"
        ));
    }
    for (i, title) in titles.iter().enumerate() {
        let mut entry = format!("<< /Title ({title}) /Parent 4 0 R");
        if i > 0 {
            entry.push_str(&format!(" /Prev {}", entry_ref(i - 1)));
        }
        if i + 1 < titles.len() {
            entry.push_str(&format!(" /Next {}", entry_ref(i + 1)));
        } else if cyclic_outline {
            entry.push_str(&format!(" /Next {}", entry_ref(0)));
        }
        entry.push_str(&format!(" /Dest [{} /Fit] >>", page_ref(i % page_count)));
        objects.push(entry);
    }

    let mut pdf = b"%PDF-1.7\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_offset = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    pdf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R /Info 3 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    pdf
}

fn sample_pdf() -> Vec<u8> {
    build_pdf(2, &["Introduction", "Appendix"], false)
}

fn dims() -> PageDimensions {
    PageDimensions::new(10, 10).unwrap()
}

#[test]
#[serial]
fn test_open_from_bytes_and_file() {
    let lib = DocLib::new().unwrap();
    let pdf = sample_pdf();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&pdf).unwrap();
    file.flush().unwrap();

    let from_file = lib.doc_reader_from_file(file.path(), None, dims()).unwrap();
    let from_bytes = lib.doc_reader_from_bytes(pdf, None, dims()).unwrap();

    for reader in [&from_file, &from_bytes] {
        assert_eq!(reader.page_count().unwrap(), 2);
        assert_eq!(reader.pdf_version().unwrap().number(), 17);
        assert_eq!(reader.meta_text("Title").unwrap(), "Docnet Sample");
        assert_eq!(reader.meta_text("Author").unwrap(), "docnet");
        assert_eq!(reader.meta_text("Keywords").unwrap(), "");
    }
}

#[test]
#[serial]
fn test_bookmarks() {
    let lib = DocLib::new().unwrap();
    let reader = lib.doc_reader_from_bytes(sample_pdf(), None, dims()).unwrap();

    let bookmarks = reader.bookmarks().unwrap();
    let entries: Vec<_> = bookmarks
        .iter()
        .map(|b| (b.title.as_str(), b.page_index))
        .collect();
    assert_eq!(entries, [("Introduction", 0), ("Appendix", 1)]);
}

#[test]
#[serial]
fn test_nineteen_page_document() {
    let lib = DocLib::new().unwrap();
    let reader = lib
        .doc_reader_from_bytes(build_pdf(19, &PDF995_TITLES, false), None, dims())
        .unwrap();

    assert_eq!(reader.page_count().unwrap(), 19);

    let mut titles: Vec<_> = reader
        .bookmarks()
        .unwrap()
        .into_iter()
        .map(|b| b.title)
        .collect();
    titles.sort();
    let mut expected = PDF995_TITLES.to_vec();
    expected.sort();
    assert_eq!(titles, expected);
}

#[test]
#[serial]
fn test_document_without_outline() {
    let lib = DocLib::new().unwrap();
    let reader = lib.doc_reader_from_bytes(build_pdf(1, &[], false), None, dims()).unwrap();
    assert!(reader.bookmarks().unwrap().is_empty());
}

#[test]
#[serial]
fn test_cyclic_outline_terminates() {
    let lib = DocLib::new().unwrap();
    let pdf = build_pdf(2, &["Introduction", "Appendix"], true);
    let reader = lib.doc_reader_from_bytes(pdf, None, dims()).unwrap();

    let titles: Vec<_> = reader
        .bookmarks()
        .unwrap()
        .into_iter()
        .map(|b| b.title)
        .collect();
    assert_eq!(titles, ["Introduction", "Appendix"]);
}

#[test]
#[serial]
fn test_page_sizes() {
    let lib = DocLib::new().unwrap();
    let reader = lib.doc_reader_from_bytes(sample_pdf(), None, dims()).unwrap();

    assert_eq!(reader.page_reader(0).unwrap().page_size().unwrap(), (612.0, 792.0));
    assert_eq!(reader.page_reader(1).unwrap().page_size().unwrap(), (300.0, 400.0));
    assert!(reader.page_reader(2).is_err());
}

#[test]
#[serial]
fn test_invalid_documents() {
    let lib = DocLib::new().unwrap();

    let err = lib
        .doc_reader_from_bytes(b"definitely not a pdf".to_vec(), None, dims())
        .unwrap_err();
    assert_eq!(err.error_code(), Some(ErrorCode::FORMAT));

    let dir = tempfile::tempdir().unwrap();
    let err = lib
        .doc_reader_from_file(dir.path().join("missing.pdf"), None, dims())
        .unwrap_err();
    assert_eq!(err.error_code(), Some(ErrorCode::FILE));
}

#[test]
#[serial]
fn test_dispose_twice() {
    let lib = DocLib::new().unwrap();
    let mut reader = lib.doc_reader_from_bytes(sample_pdf(), None, dims()).unwrap();
    reader.dispose();
    reader.dispose();
    assert!(reader.page_count().is_err());
}
