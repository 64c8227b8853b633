//! Print metadata and the bookmark outline of a PDF.
//!
//! Usage: cargo run --features pdfium --example dump_outline <pdf_path> [password]

use docnet_core::{Bookmark, DocLib, PageDimensions};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <pdf_path> [password]", args[0]);
        std::process::exit(1);
    }

    let pdf_path = &args[1];
    let password = args.get(2).map(String::as_str);

    let lib = DocLib::new()?;
    let reader = lib.doc_reader_from_file(pdf_path, password, PageDimensions::new(1080, 1920)?)?;

    println!("File:    {}", pdf_path);
    println!("Version: {}", reader.pdf_version()?.number());
    println!("Pages:   {}", reader.page_count()?);

    let info = reader.metadata()?;
    println!("\nMetadata:");
    println!("  Title:    {}", info.title);
    println!("  Author:   {}", info.author);
    println!("  Producer: {}", info.producer);

    let bookmarks = reader.bookmarks()?;
    let total: usize = bookmarks.iter().map(Bookmark::count).sum();
    println!("\nOutline ({} entries):", total);
    for entry in Bookmark::flatten(&bookmarks) {
        println!(
            "  {}{} -> page {}",
            "  ".repeat(entry.depth),
            entry.title,
            entry.page_index + 1
        );
    }

    Ok(())
}
