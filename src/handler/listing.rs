//! Directory listing page
//!
//! Rendered for directories that have no index file.

use super::resolve::{encode_segment, html_escape};
use std::fmt::Write as _;
use std::io;
use std::path::Path;
use tokio::fs;

/// One row of the listing
#[derive(Debug, Clone, PartialEq, Eq)]
struct ListingEntry {
    name: String,
    is_dir: bool,
    is_symlink: bool,
}

impl ListingEntry {
    /// Text shown to the user: directories end in `/`, symlinks in `@`
    fn display_name(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Relative link target; directories keep their trailing slash
    fn href(&self) -> String {
        let encoded = encode_segment(&self.name);
        if self.is_dir {
            format!("{encoded}/")
        } else {
            encoded
        }
    }
}

/// Read `dir` and render it as an HTML page titled with `url_path`
pub async fn render(dir: &Path, url_path: &str) -> io::Result<String> {
    let entries = read_entries(dir).await?;
    Ok(render_page(url_path, &entries))
}

async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let is_symlink = entry.file_type().await?.is_symlink();
        // Follows symlinks so linked directories still get a trailing slash
        let is_dir = fs::metadata(entry.path())
            .await
            .is_ok_and(|m| m.is_dir());
        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }

    entries.sort_by_cached_key(|e| e.name.to_lowercase());
    Ok(entries)
}

fn render_page(url_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", html_escape(url_path));
    let mut page = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );
    for entry in entries {
        let _ = writeln!(
            page,
            "<li><a href=\"{}\">{}</a></li>",
            html_escape(&entry.href()),
            html_escape(&entry.display_name())
        );
    }
    page.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    page
}
