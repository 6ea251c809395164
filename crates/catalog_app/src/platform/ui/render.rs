use std::fmt::Write;

use catalog_core::{AppViewModel, ListingView, PageLink, TableBody, UploadPhase, UploadView};
use chrono::Datelike;

const RULE: &str = "------------------------------------------------------------";

pub fn render(view: &AppViewModel, search_focused: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Infrastructure project list");
    render_listing(&mut out, &view.listing, search_focused);
    let _ = writeln!(out);
    render_upload(&mut out, &view.upload);
    let _ = writeln!(
        out,
        "Project management system (c) {}",
        chrono::Local::now().year()
    );
    out
}

fn render_listing(out: &mut String, listing: &ListingView, search_focused: bool) {
    let cursor = if search_focused { "|" } else { "" };
    let mut search_line = format!("Search: [{}{}]", listing.search_input, cursor);
    if listing.show_clear_button {
        search_line.push_str(" (x)");
    }
    if listing.show_spinner {
        search_line.push_str(" loading...");
    }
    if let Some(count) = listing.result_count {
        let _ = write!(search_line, "   Found: {} records", format_with_commas(count));
    }
    let _ = writeln!(out, "{search_line}");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{:<8}Project name", "ID");

    match &listing.body {
        TableBody::Skeleton(rows) => {
            for _ in 0..*rows {
                let _ = writeln!(out, "....    ................");
            }
        }
        TableBody::Empty => {
            let _ = writeln!(out, "{:^60}", "No data found");
        }
        TableBody::Rows(projects) => {
            for project in projects {
                let _ = writeln!(out, "{:<8}{}", project.id, project.name);
            }
        }
    }
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{}", pager_line(listing));
}

fn pager_line(listing: &ListingView) -> String {
    let previous = if listing.can_go_previous { "< Prev" } else { "  ----" };
    let next = if listing.can_go_next { "Next >" } else { "----  " };
    let links: Vec<String> = listing.page_links.iter().map(format_link).collect();
    format!("{previous}  {}  {next}", links.join(" "))
}

fn format_link(link: &PageLink) -> String {
    match link {
        PageLink::Page {
            number,
            active: true,
        } => format!("[{number}]"),
        PageLink::Page { number, .. } => format!(" {number} "),
        PageLink::Ellipsis => "...".to_string(),
        PageLink::Blank { .. } => "   ".to_string(),
    }
}

fn render_upload(out: &mut String, upload: &UploadView) {
    let _ = writeln!(out, "Excel data import");
    match &upload.selected_file {
        Some(name) => {
            let _ = writeln!(out, "Selected: {name}");
        }
        None => {
            let _ = writeln!(out, "Select a .xlsx or .xls file with :file PATH");
        }
    }

    let enabled = if upload.can_upload { "" } else { " (disabled)" };
    let _ = writeln!(out, "[{}]{enabled}", upload.button_label);

    let status = match upload.phase {
        UploadPhase::Idle => None,
        UploadPhase::Uploading => Some("..."),
        UploadPhase::Success => Some("OK"),
        UploadPhase::Error => Some("ERR"),
    };
    if let Some(status) = status {
        let _ = writeln!(out, "{status} {}", upload.message);
    }

    if let Some(stats) = upload.stats {
        let _ = writeln!(out, "Import results:");
        let _ = writeln!(out, "  Records processed: {}", format_with_commas(stats.total));
        let _ = writeln!(out, "  Records added: {}", format_with_commas(stats.added));
        let _ = writeln!(out, "  Records updated: {}", format_with_commas(stats.updated));
    }
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::{page_links, Pagination, Project, UploadStats};

    fn listing(page: u32, total_pages: u32) -> ListingView {
        ListingView {
            body: TableBody::Rows(vec![Project {
                id: 1,
                name: "Ring road".to_string(),
            }]),
            pagination: Pagination {
                page,
                page_size: 20,
                total_count: u64::from(total_pages) * 20,
                total_pages,
            },
            page_links: page_links(page, total_pages),
            can_go_previous: page > 1,
            can_go_next: page < total_pages,
            ..ListingView::default()
        }
    }

    #[test]
    fn pager_marks_active_page_and_ellipses() {
        let line = pager_line(&listing(5, 10));
        assert_eq!(line, "< Prev   1  ...  4  [5]  6  ...  10   Next >");
    }

    #[test]
    fn pager_disables_previous_on_first_page() {
        let line = pager_line(&listing(1, 2));
        assert!(line.starts_with("  ----"));
        assert!(line.ends_with("Next >"));
    }

    #[test]
    fn keyword_shows_found_count() {
        let view = AppViewModel {
            listing: ListingView {
                result_count: Some(1234),
                keyword: "road".to_string(),
                search_input: "road".to_string(),
                show_clear_button: true,
                ..listing(1, 1)
            },
            ..AppViewModel::default()
        };
        let text = render(&view, false);
        assert!(text.contains("Search: [road] (x)   Found: 1,234 records"));
        assert!(text.contains("1       Ring road"));
    }

    #[test]
    fn upload_stats_are_listed() {
        let view = AppViewModel {
            upload: UploadView {
                selected_file: Some("projects.xlsx".to_string()),
                phase: UploadPhase::Success,
                message: "Data imported successfully!".to_string(),
                stats: Some(UploadStats {
                    total: 1200,
                    added: 1000,
                    updated: 200,
                }),
                can_upload: true,
                button_label: "Upload and import".to_string(),
            },
            ..AppViewModel::default()
        };
        let text = render(&view, false);
        assert!(text.contains("OK Data imported successfully!"));
        assert!(text.contains("Records processed: 1,200"));
        assert!(text.contains("Records updated: 200"));
    }
}
