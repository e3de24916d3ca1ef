use std::io::Write;
use std::path::Path;

use bibcheck_core::{CheckedEntry, Report};

use crate::shell;
use crate::types::{LinkOptions, ReportError, ReportMeta, SEARCH_ENGINES};

/// Write a rendered report in one create-write-close step. A failed write may
/// leave a partial file behind.
pub fn write_report(path: &Path, html: &str) -> Result<(), ReportError> {
    let to_err = |source: std::io::Error| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = std::fs::File::create(path).map_err(to_err)?;
    file.write_all(html.as_bytes()).map_err(to_err)?;
    tracing::debug!(path = %path.display(), bytes = html.len(), "report written");
    Ok(())
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Search URL for `title`. Titles are appended as-is unless `escape_links`
/// is set, in which case they are percent-encoded.
fn search_url(base: &str, title: &str, opts: &LinkOptions) -> String {
    if opts.escape_links {
        format!("{}{}", base, urlencoding::encode(title))
    } else {
        format!("{}{}", base, title)
    }
}

fn reference_text(checked: &CheckedEntry) -> String {
    let entry = &checked.entry;
    if entry.first_author.is_empty() {
        entry.title.clone()
    } else {
        format!("{}: {}", entry.first_author, entry.title)
    }
}

/// Render one entry as a self-contained report block.
///
/// Never fails: entries without author or title lines render with empty
/// strings in their place.
pub fn render_fragment(checked: &CheckedEntry, opts: &LinkOptions) -> String {
    let entry = &checked.entry;
    let id = html_escape(&entry.id);
    let mut out = String::with_capacity(1024);

    out.push_str(&format!(
        "\n\n<div id=\"{}\" class=\"bibTag severe{}\">\n",
        id,
        checked.severity()
    ));
    out.push_str(&format!(
        "<h2>{} ({})</h2>\n",
        id,
        html_escape(&entry.entry_type)
    ));

    out.push_str("<div class=\"links\">\n");
    for engine in &SEARCH_ENGINES {
        out.push_str(&format!(
            " | <a href=\"{}\" target=\"_blank\">{}</a>\n",
            html_escape(&search_url(engine.base, &entry.title, opts)),
            engine.label,
        ));
    }
    out.push_str("</div>\n");

    out.push_str(&format!(
        "<div class=\"reference\"><a href=\"{}{}\" target=\"_blank\">{}</a></div>\n",
        html_escape(&opts.literature_dir),
        id,
        html_escape(&reference_text(checked)),
    ));

    out.push_str("<ul class=\"enumprob\">\n");
    for problem in &checked.problems {
        out.push_str(&format!("<li>{}</li>\n", html_escape(&problem.message)));
    }
    out.push_str("</ul>\n");

    out.push_str(
        "<form class=\"bibTag_control\"><label>checked</label><input type=\"checkbox\" class=\"checked\"/></form>\n",
    );
    out.push_str("<div class=\"bibtex_toggle\">Current BibTeX Entry</div>\n");
    let raw: Vec<String> = entry.raw_lines.iter().map(|l| html_escape(l)).collect();
    out.push_str(&format!("<div class=\"bibtex\">{}</div>\n", raw.join("<br />")));
    out.push_str("</div>");
    out
}

fn write_info_panel(out: &mut String, report: &Report, meta: &ReportMeta) {
    let c = &report.counters;
    out.push_str("<div class=\"info\"><h2>Info</h2><ul>\n");
    out.push_str(&format!("<li>bib file: {}</li>\n", html_escape(&meta.bib_file)));
    out.push_str(&format!("<li>aux file: {}</li>\n", html_escape(&meta.aux_file)));
    out.push_str(&format!("<li>convention: {}</li>\n", report.convention.name()));
    out.push_str(&format!("<li># entries: {}</li>\n", c.entries));
    out.push_str(&format!("<li># reported: {}</li>\n", report.entries.len()));
    out.push_str(&format!("<li># problems: {}</li><ul>\n", c.total_problems()));
    out.push_str(&format!("<li># missing fields: {}</li>\n", c.missing_fields));
    out.push_str(&format!("<li># flawed names: {}</li>\n", c.flawed_names));
    out.push_str(&format!("<li># wrong types: {}</li>\n", c.wrong_types));
    out.push_str(&format!("<li># non-unique id: {}</li>\n", c.non_unique_ids));
    out.push_str("</ul></ul></div>\n");
}

/// Wrap all fragments, in report order, in the page shell with the summary
/// panel.
pub fn render_document(report: &Report, meta: &ReportMeta, opts: &LinkOptions) -> String {
    let mut out = String::with_capacity(shell::HEAD.len() + report.entries.len() * 1024);
    out.push_str(shell::HEAD);
    write_info_panel(&mut out, report, meta);
    for checked in &report.entries {
        out.push_str(&render_fragment(checked, opts));
    }
    out.push_str(shell::TAIL);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use bibcheck_core::checker::check_str;
    use bibcheck_core::{CheckConfig, Entry, Problem, Restriction};

    // ── helpers ──────────────────────────────────────────────────────

    fn make_checked(id: &str, title: &str, problems: Vec<Problem>) -> CheckedEntry {
        let mut entry = Entry::new(id, "article", true);
        entry.title = title.to_string();
        entry.raw_lines = vec![format!("@article{{{},", id), "}".to_string()];
        CheckedEntry { entry, problems }
    }

    fn report_for(bib: &str) -> Report {
        check_str(bib, &Restriction::Unrestricted, CheckConfig::default())
    }

    // ── fragments ───────────────────────────────────────────────────

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<script>&"x"</script>"#),
            "&lt;script&gt;&amp;&quot;x&quot;&lt;/script&gt;",
        );
    }

    #[test]
    fn test_fragment_severity_class() {
        let clean = make_checked("c", "Clean", vec![]);
        assert!(render_fragment(&clean, &LinkOptions::default()).contains("class=\"bibTag severe0\""));

        let bad = make_checked(
            "b",
            "Bad",
            vec![Problem::missing_field("year"), Problem::missing_field("volume")],
        );
        let html = render_fragment(&bad, &LinkOptions::default());
        assert!(html.contains("<div id=\"b\" class=\"bibTag severe2\">"));
        assert!(html.contains("<li>missing field 'year'</li>"));
        assert!(html.contains("<h2>b (article)</h2>"));
    }

    #[test]
    fn test_fragment_links_use_raw_title() {
        let checked = make_checked("k", "A Study", vec![]);
        let html = render_fragment(&checked, &LinkOptions::default());
        for engine in &SEARCH_ENGINES {
            assert!(html.contains(&format!(">{}</a>", engine.label)));
        }
        assert!(html.contains("href=\"https://www.google.com/search?q=A Study\""));
        assert!(html.contains("href=\"http://libgen.rs/search.php?req=A Study\""));
    }

    #[test]
    fn test_fragment_links_escaped_on_request() {
        let checked = make_checked("k", "A Study", vec![]);
        let opts = LinkOptions {
            escape_links: true,
            ..LinkOptions::default()
        };
        let html = render_fragment(&checked, &opts);
        assert!(html.contains("href=\"https://www.google.com/search?q=A%20Study\""));
    }

    #[test]
    fn test_fragment_without_title_or_author() {
        let checked = CheckedEntry {
            entry: Entry::new("bare", "misc", true),
            problems: vec![],
        };
        let html = render_fragment(&checked, &LinkOptions::default());
        assert!(html.contains("href=\"https://www.google.com/search?q=\""));
        assert!(html.contains("<div class=\"reference\"><a href=\"literature/bare\" target=\"_blank\"></a></div>"));
        assert!(html.contains("<div class=\"bibtex\"></div>"));
    }

    #[test]
    fn test_fragment_reference_line_and_raw_viewer() {
        let report = report_for("@article{r1,\n  author = {Doe, J. and Roe, R.},\n  title = {On <Tags>},\n}\n");
        let opts = LinkOptions {
            literature_dir: "/papers/".to_string(),
            escape_links: false,
        };
        let html = render_fragment(&report.entries[0], &opts);
        assert!(html.contains("<a href=\"/papers/r1\" target=\"_blank\">Doe, J.: On &lt;Tags&gt;</a>"));
        assert!(html.contains("@article{r1,<br />  author = {Doe, J. and Roe, R.},<br />"));
        assert!(html.contains("<input type=\"checkbox\" class=\"checked\"/>"));
        assert!(html.contains("<div class=\"bibtex_toggle\">Current BibTeX Entry</div>"));
    }

    // ── document ────────────────────────────────────────────────────

    #[test]
    fn test_document_summary_counts() {
        let report = report_for(
            "@article{a,\n journal = {J. X},\n}\n@proceedings{p,\n pages = {1},\n}\n@article{a,\n}\n@string{s = \"x\"}\n",
        );
        let meta = ReportMeta {
            bib_file: "refs.bib".to_string(),
            aux_file: "paper.aux".to_string(),
        };
        let html = render_document(&report, &meta, &LinkOptions::default());
        let c = &report.counters;

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<li>bib file: refs.bib</li>"));
        assert!(html.contains("<li>aux file: paper.aux</li>"));
        assert!(html.contains("<li># entries: 4</li>"));
        assert!(html.contains("<li># reported: 3</li>"));
        assert!(html.contains(&format!("<li># problems: {}</li>", c.total_problems())));
        assert!(html.contains("<li># wrong types: 1</li>"));
        assert!(html.contains("<li># flawed names: 1</li>"));
        assert!(html.contains("<li># non-unique id: 1</li>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_document_keeps_report_order() {
        let report = report_for("@misc{zeta,\n}\n@misc{alpha,\n}\n");
        let html = render_document(&report, &ReportMeta::default(), &LinkOptions::default());
        let zeta = html.find("id=\"zeta\"").unwrap();
        let alpha = html.find("id=\"alpha\"").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn test_write_report_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        write_report(&path, "<html></html>").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");
    }

    #[test]
    fn test_write_report_bad_path() {
        let err = write_report(Path::new("/nonexistent/dir/out.html"), "x").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dir/out.html"));
    }
}
