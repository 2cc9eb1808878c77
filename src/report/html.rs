use std::fmt::Write;

use anyhow::Result;

use super::Renderer;
use crate::audit::{Issue, IssueType, TestResult};
use crate::pipeline::Counts;

/// Self-contained HTML page listing every issue of one test.
#[derive(Debug, Clone, Default)]
pub struct HtmlReport;

const STYLE: &str = "body{font-family:sans-serif;margin:2em;color:#202122}\
.issue{border-left:4px solid #a2a9b1;padding:.5em 1em;margin:1em 0}\
.issue-error{border-color:#d33}.issue-warning{border-color:#fc3}.issue-notice{border-color:#36c}\
pre{white-space:pre-wrap;background:#f8f9fa;padding:.5em}";

impl Renderer for HtmlReport {
    fn render(&self, result: &TestResult) -> Result<String> {
        let counts = Counts::tally(&result.issues);
        let title = format!("Accessibility report for '{}'", result.name);

        let mut out = String::new();
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(out, "<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(out, "<title>{}</title>", escape(&title))?;
        writeln!(out, "<style>{STYLE}</style>")?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;
        writeln!(out, "<h1>{}</h1>", escape(&title))?;

        if let Some(page_url) = &result.page_url {
            writeln!(
                out,
                "<p>Page: <a href=\"{0}\">{0}</a></p>",
                escape(page_url)
            )?;
        }
        if let Some(doc_title) = &result.document_title {
            writeln!(out, "<p>Document title: {}</p>", escape(doc_title))?;
        }

        writeln!(out, "<ul class=\"counts\">")?;
        writeln!(out, "<li class=\"count-error\">{} errors</li>", counts.errors)?;
        writeln!(out, "<li class=\"count-warning\">{} warnings</li>", counts.warnings)?;
        writeln!(out, "<li class=\"count-notice\">{} notices</li>", counts.notices)?;
        writeln!(out, "</ul>")?;

        if result.issues.is_empty() {
            writeln!(out, "<p>No accessibility issues found.</p>")?;
        }

        for kind in [IssueType::Error, IssueType::Warning, IssueType::Notice] {
            for issue in result.issues.iter().filter(|i| i.kind == kind) {
                write_issue(&mut out, issue)?;
            }
        }

        writeln!(out, "</body>")?;
        writeln!(out, "</html>")?;
        Ok(out)
    }
}

fn write_issue(out: &mut String, issue: &Issue) -> std::fmt::Result {
    writeln!(out, "<section class=\"issue issue-{}\">", issue.kind)?;
    writeln!(
        out,
        "<h2>{}: {}</h2>",
        issue.kind,
        escape(issue.message.as_deref().unwrap_or_default())
    )?;
    if let Some(code) = &issue.code {
        writeln!(out, "<p>Code: <code>{}</code></p>", escape(code))?;
    }
    writeln!(out, "<p>Runner: {}</p>", escape(&issue.runner))?;
    if let Some(selector) = issue.selector.as_deref().filter(|s| !s.is_empty()) {
        writeln!(out, "<p>Selector: <code>{}</code></p>", escape(selector))?;
    }
    if let Some(Some(context)) = &issue.context {
        writeln!(out, "<pre>{}</pre>", escape(context))?;
    }
    writeln!(out, "</section>")
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
