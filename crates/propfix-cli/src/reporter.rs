use colored::Colorize;

use crate::driver::FixReport;
use propfix_codefix::SplicePath;

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    /// Every changed file under a header, for printing to stdout.
    pub fn render(&self, report: &FixReport) -> String {
        if report.changed.is_empty() {
            return "no changes\n".to_string();
        }
        let mut out = String::new();
        for (index, file) in report.changed.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            let header = format!("==> {} <==", file.path.display());
            out.push_str(&self.header(&header));
            out.push('\n');
            out.push_str(&file.text);
            if !file.text.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }

    /// One line for `--write`.
    pub fn summary(&self, report: &FixReport) -> String {
        let scope = match report.splice_path {
            SplicePath::SameDocument => "field and property in one file",
            SplicePath::CrossDocument => "field and property in separate files",
        };
        let count = report.changed.len();
        let files = if count == 1 { "file" } else { "files" };
        let line = format!("updated {count} {files} ({scope})");
        if self.color {
            line.green().to_string()
        } else {
            line
        }
    }

    fn header(&self, text: &str) -> String {
        if self.color {
            text.bold().cyan().to_string()
        } else {
            text.to_string()
        }
    }
}
