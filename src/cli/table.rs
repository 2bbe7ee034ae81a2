//! Plain ASCII tables for console listings.

#[cfg(feature = "colorized_output")]
use console::style;

/// A table rendered with `|` separators and a dashed rule under the header
#[derive(Debug, Clone, Default)]
pub struct AsciiTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl AsciiTable {
    /// Create a table with the given header
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; missing cells render empty
    pub fn push<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.header.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let w = cell.chars().count();
                match widths.get_mut(i) {
                    Some(current) => *current = (*current).max(w),
                    None => widths.push(w),
                }
            }
        }
        widths
    }

    fn line(cells: &[String], widths: &[usize]) -> String {
        widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                format!("{cell:<w$}")
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    }

    /// Render without styling
    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();
        out.push_str(&Self::line(&self.header, &widths));
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join("-+-"));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&Self::line(row, &widths));
            out.push('\n');
        }
        out
    }

    /// Render with a bold header when colors are available
    pub fn render_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let rendered = self.render();
            match rendered.split_once('\n') {
                Some((header, rest)) => format!("{}\n{}", style(header).bold().cyan(), rest),
                None => rendered,
            }
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.render()
        }
    }

    /// Print to stdout
    pub fn print(&self) {
        print!("{}", self.render_colored());
    }
}
