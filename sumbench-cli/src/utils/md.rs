use std::io::IsTerminal;

use termimad::crossterm::style::{Attribute, Color};
use termimad::{Alignment, MadSkin};

pub fn print_md(s: impl AsRef<str>) {
    let mut printer = MarkdownPrinter::new();
    printer.add(s);
    printer.dump();
}

pub struct MarkdownPrinter {
    content: String,
}

impl MarkdownPrinter {
    pub fn new() -> Self {
        Self {
            content: String::new(),
        }
    }

    fn is_tty(&self) -> bool {
        std::io::stdout().is_terminal()
    }

    pub fn dump(&self) {
        if self.is_tty() {
            report_skin().print_text(&self.content);
        } else {
            println!("{}", self.content);
        }
    }

    pub fn add(&mut self, s: impl AsRef<str>) {
        self.content.push_str(s.as_ref());
    }

    #[cfg(test)]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Append a table. Columns after the first are right-aligned.
    pub fn add_table(&mut self, headers: &[&str], rows: &[Vec<String>]) {
        let md_table = table_to_markdown(headers, rows);
        self.content.push_str(&md_table);
    }
}

/// Skin for the `#` section and `##` subsection headings the report uses.
fn report_skin() -> MadSkin {
    let mut skin = MadSkin::default();
    for header in skin.headers.iter_mut().take(2) {
        header.align = Alignment::Left;
        header.add_attr(Attribute::Bold);
        header.set_fg(Color::Blue);
    }
    skin.headers[0].set_bg(Color::Blue);
    skin.headers[0].add_attr(Attribute::NoUnderline);
    skin
}

fn table_to_markdown(headers: &[&str], rows: &[Vec<String>]) -> String {
    // Get each column's max width
    let mut col_widths = headers.iter().map(|h| h.len()).collect::<Vec<_>>();
    for row in rows {
        for (j, cell) in row.iter().enumerate().take(col_widths.len()) {
            col_widths[j] = col_widths[j].max(cell.len());
        }
    }
    let pad = |c: &str, n: usize| c.repeat(n);
    let build_row = |cells: Vec<&str>| {
        let mid = cells
            .iter()
            .enumerate()
            .map(|(j, c)| {
                if j == 0 {
                    format!("{}{}", c, pad(" ", col_widths[j] - c.len()))
                } else {
                    format!("{}{}", pad(" ", col_widths[j] - c.len()), c)
                }
            })
            .collect::<Vec<_>>()
            .join(" | ");
        "| ".to_string() + mid.as_str() + " |\n"
    };
    let mut md = build_row(headers.to_vec());
    let mut align = "|".to_string();
    for (j, w) in col_widths.iter().enumerate() {
        if j == 0 {
            align += &format!(":{} |", pad("-", *w));
        } else {
            align += &format!(" {}:|", pad("-", *w));
        }
    }
    md += &align;
    md += "\n";
    for row in rows {
        let mut cells = row.iter().map(|c| c.as_str()).collect::<Vec<_>>();
        cells.resize(headers.len(), "");
        md += &build_row(cells);
    }
    md
}

#[macro_export]
macro_rules! print_md {
    ($($arg:tt)*) => {
        $crate::utils::md::print_md(format!($($arg)*));
    };
}
