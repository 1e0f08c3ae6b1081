use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::view::{Projection, ViewMode, ViewState};

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color })
    }

    #[tracing::instrument(skip(self, projection, view, now))]
    pub fn print_projection(
        &mut self,
        projection: &Projection<'_>,
        view: &ViewState,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let heading = match projection.mode {
            ViewMode::Active if view.search.is_empty() => {
                format!("{} (active)", view.category.title())
            }
            ViewMode::Active => format!(
                "{} (active, matching \"{}\")",
                view.category.title(),
                view.search
            ),
            ViewMode::Completed => format!("{} (completed)", view.category.title()),
            ViewMode::Deleted => format!("{} (deleted)", view.category.title()),
        };
        writeln!(out, "{heading}")?;

        if projection.rows.is_empty() {
            writeln!(out, "(no items)")?;
            return Ok(());
        }

        let with_marker = projection.mode.selection_enabled();
        let mut headers = Vec::new();
        if with_marker {
            headers.push("Sel".to_string());
        }
        headers.push("ID".to_string());
        headers.push("Age".to_string());
        headers.push("Name".to_string());

        let mut rows = Vec::with_capacity(projection.rows.len());
        for row in &projection.rows {
            let id = self.paint(&row.item.id.to_string(), "33");
            let age = format_age(now, row.item.entry);
            let name = if row.selected {
                self.paint(&row.item.name, "36")
            } else {
                row.item.name.clone()
            };

            let mut cells = Vec::new();
            if with_marker {
                let marker = if row.selected { "*" } else { "" };
                cells.push(marker.to_string());
            }
            cells.push(id);
            cells.push(age);
            cells.push(name);
            rows.push(cells);
        }

        write_table(&mut out, &headers, rows)?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn format_age(now: DateTime<Utc>, entry: DateTime<Utc>) -> String {
    let secs = (now - entry).num_seconds().max(0);
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86_400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86_400)
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: &[String],
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths: Vec<usize> = headers
        .iter()
        .map(|header| UnicodeWidthStr::width(header.as_str()))
        .collect();

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(visible_width(cell));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let padding = widths[idx].saturating_sub(visible_width(cell));
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn visible_width(cell: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(cell).as_str())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
