use crate::config::LayoutConfig;

/// Upper bound on grid columns and blank rows for pages with implausible geometry.
const MAX_GRID_CELLS: usize = 4096;

/// A single glyph placed on the page, in points with the origin at the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub text: String,
    pub x: f64,
    pub top: f64,
    pub width: f64,
}

impl Glyph {
    pub fn new(text: impl Into<String>, x: f64, top: f64, width: f64) -> Self {
        Self {
            text: text.into(),
            x,
            top,
            width,
        }
    }

    fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Visible area of a page, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl PageBox {
    pub fn new(left: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            width,
            height,
        }
    }

    fn max_columns(&self, config: &LayoutConfig) -> usize {
        grid_limit(self.width / config.x_density)
    }

    fn max_rows(&self, config: &LayoutConfig) -> usize {
        grid_limit(self.height / config.y_density)
    }
}

fn grid_limit(cells: f64) -> usize {
    // NaN and negative values cast to 0
    (cells.ceil() as usize).clamp(1, MAX_GRID_CELLS)
}

/// Lay out the glyphs of one page on a character grid.
///
/// Columns are `x_density` points wide and rows `y_density` points tall, so
/// indentation and vertical gaps survive as spaces and blank lines. Word
/// starts never land past the page width and vertical gaps never add more
/// rows than the page height holds.
///
/// The grid is trimmed: no blank rows above the first line, no padding to the
/// page width, no trailing whitespace. A page without glyphs renders as an
/// empty string, unlike pdfplumber's padded `layout=True` output.
pub fn render_page(glyphs: &[Glyph], page: PageBox, config: &LayoutConfig) -> String {
    let lines = group_lines(glyphs, config.y_tolerance);
    let max_rows = page.max_rows(config);

    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut prev_top: Option<f64> = None;

    for line in &lines {
        let top = line[0].top;
        if let Some(prev) = prev_top {
            let rows = (((top - prev) / config.y_density).round().max(0.0) as usize).min(max_rows);
            for _ in 1..rows {
                out.push(String::new());
            }
        }
        prev_top = Some(top);
        out.push(render_line(line, page, config));
    }

    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }

    out.join("\n")
}

/// Cluster glyphs whose baselines lie within `tolerance` of the first glyph
/// of a line. Lines come back top to bottom, each sorted left to right.
fn group_lines(glyphs: &[Glyph], tolerance: f64) -> Vec<Vec<&Glyph>> {
    let mut sorted: Vec<&Glyph> = glyphs
        .iter()
        .filter(|g| !g.text.trim().is_empty())
        .collect();
    sorted.sort_by(|a, b| a.top.total_cmp(&b.top).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<Vec<&Glyph>> = Vec::new();
    for glyph in sorted {
        match lines.last_mut() {
            Some(line) if (glyph.top - line[0].top).abs() <= tolerance => line.push(glyph),
            _ => lines.push(vec![glyph]),
        }
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    lines
}

fn render_line(line: &[&Glyph], page: PageBox, config: &LayoutConfig) -> String {
    let max_columns = page.max_columns(config);
    let mut text = String::new();
    let mut width = 0usize;
    let mut prev_right: Option<f64> = None;

    for glyph in line {
        let starts_word = match prev_right {
            None => true,
            Some(right) => glyph.x - right > config.x_tolerance,
        };

        if starts_word {
            let column = ((glyph.x - page.left) / config.x_density).round().max(0.0) as usize;
            let min_column = if prev_right.is_some() { width + 1 } else { 0 };
            let target = column.min(max_columns).max(min_column);
            text.extend(std::iter::repeat_n(' ', target - width));
            width = target;
        }

        text.push_str(&glyph.text);
        width += glyph.text.chars().count();
        prev_right = Some(prev_right.map_or(glyph.right(), |r| r.max(glyph.right())));
    }

    text.trim_end().to_string()
}
