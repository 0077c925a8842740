//! Terminal rendering
//!
//! Agents talk to a `Renderer` rather than stdout so loops can be tested
//! without a terminal. `TerminalRenderer` draws boxed panels with `colored`.

use colored::*;
use lazy_regex::{regex, regex_captures};
use terminal_size::{Width, terminal_size};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::store::{BugRecord, StoreSummary};

/// Widest a bot reply panel gets
const MAX_BOT_WIDTH: usize = 100;

/// One row of a menu
#[derive(Debug, Clone, Copy)]
pub struct MenuItem {
    pub key: &'static str,
    pub icon: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Everything agents can show
pub trait Renderer {
    fn clear(&mut self);
    fn header(&mut self, title: &str, subtitle: &str);
    fn menu(&mut self, title: &str, items: &[MenuItem]);
    fn user_message(&mut self, text: &str);
    fn bot_message(&mut self, title: &str, text: &str);
    fn error(&mut self, msg: &str);
    fn success(&mut self, msg: &str);
    fn warning(&mut self, msg: &str);
    fn info(&mut self, msg: &str);
    fn rule(&mut self, label: &str);
    /// Shown right before a blocking model call
    fn status(&mut self, msg: &str);
    fn record(&mut self, number: usize, record: &BugRecord);
    fn summary(&mut self, summary: &StoreSummary);
}

fn terminal_width() -> usize {
    terminal_size().map(|(Width(w), _)| w as usize).unwrap_or(80)
}

/// Greedy word wrap by display width. Overlong words are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for raw in text.lines() {
        let mut line = String::new();
        let mut line_width = 0;

        for word in raw.split(' ') {
            let word_width = word.width();
            let sep = if line.is_empty() { 0 } else { 1 };

            if line_width + sep + word_width <= width {
                if sep == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += sep + word_width;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }

            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if line_width + ch_width > width && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(ch);
                line_width += ch_width;
            }
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Apply `**bold**` and `` `code` `` styling. Returns the styled text and
/// its visible width.
pub fn style_inline(line: &str) -> (String, usize) {
    let plain = regex!(r"\*\*([^*]+)\*\*").replace_all(line, "$1");
    let plain = regex!(r"`([^`]+)`").replace_all(&plain, "$1");
    let visible = plain.width();

    let styled = regex!(r"\*\*([^*]+)\*\*").replace_all(line, |caps: &lazy_regex::regex::Captures| {
        caps[1].bold().to_string()
    });
    let styled = regex!(r"`([^`]+)`").replace_all(&styled, |caps: &lazy_regex::regex::Captures| {
        caps[1].cyan().to_string()
    });

    (styled.into_owned(), visible)
}

/// Lightly formatted markdown lines, each with its visible width
fn format_markdown(text: &str, width: usize) -> Vec<(String, usize)> {
    let mut out = Vec::new();
    let mut in_code = false;

    for raw in text.lines() {
        let trimmed = raw.trim_start();
        if trimmed.starts_with("```") {
            in_code = !in_code;
            for line in wrap(raw, width) {
                let w = line.width();
                out.push((line.dimmed().to_string(), w));
            }
            continue;
        }

        if in_code {
            for line in wrap(raw, width) {
                let w = line.width();
                out.push((line.cyan().to_string(), w));
            }
            continue;
        }

        if let Some((_, heading)) = regex_captures!(r"^#+\s+(.*)$", trimmed) {
            for line in wrap(heading.trim_end(), width) {
                let w = line.width();
                out.push((line.bold().to_string(), w));
            }
            continue;
        }

        for line in wrap(raw, width) {
            out.push(style_inline(&line));
        }
    }

    if out.is_empty() {
        out.push((String::new(), 0));
    }
    out
}

/// Characters for a box
struct BoxStyle {
    top_left: &'static str,
    top_right: &'static str,
    bottom_left: &'static str,
    bottom_right: &'static str,
    horizontal: &'static str,
    vertical: &'static str,
}

const ROUNDED: BoxStyle = BoxStyle {
    top_left: "╭",
    top_right: "╮",
    bottom_left: "╰",
    bottom_right: "╯",
    horizontal: "─",
    vertical: "│",
};

const HEAVY: BoxStyle = BoxStyle {
    top_left: "┏",
    top_right: "┓",
    bottom_left: "┗",
    bottom_right: "┛",
    horizontal: "━",
    vertical: "┃",
};

/// Draw a box around pre-styled lines. `inner` is the content width.
fn draw_box(
    style: &BoxStyle,
    title: &str,
    lines: &[(String, usize)],
    inner: usize,
    color: Color,
    indent: usize,
) -> Vec<String> {
    let pad = " ".repeat(indent);
    let mut out = Vec::with_capacity(lines.len() + 2);

    let title_width = if title.is_empty() { 0 } else { title.width() + 2 };
    let fill = (inner + 2).saturating_sub(title_width + 1);
    let top = if title.is_empty() {
        format!("{}{}{}", style.top_left, style.horizontal.repeat(inner + 2), style.top_right)
    } else {
        format!(
            "{}{} {} {}{}",
            style.top_left,
            style.horizontal,
            title.bold(),
            style.horizontal.repeat(fill),
            style.top_right
        )
    };
    out.push(format!("{}{}", pad, top.color(color)));

    for (text, width) in lines {
        let spaces = " ".repeat(inner.saturating_sub(*width));
        out.push(format!(
            "{}{} {}{} {}",
            pad,
            style.vertical.color(color),
            text,
            spaces,
            style.vertical.color(color)
        ));
    }

    let bottom = format!("{}{}{}", style.bottom_left, style.horizontal.repeat(inner + 2), style.bottom_right);
    out.push(format!("{}{}", pad, bottom.color(color)));
    out
}

/// Renders to stdout with ANSI styling
pub struct TerminalRenderer;

impl TerminalRenderer {
    pub fn new() -> Self {
        Self
    }

    fn print_lines(lines: Vec<String>) {
        for line in lines {
            println!("{}", line);
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for TerminalRenderer {
    fn clear(&mut self) {
        print!("\x1b[2J\x1b[H");
    }

    fn header(&mut self, title: &str, subtitle: &str) {
        let inner = terminal_width().saturating_sub(4).max(20);
        let center = |text: &str| {
            let w = text.width();
            let left = inner.saturating_sub(w) / 2;
            (format!("{}{}", " ".repeat(left), text), left + w)
        };

        let mut lines = vec![(String::new(), 0)];
        let (t, tw) = center(title);
        lines.push((t.bold().to_string(), tw));
        if !subtitle.is_empty() {
            let (s, sw) = center(subtitle);
            lines.push((s.italic().cyan().to_string(), sw));
        }
        lines.push((String::new(), 0));

        Self::print_lines(draw_box(&HEAVY, "", &lines, inner, Color::Blue, 0));
        println!();
    }

    fn menu(&mut self, title: &str, items: &[MenuItem]) {
        let inner = terminal_width().saturating_sub(4).max(20);
        let mut lines = Vec::new();
        for item in items {
            let key = format!("[{}]", item.key);
            let name = format!("{} {}", item.icon, item.name);
            lines.push((
                format!("{:>4}  {}", key.cyan().bold(), name.bold()),
                4usize.max(key.width()) + 2 + name.width(),
            ));
            if !item.description.is_empty() {
                lines.push((format!("      {}", item.description.dimmed()), 6 + item.description.width()));
            }
        }
        Self::print_lines(draw_box(&ROUNDED, title, &lines, inner, Color::Cyan, 0));
    }

    fn user_message(&mut self, text: &str) {
        let total = terminal_width();
        let max_inner = (total.saturating_sub(4) * 2 / 3).max(10);
        let wrapped = wrap(text, max_inner);
        let inner = wrapped.iter().map(|l| l.width()).max().unwrap_or(0).max(3);
        let lines: Vec<(String, usize)> = wrapped
            .into_iter()
            .map(|l| {
                let w = l.width();
                (l, w)
            })
            .collect();
        let indent = total.saturating_sub(inner + 4);
        Self::print_lines(draw_box(&ROUNDED, "You", &lines, inner, Color::Blue, indent));
    }

    fn bot_message(&mut self, title: &str, text: &str) {
        let inner = terminal_width().min(MAX_BOT_WIDTH).saturating_sub(4).max(10);
        let lines = format_markdown(text, inner);
        Self::print_lines(draw_box(&ROUNDED, title, &lines, inner, Color::Green, 0));
        println!();
    }

    fn error(&mut self, msg: &str) {
        println!("{}", format!("❌ {}", msg).red().bold());
    }

    fn success(&mut self, msg: &str) {
        println!("{}", format!("✅ {}", msg).green().bold());
    }

    fn warning(&mut self, msg: &str) {
        println!("{}", format!("⚠️ {}", msg).yellow());
    }

    fn info(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn rule(&mut self, label: &str) {
        let width = terminal_width();
        let label_width = label.width() + 2;
        let side = width.saturating_sub(label_width) / 2;
        println!(
            "{} {} {}",
            "─".repeat(side).cyan(),
            label.dimmed(),
            "─".repeat(width.saturating_sub(side + label_width)).cyan()
        );
    }

    fn status(&mut self, msg: &str) {
        println!("{} {}", "⏳".yellow(), msg.green().bold());
    }

    fn record(&mut self, number: usize, record: &BugRecord) {
        println!();
        println!("{}", format!("--- Bug #{} ---", number).cyan().bold());

        let inner = terminal_width().min(MAX_BOT_WIDTH).saturating_sub(4).max(20);
        let mut lines = Vec::new();
        let mut field = |label: &str, value: &str| {
            let text = format!("{} {}", label, value);
            for line in wrap(&text, inner) {
                let w = line.width();
                lines.push((line, w));
            }
        };
        field("📅 Date:", &record.date);
        field("💻 Language:", &record.language);
        field("⚠️ Error Type:", &record.error_type);
        field("❌ Mistake:", &record.mistake);
        field("Wrong Code:", &record.wrong_code);
        field("Correct Code:", &record.correct_code);
        field("💡 Explanation:", &record.explanation);

        Self::print_lines(draw_box(&ROUNDED, "", &lines, inner, Color::White, 0));
    }

    fn summary(&mut self, summary: &StoreSummary) {
        println!("{} {}", "📊 Total bugs:".bold(), summary.total);
        println!();
        println!("{}", "By language:".bold());
        for (language, count) in &summary.by_language {
            println!("  {:20} {}", language.cyan(), count);
        }
        println!();
        println!("{}", "By error type:".bold());
        for (error_type, count) in &summary.by_error_type {
            println!("  {:20} {}", error_type.cyan(), count);
        }
        println!();
    }
}
