// SPDX-License-Identifier: MIT OR Apache-2.0
//! Terminal panel - operation messages, log output and command input.

use crate::state::EditorState;
use std::collections::VecDeque;
use std::sync::mpsc;
use strucframe_editor_model::NodeId;

/// A tracing event captured by the [`TracingBridge`] layer.
#[derive(Debug, Clone)]
pub struct TracingEvent {
    /// The log level.
    pub level: LogLevel,
    /// The formatted message.
    pub message: String,
    /// Module path the event came from.
    pub target: String,
}

/// A `tracing_subscriber::Layer` that forwards events over an `mpsc` channel
/// so the [`TerminalPanel`] can display them.
pub struct TracingBridge {
    sender: mpsc::Sender<TracingEvent>,
}

impl TracingBridge {
    /// Create a new bridge and return `(layer, receiver)`.
    pub fn new() -> (Self, mpsc::Receiver<TracingEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl<S> tracing_subscriber::Layer<S> for TracingBridge
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let level = LogLevel::from(*event.metadata().level());

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let message = if visitor.message.is_empty() {
            "(empty)".to_string()
        } else {
            visitor.message
        };

        // The receiver is gone once the window closes
        let _ = self.sender.send(TracingEvent {
            level,
            message,
            target: event.metadata().target().to_string(),
        });
    }
}

/// Visitor that extracts the `message` field from a tracing event.
#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl MessageVisitor {
    fn push_field(&mut self, name: &str, value: String) {
        if name == "message" {
            self.message = value;
        } else if self.message.is_empty() {
            self.message = format!("{name} = {value}");
        } else {
            self.message.push_str(&format!(", {name} = {value}"));
        }
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.push_field(field.name(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.push_field(field.name(), value.to_string());
    }
}

/// Format a `SystemTime` as HH:MM:SS
fn format_system_time(time: &std::time::SystemTime) -> String {
    let secs = time
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{:02}:{:02}:{:02}", (secs / 3600) % 24, (secs / 60) % 60, secs % 60)
}

/// Severity of a terminal line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Trace
    Trace,
    /// Debug
    Debug,
    /// Info
    Info,
    /// Warning
    Warn,
    /// Error
    Error,
    /// Model operation message, always shown
    Operation,
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Self::Trace,
            tracing::Level::DEBUG => Self::Debug,
            tracing::Level::INFO => Self::Info,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::ERROR => Self::Error,
        }
    }
}

impl LogLevel {
    const FILTERABLE: [Self; 5] = [Self::Trace, Self::Debug, Self::Info, Self::Warn, Self::Error];

    fn name(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Operation => "OP",
        }
    }

    fn short_name(self) -> &'static str {
        match self {
            Self::Trace => "T",
            Self::Debug => "D",
            Self::Info => "I",
            Self::Warn => "W",
            Self::Error => "E",
            Self::Operation => ">",
        }
    }

    fn color(self) -> egui::Color32 {
        match self {
            Self::Trace => egui::Color32::from_rgb(100, 100, 100),
            Self::Debug => egui::Color32::from_rgb(150, 150, 150),
            Self::Info => egui::Color32::from_rgb(200, 200, 200),
            Self::Warn => egui::Color32::from_rgb(255, 200, 80),
            Self::Error => egui::Color32::from_rgb(255, 100, 100),
            Self::Operation => egui::Color32::from_rgb(120, 220, 120),
        }
    }

    fn bg_color(self) -> egui::Color32 {
        match self {
            Self::Warn => egui::Color32::from_rgba_unmultiplied(255, 200, 80, 20),
            Self::Error => egui::Color32::from_rgba_unmultiplied(255, 100, 100, 30),
            _ => egui::Color32::TRANSPARENT,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A terminal line
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity
    pub level: LogLevel,
    /// Text
    pub message: String,
    /// HH:MM:SS of the latest occurrence
    pub timestamp: String,
    /// Number of collapsed duplicates
    pub count: u32,
}

/// The terminal panel
pub struct TerminalPanel {
    tracing_rx: Option<mpsc::Receiver<TracingEvent>>,
    /// Lines, oldest first
    pub entries: VecDeque<LogEntry>,
    /// Maximum lines to keep
    pub max_entries: usize,
    /// Search filter
    pub search: String,
    /// Auto-scroll to bottom
    pub auto_scroll: bool,
    /// Show timestamps
    pub show_timestamps: bool,
    /// Collapse duplicate messages
    pub collapse_duplicates: bool,
    /// Command input
    pub command_input: String,
    shown: [bool; 5],
    counts: [usize; 6],
}

impl TerminalPanel {
    /// Create a terminal wired to a tracing receiver.
    pub fn with_tracing_receiver(tracing_rx: Option<mpsc::Receiver<TracingEvent>>) -> Self {
        let mut panel = Self {
            tracing_rx,
            entries: VecDeque::new(),
            max_entries: 1000,
            search: String::new(),
            auto_scroll: true,
            show_timestamps: false,
            collapse_duplicates: true,
            command_input: String::new(),
            // Debug output is noisy while picking
            shown: [false, false, true, true, true],
            counts: [0; 6],
        };
        panel.log(LogLevel::Operation, "StrucFrame Editor ready. Type 'help' for commands.");
        panel
    }

    /// Add a line
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        let timestamp = format_system_time(&std::time::SystemTime::now());
        self.counts[level.index()] += 1;

        if self.collapse_duplicates {
            if let Some(last) = self.entries.back_mut() {
                if last.level == level && last.message == message {
                    last.count += 1;
                    last.timestamp = timestamp;
                    return;
                }
            }
        }

        self.entries.push_back(LogEntry {
            level,
            message,
            timestamp,
            count: 1,
        });

        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// Clear all lines
    pub fn clear(&mut self) {
        self.entries.clear();
        self.counts = [0; 6];
    }

    fn is_level_visible(&self, level: LogLevel) -> bool {
        self.shown.get(level.index()).copied().unwrap_or(true)
    }

    /// Drain pending tracing events into the log.
    pub fn poll_tracing_events(&mut self) {
        let Some(rx) = &self.tracing_rx else {
            return;
        };
        let events: Vec<_> = rx.try_iter().collect();
        for event in events {
            self.log(event.level, format!("[{}] {}", event.target, event.message));
        }
    }

    /// Pull operation messages from the editor state
    pub fn poll_operations(&mut self, state: &mut EditorState) {
        for message in state.take_terminal_messages() {
            self.log(LogLevel::Operation, message);
        }
    }

    /// Render the terminal panel
    pub fn ui(&mut self, ui: &mut egui::Ui, state: &mut EditorState) {
        self.poll_tracing_events();
        self.poll_operations(state);

        ui.horizontal(|ui| {
            if ui.button("Clear").on_hover_text("Clear all lines").clicked() {
                self.clear();
            }

            ui.separator();

            for level in LogLevel::FILTERABLE {
                let shown = self.shown[level.index()];
                let text = format!("{} {}", level.short_name(), self.counts[level.index()]);
                let color = if shown { level.color() } else { egui::Color32::GRAY };
                if ui
                    .add(egui::Button::new(egui::RichText::new(text).color(color).monospace()))
                    .on_hover_text(format!("{} messages", level.name()))
                    .clicked()
                {
                    self.shown[level.index()] = !shown;
                }
            }

            ui.separator();

            ui.add(
                egui::TextEdit::singleline(&mut self.search)
                    .hint_text("Search...")
                    .desired_width(150.0),
            );
            if !self.search.is_empty() && ui.button("x").on_hover_text("Clear search").clicked() {
                self.search.clear();
            }

            ui.separator();

            ui.menu_button("Options", |ui| {
                ui.checkbox(&mut self.auto_scroll, "Auto-scroll");
                ui.checkbox(&mut self.show_timestamps, "Show timestamps");
                ui.checkbox(&mut self.collapse_duplicates, "Collapse duplicates");
            });
        });

        ui.separator();

        let input_height = 28.0;
        let search = self.search.to_lowercase();
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .max_height((ui.available_height() - input_height).max(0.0))
            .stick_to_bottom(self.auto_scroll)
            .show(ui, |ui| {
                let visible = self.entries.iter().filter(|entry| {
                    self.is_level_visible(entry.level)
                        && (search.is_empty() || entry.message.to_lowercase().contains(&search))
                });
                for entry in visible {
                    self.entry_ui(ui, entry);
                }
            });

        ui.separator();
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(">").monospace());
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.command_input)
                    .hint_text("Enter command...")
                    .desired_width(f32::INFINITY)
                    .font(egui::TextStyle::Monospace),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                let command = std::mem::take(&mut self.command_input);
                self.execute_command(command.trim(), state);
                response.request_focus();
            }
        });
    }

    fn entry_ui(&self, ui: &mut egui::Ui, entry: &LogEntry) {
        let response = ui.horizontal(|ui| {
            let bg_color = entry.level.bg_color();
            if bg_color != egui::Color32::TRANSPARENT {
                let rect = ui.available_rect_before_wrap();
                ui.painter().rect_filled(
                    egui::Rect::from_min_size(rect.min, egui::vec2(ui.available_width(), 18.0)),
                    0.0,
                    bg_color,
                );
            }

            if self.show_timestamps {
                ui.label(
                    egui::RichText::new(&entry.timestamp)
                        .monospace()
                        .size(11.0)
                        .color(egui::Color32::from_rgb(100, 100, 100)),
                );
            }

            if entry.level != LogLevel::Operation {
                ui.label(
                    egui::RichText::new(format!("[{}]", entry.level.short_name()))
                        .monospace()
                        .size(11.0)
                        .color(entry.level.color()),
                );
            }

            if entry.count > 1 {
                ui.label(
                    egui::RichText::new(format!("({})", entry.count))
                        .monospace()
                        .size(10.0)
                        .color(egui::Color32::from_rgb(150, 150, 200)),
                );
            }

            ui.label(
                egui::RichText::new(&entry.message)
                    .monospace()
                    .size(12.0)
                    .color(entry.level.color()),
            );
        });

        response.response.context_menu(|ui| {
            if ui.button("Copy message").clicked() {
                ui.output_mut(|o| o.copied_text = entry.message.clone());
                ui.close_menu();
            }
        });
    }

    /// Run a terminal command against the editor
    pub fn execute_command(&mut self, command: &str, state: &mut EditorState) {
        if command.is_empty() {
            return;
        }
        self.log(LogLevel::Operation, format!("> {command}"));

        let mut parts = command.split_whitespace();
        let Some(name) = parts.next() else {
            return;
        };
        let args: Vec<&str> = parts.collect();

        match name.to_lowercase().as_str() {
            "help" => {
                for line in [
                    "help                  Show this list",
                    "clear                 Clear the terminal",
                    "node X Y Z            Add a node",
                    "frame A B             Join nodes A and B",
                    "view iso|top|front|right",
                    "delete                Delete the selection",
                ] {
                    self.log(LogLevel::Operation, line);
                }
            }
            "clear" => self.clear(),
            "node" => match parse_numbers::<f64>(&args, 3) {
                Some(v) if v.iter().all(|c| c.is_finite()) => {
                    state.add_node(v[0], v[1], v[2]);
                }
                Some(_) => self.log(LogLevel::Error, "Node coordinates must be finite numbers"),
                None => self.log(LogLevel::Error, "Usage: node X Y Z"),
            },
            "frame" => match parse_numbers::<u32>(&args, 2) {
                Some(v) => {
                    let (a, b) = (NodeId(v[0]), NodeId(v[1]));
                    if let Err(e) = state.add_frame(a, b) {
                        self.log(LogLevel::Error, e.to_string());
                    }
                }
                None => self.log(LogLevel::Error, "Usage: frame A B"),
            },
            "view" => match args.first() {
                Some(preset) => {
                    if let Err(e) = state.controller.set_view_direction_named(preset) {
                        self.log(LogLevel::Error, e.to_string());
                    }
                }
                None => self.log(LogLevel::Error, "Usage: view iso|top|front|right"),
            },
            "delete" => {
                state.delete_selected();
            }
            other => self.log(LogLevel::Error, format!("Unknown command: {other}")),
        }
        self.poll_operations(state);
    }
}

/// Parse exactly `count` numbers
fn parse_numbers<T: std::str::FromStr>(args: &[&str], count: usize) -> Option<Vec<T>> {
    if args.len() != count {
        return None;
    }
    args.iter().map(|a| a.parse().ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(panel: &TerminalPanel) -> Vec<&str> {
        panel.entries.iter().map(|e| e.message.as_str()).collect()
    }

    #[test]
    fn test_collapse_duplicates() {
        let mut panel = TerminalPanel::with_tracing_receiver(None);
        panel.clear();
        panel.log(LogLevel::Warn, "same");
        panel.log(LogLevel::Warn, "same");
        panel.log(LogLevel::Info, "same");
        assert_eq!(panel.entries.len(), 2);
        assert_eq!(panel.entries[0].count, 2);
    }

    #[test]
    fn test_max_entries() {
        let mut panel = TerminalPanel::with_tracing_receiver(None);
        panel.max_entries = 3;
        for i in 0..5 {
            panel.log(LogLevel::Info, format!("line {i}"));
        }
        assert_eq!(messages(&panel), vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_tracing_events_are_polled() {
        let (bridge, rx) = TracingBridge::new();
        let mut panel = TerminalPanel::with_tracing_receiver(Some(rx));
        panel.clear();
        bridge
            .sender
            .send(TracingEvent {
                level: LogLevel::Warn,
                message: "Frame rejected".to_string(),
                target: "strucframe_editor_app::state".to_string(),
            })
            .unwrap();
        panel.poll_tracing_events();
        assert_eq!(messages(&panel), vec!["[strucframe_editor_app::state] Frame rejected"]);
    }

    #[test]
    fn test_commands_drive_the_model() {
        let mut panel = TerminalPanel::with_tracing_receiver(None);
        let mut state = EditorState::default();
        panel.clear();

        panel.execute_command("node 0 0 0", &mut state);
        panel.execute_command("node 3 4 0", &mut state);
        panel.execute_command("frame 1 2", &mut state);
        panel.execute_command("frame 1 1", &mut state);

        assert_eq!(state.document.node_count(), 2);
        assert_eq!(state.document.element_count(), 1);
        let lines = messages(&panel);
        assert!(lines.contains(&">> Joint Added: 2"));
        assert!(lines.contains(&">> Frame Added: ID 1"));
        assert_eq!(panel.entries.back().map(|e| e.level), Some(LogLevel::Error));
    }

    #[test]
    fn test_bad_command_arguments() {
        let mut panel = TerminalPanel::with_tracing_receiver(None);
        let mut state = EditorState::default();
        panel.execute_command("node 1 two 3", &mut state);
        panel.execute_command("view sideways", &mut state);
        panel.execute_command("launch", &mut state);
        assert_eq!(state.document.node_count(), 0);
        let errors = panel.entries.iter().filter(|e| e.level == LogLevel::Error).count();
        assert_eq!(errors, 3);
    }

    #[test]
    fn test_node_rejects_non_finite_coordinates() {
        let mut panel = TerminalPanel::with_tracing_receiver(None);
        let mut state = EditorState::default();
        panel.clear();

        for command in ["node nan 0 0", "node inf 1 2", "node 0 -infinity 0"] {
            panel.execute_command(command, &mut state);
            assert_eq!(panel.entries.back().map(|e| e.level), Some(LogLevel::Error));
        }
        assert_eq!(state.document.node_count(), 0);
        assert_eq!(state.controller.grid().size, 100.0);

        panel.execute_command("node 1e3 0 0", &mut state);
        assert_eq!(state.document.node_count(), 1);
    }
}
