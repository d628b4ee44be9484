//! Placeholder timeline events shown beside the waveform.
//!
//! The list is static; nothing creates, edits or stores events.

use ratatui::style::Color;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEvent {
    pub id: u32,
    pub name: String,
    pub color: Color,
}

impl TimelineEvent {
    fn new(id: u32, name: &str, color: Color) -> Self {
        Self {
            id,
            name: name.to_string(),
            color,
        }
    }
}

pub fn default_events() -> Vec<TimelineEvent> {
    vec![
        TimelineEvent::new(1, "Red Event", Color::Red),
        TimelineEvent::new(2, "Blue Event", Color::Blue),
        TimelineEvent::new(3, "Green Event", Color::Green),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_events_have_unique_ids_in_order() {
        let events = default_events();
        let ids: Vec<u32> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(events[0].name, "Red Event");
        assert_eq!(events[2].color, Color::Green);
    }
}
