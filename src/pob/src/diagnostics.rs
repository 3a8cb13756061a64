//! Parse diagnostics
//!
//! The item parser reports what it did with every line through a
//! [`DiagnosticSink`] supplied by the caller, instead of printing as it goes.

use crate::item::{Influence, ModGroup, Rarity};

/// Something the item parser decided about a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent {
    /// A rarity declaration was accepted
    Rarity(Rarity),
    /// A rarity declaration named an unknown rarity and was ignored
    UnknownRarity(String),
    Name(String),
    BaseType(String),
    /// `Implicits: N` declared how many implicit-section lines follow
    ImplicitCount(u32),
    Influence(Influence),
    Corrupted,
    /// A modifier line was stored in a group
    Modifier { group: ModGroup, text: String },
    /// A property or metadata line was recognized and discarded
    Skipped(String),
    /// A line in the properties section matched nothing and was dropped
    Dropped(String),
}

/// Receives parse events for one or more items
pub trait DiagnosticSink {
    fn record(&mut self, item_id: u32, event: ParseEvent);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    #[inline]
    fn record(&mut self, _item_id: u32, _event: ParseEvent) {}
}

/// Collects events in order, tagged with the item id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    pub events: Vec<(u32, ParseEvent)>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded for a single item
    pub fn for_item(&self, item_id: u32) -> impl Iterator<Item = &ParseEvent> {
        self.events
            .iter()
            .filter(move |(id, _)| *id == item_id)
            .map(|(_, event)| event)
    }

    /// Lines dropped for a single item
    pub fn dropped(&self, item_id: u32) -> Vec<&str> {
        self.for_item(item_id)
            .filter_map(|event| match event {
                ParseEvent::Dropped(line) => Some(line.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl DiagnosticSink for Trace {
    fn record(&mut self, item_id: u32, event: ParseEvent) {
        self.events.push((item_id, event));
    }
}

/// Forwards events to `tracing` at trace level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&mut self, item_id: u32, event: ParseEvent) {
        match &event {
            ParseEvent::Dropped(line) => {
                tracing::debug!(item_id, line = line.as_str(), "dropped unrecognized line")
            }
            _ => tracing::trace!(item_id, ?event, "item parse"),
        }
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn record(&mut self, item_id: u32, event: ParseEvent) {
        (**self).record(item_id, event);
    }
}
