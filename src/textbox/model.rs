use std::fmt;

/// Milliseconds since the Unix epoch at creation, made strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextboxId(pub i64);

impl fmt::Display for TextboxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "textbox-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Textbox {
    pub id: TextboxId,
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub is_editing: bool,
}

impl Textbox {
    pub fn new(id: TextboxId, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            text: String::new(),
            is_editing: true,
        }
    }
}

/// Hands out time based ids that never repeat within one overlay.
#[derive(Debug, Clone, Default)]
pub struct IdSource {
    last: Option<i64>,
}

impl IdSource {
    pub fn next_id(&mut self) -> TextboxId {
        self.next_at(chrono::Utc::now().timestamp_millis())
    }

    pub fn next_at(&mut self, now_millis: i64) -> TextboxId {
        let id = match self.last {
            Some(last) if now_millis <= last => last + 1,
            _ => now_millis,
        };
        self.last = Some(id);
        TextboxId(id)
    }
}
