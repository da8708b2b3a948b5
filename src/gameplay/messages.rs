//! Transient on-screen message with extend-on-repeat semantics.

// === Constants ===

/// Upper bound (seconds) a message can be extended to by repeats.
pub const MAX_MESSAGE_SECS: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    pub remaining: f32,
}

/// Holds at most one message. The HUD reads it; the simulation writes it.
#[derive(Debug, Default, Clone)]
pub struct MessageSink {
    current: Option<Message>,
}

impl MessageSink {
    /// Shows `text` for `duration` seconds.
    ///
    /// Repeating the message already on screen extends its remaining time instead of
    /// restarting it. Any other text replaces the current message.
    pub fn set_message(&mut self, text: impl Into<String>, duration: f32) {
        let text = text.into();
        let duration = duration.max(0.0);
        match &mut self.current {
            Some(message) if message.text == text => {
                message.remaining = (message.remaining + duration).min(MAX_MESSAGE_SECS);
            }
            _ => {
                self.current = Some(Message {
                    text,
                    remaining: duration.min(MAX_MESSAGE_SECS),
                });
            }
        }
    }

    /// Counts the current message down and clears it once expired.
    pub fn update(&mut self, dt: f32) {
        if let Some(message) = &mut self.current {
            message.remaining -= dt;
            if message.remaining <= 0.0 {
                self.current = None;
            }
        }
    }

    #[must_use]
    pub const fn current(&self) -> Option<&Message> {
        self.current.as_ref()
    }
}
