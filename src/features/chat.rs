//! Free-form chat. The user's text is the whole prompt.

use serde::Serialize;

use crate::core_state::CoreState;
use crate::models::{Feature, Message};
use crate::session_cache::SessionHandle;

use super::{FeatureError, Invocation};

#[derive(Debug, Clone, Serialize)]
pub struct ChatOutcome {
    pub reply: Message,
    /// Full transcript after this turn.
    pub messages: Vec<Message>,
}

/// One chat turn. The user message is kept even if the reply fails.
pub async fn send_message(
    core: &CoreState,
    session: &SessionHandle,
    text: &str,
) -> Result<ChatOutcome, FeatureError> {
    if text.trim().is_empty() {
        return Err(FeatureError::InvalidInput("Message is empty".into()));
    }

    let invocation = {
        let mut state = session.lock()?;
        if let Some(running) = state.pending_feature() {
            return Err(FeatureError::Busy(running));
        }
        state.push_message(&Message::user(text))?;
        Invocation::begin(core, session, &mut state, Feature::Chat)?
    };

    let result = invocation.complete(text.to_string()).await;

    let mut state = session.lock()?;
    match result {
        Ok(reply_text) => {
            let reply = Message::assistant(reply_text);
            state.push_message(&reply)?;
            invocation.resolve(&mut state, None)?;
            Ok(ChatOutcome {
                reply,
                messages: state.messages(),
            })
        }
        Err(e) => {
            invocation.fail(&mut state, &e.to_string())?;
            Err(e.into())
        }
    }
}
