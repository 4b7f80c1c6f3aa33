use discuss_kit::mention::{MentionSession, SessionOptions, StaticDirectory, SuggestionProvider};
use discuss_kit::thread::CommentRecord;
use std::rc::Rc;
use std::time::Duration;

/// Session with no debounce so tests resolve on the next await.
pub fn test_session(provider: Rc<dyn SuggestionProvider>) -> MentionSession {
    MentionSession::new(provider, SessionOptions { debounce: Duration::ZERO, max_suggestions: 5 })
}

pub fn directory(names: &[&str]) -> Rc<dyn SuggestionProvider> {
    Rc::new(StaticDirectory::new(names.iter().copied()))
}

/// Decode records from compact JSON the way the backend sends them.
pub fn records(json: &str) -> Vec<CommentRecord> {
    discuss_kit::thread::decode_records(json).expect("test records decode")
}
