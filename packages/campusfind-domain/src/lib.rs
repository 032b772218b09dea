pub mod category;
pub mod chat;
pub mod item;
pub mod similarity;

pub use category::Category;
pub use chat::{Conversation, ConversationView, Message, User, conversation_id};
pub use item::{Item, ItemStatus};
pub use similarity::{CANDIDATE_POOL, MAX_MATCHES, MIN_MATCH_SCORE, MatchCandidate, similarity};
