mod chat;
mod reservation;
mod retrieval;

pub use chat::ChatService;
pub use reservation::ReservationService;
pub use retrieval::{format_context, AnswerGenerator, KnowledgeRetriever};
