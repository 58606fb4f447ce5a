mod knowledge;
mod records;
mod reservations;

pub use knowledge::KnowledgeRepository;
pub use records::RecordRepository;
pub use reservations::ReservationRepository;
