pub mod guard;
pub mod intent;
pub mod templates;

pub use intent::{Classification, IntentClassifier};
