pub mod paper;

pub use paper::{CategorizedBundle, DateRange, Paper, PaperBundle};
