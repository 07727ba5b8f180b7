mod annotator;
mod full_text;
mod relatedness;
mod statistics_store;

pub use annotator::IEntityAnnotator;
pub use full_text::IFullTextSearch;
pub use relatedness::{EntityPair, IRelatednessProvider};
pub use statistics_store::IStatisticsStore;
