mod model;

pub use model::SampleEvents;
