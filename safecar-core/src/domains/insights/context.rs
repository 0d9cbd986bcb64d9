use crate::state::{HasInsights, HasServices};

pub trait InsightsContext: HasServices + HasInsights {}

impl<T> InsightsContext for T where T: HasServices + HasInsights {}
