use crate::state::{HasProfiles, HasServices};

pub trait ProfilesContext: HasServices + HasProfiles {}

impl<T> ProfilesContext for T where T: HasServices + HasProfiles {}
