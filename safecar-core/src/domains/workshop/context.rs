use crate::state::{HasServices, HasWorkshops};

pub trait WorkshopContext: HasServices + HasWorkshops {}

impl<T> WorkshopContext for T where T: HasServices + HasWorkshops {}
