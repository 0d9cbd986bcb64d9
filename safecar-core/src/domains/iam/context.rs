use crate::state::{HasIam, HasServices};

pub trait IamContext: HasServices + HasIam {}

impl<T> IamContext for T where T: HasServices + HasIam {}
