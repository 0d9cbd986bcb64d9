use crate::state::{HasPayments, HasServices};

pub trait PaymentsContext: HasServices + HasPayments {}

impl<T> PaymentsContext for T where T: HasServices + HasPayments {}
