use crate::state::{HasDevices, HasFleet, HasServices};

pub trait DevicesContext: HasServices + HasDevices + HasFleet {}

impl<T> DevicesContext for T where T: HasServices + HasDevices + HasFleet {}
