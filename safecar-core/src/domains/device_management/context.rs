use crate::state::{HasDevices, HasFleet, HasServices};

pub trait DeviceManagementContext: HasServices + HasFleet + HasDevices {}

impl<T> DeviceManagementContext for T where T: HasServices + HasFleet + HasDevices {}
